// Copyright © Spelldawn 2021-present

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at

//    https://www.apache.org/licenses/LICENSE-2.0

// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A grammar, fixed at construction: an axiom plus the numeric knobs the
//! three built-in presets (`crate::presets`) use to cull and discretize the
//! action sets `crate::enumerate` produces (`spec.md` §4.1).

use lsys_core::config::GrammarId;
use lsys_core::symbol::Symbol;

/// The fixed configuration of one grammar instance. None of these fields
/// are essential to the search itself — `spec.md` §9 is explicit that the
/// exact discretizations are policy — but a grammar has to pick *some*
/// concrete numbers, and this is where they live.
#[derive(Debug, Clone)]
pub struct Grammar {
    pub id: GrammarId,
    pub axiom: Vec<Symbol>,

    /// Discretized choices (degrees) offered for the branch-diverging
    /// `Plus` angle.
    pub angle_grid_degrees: Vec<f64>,
    /// Discretized choices (degrees) offered for the small `Hash`
    /// adjustment angle.
    pub hash_grid_degrees: Vec<f64>,

    /// `X` culling thresholds (`spec.md` §4.1): beyond this accumulated
    /// length, only `stop` is offered.
    pub max_accumulated_length: f64,
    /// Below this segment length, only `extend` is offered.
    pub base_part_threshold: f64,
    /// `branch` is only offered while `depth < max_branch_depth`.
    pub max_branch_depth: u32,
    /// Multiplier applied to a segment's length when extending.
    pub extend_length_mult: f64,
    /// Multiplier applied to a segment's length when branching.
    pub branch_length_mult: f64,
    /// Multiplier applied to radius at each step.
    pub radius_shrink: f64,

    /// Depth-independent mean used to center the generic `F` length/radius
    /// value-slot grid (`spec.md` §4.1's final row). None of the built-in
    /// presets leave `F` pending — they bake its parameters in directly via
    /// rule arithmetic — so this is exercised by `crate::enumerate`'s tests
    /// rather than by a default preset's derivation.
    pub length_value_mean: f64,
    /// Multiples of `length_value_mean` offered as an `F` length or radius
    /// value action.
    pub length_value_multipliers: Vec<f64>,
}
