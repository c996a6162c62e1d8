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

//! The three built-in grammars named in `spec.md` §4.1 and
//! `SPEC_FULL.md` §4, grounded in `examples/original_source/MCTS_Parametric/
//! ParametricLSystem.cpp`'s `getActions` (for `parametric_branch`) and in
//! `spec.md`'s own worked examples (for the two parameter-free grammars).

use lsys_core::config::GrammarId;
use lsys_core::symbol::{Symbol, SymbolName};

use crate::grammar::Grammar;

/// `X -> F | F[-X][+X]`, no length/radius parameters — `spec.md` §8's
/// branch-vs-extend scenario grammar. The `-`/`+` symbols each still pass
/// through a value action (`crate::enumerate::enumerate_values`), but the
/// angle grid holds a single value, so the action is effectively baked in
/// at ±45 degrees.
pub fn simple_tree() -> Grammar {
    Grammar {
        id: GrammarId::SimpleTree,
        axiom: vec![Symbol::pending(SymbolName::X, 0)],
        angle_grid_degrees: vec![45.0],
        hash_grid_degrees: Vec::new(),
        max_accumulated_length: f64::INFINITY,
        base_part_threshold: 0.0,
        max_branch_depth: u32::MAX,
        extend_length_mult: 1.0,
        branch_length_mult: 1.0,
        radius_shrink: 1.0,
        length_value_mean: 1.0,
        length_value_multipliers: vec![1.0],
    }
}

/// `X -> F | F X`, no parameters — the smallest possible grammar, used for
/// the stop-or-extend scenario (`spec.md` §8).
pub fn stochastic_branch() -> Grammar {
    Grammar {
        id: GrammarId::StochasticBranch,
        axiom: vec![Symbol::pending(SymbolName::X, 0)],
        angle_grid_degrees: Vec::new(),
        hash_grid_degrees: Vec::new(),
        max_accumulated_length: f64::INFINITY,
        base_part_threshold: 0.0,
        max_branch_depth: u32::MAX,
        extend_length_mult: 1.0,
        branch_length_mult: 1.0,
        radius_shrink: 1.0,
        length_value_mean: 1.0,
        length_value_multipliers: vec![1.0],
    }
}

/// The length/radius/angle grammar of `spec.md` §4.1, supplemented per
/// `SPEC_FULL.md` §4 from the original source: `X` carries
/// `[next_segment_length, next_segment_radius, accumulated_length]`;
/// `extend` is `X -> F . Backslash . Hash . X`; `branch` is
/// `X -> F . [ Push Plus X Pop ] . F . Backslash . Hash . X`; `stop` is
/// `X -> F`.
pub fn parametric_branch() -> Grammar {
    Grammar {
        id: GrammarId::ParametricBranch,
        axiom: vec![Symbol::with_parameters(SymbolName::X, 0, vec![1.0, 0.1, 0.0])],
        angle_grid_degrees: vec![20.0, 40.0, 60.0, 80.0, 100.0],
        hash_grid_degrees: vec![-5.0, 5.0],
        max_accumulated_length: 5.0,
        base_part_threshold: 0.1,
        max_branch_depth: 4,
        extend_length_mult: 0.7,
        branch_length_mult: 0.5,
        radius_shrink: 0.9,
        length_value_mean: 1.0,
        length_value_multipliers: vec![0.8, 1.0, 1.2],
    }
}

/// Look up a built-in grammar by the configuration enum `spec.md` §6 names.
pub fn by_id(id: GrammarId) -> Grammar {
    match id {
        GrammarId::SimpleTree => simple_tree(),
        GrammarId::StochasticBranch => stochastic_branch(),
        GrammarId::ParametricBranch => parametric_branch(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parametric_branch_axiom_is_a_single_pending_x() {
        let grammar = parametric_branch();
        assert_eq!(grammar.axiom.len(), 1);
        assert_eq!(grammar.axiom[0].name, SymbolName::X);
        assert!(!grammar.axiom[0].terminal);
    }

    #[test]
    fn by_id_round_trips_the_three_presets() {
        assert_eq!(by_id(GrammarId::SimpleTree).id, GrammarId::SimpleTree);
        assert_eq!(by_id(GrammarId::StochasticBranch).id, GrammarId::StochasticBranch);
        assert_eq!(by_id(GrammarId::ParametricBranch).id, GrammarId::ParametricBranch);
    }
}
