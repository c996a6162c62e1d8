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

//! The configuration surface named in `spec.md` §6. A single record,
//! constructed once, with no hidden process-wide state — every exploration
//! weight, budget, and policy flag that the original C++ sources kept as
//! file-scope `#define` constants (`spec.md` §9) lives here instead.

use serde::{Deserialize, Serialize};

/// Which of the two reward forms `spec.md` §4.5 describes to use. An
/// implementation must pick one at configuration time; the two are never
/// silently blended (`spec.md` §9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RewardForm {
    /// `reward = 1 - sum(|I - T|^2) / W`.
    PixelPair,
    /// `reward = exp(-d)` over a normalized, alpha/beta-weighted distance
    /// transform.
    DistanceMapExp,
}

impl Default for RewardForm {
    fn default() -> Self {
        Self::PixelPair
    }
}

/// Which built-in grammar `lsys_grammar::presets` to derive with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrammarId {
    /// `X -> F | F[-X][+X]`, no parameters.
    SimpleTree,
    /// `X -> F | F X`, no parameters.
    StochasticBranch,
    /// The parametric length/radius/angle grammar of `spec.md` §4.1.
    ParametricBranch,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Outer-loop bound: maximum number of root advancements.
    pub max_derivation_steps: u32,
    /// Per-root MCTS iteration budget.
    pub max_mcts_iterations: u32,
    /// Rollout horizon beyond the expanded node.
    pub max_rollout_depth: u32,
    /// Which built-in grammar to derive with.
    pub grammar_id: GrammarId,
    /// UCT exploration constant `C`.
    pub exploration_constant: f64,
    /// UCT variance-exploration weight `D`; `0.0` disables the term.
    pub exploration_variance_weight: f64,
    /// Which reward form to evaluate with.
    pub reward_form: RewardForm,
    /// `alpha` weight for the distance-map reward form.
    pub reward_alpha: f64,
    /// `beta` weight for the distance-map reward form.
    pub reward_beta: f64,
    /// Side length of the indicator grid before scaling.
    pub grid_size: u32,
    /// Multiplier applied to `grid_size` when rasterizing.
    pub render_scale: f32,
    /// Seed for the deterministic RNG threaded through the whole solve.
    pub rng_seed: u64,
    /// Progressive widening policy flag (`spec.md` §4.3, §9): only admit a
    /// new child when `children.len() < sqrt(2 * ln(iter + 1))`.
    pub progressive_widening: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_derivation_steps: 30,
            max_mcts_iterations: 200,
            max_rollout_depth: 2,
            grammar_id: GrammarId::ParametricBranch,
            exploration_constant: 0.3,
            exploration_variance_weight: 0.0,
            reward_form: RewardForm::PixelPair,
            reward_alpha: 10000.0,
            reward_beta: 5000.0,
            grid_size: 64,
            render_scale: 1.0,
            rng_seed: 42,
            progressive_widening: false,
        }
    }
}

impl SolverConfig {
    /// Validate the cross-field invariants the rest of the crate assumes.
    /// Pure and infallible by contract elsewhere (`spec.md` §7 — action
    /// enumeration and state cloning never fail); configuration is the one
    /// place validation happens, at construction time, before any search
    /// begins.
    pub fn validate(&self) -> Result<(), crate::error::SearchError> {
        if self.grid_size == 0 {
            return Err(crate::error::SearchError::InvalidGrammar(
                "grid_size must be nonzero".to_string(),
            ));
        }
        if self.exploration_variance_weight < 0.0 {
            return Err(crate::error::SearchError::InvalidGrammar(
                "exploration_variance_weight must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(SolverConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_grid_size_is_rejected() {
        let mut config = SolverConfig::default();
        config.grid_size = 0;
        assert!(config.validate().is_err());
    }
}
