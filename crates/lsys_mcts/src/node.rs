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

//! A `SearchNode` (`spec.md` §3): a cloned derivation state plus the
//! rollout statistics UCT selection reads from.

use lsys_core::action::Action;
use lsys_core::state::State;

/// One node of the MCTS tree. Lives inside a
/// `petgraph::stable_graph::StableGraph` keyed by `crate::tree::SearchTree`
/// — this struct carries no parent/child pointers itself; those are graph
/// edges, per `spec.md` §9's arena-with-integer-indices recommendation.
#[derive(Debug, Clone)]
pub struct SearchNode {
    pub state: State,
    /// Actions not yet expanded into a child.
    pub untried_actions: Vec<Action>,
    /// The action that produced this node from its parent; `None` at the
    /// root.
    pub selected_action: Option<Action>,
    pub visits: u32,
    pub best_reward: f64,
    pub mean_reward: f64,
    /// Welford's running sum of squared deviations from the mean. `spec.md`
    /// §9 calls out the source's buggy overwrite accumulator by name and
    /// requires a correct incremental variance instead.
    m2: f64,
    /// True once this subtree is fully explored and its `best_reward` can
    /// no longer improve (`spec.md` §3 invariant 2). Computed and
    /// maintained by `crate::driver`, which alone has the child-list
    /// context this flag depends on.
    pub fixed: bool,
}

impl SearchNode {
    pub fn new(state: State, untried_actions: Vec<Action>, selected_action: Option<Action>) -> Self {
        Self {
            state,
            untried_actions,
            selected_action,
            visits: 0,
            best_reward: f64::NEG_INFINITY,
            mean_reward: 0.0,
            m2: 0.0,
            fixed: false,
        }
    }

    /// Sample variance of `reward_samples` (`spec.md` §3); `0.0` until at
    /// least two samples have been backed up.
    pub fn variance_reward(&self) -> f64 {
        if self.visits < 2 {
            0.0
        } else {
            self.m2 / self.visits as f64
        }
    }

    /// Welford's online mean/variance update. Returns `true` if `reward`
    /// is a new best for this node.
    pub fn push_sample(&mut self, reward: f64) -> bool {
        self.visits += 1;
        let delta = reward - self.mean_reward;
        self.mean_reward += delta / self.visits as f64;
        let delta2 = reward - self.mean_reward;
        self.m2 += delta * delta2;

        if reward > self.best_reward {
            self.best_reward = reward;
            true
        } else {
            false
        }
    }

    /// Remove and return the untried action at `index`, as chosen by the
    /// expansion step.
    pub fn take_untried_action(&mut self, index: usize) -> Action {
        self.untried_actions.remove(index)
    }

    /// Remove the untried action matching `action_id`/`slot`, if present —
    /// used when a rematerialized child corresponds to an action this node
    /// had not yet expanded on its own.
    pub fn remove_untried_action(&mut self, action_id: u32, slot: usize) {
        if let Some(pos) =
            self.untried_actions.iter().position(|a| a.id == action_id && a.slot == slot)
        {
            self.untried_actions.remove(pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use lsys_core::symbol::{Symbol, SymbolName};
    use lsys_core::tree::DerivationTree;

    use super::*;

    fn leaf_state() -> State {
        State::new(DerivationTree::from_axiom(vec![Symbol::structural(SymbolName::Push, 0)]))
    }

    #[test]
    fn fresh_node_has_zero_visits_and_is_not_fixed() {
        let node = SearchNode::new(leaf_state(), Vec::new(), None);
        assert_eq!(node.visits, 0);
        assert!(!node.fixed);
        assert_eq!(node.variance_reward(), 0.0);
    }

    #[test]
    fn push_sample_tracks_best_and_mean() {
        let mut node = SearchNode::new(leaf_state(), Vec::new(), None);
        assert!(node.push_sample(0.5));
        assert!(node.push_sample(0.8));
        assert!(!node.push_sample(0.2));
        assert_eq!(node.visits, 3);
        assert_eq!(node.best_reward, 0.8);
        assert!((node.mean_reward - 0.5).abs() < 1e-9);
    }

    #[test]
    fn variance_matches_hand_computed_value_for_three_samples() {
        let mut node = SearchNode::new(leaf_state(), Vec::new(), None);
        for reward in [1.0, 2.0, 3.0] {
            node.push_sample(reward);
        }
        // Population variance of {1,2,3} is 2/3.
        assert!((node.variance_reward() - (2.0 / 3.0)).abs() < 1e-9);
    }

    #[test]
    fn take_untried_action_removes_it_from_the_set() {
        let mut node = SearchNode::new(
            leaf_state(),
            vec![lsys_core::action::Action::value(0, 0, 60.0)],
            None,
        );
        let action = node.take_untried_action(0);
        assert_eq!(action.id, 0);
        assert!(node.untried_actions.is_empty());
    }
}
