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

//! UCT child selection (`spec.md` §4.3):
//!
//! ```text
//! UCT(c) = best_reward(c) + C * sqrt(2 * ln(visits(p)) / visits(c)) + D * sqrt(variance_reward(c))
//! ```
//!
//! grounded in `examples/thurn-oldsdawn/crates/ai/src/agents/monte_carlo.rs`'s
//! `best_child`, generalized with the optional variance-exploration term and
//! the unvisited-child pseudo-infinite score `spec.md` calls for.

use petgraph::stable_graph::NodeIndex;
use rand::Rng;

use lsys_core::config::SolverConfig;

use crate::tree::SearchTree;

/// Guarantees an unvisited child is selected at least once: any visited
/// child's score is bounded by `best_reward <= 1.0` plus modest exploration
/// terms, so this floor dominates.
const UNVISITED_BASE_SCORE: f64 = 10_000.0;
const UNVISITED_JITTER: f64 = 1_000.0;

/// Select the highest-UCT-scoring non-`fixed` child of `parent`. Returns
/// `None` if `parent` has no eligible children (childless, or every child
/// is `fixed`).
pub fn select_child(
    tree: &SearchTree,
    config: &SolverConfig,
    parent: NodeIndex,
    rng: &mut impl Rng,
) -> Option<NodeIndex> {
    let parent_visits = tree.node(parent).visits.max(1) as f64;
    let mut best: Option<(NodeIndex, f64)> = None;

    for child in tree.children(parent) {
        let node = tree.node(child);
        if node.fixed {
            continue;
        }

        let score = if node.visits == 0 {
            UNVISITED_BASE_SCORE + rng.gen::<f64>() * UNVISITED_JITTER
        } else {
            let child_visits = node.visits as f64;
            let exploitation = node.best_reward;
            let exploration = config.exploration_constant * (2.0 * parent_visits.ln() / child_visits).sqrt();
            let variance_term = config.exploration_variance_weight * node.variance_reward().sqrt();
            exploitation + exploration + variance_term
        };

        // Strict `>` preserves first-scanned order on ties (`spec.md`
        // §4.3).
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((child, score));
        }
    }

    best.map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use lsys_core::action::Action;
    use lsys_core::symbol::{Symbol, SymbolName};
    use lsys_core::tree::DerivationTree;

    use super::*;
    use crate::tree::SearchTree;

    fn state() -> lsys_core::state::State {
        lsys_core::state::State::new(DerivationTree::from_axiom(vec![Symbol::pending(
            SymbolName::X,
            0,
        )]))
    }

    #[test]
    fn unvisited_child_is_always_selected_over_a_visited_one() {
        let mut tree = SearchTree::new(state(), Vec::new());
        let root = tree.root();
        let visited = tree.add_child(root, Action::value(0, 0, 1.0), state(), Vec::new());
        let unvisited = tree.add_child(root, Action::value(1, 0, 2.0), state(), Vec::new());
        tree.node_mut(visited).push_sample(0.99);
        tree.node_mut(root).push_sample(0.99);

        let config = SolverConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let selected = select_child(&tree, &config, root, &mut rng).expect("a child");
        assert_eq!(selected, unvisited);
    }

    #[test]
    fn fixed_children_are_never_selected() {
        let mut tree = SearchTree::new(state(), Vec::new());
        let root = tree.root();
        let fixed_child = tree.add_child(root, Action::value(0, 0, 1.0), state(), Vec::new());
        tree.node_mut(fixed_child).push_sample(1.0);
        tree.node_mut(fixed_child).fixed = true;
        tree.node_mut(root).push_sample(1.0);

        let config = SolverConfig::default();
        let mut rng = StdRng::seed_from_u64(2);
        assert!(select_child(&tree, &config, root, &mut rng).is_none());
    }

    #[test]
    fn higher_best_reward_wins_among_visited_children() {
        let mut tree = SearchTree::new(state(), Vec::new());
        let root = tree.root();
        let weak = tree.add_child(root, Action::value(0, 0, 1.0), state(), Vec::new());
        let strong = tree.add_child(root, Action::value(1, 0, 2.0), state(), Vec::new());
        tree.node_mut(weak).push_sample(0.1);
        tree.node_mut(strong).push_sample(0.9);
        tree.node_mut(root).push_sample(0.5);
        tree.node_mut(root).push_sample(0.5);

        let config = SolverConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        let selected = select_child(&tree, &config, root, &mut rng).expect("a child");
        assert_eq!(selected, strong);
    }
}
