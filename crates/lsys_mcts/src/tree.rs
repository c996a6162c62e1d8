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

//! The search tree arena (`spec.md` §3, §9): a
//! `petgraph::stable_graph::StableGraph` of `SearchNode`s connected by
//! `SearchEdge`s carrying the action that produced each child. `StableGraph`
//! is used rather than `petgraph::Graph` specifically because
//! `remove_node` does not invalidate the indices of surviving nodes — root
//! advancement (`advance_root`) prunes whole subtrees in place without
//! needing to renumber anything that remains, matching `spec.md` §9's
//! integer-indexed-arena recommendation.

use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use lsys_core::action::Action;
use lsys_core::state::State;

use crate::node::SearchNode;

#[derive(Debug, Clone)]
pub struct SearchEdge {
    pub action: Action,
}

type Graph = StableGraph<SearchNode, SearchEdge>;

pub struct SearchTree {
    graph: Graph,
    root: NodeIndex,
}

impl SearchTree {
    pub fn new(root_state: State, root_untried_actions: Vec<Action>) -> Self {
        let mut graph = Graph::new();
        let root = graph.add_node(SearchNode::new(root_state, root_untried_actions, None));
        Self { graph, root }
    }

    pub fn root(&self) -> NodeIndex {
        self.root
    }

    pub fn node(&self, index: NodeIndex) -> &SearchNode {
        &self.graph[index]
    }

    pub fn node_mut(&mut self, index: NodeIndex) -> &mut SearchNode {
        &mut self.graph[index]
    }

    pub fn parent(&self, index: NodeIndex) -> Option<NodeIndex> {
        self.graph.neighbors_directed(index, Direction::Incoming).next()
    }

    pub fn children(&self, index: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors_directed(index, Direction::Outgoing)
    }

    pub fn child_count(&self, index: NodeIndex) -> usize {
        self.children(index).count()
    }

    /// The action recorded on the edge from `parent` to an existing child
    /// matching `action_id`/`slot`, if any — used by `crate::driver`'s
    /// rematerialization step to avoid creating a duplicate child for an
    /// action already instantiated along a different rollout.
    pub fn find_child_by_action(
        &self,
        parent: NodeIndex,
        action_id: u32,
        slot: usize,
    ) -> Option<NodeIndex> {
        self.graph
            .edges(parent)
            .find(|edge| edge.weight().action.id == action_id && edge.weight().action.slot == slot)
            .map(|edge| edge.target())
    }

    pub fn add_child(
        &mut self,
        parent: NodeIndex,
        action: Action,
        state: State,
        untried_actions: Vec<Action>,
    ) -> NodeIndex {
        let child = self.graph.add_node(SearchNode::new(state, untried_actions, Some(action.clone())));
        self.graph.add_edge(parent, child, SearchEdge { action });
        child
    }

    /// Promote `child` (which must currently be a child of the root) to be
    /// the new root, releasing every other subtree hanging off the old root
    /// (`spec.md` §3 Lifecycle, §5 Memory).
    pub fn advance_root(&mut self, child: NodeIndex) {
        debug_assert!(
            self.children(self.root).any(|c| c == child),
            "advance_root called with a node that is not a child of the current root"
        );

        let siblings: Vec<NodeIndex> = self.children(self.root).filter(|&n| n != child).collect();
        for sibling in siblings {
            self.prune_subtree(sibling);
        }
        self.graph.remove_node(self.root);

        self.root = child;
        self.graph[self.root].selected_action = None;
    }

    fn prune_subtree(&mut self, node: NodeIndex) {
        let children: Vec<NodeIndex> = self.children(node).collect();
        for child in children {
            self.prune_subtree(child);
        }
        self.graph.remove_node(node);
    }

    #[cfg(test)]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }
}

#[cfg(test)]
mod tests {
    use lsys_core::symbol::{Symbol, SymbolName};
    use lsys_core::tree::DerivationTree;

    use super::*;

    fn state() -> State {
        State::new(DerivationTree::from_axiom(vec![Symbol::pending(SymbolName::X, 0)]))
    }

    #[test]
    fn new_tree_has_a_single_root_node() {
        let tree = SearchTree::new(state(), Vec::new());
        assert_eq!(tree.node_count(), 1);
        assert!(tree.parent(tree.root()).is_none());
    }

    #[test]
    fn add_child_links_parent_and_child() {
        let mut tree = SearchTree::new(state(), Vec::new());
        let root = tree.root();
        let action = Action::value(0, 0, 60.0);
        let child = tree.add_child(root, action.clone(), state(), Vec::new());

        assert_eq!(tree.parent(child), Some(root));
        assert_eq!(tree.children(root).collect::<Vec<_>>(), vec![child]);
        assert_eq!(tree.find_child_by_action(root, 0, 0), Some(child));
    }

    #[test]
    fn advance_root_prunes_sibling_subtrees() {
        let mut tree = SearchTree::new(state(), Vec::new());
        let root = tree.root();
        let keep = tree.add_child(root, Action::value(0, 0, 1.0), state(), Vec::new());
        let drop_a = tree.add_child(root, Action::value(1, 0, 2.0), state(), Vec::new());
        let _grandchild = tree.add_child(drop_a, Action::value(0, 0, 3.0), state(), Vec::new());

        assert_eq!(tree.node_count(), 4);
        tree.advance_root(keep);

        assert_eq!(tree.root(), keep);
        assert_eq!(tree.node_count(), 1);
        assert!(tree.parent(tree.root()).is_none());
    }
}
