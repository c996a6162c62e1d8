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

//! A snapshot of an in-progress derivation: the tree plus the FIFO queue of
//! pending nonterminals (`spec.md` §3).

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::action::{Action, ActionKind};
use crate::tree::DerivationTree;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    tree: DerivationTree,
    /// FIFO of indices into `tree` whose symbol is not yet `terminal`. The
    /// head is the next symbol to act upon.
    pending: VecDeque<usize>,
}

impl State {
    pub fn new(tree: DerivationTree) -> Self {
        let pending = tree.pending_indices().collect();
        Self { tree, pending }
    }

    pub fn tree(&self) -> &DerivationTree {
        &self.tree
    }

    /// The symbol the next action must target, if any remain.
    pub fn head(&self) -> Option<usize> {
        self.pending.front().copied()
    }

    pub fn is_complete(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Deep-copies the tree and rebuilds the pending queue from scratch by
    /// a preorder scan — `spec.md` §4.6's clone contract, reproduced here
    /// exactly rather than just deriving `Clone`, so that the rebuild rule
    /// is the single source of truth for what "pending" means.
    pub fn make_copy(&self) -> Self {
        Self::new(self.tree.clone())
    }

    /// Applies `action` to the head of the pending queue. `action.slot`
    /// must equal `self.head()` — the enumerator only ever produces actions
    /// for the current head, so this is an invariant violation, not a
    /// recoverable error, if it does not hold.
    pub fn apply_action(&mut self, action: &Action) {
        let head = self.pending.pop_front().expect("apply_action called with no pending symbol");
        debug_assert_eq!(head, action.slot, "action slot must match pending queue head");

        match &action.kind {
            ActionKind::Rule(production) => {
                let inserted = self.tree.replace(action.slot, production.clone());
                let shift = inserted as isize - 1;
                if shift != 0 {
                    for idx in self.pending.iter_mut() {
                        if *idx > action.slot {
                            *idx = (*idx as isize + shift) as usize;
                        }
                    }
                }
                for (offset, symbol) in production.iter().enumerate() {
                    if !symbol.terminal {
                        self.pending.push_back(action.slot + offset);
                    }
                }
            }
            ActionKind::Value(value) => {
                let symbol =
                    self.tree.get_mut(action.slot).expect("action slot out of bounds");
                symbol.parameters.push(*value);
                symbol.parameters_defined = true;
                symbol.terminal = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::{Symbol, SymbolName};

    fn axiom_x() -> State {
        State::new(DerivationTree::from_axiom(vec![Symbol::pending(SymbolName::X, 0)]))
    }

    #[test]
    fn fresh_state_has_single_pending_symbol() {
        let state = axiom_x();
        assert_eq!(state.head(), Some(0));
        assert_eq!(state.pending_len(), 1);
        assert!(!state.is_complete());
    }

    #[test]
    fn rule_action_expands_and_rebuilds_queue_order() {
        let mut state = axiom_x();
        let production = vec![
            Symbol::with_parameters(SymbolName::F, 1, vec![1.0, 0.1]),
            Symbol::structural(SymbolName::Push, 1),
            Symbol::pending(SymbolName::X, 1),
            Symbol::structural(SymbolName::Pop, 1),
            Symbol::pending(SymbolName::X, 1),
        ];
        state.apply_action(&Action::rule(0, 0, production));

        assert_eq!(state.tree().len(), 5);
        assert_eq!(state.pending_len(), 2);
        assert_eq!(state.head(), Some(2));
    }

    #[test]
    fn value_action_marks_symbol_terminal() {
        let mut state =
            State::new(DerivationTree::from_axiom(vec![Symbol::pending(SymbolName::Plus, 0)]));
        state.apply_action(&Action::value(0, 0, 60.0));
        assert!(state.is_complete());
        assert_eq!(state.tree().get(0).unwrap().parameters, vec![60.0]);
    }

    #[test]
    fn clone_rebuild_matches_direct_derivation() {
        let mut state = axiom_x();
        let production = vec![
            Symbol::with_parameters(SymbolName::F, 1, vec![1.0, 0.1]),
            Symbol::pending(SymbolName::X, 1),
        ];
        state.apply_action(&Action::rule(0, 0, production.clone()));

        let mut cloned = state.make_copy();
        let second_production = vec![Symbol::with_parameters(SymbolName::F, 2, vec![0.7, 0.05])];
        let action = Action::rule(1, cloned.head().unwrap(), second_production.clone());
        cloned.apply_action(&action);

        let mut direct = axiom_x();
        direct.apply_action(&Action::rule(0, 0, production));
        direct.apply_action(&Action::rule(1, direct.head().unwrap(), second_production));

        assert_eq!(cloned.tree(), direct.tree());
        assert_eq!(cloned.pending_len(), direct.pending_len());
    }
}
