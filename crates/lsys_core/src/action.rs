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

//! The two action families a derivation step can take: rewrite a
//! nonterminal with a production, or assign a value to a parameter slot.

use crate::symbol::Symbol;

/// One legal next move from a given [`crate::state::State`].
///
/// `id` is the stable identifier `spec.md` §4.2 calls for — it is stable
/// across calls to the enumerator for structurally-equal states, and is
/// what rollout history records for best-reward rematerialization
/// (`spec.md` §4.3).
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    /// Stable index into the enumerator's output for this state; used to
    /// deduplicate an already-instantiated child during rematerialization.
    pub id: u32,
    /// Index of the symbol in the derivation this action applies to.
    pub slot: usize,
    pub kind: ActionKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActionKind {
    /// Replace the symbol at `slot` with this right-hand side.
    Rule(Vec<Symbol>),
    /// Assign this numeric value to the symbol at `slot`.
    Value(f64),
}

impl Action {
    pub fn rule(id: u32, slot: usize, production: Vec<Symbol>) -> Self {
        Self { id, slot, kind: ActionKind::Rule(production) }
    }

    pub fn value(id: u32, slot: usize, value: f64) -> Self {
        Self { id, slot, kind: ActionKind::Value(value) }
    }
}
