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

//! A derivation tree, stored as its preorder (yield) sequence.
//!
//! `spec.md` §3 describes the derivation as a rooted tree of [`Symbol`]s
//! whose preorder leaves are "the string view used for rendering and
//! enumeration." Storing the preorder sequence directly — rather than an
//! explicit parent/child tree — is the same data under a flatter
//! representation (see `SPEC_FULL.md` §3): it is trivially `Clone`, O(n) to
//! copy, and needs no `Rc`/`RefCell` back-references.

use serde::{Deserialize, Serialize};

use crate::symbol::Symbol;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivationTree {
    symbols: Vec<Symbol>,
}

impl DerivationTree {
    pub fn from_axiom(axiom: Vec<Symbol>) -> Self {
        Self { symbols: axiom }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn as_slice(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn get(&self, index: usize) -> Option<&Symbol> {
        self.symbols.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Symbol> {
        self.symbols.get_mut(index)
    }

    /// Replace the single symbol at `index` with `replacement`, in place.
    /// Returns the number of symbols inserted (for pending-queue index
    /// fixups in [`crate::state::State`]).
    pub fn replace(&mut self, index: usize, replacement: Vec<Symbol>) -> usize {
        let inserted = replacement.len();
        self.symbols.splice(index..=index, replacement);
        inserted
    }

    /// All symbols that are not yet `terminal`, in preorder — used to
    /// rebuild the pending queue after a clone (`spec.md` §4.6).
    pub fn pending_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.symbols.iter().enumerate().filter(|(_, s)| !s.terminal).map(|(i, _)| i)
    }

    /// A human-readable rendering of the derivation string, e.g.
    /// `F[+F]-F`, for logging and test assertions.
    pub fn render_string(&self) -> String {
        let mut out = String::new();
        for symbol in &self.symbols {
            out.push_str(symbol_glyph(symbol));
            if symbol.parameters_defined {
                out.push('(');
                for (i, p) in symbol.parameters.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    out.push_str(&format!("{:.2}", p));
                }
                out.push(')');
            }
        }
        out
    }
}

fn symbol_glyph(symbol: &Symbol) -> &'static str {
    use crate::symbol::SymbolName::*;
    match symbol.name {
        X => "X",
        F => "F",
        Push => "[",
        Pop => "]",
        Plus => "+",
        Minus => "-",
        Slash => "/",
        Backslash => "\\",
        Hash => "#",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::SymbolName;

    #[test]
    fn render_string_matches_yield_order() {
        let tree = DerivationTree::from_axiom(vec![
            Symbol::with_parameters(SymbolName::F, 0, vec![1.0, 0.2]),
            Symbol::structural(SymbolName::Push, 0),
            Symbol::pending(SymbolName::X, 1),
            Symbol::structural(SymbolName::Pop, 0),
        ]);
        assert_eq!(tree.render_string(), "F(1.00,0.20)[X]");
    }

    #[test]
    fn replace_reports_inserted_count() {
        let mut tree = DerivationTree::from_axiom(vec![Symbol::pending(SymbolName::X, 0)]);
        let inserted = tree.replace(
            0,
            vec![
                Symbol::with_parameters(SymbolName::F, 1, vec![1.0, 0.1]),
                Symbol::pending(SymbolName::X, 1),
            ],
        );
        assert_eq!(inserted, 2);
        assert_eq!(tree.len(), 2);
    }
}
