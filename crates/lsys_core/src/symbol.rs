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

//! The alphabet of a parametric L-system and the per-symbol metadata a
//! derivation tracks as it is rewritten.

use serde::{Deserialize, Serialize};

/// One element of the grammar's alphabet.
///
/// `X` is the sole nonterminal this crate's built-in grammars use;
/// everything else is either structural (`Push`/`Pop` for the model-matrix
/// stack) or a drawable/angle terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolName {
    /// Nonterminal awaiting a rule action.
    X,
    /// Drawable segment; carries `[length, radius]` parameters.
    F,
    /// `[` — push the current model matrix.
    Push,
    /// `]` — pop the model matrix.
    Pop,
    /// `+` — rotate by a positive angle parameter.
    Plus,
    /// `-` — rotate by a negative angle parameter.
    Minus,
    /// `/` — roll rotation, one sign.
    Slash,
    /// `\` — roll rotation, the other sign.
    Backslash,
    /// `#` — small arbitrary rotation.
    Hash,
}

impl SymbolName {
    /// Structural symbols never carry numeric parameters and are terminal
    /// the moment they are created.
    pub fn is_structural(self) -> bool {
        matches!(self, Self::Push | Self::Pop)
    }

    /// Symbols whose single numeric parameter is an angle in degrees.
    pub fn is_angle(self) -> bool {
        matches!(self, Self::Plus | Self::Minus | Self::Slash | Self::Backslash | Self::Hash)
    }

    pub fn is_nonterminal(self) -> bool {
        matches!(self, Self::X)
    }

    pub fn is_drawable(self) -> bool {
        matches!(self, Self::F)
    }
}

/// One symbol in a derivation, with the metadata `spec.md` §3 requires:
/// the depth it was introduced at, its numeric parameters, and the two
/// terminal-ness flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    pub name: SymbolName,
    pub depth: u32,
    /// 0–5 real-valued parameters (length, radius, angle, ...), grammar
    /// specific. Empty until `parameters_defined` flips `true`.
    pub parameters: Vec<f64>,
    /// Once a numeric-slot symbol receives its value, this flips `true` and
    /// the symbol is no longer a candidate for a value action.
    pub parameters_defined: bool,
    /// Once a nonterminal has been rewritten, or a numeric slot has been
    /// filled, this is `true`.
    pub terminal: bool,
}

impl Symbol {
    /// A nonterminal or angle/drawable symbol that still needs action
    /// applied to it (not yet terminal).
    pub fn pending(name: SymbolName, depth: u32) -> Self {
        let terminal = name.is_structural();
        Self { name, depth, parameters: Vec::new(), parameters_defined: false, terminal }
    }

    /// A symbol created already carrying its final parameters (used when a
    /// production right-hand side bakes in values via arithmetic
    /// propagation, e.g. `F` segments produced by the parametric grammar).
    pub fn with_parameters(name: SymbolName, depth: u32, parameters: Vec<f64>) -> Self {
        Self { name, depth, parameters, parameters_defined: true, terminal: name.is_drawable() }
    }

    /// A purely structural symbol (`[` or `]`), terminal immediately.
    pub fn structural(name: SymbolName, depth: u32) -> Self {
        debug_assert!(name.is_structural());
        Self { name, depth, parameters: Vec::new(), parameters_defined: false, terminal: true }
    }

    /// Is this symbol eligible to receive a value action (an angle symbol
    /// with no parameters defined yet)?
    pub fn awaits_value(&self) -> bool {
        self.name.is_angle() && !self.parameters_defined
    }

    /// Is this symbol eligible to receive a rule action (the nonterminal)?
    pub fn awaits_rule(&self) -> bool {
        self.name.is_nonterminal() && !self.terminal
    }
}
