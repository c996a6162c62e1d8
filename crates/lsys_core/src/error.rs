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

//! The error taxonomy of `spec.md` §7.

use thiserror::Error;

pub type SearchResult<T> = Result<T, SearchError>;

#[derive(Error, Debug)]
pub enum SearchError {
    /// The grammar contains a nonterminal with no productions, or a
    /// production references an undefined symbol.
    #[error("invalid grammar: {0}")]
    InvalidGrammar(String),

    /// The enumerator offered no actions at all for the head of the pending
    /// queue. Fatal for the current MCTS cycle, which terminates early and
    /// returns the current root-best wrapped in `SolveAborted`; never
    /// surfaces out of a rollout (rollouts treat this as "stop early").
    #[error("no actions available for the current derivation state")]
    EmptyActionSet,

    /// The rasterizer returned a wrong-sized or ill-typed image.
    #[error("rasterizer failure: {0}")]
    RasterFailure(String),

    /// A wall-clock search budget elapsed. Only produced by drivers that
    /// opt into a time limit; the core MCTS/UCT contract has no notion of
    /// time.
    #[error("search budget exceeded")]
    BudgetExceeded,
}
