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

#![deny(clippy::unwrap_used)]

//! The top-level inverse-derivation loop of `spec.md` §4.4: repeatedly
//! spends an MCTS budget from the current root, advances to the best
//! child, and stops when the derivation completes or the step budget is
//! exhausted.

pub mod solve;

pub use solve::{solve, NullObserver, RootChildSummary, SolveAborted, SolveObserver, SolveOutcome};
