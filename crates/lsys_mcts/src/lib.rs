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

//! The Search Tree and UCT Engine of `spec.md` §2: a tree of `SearchNode`s
//! over a `petgraph::stable_graph::StableGraph` arena (`node`, `tree`),
//! UCT child selection (`uct`), and the four-phase MCTS loop plus the
//! best-reward rematerialization policy (`driver`).

pub mod driver;
pub mod node;
pub mod tree;
pub mod uct;
