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
#![allow(clippy::module_inception)]

//! Core types shared by every crate in this workspace: the grammar alphabet
//! (`symbol`), the derivation data model (`tree`, `state`, `action`), the
//! error taxonomy (`error`), and the configuration surface (`config`).

pub mod action;
pub mod config;
pub mod error;
pub mod state;
pub mod symbol;
pub mod tree;
