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

//! Grammar definitions (`grammar`, `presets`), the action enumerator
//! (`enumerate`), and uniform-random derivation (`derive`) — the
//! "Grammar & State Model" and "Action Enumerator" components of
//! `spec.md` §2.

pub mod derive;
pub mod enumerate;
pub mod grammar;
pub mod presets;
