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

//! The "Consumed" external interfaces of `spec.md` §6 (Rasterizer,
//! Distance Transform, Target Loader) plus the Reward Evaluator of
//! `spec.md` §4.5, which is the only one of the five components
//! (`SPEC_FULL.md` §2) with no teacher precedent to imitate — there is no
//! raster buffer concern anywhere in the teacher workspace, whose display
//! crates work entirely with protobuf-serialized UI descriptions. This
//! crate is therefore a from-scratch, deliberately minimal reference
//! implementation, not a vendored renderer.

pub mod distance_transform;
pub mod image;
pub mod rasterizer;
pub mod reward;
pub mod target;
