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

//! The Target Loader of `spec.md` §6: supplies the fixed indicator image
//! the search is scored against. The original C++ reads a PPM file off
//! disk (`ParametricLSystem::computeIndicator(char* filename, ...)`); this
//! crate keeps loading a pluggable concern (`TargetLoader`) but drops the
//! file-format parsing itself, since `spec.md` Non-goals exclude file I/O
//! formats, and supplies the one loader this system actually needs: a
//! derivation rendered through a [`crate::rasterizer::Rasterizer`], for use
//! both as test fixtures and for a `--target-derivation` CLI mode.

use lsys_core::error::SearchError;
use lsys_core::tree::DerivationTree;

use crate::image::Image2D;
use crate::rasterizer::Rasterizer;

/// Supplies the fixed target indicator a solve run is scored against.
pub trait TargetLoader {
    fn load(&self, grid_size: u32, scale: f32) -> Result<Image2D, SearchError>;
}

/// Renders a known derivation tree as the target, used for self-consistency
/// tests and for "search for a known answer" CLI invocations.
pub struct DerivationTarget<R: Rasterizer> {
    tree: DerivationTree,
    rasterizer: R,
}

impl<R: Rasterizer> DerivationTarget<R> {
    pub fn new(tree: DerivationTree, rasterizer: R) -> Self {
        Self { tree, rasterizer }
    }
}

impl<R: Rasterizer> TargetLoader for DerivationTarget<R> {
    fn load(&self, grid_size: u32, scale: f32) -> Result<Image2D, SearchError> {
        self.rasterizer.render_indicator(&self.tree, grid_size, scale)
    }
}

/// A target supplied directly as pixel data, e.g. loaded by a caller from
/// whatever image format they already have on hand.
pub struct FixedTarget {
    image: Image2D,
}

impl FixedTarget {
    pub fn new(image: Image2D) -> Self {
        Self { image }
    }
}

impl TargetLoader for FixedTarget {
    fn load(&self, grid_size: u32, _scale: f32) -> Result<Image2D, SearchError> {
        if self.image.width != grid_size as usize || self.image.height != grid_size as usize {
            return Err(SearchError::RasterFailure(format!(
                "fixed target is {}x{} but solver requested a {grid_size}x{grid_size} grid",
                self.image.width, self.image.height
            )));
        }
        Ok(self.image.clone())
    }
}
