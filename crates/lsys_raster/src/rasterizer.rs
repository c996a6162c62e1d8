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

//! The `Rasterizer` interface of `spec.md` §6, plus `LineRasterizer`, its
//! reference implementation grounded in
//! `examples/original_source/MCTS_Parametric/ParametricLSystem.cpp`'s
//! `computeIndicator`: a model-matrix stack walked over the derivation's
//! preorder symbols, drawing `F` segments as line strokes.

use lsys_core::error::SearchError;
use lsys_core::symbol::SymbolName;
use lsys_core::tree::DerivationTree;

use crate::image::{Image2D, Image2DRgb};

pub trait Rasterizer {
    /// Rasterize `tree` into a square single-channel image of size
    /// `grid_size * scale`, centered horizontally (`spec.md` §6).
    fn render_indicator(
        &self,
        tree: &DerivationTree,
        grid_size: u32,
        scale: f32,
    ) -> Result<Image2D, SearchError>;

    /// Diagnostic RGB rendering; not on the reward path. Default
    /// implementation maps the indicator straight to black/white.
    fn render_rgb(
        &self,
        tree: &DerivationTree,
        grid_size: u32,
        scale: f32,
    ) -> Result<Image2DRgb, SearchError> {
        let indicator = self.render_indicator(tree, grid_size, scale)?;
        Ok(Image2DRgb::from_indicator(&indicator))
    }
}

/// Turtle state pushed/popped by `[`/`]`: a 2D position plus a unit heading
/// direction. The heading convention mirrors `computeIndicator`'s use of
/// `glm::rotate` around the model's Y axis for `+`/`-`/`#`: those three
/// symbols turn the heading within the drawing plane; `/`/`\` rotate around
/// the model's Z axis in the original (an out-of-plane twist) and are
/// consumed without affecting this 2D reference rasterization, matching
/// `SPEC_FULL.md` §6's scope for the headless reference renderer.
#[derive(Debug, Clone, Copy)]
struct Turtle {
    x: f64,
    z: f64,
    dir_x: f64,
    dir_z: f64,
}

impl Turtle {
    fn origin() -> Self {
        Self { x: 0.0, z: 0.0, dir_x: 0.0, dir_z: 1.0 }
    }

    fn turn(&mut self, degrees: f64) {
        let rad = degrees.to_radians();
        let (sin, cos) = rad.sin_cos();
        let new_dir_x = self.dir_x * cos + self.dir_z * sin;
        let new_dir_z = -self.dir_x * sin + self.dir_z * cos;
        self.dir_x = new_dir_x;
        self.dir_z = new_dir_z;
    }

    fn advance(&mut self, length: f64) -> (f64, f64) {
        let (from_x, from_z) = (self.x, self.z);
        self.x += self.dir_x * length;
        self.z += self.dir_z * length;
        (from_x, from_z)
    }
}

/// The reference `Rasterizer`: draws `F` segments at `length * scale` with
/// `max(1, radius * scale)` pixel width, centered horizontally.
#[derive(Debug, Default, Clone, Copy)]
pub struct LineRasterizer;

impl Rasterizer for LineRasterizer {
    fn render_indicator(
        &self,
        tree: &DerivationTree,
        grid_size: u32,
        scale: f32,
    ) -> Result<Image2D, SearchError> {
        let size = ((grid_size as f32) * scale).round().max(1.0) as usize;
        let mut image = Image2D::zeros(size, size);
        let mut turtle = Turtle::origin();
        let mut stack: Vec<Turtle> = Vec::new();

        for symbol in tree.as_slice() {
            match symbol.name {
                SymbolName::Push => stack.push(turtle),
                SymbolName::Pop => {
                    if let Some(saved) = stack.pop() {
                        turtle = saved;
                    }
                }
                SymbolName::Plus | SymbolName::Minus | SymbolName::Hash => {
                    if symbol.parameters_defined {
                        turtle.turn(symbol.parameters[0]);
                    }
                }
                SymbolName::Slash | SymbolName::Backslash => {}
                SymbolName::F => {
                    if symbol.parameters_defined {
                        let length = symbol.parameters[0] as f64 * scale as f64;
                        let radius = symbol.parameters.get(1).copied().unwrap_or(0.0) as f64
                            * scale as f64;
                        let (from_x, from_z) = turtle.advance(length);
                        let (to_x, to_z) = (turtle.x, turtle.z);
                        let half = size as f64 / 2.0;
                        draw_segment(
                            &mut image,
                            from_x + half,
                            from_z,
                            to_x + half,
                            to_z,
                            radius.max(1.0),
                        );
                    }
                }
                SymbolName::X => {}
            }
        }

        Ok(image)
    }
}

/// Bresenham-style segment stepping with a stamped disc of `radius` pixels
/// at every step, giving a minimum stroke width of 1 pixel per `spec.md`
/// §6.
fn draw_segment(image: &mut Image2D, x0: f64, y0: f64, x1: f64, y1: f64, radius: f64) {
    let dx = x1 - x0;
    let dy = y1 - y0;
    let steps = dx.abs().max(dy.abs()).max(1.0).ceil() as i64;
    let r = radius.round().max(1.0) as i64;

    for step in 0..=steps {
        let t = step as f64 / steps as f64;
        let x = x0 + dx * t;
        let y = y0 + dy * t;
        stamp_disc(image, x, y, r);
    }
}

fn stamp_disc(image: &mut Image2D, x: f64, y: f64, radius: i64) {
    let cx = x.round() as i64;
    let cy = y.round() as i64;
    for row in (cy - radius)..=(cy + radius) {
        for col in (cx - radius)..=(cx + radius) {
            let dr = (row - cy) as f64;
            let dc = (col - cx) as f64;
            if dr * dr + dc * dc <= (radius * radius) as f64 {
                image.set_clamped(row, col, 1.0);
            }
        }
    }
}
