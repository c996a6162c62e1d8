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

//! A minimal single-channel raster grid, used for both indicator images
//! and distance-transform output (`spec.md` §6). No external `image` crate
//! dependency is introduced — see `SPEC_FULL.md` §6 for why this is a
//! genuinely new leaf concern with no teacher precedent.

#[derive(Debug, Clone, PartialEq)]
pub struct Image2D {
    pub width: usize,
    pub height: usize,
    data: Vec<f32>,
}

impl Image2D {
    pub fn zeros(width: usize, height: usize) -> Self {
        Self { width, height, data: vec![0.0; width * height] }
    }

    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row * self.width + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self.data[row * self.width + col] = value;
    }

    /// Clamp-and-set: ignores writes outside the grid rather than panicking,
    /// since line-drawing math can easily step a pixel coordinate off the
    /// edge of the grid by a fraction of a pixel.
    pub fn set_clamped(&mut self, row: i64, col: i64, value: f32) {
        if row < 0 || col < 0 {
            return;
        }
        let (row, col) = (row as usize, col as usize);
        if row < self.height && col < self.width {
            self.set(row, col, value);
        }
    }

    pub fn pixels(&self) -> impl Iterator<Item = ((usize, usize), f32)> + '_ {
        (0..self.height)
            .flat_map(move |r| (0..self.width).map(move |c| (r, c)))
            .map(move |(r, c)| ((r, c), self.get(r, c)))
    }

    /// Count of pixels whose value is `> 0.5` — the "on" pixel count used by
    /// the pixel-pair reward form's normalization (`spec.md` §4.5).
    pub fn on_pixel_count(&self) -> usize {
        self.data.iter().filter(|&&v| v > 0.5).count()
    }
}

/// Diagnostic RGB raster (`spec.md` §6's `render_rgb`), not consumed by the
/// reward path.
#[derive(Debug, Clone, PartialEq)]
pub struct Image2DRgb {
    pub width: usize,
    pub height: usize,
    data: Vec<[u8; 3]>,
}

impl Image2DRgb {
    pub fn from_indicator(indicator: &Image2D) -> Self {
        let data = indicator
            .data
            .iter()
            .map(|&v| if v > 0.5 { [255, 255, 255] } else { [0, 0, 0] })
            .collect();
        Self { width: indicator.width, height: indicator.height, data }
    }

    pub fn get(&self, row: usize, col: usize) -> [u8; 3] {
        self.data[row * self.width + col]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeros_are_all_off() {
        let image = Image2D::zeros(4, 4);
        assert_eq!(image.on_pixel_count(), 0);
    }

    #[test]
    fn set_clamped_ignores_out_of_bounds_writes() {
        let mut image = Image2D::zeros(2, 2);
        image.set_clamped(-1, 0, 1.0);
        image.set_clamped(0, 5, 1.0);
        assert_eq!(image.on_pixel_count(), 0);
    }

    #[test]
    fn set_clamped_applies_in_bounds_writes() {
        let mut image = Image2D::zeros(2, 2);
        image.set_clamped(1, 1, 1.0);
        assert_eq!(image.get(1, 1), 1.0);
        assert_eq!(image.on_pixel_count(), 1);
    }

    #[test]
    fn rgb_from_indicator_maps_on_pixels_to_white() {
        let mut indicator = Image2D::zeros(2, 2);
        indicator.set(0, 0, 1.0);
        let rgb = Image2DRgb::from_indicator(&indicator);
        assert_eq!(rgb.get(0, 0), [255, 255, 255]);
        assert_eq!(rgb.get(1, 1), [0, 0, 0]);
    }
}
