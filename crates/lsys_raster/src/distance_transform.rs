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

//! Euclidean distance transform, used by the `DistanceMapExp` reward form
//! (`spec.md` §4.5). Grounded in `examples/original_source/MCTS/MCTS.cpp`'s
//! `MCTS` constructor (`cv::distanceTransform(grayImage, targetDistMap,
//! CV_DIST_L2, 3)`, lines ~213-224) and `MCTS::evaluate` (same call on the
//! rendered candidate, lines ~409-416): OpenCV's `distanceTransform` treats
//! every zero-valued pixel of its *input* as a source and reports, at every
//! pixel, the distance to the nearest such source — `spec.md` §4.5's
//! "treating 0-valued pixels as sources" is this behavior, not a distance
//! to the nearest drawn ("on") pixel. This implementation keeps the
//! original's brute-force shape (rather than a two-pass algorithm) since
//! target grids in this system are small (`spec.md` §6 Non-goals rule out
//! large-raster performance concerns).

use crate::image::Image2D;

/// For every pixel in `indicator`, the Euclidean distance (in pixels) to the
/// nearest zero-valued (`<= 0.5`) "source" pixel, per `spec.md` §4.5. A
/// fully-"on" image has no source pixels at all and is assigned
/// `f32::INFINITY` everywhere; callers normalize before use (`spec.md`
/// §4.5).
pub fn brute_force_distance_transform(indicator: &Image2D) -> Image2D {
    let zero_pixels: Vec<(usize, usize)> = indicator
        .pixels()
        .filter(|(_, v)| *v <= 0.5)
        .map(|(coords, _)| coords)
        .collect();

    let mut out = Image2D::zeros(indicator.width, indicator.height);
    if zero_pixels.is_empty() {
        for row in 0..indicator.height {
            for col in 0..indicator.width {
                out.set(row, col, f32::INFINITY);
            }
        }
        return out;
    }

    for row in 0..indicator.height {
        for col in 0..indicator.width {
            let mut nearest = f32::INFINITY;
            for &(zr, zc) in &zero_pixels {
                let dr = row as f32 - zr as f32;
                let dc = col as f32 - zc as f32;
                let dist = (dr * dr + dc * dc).sqrt();
                if dist < nearest {
                    nearest = dist;
                }
            }
            out.set(row, col, nearest);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_on(width: usize, height: usize) -> Image2D {
        let mut image = Image2D::zeros(width, height);
        for row in 0..height {
            for col in 0..width {
                image.set(row, col, 1.0);
            }
        }
        image
    }

    #[test]
    fn zero_pixel_has_zero_distance_to_itself() {
        let mut indicator = Image2D::zeros(4, 4);
        indicator.set(2, 2, 1.0);
        let dt = brute_force_distance_transform(&indicator);
        assert_eq!(dt.get(0, 0), 0.0);
    }

    #[test]
    fn on_pixel_surrounded_by_background_has_distance_one() {
        let mut indicator = Image2D::zeros(4, 4);
        indicator.set(2, 2, 1.0);
        let dt = brute_force_distance_transform(&indicator);
        assert_eq!(dt.get(2, 2), 1.0);
    }

    #[test]
    fn fully_on_image_yields_all_infinite_distances() {
        let indicator = all_on(3, 3);
        let dt = brute_force_distance_transform(&indicator);
        assert!(dt.get(0, 0).is_infinite());
        assert!(dt.get(2, 2).is_infinite());
    }

    #[test]
    fn diagonal_distance_matches_euclidean_expectation() {
        let mut indicator = all_on(5, 5);
        indicator.set(0, 0, 0.0);
        let dt = brute_force_distance_transform(&indicator);
        let expected = (2.0_f32 * 2.0 + 2.0 * 2.0).sqrt();
        assert!((dt.get(2, 2) - expected).abs() < 1e-5);
    }
}
