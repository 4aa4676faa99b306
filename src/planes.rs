// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the PlaneMapper struct, which relates the integral plane
//! of an image, with its origin at the upper-left pixel, to the
//! complex plane, centered on the middle pixel of the image.

use config::RenderConfig;
use num::Complex;

/// Describes the x, y of a pixel in an image.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub u32, pub u32);

/// Maps pixels onto the complex plane.  The pixel at `(width / 2,
/// height / 2)`, with the halves truncated, lands on the origin;
/// every other pixel sits a whole number of steps away from it.
#[derive(Copy, Clone, Debug)]
pub struct PlaneMapper {
    step: f64,
    center: (i64, i64),
}

impl PlaneMapper {
    /// Constructor.  Takes its geometry from the render config.
    pub fn new(config: &RenderConfig) -> PlaneMapper {
        PlaneMapper {
            step: config.pixel_step(),
            center: (
                i64::from(config.width() / 2),
                i64::from(config.height() / 2),
            ),
        }
    }

    /// Given a pixel on the integral plane, return the complex number
    /// it samples.  Total over all pixels; callers keep to the image.
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        Complex::new(
            ((i64::from(pixel.0) - self.center.0) as f64) * self.step,
            ((i64::from(pixel.1) - self.center.1) as f64) * self.step,
        )
    }
}
