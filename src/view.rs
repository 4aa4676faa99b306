// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Pull-based access to pixels.  `PixelSource` is the capability a
//! consumer needs (how big, and what color is this pixel) without
//! committing to whether the pixels are stored anywhere.

use colorize::{colorize, PixelColor};
use config::RenderConfig;
use escape::evaluate;
use image::{Pixel as ImagePixel, RgbaImage};
use planes::{Pixel, PlaneMapper};

/// A dense, row-major RGBA buffer.
pub type Raster = RgbaImage;

/// Anything that can answer "what color is the pixel at x, y".
pub trait PixelSource {
    /// Width and height, in that order.
    fn dimensions(&self) -> (u32, u32);

    /// The color at a pixel inside the dimensions.
    fn color_at(&self, x: u32, y: u32) -> PixelColor;
}

/// The Mandelbrot set as an image that computes each pixel when it
/// is asked for and remembers nothing.
#[derive(Copy, Clone, Debug)]
pub struct MandelView {
    config: RenderConfig,
    plane: PlaneMapper,
}

impl MandelView {
    /// Wraps a config; nothing is computed until a pixel is requested.
    pub fn new(config: &RenderConfig) -> MandelView {
        MandelView {
            config: *config,
            plane: PlaneMapper::new(config),
        }
    }

    /// The config this view renders.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Every pixel of row `y`, left to right.
    pub fn row(&self, y: u32) -> Vec<PixelColor> {
        (0..self.config.width())
            .map(|x| self.color_at(x, y))
            .collect()
    }
}

impl PixelSource for MandelView {
    fn dimensions(&self) -> (u32, u32) {
        (self.config.width(), self.config.height())
    }

    fn color_at(&self, x: u32, y: u32) -> PixelColor {
        let point = self.plane.pixel_to_point(&Pixel(x, y));
        let result = evaluate(point, self.config.max_iterations());
        colorize(&result, self.config.colorful(), self.config.overflow())
    }
}

impl PixelSource for Raster {
    fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    fn color_at(&self, x: u32, y: u32) -> PixelColor {
        let c = self.get_pixel(x, y).channels();
        PixelColor::Rgba([c[0], c[1], c[2], c[3]])
    }
}
