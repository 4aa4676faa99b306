// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The validated parameters of a single render.  A `RenderConfig` is
//! built once per request and then only ever read, so it is `Copy`
//! and every worker gets its own.

use error::RenderError;

/// Pixels per complex-plane unit when the request says nothing.
pub const DEFAULT_ZOOM: i64 = 150;
/// Image width when the request says nothing.
pub const DEFAULT_WIDTH: i64 = 600;
/// Image height when the request says nothing.
pub const DEFAULT_HEIGHT: i64 = 600;
/// Iteration bound when the request says nothing.
pub const DEFAULT_ITERATIONS: i64 = 200;
/// Grayscale unless asked otherwise.
pub const DEFAULT_COLORFUL: bool = false;

/// Largest width or height accepted.  The concurrent renderer starts a
/// thread per row, so this also bounds its thread count.
pub const MAX_DIMENSION: u32 = 1 << 15;
/// Largest image accepted, in pixels: 256 MiB of RGBA.
pub const MAX_PIXELS: u64 = 1 << 26;

/// How the colorizer squeezes an unbounded channel value into a byte.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Overflow {
    /// Keep the low eight bits, which produces the familiar banding at
    /// high iteration counts.
    Wrap,
    /// Saturate at 0 and 255.
    Clamp,
}

impl Default for Overflow {
    fn default() -> Self {
        Overflow::Wrap
    }
}

/// Everything a renderer needs to know about one image.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderConfig {
    pixel_step: f64,
    width: u32,
    height: u32,
    max_iterations: u32,
    colorful: bool,
    overflow: Overflow,
}

impl RenderConfig {
    /// Constructor.  `pixel_step` is the distance in the complex plane
    /// between two adjacent pixels.  A zero-width or zero-height image
    /// is allowed and renders as an empty raster; a non-positive step
    /// or iteration bound is not, and neither is an image larger than
    /// `MAX_DIMENSION` on a side or `MAX_PIXELS` in total.
    pub fn new(
        pixel_step: f64,
        width: u32,
        height: u32,
        max_iterations: u32,
        colorful: bool,
    ) -> Result<RenderConfig, RenderError> {
        if !pixel_step.is_finite() || pixel_step <= 0.0 {
            return Err(RenderError::InvalidConfig(format!(
                "pixel step must be a positive number, got {}",
                pixel_step
            )));
        }
        if max_iterations == 0 {
            return Err(RenderError::InvalidConfig(
                "iteration bound must be at least 1".to_string(),
            ));
        }
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(RenderError::InvalidConfig(format!(
                "{}x{} exceeds the largest side of {} pixels",
                width, height, MAX_DIMENSION
            )));
        }
        if u64::from(width) * u64::from(height) > MAX_PIXELS {
            return Err(RenderError::InvalidConfig(format!(
                "{}x{} exceeds the limit of {} pixels",
                width, height, MAX_PIXELS
            )));
        }
        Ok(RenderConfig {
            pixel_step,
            width,
            height,
            max_iterations,
            colorful,
            overflow: Overflow::default(),
        })
    }

    /// Builds a config from the signed integers a request carries.
    /// The step is `1 / zoom`.  Non-positive dimensions collapse to an
    /// empty image rather than failing.
    pub fn from_zoom(
        zoom: i64,
        width: i64,
        height: i64,
        max_iterations: i64,
        colorful: bool,
    ) -> Result<RenderConfig, RenderError> {
        if zoom <= 0 {
            return Err(RenderError::InvalidConfig(format!(
                "zoom must be positive, got {}",
                zoom
            )));
        }
        if max_iterations <= 0 {
            return Err(RenderError::InvalidConfig(format!(
                "iteration bound must be positive, got {}",
                max_iterations
            )));
        }
        RenderConfig::new(
            1.0 / (zoom as f64),
            dimension("width", width)?,
            dimension("height", height)?,
            narrow("iteration bound", max_iterations)?,
            colorful,
        )
    }

    /// Replaces the byte conversion policy.
    pub fn with_overflow(mut self, overflow: Overflow) -> Self {
        self.overflow = overflow;
        self
    }

    /// Complex-plane units per pixel.
    pub fn pixel_step(&self) -> f64 {
        self.pixel_step
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Upper bound on iterations per pixel.
    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// Color or grayscale output.
    pub fn colorful(&self) -> bool {
        self.colorful
    }

    /// Byte conversion policy for the colorizer.
    pub fn overflow(&self) -> Overflow {
        self.overflow
    }

    /// The total number of pixels.
    pub fn len(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// True when there is nothing to render.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            pixel_step: 1.0 / (DEFAULT_ZOOM as f64),
            width: DEFAULT_WIDTH as u32,
            height: DEFAULT_HEIGHT as u32,
            max_iterations: DEFAULT_ITERATIONS as u32,
            colorful: DEFAULT_COLORFUL,
            overflow: Overflow::default(),
        }
    }
}

fn dimension(name: &str, value: i64) -> Result<u32, RenderError> {
    if value <= 0 {
        return Ok(0);
    }
    narrow(name, value)
}

fn narrow(name: &str, value: i64) -> Result<u32, RenderError> {
    if value > i64::from(u32::max_value()) {
        return Err(RenderError::InvalidConfig(format!(
            "{} {} is too large",
            name, value
        )));
    }
    Ok(value as u32)
}
