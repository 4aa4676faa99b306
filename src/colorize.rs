// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Turns escape results into pixels.

use config::Overflow;
use escape::EscapeResult;
use image::{Pixel, Rgba};

/// A single rendered sample.  Grayscale renders produce `Gray`, color
/// renders produce `Rgba`; both land in an RGBA raster.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PixelColor {
    /// Red, green, blue, alpha.
    Rgba([u8; 4]),
    /// A single luminance byte, fully opaque.
    Gray(u8),
}

impl PixelColor {
    /// Opaque black in the given mode.
    pub fn black(colorful: bool) -> PixelColor {
        if colorful {
            PixelColor::Rgba([0, 0, 0, 255])
        } else {
            PixelColor::Gray(0)
        }
    }

    /// The four bytes this sample occupies in an RGBA raster.
    pub fn to_bytes(self) -> [u8; 4] {
        match self {
            PixelColor::Rgba(c) => c,
            PixelColor::Gray(g) => [g, g, g, 255],
        }
    }

    /// The sample as an `image` pixel.
    pub fn to_rgba(self) -> Rgba<u8> {
        let [r, g, b, a] = self.to_bytes();
        Rgba::from_channels(r, g, b, a)
    }

    /// Whether this is the black of a non-escaping point.
    pub fn is_black(self) -> bool {
        let [r, g, b, _] = self.to_bytes();
        r == 0 && g == 0 && b == 0
    }
}

/// Maps an escape result to a sample.  Points whose iteration count
/// is zero are black in both modes.
pub fn colorize(result: &EscapeResult, colorful: bool, overflow: Overflow) -> PixelColor {
    if result.is_black() {
        return PixelColor::black(colorful);
    }
    let n = i64::from(result.iteration);
    if colorful {
        let magnitude = result.value.norm();
        PixelColor::Rgba([
            float_byte(100.0 * magnitude, overflow),
            float_byte(50.0 * magnitude, overflow),
            int_byte(80 * n, overflow),
            255,
        ])
    } else {
        PixelColor::Gray(int_byte(255 - 15 * n, overflow))
    }
}

fn float_byte(v: f64, overflow: Overflow) -> u8 {
    match overflow {
        Overflow::Wrap => (v as i64) as u8,
        Overflow::Clamp => v as u8,
    }
}

fn int_byte(v: i64, overflow: Overflow) -> u8 {
    match overflow {
        Overflow::Wrap => v as u8,
        Overflow::Clamp => {
            if v < 0 {
                0
            } else if v > 255 {
                255
            } else {
                v as u8
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num::Complex;

    fn result(re: f64, im: f64, iteration: u32) -> EscapeResult {
        EscapeResult {
            value: Complex::new(re, im),
            iteration,
        }
    }

    #[test]
    fn zero_iteration_is_black_in_both_modes() {
        let r = result(10.0, 10.0, 0);
        assert_eq!(colorize(&r, false, Overflow::Wrap), PixelColor::Gray(0));
        assert_eq!(
            colorize(&r, true, Overflow::Wrap),
            PixelColor::Rgba([0, 0, 0, 255])
        );
        assert!(colorize(&r, true, Overflow::Clamp).is_black());
        assert_eq!(colorize(&r, true, Overflow::Wrap).to_bytes(), [0, 0, 0, 255]);
        assert_eq!(colorize(&r, false, Overflow::Wrap).to_bytes(), [0, 0, 0, 255]);
    }

    #[test]
    fn grayscale_darkens_with_iterations() {
        assert_eq!(
            colorize(&result(3.0, 0.0, 1), false, Overflow::Wrap),
            PixelColor::Gray(240)
        );
        assert_eq!(
            colorize(&result(3.0, 0.0, 4), false, Overflow::Wrap),
            PixelColor::Gray(195)
        );
    }

    #[test]
    fn grayscale_wraps_past_seventeen() {
        // 255 - 15 * 20 = -45, which wraps to 211.
        let r = result(3.0, 0.0, 20);
        assert_eq!(colorize(&r, false, Overflow::Wrap), PixelColor::Gray(211));
        assert_eq!(colorize(&r, false, Overflow::Clamp), PixelColor::Gray(0));
    }

    #[test]
    fn color_channels_scale_with_magnitude() {
        // |3 + 4i| = 5
        let r = result(3.0, 4.0, 2);
        assert_eq!(
            colorize(&r, true, Overflow::Wrap),
            PixelColor::Rgba([244, 250, 160, 255])
        );
        assert_eq!(
            colorize(&r, true, Overflow::Clamp),
            PixelColor::Rgba([255, 250, 160, 255])
        );
    }

    #[test]
    fn blue_channel_wraps() {
        // 80 * 4 = 320, which wraps to 64.
        let r = result(2.1, 0.0, 4);
        match colorize(&r, true, Overflow::Wrap) {
            PixelColor::Rgba([r, g, b, a]) => {
                assert_eq!((r, g, b, a), (210, 105, 64, 255));
            }
            other => panic!("unexpected {:?}", other),
        }
        match colorize(&r, true, Overflow::Clamp) {
            PixelColor::Rgba([_, _, b, _]) => assert_eq!(b, 255),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn gray_expands_to_opaque_rgba() {
        assert_eq!(PixelColor::Gray(17).to_bytes(), [17, 17, 17, 255]);
        assert_eq!(
            PixelColor::Gray(17).to_rgba(),
            Rgba::from_channels(17, 17, 17, 255)
        );
    }
}
