// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The single-threaded baseline: ask a source for every pixel, in
//! row-major order, and write the answers into a raster.

use itertools::iproduct;
use view::{PixelSource, Raster};

/// Walks every pixel of `source` and returns the filled raster.
pub fn materialize<S: PixelSource + ?Sized>(source: &S) -> Raster {
    let (width, height) = source.dimensions();
    let mut raster = Raster::new(width, height);
    for (y, x) in iproduct!(0..height, 0..width) {
        raster.put_pixel(x, y, source.color_at(x, y).to_rgba());
    }
    debug!("materialized {}x{} raster sequentially", width, height);
    raster
}

#[cfg(test)]
mod tests {
    use super::*;
    use colorize::PixelColor;
    use config::RenderConfig;
    use itertools::iproduct;
    use std::cell::RefCell;
    use view::MandelView;

    struct Recorder {
        size: (u32, u32),
        visits: RefCell<Vec<(u32, u32)>>,
    }

    impl PixelSource for Recorder {
        fn dimensions(&self) -> (u32, u32) {
            self.size
        }

        fn color_at(&self, x: u32, y: u32) -> PixelColor {
            self.visits.borrow_mut().push((x, y));
            PixelColor::Gray((x + 10 * y) as u8)
        }
    }

    #[test]
    fn visits_in_row_major_order() {
        let source = Recorder {
            size: (3, 2),
            visits: RefCell::new(vec![]),
        };
        let raster = materialize(&source);
        assert_eq!(
            *source.visits.borrow(),
            vec![(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)]
        );
        assert_eq!(raster.color_at(2, 1), PixelColor::Rgba([12, 12, 12, 255]));
    }

    #[test]
    fn empty_source_gives_empty_raster() {
        let config = RenderConfig::from_zoom(150, 0, 9, 20, false).unwrap();
        let raster = materialize(&MandelView::new(&config));
        assert_eq!(raster.width(), 0);
        assert_eq!(raster.height(), 9);
        assert!(raster.is_empty());
    }

    #[test]
    fn every_cell_matches_the_view() {
        let config = RenderConfig::new(0.03, 30, 20, 40, true).unwrap();
        let view = MandelView::new(&config);
        let raster = materialize(&view);
        for (y, x) in iproduct!(0..20, 0..30) {
            assert_eq!(
                raster.color_at(x, y).to_bytes(),
                view.color_at(x, y).to_bytes()
            );
        }
    }
}
