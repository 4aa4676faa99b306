#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Mandelbrot renderer
//!
//! The Mandelbrot set is the set of points `c` on the complex plane
//! for which repeatedly squaring a number and adding `c`, starting
//! from zero, never runs off to infinity.  Each pixel of the image is
//! one such `c`; how quickly its orbit escapes (if it escapes at all)
//! decides its color.
//!
//! Three ways of producing an image are provided, all from the same
//! per-pixel computation:
//!
//! * [`MandelView`](view/struct.MandelView.html), a lazy image that
//!   computes a pixel whenever it is asked for one.
//! * [`materialize`](sequential/fn.materialize.html), which walks a
//!   lazy image on one thread and fills a raster.
//! * [`render_concurrent`](concurrent/fn.render_concurrent.html) and
//!   [`RowPipeline`](concurrent/struct.RowPipeline.html), which render
//!   every row on its own thread and reassemble the rows as they
//!   arrive.

extern crate crossbeam;
#[macro_use]
extern crate failure;
extern crate image;
extern crate itertools;
#[macro_use]
extern crate log;
extern crate num;
extern crate tiny_http;
extern crate url;

pub mod colorize;
pub mod concurrent;
pub mod config;
pub mod encode;
pub mod error;
pub mod escape;
pub mod params;
pub mod planes;
pub mod sequential;
pub mod serve;
pub mod view;

pub use colorize::{colorize, PixelColor};
pub use concurrent::{collect_rows, render_concurrent, RowPipeline, RowResult, Workers};
pub use config::{Overflow, RenderConfig};
pub use error::RenderError;
pub use escape::{evaluate, EscapeResult};
pub use params::parse_query;
pub use planes::{Pixel, PlaneMapper};
pub use sequential::materialize;
pub use serve::{MandelServer, Route};
pub use view::{MandelView, PixelSource, Raster};
