// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The single error type shared by configuration, rendering, and
//! encoding.

use std::io;
use std::time::Duration;

/// Everything that can go wrong between receiving render parameters
/// and writing out the encoded image.  Rendering itself cannot fail
/// on a valid configuration; the collector variants only fire when a
/// worker misbehaves.
#[derive(Debug, Fail)]
pub enum RenderError {
    /// The configuration would degenerate the plane mapping or the
    /// escape loop.
    #[fail(display = "invalid render configuration: {}", _0)]
    InvalidConfig(String),

    /// The collector's bounded wait ran out before every row arrived.
    #[fail(
        display = "render timed out after {:?} with {} of {} rows collected",
        waited, received, expected
    )]
    Timeout {
        /// How long the collector waited in total.
        waited: Duration,
        /// Rows collected before the deadline.
        received: u32,
        /// Rows the image needs.
        expected: u32,
    },

    /// Every worker has gone away but some rows were never delivered.
    #[fail(
        display = "row workers exited after delivering {} of {} rows",
        received, expected
    )]
    MissingRows {
        /// Rows collected before the channel closed.
        received: u32,
        /// Rows the image needs.
        expected: u32,
    },

    /// The same row index arrived twice.
    #[fail(display = "row {} was delivered more than once", _0)]
    DuplicateRow(u32),

    /// A row index outside the image arrived.
    #[fail(display = "row {} is outside an image of height {}", row, height)]
    RowOutOfBounds {
        /// The offending row index.
        row: u32,
        /// Height of the image being assembled.
        height: u32,
    },

    /// A row arrived with the wrong number of pixels.
    #[fail(display = "row {} carries {} pixels, expected {}", row, got, expected)]
    RowWidth {
        /// The offending row index.
        row: u32,
        /// Pixels the row carried.
        got: usize,
        /// Width of the image being assembled.
        expected: usize,
    },

    /// A pooled worker panicked while rendering.
    #[fail(display = "a row worker panicked")]
    WorkerPanicked,

    /// The operating system refused to start a worker thread.
    #[fail(display = "could not start a row worker: {}", _0)]
    Spawn(#[cause] io::Error),

    /// There is nothing to encode in a zero-area image.
    #[fail(display = "cannot encode an image with no pixels")]
    EmptyImage,

    /// The HTTP listener could not be started.
    #[fail(display = "could not listen on {}: {}", addr, reason)]
    Bind {
        /// The address asked for.
        addr: String,
        /// Why the listener refused.
        reason: String,
    },

    /// Writing the encoded image failed.
    #[fail(display = "could not write image: {}", _0)]
    Io(#[cause] io::Error),
}

impl From<io::Error> for RenderError {
    fn from(err: io::Error) -> Self {
        RenderError::Io(err)
    }
}
