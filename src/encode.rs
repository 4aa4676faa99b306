// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! PNG output, either from a finished raster or straight from a pixel
//! source.

use error::RenderError;
use image::png::PNGEncoder;
use image::ColorType;
use itertools::iproduct;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use view::{PixelSource, Raster};

/// Encodes a finished raster as an RGBA PNG.
pub fn write_png<W: Write>(raster: &Raster, output: W) -> Result<(), RenderError> {
    encode(raster, raster.width(), raster.height(), output)
}

/// Encodes a pixel source as an RGBA PNG, pulling pixels in row-major
/// order directly into the encoder's input.  No `Raster` is built.
pub fn write_view_png<S, W>(source: &S, output: W) -> Result<(), RenderError>
where
    S: PixelSource + ?Sized,
    W: Write,
{
    let (width, height) = source.dimensions();
    let mut data = Vec::with_capacity((width as usize) * (height as usize) * 4);
    for (y, x) in iproduct!(0..height, 0..width) {
        data.extend_from_slice(&source.color_at(x, y).to_bytes());
    }
    encode(&data, width, height, output)
}

/// Writes a raster to a PNG file at `path`.
pub fn save_png<P: AsRef<Path>>(raster: &Raster, path: P) -> Result<(), RenderError> {
    ensure_pixels(raster.width(), raster.height())?;
    write_png(raster, BufWriter::new(File::create(path)?))
}

/// Writes a pixel source to a PNG file at `path`.
pub fn save_view_png<S, P>(source: &S, path: P) -> Result<(), RenderError>
where
    S: PixelSource + ?Sized,
    P: AsRef<Path>,
{
    let (width, height) = source.dimensions();
    ensure_pixels(width, height)?;
    write_view_png(source, BufWriter::new(File::create(path)?))
}

fn encode<W: Write>(data: &[u8], width: u32, height: u32, output: W) -> Result<(), RenderError> {
    ensure_pixels(width, height)?;
    PNGEncoder::new(output).encode(data, width, height, ColorType::RGBA(8))?;
    Ok(())
}

fn ensure_pixels(width: u32, height: u32) -> Result<(), RenderError> {
    if width == 0 || height == 0 {
        return Err(RenderError::EmptyImage);
    }
    Ok(())
}
