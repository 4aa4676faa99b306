// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The row-parallel renderer.
//!
//! Rows of a Mandelbrot image have nothing to say to one another, so
//! each one can be computed on its own thread.  Every worker renders
//! its row into a buffer it alone owns, tags the buffer with the row
//! index, and sends it down a single multi-producer channel.  One
//! collector drains exactly `height` messages from that channel and
//! copies each row into place.  Rows finish in whatever order the
//! scheduler pleases; the index on each message is what puts the
//! image back together, so the result never depends on that order.
//!
//! Two ways of fanning out are offered.  The default starts one
//! detached thread per row with no upper bound.  A pool of a fixed
//! number of workers pulling row indices from a shared queue is the
//! bounded alternative; the collector is the same for both.

use colorize::PixelColor;
use config::RenderConfig;
use crossbeam;
use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};
use error::RenderError;
use std::ops::Range;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use view::{MandelView, Raster};

type RowQueue = Arc<Mutex<Range<u32>>>;

/// One finished row, on its way from a worker to the collector.
#[derive(Clone, Debug, PartialEq)]
pub struct RowResult {
    /// Which row of the image this is.
    pub row: u32,
    /// The row's pixels, left to right.
    pub pixels: Vec<PixelColor>,
}

impl RowResult {
    /// Renders row `row` of the view.
    pub fn render(view: &MandelView, row: u32) -> RowResult {
        RowResult {
            row,
            pixels: view.row(row),
        }
    }
}

/// How rows are handed out to threads.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Workers {
    /// A fresh thread for every row.
    PerRow,
    /// A fixed number of threads sharing a queue of row indices.
    Pool(usize),
}

/// A configured concurrent renderer.  The defaults reproduce the
/// plain fan-out: one thread per row, and a collector that waits as
/// long as it takes.
#[derive(Copy, Clone, Debug)]
pub struct RowPipeline {
    workers: Workers,
    timeout: Option<Duration>,
}

impl Default for RowPipeline {
    fn default() -> Self {
        RowPipeline::new()
    }
}

impl RowPipeline {
    /// One thread per row, no deadline.
    pub fn new() -> RowPipeline {
        RowPipeline {
            workers: Workers::PerRow,
            timeout: None,
        }
    }

    /// Use a pool of `threads` workers instead of a thread per row.
    pub fn with_pool(mut self, threads: usize) -> RowPipeline {
        self.workers = Workers::Pool(threads);
        self
    }

    /// Give up with `RenderError::Timeout` if the whole image has not
    /// arrived within `timeout`.  With one thread per row the workers
    /// are detached and `render` returns as soon as the deadline
    /// passes.  A pool's workers are scoped and joined before `render`
    /// returns, so a pooled worker that never finishes its row still
    /// blocks the call; the timeout only stops the collector waiting.
    pub fn with_timeout(mut self, timeout: Duration) -> RowPipeline {
        self.timeout = Some(timeout);
        self
    }

    /// The fan-out strategy in use.
    pub fn workers(&self) -> Workers {
        self.workers
    }

    /// Renders the image described by `config`.
    pub fn render(&self, config: &RenderConfig) -> Result<Raster, RenderError> {
        if config.is_empty() {
            return Ok(Raster::new(config.width(), config.height()));
        }
        debug!(
            "rendering {}x{} with {:?}, timeout {:?}",
            config.width(),
            config.height(),
            self.workers,
            self.timeout
        );
        let started = Instant::now();
        let raster = match self.workers {
            Workers::PerRow => self.render_per_row(config),
            Workers::Pool(threads) => self.render_pooled(config, threads),
        }?;
        debug!("rendered {} rows in {:?}", config.height(), started.elapsed());
        Ok(raster)
    }

    fn render_per_row(&self, config: &RenderConfig) -> Result<Raster, RenderError> {
        let view = MandelView::new(config);
        fan_out_per_row(config.width(), config.height(), self.timeout, move |y| {
            RowResult::render(&view, y)
        })
    }

    fn render_pooled(&self, config: &RenderConfig, threads: usize) -> Result<Raster, RenderError> {
        let view = MandelView::new(config);
        let render_row = |y| RowResult::render(&view, y);
        fan_out_pooled(threads, config.width(), config.height(), self.timeout, &render_row)
    }
}

/// Renders `config` with one thread per row and no deadline.
pub fn render_concurrent(config: &RenderConfig) -> Result<Raster, RenderError> {
    RowPipeline::new().render(config)
}

fn fan_out_per_row<F>(
    width: u32,
    height: u32,
    timeout: Option<Duration>,
    render_row: F,
) -> Result<Raster, RenderError>
where
    F: Fn(u32) -> RowResult + Send + Sync + 'static,
{
    let render_row = Arc::new(render_row);
    let (sender, receiver) = channel::unbounded();
    for y in 0..height {
        let sender = sender.clone();
        let render_row = render_row.clone();
        thread::Builder::new()
            .name(format!("row-{}", y))
            .spawn(move || {
                // The collector may have given up already.
                let _ = sender.send(render_row(y));
            })
            .map_err(RenderError::Spawn)?;
    }
    // Only the workers hold senders now, so the channel closes if
    // every one of them goes away.
    drop(sender);
    collect_rows(&receiver, width, height, timeout)
}

fn fan_out_pooled<F>(
    threads: usize,
    width: u32,
    height: u32,
    timeout: Option<Duration>,
    render_row: &F,
) -> Result<Raster, RenderError>
where
    F: Fn(u32) -> RowResult + Sync,
{
    if threads == 0 {
        return Err(RenderError::InvalidConfig(
            "a worker pool needs at least one thread".to_string(),
        ));
    }
    let threads = threads.min(height as usize);
    let rows: RowQueue = Arc::new(Mutex::new(0..height));
    let (sender, receiver) = channel::unbounded();

    let collected = crossbeam::scope(move |spawner| {
        for _ in 0..threads {
            let rows = rows.clone();
            let sender = sender.clone();
            spawner.spawn(move |_| pool_worker(render_row, &rows, &sender));
        }
        drop(sender);
        collect_rows(&receiver, width, height, timeout)
    });

    match collected {
        Ok(raster) => raster,
        Err(_) => Err(RenderError::WorkerPanicked),
    }
}

fn pool_worker<F>(render_row: &F, rows: &RowQueue, sender: &Sender<RowResult>)
where
    F: Fn(u32) -> RowResult,
{
    loop {
        let row = {
            match rows.lock() {
                Ok(mut rows) => rows.next(),
                Err(_) => None,
            }
        };
        match row {
            Some(y) => {
                if sender.send(render_row(y)).is_err() {
                    break;
                }
            }
            None => {
                break;
            }
        }
    }
}

/// Drains exactly `height` rows from `rows` into a fresh raster.
/// Arrival order is irrelevant.  A row index that is out of range,
/// repeated, or the wrong width is an error, as is the channel
/// closing early or, when `timeout` is set, the deadline passing.
pub fn collect_rows(
    rows: &Receiver<RowResult>,
    width: u32,
    height: u32,
    timeout: Option<Duration>,
) -> Result<Raster, RenderError> {
    let started = Instant::now();
    let deadline = timeout.map(|t| started + t);
    let mut raster = Raster::new(width, height);
    let mut seen = vec![false; height as usize];

    for received in 0..height {
        let message = match deadline {
            None => rows.recv().map_err(|_| RecvTimeoutError::Disconnected),
            Some(deadline) => {
                rows.recv_timeout(deadline.saturating_duration_since(Instant::now()))
            }
        };
        let result = match message {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => {
                return Err(RenderError::Timeout {
                    waited: started.elapsed(),
                    received,
                    expected: height,
                });
            }
            Err(RecvTimeoutError::Disconnected) => {
                return Err(RenderError::MissingRows {
                    received,
                    expected: height,
                });
            }
        };

        if result.row >= height {
            return Err(RenderError::RowOutOfBounds {
                row: result.row,
                height,
            });
        }
        if seen[result.row as usize] {
            return Err(RenderError::DuplicateRow(result.row));
        }
        if result.pixels.len() != width as usize {
            return Err(RenderError::RowWidth {
                row: result.row,
                got: result.pixels.len(),
                expected: width as usize,
            });
        }
        seen[result.row as usize] = true;
        trace!("row {} arrived {} of {}", result.row, received + 1, height);
        for (x, color) in result.pixels.into_iter().enumerate() {
            raster.put_pixel(x as u32, result.row, color.to_rgba());
        }
    }
    Ok(raster)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sequential::materialize;
    use view::PixelSource;

    fn gray_row(row: u32, width: usize) -> RowResult {
        RowResult {
            row,
            pixels: vec![PixelColor::Gray(row as u8); width],
        }
    }

    #[test]
    fn collector_reassembles_out_of_order_rows() {
        let (sender, receiver) = channel::unbounded();
        for row in &[2, 0, 3, 1] {
            sender.send(gray_row(*row, 3)).unwrap();
        }
        let raster = collect_rows(&receiver, 3, 4, None).unwrap();
        for y in 0..4 {
            for x in 0..3 {
                let g = y as u8;
                assert_eq!(raster.color_at(x, y).to_bytes(), [g, g, g, 255]);
            }
        }
    }

    #[test]
    fn collector_stops_after_height_rows() {
        let (sender, receiver) = channel::unbounded();
        for row in 0..3 {
            sender.send(gray_row(row, 2)).unwrap();
        }
        sender.send(gray_row(0, 2)).unwrap();
        assert!(collect_rows(&receiver, 2, 3, None).is_ok());
        assert_eq!(receiver.len(), 1);
    }

    #[test]
    fn collector_rejects_duplicates() {
        let (sender, receiver) = channel::unbounded();
        sender.send(gray_row(1, 2)).unwrap();
        sender.send(gray_row(1, 2)).unwrap();
        match collect_rows(&receiver, 2, 2, None) {
            Err(RenderError::DuplicateRow(1)) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn collector_rejects_rows_outside_the_image() {
        let (sender, receiver) = channel::unbounded();
        sender.send(gray_row(5, 2)).unwrap();
        match collect_rows(&receiver, 2, 2, None) {
            Err(RenderError::RowOutOfBounds { row: 5, height: 2 }) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn collector_rejects_short_rows() {
        let (sender, receiver) = channel::unbounded();
        sender.send(gray_row(0, 1)).unwrap();
        match collect_rows(&receiver, 2, 2, None) {
            Err(RenderError::RowWidth {
                row: 0,
                got: 1,
                expected: 2,
            }) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn collector_notices_vanished_workers() {
        let (sender, receiver) = channel::unbounded();
        sender.send(gray_row(0, 2)).unwrap();
        drop(sender);
        match collect_rows(&receiver, 2, 3, None) {
            Err(RenderError::MissingRows {
                received: 1,
                expected: 3,
            }) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn collector_times_out_on_a_stalled_worker() {
        let (sender, receiver) = channel::unbounded();
        sender.send(gray_row(0, 2)).unwrap();
        sender.send(gray_row(1, 2)).unwrap();
        let result = collect_rows(&receiver, 2, 3, Some(Duration::from_millis(20)));
        match result {
            Err(RenderError::Timeout {
                waited,
                received: 2,
                expected: 3,
            }) => assert!(waited >= Duration::from_millis(20)),
            other => panic!("unexpected {:?}", other),
        }
        drop(sender);
    }

    #[test]
    fn per_row_matches_sequential() {
        let config = RenderConfig::new(0.01, 64, 48, 80, true).unwrap();
        let expected = materialize(&MandelView::new(&config));
        assert_eq!(render_concurrent(&config).unwrap(), expected);
    }

    #[test]
    fn pool_matches_sequential() {
        let config = RenderConfig::new(0.02, 50, 33, 60, false).unwrap();
        let expected = materialize(&MandelView::new(&config));
        for threads in &[1, 3, 8, 100] {
            let raster = RowPipeline::new()
                .with_pool(*threads)
                .render(&config)
                .unwrap();
            assert_eq!(raster, expected);
        }
    }

    #[test]
    fn empty_pool_is_invalid() {
        let config = RenderConfig::new(0.02, 5, 5, 10, false).unwrap();
        match RowPipeline::new().with_pool(0).render(&config) {
            Err(RenderError::InvalidConfig(_)) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    fn panic_on_row_two(y: u32) -> RowResult {
        if y == 2 {
            panic!("row {} blew up", y);
        }
        gray_row(y, 3)
    }

    #[test]
    fn panicking_pool_worker_is_reported() {
        let render_row = panic_on_row_two;
        match fan_out_pooled(2, 3, 5, None, &render_row) {
            Err(RenderError::WorkerPanicked) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn panicking_row_thread_leaves_a_missing_row() {
        match fan_out_per_row(3, 5, None, panic_on_row_two) {
            Err(RenderError::MissingRows {
                received: 4,
                expected: 5,
            }) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn pool_and_row_threads_assemble_any_row_source() {
        let pooled = fan_out_pooled(3, 3, 6, None, &|y: u32| gray_row(y, 3)).unwrap();
        let per_row = fan_out_per_row(3, 6, None, |y: u32| gray_row(y, 3)).unwrap();
        assert_eq!(pooled, per_row);
        assert_eq!(per_row.color_at(1, 5).to_bytes(), [5, 5, 5, 255]);
    }

    #[test]
    fn zero_height_renders_nothing() {
        let config = RenderConfig::new(0.02, 5, 0, 10, false).unwrap();
        let raster = render_concurrent(&config).unwrap();
        assert_eq!((raster.width(), raster.height()), (5, 0));
        let raster = RowPipeline::new().with_pool(4).render(&config).unwrap();
        assert_eq!((raster.width(), raster.height()), (5, 0));
    }

    #[test]
    fn generous_timeout_still_completes() {
        let config = RenderConfig::new(0.01, 40, 40, 50, false).unwrap();
        let raster = RowPipeline::new()
            .with_timeout(Duration::from_secs(60))
            .render(&config)
            .unwrap();
        assert_eq!(raster, materialize(&MandelView::new(&config)));
    }
}
