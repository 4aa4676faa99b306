// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate clap;
extern crate env_logger;
#[macro_use]
extern crate log;
extern crate mandelbrot;
extern crate num_cpus;

use clap::{App, Arg, ArgMatches};
use mandelbrot::encode::{save_png, save_view_png};
use mandelbrot::params::Params;
use mandelbrot::{materialize, MandelView, Overflow, RenderConfig, RenderError, RowPipeline};
use std::str::FromStr;
use std::time::Duration;

fn validate_int<T: FromStr>(s: &str, err: &str) -> Result<(), String> {
    match T::from_str(s) {
        Ok(_) => Ok(()),
        Err(_) => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + Ord>(
    s: &str,
    low: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const OUTPUT: &str = "output";
const ZOOM: &str = "zoom";
const WIDTH: &str = "width";
const HEIGHT: &str = "height";
const ITERATIONS: &str = "itertimes";
const COLORFUL: &str = "colorful";
const CLAMP: &str = "clamp";
const QUERY: &str = "query";
const STRATEGY: &str = "strategy";
const THREADS: &str = "threads";
const TIMEOUT: &str = "timeout";

#[derive(Copy, Clone, Debug, PartialEq)]
enum Strategy {
    Lazy,
    Sequential,
    Concurrent,
    Pooled,
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Strategy, String> {
        match s {
            "lazy" => Ok(Strategy::Lazy),
            "sequential" => Ok(Strategy::Sequential),
            "concurrent" => Ok(Strategy::Concurrent),
            "pooled" => Ok(Strategy::Pooled),
            _ => Err(format!("unknown strategy {:?}", s)),
        }
    }
}

fn args<'a>() -> ArgMatches<'a> {
    App::new("mandel")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Mandelbrot renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output PNG file"),
        )
        .arg(
            Arg::with_name(ZOOM)
                .long(ZOOM)
                .allow_hyphen_values(true)
                .short("z")
                .takes_value(true)
                .default_value("150")
                .validator(|s| validate_int::<i64>(&s, "Could not parse zoom"))
                .help("Pixels per unit of the complex plane"),
        )
        .arg(
            Arg::with_name(WIDTH)
                .long(WIDTH)
                .allow_hyphen_values(true)
                .short("w")
                .takes_value(true)
                .default_value("600")
                .validator(|s| validate_int::<i64>(&s, "Could not parse image width"))
                .help("Width of output image"),
        )
        .arg(
            Arg::with_name(HEIGHT)
                .long(HEIGHT)
                .allow_hyphen_values(true)
                .short("H")
                .takes_value(true)
                .default_value("600")
                .validator(|s| validate_int::<i64>(&s, "Could not parse image height"))
                .help("Height of output image"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .long(ITERATIONS)
                .allow_hyphen_values(true)
                .short("i")
                .takes_value(true)
                .default_value("200")
                .validator(|s| validate_int::<i64>(&s, "Could not parse iteration count"))
                .help("Maximum iterations per pixel"),
        )
        .arg(
            Arg::with_name(COLORFUL)
                .long(COLORFUL)
                .short("c")
                .help("Render in color instead of grayscale"),
        )
        .arg(
            Arg::with_name(CLAMP)
                .long(CLAMP)
                .help("Saturate color channels instead of wrapping them"),
        )
        .arg(
            Arg::with_name(QUERY)
                .long(QUERY)
                .short("q")
                .takes_value(true)
                .help("Request query string such as zoom=300&colorful=true; overrides the flags above"),
        )
        .arg(
            Arg::with_name(STRATEGY)
                .long(STRATEGY)
                .short("s")
                .takes_value(true)
                .default_value("concurrent")
                .possible_values(&["lazy", "sequential", "concurrent", "pooled"])
                .help("How to produce the image"),
        )
        .arg(
            Arg::with_name(THREADS)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .validator(|s| {
                    validate_range(
                        &s,
                        1usize,
                        "Could not parse thread count",
                        "Thread count must be at least 1",
                    )
                })
                .help("Worker threads for the pooled strategy [default: CPU count]"),
        )
        .arg(
            Arg::with_name(TIMEOUT)
                .long(TIMEOUT)
                .takes_value(true)
                .validator(|s| validate_int::<u64>(&s, "Could not parse timeout"))
                .help("Seconds to wait for the concurrent strategies before giving up"),
        )
        .get_matches()
}

fn config(matches: &ArgMatches) -> Result<RenderConfig, RenderError> {
    let int = |name: &str| i64::from_str(matches.value_of(name).unwrap_or("")).unwrap_or(0);
    let config = match matches.value_of(QUERY) {
        Some(query) => Params::parse(query).to_config()?,
        None => RenderConfig::from_zoom(
            int(ZOOM),
            int(WIDTH),
            int(HEIGHT),
            int(ITERATIONS),
            matches.is_present(COLORFUL),
        )?,
    };
    if matches.is_present(CLAMP) {
        Ok(config.with_overflow(Overflow::Clamp))
    } else {
        Ok(config)
    }
}

fn run(matches: &ArgMatches) -> Result<(), RenderError> {
    let config = config(matches)?;
    let output = matches.value_of(OUTPUT).unwrap_or("mandel.png");
    let strategy = Strategy::from_str(matches.value_of(STRATEGY).unwrap_or("concurrent"))
        .map_err(RenderError::InvalidConfig)?;
    info!("rendering {:?} with the {:?} strategy", config, strategy);

    let mut pipeline = RowPipeline::new();
    if let Some(seconds) = matches.value_of(TIMEOUT) {
        let seconds = u64::from_str(seconds).unwrap_or(0);
        pipeline = pipeline.with_timeout(Duration::from_secs(seconds));
    }

    match strategy {
        Strategy::Lazy => save_view_png(&MandelView::new(&config), output),
        Strategy::Sequential => save_png(&materialize(&MandelView::new(&config)), output),
        Strategy::Concurrent => save_png(&pipeline.render(&config)?, output),
        Strategy::Pooled => {
            let threads = matches
                .value_of(THREADS)
                .and_then(|s| usize::from_str(s).ok())
                .unwrap_or_else(num_cpus::get);
            save_png(&pipeline.with_pool(threads).render(&config)?, output)
        }
    }
}

fn main() {
    env_logger::init();
    let matches = args();
    if let Err(e) = run(&matches) {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
