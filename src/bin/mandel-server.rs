// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate clap;
extern crate env_logger;
extern crate mandelbrot;

use clap::{App, Arg};
use mandelbrot::serve::DEFAULT_ADDR;
use mandelbrot::MandelServer;

const LISTEN: &str = "listen";

fn main() {
    env_logger::init();
    let matches = App::new("mandel-server")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Serves Mandelbrot renders at /mandel0, /mandel1 and /mandel2")
        .arg(
            Arg::with_name(LISTEN)
                .long(LISTEN)
                .short("l")
                .takes_value(true)
                .default_value(DEFAULT_ADDR)
                .help("Address to listen on"),
        )
        .get_matches();

    match MandelServer::bind(matches.value_of(LISTEN).unwrap_or(DEFAULT_ADDR)) {
        Err(e) => {
            eprintln!("Server failure: {}", e);
            std::process::exit(1);
        }
        Ok(server) => server.serve(),
    }
}
