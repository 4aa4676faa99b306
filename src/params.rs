// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Turns the untrusted key/value pairs of a render request into a
//! `RenderConfig`.  A value that is missing or does not parse is
//! replaced by its default and the substitution is logged; the caller
//! never hears about it.  Values that parse but describe an
//! impossible image (a zoom of zero, say) are reported.

use config::{
    RenderConfig, DEFAULT_COLORFUL, DEFAULT_HEIGHT, DEFAULT_ITERATIONS, DEFAULT_WIDTH,
    DEFAULT_ZOOM,
};
use error::RenderError;
use std::str::FromStr;
use url::form_urlencoded;

/// Query key for pixels per complex-plane unit.
pub const ZOOM: &str = "zoom";
/// Query key for the image width.
pub const WIDTH: &str = "width";
/// Query key for the image height.
pub const HEIGHT: &str = "height";
/// Query key for the iteration bound.
pub const ITERATIONS: &str = "itertimes";
/// Query key for the color switch.
pub const COLORFUL: &str = "colorful";

/// Decoded `key=value` pairs in the order they appeared.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Params(Vec<(String, String)>);

impl Params {
    /// Splits and decodes an `application/x-www-form-urlencoded`
    /// string.  A leading `?` is ignored, as are empty segments.
    pub fn parse(query: &str) -> Params {
        let query = query.trim_start_matches('?');
        Params(
            form_urlencoded::parse(query.as_bytes())
                .map(|(key, value)| (key.into_owned(), value.into_owned()))
                .collect(),
        )
    }

    /// The first value given for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The value of `key` as a signed integer, or `default`.
    pub fn int_value(&self, key: &str, default: i64) -> i64 {
        self.value_or(key, default, i64::from_str)
    }

    /// The value of `key` as a boolean, or `default`.
    pub fn bool_value(&self, key: &str, default: bool) -> bool {
        self.value_or(key, default, parse_bool)
    }

    fn value_or<T, E, F>(&self, key: &str, default: T, parse: F) -> T
    where
        T: ::std::fmt::Debug,
        F: Fn(&str) -> Result<T, E>,
    {
        match self.get(key) {
            None => {
                debug!("{} not given, using {:?}", key, default);
                default
            }
            Some(raw) => match parse(raw) {
                Ok(value) => value,
                Err(_) => {
                    warn!("could not parse {}={:?}, using {:?}", key, raw, default);
                    default
                }
            },
        }
    }

    /// Builds the render config, falling back to defaults field by field.
    pub fn to_config(&self) -> Result<RenderConfig, RenderError> {
        RenderConfig::from_zoom(
            self.int_value(ZOOM, DEFAULT_ZOOM),
            self.int_value(WIDTH, DEFAULT_WIDTH),
            self.int_value(HEIGHT, DEFAULT_HEIGHT),
            self.int_value(ITERATIONS, DEFAULT_ITERATIONS),
            self.bool_value(COLORFUL, DEFAULT_COLORFUL),
        )
    }
}

/// Parses a request query straight into a render config.
pub fn parse_query(query: &str) -> Result<RenderConfig, RenderError> {
    Params::parse(query).to_config()
}

/// The spellings of true and false a request may use.
pub fn parse_bool(s: &str) -> Result<bool, String> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(format!("{:?} is not a boolean", s)),
    }
}
