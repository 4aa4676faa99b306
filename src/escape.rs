// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time test at the heart of every Mandelbrot renderer.

use num::Complex;

/// Magnitude beyond which an orbit is known to run off to infinity.
pub const ESCAPE_RADIUS: f64 = 2.0;

/// What happened to the orbit of a single point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EscapeResult {
    /// The last value of the orbit that was computed.
    pub value: Complex<f64>,
    /// The zero-based iteration on which the orbit left the escape
    /// radius.  Zero also stands for "never left", so a point that
    /// escapes on the very first step is indistinguishable from one
    /// inside the set.
    pub iteration: u32,
}

impl EscapeResult {
    /// True for both the never-escaped and the escaped-immediately
    /// cases; the colorizer paints both black.
    pub fn is_black(&self) -> bool {
        self.iteration == 0
    }
}

/// Iterates `z = z * z + c` from zero at most `limit` times and
/// reports where the orbit escaped.
pub fn evaluate(c: Complex<f64>, limit: u32) -> EscapeResult {
    let mut z: Complex<f64> = Complex { re: 0.0, im: 0.0 };
    for i in 0..limit {
        z = z * z + c;
        if z.norm() > ESCAPE_RADIUS {
            return EscapeResult {
                value: z,
                iteration: i,
            };
        }
    }
    EscapeResult {
        value: z,
        iteration: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_never_escapes() {
        let r = evaluate(Complex::new(0.0, 0.0), 1);
        assert_eq!(r.iteration, 0);
        assert_eq!(r.value, Complex::new(0.0, 0.0));
        let r = evaluate(Complex::new(0.0, 0.0), 500);
        assert_eq!(r.iteration, 0);
        assert!(r.is_black());
    }

    #[test]
    fn far_point_escapes_at_once() {
        let c = Complex::new(10.0, 10.0);
        let r = evaluate(c, 50);
        assert_eq!(r.iteration, 0);
        assert_eq!(r.value, c);
        assert!(r.is_black());
    }

    #[test]
    fn escape_iteration_is_zero_based() {
        // 1 + i -> 1 + 3i, which is outside on the second step.
        let r = evaluate(Complex::new(1.0, 1.0), 50);
        assert_eq!(r.iteration, 1);
        assert_eq!(r.value, Complex::new(1.0, 3.0));
    }

    #[test]
    fn boundary_radius_does_not_escape() {
        // -2 sits on the radius and stays there: -2, 2, 2, ...
        let r = evaluate(Complex::new(-2.0, 0.0), 20);
        assert_eq!(r.iteration, 0);
        assert_eq!(r.value, Complex::new(2.0, 0.0));
    }

    #[test]
    fn evaluation_is_deterministic() {
        let c = Complex::new(-0.7435, 0.1314);
        let first = evaluate(c, 1000);
        for _ in 0..10 {
            assert_eq!(evaluate(c, 1000), first);
        }
    }

    #[test]
    fn zero_limit_returns_origin() {
        let r = evaluate(Complex::new(3.0, 0.0), 0);
        assert_eq!(r.iteration, 0);
        assert_eq!(r.value, Complex::new(0.0, 0.0));
    }
}
