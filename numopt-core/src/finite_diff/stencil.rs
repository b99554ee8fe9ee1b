//! Static coefficient tables for the finite-difference engine.

/// Central-difference stencil for a first derivative.
///
/// The derivative is `sum(weights[s] * f(x + offsets[s] * h)) / (divisor * h)`.
#[derive(Debug)]
pub(crate) struct GradientStencil {
    pub offsets: &'static [f64],
    pub weights: &'static [f64],
    pub divisor: f64,
}

/// Gradient stencils indexed by accuracy order (2, 4, 6 and 8 points).
pub(crate) static GRADIENT: [GradientStencil; 4] = [
    GradientStencil {
        offsets: &[1.0, -1.0],
        weights: &[1.0, -1.0],
        divisor: 2.0,
    },
    GradientStencil {
        offsets: &[-2.0, -1.0, 1.0, 2.0],
        weights: &[1.0, -8.0, 8.0, -1.0],
        divisor: 12.0,
    },
    GradientStencil {
        offsets: &[-3.0, -2.0, -1.0, 1.0, 2.0, 3.0],
        weights: &[-1.0, 9.0, -45.0, 45.0, -9.0, 1.0],
        divisor: 60.0,
    },
    GradientStencil {
        offsets: &[-4.0, -3.0, -2.0, -1.0, 1.0, 2.0, 3.0, 4.0],
        weights: &[3.0, -32.0, 168.0, -672.0, 672.0, -168.0, 32.0, -3.0],
        divisor: 840.0,
    },
];

/// One sample of the mixed-partial stencil: offsets along `i` and `j`, and its weight.
pub(crate) type MixedSample = (f64, f64, f64);

/// 16-point mixed second-derivative stencil, divided by `600 h^2`.
///
/// ```text
/// -63 (f(1,-2) + f(2,-1) + f(-2,1) + f(-1,2))
/// +63 (f(-1,-2) + f(-2,-1) + f(1,2) + f(2,1))
/// +44 (f(2,-2) + f(-2,2) - f(-2,-2) - f(2,2))
/// +74 (f(-1,-1) + f(1,1) - f(1,-1) - f(-1,1))
/// ```
pub(crate) static MIXED_HESSIAN: [MixedSample; 16] = [
    (1.0, -2.0, -63.0),
    (2.0, -1.0, -63.0),
    (-2.0, 1.0, -63.0),
    (-1.0, 2.0, -63.0),
    (-1.0, -2.0, 63.0),
    (-2.0, -1.0, 63.0),
    (1.0, 2.0, 63.0),
    (2.0, 1.0, 63.0),
    (2.0, -2.0, 44.0),
    (-2.0, 2.0, 44.0),
    (-2.0, -2.0, -44.0),
    (2.0, 2.0, -44.0),
    (-1.0, -1.0, 74.0),
    (1.0, 1.0, 74.0),
    (1.0, -1.0, -74.0),
    (-1.0, 1.0, -74.0),
];

pub(crate) const MIXED_HESSIAN_DIVISOR: f64 = 600.0;
