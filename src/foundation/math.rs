use crate::foundation::core::{CubicBez, EPSILON};

/// Map `t` from the absolute range `[min, max]` into `[0, 1]`.
///
/// Degenerate ranges map everything to `0`. The result is clamped.
pub(crate) fn map_t_to_fragment(min: f64, max: f64, t: f64) -> f64 {
    let span = max - min;
    if span.abs() <= EPSILON {
        return 0.0;
    }
    ((t - min) / span).clamp(0.0, 1.0)
}

/// De Casteljau subdivision of `c` at `t`.
///
/// Both halves share the exact same split point, so chaining them never opens a gap.
pub(crate) fn split_cubic(c: CubicBez, t: f64) -> (CubicBez, CubicBez) {
    let t = t.clamp(0.0, 1.0);
    let p01 = c.p0.lerp(c.p1, t);
    let p12 = c.p1.lerp(c.p2, t);
    let p23 = c.p2.lerp(c.p3, t);
    let p012 = p01.lerp(p12, t);
    let p123 = p12.lerp(p23, t);
    let mid = p012.lerp(p123, t);
    (
        CubicBez::new(c.p0, p01, p012, mid),
        CubicBez::new(mid, p123, p23, c.p3),
    )
}
