pub use kurbo::{BezPath, CubicBez, ParamCurve, PathEl, Point, Vec2};

/// Tolerance used when comparing curve parameters and positions.
pub const EPSILON: f64 = 1e-9;

/// Cubic Bezier spanning two anchors, built from the outgoing handle of `from`
/// and the incoming handle of `to`.
pub fn cubic_between(from_p1: Point, from_c2: Point, to_c0: Point, to_p1: Point) -> CubicBez {
    CubicBez::new(from_p1, from_c2, to_c0, to_p1)
}
