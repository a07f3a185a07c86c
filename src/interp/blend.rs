use crate::{
    foundation::core::{BezPath, PathEl},
    foundation::error::{PathError, PathResult},
};

/// Pointwise blend of two structurally identical outlines.
///
/// `weight == 0` yields `from`, `weight == 1` yields `to`. Outlines must have the same
/// element sequence; build them with [`crate::reconcile`] first.
pub fn interpolate_outlines(from: &BezPath, to: &BezPath, weight: f64) -> PathResult<BezPath> {
    if !(0.0..=1.0).contains(&weight) {
        return Err(PathError::validation(format!(
            "blend weight {weight} is outside [0, 1]"
        )));
    }
    let (a, b) = (from.elements(), to.elements());
    if a.len() != b.len() {
        return Err(PathError::consistency(format!(
            "outlines have {} and {} elements",
            a.len(),
            b.len()
        )));
    }

    let mut out = BezPath::new();
    for (i, (x, y)) in a.iter().zip(b).enumerate() {
        let el = match (*x, *y) {
            (PathEl::MoveTo(p), PathEl::MoveTo(q)) => PathEl::MoveTo(p.lerp(q, weight)),
            (PathEl::LineTo(p), PathEl::LineTo(q)) => PathEl::LineTo(p.lerp(q, weight)),
            (PathEl::QuadTo(p1, p2), PathEl::QuadTo(q1, q2)) => {
                PathEl::QuadTo(p1.lerp(q1, weight), p2.lerp(q2, weight))
            }
            (PathEl::CurveTo(p1, p2, p3), PathEl::CurveTo(q1, q2, q3)) => PathEl::CurveTo(
                p1.lerp(q1, weight),
                p2.lerp(q2, weight),
                p3.lerp(q3, weight),
            ),
            (PathEl::ClosePath, PathEl::ClosePath) => PathEl::ClosePath,
            (x, y) => {
                return Err(PathError::consistency(format!(
                    "element {i} differs in kind: {x:?} vs {y:?}"
                )));
            }
        };
        out.push(el);
    }
    Ok(out)
}

/// True when both outlines have the same element kinds in the same order.
pub fn outlines_match(a: &BezPath, b: &BezPath) -> bool {
    a.elements().len() == b.elements().len()
        && a
            .elements()
            .iter()
            .zip(b.elements())
            .all(|(x, y)| std::mem::discriminant(x) == std::mem::discriminant(y))
}
