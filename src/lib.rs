#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

mod geom;
pub mod io;
mod num;
mod polygon;
mod sweep;
mod topology;

pub use geom::{intersect, signed_area, BoundingBox, Point, Segment, SegmentIntersection, Vector};
pub use num::Float;
pub use polygon::{Contour, Polygon};
pub use sweep::Sweeper;

/// Binary operations between the regions bounded by two polygons.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, serde::Serialize)]
pub enum BooleanOp {
    /// A point is in the intersection if it is in both regions.
    Intersection,
    /// A point is in the union if it is in either region.
    Union,
    /// A point is in the difference if it is in the subject but not the
    /// clipping region.
    Difference,
    /// A point is in the exclusive-or if it is in exactly one region.
    Xor,
}

/// Ways a boolean operation can fail.
///
/// All failures are terminal: no partial result is produced.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, thiserror::Error)]
pub enum Error {
    /// Two edges of the same input polygon overlap along a segment, which
    /// makes the interior of that polygon ill-defined.
    #[error("overlapping edges within one input polygon")]
    SelfOverlap,
    /// The sweep lost track of an edge it was holding, or a contour walk
    /// ran out of edges at a shared vertex. This cannot happen with exact
    /// (`Rational`) coordinates; with floats it means the input was too
    /// hard for the precision available.
    #[error("geometric predicates gave inconsistent answers; try exact coordinates")]
    Inconsistency,
}

/// Computes a boolean operation between the regions bounded by two polygons.
///
/// Outer contours of the result wind counter-clockwise and holes wind
/// clockwise, with [`Contour::parent`] and [`Contour::holes`] linking them
/// up. The computation is deterministic: the same inputs produce the same
/// output, vertex for vertex.
///
/// Inputs may touch, overlap, share edges, or coincide. Contours of a
/// single input must not cross each other or themselves; edges of the same
/// input that overlap are rejected with [`Error::SelfOverlap`].
pub fn boolean_op<F: Float>(
    subject: &Polygon<F>,
    clipping: &Polygon<F>,
    op: BooleanOp,
) -> Result<Polygon<F>, Error> {
    // An empty input makes the answer one of the inputs (or nothing).
    let (Some(subject_box), Some(clipping_box)) = (subject.bounding_box(), clipping.bounding_box())
    else {
        return Ok(match op {
            BooleanOp::Intersection => Polygon::new(),
            BooleanOp::Difference => subject.clone(),
            BooleanOp::Union | BooleanOp::Xor => {
                if subject.is_empty() {
                    clipping.clone()
                } else {
                    subject.clone()
                }
            }
        });
    };

    // Disjoint bounding boxes: the regions don't interact.
    if !subject_box.intersects(&clipping_box) {
        return Ok(match op {
            BooleanOp::Intersection => Polygon::new(),
            BooleanOp::Difference => subject.clone(),
            BooleanOp::Union | BooleanOp::Xor => {
                let mut ret = subject.clone();
                ret.join(clipping.clone());
                ret
            }
        });
    }

    let mut sweeper = Sweeper::new(subject, clipping, op);
    sweeper.run()?;
    sweeper.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ordered_float::NotNan;

    type F = NotNan<f64>;

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon<F> {
        let p = |x: f64, y: f64| Point {
            x: NotNan::new(x).unwrap(),
            y: NotNan::new(y).unwrap(),
        };
        Polygon {
            contours: vec![Contour::from_points(vec![
                p(x0, y0),
                p(x1, y0),
                p(x1, y1),
                p(x0, y1),
            ])],
        }
    }

    #[test]
    fn empty_inputs_are_trivial() {
        let s = square(0.0, 0.0, 1.0, 1.0);
        let empty = Polygon::new();

        assert!(boolean_op(&s, &empty, BooleanOp::Intersection)
            .unwrap()
            .is_empty());
        assert_eq!(boolean_op(&s, &empty, BooleanOp::Union).unwrap(), s);
        assert_eq!(boolean_op(&s, &empty, BooleanOp::Difference).unwrap(), s);
        assert_eq!(boolean_op(&s, &empty, BooleanOp::Xor).unwrap(), s);
        assert_eq!(boolean_op(&empty, &s, BooleanOp::Union).unwrap(), s);
        assert!(boolean_op(&empty, &s, BooleanOp::Difference)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn disjoint_boxes_are_trivial() {
        let s = square(0.0, 0.0, 1.0, 1.0);
        let c = square(5.0, 5.0, 6.0, 6.0);

        assert!(boolean_op(&s, &c, BooleanOp::Intersection)
            .unwrap()
            .is_empty());
        assert_eq!(boolean_op(&s, &c, BooleanOp::Difference).unwrap(), s);
        let union = boolean_op(&s, &c, BooleanOp::Union).unwrap();
        assert_eq!(union.contours.len(), 2);
    }

    #[test]
    fn float_coordinates_work_on_tame_input() {
        let s = square(0.0, 0.0, 2.0, 2.0);
        let c = square(1.0, 1.0, 3.0, 3.0);
        let inter = boolean_op(&s, &c, BooleanOp::Intersection).unwrap();
        assert_eq!(inter.contours.len(), 1);
        assert_eq!(
            inter.signed_double_area(),
            NotNan::new(2.0).unwrap()
        );
    }

    #[test]
    fn self_overlap_is_rejected() {
        let p = |x: f64, y: f64| Point {
            x: NotNan::new(x).unwrap(),
            y: NotNan::new(y).unwrap(),
        };
        // Two subject squares sharing the edge x = 1: their boundaries
        // overlap along a segment.
        let subject = Polygon {
            contours: vec![
                Contour::from_points(vec![p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)]),
                Contour::from_points(vec![p(1.0, 0.0), p(2.0, 0.0), p(2.0, 1.0), p(1.0, 1.0)]),
            ],
        };
        let clipping = square(0.0, 0.0, 3.0, 2.0);
        assert_eq!(
            boolean_op(&subject, &clipping, BooleanOp::Intersection),
            Err(Error::SelfOverlap)
        );
    }
}
