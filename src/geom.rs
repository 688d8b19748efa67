use std::cmp::Ordering;

use crate::num::Float;

// Points are sorted by `x` and then by `y`: the order in which a
// left-to-right sweep encounters them.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct Point<F: Float> {
    /// The horizontal coordinate.
    pub x: F,
    /// The vertical coordinate.
    pub y: F,
}

impl<F: Float> std::fmt::Debug for Point<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:?}, {:?})", self.x, self.y)
    }
}

impl<F: Float> Point<F> {
    /// Creates a point from `f32` coordinates.
    pub fn new(x: f32, y: f32) -> Self {
        Point {
            x: F::from_f32(x),
            y: F::from_f32(y),
        }
    }

    /// The convex combination `(1 - t) * self + t * other`.
    pub fn affine(&self, other: &Self, t: &F) -> Self {
        let one = F::from_f32(1.0);
        Point {
            x: (one.clone() - t) * &self.x + t.clone() * &other.x,
            y: (one - t) * &self.y + t.clone() * &other.y,
        }
    }
}

impl<F: Float> std::ops::Sub for Point<F> {
    type Output = Vector<F>;

    fn sub(self, rhs: Self) -> Self::Output {
        Vector {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

/// The difference of two [`Point`]s.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Vector<F: Float> {
    /// The horizontal component.
    pub x: F,
    /// The vertical component.
    pub y: F,
}

impl<F: Float> Vector<F> {
    /// The cross product `self.x * other.y - self.y * other.x`.
    pub fn cross(&self, other: &Vector<F>) -> F {
        self.x.clone() * &other.y - self.y.clone() * &other.x
    }
}

/// Twice the signed area of the triangle `(a, b, c)`.
///
/// Positive iff `c` lies strictly to the left of the oriented line from `a`
/// to `b`. This is the one side-of-line predicate everything else is built
/// on; keeping it singular keeps the sweep's comparators consistent with
/// each other.
pub fn signed_area<F: Float>(a: &Point<F>, b: &Point<F>, c: &Point<F>) -> F {
    (a.x.clone() - &c.x) * (b.y.clone() - &c.y) - (b.x.clone() - &c.x) * (a.y.clone() - &c.y)
}

// The left endpoint of a segment is always less than its right endpoint.
// This is the right representation for the sweep, but callers that care
// about the original traversal direction need to track it themselves.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Segment<F: Float> {
    /// The smaller endpoint, in sweep order.
    pub left: Point<F>,
    /// The larger endpoint, in sweep order.
    pub right: Point<F>,
}

impl<F: Float> std::fmt::Debug for Segment<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} -- {:?}", self.left, self.right)
    }
}

impl<F: Float> Segment<F> {
    /// The second return value is true if the original point order was preserved.
    ///
    /// Panics if the points are equal.
    pub fn from_unordered_points(p0: Point<F>, p1: Point<F>) -> (Segment<F>, bool) {
        match p0.cmp(&p1) {
            Ordering::Less => (Segment { left: p0, right: p1 }, true),
            Ordering::Greater => (Segment { left: p1, right: p0 }, false),
            Ordering::Equal => panic!("empty segment"),
        }
    }

    /// Is this segment vertical?
    pub fn is_vertical(&self) -> bool {
        self.left.x == self.right.x
    }

    fn eval(&self, t: &F) -> Point<F> {
        self.left.affine(&self.right, t)
    }
}

/// How two segments intersect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SegmentIntersection<F: Float> {
    /// The segments don't meet.
    None,
    /// The segments meet at a single point.
    Point(Point<F>),
    /// The segments are collinear and share more than one point; the two
    /// points delimit the shared part, in sweep order.
    Overlap(Point<F>, Point<F>),
}

/// Intersects two segments.
pub fn intersect<F: Float>(a: &Segment<F>, b: &Segment<F>) -> SegmentIntersection<F> {
    let zero = F::from_f32(0.0);
    let one = F::from_f32(1.0);
    let d0 = a.right.clone() - a.left.clone();
    let d1 = b.right.clone() - b.left.clone();
    let sep = b.left.clone() - a.left.clone();

    let kross = d0.cross(&d1);
    if kross != zero {
        // The supporting lines cross; check that the crossing lies within
        // both parameter ranges.
        let s = sep.cross(&d1) / kross.clone();
        if s < zero || s > one {
            return SegmentIntersection::None;
        }
        let t = sep.cross(&d0) / kross;
        if t < zero || t > one {
            return SegmentIntersection::None;
        }
        return SegmentIntersection::Point(a.eval(&s));
    }

    if sep.cross(&d0) != zero {
        // Parallel but not collinear.
        return SegmentIntersection::None;
    }

    // Collinear. On a common line, sweep order and order along the line
    // agree, so the shared part is delimited by the larger left endpoint
    // and the smaller right endpoint.
    let lo = if a.left < b.left { &b.left } else { &a.left };
    let hi = if a.right < b.right { &a.right } else { &b.right };
    match lo.cmp(hi) {
        Ordering::Greater => SegmentIntersection::None,
        Ordering::Equal => SegmentIntersection::Point(lo.clone()),
        Ordering::Less => SegmentIntersection::Overlap(lo.clone(), hi.clone()),
    }
}

/// An axis-aligned bounding box.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct BoundingBox<F: Float> {
    /// The corner with the smallest coordinates.
    pub min: Point<F>,
    /// The corner with the largest coordinates.
    pub max: Point<F>,
}

impl<F: Float> BoundingBox<F> {
    /// The smallest box containing all of `points`, or `None` if there are none.
    pub fn of_points<'a>(points: impl IntoIterator<Item = &'a Point<F>>) -> Option<Self>
    where
        F: 'a,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut ret = BoundingBox {
            min: first.clone(),
            max: first.clone(),
        };
        for p in points {
            if p.x < ret.min.x {
                ret.min.x = p.x.clone();
            }
            if p.y < ret.min.y {
                ret.min.y = p.y.clone();
            }
            if p.x > ret.max.x {
                ret.max.x = p.x.clone();
            }
            if p.y > ret.max.y {
                ret.max.y = p.y.clone();
            }
        }
        Some(ret)
    }

    /// The smallest box containing both boxes.
    pub fn union(mut self, other: &Self) -> Self {
        if other.min.x < self.min.x {
            self.min.x = other.min.x.clone();
        }
        if other.min.y < self.min.y {
            self.min.y = other.min.y.clone();
        }
        if other.max.x > self.max.x {
            self.max.x = other.max.x.clone();
        }
        if other.max.y > self.max.y {
            self.max.y = other.max.y.clone();
        }
        self
    }

    /// Do the boxes share at least one point? Touching counts.
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }
}
