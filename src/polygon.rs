use crate::geom::{BoundingBox, Point, Segment};
use crate::num::Float;

/// A simple, closed polyline.
///
/// A contour has no repeated points and its segments do not cross. The last
/// point connects back to the first; it is not repeated.
///
/// Contours nest: a polygon representing a square with a square hole has two
/// contours, and the hole's [`parent`](Self::parent) is the index of the
/// outer square. A contour at even nesting depth is an outer boundary and
/// winds counter-clockwise; a contour at odd depth is a hole and winds
/// clockwise.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Contour<F: Float> {
    /// The points making up this contour.
    pub points: Vec<Point<F>>,
    /// Indices (within the owning [`Polygon`]) of this contour's holes.
    pub holes: Vec<usize>,
    /// Index of the contour this one is a hole of, if any.
    pub parent: Option<usize>,
}

impl<F: Float> Contour<F> {
    /// Creates an empty contour.
    pub fn new() -> Self {
        Contour {
            points: Vec::new(),
            holes: Vec::new(),
            parent: None,
        }
    }

    /// Creates a contour from a vertex loop, with no parent and no holes.
    pub fn from_points(points: Vec<Point<F>>) -> Self {
        Contour {
            points,
            holes: Vec::new(),
            parent: None,
        }
    }

    /// Is this an outer contour (not a hole)?
    pub fn is_external(&self) -> bool {
        self.parent.is_none()
    }

    /// Twice the signed area of the contour: positive if it winds
    /// counter-clockwise.
    pub fn signed_double_area(&self) -> F {
        let mut sum = F::from_f32(0.0);
        for (p, q) in self.edges() {
            sum = sum + (p.x.clone() * &q.y - q.x.clone() * &p.y);
        }
        sum
    }

    /// Does the contour wind counter-clockwise?
    pub fn is_counterclockwise(&self) -> bool {
        self.signed_double_area() > F::from_f32(0.0)
    }

    /// Reverses the winding direction.
    pub fn reverse(&mut self) {
        self.points.reverse();
    }

    /// Makes the contour wind counter-clockwise.
    pub fn set_counterclockwise(&mut self) {
        if !self.is_counterclockwise() {
            self.reverse();
        }
    }

    /// Makes the contour wind clockwise.
    pub fn set_clockwise(&mut self) {
        if self.is_counterclockwise() {
            self.reverse();
        }
    }

    /// The smallest axis-aligned box containing the contour.
    pub fn bounding_box(&self) -> Option<BoundingBox<F>> {
        BoundingBox::of_points(&self.points)
    }

    /// The edges of the contour, including the closing edge from the last
    /// point back to the first.
    pub fn edges(&self) -> impl Iterator<Item = (&Point<F>, &Point<F>)> {
        let pts = &self.points;
        pts.iter()
            .zip(pts.iter().cycle().skip(1))
            .take(pts.len())
    }
}

impl<F: Float> Default for Contour<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// A collection of [`Contour`]s: the boundary of a (possibly disconnected,
/// possibly holed) region of the plane.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Polygon<F: Float> {
    /// The contours. Hole/parent links index into this vector.
    pub contours: Vec<Contour<F>>,
}

impl<F: Float> Polygon<F> {
    /// Creates an empty polygon.
    pub fn new() -> Self {
        Polygon {
            contours: Vec::new(),
        }
    }

    /// A polygon with no points at all.
    pub fn is_empty(&self) -> bool {
        self.contours.iter().all(|c| c.points.is_empty())
    }

    /// The smallest axis-aligned box containing every contour.
    pub fn bounding_box(&self) -> Option<BoundingBox<F>> {
        let mut boxes = self.contours.iter().filter_map(Contour::bounding_box);
        let first = boxes.next()?;
        Some(boxes.fold(first, |acc, b| acc.union(&b)))
    }

    /// Twice the signed area of the region: outer contours add, holes
    /// subtract.
    pub fn signed_double_area(&self) -> F {
        let mut sum = F::from_f32(0.0);
        for c in &self.contours {
            sum = sum + c.signed_double_area();
        }
        sum
    }

    /// Appends the contours of `other`, re-basing its hole and parent
    /// indices.
    pub fn join(&mut self, other: Polygon<F>) {
        let offset = self.contours.len();
        for mut contour in other.contours {
            for hole in &mut contour.holes {
                *hole += offset;
            }
            if let Some(parent) = &mut contour.parent {
                *parent += offset;
            }
            self.contours.push(contour);
        }
    }

    /// Derives the nesting structure of untagged contours.
    ///
    /// Input files carry contours as bare vertex loops; this classifies each
    /// contour as an outer boundary or a hole by even-odd nesting, fills in
    /// [`Contour::parent`] and [`Contour::holes`], and orients outers
    /// counter-clockwise and holes clockwise. Contours must be disjoint
    /// apart from isolated touching points.
    pub fn compute_nesting(&mut self) {
        for contour in &mut self.contours {
            contour.set_counterclockwise();
            contour.holes.clear();
            contour.parent = None;
        }
        if self.contours.len() < 2 {
            return;
        }

        // Non-vertical edges, with a flag for whether the contour interior
        // lies below the edge (a "top" edge of its contour).
        let mut edges: Vec<(Segment<F>, usize, bool)> = Vec::new();
        for (ci, contour) in self.contours.iter().enumerate() {
            for (p, q) in contour.edges() {
                if p == q || p.x == q.x {
                    continue;
                }
                let (seg, forward) = Segment::from_unordered_points(p.clone(), q.clone());
                edges.push((seg, ci, !forward));
            }
        }

        // Endpoints in sweep order; right endpoints sort before left
        // endpoints at the same point so a closing edge is retired before
        // the next one opens.
        let mut endpoints: Vec<(Point<F>, bool, usize)> = Vec::with_capacity(edges.len() * 2);
        for (i, (seg, _, _)) in edges.iter().enumerate() {
            endpoints.push((seg.left.clone(), true, i));
            endpoints.push((seg.right.clone(), false, i));
        }
        endpoints.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

        // Sweep left to right. When a contour's first (leftmost) endpoint
        // appears, the nearest active edge below it tells us where the
        // contour sits: below a bottom edge of contour `q` means inside `q`,
        // below a top edge means beside `q` (same parent as `q`).
        let y_at = |seg: &Segment<F>, x: &F| -> F {
            let t = (x.clone() - &seg.left.x) / (seg.right.x.clone() - &seg.left.x);
            seg.left.y.clone() + t * (seg.right.y.clone() - &seg.left.y)
        };
        let mut active: Vec<usize> = Vec::new();
        let mut seen = vec![false; self.contours.len()];
        let mut parents: Vec<Option<usize>> = vec![None; self.contours.len()];
        for (point, is_left, ei) in &endpoints {
            if !*is_left {
                active.retain(|j| j != ei);
                continue;
            }
            let ci = edges[*ei].1;
            if !seen[ci] {
                seen[ci] = true;
                let mut best: Option<(usize, F)> = None;
                for &j in &active {
                    if edges[j].1 == ci {
                        continue;
                    }
                    let yj = y_at(&edges[j].0, &point.x);
                    if yj <= point.y && best.as_ref().map_or(true, |(_, by)| yj > *by) {
                        best = Some((j, yj));
                    }
                }
                if let Some((j, _)) = best {
                    let (_, cj, top) = &edges[j];
                    parents[ci] = if *top { parents[*cj] } else { Some(*cj) };
                }
            }
            active.push(*ei);
        }

        for ci in 0..self.contours.len() {
            let Some(parent) = parents[ci] else { continue };
            self.contours[ci].parent = Some(parent);
            self.contours[parent].holes.push(ci);
            let mut depth = 0;
            let mut up = Some(parent);
            while let Some(p) = up {
                depth += 1;
                up = parents[p];
            }
            if depth % 2 == 1 {
                self.contours[ci].set_clockwise();
            }
        }
    }
}

impl<F: Float> Default for Polygon<F> {
    fn default() -> Self {
        Self::new()
    }
}
