//! Phase one of a boolean operation: the plane sweep.
//!
//! A vertical line sweeps left to right over both input polygons at once.
//! Edge endpoints (and, as they are discovered, intersection points) are
//! processed in a canonical order; every crossing pair of edges is split at
//! the crossing before both pieces are active, so the set of edges cut by
//! the sweep line is totally ordered by height at all times. Each surviving
//! edge is classified by whether the region just above it lies inside each
//! input polygon, which is what the result-membership rules in
//! [`Sweeper::in_result`] consume.

use std::cmp::Ordering;

use crate::geom::{intersect, signed_area, Point, Segment, SegmentIntersection};
use crate::num::Float;
use crate::polygon::{Contour, Polygon};
use crate::topology::connect_edges;
use crate::{BooleanOp, Error};

/// Which input polygon an edge belongs to.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub(crate) enum PolygonRole {
    Subject,
    Clipping,
}

/// Classification of an edge with respect to coincident edges from the other
/// polygon.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub(crate) enum EdgeKind {
    /// An ordinary edge; membership is decided by `other_in_out`.
    Normal,
    /// A duplicate of a coincident edge; never in the result.
    NonContributing,
    /// Coincident with an edge of the other polygon, interiors on the same
    /// side.
    SameTransition,
    /// Coincident with an edge of the other polygon, interiors on opposite
    /// sides.
    DifferentTransition,
}

/// An index into the event arena.
///
/// Events refer to each other only through these, so the arena can grow
/// (segment subdivision adds events mid-sweep) without invalidating
/// anything.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct EventIdx(usize);

pub(crate) struct SweepEvent<F: Float> {
    pub point: Point<F>,
    /// Is `point` the left endpoint of the edge?
    pub left: bool,
    /// The event for the opposite endpoint.
    pub other: EventIdx,
    pub role: PolygonRole,
    pub kind: EdgeKind,
    // The remaining fields are meaningful on left events only.
    /// Does a vertical ray going up from inside the edge leave the edge's
    /// own polygon?
    pub in_out: bool,
    /// The in/out flag that the nearest edge below induces for the other
    /// polygon.
    pub other_in_out: bool,
    /// The nearest edge below this one that is in the result.
    pub prev_in_result: Option<EventIdx>,
    /// Is this edge part of the result?
    pub in_result: bool,
    // Fields used by contour assembly.
    /// Index of the partner event in the sorted result-event vector.
    pub pos: usize,
    /// Was the edge traversed right-to-left when its contour was walked?
    pub result_in_out: bool,
    /// The contour the edge was assigned to.
    pub contour_id: usize,
}

impl<F: Float> SweepEvent<F> {
    fn new(point: Point<F>, left: bool, other: EventIdx, role: PolygonRole) -> Self {
        SweepEvent {
            point,
            left,
            other,
            role,
            kind: EdgeKind::Normal,
            in_out: false,
            other_in_out: false,
            prev_in_result: None,
            in_result: false,
            pos: 0,
            result_in_out: false,
            contour_id: 0,
        }
    }
}

/// Owns every event of one computation. Stable: events are never removed.
pub(crate) struct EventArena<F: Float> {
    events: Vec<SweepEvent<F>>,
}

impl<F: Float> Default for EventArena<F> {
    fn default() -> Self {
        EventArena { events: Vec::new() }
    }
}

impl<F: Float> std::ops::Index<EventIdx> for EventArena<F> {
    type Output = SweepEvent<F>;

    fn index(&self, index: EventIdx) -> &SweepEvent<F> {
        &self.events[index.0]
    }
}

impl<F: Float> std::ops::IndexMut<EventIdx> for EventArena<F> {
    fn index_mut(&mut self, index: EventIdx) -> &mut SweepEvent<F> {
        &mut self.events[index.0]
    }
}

impl<F: Float> EventArena<F> {
    fn push(&mut self, event: SweepEvent<F>) -> EventIdx {
        self.events.push(event);
        EventIdx(self.events.len() - 1)
    }

    /// Creates the mutually-linked pair of events for one edge.
    fn pair(&mut self, p: Point<F>, q: Point<F>, role: PolygonRole) -> (EventIdx, EventIdx) {
        let (left_pt, right_pt) = if p < q { (p, q) } else { (q, p) };
        let l = EventIdx(self.events.len());
        let r = EventIdx(self.events.len() + 1);
        self.push(SweepEvent::new(left_pt, true, r, role));
        self.push(SweepEvent::new(right_pt, false, l, role));
        (l, r)
    }

    fn segment(&self, e: EventIdx) -> Segment<F> {
        let ev = &self[e];
        let other = &self[ev.other];
        if ev.left {
            Segment {
                left: ev.point.clone(),
                right: other.point.clone(),
            }
        } else {
            Segment {
                left: other.point.clone(),
                right: ev.point.clone(),
            }
        }
    }

    fn vertical(&self, e: EventIdx) -> bool {
        self[e].point.x == self[self[e].other].point.x
    }

    /// Is the segment of `e` below the point `p`?
    fn below(&self, e: EventIdx, p: &Point<F>) -> bool {
        let ev = &self[e];
        let other = &self[ev.other];
        let area = if ev.left {
            signed_area(&ev.point, &other.point, p)
        } else {
            signed_area(&other.point, &ev.point, p)
        };
        area > F::from_f32(0.0)
    }
}

/// The order in which events leave the queue.
///
/// Earlier-processed compares `Less`: by x, then y, then right endpoints
/// before left endpoints (an edge ending at a point is retired before one
/// starting there is admitted), then the event whose edge is lower just
/// after the shared point, then clipping before subject, then creation
/// order.
pub(crate) fn queue_order<F: Float>(arena: &EventArena<F>, a: EventIdx, b: EventIdx) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }
    let ea = &arena[a];
    let eb = &arena[b];
    ea.point
        .x
        .cmp(&eb.point.x)
        .then_with(|| ea.point.y.cmp(&eb.point.y))
        .then_with(|| ea.left.cmp(&eb.left))
        .then_with(|| {
            let (la, ra) = if ea.left {
                (&ea.point, &arena[ea.other].point)
            } else {
                (&arena[ea.other].point, &ea.point)
            };
            let area = signed_area(la, ra, &arena[eb.other].point);
            match area.cmp(&F::from_f32(0.0)) {
                // b's far endpoint is above a's edge: a is the lower edge.
                Ordering::Greater => Ordering::Less,
                Ordering::Less => Ordering::Greater,
                Ordering::Equal => Ordering::Equal,
            }
        })
        .then_with(|| match (ea.role, eb.role) {
            (PolygonRole::Clipping, PolygonRole::Subject) => Ordering::Less,
            (PolygonRole::Subject, PolygonRole::Clipping) => Ordering::Greater,
            _ => Ordering::Equal,
        })
        .then_with(|| a.cmp(&b))
}

/// The vertical order of two active left events along the sweep line.
///
/// This must be a strict weak order at every sweep position. It is, because
/// edges are split at crossings before both halves are active: two active
/// edges either miss each other, touch at endpoints, or are collinear.
pub(crate) fn status_order<F: Float>(arena: &EventArena<F>, a: EventIdx, b: EventIdx) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }
    let zero = F::from_f32(0.0);
    let ea = &arena[a];
    let eb = &arena[b];
    let a_other = &arena[ea.other].point;
    let b_other = &arena[eb.other].point;

    let collinear = signed_area(&ea.point, a_other, &eb.point) == zero
        && signed_area(&ea.point, a_other, b_other) == zero;
    if !collinear {
        if ea.point == eb.point {
            // Shared left endpoint: the edge whose far end is below the
            // other's line is the lower one.
            return if arena.below(a, b_other) {
                Ordering::Less
            } else {
                Ordering::Greater
            };
        }
        // Distinct left endpoints: let the earlier-inserted edge judge the
        // later one's position against its own line.
        return if queue_order(arena, a, b) == Ordering::Less {
            if arena.below(a, &eb.point) {
                Ordering::Less
            } else {
                Ordering::Greater
            }
        } else if signed_area(&eb.point, b_other, &ea.point) < zero {
            // `a`'s left endpoint is strictly below `b`'s line.
            Ordering::Less
        } else {
            Ordering::Greater
        };
    }

    // Collinear edges: subject below clipping; same-role edges sharing a
    // left endpoint order by their right endpoints, others by their left.
    match (ea.role, eb.role) {
        (PolygonRole::Subject, PolygonRole::Clipping) => Ordering::Less,
        (PolygonRole::Clipping, PolygonRole::Subject) => Ordering::Greater,
        _ => {
            if ea.point == eb.point {
                queue_order(arena, ea.other, eb.other)
            } else {
                queue_order(arena, a, b)
            }
        }
    }
}

/// A min-heap of event indices keyed by [`queue_order`].
///
/// `std::collections::BinaryHeap` can't be used here: the order of two
/// events lives in the arena, out of reach of an `Ord` impl on the indices.
#[derive(Default)]
struct EventQueue {
    heap: Vec<EventIdx>,
}

impl EventQueue {
    fn push<F: Float>(&mut self, arena: &EventArena<F>, e: EventIdx) {
        self.heap.push(e);
        let mut i = self.heap.len() - 1;
        while i > 0 {
            let parent = (i - 1) / 2;
            if queue_order(arena, self.heap[i], self.heap[parent]) == Ordering::Less {
                self.heap.swap(i, parent);
                i = parent;
            } else {
                break;
            }
        }
    }

    fn pop<F: Float>(&mut self, arena: &EventArena<F>) -> Option<EventIdx> {
        if self.heap.is_empty() {
            return None;
        }
        let last = self.heap.len() - 1;
        self.heap.swap(0, last);
        let top = self.heap.pop();
        let mut i = 0;
        loop {
            let mut smallest = i;
            for child in [2 * i + 1, 2 * i + 2] {
                if child < self.heap.len()
                    && queue_order(arena, self.heap[child], self.heap[smallest]) == Ordering::Less
                {
                    smallest = child;
                }
            }
            if smallest == i {
                break;
            }
            self.heap.swap(i, smallest);
            i = smallest;
        }
        top
    }
}

/// The left events whose edges currently cross the sweep line, bottom to
/// top.
///
/// Kept as a vector sorted by [`status_order`]; positions are re-found by
/// binary search rather than stored, so insertions never invalidate
/// anything. Splitting an edge shortens it along its own line, which leaves
/// its order unchanged, so stored entries stay sorted.
#[derive(Default)]
struct StatusLine {
    entries: Vec<EventIdx>,
}

impl StatusLine {
    fn insert<F: Float>(&mut self, arena: &EventArena<F>, e: EventIdx) -> usize {
        let i = self
            .entries
            .partition_point(|&s| status_order(arena, s, e) == Ordering::Less);
        self.entries.insert(i, e);
        i
    }

    fn find<F: Float>(&self, arena: &EventArena<F>, e: EventIdx) -> Option<usize> {
        let i = self
            .entries
            .partition_point(|&s| status_order(arena, s, e) == Ordering::Less);
        if self.entries.get(i) == Some(&e) {
            return Some(i);
        }
        // Inconsistent predicates (possible with float coordinates) can
        // leave the entry away from where the comparator expects it.
        self.entries.iter().position(|&s| s == e)
    }

    fn get(&self, i: usize) -> Option<EventIdx> {
        self.entries.get(i).copied()
    }

    fn prev(&self, i: usize) -> Option<EventIdx> {
        i.checked_sub(1).and_then(|j| self.get(j))
    }
}

/// The sweep itself.
///
/// [`Sweeper::run`] drives it to completion; [`Sweeper::step`] processes a
/// single event, which is useful for harnesses that want to watch the sweep
/// advance. [`Sweeper::finish`] assembles the result contours.
pub struct Sweeper<F: Float> {
    arena: EventArena<F>,
    queue: EventQueue,
    status: StatusLine,
    /// Every processed event, in processing order.
    sorted_events: Vec<EventIdx>,
    op: BooleanOp,
    /// No event to the right of this x can contribute to the result.
    cutoff: Option<F>,
    done: bool,
}

impl<F: Float> Sweeper<F> {
    /// Creates a sweep over the edges of both polygons.
    ///
    /// Zero-length edges are skipped; they bound no area.
    pub fn new(subject: &Polygon<F>, clipping: &Polygon<F>, op: BooleanOp) -> Self {
        let mut ret = Sweeper {
            arena: EventArena::default(),
            queue: EventQueue::default(),
            status: StatusLine::default(),
            sorted_events: Vec::new(),
            op,
            cutoff: None,
            done: false,
        };
        for contour in &subject.contours {
            ret.add_contour(contour, PolygonRole::Subject);
        }
        for contour in &clipping.contours {
            ret.add_contour(contour, PolygonRole::Clipping);
        }
        ret.cutoff = match (op, subject.bounding_box(), clipping.bounding_box()) {
            (BooleanOp::Intersection, Some(s), Some(c)) => Some(s.max.x.min(c.max.x)),
            (BooleanOp::Difference, Some(s), _) => Some(s.max.x),
            _ => None,
        };
        ret
    }

    fn add_contour(&mut self, contour: &Contour<F>, role: PolygonRole) {
        for (p, q) in contour.edges() {
            if p == q {
                continue;
            }
            let (l, r) = self.arena.pair(p.clone(), q.clone(), role);
            self.queue.push(&self.arena, l);
            self.queue.push(&self.arena, r);
        }
    }

    /// Processes one event. Returns `false` when the sweep is complete.
    pub fn step(&mut self) -> Result<bool, Error> {
        if self.done {
            return Ok(false);
        }
        let Some(e) = self.queue.pop(&self.arena) else {
            self.done = true;
            return Ok(false);
        };
        if let Some(cutoff) = &self.cutoff {
            if self.arena[e].point.x > *cutoff {
                self.done = true;
                return Ok(false);
            }
        }
        self.sorted_events.push(e);
        if self.arena[e].left {
            self.handle_left(e)?;
        } else {
            self.handle_right(e)?;
        }
        Ok(true)
    }

    /// Runs the sweep to completion.
    pub fn run(&mut self) -> Result<(), Error> {
        while self.step()? {}
        Ok(())
    }

    /// Assembles the surviving edges into result contours.
    pub fn finish(mut self) -> Result<Polygon<F>, Error> {
        debug_assert!(self.done);
        connect_edges(&mut self.arena, &self.sorted_events)
    }

    fn handle_left(&mut self, e: EventIdx) -> Result<(), Error> {
        let i = self.status.insert(&self.arena, e);
        let prev = self.status.prev(i);
        let next = self.status.get(i + 1);

        self.compute_fields(e, prev);
        if let Some(next) = next {
            if self.possible_intersection(e, next)? == 2 {
                // The overlap re-tagged both edges, which can change their
                // membership in the result.
                self.compute_fields(e, prev);
                self.compute_fields(next, Some(e));
            }
        }
        if self.arena[e].kind == EdgeKind::NonContributing {
            return Ok(());
        }
        if let Some(prev) = prev {
            if self.possible_intersection(prev, e)? == 2 {
                let prev_prev = self.status.prev(i - 1);
                self.compute_fields(prev, prev_prev);
                self.compute_fields(e, Some(prev));
            }
        }
        Ok(())
    }

    fn handle_right(&mut self, e: EventIdx) -> Result<(), Error> {
        let left = self.arena[e].other;
        let Some(i) = self.status.find(&self.arena, left) else {
            return Err(Error::Inconsistency);
        };
        let prev = self.status.prev(i);
        let next = self.status.get(i + 1);
        self.status.entries.remove(i);
        if let (Some(prev), Some(next)) = (prev, next) {
            self.possible_intersection(prev, next)?;
        }
        Ok(())
    }

    /// Sets the in/out flags of a freshly-inserted left event from its
    /// neighbor just below.
    fn compute_fields(&mut self, e: EventIdx, prev: Option<EventIdx>) {
        let (in_out, other_in_out) = match prev {
            None => (false, true),
            Some(p) if self.arena[p].role == self.arena[e].role => {
                (!self.arena[p].in_out, self.arena[p].other_in_out)
            }
            Some(p) => {
                let other_in_out = if self.arena.vertical(p) {
                    !self.arena[p].in_out
                } else {
                    self.arena[p].in_out
                };
                (!self.arena[p].other_in_out, other_in_out)
            }
        };
        let prev_in_result = prev.and_then(|p| {
            if !self.in_result(p) || self.arena.vertical(p) {
                self.arena[p].prev_in_result
            } else {
                Some(p)
            }
        });

        let ev = &mut self.arena[e];
        ev.in_out = in_out;
        ev.other_in_out = other_in_out;
        ev.prev_in_result = prev_in_result;
        let in_result = self.in_result(e);
        self.arena[e].in_result = in_result;
    }

    /// Does the edge of left event `e` belong to the result?
    fn in_result(&self, e: EventIdx) -> bool {
        let ev = &self.arena[e];
        match ev.kind {
            EdgeKind::Normal => match self.op {
                BooleanOp::Intersection => !ev.other_in_out,
                BooleanOp::Union => ev.other_in_out,
                BooleanOp::Difference => (ev.role == PolygonRole::Subject) == ev.other_in_out,
                BooleanOp::Xor => true,
            },
            EdgeKind::SameTransition => {
                matches!(self.op, BooleanOp::Intersection | BooleanOp::Union)
            }
            EdgeKind::DifferentTransition => self.op == BooleanOp::Difference,
            EdgeKind::NonContributing => false,
        }
    }

    /// Intersects the edges of two status-adjacent left events, splitting
    /// them as needed. `le1` is the lower one. Returns the number of
    /// intersection points.
    fn possible_intersection(&mut self, le1: EventIdx, le2: EventIdx) -> Result<u8, Error> {
        let s1 = self.arena.segment(le1);
        let s2 = self.arena.segment(le2);
        match intersect(&s1, &s2) {
            SegmentIntersection::None => Ok(0),
            SegmentIntersection::Point(p) => {
                if self.arena[le1].point == self.arena[le2].point
                    || self.arena[self.arena[le1].other].point
                        == self.arena[self.arena[le2].other].point
                {
                    // Touching at a shared endpoint is not a crossing.
                    return Ok(0);
                }
                if p != s1.left && p != s1.right {
                    self.divide_segment(le1, p.clone());
                }
                if p != s2.left && p != s2.right {
                    self.divide_segment(le2, p);
                }
                Ok(1)
            }
            SegmentIntersection::Overlap(_, _) => {
                if self.arena[le1].role == self.arena[le2].role {
                    return Err(Error::SelfOverlap);
                }
                let r1 = self.arena[le1].other;
                let r2 = self.arena[le2].other;
                if s1.left == s2.left {
                    // The edges coincide from their shared left endpoint on.
                    // One copy carries the merged classification, the other
                    // is retired.
                    let same = self.arena[le1].in_out == self.arena[le2].in_out;
                    self.arena[le1].kind = if same {
                        EdgeKind::SameTransition
                    } else {
                        EdgeKind::DifferentTransition
                    };
                    self.arena[le2].kind = EdgeKind::NonContributing;
                    if s1.right != s2.right {
                        // Split the longer edge at the shorter's right end.
                        match queue_order(&self.arena, r1, r2) {
                            Ordering::Less => self.divide_segment(le2, s1.right),
                            Ordering::Greater => self.divide_segment(le1, s2.right),
                            Ordering::Equal => unreachable!("distinct points compare equal"),
                        }
                    }
                    return Ok(2);
                }
                if s1.right == s2.right {
                    // Shared right endpoint: the later-starting edge splits
                    // the earlier one; the coincident halves meet again at
                    // their shared left endpoint once both are active.
                    match queue_order(&self.arena, le1, le2) {
                        Ordering::Less => self.divide_segment(le1, s2.left),
                        Ordering::Greater => self.divide_segment(le2, s1.left),
                        Ordering::Equal => unreachable!("distinct points compare equal"),
                    }
                    return Ok(3);
                }
                // No shared endpoints: either a partial overlap or one edge
                // contains the other.
                let (first, second) = if queue_order(&self.arena, le1, le2) == Ordering::Less {
                    (le1, le2)
                } else {
                    (le2, le1)
                };
                let first_right = self.arena[first].other;
                let second_right = self.arena[second].other;
                match queue_order(&self.arena, first_right, second_right) {
                    Ordering::Less => {
                        // Partial overlap: each splits the other.
                        let split_at = self.arena[first_right].point.clone();
                        let second_left = self.arena[second].point.clone();
                        self.divide_segment(first, second_left);
                        self.divide_segment(second, split_at);
                    }
                    Ordering::Greater => {
                        // `first` contains `second`: split `first` at both of
                        // `second`'s endpoints. The second split applies to
                        // the right fragment, which the first split linked to
                        // `first`'s original right event.
                        let second_left = self.arena[second].point.clone();
                        let second_right_pt = self.arena[second_right].point.clone();
                        self.divide_segment(first, second_left);
                        let right_fragment = self.arena[first_right].other;
                        self.divide_segment(right_fragment, second_right_pt);
                    }
                    Ordering::Equal => unreachable!("shared right endpoints handled above"),
                }
                Ok(3)
            }
        }
    }

    /// Splits the edge of left event `le` at the interior point `p`.
    ///
    /// `le` keeps the left half; a fresh pair of events carries the right
    /// half.
    fn divide_segment(&mut self, le: EventIdx, p: Point<F>) {
        let role = self.arena[le].role;
        let old_right = self.arena[le].other;
        // Right event of the left half.
        let r = self.arena.push(SweepEvent::new(p.clone(), false, le, role));
        // Left event of the right half.
        let l = self.arena.push(SweepEvent::new(p, true, old_right, role));
        if queue_order(&self.arena, l, old_right) == Ordering::Greater {
            // Inexact coordinates can land the split on top of the right
            // endpoint; swapping the flags keeps queue discipline intact.
            self.arena[old_right].left = true;
            self.arena[l].left = false;
        }
        self.arena[le].other = r;
        self.arena[old_right].other = l;
        self.queue.push(&self.arena, l);
        self.queue.push(&self.arena, r);
    }
}
