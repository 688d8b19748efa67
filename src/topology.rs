//! Phase two of a boolean operation: stitching the surviving edges back
//! into contours.
//!
//! The sweep leaves behind a log of events in processing order, each left
//! event flagged with whether its edge belongs to the result. This module
//! filters that log down to result edges, sorts it, and walks it: starting
//! from the lowest unvisited endpoint, repeatedly jump to the current
//! edge's opposite endpoint and then thread onto the nearest unvisited
//! result edge sharing that point, until the walk closes. Each closed walk
//! is one contour; whether it is an outer boundary or a hole falls out of
//! the nearest result edge below its starting point.

use crate::num::Float;
use crate::polygon::{Contour, Polygon};
use crate::sweep::{queue_order, EventArena, EventIdx};
use crate::Error;

pub(crate) fn connect_edges<F: Float>(
    arena: &mut EventArena<F>,
    sorted_events: &[EventIdx],
) -> Result<Polygon<F>, Error> {
    // Keep both endpoints of every result edge.
    let mut result_events: Vec<EventIdx> = sorted_events
        .iter()
        .copied()
        .filter(|&e| {
            let ev = &arena[e];
            if ev.left {
                ev.in_result
            } else {
                arena[ev.other].in_result
            }
        })
        .collect();

    // The processing-order log is not quite sorted: an event created by a
    // split can have been pushed after an event it precedes.
    result_events.sort_by(|&a, &b| queue_order(arena, a, b));

    // Cross-link the two endpoints of each edge through their positions in
    // the sorted vector.
    for (i, &e) in result_events.iter().enumerate() {
        arena[e].pos = i;
        if !arena[e].left {
            let other = arena[e].other;
            let other_pos = arena[other].pos;
            arena[other].pos = i;
            arena[e].pos = other_pos;
        }
    }

    let mut processed = vec![false; result_events.len()];
    let mut depth: Vec<usize> = Vec::new();
    let mut result = Polygon::new();

    for i in 0..result_events.len() {
        if processed[i] {
            continue;
        }

        let contour_id = result.contours.len();
        result.contours.push(Contour::new());
        depth.push(0);

        // The nearest result edge below the starting point decides where
        // this contour sits. Below nothing: an outer contour. Below an
        // edge traversed left-to-right: the region above that edge is the
        // interior of its contour, so this one is a hole in it. Below an
        // edge traversed right-to-left: this contour is a sibling, sharing
        // the same parent.
        if let Some(prev) = arena[result_events[i]].prev_in_result {
            let below_id = arena[prev].contour_id;
            if !arena[prev].result_in_out {
                result.contours[below_id].holes.push(contour_id);
                result.contours[contour_id].parent = Some(below_id);
                depth[contour_id] = depth[below_id] + 1;
            } else if let Some(parent) = result.contours[below_id].parent {
                result.contours[parent].holes.push(contour_id);
                result.contours[contour_id].parent = Some(parent);
                depth[contour_id] = depth[below_id];
            }
        }

        let initial = arena[result_events[i]].point.clone();
        let mut points = vec![initial.clone()];
        let mut pos = i;
        loop {
            processed[pos] = true;
            let e = result_events[pos];
            // Record, on the left event, which direction the walk used.
            if arena[e].left {
                arena[e].result_in_out = false;
                arena[e].contour_id = contour_id;
            } else {
                let other = arena[e].other;
                arena[other].result_in_out = true;
                arena[other].contour_id = contour_id;
            }
            // Jump to the edge's opposite endpoint.
            pos = arena[e].pos;
            processed[pos] = true;
            if arena[result_events[pos]].point == initial {
                break;
            }
            points.push(arena[result_events[pos]].point.clone());
            pos = next_pos(pos, arena, &result_events, &processed)?;
        }

        let contour = &mut result.contours[contour_id];
        contour.points = points;
        let ccw = depth[contour_id] % 2 == 0;
        if contour.is_counterclockwise() != ccw {
            contour.reverse();
        }
    }

    Ok(result)
}

/// The nearest unprocessed result event sharing the point at `pos`.
///
/// At every shared vertex of a valid region the numbers of incoming and
/// outgoing result edges match, so an unprocessed partner must exist; if the
/// predicates were inconsistent it may not, which surfaces as an error
/// rather than a bogus contour.
fn next_pos<F: Float>(
    pos: usize,
    arena: &EventArena<F>,
    result_events: &[EventIdx],
    processed: &[bool],
) -> Result<usize, Error> {
    let point = &arena[result_events[pos]].point;
    let mut candidate = pos + 1;
    while candidate < result_events.len() && arena[result_events[candidate]].point == *point {
        if !processed[candidate] {
            return Ok(candidate);
        }
        candidate += 1;
    }
    let mut candidate = pos;
    loop {
        if candidate == 0 {
            return Err(Error::Inconsistency);
        }
        candidate -= 1;
        if !processed[candidate] {
            break;
        }
    }
    if arena[result_events[candidate]].point != *point {
        return Err(Error::Inconsistency);
    }
    Ok(candidate)
}
