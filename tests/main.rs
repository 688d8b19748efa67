use malachite::Rational;
use polybool::{boolean_op, BooleanOp, Contour, Point, Polygon};
use proptest::prelude::*;

type Poly = Polygon<Rational>;

fn pt(x: i32, y: i32) -> Point<Rational> {
    Point {
        x: Rational::from(x),
        y: Rational::from(y),
    }
}

fn contour(points: &[(i32, i32)]) -> Contour<Rational> {
    Contour::from_points(points.iter().map(|&(x, y)| pt(x, y)).collect())
}

fn polygon(contours: &[&[(i32, i32)]]) -> Poly {
    Polygon {
        contours: contours.iter().map(|c| contour(c)).collect(),
    }
}

fn rect(x: i32, y: i32, w: i32, h: i32) -> Poly {
    polygon(&[&[(x, y), (x + w, y), (x + w, y + h), (x, y + h)]])
}

fn op(subject: &Poly, clipping: &Poly, op: BooleanOp) -> Poly {
    boolean_op(subject, clipping, op).unwrap()
}

fn double_area(poly: &Poly) -> Rational {
    poly.signed_double_area()
}

/// Compares a contour against an expected vertex loop, ignoring which
/// vertex the walk happened to start at (but not the direction).
fn assert_contour(actual: &Contour<Rational>, expected: &[(i32, i32)]) {
    let expected: Vec<_> = expected.iter().map(|&(x, y)| pt(x, y)).collect();
    assert_eq!(
        actual.points.len(),
        expected.len(),
        "wrong vertex count: got {:?}",
        actual.points
    );
    let start = actual
        .points
        .iter()
        .position(|p| *p == expected[0])
        .unwrap_or_else(|| panic!("{:?} missing from {:?}", expected[0], actual.points));
    let rotated: Vec<_> = actual.points[start..]
        .iter()
        .chain(&actual.points[..start])
        .cloned()
        .collect();
    assert_eq!(rotated, expected);
}

/// Checks the structural output invariants: orientation matches nesting
/// depth, and hole/parent links are mutual.
fn check_structure(poly: &Poly) {
    for (i, c) in poly.contours.iter().enumerate() {
        if c.points.is_empty() {
            panic!("empty contour in output");
        }
        match c.parent {
            None => assert!(c.is_counterclockwise(), "outer contour {i} must be ccw"),
            Some(parent) => {
                assert!(!c.is_counterclockwise(), "hole {i} must be cw");
                assert!(
                    poly.contours[parent].holes.contains(&i),
                    "parent {parent} doesn't list hole {i}"
                );
            }
        }
        for &hole in &c.holes {
            assert_eq!(poly.contours[hole].parent, Some(i));
        }
    }
}

// The two squares from the classic worked example: subject [0,10]^2,
// clipping [5,15]^2.

#[test]
fn squares_intersection() {
    let result = op(&rect(0, 0, 10, 10), &rect(5, 5, 10, 10), BooleanOp::Intersection);
    check_structure(&result);
    assert_eq!(result.contours.len(), 1);
    assert_contour(&result.contours[0], &[(5, 5), (10, 5), (10, 10), (5, 10)]);
}

#[test]
fn squares_union() {
    let result = op(&rect(0, 0, 10, 10), &rect(5, 5, 10, 10), BooleanOp::Union);
    check_structure(&result);
    assert_eq!(result.contours.len(), 1);
    assert_contour(
        &result.contours[0],
        &[
            (0, 0),
            (10, 0),
            (10, 5),
            (15, 5),
            (15, 15),
            (5, 15),
            (5, 10),
            (0, 10),
        ],
    );
}

#[test]
fn squares_difference() {
    let result = op(&rect(0, 0, 10, 10), &rect(5, 5, 10, 10), BooleanOp::Difference);
    check_structure(&result);
    assert_eq!(result.contours.len(), 1);
    assert_contour(
        &result.contours[0],
        &[(0, 0), (10, 0), (10, 5), (5, 5), (5, 10), (0, 10)],
    );
}

#[test]
fn squares_xor() {
    let result = op(&rect(0, 0, 10, 10), &rect(5, 5, 10, 10), BooleanOp::Xor);
    check_structure(&result);
    assert_eq!(result.contours.len(), 2);
    assert_contour(
        &result.contours[0],
        &[(0, 0), (10, 0), (10, 5), (5, 5), (5, 10), (0, 10)],
    );
    assert_contour(
        &result.contours[1],
        &[(10, 5), (15, 5), (15, 15), (5, 15), (5, 10), (10, 10)],
    );
    assert!(result.contours[1].is_external());
}

#[test]
fn hole_clipped_at_the_boundary() {
    // The subject's hole pokes into the clipped corner, so the "hole" of
    // the intersection degenerates into a notch in the outer contour.
    let subject = polygon(&[
        &[(0, 0), (10, 0), (10, 10), (0, 10)],
        &[(3, 3), (7, 3), (7, 7), (3, 7)],
    ]);
    let result = op(&subject, &rect(5, 5, 10, 10), BooleanOp::Intersection);
    check_structure(&result);
    assert_eq!(result.contours.len(), 1);
    assert_contour(
        &result.contours[0],
        &[(5, 7), (7, 7), (7, 5), (10, 5), (10, 10), (5, 10)],
    );
}

#[test]
fn hole_survives_intersection() {
    let subject = polygon(&[
        &[(0, 0), (10, 0), (10, 10), (0, 10)],
        &[(4, 4), (6, 4), (6, 6), (4, 6)],
    ]);
    let result = op(&subject, &rect(2, 2, 6, 6), BooleanOp::Intersection);
    check_structure(&result);
    assert_eq!(result.contours.len(), 2);
    assert_contour(&result.contours[0], &[(2, 2), (8, 2), (8, 8), (2, 8)]);
    assert_contour(&result.contours[1], &[(4, 4), (4, 6), (6, 6), (6, 4)]);
    assert_eq!(result.contours[1].parent, Some(0));
    assert_eq!(result.contours[0].holes, vec![1]);
}

#[test]
fn disjoint_pieces_survive_union() {
    let subject = polygon(&[
        &[(0, 0), (1, 0), (1, 1), (0, 1)],
        &[(100, 100), (101, 100), (101, 101), (100, 101)],
    ]);
    let clipping = rect(50, 50, 1, 1);
    let result = op(&subject, &clipping, BooleanOp::Union);
    check_structure(&result);
    assert_eq!(result.contours.len(), 3);
    assert_eq!(double_area(&result), Rational::from(6));
    assert_contour(&result.contours[0], &[(0, 0), (1, 0), (1, 1), (0, 1)]);
    assert_contour(&result.contours[1], &[(50, 50), (51, 50), (51, 51), (50, 51)]);
    assert_contour(
        &result.contours[2],
        &[(100, 100), (101, 100), (101, 101), (100, 101)],
    );
}

#[test]
fn empty_identities() {
    let subject = rect(0, 0, 4, 3);
    let empty = Poly::new();
    assert!(op(&subject, &empty, BooleanOp::Intersection).is_empty());
    assert_eq!(op(&subject, &empty, BooleanOp::Union), subject);
    assert_eq!(op(&subject, &empty, BooleanOp::Difference), subject);
    assert_eq!(op(&subject, &empty, BooleanOp::Xor), subject);
    assert_eq!(op(&empty, &subject, BooleanOp::Union), subject);
    assert!(op(&empty, &subject, BooleanOp::Difference).is_empty());
}

#[test]
fn coincident_squares() {
    let s = rect(0, 0, 5, 5);
    assert_eq!(double_area(&op(&s, &s, BooleanOp::Intersection)), Rational::from(50));
    assert_eq!(double_area(&op(&s, &s, BooleanOp::Union)), Rational::from(50));
    assert!(op(&s, &s, BooleanOp::Difference).is_empty());
    assert!(op(&s, &s, BooleanOp::Xor).is_empty());
}

#[test]
fn shared_edge_union_merges() {
    // Two unit squares sharing the edge x = 1.
    let result = op(&rect(0, 0, 1, 1), &rect(1, 0, 1, 1), BooleanOp::Union);
    check_structure(&result);
    assert_eq!(result.contours.len(), 1);
    assert_eq!(double_area(&result), Rational::from(4));
}

#[test]
fn shared_edge_intersection_is_empty_interior() {
    let result = op(&rect(0, 0, 1, 1), &rect(1, 0, 1, 1), BooleanOp::Intersection);
    assert_eq!(double_area(&result), Rational::from(0));
}

fn rect_strategy() -> impl Strategy<Value = Poly> {
    (0..15i32, 0..15i32, 1..10i32, 1..10i32).prop_map(|(x, y, w, h)| rect(x, y, w, h))
}

fn triangle_strategy() -> impl Strategy<Value = Poly> {
    (0..15i32, 0..15i32, 1..10i32, 1..10i32)
        .prop_map(|(x, y, w, h)| polygon(&[&[(x, y), (x + w, y), (x, y + h)]]))
}

fn all_ops(subject: &Poly, clipping: &Poly) -> (Poly, Poly, Poly, Poly) {
    (
        op(subject, clipping, BooleanOp::Intersection),
        op(subject, clipping, BooleanOp::Union),
        op(subject, clipping, BooleanOp::Difference),
        op(subject, clipping, BooleanOp::Xor),
    )
}

proptest! {
    // The exact area identities that tie the four operations together.
    // With rational coordinates these hold with equality, not tolerance.
    #[test]
    fn rectangle_area_identities(s in rect_strategy(), c in rect_strategy()) {
        let (i, u, d, x) = all_ops(&s, &c);
        for result in [&i, &u, &d, &x] {
            check_structure(result);
        }

        prop_assert_eq!(double_area(&i) + double_area(&x), double_area(&u));
        prop_assert_eq!(double_area(&i) + double_area(&d), double_area(&s));

        let d_rev = op(&c, &s, BooleanOp::Difference);
        prop_assert_eq!(double_area(&d) + double_area(&d_rev), double_area(&x));

        // Intersection, union and xor are symmetric in their arguments.
        prop_assert_eq!(double_area(&i), double_area(&op(&c, &s, BooleanOp::Intersection)));
        prop_assert_eq!(double_area(&u), double_area(&op(&c, &s, BooleanOp::Union)));
        prop_assert_eq!(double_area(&x), double_area(&op(&c, &s, BooleanOp::Xor)));
    }

    #[test]
    fn triangle_area_identities(s in triangle_strategy(), c in rect_strategy()) {
        let (i, u, d, x) = all_ops(&s, &c);
        for result in [&i, &u, &d, &x] {
            check_structure(result);
        }
        prop_assert_eq!(double_area(&i) + double_area(&x), double_area(&u));
        prop_assert_eq!(double_area(&i) + double_area(&d), double_area(&s));
    }

    #[test]
    fn idempotence(s in rect_strategy()) {
        prop_assert_eq!(double_area(&op(&s, &s, BooleanOp::Intersection)), double_area(&s));
        prop_assert_eq!(double_area(&op(&s, &s, BooleanOp::Union)), double_area(&s));
        prop_assert!(op(&s, &s, BooleanOp::Difference).is_empty());
        prop_assert!(op(&s, &s, BooleanOp::Xor).is_empty());
    }
}
