//! Reading and writing the plain-text polygon format.
//!
//! The format is a whitespace-separated token stream: the number of
//! contours, then for each contour the number of vertices followed by that
//! many `x y` coordinate pairs. Line structure is not significant and
//! trailing blank lines are fine.
//!
//! ```text
//! 2
//! 4
//! 0 0
//! 10 0
//! 10 10
//! 0 10
//! 4
//! 3 3
//! 7 3
//! 7 7
//! 3 7
//! ```
//!
//! Contours are untagged in the file; [`Polygon::compute_nesting`] is
//! applied on load to classify holes and fix orientations.

use std::fmt::Write as _;
use std::path::Path;

use ordered_float::NotNan;

use crate::{Contour, Point, Polygon};

/// Ways reading a polygon file can fail.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    /// The file couldn't be read at all.
    #[error("failed to read polygon file: {0}")]
    Io(#[from] std::io::Error),
    /// The token stream ended before the promised counts were satisfied.
    #[error("polygon file ended early")]
    Truncated,
    /// A token wasn't the number it should have been.
    #[error("expected a number, found {0:?}")]
    BadToken(String),
    /// A coordinate was NaN or infinite.
    #[error("coordinates must be finite")]
    BadCoordinate,
}

fn count_token<'a>(tokens: &mut impl Iterator<Item = &'a str>) -> Result<usize, ReadError> {
    let token = tokens.next().ok_or(ReadError::Truncated)?;
    token
        .parse()
        .map_err(|_| ReadError::BadToken(token.to_owned()))
}

fn coord_token<'a>(tokens: &mut impl Iterator<Item = &'a str>) -> Result<NotNan<f64>, ReadError> {
    let token = tokens.next().ok_or(ReadError::Truncated)?;
    let value: f64 = token
        .parse()
        .map_err(|_| ReadError::BadToken(token.to_owned()))?;
    if !value.is_finite() {
        return Err(ReadError::BadCoordinate);
    }
    Ok(NotNan::new(value).unwrap())
}

/// Parses a polygon from the text format.
pub fn parse_polygon(text: &str) -> Result<Polygon<NotNan<f64>>, ReadError> {
    let mut tokens = text.split_whitespace();
    let mut polygon = Polygon::new();
    let ncontours = count_token(&mut tokens)?;
    for _ in 0..ncontours {
        let nvertices = count_token(&mut tokens)?;
        let mut points = Vec::with_capacity(nvertices);
        for _ in 0..nvertices {
            let x = coord_token(&mut tokens)?;
            let y = coord_token(&mut tokens)?;
            points.push(Point { x, y });
        }
        polygon.contours.push(Contour::from_points(points));
    }
    polygon.compute_nesting();
    Ok(polygon)
}

/// Reads a polygon file.
pub fn read_polygon(path: impl AsRef<Path>) -> Result<Polygon<NotNan<f64>>, ReadError> {
    parse_polygon(&std::fs::read_to_string(path)?)
}

/// Writes a polygon in the text format.
pub fn write_polygon(polygon: &Polygon<NotNan<f64>>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", polygon.contours.len());
    for contour in &polygon.contours {
        let _ = writeln!(out, "{}", contour.points.len());
        for p in &contour.points {
            let _ = writeln!(out, "{} {}", p.x.into_inner(), p.y.into_inner());
        }
    }
    out
}
