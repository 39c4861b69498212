//! Integer screen geometry shared by the layout engine and the window backends.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BoundaryError {
    #[error("inverted boundary ({left}, {top}, {right}, {bottom}): right/bottom must not precede left/top")]
    Inverted { left: i32, top: i32, right: i32, bottom: i32 },
    #[error("boundary ({left}, {top}, {right}, {bottom}) spans more than i32::MAX pixels")]
    TooLarge { left: i32, top: i32, right: i32, bottom: i32 },
}

/// Axis-aligned rectangle in screen coordinates.
///
/// The right and bottom edges are exclusive. A `Boundary` never has
/// `right < left` or `bottom < top`, and its width and height fit in an `i32`;
/// both are checked when one is built from raw coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawBoundary", into = "RawBoundary")]
pub struct Boundary {
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
}

#[derive(Serialize, Deserialize)]
struct RawBoundary {
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
}

impl TryFrom<RawBoundary> for Boundary {
    type Error = BoundaryError;

    fn try_from(raw: RawBoundary) -> Result<Self, Self::Error> {
        Boundary::new(raw.left, raw.top, raw.right, raw.bottom)
    }
}

impl From<Boundary> for RawBoundary {
    fn from(b: Boundary) -> Self {
        RawBoundary {
            left: b.left,
            top: b.top,
            right: b.right,
            bottom: b.bottom,
        }
    }
}

impl Boundary {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Result<Self, BoundaryError> {
        if right < left || bottom < top {
            return Err(BoundaryError::Inverted { left, top, right, bottom });
        }
        if right.checked_sub(left).is_none() || bottom.checked_sub(top).is_none() {
            return Err(BoundaryError::TooLarge { left, top, right, bottom });
        }
        Ok(Boundary { left, top, right, bottom })
    }

    /// Builds a boundary from an origin and a size, the shape monitor
    /// enumeration reports. Sizes are clamped to `i32::MAX`.
    pub fn from_origin_size(left: i32, top: i32, width: u32, height: u32) -> Self {
        let max = i32::MAX.unsigned_abs();
        let (width, height) = (width.min(max), height.min(max));
        Boundary {
            left,
            top,
            right: left.saturating_add_unsigned(width),
            bottom: top.saturating_add_unsigned(height),
        }
    }

    /// Callers must already guarantee `right >= left` and `bottom >= top`.
    pub(crate) fn from_edges_unchecked(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        debug_assert!(right >= left && bottom >= top, "inverted boundary");
        debug_assert!(right.checked_sub(left).is_some() && bottom.checked_sub(top).is_some());
        Boundary { left, top, right, bottom }
    }

    pub fn left(&self) -> i32 { self.left }

    pub fn top(&self) -> i32 { self.top }

    pub fn right(&self) -> i32 { self.right }

    pub fn bottom(&self) -> i32 { self.bottom }

    pub fn width(&self) -> i32 { self.right - self.left }

    pub fn height(&self) -> i32 { self.bottom - self.top }

    /// The four raw edge coordinates as `(left, top, right, bottom)`.
    pub fn tuple(&self) -> (i32, i32, i32, i32) { (self.left, self.top, self.right, self.bottom) }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        (self.left..self.right).contains(&x) && (self.top..self.bottom).contains(&y)
    }
}

impl std::fmt::Display for Boundary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {}, {}, {}) {}x{}",
            self.left,
            self.top,
            self.right,
            self.bottom,
            self.width(),
            self.height()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_dimensions() {
        let b = Boundary::new(10, 20, 110, 60).unwrap();
        assert_eq!(b.width(), 100);
        assert_eq!(b.height(), 40);
        assert_eq!(b.tuple(), (10, 20, 110, 60));
    }

    #[test]
    fn test_inverted_boundary_is_rejected() {
        assert_eq!(
            Boundary::new(100, 0, 50, 10),
            Err(BoundaryError::Inverted { left: 100, top: 0, right: 50, bottom: 10 })
        );
        assert!(Boundary::new(0, 10, 10, 5).is_err());
    }

    #[test]
    fn test_empty_boundary_is_allowed() {
        let b = Boundary::new(5, 5, 5, 5).unwrap();
        assert_eq!(b.width(), 0);
        assert_eq!(b.height(), 0);
        assert!(!b.contains(5, 5));
    }

    #[test]
    fn test_span_wider_than_i32_is_rejected() {
        assert_eq!(
            Boundary::new(i32::MIN, 0, i32::MAX, 10),
            Err(BoundaryError::TooLarge { left: i32::MIN, top: 0, right: i32::MAX, bottom: 10 })
        );
        assert!(Boundary::new(0, i32::MIN, 10, 1).is_err());

        let widest = Boundary::new(i32::MIN, 0, -1, 10).unwrap();
        assert_eq!(widest.width(), i32::MAX);
        assert!(widest.to_string().starts_with("(-2147483648, 0, -1, 10)"));
    }

    #[test]
    fn test_from_origin_size_clamps_oversized_extent() {
        let b = Boundary::from_origin_size(i32::MIN, 0, u32::MAX, 10);
        assert_eq!(b.width(), i32::MAX);
        assert_eq!(b.height(), 10);
    }

    #[test]
    fn test_from_origin_size() {
        let b = Boundary::from_origin_size(-1920, 0, 1920, 1080);
        assert_eq!(b.tuple(), (-1920, 0, 0, 1080));
    }

    #[test]
    fn test_contains_excludes_far_edges() {
        let b = Boundary::new(0, 0, 10, 10).unwrap();
        assert!(b.contains(0, 0));
        assert!(b.contains(9, 9));
        assert!(!b.contains(10, 5));
        assert!(!b.contains(5, 10));
    }

    #[test]
    fn test_deserialize_rejects_inverted() {
        let ok: Boundary =
            serde_json::from_str(r#"{"left":0,"top":0,"right":4,"bottom":2}"#).unwrap();
        assert_eq!(ok.width(), 4);
        let err = serde_json::from_str::<Boundary>(r#"{"left":4,"top":0,"right":0,"bottom":2}"#);
        assert!(err.is_err());
    }
}
