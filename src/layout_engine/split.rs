use super::configuration::{ContainerConfiguration, LayoutKind, SplitAxis};
use super::error::LayoutError;
use crate::sys::geometry::Boundary;

/// Computes the boundaries of `count` children laid out in `parent`.
pub(crate) fn arrange(
    config: ContainerConfiguration,
    parent: Boundary,
    count: usize,
) -> Result<Vec<Boundary>, LayoutError> {
    match config.layout() {
        LayoutKind::Split => Ok(split_evenly(parent, config.axis(), count)),
        kind @ (LayoutKind::Stacked | LayoutKind::Tabbed) => Err(LayoutError::NotImplemented(kind)),
    }
}

/// Cuts `parent` into `count` equal slices along `axis`.
///
/// Slices are `extent / count` wide; the remaining `extent % count` pixels are
/// left uncovered after the last slice.
pub(crate) fn split_evenly(parent: Boundary, axis: SplitAxis, count: usize) -> Vec<Boundary> {
    if count == 0 {
        return Vec::new();
    }
    let (left, top, right, bottom) = parent.tuple();
    let n = i32::try_from(count).unwrap_or(i32::MAX);
    match axis {
        SplitAxis::Horizontal => {
            let slice = parent.width() / n;
            (0..n)
                .map(|i| {
                    let start = left + i * slice;
                    Boundary::from_edges_unchecked(start, top, start + slice, bottom)
                })
                .collect()
        }
        SplitAxis::Vertical => {
            let slice = parent.height() / n;
            (0..n)
                .map(|i| {
                    let start = top + i * slice;
                    Boundary::from_edges_unchecked(left, start, right, start + slice)
                })
                .collect()
        }
    }
}
