use thiserror::Error;

use super::configuration::LayoutKind;
use crate::sys::geometry::BoundaryError;
use crate::sys::window::{WindowError, WindowId};

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("Invalid container configuration: {field} = {value}")]
    InvalidConfiguration { field: &'static str, value: String },
    #[error("Invalid window: {0} is not a live window")]
    InvalidWindow(WindowId),
    #[error("Invalid placement mode: {0}")]
    InvalidMode(String),
    #[error("Container cannot hold both windows ({windows}) and child containers ({children})")]
    InvalidShape { windows: usize, children: usize },
    #[error("Invalid child container at index {index}: {reason}")]
    InvalidChild { index: usize, reason: String },
    #[error("Invalid state for container: {windows} windows, {children} child containers")]
    InvalidState { windows: usize, children: usize },
    #[error("Container does not hold a single window (it has {children} child containers)")]
    NotASingleWindow { children: usize },
    #[error("Layout {0} is not implemented")]
    NotImplemented(LayoutKind),
    #[error(transparent)]
    Boundary(#[from] BoundaryError),
    #[error(transparent)]
    Window(#[from] WindowError),
}
