use std::str::FromStr;

use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use super::error::LayoutError;
use crate::sys::geometry::Boundary;
use crate::sys::window::{Window, WindowError, WindowRef};

/// How a managed window takes part in layout.
///
/// The mode does not change the split arithmetic; `Free` is reserved for
/// windows placed outside the tiling tree.
#[repr(u8)]
#[derive(
    Default,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoPrimitive,
    TryFromPrimitive
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum PlacementMode {
    Free = 1,
    #[default]
    Tiled = 2,
}

impl PlacementMode {
    pub fn parse(name: &str) -> Result<Self, LayoutError> {
        PlacementMode::from_str(name).map_err(|_| LayoutError::InvalidMode(name.to_owned()))
    }
}

/// A managed window at a leaf of the container tree.
#[derive(Debug, Clone)]
pub struct WindowHolder {
    window: WindowRef,
    mode: PlacementMode,
    last_boundary: Option<Boundary>,
}

impl WindowHolder {
    pub fn new(window: WindowRef, mode: PlacementMode) -> Result<Self, LayoutError> {
        if !window.is_valid() {
            return Err(LayoutError::InvalidWindow(window.id()));
        }
        Ok(WindowHolder { window, mode, last_boundary: None })
    }

    pub fn tiled(window: WindowRef) -> Result<Self, LayoutError> {
        Self::new(window, PlacementMode::Tiled)
    }

    /// Builds a holder from a raw mode value (`1` free, `2` tiled).
    pub fn with_raw_mode(window: WindowRef, mode: u8) -> Result<Self, LayoutError> {
        let mode = PlacementMode::try_from(mode)
            .map_err(|e| LayoutError::InvalidMode(e.number.to_string()))?;
        Self::new(window, mode)
    }

    pub fn window(&self) -> &dyn Window { self.window.as_ref() }

    pub fn mode(&self) -> PlacementMode { self.mode }

    /// The boundary most recently applied through this holder.
    pub fn last_boundary(&self) -> Option<Boundary> { self.last_boundary }

    /// Moves the window to `boundary`, redrawing it.
    pub fn set_boundary(&mut self, boundary: Boundary) -> Result<(), WindowError> {
        self.window.apply_boundary(boundary, true)?;
        self.last_boundary = Some(boundary);
        Ok(())
    }
}
