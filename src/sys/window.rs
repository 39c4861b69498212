//! The window collaborator: one handle per managed OS window, plus the
//! enumeration and filtering used to pick the windows to manage.

use std::fmt;
use std::rc::Rc;

use bitflags::bitflags;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

use super::geometry::Boundary;
use super::monitor::MonitorId;

/// An identifier for a managed window.
///
/// Wraps the raw OS handle value. It is only meaningful while the window
/// exists.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(u64);

impl WindowId {
    pub fn new(raw: u64) -> Self { WindowId(raw) }

    pub fn raw(self) -> u64 { self.0 }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{:#x}", self.0) }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    #[error("window {0} no longer exists")]
    Gone(WindowId),
    #[error("{operation} failed: {message}")]
    Os { operation: &'static str, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayState {
    #[default]
    Unknown,
    Maximized,
    Minimized,
    Normal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateTransition {
    Minimize,
    Restore,
    Maximize,
    ShowNormal,
}

bitflags! {
    /// Raw window style bits. Unknown bits are preserved so a style read from
    /// the OS can be written back unchanged.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
    #[repr(transparent)]
    pub struct WindowStyle: u32 {
        const MAXIMIZE_BOX = 0x0001_0000;
        const MINIMIZE_BOX = 0x0002_0000;
        const THICK_FRAME  = 0x0004_0000;
        const SYSTEM_MENU  = 0x0008_0000;
        const CAPTION      = 0x00C0_0000;
        const VISIBLE      = 0x1000_0000;

        const BORDERS = Self::CAPTION.bits()
            | Self::THICK_FRAME.bits()
            | Self::MINIMIZE_BOX.bits()
            | Self::MAXIMIZE_BOX.bits()
            | Self::SYSTEM_MENU.bits();

        const _ = !0;
    }
}

/// A handle to one managed window.
///
/// The handle does not own the window. All methods take `&self`: the
/// underlying OS object is mutated through the handle, not through Rust
/// ownership.
pub trait Window: fmt::Debug {
    fn id(&self) -> WindowId;

    /// Whether the handle still refers to a live window.
    fn is_valid(&self) -> bool;

    fn title(&self) -> Result<String, WindowError>;

    /// The outer on-screen boundary, including decorations.
    fn boundary(&self) -> Result<Boundary, WindowError>;

    /// The client area in screen coordinates.
    fn client_boundary(&self) -> Result<Boundary, WindowError>;

    fn display_state(&self) -> Result<DisplayState, WindowError>;

    fn transition(&self, transition: StateTransition) -> Result<(), WindowError>;

    /// Moves and resizes the window. Blocks until the OS accepts the request.
    fn apply_boundary(&self, boundary: Boundary, redraw: bool) -> Result<(), WindowError>;

    fn style(&self) -> Result<WindowStyle, WindowError>;

    fn set_style(&self, style: WindowStyle) -> Result<(), WindowError>;

    /// The style the window had when this handle was created.
    fn original_style(&self) -> WindowStyle;

    /// The monitor the OS considers this window to be on.
    fn monitor(&self) -> Result<MonitorId, WindowError>;

    fn maximize(&self) -> Result<(), WindowError> { self.transition(StateTransition::Maximize) }

    fn minimize(&self) -> Result<(), WindowError> { self.transition(StateTransition::Minimize) }

    /// Brings the window back to its normal state, restoring it first if it
    /// is minimized.
    fn normalize(&self) -> Result<(), WindowError> {
        let transition = match self.display_state()? {
            DisplayState::Minimized => StateTransition::Restore,
            _ => StateTransition::ShowNormal,
        };
        self.transition(transition)
    }

    /// Strips caption, frame and title bar buttons from the window.
    fn hide_borders(&self) -> Result<(), WindowError> {
        let style = self.style()?;
        self.set_style(style.difference(WindowStyle::BORDERS))
    }

    fn restore_original_style(&self) -> Result<(), WindowError> {
        self.set_style(self.original_style())
    }
}

/// Shared handle to a managed window.
pub type WindowRef = Rc<dyn Window>;

pub trait WindowFilter {
    fn matches(&self, window: &dyn Window) -> bool;
}

/// Matches windows whose title matches a regular expression from its start.
#[derive(Debug, Clone)]
pub struct RegexWindowFilter {
    regex: Regex,
}

impl RegexWindowFilter {
    /// Case-insensitive filter.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> { Self::with_case(pattern, false) }

    pub fn with_case(pattern: &str, case_sensitive: bool) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(&format!("^(?:{pattern})"))
            .case_insensitive(!case_sensitive)
            .build()?;
        Ok(RegexWindowFilter { regex })
    }
}

impl WindowFilter for RegexWindowFilter {
    fn matches(&self, window: &dyn Window) -> bool {
        match window.title() {
            Ok(title) => self.regex.is_match(&title),
            Err(e) => {
                debug!(window = %window.id(), error = %e, "Skipping window with unreadable title");
                false
            }
        }
    }
}

pub trait WindowEnumerator {
    /// All currently open top-level windows.
    fn windows(&self) -> Result<Vec<WindowRef>, WindowError>;
}

/// Enumerates open windows, keeping those accepted by every filter.
pub fn enumerate_windows(
    enumerator: &dyn WindowEnumerator,
    filters: &[&dyn WindowFilter],
) -> Result<Vec<WindowRef>, WindowError> {
    let windows: Vec<WindowRef> = enumerator
        .windows()?
        .into_iter()
        .filter(|w| filters.iter().all(|f| f.matches(w.as_ref())))
        .collect();
    trace!(count = windows.len(), filters = filters.len(), "Enumerated windows");
    Ok(windows)
}
