//! In-memory window backend.
//!
//! Simulates a set of monitors and top-level windows without talking to an
//! OS. Every geometry change is appended to a journal, which makes the order
//! of a layout sweep observable. Used by the `tile` planner and the tests.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use tracing::trace;

use super::geometry::Boundary;
use super::monitor::{Monitor, MonitorEnumerator, MonitorId};
use super::window::{
    DisplayState, StateTransition, Window, WindowEnumerator, WindowError, WindowId, WindowRef,
    WindowStyle,
};

const FRAME: i32 = 8;
const CAPTION: i32 = 23;

fn default_style() -> WindowStyle { WindowStyle::BORDERS | WindowStyle::VISIBLE }

struct WindowState {
    title: String,
    boundary: Boundary,
    display_state: DisplayState,
    style: WindowStyle,
    open: bool,
    fail_geometry: bool,
    transitions: Vec<StateTransition>,
}

#[derive(Default)]
struct State {
    next_window: u64,
    windows: BTreeMap<WindowId, WindowState>,
    monitors: Vec<(MonitorId, String, Boundary)>,
    journal: Vec<(WindowId, Boundary)>,
}

impl State {
    fn window(&self, id: WindowId) -> Result<&WindowState, WindowError> {
        self.windows.get(&id).filter(|w| w.open).ok_or(WindowError::Gone(id))
    }

    fn window_mut(&mut self, id: WindowId) -> Result<&mut WindowState, WindowError> {
        self.windows.get_mut(&id).filter(|w| w.open).ok_or(WindowError::Gone(id))
    }
}

/// A simulated desktop. Cloning yields another handle to the same desktop.
#[derive(Clone, Default)]
pub struct HeadlessDisplay {
    state: Rc<RefCell<State>>,
}

impl HeadlessDisplay {
    pub fn new() -> Self { Self::default() }

    pub fn add_monitor(&self, device: &str, boundary: Boundary) -> MonitorId {
        let mut state = self.state.borrow_mut();
        let id = MonitorId::new(0x1_0000 + state.monitors.len() as u64);
        state.monitors.push((id, device.to_owned(), boundary));
        id
    }

    /// Opens a window at the origin of the first monitor.
    pub fn open_window(&self, title: &str) -> WindowRef {
        let mut state = self.state.borrow_mut();
        state.next_window += 1;
        let id = WindowId::new(0x1000 + state.next_window);
        let (left, top) = state.monitors.first().map_or((0, 0), |(_, _, b)| (b.left(), b.top()));
        let boundary = Boundary::from_origin_size(left, top, 640, 480);
        state.windows.insert(
            id,
            WindowState {
                title: title.to_owned(),
                boundary,
                display_state: DisplayState::Normal,
                style: default_style(),
                open: true,
                fail_geometry: false,
                transitions: Vec::new(),
            },
        );
        trace!(window = %id, title, "Opened headless window");
        Rc::new(HeadlessWindow {
            id,
            original_style: default_style(),
            state: Rc::clone(&self.state),
        })
    }

    pub fn close_window(&self, id: WindowId) {
        if let Some(window) = self.state.borrow_mut().windows.get_mut(&id) {
            window.open = false;
        }
    }

    /// Makes every later geometry change of `id` fail.
    pub fn set_geometry_failure(&self, id: WindowId, fail: bool) {
        if let Some(window) = self.state.borrow_mut().windows.get_mut(&id) {
            window.fail_geometry = fail;
        }
    }

    /// All applied geometry changes, oldest first.
    pub fn journal(&self) -> Vec<(WindowId, Boundary)> { self.state.borrow().journal.clone() }

    pub fn clear_journal(&self) { self.state.borrow_mut().journal.clear() }

    pub fn transitions(&self, id: WindowId) -> Vec<StateTransition> {
        self.state.borrow().windows.get(&id).map(|w| w.transitions.clone()).unwrap_or_default()
    }

    pub fn boundary_of(&self, id: WindowId) -> Option<Boundary> {
        self.state.borrow().windows.get(&id).map(|w| w.boundary)
    }
}

impl WindowEnumerator for HeadlessDisplay {
    fn windows(&self) -> Result<Vec<WindowRef>, WindowError> {
        let state = self.state.borrow();
        Ok(state
            .windows
            .iter()
            .filter(|(_, w)| w.open)
            .map(|(&id, w)| {
                Rc::new(HeadlessWindow {
                    id,
                    original_style: w.style,
                    state: Rc::clone(&self.state),
                }) as WindowRef
            })
            .collect())
    }
}

impl MonitorEnumerator for HeadlessDisplay {
    fn monitors(&self) -> Result<Vec<Monitor>, WindowError> {
        let state = self.state.borrow();
        Ok(state
            .monitors
            .iter()
            .enumerate()
            .map(|(index, (id, device, boundary))| Monitor {
                index,
                id: *id,
                device: device.clone(),
                boundary: *boundary,
            })
            .collect())
    }
}

#[derive(Debug)]
pub struct HeadlessWindow {
    id: WindowId,
    original_style: WindowStyle,
    state: Rc<RefCell<State>>,
}

impl std::fmt::Debug for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("State")
            .field("windows", &self.windows.len())
            .field("monitors", &self.monitors.len())
            .finish()
    }
}

impl Window for HeadlessWindow {
    fn id(&self) -> WindowId { self.id }

    fn is_valid(&self) -> bool { self.state.borrow().window(self.id).is_ok() }

    fn title(&self) -> Result<String, WindowError> {
        Ok(self.state.borrow().window(self.id)?.title.clone())
    }

    fn boundary(&self) -> Result<Boundary, WindowError> {
        Ok(self.state.borrow().window(self.id)?.boundary)
    }

    fn client_boundary(&self) -> Result<Boundary, WindowError> {
        let state = self.state.borrow();
        let window = state.window(self.id)?;
        let outer = window.boundary;
        if !window.style.intersects(WindowStyle::BORDERS) {
            return Ok(outer);
        }
        let left = (outer.left() + FRAME).min(outer.right());
        let right = (outer.right() - FRAME).max(left);
        let top = (outer.top() + CAPTION).min(outer.bottom());
        let bottom = (outer.bottom() - FRAME).max(top);
        Ok(Boundary::from_edges_unchecked(left, top, right, bottom))
    }

    fn display_state(&self) -> Result<DisplayState, WindowError> {
        Ok(self.state.borrow().window(self.id)?.display_state)
    }

    fn transition(&self, transition: StateTransition) -> Result<(), WindowError> {
        let mut state = self.state.borrow_mut();
        let window = state.window_mut(self.id)?;
        window.display_state = match transition {
            StateTransition::Minimize => DisplayState::Minimized,
            StateTransition::Maximize => DisplayState::Maximized,
            StateTransition::Restore | StateTransition::ShowNormal => DisplayState::Normal,
        };
        window.transitions.push(transition);
        Ok(())
    }

    fn apply_boundary(&self, boundary: Boundary, _redraw: bool) -> Result<(), WindowError> {
        let mut state = self.state.borrow_mut();
        let window = state.window_mut(self.id)?;
        if window.fail_geometry {
            return Err(WindowError::Os {
                operation: "move window",
                message: format!("window {} rejected the geometry change", self.id),
            });
        }
        window.boundary = boundary;
        state.journal.push((self.id, boundary));
        Ok(())
    }

    fn style(&self) -> Result<WindowStyle, WindowError> {
        Ok(self.state.borrow().window(self.id)?.style)
    }

    fn set_style(&self, style: WindowStyle) -> Result<(), WindowError> {
        self.state.borrow_mut().window_mut(self.id)?.style = style;
        Ok(())
    }

    fn original_style(&self) -> WindowStyle { self.original_style }

    fn monitor(&self) -> Result<MonitorId, WindowError> {
        let state = self.state.borrow();
        let b = state.window(self.id)?.boundary;
        let (cx, cy) = (b.left() + b.width() / 2, b.top() + b.height() / 2);
        state
            .monitors
            .iter()
            .find(|(_, _, m)| m.contains(cx, cy))
            .or_else(|| state.monitors.first())
            .map(|(id, _, _)| *id)
            .ok_or_else(|| WindowError::Os {
                operation: "monitor from window",
                message: "no monitors attached".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_journal_records_geometry_in_order() {
        let display = HeadlessDisplay::new();
        let a = display.open_window("a");
        let b = display.open_window("b");
        let first = Boundary::new(0, 0, 10, 10).unwrap();
        let second = Boundary::new(10, 0, 20, 10).unwrap();
        b.apply_boundary(first, true).unwrap();
        a.apply_boundary(second, false).unwrap();
        assert_eq!(display.journal(), vec![(b.id(), first), (a.id(), second)]);
        assert_eq!(display.boundary_of(a.id()), Some(second));
    }

    #[test]
    fn test_closed_window_is_gone() {
        let display = HeadlessDisplay::new();
        let window = display.open_window("a");
        display.close_window(window.id());
        assert!(!window.is_valid());
        assert_eq!(window.boundary(), Err(WindowError::Gone(window.id())));
        assert!(display.windows().unwrap().is_empty());
    }

    #[test]
    fn test_geometry_failure_leaves_window_in_place() {
        let display = HeadlessDisplay::new();
        let window = display.open_window("a");
        let before = window.boundary().unwrap();
        display.set_geometry_failure(window.id(), true);
        let result = window.apply_boundary(Boundary::new(0, 0, 1, 1).unwrap(), true);
        assert!(matches!(result, Err(WindowError::Os { .. })));
        assert_eq!(window.boundary().unwrap(), before);
        assert!(display.journal().is_empty());
    }

    #[test]
    fn test_client_boundary_excludes_decorations() {
        let display = HeadlessDisplay::new();
        let window = display.open_window("a");
        window.apply_boundary(Boundary::new(0, 0, 100, 100).unwrap(), true).unwrap();
        assert_eq!(window.client_boundary().unwrap().tuple(), (8, 23, 92, 92));
        window.hide_borders().unwrap();
        assert_eq!(window.client_boundary().unwrap().tuple(), (0, 0, 100, 100));
    }

    #[test]
    fn test_enumerated_handle_captures_current_style() {
        let display = HeadlessDisplay::new();
        let window = display.open_window("a");
        window.hide_borders().unwrap();

        let handles = display.windows().unwrap();
        assert_eq!(handles.len(), 1);
        let rewrapped = &handles[0];
        assert_eq!(rewrapped.original_style(), WindowStyle::VISIBLE);
        window.restore_original_style().unwrap();
        rewrapped.restore_original_style().unwrap();
        assert_eq!(rewrapped.style().unwrap(), WindowStyle::VISIBLE);
    }

    #[test]
    fn test_monitor_requires_attached_display() {
        let display = HeadlessDisplay::new();
        let window = display.open_window("a");
        assert!(matches!(window.monitor(), Err(WindowError::Os { .. })));
    }
}
