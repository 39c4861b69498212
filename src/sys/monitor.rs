use serde::{Deserialize, Serialize};

use super::geometry::Boundary;
use super::window::{Window, WindowError};

/// Raw OS handle of a display monitor.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonitorId(u64);

impl MonitorId {
    pub fn new(raw: u64) -> Self { MonitorId(raw) }

    pub fn raw(self) -> u64 { self.0 }
}

/// An active display, in enumeration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monitor {
    pub index: usize,
    pub id: MonitorId,
    pub device: String,
    pub boundary: Boundary,
}

pub trait MonitorEnumerator {
    fn monitors(&self) -> Result<Vec<Monitor>, WindowError>;
}

/// Finds the monitor the OS reports for `window` among `monitors`.
///
/// Returns `None` when the reported monitor is not in the enumerated set,
/// e.g. because the displays changed since enumeration.
pub fn monitor_for_window<'a>(
    window: &dyn Window,
    monitors: &'a [Monitor],
) -> Result<Option<&'a Monitor>, WindowError> {
    let id = window.monitor()?;
    Ok(monitors.iter().find(|m| m.id == id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sys::headless::HeadlessDisplay;

    #[test]
    fn test_monitors_are_indexed_in_enumeration_order() {
        let display = HeadlessDisplay::new();
        display.add_monitor("\\\\.\\DISPLAY1", Boundary::from_origin_size(0, 0, 1920, 1080));
        display.add_monitor("\\\\.\\DISPLAY2", Boundary::from_origin_size(1920, 0, 2560, 1440));

        let monitors = display.monitors().unwrap();
        assert_eq!(monitors.len(), 2);
        assert_eq!(monitors[0].index, 0);
        assert_eq!(monitors[1].index, 1);
        assert_eq!(monitors[1].device, "\\\\.\\DISPLAY2");
        assert_eq!(monitors[1].boundary.width(), 2560);
    }

    #[test]
    fn test_monitor_for_window_uses_reported_monitor() {
        let display = HeadlessDisplay::new();
        display.add_monitor("\\\\.\\DISPLAY1", Boundary::from_origin_size(0, 0, 1920, 1080));
        display.add_monitor("\\\\.\\DISPLAY2", Boundary::from_origin_size(1920, 0, 1920, 1080));
        let window = display.open_window("Terminal");
        window.apply_boundary(Boundary::new(2000, 100, 2400, 600).unwrap(), true).unwrap();

        let monitors = display.monitors().unwrap();
        let monitor = monitor_for_window(window.as_ref(), &monitors).unwrap();
        assert_eq!(monitor.map(|m| m.index), Some(1));
    }

    #[test]
    fn test_monitor_for_window_outside_enumerated_set() {
        let display = HeadlessDisplay::new();
        display.add_monitor("\\\\.\\DISPLAY1", Boundary::from_origin_size(0, 0, 1920, 1080));
        let window = display.open_window("Terminal");
        let monitors = display.monitors().unwrap();
        let stale = vec![Monitor {
            index: 0,
            id: MonitorId::new(999),
            device: "gone".to_string(),
            boundary: monitors[0].boundary,
        }];
        assert_eq!(monitor_for_window(window.as_ref(), &stale).unwrap(), None);
    }
}
