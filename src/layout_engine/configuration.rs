use std::str::FromStr;

use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use super::error::LayoutError;

/// How a container arranges its children.
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
pub enum LayoutKind {
    #[default]
    Split = 1,
    Stacked = 2,
    Tabbed = 3,
}

impl LayoutKind {
    /// Whether the layout engine can enforce this kind.
    pub fn is_implemented(self) -> bool { matches!(self, LayoutKind::Split) }
}

/// The axis a split layout partitions along.
///
/// `Horizontal` places children side by side, `Vertical` stacks them top to
/// bottom.
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
pub enum SplitAxis {
    #[default]
    Horizontal = 1,
    Vertical = 2,
}

/// Layout policy of a container and, by default, of the children it creates.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContainerConfiguration {
    layout: LayoutKind,
    axis: SplitAxis,
}

impl ContainerConfiguration {
    pub fn new(layout: LayoutKind, axis: SplitAxis) -> Self { ContainerConfiguration { layout, axis } }

    pub fn split(axis: SplitAxis) -> Self { Self::new(LayoutKind::Split, axis) }

    /// Builds a configuration from raw enumeration values (`1..=3` for the
    /// layout, `1..=2` for the axis).
    pub fn from_raw(layout: u8, axis: u8) -> Result<Self, LayoutError> {
        let layout = LayoutKind::try_from(layout).map_err(|e| LayoutError::InvalidConfiguration {
            field: "layout",
            value: e.number.to_string(),
        })?;
        let axis = SplitAxis::try_from(axis).map_err(|e| LayoutError::InvalidConfiguration {
            field: "axis",
            value: e.number.to_string(),
        })?;
        Ok(Self::new(layout, axis))
    }

    /// Builds a configuration from enumeration names, ignoring ASCII case.
    pub fn parse(layout: &str, axis: &str) -> Result<Self, LayoutError> {
        let layout = LayoutKind::from_str(layout).map_err(|_| LayoutError::InvalidConfiguration {
            field: "layout",
            value: layout.to_owned(),
        })?;
        let axis = SplitAxis::from_str(axis).map_err(|_| LayoutError::InvalidConfiguration {
            field: "axis",
            value: axis.to_owned(),
        })?;
        Ok(Self::new(layout, axis))
    }

    pub fn layout(&self) -> LayoutKind { self.layout }

    pub fn axis(&self) -> SplitAxis { self.axis }
}
