mod configuration;
mod container;
mod error;
mod holder;
mod split;

pub use configuration::{ContainerConfiguration, LayoutKind, SplitAxis};
pub use container::Container;
pub use error::LayoutError;
pub use holder::{PlacementMode, WindowHolder};
