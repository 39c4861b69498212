use std::mem;

use tracing::{debug, instrument, trace, warn};

use super::configuration::ContainerConfiguration;
use super::error::LayoutError;
use super::holder::WindowHolder;
use super::split;
use crate::common::collections::HashSet;
use crate::sys::geometry::Boundary;

#[derive(Debug)]
enum Shape {
    Leaf(WindowHolder),
    /// Always at least two children once normalized.
    Internal(Vec<Container>),
}

/// A node of the layout tree.
///
/// A container is either a leaf wrapping a single window, or an internal node
/// owning two or more child containers that split its boundary between them.
/// Shapes are kept canonical by normalization: a flat list of several windows
/// is exploded into one leaf per window, and a node left with a single child
/// collapses into that child.
///
/// Boundaries propagate in two phases. [`Container::set_boundary`] records a
/// node's boundary (moving the window right away if the node is a leaf), and
/// [`Container::enforce_layout`] pushes it down into the children. Setting the
/// boundary of an internal node without enforcing its layout leaves its
/// descendants where they were; [`Container::resize`] does both.
#[derive(Debug)]
pub struct Container {
    configuration: ContainerConfiguration,
    boundary: Boundary,
    shape: Shape,
}

impl Container {
    /// Creates a container from either a list of windows or a list of child
    /// containers, normalizes it and lays it out. A container that ends up as
    /// a leaf moves its window to `boundary`.
    pub fn new(
        configuration: ContainerConfiguration,
        boundary: Boundary,
        windows: Vec<WindowHolder>,
        children: Vec<Container>,
    ) -> Result<Self, LayoutError> {
        if !windows.is_empty() && !children.is_empty() {
            return Err(LayoutError::InvalidShape {
                windows: windows.len(),
                children: children.len(),
            });
        }
        check_unique(windows.iter().map(std::iter::once).enumerate())?;
        check_unique(children.iter().map(Container::windows).enumerate())?;
        let (configuration, shape) = normalize(configuration, boundary, windows, children)?;
        let mut container = Container { configuration, boundary, shape };
        container.set_boundary(boundary)?;
        container.enforce_layout()?;
        Ok(container)
    }

    pub fn with_windows(
        configuration: ContainerConfiguration,
        boundary: Boundary,
        windows: Vec<WindowHolder>,
    ) -> Result<Self, LayoutError> {
        Self::new(configuration, boundary, windows, Vec::new())
    }

    pub fn with_children(
        configuration: ContainerConfiguration,
        boundary: Boundary,
        children: Vec<Container>,
    ) -> Result<Self, LayoutError> {
        Self::new(configuration, boundary, Vec::new(), children)
    }

    pub fn configuration(&self) -> ContainerConfiguration { self.configuration }

    pub fn boundary(&self) -> Boundary { self.boundary }

    /// Whether this node is internal, i.e. holds child containers instead of
    /// a window.
    pub fn is_container(&self) -> bool { matches!(self.shape, Shape::Internal(_)) }

    /// The window of a leaf.
    pub fn window(&self) -> Result<&WindowHolder, LayoutError> {
        match &self.shape {
            Shape::Leaf(holder) => Ok(holder),
            Shape::Internal(children) => {
                Err(LayoutError::NotASingleWindow { children: children.len() })
            }
        }
    }

    /// Immediate children; empty for a leaf.
    pub fn children(&self) -> &[Container] {
        match &self.shape {
            Shape::Leaf(_) => &[],
            Shape::Internal(children) => children,
        }
    }

    /// All windows in the subtree, in pre-order.
    pub fn windows(&self) -> Box<dyn Iterator<Item = &WindowHolder> + '_> {
        match &self.shape {
            Shape::Leaf(holder) => Box::new(std::iter::once(holder)),
            Shape::Internal(children) => Box::new(children.iter().flat_map(Container::windows)),
        }
    }

    pub fn window_count(&self) -> usize { self.windows().count() }

    /// Adds a window to a leaf, exploding it into an internal node with one
    /// leaf per window.
    ///
    /// The new children keep placeholder boundaries until the layout is
    /// enforced again; this does not call [`Container::enforce_layout`].
    /// Adding the window the leaf already holds is an `InvalidChild` error.
    pub fn add_window(&mut self, holder: WindowHolder) -> Result<(), LayoutError> {
        if let Shape::Internal(children) = &self.shape {
            return Err(LayoutError::InvalidState { windows: 1, children: children.len() });
        }
        let held = self.windows().chain(std::iter::once(&holder));
        check_unique(held.map(std::iter::once).enumerate())?;
        let (mut windows, children) = self.take_parts();
        windows.push(holder);
        (self.configuration, self.shape) =
            normalize(self.configuration, self.boundary, windows, children)?;
        Ok(())
    }

    /// Re-applies the normalization rules to the current shape.
    pub fn normalize(&mut self) -> Result<(), LayoutError> {
        let (windows, children) = self.take_parts();
        (self.configuration, self.shape) =
            normalize(self.configuration, self.boundary, windows, children)?;
        Ok(())
    }

    /// Records a new boundary for this node. A leaf moves its window
    /// immediately; an internal node only repositions its descendants on the
    /// next [`Container::enforce_layout`].
    pub fn set_boundary(&mut self, boundary: Boundary) -> Result<(), LayoutError> {
        self.boundary = boundary;
        if let Shape::Leaf(holder) = &mut self.shape {
            holder.set_boundary(boundary)?;
        }
        Ok(())
    }

    /// Assigns each child its share of this node's boundary, then recurses
    /// into internal children.
    ///
    /// All children of a node are assigned before any grandchild. A failure
    /// stops the sweep; windows moved before it stay where they were put.
    #[instrument(level = "trace", skip(self), fields(boundary = %self.boundary))]
    pub fn enforce_layout(&mut self) -> Result<(), LayoutError> {
        let Shape::Internal(children) = &mut self.shape else {
            return Ok(());
        };
        let frames = split::arrange(self.configuration, self.boundary, children.len())?;
        for (child, frame) in children.iter_mut().zip(frames) {
            trace!(boundary = %frame, leaf = !child.is_container(), "Assigning child boundary");
            child.set_boundary(frame)?;
        }
        for child in children.iter_mut().filter(|c| c.is_container()) {
            child.enforce_layout()?;
        }
        Ok(())
    }

    /// Sets the boundary and lays out the whole subtree in one step.
    pub fn resize(&mut self, boundary: Boundary) -> Result<(), LayoutError> {
        self.set_boundary(boundary)?;
        self.enforce_layout()?;
        debug!("Tree:\n{}", self.draw_tree().trim());
        Ok(())
    }

    pub fn draw_tree(&self) -> String {
        let mut out = String::new();
        // Writing into a String does not fail.
        let _ = ascii_tree::write_tree(&mut out, &self.ascii_tree());
        out
    }

    fn ascii_tree(&self) -> ascii_tree::Tree {
        match &self.shape {
            Shape::Leaf(holder) => ascii_tree::Tree::Leaf(vec![format!(
                "{} {} {}",
                holder.window().id(),
                holder.mode(),
                self.boundary
            )]),
            Shape::Internal(children) => ascii_tree::Tree::Node(
                format!(
                    "{} {} {}",
                    self.configuration.layout(),
                    self.configuration.axis(),
                    self.boundary
                ),
                children.iter().map(Container::ascii_tree).collect(),
            ),
        }
    }

    fn take_parts(&mut self) -> (Vec<WindowHolder>, Vec<Container>) {
        match mem::replace(&mut self.shape, Shape::Internal(Vec::new())) {
            Shape::Leaf(holder) => (vec![holder], Vec::new()),
            Shape::Internal(children) => (Vec::new(), children),
        }
    }
}

/// A window may only be held by one leaf of a tree. `groups` yields the
/// windows of each entry, tagged with the entry's position.
fn check_unique<'a, I>(groups: impl IntoIterator<Item = (usize, I)>) -> Result<(), LayoutError>
where
    I: Iterator<Item = &'a WindowHolder>,
{
    let mut seen = HashSet::default();
    for (index, holders) in groups {
        for holder in holders {
            let id = holder.window().id();
            if !seen.insert(id) {
                return Err(LayoutError::InvalidChild {
                    index,
                    reason: format!("window {id} is already held by another container"),
                });
            }
        }
    }
    Ok(())
}

/// Returns the configuration and shape the node settles on. Collapsing into
/// an internal child takes over that child's configuration along with its
/// children, so the child's arrangement survives.
fn normalize(
    configuration: ContainerConfiguration,
    boundary: Boundary,
    mut windows: Vec<WindowHolder>,
    mut children: Vec<Container>,
) -> Result<(ContainerConfiguration, Shape), LayoutError> {
    match (windows.len(), children.len()) {
        (1, 0) => Ok((configuration, Shape::Leaf(windows.swap_remove(0)))),
        (0, c) if c >= 2 => Ok((configuration, Shape::Internal(children))),
        (0, 1) => {
            let child = children.swap_remove(0);
            trace!(leaf = !child.is_container(), "Collapsing single child into parent");
            match child.shape {
                Shape::Leaf(holder) => Ok((configuration, Shape::Leaf(holder))),
                internal @ Shape::Internal(_) => Ok((child.configuration, internal)),
            }
        }
        (w, 0) if w > 1 => {
            trace!(windows = w, "Exploding windows into child containers");
            let children = windows
                .into_iter()
                .map(|holder| Container {
                    configuration,
                    boundary: placeholder_boundary(&holder, boundary),
                    shape: Shape::Leaf(holder),
                })
                .collect();
            Ok((configuration, Shape::Internal(children)))
        }
        (w, c) => Err(LayoutError::InvalidState { windows: w, children: c }),
    }
}

/// The boundary a freshly exploded leaf starts with, before the parent lays
/// it out.
fn placeholder_boundary(holder: &WindowHolder, parent: Boundary) -> Boundary {
    if let Some(boundary) = holder.last_boundary() {
        return boundary;
    }
    match holder.window().boundary() {
        Ok(boundary) => boundary,
        Err(e) => {
            warn!(window = %holder.window().id(), error = %e, "Could not read window boundary, using parent's");
            parent
        }
    }
}
