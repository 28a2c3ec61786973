use alloc::rc::Rc;
use core::fmt;

use crate::{Axis, ObserveOptions, Size};

/// The node whose rendered children form the sample block used for extrapolation.
///
/// Implementations read layout only; the engine never mutates the node.
pub trait LayoutElement {
    /// The laid-out border-box size (DOM `offsetWidth`/`offsetHeight`).
    ///
    /// Unmounted or not-yet-painted nodes report zero.
    fn offset_size(&self) -> Size;

    /// The inner size of a window-like root (DOM `innerWidth`/`innerHeight`).
    ///
    /// Block elements leave this at zero.
    fn inner_size(&self) -> Size {
        Size::ZERO
    }

    /// Starts forwarding structural changes on this node to the engine.
    ///
    /// Called when an observation starts. Hosts without a native mutation source can ignore it
    /// and call the engine's `on_mutation` after each flush instead.
    fn observe_mutations(&self, options: ObserveOptions) {
        let _ = options;
    }

    /// Stops forwarding structural changes. Called on resolution, supersession and teardown.
    fn disconnect_mutations(&self) {}
}

/// Where a scroll container sits in the render tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollParent {
    /// A regular element with a measured size.
    Element(Size),
    /// The page root (`<html>`/`<body>`).
    DocumentRoot,
    /// No parent (detached or not yet attached).
    Detached,
}

/// The scroll container. Only its parent is ever consulted.
pub trait ScrollElement {
    fn parent(&self) -> ScrollParent;
}

/// The global viewport extent used when the scroll container hangs off the page root.
pub trait ViewportProvider {
    fn viewport_size(&self) -> Size;
}

impl<F: Fn() -> Size> ViewportProvider for F {
    fn viewport_size(&self) -> Size {
        self()
    }
}

/// A viewport of a fixed size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FixedViewport(pub Size);

impl ViewportProvider for FixedViewport {
    fn viewport_size(&self) -> Size {
        self.0
    }
}

/// Reads extents along the mount's axis.
///
/// Every call reads the host fresh; nothing is cached here.
#[derive(Clone)]
pub struct SizeProbe {
    layout_element: Rc<dyn LayoutElement>,
    scroll_element: Rc<dyn ScrollElement>,
    viewport: Option<Rc<dyn ViewportProvider>>,
    axis: Axis,
}

impl SizeProbe {
    pub fn new(
        layout_element: Rc<dyn LayoutElement>,
        scroll_element: Rc<dyn ScrollElement>,
        viewport: Option<Rc<dyn ViewportProvider>>,
        axis: Axis,
    ) -> Self {
        Self {
            layout_element,
            scroll_element,
            viewport,
            axis,
        }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub(crate) fn layout_element(&self) -> &dyn LayoutElement {
        &*self.layout_element
    }

    /// Extent of the sample block: the offset extent, else the inner extent of a window-like
    /// root, else 0.
    pub fn element_size(&self) -> u32 {
        let offset = self.layout_element.offset_size().along(self.axis);
        if offset != 0 {
            return offset;
        }
        self.layout_element.inner_size().along(self.axis)
    }

    /// Whether the layout root reports a painted block extent.
    ///
    /// Window-like inner extents do not count: only a real paint makes a sample available.
    pub fn is_painted(&self) -> bool {
        self.layout_element.offset_size().along(self.axis) != 0
    }

    /// Extent available to the list: the scroll container parent's extent, or the global
    /// viewport when the parent is the page root or missing.
    ///
    /// The scroll container itself is never measured since its size follows its content.
    ///
    /// Falling back to the viewport without a [`ViewportProvider`] is a host contract
    /// violation: it is reported and yields 0.
    pub fn parent_container_size(&self) -> u32 {
        match self.scroll_element.parent() {
            ScrollParent::Element(size) => size.along(self.axis),
            ScrollParent::DocumentRoot | ScrollParent::Detached => match &self.viewport {
                Some(viewport) => viewport.viewport_size().along(self.axis),
                None => {
                    lwarn!("parent_container_size: page-root parent without a viewport provider");
                    debug_assert!(
                        self.viewport.is_some(),
                        "page-root scroll container needs a viewport provider"
                    );
                    0
                }
            },
        }
    }
}

impl fmt::Debug for SizeProbe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SizeProbe")
            .field("axis", &self.axis)
            .field("has_viewport", &self.viewport.is_some())
            .finish_non_exhaustive()
    }
}
