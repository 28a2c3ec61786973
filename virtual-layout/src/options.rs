use alloc::rc::Rc;
use core::fmt;

use crate::{Axis, LayoutElement, ObserveOptions, ScrollElement, ViewportProvider};

/// Receives the committed total layout extent.
pub type LayoutSizeSink = Rc<dyn Fn(u64)>;

/// Receives the leading offset before the rendered window.
pub type LayoutShiftSink = Rc<dyn Fn(u64)>;

/// Construction-time configuration for [`crate::LayoutEngine`].
///
/// The four collaborators a mount cannot work without are positional arguments of
/// [`LayoutOptions::new`]; everything else has a default. Fields are reference counted, so
/// cloning the options is cheap.
#[derive(Clone)]
pub struct LayoutOptions {
    /// The node whose measured extent represents one rendered sample block.
    pub layout_element: Rc<dyn LayoutElement>,
    /// The scroll container. Only used to locate its parent.
    pub scroll_element: Rc<dyn ScrollElement>,
    pub set_layout_shift: LayoutShiftSink,
    pub set_layout_size: LayoutSizeSink,

    /// Fixed for the lifetime of a mount.
    pub axis: Axis,

    /// Global viewport used when the scroll container hangs off the page root.
    ///
    /// Only consulted when the scroll container's parent is the page root or missing. Mounts
    /// that can end up there must set it; probing that branch without a provider is a host
    /// contract violation.
    pub viewport: Option<Rc<dyn ViewportProvider>>,

    /// What the host should observe on the layout root while a convergence is pending.
    pub observe: ObserveOptions,
}

impl LayoutOptions {
    pub fn new(
        layout_element: Rc<dyn LayoutElement>,
        scroll_element: Rc<dyn ScrollElement>,
        set_layout_shift: impl Fn(u64) + 'static,
        set_layout_size: impl Fn(u64) + 'static,
    ) -> Self {
        Self {
            layout_element,
            scroll_element,
            set_layout_shift: Rc::new(set_layout_shift),
            set_layout_size: Rc::new(set_layout_size),
            axis: Axis::default(),
            viewport: None,
            observe: ObserveOptions::default(),
        }
    }

    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    pub fn with_horizontal(self, is_horizontal: bool) -> Self {
        self.with_axis(Axis::from_horizontal(is_horizontal))
    }

    pub fn with_viewport(mut self, viewport: impl ViewportProvider + 'static) -> Self {
        self.viewport = Some(Rc::new(viewport));
        self
    }

    pub fn with_observe_options(mut self, observe: ObserveOptions) -> Self {
        self.observe = observe;
        self
    }
}

impl fmt::Debug for LayoutOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutOptions")
            .field("axis", &self.axis)
            .field("observe", &self.observe)
            .field("has_viewport", &self.viewport.is_some())
            .finish_non_exhaustive()
    }
}
