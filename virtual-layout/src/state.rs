use core::fmt;

use crate::{LayoutShiftSink, LayoutSizeSink};

/// How the host should size the scroll container along the axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MainExtent {
    /// Let the content decide (no estimate yet).
    Auto,
    /// An exact extent in pixels.
    Exact(u64),
}

/// Paint-time geometry of the scroll container.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContainerStyle {
    pub main_extent: MainExtent,
    /// Padding before the first rendered item, equal to the layout shift.
    pub leading_padding: u64,
}

/// A read-only view of the committed layout values and the estimator's cached fallbacks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutSnapshot {
    pub layout_size: Option<u64>,
    pub layout_shift: u64,
    pub one_element_extent: Option<u32>,
    pub displayed_elements_count: Option<usize>,
}

/// The committed total extent and leading offset of a mount.
///
/// A typed, observable slot: every write is forwarded to the host's sink so the host can
/// re-render. Values are never validated; shrinking sizes are legitimate and propagate.
#[derive(Clone)]
pub struct LayoutState {
    layout_size: Option<u64>,
    layout_shift: u64,
    set_layout_size: LayoutSizeSink,
    set_layout_shift: LayoutShiftSink,
}

impl LayoutState {
    pub fn new(set_layout_size: LayoutSizeSink, set_layout_shift: LayoutShiftSink) -> Self {
        Self {
            layout_size: None,
            layout_shift: 0,
            set_layout_size,
            set_layout_shift,
        }
    }

    /// The last committed layout size, `None` before the first commit.
    pub fn layout_size(&self) -> Option<u64> {
        self.layout_size
    }

    /// Overwrites the committed size and forwards it to the sink. Negative sizes cannot be
    /// represented; smaller ones are committed like any other.
    pub fn commit_layout_size(&mut self, layout_size: u64) {
        ltrace!(layout_size, prev = ?self.layout_size, "commit_layout_size");
        self.layout_size = Some(layout_size);
        (self.set_layout_size)(layout_size);
    }

    /// Re-emits the committed size to the sink. Does nothing before the first commit.
    pub fn recommit_layout_size(&self) {
        if let Some(layout_size) = self.layout_size {
            (self.set_layout_size)(layout_size);
        }
    }

    /// The last set layout shift, 0 if never set.
    pub fn layout_shift(&self) -> u64 {
        self.layout_shift
    }

    pub fn set_layout_shift(&mut self, layout_shift: u64) {
        ltrace!(layout_shift, "set_layout_shift");
        self.layout_shift = layout_shift;
        (self.set_layout_shift)(layout_shift);
    }

    pub fn container_style(&self) -> ContainerStyle {
        let main_extent = match self.layout_size {
            Some(size) if size > 0 => MainExtent::Exact(size),
            _ => MainExtent::Auto,
        };
        ContainerStyle {
            main_extent,
            leading_padding: self.layout_shift,
        }
    }
}

impl fmt::Debug for LayoutState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutState")
            .field("layout_size", &self.layout_size)
            .field("layout_shift", &self.layout_shift)
            .finish_non_exhaustive()
    }
}
