use core::num::NonZeroUsize;

/// The scroll axis of a mount.
///
/// Selects which extent is read from the layout root and from the viewport: the block extent
/// (height) for vertical lists, the inline extent (width) for horizontal ones.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    #[default]
    Vertical,
    Horizontal,
}

impl Axis {
    pub fn from_horizontal(is_horizontal: bool) -> Self {
        if is_horizontal {
            Self::Horizontal
        } else {
            Self::Vertical
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Horizontal)
    }
}

/// Which structural changes on the layout root a host should forward to the watcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObserveOptions {
    pub child_list: bool,
    pub character_data: bool,
    /// Observe descendants as well as direct children.
    pub subtree: bool,
}

impl Default for ObserveOptions {
    fn default() -> Self {
        Self {
            child_list: true,
            character_data: true,
            subtree: true,
        }
    }
}

/// The collection-side inputs of a layout computation.
///
/// Hosts compare the previous and next inputs to decide whether sizes must be recomputed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutInputs {
    /// Full logical item count.
    pub total: usize,
    /// Items currently materialized. Must be at least 1.
    pub display_count: usize,
    /// Items per row, `None` for a linear list.
    pub grid: Option<NonZeroUsize>,
}

impl LayoutInputs {
    pub fn new(total: usize, display_count: usize) -> Self {
        Self {
            total,
            display_count,
            grid: None,
        }
    }

    pub fn with_grid(mut self, grid: Option<NonZeroUsize>) -> Self {
        self.grid = grid;
        self
    }
}

/// The one-shot result of a convergence observation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Convergence {
    /// Estimated total extent of the whole collection (never 0).
    pub layout_size: u64,
    /// The one-screen element count cached by the estimator when the observation resolved.
    ///
    /// `None` when no one-screen count had been computed yet.
    pub displayed_elements_count: Option<usize>,
}

/// A measured two-dimensional size, as reported by the host's layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const ZERO: Self = Self {
        width: 0,
        height: 0,
    };

    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns the extent along `axis` (height for vertical, width for horizontal).
    pub fn along(self, axis: Axis) -> u32 {
        match axis {
            Axis::Vertical => self.height,
            Axis::Horizontal => self.width,
        }
    }
}
