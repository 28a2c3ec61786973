use core::num::NonZeroUsize;

use crate::SizeProbe;

/// Extrapolates a measured sample block to the whole collection.
///
/// `ceil(total / display_count) * measured`: one sample block per `display_count` items.
/// Returns 0 while `measured` is 0.
pub fn layout_size(total: usize, display_count: usize, measured: u32) -> u64 {
    let display = checked_count(display_count);
    (total.div_ceil(display) as u64).saturating_mul(measured as u64)
}

/// Average extent of one row of the sample block.
///
/// Without a grid every item is a row. With a grid, `display_count` items wrap into
/// `ceil(display_count / grid)` rows. Rounds up, so `extent * rows >= measured`.
pub fn one_element_extent(measured: u32, display_count: usize, grid: Option<NonZeroUsize>) -> u32 {
    let display = checked_count(display_count);
    let rows = match grid {
        Some(grid) => display.div_ceil(grid.get()),
        None => display,
    };
    // `rows >= 1`, so the quotient never exceeds `measured`.
    (measured as u64).div_ceil(rows as u64) as u32
}

/// Upper bound on the number of items needed to fill `viewport`.
///
/// `ceil(viewport / one_element) * grid`. Returns 0 when `one_element` is 0.
pub fn one_screen_count(viewport: u32, one_element: u32, grid: Option<NonZeroUsize>) -> usize {
    if one_element == 0 {
        return 0;
    }
    let rows = viewport.div_ceil(one_element) as usize;
    rows.saturating_mul(grid.map_or(1, NonZeroUsize::get))
}

fn checked_count(display_count: usize) -> usize {
    if display_count == 0 {
        lwarn!("layout estimator called with a zero display count");
        debug_assert!(display_count > 0, "display count must be at least 1");
        return 1;
    }
    display_count
}

/// Converts partial measurements into size hints.
///
/// The estimator reads the host on every call. The only state it keeps is the first-call flag
/// and the two fallback values documented on
/// [`compute_one_screen_elements_count`](Self::compute_one_screen_elements_count).
#[derive(Clone, Debug)]
pub struct LayoutEstimator {
    probe: SizeProbe,
    has_computed: bool,
    one_element_extent: Option<u32>,
    displayed_elements_count: Option<usize>,
}

impl LayoutEstimator {
    pub fn new(probe: SizeProbe) -> Self {
        Self {
            probe,
            has_computed: false,
            one_element_extent: None,
            displayed_elements_count: None,
        }
    }

    pub fn probe(&self) -> &SizeProbe {
        &self.probe
    }

    /// Estimated extent of the whole collection.
    ///
    /// A result of 0 means "not measured yet", not "empty". Use [`Self::has_computed`] to tell a
    /// mount that never estimated apart from one that estimated before the first paint.
    pub fn compute_layout_size(&mut self, total: usize, display_count: usize) -> u64 {
        self.has_computed = true;
        let measured = self.probe.element_size();
        let size = layout_size(total, display_count, measured);
        ltrace!(total, display_count, measured, size, "compute_layout_size");
        size
    }

    /// Whether [`Self::compute_layout_size`] ran at least once.
    pub fn has_computed(&self) -> bool {
        self.has_computed
    }

    /// Average per-row extent of the current sample. Cached as a fallback for
    /// [`Self::compute_one_screen_elements_count`].
    pub fn compute_one_element_extent(
        &mut self,
        display_count: usize,
        grid: Option<NonZeroUsize>,
    ) -> u32 {
        let measured = self.probe.element_size();
        let extent = one_element_extent(measured, display_count, grid);
        ltrace!(display_count, measured, extent, "compute_one_element_extent");
        self.one_element_extent = Some(extent);
        extent
    }

    /// Number of items that fill one viewport.
    ///
    /// The per-row extent is taken from, in order:
    /// 1. `one_element_extent`, when it is `Some` and non-zero;
    /// 2. the value cached by the last [`Self::compute_one_element_extent`], when non-zero.
    ///
    /// When neither is available the count is unknown and 0 is returned without touching the
    /// cache. Otherwise the result is cached as the displayed element count reported by
    /// convergence observations.
    pub fn compute_one_screen_elements_count(
        &mut self,
        one_element_extent: Option<u32>,
        grid: Option<NonZeroUsize>,
    ) -> usize {
        let nonzero = |v: &u32| *v != 0;
        let Some(per_row) = one_element_extent
            .filter(nonzero)
            .or(self.one_element_extent.filter(nonzero))
        else {
            ldebug!("compute_one_screen_elements_count: no element extent yet");
            return 0;
        };
        let viewport = self.probe.parent_container_size();
        let count = one_screen_count(viewport, per_row, grid);
        ltrace!(viewport, per_row, count, "compute_one_screen_elements_count");
        self.displayed_elements_count = Some(count);
        count
    }

    pub fn cached_one_element_extent(&self) -> Option<u32> {
        self.one_element_extent
    }

    pub fn displayed_elements_count(&self) -> Option<usize> {
        self.displayed_elements_count
    }

    /// Measured extent of the layout root along the axis, 0 when unmeasured.
    pub fn get_element_size(&self) -> u32 {
        self.probe.element_size()
    }

    /// Extent available to the list along the axis.
    pub fn get_parent_container_size(&self) -> u32 {
        self.probe.parent_container_size()
    }
}
