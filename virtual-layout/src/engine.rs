use alloc::boxed::Box;
use core::fmt;
use core::num::NonZeroUsize;

use crate::{
    ContainerStyle, Convergence, ConvergenceWatcher, LayoutEstimator, LayoutOptions, LayoutSnapshot,
    LayoutState, PendingConvergence, SizeProbe,
};

/// The windowing collaborator: decides which indexes are materialized.
///
/// Registered on a [`LayoutEngine`] so that every committed layout size triggers a window
/// recalculation.
pub trait WindowCoordinator {
    fn on_layout_changed(&mut self, snapshot: &LayoutSnapshot);
}

impl<F: FnMut(&LayoutSnapshot)> WindowCoordinator for F {
    fn on_layout_changed(&mut self, snapshot: &LayoutSnapshot) {
        self(snapshot);
    }
}

/// The per-mount layout engine.
///
/// Bundles the estimator, the convergence watcher and the committed layout state behind the
/// surface a host and a windowing collaborator use. It holds no UI objects beyond the
/// references passed in [`LayoutOptions`], and never mutates them.
///
/// Dropping the engine disconnects any pending observation.
pub struct LayoutEngine {
    estimator: LayoutEstimator,
    watcher: ConvergenceWatcher,
    state: LayoutState,
    coordinator: Option<Box<dyn WindowCoordinator>>,
}

impl LayoutEngine {
    pub fn new(options: LayoutOptions) -> Self {
        ldebug!(axis = ?options.axis, "LayoutEngine::new");
        let probe = SizeProbe::new(
            options.layout_element,
            options.scroll_element,
            options.viewport,
            options.axis,
        );
        Self {
            estimator: LayoutEstimator::new(probe),
            watcher: ConvergenceWatcher::new(options.observe),
            state: LayoutState::new(options.set_layout_size, options.set_layout_shift),
            coordinator: None,
        }
    }

    pub fn estimator(&self) -> &LayoutEstimator {
        &self.estimator
    }

    pub fn watcher(&self) -> &ConvergenceWatcher {
        &self.watcher
    }

    pub fn state(&self) -> &LayoutState {
        &self.state
    }

    /// Registers the windowing collaborator, replacing (and returning) the previous one.
    pub fn register_window_coordinator(
        &mut self,
        coordinator: impl WindowCoordinator + 'static,
    ) -> Option<Box<dyn WindowCoordinator>> {
        self.coordinator.replace(Box::new(coordinator))
    }

    pub fn unregister_window_coordinator(&mut self) -> Option<Box<dyn WindowCoordinator>> {
        self.coordinator.take()
    }

    pub fn compute_layout_size(&mut self, total: usize, display_count: usize) -> u64 {
        self.estimator.compute_layout_size(total, display_count)
    }

    pub fn has_computed(&self) -> bool {
        self.estimator.has_computed()
    }

    pub fn compute_one_element_extent(
        &mut self,
        display_count: usize,
        grid: Option<NonZeroUsize>,
    ) -> u32 {
        self.estimator.compute_one_element_extent(display_count, grid)
    }

    pub fn compute_one_screen_elements_count(
        &mut self,
        one_element_extent: Option<u32>,
        grid: Option<NonZeroUsize>,
    ) -> usize {
        self.estimator
            .compute_one_screen_elements_count(one_element_extent, grid)
    }

    pub fn get_element_size(&self) -> u32 {
        self.estimator.get_element_size()
    }

    pub fn get_parent_container_size(&self) -> u32 {
        self.estimator.get_parent_container_size()
    }

    /// See [`ConvergenceWatcher::observe_until_measured`].
    pub fn observe_until_measured(
        &mut self,
        total: usize,
        display_count: usize,
    ) -> PendingConvergence {
        self.watcher
            .observe_until_measured(self.estimator.probe(), total, display_count)
    }

    /// Forwards one flushed batch of structural changes on the layout root.
    pub fn on_mutation(&mut self) -> Option<Convergence> {
        self.watcher.on_mutation(&mut self.estimator)
    }

    /// Tears down the pending observation. Hosts call this on unmount.
    pub fn disconnect(&mut self) -> bool {
        let disconnected = self.watcher.disconnect(self.estimator.probe());
        if disconnected {
            ldebug!("LayoutEngine::disconnect: dropped pending observation");
        }
        disconnected
    }

    pub fn is_observing(&self) -> bool {
        self.watcher.is_observing()
    }

    pub fn last_computed_layout_size(&self) -> Option<u64> {
        self.watcher.last_computed_layout_size()
    }

    pub fn layout_size(&self) -> Option<u64> {
        self.state.layout_size()
    }

    /// Commits a new total extent, forwards it to the host sink, then lets the registered
    /// coordinator recalculate its window.
    pub fn set_layout_size(&mut self, layout_size: u64) {
        self.state.commit_layout_size(layout_size);
        if let Some(coordinator) = self.coordinator.as_mut() {
            let snapshot = snapshot_of(&self.estimator, &self.state);
            coordinator.on_layout_changed(&snapshot);
        }
    }

    pub fn recommit_layout_size(&self) {
        self.state.recommit_layout_size();
    }

    pub fn layout_shift(&self) -> u64 {
        self.state.layout_shift()
    }

    pub fn set_layout_shift(&mut self, layout_shift: u64) {
        self.state.set_layout_shift(layout_shift);
    }

    pub fn container_style(&self) -> ContainerStyle {
        self.state.container_style()
    }

    pub fn snapshot(&self) -> LayoutSnapshot {
        snapshot_of(&self.estimator, &self.state)
    }
}

fn snapshot_of(estimator: &LayoutEstimator, state: &LayoutState) -> LayoutSnapshot {
    LayoutSnapshot {
        layout_size: state.layout_size(),
        layout_shift: state.layout_shift(),
        one_element_extent: estimator.cached_one_element_extent(),
        displayed_elements_count: estimator.displayed_elements_count(),
    }
}

impl Drop for LayoutEngine {
    fn drop(&mut self) {
        self.watcher.disconnect(self.estimator.probe());
    }
}

impl fmt::Debug for LayoutEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutEngine")
            .field("estimator", &self.estimator)
            .field("watcher", &self.watcher)
            .field("state", &self.state)
            .field("has_coordinator", &self.coordinator.is_some())
            .finish()
    }
}
