use virtual_layout::{
    ContainerStyle, LayoutEngine, LayoutInputs, LayoutOptions, PendingConvergence,
    WindowCoordinator,
};

/// Where a mount is in its measuring lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MountPhase {
    Unmounted,
    /// Waiting for the first paint of the current inputs.
    Measuring,
    /// The committed size is based on a real measurement.
    Converged,
}

/// Layout values derived once a mount converged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeasuredLayout {
    pub layout_size: u64,
    pub one_element_extent: u32,
    pub one_screen_count: usize,
}

/// A framework-neutral controller that drives a [`LayoutEngine`] through a mount's lifecycle.
///
/// This type does not hold any UI objects. Adapters drive it by calling:
/// - `mount` once the layout root and scroll container exist
/// - `on_mutation` for every flushed batch of structural changes on the layout root
/// - `set_inputs` when the collection is appended to or replaced
/// - `unmount` when the host view goes away
#[derive(Debug)]
pub struct MountController {
    engine: LayoutEngine,
    inputs: Option<LayoutInputs>,
    pending: Option<PendingConvergence>,
    phase: MountPhase,
}

impl MountController {
    pub fn new(options: LayoutOptions) -> Self {
        Self::from_engine(LayoutEngine::new(options))
    }

    pub fn from_engine(engine: LayoutEngine) -> Self {
        Self {
            engine,
            inputs: None,
            pending: None,
            phase: MountPhase::Unmounted,
        }
    }

    pub fn engine(&self) -> &LayoutEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut LayoutEngine {
        &mut self.engine
    }

    pub fn phase(&self) -> MountPhase {
        self.phase
    }

    pub fn inputs(&self) -> Option<LayoutInputs> {
        self.inputs
    }

    pub fn register_window_coordinator(&mut self, coordinator: impl WindowCoordinator + 'static) {
        self.engine.register_window_coordinator(coordinator);
    }

    /// Runs the zero-knowledge pass for `inputs` and starts waiting for the first paint.
    ///
    /// Commits whatever the estimator produces right away (usually 0, i.e. "auto") and returns it.
    pub fn mount(&mut self, inputs: LayoutInputs) -> u64 {
        self.inputs = Some(inputs);
        let layout_size = self
            .engine
            .compute_layout_size(inputs.total, inputs.display_count);
        self.engine.set_layout_size(layout_size);
        self.pending = Some(
            self.engine
                .observe_until_measured(inputs.total, inputs.display_count),
        );
        self.phase = MountPhase::Measuring;
        layout_size
    }

    /// Applies new collection inputs.
    ///
    /// Unchanged inputs are a no-op. Otherwise sizes are re-estimated and the previous pending
    /// observation is superseded. Returns `true` when a new estimate was started.
    pub fn set_inputs(&mut self, inputs: LayoutInputs) -> bool {
        if self.inputs == Some(inputs) {
            return false;
        }
        self.mount(inputs);
        true
    }

    /// Forwards one flushed batch of structural changes.
    ///
    /// On convergence, computes the per-element extent and the one-screen count before
    /// committing the converged size, so a registered coordinator sees fresh values.
    pub fn on_mutation(&mut self) -> Option<MeasuredLayout> {
        self.engine.on_mutation()?;
        let convergence = self.pending.take()?.try_take()?;
        let inputs = self.inputs?;

        let one_element_extent = self
            .engine
            .compute_one_element_extent(inputs.display_count, inputs.grid);
        let one_screen_count = self
            .engine
            .compute_one_screen_elements_count(Some(one_element_extent), inputs.grid);
        self.engine.set_layout_size(convergence.layout_size);
        self.phase = MountPhase::Converged;

        Some(MeasuredLayout {
            layout_size: convergence.layout_size,
            one_element_extent,
            one_screen_count,
        })
    }

    /// Records the leading offset chosen by the windowing collaborator.
    pub fn set_layout_shift(&mut self, layout_shift: u64) {
        self.engine.set_layout_shift(layout_shift);
    }

    pub fn container_style(&self) -> ContainerStyle {
        self.engine.container_style()
    }

    /// Tears down the pending observation and forgets the inputs.
    ///
    /// Returns `true` when an observation was still pending.
    pub fn unmount(&mut self) -> bool {
        self.pending = None;
        self.inputs = None;
        self.phase = MountPhase::Unmounted;
        self.engine.disconnect()
    }
}
