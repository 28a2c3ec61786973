//! A headless layout-sizing engine for virtualized scroll containers.
//!
//! A virtualized list only materializes a handful of items, yet the scroll container must be
//! sized for the whole collection. This crate estimates that size from one rendered sample
//! block, works out how many items fill a screen, and waits for the host's first real paint
//! before reporting a converged estimate:
//!
//! - [`LayoutEstimator`] turns a measured sample into a total extent, a per-row extent and a
//!   one-screen item count.
//! - [`ConvergenceWatcher`] observes structural changes on the layout root until a non-zero
//!   measurement exists, then resolves a one-shot [`PendingConvergence`].
//! - [`LayoutState`] holds the committed total extent and layout shift and forwards every write
//!   to the host.
//! - [`LayoutEngine`] bundles the three for one mount.
//!
//! It is UI-agnostic. A TUI/GUI/DOM layer is expected to provide:
//! - the layout root and scroll container, via [`LayoutElement`] and [`ScrollElement`]
//! - the global viewport size, via [`ViewportProvider`]
//! - a call to [`LayoutEngine::on_mutation`] for every flushed batch of structural changes
//!
//! Which indexes are materialized is decided by a windowing collaborator
//! ([`WindowCoordinator`]); see the `virtual-layout-adapter` crate for the mount lifecycle.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod engine;
mod estimator;
mod options;
mod probe;
mod state;
mod types;
mod watcher;

#[cfg(test)]
mod tests;

pub use engine::{LayoutEngine, WindowCoordinator};
pub use estimator::{LayoutEstimator, layout_size, one_element_extent, one_screen_count};
pub use options::{LayoutOptions, LayoutShiftSink, LayoutSizeSink};
pub use probe::{
    FixedViewport, LayoutElement, ScrollElement, ScrollParent, SizeProbe, ViewportProvider,
};
pub use state::{ContainerStyle, LayoutSnapshot, LayoutState, MainExtent};
pub use types::{Axis, Convergence, LayoutInputs, ObserveOptions, Size};
pub use watcher::{ConvergenceWatcher, PendingConvergence};
