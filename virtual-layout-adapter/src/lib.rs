//! Host lifecycle utilities for the `virtual-layout` crate.
//!
//! The `virtual-layout` crate is UI-agnostic and focuses on the sizing math and the
//! convergence protocol. This crate wires them into the lifecycle every host repeats:
//!
//! - mount: a zero-knowledge estimate, then a wait for the first paint
//! - collection append/replace: re-estimate only when the inputs changed
//! - convergence: derive the per-element extent and one-screen count, commit the size
//! - unmount: tear down the pending observation
//!
//! This crate is intentionally framework-agnostic (no DOM/egui/ratatui bindings).
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

#[cfg(test)]
extern crate std;

mod controller;


pub use controller::{MeasuredLayout, MountController, MountPhase};
