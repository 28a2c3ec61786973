use alloc::rc::Rc;
use core::cell::RefCell;
use core::fmt;
use core::future::Future;
use core::mem;
use core::pin::Pin;
use core::task::{Context, Poll, Waker};

use crate::{Convergence, LayoutEstimator, ObserveOptions, SizeProbe};

#[derive(Debug)]
enum Slot {
    Waiting(Option<Waker>),
    Ready(Convergence),
    Taken,
    Superseded,
}

type SharedSlot = Rc<RefCell<Slot>>;

fn resolve(slot: &SharedSlot, convergence: Convergence) {
    let prev = mem::replace(&mut *slot.borrow_mut(), Slot::Ready(convergence));
    debug_assert!(
        matches!(prev, Slot::Waiting(_)),
        "convergence slot resolved twice"
    );
    if let Slot::Waiting(Some(waker)) = prev {
        waker.wake();
    }
}

fn supersede(slot: &SharedSlot) {
    let mut slot = slot.borrow_mut();
    if matches!(*slot, Slot::Waiting(_)) {
        // The waker is dropped without waking: a superseded observation stays pending.
        *slot = Slot::Superseded;
    }
}

/// The eventual result of [`ConvergenceWatcher::observe_until_measured`].
///
/// Resolves at most once. A superseded observation never resolves; this is not an error, check
/// [`Self::is_superseded`] to drop the handle early.
///
/// Also usable as a `Future` whose output is the [`Convergence`].
pub struct PendingConvergence {
    slot: SharedSlot,
}

impl PendingConvergence {
    /// Takes the result if it has been delivered and not taken yet.
    pub fn try_take(&self) -> Option<Convergence> {
        let mut slot = self.slot.borrow_mut();
        match mem::replace(&mut *slot, Slot::Taken) {
            Slot::Ready(convergence) => Some(convergence),
            other => {
                *slot = other;
                None
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(*self.slot.borrow(), Slot::Ready(_))
    }

    pub fn is_waiting(&self) -> bool {
        matches!(*self.slot.borrow(), Slot::Waiting(_))
    }

    pub fn is_superseded(&self) -> bool {
        matches!(*self.slot.borrow(), Slot::Superseded)
    }
}

impl Future for PendingConvergence {
    type Output = Convergence;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Convergence> {
        let mut slot = self.slot.borrow_mut();
        match mem::replace(&mut *slot, Slot::Taken) {
            Slot::Ready(convergence) => Poll::Ready(convergence),
            Slot::Waiting(_) => {
                *slot = Slot::Waiting(Some(cx.waker().clone()));
                Poll::Pending
            }
            other => {
                *slot = other;
                Poll::Pending
            }
        }
    }
}

impl fmt::Debug for PendingConvergence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match *self.slot.borrow() {
            Slot::Waiting(_) => "Waiting",
            Slot::Ready(_) => "Ready",
            Slot::Taken => "Taken",
            Slot::Superseded => "Superseded",
        };
        f.debug_tuple("PendingConvergence").field(&state).finish()
    }
}

#[derive(Debug)]
struct Observation {
    total: usize,
    display_count: usize,
    slot: SharedSlot,
}

/// Waits, notification by notification, for the layout root's first real measurement.
///
/// A single-slot subscription: starting a new observation cancels the active one. The host
/// forwards each flushed batch of structural changes to [`Self::on_mutation`]; batch payloads
/// are never inspected, the layout root is measured again instead.
#[derive(Debug, Default)]
pub struct ConvergenceWatcher {
    options: ObserveOptions,
    active: Option<Observation>,
    last_computed_layout_size: Option<u64>,
}

impl ConvergenceWatcher {
    pub fn new(options: ObserveOptions) -> Self {
        Self {
            options,
            active: None,
            last_computed_layout_size: None,
        }
    }

    pub fn observe_options(&self) -> ObserveOptions {
        self.options
    }

    /// Starts observing until the layout root is measured.
    ///
    /// Any active observation is disconnected first and its handle never resolves.
    pub fn observe_until_measured(
        &mut self,
        probe: &SizeProbe,
        total: usize,
        display_count: usize,
    ) -> PendingConvergence {
        if self.disconnect(probe) {
            ldebug!(
                total,
                display_count,
                "observe_until_measured: superseded active observation"
            );
        } else {
            ldebug!(total, display_count, "observe_until_measured");
        }

        let slot: SharedSlot = Rc::new(RefCell::new(Slot::Waiting(None)));
        self.active = Some(Observation {
            total,
            display_count,
            slot: Rc::clone(&slot),
        });
        probe.layout_element().observe_mutations(self.options);
        PendingConvergence { slot }
    }

    /// Handles one flushed batch of structural changes on the layout root.
    ///
    /// Returns the convergence when this notification resolved the active observation. The same
    /// value is delivered to the observation's [`PendingConvergence`].
    pub fn on_mutation(&mut self, estimator: &mut LayoutEstimator) -> Option<Convergence> {
        let observation = self.active.as_ref()?;
        if !estimator.probe().is_painted() {
            ltrace!("on_mutation: layout root not painted yet");
            return None;
        }

        let layout_size =
            estimator.compute_layout_size(observation.total, observation.display_count);
        self.last_computed_layout_size = Some(layout_size);
        if layout_size == 0 {
            ltrace!("on_mutation: painted but estimated size is still 0");
            return None;
        }

        let observation = self.active.take()?;
        estimator.probe().layout_element().disconnect_mutations();
        let convergence = Convergence {
            layout_size,
            displayed_elements_count: estimator.displayed_elements_count(),
        };
        ldebug!(
            layout_size,
            displayed_elements_count = ?convergence.displayed_elements_count,
            "on_mutation: converged"
        );
        resolve(&observation.slot, convergence);
        Some(convergence)
    }

    /// Tears down the active observation, if any. Its handle never resolves.
    ///
    /// Returns `true` when an observation was active.
    pub fn disconnect(&mut self, probe: &SizeProbe) -> bool {
        let Some(observation) = self.active.take() else {
            return false;
        };
        probe.layout_element().disconnect_mutations();
        supersede(&observation.slot);
        true
    }

    pub fn is_observing(&self) -> bool {
        self.active.is_some()
    }

    /// The last size computed by an observation, including zero results.
    pub fn last_computed_layout_size(&self) -> Option<u64> {
        self.last_computed_layout_size
    }
}
