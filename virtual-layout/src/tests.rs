use crate::*;

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::future::Future;
use core::num::NonZeroUsize;
use core::pin::Pin;
use core::task::{Context, Poll, Waker};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::Wake;

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        // Deterministic, dependency-free PRNG for tests.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range_u64(&mut self, start: u64, end_exclusive: u64) -> u64 {
        debug_assert!(start < end_exclusive);
        let span = end_exclusive - start;
        start + (self.next_u64() % span)
    }

    fn gen_range_usize(&mut self, start: usize, end_exclusive: usize) -> usize {
        self.gen_range_u64(start as u64, end_exclusive as u64) as usize
    }

    fn gen_range_u32(&mut self, start: u32, end_exclusive: u32) -> u32 {
        self.gen_range_u64(start as u64, end_exclusive as u64) as u32
    }
}

#[derive(Debug, Default)]
struct FakeElement {
    offset: Cell<Size>,
    inner: Cell<Size>,
    observing: Cell<bool>,
    observed_with: Cell<Option<ObserveOptions>>,
    observe_calls: Cell<usize>,
    disconnect_calls: Cell<usize>,
}

impl FakeElement {
    fn paint(&self, width: u32, height: u32) {
        self.offset.set(Size::new(width, height));
    }
}

impl LayoutElement for FakeElement {
    fn offset_size(&self) -> Size {
        self.offset.get()
    }

    fn inner_size(&self) -> Size {
        self.inner.get()
    }

    fn observe_mutations(&self, options: ObserveOptions) {
        assert!(!self.observing.get(), "observed twice without disconnect");
        self.observing.set(true);
        self.observed_with.set(Some(options));
        self.observe_calls.set(self.observe_calls.get() + 1);
    }

    fn disconnect_mutations(&self) {
        self.observing.set(false);
        self.disconnect_calls.set(self.disconnect_calls.get() + 1);
    }
}

#[derive(Debug)]
struct FakeScroll {
    parent: Cell<ScrollParent>,
}

impl ScrollElement for FakeScroll {
    fn parent(&self) -> ScrollParent {
        self.parent.get()
    }
}

struct Mount {
    element: Rc<FakeElement>,
    scroll: Rc<FakeScroll>,
    sizes: Rc<RefCell<Vec<u64>>>,
    shifts: Rc<RefCell<Vec<u64>>>,
    engine: LayoutEngine,
}

fn mount_with(axis: Axis, parent: ScrollParent, viewport: Size) -> Mount {
    let element = Rc::new(FakeElement::default());
    let scroll = Rc::new(FakeScroll {
        parent: Cell::new(parent),
    });
    let sizes = Rc::new(RefCell::new(Vec::new()));
    let shifts = Rc::new(RefCell::new(Vec::new()));

    let size_sink = Rc::clone(&sizes);
    let shift_sink = Rc::clone(&shifts);
    let options = LayoutOptions::new(
        element.clone(),
        scroll.clone(),
        move |shift| shift_sink.borrow_mut().push(shift),
        move |size| size_sink.borrow_mut().push(size),
    )
    .with_axis(axis)
    .with_viewport(FixedViewport(viewport));

    Mount {
        element,
        scroll,
        sizes,
        shifts,
        engine: LayoutEngine::new(options),
    }
}

fn mount() -> Mount {
    mount_with(
        Axis::Vertical,
        ScrollParent::Element(Size::new(400, 800)),
        Size::new(1024, 768),
    )
}

fn grid(n: usize) -> Option<NonZeroUsize> {
    NonZeroUsize::new(n)
}

#[derive(Default)]
struct WakeFlag(AtomicBool);

impl Wake for WakeFlag {
    fn wake(self: Arc<Self>) {
        self.0.store(true, Ordering::SeqCst);
    }
}

#[test]
fn extrapolates_sample_block_to_whole_collection() {
    let mut m = mount();
    m.element.paint(300, 500);
    assert_eq!(m.engine.compute_layout_size(1000, 10), 50_000);
    assert_eq!(layout_size(1000, 10, 500), 50_000);
    // Partial trailing block still counts as a whole block.
    assert_eq!(m.engine.compute_layout_size(1001, 10), 50_500);
}

#[test]
fn display_count_equal_to_total_returns_sample_extent() {
    let mut m = mount();
    m.element.paint(300, 420);
    assert_eq!(m.engine.compute_layout_size(37, 37), 420);
    assert_eq!(m.engine.compute_layout_size(1, 1), 420);
    // A single materialized item is extrapolated `total` times.
    assert_eq!(m.engine.compute_layout_size(5, 1), 2100);
}

#[test]
fn unmeasured_layout_reports_zero_and_marks_first_call() {
    let mut m = mount();
    assert!(!m.engine.has_computed());
    assert_eq!(m.engine.get_element_size(), 0);
    assert_eq!(m.engine.compute_layout_size(1000, 10), 0);
    assert!(m.engine.has_computed());
}

#[test]
fn element_size_falls_back_to_inner_extent() {
    let m = mount();
    m.element.inner.set(Size::new(1280, 720));
    assert_eq!(m.engine.get_element_size(), 720);
    m.element.paint(100, 50);
    assert_eq!(m.engine.get_element_size(), 50);
}

#[test]
fn horizontal_axis_reads_widths() {
    let m = mount_with(
        Axis::Horizontal,
        ScrollParent::Element(Size::new(640, 480)),
        Size::new(1024, 768),
    );
    m.element.paint(900, 30);
    assert_eq!(m.engine.get_element_size(), 900);
    assert_eq!(m.engine.get_parent_container_size(), 640);
}

#[test]
fn parent_container_size_uses_parent_element() {
    let m = mount();
    assert_eq!(m.engine.get_parent_container_size(), 800);
    m.scroll.parent.set(ScrollParent::Element(Size::new(400, 650)));
    assert_eq!(m.engine.get_parent_container_size(), 650);
}

#[test]
fn document_root_parent_uses_global_viewport() {
    let m = mount_with(
        Axis::Vertical,
        ScrollParent::DocumentRoot,
        Size::new(1024, 768),
    );
    assert_eq!(m.engine.get_parent_container_size(), 768);

    m.scroll.parent.set(ScrollParent::Detached);
    assert_eq!(m.engine.get_parent_container_size(), 768);

    let h = mount_with(
        Axis::Horizontal,
        ScrollParent::DocumentRoot,
        Size::new(1024, 768),
    );
    assert_eq!(h.engine.get_parent_container_size(), 1024);
}

#[test]
fn viewport_provider_is_read_on_every_call() {
    let height = Rc::new(Cell::new(600u32));
    let h = Rc::clone(&height);
    let element: Rc<dyn LayoutElement> = Rc::new(FakeElement::default());
    let scroll: Rc<dyn ScrollElement> = Rc::new(FakeScroll {
        parent: Cell::new(ScrollParent::DocumentRoot),
    });
    let engine = LayoutEngine::new(
        LayoutOptions::new(element, scroll, |_| {}, |_| {})
            .with_viewport(move || Size::new(800, h.get())),
    );
    assert_eq!(engine.get_parent_container_size(), 600);
    height.set(900);
    assert_eq!(engine.get_parent_container_size(), 900);
}

fn unattached_engine(parent: ScrollParent) -> LayoutEngine {
    let element = Rc::new(FakeElement::default());
    element.paint(300, 500);
    let scroll: Rc<dyn ScrollElement> = Rc::new(FakeScroll {
        parent: Cell::new(parent),
    });
    LayoutEngine::new(LayoutOptions::new(element, scroll, |_| {}, |_| {}))
}

#[test]
fn element_parent_needs_no_viewport_provider() {
    let mut engine = unattached_engine(ScrollParent::Element(Size::new(400, 1000)));
    assert_eq!(engine.get_parent_container_size(), 1000);
    assert_eq!(engine.compute_one_screen_elements_count(Some(100), None), 10);
}

#[cfg(debug_assertions)]
#[test]
#[should_panic(expected = "viewport provider")]
fn document_root_parent_without_viewport_provider_panics_in_debug() {
    let engine = unattached_engine(ScrollParent::DocumentRoot);
    engine.get_parent_container_size();
}

#[cfg(debug_assertions)]
#[test]
#[should_panic(expected = "viewport provider")]
fn detached_parent_without_viewport_provider_panics_in_debug() {
    let mut engine = unattached_engine(ScrollParent::Detached);
    engine.compute_one_screen_elements_count(Some(100), None);
}

#[cfg(not(debug_assertions))]
#[test]
fn document_root_parent_without_viewport_provider_reads_zero() {
    let engine = unattached_engine(ScrollParent::DocumentRoot);
    assert_eq!(engine.get_parent_container_size(), 0);
}

#[test]
fn configured_axis_and_observe_options_reach_the_host() {
    let element = Rc::new(FakeElement::default());
    let scroll: Rc<dyn ScrollElement> = Rc::new(FakeScroll {
        parent: Cell::new(ScrollParent::Element(Size::new(640, 480))),
    });
    let observe = ObserveOptions {
        child_list: true,
        character_data: false,
        subtree: false,
    };
    assert_ne!(observe, ObserveOptions::default());

    let mut engine = LayoutEngine::new(
        LayoutOptions::new(element.clone(), scroll, |_| {}, |_| {})
            .with_horizontal(true)
            .with_observe_options(observe),
    );
    assert_eq!(engine.estimator().probe().axis(), Axis::Horizontal);
    assert_eq!(engine.watcher().observe_options(), observe);

    element.paint(900, 30);
    assert_eq!(engine.get_element_size(), 900);
    assert_eq!(engine.get_parent_container_size(), 640);

    let pending = engine.observe_until_measured(100, 10);
    assert_eq!(element.observed_with.get(), Some(observe));
    let resolved = engine.on_mutation().expect("converged");
    assert_eq!(resolved.layout_size, 9000);
    assert_eq!(pending.try_take(), Some(resolved));
}

#[test]
fn grid_groups_items_into_rows() {
    let mut m = mount();
    m.element.paint(300, 300);
    assert_eq!(m.engine.compute_one_element_extent(9, grid(3)), 100);
    assert_eq!(m.engine.compute_one_element_extent(10, grid(3)), 75);
    assert_eq!(m.engine.compute_one_element_extent(9, None), 34);
    assert_eq!(one_element_extent(300, 9, grid(3)), 100);
}

#[test]
fn one_screen_count_scales_rows_by_grid() {
    let mut m = mount();
    assert_eq!(m.engine.compute_one_screen_elements_count(Some(120), grid(2)), 14);
    assert_eq!(m.engine.compute_one_screen_elements_count(Some(120), None), 7);
    assert_eq!(one_screen_count(800, 120, grid(2)), 14);
    assert_eq!(m.engine.estimator().displayed_elements_count(), Some(7));
}

#[test]
fn one_screen_count_falls_back_to_cached_element_extent() {
    let mut m = mount();
    // Nothing measured, nothing cached.
    assert_eq!(m.engine.compute_one_screen_elements_count(None, None), 0);
    assert_eq!(m.engine.estimator().displayed_elements_count(), None);

    m.element.paint(300, 1000);
    assert_eq!(m.engine.compute_one_element_extent(10, None), 100);
    assert_eq!(m.engine.compute_one_screen_elements_count(None, None), 8);
    assert_eq!(m.engine.compute_one_screen_elements_count(Some(0), None), 8);
    // An explicit extent wins over the cache.
    assert_eq!(m.engine.compute_one_screen_elements_count(Some(400), None), 2);
    assert_eq!(m.engine.estimator().cached_one_element_extent(), Some(100));
}

#[test]
fn estimates_are_consistent_over_random_inputs() {
    let mut rng = Lcg::new(0x5eed_1a40);
    for _ in 0..2_000 {
        let total = rng.gen_range_usize(1, 50_000);
        let display = rng.gen_range_usize(1, total + 1);
        let measured = if rng.gen_range_u32(0, 4) == 0 {
            0
        } else {
            rng.gen_range_u32(1, 100_000)
        };

        let size = layout_size(total, display, measured);
        assert_eq!(size == 0, measured == 0, "total={total} display={display}");
        assert_eq!(size, layout_size(total, display, measured));
        if display == total {
            assert_eq!(size, measured as u64);
        }

        let arity = rng.gen_range_usize(1, 8);
        let per_row = one_element_extent(measured, display, grid(arity));
        let rows = display.div_ceil(arity) as u64;
        assert!(per_row as u64 * rows >= measured as u64);
        assert!(per_row <= measured);
    }
}

#[test]
fn compute_layout_size_is_idempotent() {
    let mut m = mount();
    m.element.paint(300, 480);
    let first = m.engine.compute_layout_size(333, 12);
    for _ in 0..5 {
        assert_eq!(m.engine.compute_layout_size(333, 12), first);
    }
}

#[test]
fn converges_after_first_painted_notification() {
    let mut m = mount();
    let pending = m.engine.observe_until_measured(1000, 10);
    assert!(m.engine.is_observing());
    assert!(m.element.observing.get());

    for _ in 0..3 {
        assert_eq!(m.engine.on_mutation(), None);
        assert!(pending.is_waiting());
    }
    assert_eq!(m.engine.last_computed_layout_size(), None);

    m.element.paint(300, 500);
    let expected = layout_size(1000, 10, 500);
    let resolved = m.engine.on_mutation().expect("converged");
    assert_eq!(resolved.layout_size, expected);
    assert_eq!(m.engine.compute_layout_size(1000, 10), expected);

    assert!(!m.engine.is_observing());
    assert!(!m.element.observing.get());
    assert_eq!(m.element.disconnect_calls.get(), 1);
    assert_eq!(pending.try_take(), Some(resolved));
    assert_eq!(pending.try_take(), None);

    // Later notifications are ignored.
    assert_eq!(m.engine.on_mutation(), None);
}

#[test]
fn convergence_reports_cached_one_screen_count() {
    let mut m = mount();
    let pending = m.engine.observe_until_measured(100, 10);
    m.engine.compute_one_screen_elements_count(Some(100), None);
    m.element.paint(300, 1000);
    m.engine.on_mutation();
    assert_eq!(
        pending.try_take(),
        Some(Convergence {
            layout_size: 10_000,
            displayed_elements_count: Some(8),
        })
    );
}

#[test]
fn painted_empty_collection_keeps_observing() {
    let mut m = mount();
    let pending = m.engine.observe_until_measured(0, 1);
    m.element.paint(300, 40);
    assert_eq!(m.engine.on_mutation(), None);
    assert_eq!(m.engine.last_computed_layout_size(), Some(0));
    assert!(m.engine.is_observing());
    assert!(pending.is_waiting());
}

#[test]
fn window_like_inner_extent_does_not_resolve() {
    let mut m = mount();
    let pending = m.engine.observe_until_measured(10, 10);
    m.element.inner.set(Size::new(1024, 768));
    assert_eq!(m.engine.on_mutation(), None);
    assert!(pending.is_waiting());
}

#[test]
fn new_observation_supersedes_pending_one() {
    let mut m = mount();
    let first = m.engine.observe_until_measured(1000, 10);
    let second = m.engine.observe_until_measured(2000, 10);
    assert!(first.is_superseded());
    assert!(second.is_waiting());
    assert_eq!(m.element.observe_calls.get(), 2);
    assert_eq!(m.element.disconnect_calls.get(), 1);

    m.element.paint(300, 500);
    let resolved = m.engine.on_mutation().expect("converged");
    assert_eq!(resolved.layout_size, 100_000);
    assert_eq!(first.try_take(), None);
    assert!(first.is_superseded());
    assert_eq!(second.try_take(), Some(resolved));
}

#[test]
fn superseded_future_stays_pending() {
    let mut m = mount();
    let mut first = m.engine.observe_until_measured(10, 5);
    let mut cx = Context::from_waker(Waker::noop());
    assert_eq!(Pin::new(&mut first).poll(&mut cx), Poll::Pending);

    let mut second = m.engine.observe_until_measured(10, 5);
    m.element.paint(300, 60);
    m.engine.on_mutation();

    assert_eq!(Pin::new(&mut first).poll(&mut cx), Poll::Pending);
    assert_eq!(
        Pin::new(&mut second).poll(&mut cx),
        Poll::Ready(Convergence {
            layout_size: 120,
            displayed_elements_count: None,
        })
    );
}

#[test]
fn resolution_wakes_the_polling_task() {
    let mut m = mount();
    let mut pending = m.engine.observe_until_measured(4, 2);
    let flag = Arc::new(WakeFlag::default());
    let waker = Waker::from(Arc::clone(&flag));
    let mut cx = Context::from_waker(&waker);

    assert!(Pin::new(&mut pending).poll(&mut cx).is_pending());
    m.engine.on_mutation();
    assert!(!flag.0.load(Ordering::SeqCst));

    m.element.paint(300, 90);
    m.engine.on_mutation();
    assert!(flag.0.load(Ordering::SeqCst));
    assert_eq!(
        Pin::new(&mut pending).poll(&mut cx),
        Poll::Ready(Convergence {
            layout_size: 180,
            displayed_elements_count: None,
        })
    );
}

#[test]
fn disconnect_tears_down_pending_observation() {
    let mut m = mount();
    let pending = m.engine.observe_until_measured(10, 5);
    assert!(m.engine.disconnect());
    assert!(!m.engine.disconnect());
    assert!(!m.element.observing.get());
    assert!(pending.is_superseded());

    m.element.paint(300, 60);
    assert_eq!(m.engine.on_mutation(), None);
}

#[test]
fn dropping_engine_disconnects_observation() {
    let m = mount();
    let Mount {
        element,
        mut engine,
        ..
    } = m;
    let pending = engine.observe_until_measured(10, 5);
    drop(engine);
    assert!(!element.observing.get());
    assert_eq!(element.disconnect_calls.get(), 1);
    assert!(pending.is_superseded());
}

#[test]
fn layout_size_commits_propagate_including_shrinks() {
    let mut m = mount();
    assert_eq!(m.engine.layout_size(), None);
    m.engine.recommit_layout_size();
    assert!(m.sizes.borrow().is_empty());

    m.engine.set_layout_size(50_000);
    m.engine.set_layout_size(12_000);
    m.engine.set_layout_size(0);
    m.engine.recommit_layout_size();
    assert_eq!(*m.sizes.borrow(), [50_000, 12_000, 0, 0]);
    assert_eq!(m.engine.layout_size(), Some(0));
}

#[test]
fn layout_shift_defaults_to_zero_and_propagates() {
    let mut m = mount();
    assert_eq!(m.engine.layout_shift(), 0);
    m.engine.set_layout_shift(240);
    m.engine.set_layout_shift(120);
    assert_eq!(m.engine.layout_shift(), 120);
    assert_eq!(*m.shifts.borrow(), [240, 120]);
    assert!(m.sizes.borrow().is_empty());
}

#[test]
fn container_style_follows_committed_values() {
    let mut m = mount();
    assert_eq!(
        m.engine.container_style(),
        ContainerStyle {
            main_extent: MainExtent::Auto,
            leading_padding: 0,
        }
    );

    m.engine.set_layout_size(0);
    assert_eq!(m.engine.container_style().main_extent, MainExtent::Auto);

    m.engine.set_layout_size(9_000);
    m.engine.set_layout_shift(300);
    assert_eq!(
        m.engine.container_style(),
        ContainerStyle {
            main_extent: MainExtent::Exact(9_000),
            leading_padding: 300,
        }
    );
}

#[test]
fn registered_coordinator_sees_committed_layout() {
    let mut m = mount();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let prev = m
        .engine
        .register_window_coordinator(move |snapshot: &LayoutSnapshot| {
            sink.borrow_mut().push(*snapshot);
        });
    assert!(prev.is_none());

    m.element.paint(300, 1000);
    m.engine.compute_one_element_extent(10, None);
    m.engine.compute_one_screen_elements_count(None, None);
    m.engine.set_layout_shift(50);
    assert!(seen.borrow().is_empty());

    m.engine.set_layout_size(10_000);
    assert_eq!(
        *seen.borrow(),
        [LayoutSnapshot {
            layout_size: Some(10_000),
            layout_shift: 50,
            one_element_extent: Some(100),
            displayed_elements_count: Some(8),
        }]
    );

    assert!(m.engine.unregister_window_coordinator().is_some());
    m.engine.set_layout_size(20_000);
    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn axis_round_trips_horizontal_flag() {
    assert_eq!(Axis::from_horizontal(true), Axis::Horizontal);
    assert_eq!(Axis::from_horizontal(false), Axis::Vertical);
    assert!(Axis::Horizontal.is_horizontal());
    assert_eq!(Size::new(3, 4).along(Axis::Horizontal), 3);
    assert_eq!(Size::new(3, 4).along(Axis::Vertical), 4);
}
