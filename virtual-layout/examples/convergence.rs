// Example: waiting for the first paint with a convergence observation.
use std::cell::Cell;
use std::rc::Rc;

use virtual_layout::{
    FixedViewport, LayoutElement, LayoutEngine, LayoutOptions, ScrollElement, ScrollParent, Size,
};

struct Root(Cell<u32>);

impl LayoutElement for Root {
    fn offset_size(&self) -> Size {
        Size::new(800, self.0.get())
    }
}

struct PageScroll;

impl ScrollElement for PageScroll {
    fn parent(&self) -> ScrollParent {
        ScrollParent::DocumentRoot
    }
}

fn main() {
    let root = Rc::new(Root(Cell::new(0)));
    let mut engine = LayoutEngine::new(
        LayoutOptions::new(root.clone(), Rc::new(PageScroll), |_| {}, |_| {})
            .with_viewport(FixedViewport(Size::new(1024, 768))),
    );

    let first = engine.observe_until_measured(5_000, 25);
    // A collection replacement before the first paint supersedes the first observation.
    let pending = engine.observe_until_measured(6_000, 25);
    println!("first={first:?} pending={pending:?}");

    // Mutation batches arrive while the host is still rendering.
    for tick in 0..3 {
        let resolved = engine.on_mutation();
        println!("tick={tick} resolved={resolved:?}");
    }

    root.0.set(1_250);
    let resolved = engine.on_mutation();
    println!("painted: resolved={resolved:?}");
    println!("first={first:?} pending={:?}", pending.try_take());
    println!("viewport={}", engine.get_parent_container_size());
}
