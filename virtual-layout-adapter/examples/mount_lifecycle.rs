// Example: driving a mount through convergence, replacement and unmount.
use std::cell::Cell;
use std::rc::Rc;

use virtual_layout::{
    LayoutElement, LayoutInputs, LayoutOptions, LayoutSnapshot, ScrollElement, ScrollParent, Size,
};
use virtual_layout_adapter::MountController;

struct Root(Cell<u32>);

impl LayoutElement for Root {
    fn offset_size(&self) -> Size {
        Size::new(640, self.0.get())
    }
}

struct Container;

impl ScrollElement for Container {
    fn parent(&self) -> ScrollParent {
        ScrollParent::Element(Size::new(640, 600))
    }
}

fn main() {
    let root = Rc::new(Root(Cell::new(0)));
    let mut c = MountController::new(LayoutOptions::new(
        root.clone(),
        Rc::new(Container),
        |shift| println!("sink: layout_shift={shift}"),
        |size| println!("sink: layout_size={size}"),
    ));
    c.register_window_coordinator(|snapshot: &LayoutSnapshot| {
        println!("coordinator: {snapshot:?}");
    });

    c.mount(LayoutInputs::new(10_000, 30));
    root.0.set(1_800);
    println!("converged={:?} phase={:?}", c.on_mutation(), c.phase());

    // The collection grew; the painted sample gives an exact estimate right away.
    c.set_inputs(LayoutInputs::new(12_000, 30));
    root.0.set(1_860);
    println!("converged={:?} style={:?}", c.on_mutation(), c.container_style());

    c.unmount();
    println!("phase={:?}", c.phase());
}
