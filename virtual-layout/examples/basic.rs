// Example: estimating a collection from one painted sample block.
use std::cell::Cell;
use std::rc::Rc;

use virtual_layout::{
    LayoutElement, LayoutEngine, LayoutOptions, ScrollElement, ScrollParent, Size,
};

struct Root(Cell<Size>);

impl LayoutElement for Root {
    fn offset_size(&self) -> Size {
        self.0.get()
    }
}

struct Container;

impl ScrollElement for Container {
    fn parent(&self) -> ScrollParent {
        ScrollParent::Element(Size::new(1280, 720))
    }
}

fn main() {
    let root = Rc::new(Root(Cell::new(Size::ZERO)));
    let mut engine = LayoutEngine::new(LayoutOptions::new(
        root.clone(),
        Rc::new(Container),
        |shift| println!("layout_shift -> {shift}"),
        |size| println!("layout_size -> {size}"),
    ));

    // Before the first paint the estimate is unknown (0), not empty.
    println!("unmeasured estimate={}", engine.compute_layout_size(100_000, 20));

    // The host painted 20 items into a 900px tall block.
    root.0.set(Size::new(1280, 900));
    let size = engine.compute_layout_size(100_000, 20);
    let per_row = engine.compute_one_element_extent(20, None);
    let per_screen = engine.compute_one_screen_elements_count(Some(per_row), None);
    println!("estimate={size} per_row={per_row} per_screen={per_screen}");

    engine.set_layout_size(size);
    engine.set_layout_shift(per_row as u64 * 40);
    println!("container_style={:?}", engine.container_style());
}
