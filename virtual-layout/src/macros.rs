// Log events under one target. Without the `tracing` feature every call compiles to nothing,
// so arguments are never evaluated.

#[cfg(feature = "tracing")]
macro_rules! layout_event {
    ($level:ident, $($tt:tt)*) => {
        tracing::$level!(target: "virtual_layout", $($tt)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! layout_event {
    ($level:ident, $($tt:tt)*) => {};
}

macro_rules! ltrace {
    ($($tt:tt)*) => {
        layout_event!(trace, $($tt)*)
    };
}

macro_rules! ldebug {
    ($($tt:tt)*) => {
        layout_event!(debug, $($tt)*)
    };
}

macro_rules! lwarn {
    ($($tt:tt)*) => {
        layout_event!(warn, $($tt)*)
    };
}
