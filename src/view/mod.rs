pub mod drag;
pub mod orientation;

pub use drag::DragTracker;
pub use orientation::{OrientationController, SharedOrientation};
