pub mod canvas;
pub mod projector;
pub mod skeleton;
#[cfg(feature = "desktop")]
pub mod window;

pub use canvas::{Canvas, Rgba, TRANSPARENT};
pub use projector::{projection_matrix, Projector};
pub use skeleton::{bone_color, bone_colors, AXIS_COLORS, DEFAULT_BONE_COLOR, JOINT_COLOR};
#[cfg(feature = "desktop")]
pub use minifb::Key;
#[cfg(feature = "desktop")]
pub use window::MinifbViewer;
