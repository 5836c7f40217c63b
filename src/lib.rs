pub mod alignment;
pub mod config;
pub mod error;
pub mod logging;
pub mod pose;
pub mod render;
pub mod retarget;
pub mod sequence;
pub mod session;
pub mod similarity;
pub mod skeleton;
pub mod view;

pub use error::{MotionError, Result};
