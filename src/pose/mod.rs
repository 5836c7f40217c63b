pub mod bones;
pub mod landmark;
pub mod sample;

pub use bones::{BoneVectors, DEFAULT_BONE_EPSILON};
pub use landmark::{Landmark, LandmarkFrame, LandmarkIndex};
pub use sample::standing_frame;
