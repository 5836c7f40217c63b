pub mod topology;

pub use topology::{
    pose_topology, SkeletonTopology, BONE_CONNECTIONS, BONE_COUNT, PRUNED_LINKS, RETARGET_ROOTS,
};
