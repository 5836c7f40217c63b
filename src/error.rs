use thiserror::Error;

/// フレーム単位で回復可能なエラー
///
/// どれも致命的ではなく、該当フレームをスキップして次のフレームで処理を続ける。
/// `InvalidTopology` と `TopologyCycle` だけは骨格定義の誤りを示す。
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MotionError {
    #[error("bone {bone} has zero length, direction is undefined")]
    DegenerateBone { bone: usize },

    #[error("pose not reliably detected")]
    UndetectedPose,

    #[error("alignment is ill-conditioned (singular value ratio {ratio:e})")]
    IllConditionedAlignment { ratio: f32 },

    #[error("topology revisits joint {joint} while walking from root {root}")]
    TopologyCycle { root: usize, joint: usize },

    #[error("invalid topology: {0}")]
    InvalidTopology(String),

    #[error("point sets differ in length ({left} vs {right})")]
    PointSetMismatch { left: usize, right: usize },

    #[error("point set is empty")]
    EmptyPointSet,

    #[error("SVD did not return singular vectors")]
    SvdFailed,

    #[error("reference sequence has no frames")]
    EmptySequence,

    #[error("frame rate must be positive, got {0}")]
    InvalidFrameRate(f32),
}

pub type Result<T> = std::result::Result<T, MotionError>;
