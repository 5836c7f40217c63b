use super::{LandmarkFrame, LandmarkIndex};

/// 正面を向いて立った姿勢（正規化画像座標）
///
/// 動作確認用のビューアとベンチマーク、テストで使う。
/// どのボーンも長さゼロにならない。
pub const STANDING_POSITIONS: [[f32; 3]; LandmarkIndex::COUNT] = [
    [0.50, 0.15, -0.05], // 鼻
    [0.52, 0.13, -0.04],
    [0.53, 0.13, -0.04],
    [0.54, 0.13, -0.04],
    [0.48, 0.13, -0.04],
    [0.47, 0.13, -0.04],
    [0.46, 0.13, -0.04],
    [0.56, 0.14, 0.00], // 左耳
    [0.44, 0.14, 0.00], // 右耳
    [0.52, 0.18, -0.04],
    [0.48, 0.18, -0.04],
    [0.60, 0.25, 0.00], // 左肩
    [0.40, 0.25, 0.00], // 右肩
    [0.66, 0.37, 0.02],
    [0.34, 0.37, 0.02],
    [0.69, 0.48, -0.02], // 左手首
    [0.31, 0.48, -0.02], // 右手首
    [0.70, 0.51, -0.03],
    [0.30, 0.51, -0.03],
    [0.69, 0.52, -0.04],
    [0.31, 0.52, -0.04],
    [0.67, 0.50, -0.04],
    [0.33, 0.50, -0.04],
    [0.56, 0.55, 0.00], // 左腰
    [0.44, 0.55, 0.00], // 右腰
    [0.57, 0.72, 0.01],
    [0.43, 0.72, 0.01],
    [0.57, 0.88, 0.03], // 左足首
    [0.43, 0.88, 0.03], // 右足首
    [0.56, 0.90, 0.05],
    [0.44, 0.90, 0.05],
    [0.59, 0.93, -0.02],
    [0.41, 0.93, -0.02],
];

pub fn standing_frame() -> LandmarkFrame {
    LandmarkFrame::from_positions(&STANDING_POSITIONS)
}
