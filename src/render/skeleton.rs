use crate::render::canvas::Rgba;
use crate::similarity::BoneSimilarity;

/// ジョイントの色
pub const JOINT_COLOR: Rgba = [255, 0, 0, 255]; // 赤

/// 採点色がないボーンの色
pub const DEFAULT_BONE_COLOR: Rgba = [255, 255, 255, 255]; // 白

/// 座標軸の色 (z, y, x の順)
pub const AXIS_COLORS: [Rgba; 3] = [
    [0, 0, 255, 255], // z: 青
    [0, 255, 0, 255], // y: 緑
    [255, 0, 0, 255], // x: 赤
];

/// 一致度 0.0〜1.0 を赤 → 黄 → 緑のグラデーションへ
pub fn bone_color(value: f32) -> Rgba {
    let x = value.clamp(0.0, 1.0);
    if x <= 0.5 {
        [255, (510.0 * x) as u8, 0, 255]
    } else {
        [(255.0 * (1.0 - (x - 0.5) * 2.0)) as u8, 255, 0, 255]
    }
}

/// ボーンごとの色。採点から外れたボーンは None（描画側で既定色）
pub fn bone_colors(similarity: &BoneSimilarity) -> Vec<Option<Rgba>> {
    similarity.remapped.iter().map(|v| v.map(bone_color)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::{standing_frame, BoneVectors};
    use crate::similarity::SimilarityScorer;
    use crate::skeleton::BONE_COUNT;

    #[test]
    fn test_bone_color_gradient() {
        assert_eq!(bone_color(0.0), [255, 0, 0, 255]);
        assert_eq!(bone_color(0.25), [255, 127, 0, 255]);
        assert_eq!(bone_color(0.5), [255, 255, 0, 255]);
        assert_eq!(bone_color(0.75), [127, 255, 0, 255]);
        assert_eq!(bone_color(1.0), [0, 255, 0, 255]);
    }

    #[test]
    fn test_bone_color_clamped() {
        assert_eq!(bone_color(-0.3), bone_color(0.0));
        assert_eq!(bone_color(1.7), bone_color(1.0));
    }

    #[test]
    fn test_bone_colors_skip_degenerate() {
        let reference = BoneVectors::from_frame(&standing_frame());
        let mut live_frame = standing_frame();
        live_frame.set_position(22, live_frame.position(16));
        let live = BoneVectors::from_frame(&live_frame);

        let similarity = SimilarityScorer::default().score(&reference, &live).unwrap();
        let colors = bone_colors(&similarity);
        assert_eq!(colors.len(), BONE_COUNT);
        assert_eq!(colors.iter().filter(|c| c.is_none()).count(), 1);
        for color in colors.iter().flatten() {
            assert_eq!(*color, [0, 255, 0, 255]);
        }
    }
}
