use nalgebra::Vector3;

use crate::error::{MotionError, Result};
use crate::pose::LandmarkFrame;
use crate::skeleton::{pose_topology, SkeletonTopology};

/// これ未満の長さのボーンは方向なしとして扱う
pub const DEFAULT_BONE_EPSILON: f32 = 1e-6;

/// 1 フレーム分のボーン方向（単位ベクトル）と長さ
///
/// インデックスはトポロジーのボーン順と一致する。
/// 長さが閾値未満のボーンは方向が `None` になり、集計から除外される。
#[derive(Debug, Clone, PartialEq)]
pub struct BoneVectors {
    directions: Vec<Option<Vector3<f32>>>,
    lengths: Vec<f32>,
}

impl BoneVectors {
    /// 標準トポロジーでボーンを抽出
    pub fn from_frame(frame: &LandmarkFrame) -> Self {
        Self::extract(frame, pose_topology(), DEFAULT_BONE_EPSILON)
    }

    pub fn extract(frame: &LandmarkFrame, topology: &SkeletonTopology, epsilon: f32) -> Self {
        let bone_count = topology.bone_count();
        let mut directions = Vec::with_capacity(bone_count);
        let mut lengths = Vec::with_capacity(bone_count);

        for &(start, end) in topology.edges() {
            let d = frame.position(end) - frame.position(start);
            let length = d.norm();
            lengths.push(length);
            directions.push(if length > epsilon { Some(d / length) } else { None });
        }

        Self { directions, lengths }
    }

    /// 方向ベクトルから直接作成（長さは元ベクトルのノルム）
    pub fn from_vectors(vectors: &[Vector3<f32>], epsilon: f32) -> Self {
        let lengths: Vec<f32> = vectors.iter().map(|v| v.norm()).collect();
        let directions = vectors
            .iter()
            .zip(&lengths)
            .map(|(v, &len)| if len > epsilon { Some(v / len) } else { None })
            .collect();
        Self { directions, lengths }
    }

    pub fn len(&self) -> usize {
        self.directions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directions.is_empty()
    }

    pub fn direction(&self, bone: usize) -> Option<&Vector3<f32>> {
        self.directions.get(bone).and_then(|d| d.as_ref())
    }

    /// 方向を取得。長さゼロのボーンは `DegenerateBone`
    pub fn direction_checked(&self, bone: usize) -> Result<Vector3<f32>> {
        self.direction(bone)
            .copied()
            .ok_or(MotionError::DegenerateBone { bone })
    }

    pub fn directions(&self) -> &[Option<Vector3<f32>>] {
        &self.directions
    }

    pub fn length(&self, bone: usize) -> f32 {
        self.lengths[bone]
    }

    pub fn lengths(&self) -> &[f32] {
        &self.lengths
    }

    pub fn is_degenerate(&self, bone: usize) -> bool {
        self.direction(bone).is_none()
    }

    pub fn valid_count(&self) -> usize {
        self.directions.iter().filter(|d| d.is_some()).count()
    }

    /// 両方で有効なボーンのインデックスと方向の組
    pub fn paired<'a>(
        &'a self,
        other: &'a BoneVectors,
    ) -> impl Iterator<Item = (usize, &'a Vector3<f32>, &'a Vector3<f32>)> + 'a {
        self.directions
            .iter()
            .zip(other.directions.iter())
            .enumerate()
            .filter_map(|(i, (a, b))| match (a, b) {
                (Some(a), Some(b)) => Some((i, a, b)),
                _ => None,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::LandmarkIndex;
    use crate::skeleton::{BONE_CONNECTIONS, BONE_COUNT};

    fn spread_frame() -> LandmarkFrame {
        let mut positions = [[0.0f32; 3]; LandmarkIndex::COUNT];
        for (i, p) in positions.iter_mut().enumerate() {
            let t = i as f32;
            *p = [0.3 + 0.02 * t, 0.1 + 0.025 * (t * 1.3).sin().abs() * t, 0.05 * (t * 0.7).cos()];
        }
        LandmarkFrame::from_positions(&positions)
    }

    #[test]
    fn test_extract_unit_directions() {
        let frame = spread_frame();
        let bones = BoneVectors::from_frame(&frame);
        assert_eq!(bones.len(), BONE_COUNT);
        assert_eq!(bones.valid_count(), BONE_COUNT);

        for (i, &(s, e)) in BONE_CONNECTIONS.iter().enumerate() {
            let dir = bones.direction(i).unwrap();
            assert!((dir.norm() - 1.0).abs() < 1e-5, "bone {} norm {}", i, dir.norm());

            let expected_len = (frame.position(e) - frame.position(s)).norm();
            assert!((bones.length(i) - expected_len).abs() < 1e-6);
            let rebuilt = frame.position(s) + dir * bones.length(i);
            assert!((rebuilt - frame.position(e)).norm() < 1e-5);
        }
    }

    #[test]
    fn test_degenerate_bone_flagged() {
        // 右親指 (22) を右手首 (16) に重ねる → ボーン (16, 22) だけが退化
        let frame = spread_frame();
        let collapsed = frame.with_position(22, frame.position(16));
        let bones = BoneVectors::from_frame(&collapsed);

        let bone = BONE_CONNECTIONS.iter().position(|&e| e == (16, 22)).unwrap();
        assert!(bones.is_degenerate(bone));
        assert_eq!(bones.length(bone), 0.0);
        assert_eq!(bones.valid_count(), BONE_COUNT - 1);
        assert_eq!(
            bones.direction_checked(bone),
            Err(MotionError::DegenerateBone { bone })
        );
        assert!(bones.directions().iter().flatten().all(|d| d.iter().all(|c| c.is_finite())));
    }

    #[test]
    fn test_paired_skips_invalid_on_either_side() {
        let a = BoneVectors::from_vectors(
            &[Vector3::x(), Vector3::zeros(), Vector3::new(0.0, 2.0, 0.0)],
            DEFAULT_BONE_EPSILON,
        );
        let b = BoneVectors::from_vectors(
            &[Vector3::zeros(), Vector3::y(), Vector3::new(0.0, 0.0, 3.0)],
            DEFAULT_BONE_EPSILON,
        );
        let pairs: Vec<_> = a.paired(&b).collect();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].0, 2);
        assert_eq!(*pairs[0].1, Vector3::y());
        assert_eq!(*pairs[0].2, Vector3::z());
        assert_eq!(a.length(2), 2.0);
    }
}
