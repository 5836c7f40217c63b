use crate::error::{MotionError, Result};
use crate::pose::{LandmarkFrame, LandmarkIndex};
use crate::skeleton::{pose_topology, SkeletonTopology};

/// `source` のルート位置を保ったまま、`reference` のボーン方向・長さで姿勢を組み直す
///
/// 標準トポロジーの 4 ルート（両肩・両腰）から走査する。
pub fn retarget(source: &LandmarkFrame, reference: &LandmarkFrame, multiple: f32) -> Result<LandmarkFrame> {
    retarget_with(pose_topology(), source, reference, multiple)
}

/// 任意トポロジーでのリターゲット
///
/// 各ルートから枝刈り済み隣接リストを辿り、リンク i→j ごとに
/// `out[j] = out[i] + (reference[j] - reference[i]) * multiple` を書き込む。
/// どのルートからも届かないジョイントは `source` の位置のまま。
/// 訪問済みジョイントに再突入したら `TopologyCycle` で中断する。
pub fn retarget_with(
    topology: &SkeletonTopology,
    source: &LandmarkFrame,
    reference: &LandmarkFrame,
    multiple: f32,
) -> Result<LandmarkFrame> {
    if topology.joint_count() != LandmarkIndex::COUNT {
        return Err(MotionError::InvalidTopology(format!(
            "topology has {} joints, frames have {}",
            topology.joint_count(),
            LandmarkIndex::COUNT
        )));
    }

    let mut out = source.clone();
    let mut visited = vec![false; topology.joint_count()];

    for &root in topology.roots() {
        let links = topology.walk(root, &mut visited).map_err(|e| {
            log::warn!("retargeting aborted at root {}: {}", root, e);
            e
        })?;

        for (from, to) in links {
            let offset = (reference.position(to) - reference.position(from)) * multiple;
            let position = out.position(from) + offset;
            out.set_position(to, position);
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::standing_frame;
    use crate::skeleton::RETARGET_ROOTS;
    use nalgebra::Vector3;

    /// 別人の体型: 手足が長く、全体が右にずれた姿勢
    fn other_body() -> LandmarkFrame {
        let base = standing_frame();
        let mut frame = base.clone();
        for joint in 0..LandmarkIndex::COUNT {
            let p = base.position(joint);
            frame.set_position(joint, Vector3::new(p.x * 1.3 + 0.1, p.y * 1.2 - 0.05, p.z + 0.02 * joint as f32));
        }
        frame
    }

    fn walk_links() -> Vec<(usize, usize)> {
        let topology = pose_topology();
        let mut visited = vec![false; LandmarkIndex::COUNT];
        topology
            .roots()
            .iter()
            .flat_map(|&root| topology.walk(root, &mut visited).unwrap())
            .collect()
    }

    #[test]
    fn test_reproduces_reference_offsets() {
        let source = other_body();
        let reference = standing_frame();
        let out = retarget(&source, &reference, 1.0).unwrap();

        for (from, to) in walk_links() {
            let got = out.position(to) - out.position(from);
            let expected = reference.position(to) - reference.position(from);
            assert!((got - expected).norm() < 1e-5, "link {}->{}", from, to);
        }
    }

    #[test]
    fn test_roots_and_unreached_joints_keep_source() {
        let source = other_body();
        let out = retarget(&source, &standing_frame(), 1.0).unwrap();

        for root in RETARGET_ROOTS {
            assert_eq!(out.position(root), source.position(root));
        }
        // 顔はどのルートからも届かない
        for joint in 0..=10 {
            assert_eq!(out.position(joint), source.position(joint));
        }
    }

    #[test]
    fn test_multiple_scales_offsets() {
        let source = other_body();
        let reference = standing_frame();
        let out = retarget(&source, &reference, 2.0).unwrap();

        let (from, to) = (14, 16); // 右前腕
        let got = out.position(to) - out.position(from);
        let expected = (reference.position(to) - reference.position(from)) * 2.0;
        assert!((got - expected).norm() < 1e-5);
    }

    #[test]
    fn test_keeps_source_visibility() {
        let mut source = other_body();
        source.landmarks[16].visibility = 0.3;
        let out = retarget(&source, &standing_frame(), 1.0).unwrap();
        assert_eq!(out.landmarks[16].visibility, 0.3);
    }

    #[test]
    fn test_cycle_aborts() {
        let topology =
            SkeletonTopology::from_edges(LandmarkIndex::COUNT, &[(12, 14), (14, 16), (16, 12)], &[], &[12]).unwrap();
        let result = retarget_with(&topology, &other_body(), &standing_frame(), 1.0);
        assert!(matches!(result, Err(MotionError::TopologyCycle { root: 12, .. })));
    }

    #[test]
    fn test_joint_count_mismatch() {
        let topology = SkeletonTopology::from_edges(3, &[(0, 1)], &[], &[0]).unwrap();
        assert!(matches!(
            retarget_with(&topology, &other_body(), &standing_frame(), 1.0),
            Err(MotionError::InvalidTopology(_))
        ));
    }
}
