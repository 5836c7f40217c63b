use std::sync::OnceLock;

use crate::error::{MotionError, Result};
use crate::pose::LandmarkIndex;

/// 骨格の接続定義 (開始ランドマーク, 終了ランドマーク)
///
/// 並び順がボーンインデックスになる。採点はジョイントではなくこの並びで対応を取る。
pub const BONE_CONNECTIONS: [(usize, usize); 35] = [
    // 右脚
    (12, 24), (24, 26), (26, 28), (28, 32), (32, 30), (30, 28),
    // 左脚
    (11, 23), (23, 25), (25, 27), (27, 29), (29, 31), (31, 27),
    // 胴体
    (12, 11), (24, 23),
    // 右腕
    (12, 14), (14, 16), (16, 18), (18, 20), (20, 16), (16, 22),
    // 左腕
    (11, 13), (13, 15), (15, 17), (17, 19), (19, 15), (15, 21),
    // 顔
    (8, 6), (6, 5), (5, 4), (4, 0), (0, 1), (1, 2), (2, 3), (3, 7),
    (10, 9),
];

pub const BONE_COUNT: usize = BONE_CONNECTIONS.len();

/// 隣接リストから外す有向リンク
///
/// 肩・腰の四角形と手足先の三角形を切って、各ルートからの走査を木にする。
pub const PRUNED_LINKS: [(usize, usize); 16] = [
    (12, 11), (12, 24), (11, 12), (11, 23),
    (23, 11), (23, 24), (24, 23), (24, 12),
    (18, 20), (20, 18), (17, 19), (19, 17),
    (32, 30), (30, 32), (29, 31), (31, 29),
];

/// リターゲットの走査開始点（右肩, 左肩, 右腰, 左腰）
pub const RETARGET_ROOTS: [usize; 4] = [
    LandmarkIndex::RightShoulder as usize,
    LandmarkIndex::LeftShoulder as usize,
    LandmarkIndex::RightHip as usize,
    LandmarkIndex::LeftHip as usize,
];

/// ボーン一覧と、走査用に枝刈りした隣接リスト
#[derive(Debug, Clone)]
pub struct SkeletonTopology {
    joint_count: usize,
    edges: Vec<(usize, usize)>,
    adjacency: Vec<Vec<usize>>,
    roots: Vec<usize>,
}

impl SkeletonTopology {
    /// 任意のボーン定義から構築
    ///
    /// インデックス範囲外や、存在しないリンクの枝刈り指定は設定ミスとして返す。
    /// 循環の有無は [`SkeletonTopology::validate`] で確認する。
    pub fn from_edges(
        joint_count: usize,
        edges: &[(usize, usize)],
        pruned: &[(usize, usize)],
        roots: &[usize],
    ) -> Result<Self> {
        if let Some(&(s, e)) = edges.iter().find(|(s, e)| *s >= joint_count || *e >= joint_count) {
            return Err(MotionError::InvalidTopology(format!(
                "bone ({}, {}) references a joint outside 0..{}",
                s, e, joint_count
            )));
        }
        if let Some(&root) = roots.iter().find(|r| **r >= joint_count) {
            return Err(MotionError::InvalidTopology(format!(
                "root {} is outside 0..{}",
                root, joint_count
            )));
        }

        let mut adjacency = Self::neighbours(joint_count, edges);
        for &(from, to) in pruned {
            let list = adjacency.get_mut(from).ok_or_else(|| {
                MotionError::InvalidTopology(format!("pruned link ({}, {}) has no joint {}", from, to, from))
            })?;
            match list.iter().position(|&n| n == to) {
                Some(pos) => {
                    list.remove(pos);
                }
                None => {
                    return Err(MotionError::InvalidTopology(format!(
                        "pruned link ({}, {}) is not a bone",
                        from, to
                    )))
                }
            }
        }

        Ok(Self {
            joint_count,
            edges: edges.to_vec(),
            adjacency,
            roots: roots.to_vec(),
        })
    }

    /// ボーンから双方向の隣接リストを作る（ボーン順を保持）
    fn neighbours(joint_count: usize, edges: &[(usize, usize)]) -> Vec<Vec<usize>> {
        let mut adjacency = vec![Vec::new(); joint_count];
        for joint in 0..joint_count {
            for &(m, n) in edges {
                if m == joint {
                    adjacency[joint].push(n);
                } else if n == joint {
                    adjacency[joint].push(m);
                }
            }
        }
        adjacency
    }

    pub fn joint_count(&self) -> usize {
        self.joint_count
    }

    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    pub fn bone_count(&self) -> usize {
        self.edges.len()
    }

    pub fn adjacent(&self, joint: usize) -> &[usize] {
        &self.adjacency[joint]
    }

    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    /// `root` から枝刈り済み隣接リストを深さ優先で辿り、通過した有向リンクを返す
    ///
    /// `visited` はルート間で共有する。親へ戻るリンク以外で訪問済みジョイントに
    /// 入った場合は循環として中断する。
    pub fn walk(&self, root: usize, visited: &mut [bool]) -> Result<Vec<(usize, usize)>> {
        if visited[root] {
            return Err(MotionError::TopologyCycle { root, joint: root });
        }
        visited[root] = true;

        let mut links = Vec::new();
        let mut stack: Vec<(usize, Option<usize>)> = vec![(root, None)];
        while let Some((joint, parent)) = stack.pop() {
            for &next in self.adjacency[joint].iter().rev() {
                if Some(next) == parent {
                    continue;
                }
                if visited[next] {
                    return Err(MotionError::TopologyCycle { root, joint: next });
                }
                visited[next] = true;
                links.push((joint, next));
                stack.push((next, Some(joint)));
            }
        }
        Ok(links)
    }

    /// 全ルートからの走査が循環なく終わるか確認する
    pub fn validate(&self) -> Result<()> {
        let mut visited = vec![false; self.joint_count];
        for &root in &self.roots {
            self.walk(root, &mut visited)?;
        }
        Ok(())
    }
}

/// BlazePose 33 点用のトポロジー（初回アクセス時に一度だけ構築）
pub fn pose_topology() -> &'static SkeletonTopology {
    static TOPOLOGY: OnceLock<SkeletonTopology> = OnceLock::new();
    TOPOLOGY.get_or_init(|| {
        let mut adjacency = SkeletonTopology::neighbours(LandmarkIndex::COUNT, &BONE_CONNECTIONS);
        for (from, to) in PRUNED_LINKS {
            adjacency[from].retain(|&n| n != to);
        }
        SkeletonTopology {
            joint_count: LandmarkIndex::COUNT,
            edges: BONE_CONNECTIONS.to_vec(),
            adjacency,
            roots: RETARGET_ROOTS.to_vec(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bone_indices_in_range() {
        for (s, e) in BONE_CONNECTIONS {
            assert!(s < LandmarkIndex::COUNT && e < LandmarkIndex::COUNT);
            assert_ne!(s, e);
        }
        assert_eq!(pose_topology().bone_count(), BONE_COUNT);
    }

    #[test]
    fn test_pose_topology_matches_checked_build() {
        let checked = SkeletonTopology::from_edges(
            LandmarkIndex::COUNT,
            &BONE_CONNECTIONS,
            &PRUNED_LINKS,
            &RETARGET_ROOTS,
        )
        .unwrap();
        let built = pose_topology();
        for joint in 0..LandmarkIndex::COUNT {
            assert_eq!(checked.adjacent(joint), built.adjacent(joint), "joint {}", joint);
        }
    }

    #[test]
    fn test_pruned_adjacency() {
        let topo = pose_topology();
        assert_eq!(topo.adjacent(12), &[14]);
        assert_eq!(topo.adjacent(11), &[13]);
        assert_eq!(topo.adjacent(24), &[26]);
        assert_eq!(topo.adjacent(23), &[25]);
        assert_eq!(topo.adjacent(16), &[14, 18, 20, 22]);
        assert_eq!(topo.adjacent(28), &[26, 32, 30]);
        assert_eq!(topo.adjacent(20), &[16]);
    }

    #[test]
    fn test_pose_topology_is_acyclic() {
        assert!(pose_topology().validate().is_ok());
    }

    #[test]
    fn test_walk_visits_each_joint_once() {
        let topo = pose_topology();
        let mut visited = vec![false; LandmarkIndex::COUNT];
        let mut reached = Vec::new();
        for &root in topo.roots() {
            reached.push(root);
            for (_, child) in topo.walk(root, &mut visited).unwrap() {
                reached.push(child);
            }
        }
        let mut sorted = reached.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), reached.len());
        // 四肢 + 手足先の 22 点。顔はどのルートからも届かない
        assert_eq!(reached.len(), 22);
        assert!(!visited[0]);
    }

    #[test]
    fn test_walk_parent_precedes_child() {
        let topo = pose_topology();
        let mut visited = vec![false; LandmarkIndex::COUNT];
        let links = topo.walk(12, &mut visited).unwrap();
        let mut seen = vec![12usize];
        for (parent, child) in links {
            assert!(seen.contains(&parent));
            seen.push(child);
        }
        assert_eq!(seen, vec![12, 14, 16, 22, 20, 18]);
    }

    #[test]
    fn test_cycle_detected() {
        // 0-1-2-0 の三角形
        let topo = SkeletonTopology::from_edges(3, &[(0, 1), (1, 2), (2, 0)], &[], &[0]).unwrap();
        assert_eq!(
            topo.validate(),
            Err(MotionError::TopologyCycle { root: 0, joint: 2 })
        );
    }

    #[test]
    fn test_shared_joint_between_roots_detected() {
        let topo = SkeletonTopology::from_edges(3, &[(0, 1), (1, 2)], &[], &[0, 2]).unwrap();
        assert!(matches!(
            topo.validate(),
            Err(MotionError::TopologyCycle { root: 2, .. })
        ));
    }

    #[test]
    fn test_invalid_topology_rejected() {
        assert!(matches!(
            SkeletonTopology::from_edges(3, &[(0, 5)], &[], &[0]),
            Err(MotionError::InvalidTopology(_))
        ));
        assert!(matches!(
            SkeletonTopology::from_edges(3, &[(0, 1)], &[(0, 2)], &[0]),
            Err(MotionError::InvalidTopology(_))
        ));
        assert!(matches!(
            SkeletonTopology::from_edges(3, &[(0, 1)], &[], &[7]),
            Err(MotionError::InvalidTopology(_))
        ));
    }
}
