use std::f32::consts::FRAC_1_SQRT_2;
use std::fmt;

use nalgebra::Vector3;

use crate::alignment::{kabsch, Alignment};
use crate::config::ScoringConfig;
use crate::error::{MotionError, Result};
use crate::pose::BoneVectors;

/// ボーンごとのコサイン類似度を体感スコアに写す折れ線 (cos, score)
///
/// 60° ずれで 0.3、45° で 0.5、30° で 0.9。範囲外は端の値で打ち切る。
pub const REMAP_CURVE: [(f32, f32); 5] = [
    (0.0, 0.0),
    (0.5, 0.3),
    (FRAC_1_SQRT_2, 0.5),
    (0.866_025_4, 0.9),
    (1.0, 1.0),
];

/// コサイン類似度 → 0.0〜1.0 のスコア（単調非減少）
pub fn remap(cosine: f32) -> f32 {
    if cosine.is_nan() {
        return 0.0;
    }
    let (first_x, first_y) = REMAP_CURVE[0];
    if cosine <= first_x {
        return first_y;
    }
    for w in REMAP_CURVE.windows(2) {
        let (x0, y0) = w[0];
        let (x1, y1) = w[1];
        if cosine <= x1 {
            return y0 + (y1 - y0) * (cosine - x0) / (x1 - x0);
        }
    }
    REMAP_CURVE[REMAP_CURVE.len() - 1].1
}

/// 点群を一本のベクトルとみなしたときのコサイン類似度
pub fn flattened_cosine(a: &[Vector3<f32>], b: &[Vector3<f32>]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x.dot(y)).sum();
    let na = a.iter().map(|x| x.norm_squared()).sum::<f32>().sqrt();
    let nb = b.iter().map(|x| x.norm_squared()).sum::<f32>().sqrt();
    dot / (na * nb)
}

/// 1 フレームの採点結果
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoreOutcome {
    /// 0〜100 のパーセント
    Scored(f32),
    /// 姿勢が検出できていない（低スコアとは区別する）
    Undetected,
}

impl ScoreOutcome {
    pub fn percent(&self) -> Option<f32> {
        match self {
            Self::Scored(p) => Some(*p),
            Self::Undetected => None,
        }
    }

    pub fn is_detected(&self) -> bool {
        matches!(self, Self::Scored(_))
    }
}

impl fmt::Display for ScoreOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scored(p) => write!(f, "{:.2}%", p),
            Self::Undetected => write!(f, "undetected"),
        }
    }
}

/// ボーン単位の一致度と全体スコア
#[derive(Debug, Clone)]
pub struct BoneSimilarity {
    /// 整列後のコサイン類似度（退化ボーンは None）
    pub cosines: Vec<Option<f32>>,
    /// `remap` 後の値（退化ボーンは None）
    pub remapped: Vec<Option<f32>>,
    /// 採点に使ったボーン数
    pub valid_bones: usize,
    /// 0〜100
    pub percent: f32,
    pub alignment: Alignment,
}

impl BoneSimilarity {
    pub fn outcome(&self) -> ScoreOutcome {
        ScoreOutcome::Scored(self.percent)
    }
}

/// ライブ姿勢を基準姿勢に回転で合わせてから採点する
#[derive(Debug, Clone)]
pub struct SimilarityScorer {
    condition_tolerance: f32,
}

impl SimilarityScorer {
    pub fn new(condition_tolerance: f32) -> Self {
        Self { condition_tolerance }
    }

    pub fn from_config(config: &ScoringConfig) -> Self {
        Self::new(config.condition_tolerance)
    }

    /// 基準とライブのボーン集合を比較する
    ///
    /// 両方で有効なボーンだけで Kabsch 整列し、ライブ側を回転させてから
    /// ボーンごとの内積を `remap` して平均する。
    /// 有効なボーンが 1 本もなければ `UndetectedPose`、整列が不安定なら
    /// `IllConditionedAlignment`。
    pub fn score(&self, reference: &BoneVectors, live: &BoneVectors) -> Result<BoneSimilarity> {
        if reference.len() != live.len() {
            return Err(MotionError::PointSetMismatch {
                left: reference.len(),
                right: live.len(),
            });
        }

        let (indices, (ref_dirs, live_dirs)): (Vec<usize>, (Vec<Vector3<f32>>, Vec<Vector3<f32>>)) =
            reference
                .paired(live)
                .map(|(i, r, l)| (i, (*r, *l)))
                .unzip();
        if indices.is_empty() {
            return Err(MotionError::UndetectedPose);
        }

        let alignment = kabsch(&live_dirs, &ref_dirs)?.ensure_conditioned(self.condition_tolerance)?;

        let mut cosines = vec![None; reference.len()];
        let mut remapped = vec![None; reference.len()];
        let mut sum = 0.0f32;
        for ((&bone, r), l) in indices.iter().zip(&ref_dirs).zip(&live_dirs) {
            let cosine = r.dot(&alignment.apply(l)).clamp(-1.0, 1.0);
            let value = remap(cosine);
            cosines[bone] = Some(cosine);
            remapped[bone] = Some(value);
            sum += value;
        }

        let valid_bones = indices.len();
        let percent = (sum / valid_bones as f32 * 100.0).clamp(0.0, 100.0);
        log::debug!("similarity {:.2}% over {} bones", percent, valid_bones);

        Ok(BoneSimilarity {
            cosines,
            remapped,
            valid_bones,
            percent,
            alignment,
        })
    }

    /// `score` の結果を表示用の `ScoreOutcome` に畳む
    pub fn outcome(&self, reference: &BoneVectors, live: &BoneVectors) -> ScoreOutcome {
        match self.score(reference, live) {
            Ok(similarity) => similarity.outcome(),
            Err(e) => {
                log::debug!("frame not scored: {}", e);
                ScoreOutcome::Undetected
            }
        }
    }
}

impl Default for SimilarityScorer {
    fn default() -> Self {
        Self::from_config(&ScoringConfig::default())
    }
}
