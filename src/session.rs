use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::{Config, SessionConfig};
use crate::pose::{BoneVectors, LandmarkFrame};
use crate::render::{bone_colors, Canvas, Projector, Rgba};
use crate::sequence::ReferenceSequence;
use crate::similarity::{ScoreOutcome, SimilarityScorer};
use crate::skeleton::pose_topology;
use crate::view::{OrientationController, SharedOrientation};

/// 不在時に表示する案内
pub const ABSENCE_HINT: &str = "Step fully into the camera view";

/// 検出スレッドから最新のライブ姿勢を受け取るスロット
///
/// 古いフレームは上書きで捨てる。消費側は `take_newer` で前回以降の新着だけを取る。
#[derive(Debug, Clone, Default)]
pub struct FrameSlot {
    latest: Arc<Mutex<Option<LandmarkFrame>>>,
    frame_id: Arc<AtomicU64>,
}

impl FrameSlot {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Option<LandmarkFrame>> {
        self.latest.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// 新しいフレームを置き、そのフレームIDを返す
    pub fn publish(&self, frame: LandmarkFrame) -> u64 {
        let mut guard = self.lock();
        *guard = Some(frame);
        // ロック内で更新するので ID とフレームは常に対応する
        self.frame_id.fetch_add(1, Ordering::Release) + 1
    }

    /// 現在のフレームID。新フレームが到着するたびにインクリメントされる。
    pub fn frame_id(&self) -> u64 {
        self.frame_id.load(Ordering::Acquire)
    }

    /// 最新フレーム。初回到着前と `clear` 後は None
    pub fn latest(&self) -> Option<LandmarkFrame> {
        self.lock().clone()
    }

    /// `last_id` より新しいフレームがあれば (ID, フレーム) を返す
    pub fn take_newer(&self, last_id: u64) -> Option<(u64, LandmarkFrame)> {
        let guard = self.lock();
        let id = self.frame_id.load(Ordering::Acquire);
        if id <= last_id {
            return None;
        }
        guard.as_ref().map(|frame| (id, frame.clone()))
    }

    /// ライブ入力の停止
    pub fn clear(&self) {
        *self.lock() = None;
    }
}

/// 連続して姿勢が取れなかったフレーム数から在/不在を判定する
#[derive(Debug, Clone)]
pub struct PresenceTracker {
    grace_frames: u32,
    missed: u32,
}

impl PresenceTracker {
    pub fn new(fps: f32, grace_secs: f32) -> Self {
        Self {
            grace_frames: (fps * grace_secs).round().max(0.0) as u32,
            missed: 0,
        }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(config.fps, config.undetected_grace_secs)
    }

    /// 1 フレーム分の結果を反映し、在否を返す
    pub fn update(&mut self, reliable: bool) -> bool {
        if reliable {
            self.missed = 0;
        } else {
            self.missed = self.missed.saturating_add(1);
        }
        self.is_present()
    }

    pub fn is_present(&self) -> bool {
        self.missed <= self.grace_frames
    }

    pub fn missed_frames(&self) -> u32 {
        self.missed
    }

    pub fn hint(&self) -> Option<&'static str> {
        (!self.is_present()).then_some(ABSENCE_HINT)
    }
}

/// 1 ライブフレームの処理結果
#[derive(Debug, Clone)]
pub struct FrameReport {
    pub outcome: ScoreOutcome,
    /// ボーン順の色。直近に比較できたフレームのもの（まだ無ければ None）
    pub bone_colors: Option<Vec<Option<Rgba>>>,
    pub reference_index: usize,
    pub present: bool,
    pub hint: Option<&'static str>,
}

/// 手本との比較セッション
///
/// 基準姿勢列・現在の基準フレーム・視点・直近のボーン色を持ち、
/// ライブ姿勢が届くたびに採点して描画用の色を更新する。
pub struct MotionSession {
    sequence: ReferenceSequence,
    reference_index: usize,
    reference_bones: BoneVectors,
    scorer: SimilarityScorer,
    projector: Projector,
    orientation: SharedOrientation,
    presence: PresenceTracker,
    colors: Option<Vec<Option<Rgba>>>,
    visibility_threshold: f32,
    bone_epsilon: f32,
}

impl MotionSession {
    pub fn new(config: &Config, sequence: ReferenceSequence) -> Self {
        let bone_epsilon = config.scoring.bone_epsilon;
        let reference_bones = BoneVectors::extract(&sequence.frames()[0], pose_topology(), bone_epsilon);
        Self {
            sequence,
            reference_index: 0,
            reference_bones,
            scorer: SimilarityScorer::from_config(&config.scoring),
            projector: Projector::from_config(&config.render),
            orientation: SharedOrientation::new(OrientationController::from_config(&config.view)),
            presence: PresenceTracker::from_config(&config.session),
            colors: None,
            visibility_threshold: config.scoring.visibility_threshold,
            bone_epsilon,
        }
    }

    pub fn sequence(&self) -> &ReferenceSequence {
        &self.sequence
    }

    /// 入力スレッドに渡す視点ハンドル
    pub fn orientation(&self) -> SharedOrientation {
        self.orientation.clone()
    }

    pub fn presence(&self) -> &PresenceTracker {
        &self.presence
    }

    pub fn reference_index(&self) -> usize {
        self.reference_index
    }

    pub fn reference_frame(&self) -> &LandmarkFrame {
        &self.sequence.frames()[self.reference_index]
    }

    /// 基準フレームを切り替える（範囲外は末尾に丸める）
    pub fn set_reference_index(&mut self, index: usize) {
        let index = index.min(self.sequence.len() - 1);
        if index != self.reference_index {
            self.reference_index = index;
            self.reference_bones = BoneVectors::extract(self.reference_frame(), pose_topology(), self.bone_epsilon);
        }
    }

    pub fn set_reference_time(&mut self, seconds: f32) {
        self.set_reference_index(self.sequence.index_at(seconds));
    }

    /// 次の基準フレームへ。末尾の次は先頭に戻る
    pub fn advance(&mut self) {
        self.set_reference_index((self.reference_index + 1) % self.sequence.len());
    }

    /// ライブ姿勢 1 フレームを処理
    ///
    /// 可視度が閾値未満のジョイントを含むフレームも色は更新するが、スコアは `Undetected`。
    pub fn on_detection(&mut self, live: &LandmarkFrame) -> FrameReport {
        let reliable = live.is_reliable(self.visibility_threshold);
        let was_present = self.presence.is_present();
        let present = self.presence.update(reliable);
        if was_present && !present {
            log::info!("user left the camera view ({} frames)", self.presence.missed_frames());
        }

        let live_bones = BoneVectors::extract(live, pose_topology(), self.bone_epsilon);
        let outcome = match self.scorer.score(&self.reference_bones, &live_bones) {
            Ok(similarity) => {
                self.colors = Some(bone_colors(&similarity));
                if reliable {
                    similarity.outcome()
                } else {
                    log::debug!("min visibility {:.2}, score suppressed", live.min_visibility());
                    ScoreOutcome::Undetected
                }
            }
            Err(e) => {
                log::debug!("frame skipped: {}", e);
                ScoreOutcome::Undetected
            }
        };

        self.report(outcome)
    }

    /// 検出器が姿勢を返さなかったフレーム
    pub fn on_missing(&mut self) -> FrameReport {
        self.presence.update(false);
        self.report(ScoreOutcome::Undetected)
    }

    fn report(&self, outcome: ScoreOutcome) -> FrameReport {
        FrameReport {
            outcome,
            bone_colors: self.colors.clone(),
            reference_index: self.reference_index,
            present: self.presence.is_present(),
            hint: self.presence.hint(),
        }
    }

    pub fn bone_colors(&self) -> Option<&[Option<Rgba>]> {
        self.colors.as_deref()
    }

    /// ライブ入力停止時に採点色を外す
    pub fn clear_colors(&mut self) {
        self.colors = None;
    }

    /// 現在の基準フレームを現在の視点・ボーン色で描画
    pub fn render(&self) -> Canvas {
        self.projector
            .render(self.reference_frame(), &self.orientation.view_normal(), self.bone_colors())
    }
}
