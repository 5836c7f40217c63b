use crate::error::{MotionError, Result};
use crate::pose::{LandmarkFrame, LandmarkIndex};

/// 手本動画から抽出済みの基準姿勢列
#[derive(Debug, Clone)]
pub struct ReferenceSequence {
    frames: Vec<LandmarkFrame>,
    fps: f32,
}

impl ReferenceSequence {
    pub fn new(frames: Vec<LandmarkFrame>, fps: f32) -> Result<Self> {
        if frames.is_empty() {
            return Err(MotionError::EmptySequence);
        }
        if !(fps.is_finite() && fps > 0.0) {
            return Err(MotionError::InvalidFrameRate(fps));
        }
        Ok(Self { frames, fps })
    }

    /// 読み込み済みの座標配列から作成
    pub fn from_positions(positions: &[[[f32; 3]; LandmarkIndex::COUNT]], fps: f32) -> Result<Self> {
        Self::new(positions.iter().map(LandmarkFrame::from_positions).collect(), fps)
    }

    pub fn get(&self, index: usize) -> Option<&LandmarkFrame> {
        self.frames.get(index)
    }

    pub fn frames(&self) -> &[LandmarkFrame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn duration_secs(&self) -> f32 {
        self.frames.len() as f32 / self.fps
    }

    /// 再生時刻に対応するフレーム番号（範囲外は端に丸める）
    pub fn index_at(&self, seconds: f32) -> usize {
        let last = self.frames.len() - 1;
        if seconds.is_nan() || seconds <= 0.0 {
            return 0;
        }
        ((seconds * self.fps) as usize).min(last)
    }

    pub fn frame_at(&self, seconds: f32) -> &LandmarkFrame {
        &self.frames[self.index_at(seconds)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::sample::STANDING_POSITIONS;

    fn sequence(len: usize, fps: f32) -> ReferenceSequence {
        let positions: Vec<_> = (0..len)
            .map(|i| {
                let mut p = STANDING_POSITIONS;
                p[0][0] = i as f32;
                p
            })
            .collect();
        ReferenceSequence::from_positions(&positions, fps).unwrap()
    }

    #[test]
    fn test_rejects_empty_and_bad_fps() {
        assert!(matches!(ReferenceSequence::new(vec![], 30.0), Err(MotionError::EmptySequence)));
        let frames = vec![LandmarkFrame::default()];
        assert!(matches!(
            ReferenceSequence::new(frames.clone(), 0.0),
            Err(MotionError::InvalidFrameRate(_))
        ));
        assert!(ReferenceSequence::new(frames.clone(), f32::NAN).is_err());
        assert!(ReferenceSequence::new(frames, -5.0).is_err());
    }

    #[test]
    fn test_random_access() {
        let seq = sequence(10, 30.0);
        assert_eq!(seq.len(), 10);
        assert!(!seq.is_empty());
        assert_eq!(seq.get(3).map(|f| f.landmarks[0].x), Some(3.0));
        assert!(seq.get(10).is_none());
    }

    #[test]
    fn test_duration() {
        let seq = sequence(90, 30.0);
        assert!((seq.duration_secs() - 3.0).abs() < 1e-6);
        assert_eq!(seq.fps(), 30.0);
    }

    #[test]
    fn test_frame_at_clamps() {
        let seq = sequence(90, 30.0);
        assert_eq!(seq.index_at(0.0), 0);
        assert_eq!(seq.index_at(-1.0), 0);
        assert_eq!(seq.index_at(1.0), 30);
        assert_eq!(seq.index_at(1.51), 45);
        assert_eq!(seq.index_at(100.0), 89);
        assert_eq!(seq.frame_at(1.0).landmarks[0].x, 30.0);
    }
}
