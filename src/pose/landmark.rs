use nalgebra::Vector3;

/// BlazePose (MediaPipe Pose) の 33 ランドマークインデックス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum LandmarkIndex {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl LandmarkIndex {
    pub const COUNT: usize = 33;

    const ALL: [LandmarkIndex; Self::COUNT] = [
        Self::Nose,
        Self::LeftEyeInner,
        Self::LeftEye,
        Self::LeftEyeOuter,
        Self::RightEyeInner,
        Self::RightEye,
        Self::RightEyeOuter,
        Self::LeftEar,
        Self::RightEar,
        Self::MouthLeft,
        Self::MouthRight,
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::LeftElbow,
        Self::RightElbow,
        Self::LeftWrist,
        Self::RightWrist,
        Self::LeftPinky,
        Self::RightPinky,
        Self::LeftIndex,
        Self::RightIndex,
        Self::LeftThumb,
        Self::RightThumb,
        Self::LeftHip,
        Self::RightHip,
        Self::LeftKnee,
        Self::RightKnee,
        Self::LeftAnkle,
        Self::RightAnkle,
        Self::LeftHeel,
        Self::RightHeel,
        Self::LeftFootIndex,
        Self::RightFootIndex,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// 単一ランドマーク
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landmark {
    /// 正規化されたX座標 (おおむね 0.0〜1.0)
    pub x: f32,
    /// 正規化されたY座標 (おおむね 0.0〜1.0)
    pub y: f32,
    /// 奥行き（X と同程度のスケール）
    pub z: f32,
    /// 可視度 (0.0〜1.0)。検出器が出さない場合は 1.0
    pub visibility: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z, visibility: 1.0 }
    }

    pub fn with_visibility(mut self, visibility: f32) -> Self {
        self.visibility = visibility;
        self
    }

    /// 可視度が閾値以上か
    pub fn is_visible(&self, threshold: f32) -> bool {
        self.visibility >= threshold
    }

    pub fn position(&self) -> Vector3<f32> {
        Vector3::new(self.x, self.y, self.z)
    }
}

impl Default for Landmark {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            visibility: 0.0,
        }
    }
}

/// 33 ランドマークからなる 1 フレーム分の姿勢
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkFrame {
    pub landmarks: [Landmark; LandmarkIndex::COUNT],
}

impl LandmarkFrame {
    pub fn new(landmarks: [Landmark; LandmarkIndex::COUNT]) -> Self {
        Self { landmarks }
    }

    /// 読み込み済みの座標配列から作成（可視度は 1.0）
    pub fn from_positions(positions: &[[f32; 3]; LandmarkIndex::COUNT]) -> Self {
        Self {
            landmarks: std::array::from_fn(|i| {
                let [x, y, z] = positions[i];
                Landmark::new(x, y, z)
            }),
        }
    }

    /// インデックスでランドマークを取得
    pub fn get(&self, index: LandmarkIndex) -> &Landmark {
        &self.landmarks[index as usize]
    }

    pub fn position(&self, joint: usize) -> Vector3<f32> {
        self.landmarks[joint].position()
    }

    /// 指定ジョイントの座標だけ差し替えたコピーを返す（可視度は保持）
    pub fn with_position(&self, joint: usize, position: Vector3<f32>) -> Self {
        let mut frame = self.clone();
        frame.set_position(joint, position);
        frame
    }

    pub fn set_position(&mut self, joint: usize, position: Vector3<f32>) {
        let lm = &mut self.landmarks[joint];
        lm.x = position.x;
        lm.y = position.y;
        lm.z = position.z;
    }

    /// 全ランドマークの座標を一様にスケール
    pub fn scaled(&self, factor: f32) -> Self {
        let mut frame = self.clone();
        for lm in frame.landmarks.iter_mut() {
            lm.x *= factor;
            lm.y *= factor;
            lm.z *= factor;
        }
        frame
    }

    /// 最小の可視度
    pub fn min_visibility(&self) -> f32 {
        self.landmarks
            .iter()
            .map(|lm| lm.visibility)
            .fold(f32::INFINITY, f32::min)
    }

    /// 全ジョイントが閾値以上の可視度を持つか
    ///
    /// 1 つでも下回ればそのフレームは採点しない（描画はしてよい）。
    pub fn is_reliable(&self, visibility_threshold: f32) -> bool {
        self.landmarks.iter().all(|lm| lm.is_visible(visibility_threshold))
    }
}

impl Default for LandmarkFrame {
    fn default() -> Self {
        Self {
            landmarks: [Landmark::default(); LandmarkIndex::COUNT],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landmark_index_count() {
        assert_eq!(LandmarkIndex::COUNT, 33);
    }

    #[test]
    fn test_landmark_index_from_index() {
        assert_eq!(LandmarkIndex::from_index(0), Some(LandmarkIndex::Nose));
        assert_eq!(LandmarkIndex::from_index(12), Some(LandmarkIndex::RightShoulder));
        assert_eq!(LandmarkIndex::from_index(32), Some(LandmarkIndex::RightFootIndex));
        assert_eq!(LandmarkIndex::from_index(33), None);
        for i in 0..LandmarkIndex::COUNT {
            assert_eq!(LandmarkIndex::from_index(i).map(|l| l as usize), Some(i));
        }
    }

    #[test]
    fn test_landmark_is_visible() {
        let lm = Landmark::new(0.5, 0.5, 0.0).with_visibility(0.7);
        assert!(lm.is_visible(0.5));
        assert!(!lm.is_visible(0.8));
    }

    #[test]
    fn test_frame_reliability() {
        let mut positions = [[0.0f32; 3]; LandmarkIndex::COUNT];
        positions[3] = [0.2, 0.3, 0.1];
        let frame = LandmarkFrame::from_positions(&positions);
        assert!(frame.is_reliable(0.5));

        let mut frame = frame;
        frame.landmarks[LandmarkIndex::LeftAnkle as usize].visibility = 0.4;
        assert!(!frame.is_reliable(0.5));
        assert!((frame.min_visibility() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_frame_get_and_scale() {
        let mut positions = [[0.0f32; 3]; LandmarkIndex::COUNT];
        positions[LandmarkIndex::Nose as usize] = [0.5, 0.25, -0.1];
        let frame = LandmarkFrame::from_positions(&positions).scaled(512.0);

        let nose = frame.get(LandmarkIndex::Nose);
        assert_eq!(nose.x, 256.0);
        assert_eq!(nose.y, 128.0);
        assert!((nose.z + 51.2).abs() < 1e-4);
        assert_eq!(nose.visibility, 1.0);
    }

    #[test]
    fn test_with_position_keeps_visibility() {
        let mut frame = LandmarkFrame::default();
        frame.landmarks[4].visibility = 0.9;
        let moved = frame.with_position(4, Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(moved.position(4), Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(moved.landmarks[4].visibility, 0.9);
        assert_eq!(frame.position(4), Vector3::zeros());
    }
}
