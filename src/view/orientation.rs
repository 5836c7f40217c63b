use std::sync::{Arc, Mutex, MutexGuard};

use nalgebra::{UnitQuaternion, Vector3};

use crate::config::ViewConfig;

/// ドラッグで操作する自由視点の回転
///
/// 1 つのビューアセッションが所有する。合成のたびに正規化するので
/// 長時間ドラッグしても回転が崩れない。
#[derive(Debug, Clone)]
pub struct OrientationController {
    rotation: UnitQuaternion<f32>,
    degrees_per_pixel: f32,
}

impl OrientationController {
    pub fn new(degrees_per_pixel: f32) -> Self {
        Self {
            rotation: UnitQuaternion::identity(),
            degrees_per_pixel,
        }
    }

    pub fn from_config(config: &ViewConfig) -> Self {
        Self::new(config.degrees_per_pixel)
    }

    /// ドラッグ量（ピクセル）で回転を更新
    ///
    /// 横移動はワールド上方向 (Y) まわりのヨー、縦移動はワールド右方向 (X)
    /// まわりのピッチ。`q ← q ⊗ q_yaw ⊗ q_pitch` の順で右から掛ける。
    pub fn apply_drag(&mut self, dx: f32, dy: f32) {
        let yaw = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), (dx * self.degrees_per_pixel).to_radians());
        let pitch = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), (dy * self.degrees_per_pixel).to_radians());
        let composed = self.rotation.into_inner() * yaw.into_inner() * pitch.into_inner();
        self.rotation = UnitQuaternion::new_normalize(composed);
    }

    pub fn reset(&mut self) {
        self.rotation = UnitQuaternion::identity();
    }

    pub fn rotation(&self) -> UnitQuaternion<f32> {
        self.rotation
    }

    /// 視線方向: (0, 0, 1) を現在の回転で回したもの
    pub fn view_normal(&self) -> Vector3<f32> {
        self.rotation * Vector3::z()
    }
}

impl Default for OrientationController {
    fn default() -> Self {
        Self::from_config(&ViewConfig::default())
    }
}

/// 描画スレッドと入力スレッドで共有する回転
///
/// 更新はロック内で完結し、読み取り側は視線ベクトルのスナップショットだけを受け取る。
#[derive(Debug, Clone, Default)]
pub struct SharedOrientation {
    inner: Arc<Mutex<OrientationController>>,
}

impl SharedOrientation {
    pub fn new(controller: OrientationController) -> Self {
        Self {
            inner: Arc::new(Mutex::new(controller)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, OrientationController> {
        // 回転は常に正規化済みなので、ポイズンされても中身はそのまま使える
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn apply_drag(&self, dx: f32, dy: f32) {
        self.lock().apply_drag(dx, dy);
    }

    pub fn reset(&self) {
        self.lock().reset();
    }

    pub fn view_normal(&self) -> Vector3<f32> {
        self.lock().view_normal()
    }

    pub fn snapshot(&self) -> OrientationController {
        self.lock().clone()
    }
}
