use nalgebra::{Matrix3, Vector2, Vector3};

use crate::config::RenderConfig;
use crate::pose::LandmarkFrame;
use crate::render::canvas::{Canvas, Rgba};
use crate::render::skeleton::{AXIS_COLORS, DEFAULT_BONE_COLOR, JOINT_COLOR};
use crate::skeleton::pose_topology;

/// 法線 n の平面への正射影 `I − n·nᵀ`
///
/// 長さゼロの法線は正面 (0, 0, 1) とみなす。
pub fn projection_matrix(normal: &Vector3<f32>) -> Matrix3<f32> {
    let n = normal.try_normalize(f32::EPSILON).unwrap_or_else(Vector3::z);
    Matrix3::identity() - n * n.transpose()
}

/// 姿勢を任意の視線方向から正射影して描く
///
/// 描画は (座標, 視線, ボーン色) だけで決まる純粋関数。
#[derive(Debug, Clone)]
pub struct Projector {
    size: usize,
    point_radius: i32,
    line_width: i32,
}

impl Projector {
    pub fn new(size: usize, point_radius: i32, line_width: i32) -> Self {
        Self {
            size,
            point_radius,
            line_width,
        }
    }

    pub fn from_config(config: &RenderConfig) -> Self {
        Self::new(config.canvas_size as usize, config.point_radius, config.line_width)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    fn extent(&self) -> f32 {
        self.size as f32
    }

    fn center(&self) -> Vector3<f32> {
        Vector3::repeat(self.extent() * 0.5)
    }

    /// 正規化座標のランドマークをキャンバス座標へ
    ///
    /// キャンバス範囲 E に拡大し、中心 E/2 を原点にして射影してから戻す。
    /// 正面視点ではそのまま `(x·E, y·E)` になる。
    pub fn project_keypoints(&self, frame: &LandmarkFrame, normal: &Vector3<f32>) -> Vec<Vector2<f32>> {
        let projection = projection_matrix(normal);
        let extent = self.extent();
        let center = self.center();
        frame
            .landmarks
            .iter()
            .map(|lm| {
                let v = projection * (lm.position() * extent - center);
                Vector2::new(v.x + center.x, v.y + center.y)
            })
            .collect()
    }

    /// 座標軸の基準点 原点, z, y, x をキャンバス座標へ
    pub fn project_axes(&self, normal: &Vector3<f32>) -> [Vector2<f32>; 4] {
        let projection = projection_matrix(normal);
        let e = self.extent();
        let center = self.center();
        let points = [
            Vector3::zeros(),
            Vector3::new(0.0, 0.0, e),
            Vector3::new(0.0, e, 0.0),
            Vector3::new(e, 0.0, 0.0),
        ];
        points.map(|p| {
            let v = projection * p;
            Vector2::new(v.x + center.x, v.y + center.y)
        })
    }

    /// ジョイント → ボーン → 座標軸の順に描画
    ///
    /// `colors` はボーン順。None のボーン（または `colors` 自体が None）は白で描く。
    pub fn render(&self, frame: &LandmarkFrame, normal: &Vector3<f32>, colors: Option<&[Option<Rgba>]>) -> Canvas {
        let mut canvas = Canvas::new(self.size, self.size);
        let points = self.project_keypoints(frame, normal);
        let pixel = |p: &Vector2<f32>| (p.x.round() as i32, p.y.round() as i32);

        for p in &points {
            let (x, y) = pixel(p);
            canvas.fill_circle(x, y, self.point_radius, JOINT_COLOR);
        }

        for (bone, &(from, to)) in pose_topology().edges().iter().enumerate() {
            let color = colors
                .and_then(|c| c.get(bone).copied().flatten())
                .unwrap_or(DEFAULT_BONE_COLOR);
            let (x0, y0) = pixel(&points[from]);
            let (x1, y1) = pixel(&points[to]);
            canvas.draw_line(x0, y0, x1, y1, self.line_width, color);
        }

        let axes = self.project_axes(normal);
        let (ox, oy) = pixel(&axes[0]);
        for (end, color) in axes[1..].iter().zip(AXIS_COLORS) {
            let (x, y) = pixel(end);
            canvas.draw_line(ox, oy, x, y, self.line_width, color);
        }

        canvas
    }
}

impl Default for Projector {
    fn default() -> Self {
        Self::from_config(&RenderConfig::default())
    }
}
