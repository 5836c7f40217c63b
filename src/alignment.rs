use nalgebra::{Matrix3, Vector3};

use crate::error::{MotionError, Result};

/// Kabsch で求めた回転
///
/// nalgebra の列ベクトル規約で保持する。`apply(p) = R·p` が整列後の点で、
/// 行ベクトル表記の `P·Rᵀ` に等しい。
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    rotation: Matrix3<f32>,
    /// 共分散行列の特異値（順不同）
    singular_values: Vector3<f32>,
}

impl Alignment {
    pub fn rotation(&self) -> &Matrix3<f32> {
        &self.rotation
    }

    pub fn singular_values(&self) -> &Vector3<f32> {
        &self.singular_values
    }

    pub fn apply(&self, v: &Vector3<f32>) -> Vector3<f32> {
        self.rotation * v
    }

    pub fn determinant(&self) -> f32 {
        self.rotation.determinant()
    }

    /// 2 番目に大きい特異値 / 最大特異値
    ///
    /// 0 に近いほど点群が一直線（または一点）に潰れていて回転が定まらない。
    pub fn condition_ratio(&self) -> f32 {
        let mut s = [
            self.singular_values[0].abs(),
            self.singular_values[1].abs(),
            self.singular_values[2].abs(),
        ];
        s.sort_by(|a, b| b.total_cmp(a));
        if s[0] <= f32::EPSILON {
            return 0.0;
        }
        s[1] / s[0]
    }

    pub fn is_well_conditioned(&self, tolerance: f32) -> bool {
        self.condition_ratio() >= tolerance
    }

    /// 条件の悪い整列を `IllConditionedAlignment` として返す
    pub fn ensure_conditioned(self, tolerance: f32) -> Result<Self> {
        let ratio = self.condition_ratio();
        if ratio < tolerance {
            return Err(MotionError::IllConditionedAlignment { ratio });
        }
        Ok(self)
    }
}

fn centroid(points: &[Vector3<f32>]) -> Vector3<f32> {
    points.iter().fold(Vector3::zeros(), |acc, p| acc + p) / points.len() as f32
}

/// `p` を `q` に最小二乗で重ねる回転を求める（Kabsch 法）
///
/// 1. 両点群を重心で中心化
/// 2. 共分散 C = Pᶜᵀ·Qᶜ
/// 3. SVD C = U Σ Vᵀ
/// 4. d = sign(det(V·Uᵀ)) で鏡映を検出
/// 5. R = V · diag(1, 1, d) · Uᵀ
///
/// d は最小特異値に対応する軸に掛けるので、結果は常に det = +1 の回転になる。
/// 条件の悪さは検出しない。呼び出し側が [`Alignment::is_well_conditioned`] で判断する。
pub fn kabsch(p: &[Vector3<f32>], q: &[Vector3<f32>]) -> Result<Alignment> {
    if p.len() != q.len() {
        return Err(MotionError::PointSetMismatch {
            left: p.len(),
            right: q.len(),
        });
    }
    if p.is_empty() {
        return Err(MotionError::EmptyPointSet);
    }

    let p_center = centroid(p);
    let q_center = centroid(q);

    let mut covariance = Matrix3::zeros();
    for (pi, qi) in p.iter().zip(q.iter()) {
        covariance += (pi - p_center) * (qi - q_center).transpose();
    }

    let svd = covariance.svd(true, true);
    let u = svd.u.ok_or(MotionError::SvdFailed)?;
    let v = svd.v_t.ok_or(MotionError::SvdFailed)?.transpose();
    let singular_values = svd.singular_values;

    let d = if (v * u.transpose()).determinant() < 0.0 { -1.0 } else { 1.0 };

    // 鏡映補正は最小特異値の軸に入れる
    let weakest = singular_values.imin();
    let mut correction = Matrix3::<f32>::identity();
    correction[(weakest, weakest)] = d;

    Ok(Alignment {
        rotation: v * correction * u.transpose(),
        singular_values,
    })
}
