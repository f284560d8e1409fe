// crates/mp_mesh/src/geometry.rs

//! 多面体网格几何计算
//!
//! - 面中心与面积向量：绕面平均点做三角剖分后面积加权
//! - 单元中心与体积：以估计中心为顶点做棱锥分解
//!
//! 面积向量方向遵循顶点右手顺序，对内部面从 owner 指向 neighbour，
//! 对边界面指向域外。

use glam::DVec3;

/// 面积小于该值的面视为退化面
pub const VSMALL: f64 = 1e-300;

/// 面几何量
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceGeometry {
    /// 面中心
    pub centre: DVec3,
    /// 面积向量（模长为面积）
    pub area: DVec3,
}

/// 单元几何量
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellGeometry {
    /// 单元质心
    pub centre: DVec3,
    /// 单元体积
    pub volume: f64,
}

/// 计算单个面的中心和面积向量
///
/// 三角形直接计算；多边形以顶点平均点为公共顶点剖分为三角形，
/// 以三角形面积加权其中心。
pub fn face_geometry(points: &[DVec3]) -> FaceGeometry {
    let n = points.len();
    if n == 3 {
        return FaceGeometry {
            centre: (points[0] + points[1] + points[2]) / 3.0,
            area: 0.5 * (points[1] - points[0]).cross(points[2] - points[0]),
        };
    }

    let average = points.iter().copied().sum::<DVec3>() / n as f64;

    let mut sum_n = DVec3::ZERO;
    let mut sum_a = 0.0;
    let mut sum_ac = DVec3::ZERO;

    for i in 0..n {
        let p = points[i];
        let next = points[(i + 1) % n];
        let centroid3 = p + next + average;
        let normal = (next - p).cross(average - p);
        let a = normal.length();

        sum_n += normal;
        sum_a += a;
        sum_ac += a * centroid3;
    }

    let centre = if sum_a > VSMALL {
        sum_ac / (3.0 * sum_a)
    } else {
        average
    };

    FaceGeometry {
        centre,
        area: 0.5 * sum_n,
    }
}

/// 计算单元中心和体积
///
/// `faces` 给出单元各面的几何量及其是否以该单元为 owner。
/// owner 面的面积向量指向单元外，neighbour 面需反向。
pub fn cell_geometry(faces: &[(FaceGeometry, bool)]) -> CellGeometry {
    if faces.is_empty() {
        return CellGeometry {
            centre: DVec3::ZERO,
            volume: 0.0,
        };
    }

    let estimate = faces.iter().map(|(f, _)| f.centre).sum::<DVec3>() / faces.len() as f64;

    let mut volume3 = 0.0;
    let mut weighted_centre = DVec3::ZERO;

    for (face, is_owner) in faces {
        let outward = if *is_owner { face.area } else { -face.area };
        let pyr3_vol = outward.dot(face.centre - estimate);
        let pyr_centre = 0.75 * face.centre + 0.25 * estimate;

        weighted_centre += pyr3_vol * pyr_centre;
        volume3 += pyr3_vol;
    }

    let centre = if volume3.abs() > VSMALL {
        weighted_centre / volume3
    } else {
        estimate
    };

    CellGeometry {
        centre,
        volume: volume3 / 3.0,
    }
}
