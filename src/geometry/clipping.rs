//! 近平面裁剪
//!
//! 近平面即相机局部 X=0 平面。跨越近平面的图元需要先把后方顶点推到前方，
//! 投影坐标才有意义。支持两种策略，见 [`ClipMode`]。

use crate::geometry::vertex::{PlaneSide, ProjectedPoint};
use log::debug;

/// 精确裁剪时使用的相机空间X坐标（略大于0，避免投影除以零）
pub const NEAR_CLIP_X: f32 = 1e-3;

/// 外推裁剪的系数
pub const EXTRAPOLATION_FACTOR: f32 = 100.0;

/// 近平面裁剪策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClipMode {
    /// 在相机空间中求边与 x = NEAR_CLIP_X 平面的交点
    #[default]
    Exact,
    /// 在投影平面上沿 后方点 -> 前方点 方向外推固定倍数。
    /// 只是近似，误差随离平面的距离增大；保留用于复现旧输出。
    Extrapolate,
}

impl ClipMode {
    pub fn name(self) -> &'static str {
        match self {
            ClipMode::Exact => "exact",
            ClipMode::Extrapolate => "extrapolate",
        }
    }

    /// 把后方顶点沿边推向前方顶点，返回标记为 `Clipped` 的新顶点
    pub fn clip_toward(self, behind: &ProjectedPoint, front: &ProjectedPoint) -> ProjectedPoint {
        match self {
            ClipMode::Exact => {
                let b = behind.camera_space;
                let f = front.camera_space;
                let denom = f.x - b.x;
                // 前方点本身比 NEAR_CLIP_X 更近时 t>1，直接取前方点
                let t = if denom > 0.0 {
                    ((NEAR_CLIP_X - b.x) / denom).clamp(0.0, 1.0)
                } else {
                    1.0
                };
                let cs = b + (f - b) * t;
                ProjectedPoint {
                    camera_space: cs,
                    distance_to_camera: cs.magnitude(),
                    plane_x: cs.y / cs.x,
                    plane_y: cs.z / cs.x,
                    side: PlaneSide::Clipped,
                }
            }
            ClipMode::Extrapolate => ProjectedPoint {
                plane_x: behind.plane_x + EXTRAPOLATION_FACTOR * (front.plane_x - behind.plane_x),
                plane_y: behind.plane_y + EXTRAPOLATION_FACTOR * (front.plane_y - behind.plane_y),
                side: PlaneSide::Clipped,
                ..*behind
            },
        }
    }
}

/// 三角形裁剪结果
#[derive(Debug, Clone, PartialEq)]
pub enum TriangleClip {
    /// 三个顶点都在后方
    Discarded,
    /// 三个顶点都在前方，原样绘制
    Unclipped([ProjectedPoint; 3]),
    /// 一个前方顶点，两个后方顶点被各自推向它
    Clipped([ProjectedPoint; 3]),
    /// 两个前方顶点：裁剪出的四边形拆成两个三角形
    Split([ProjectedPoint; 3], [ProjectedPoint; 3]),
}

impl TriangleClip {
    /// 需要光栅化的三角形列表
    pub fn triangles(&self) -> Vec<[ProjectedPoint; 3]> {
        match self {
            TriangleClip::Discarded => Vec::new(),
            TriangleClip::Unclipped(t) | TriangleClip::Clipped(t) => vec![*t],
            TriangleClip::Split(first, second) => vec![*first, *second],
        }
    }
}

/// 裁剪线段；两端都在后方时返回 `None`
pub fn clip_line(
    p1: ProjectedPoint,
    p2: ProjectedPoint,
    mode: ClipMode,
) -> Option<[ProjectedPoint; 2]> {
    match (p1.side.is_front(), p2.side.is_front()) {
        (false, false) => None,
        (true, true) => Some([p1, p2]),
        (false, true) => Some([mode.clip_toward(&p1, &p2), p2]),
        (true, false) => Some([p1, mode.clip_toward(&p2, &p1)]),
    }
}

/// 按前方/后方划分顶点后执行裁剪状态机
pub fn clip_triangle(points: [ProjectedPoint; 3], mode: ClipMode) -> TriangleClip {
    let mut front = Vec::with_capacity(3);
    let mut behind = Vec::with_capacity(3);
    for (i, p) in points.iter().enumerate() {
        if p.side.is_front() {
            front.push(i);
        } else {
            behind.push(i);
        }
    }

    match front.len() {
        0 => TriangleClip::Discarded,
        1 => {
            let f = points[front[0]];
            let mut clipped = points;
            for &i in &behind {
                clipped[i] = mode.clip_toward(&points[i], &f);
            }
            TriangleClip::Clipped(clipped)
        }
        2 => {
            let f0 = points[front[0]];
            let f1 = points[front[1]];
            let b = points[behind[0]];

            let toward_f0 = mode.clip_toward(&b, &f0);
            let toward_f1 = mode.clip_toward(&b, &f1);

            let mut first = points;
            first[behind[0]] = toward_f0;
            let second = [f1, toward_f0, toward_f1];
            debug!(
                "三角形跨越近平面，拆分为两个 (后方顶点 {})",
                behind[0]
            );
            TriangleClip::Split(first, second)
        }
        _ => TriangleClip::Unclipped(points),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::camera::Camera;
    use crate::geometry::vertex::Point;

    fn project(x: f32, y: f32, z: f32) -> ProjectedPoint {
        Point::new(x, y, z)
            .to_camera_space(&Camera::default())
            .to_projected_plane()
    }

    #[test]
    fn exact_clip_lands_on_near_plane_along_edge() {
        let behind = project(-1.0, 2.0, 0.0);
        let front = project(3.0, -2.0, 4.0);
        let c = ClipMode::Exact.clip_toward(&behind, &front);
        assert_eq!(c.side, PlaneSide::Clipped);
        assert!((c.camera_space.x - NEAR_CLIP_X).abs() < 1e-6);
        // 点在原边上：与两端点共线
        let edge = front.camera_space - behind.camera_space;
        let offset = c.camera_space - behind.camera_space;
        assert!(edge.cross(&offset).magnitude() < 1e-4);
    }

    #[test]
    fn extrapolation_matches_fixed_factor() {
        let behind = project(-1.0, 1.0, 0.0);
        let front = project(2.0, 0.5, 0.5);
        let c = ClipMode::Extrapolate.clip_toward(&behind, &front);
        let expected_x = behind.plane_x + 100.0 * (front.plane_x - behind.plane_x);
        assert!((c.plane_x - expected_x).abs() < 1e-3);
        assert_eq!(c.camera_space, behind.camera_space);
        assert!(c.side.is_front());
    }

    #[test]
    fn line_classification() {
        let a = project(-1.0, 0.0, 0.0);
        let b = project(-2.0, 1.0, 0.0);
        assert!(clip_line(a, b, ClipMode::Exact).is_none());

        let f = project(2.0, 0.0, 0.0);
        let both = clip_line(f, project(3.0, 1.0, 0.0), ClipMode::Exact).unwrap();
        assert_eq!(both[0], f);

        let mixed = clip_line(a, f, ClipMode::Exact).unwrap();
        assert_eq!(mixed[0].side, PlaneSide::Clipped);
        assert_eq!(mixed[1], f);
    }

    #[test]
    fn triangle_state_machine() {
        let f1 = project(2.0, 0.0, 0.0);
        let f2 = project(3.0, 1.0, 0.0);
        let f3 = project(3.0, 0.0, 1.0);
        let b1 = project(-1.0, 0.0, 0.0);
        let b2 = project(-2.0, 1.0, 1.0);
        let b3 = project(-1.0, -1.0, 0.0);

        assert_eq!(clip_triangle([b1, b2, b3], ClipMode::Exact), TriangleClip::Discarded);
        assert!(matches!(
            clip_triangle([f1, f2, f3], ClipMode::Exact),
            TriangleClip::Unclipped(_)
        ));

        match clip_triangle([b1, f2, b2], ClipMode::Exact) {
            TriangleClip::Clipped(t) => {
                assert_eq!(t[1], f2);
                assert!(t.iter().all(|p| p.side.is_front()));
            }
            other => panic!("unexpected {:?}", other),
        }

        let split = clip_triangle([f1, b1, f2], ClipMode::Exact);
        assert_eq!(split.triangles().len(), 2);
        if let TriangleClip::Split(first, second) = split {
            assert_eq!(first[0], f1);
            assert_eq!(first[2], f2);
            assert_eq!(first[1].side, PlaneSide::Clipped);
            assert_eq!(second[0], f2);
            assert_eq!(second[1], first[1]);
            assert_eq!(second[2].side, PlaneSide::Clipped);
        }
    }
    #[test]
    fn extrapolated_split_uses_both_clipped_points_unchanged() {
        let f1 = project(2.0, 0.0, 0.0);
        let f2 = project(3.0, 1.0, 0.0);
        let b = project(-1.0, 0.0, 1.0);
        match clip_triangle([b, f1, f2], ClipMode::Extrapolate) {
            TriangleClip::Split(first, second) => {
                let toward_f1 = ClipMode::Extrapolate.clip_toward(&b, &f1);
                let toward_f2 = ClipMode::Extrapolate.clip_toward(&b, &f2);
                assert_eq!(first, [toward_f1, f1, f2]);
                assert_eq!(second, [f2, toward_f1, toward_f2]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
