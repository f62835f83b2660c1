//! 顶点管线的三个阶段
//!
//! 世界坐标 -> 相机空间 -> 投影平面 -> 屏幕空间。
//! 每个阶段都是上一阶段结果的纯函数，类型本身保证不会跳过阶段。

use crate::geometry::camera::{Camera, Viewport};
use crate::geometry::vector::Vector3;
use std::fmt;

/// 顶点相对近平面（相机局部 X=0 平面）的位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneSide {
    /// 相机前方
    Front,
    /// 相机后方或恰好在近平面上
    Behind,
    /// 原本在后方、经裁剪推到前方的合成顶点
    Clipped,
}

impl PlaneSide {
    /// 可绘制的顶点：前方或已裁剪
    pub fn is_front(self) -> bool {
        matches!(self, PlaneSide::Front | PlaneSide::Clipped)
    }

    /// 数值标记：前方 +1，后方 -1，裁剪 +2
    pub fn flag(self) -> f32 {
        match self {
            PlaneSide::Front => 1.0,
            PlaneSide::Behind => -1.0,
            PlaneSide::Clipped => 2.0,
        }
    }
}

/// 世界空间中的顶点
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub world_position: Vector3,
}

impl Point {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            world_position: Vector3::new(x, y, z),
        }
    }

    /// 第一阶段：平移到相机位置，再按 (-yaw, -pitch) 做逆旋转
    pub fn to_camera_space(&self, camera: &Camera) -> CameraPoint {
        let mut camera_space = self.world_position - camera.position;
        camera_space.rotate(-camera.yaw, -camera.pitch);
        CameraPoint {
            world_position: self.world_position,
            camera_space,
            distance_to_camera: camera_space.magnitude(),
        }
    }

    /// 三个阶段的组合；调用者需保证顶点在相机前方
    pub fn calculate_all(&self, camera: &Camera, viewport: Viewport) -> ScreenPoint {
        self.to_camera_space(camera)
            .to_projected_plane()
            .to_screen_space(camera, viewport)
    }
}

impl From<Vector3> for Point {
    fn from(world_position: Vector3) -> Self {
        Self { world_position }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "world: {}", self.world_position)
    }
}

/// 第一阶段的结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPoint {
    pub world_position: Vector3,
    /// 相机空间坐标，前方为 +X
    pub camera_space: Vector3,
    pub distance_to_camera: f32,
}

impl CameraPoint {
    /// 第二阶段：以X为前向轴做透视除法
    pub fn to_projected_plane(&self) -> ProjectedPoint {
        let cs = self.camera_space;
        let side = if cs.x > 0.0 {
            PlaneSide::Front
        } else {
            PlaneSide::Behind
        };
        ProjectedPoint {
            camera_space: cs,
            distance_to_camera: self.distance_to_camera,
            plane_x: cs.y / cs.x,
            plane_y: cs.z / cs.x,
            side,
        }
    }
}

/// 第二阶段的结果：投影平面（X=1处的单位视平面）上的坐标
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedPoint {
    /// 保留相机空间坐标，深度平面方程需要它
    pub camera_space: Vector3,
    pub distance_to_camera: f32,
    /// 水平投影坐标（+ 为左）
    pub plane_x: f32,
    /// 垂直投影坐标（+ 为上）
    pub plane_y: f32,
    pub side: PlaneSide,
}

impl ProjectedPoint {
    /// 第三阶段：按视场角和视口缩放到像素坐标
    ///
    /// 垂直方向同样用视口宽度缩放，使水平视场角下像素保持正方形。
    pub fn to_screen_space(&self, camera: &Camera, viewport: Viewport) -> ScreenPoint {
        let width = viewport.width as f32;
        let height = viewport.height as f32;
        let m = camera.max_plane_coord;
        ScreenPoint {
            camera_space: self.camera_space,
            distance_to_camera: self.distance_to_camera,
            x: 0.5 * width * (1.0 - self.plane_x / m),
            y: 0.5 * height - self.plane_y / m * 0.5 * width,
        }
    }
}

/// 第三阶段的结果：最终像素坐标
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub camera_space: Vector3,
    pub distance_to_camera: f32,
    pub x: f32,
    pub y: f32,
}

impl fmt::Display for ScreenPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "camera: {}, screen: {:.3}, {:.3}",
            self.camera_space, self.x, self.y
        )
    }
}
