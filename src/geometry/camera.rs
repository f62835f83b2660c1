use crate::geometry::vector::Vector3;
use std::f32::consts::FRAC_PI_2;

/// 视口尺寸（像素）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: usize,
    pub height: usize,
}

impl Viewport {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }
}

/// 透视相机：位置 + 偏航/俯仰朝向 + 水平视场角
///
/// 前方向为局部 +X。偏航绕世界Z轴，俯仰绕（偏航后的）Y轴，
/// 俯仰始终被限制在 [-π/2, π/2] 以避免翻转。
#[derive(Debug, Clone)]
pub struct Camera {
    /// 相机在世界中的位置
    pub position: Vector3,
    /// 偏航角（弧度）
    pub yaw: f32,
    /// 俯仰角（弧度）
    pub pitch: f32,
    /// 视场角（度）
    pub fov_degrees: f32,
    /// 视场角（弧度）
    pub fov_radians: f32,
    /// 投影平面上可见的最大坐标 tan(fov/2)
    pub max_plane_coord: f32,
    /// (1,0,0) 按 (yaw, pitch) 旋转后的单位前方向
    pub forward_direction: Vector3,
    /// (1,0,0) 只按 yaw 旋转后的地面前方向，用于水平移动
    pub floor_direction: Vector3,
}

impl Default for Camera {
    /// 位于原点、朝向 +X、90°视场角
    fn default() -> Self {
        Self::new(Vector3::ZERO, 0.0, 0.0, 90.0)
    }
}

impl Camera {
    pub fn new(position: Vector3, yaw: f32, pitch: f32, fov_degrees: f32) -> Self {
        let fov_radians = fov_degrees.to_radians();
        let pitch = pitch.clamp(-FRAC_PI_2, FRAC_PI_2);
        Camera {
            position,
            yaw,
            pitch,
            fov_degrees,
            fov_radians,
            max_plane_coord: (fov_radians / 2.0).tan(),
            forward_direction: Vector3::X.rotated(yaw, pitch),
            floor_direction: Vector3::X.rotated(yaw, 0.0),
        }
    }

    /// 累加偏航/俯仰，限制俯仰后重新计算两个方向向量
    pub fn rotate(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw += delta_yaw;
        self.pitch = (self.pitch + delta_pitch).clamp(-FRAC_PI_2, FRAC_PI_2);

        // 从绝对角度重建，避免增量旋转累积误差
        self.forward_direction = Vector3::X.rotated(self.yaw, self.pitch);
        self.floor_direction = Vector3::X.rotated(self.yaw, 0.0);
    }

    /// 相对朝向移动：前后/左右沿地面方向，上下沿世界Z轴且与朝向无关
    pub fn move_relative(&mut self, forward: f32, sideward: f32, upward: f32) {
        let side_direction = self.floor_direction.rotated(-FRAC_PI_2, 0.0);
        self.position += self.floor_direction * forward + side_direction * sideward;
        self.position.z += upward;
    }

    /// 像素列 -> 相机空间射线的Y分量（屏幕X投影公式的逆运算，取像素中心）
    pub fn camera_ray_y(&self, pixel_x: i32, width: usize) -> f32 {
        let half = 0.5 * width as f32;
        -self.max_plane_coord * (pixel_x as f32 - half + 0.5) / half
    }

    /// 像素行 -> 相机空间射线的Z分量
    pub fn camera_ray_z(&self, pixel_y: i32, height: usize) -> f32 {
        let half = 0.5 * height as f32;
        -self.max_plane_coord * (pixel_y as f32 - half + 0.5) / half
    }

    /// 穿过像素中心的完整相机空间射线 (1, ray_y, ray_z)
    ///
    /// 屏幕的垂直方向按视口宽度缩放，这里与之保持一致；
    /// 正方形视口下与 `camera_ray_z` 完全相同。
    pub fn pixel_ray(&self, pixel_x: i32, pixel_y: i32, viewport: Viewport) -> Vector3 {
        let half_w = 0.5 * viewport.width as f32;
        let half_h = 0.5 * viewport.height as f32;
        let ray_z = -self.max_plane_coord * (pixel_y as f32 - half_h + 0.5) / half_w;
        Vector3::new(1.0, self.camera_ray_y(pixel_x, viewport.width), ray_z)
    }
}
