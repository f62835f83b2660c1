//! # 扫描线光栅化器
//!
//! 负责单个图元的完整流程：顶点变换 -> 近平面裁剪 -> 扫描线填充 -> 深度测试。
//! 三角形深度由支撑平面解析求得，而非插值顶点深度。

use crate::core::error::RasterError;
use crate::core::frame_buffer::{ColorBuffer, DepthBuffer};
use crate::geometry::camera::{Camera, Viewport};
use crate::geometry::clipping::{ClipMode, TriangleClip, clip_line, clip_triangle};
use crate::geometry::primitives::{Color, Line, Triangle};
use crate::geometry::vector::{MathError, Vector3};
use crate::geometry::vertex::{Point, ScreenPoint};
use crate::utils::math_utils::{clamp_to_range, round_to_i32, sort_and_clamp};
use log::debug;
use std::ops::AddAssign;

/// 单次绘制调用的统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawStats {
    /// 实际写入颜色缓冲的像素数
    pub pixels_written: usize,
    /// 未通过深度测试的像素数
    pub pixels_occluded: usize,
    /// 送入扫描线填充的三角形数（拆分后计数）
    pub triangles_rasterized: usize,
    /// 因完全位于相机后方而丢弃的图元数
    pub primitives_discarded: usize,
    /// 经过近平面裁剪的图元数
    pub primitives_clipped: usize,
}

impl AddAssign for DrawStats {
    fn add_assign(&mut self, other: DrawStats) {
        self.pixels_written += other.pixels_written;
        self.pixels_occluded += other.pixels_occluded;
        self.triangles_rasterized += other.triangles_rasterized;
        self.primitives_discarded += other.primitives_discarded;
        self.primitives_clipped += other.primitives_clipped;
    }
}

/// 三角形在相机空间中的支撑平面 `normal · p = d`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthPlane {
    pub normal: Vector3,
    pub d: f32,
}

impl DepthPlane {
    /// 由未裁剪的三个相机空间角点构造
    pub fn from_corners(a: &Vector3, b: &Vector3, c: &Vector3) -> Result<Self, MathError> {
        let normal = (*a - *b).cross(&(*a - *c)).normalized()?;
        Ok(Self {
            normal,
            d: normal.dot(a),
        })
    }

    /// 沿相机空间射线从相机到平面的精确距离
    ///
    /// 数值上可能出现的负值截断为0；射线与平面平行时结果非有限，深度测试会拒绝它。
    pub fn depth_along(&self, ray: &Vector3) -> f32 {
        let depth = (self.d / self.normal.dot(ray)) * ray.magnitude();
        if depth < 0.0 { 0.0 } else { depth }
    }
}

/// 软件光栅化窗口：独占颜色缓冲和深度缓冲
#[derive(Debug, Clone)]
pub struct Rasterizer {
    viewport: Viewport,
    clip_mode: ClipMode,
    color_buffer: ColorBuffer,
    depth_buffer: DepthBuffer,
}

impl Rasterizer {
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_options(width, height, ClipMode::default(), Color::BLACK)
    }

    pub fn with_options(width: usize, height: usize, clip_mode: ClipMode, clear_color: Color) -> Self {
        Rasterizer {
            viewport: Viewport::new(width, height),
            clip_mode,
            color_buffer: ColorBuffer::with_clear_color(width, height, clear_color),
            depth_buffer: DepthBuffer::new(width, height),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn clip_mode(&self) -> ClipMode {
        self.clip_mode
    }

    pub fn set_clip_mode(&mut self, clip_mode: ClipMode) {
        self.clip_mode = clip_mode;
    }

    pub fn color_buffer(&self) -> &ColorBuffer {
        &self.color_buffer
    }

    pub fn depth_buffer(&self) -> &DepthBuffer {
        &self.depth_buffer
    }

    /// 每帧开始前重置两个缓冲区
    pub fn clear(&mut self) {
        self.color_buffer.clear();
        self.depth_buffer.clear();
    }

    // ===== 图元入口 =====

    /// 绘制单个点（不做深度测试）；在相机后方或视口外时什么也不画
    pub fn draw_point(
        &mut self,
        point: &Point,
        camera: &Camera,
        color: Color,
    ) -> Result<DrawStats, RasterError> {
        let mut stats = DrawStats::default();
        let projected = point.to_camera_space(camera).to_projected_plane();
        if !projected.side.is_front() {
            stats.primitives_discarded += 1;
            return Ok(stats);
        }
        let screen = projected.to_screen_space(camera, self.viewport);
        if screen.x >= 0.0
            && screen.y >= 0.0
            && screen.x < self.viewport.width as f32
            && screen.y < self.viewport.height as f32
        {
            self.color_buffer
                .set_pixel(screen.x as i32, screen.y as i32, color)?;
            stats.pixels_written += 1;
        }
        Ok(stats)
    }

    /// 变换、裁剪并绘制线段（线段不参与深度测试）
    pub fn draw_line(&mut self, line: &Line, camera: &Camera) -> Result<DrawStats, RasterError> {
        let p1 = line.p1.to_camera_space(camera).to_projected_plane();
        let p2 = line.p2.to_camera_space(camera).to_projected_plane();

        let Some([a, b]) = clip_line(p1, p2, self.clip_mode) else {
            debug!("线段两端都在相机后方，丢弃");
            return Ok(DrawStats {
                primitives_discarded: 1,
                ..Default::default()
            });
        };

        let clipped = !(p1.side.is_front() && p2.side.is_front());
        let a = a.to_screen_space(camera, self.viewport);
        let b = b.to_screen_space(camera, self.viewport);
        let mut stats = self.rasterize_line(&a, &b, line.color)?;
        if clipped {
            stats.primitives_clipped += 1;
        }
        Ok(stats)
    }

    /// 变换、裁剪（必要时拆分）并以深度测试绘制三角形
    pub fn draw_triangle(
        &mut self,
        triangle: &Triangle,
        camera: &Camera,
    ) -> Result<DrawStats, RasterError> {
        let corners = triangle.points().map(|p| p.to_camera_space(camera));

        // 平面取自未裁剪的三个角点，拆分出的三角形共用它
        let plane = match DepthPlane::from_corners(
            &corners[0].camera_space,
            &corners[1].camera_space,
            &corners[2].camera_space,
        ) {
            Ok(plane) => plane,
            Err(err) => {
                // 远离相机的细小三角形在相机空间里可能因精度丢失而退化，没有可见面积
                debug!("三角形在相机空间中退化 ({})，丢弃", err);
                return Ok(DrawStats {
                    primitives_discarded: 1,
                    ..Default::default()
                });
            }
        };

        let clip = clip_triangle(corners.map(|p| p.to_projected_plane()), self.clip_mode);
        let mut stats = DrawStats::default();
        match clip {
            TriangleClip::Discarded => {
                debug!("三角形完全位于相机后方，丢弃");
                stats.primitives_discarded += 1;
                return Ok(stats);
            }
            TriangleClip::Clipped(_) | TriangleClip::Split(..) => stats.primitives_clipped += 1,
            TriangleClip::Unclipped(_) => {}
        }

        for projected in clip.triangles() {
            let screen = projected.map(|p| p.to_screen_space(camera, self.viewport));
            stats += self.rasterize_triangle(screen, &plane, triangle.color, camera)?;
        }
        Ok(stats)
    }

    // ===== 线段扫描 =====

    /// 逐列绘制：每个整数列覆盖本列到下一列之间的所有行，保证无缝隙；
    /// 两端不足一列的部分单独补画竖直像素段
    pub fn rasterize_line(
        &mut self,
        p1: &ScreenPoint,
        p2: &ScreenPoint,
        color: Color,
    ) -> Result<DrawStats, RasterError> {
        let (a, b) = if p1.x > p2.x { (p2, p1) } else { (p1, p2) };
        let width = self.viewport.width as i32;
        let mut stats = DrawStats::default();

        let dy = (b.y - a.y) / (b.x - a.x);
        let start = (a.x.ceil() as i32).max(0);
        let end = (b.x.floor() as i32).min(width - 1);
        // 右端点超出视口时，最后一列 width-1 由主循环一直画到视口右边缘
        let right_clipped = b.x >= width as f32;
        let last = if right_clipped { end + 1 } else { end };

        if start >= last {
            if right_clipped {
                // 左端点落在最后一列内
                let column = a.x.floor() as i32;
                if (0..width).contains(&column) {
                    let edge_y = a.y + dy * (width as f32 - a.x);
                    stats.pixels_written +=
                        self.plot_run(column, round_to_i32(a.y), round_to_i32(edge_y), color)?;
                }
                return Ok(stats);
            }
            // 近似竖直（或完全位于视口一侧）：单列
            let column = round_to_i32(a.x);
            if (0..width).contains(&column) {
                stats.pixels_written +=
                    self.plot_run(column, round_to_i32(a.y), round_to_i32(b.y), color)?;
            }
            return Ok(stats);
        }

        let mut y = a.y + dy * (start as f32 - a.x);
        for x in start..last {
            stats.pixels_written += self.plot_run(x, round_to_i32(y), round_to_i32(y + dy), color)?;
            y += dy;
        }

        // 左端点到第一整列之间的残余部分
        let lead_x = a.x.floor() as i32;
        if (0..width).contains(&lead_x) {
            let top = round_to_i32(a.y + (start as f32 - a.x) * dy);
            stats.pixels_written += self.plot_run(lead_x, round_to_i32(a.y), top, color)?;
        }

        // 最后整列到右端点之间的残余部分，画在 floor(b.x) 列上，与主循环衔接
        let tail_x = b.x.floor() as i32;
        if (0..width).contains(&tail_x) {
            let top = round_to_i32(b.y - (b.x - end as f32) * dy);
            stats.pixels_written += self.plot_run(tail_x, round_to_i32(b.y), top, color)?;
        }

        Ok(stats)
    }

    /// 在第 `x` 列绘制 `y0..=y1`（任意顺序），行号限制在视口内
    fn plot_run(&mut self, x: i32, y0: i32, y1: i32, color: Color) -> Result<usize, RasterError> {
        let (mut bottom, mut top) = (y0, y1);
        sort_and_clamp(&mut bottom, &mut top, 0, self.viewport.height as i32 - 1);
        let mut written = 0;
        for y in bottom..=top {
            self.color_buffer.set_pixel(x, y, color)?;
            written += 1;
        }
        Ok(written)
    }

    // ===== 三角形扫描 =====

    /// 按X排序为 左/中/右，分 左->中、中->右 两段逐列填充长边与短边之间的行
    pub fn rasterize_triangle(
        &mut self,
        corners: [ScreenPoint; 3],
        plane: &DepthPlane,
        color: Color,
        camera: &Camera,
    ) -> Result<DrawStats, RasterError> {
        let [mut a, mut b, mut c] = corners;
        if a.x > b.x {
            std::mem::swap(&mut a, &mut b);
        }
        if b.x > c.x {
            std::mem::swap(&mut b, &mut c);
        }
        if a.x > b.x {
            std::mem::swap(&mut a, &mut b);
        }

        let long_slope = (c.y - a.y) / (c.x - a.x);
        let slope1 = (b.y - a.y) / (b.x - a.x);
        let slope2 = (c.y - b.y) / (c.x - b.x);

        let max_x = (self.viewport.width as f32 - 1.0).max(0.0);
        let (mut left, mut mid, mut right) = (a.x, b.x, c.x);
        clamp_to_range(&mut left, 0.0, max_x);
        clamp_to_range(&mut mid, 0.0, max_x);
        clamp_to_range(&mut right, 0.0, max_x);

        let mut stats = DrawStats {
            triangles_rasterized: 1,
            ..Default::default()
        };

        // 左 -> 中
        let mut short_y = a.y + slope1 * (left - a.x);
        let mut long_y = a.y + long_slope * (left - a.x);
        let mut x = left;
        while x < mid {
            stats += self.fill_column(x as i32, short_y, long_y, plane, color, camera)?;
            short_y += slope1;
            long_y += long_slope;
            x += 1.0;
        }

        // 中 -> 右
        let mut short_y = b.y + slope2 * (mid - b.x);
        let mut long_y = a.y + long_slope * (mid - a.x);
        let mut x = mid;
        while x < right {
            stats += self.fill_column(x as i32, short_y, long_y, plane, color, camera)?;
            short_y += slope2;
            long_y += long_slope;
            x += 1.0;
        }

        Ok(stats)
    }

    /// 对一列像素做深度测试并写入
    fn fill_column(
        &mut self,
        x: i32,
        edge_y1: f32,
        edge_y2: f32,
        plane: &DepthPlane,
        color: Color,
        camera: &Camera,
    ) -> Result<DrawStats, RasterError> {
        let mut bottom = round_to_i32(edge_y1);
        let mut top = round_to_i32(edge_y2);
        sort_and_clamp(&mut bottom, &mut top, 0, self.viewport.height as i32 - 1);

        let mut stats = DrawStats::default();
        for y in bottom..=top {
            let ray = camera.pixel_ray(x, y, self.viewport);
            let depth = plane.depth_along(&ray);
            if self.depth_buffer.test_and_set(x, y, depth)? {
                self.color_buffer.set_pixel(x, y, color)?;
                stats.pixels_written += 1;
            } else {
                stats.pixels_occluded += 1;
            }
        }
        Ok(stats)
    }
}
