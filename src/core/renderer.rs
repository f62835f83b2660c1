use crate::core::error::RasterError;
use crate::core::rasterizer::{DrawStats, Rasterizer};
use crate::core::scene::Scene;
use crate::geometry::camera::{Camera, Viewport};
use crate::geometry::clipping::ClipMode;
use crate::geometry::primitives::Color;
use crate::utils::display_sink::{DisplaySink, OutputError};
use log::{debug, info};
use std::time::Instant;

/// 帧级渲染器：每帧清屏，先画线段再画三角形，最后交给输出端
pub struct Renderer {
    pub rasterizer: Rasterizer,
    frame_index: usize,
}

impl Renderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self::from_rasterizer(Rasterizer::new(width, height))
    }

    pub fn with_options(width: usize, height: usize, clip_mode: ClipMode, background: Color) -> Self {
        Self::from_rasterizer(Rasterizer::with_options(width, height, clip_mode, background))
    }

    pub fn from_rasterizer(rasterizer: Rasterizer) -> Self {
        Self {
            rasterizer,
            frame_index: 0,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.rasterizer.viewport()
    }

    /// 已完成的帧数
    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    /// 渲染一帧；任一图元报错时中止本帧并返回该错误
    pub fn render_frame(&mut self, scene: &Scene, camera: &Camera) -> Result<DrawStats, RasterError> {
        let start_time = Instant::now();
        self.rasterizer.clear();

        let mut stats = DrawStats::default();
        for line in &scene.lines {
            stats += self.rasterizer.draw_line(line, camera)?;
        }
        for triangle in &scene.triangles {
            stats += self.rasterizer.draw_triangle(triangle, camera)?;
        }

        debug!(
            "帧 {}: 相机位置 ({}), yaw = {:.3}, pitch = {:.3}",
            self.frame_index, camera.position, camera.yaw, camera.pitch
        );
        info!(
            "帧 {} 渲染完成: {} 线段, {} 三角形, 写入 {} 像素, 遮挡 {} 像素, 裁剪 {} / 丢弃 {} 图元, 耗时 {:?}",
            self.frame_index,
            scene.lines.len(),
            scene.triangles.len(),
            stats.pixels_written,
            stats.pixels_occluded,
            stats.primitives_clipped,
            stats.primitives_discarded,
            start_time.elapsed()
        );

        self.frame_index += 1;
        Ok(stats)
    }

    /// 把当前缓冲区交给输出端
    pub fn present(&self, sink: &mut dyn DisplaySink, frame_name: &str) -> Result<(), OutputError> {
        sink.present(
            frame_name,
            self.rasterizer.color_buffer(),
            self.rasterizer.depth_buffer(),
        )
    }
}
