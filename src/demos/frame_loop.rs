use crate::core::error::RasterError;
use crate::core::rasterizer::DrawStats;
use crate::core::renderer::Renderer;
use crate::core::scene::Scene;
use crate::geometry::camera::Camera;
use crate::io::render_settings::RenderSettings;
use crate::utils::display_sink::{DisplaySink, OutputError};
use log::info;
use std::time::Instant;

/// 帧循环中的错误：渲染失败或输出失败
#[derive(Debug, thiserror::Error)]
pub enum FrameLoopError {
    #[error("第 {frame} 帧渲染失败: {source}")]
    Render { frame: usize, source: RasterError },

    #[error(transparent)]
    Output(#[from] OutputError),
}

/// 每帧施加到相机上的运动，对应交互式的 前后/左右/上下 移动和转向
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraMotion {
    pub forward: f32,
    pub sideward: f32,
    pub upward: f32,
    /// 弧度
    pub yaw: f32,
    /// 弧度
    pub pitch: f32,
}

impl CameraMotion {
    /// 从设置中读取（配置里的角度单位为度）
    pub fn from_settings(settings: &RenderSettings) -> Self {
        Self {
            forward: settings.move_forward,
            sideward: settings.move_sideward,
            upward: settings.move_upward,
            yaw: settings.yaw_step.to_radians(),
            pitch: settings.pitch_step.to_radians(),
        }
    }

    /// 先平移再转向
    pub fn apply(&self, camera: &mut Camera) {
        camera.move_relative(self.forward, self.sideward, self.upward);
        camera.rotate(self.yaw, self.pitch);
    }
}

/// 帧循环汇总
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameSummary {
    pub frames: usize,
    pub totals: DrawStats,
}

/// 渲染 `settings.frames` 帧：第0帧使用初始相机，之后每帧先施加运动
pub fn run_frames(
    settings: &RenderSettings,
    scene: &Scene,
    camera: &mut Camera,
    renderer: &mut Renderer,
    sink: &mut dyn DisplaySink,
) -> Result<FrameSummary, FrameLoopError> {
    let motion = CameraMotion::from_settings(settings);
    let mut summary = FrameSummary::default();
    let start_time = Instant::now();
    info!("开始渲染 ({} 帧)...", settings.frames);

    for frame in 0..settings.frames {
        if frame > 0 {
            motion.apply(camera);
        }

        let stats = renderer
            .render_frame(scene, camera)
            .map_err(|source| FrameLoopError::Render { frame, source })?;
        renderer.present(sink, &settings.frame_name(frame))?;

        summary.frames += 1;
        summary.totals += stats;
    }

    info!(
        "全部 {} 帧完成，共写入 {} 像素，耗时 {:?}",
        summary.frames,
        summary.totals.pixels_written,
        start_time.elapsed()
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demos::presets::cube_scene;
    use crate::geometry::vector::Vector3;
    use crate::utils::display_sink::MemorySink;

    #[test]
    fn motion_moves_then_turns() {
        let mut camera = Camera::default();
        let motion = CameraMotion {
            forward: 1.0,
            yaw: std::f32::consts::FRAC_PI_2,
            ..Default::default()
        };
        motion.apply(&mut camera);
        assert!((camera.position - Vector3::new(1.0, 0.0, 0.0)).magnitude() < 1e-6);
        motion.apply(&mut camera);
        // 第二步沿转向后的 +Y 方向前进
        assert!((camera.position - Vector3::new(1.0, 1.0, 0.0)).magnitude() < 1e-5);
    }

    #[test]
    fn frames_are_presented_in_order() {
        let settings = RenderSettings {
            width: 24,
            height: 24,
            frames: 3,
            move_forward: 0.5,
            ..Default::default()
        };
        let scene = cube_scene(Some(3)).unwrap();
        let mut camera = Camera::default();
        let mut renderer = Renderer::new(settings.width, settings.height);
        let mut sink = MemorySink::default();

        let summary = run_frames(&settings, &scene, &mut camera, &mut renderer, &mut sink).unwrap();
        assert_eq!(summary.frames, 3);
        assert_eq!(sink.frames, 3);
        assert_eq!(sink.last_frame.as_deref(), Some("frame_002"));
        assert!((camera.position.x - 1.0).abs() < 1e-6);
        assert!(summary.totals.pixels_written > 0);
    }
}
