use crate::core::frame_buffer::{ColorBuffer, DepthBuffer};
use crate::utils::depth_image::depth_to_rgb;
use image::ColorType;
use log::info;
use std::path::{Path, PathBuf};

/// 帧输出错误
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("创建输出目录 {} 失败: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("保存图像到 {} 时出错: {source}", .path.display())]
    Save {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// 帧的接收端：渲染器在每帧结束后把缓冲区交给它
///
/// 窗口、文件、内存快照都可以实现这个 trait，渲染核心不关心结果去向。
pub trait DisplaySink {
    fn present(
        &mut self,
        frame_name: &str,
        color: &ColorBuffer,
        depth: &DepthBuffer,
    ) -> Result<(), OutputError>;
}

/// 把每帧写成 `<dir>/<name>_color.png`（可选 `<name>_depth.png`）
#[derive(Debug, Clone)]
pub struct PngSink {
    output_dir: PathBuf,
    save_depth: bool,
    frames_written: usize,
}

impl PngSink {
    pub fn new<P: AsRef<Path>>(output_dir: P, save_depth: bool) -> Result<Self, OutputError> {
        let output_dir = output_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&output_dir).map_err(|source| OutputError::CreateDir {
            path: output_dir.clone(),
            source,
        })?;
        Ok(Self {
            output_dir,
            save_depth,
            frames_written: 0,
        })
    }

    pub fn frames_written(&self) -> usize {
        self.frames_written
    }

    pub fn color_path(&self, frame_name: &str) -> PathBuf {
        self.output_dir.join(format!("{}_color.png", frame_name))
    }

    pub fn depth_path(&self, frame_name: &str) -> PathBuf {
        self.output_dir.join(format!("{}_depth.png", frame_name))
    }
}

fn save_rgb(path: &Path, data: &[u8], width: usize, height: usize) -> Result<(), OutputError> {
    image::save_buffer(path, data, width as u32, height as u32, ColorType::Rgb8).map_err(
        |source| OutputError::Save {
            path: path.to_path_buf(),
            source,
        },
    )?;
    info!("图像已保存到 {}", path.display());
    Ok(())
}

impl DisplaySink for PngSink {
    fn present(
        &mut self,
        frame_name: &str,
        color: &ColorBuffer,
        depth: &DepthBuffer,
    ) -> Result<(), OutputError> {
        save_rgb(
            &self.color_path(frame_name),
            color.as_bytes(),
            color.width(),
            color.height(),
        )?;

        if self.save_depth {
            save_rgb(
                &self.depth_path(frame_name),
                &depth_to_rgb(depth.as_slice()),
                depth.width(),
                depth.height(),
            )?;
        }

        self.frames_written += 1;
        Ok(())
    }
}

/// 在内存中保留最近一帧，用于测试和嵌入
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub last_frame: Option<String>,
    pub rgba: Vec<u8>,
    pub depth: Vec<f32>,
    pub frames: usize,
}

impl DisplaySink for MemorySink {
    fn present(
        &mut self,
        frame_name: &str,
        color: &ColorBuffer,
        depth: &DepthBuffer,
    ) -> Result<(), OutputError> {
        self.last_frame = Some(frame_name.to_string());
        self.rgba = color.to_rgba_bytes();
        self.depth = depth.as_slice().to_vec();
        self.frames += 1;
        Ok(())
    }
}
