use crate::geometry::camera::Camera;
use crate::geometry::clipping::ClipMode;
use crate::geometry::primitives::Color;
use crate::geometry::vector::Vector3;
use crate::io::config_loader::ConfigError;
use log::warn;

/// 场景预设
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScenePreset {
    /// 单个彩色立方体
    #[default]
    Cube,
    /// 立方体 + 地面网格 + 穿过近平面的三角形
    Showcase,
}

impl ScenePreset {
    pub fn name(self) -> &'static str {
        match self {
            ScenePreset::Cube => "cube",
            ScenePreset::Showcase => "showcase",
        }
    }

    /// 解析预设名，未知名称回退到默认值
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "cube" => ScenePreset::Cube,
            "showcase" => ScenePreset::Showcase,
            other => {
                warn!("未知的场景预设 '{}', 使用默认值 cube", other);
                ScenePreset::Cube
            }
        }
    }
}

/// 解析裁剪模式名，未知名称回退到 exact
pub fn parse_clip_mode(name: &str) -> ClipMode {
    match name.trim().to_lowercase().as_str() {
        "exact" => ClipMode::Exact,
        "extrapolate" => ClipMode::Extrapolate,
        other => {
            warn!("未知的裁剪模式 '{}', 使用默认值 exact", other);
            ClipMode::Exact
        }
    }
}

/// 所有可通过TOML配置的渲染参数
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    // ===== 文件输出 =====
    /// 输出文件的基础名称，多帧时追加 `_NNN`
    pub output: String,
    /// 输出图像的目录
    pub output_dir: String,

    // ===== 渲染基础设置 =====
    pub width: usize,
    pub height: usize,
    pub clip_mode: ClipMode,
    /// 背景色，格式为"r,g,b"（0-255）
    pub background: String,
    /// 同时保存深度可视化图
    pub save_depth: bool,

    // ===== 相机参数 =====
    /// 相机位置，格式为"x,y,z"
    pub camera_position: String,
    /// 偏航角（度）
    pub camera_yaw: f32,
    /// 俯仰角（度）
    pub camera_pitch: f32,
    /// 水平视场角（度）
    pub camera_fov: f32,

    // ===== 场景 =====
    pub preset: ScenePreset,
    /// 面颜色种子；None 时使用固定颜色
    pub color_seed: Option<u64>,

    // ===== 动画（每帧相机运动） =====
    pub frames: usize,
    /// 每帧偏航增量（度）
    pub yaw_step: f32,
    /// 每帧俯仰增量（度）
    pub pitch_step: f32,
    pub move_forward: f32,
    pub move_sideward: f32,
    pub move_upward: f32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            output: "frame".to_string(),
            output_dir: "output_rust".to_string(),

            width: 800,
            height: 800,
            clip_mode: ClipMode::Exact,
            background: "0,0,0".to_string(),
            save_depth: false,

            camera_position: "0,0,0".to_string(),
            camera_yaw: 0.0,
            camera_pitch: 0.0,
            camera_fov: 90.0,

            preset: ScenePreset::Cube,
            color_seed: Some(42),

            frames: 1,
            yaw_step: 0.0,
            pitch_step: 0.0,
            move_forward: 0.0,
            move_sideward: 0.0,
            move_upward: 0.0,
        }
    }
}

impl RenderSettings {
    /// 检查设置是否可以用于渲染
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "图像尺寸必须为正数: {}x{}",
                self.width, self.height
            )));
        }
        if self.output.trim().is_empty() {
            return Err(ConfigError::Invalid("输出文件名不能为空".to_string()));
        }
        if self.output_dir.trim().is_empty() {
            return Err(ConfigError::Invalid("输出目录不能为空".to_string()));
        }
        if !(self.camera_fov > 0.0 && self.camera_fov < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "视场角必须在 (0, 180) 度之间: {}",
                self.camera_fov
            )));
        }
        if self.frames == 0 {
            return Err(ConfigError::Invalid("帧数必须至少为1".to_string()));
        }
        parse_vec3(&self.camera_position)?;
        parse_color(&self.background)?;
        Ok(())
    }

    /// 根据相机参数构建相机（角度从度转换为弧度）
    pub fn build_camera(&self) -> Result<Camera, ConfigError> {
        Ok(Camera::new(
            parse_vec3(&self.camera_position)?,
            self.camera_yaw.to_radians(),
            self.camera_pitch.to_radians(),
            self.camera_fov,
        ))
    }

    pub fn background_color(&self) -> Result<Color, ConfigError> {
        parse_color(&self.background)
    }

    /// 第 `frame` 帧的输出名称
    pub fn frame_name(&self, frame: usize) -> String {
        if self.frames > 1 {
            format!("{}_{:03}", self.output, frame)
        } else {
            self.output.clone()
        }
    }

    /// 相机是否每帧都会运动
    pub fn is_animated(&self) -> bool {
        self.frames > 1
            && (self.yaw_step != 0.0
                || self.pitch_step != 0.0
                || self.move_forward != 0.0
                || self.move_sideward != 0.0
                || self.move_upward != 0.0)
    }
}

/// 解析 "x,y,z" 格式的向量
pub fn parse_vec3(s: &str) -> Result<Vector3, ConfigError> {
    let parts: Vec<&str> = s.split(',').map(|p| p.trim()).collect();
    if parts.len() != 3 {
        return Err(ConfigError::Invalid(format!(
            "向量需要3个由逗号分隔的分量: '{}'",
            s
        )));
    }
    let component = |p: &str| {
        p.parse::<f32>()
            .map_err(|e| ConfigError::Invalid(format!("无效的数字 '{}': {}", p, e)))
    };
    Ok(Vector3::new(
        component(parts[0])?,
        component(parts[1])?,
        component(parts[2])?,
    ))
}

/// 解析 "r,g,b" 格式的颜色（0-255整数）
pub fn parse_color(s: &str) -> Result<Color, ConfigError> {
    let parts: Vec<&str> = s.split(',').map(|p| p.trim()).collect();
    if parts.len() != 3 {
        return Err(ConfigError::Invalid(format!(
            "颜色需要3个由逗号分隔的分量: '{}'",
            s
        )));
    }
    let channel = |p: &str| {
        p.parse::<u8>()
            .map_err(|e| ConfigError::Invalid(format!("无效的颜色通道 '{}': {}", p, e)))
    };
    Ok(Color::new(
        channel(parts[0])?,
        channel(parts[1])?,
        channel(parts[2])?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let settings = RenderSettings::default();
        assert!(settings.validate().is_ok());
        assert!(!settings.is_animated());
        assert_eq!(settings.frame_name(0), "frame");
    }

    #[test]
    fn validate_rejects_bad_values() {
        let zero_width = RenderSettings {
            width: 0,
            ..Default::default()
        };
        assert!(zero_width.validate().is_err());

        let wide_fov = RenderSettings {
            camera_fov: 180.0,
            ..Default::default()
        };
        assert!(wide_fov.validate().is_err());

        let no_frames = RenderSettings {
            frames: 0,
            ..Default::default()
        };
        assert!(no_frames.validate().is_err());

        let bad_position = RenderSettings {
            camera_position: "1,2".to_string(),
            ..Default::default()
        };
        assert!(bad_position.validate().is_err());
    }

    #[test]
    fn parses_vectors_and_colors() {
        assert_eq!(
            parse_vec3(" 1.5, -2 ,3").unwrap(),
            Vector3::new(1.5, -2.0, 3.0)
        );
        assert!(parse_vec3("a,b,c").is_err());
        assert_eq!(parse_color("10,20,30").unwrap(), Color::new(10, 20, 30));
        assert!(parse_color("10,20,300").is_err());
    }

    #[test]
    fn unknown_names_fall_back() {
        assert_eq!(ScenePreset::from_name("teapot"), ScenePreset::Cube);
        assert_eq!(ScenePreset::from_name("Showcase"), ScenePreset::Showcase);
        assert_eq!(parse_clip_mode("EXTRAPOLATE"), ClipMode::Extrapolate);
        assert_eq!(parse_clip_mode("bogus"), ClipMode::Exact);
    }

    #[test]
    fn multi_frame_names_are_numbered() {
        let settings = RenderSettings {
            frames: 3,
            yaw_step: 5.0,
            ..Default::default()
        };
        assert_eq!(settings.frame_name(2), "frame_002");
        assert!(settings.is_animated());
    }

    #[test]
    fn camera_angles_are_degrees() {
        let settings = RenderSettings {
            camera_yaw: 90.0,
            camera_position: "1,2,3".to_string(),
            ..Default::default()
        };
        let camera = settings.build_camera().unwrap();
        assert!((camera.yaw - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert_eq!(camera.position, Vector3::new(1.0, 2.0, 3.0));
    }
}
