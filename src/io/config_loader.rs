use crate::io::render_settings::{RenderSettings, ScenePreset, parse_clip_mode};
use log::warn;
use std::path::{Path, PathBuf};
use toml::Value;

/// 配置读写与校验错误
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("读取配置文件 {} 失败: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("写入配置文件 {} 失败: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("解析TOML失败: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("[{section}] {key}: {message}")]
    Field {
        section: &'static str,
        key: &'static str,
        message: String,
    },

    #[error("无效的配置: {0}")]
    Invalid(String),
}

/// TOML配置管理器：统一处理配置的读写
pub struct TomlConfigLoader;

impl TomlConfigLoader {
    /// 从TOML文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<RenderSettings, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::load_from_content(&content)
    }

    /// 从TOML内容字符串加载配置；未出现的键保持默认值
    pub fn load_from_content(content: &str) -> Result<RenderSettings, ConfigError> {
        let toml_value: Value = toml::from_str(content)?;
        Self::parse_toml_to_settings(&toml_value)
    }

    /// 保存配置到TOML文件
    pub fn save_to_file<P: AsRef<Path>>(
        settings: &RenderSettings,
        path: P,
    ) -> Result<(), ConfigError> {
        let path = path.as_ref();
        std::fs::write(path, Self::settings_to_toml(settings)).map_err(|source| {
            ConfigError::Write {
                path: path.to_path_buf(),
                source,
            }
        })
    }

    /// 写出一份示例配置：showcase 场景，相机缓慢前进并转向
    pub fn create_example_config<P: AsRef<Path>>(path: P) -> Result<(), ConfigError> {
        let settings = RenderSettings {
            output: "showcase".to_string(),
            preset: ScenePreset::Showcase,
            save_depth: true,
            camera_position: "-4,0,0.5".to_string(),
            frames: 30,
            yaw_step: 1.0,
            move_forward: 0.05,
            ..Default::default()
        };
        Self::save_to_file(&settings, path)
    }

    // ===== TOML -> RenderSettings =====

    fn parse_toml_to_settings(toml: &Value) -> Result<RenderSettings, ConfigError> {
        let mut settings = RenderSettings::default();

        // [files]
        if let Some(files) = toml.get("files").and_then(|v| v.as_table()) {
            Self::parse_files_section(&mut settings, files)?;
        }

        // [render]
        if let Some(render) = toml.get("render").and_then(|v| v.as_table()) {
            Self::parse_render_section(&mut settings, render)?;
        }

        // [camera]
        if let Some(camera) = toml.get("camera").and_then(|v| v.as_table()) {
            Self::parse_camera_section(&mut settings, camera)?;
        }

        // [scene]
        if let Some(scene) = toml.get("scene").and_then(|v| v.as_table()) {
            Self::parse_scene_section(&mut settings, scene)?;
        }

        // [animation]
        if let Some(animation) = toml.get("animation").and_then(|v| v.as_table()) {
            Self::parse_animation_section(&mut settings, animation)?;
        }

        Ok(settings)
    }

    fn parse_files_section(
        settings: &mut RenderSettings,
        files: &toml::Table,
    ) -> Result<(), ConfigError> {
        if let Some(output) = files.get("output").and_then(|v| v.as_str()) {
            settings.output = output.to_string();
        }
        if let Some(output_dir) = files.get("output_dir").and_then(|v| v.as_str()) {
            settings.output_dir = output_dir.to_string();
        }
        Ok(())
    }

    fn parse_render_section(
        settings: &mut RenderSettings,
        render: &toml::Table,
    ) -> Result<(), ConfigError> {
        if let Some(width) = render.get("width") {
            settings.width = Self::read_size("render", "width", width)?;
        }
        if let Some(height) = render.get("height") {
            settings.height = Self::read_size("render", "height", height)?;
        }
        if let Some(clip_mode) = render.get("clip_mode").and_then(|v| v.as_str()) {
            settings.clip_mode = parse_clip_mode(clip_mode);
        }
        if let Some(background) = render.get("background").and_then(|v| v.as_str()) {
            settings.background = background.to_string();
        }
        if let Some(save_depth) = render.get("save_depth").and_then(|v| v.as_bool()) {
            settings.save_depth = save_depth;
        }
        Ok(())
    }

    fn parse_camera_section(
        settings: &mut RenderSettings,
        camera: &toml::Table,
    ) -> Result<(), ConfigError> {
        if let Some(position) = camera.get("position").and_then(|v| v.as_str()) {
            settings.camera_position = position.to_string();
        }
        if let Some(yaw) = camera.get("yaw") {
            settings.camera_yaw = Self::read_float("camera", "yaw", yaw)?;
        }
        if let Some(pitch) = camera.get("pitch") {
            settings.camera_pitch = Self::read_float("camera", "pitch", pitch)?;
        }
        if let Some(fov) = camera.get("fov") {
            settings.camera_fov = Self::read_float("camera", "fov", fov)?;
        }
        Ok(())
    }

    fn parse_scene_section(
        settings: &mut RenderSettings,
        scene: &toml::Table,
    ) -> Result<(), ConfigError> {
        if let Some(preset) = scene.get("preset").and_then(|v| v.as_str()) {
            settings.preset = ScenePreset::from_name(preset);
        }
        if let Some(seed) = scene.get("color_seed").and_then(|v| v.as_integer()) {
            if seed < 0 {
                // -1 是保存配置时写出的"固定颜色"标记
                if seed != -1 {
                    warn!("color_seed 为负数 ({}), 使用固定颜色", seed);
                }
                settings.color_seed = None;
            } else {
                settings.color_seed = Some(seed as u64);
            }
        }
        Ok(())
    }

    fn parse_animation_section(
        settings: &mut RenderSettings,
        animation: &toml::Table,
    ) -> Result<(), ConfigError> {
        if let Some(frames) = animation.get("frames") {
            settings.frames = Self::read_size("animation", "frames", frames)?;
        }
        if let Some(v) = animation.get("yaw_step") {
            settings.yaw_step = Self::read_float("animation", "yaw_step", v)?;
        }
        if let Some(v) = animation.get("pitch_step") {
            settings.pitch_step = Self::read_float("animation", "pitch_step", v)?;
        }
        if let Some(v) = animation.get("move_forward") {
            settings.move_forward = Self::read_float("animation", "move_forward", v)?;
        }
        if let Some(v) = animation.get("move_sideward") {
            settings.move_sideward = Self::read_float("animation", "move_sideward", v)?;
        }
        if let Some(v) = animation.get("move_upward") {
            settings.move_upward = Self::read_float("animation", "move_upward", v)?;
        }
        Ok(())
    }

    // ===== 值读取辅助 =====

    /// 浮点字段同时接受整数写法（`fov = 90`）
    fn read_float(section: &'static str, key: &'static str, value: &Value) -> Result<f32, ConfigError> {
        match value {
            Value::Float(f) => Ok(*f as f32),
            Value::Integer(i) => Ok(*i as f32),
            other => Err(ConfigError::Field {
                section,
                key,
                message: format!("需要数字，实际为 {}", other.type_str()),
            }),
        }
    }

    fn read_size(section: &'static str, key: &'static str, value: &Value) -> Result<usize, ConfigError> {
        let raw = value.as_integer().ok_or_else(|| ConfigError::Field {
            section,
            key,
            message: format!("需要整数，实际为 {}", value.type_str()),
        })?;
        usize::try_from(raw).map_err(|_| ConfigError::Field {
            section,
            key,
            message: format!("不能为负数: {}", raw),
        })
    }

    // ===== RenderSettings -> TOML =====

    fn settings_to_toml(settings: &RenderSettings) -> String {
        let mut content = String::new();

        content.push_str("# 扫描线光栅化器配置\n\n");

        content.push_str("[files]\n");
        content.push_str(&format!("output = {}\n", toml_string(&settings.output)));
        content.push_str(&format!("output_dir = {}\n\n", toml_string(&settings.output_dir)));

        content.push_str("[render]\n");
        content.push_str(&format!("width = {}\n", settings.width));
        content.push_str(&format!("height = {}\n", settings.height));
        content.push_str("# exact | extrapolate\n");
        content.push_str(&format!("clip_mode = \"{}\"\n", settings.clip_mode.name()));
        content.push_str(&format!("background = {}\n", toml_string(&settings.background)));
        content.push_str(&format!("save_depth = {}\n\n", settings.save_depth));

        content.push_str("[camera]\n");
        content.push_str(&format!("position = {}\n", toml_string(&settings.camera_position)));
        content.push_str("# 角度单位为度\n");
        content.push_str(&format!("yaw = {:?}\n", settings.camera_yaw));
        content.push_str(&format!("pitch = {:?}\n", settings.camera_pitch));
        content.push_str(&format!("fov = {:?}\n\n", settings.camera_fov));

        content.push_str("[scene]\n");
        content.push_str("# cube | showcase\n");
        content.push_str(&format!("preset = \"{}\"\n", settings.preset.name()));
        content.push_str("# 负数表示使用固定颜色\n");
        match settings.color_seed {
            Some(seed) => content.push_str(&format!("color_seed = {}\n\n", seed)),
            None => content.push_str("color_seed = -1\n\n"),
        }

        content.push_str("[animation]\n");
        content.push_str(&format!("frames = {}\n", settings.frames));
        content.push_str(&format!("yaw_step = {:?}\n", settings.yaw_step));
        content.push_str(&format!("pitch_step = {:?}\n", settings.pitch_step));
        content.push_str(&format!("move_forward = {:?}\n", settings.move_forward));
        content.push_str(&format!("move_sideward = {:?}\n", settings.move_sideward));
        content.push_str(&format!("move_upward = {:?}\n", settings.move_upward));

        content
    }
}

/// 带转义的TOML字符串字面量（路径中的反斜杠、引号）
fn toml_string(text: &str) -> String {
    Value::String(text.to_string()).to_string()
}
