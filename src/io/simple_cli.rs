use crate::io::config_loader::{ConfigError, TomlConfigLoader};
use crate::io::render_settings::RenderSettings;
use clap::Parser;
use log::info;

/// 极简CLI：配置文件 + 少量覆盖参数
#[derive(Parser, Debug, Default)]
#[command(name = "scanline_rasterizer")]
#[command(about = "TOML驱动的扫描线软件光栅化器")]
pub struct SimpleCli {
    /// 配置文件路径（TOML格式）
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<String>,

    /// 使用示例配置（写出 example_config.toml 并加载）
    #[arg(long)]
    pub use_example_config: bool,

    /// 覆盖图像宽度
    #[arg(long)]
    pub width: Option<usize>,

    /// 覆盖图像高度
    #[arg(long)]
    pub height: Option<usize>,

    /// 覆盖渲染帧数
    #[arg(long)]
    pub frames: Option<usize>,

    /// 覆盖输出目录
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<String>,
}

pub const EXAMPLE_CONFIG_PATH: &str = "example_config.toml";

impl SimpleCli {
    /// 解析命令行并返回校验后的设置
    pub fn process() -> Result<RenderSettings, ConfigError> {
        Self::parse().into_settings()
    }

    /// 加载配置（示例 / 文件 / 默认），应用覆盖参数后校验
    pub fn into_settings(self) -> Result<RenderSettings, ConfigError> {
        let mut settings = if self.use_example_config {
            TomlConfigLoader::create_example_config(EXAMPLE_CONFIG_PATH)?;
            info!("已创建示例配置: {}", EXAMPLE_CONFIG_PATH);
            TomlConfigLoader::load_from_file(EXAMPLE_CONFIG_PATH)?
        } else if let Some(config_path) = &self.config {
            info!("加载配置文件: {}", config_path);
            TomlConfigLoader::load_from_file(config_path)?
        } else {
            info!("使用默认设置");
            RenderSettings::default()
        };

        self.apply_overrides(&mut settings);
        settings.validate()?;
        Ok(settings)
    }

    fn apply_overrides(&self, settings: &mut RenderSettings) {
        if let Some(width) = self.width {
            settings.width = width;
        }
        if let Some(height) = self.height {
            settings.height = height;
        }
        if let Some(frames) = self.frames {
            settings.frames = frames;
        }
        if let Some(output_dir) = &self.output_dir {
            settings.output_dir = output_dir.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_apply_on_top_of_defaults() {
        let cli = SimpleCli::parse_from([
            "scanline_rasterizer",
            "--width",
            "64",
            "--frames",
            "3",
            "--output-dir",
            "out",
        ]);
        let settings = cli.into_settings().unwrap();
        assert_eq!(settings.width, 64);
        assert_eq!(settings.height, RenderSettings::default().height);
        assert_eq!(settings.frames, 3);
        assert_eq!(settings.output_dir, "out");
    }

    #[test]
    fn invalid_override_fails_validation() {
        let cli = SimpleCli {
            height: Some(0),
            ..Default::default()
        };
        assert!(matches!(cli.into_settings(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let cli = SimpleCli {
            config: Some("/nonexistent/scanline.toml".to_string()),
            ..Default::default()
        };
        assert!(matches!(cli.into_settings(), Err(ConfigError::Read { .. })));
    }
}
