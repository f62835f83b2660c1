use anyhow::{Context, Result};
use log::info;
use scanline_rasterizer::core::renderer::Renderer;
use scanline_rasterizer::demos::frame_loop::run_frames;
use scanline_rasterizer::demos::presets::build_scene;
use scanline_rasterizer::io::simple_cli::SimpleCli;
use scanline_rasterizer::utils::display_sink::PngSink;
use std::time::Instant;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let start_time = Instant::now();

    let settings = SimpleCli::process().context("加载配置失败")?;
    info!(
        "渲染设置: {}x{}, 裁剪模式 {}, 场景 {}, {} 帧",
        settings.width,
        settings.height,
        settings.clip_mode.name(),
        settings.preset.name(),
        settings.frames
    );

    let scene = build_scene(settings.preset, settings.color_seed).context("构建场景失败")?;
    let mut camera = settings.build_camera()?;
    let mut renderer = Renderer::with_options(
        settings.width,
        settings.height,
        settings.clip_mode,
        settings.background_color()?,
    );
    let mut sink = PngSink::new(&settings.output_dir, settings.save_depth)?;

    let summary = run_frames(&settings, &scene, &mut camera, &mut renderer, &mut sink)?;

    info!(
        "完成: {} 帧写入 {}，总耗时 {:?}",
        summary.frames,
        settings.output_dir,
        start_time.elapsed()
    );
    Ok(())
}
