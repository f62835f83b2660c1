// demos/mod.rs
// 场景预设与逐帧相机运动
pub mod frame_loop;
pub mod presets;
