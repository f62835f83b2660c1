// utils/mod.rs
// 输出端、深度可视化与扫描线辅助函数
pub mod depth_image;
pub mod display_sink;
pub mod math_utils;
