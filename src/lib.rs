//! 扫描线软件光栅化器
//!
//! 世界空间的线段和三角形经过 相机变换 -> 投影 -> 近平面裁剪 -> 扫描线填充，
//! 三角形深度按像素射线与支撑平面求交精确计算，并经过Z缓冲测试。

pub mod core;
pub mod demos;
pub mod geometry;
pub mod io;
pub mod utils;

pub use crate::core::error::RasterError;
pub use crate::core::rasterizer::{DrawStats, Rasterizer};
pub use crate::core::renderer::Renderer;
pub use crate::core::scene::Scene;
pub use crate::geometry::camera::{Camera, Viewport};
pub use crate::geometry::clipping::ClipMode;
pub use crate::geometry::primitives::{Color, Line, Triangle};
pub use crate::geometry::vector::{MathError, Vector3};
pub use crate::geometry::vertex::Point;
