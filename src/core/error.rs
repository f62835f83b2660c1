use crate::geometry::vector::MathError;

/// 光栅化过程中的错误
///
/// 缓冲区访问错误都是上游逻辑缺陷（例如绘制前漏掉了裁剪），
/// 会中止当前帧的绘制调用而不是被静默忽略。
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RasterError {
    /// 像素坐标超出 [0,width) × [0,height)
    #[error("像素坐标越界: x = {x}, y = {y} (缓冲区 {width}x{height})")]
    OutOfBounds {
        x: i64,
        y: i64,
        width: usize,
        height: usize,
    },

    /// 颜色通道超出 [0, 255]
    #[error("颜色值越界: r, g, b = {r}, {g}, {b}")]
    InvalidColor { r: i32, g: i32, b: i32 },

    /// 写入深度缓冲的深度为负数或NaN
    #[error("无效深度: {0}")]
    InvalidDepth(f32),

    #[error(transparent)]
    Math(#[from] MathError),
}
