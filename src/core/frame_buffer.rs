use crate::core::error::RasterError;
use crate::geometry::primitives::Color;
use rayon::prelude::*;

/// 深度缓冲的清除值，表示"尚未绘制"
pub const DEPTH_CLEAR: f32 = f32::INFINITY;

/// 行主序索引，越界时返回带坐标的错误
fn checked_index(x: i32, y: i32, width: usize, height: usize) -> Result<usize, RasterError> {
    if x < 0 || y < 0 || x as usize >= width || y as usize >= height {
        return Err(RasterError::OutOfBounds {
            x: x as i64,
            y: y as i64,
            width,
            height,
        });
    }
    Ok(y as usize * width + x as usize)
}

/// 颜色缓冲区：`width × height` 个RGB三元组，行主序
#[derive(Debug, Clone)]
pub struct ColorBuffer {
    width: usize,
    height: usize,
    clear_color: Color,
    data: Vec<u8>,
}

impl ColorBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_clear_color(width, height, Color::BLACK)
    }

    pub fn with_clear_color(width: usize, height: usize, clear_color: Color) -> Self {
        let mut buffer = ColorBuffer {
            width,
            height,
            clear_color,
            data: vec![0; width * height * 3],
        };
        buffer.clear();
        buffer
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    /// 用清除色填满整个缓冲区
    pub fn clear(&mut self) {
        let rgb = self.clear_color.to_array();
        self.data
            .par_chunks_mut(3)
            .for_each(|pixel| pixel.copy_from_slice(&rgb));
    }

    /// 像素 (x, y) 在字节数组中的起始位置
    pub fn index(&self, x: i32, y: i32) -> Result<usize, RasterError> {
        Ok(checked_index(x, y, self.width, self.height)? * 3)
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) -> Result<(), RasterError> {
        let index = self.index(x, y)?;
        self.data[index..index + 3].copy_from_slice(&color.to_array());
        Ok(())
    }

    /// 以原始整数通道写入，任一通道超出 [0, 255] 时报错
    pub fn set_pixel_rgb(
        &mut self,
        x: i32,
        y: i32,
        r: i32,
        g: i32,
        b: i32,
    ) -> Result<(), RasterError> {
        let channel = |v: i32| u8::try_from(v).map_err(|_| RasterError::InvalidColor { r, g, b });
        let color = Color::new(channel(r)?, channel(g)?, channel(b)?);
        self.set_pixel(x, y, color)
    }

    /// 三个通道写入同一灰度值
    pub fn set_pixel_mono(&mut self, x: i32, y: i32, value: i32) -> Result<(), RasterError> {
        self.set_pixel_rgb(x, y, value, value, value)
    }

    pub fn get_pixel(&self, x: i32, y: i32) -> Result<Color, RasterError> {
        let index = self.index(x, y)?;
        Ok(Color::new(
            self.data[index],
            self.data[index + 1],
            self.data[index + 2],
        ))
    }

    /// 读取红色通道（单色绘制时三个通道相同）
    pub fn get_pixel_mono(&self, x: i32, y: i32) -> Result<u8, RasterError> {
        Ok(self.data[self.index(x, y)?])
    }

    /// 行主序RGB字节
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// 转换为RGBA字节，alpha恒为255
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        let mut rgba = vec![255u8; self.width * self.height * 4];
        rgba.par_chunks_mut(4)
            .zip(self.data.par_chunks(3))
            .for_each(|(dst, src)| dst[..3].copy_from_slice(src));
        rgba
    }
}

/// 深度缓冲区：每像素一个非负距离，数值越小越近
#[derive(Debug, Clone)]
pub struct DepthBuffer {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl DepthBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        DepthBuffer {
            width,
            height,
            data: vec![DEPTH_CLEAR; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self) {
        self.data.par_iter_mut().for_each(|d| *d = DEPTH_CLEAR);
    }

    pub fn index(&self, x: i32, y: i32) -> Result<usize, RasterError> {
        checked_index(x, y, self.width, self.height)
    }

    pub fn get_depth(&self, x: i32, y: i32) -> Result<f32, RasterError> {
        Ok(self.data[self.index(x, y)?])
    }

    /// 写入深度；负数或NaN视为逻辑错误
    pub fn set_depth(&mut self, x: i32, y: i32, depth: f32) -> Result<(), RasterError> {
        if depth.is_nan() || depth < 0.0 {
            return Err(RasterError::InvalidDepth(depth));
        }
        let index = self.index(x, y)?;
        self.data[index] = depth;
        Ok(())
    }

    /// 深度测试：比当前值更近时写入并返回 true
    pub fn test_and_set(&mut self, x: i32, y: i32, depth: f32) -> Result<bool, RasterError> {
        if depth < self.get_depth(x, y)? {
            self.set_depth(x, y, depth)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_access_reports_coordinates() {
        let mut colors = ColorBuffer::new(4, 3);
        let err = colors.set_pixel(4, 0, Color::WHITE).unwrap_err();
        assert_eq!(
            err,
            RasterError::OutOfBounds {
                x: 4,
                y: 0,
                width: 4,
                height: 3
            }
        );
        assert!(colors.get_pixel(0, -1).is_err());
        assert!(colors.set_pixel(3, 2, Color::WHITE).is_ok());

        let depths = DepthBuffer::new(4, 3);
        assert!(depths.get_depth(0, 3).is_err());
    }

    #[test]
    fn invalid_color_and_depth_are_rejected() {
        let mut colors = ColorBuffer::new(2, 2);
        assert_eq!(
            colors.set_pixel_rgb(0, 0, 10, 256, 0),
            Err(RasterError::InvalidColor { r: 10, g: 256, b: 0 })
        );
        assert!(colors.set_pixel_mono(0, 0, -1).is_err());
        // 失败的写入不改变缓冲区
        assert_eq!(colors.get_pixel(0, 0).unwrap(), Color::BLACK);

        let mut depths = DepthBuffer::new(2, 2);
        assert_eq!(depths.set_depth(1, 1, -0.5), Err(RasterError::InvalidDepth(-0.5)));
        assert!(depths.set_depth(1, 1, f32::NAN).is_err());
        assert!(depths.set_depth(1, 1, 0.0).is_ok());
    }

    #[test]
    fn mono_pixels_fill_all_channels() {
        let mut colors = ColorBuffer::new(2, 2);
        colors.set_pixel_mono(1, 0, 200).unwrap();
        assert_eq!(colors.get_pixel(1, 0).unwrap(), Color::mono(200));
        assert_eq!(colors.get_pixel_mono(1, 0).unwrap(), 200);
        assert_eq!(colors.index(1, 1).unwrap(), 9);
    }

    #[test]
    fn clear_removes_previous_frame() {
        let mut colors = ColorBuffer::with_clear_color(3, 3, Color::new(1, 2, 3));
        let mut depths = DepthBuffer::new(3, 3);
        colors.set_pixel(1, 1, Color::WHITE).unwrap();
        depths.set_depth(1, 1, 2.0).unwrap();

        colors.clear();
        depths.clear();

        assert!(colors.as_bytes().chunks(3).all(|p| p == [1, 2, 3]));
        assert!(depths.as_slice().iter().all(|&d| d == DEPTH_CLEAR));
    }

    #[test]
    fn depth_test_keeps_nearest() {
        let mut depths = DepthBuffer::new(1, 1);
        assert!(depths.test_and_set(0, 0, 5.0).unwrap());
        assert!(!depths.test_and_set(0, 0, 6.0).unwrap());
        assert!(!depths.test_and_set(0, 0, 5.0).unwrap());
        assert!(depths.test_and_set(0, 0, 1.0).unwrap());
        assert_eq!(depths.get_depth(0, 0).unwrap(), 1.0);
    }

    #[test]
    fn rgba_conversion_adds_opaque_alpha() {
        let mut colors = ColorBuffer::new(2, 1);
        colors.set_pixel(1, 0, Color::new(9, 8, 7)).unwrap();
        assert_eq!(colors.to_rgba_bytes(), vec![0, 0, 0, 255, 9, 8, 7, 255]);
    }
}
