use crate::geometry::primitives::{Color, Line, Triangle};
use crate::geometry::vector::{MathError, Vector3};
use crate::geometry::vertex::Point;

/// 调用方持有的场景：线段和三角形的集合，按引用交给渲染器
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub lines: Vec<Line>,
    pub triangles: Vec<Triangle>,
}

impl Scene {
    /// 创建一个新的空场景
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加线段，返回其索引
    pub fn add_line(&mut self, line: Line) -> usize {
        self.lines.push(line);
        self.lines.len() - 1
    }

    /// 添加三角形，返回其索引
    pub fn add_triangle(&mut self, triangle: Triangle) -> usize {
        self.triangles.push(triangle);
        self.triangles.len() - 1
    }

    /// 添加轴对齐立方体（12个三角形）
    ///
    /// `color_seed` 为 `Some` 时每个面使用由种子派生的伪随机颜色，
    /// 否则全部使用 `color`。
    pub fn add_cube(
        &mut self,
        center: Vector3,
        size: f32,
        color: Color,
        color_seed: Option<u64>,
    ) -> Result<Vec<usize>, MathError> {
        let h = size * 0.5;
        let corner = |sx: f32, sy: f32, sz: f32| {
            Point::from(center + Vector3::new(sx * h, sy * h, sz * h))
        };

        // 每个面两个三角形，按外法线逆时针
        let faces = [
            // -X / +X
            [(-1., -1., -1.), (-1., -1., 1.), (-1., 1., 1.), (-1., 1., -1.)],
            [(1., -1., -1.), (1., 1., -1.), (1., 1., 1.), (1., -1., 1.)],
            // -Y / +Y
            [(-1., -1., -1.), (1., -1., -1.), (1., -1., 1.), (-1., -1., 1.)],
            [(-1., 1., -1.), (-1., 1., 1.), (1., 1., 1.), (1., 1., -1.)],
            // -Z / +Z
            [(-1., -1., -1.), (-1., 1., -1.), (1., 1., -1.), (1., -1., -1.)],
            [(-1., -1., 1.), (1., -1., 1.), (1., 1., 1.), (-1., 1., 1.)],
        ];

        let mut ids = Vec::with_capacity(12);
        for (face_index, quad) in faces.iter().enumerate() {
            let [a, b, c, d] = quad.map(|(x, y, z)| corner(x, y, z));
            for (offset, (p1, p2, p3)) in [(a, b, c), (a, c, d)].into_iter().enumerate() {
                let face_color = match color_seed {
                    Some(seed) => Color::from_seed(seed + (face_index * 2 + offset) as u64),
                    None => color,
                };
                ids.push(self.add_triangle(Triangle::new(p1, p2, p3, face_color)?));
            }
        }
        Ok(ids)
    }

    /// 在 z = height 平面上添加 `(2n+1)²` 网格线，中心位于原点
    pub fn add_floor_grid(&mut self, half_cells: u32, spacing: f32, height: f32, color: Color) {
        let extent = half_cells as f32 * spacing;
        for i in -(half_cells as i32)..=(half_cells as i32) {
            let offset = i as f32 * spacing;
            self.add_line(Line::with_color(
                Point::new(offset, -extent, height),
                Point::new(offset, extent, height),
                color,
            ));
            self.add_line(Line::with_color(
                Point::new(-extent, offset, height),
                Point::new(extent, offset, height),
                color,
            ));
        }
    }

    /// 图元总数
    pub fn primitive_count(&self) -> usize {
        self.lines.len() + self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitive_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_has_outward_normals() {
        let mut scene = Scene::new();
        let center = Vector3::new(5.0, 0.0, 0.0);
        let ids = scene.add_cube(center, 1.0, Color::WHITE, None).unwrap();
        assert_eq!(ids.len(), 12);
        for tri in &scene.triangles {
            let centroid =
                (tri.p1.world_position + tri.p2.world_position + tri.p3.world_position) / 3.0;
            assert!(tri.normal.dot(&(centroid - center)) > 0.0);
        }
    }

    #[test]
    fn seeded_cube_colors_are_reproducible() {
        let mut a = Scene::new();
        let mut b = Scene::new();
        a.add_cube(Vector3::ZERO, 2.0, Color::WHITE, Some(11)).unwrap();
        b.add_cube(Vector3::ZERO, 2.0, Color::WHITE, Some(11)).unwrap();
        let colors_a: Vec<Color> = a.triangles.iter().map(|t| t.color).collect();
        let colors_b: Vec<Color> = b.triangles.iter().map(|t| t.color).collect();
        assert_eq!(colors_a, colors_b);
    }

    #[test]
    fn floor_grid_line_count() {
        let mut scene = Scene::new();
        scene.add_floor_grid(2, 1.0, -1.0, Color::WHITE);
        assert_eq!(scene.lines.len(), 10);
        assert!(scene.lines.iter().all(|l| l.p1.world_position.z == -1.0));
    }
}
