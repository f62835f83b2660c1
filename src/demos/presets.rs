use crate::core::scene::Scene;
use crate::geometry::primitives::{Color, Line, Triangle};
use crate::geometry::vector::{MathError, Vector3};
use crate::geometry::vertex::Point;
use crate::io::render_settings::ScenePreset;
use log::info;

const CUBE_COLOR: Color = Color::new(200, 120, 40);
const GRID_COLOR: Color = Color::mono(90);

/// 按预设构建场景
pub fn build_scene(preset: ScenePreset, color_seed: Option<u64>) -> Result<Scene, MathError> {
    let scene = match preset {
        ScenePreset::Cube => cube_scene(color_seed)?,
        ScenePreset::Showcase => showcase_scene(color_seed)?,
    };
    info!(
        "场景 '{}' 已构建: {} 线段, {} 三角形",
        preset.name(),
        scene.lines.len(),
        scene.triangles.len()
    );
    Ok(scene)
}

/// 相机正前方 5 个单位处的边长为 2 的立方体
pub fn cube_scene(color_seed: Option<u64>) -> Result<Scene, MathError> {
    let mut scene = Scene::new();
    scene.add_cube(Vector3::new(5.0, 0.0, 0.0), 2.0, CUBE_COLOR, color_seed)?;
    Ok(scene)
}

/// 两个立方体、地面网格、坐标轴线，以及一块从相机身后延伸过来的大三角形
pub fn showcase_scene(color_seed: Option<u64>) -> Result<Scene, MathError> {
    let mut scene = Scene::new();

    scene.add_floor_grid(8, 1.0, -1.0, GRID_COLOR);

    scene.add_cube(Vector3::new(3.0, 0.0, 0.0), 2.0, CUBE_COLOR, color_seed)?;
    scene.add_cube(
        Vector3::new(6.0, 2.5, 0.5),
        1.0,
        Color::new(60, 160, 220),
        color_seed.map(|seed| seed.wrapping_add(100)),
    )?;

    // 坐标轴
    let origin = Vector3::new(0.0, 0.0, -0.99);
    for (axis, color) in [
        (Vector3::new(1.0, 0.0, 0.0), Color::new(255, 0, 0)),
        (Vector3::new(0.0, 1.0, 0.0), Color::new(0, 255, 0)),
        (Vector3::new(0.0, 0.0, 1.0), Color::new(0, 0, 255)),
    ] {
        scene.add_line(Line::with_color(
            Point::from(origin),
            Point::from(origin + axis * 2.0),
            color,
        ));
    }

    // 一个顶点远在身后，会被近平面裁剪并拆分
    scene.add_triangle(Triangle::new(
        Point::new(-12.0, -1.5, -0.9),
        Point::new(8.0, -1.5, -0.9),
        Point::new(8.0, -3.5, 2.0),
        Color::new(180, 60, 180),
    )?);

    Ok(scene)
}
