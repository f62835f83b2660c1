// geometry/mod.rs
// 向量、相机、顶点流水线、图元与近平面裁剪
pub mod camera;
pub mod clipping;
pub mod primitives;
pub mod vector;
pub mod vertex;
