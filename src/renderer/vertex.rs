//! Vertex type for field frames

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// Clip-space position plus straight (non-premultiplied) RGBA
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    /// Vertex at CSS pixel `pos` inside a `size` px viewport (y down)
    pub fn from_px(pos: Vec2, size: Vec2, color: [f32; 4]) -> Self {
        Self::new(pos.x / size.x * 2.0 - 1.0, 1.0 - pos.y / size.y * 2.0, color)
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_px_corners_map_to_clip_space() {
        let size = Vec2::new(800.0, 600.0);
        assert_eq!(Vertex::from_px(Vec2::ZERO, size, [1.0; 4]).position, [-1.0, 1.0]);
        assert_eq!(Vertex::from_px(size, size, [1.0; 4]).position, [1.0, -1.0]);
        assert_eq!(Vertex::from_px(size / 2.0, size, [1.0; 4]).position, [0.0, 0.0]);
    }
}
