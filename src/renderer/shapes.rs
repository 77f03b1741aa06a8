//! Triangle tessellation for draw commands
//!
//! Everything is built in CSS pixels and mapped to clip space at the end, so
//! the same list renders identically at any device pixel ratio.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;
use crate::field::{DrawCmd, DrawList, Viewport};

/// Position in CSS px plus color
pub type PxVertex = (Vec2, [f32; 4]);

/// Segment count for a circle of `radius` px
fn circle_segments(radius: f32) -> u32 {
    ((radius * 4.0) as u32).clamp(6, 24)
}

/// Filled circle as a triangle fan, in px
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<PxVertex> {
    let mut out = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        out.push((center, color));
        out.push((center + Vec2::new(theta1.cos(), theta1.sin()) * radius, color));
        out.push((center + Vec2::new(theta2.cos(), theta2.sin()) * radius, color));
    }

    out
}

/// Straight line as a quad `width` px wide, in px
pub fn line(from: Vec2, to: Vec2, width: f32, color: [f32; 4]) -> Vec<PxVertex> {
    let dir = (to - from).normalize_or_zero();
    if dir == Vec2::ZERO {
        return Vec::new();
    }
    // Perpendicular for width
    let perp = Vec2::new(-dir.y, dir.x) * (width * 0.5);

    let a1 = from + perp;
    let b1 = from - perp;
    let a2 = to + perp;
    let b2 = to - perp;

    vec![
        (a1, color),
        (b1, color),
        (a2, color),
        (a2, color),
        (b1, color),
        (b2, color),
    ]
}

/// Tessellate a whole frame into clip-space vertices. `Clear` is handled by
/// the render pass load op and produces nothing here.
pub fn tessellate(list: &DrawList, viewport: Viewport) -> Vec<Vertex> {
    if viewport.is_empty() {
        return Vec::new();
    }
    let size = viewport.size();
    let mut vertices = Vec::new();

    for cmd in &list.cmds {
        let triangles = match *cmd {
            DrawCmd::Clear => continue,
            DrawCmd::Circle {
                center,
                radius,
                color,
            } => circle(center, radius, color, circle_segments(radius)),
            DrawCmd::Line {
                from,
                to,
                width,
                color,
            } => line(from, to, width, color),
        };
        vertices.extend(
            triangles
                .into_iter()
                .map(|(pos, color)| Vertex::from_px(pos, size, color)),
        );
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_quad_has_requested_width() {
        let quad = line(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), 0.5, [1.0; 4]);
        assert_eq!(quad.len(), 6);
        assert!(quad.iter().all(|(p, _)| (p.y.abs() - 0.25).abs() < 1e-6));
    }

    #[test]
    fn test_degenerate_line_is_skipped() {
        assert!(line(Vec2::ONE, Vec2::ONE, 1.0, [1.0; 4]).is_empty());
    }

    #[test]
    fn test_tessellate_skips_clear() {
        let viewport = Viewport::new(800.0, 600.0, 2.0);
        let mut list = DrawList::new();
        list.push(DrawCmd::Clear);
        assert!(tessellate(&list, viewport).is_empty());

        list.push(DrawCmd::Circle {
            center: Vec2::new(400.0, 300.0),
            radius: 1.0,
            color: [1.0, 1.0, 1.0, 0.8],
        });
        list.push(DrawCmd::Line {
            from: Vec2::new(0.0, 0.0),
            to: Vec2::new(100.0, 0.0),
            width: 0.5,
            color: [1.0; 4],
        });
        let vertices = tessellate(&list, viewport);
        assert_eq!(vertices.len(), 6 * 3 + 6);
        // Circle center lands at the clip-space origin
        assert_eq!(vertices[0].position, [0.0, 0.0]);
        assert!(vertices.iter().all(|v| v.position[0].abs() <= 1.01));
    }

    #[test]
    fn test_empty_viewport_draws_nothing() {
        let mut list = DrawList::new();
        list.push(DrawCmd::Circle {
            center: Vec2::ZERO,
            radius: 2.0,
            color: [1.0; 4],
        });
        assert!(tessellate(&list, Viewport::new(0.0, 100.0, 1.0)).is_empty());
    }
}
