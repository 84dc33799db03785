//! Shape generation for 2D primitives
//!
//! All coordinates are canvas pixels (origin top-left, y down).

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;
use crate::sim::Rect;

/// Generate vertices for a filled axis-aligned rectangle
pub fn rect(r: Rect, color: [f32; 4]) -> Vec<Vertex> {
    let (x0, y0) = (r.x, r.y);
    let (x1, y1) = (r.x + r.w, r.y + r.h);
    vec![
        Vertex::new(x0, y0, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x1, y1, color),
    ]
}

/// Rectangle shrunk by `inset` on every side (clamped to nothing)
pub fn inset_rect(r: Rect, inset: f32, color: [f32; 4]) -> Vec<Vertex> {
    let w = (r.w - inset * 2.0).max(0.0);
    let h = (r.h - inset * 2.0).max(0.0);
    rect(Rect::new(r.x + inset, r.y + inset, w, h), color)
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;
        let (sin1, cos1) = theta1.sin_cos();
        let (sin2, cos2) = theta2.sin_cos();

        let inner1 = center + Vec2::new(cos1, sin1) * inner_radius;
        let outer1 = center + Vec2::new(cos1, sin1) * outer_radius;
        let inner2 = center + Vec2::new(cos2, sin2) * inner_radius;
        let outer2 = center + Vec2::new(cos2, sin2) * outer_radius;

        // Two triangles per segment
        vertices.push(Vertex::new(inner1.x, inner1.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(inner2.x, inner2.y, color));

        vertices.push(Vertex::new(inner2.x, inner2.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(outer2.x, outer2.y, color));
    }

    vertices
}
