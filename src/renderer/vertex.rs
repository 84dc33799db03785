//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
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

/// Colors for game elements
pub mod colors {
    pub const ROAD: [f32; 4] = [0.2, 0.2, 0.22, 1.0];
    pub const LANE_MARKING: [f32; 4] = [0.95, 0.95, 0.95, 1.0];
    /// One body color per car variant
    pub const CARS: [[f32; 4]; 3] = [
        [0.85, 0.2, 0.2, 1.0],
        [0.2, 0.45, 0.9, 1.0],
        [0.95, 0.8, 0.2, 1.0],
    ];
    pub const WINDSHIELD: [f32; 4] = [0.1, 0.12, 0.18, 1.0];
    pub const BIKE: [f32; 4] = [0.15, 0.85, 0.4, 1.0];
    pub const RIDER: [f32; 4] = [0.95, 0.75, 0.55, 1.0];
    pub const POLICE_BODY: [f32; 4] = [0.08, 0.08, 0.1, 1.0];
    pub const POLICE_ROOF: [f32; 4] = [0.88, 0.9, 0.92, 1.0];
    pub const LIGHT_RED: [f32; 4] = [1.0, 0.1, 0.1, 1.0];
    pub const LIGHT_BLUE: [f32; 4] = [0.1, 0.3, 1.0, 1.0];
    pub const LIGHT_OFF: [f32; 4] = [0.25, 0.25, 0.3, 1.0];
    pub const JOYSTICK_BASE: [f32; 4] = [1.0, 1.0, 1.0, 0.2];
    pub const JOYSTICK_KNOB: [f32; 4] = [1.0, 1.0, 1.0, 0.5];
}
