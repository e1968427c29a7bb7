use std::f32::consts::PI;

use glam::Vec2;

use super::Vertex;

/// Filled circle as a triangle fan unrolled into `res` triangles.
pub fn circle(pos: Vec2, color: [f32; 4], r: f32, res: usize) -> Vec<Vertex> {
    let mut shape = Vec::with_capacity(3 * res);
    let a = 2.0 * PI / res as f32;
    let center = pos.to_array();

    for i in 0..res {
        let i = i as f32;
        shape.push(Vertex {
            position: center,
            color,
        });
        shape.push(Vertex {
            position: (pos + r * Vec2::new(f32::sin(a * i), f32::cos(a * i))).to_array(),
            color,
        });
        shape.push(Vertex {
            position: (pos + r * Vec2::new(f32::sin(a * (i + 1.0)), f32::cos(a * (i + 1.0))))
                .to_array(),
            color,
        });
    }

    shape
}

pub fn line(p1: Vec2, p2: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    vec![
        Vertex {
            position: p1.to_array(),
            color,
        },
        Vertex {
            position: p2.to_array(),
            color,
        },
    ]
}
