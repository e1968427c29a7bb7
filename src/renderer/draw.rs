use glam::Mat4;
use glium::{
    glutin::surface::WindowSurface,
    index::{NoIndices, PrimitiveType},
    uniform, Blend, Display, DrawParameters, Frame, Program, Surface, VertexBuffer,
};

use super::{shapes, Vertex};
use crate::{
    error::RenderError,
    frame::{NodeView, RenderState},
};

pub static VERTEX_SHADER_SRC: &str = r#"
#version 140

in vec2 position;
in vec4 color;
out vec4 vertex_color;

uniform mat4 projection;

void main() {
    vertex_color = color;
    gl_Position = projection * vec4(position, 0.0, 1.0);
}
"#;

pub static FRAGMENT_SHADER_SRC: &str = r#"
#version 140

in vec4 vertex_color;
out vec4 color;

void main() {
    color = vertex_color;
}
"#;

const RED: [f32; 3] = [1.0, 0.0, 0.0];
const CIRCLE_RES: usize = 24;

const TRACE_ALPHA: f32 = 0.2;
const TRACE_WIDTH: f32 = 2.0;
const PULSE_WIDTH: f32 = 4.0;
const PULSE_RADIUS: f32 = 6.0;
const PULSE_GLOW_RADIUS: f32 = 12.0;
const PULSE_GLOW_ALPHA: f32 = 0.6;
const IDLE_NODE_RADIUS: f32 = 3.0;
const IDLE_NODE_ALPHA: f32 = 0.3;

fn red(alpha: f32) -> [f32; 4] {
    [RED[0], RED[1], RED[2], alpha]
}

/// Radius of a lit node's core.
pub fn node_radius(intensity: f32) -> f32 {
    6.0 + intensity * 12.0
}

/// Opacity of a lit node's core.
pub fn node_alpha(intensity: f32) -> f32 {
    0.5 + intensity * 0.5
}

/// Vertices of one frame, grouped by how they are drawn.
#[derive(Default)]
pub struct Batches {
    pub traces: Vec<Vertex>,
    pub pulses: Vec<Vertex>,
    pub fills: Vec<Vertex>,
}

/// Turns a frame into vertex batches. Later fills paint over earlier ones.
pub fn build_batches(frame: &RenderState) -> Batches {
    let mut batches = Batches::default();

    for edge in frame.edges.iter() {
        match edge.pulse_head() {
            Some(head) => {
                batches
                    .pulses
                    .append(&mut shapes::line(edge.from, head, red(1.0)));
                batches.fills.append(&mut shapes::circle(
                    head,
                    red(PULSE_GLOW_ALPHA),
                    PULSE_GLOW_RADIUS,
                    CIRCLE_RES,
                ));
                batches.fills.append(&mut shapes::circle(
                    head,
                    red(1.0),
                    PULSE_RADIUS,
                    CIRCLE_RES,
                ));
            }
            None => batches
                .traces
                .append(&mut shapes::line(edge.from, edge.to, red(TRACE_ALPHA))),
        }
    }

    for node in frame.nodes.iter() {
        append_node(&mut batches.fills, node);
    }

    batches
}

/// Lit nodes get an outer glow, a middle glow and a core; idle nodes a faint dot.
fn append_node(fills: &mut Vec<Vertex>, node: &NodeView) {
    if !node.active {
        fills.append(&mut shapes::circle(
            node.position,
            red(IDLE_NODE_ALPHA),
            IDLE_NODE_RADIUS,
            CIRCLE_RES,
        ));
        return;
    }

    let radius = node_radius(node.intensity);
    let alpha = node_alpha(node.intensity);
    for (scale, fade) in [(3.0, 0.3), (1.5, 0.6), (1.0, 1.0)] {
        fills.append(&mut shapes::circle(
            node.position,
            red(alpha * fade),
            radius * scale,
            CIRCLE_RES,
        ));
    }
}

/// Draws one frame in surface pixel coordinates, origin top left.
pub fn draw_frame(
    display: &Display<WindowSurface>,
    program: &Program,
    frame: &RenderState,
) -> Result<(), RenderError> {
    let mut target = display.draw();
    target.clear_color(0.0, 0.0, 0.0, 1.0);

    let (width, height) = target.get_dimensions();
    let projection =
        Mat4::orthographic_rh_gl(0.0, width as f32, height as f32, 0.0, -1.0, 1.0);
    let batches = build_batches(frame);

    let drawn = draw_batch(
        &mut target,
        display,
        program,
        &batches.traces,
        PrimitiveType::LinesList,
        &projection,
        Some(TRACE_WIDTH),
    )
    .and_then(|_| {
        draw_batch(
            &mut target,
            display,
            program,
            &batches.pulses,
            PrimitiveType::LinesList,
            &projection,
            Some(PULSE_WIDTH),
        )
    })
    .and_then(|_| {
        draw_batch(
            &mut target,
            display,
            program,
            &batches.fills,
            PrimitiveType::TrianglesList,
            &projection,
            None,
        )
    });

    // A frame must always be finished, even after a failed draw.
    target.finish()?;
    drawn
}

fn draw_batch(
    target: &mut Frame,
    display: &Display<WindowSurface>,
    program: &Program,
    shape: &[Vertex],
    primitive: PrimitiveType,
    projection: &Mat4,
    line_width: Option<f32>,
) -> Result<(), RenderError> {
    if shape.is_empty() {
        return Ok(());
    }

    let vertex_buffer = VertexBuffer::new(display, shape)?;
    let uniforms = uniform! {
        projection: projection.to_cols_array_2d(),
    };
    let params = DrawParameters {
        blend: Blend::alpha_blending(),
        line_width,
        ..Default::default()
    };

    target.draw(
        &vertex_buffer,
        NoIndices(primitive),
        program,
        &uniforms,
        &params,
    )?;
    Ok(())
}
