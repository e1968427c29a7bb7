use thiserror::Error;

/// Errors raised by the topology and the pulse simulation.
///
/// All of them are caller bugs: a valid host never produces one.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PulseError {
    #[error("node index {index} out of range for {len} nodes")]
    NodeOutOfRange { index: usize, len: usize },

    #[error("edge {from} -> {to} references a node outside of {len} nodes")]
    EdgeOutOfRange { from: usize, to: usize, len: usize },

    #[error("edge {0} -> {0} connects a node to itself")]
    SelfLoop(usize),

    #[error("edge {edge} has speed {speed}, speeds must be positive and finite")]
    InvalidSpeed { edge: usize, speed: f32 },
}

/// Errors raised while opening the window or drawing a frame.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to compile shader program: {0}")]
    Program(#[from] glium::ProgramCreationError),

    #[error("failed to create vertex buffer: {0}")]
    Buffer(#[from] glium::vertex::BufferCreationError),

    #[error("draw call failed: {0}")]
    Draw(#[from] glium::DrawError),

    #[error("failed to swap buffers: {0}")]
    Swap(#[from] glium::SwapBuffersError),
}
