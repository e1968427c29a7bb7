use std::time::{Duration, Instant};

use glium::{implement_vertex, Program};
use tracing::{error, info};
use winit::{
    event::{Event, WindowEvent},
    event_loop::ControlFlow,
};

use crate::{driver::CircuitDriver, error::RenderError};

mod draw;
mod shapes;

pub use draw::{node_alpha, node_radius};

#[derive(Copy, Clone, Debug)]
pub(crate) struct Vertex {
    position: [f32; 2],
    color: [f32; 4],
}
implement_vertex!(Vertex, position, color);

/// Opens a window and animates a `CircuitDriver` in it until the window closes.
pub struct Renderer {
    driver: CircuitDriver,
    frame_interval: Duration,
    title: String,
}

impl Renderer {
    pub fn new(driver: CircuitDriver) -> Self {
        Self {
            driver,
            frame_interval: Duration::from_millis(16),
            title: "circuitry".to_string(),
        }
    }

    /// Minimum time between two drawn frames.
    pub fn frame_interval(mut self, frame_interval: Duration) -> Self {
        self.frame_interval = frame_interval;
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Runs the render loop. Only returns if setup fails; closing the window
    /// ends the process.
    pub fn create_window(self) -> Result<(), RenderError> {
        let event_loop = winit::event_loop::EventLoopBuilder::new().build();

        let (width, height) = self.driver.size();
        let (window, display) = glium::backend::glutin::SimpleWindowBuilder::new()
            .with_title(&self.title)
            .with_inner_size(width.max(1.0) as u32, height.max(1.0) as u32)
            .build(&event_loop);

        let program = Program::from_source(
            &display,
            draw::VERTEX_SHADER_SRC,
            draw::FRAGMENT_SHADER_SRC,
            None,
        )?;

        let mut driver = self.driver;
        let frame_interval = self.frame_interval;
        let size = window.inner_size();
        driver.resize(size.width as f32, size.height as f32);
        info!(width = size.width, height = size.height, "window opened");

        let mut last_redraw = Instant::now();

        event_loop.run(move |event, _, control_flow| {
            *control_flow = ControlFlow::WaitUntil(last_redraw + frame_interval);

            #[allow(clippy::single_match)]
            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                        *control_flow = ControlFlow::Exit;
                        return;
                    }
                    WindowEvent::Resized(size) => {
                        display.resize((size.width, size.height));
                        driver.resize(size.width as f32, size.height as f32);
                    }
                    _ => (),
                },
                _ => (),
            }

            if last_redraw.elapsed() < frame_interval {
                return;
            }
            let elapsed = last_redraw.elapsed();
            last_redraw = Instant::now();

            if let Err(err) = driver.advance(elapsed) {
                error!(%err, "simulation step failed");
                *control_flow = ControlFlow::Exit;
                return;
            }

            if let Err(err) = draw::draw_frame(&display, &program, &driver.snapshot()) {
                error!(%err, "failed to draw frame");
                *control_flow = ControlFlow::Exit;
            }
        })
    }
}
