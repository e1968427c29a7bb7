use glam::Vec2;

/// Read-only copy of a node for drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeView {
    pub position: Vec2,
    pub active: bool,
    pub intensity: f32,
}

/// Read-only copy of an edge for drawing, with both endpoint positions resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeView {
    pub from: Vec2,
    pub to: Vec2,
    pub active: bool,
    pub progress: f32,
}

impl EdgeView {
    /// Where the traveling pulse currently is, if there is one.
    pub fn pulse_head(&self) -> Option<Vec2> {
        self.active.then(|| self.from + (self.to - self.from) * self.progress)
    }
}

/// Everything a renderer needs to draw one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderState {
    pub nodes: Vec<NodeView>,
    pub edges: Vec<EdgeView>,
}

impl RenderState {
    pub fn active_nodes(&self) -> usize {
        self.nodes.iter().filter(|n| n.active).count()
    }

    pub fn active_edges(&self) -> usize {
        self.edges.iter().filter(|e| e.active).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pulse_head_interpolates() {
        let mut edge = EdgeView {
            from: Vec2::new(0.0, 0.0),
            to: Vec2::new(100.0, 50.0),
            active: true,
            progress: 0.25,
        };
        assert_eq!(edge.pulse_head(), Some(Vec2::new(25.0, 12.5)));

        edge.active = false;
        assert_eq!(edge.pulse_head(), None);
    }
}
