/// Runtime pulse state of a node.
///
/// A node is `active` exactly while `intensity > 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeState {
    pub active: bool,
    pub intensity: f32,
}

impl NodeState {
    pub fn new() -> Self {
        Self {
            active: false,
            intensity: 0.0,
        }
    }

    /// Restarts the pulse at full strength.
    pub fn fire(&mut self) {
        self.active = true;
        self.intensity = 1.0;
    }

    /// Fades the pulse by `decay`. Returns `true` if the node went dark.
    pub fn decay(&mut self, decay: f32) -> bool {
        if !self.active {
            return false;
        }

        self.intensity -= decay;
        if self.intensity <= 0.0 {
            self.intensity = 0.0;
            self.active = false;
            return true;
        }
        false
    }
}

impl Default for NodeState {
    fn default() -> Self {
        Self::new()
    }
}

/// Runtime pulse state of an edge.
///
/// While `active`, `progress` lies in `[0, 1)`. Idle edges rest at `0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeState {
    pub active: bool,
    pub progress: f32,
}

impl EdgeState {
    pub fn new() -> Self {
        Self {
            active: false,
            progress: 0.0,
        }
    }

    /// Sends a fresh pulse from the source end.
    pub fn launch(&mut self) {
        self.active = true;
        self.progress = 0.0;
    }

    /// Moves the pulse forward by `speed`.
    /// Returns `true` if the pulse reached the destination on this step.
    pub fn advance(&mut self, speed: f32) -> bool {
        if !self.active {
            return false;
        }

        self.progress += speed;
        if self.progress >= 1.0 {
            self.active = false;
            self.progress = 0.0;
            return true;
        }
        false
    }
}

impl Default for EdgeState {
    fn default() -> Self {
        Self::new()
    }
}
