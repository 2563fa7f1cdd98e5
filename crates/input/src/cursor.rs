use glam::Vec2;

/// Absolute cursor position rebuilt from raw mouse motion.
///
/// While the pointer is captured the window reports relative motion only;
/// summing it gives the unbounded position a hidden, grabbed cursor would
/// have, which is what the camera's look input expects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VirtualCursor {
    position: Vec2,
}

impl VirtualCursor {
    /// Start at the centre of a `width` x `height` window.
    pub fn centered(width: u32, height: u32) -> Self {
        Self {
            position: Vec2::new(width as f32 / 2.0, height as f32 / 2.0),
        }
    }

    /// Add a raw motion delta and return the new position.
    pub fn accumulate(&mut self, dx: f64, dy: f64) -> Vec2 {
        self.position += Vec2::new(dx as f32, dy as f32);
        self.position
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }
}
