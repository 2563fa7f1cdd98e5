/// Logical keys the viewer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Forward,
    Backward,
    Left,
    Right,
    ToggleOverlay,
    Quit,
}

impl Key {
    /// Directional keys, in the order the camera applies them.
    pub const MOVEMENT: [Key; 4] = [Key::Forward, Key::Backward, Key::Left, Key::Right];

    pub fn is_movement(self) -> bool {
        Self::MOVEMENT.contains(&self)
    }
}

/// Set of directional keys currently held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveKeys {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

impl MoveKeys {
    pub fn press(&mut self, key: Key) {
        self.set(key, true);
    }

    pub fn release(&mut self, key: Key) {
        self.set(key, false);
    }

    /// Record a key state change. Non-directional keys are ignored.
    pub fn set(&mut self, key: Key, pressed: bool) {
        match key {
            Key::Forward => self.forward = pressed,
            Key::Backward => self.backward = pressed,
            Key::Left => self.left = pressed,
            Key::Right => self.right = pressed,
            Key::ToggleOverlay | Key::Quit => {}
        }
    }

    pub fn contains(&self, key: Key) -> bool {
        match key {
            Key::Forward => self.forward,
            Key::Backward => self.backward,
            Key::Left => self.left,
            Key::Right => self.right,
            Key::ToggleOverlay | Key::Quit => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.forward || self.backward || self.left || self.right)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_and_release() {
        let mut keys = MoveKeys::default();
        assert!(keys.is_empty());
        keys.press(Key::Left);
        assert!(keys.contains(Key::Left));
        assert!(!keys.contains(Key::Right));
        keys.release(Key::Left);
        assert!(keys.is_empty());
    }

    #[test]
    fn non_movement_keys_are_ignored() {
        let mut keys = MoveKeys::default();
        keys.press(Key::Quit);
        keys.press(Key::ToggleOverlay);
        assert!(keys.is_empty());
        assert!(!Key::Quit.is_movement());
        assert!(Key::Backward.is_movement());
    }

    #[test]
    fn clear_releases_everything() {
        let mut keys = MoveKeys::default();
        for key in Key::MOVEMENT {
            keys.press(key);
        }
        assert!(!keys.is_empty());
        keys.clear();
        assert!(keys.is_empty());
    }
}
