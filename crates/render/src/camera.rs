use glam::{Mat4, Vec2, Vec3};
use voxel_common::CameraConfig;
use voxel_input::{Action, MoveKeys};

use crate::renderer::FrameView;

/// Pitch limit in degrees. Looking straight up or down would make `front`
/// parallel to `up` and collapse the view basis.
pub const PITCH_LIMIT: f32 = 89.0;
pub const MIN_FOV: f32 = 1.0;
pub const MAX_FOV: f32 = 45.0;

/// Free-fly camera driven by directional keys, cursor motion and scroll.
///
/// Angles are kept in degrees. Camera state lives with the host's frame
/// loop; nothing here is global.
#[derive(Debug, Clone, PartialEq)]
pub struct FlyCamera {
    pub position: Vec3,
    front: Vec3,
    pub up: Vec3,
    fov: f32,
    yaw: f32,
    pitch: f32,
    /// World units per second.
    pub movement_sensitivity: f32,
    /// Degrees per pixel of cursor travel.
    pub look_sensitivity: f32,
    last_cursor: Vec2,
    first_sample: bool,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for FlyCamera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default(), 800.0 / 600.0)
    }
}

impl FlyCamera {
    /// Build a camera looking along `front`.
    ///
    /// Yaw and pitch are recovered from `front`, then `front` is rebuilt from
    /// them so it is unit length and respects the pitch limit.
    pub fn new(
        position: Vec3,
        front: Vec3,
        up: Vec3,
        fov: f32,
        movement_sensitivity: f32,
        look_sensitivity: f32,
    ) -> Self {
        let dir = front.try_normalize().unwrap_or(Vec3::NEG_Z);
        let yaw = dir.z.atan2(dir.x).to_degrees();
        let pitch = dir.y.clamp(-1.0, 1.0).asin().to_degrees();

        let mut camera = Self {
            position,
            front: dir,
            up,
            fov: fov.clamp(MIN_FOV, MAX_FOV),
            yaw,
            pitch: pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
            movement_sensitivity,
            look_sensitivity,
            last_cursor: Vec2::new(400.0, 300.0),
            first_sample: true,
            aspect: 800.0 / 600.0,
            near: 0.1,
            far: 100.0,
        };
        camera.update_vectors();
        camera
    }

    pub fn from_config(config: &CameraConfig, aspect: f32) -> Self {
        let mut camera = Self::new(
            config.position,
            config.front,
            config.up,
            config.fov,
            config.movement_sensitivity,
            config.look_sensitivity,
        );
        camera.aspect = aspect;
        camera.near = config.near;
        camera.far = config.far;
        camera
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn right(&self) -> Vec3 {
        self.front.cross(self.up).normalize_or_zero()
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Vertical field of view in degrees.
    pub fn fov(&self) -> f32 {
        self.fov
    }

    /// Displace along `front` and its right vector for each held key.
    pub fn apply_movement(&mut self, keys: MoveKeys, elapsed_seconds: f32) {
        let speed = self.movement_sensitivity * elapsed_seconds;
        if keys.forward {
            self.position += self.front * speed;
        }
        if keys.backward {
            self.position -= self.front * speed;
        }
        if keys.left {
            self.position -= self.right() * speed;
        }
        if keys.right {
            self.position += self.right() * speed;
        }
    }

    /// Rotate from an absolute cursor position.
    ///
    /// The first sample only seeds the last cursor position. Screen-space y
    /// grows downward while pitch grows upward, hence the inverted delta.
    pub fn apply_look_delta(&mut self, cursor_x: f32, cursor_y: f32) {
        let cursor = Vec2::new(cursor_x, cursor_y);
        if self.first_sample {
            self.last_cursor = cursor;
            self.first_sample = false;
        }

        let x_offset = (cursor.x - self.last_cursor.x) * self.look_sensitivity;
        let y_offset = (self.last_cursor.y - cursor.y) * self.look_sensitivity;
        self.last_cursor = cursor;

        self.yaw += x_offset;
        self.pitch = (self.pitch + y_offset).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_vectors();
    }

    /// Treat the next cursor sample as the first one again.
    ///
    /// Used when the pointer is re-captured after having been released, so
    /// the jump across the gap is not read as a rotation.
    pub fn reset_look(&mut self) {
        self.first_sample = true;
    }

    /// Narrow (positive scroll) or widen the field of view.
    pub fn apply_zoom_delta(&mut self, scroll_y: f32) {
        self.fov = (self.fov - scroll_y).clamp(MIN_FOV, MAX_FOV);
    }

    /// Dispatch a camera-affecting action. Other actions are ignored.
    pub fn apply(&mut self, action: &Action, elapsed_seconds: f32) {
        match *action {
            Action::Move(keys) => self.apply_movement(keys, elapsed_seconds),
            Action::Look { x, y } => self.apply_look_delta(x, y),
            Action::Zoom(scroll_y) => self.apply_zoom_delta(scroll_y),
            Action::ToggleOverlay | Action::Quit => {}
        }
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    /// Right-handed look-at transform from `position` toward `position + front`.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), self.aspect, self.near, self.far)
    }

    /// Snapshot of everything the renderer needs for one frame.
    pub fn frame_view(&self) -> FrameView {
        FrameView {
            view: self.view_matrix(),
            projection: self.projection_matrix(),
            position: self.position,
            front: self.front,
            fov_degrees: self.fov,
        }
    }

    fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos())
            .normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use voxel_input::Key;

    fn camera() -> FlyCamera {
        FlyCamera::new(Vec3::new(0.0, 0.0, 3.0), Vec3::NEG_Z, Vec3::Y, 45.0, 2.5, 0.1)
    }

    #[test]
    fn default_camera_looks_down_negative_z() {
        let cam = FlyCamera::default();
        assert_relative_eq!(cam.yaw(), -90.0, epsilon = 1e-4);
        assert_relative_eq!(cam.pitch(), 0.0, epsilon = 1e-4);
        assert_relative_eq!(cam.front().z, -1.0, epsilon = 1e-6);
        assert_relative_eq!(cam.front().x, 0.0, epsilon = 1e-6);
        let vp = cam.projection_matrix() * cam.view_matrix();
        assert!(!vp.col(0).x.is_nan());
    }

    #[test]
    fn first_look_sample_only_seeds() {
        let mut cam = camera();
        let (yaw, pitch) = (cam.yaw(), cam.pitch());
        cam.apply_look_delta(300.0, 200.0);
        assert_eq!(cam.yaw(), yaw);
        assert_eq!(cam.pitch(), pitch);
    }

    #[test]
    fn second_look_sample_rotates_yaw() {
        let mut cam = camera();
        let yaw = cam.yaw();
        cam.apply_look_delta(300.0, 200.0);
        cam.apply_look_delta(310.0, 200.0);
        assert_relative_eq!(cam.yaw() - yaw, 10.0 * 0.1, epsilon = 1e-4);
        assert_eq!(cam.pitch(), 0.0);
    }

    #[test]
    fn cursor_moving_up_pitches_up() {
        let mut cam = camera();
        cam.apply_look_delta(400.0, 300.0);
        cam.apply_look_delta(400.0, 250.0);
        assert_relative_eq!(cam.pitch(), 5.0, epsilon = 1e-4);
        assert!(cam.front().y > 0.0);
    }

    #[test]
    fn reset_look_reseeds() {
        let mut cam = camera();
        cam.apply_look_delta(0.0, 0.0);
        cam.reset_look();
        let yaw = cam.yaw();
        cam.apply_look_delta(5000.0, 5000.0);
        assert_eq!(cam.yaw(), yaw);
    }

    #[test]
    fn pitch_stays_clamped_for_any_accumulation() {
        for &step in &[-100_000.0_f32, -900.0, -3.0, 0.5, 7.0, 1200.0, 1.0e6] {
            let mut cam = camera();
            cam.apply_look_delta(0.0, 0.0);
            let mut y = 0.0;
            for _ in 0..50 {
                y += step;
                cam.apply_look_delta(0.0, y);
                assert!(cam.pitch() >= -PITCH_LIMIT && cam.pitch() <= PITCH_LIMIT);
            }
        }
    }

    #[test]
    fn front_is_unit_length_for_any_orientation() {
        let mut cam = camera();
        cam.apply_look_delta(0.0, 0.0);
        let mut x = 0.0;
        let mut y = 0.0;
        for i in 0..200 {
            x += (i as f32 * 37.0) % 251.0 - 125.0;
            y += (i as f32 * 53.0) % 199.0 - 99.0;
            cam.apply_look_delta(x, y);
            assert_relative_eq!(cam.front().length(), 1.0, epsilon = 1e-5);
            assert!(!cam.view_matrix().col(3).x.is_nan());
        }
    }

    #[test]
    fn zoom_clamps_to_range() {
        let mut cam = camera();
        cam.apply_zoom_delta(100.0);
        assert_eq!(cam.fov(), 1.0);
        cam.apply_zoom_delta(-100.0);
        assert_eq!(cam.fov(), 45.0);
        cam.apply_zoom_delta(2.0);
        assert_eq!(cam.fov(), 43.0);
    }

    #[test]
    fn construction_clamps_fov() {
        let cam = FlyCamera::new(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y, 60.0, 1.0, 0.1);
        assert_eq!(cam.fov(), 45.0);
    }

    #[test]
    fn movement_follows_front_and_right() {
        let mut cam = camera();
        let mut keys = MoveKeys::default();
        keys.press(Key::Forward);
        cam.apply_movement(keys, 1.0);
        assert_relative_eq!(cam.position.z, 3.0 - 2.5, epsilon = 1e-5);

        let mut keys = MoveKeys::default();
        keys.press(Key::Right);
        cam.apply_movement(keys, 2.0);
        assert_relative_eq!(cam.position.x, 5.0, epsilon = 1e-5);

        keys.release(Key::Right);
        keys.press(Key::Left);
        cam.apply_movement(keys, 2.0);
        assert_relative_eq!(cam.position.x, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn opposite_keys_cancel() {
        let mut cam = camera();
        let start = cam.position;
        let mut keys = MoveKeys::default();
        keys.press(Key::Forward);
        keys.press(Key::Backward);
        cam.apply_movement(keys, 0.5);
        assert_relative_eq!(cam.position.distance(start), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn view_matrix_moves_eye_to_origin() {
        let cam = camera();
        let eye = cam.view_matrix().transform_point3(cam.position);
        assert_relative_eq!(eye.length(), 0.0, epsilon = 1e-5);
        let ahead = cam.view_matrix().transform_point3(cam.position + cam.front());
        assert_relative_eq!(ahead.z, -1.0, epsilon = 1e-5);
    }

    #[test]
    fn apply_dispatches_actions() {
        let mut cam = camera();
        cam.apply(&Action::Zoom(5.0), 0.016);
        assert_eq!(cam.fov(), 40.0);
        cam.apply(&Action::Quit, 0.016);
        assert_eq!(cam.fov(), 40.0);
    }

    #[test]
    fn aspect_guards_zero_height() {
        let mut cam = camera();
        cam.set_aspect(1280, 0);
        assert_eq!(cam.aspect, 1280.0);
    }
}
