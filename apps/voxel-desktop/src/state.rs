use egui::Context as EguiContext;
use std::time::Instant;
use voxel_atlas::TextureAtlas;
use voxel_common::ViewerConfig;
use voxel_input::{Action, Key, MoveKeys, VirtualCursor};
use voxel_render::{FlyCamera, FrameView, model_matrix};
use winit::event::MouseScrollDelta;
use winit::keyboard::KeyCode;

/// Pixel-precise scroll deltas (touchpads) are converted to wheel lines.
const PIXELS_PER_LINE: f64 = 20.0;

/// Longest frame step fed to the camera, so a stall doesn't teleport it.
const MAX_FRAME_STEP: f32 = 0.1;

/// Map a physical key to the viewer's logical key.
pub fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::KeyW => Some(Key::Forward),
        KeyCode::KeyS => Some(Key::Backward),
        KeyCode::KeyA => Some(Key::Left),
        KeyCode::KeyD => Some(Key::Right),
        KeyCode::F1 => Some(Key::ToggleOverlay),
        KeyCode::Escape => Some(Key::Quit),
        _ => None,
    }
}

/// Vertical scroll in wheel lines.
pub fn scroll_lines(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y,
        MouseScrollDelta::PixelDelta(pos) => (pos.y / PIXELS_PER_LINE) as f32,
    }
}

/// Everything the frame loop mutates, owned by the application.
pub struct ViewerState {
    pub config: ViewerConfig,
    pub camera: FlyCamera,
    pub atlas: TextureAtlas,
    move_keys: MoveKeys,
    cursor: VirtualCursor,
    pub mouse_captured: bool,
    pub show_overlay: bool,
    started: Instant,
    last_frame: Instant,
    frame_time: f32,
}

impl ViewerState {
    pub fn new(config: ViewerConfig) -> Self {
        let camera = FlyCamera::from_config(&config.camera, config.window.aspect_ratio());
        let atlas = TextureAtlas::build_default(config.atlas.tile_size);
        let cursor = VirtualCursor::centered(config.window.width, config.window.height);
        let now = Instant::now();
        Self {
            config,
            camera,
            atlas,
            move_keys: MoveKeys::default(),
            cursor,
            mouse_captured: false,
            show_overlay: false,
            started: now,
            last_frame: now,
            frame_time: 0.0,
        }
    }

    /// Record a key change. Returns the action a press triggers, if any.
    pub fn handle_key(&mut self, key: Key, pressed: bool) -> Option<Action> {
        if key.is_movement() {
            self.move_keys.set(key, pressed);
            return None;
        }
        if !pressed {
            return None;
        }
        match key {
            Key::Quit => Some(Action::Quit),
            Key::ToggleOverlay => {
                self.show_overlay = !self.show_overlay;
                Some(Action::ToggleOverlay)
            }
            _ => None,
        }
    }

    /// Held directional keys as WASD letters, for the overlay.
    pub fn held_keys_label(&self) -> String {
        let held: String = Key::MOVEMENT
            .into_iter()
            .filter(|key| self.move_keys.contains(*key))
            .map(|key| match key {
                Key::Forward => 'W',
                Key::Backward => 'S',
                Key::Left => 'A',
                _ => 'D',
            })
            .collect();
        if held.is_empty() { "-".to_owned() } else { held }
    }

    /// Feed raw pointer motion while the cursor is captured.
    pub fn handle_mouse_motion(&mut self, dx: f64, dy: f64) {
        if !self.mouse_captured {
            return;
        }
        let p = self.cursor.accumulate(dx, dy);
        self.camera.apply(&Action::Look { x: p.x, y: p.y }, 0.0);
    }

    pub fn handle_scroll(&mut self, delta: MouseScrollDelta) {
        self.camera.apply(&Action::Zoom(scroll_lines(delta)), 0.0);
    }

    pub fn set_captured(&mut self, captured: bool) {
        if captured && !self.mouse_captured {
            self.camera.reset_look();
        }
        if !captured {
            self.move_keys.clear();
        }
        self.mouse_captured = captured;
    }

    /// Advance one frame using the wall clock.
    pub fn tick(&mut self) {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32().min(MAX_FRAME_STEP);
        self.last_frame = now;
        self.update(dt);
    }

    pub fn update(&mut self, dt: f32) {
        self.frame_time = dt;
        self.camera.apply(&Action::Move(self.move_keys), dt);
    }

    pub fn frame_view(&self) -> FrameView {
        self.camera.frame_view()
    }

    /// Model transform of the spinning cube for the current frame.
    pub fn model(&self) -> glam::Mat4 {
        model_matrix(self.started.elapsed().as_secs_f32())
    }

    pub fn draw_ui(&self, ctx: &EguiContext) {
        if !self.show_overlay {
            return;
        }

        let cam = &self.camera;
        egui::Window::new("Camera")
            .default_pos([10.0, 10.0])
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(format!(
                    "Position: ({:.2}, {:.2}, {:.2})",
                    cam.position.x, cam.position.y, cam.position.z
                ));
                ui.label(format!("Yaw: {:.1}  Pitch: {:.1}", cam.yaw(), cam.pitch()));
                ui.label(format!("FOV: {:.1}", cam.fov()));
                let cursor = self.cursor.position();
                ui.label(format!("Cursor: ({:.0}, {:.0})", cursor.x, cursor.y));
                ui.label(format!("Keys: {}", self.held_keys_label()));
                if self.frame_time > 0.0 {
                    ui.label(format!(
                        "Frame: {:.2} ms ({:.0} fps)",
                        self.frame_time * 1000.0,
                        1.0 / self.frame_time
                    ));
                }
                ui.separator();
                ui.label(format!("Atlas tile: {} px", self.atlas.tile_size()));
                for (texture, offset) in self.atlas.iter() {
                    ui.label(format!("  {texture}: ({}, {})", offset.x, offset.y));
                }
                ui.separator();
                ui.small("WASD: Move | Mouse: Look | Wheel: Zoom | F1: Overlay | Esc: Quit");
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn maps_wasd_and_controls() {
        assert_eq!(map_key(KeyCode::KeyW), Some(Key::Forward));
        assert_eq!(map_key(KeyCode::KeyD), Some(Key::Right));
        assert_eq!(map_key(KeyCode::Escape), Some(Key::Quit));
        assert_eq!(map_key(KeyCode::KeyQ), None);
    }

    #[test]
    fn scroll_pixels_convert_to_lines() {
        let delta = MouseScrollDelta::PixelDelta(winit::dpi::PhysicalPosition::new(0.0, 40.0));
        assert_eq!(scroll_lines(delta), 2.0);
        assert_eq!(scroll_lines(MouseScrollDelta::LineDelta(0.0, -1.0)), -1.0);
    }

    #[test]
    fn held_key_moves_camera_each_update() {
        let mut state = ViewerState::new(ViewerConfig::default());
        let z = state.camera.position.z;
        state.handle_key(Key::Forward, true);
        state.update(0.5);
        assert_relative_eq!(state.camera.position.z, z - 1.25, epsilon = 1e-5);
        state.handle_key(Key::Forward, false);
        state.update(0.5);
        assert_relative_eq!(state.camera.position.z, z - 1.25, epsilon = 1e-5);
    }

    #[test]
    fn escape_requests_quit() {
        let mut state = ViewerState::new(ViewerConfig::default());
        assert_eq!(state.handle_key(Key::Quit, true), Some(Action::Quit));
        assert_eq!(state.handle_key(Key::Quit, false), None);
    }

    #[test]
    fn overlay_toggles() {
        let mut state = ViewerState::new(ViewerConfig::default());
        state.handle_key(Key::ToggleOverlay, true);
        assert!(state.show_overlay);
        state.handle_key(Key::ToggleOverlay, true);
        assert!(!state.show_overlay);
    }

    #[test]
    fn motion_ignored_until_captured() {
        let mut state = ViewerState::new(ViewerConfig::default());
        let yaw = state.camera.yaw();
        state.handle_mouse_motion(50.0, 0.0);
        state.handle_mouse_motion(50.0, 0.0);
        assert_eq!(state.camera.yaw(), yaw);

        state.set_captured(true);
        state.handle_mouse_motion(50.0, 0.0);
        assert_eq!(state.camera.yaw(), yaw);
        state.handle_mouse_motion(50.0, 0.0);
        assert_relative_eq!(state.camera.yaw(), yaw + 5.0, epsilon = 1e-4);
    }

    #[test]
    fn scroll_zooms_camera() {
        let mut state = ViewerState::new(ViewerConfig::default());
        state.handle_scroll(MouseScrollDelta::LineDelta(0.0, 3.0));
        assert_eq!(state.camera.fov(), 42.0);
    }

    #[test]
    fn held_keys_label_lists_movement_keys() {
        let mut state = ViewerState::new(ViewerConfig::default());
        assert_eq!(state.held_keys_label(), "-");
        state.handle_key(Key::Right, true);
        state.handle_key(Key::Forward, true);
        state.handle_key(Key::Quit, true);
        assert_eq!(state.held_keys_label(), "WD");
        state.handle_key(Key::Forward, false);
        assert_eq!(state.held_keys_label(), "D");
    }

    #[test]
    fn releasing_capture_drops_held_keys() {
        let mut state = ViewerState::new(ViewerConfig::default());
        state.set_captured(true);
        state.handle_key(Key::Left, true);
        state.set_captured(false);
        let x = state.camera.position.x;
        state.update(1.0);
        assert_eq!(state.camera.position.x, x);
    }
}
