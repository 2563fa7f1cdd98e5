use crate::keys::MoveKeys;

/// A high-level action the host produces from raw window events.
///
/// The camera consumes actions as plain numbers and never sees the
/// windowing library's event types.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Directional keys held this frame.
    Move(MoveKeys),
    /// Absolute cursor position in window pixels.
    Look { x: f32, y: f32 },
    /// Vertical scroll delta, in lines.
    Zoom(f32),
    /// Toggle the debug overlay.
    ToggleOverlay,
    /// Close the window.
    Quit,
}
