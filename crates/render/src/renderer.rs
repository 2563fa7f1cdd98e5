use glam::{Mat4, Vec3};

/// Per-frame camera output handed to a renderer.
///
/// Plain numeric matrices; no graphics-API types cross this boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameView {
    pub view: Mat4,
    pub projection: Mat4,
    /// Camera position in world space.
    pub position: Vec3,
    /// Unit look direction.
    pub front: Vec3,
    /// Field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for FrameView {
    fn default() -> Self {
        Self {
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            position: Vec3::ZERO,
            front: Vec3::NEG_Z,
            fov_degrees: 45.0,
        }
    }
}

/// Interface for renderers that produce output from the frame view alone.
///
/// A renderer reads the frame view and the cube's model transform and
/// produces output. It never mutates camera state. The wgpu backend is not
/// one of these: it also needs a device, queue and target view, and takes
/// the same [`FrameView`] directly.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render(&self, view: &FrameView, model: Mat4) -> Self::Output;
}

/// Text renderer for the CLI, logs and tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, view: &FrameView, model: Mat4) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "Camera: pos=({:.2}, {:.2}, {:.2}) front=({:.3}, {:.3}, {:.3}) fov={:.1}\n",
            view.position.x,
            view.position.y,
            view.position.z,
            view.front.x,
            view.front.y,
            view.front.z,
            view.fov_degrees
        ));
        for (label, m) in [("view", view.view), ("model", model)] {
            out.push_str(&format!("{label}:\n"));
            for row in 0..4 {
                let r = m.row(row);
                out.push_str(&format!(
                    "  [{:8.3} {:8.3} {:8.3} {:8.3}]\n",
                    r.x, r.y, r.z, r.w
                ));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_renderer_reports_camera() {
        let view = FrameView {
            position: Vec3::new(1.0, 2.0, 3.0),
            fov_degrees: 30.0,
            ..FrameView::default()
        };
        let output = DebugTextRenderer::new().render(&view, Mat4::IDENTITY);
        assert!(output.contains("pos=(1.00, 2.00, 3.00)"));
        assert!(output.contains("fov=30.0"));
        assert!(output.contains("view:"));
        assert!(output.contains("model:"));
    }

    #[test]
    fn debug_renderer_prints_four_rows_per_matrix() {
        let output = DebugTextRenderer::new().render(&FrameView::default(), Mat4::IDENTITY);
        assert_eq!(output.lines().filter(|l| l.trim_start().starts_with('[')).count(), 8);
    }
}
