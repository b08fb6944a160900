use glyphstage_common::Viewport;
use glyphstage_scene::{PerspectiveCamera, Scene};

/// Errors a backend can report.
///
/// `Init` only occurs during backend construction; the other variants are
/// per-draw and recoverable by the frame loop.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("backend initialization failed: {reason}")]
    Init { reason: String },
    #[error("output surface unavailable: {reason}")]
    SurfaceUnavailable { reason: String },
    #[error("draw failed: {reason}")]
    Draw { reason: String },
}

/// The renderer collaborator: draws a scene from a camera's viewpoint and
/// tracks the output surface size.
///
/// Backends never mutate the scene or the camera.
pub trait RenderBackend {
    /// Draw one frame.
    fn render(
        &mut self,
        scene: &Scene,
        camera: &PerspectiveCamera,
    ) -> Result<(), RenderError>;

    /// Adopt a new output surface size.
    fn resize(&mut self, viewport: Viewport);
}

/// Backend without a GPU: records every call it receives.
///
/// Drives the frame loop in the CLI and in tests. Draw failures can be
/// scripted per draw index to exercise the driver's recovery path.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    draws: u64,
    resizes: Vec<Viewport>,
    fail_on: Vec<u64>,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the n-th draw (1-based) fail.
    pub fn fail_on_draw(mut self, n: u64) -> Self {
        self.fail_on.push(n);
        self
    }

    /// Number of draw attempts received.
    pub fn draws(&self) -> u64 {
        self.draws
    }

    pub fn resizes(&self) -> &[Viewport] {
        &self.resizes
    }
}

impl RenderBackend for HeadlessBackend {
    fn render(
        &mut self,
        _scene: &Scene,
        _camera: &PerspectiveCamera,
    ) -> Result<(), RenderError> {
        self.draws += 1;
        if self.fail_on.contains(&self.draws) {
            return Err(RenderError::Draw {
                reason: format!("scripted failure on draw {}", self.draws),
            });
        }
        Ok(())
    }

    fn resize(&mut self, viewport: Viewport) {
        self.resizes.push(viewport);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphstage_common::Color;
    use glyphstage_scene::AmbientLight;

    fn empty_scene() -> Scene {
        Scene {
            background: Color::BLACK,
            ambient: AmbientLight::default(),
            lights: Vec::new(),
            nodes: Vec::new(),
        }
    }

    #[test]
    fn headless_backend_counts_draws() {
        let mut backend = HeadlessBackend::new();
        let scene = empty_scene();
        let camera = PerspectiveCamera::default();
        for _ in 0..3 {
            backend.render(&scene, &camera).unwrap();
        }
        assert_eq!(backend.draws(), 3);
    }

    #[test]
    fn scripted_failure_hits_the_right_draw() {
        let mut backend = HeadlessBackend::new().fail_on_draw(2);
        let scene = empty_scene();
        let camera = PerspectiveCamera::default();
        assert!(backend.render(&scene, &camera).is_ok());
        assert!(backend.render(&scene, &camera).is_err());
        assert!(backend.render(&scene, &camera).is_ok());
    }
}
