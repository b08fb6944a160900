use crate::backend::RenderBackend;
use glyphstage_common::Viewport;
use glyphstage_scene::PerspectiveCamera;

/// What a resize event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeOutcome {
    /// New dimensions accepted; camera and backend updated.
    Applied(Viewport),
    /// Same dimensions as the current viewport; nothing to do.
    Unchanged,
    /// Zero-area event rejected; nothing touched.
    Ignored,
}

/// Keeps camera projection and backend surface consistent with the host
/// window.
///
/// Two states: before the first accepted event the handler holds the
/// startup viewport; afterwards, the dimensions of the most recent event.
/// The camera aspect is written before the backend surface is resized, so
/// a tick that observes the new surface also observes the new projection.
#[derive(Debug)]
pub struct ViewportHandler {
    current: Viewport,
}

impl ViewportHandler {
    pub fn new(initial: Viewport) -> Self {
        Self { current: initial }
    }

    pub fn viewport(&self) -> Viewport {
        self.current
    }

    /// React to a host "viewport changed" event.
    ///
    /// Zero-dimension events (minimized window) are rejected without
    /// touching the camera; repeated events with the current dimensions
    /// are no-ops.
    pub fn apply(
        &mut self,
        camera: &mut PerspectiveCamera,
        backend: &mut dyn RenderBackend,
        width: u32,
        height: u32,
    ) -> ResizeOutcome {
        if width == 0 || height == 0 {
            tracing::warn!(width, height, "ignoring zero-area resize event");
            return ResizeOutcome::Ignored;
        }

        let next = Viewport::new(width, height);
        if next == self.current {
            return ResizeOutcome::Unchanged;
        }

        // Projection first, then the surface.
        camera.set_aspect(next.aspect_ratio());
        backend.resize(next);
        self.current = next;

        tracing::debug!(width, height, aspect = next.aspect_ratio(), "viewport resized");
        ResizeOutcome::Applied(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::HeadlessBackend;

    fn fixture(width: u32, height: u32) -> (ViewportHandler, PerspectiveCamera, HeadlessBackend) {
        let viewport = Viewport::new(width, height);
        let camera = PerspectiveCamera::new(viewport.aspect_ratio());
        (ViewportHandler::new(viewport), camera, HeadlessBackend::new())
    }

    #[test]
    fn accepted_resize_sets_exact_aspect() {
        let (mut handler, mut camera, mut backend) = fixture(800, 600);
        assert_eq!(camera.aspect, 800.0 / 600.0);

        let outcome = handler.apply(&mut camera, &mut backend, 1600, 900);
        assert_eq!(outcome, ResizeOutcome::Applied(Viewport::new(1600, 900)));
        assert_eq!(camera.aspect, 1600.0 / 900.0);
        assert_eq!(backend.resizes(), &[Viewport::new(1600, 900)]);
    }

    #[test]
    fn identical_event_is_idempotent() {
        let (mut handler, mut camera, mut backend) = fixture(800, 600);

        handler.apply(&mut camera, &mut backend, 1024, 768);
        let projection = camera.projection_matrix();

        let outcome = handler.apply(&mut camera, &mut backend, 1024, 768);
        assert_eq!(outcome, ResizeOutcome::Unchanged);
        // Projection state is bit-identical to the single-event case.
        assert_eq!(camera.projection_matrix(), projection);
        assert_eq!(backend.resizes().len(), 1);
    }

    #[test]
    fn zero_area_event_is_rejected() {
        let (mut handler, mut camera, mut backend) = fixture(800, 600);
        let aspect_before = camera.aspect;

        assert_eq!(
            handler.apply(&mut camera, &mut backend, 0, 0),
            ResizeOutcome::Ignored
        );
        assert_eq!(
            handler.apply(&mut camera, &mut backend, 1920, 0),
            ResizeOutcome::Ignored
        );
        assert_eq!(camera.aspect, aspect_before);
        assert!(backend.resizes().is_empty());
        assert_eq!(handler.viewport(), Viewport::new(800, 600));
    }

    #[test]
    fn resize_event_is_reentrant() {
        let (mut handler, mut camera, mut backend) = fixture(800, 600);

        handler.apply(&mut camera, &mut backend, 1024, 768);
        handler.apply(&mut camera, &mut backend, 1600, 900);
        handler.apply(&mut camera, &mut backend, 640, 480);

        assert_eq!(camera.aspect, 640.0 / 480.0);
        assert_eq!(handler.viewport(), Viewport::new(640, 480));
        assert_eq!(backend.resizes().len(), 3);
    }
}
