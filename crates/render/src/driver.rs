use crate::backend::{RenderBackend, RenderError};
use glyphstage_controls::OrbitControls;
use glyphstage_scene::{PerspectiveCamera, Scene};

/// What a single tick did.
#[derive(Debug)]
pub enum TickOutcome {
    /// Controls advanced and the draw succeeded.
    Rendered,
    /// Controls advanced but the draw failed; the loop keeps going.
    Faulted(RenderError),
    /// The loop has been stopped; nothing ran.
    Stopped,
}

/// The frame loop driver.
///
/// Each tick advances the controls by one damping step, feeds the
/// resulting pose to the camera, and issues exactly one draw call. The
/// host schedules ticks (one per display refresh); this type owns the
/// lifecycle around them.
///
/// The frame sequence is finite and cancellable: after [`FrameLoop::stop`]
/// every tick is a no-op. A failed draw is logged and counted, and the
/// next tick proceeds normally.
#[derive(Debug, Default)]
pub struct FrameLoop {
    stopped: bool,
    ticks: u64,
    frames_rendered: u64,
    draw_errors: u64,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one frame: controls damping step, camera pose update, draw.
    pub fn tick(
        &mut self,
        controls: &mut OrbitControls,
        camera: &mut PerspectiveCamera,
        scene: &Scene,
        backend: &mut dyn RenderBackend,
    ) -> TickOutcome {
        if self.stopped {
            return TickOutcome::Stopped;
        }
        self.ticks += 1;

        controls.update();
        let (eye, target) = controls.view();
        camera.set_view(eye, target);

        match backend.render(scene, camera) {
            Ok(()) => {
                self.frames_rendered += 1;
                TickOutcome::Rendered
            }
            Err(err) => {
                self.draw_errors += 1;
                tracing::error!(tick = self.ticks, error = %err, "draw failed, continuing");
                TickOutcome::Faulted(err)
            }
        }
    }

    /// End the frame sequence. Subsequent ticks do nothing.
    pub fn stop(&mut self) {
        if !self.stopped {
            self.stopped = true;
            tracing::info!(
                ticks = self.ticks,
                frames = self.frames_rendered,
                errors = self.draw_errors,
                "frame loop stopped"
            );
        }
    }

    pub fn is_running(&self) -> bool {
        !self.stopped
    }

    /// Ticks executed while running.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Successful draws.
    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Draws that failed and were recovered.
    pub fn draw_errors(&self) -> u64 {
        self.draw_errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::HeadlessBackend;
    use glyphstage_common::Color;
    use glyphstage_scene::AmbientLight;

    fn fixture() -> (OrbitControls, PerspectiveCamera, Scene) {
        let scene = Scene {
            background: Color::BLACK,
            ambient: AmbientLight::default(),
            lights: Vec::new(),
            nodes: Vec::new(),
        };
        (OrbitControls::default(), PerspectiveCamera::default(), scene)
    }

    #[test]
    fn n_ticks_means_n_draw_attempts() {
        let (mut controls, mut camera, scene) = fixture();
        let mut backend = HeadlessBackend::new();
        let mut frame_loop = FrameLoop::new();

        for _ in 0..7 {
            frame_loop.tick(&mut controls, &mut camera, &scene, &mut backend);
        }
        assert_eq!(backend.draws(), 7);
        assert_eq!(frame_loop.ticks(), 7);
        assert_eq!(frame_loop.frames_rendered(), 7);
        assert_eq!(frame_loop.draw_errors(), 0);
    }

    #[test]
    fn zero_ticks_zero_draws() {
        let (_, _, _) = fixture();
        let frame_loop = FrameLoop::new();
        assert_eq!(frame_loop.ticks(), 0);
        assert_eq!(frame_loop.frames_rendered(), 0);
    }

    #[test]
    fn failed_draw_does_not_halt_the_loop() {
        let (mut controls, mut camera, scene) = fixture();
        let mut backend = HeadlessBackend::new().fail_on_draw(3);
        let mut frame_loop = FrameLoop::new();

        let mut outcomes = Vec::new();
        for _ in 0..5 {
            outcomes.push(frame_loop.tick(&mut controls, &mut camera, &scene, &mut backend));
        }

        assert!(matches!(outcomes[0], TickOutcome::Rendered));
        assert!(matches!(outcomes[1], TickOutcome::Rendered));
        assert!(matches!(outcomes[2], TickOutcome::Faulted(_)));
        assert!(matches!(outcomes[3], TickOutcome::Rendered));
        assert!(matches!(outcomes[4], TickOutcome::Rendered));

        assert_eq!(frame_loop.frames_rendered(), 4);
        assert_eq!(frame_loop.draw_errors(), 1);
        assert_eq!(backend.draws(), 5);
    }

    #[test]
    fn stop_makes_ticks_inert() {
        let (mut controls, mut camera, scene) = fixture();
        let mut backend = HeadlessBackend::new();
        let mut frame_loop = FrameLoop::new();

        frame_loop.tick(&mut controls, &mut camera, &scene, &mut backend);
        frame_loop.stop();
        assert!(!frame_loop.is_running());

        let outcome = frame_loop.tick(&mut controls, &mut camera, &scene, &mut backend);
        assert!(matches!(outcome, TickOutcome::Stopped));
        assert_eq!(backend.draws(), 1);
        assert_eq!(frame_loop.ticks(), 1);
    }

    #[test]
    fn tick_advances_control_damping() {
        let (mut controls, mut camera, scene) = fixture();
        let mut backend = HeadlessBackend::new();
        let mut frame_loop = FrameLoop::new();

        controls.rotate(100.0, 0.0);
        let eye_before = camera.eye;
        frame_loop.tick(&mut controls, &mut camera, &scene, &mut backend);
        assert_ne!(camera.eye, eye_before);
        // The camera now reflects the controls' pose.
        assert_eq!(camera.eye, controls.eye());
    }
}
