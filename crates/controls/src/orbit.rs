use glam::{Vec2, Vec3};
use std::f32::consts::PI;

/// Below this magnitude a pending delta is considered settled and zeroed.
const REST_EPSILON: f32 = 1e-5;

/// Orbit camera controls: rotate around a target point, zoom along the
/// view axis, pan in the view plane.
///
/// Pointer input accumulates into pending deltas; [`OrbitControls::update`]
/// applies one exponential-decay smoothing step per frame, so motion eases
/// out over several frames after the pointer stops.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Vec3,
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
    /// Fraction of each pending delta applied per frame, in (0, 1].
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pending_rotate: Vec2,
    pending_zoom: f32,
    pending_pan: Vec2,
}

impl OrbitControls {
    pub fn new(target: Vec3, distance: f32) -> Self {
        Self {
            target,
            distance,
            yaw: 0.0,
            pitch: -0.2,
            damping_factor: 0.1,
            rotate_speed: 0.005,
            zoom_speed: 0.1,
            min_distance: 0.5,
            max_distance: 500.0,
            pending_rotate: Vec2::ZERO,
            pending_zoom: 0.0,
            pending_pan: Vec2::ZERO,
        }
    }

    /// Orbit state that reproduces an existing eye/target pose.
    pub fn from_pose(target: Vec3, eye: Vec3) -> Self {
        let offset = eye - target;
        let distance = offset.length().max(1e-4);
        let mut controls = Self::new(target, distance);
        controls.pitch = (offset.y / distance).clamp(-1.0, 1.0).asin();
        controls.yaw = offset.x.atan2(offset.z);
        controls
    }

    /// Accumulate a pointer-drag rotation in screen pixels.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.pending_rotate += Vec2::new(dx, dy) * self.rotate_speed;
    }

    /// Accumulate a scroll-wheel zoom step. Positive moves closer.
    pub fn zoom(&mut self, delta: f32) {
        self.pending_zoom += delta * self.zoom_speed;
    }

    /// Accumulate a view-plane pan in screen pixels.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.pending_pan += Vec2::new(dx, dy);
    }

    /// Apply one damping step. Returns true if the camera moved.
    ///
    /// Each pending delta contributes `delta * damping_factor` this frame
    /// and decays by the same fraction, so releasing the pointer leaves the
    /// camera gliding to rest instead of stopping dead.
    pub fn update(&mut self) -> bool {
        let step_rotate = self.pending_rotate * self.damping_factor;
        let step_zoom = self.pending_zoom * self.damping_factor;
        let step_pan = self.pending_pan * self.damping_factor;

        let moved = step_rotate.length_squared() > REST_EPSILON * REST_EPSILON
            || step_zoom.abs() > REST_EPSILON
            || step_pan.length_squared() > REST_EPSILON * REST_EPSILON;

        if moved {
            self.yaw -= step_rotate.x;
            self.pitch = (self.pitch - step_rotate.y)
                .clamp(-PI / 2.0 + 0.01, PI / 2.0 - 0.01);
            self.distance = (self.distance * (1.0 - step_zoom))
                .clamp(self.min_distance, self.max_distance);

            let pan_scale = self.distance * 0.001;
            let forward = (self.target - self.eye()).normalize_or_zero();
            let right = forward.cross(Vec3::Y).normalize_or_zero();
            let up = right.cross(forward);
            self.target += right * step_pan.x * pan_scale + up * step_pan.y * pan_scale;
        }

        let retain = 1.0 - self.damping_factor;
        self.pending_rotate *= retain;
        self.pending_zoom *= retain;
        self.pending_pan *= retain;
        if self.pending_rotate.length_squared() < REST_EPSILON * REST_EPSILON {
            self.pending_rotate = Vec2::ZERO;
        }
        if self.pending_zoom.abs() < REST_EPSILON {
            self.pending_zoom = 0.0;
        }
        if self.pending_pan.length_squared() < REST_EPSILON * REST_EPSILON {
            self.pending_pan = Vec2::ZERO;
        }

        moved
    }

    /// Camera position implied by the current orbit state.
    pub fn eye(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    /// (eye, target) pair consumed by the camera each frame.
    pub fn view(&self) -> (Vec3, Vec3) {
        (self.eye(), self.target)
    }
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new(Vec3::ZERO, 10.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_update_reports_no_motion() {
        let mut controls = OrbitControls::default();
        assert!(!controls.update());
    }

    #[test]
    fn rotation_applies_over_several_frames() {
        let mut controls = OrbitControls::default();
        let start_yaw = controls.yaw;
        controls.rotate(100.0, 0.0);

        assert!(controls.update());
        let after_one = controls.yaw;
        assert_ne!(after_one, start_yaw);

        // Damping spreads the motion: the second frame still moves, less.
        assert!(controls.update());
        let first_step = (after_one - start_yaw).abs();
        let second_step = (controls.yaw - after_one).abs();
        assert!(second_step < first_step);
        assert!(second_step > 0.0);
    }

    #[test]
    fn pending_input_decays_to_rest() {
        let mut controls = OrbitControls::default();
        controls.rotate(50.0, 30.0);
        for _ in 0..200 {
            controls.update();
        }
        assert!(!controls.update());
    }

    #[test]
    fn pitch_stays_off_the_poles() {
        let mut controls = OrbitControls::default();
        for _ in 0..50 {
            controls.rotate(0.0, -10_000.0);
            controls.update();
        }
        assert!(controls.pitch < PI / 2.0);
        assert!(controls.pitch > -PI / 2.0);
    }

    #[test]
    fn zoom_respects_distance_limits() {
        let mut controls = OrbitControls::default();
        for _ in 0..500 {
            controls.zoom(10.0);
            controls.update();
        }
        assert!(controls.distance >= controls.min_distance);

        for _ in 0..500 {
            controls.zoom(-10.0);
            controls.update();
        }
        assert!(controls.distance <= controls.max_distance);
    }

    #[test]
    fn from_pose_reproduces_the_eye() {
        let target = Vec3::ZERO;
        let eye = Vec3::new(0.0, 2.0, 10.0);
        let controls = OrbitControls::from_pose(target, eye);
        assert!((controls.eye() - eye).length() < 1e-4);
    }

    #[test]
    fn eye_sits_at_orbit_distance() {
        let controls = OrbitControls::new(Vec3::new(1.0, 2.0, 3.0), 10.0);
        let eye = controls.eye();
        let d = (eye - controls.target).length();
        assert!((d - 10.0).abs() < 1e-4);
    }
}
