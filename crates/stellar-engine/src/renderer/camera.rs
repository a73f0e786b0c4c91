use std::f32::consts::TAU;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::extensions::easing::{damp, ease_vec3, Easing};

/// GPU-side uniform data for the camera.
/// 16 floats of view-projection plus the eye position (w = 1).
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub eye: [f32; 4],
}

impl CameraUniform {
    pub const FLOATS: usize = 20;
}

/// Animated transition between two camera poses.
#[derive(Debug, Clone, Copy)]
struct Flight {
    from_eye: Vec3,
    to_eye: Vec3,
    from_target: Vec3,
    to_target: Vec3,
    elapsed: f32,
    duration: f32,
}

/// Damped orbit camera around a target point.
///
/// User input moves the desired spherical coordinates; the actual ones
/// chase them with exponential damping each update. A fly-to animation
/// overrides both until it completes.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Fraction of the remaining gap closed per 1/60 s.
    pub damping: f32,
    pub auto_rotate: bool,
    /// Auto-rotation rate in radians per second.
    pub auto_rotate_speed: f32,
    /// Radians of yaw/pitch per pixel of drag.
    pub rotate_speed: f32,
    /// Relative distance change per wheel unit.
    pub zoom_speed: f32,
    yaw: f32,
    pitch: f32,
    distance: f32,
    desired_yaw: f32,
    desired_pitch: f32,
    desired_distance: f32,
    flight: Option<Flight>,
}

const PITCH_LIMIT: f32 = 1.55;

impl OrbitCamera {
    /// Fly-to duration in seconds.
    pub const FLIGHT_SECONDS: f32 = 2.0;

    pub fn new(eye: Vec3, target: Vec3) -> Self {
        let mut cam = Self {
            target,
            fov: 75.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
            min_distance: 3.0,
            max_distance: 200.0,
            damping: 0.05,
            auto_rotate: false,
            auto_rotate_speed: TAU / 30.0,
            rotate_speed: 0.005,
            zoom_speed: 0.001,
            yaw: 0.0,
            pitch: 0.0,
            distance: 1.0,
            desired_yaw: 0.0,
            desired_pitch: 0.0,
            desired_distance: 1.0,
            flight: None,
        };
        cam.set_pose(eye, target);
        cam
    }

    pub fn with_fov(mut self, fov: f32) -> Self {
        self.fov = fov;
        self
    }

    pub fn with_distance_limits(mut self, min: f32, max: f32) -> Self {
        self.min_distance = min;
        self.max_distance = max.max(min);
        self.desired_distance = self.desired_distance.clamp(self.min_distance, self.max_distance);
        self.distance = self.distance.clamp(self.min_distance, self.max_distance);
        self
    }

    /// Snap to a pose with no animation.
    pub fn set_pose(&mut self, eye: Vec3, target: Vec3) {
        self.target = target;
        let offset = eye - target;
        let distance = offset.length().clamp(self.min_distance, self.max_distance);
        let (yaw, pitch) = if offset.length_squared() > 0.0 {
            let n = offset.normalize();
            (n.x.atan2(n.z), n.y.clamp(-1.0, 1.0).asin().clamp(-PITCH_LIMIT, PITCH_LIMIT))
        } else {
            (0.0, 0.0)
        };
        self.yaw = yaw;
        self.pitch = pitch;
        self.distance = distance;
        self.desired_yaw = yaw;
        self.desired_pitch = pitch;
        self.desired_distance = distance;
    }

    /// Eye position in world space.
    pub fn eye(&self) -> Vec3 {
        if let Some(f) = &self.flight {
            return ease_vec3(f.from_eye, f.to_eye, f.elapsed / f.duration, Easing::QuadInOut);
        }
        self.target + spherical(self.yaw, self.pitch, self.distance)
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn is_flying(&self) -> bool {
        self.flight.is_some()
    }

    /// Start a 2 s eased flight to a new pose.
    pub fn fly_to(&mut self, eye: Vec3, target: Vec3) {
        self.flight = Some(Flight {
            from_eye: self.eye(),
            to_eye: eye,
            from_target: self.current_target(),
            to_target: target,
            elapsed: 0.0,
            duration: Self::FLIGHT_SECONDS,
        });
    }

    /// Drag rotation in pixels. Cancels any flight in progress.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.land();
        self.desired_yaw -= dx * self.rotate_speed;
        self.desired_pitch = (self.desired_pitch + dy * self.rotate_speed).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Wheel zoom; positive moves away.
    pub fn zoom(&mut self, delta: f32) {
        self.land();
        let factor = (1.0 + delta * self.zoom_speed).max(0.1);
        self.desired_distance = (self.desired_distance * factor).clamp(self.min_distance, self.max_distance);
    }

    pub fn set_aspect(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.aspect = width / height;
        }
    }

    /// Advance damping, auto-rotation and flights by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        if let Some(f) = self.flight.as_mut() {
            f.elapsed = (f.elapsed + dt).min(f.duration);
            if f.elapsed >= f.duration {
                let (eye, target) = (f.to_eye, f.to_target);
                self.flight = None;
                self.set_pose(eye, target);
            }
            return;
        }

        if self.auto_rotate {
            self.desired_yaw += self.auto_rotate_speed * dt;
        }
        self.yaw = damp(self.yaw, self.desired_yaw, self.damping, dt);
        self.pitch = damp(self.pitch, self.desired_pitch, self.damping, dt);
        self.distance = damp(self.distance, self.desired_distance, self.damping, dt);

        // Keep yaw bounded for long sessions
        if self.yaw.abs() > TAU && self.desired_yaw.abs() > TAU {
            let turns = (self.yaw / TAU).trunc() * TAU;
            self.yaw -= turns;
            self.desired_yaw -= turns;
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.current_target(), Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn uniform(&self) -> CameraUniform {
        let eye = self.eye();
        CameraUniform {
            view_proj: (self.projection_matrix() * self.view_matrix()).to_cols_array_2d(),
            eye: [eye.x, eye.y, eye.z, 1.0],
        }
    }

    fn current_target(&self) -> Vec3 {
        match &self.flight {
            Some(f) => ease_vec3(f.from_target, f.to_target, f.elapsed / f.duration, Easing::QuadInOut),
            None => self.target,
        }
    }

    /// Abort a flight, keeping the pose reached so far.
    fn land(&mut self) {
        if self.flight.is_some() {
            let (eye, target) = (self.eye(), self.current_target());
            self.flight = None;
            self.set_pose(eye, target);
        }
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 2.0, 10.0), Vec3::ZERO)
    }
}

fn spherical(yaw: f32, pitch: f32, distance: f32) -> Vec3 {
    Vec3::new(
        pitch.cos() * yaw.sin(),
        pitch.sin(),
        pitch.cos() * yaw.cos(),
    ) * distance
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn default_pose_matches_initial_eye() {
        let cam = OrbitCamera::default();
        assert!(close(cam.eye(), Vec3::new(0.0, 2.0, 10.0)));
        assert_eq!(cam.fov, 75.0);
    }

    #[test]
    fn zoom_is_clamped_to_limits() {
        let mut cam = OrbitCamera::default();
        for _ in 0..200 {
            cam.zoom(-500.0);
        }
        for _ in 0..600 {
            cam.update(1.0 / 60.0);
        }
        assert!((cam.distance() - 3.0).abs() < 1e-2);

        for _ in 0..200 {
            cam.zoom(1000.0);
        }
        for _ in 0..2000 {
            cam.update(1.0 / 60.0);
        }
        assert!(cam.distance() <= 200.0);
        assert!(cam.distance() > 199.0);
    }

    #[test]
    fn fly_to_reaches_destination_in_two_seconds() {
        let mut cam = OrbitCamera::default();
        let planet = Vec3::new(10.0, 0.0, 0.0);
        let eye = planet + Vec3::new(5.0, 3.0, 5.0);
        cam.fly_to(eye, planet);

        cam.update(1.0);
        assert!(cam.is_flying());
        // Quad in-out is exactly halfway at t = 0.5
        let mid = Vec3::new(0.0, 2.0, 10.0).lerp(eye, 0.5);
        assert!(close(cam.eye(), mid));

        cam.update(1.0);
        assert!(!cam.is_flying());
        assert!(close(cam.eye(), eye));
        assert!(close(cam.target, planet));
    }

    #[test]
    fn orbit_cancels_flight() {
        let mut cam = OrbitCamera::default();
        cam.fly_to(Vec3::new(0.0, 5.0, 20.0), Vec3::ZERO);
        cam.update(0.5);
        cam.orbit(10.0, 0.0);
        assert!(!cam.is_flying());
    }

    #[test]
    fn auto_rotate_moves_eye_but_keeps_distance() {
        let mut cam = OrbitCamera::default();
        cam.auto_rotate = true;
        let d = cam.distance();
        let start = cam.eye();
        for _ in 0..120 {
            cam.update(1.0 / 60.0);
        }
        assert!(!close(cam.eye(), start));
        assert!((cam.distance() - d).abs() < 1e-3);
    }

    #[test]
    fn uniform_carries_eye() {
        let cam = OrbitCamera::default();
        let u = cam.uniform();
        assert!((u.eye[2] - 10.0).abs() < 1e-3);
        assert_eq!(u.eye[3], 1.0);
        assert_eq!(std::mem::size_of::<CameraUniform>(), CameraUniform::FLOATS * 4);
    }
}
