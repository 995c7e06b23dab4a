/// Orbit camera controls: rotate, zoom and pan around a target point
use log::{trace, warn};
use nalgebra::{Point3, Vector3};
use std::f32::consts::{PI, TAU};

use crate::projection::Camera;

const EPS: f32 = 1e-6;
/// Smallest camera displacement reported as movement.
const MOVE_EPS: f32 = 1e-4;

/// Switchable behaviours of the controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrbitFlag {
    Damping,
    AutoRotate,
    Pan,
    Zoom,
    Rotate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrbitControls {
    pub target: Point3<f32>,

    pub enable_damping: bool,
    /// Fraction of the pending motion applied per update when damping.
    pub damping_factor: f32,

    pub auto_rotate: bool,
    /// 2.0 completes a revolution in 30 seconds.
    pub auto_rotate_speed: f32,

    pub enable_pan: bool,
    pub pan_speed: f32,
    /// Pan along the camera's up vector instead of across the ground plane.
    pub screen_space_panning: bool,

    pub enable_zoom: bool,
    pub zoom_speed: f32,

    pub enable_rotate: bool,
    pub rotate_speed: f32,

    pub min_distance: f32,
    pub max_distance: f32,
    /// Polar angles are measured from +Y.
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    pub min_azimuth_angle: f32,
    pub max_azimuth_angle: f32,

    delta_theta: f32,
    delta_phi: f32,
    scale: f32,
    pan_offset: Vector3<f32>,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            target: Point3::origin(),
            enable_damping: false,
            damping_factor: 0.05,
            auto_rotate: false,
            auto_rotate_speed: 2.0,
            enable_pan: true,
            pan_speed: 1.0,
            screen_space_panning: true,
            enable_zoom: true,
            zoom_speed: 1.0,
            enable_rotate: true,
            rotate_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            min_azimuth_angle: f32::NEG_INFINITY,
            max_azimuth_angle: f32::INFINITY,
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
            pan_offset: Vector3::zeros(),
        }
    }
}

impl OrbitControls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_flag(&mut self, flag: OrbitFlag, enabled: bool) {
        let field = match flag {
            OrbitFlag::Damping => &mut self.enable_damping,
            OrbitFlag::AutoRotate => &mut self.auto_rotate,
            OrbitFlag::Pan => &mut self.enable_pan,
            OrbitFlag::Zoom => &mut self.enable_zoom,
            OrbitFlag::Rotate => &mut self.enable_rotate,
        };
        *field = enabled;
    }

    /// Queue a rotation: `left` turns around the target's vertical axis,
    /// `up` tilts toward the pole. Both in radians.
    pub fn rotate(&mut self, left: f32, up: f32) -> bool {
        if !self.enable_rotate {
            warn!("orbit rotate ignored: rotation disabled");
            return false;
        }
        self.delta_theta -= left * self.rotate_speed;
        self.delta_phi -= up * self.rotate_speed;
        true
    }

    /// Queue a distance change; `factor < 1` moves closer.
    pub fn zoom(&mut self, factor: f32) -> bool {
        if !self.enable_zoom {
            warn!("orbit zoom ignored: zoom disabled");
            return false;
        }
        if factor > 0.0 {
            self.scale *= factor.powf(self.zoom_speed);
        }
        true
    }

    /// Queue a pan in world units relative to the current view.
    pub fn pan(&mut self, camera: &Camera, right: f32, up: f32) -> bool {
        if !self.enable_pan {
            warn!("orbit pan ignored: panning disabled");
            return false;
        }
        let forward = (camera.target - camera.position)
            .try_normalize(EPS)
            .unwrap_or_else(|| -Vector3::z());
        let side = forward.cross(&camera.up).try_normalize(EPS).unwrap_or_else(Vector3::x);
        let vertical = if self.screen_space_panning {
            side.cross(&forward)
        } else {
            Vector3::y().cross(&side)
        };
        self.pan_offset += (side * right + vertical * up) * self.pan_speed;
        true
    }

    /// Snap the camera to a preset and drop any pending motion.
    pub fn set_view(&mut self, camera: &mut Camera, position: Point3<f32>, target: Point3<f32>) {
        camera.position = position;
        self.target = target;
        self.delta_theta = 0.0;
        self.delta_phi = 0.0;
        self.scale = 1.0;
        self.pan_offset = Vector3::zeros();
        camera.look_at(target);
    }

    /// Angle auto-rotation covers in `dt` seconds.
    pub fn auto_rotation_angle(&self, dt: f32) -> f32 {
        TAU / 60.0 * self.auto_rotate_speed * dt
    }

    /// Apply pending motion to the camera. Returns whether it moved.
    pub fn update(&mut self, camera: &mut Camera, dt: f32) -> bool {
        let offset = camera.position - self.target;
        let mut radius = offset.norm();
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = if radius > EPS {
            (offset.y / radius).clamp(-1.0, 1.0).acos()
        } else {
            0.0
        };

        if self.auto_rotate && dt > 0.0 {
            self.delta_theta -= self.auto_rotation_angle(dt);
        }

        let step = if self.enable_damping { self.damping_factor } else { 1.0 };
        theta += self.delta_theta * step;
        phi += self.delta_phi * step;

        if self.min_azimuth_angle.is_finite() && self.max_azimuth_angle.is_finite() {
            theta = clamp_between(wrap_angle(theta), self.min_azimuth_angle, self.max_azimuth_angle);
        }
        phi = clamp_between(phi, self.min_polar_angle, self.max_polar_angle).clamp(EPS, PI - EPS);
        radius = clamp_between(radius * self.scale, self.min_distance, self.max_distance);

        self.target += self.pan_offset * step;

        let sin_phi = phi.sin();
        let next = self.target
            + Vector3::new(radius * sin_phi * theta.sin(), radius * phi.cos(), radius * sin_phi * theta.cos());
        let moved = (next - camera.position).norm() > MOVE_EPS || (camera.target - self.target).norm() > MOVE_EPS;
        camera.position = next;
        camera.look_at(self.target);

        if self.enable_damping {
            let keep = 1.0 - self.damping_factor;
            self.delta_theta *= keep;
            self.delta_phi *= keep;
            self.pan_offset *= keep;
        } else {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
            self.pan_offset = Vector3::zeros();
        }
        self.scale = 1.0;

        if moved {
            trace!("orbit camera at {:?} radius {:.3}", camera.position, radius);
        }
        moved
    }
}

/// Clamp to a limit pair given in either order. NaN limits are ignored.
fn clamp_between(value: f32, a: f32, b: f32) -> f32 {
    value.max(a.min(b)).min(a.max(b))
}

fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (OrbitControls, Camera) {
        let camera = Camera::default().at(0.0, 3.0, 6.0);
        let mut controls = OrbitControls::new();
        controls.min_distance = 3.0;
        controls.max_distance = 20.0;
        controls.max_polar_angle = PI * 0.5;
        (controls, camera)
    }

    #[test]
    fn update_without_input_keeps_camera() {
        let (mut controls, mut camera) = setup();
        assert!(!controls.update(&mut camera, 1.0 / 60.0));
        assert!((camera.position - Point3::new(0.0, 3.0, 6.0)).norm() < 1e-4);
    }

    #[test]
    fn zoom_is_clamped_to_min_distance() {
        let (mut controls, mut camera) = setup();
        controls.zoom(0.01);
        controls.update(&mut camera, 1.0 / 60.0);
        assert!((camera.position.coords.norm() - 3.0).abs() < 1e-4);
    }

    #[test]
    fn polar_angle_never_goes_below_horizon() {
        let (mut controls, mut camera) = setup();
        controls.rotate(0.0, -3.0);
        controls.update(&mut camera, 1.0 / 60.0);
        assert!(camera.position.y >= -1e-4);
    }

    #[test]
    fn swapped_distance_limits_still_clamp() {
        let (mut controls, mut camera) = setup();
        controls.min_distance = 20.0;
        controls.max_distance = 3.0;
        controls.zoom(0.01);
        controls.update(&mut camera, 1.0 / 60.0);
        assert!((camera.position.coords.norm() - 3.0).abs() < 1e-4);

        controls.max_polar_angle = 0.2;
        controls.min_polar_angle = 1.0;
        controls.rotate(0.0, 2.0);
        controls.update(&mut camera, 1.0 / 60.0);
        assert!(camera.position.y > 0.0);
    }

    #[test]
    fn damping_spreads_motion_over_frames() {
        let (mut controls, mut camera) = setup();
        controls.enable_damping = true;
        controls.damping_factor = 0.08;
        controls.rotate(1.0, 0.0);
        controls.update(&mut camera, 1.0 / 60.0);
        let first = camera.position;
        assert!(controls.update(&mut camera, 1.0 / 60.0));
        assert!((camera.position - first).norm() > 1e-4);
    }

    #[test]
    fn disabled_rotation_ignores_input() {
        let (mut controls, mut camera) = setup();
        controls.set_flag(OrbitFlag::Rotate, false);
        assert!(!controls.rotate(1.0, 0.0));
        assert!(!controls.update(&mut camera, 1.0 / 60.0));
    }

    #[test]
    fn auto_rotate_turns_a_revolution_in_thirty_seconds() {
        let controls = OrbitControls::new();
        assert!((controls.auto_rotation_angle(30.0) - TAU).abs() < 1e-4);
    }

    #[test]
    fn set_view_snaps_camera_and_target() {
        let (mut controls, mut camera) = setup();
        controls.rotate(0.5, 0.2);
        controls.set_view(&mut camera, Point3::new(10.0, 3.0, 0.0), Point3::new(0.0, 1.0, 0.0));
        controls.update(&mut camera, 1.0 / 60.0);
        assert!((camera.position - Point3::new(10.0, 3.0, 0.0)).norm() < 1e-3);
        assert_eq!(camera.target, Point3::new(0.0, 1.0, 0.0));
    }
}
