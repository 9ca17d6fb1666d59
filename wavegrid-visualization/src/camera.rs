//! Perspective camera and orbit controls

use std::f32::consts::PI;

use nalgebra::{Matrix4, Perspective3, Point3, Vector3};
use wavegrid_core::CameraConfig;

/// Keeps the polar angle away from the poles so `look_at` stays defined
const POLAR_EPSILON: f32 = 1e-3;

/// Maps OpenGL clip-space depth (-1..1) onto wgpu's (0..1)
#[rustfmt::skip]
fn opengl_to_wgpu() -> Matrix4<f32> {
    Matrix4::new(
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 0.5, 0.5,
        0.0, 0.0, 0.0, 1.0,
    )
}

/// A perspective camera looking at a target point
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    /// Vertical field of view in radians
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// Create a new camera
    pub fn new(
        position: Point3<f32>,
        target: Point3<f32>,
        up: Vector3<f32>,
        fov: f32,
        aspect_ratio: f32,
        near: f32,
        far: f32,
    ) -> Self {
        Self {
            position,
            target,
            up,
            fov,
            aspect_ratio,
            near,
            far,
        }
    }

    /// Camera described by a configuration section
    pub fn from_config(config: &CameraConfig, aspect_ratio: f32) -> Self {
        Self::new(
            config.eye(),
            config.look_at(),
            Vector3::y(),
            config.fov_degrees.to_radians(),
            aspect_ratio,
            config.near,
            config.far,
        )
    }

    /// Update the aspect ratio for a viewport; zero-sized viewports are ignored
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect_ratio = width as f32 / height as f32;
        }
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Get the projection matrix in wgpu clip space
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        let perspective = Perspective3::new(self.aspect_ratio, self.fov, self.near, self.far);
        opengl_to_wgpu() * perspective.into_inner()
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    /// Distance from the eye to the target
    pub fn distance(&self) -> f32 {
        (self.position - self.target).norm()
    }

    /// Unit vector pointing to the right of the view
    pub fn right(&self) -> Vector3<f32> {
        (self.target - self.position).cross(&self.up).normalize()
    }

    /// Unit vector pointing up in screen space
    pub fn screen_up(&self) -> Vector3<f32> {
        let forward = (self.target - self.position).normalize();
        self.right().cross(&forward)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default(), 16.0 / 9.0)
    }
}

/// Mouse-driven orbit, pan and zoom around the camera target.
///
/// Rotation, pan and zoom rates follow the conventions of three.js
/// `OrbitControls`: dragging across the full viewport height turns the camera
/// by a full revolution, panning keeps the point under the cursor fixed at the
/// target depth, and one wheel notch scales the distance by `0.95`.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitControls {
    pub enable_rotate: bool,
    pub enable_pan: bool,
    pub enable_zoom: bool,
    pub rotate_speed: f32,
    pub pan_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    home_position: Point3<f32>,
    home_target: Point3<f32>,
}

impl OrbitControls {
    /// Controls that return `camera` to its current pose on reset
    pub fn new(camera: &Camera) -> Self {
        Self {
            enable_rotate: true,
            enable_pan: true,
            enable_zoom: true,
            rotate_speed: 1.0,
            pan_speed: 1.0,
            zoom_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            home_position: camera.position,
            home_target: camera.target,
        }
    }

    /// Controls honouring the enable flags of a configuration section
    pub fn from_config(camera: &Camera, config: &CameraConfig) -> Self {
        Self {
            enable_rotate: config.enable_rotate,
            enable_pan: config.enable_pan,
            enable_zoom: config.enable_zoom,
            ..Self::new(camera)
        }
    }

    /// Orbit by a pointer drag of `(dx, dy)` physical pixels
    pub fn rotate(&self, camera: &mut Camera, dx: f32, dy: f32, viewport_height: f32) -> bool {
        if !self.enable_rotate || viewport_height <= 0.0 {
            return false;
        }
        let offset = camera.position - camera.target;
        let radius = offset.norm();
        if radius <= f32::EPSILON {
            return false;
        }

        let mut theta = offset.x.atan2(offset.z);
        let mut phi = (offset.y / radius).clamp(-1.0, 1.0).acos();

        theta -= 2.0 * PI * dx / viewport_height * self.rotate_speed;
        phi -= 2.0 * PI * dy / viewport_height * self.rotate_speed;
        phi = phi.clamp(POLAR_EPSILON, PI - POLAR_EPSILON);

        let new_offset = Vector3::new(
            radius * phi.sin() * theta.sin(),
            radius * phi.cos(),
            radius * phi.sin() * theta.cos(),
        );
        camera.position = camera.target + new_offset;
        true
    }

    /// Translate eye and target by a pointer drag of `(dx, dy)` physical pixels
    pub fn pan(&self, camera: &mut Camera, dx: f32, dy: f32, viewport_height: f32) -> bool {
        if !self.enable_pan || viewport_height <= 0.0 {
            return false;
        }
        let target_distance = camera.distance() * (camera.fov * 0.5).tan();
        let scale = 2.0 * target_distance / viewport_height * self.pan_speed;
        let delta = camera.right() * (-dx * scale) + camera.screen_up() * (dy * scale);
        camera.position += delta;
        camera.target += delta;
        true
    }

    /// Dolly towards (`steps > 0`) or away from the target
    pub fn zoom(&self, camera: &mut Camera, steps: f32) -> bool {
        if !self.enable_zoom {
            return false;
        }
        let offset = camera.position - camera.target;
        let radius = offset.norm();
        if radius <= f32::EPSILON {
            return false;
        }
        let new_radius = (radius * 0.95f32.powf(steps * self.zoom_speed))
            .clamp(self.min_distance.max(f32::EPSILON), self.max_distance);
        camera.position = camera.target + offset * (new_radius / radius);
        true
    }

    /// Restore the pose the controls were created with
    pub fn reset(&self, camera: &mut Camera) {
        camera.position = self.home_position;
        camera.target = self.home_target;
    }
}
