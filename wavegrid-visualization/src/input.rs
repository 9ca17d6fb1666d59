//! Pointer tracking

use nalgebra::Vector2;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, MouseButton};

/// Map a pointer position in pixels to normalized device coordinates.
///
/// `x` grows to the right and `y` grows upward, both spanning `[-1, 1]` across
/// the viewport. A zero-sized viewport maps everything to the origin.
pub fn normalize_pointer(x: f64, y: f64, width: f64, height: f64) -> Vector2<f32> {
    if width <= 0.0 || height <= 0.0 {
        return Vector2::zeros();
    }
    Vector2::new((x / width * 2.0 - 1.0) as f32, (-(y / height) * 2.0 + 1.0) as f32)
}

/// Pointer position and button state
#[derive(Debug, Clone, PartialEq)]
pub struct PointerState {
    /// Last position in normalized device coordinates
    pub normalized: Vector2<f32>,
    pub last_position: Option<PhysicalPosition<f64>>,
    /// Left button held
    pub rotating: bool,
    /// Right button held
    pub panning: bool,
}

impl PointerState {
    pub fn new() -> Self {
        Self {
            normalized: Vector2::zeros(),
            last_position: None,
            rotating: false,
            panning: false,
        }
    }

    /// Record a cursor move and return the pixel delta since the last one
    pub fn moved(&mut self, position: PhysicalPosition<f64>, viewport: PhysicalSize<u32>) -> Option<(f64, f64)> {
        self.normalized = normalize_pointer(position.x, position.y, viewport.width as f64, viewport.height as f64);
        let delta = self
            .last_position
            .map(|last| (position.x - last.x, position.y - last.y));
        self.last_position = Some(position);
        delta
    }

    /// Record a button press or release
    pub fn button(&mut self, button: MouseButton, state: ElementState) {
        let pressed = state == ElementState::Pressed;
        match button {
            MouseButton::Left => self.rotating = pressed,
            MouseButton::Right => self.panning = pressed,
            _ => {}
        }
    }

    /// Forget the last position, e.g. when the cursor leaves the window
    pub fn left(&mut self) {
        self.last_position = None;
        self.rotating = false;
        self.panning = false;
    }
}

impl Default for PointerState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_normalize_corners() {
        let top_left = normalize_pointer(0.0, 0.0, 800.0, 600.0);
        assert_relative_eq!(top_left.x, -1.0);
        assert_relative_eq!(top_left.y, 1.0);

        let bottom_right = normalize_pointer(800.0, 600.0, 800.0, 600.0);
        assert_relative_eq!(bottom_right.x, 1.0);
        assert_relative_eq!(bottom_right.y, -1.0);

        let center = normalize_pointer(400.0, 300.0, 800.0, 600.0);
        assert_relative_eq!(center.x, 0.0);
        assert_relative_eq!(center.y, 0.0);
    }

    #[test]
    fn test_normalize_stays_in_range_inside_viewport() {
        for x in (0..=1280).step_by(64) {
            for y in (0..=720).step_by(48) {
                let p = normalize_pointer(x as f64, y as f64, 1280.0, 720.0);
                assert!((-1.0..=1.0).contains(&p.x));
                assert!((-1.0..=1.0).contains(&p.y));
            }
        }
    }

    #[test]
    fn test_normalize_zero_viewport() {
        assert_eq!(normalize_pointer(10.0, 10.0, 0.0, 600.0), Vector2::zeros());
    }

    #[test]
    fn test_moved_reports_delta() {
        let mut pointer = PointerState::new();
        let viewport = PhysicalSize::new(800, 600);
        assert_eq!(pointer.moved(PhysicalPosition::new(100.0, 100.0), viewport), None);
        assert_eq!(pointer.moved(PhysicalPosition::new(130.0, 90.0), viewport), Some((30.0, -10.0)));
        assert_relative_eq!(pointer.normalized.x, 130.0 / 800.0 * 2.0 - 1.0);
    }

    #[test]
    fn test_buttons_and_leave() {
        let mut pointer = PointerState::default();
        pointer.button(MouseButton::Left, ElementState::Pressed);
        pointer.button(MouseButton::Right, ElementState::Pressed);
        assert!(pointer.rotating && pointer.panning);
        pointer.button(MouseButton::Left, ElementState::Released);
        assert!(!pointer.rotating);

        pointer.moved(PhysicalPosition::new(1.0, 1.0), PhysicalSize::new(10, 10));
        pointer.left();
        assert!(pointer.last_position.is_none());
        assert!(!pointer.panning);
    }
}
