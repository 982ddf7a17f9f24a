//! Orbit camera controller
//!
//! Fuses keyboard, mouse, and gamepad input into orbital motion around a
//! target point. Rotation comes from the right stick and from mouse drag
//! or pointer-capture look; scroll adjusts the orbit distance. The camera
//! position is recomputed every update by orbiting the target.

use crate::core::camera::Camera;
use crate::core::input::{
    Axis, GamepadProvider, InputBindings, InputState, PointerCapture, DEADZONE,
};
use crate::core::types::{Mat4, Vec3};
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::PhysicalKey;

/// Orbit distance clamp bounds in world units
pub const MIN_DISTANCE: f32 = 5.0;
pub const MAX_DISTANCE: f32 = 200.0;

/// Mouse look sensitivity divisor (movement pixels per radian)
const LOOK_DIVISOR: f32 = 1000.0;

/// Wheel delta per scroll line, classic wheel convention
const LINE_DELTA: f32 = 120.0;

/// Orbit camera controller driven by fused input
pub struct OrbitCameraController {
    /// While set, every handler and the update tick are no-ops
    pub disabled: bool,
    /// World-space pivot the camera orbits
    pub target: Vec3,
    distance: f32,
    input: InputState,
    /// Exclusive pointer capture currently active
    captured: bool,
    /// Temporary press-drag-release look outside of capture
    drag_look: bool,
}

impl OrbitCameraController {
    /// Create a controller with the given binding table
    pub fn new(bindings: InputBindings) -> Self {
        Self {
            disabled: false,
            target: Vec3::ZERO,
            distance: 24.0,
            input: InputState::new(bindings),
            captured: false,
            drag_look: false,
        }
    }

    /// Current orbit distance
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Set orbit distance, clamped to the valid range
    pub fn set_distance(&mut self, distance: f32) {
        self.distance = distance.clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    /// Fused input state (held actions, axes)
    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Whether pointer capture look is active
    pub fn is_captured(&self) -> bool {
        self.captured
    }

    /// Request exclusive pointer capture.
    ///
    /// A denied request is silent; capture becomes effective when the host
    /// delivers the capture-change notification.
    pub fn grab(&mut self, capture: &mut dyn PointerCapture) {
        if self.disabled {
            return;
        }
        let _ = capture.request_capture();
    }

    /// Release exclusive pointer capture
    pub fn release(&mut self, capture: &mut dyn PointerCapture) {
        capture.release_capture();
    }

    /// Per-tick update: poll gamepads, apply stick look, recompute position.
    ///
    /// Absent pads contribute no input. Look rotation uses only the right
    /// stick axes, ignoring magnitudes below [`DEADZONE`], scaled by `dt`.
    pub fn update(&mut self, camera: &mut Camera, gamepads: &mut dyn GamepadProvider, dt: f32) {
        if self.disabled {
            return;
        }
        let pads = gamepads.poll();
        self.input.sample_pads(&pads);

        let mut pitch = 0.0;
        let mut yaw = 0.0;
        for (axis, value) in self.input.axes() {
            if value.abs() < DEADZONE {
                continue;
            }
            match axis {
                Axis::RightStickX => yaw = value,
                Axis::RightStickY => pitch = value,
                _ => {}
            }
        }
        camera.rotate(pitch * dt, yaw * dt);

        let transform = Mat4::from_translation(self.target)
            * camera.rotation_matrix()
            * Mat4::from_translation(Vec3::new(0.0, 0.0, -self.distance));
        camera.position = transform.transform_point3(Vec3::new(0.0, 1.0, 0.0));
    }

    /// Route a window event into the controller
    pub fn process_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => match state {
                ElementState::Pressed => self.handle_key(*code, true),
                ElementState::Released => self.handle_key(*code, false),
            },
            WindowEvent::MouseInput { state, button, .. } => match state {
                ElementState::Pressed => self.handle_mouse_press(*button),
                ElementState::Released => self.handle_mouse_release(*button),
            },
            WindowEvent::MouseWheel { delta, .. } => {
                // winit reports scroll-up as positive; wheel deltas are the inverse
                let delta_y = match delta {
                    MouseScrollDelta::LineDelta(_, y) => -y * LINE_DELTA,
                    MouseScrollDelta::PixelDelta(pos) => -pos.y as f32,
                };
                self.handle_scroll(delta_y);
            }
            _ => {}
        }
    }

    /// Capture-change notification from the host.
    ///
    /// Suppressed entirely while disabled, including the state recording.
    pub fn handle_capture_change(&mut self, captured: bool) {
        if self.disabled {
            return;
        }
        self.captured = captured;
        if captured {
            self.drag_look = false;
        }
    }

    /// Keyboard press/release for bound actions
    pub fn handle_key(&mut self, code: winit::keyboard::KeyCode, pressed: bool) {
        if self.disabled {
            return;
        }
        if pressed {
            self.input.press_key(code);
        } else {
            self.input.release_key(code);
        }
    }

    /// Left-button press starts drag look, unless capture is already active
    pub fn handle_mouse_press(&mut self, button: MouseButton) {
        if self.disabled || self.captured {
            return;
        }
        if button == MouseButton::Left {
            self.drag_look = true;
        }
    }

    /// Left-button release ends drag look; ignored while captured
    pub fn handle_mouse_release(&mut self, button: MouseButton) {
        if self.captured {
            return;
        }
        if button == MouseButton::Left {
            self.drag_look = false;
        }
    }

    /// Relative mouse motion. Rotates the camera while captured or dragging.
    pub fn process_mouse_motion(&mut self, camera: &mut Camera, dx: f32, dy: f32) {
        if self.disabled {
            return;
        }
        if !self.captured && !self.drag_look {
            return;
        }
        camera.rotate(dy / LOOK_DIVISOR, dx / LOOK_DIVISOR);
    }

    /// Multiplicative zoom from scroll, clamped to the distance range
    pub fn handle_scroll(&mut self, delta_y: f32) {
        if self.disabled {
            return;
        }
        self.distance *= 1.0 - (delta_y / -1000.0);
        self.distance = self.distance.clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    /// Tear down the controller: release capture, drop all input state, and
    /// stop routing events. The controller owns its subscription state, so
    /// detaching never leaves ambient listeners behind.
    pub fn detach(&mut self, capture: &mut dyn PointerCapture) {
        capture.release_capture();
        self.captured = false;
        self.drag_look = false;
        self.input.clear();
        self.disabled = true;
    }
}

impl Default for OrbitCameraController {
    fn default() -> Self {
        Self::new(InputBindings::default())
    }
}
