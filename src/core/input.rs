//! Input state tracking and fusion
//!
//! Fuses keyboard holds, mouse state, and polled gamepad samples into two
//! maps: `held` (logical action to analog magnitude) and `axis` (logical
//! analog axis to signed magnitude). Gamepads are polled through the
//! injected [`GamepadProvider`]; a missing or disconnected pad is treated
//! as no input for that tick, never as an error.

use std::collections::HashMap;
use winit::keyboard::KeyCode;
use winit::window::{CursorGrabMode, Window};

/// Minimum analog magnitude below which an axis is treated as at rest.
/// Applied when look input is consumed, not when samples are stored.
pub const DEADZONE: f32 = 0.15;

/// Button magnitude above which a binding activates
pub const BUTTON_ACTIVATION: f32 = 0.001;

/// Logical input actions produced by any source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
    Boost,
}

/// Logical analog axes (standard twin-stick layout)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    LeftStickX,
    LeftStickY,
    RightStickX,
    RightStickY,
}

/// Gamepad buttons in standard layout order.
///
/// The discriminant is the button's index in a [`GamepadSample`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    A = 0,
    B = 1,
    X = 2,
    Y = 3,
    LeftBumper = 4,
    RightBumper = 5,
    LeftTrigger = 6,
    RightTrigger = 7,
    Back = 8,
    Start = 9,
    LeftStick = 10,
    RightStick = 11,
    DpadUp = 12,
    DpadDown = 13,
    DpadLeft = 14,
    DpadRight = 15,
}

const BUTTON_COUNT: usize = 16;

/// One polled frame of gamepad state: two sticks plus a button value array
#[derive(Debug, Clone, PartialEq)]
pub struct GamepadSample {
    /// Left stick X/Y followed by right stick X/Y, each in `[-1, 1]`
    pub axes: [f32; 4],
    /// Analog button values in `[0, 1]`, indexed by [`Button`]
    pub buttons: Vec<f32>,
}

/// Enumerates connected analog input devices.
///
/// Slots for absent or disconnected pads are `None` and skipped.
pub trait GamepadProvider {
    fn poll(&mut self) -> Vec<Option<GamepadSample>>;
}

/// Provider for hosts without any gamepad backend
pub struct NoGamepads;

impl GamepadProvider for NoGamepads {
    fn poll(&mut self) -> Vec<Option<GamepadSample>> {
        Vec::new()
    }
}

/// Exclusive pointer capture on a viewport.
///
/// A denied request is reported as `false` and treated as no input.
pub trait PointerCapture {
    fn request_capture(&mut self) -> bool;
    fn release_capture(&mut self);
}

impl PointerCapture for Window {
    fn request_capture(&mut self) -> bool {
        let grabbed = self
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| self.set_cursor_grab(CursorGrabMode::Confined))
            .is_ok();
        if grabbed {
            self.set_cursor_visible(false);
        }
        grabbed
    }

    fn release_capture(&mut self) {
        let _ = self.set_cursor_grab(CursorGrabMode::None);
        self.set_cursor_visible(true);
    }
}

/// Binding tables resolved at construction.
///
/// Buttons map by index through a fixed-size table; keys map through an
/// explicit code table. No runtime string lookup.
#[derive(Debug, Clone)]
pub struct InputBindings {
    buttons: [Option<Action>; BUTTON_COUNT],
    keys: HashMap<KeyCode, Action>,
}

impl InputBindings {
    /// Empty binding table
    pub fn empty() -> Self {
        Self {
            buttons: [None; BUTTON_COUNT],
            keys: HashMap::new(),
        }
    }

    pub fn bind_button(&mut self, button: Button, action: Action) {
        self.buttons[button as usize] = action.into();
    }

    pub fn bind_key(&mut self, code: KeyCode, action: Action) {
        self.keys.insert(code, action);
    }

    /// Action bound to a button index, if any. Out-of-range indices are unmapped.
    pub fn button(&self, index: usize) -> Option<Action> {
        self.buttons.get(index).copied().flatten()
    }

    pub fn key(&self, code: KeyCode) -> Option<Action> {
        self.keys.get(&code).copied()
    }
}

impl Default for InputBindings {
    /// WASD/QE/Shift on the keyboard, dpad plus bumpers on the pad
    fn default() -> Self {
        let mut bindings = Self::empty();
        bindings.bind_key(KeyCode::KeyW, Action::Forward);
        bindings.bind_key(KeyCode::KeyA, Action::Left);
        bindings.bind_key(KeyCode::KeyS, Action::Backward);
        bindings.bind_key(KeyCode::KeyD, Action::Right);
        bindings.bind_key(KeyCode::KeyQ, Action::Down);
        bindings.bind_key(KeyCode::KeyE, Action::Up);
        bindings.bind_key(KeyCode::ShiftLeft, Action::Boost);

        bindings.bind_button(Button::DpadUp, Action::Forward);
        bindings.bind_button(Button::DpadDown, Action::Backward);
        bindings.bind_button(Button::DpadLeft, Action::Left);
        bindings.bind_button(Button::DpadRight, Action::Right);
        bindings.bind_button(Button::LeftBumper, Action::Down);
        bindings.bind_button(Button::RightBumper, Action::Up);
        bindings.bind_button(Button::LeftTrigger, Action::Boost);
        bindings
    }
}

/// Fused input state: held actions and analog axes
pub struct InputState {
    /// Logical action to analog magnitude in `[0, 1]`.
    /// Entries whose latest source magnitude fell below the activation
    /// threshold are removed, not zeroed.
    held: HashMap<Action, f32>,
    /// Logical axis to signed magnitude in `[-1, 1]`, last sample wins
    axis: HashMap<Axis, f32>,
    /// Previous button values per pad slot, for change detection
    previous_buttons: HashMap<usize, Vec<f32>>,
    bindings: InputBindings,
}

impl InputState {
    pub fn new(bindings: InputBindings) -> Self {
        Self {
            held: HashMap::new(),
            axis: HashMap::new(),
            previous_buttons: HashMap::new(),
            bindings,
        }
    }

    /// Fold one round of polled pad samples into the fused state.
    ///
    /// Axes are stored unconditionally (dead-zone filtering happens at
    /// consumption). Buttons are compared against their previous sample and
    /// skipped when unchanged; on change they activate or clear their bound
    /// action. Unmapped button indices are ignored.
    pub fn sample_pads(&mut self, pads: &[Option<GamepadSample>]) {
        for (slot, pad) in pads.iter().enumerate() {
            let Some(pad) = pad else {
                continue;
            };

            self.axis.insert(Axis::LeftStickX, pad.axes[0]);
            self.axis.insert(Axis::LeftStickY, pad.axes[1]);
            self.axis.insert(Axis::RightStickX, pad.axes[2]);
            self.axis.insert(Axis::RightStickY, pad.axes[3]);

            let previous = self.previous_buttons.entry(slot).or_default();
            previous.resize(pad.buttons.len().max(previous.len()), 0.0);

            for (index, &value) in pad.buttons.iter().enumerate() {
                if previous[index] == value {
                    // Value unchanged
                    continue;
                }
                previous[index] = value;

                let Some(action) = self.bindings.button(index) else {
                    continue;
                };
                if value > BUTTON_ACTIVATION {
                    self.held.insert(action, value);
                } else {
                    self.held.remove(&action);
                }
            }
        }
    }

    /// Record a keyboard press for a bound key (magnitude 1.0)
    pub fn press_key(&mut self, code: KeyCode) {
        if let Some(action) = self.bindings.key(code) {
            self.held.insert(action, 1.0);
        }
    }

    /// Record a keyboard release for a bound key
    pub fn release_key(&mut self, code: KeyCode) {
        if let Some(action) = self.bindings.key(code) {
            self.held.remove(&action);
        }
    }

    /// Latest stored value for an axis, 0.0 if never sampled
    pub fn axis(&self, axis: Axis) -> f32 {
        self.axis.get(&axis).copied().unwrap_or(0.0)
    }

    /// Iterate stored axis samples
    pub fn axes(&self) -> impl Iterator<Item = (Axis, f32)> + '_ {
        self.axis.iter().map(|(&axis, &value)| (axis, value))
    }

    /// Magnitude of a held action, 0.0 if not held
    pub fn action_magnitude(&self, action: Action) -> f32 {
        self.held.get(&action).copied().unwrap_or(0.0)
    }

    /// Whether an action is currently held with any magnitude
    pub fn is_active(&self, action: Action) -> bool {
        self.held.contains_key(&action)
    }

    /// Drop all held actions, axis samples, and button history
    pub fn clear(&mut self) {
        self.held.clear();
        self.axis.clear();
        self.previous_buttons.clear();
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new(InputBindings::default())
    }
}
