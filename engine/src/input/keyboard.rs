//! Keyboard state for the play and builder modes.
//!
//! Hosts forward `KeyboardEvent.code` strings; everything past
//! [`KeyCode::from_dom_code`] is DOM-free.

/// Keys the game reacts to. Anything else maps to [`KeyCode::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    W,
    A,
    S,
    D,
    Q,
    E,
    Space,
    ShiftLeft,
    ShiftRight,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    // Builder hotkeys
    Digit1,
    Digit2,
    Digit3,
    Digit4,
    Digit5,
    Digit6,
    Digit7,
    Digit8,
    Enter,
    ControlLeft,
    ControlRight,

    Unknown,
}

const DIGITS: [KeyCode; 8] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
    KeyCode::Digit7,
    KeyCode::Digit8,
];

impl KeyCode {
    pub fn from_dom_code(code: &str) -> Self {
        if let Some(n) = code.strip_prefix("Digit") {
            return n
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| DIGITS.get(i).copied())
                .unwrap_or(KeyCode::Unknown);
        }
        match code {
            "KeyW" => KeyCode::W,
            "KeyA" => KeyCode::A,
            "KeyS" => KeyCode::S,
            "KeyD" => KeyCode::D,
            "KeyQ" => KeyCode::Q,
            "KeyE" => KeyCode::E,
            "Space" => KeyCode::Space,
            "ShiftLeft" => KeyCode::ShiftLeft,
            "ShiftRight" => KeyCode::ShiftRight,
            "ArrowUp" => KeyCode::ArrowUp,
            "ArrowDown" => KeyCode::ArrowDown,
            "ArrowLeft" => KeyCode::ArrowLeft,
            "ArrowRight" => KeyCode::ArrowRight,
            "Enter" | "NumpadEnter" => KeyCode::Enter,
            "ControlLeft" => KeyCode::ControlLeft,
            "ControlRight" => KeyCode::ControlRight,
            _ => KeyCode::Unknown,
        }
    }

    pub fn is_ctrl(self) -> bool {
        matches!(self, KeyCode::ControlLeft | KeyCode::ControlRight)
    }
}

/// Held movement keys, sampled once per tick by the player stepper.
///
/// Controls are tank-style: W/S run along the facing, A/D or the arrows
/// turn, Q/E strafe.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MovementKeys {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub strafe_left: bool,
    pub strafe_right: bool,
    /// Held for a higher arc
    pub jump: bool,
    pub sprint: bool,
}

fn axis(positive: bool, negative: bool) -> i32 {
    positive as i32 - negative as i32
}

impl MovementKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a key edge. Returns `false` for keys that do not move the player.
    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) -> bool {
        let slot = match key {
            KeyCode::W | KeyCode::ArrowUp => &mut self.forward,
            KeyCode::S | KeyCode::ArrowDown => &mut self.backward,
            KeyCode::A | KeyCode::ArrowLeft => &mut self.left,
            KeyCode::D | KeyCode::ArrowRight => &mut self.right,
            KeyCode::Q => &mut self.strafe_left,
            KeyCode::E => &mut self.strafe_right,
            KeyCode::Space => &mut self.jump,
            KeyCode::ShiftLeft | KeyCode::ShiftRight => &mut self.sprint,
            _ => return false,
        };
        *slot = pressed;
        true
    }

    /// Sprint alone does not count as input.
    pub fn is_idle(&self) -> bool {
        Self {
            sprint: false,
            ..*self
        } == Self::default()
    }

    pub fn is_sprinting(&self) -> bool {
        self.sprint
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// 1 forward, -1 backward, 0 when neither or both are held.
    pub fn forward_axis(&self) -> i32 {
        axis(self.forward, self.backward)
    }

    /// Positive turns right.
    pub fn turn_axis(&self) -> i32 {
        axis(self.right, self.left)
    }

    /// Positive strafes right.
    pub fn strafe_axis(&self) -> i32 {
        axis(self.strafe_right, self.strafe_left)
    }
}

/// Movement keys plus the Ctrl modifier used by builder hotkeys.
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    pub movement: MovementKeys,
    pub ctrl: bool,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) -> bool {
        if key.is_ctrl() {
            self.ctrl = pressed;
            return true;
        }
        self.movement.handle_key(key, pressed)
    }

    /// Releases everything. Called on focus loss and mode switches.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
