//! Input → action dispatch (spec.md §6 runtime keybindings). Grounded on
//! the teacher's `player::controller::PlayerController::handle_keyboard_input`
//! match-based dispatch, generalized from direct physics mutation (out
//! of scope here, spec.md §1's Non-goals) to protocol-message emission:
//! this module decides *what message to send*, not how the camera moves.

use glam::{IVec3, Vec3};

use crate::block::BlockType;
use crate::protocol::Message;
use crate::raycast::RayHit;

/// WASD + space/shift move, number keys select hotbar, ESC releases
/// mouse, F3 toggles the debug overlay, `~` toggles the console
/// (spec.md §6). Mouse look and camera math stay out of scope; only the
/// keys that drive a protocol message or a pure client-side toggle are
/// modeled here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Forward,
    Backward,
    StrafeLeft,
    StrafeRight,
    Jump,
    Crouch,
    Hotbar(u8),
    Escape,
    DebugOverlay,
    Console,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
}

/// Accumulated movement-key state, mirroring the teacher's
/// `PlayerInput` flags struct.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MovementFlags {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub crouch: bool,
}

impl MovementFlags {
    /// Packs the six flags into the wire `input_flags: u8` field
    /// (spec.md §4.6 `PlayerMove`), one bit per flag in declaration
    /// order.
    pub fn to_wire_byte(self) -> u8 {
        (self.forward as u8)
            | (self.backward as u8) << 1
            | (self.left as u8) << 2
            | (self.right as u8) << 3
            | (self.jump as u8) << 4
            | (self.crouch as u8) << 5
    }
}

#[derive(Debug, Default)]
pub struct InputState {
    pub movement: MovementFlags,
    pub selected_hotbar: u8,
    pub mouse_captured: bool,
    pub debug_overlay: bool,
    pub console_open: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            mouse_captured: true,
            ..Default::default()
        }
    }

    /// Updates movement/toggle state for one key transition. Toggle keys
    /// (Escape/F3/~) act on press only, matching the teacher's `KeyF`
    /// fly-mode toggle (`if pressed { self.fly_mode = !self.fly_mode }`).
    pub fn handle_key(&mut self, key: Key, pressed: bool) {
        match key {
            Key::Forward => self.movement.forward = pressed,
            Key::Backward => self.movement.backward = pressed,
            Key::StrafeLeft => self.movement.left = pressed,
            Key::StrafeRight => self.movement.right = pressed,
            Key::Jump => self.movement.jump = pressed,
            Key::Crouch => self.movement.crouch = pressed,
            Key::Hotbar(slot) => {
                if pressed {
                    self.selected_hotbar = slot;
                }
            }
            Key::Escape => {
                if pressed {
                    self.mouse_captured = false;
                }
            }
            Key::DebugOverlay => {
                if pressed {
                    self.debug_overlay = !self.debug_overlay;
                }
            }
            Key::Console => {
                if pressed {
                    self.console_open = !self.console_open;
                }
            }
        }
    }

    /// Builds the `PlayerMove` message for the current tick, given the
    /// camera-owned position/velocity/orientation (camera math is out of
    /// scope here; the caller supplies it).
    pub fn player_move_message(&self, position: Vec3, velocity: Vec3, yaw: f32, pitch: f32) -> Message {
        Message::PlayerMove {
            position,
            velocity,
            yaw,
            pitch,
            input_flags: self.movement.to_wire_byte(),
        }
    }
}

/// Left-click breaks the targeted block, right-click places the
/// currently selected block on the face the ray entered through
/// (spec.md §6). Returns `None` if the ray found nothing within range —
/// there is nothing to emit; the client does not speculatively predict
/// the edit, it waits for the server's `BlockUpdate` (spec.md §4.7
/// validates edits authoritatively).
pub fn mouse_click_message(button: MouseButton, hit: Option<RayHit>, hotbar_block: BlockType) -> Option<Message> {
    let hit = hit?;
    match button {
        MouseButton::Left => Some(Message::BlockBreak { position: hit.block_pos }),
        MouseButton::Right => {
            let place_at: IVec3 = hit.block_pos + hit.face_normal;
            Some(Message::BlockPlace { position: place_at, block_type: hotbar_block })
        }
    }
}
