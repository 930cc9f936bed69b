//! Event types produced by the decoder.
//!
//! These are the only values that cross from the input side into the
//! dispatcher. They are small `Copy` types so they can be stored in the
//! input history without allocation.

/// Named keys recognised by the decoder's fixed escape table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EscapeCode {
    /// Up arrow.
    ArrowUp,
    /// Down arrow.
    ArrowDown,
    /// Left arrow.
    ArrowLeft,
    /// Right arrow.
    ArrowRight,
    /// Insert key.
    Insert,
    /// Delete key.
    Delete,
    /// Home key.
    Home,
    /// End key.
    End,
    /// Page Up.
    PageUp,
    /// Page Down.
    PageDown,
    /// Tab key.
    Tab,
    /// Shift+Tab (back tab).
    ShiftTab,
    /// F1.
    F1,
    /// F2.
    F2,
    /// F3.
    F3,
    /// F4.
    F4,
    /// F5.
    F5,
    /// F6.
    F6,
    /// F7.
    F7,
    /// F8.
    F8,
    /// F9.
    F9,
    /// F10.
    F10,
    /// F11.
    F11,
    /// F12.
    F12,
    /// A lone escape byte.
    Escape,
    /// Ctrl+R.
    CtrlR,
    /// Enter/Return.
    Return,
    /// Space, when produced by a synthetic event (the decoder reports a typed
    /// space as `Char(b' ')`).
    Space,
    /// Backspace (DEL or BS).
    Backspace,
}

/// An SGR mouse report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseEvent {
    /// Column, 1-based as reported by the terminal.
    pub x: u16,
    /// Row, 1-based as reported by the terminal.
    pub y: u16,
    /// `true` for a press (`M`), `false` for a release (`m`).
    pub pressed: bool,
    /// Button number, `0..=3`.
    pub button: u8,
    /// Modifier bits, `0..=7` (shift, meta, control).
    pub modifiers: u8,
    /// Motion report (flag bit 32): the pointer moved with `button` held.
    pub motion: bool,
    /// Wheel report (flag bit 64): `button` 0 is up, 1 is down.
    pub wheel: bool,
}

impl MouseEvent {
    /// Left button pressed: neither a drag nor a wheel notch.
    #[inline]
    pub const fn is_left_press(&self) -> bool {
        self.pressed && self.button == 0 && !self.motion && !self.wheel
    }
}

/// A decoded input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyEvent {
    /// A single printable ASCII byte.
    Char(u8),
    /// A named key from the escape table.
    Named(EscapeCode),
    /// A mouse report.
    Mouse(MouseEvent),
}

impl KeyEvent {
    /// Check if this is the given printable character.
    #[inline]
    pub const fn is_char(&self, c: u8) -> bool {
        matches!(*self, Self::Char(ch) if ch == c)
    }

    /// Check if this is the given named key.
    #[inline]
    pub fn is_named(&self, code: EscapeCode) -> bool {
        *self == Self::Named(code)
    }

    /// Space, typed or synthetic.
    #[inline]
    pub fn is_space(&self) -> bool {
        self.is_char(b' ') || self.is_named(EscapeCode::Space)
    }

    /// Digit value for `'0'..='9'`.
    #[inline]
    pub const fn digit(&self) -> Option<u8> {
        match *self {
            Self::Char(ch) if ch.is_ascii_digit() => Some(ch - b'0'),
            _ => None,
        }
    }

    /// The mouse report, if this is one.
    #[inline]
    pub const fn mouse(&self) -> Option<MouseEvent> {
        match *self {
            Self::Mouse(m) => Some(m),
            _ => None,
        }
    }
}
