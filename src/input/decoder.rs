//! Decoder: one raw input burst → at most one `KeyEvent`.
//!
//! The decoder is a pure function over the bytes gathered in a single poll
//! cycle. It recognises:
//! - CSI (`ESC [`) and SS3 (`ESC O`) sequences from a fixed table
//! - SGR mouse reports (`ESC [ < flags ; x ; y M|m`)
//! - single printable ASCII bytes
//! - a handful of single control bytes (ESC, Ctrl+R, Enter, Tab, Backspace)
//!
//! Nothing is buffered between calls. A sequence split across two reads
//! cannot be decoded and is dropped, as is a burst holding more than one
//! keystroke.

use super::event::{EscapeCode, KeyEvent, MouseEvent};

/// Escape sequences after the leading `ESC`, in their two-byte-prefix form.
///
/// Several entries map to the same code: terminals disagree about whether a
/// key is sent with the `[` or the `O` lead-in.
pub const ESCAPE_SEQUENCES: &[(&[u8], EscapeCode)] = &[
    (b"[A", EscapeCode::ArrowUp),
    (b"OA", EscapeCode::ArrowUp),
    (b"[B", EscapeCode::ArrowDown),
    (b"OB", EscapeCode::ArrowDown),
    (b"[D", EscapeCode::ArrowLeft),
    (b"OD", EscapeCode::ArrowLeft),
    (b"[C", EscapeCode::ArrowRight),
    (b"OC", EscapeCode::ArrowRight),
    (b"[2~", EscapeCode::Insert),
    (b"[4h", EscapeCode::Insert),
    (b"[3~", EscapeCode::Delete),
    (b"[P", EscapeCode::Delete),
    (b"[H", EscapeCode::Home),
    (b"[1~", EscapeCode::Home),
    (b"[F", EscapeCode::End),
    (b"[4~", EscapeCode::End),
    (b"[5~", EscapeCode::PageUp),
    (b"[6~", EscapeCode::PageDown),
    (b"[Z", EscapeCode::ShiftTab),
    (b"OP", EscapeCode::F1),
    (b"OQ", EscapeCode::F2),
    (b"OR", EscapeCode::F3),
    (b"OS", EscapeCode::F4),
    (b"[15~", EscapeCode::F5),
    (b"[17~", EscapeCode::F6),
    (b"[18~", EscapeCode::F7),
    (b"[19~", EscapeCode::F8),
    (b"[20~", EscapeCode::F9),
    (b"[21~", EscapeCode::F10),
    (b"[23~", EscapeCode::F11),
    (b"[24~", EscapeCode::F12),
];

/// Single control bytes with a key meaning.
const CONTROL_BYTES: &[(u8, EscapeCode)] = &[
    (0x1B, EscapeCode::Escape),
    (0x12, EscapeCode::CtrlR),
    (b'\n', EscapeCode::Return),
    (b'\r', EscapeCode::Return),
    (b'\t', EscapeCode::Tab),
    (0x7F, EscapeCode::Backspace),
    (0x08, EscapeCode::Backspace),
];

const ESC: u8 = 0x1B;

/// Decode a raw input burst.
///
/// Returns `None` for anything unrecognised or malformed; a bad burst is
/// never an error for the caller.
pub fn decode(bytes: &[u8]) -> Option<KeyEvent> {
    match bytes {
        [ESC, b'[', b'<', report @ ..] => {
            let parsed = parse_sgr_mouse(report);
            if parsed.is_none() {
                log::debug!("dropping malformed mouse report {:?}", String::from_utf8_lossy(bytes));
            }
            parsed.map(KeyEvent::Mouse)
        }
        [ESC, b'[' | b'O', ..] => {
            let code = lookup(&bytes[1..]);
            if code.is_none() {
                log::debug!("unknown escape sequence {:?}", String::from_utf8_lossy(&bytes[1..]));
            }
            code.map(KeyEvent::Named)
        }
        [byte @ 0x20..=0x7E] => Some(KeyEvent::Char(*byte)),
        [byte] => CONTROL_BYTES
            .iter()
            .find(|(b, _)| b == byte)
            .map(|&(_, code)| KeyEvent::Named(code)),
        _ => None,
    }
}

/// Look up a sequence (without its leading `ESC`) in the escape table.
pub fn lookup(sequence: &[u8]) -> Option<EscapeCode> {
    ESCAPE_SEQUENCES
        .iter()
        .find(|(seq, _)| *seq == sequence)
        .map(|&(_, code)| code)
}

const MOTION_BIT: u16 = 32;
const WHEEL_BIT: u16 = 64;

/// Parse the body of an SGR mouse report: `flags;x;yM` or `flags;x;ym`.
pub fn parse_sgr_mouse(report: &[u8]) -> Option<MouseEvent> {
    let s1 = report.iter().position(|&b| b == b';')?;
    let s2 = s1 + 1 + report[s1 + 1..].iter().position(|&b| b == b';')?;
    let st = s2 + 1 + report[s2 + 1..].iter().position(|&b| b == b'M' || b == b'm')?;

    let flags: u16 = parse_decimal(&report[..s1])?;
    let x = parse_decimal(&report[s1 + 1..s2])?;
    let y = parse_decimal(&report[s2 + 1..st])?;

    #[allow(clippy::cast_possible_truncation)]
    Some(MouseEvent {
        x,
        y,
        pressed: report[st] == b'M',
        button: (flags & 0b11) as u8,
        modifiers: ((flags >> 2) & 0b111) as u8,
        motion: flags & MOTION_BIT != 0,
        wheel: flags & WHEEL_BIT != 0,
    })
}

fn parse_decimal(digits: &[u8]) -> Option<u16> {
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    std::str::from_utf8(digits).ok()?.parse().ok()
}
