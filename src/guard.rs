use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use std::time::{Duration, Instant};

pub const SHAKE_DURATION: Duration = Duration::from_millis(500);
pub const KEY_HIGHLIGHT_DURATION: Duration = Duration::from_millis(180);

/// A change to the typed text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    Insert(char),
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Rejection {
    Paste,
    Copy,
    Cut,
    SelectAll,
    DragDrop,
    ContextMenu,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accept(Edit),
    /// Non-text key, only drives the on-screen keyboard
    Special(KeyCode),
    Reject(Rejection),
    Ignore,
}

/// Keeps typing manual: clipboard, drag and shortcut routes into the input are refused
#[derive(Debug, Clone, Copy, Default)]
pub struct InputGuard;

impl InputGuard {
    pub fn classify(&self, event: &Event) -> Verdict {
        match event {
            Event::Key(key) => self.classify_key(key),
            Event::Paste(_) => Verdict::Reject(Rejection::Paste),
            Event::Mouse(mouse) => self.classify_mouse(mouse),
            _ => Verdict::Ignore,
        }
    }

    pub fn classify_key(&self, key: &KeyEvent) -> Verdict {
        if key.kind == KeyEventKind::Release {
            return Verdict::Ignore;
        }

        let command = key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::SUPER | KeyModifiers::META);
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);

        match key.code {
            KeyCode::Char(c) if command => match c.to_ascii_lowercase() {
                'v' => Verdict::Reject(Rejection::Paste),
                'c' => Verdict::Reject(Rejection::Copy),
                'x' => Verdict::Reject(Rejection::Cut),
                'a' => Verdict::Reject(Rejection::SelectAll),
                _ => Verdict::Ignore,
            },
            KeyCode::Insert if shift => Verdict::Reject(Rejection::Paste),
            KeyCode::Insert if command => Verdict::Reject(Rejection::Copy),
            KeyCode::Delete if shift => Verdict::Reject(Rejection::Cut),
            KeyCode::Char(_) if key.modifiers.contains(KeyModifiers::ALT) => Verdict::Ignore,
            KeyCode::Char(c) => Verdict::Accept(Edit::Insert(c)),
            KeyCode::Backspace => Verdict::Accept(Edit::Delete),
            code => Verdict::Special(code),
        }
    }

    fn classify_mouse(&self, mouse: &MouseEvent) -> Verdict {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Right) => Verdict::Reject(Rejection::ContextMenu),
            MouseEventKind::Drag(_) => Verdict::Reject(Rejection::DragDrop),
            _ => Verdict::Ignore,
        }
    }
}

/// Short-lived "rejected" cue; clears itself once its window has passed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShakeSignal {
    until: Option<Instant>,
}

impl ShakeSignal {
    pub fn trigger(&mut self, now: Instant) {
        self.until = Some(now + SHAKE_DURATION);
    }

    pub fn is_active(&self, now: Instant) -> bool {
        self.until.is_some_and(|until| now < until)
    }

    pub fn clear(&mut self) {
        self.until = None;
    }
}

/// Most recent key, lit on the on-screen keyboard for a moment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyHighlight {
    key: Option<(KeyCode, Instant)>,
}

impl KeyHighlight {
    pub fn press(&mut self, code: KeyCode, now: Instant) {
        self.key = Some((code, now + KEY_HIGHLIGHT_DURATION));
    }

    pub fn current(&self, now: Instant) -> Option<KeyCode> {
        self.key
            .filter(|(_, until)| now < *until)
            .map(|(code, _)| code)
    }
}
