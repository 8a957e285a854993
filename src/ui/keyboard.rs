use crate::phrases::Language;
use crate::ui::theme::Palette;
use crossterm::event::KeyCode;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

const QWERTY: [&str; 4] = ["`1234567890-=", "qwertyuiop[]\\", "asdfghjkl;'", "zxcvbnm,./"];
const QWERTY_SHIFTED: [&str; 4] = ["~!@#$%^&*()_+", "QWERTYUIOP{}|", "ASDFGHJKL:\"", "ZXCVBNM<>?"];
const AZERTY: [&str; 4] = ["²&é\"'(-è_çà)=", "azertyuiop^$", "qsdfghjklmù*", "<wxcvbn,;:!"];
const AZERTY_SHIFTED: [&str; 4] = ["³1234567890°+", "AZERTYUIOP¨£", "QSDFGHJKLM%µ", ">WXCVBN?./§"];

/// Rows of the on-screen keyboard
pub const HEIGHT: u16 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyId {
    Char { row: usize, col: usize },
    Backspace,
    Tab,
    Enter,
    Space,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyboardLayout {
    plain: [&'static str; 4],
    shifted: [&'static str; 4],
}

impl KeyboardLayout {
    pub fn for_language(language: Language) -> Self {
        match language {
            Language::English => Self {
                plain: QWERTY,
                shifted: QWERTY_SHIFTED,
            },
            Language::French => Self {
                plain: AZERTY,
                shifted: AZERTY_SHIFTED,
            },
        }
    }

    /// Which key produced `code`, if it is on this layout
    pub fn locate(&self, code: KeyCode) -> Option<KeyId> {
        match code {
            KeyCode::Char(' ') => Some(KeyId::Space),
            KeyCode::Char(c) => self.find_char(c),
            KeyCode::Backspace => Some(KeyId::Backspace),
            KeyCode::Tab => Some(KeyId::Tab),
            KeyCode::Enter => Some(KeyId::Enter),
            _ => None,
        }
    }

    fn find_char(&self, c: char) -> Option<KeyId> {
        [self.plain, self.shifted].iter().find_map(|rows| {
            rows.iter().enumerate().find_map(|(row, keys)| {
                keys.chars()
                    .position(|k| k == c)
                    .map(|col| KeyId::Char { row, col })
            })
        })
    }
}

/// On-screen keyboard with the last pressed key lit
pub struct KeyboardWidget {
    pub layout: KeyboardLayout,
    pub active: Option<KeyId>,
    pub palette: Palette,
}

impl KeyboardWidget {
    fn key_span(&self, label: String, id: KeyId) -> Span<'static> {
        let style = if self.active == Some(id) {
            self.palette
                .base()
                .fg(self.palette.bg)
                .bg(self.palette.key_active)
                .add_modifier(Modifier::BOLD)
        } else {
            self.palette.base().fg(self.palette.key)
        };
        Span::styled(label, style)
    }
}

impl Widget for KeyboardWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut lines: Vec<Line> = self
            .layout
            .plain
            .iter()
            .enumerate()
            .map(|(row, keys)| {
                let mut spans: Vec<Span> = Vec::new();
                if row == 1 {
                    spans.push(self.key_span("[tab]".into(), KeyId::Tab));
                }
                spans.extend(keys.chars().enumerate().map(|(col, k)| {
                    self.key_span(format!("[{k}]"), KeyId::Char { row, col })
                }));
                match row {
                    0 => spans.push(self.key_span("[bksp]".into(), KeyId::Backspace)),
                    2 => spans.push(self.key_span("[enter]".into(), KeyId::Enter)),
                    _ => {}
                }
                Line::from(spans)
            })
            .collect();
        lines.push(Line::from(self.key_span(
            format!("[{}]", " ".repeat(24)),
            KeyId::Space,
        )));

        Paragraph::new(lines)
            .style(self.palette.base())
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_plain_and_shifted() {
        let qwerty = KeyboardLayout::for_language(Language::English);
        assert_eq!(
            qwerty.locate(KeyCode::Char('q')),
            Some(KeyId::Char { row: 1, col: 0 })
        );
        assert_eq!(
            qwerty.locate(KeyCode::Char('Q')),
            Some(KeyId::Char { row: 1, col: 0 })
        );
        assert_eq!(
            qwerty.locate(KeyCode::Char('!')),
            Some(KeyId::Char { row: 0, col: 1 })
        );
        assert_eq!(qwerty.locate(KeyCode::Char(' ')), Some(KeyId::Space));
        assert_eq!(qwerty.locate(KeyCode::Backspace), Some(KeyId::Backspace));
        assert_eq!(qwerty.locate(KeyCode::F(1)), None);
    }

    #[test]
    fn test_azerty_places_keys_differently() {
        let azerty = KeyboardLayout::for_language(Language::French);
        assert_eq!(
            azerty.locate(KeyCode::Char('a')),
            Some(KeyId::Char { row: 1, col: 0 })
        );
        assert_eq!(
            azerty.locate(KeyCode::Char('é')),
            Some(KeyId::Char { row: 0, col: 2 })
        );
        assert_eq!(azerty.locate(KeyCode::Char('ê')), None);
    }

    #[test]
    fn test_render_marks_active_key() {
        let palette = Palette::for_theme(crate::preferences::Theme::Dark);
        let widget = KeyboardWidget {
            layout: KeyboardLayout::for_language(Language::English),
            active: Some(KeyId::Char { row: 1, col: 0 }),
            palette,
        };
        let area = Rect::new(0, 0, 80, HEIGHT);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);

        let cells: Vec<_> = buf
            .content()
            .iter()
            .filter(|c| c.symbol() == "q")
            .collect();
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].bg, palette.key_active);
    }
}
