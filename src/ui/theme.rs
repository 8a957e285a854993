use crate::preferences::Theme;
use ratatui::style::{Color, Modifier, Style};

/// Colors for one theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub fg: Color,
    pub bg: Color,
    pub correct: Color,
    pub incorrect: Color,
    pub pending: Color,
    pub accent: Color,
    pub warning: Color,
    pub key: Color,
    pub key_active: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                fg: Color::White,
                bg: Color::Black,
                correct: Color::Green,
                incorrect: Color::Red,
                pending: Color::DarkGray,
                accent: Color::Magenta,
                warning: Color::Yellow,
                key: Color::Gray,
                key_active: Color::Cyan,
            },
            Theme::Light => Self {
                fg: Color::Black,
                bg: Color::White,
                correct: Color::Rgb(0, 128, 0),
                incorrect: Color::Rgb(200, 0, 0),
                pending: Color::Gray,
                accent: Color::Blue,
                warning: Color::Rgb(180, 100, 0),
                key: Color::DarkGray,
                key_active: Color::Rgb(0, 110, 180),
            },
        }
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    pub fn bold(&self) -> Style {
        self.base().add_modifier(Modifier::BOLD)
    }

    pub fn correct(&self) -> Style {
        self.bold().fg(self.correct)
    }

    pub fn incorrect(&self) -> Style {
        self.bold().fg(self.incorrect)
    }

    pub fn pending(&self) -> Style {
        self.bold().fg(self.pending)
    }

    pub fn cursor(&self) -> Style {
        self.pending().add_modifier(Modifier::UNDERLINED)
    }

    pub fn accent(&self) -> Style {
        self.base().fg(self.accent)
    }

    pub fn hint(&self) -> Style {
        self.base().fg(self.pending).add_modifier(Modifier::ITALIC)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_themes_differ() {
        let dark = Palette::for_theme(Theme::Dark);
        let light = Palette::for_theme(Theme::Light);
        assert_ne!(dark.bg, light.bg);
        assert_ne!(dark.fg, light.fg);
    }

    #[test]
    fn test_cursor_is_underlined() {
        let p = Palette::for_theme(Theme::Dark);
        assert!(p.cursor().add_modifier.contains(Modifier::UNDERLINED));
    }
}
