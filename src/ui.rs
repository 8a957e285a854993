pub mod keyboard;
pub mod leaderboard;
pub mod theme;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    app::{App, AppState, Notice},
    session::TypingSession,
    ui::{
        keyboard::{KeyboardLayout, KeyboardWidget},
        theme::Palette,
    },
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;
const NOTICE_WIDTH: u16 = 60;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let palette = Palette::for_theme(self.game.preferences().theme);
        buf.set_style(area, palette.base());

        match self.state {
            AppState::Typing => render_typing(self, area, buf, &palette),
            AppState::Leaderboard => leaderboard::render_leaderboard(self, area, buf, &palette),
        }

        if let Some(notice) = self.notice() {
            render_notice(notice, area, buf, &palette);
        }
    }
}

fn render_typing(app: &App, area: Rect, buf: &mut Buffer, palette: &Palette) {
    let game = &app.game;
    let now = app.now();
    let session = game.session();
    let shaking = game.is_shaking(now);

    // two columns go to the prompt border
    let max_chars_per_line = area
        .width
        .saturating_sub(HORIZONTAL_MARGIN * 2 + 2)
        .max(1) as usize;
    let prompt_lines = session
        .target_phrase()
        .width()
        .div_ceil(max_chars_per_line)
        .clamp(1, u16::MAX as usize) as u16;
    let keyboard_height = if app.show_keyboard { keyboard::HEIGHT } else { 0 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1),                // status
            Constraint::Length(1),                // challenge
            Constraint::Min(0),                   // padding
            Constraint::Length(prompt_lines + 2), // prompt
            Constraint::Length(1),                // live stats
            Constraint::Length(1),                // last result
            Constraint::Min(0),                   // padding
            Constraint::Length(keyboard_height),
            Constraint::Length(1), // legend
        ])
        .split(area);

    let prefs = game.preferences();
    let status = Line::from(vec![
        Span::styled(prefs.language.to_string(), palette.accent()),
        Span::styled(format!("  {} theme", prefs.theme), palette.base()),
        Span::styled(format!("  high score {} wpm", prefs.high_score), palette.bold()),
        Span::styled(
            format!("  best challenge {}", prefs.best_challenge_score),
            palette.bold(),
        ),
    ]);
    Paragraph::new(status)
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

    Paragraph::new(challenge_line(app, palette))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    let mut prompt_area = chunks[3];
    if shaking && now.wall.timestamp_subsec_millis() / 50 % 2 == 0 {
        prompt_area.x = prompt_area.x.saturating_add(1);
        prompt_area.width = prompt_area.width.saturating_sub(1);
    }
    let border_style = if shaking {
        palette.base().fg(palette.incorrect)
    } else {
        palette.base().fg(palette.pending)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style);

    let prompt = if session.is_loading() {
        Paragraph::new(Span::styled("Loading phrase...", palette.hint()))
            .alignment(Alignment::Center)
    } else {
        Paragraph::new(Line::from(prompt_spans(session, palette)))
            .alignment(if prompt_lines == 1 {
                Alignment::Center
            } else {
                Alignment::Left
            })
            .wrap(Wrap { trim: false })
    };
    prompt.block(block).render(prompt_area, buf);

    let stats = game.stats(now);
    Paragraph::new(Span::styled(
        format!(
            "{} wpm   {}% acc   {}s   {}/{}",
            stats.wpm,
            stats.accuracy,
            stats.elapsed_secs,
            session.correct_prefix_len(),
            session.target_len()
        ),
        palette.bold(),
    ))
    .alignment(Alignment::Center)
    .render(chunks[4], buf);

    if let Some(last) = game.last_result() {
        Paragraph::new(Span::styled(
            format!(
                "last phrase: {} wpm, {}% accuracy ({})",
                last.words_per_minute, last.accuracy_percent, last.mode
            ),
            palette.accent(),
        ))
        .alignment(Alignment::Center)
        .render(chunks[5], buf);
    }

    if app.show_keyboard {
        let layout = KeyboardLayout::for_language(prefs.language);
        KeyboardWidget {
            layout,
            active: game.highlighted_key(now).and_then(|code| layout.locate(code)),
            palette: *palette,
        }
        .render(chunks[7], buf);
    }

    Paragraph::new(Span::styled(
        "(F1) language  (F2) theme  (F3) challenge  (F4) scores  (F5) share  (F6) skip  (esc) quit",
        palette.hint(),
    ))
    .wrap(Wrap { trim: true })
    .render(chunks[8], buf);
}

fn challenge_line(app: &App, palette: &Palette) -> Line<'static> {
    let game = &app.game;
    let state = game.challenge_state();
    if state.active {
        Line::from(Span::styled(
            format!(
                "challenge: {}s left   {} done",
                state.seconds_remaining,
                game.challenge_score()
            ),
            palette.bold().fg(palette.warning),
        ))
    } else if let Some(summary) = game
        .last_challenge()
        .filter(|_| !game.challenge().accepts_input())
    {
        Line::from(Span::styled(
            format!("time's up: {} phrases   (F3) go again", summary.score),
            palette.bold().fg(palette.warning),
        ))
    } else {
        Line::from(Span::styled("(F3) start a challenge", palette.hint()))
    }
}

/// Typed characters colored against the phrase, then the cursor and the rest
pub fn prompt_spans(session: &TypingSession, palette: &Palette) -> Vec<Span<'static>> {
    let typed_len = session.typed_input().chars().count();
    let mut spans = session
        .typed_input()
        .chars()
        .enumerate()
        .map(|(idx, c)| {
            if session.expected_char(idx) == Some(c) {
                Span::styled(c.to_string(), palette.correct())
            } else {
                Span::styled(
                    match c {
                        ' ' => "·".to_owned(),
                        c => c.to_string(),
                    },
                    palette.incorrect(),
                )
            }
        })
        .collect::<Vec<Span>>();

    if let Some(cursor) = session.expected_char(typed_len) {
        spans.push(Span::styled(cursor.to_string(), palette.cursor()));
        let rest: String = session.target_phrase().chars().skip(typed_len + 1).collect();
        spans.push(Span::styled(rest, palette.pending()));
    }
    spans
}

fn render_notice(notice: &Notice, area: Rect, buf: &mut Buffer, palette: &Palette) {
    let width = NOTICE_WIDTH.min(area.width);
    let inner_width = width.saturating_sub(2).max(1) as usize;
    let body_lines = notice.body.width().div_ceil(inner_width).max(1) as u16;
    let height = (body_lines + 4).min(area.height);
    let popup = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );

    Clear.render(popup, buf);
    let text = vec![
        Line::from(Span::styled(notice.body.clone(), palette.bold())),
        Line::from(""),
        Line::from(Span::styled("(enter/esc) close", palette.hint())),
    ];
    Paragraph::new(text)
        .style(palette.base())
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(Span::styled(format!(" {} ", notice.title), palette.bold()))
                .borders(Borders::ALL)
                .border_style(palette.accent()),
        )
        .render(popup, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::Moment;
    use crate::game::{Game, GameOptions};
    use crate::phrases::{Language, LocalPhrases, PhraseRequest, PhraseSource, Pick, Ticket};
    use crate::preferences::Theme;
    use crate::share::ShareCascade;
    use crate::storage::MemoryStore;
    use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{buffer::Buffer, layout::Rect};
    use std::time::Duration;

    fn create_test_app(prompt: &str) -> App {
        let now = Moment::now();
        let source = LocalPhrases::from_lists(
            vec![prompt.to_string(), "next one".into()],
            vec!["bonjour".into()],
            Pick::Sequential,
        );
        let game = Game::new(
            Box::new(MemoryStore::new()),
            Box::new(source),
            GameOptions::default(),
            now,
        );
        App::new(game, ShareCascade::new(vec![], vec![]), true, now)
    }

    fn render(app: &App, area: Rect) -> Buffer {
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        buffer
    }

    fn text(buffer: &Buffer) -> String {
        buffer
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    fn press(app: &mut App, code: KeyCode) {
        let now = app.now();
        app.handle_input(&Event::Key(KeyEvent::new(code, KeyModifiers::NONE)), now);
    }

    #[test]
    fn test_ui_shows_prompt_and_legend() {
        let app = create_test_app("hello world");
        let rendered = text(&render(&app, Rect::new(0, 0, 100, 24)));
        assert!(rendered.contains("hello world"));
        assert!(rendered.contains("(F3) challenge"));
        assert!(rendered.contains("high score 0 wpm"));
        assert!(rendered.contains("[q]"));
    }

    #[test]
    fn test_ui_colors_typed_characters() {
        let mut app = create_test_app("abc");
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Char(' '));
        let palette = Palette::for_theme(Theme::Dark);
        let buffer = render(&app, Rect::new(0, 0, 80, 24));

        let wrong = buffer
            .content()
            .iter()
            .find(|c| c.symbol() == "·")
            .expect("mismatched space is drawn as a dot");
        assert_eq!(wrong.fg, palette.incorrect);

        let spans = prompt_spans(app.game.session(), &palette);
        assert_eq!(spans.len(), 4);
        assert_eq!(spans[0].style.fg, Some(palette.correct));
        assert_eq!(spans[2].content, "c");
        assert_eq!(spans[3].content, "");
    }

    #[test]
    fn test_ui_border_turns_red_while_shaking() {
        let mut app = create_test_app("abc");
        let now = app.now();
        app.handle_input(&Event::Paste("abc".into()), now);
        let palette = Palette::for_theme(Theme::Dark);

        let buffer = render(&app, Rect::new(0, 0, 80, 24));
        let corner = buffer
            .content()
            .iter()
            .find(|c| c.symbol() == "┌")
            .unwrap();
        assert_eq!(corner.fg, palette.incorrect);

        app.on_tick(now.after(Duration::from_secs(1)));
        let buffer = render(&app, Rect::new(0, 0, 80, 24));
        let corner = buffer
            .content()
            .iter()
            .find(|c| c.symbol() == "┌")
            .unwrap();
        assert_eq!(corner.fg, palette.pending);
    }

    #[test]
    fn test_ui_light_theme_background() {
        let mut app = create_test_app("abc");
        press(&mut app, KeyCode::F(2));
        let buffer = render(&app, Rect::new(0, 0, 80, 24));
        let light = Palette::for_theme(Theme::Light);
        assert!(buffer.content().iter().all(|c| c.bg == light.bg || c.bg == light.key_active));
    }

    #[test]
    fn test_ui_hides_keyboard() {
        let mut app = create_test_app("abc");
        app.show_keyboard = false;
        let rendered = text(&render(&app, Rect::new(0, 0, 80, 24)));
        assert!(!rendered.contains("[q]"));
    }

    #[test]
    fn test_ui_challenge_countdown() {
        let mut app = create_test_app("abc");
        press(&mut app, KeyCode::F(3));
        let t0 = app.now();
        app.on_tick(t0.after(Duration::from_millis(2_050)));
        let rendered = text(&render(&app, Rect::new(0, 0, 80, 24)));
        assert!(rendered.contains("challenge: 58s left"));
    }

    #[test]
    fn test_ui_leaderboard_screen() {
        let mut app = create_test_app("ab");
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Char('b'));
        press(&mut app, KeyCode::F(4));

        let rendered = text(&render(&app, Rect::new(0, 0, 80, 24)));
        assert!(rendered.contains("Leaderboard"));
        assert!(rendered.contains("#1"));
        assert!(rendered.contains("normal"));
        assert!(rendered.contains("100%"));
    }

    #[test]
    fn test_ui_empty_leaderboard() {
        let mut app = create_test_app("ab");
        press(&mut app, KeyCode::F(4));
        let rendered = text(&render(&app, Rect::new(0, 0, 80, 24)));
        assert!(rendered.contains("No scores yet"));
    }

    #[test]
    fn test_ui_notice_box() {
        let mut app = create_test_app("ab");
        press(&mut app, KeyCode::F(5));
        let rendered = text(&render(&app, Rect::new(0, 0, 80, 24)));
        assert!(rendered.contains("Share"));
        assert!(rendered.contains("(enter/esc) close"));
    }

    #[test]
    fn test_ui_loading_placeholder() {
        struct Deferred;
        impl PhraseSource for Deferred {
            fn request(&mut self, _language: Language, _ticket: Ticket) -> PhraseRequest {
                PhraseRequest::Pending
            }
        }

        let now = Moment::now();
        let game = Game::new(
            Box::new(MemoryStore::new()),
            Box::new(Deferred),
            GameOptions::default(),
            now,
        );
        let app = App::new(game, ShareCascade::new(vec![], vec![]), true, now);
        let rendered = text(&render(&app, Rect::new(0, 0, 80, 24)));
        assert!(rendered.contains("Loading phrase..."));
    }

    #[test]
    fn test_ui_extreme_sizes() {
        let mut app = create_test_app("a long phrase that will need to wrap in a narrow terminal");
        press(&mut app, KeyCode::F(5));

        for area in [
            Rect::new(0, 0, 10, 5),
            Rect::new(0, 0, 1, 1),
            Rect::new(0, 0, 300, 100),
        ] {
            let buffer = render(&app, area);
            assert_eq!(*buffer.area(), area);
        }
    }
}
