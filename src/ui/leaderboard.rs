use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::Span,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Widget},
};

use crate::{app::App, scoring, scoring::Mode, scoring::ScoreEntry, ui::theme::Palette};

/// Presenter for one leaderboard row
pub fn present_row(rank: usize, entry: &ScoreEntry, palette: &Palette) -> Row<'static> {
    let accuracy_style = match entry.accuracy_percent {
        100 => palette.base().fg(palette.correct),
        90..=99 => palette.base(),
        _ => palette.base().fg(palette.warning),
    };
    let mode_style = match entry.mode {
        Mode::Challenge => palette.accent(),
        Mode::Normal => palette.base(),
    };

    Row::new(vec![
        Cell::from(format!("#{rank}")),
        Cell::from(entry.words_per_minute.to_string()).style(palette.bold()),
        Cell::from(format!("{}%", entry.accuracy_percent)).style(accuracy_style),
        Cell::from(entry.mode.to_string()).style(mode_style),
        Cell::from(entry.completed_at.format("%Y-%m-%d %H:%M").to_string()),
    ])
}

pub fn render_leaderboard(app: &App, area: Rect, buf: &mut Buffer, palette: &Palette) {
    let board = app.game.leaderboard();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Min(0),    // table
            Constraint::Length(1), // summary
            Constraint::Length(1), // padding
            Constraint::Length(1), // legend
        ])
        .split(area);

    let block = Block::default()
        .title(Span::styled(" Leaderboard ", palette.bold()))
        .borders(Borders::ALL)
        .border_style(palette.accent());

    if board.is_empty() {
        Paragraph::new(Span::styled("No scores yet. Finish a phrase to get on the board.", palette.hint()))
            .alignment(Alignment::Center)
            .block(block)
            .render(chunks[0], buf);
    } else {
        let rows = board
            .entries()
            .iter()
            .enumerate()
            .map(|(idx, entry)| present_row(idx + 1, entry, palette))
            .collect::<Vec<_>>();
        let header = Row::new(vec!["rank", "wpm", "acc", "mode", "date"])
            .style(palette.bold().add_modifier(Modifier::UNDERLINED));
        let widths = [
            Constraint::Length(5),
            Constraint::Length(6),
            Constraint::Length(6),
            Constraint::Length(10),
            Constraint::Min(16),
        ];
        Table::new(rows, widths)
            .header(header)
            .style(palette.base())
            .block(block)
            .render(chunks[0], buf);
    }

    Paragraph::new(Span::styled(summary(board.entries()), palette.bold()))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    Paragraph::new(Span::styled("(F4/esc) back   (F5) share", palette.hint()))
        .render(chunks[3], buf);
}

fn summary(entries: &[ScoreEntry]) -> String {
    let Some(mean) = scoring::mean_wpm(entries) else {
        return String::new();
    };
    let counts = entries
        .iter()
        .counts_by(|e| e.mode)
        .into_iter()
        .sorted_by_key(|(mode, _)| mode.to_string())
        .map(|(mode, n)| format!("{n} {mode}"))
        .join(", ");
    format!("average {mean:.1} wpm   ({counts})")
}
