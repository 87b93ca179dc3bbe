use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::markup::{parse_verse, TokenKind};
use crate::models::Song;

/// Plum accent used for verse numbers, chorus markers and favorites.
pub(crate) const ACCENT: Color = Color::Rgb(115, 55, 82);

/// Style for each token tag produced by the markup parser.
pub(crate) fn token_style(kind: TokenKind) -> Style {
    match kind {
        TokenKind::PlainText => Style::default(),
        TokenKind::VerseNumberLabel => Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        TokenKind::ChorusMarker | TokenKind::EmphasisWord => Style::default()
            .fg(ACCENT)
            .add_modifier(Modifier::BOLD | Modifier::ITALIC),
    }
}

/// Convert one raw verse into styled terminal lines, one per source line.
pub(crate) fn verse_lines(verse: &str) -> Vec<Line<'static>> {
    parse_verse(verse)
        .into_iter()
        .map(|line| {
            let spans: Vec<Span<'static>> = line
                .tokens
                .into_iter()
                .map(|token| Span::styled(token.text, token_style(token.kind)))
                .collect();
            Line::from(spans)
        })
        .collect()
}

/// Full body of the detail view: subtitle, then every verse separated by a
/// blank line.
pub(crate) fn song_body(song: &Song) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if let Some(subtitle) = &song.subtitle {
        lines.push(Line::from(Span::styled(
            subtitle.clone(),
            Style::default()
                .fg(ACCENT)
                .add_modifier(Modifier::BOLD | Modifier::ITALIC),
        )));
        lines.push(Line::from(""));
    }

    for (idx, verse) in song.verses.iter().enumerate() {
        if idx > 0 {
            lines.push(Line::from(""));
        }
        lines.extend(verse_lines(verse));
    }
    lines
}

/// One entry of the favorites list: number, short title, then the subtitle
/// dimmed when the song has one.
pub(crate) fn favorite_item(song: &Song) -> Line<'static> {
    let mut spans = vec![
        Span::styled(
            format!("{:>4}. ", song.number),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::raw(song.short_title().to_string()),
    ];
    if let Some(subtitle) = &song.subtitle {
        spans.push(Span::styled(
            format!("  {subtitle}"),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ));
    }
    Line::from(spans)
}

/// First grid row to draw so the selected cell stays visible.
pub(crate) fn first_visible_row(selected: usize, columns: usize, visible_rows: usize) -> usize {
    if columns == 0 || visible_rows == 0 {
        return 0;
    }
    let selected_row = selected / columns;
    (selected_row + 1).saturating_sub(visible_rows)
}

/// Split `area` into `count` equally sized slices along `direction`.
pub(crate) fn split_even(area: Rect, direction: Direction, count: usize) -> Vec<Rect> {
    let count = count.max(1) as u32;
    Layout::default()
        .direction(direction)
        .constraints(vec![Constraint::Ratio(1, count); count as usize])
        .split(area)
        .to_vec()
}
