use std::mem;

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction as LayoutDirection, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;
use tracing::debug;

use crate::catalog::Catalog;
use crate::db::SqliteStore;
use crate::favorites::FavoritesStore;
use crate::models::Direction;

use super::helpers::{favorite_item, first_visible_row, song_body, split_even, ACCENT};
use super::screens::{FavoritesScreen, Origin, SongDetailScreen, SongListScreen};

/// Song numbers per row of the start grid.
const GRID_COLUMNS: usize = 5;
/// Height of one number cell, borders included.
const CELL_HEIGHT: u16 = 3;
/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Lines moved by PageUp / PageDown in the detail view.
const PAGE_SCROLL: i32 = 10;

/// High-level navigation states.
enum Screen {
    SongList,
    SongDetail(SongDetailScreen),
    Favorites(FavoritesScreen),
}

/// Fine-grained modes scoped to the current screen.
enum Mode {
    Normal,
    Searching,
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App {
    catalog: Catalog,
    favorites: FavoritesStore<SqliteStore>,
    /// Sorted snapshot of the favorites for drawing.
    favorite_numbers: Vec<u32>,
    list: SongListScreen,
    screen: Screen,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(catalog: Catalog, favorites: FavoritesStore<SqliteStore>) -> Self {
        let list = SongListScreen::new(&catalog);
        let mut app = Self {
            catalog,
            favorites,
            favorite_numbers: Vec::new(),
            list,
            screen: Screen::SongList,
            mode: Mode::Normal,
            status: None,
        };
        app.refresh_favorites();
        app
    }

    /// Feed one key press. Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::Searching => self.handle_search(code)?,
        };

        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match self.screen {
            Screen::SongList => match code {
                KeyCode::Char('q') => *exit = true,
                KeyCode::Esc => {
                    if self.list.query.is_empty() {
                        *exit = true;
                    } else {
                        self.list.set_query(&self.catalog, String::new());
                        self.clear_status();
                    }
                }
                KeyCode::Left => self.list.move_selection(-1),
                KeyCode::Right => self.list.move_selection(1),
                KeyCode::Up => self.list.move_selection(-(GRID_COLUMNS as isize)),
                KeyCode::Down => self.list.move_selection(GRID_COLUMNS as isize),
                KeyCode::Home => self.list.select_first(),
                KeyCode::End => self.list.select_last(),
                KeyCode::Char('/') | KeyCode::Char('f') => {
                    self.clear_status();
                    return Ok(Mode::Searching);
                }
                KeyCode::Char('h') | KeyCode::Char('H') => {
                    self.clear_status();
                    self.open_favorites();
                }
                KeyCode::Enter => match self.list.current() {
                    Some(number) => self.open_song(number, Origin::SongList),
                    None => self.set_status("No song selected.", StatusKind::Error),
                },
                _ => {}
            },
            Screen::SongDetail(ref mut detail) => match code {
                KeyCode::Char('q') => *exit = true,
                KeyCode::Esc | KeyCode::Backspace => {
                    let origin = detail.origin;
                    let number = detail.number;
                    self.clear_status();
                    self.close_song(origin, number);
                }
                KeyCode::Up => detail.scroll_by(-1),
                KeyCode::Down => detail.scroll_by(1),
                KeyCode::PageUp => detail.scroll_by(-PAGE_SCROLL),
                KeyCode::PageDown => detail.scroll_by(PAGE_SCROLL),
                KeyCode::Home => detail.scroll = 0,
                KeyCode::Left => self.step_song(Direction::Prev),
                KeyCode::Right => self.step_song(Direction::Next),
                KeyCode::Char(' ') | KeyCode::Char('f') => {
                    let number = detail.number;
                    self.toggle_favorite(number);
                }
                _ => {}
            },
            Screen::Favorites(ref mut favorites) => match code {
                KeyCode::Char('q') => *exit = true,
                KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('H') => {
                    self.clear_status();
                    self.screen = Screen::SongList;
                }
                KeyCode::Up => favorites.move_selection(-1),
                KeyCode::Down => favorites.move_selection(1),
                KeyCode::Enter => {
                    if let Some(number) = favorites.current() {
                        self.open_song(number, Origin::Favorites);
                    }
                }
                KeyCode::Char('-') | KeyCode::Delete => match favorites.current() {
                    Some(number) => self.remove_favorite(number),
                    None => self.set_status("No favorite selected to remove.", StatusKind::Error),
                },
                _ => {}
            },
        }
        Ok(Mode::Normal)
    }

    fn handle_search(&mut self, code: KeyCode) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.list.set_query(&self.catalog, String::new());
                return Ok(Mode::Normal);
            }
            KeyCode::Enter => {
                if let Some(number) = self.list.current() {
                    self.open_song(number, Origin::SongList);
                    return Ok(Mode::Normal);
                }
                self.set_status("No song matches the search.", StatusKind::Error);
            }
            KeyCode::Left => self.list.move_selection(-1),
            KeyCode::Right => self.list.move_selection(1),
            KeyCode::Up => self.list.move_selection(-(GRID_COLUMNS as isize)),
            KeyCode::Down => self.list.move_selection(GRID_COLUMNS as isize),
            KeyCode::Backspace => {
                let mut query = self.list.query.clone();
                query.pop();
                self.list.set_query(&self.catalog, query);
            }
            KeyCode::Char(ch) => {
                let mut query = self.list.query.clone();
                query.push(ch);
                self.list.set_query(&self.catalog, query);
            }
            _ => {}
        }
        Ok(Mode::Searching)
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(LayoutDirection::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        match &self.screen {
            Screen::SongList => self.draw_song_grid(frame, content_area),
            Screen::SongDetail(detail) => self.draw_song_detail(frame, content_area, detail),
            Screen::Favorites(favorites) => self.draw_favorites(frame, content_area, favorites),
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        if let Mode::Searching = self.mode {
            self.draw_search_bar(frame, area);
        }
    }

    fn draw_song_grid(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Hymnes et Cantiques");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        // Leave room for the search bar overlay.
        let grid_area = Rect {
            y: inner.y.saturating_add(2),
            height: inner.height.saturating_sub(2),
            ..inner
        };

        if self.list.numbers.is_empty() {
            let message = Paragraph::new("No song matches the search.")
                .alignment(Alignment::Center);
            frame.render_widget(message, grid_area);
            return;
        }

        let visible_rows = (grid_area.height / CELL_HEIGHT).max(1) as usize;
        let first_row = first_visible_row(self.list.selected, GRID_COLUMNS, visible_rows);
        let row_areas = split_even(
            Rect {
                height: (visible_rows as u16 * CELL_HEIGHT).min(grid_area.height),
                ..grid_area
            },
            LayoutDirection::Vertical,
            visible_rows,
        );

        for (row_offset, row_area) in row_areas.into_iter().enumerate() {
            let row = first_row + row_offset;
            let cells = split_even(row_area, LayoutDirection::Horizontal, GRID_COLUMNS);
            for (col, cell_area) in cells.into_iter().enumerate() {
                let position = row * GRID_COLUMNS + col;
                let Some(&number) = self.list.numbers.get(position) else {
                    return;
                };
                frame.render_widget(self.number_cell(number, position), cell_area);
            }
        }
    }

    fn number_cell(&self, number: u32, position: usize) -> Paragraph<'static> {
        let favorite = self.is_favorite(number);
        let selected = position == self.list.selected;

        let base = Style::default().add_modifier(Modifier::BOLD);
        let text_style = if favorite {
            base.fg(Color::White).bg(ACCENT)
        } else {
            base.fg(ACCENT)
        };

        let mut block = Block::default().borders(Borders::ALL);
        if selected {
            block = block.border_style(Style::default().fg(Color::Yellow));
        }

        Paragraph::new(Line::from(Span::styled(number.to_string(), text_style)))
            .alignment(Alignment::Center)
            .block(block)
    }

    fn draw_song_detail(&self, frame: &mut Frame, area: Rect, detail: &SongDetailScreen) {
        let Some(song) = self.catalog.by_number(detail.number) else {
            let message = Paragraph::new(format!("Song {} is not in the catalog.", detail.number))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(message, area);
            return;
        };

        let marker = if self.is_favorite(song.number) {
            " ♥"
        } else {
            ""
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(
                format!("{}{marker}", song.heading()),
                Style::default().add_modifier(Modifier::BOLD),
            ));

        let paragraph = Paragraph::new(song_body(song))
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((detail.scroll, 0));
        frame.render_widget(paragraph, area);
    }

    fn draw_favorites(&self, frame: &mut Frame, area: Rect, favorites: &FavoritesScreen) {
        let block = Block::default().borders(Borders::ALL).title("Favorites");

        if favorites.numbers.is_empty() {
            let message = Paragraph::new("No favorites yet")
                .alignment(Alignment::Center)
                .style(Style::default().fg(ACCENT))
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        let items: Vec<ListItem> = favorites
            .numbers
            .iter()
            .filter_map(|&number| self.catalog.by_number(number))
            .map(|song| ListItem::new(favorite_item(song)))
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        let mut list_state = ListState::default();
        list_state.select(Some(favorites.selected));
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_search_bar(&self, frame: &mut Frame, area: Rect) {
        let height = 3u16.min(area.height);
        let popup_area = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height,
        };
        frame.render_widget(Clear, popup_area);

        let block = Block::default().borders(Borders::ALL).title("Search");
        let paragraph = Paragraph::new(Span::raw(format!("Number or title: {}", self.list.query)))
            .block(block.clone())
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);

        let inner = block.inner(popup_area);
        let cursor_x = inner.x
            + "Number or title: ".len() as u16
            + self.list.query.chars().count() as u16;
        frame.set_cursor_position((cursor_x, inner.y));
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let keys: &[(&str, &str)] = match (&self.screen, &self.mode) {
            (_, Mode::Searching) => &[
                ("[Type]", " Filter   "),
                ("[←↑↓→]", " Move   "),
                ("[Enter]", " Open   "),
                ("[Esc]", " Clear"),
            ],
            (Screen::SongList, _) => &[
                ("[←↑↓→]", " Move   "),
                ("[Enter]", " Open   "),
                ("[/]", " Search   "),
                ("[h]", " Favorites   "),
                ("[q]", " Quit"),
            ],
            (Screen::SongDetail(_), _) => &[
                ("[←→]", " Previous/Next   "),
                ("[↑↓]", " Scroll   "),
                ("[Space]", " Favorite   "),
                ("[Esc]", " Back   "),
                ("[q]", " Quit"),
            ],
            (Screen::Favorites(_), _) => &[
                ("[↑↓]", " Move   "),
                ("[Enter]", " Open   "),
                ("[-]", " Remove   "),
                ("[Esc]", " Back   "),
                ("[q]", " Quit"),
            ],
        };

        let spans: Vec<Span<'static>> = keys
            .iter()
            .flat_map(|(key, label)| {
                [
                    Span::styled(key.to_string(), key_style),
                    Span::raw(label.to_string()),
                ]
            })
            .collect();
        Line::from(spans)
    }

    fn open_song(&mut self, number: u32, origin: Origin) {
        if let Some(song) = self.catalog.by_number(number) {
            debug!(%song, "opening song");
            self.clear_status();
            self.screen = Screen::SongDetail(SongDetailScreen::new(number, origin));
        } else {
            self.set_status(format!("Song {number} is not in the catalog."), StatusKind::Error);
        }
    }

    /// Leave the detail view, landing on the song just read.
    fn close_song(&mut self, origin: Origin, number: u32) {
        match origin {
            Origin::SongList => {
                self.list.select_number(number);
                self.screen = Screen::SongList;
            }
            Origin::Favorites => self.open_favorites(),
        }
    }

    fn step_song(&mut self, direction: Direction) {
        let Screen::SongDetail(detail) = &mut self.screen else {
            return;
        };
        let neighbour = self
            .catalog
            .adjacent(detail.number, direction)
            .map(|song| song.number);

        match neighbour {
            Some(number) => {
                detail.show(number);
                self.clear_status();
            }
            None => {
                let message = match direction {
                    Direction::Prev => "No previous song.",
                    Direction::Next => "No next song.",
                };
                self.set_status(message, StatusKind::Info);
            }
        }
    }

    fn open_favorites(&mut self) {
        let numbers = self.favorite_songs_in_order();
        self.screen = Screen::Favorites(FavoritesScreen::new(numbers));
    }

    fn toggle_favorite(&mut self, number: u32) {
        let favorited = self.favorites.toggle(number);
        self.refresh_favorites();
        let message = if favorited {
            format!("Added {number} to favorites.")
        } else {
            format!("Removed {number} from favorites.")
        };
        self.set_status(message, StatusKind::Info);
    }

    fn remove_favorite(&mut self, number: u32) {
        if self.favorites.remove(number) {
            self.set_status(format!("Removed {number} from favorites."), StatusKind::Info);
        }
        self.refresh_favorites();
        let numbers = self.favorite_songs_in_order();
        if let Screen::Favorites(favorites) = &mut self.screen {
            favorites.set_numbers(numbers);
        }
    }

    fn refresh_favorites(&mut self) {
        self.favorite_numbers = self.favorites.numbers();
    }

    fn favorite_songs_in_order(&self) -> Vec<u32> {
        self.catalog
            .subset(&self.favorite_numbers)
            .into_iter()
            .map(|song| song.number)
            .collect()
    }

    fn is_favorite(&self, number: u32) -> bool {
        self.favorite_numbers.binary_search(&number).is_ok()
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }
}
