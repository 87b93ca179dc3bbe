use crate::catalog::Catalog;

/// Number grid shown on the start screen, narrowed by the current search.
pub(crate) struct SongListScreen {
    pub(crate) query: String,
    pub(crate) numbers: Vec<u32>,
    pub(crate) selected: usize,
}

impl SongListScreen {
    pub(crate) fn new(catalog: &Catalog) -> Self {
        let mut screen = Self {
            query: String::new(),
            numbers: Vec::new(),
            selected: 0,
        };
        screen.apply_filter(catalog);
        screen
    }

    /// Re-run the catalog search for the current query, keeping the selected
    /// song selected when it is still part of the results.
    pub(crate) fn apply_filter(&mut self, catalog: &Catalog) {
        let previous = self.current();
        self.numbers = catalog.search(&self.query).map(|song| song.number).collect();
        self.selected = previous
            .and_then(|number| self.numbers.iter().position(|&n| n == number))
            .unwrap_or(0);
    }

    pub(crate) fn set_query(&mut self, catalog: &Catalog, query: String) {
        self.query = query;
        self.apply_filter(catalog);
    }

    pub(crate) fn current(&self) -> Option<u32> {
        self.numbers.get(self.selected).copied()
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        self.selected = clamp_offset(self.selected, offset, self.numbers.len());
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) {
        self.selected = self.numbers.len().saturating_sub(1);
    }

    /// Move the cursor onto `number` if it is visible in the grid.
    pub(crate) fn select_number(&mut self, number: u32) {
        if let Some(position) = self.numbers.iter().position(|&n| n == number) {
            self.selected = position;
        }
    }
}

/// Where the detail view returns to on Esc.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Origin {
    SongList,
    Favorites,
}

/// Song being read. Only the number travels between screens; the song itself
/// is resolved from the catalog on every draw.
pub(crate) struct SongDetailScreen {
    pub(crate) number: u32,
    pub(crate) scroll: u16,
    pub(crate) origin: Origin,
}

impl SongDetailScreen {
    pub(crate) fn new(number: u32, origin: Origin) -> Self {
        Self {
            number,
            scroll: 0,
            origin,
        }
    }

    pub(crate) fn show(&mut self, number: u32) {
        self.number = number;
        self.scroll = 0;
    }

    pub(crate) fn scroll_by(&mut self, offset: i32) {
        let next = (self.scroll as i32 + offset).clamp(0, u16::MAX as i32);
        self.scroll = next as u16;
    }
}

/// Favorites in catalog order.
pub(crate) struct FavoritesScreen {
    pub(crate) numbers: Vec<u32>,
    pub(crate) selected: usize,
}

impl FavoritesScreen {
    pub(crate) fn new(numbers: Vec<u32>) -> Self {
        Self {
            numbers,
            selected: 0,
        }
    }

    pub(crate) fn set_numbers(&mut self, numbers: Vec<u32>) {
        self.numbers = numbers;
        self.selected = self.selected.min(self.numbers.len().saturating_sub(1));
    }

    pub(crate) fn current(&self) -> Option<u32> {
        self.numbers.get(self.selected).copied()
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        self.selected = clamp_offset(self.selected, offset, self.numbers.len());
    }
}

fn clamp_offset(current: usize, offset: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let next = current as isize + offset;
    next.clamp(0, len as isize - 1) as usize
}
