use hymnal::db::{ensure_schema, KeyValueStore, SqliteStore};
use hymnal::{
    parse_verse, render_verse, Catalog, Direction, FavoritesStore, LineKind, Token, FAVORITES_KEY,
};
use tempfile::TempDir;

const THREE_SONGS: &str = r#"[
    {"song_number": 1, "title": "Morning Hymn", "verses": ["1.Awake, my soul"]},
    {"song_number": 2, "title": "Psalm 23 (Crimond)", "verses": ["1.The Lord's my shepherd", "R:/Goodness and mercy"]},
    {"song_number": 3, "title": "Evening Hymn", "sub_title": "Vespers", "verses": ["Glory to Thee (bis)"]}
]"#;

fn setup() -> (TempDir, Catalog) {
    let dir = TempDir::new().unwrap();
    let catalog = Catalog::load(THREE_SONGS).unwrap();
    (dir, catalog)
}

#[test]
fn test_navigation_and_favorites_scenario() {
    let (dir, catalog) = setup();
    let db_path = dir.path().join("favorites.sqlite");

    assert!(catalog.adjacent(1, Direction::Prev).is_none());
    assert_eq!(catalog.adjacent(2, Direction::Next).unwrap().number, 3);

    let mut favorites =
        FavoritesStore::new(SqliteStore::new(ensure_schema(&db_path).unwrap()), &catalog);
    assert!(favorites.toggle(2));
    assert!(favorites.remove(2));
    assert!(!favorites.is_favorite(2));
    assert!(favorites.numbers().is_empty());
}

#[test]
fn test_favorites_survive_a_new_session() {
    let (dir, catalog) = setup();
    let db_path = dir.path().join("favorites.sqlite");

    {
        let mut favorites =
            FavoritesStore::new(SqliteStore::new(ensure_schema(&db_path).unwrap()), &catalog);
        assert!(favorites.toggle(3));
        assert!(favorites.toggle(1));
        assert!(!favorites.toggle(1));
    }

    let mut favorites =
        FavoritesStore::new(SqliteStore::new(ensure_schema(&db_path).unwrap()), &catalog);
    favorites.load();
    assert!(favorites.is_favorite(3));
    assert!(!favorites.is_favorite(1));
    assert_eq!(
        favorites.storage().get(FAVORITES_KEY).unwrap().as_deref(),
        Some("[3]")
    );

    let favorite_songs: Vec<u32> = catalog
        .subset(&favorites.numbers())
        .into_iter()
        .map(|song| song.number)
        .collect();
    assert_eq!(favorite_songs, vec![3]);
}

#[test]
fn test_corrupt_favorites_are_recovered() {
    let (dir, catalog) = setup();
    let db_path = dir.path().join("favorites.sqlite");

    let mut raw = SqliteStore::new(ensure_schema(&db_path).unwrap());
    raw.set(FAVORITES_KEY, "[1, 2,").unwrap();
    drop(raw);

    let mut favorites =
        FavoritesStore::new(SqliteStore::new(ensure_schema(&db_path).unwrap()), &catalog);
    assert!(favorites.numbers().is_empty());
    assert!(favorites.toggle(2));
    assert_eq!(
        favorites.storage().get(FAVORITES_KEY).unwrap().as_deref(),
        Some("[2]")
    );
}

#[test]
fn test_verse_parsing_scenario() {
    let raw = "R:/Hallelujah\n1.Praise the Lord (ter)";
    let lines = parse_verse(raw);

    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].kind, LineKind::Chorus);
    assert_eq!(
        lines[0].tokens,
        vec![Token::chorus_marker(), Token::plain("Hallelujah")]
    );
    assert_eq!(lines[1].kind, LineKind::Numbered);
    assert_eq!(
        lines[1].tokens,
        vec![
            Token::verse_number("1."),
            Token::plain("Praise the Lord "),
            Token::emphasis("(ter)"),
        ]
    );
    assert_eq!(render_verse(&lines), raw);
}

#[test]
fn test_every_bundled_verse_round_trips() {
    let catalog = Catalog::bundled().unwrap();
    for song in catalog.iter() {
        for verse in &song.verses {
            assert_eq!(&render_verse(&parse_verse(verse)), verse, "song {}", song.number);
        }
    }
}

#[test]
fn test_search_union_and_order() {
    let (_dir, catalog) = setup();

    let all: Vec<u32> = catalog.search("").map(|song| song.number).collect();
    assert_eq!(all, vec![1, 2, 3]);

    // 23 appears in the title of song 2; 3 is an exact number match.
    let hits: Vec<u32> = catalog.search("3").map(|song| song.number).collect();
    assert_eq!(hits, vec![2, 3]);

    let hymns: Vec<u32> = catalog.search("hymn").map(|song| song.number).collect();
    assert_eq!(hymns, vec![1, 3]);
}

#[test]
fn test_search_trims_only_the_number() {
    let (_dir, catalog) = setup();

    // Both hymn titles end on "Hymn", so a trailing space rules them out.
    let hymns: Vec<u32> = catalog.search("hymn ").map(|song| song.number).collect();
    assert!(hymns.is_empty());

    let padded: Vec<u32> = catalog.search(" 3 ").map(|song| song.number).collect();
    assert_eq!(padded, vec![3]);

    let spaced: Vec<u32> = catalog.search(" ").map(|song| song.number).collect();
    assert_eq!(spaced, vec![1, 2, 3]);
}
