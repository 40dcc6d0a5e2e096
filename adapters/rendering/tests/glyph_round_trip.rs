use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sokobot_core::{ChannelId, LevelId, PlayerId};
use sokobot_rendering::{render_board, render_session, GlyphTheme};
use sokobot_session::{GameMode, LevelSource, SessionConfig, SessionRegistry};
use sokobot_system_level_generator::LevelGenerator;
use sokobot_system_level_parser::parse_level;
use sokobot_world::{query, Board};

#[test]
fn drawn_generated_boards_parse_back_to_the_same_layout() {
    let theme = GlyphTheme::default();
    let generator = LevelGenerator::default();

    for (level, seed) in [(1, 1), (9, 2), (33, 3), (120, 4)] {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let grid = generator
            .generate(LevelId::new(level), &mut rng)
            .expect("level generates");
        let board = Board::new(grid.clone(), None).expect("generated board has a player");

        let frame = render_board(&board, format!("Level {level}"), &theme, Some("🐸"))
            .expect("frog glyph is free");
        let text = frame
            .to_level_text(&theme, Some("🐸"))
            .expect("every glyph belongs to the theme");
        let parsed = parse_level(&text).expect("drawn level is playable");

        assert_eq!(parsed.grid, grid, "level {level}");
    }
}

#[test]
fn session_frames_use_the_session_title_and_glyph() {
    let mut registry = SessionRegistry::new(SessionConfig::default(), 99);
    let session = registry
        .create(
            PlayerId::new(5),
            ChannelId::new(6),
            LevelSource::Generated {
                level: LevelId::new(2),
                mode: GameMode::Challenge,
            },
            Some("🐸".to_owned()),
        )
        .expect("level generates");

    let frame = render_session(session, &GlyphTheme::default()).expect("session renders");

    assert_eq!(frame.title, "Level 2");
    assert_eq!(frame.moves_left, query::remaining_moves(session.board()));
    assert_eq!(
        frame.lines.iter().flatten().filter(|glyph| *glyph == "🐸").count(),
        1
    );
}

#[test]
fn custom_themes_round_trip_too() {
    let theme = GlyphTheme::default()
        .with_overrides([("empty", "."), ("wall", "#"), ("border", "+")])
        .expect("glyphs are distinct");
    let level = parse_level("wall empty empty wall\nempty player box goal\nwall empty empty wall")
        .expect("level is playable");
    let board = Board::new(level.grid.clone(), None).expect("board builds");

    let frame = render_board(&board, "Custom Level", &theme, None).expect("board renders");

    assert_eq!(
        frame.board_text(),
        "++++++\n+#..#+\n+.🔵🟫🔸+\n+#..#+\n++++++"
    );
    let text = frame.to_level_text(&theme, None).expect("frame decodes");
    assert_eq!(parse_level(&text).expect("level is playable").grid, level.grid);
}
