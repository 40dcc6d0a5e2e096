use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sokobot_core::{CellCoord, Command, Direction, Event, MoveOutcome, Tile};
use sokobot_world::{self as world, query, Board, TileGrid};

fn board(lines: &[&[Tile]], move_budget: Option<u32>) -> Board {
    let grid = TileGrid::from_lines(lines.iter().map(|line| line.to_vec()).collect())
        .expect("test grid is rectangular");
    Board::new(grid, move_budget).expect("test board has one player")
}

fn step(board: &mut Board, direction: Direction, events: &mut Vec<Event>) -> MoveOutcome {
    let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);
    world::apply(board, Command::Step { direction }, &mut rng, events)
}

fn line(board: &Board, column: u32) -> Vec<Tile> {
    query::grid(board)
        .lines()
        .nth(column as usize)
        .expect("line exists")
        .to_vec()
}

#[test]
fn pushing_a_box_onto_a_goal_completes_it() {
    let mut board = board(&[&[Tile::Player, Tile::Box, Tile::Goal, Tile::Wall]], None);
    let mut events = Vec::new();

    let outcome = step(&mut board, Direction::Right, &mut events);

    assert_eq!(
        line(&board, 0),
        vec![Tile::Empty, Tile::Player, Tile::CompletedBox, Tile::Wall]
    );
    assert!(outcome.moved);
    assert!(outcome.win, "no goal remains uncovered");
    assert_eq!(
        events,
        vec![
            Event::BoxPushed {
                from: CellCoord::new(0, 1),
                to: CellCoord::new(0, 2),
                completed: true,
            },
            Event::PlayerMoved {
                from: CellCoord::new(0, 0),
                to: CellCoord::new(0, 1),
            },
            Event::LevelCompleted { moves_used: 1 },
        ]
    );
}

#[test]
fn wall_behind_box_blocks_the_push() {
    let mut board = board(&[&[Tile::Player, Tile::Box, Tile::Goal, Tile::Wall]], None);
    let mut events = Vec::new();
    let _ = step(&mut board, Direction::Right, &mut events);
    let before = query::grid(&board).clone();

    events.clear();
    let outcome = step(&mut board, Direction::Right, &mut events);

    assert_eq!(outcome, MoveOutcome::UNCHANGED);
    assert_eq!(query::grid(&board), &before);
    assert_eq!(query::moves_made(&board), 1);
    assert_eq!(
        events,
        vec![Event::MoveIgnored {
            direction: Direction::Right,
        }]
    );
}

#[test]
fn leaving_the_grid_is_a_no_op() {
    let mut board = board(&[&[Tile::Player, Tile::Box, Tile::Goal]], None);
    let mut events = Vec::new();

    for direction in [Direction::Left, Direction::Up, Direction::Down] {
        let outcome = step(&mut board, direction, &mut events);
        assert_eq!(outcome, MoveOutcome::UNCHANGED, "{direction:?} leaves the grid");
    }
    assert_eq!(query::player(&board), CellCoord::new(0, 0));
    assert_eq!(query::moves_made(&board), 0);
}

#[test]
fn box_cannot_leave_the_grid_or_stack_on_a_box() {
    let mut edge = board(&[&[Tile::Goal, Tile::Player, Tile::Box]], None);
    let mut events = Vec::new();
    assert_eq!(
        step(&mut edge, Direction::Right, &mut events),
        MoveOutcome::UNCHANGED
    );

    let mut stacked = board(&[&[Tile::Player, Tile::Box, Tile::Box, Tile::Goal, Tile::Goal]], None);
    assert_eq!(
        step(&mut stacked, Direction::Right, &mut events),
        MoveOutcome::UNCHANGED
    );
}

#[test]
fn pushing_onto_a_completed_box_overwrites_it() {
    let mut board = board(
        &[&[Tile::Player, Tile::Box, Tile::CompletedBox, Tile::Goal]],
        None,
    );
    let mut events = Vec::new();

    let outcome = step(&mut board, Direction::Right, &mut events);

    assert!(outcome.moved);
    assert_eq!(
        line(&board, 0),
        vec![Tile::Empty, Tile::Player, Tile::CompletedBox, Tile::Goal]
    );

    let second = step(&mut board, Direction::Right, &mut events);
    assert!(second.win, "no goal remains uncovered");
    assert_eq!(
        line(&board, 0),
        vec![Tile::Empty, Tile::Empty, Tile::Player, Tile::CompletedBox]
    );
}

#[test]
fn walls_block_the_player() {
    let mut board = board(
        &[
            &[Tile::Wall, Tile::Empty, Tile::Wall],
            &[Tile::Wall, Tile::Player, Tile::Wall],
            &[Tile::Wall, Tile::Wall, Tile::Wall],
        ],
        None,
    );
    let mut events = Vec::new();

    assert_eq!(step(&mut board, Direction::Left, &mut events), MoveOutcome::UNCHANGED);
    assert_eq!(step(&mut board, Direction::Down, &mut events), MoveOutcome::UNCHANGED);
    assert!(step(&mut board, Direction::Up, &mut events).moved);
    assert_eq!(query::player(&board), CellCoord::new(0, 1));
}

#[test]
fn enemies_block_the_player() {
    let mut board = board(&[&[Tile::Player, Tile::Enemy, Tile::Wall]], None);
    let mut events = Vec::new();

    let outcome = step(&mut board, Direction::Right, &mut events);

    assert_eq!(outcome, MoveOutcome::UNCHANGED);
    assert_eq!(
        line(&board, 0),
        vec![Tile::Player, Tile::Enemy, Tile::Wall]
    );
}

#[test]
fn moving_box_off_a_goal_uncovers_it() {
    let mut board = board(
        &[&[Tile::Player, Tile::Box, Tile::Goal, Tile::Empty, Tile::Goal, Tile::Box]],
        None,
    );
    let mut events = Vec::new();

    let first = step(&mut board, Direction::Right, &mut events);
    assert!(!first.win, "the second goal is still uncovered");
    assert_eq!(
        line(&board, 0),
        vec![
            Tile::Empty,
            Tile::Player,
            Tile::CompletedBox,
            Tile::Empty,
            Tile::Goal,
            Tile::Box,
        ]
    );

    let _ = step(&mut board, Direction::Right, &mut events);
    assert_eq!(
        line(&board, 0),
        vec![
            Tile::Empty,
            Tile::Empty,
            Tile::Player,
            Tile::Box,
            Tile::Goal,
            Tile::Box,
        ]
    );

    let _ = step(&mut board, Direction::Right, &mut events);
    assert_eq!(
        line(&board, 0),
        vec![
            Tile::Empty,
            Tile::Empty,
            Tile::Goal,
            Tile::Player,
            Tile::CompletedBox,
            Tile::Box,
        ]
    );
}

#[test]
fn vertical_moves_change_lines() {
    let mut board = board(
        &[
            &[Tile::Player, Tile::Empty],
            &[Tile::Box, Tile::Empty],
            &[Tile::Goal, Tile::Empty],
        ],
        None,
    );
    let mut events = Vec::new();

    let outcome = step(&mut board, Direction::Down, &mut events);

    assert!(outcome.win);
    assert_eq!(query::player(&board), CellCoord::new(1, 0));
    assert_eq!(
        query::grid(&board).tile(CellCoord::new(2, 0)),
        Some(Tile::CompletedBox)
    );
}

#[test]
fn budget_runs_out_on_the_final_move() {
    let mut board = board(
        &[&[
            Tile::Player,
            Tile::Empty,
            Tile::Empty,
            Tile::Empty,
            Tile::Empty,
            Tile::Box,
            Tile::Goal,
        ]],
        Some(3),
    );
    let mut events = Vec::new();

    let first = step(&mut board, Direction::Right, &mut events);
    let second = step(&mut board, Direction::Right, &mut events);
    assert!(!first.loss && !second.loss);
    assert_eq!(query::remaining_moves(&board), Some(1));

    let third = step(&mut board, Direction::Right, &mut events);
    assert!(third.loss);
    assert!(!third.win);
    assert_eq!(events.last(), Some(&Event::MovesExhausted { moves_used: 3 }));
}

#[test]
fn win_takes_priority_over_an_exhausted_budget() {
    let mut board = board(&[&[Tile::Player, Tile::Box, Tile::Goal]], Some(1));
    let mut events = Vec::new();

    let outcome = step(&mut board, Direction::Right, &mut events);

    assert!(outcome.win);
    assert!(!outcome.loss);
}

#[test]
fn completion_depends_only_on_uncovered_goals() {
    let mut covered = board(&[&[Tile::Player, Tile::Empty, Tile::Wall]], None);
    let mut events = Vec::new();
    assert!(step(&mut covered, Direction::Right, &mut events).win);

    let mut open = board(
        &[&[Tile::Player, Tile::Empty, Tile::Goal, Tile::Box]],
        None,
    );
    assert!(!step(&mut open, Direction::Right, &mut events).win);
    assert!(!query::is_complete(&open));
}

#[test]
fn reset_restores_initial_layout_and_counter() {
    let mut board = board(&[&[Tile::Player, Tile::Box, Tile::Empty, Tile::Goal]], Some(10));
    let initial = query::grid(&board).clone();
    let mut events = Vec::new();
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    let _ = step(&mut board, Direction::Right, &mut events);
    assert_ne!(query::grid(&board), &initial);

    let first = world::apply(&mut board, Command::Reset, &mut rng, &mut events);
    let after_first = query::grid(&board).clone();
    let _ = world::apply(&mut board, Command::Reset, &mut rng, &mut events);

    assert!(first.moved);
    assert_eq!(after_first, initial);
    assert_eq!(query::grid(&board), &after_first);
    assert_eq!(query::player(&board), CellCoord::new(0, 0));
    assert_eq!(query::moves_made(&board), 0);
    assert_eq!(query::remaining_moves(&board), Some(10));
    assert_eq!(
        events.last(),
        Some(&Event::BoardReset {
            player: CellCoord::new(0, 0),
        })
    );
}
