use env::Env;
use games::maze::game::{GameState, HeldKeys};
use games::maze::light::{cell_center, visible};
use games::maze::map::{Action, Position};
use games::{GameConfig, GameError};
use proptest::prelude::*;

const DT: f32 = 1.0 / 15.0;

fn new_game(seed: u64) -> GameState {
    GameState::new(GameConfig::default().with_seed(seed)).unwrap()
}

#[test]
fn walking_the_solution_scores_the_exit_bonus_and_starts_a_new_maze() {
    let mut game = new_game(2024);
    assert_eq!(game.player(), Position::new(0, 1));
    assert_eq!(game.items().len(), 5);
    assert_eq!(game.score(), 0);

    let first_maze = game.maze().clone();
    let path = first_maze
        .shortest_path(first_maze.entrance(), first_maze.exit())
        .unwrap();
    let on_path: Vec<Position> = path
        .iter()
        .scan(first_maze.entrance(), |pos, &dir| {
            *pos = first_maze.step(*pos, dir)?;
            Some(*pos)
        })
        .collect();
    let expected_items = game.items().iter().filter(|i| on_path.contains(i)).count() as u32;

    let mut escaped = 0;
    for (i, &dir) in path.iter().enumerate() {
        let events = game.update(HeldKeys::only(dir), DT);
        assert!(events.moved, "step {i} was blocked");
        if events.escaped {
            escaped += 1;
        }
    }

    assert_eq!(escaped, 1);
    assert_eq!(game.score(), 50 + 10 * expected_items);
    assert_eq!(game.escapes(), 1);
    assert_eq!(game.player(), Position::new(0, 1));
    assert_eq!(game.items().len(), 5);
    assert_ne!(game.maze(), &first_maze);
}

#[test]
fn score_carries_over_escapes_until_a_manual_reset() {
    let mut game = new_game(77);
    for round in 1..=3u32 {
        let maze = game.maze().clone();
        let path = maze.shortest_path(game.player(), maze.exit()).unwrap();
        let before = game.score();
        for dir in path {
            game.update(HeldKeys::only(dir), DT);
            assert!(game.score() >= before);
        }
        assert_eq!(game.escapes(), round);
        assert!(game.score() >= before + 50);
    }
    assert!(game.score() >= 150);

    game.reset();
    assert_eq!(game.score(), 0);
    assert_eq!(game.escapes(), 0);
}

#[test]
fn env_interface_drives_the_same_game() {
    let mut game = new_game(5);
    let start = game.current_state();
    let legal = game.legal_actions();
    assert_eq!(legal, vec![Action::Right]);

    let (state, events) = game.step(HeldKeys::only(Action::Right), DT);
    assert!(events.moved);
    assert_ne!(state, start);
    assert_eq!(Env::reset(&mut game), start);
}

#[test]
fn same_seed_same_game() {
    let a = new_game(99);
    let b = new_game(99);
    assert_eq!(a.maze(), b.maze());
    assert_eq!(a.items(), b.items());
}

#[test]
fn oversized_item_count_is_rejected_at_startup() {
    let config = GameConfig {
        rows: 3,
        cols: 3,
        item_count: 2,
        ..GameConfig::default()
    };
    assert!(matches!(
        GameState::new(config),
        Err(GameError::NotEnoughRoom {
            requested: 2,
            available: 1
        })
    ));
}

#[test]
fn light_radius_boundary_is_inclusive() {
    let player = cell_center(Position::new(1, 1), 40.0);
    let edge = cell_center(Position::new(4, 1), 40.0);
    assert!(visible(edge, player, 120.0));
    assert!(!visible(edge, player, 119.0));
}

fn key_strategy() -> impl Strategy<Value = HeldKeys> {
    (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
        |(up, down, left, right)| HeldKeys {
            up,
            down,
            left,
            right,
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn moves_are_single_open_steps(
        seed in any::<u64>(),
        inputs in prop::collection::vec(key_strategy(), 1..200),
    ) {
        let mut game = new_game(seed);
        for keys in inputs {
            let before = game.player();
            let maze = game.maze().clone();
            let score = game.score();
            let events = game.update(keys, DT);

            if events.escaped {
                prop_assert_eq!(game.player(), game.maze().entrance());
                prop_assert!(game.score() >= score + 50);
                continue;
            }
            prop_assert!(game.score() >= score);

            let after = game.player();
            match keys.direction().and_then(|dir| maze.step(before, dir)) {
                Some(target) if maze.is_open(target) => {
                    prop_assert!(events.moved);
                    prop_assert_eq!(after, target);
                    prop_assert_eq!(before.x.abs_diff(after.x) + before.y.abs_diff(after.y), 1);
                }
                _ => {
                    prop_assert!(!events.moved);
                    prop_assert_eq!(after, before);
                }
            }
            prop_assert!(game.maze().is_open(after));
            prop_assert!(!game.items().contains(&after));
        }
    }
}
