//! Tests for game construction and attempt progression.

use cache_hunt::{
    GAME_VALUE, Game, GameBuilder, KindSpec, LevelSpec, MAX_TITLE_LENGTH, Player,
    ProgressError, Response, ResponseKind, State, User, ValidationError,
};

fn creator() -> User {
    User::new("creator", "100").expect("Invalid user")
}

fn player() -> Player {
    Player::from_user(&User::new("player", "555").expect("Invalid user"))
}

fn level(title: &str, clues: &[&str], answer: &str) -> LevelSpec {
    LevelSpec::new(
        title.to_string(),
        format!("Solve {}", title),
        clues.iter().map(|c| c.to_string()).collect(),
        vec![answer.to_string()],
    )
}

fn build(levels: Vec<LevelSpec>) -> Result<Game, ValidationError> {
    Game::build(
        &creator(),
        "City Hunt",
        "Three stops downtown",
        "Congratulations",
        KindSpec::urban("Austin", "Texas", "USA"),
        levels,
    )
}

fn three_level_game() -> Game {
    build(vec![
        level("L1", &[], "L1"),
        level("L2", &[], "L2"),
        level("L3", &[], "L3"),
    ])
    .expect("Build failed")
}

#[test]
fn test_build_preserves_level_order() {
    let titles = ["first", "second", "third", "fourth"];
    let game = build(titles.iter().map(|t| level(t, &[], "x")).collect()).expect("Build failed");

    let built: Vec<&str> = game.levels().iter().map(|l| l.title().as_str()).collect();
    assert_eq!(built, titles);
    assert_eq!(*game.value(), GAME_VALUE);
}

#[test]
fn test_build_rejects_bad_input() {
    assert_eq!(build(vec![]).unwrap_err(), ValidationError::NoLevels);

    let long_title = "t".repeat(MAX_TITLE_LENGTH + 1);
    let result = Game::build(
        &creator(),
        &long_title,
        "d",
        "e",
        KindSpec::urban("Austin", "Texas", "USA"),
        [level("L1", &[], "L1")],
    );
    assert!(matches!(result, Err(ValidationError::TooLong { .. })));

    let result = build(vec![level("L1", &[], "L1"), level("L2", &[""], "L2")]);
    assert!(result.is_err());
}

#[test]
fn test_title_limit_counts_characters() {
    let title = "é".repeat(MAX_TITLE_LENGTH);
    let game = Game::build(
        &creator(),
        &title,
        "d",
        "e",
        KindSpec::urban("Austin", "Texas", "USA"),
        [level("L1", &[], "L1")],
    );
    assert!(game.is_ok());
}

#[test]
fn test_builder_fails_fast() {
    let builder = GameBuilder::new(
        &creator(),
        "City Hunt",
        "d",
        "e",
        KindSpec::urban("Austin", "Texas", "USA"),
    )
    .expect("Header rejected");

    let err = builder
        .level(level("L1", &[], "L1"))
        .and_then(|b| b.level(LevelSpec::default()))
        .unwrap_err();
    assert!(err.field().is_some());
}

#[test]
fn test_start_initializes_attempt() {
    let game = three_level_game();
    let mut player = player();

    let (state, response) = State::start(&game, &mut player).expect("Start failed");

    assert_eq!(state.level(), 0);
    assert_eq!(state.clue(), None);
    assert!(!state.completed());
    assert_eq!(state.game_levels(), 3);
    assert_eq!(*player.games_started(), 1);
    assert_eq!(player.current_state_id().as_ref(), Some(state.id()));
    assert_eq!(state.current_response(), &response);
    assert_eq!(
        response,
        Response::Level {
            title: "L1".to_string(),
            description: "Solve L1".to_string()
        }
    );
}

#[test]
fn test_three_level_scenario_awards_points_once() {
    let game = three_level_game();
    let mut player = player();
    let (mut state, _) = State::start(&game, &mut player).expect("Start failed");

    let kinds: Vec<ResponseKind> = ["L1", "L2", "L3"]
        .iter()
        .map(|input| {
            state
                .advance(&game, input, &mut player)
                .expect("Advance failed")
                .kind()
        })
        .collect();
    assert_eq!(kinds, [ResponseKind::Level, ResponseKind::Level, ResponseKind::End]);
    assert!(state.completed());
    assert_eq!(*player.games_finished(), 1);
    assert_eq!(*player.total_points(), 42);

    let again = state
        .advance(&game, "L3", &mut player)
        .expect("Replay failed");
    assert_eq!(
        again,
        Response::End {
            message: "Congratulations".to_string()
        }
    );
    assert!(state.completed());
    assert_eq!(*player.games_finished(), 1);
    assert_eq!(*player.total_points(), 42);
}

#[test]
fn test_clues_advance_then_repeat_last() {
    let game = build(vec![level("L1", &["c1", "c2", "c3"], "L1")]).expect("Build failed");
    let mut player = player();
    let (mut state, _) = State::start(&game, &mut player).expect("Start failed");

    let clues: Vec<Response> = (0..5)
        .map(|_| state.advance(&game, "wrong", &mut player).expect("Advance failed"))
        .collect();

    let expected: Vec<Response> = ["c1", "c2", "c3", "c3", "c3"]
        .iter()
        .map(|c| Response::Clue {
            clue: c.to_string(),
        })
        .collect();
    assert_eq!(clues, expected);
    assert_eq!(state.clue(), Some(2));
    assert_eq!(state.level(), 0);
}

#[test]
fn test_wrong_game_leaves_state_untouched() {
    let game = three_level_game();
    let other = three_level_game();
    let mut player = player();
    let (mut state, _) = State::start(&game, &mut player).expect("Start failed");
    let before = state.clone();
    let player_before = player.clone();

    let err = state.advance(&other, "L1", &mut player).unwrap_err();

    assert!(matches!(err, ProgressError::GameMismatch { .. }));
    assert_eq!(state, before);
    assert_eq!(player, player_before);
}

#[test]
fn test_answers_are_exact() {
    let game = three_level_game();
    let mut player = player();
    let (mut state, _) = State::start(&game, &mut player).expect("Start failed");

    let response = state.advance(&game, "l1", &mut player).expect("Advance failed");
    assert_eq!(response.kind(), ResponseKind::Clue);
    assert_eq!(state.level(), 0);
}
