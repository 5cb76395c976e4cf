//! Tests for the command and query handlers.

use std::sync::atomic::{AtomicBool, Ordering};

use tempfile::NamedTempFile;

use cache_hunt::{
    AppError, CreateGame, CreateGameState, DbError, Game, GameDraft, GameFilter, GameSummary,
    HuntService, KindSpec, LevelSpec, PageLimits, Player, PlayerSummary, Repository, Response,
    SqliteRepository, State, StateView, UpdateGameState, User,
};

fn setup_service() -> (NamedTempFile, HuntService<SqliteRepository>) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();
    let repo = SqliteRepository::new(db_path).expect("Failed to create repository");
    repo.run_migrations().expect("Migrations failed");
    (db_file, HuntService::new(repo))
}

fn user(id: &str, number: &str) -> User {
    User::new(id, number).expect("Invalid user")
}

fn draft() -> GameDraft {
    GameDraft::new(
        "Campus Hunt".to_string(),
        "Around the quad".to_string(),
        "Well done".to_string(),
        KindSpec::urban("Austin", "Texas", "USA"),
        vec![
            LevelSpec::new(
                "Library".to_string(),
                "Find the library".to_string(),
                vec!["Books".to_string(), "Quiet".to_string()],
                vec!["library".to_string()],
            ),
            LevelSpec::new(
                "Tower".to_string(),
                "Find the tower".to_string(),
                vec![],
                vec!["tower".to_string(), "clock tower".to_string()],
            ),
        ],
    )
}

fn create_game<R: Repository>(service: &HuntService<R>) -> String {
    service
        .create_game(CreateGame::new(user("creator", "100"), draft()))
        .expect("Create failed")
}

fn answer<R: Repository>(
    service: &HuntService<R>,
    number: &str,
    input: &str,
) -> Result<Response, AppError> {
    service.submit_answer(UpdateGameState::new(number.to_string(), input.to_string()))
}

#[test]
fn test_create_game_stores_game() {
    let (_db, service) = setup_service();
    let id = create_game(&service);

    let game = service.repository().get_game(&id).expect("Get failed");
    assert_eq!(game.title(), "Campus Hunt");
    assert_eq!(game.creator_id(), "creator");
    assert_eq!(game.levels().len(), 2);
}

#[test]
fn test_create_game_rejects_unknown_kind() {
    let (_db, service) = setup_service();
    let mut draft = draft();
    draft.kind.kind = "rural".to_string();

    let err = service
        .create_game(CreateGame::new(user("creator", "100"), draft))
        .unwrap_err();
    assert_eq!(err.slug(), "unknown-game-kind");
    assert!(err.is_client_error());
}

#[test]
fn test_start_creates_player_lazily() {
    let (_db, service) = setup_service();
    let game_id = create_game(&service);
    assert!(service.repository().get_player("p1").unwrap_err().is_not_found());

    let response = service
        .start_game(CreateGameState::new(user("p1", "555"), game_id.clone()))
        .expect("Start failed");
    assert_eq!(
        response,
        Response::Level {
            title: "Library".to_string(),
            description: "Find the library".to_string()
        }
    );

    let player = service.repository().get_player("p1").expect("Player missing");
    assert_eq!(player.number(), "555");
    assert_eq!(*player.games_started(), 1);

    service
        .start_game(CreateGameState::new(user("p1", "555"), game_id))
        .expect("Second start failed");
    let player = service.repository().get_player("p1").expect("Player missing");
    assert_eq!(*player.games_started(), 2);
}

#[test]
fn test_start_unknown_game_is_not_found() {
    let (_db, service) = setup_service();
    let err = service
        .start_game(CreateGameState::new(user("p1", "555"), "missing".to_string()))
        .unwrap_err();
    assert!(err.is_not_found());
    assert!(service.repository().get_player("p1").unwrap_err().is_not_found());
}

#[test]
fn test_answer_without_attempt() {
    let (_db, service) = setup_service();
    service
        .repository()
        .add_player(&Player::from_user(&user("p1", "555")))
        .expect("Add failed");

    assert!(matches!(answer(&service, "555", "x"), Err(AppError::NoActiveAttempt)));
    assert!(answer(&service, "999", "x").unwrap_err().is_not_found());
}

#[test]
fn test_full_play_through() {
    let (_db, service) = setup_service();
    let game_id = create_game(&service);
    service
        .start_game(CreateGameState::new(user("p1", "555"), game_id))
        .expect("Start failed");

    let clue = answer(&service, "555", "museum").expect("Answer failed");
    assert_eq!(clue, Response::Clue { clue: "Books".to_string() });

    let next = answer(&service, "555", "library").expect("Answer failed");
    assert_eq!(next.kind(), cache_hunt::ResponseKind::Level);

    let end = answer(&service, "555", "clock tower").expect("Answer failed");
    assert_eq!(end, Response::End { message: "Well done".to_string() });

    let summary: PlayerSummary = service.player_summary("p1").expect("Read failed");
    assert_eq!(*summary.games_finished(), 1);
    assert_eq!(*summary.total_points(), 42);

    let state_id = service
        .repository()
        .get_player("p1")
        .expect("Get failed")
        .current_state_id()
        .clone()
        .expect("No attempt");
    let view: StateView = service.state_view(&state_id).expect("Read failed");
    assert_eq!(view.current_response(), &end);
}

#[test]
fn test_completed_attempt_is_not_rewarded_twice() {
    let (_db, service) = setup_service();
    let game_id = create_game(&service);
    service
        .start_game(CreateGameState::new(user("p1", "555"), game_id))
        .expect("Start failed");
    answer(&service, "555", "library").expect("Answer failed");
    let end = answer(&service, "555", "tower").expect("Answer failed");

    for input in ["tower", "anything"] {
        assert_eq!(answer(&service, "555", input).expect("Replay failed"), end);
    }

    let summary = service.player_summary("p1").expect("Read failed");
    assert_eq!(*summary.games_finished(), 1);
    assert_eq!(*summary.total_points(), 42);
}

#[test]
fn test_list_games_applies_page_limits() {
    let (_db, service) = setup_service();
    for _ in 0..3 {
        create_game(&service);
    }

    let games = service
        .list_games(None, None, &GameFilter::default())
        .expect("List failed");
    assert_eq!(games.len(), 3);

    let capped = HuntService::with_limits(service.repository().clone(), PageLimits::new(1, 2));
    let games = capped
        .list_games(Some(50), None, &GameFilter::default())
        .expect("List failed");
    assert_eq!(games.len(), 2);
    let games = capped
        .list_games(None, Some(1), &GameFilter::default())
        .expect("List failed");
    assert_eq!(games.len(), 1);

    let err = service
        .list_games(Some(-1), None, &GameFilter::default())
        .unwrap_err();
    assert_eq!(err.slug(), "query-params");
}

/// Repository whose compound update can be made to fail after the state
/// has been advanced in memory.
struct FlakyRepository {
    inner: SqliteRepository,
    fail_updates: AtomicBool,
}

impl Repository for FlakyRepository {
    fn add_game(&self, game: &Game) -> Result<(), DbError> {
        self.inner.add_game(game)
    }
    fn get_game(&self, id: &str) -> Result<Game, DbError> {
        self.inner.get_game(id)
    }
    fn add_player(&self, player: &Player) -> Result<(), DbError> {
        self.inner.add_player(player)
    }
    fn get_player(&self, id: &str) -> Result<Player, DbError> {
        self.inner.get_player(id)
    }
    fn get_player_by_number(&self, number: &str) -> Result<Player, DbError> {
        self.inner.get_player_by_number(number)
    }
    fn add_state(&self, state: &State) -> Result<(), DbError> {
        self.inner.add_state(state)
    }
    fn get_state(&self, id: &str) -> Result<State, DbError> {
        self.inner.get_state(id)
    }
    fn update_state(&self, state: &State) -> Result<(), DbError> {
        self.inner.update_state(state)
    }
    fn add_state_and_update_player(&self, state: &State, player: &Player) -> Result<(), DbError> {
        self.inner.add_state_and_update_player(state, player)
    }
    fn update_state_and_player(&self, state: &State, player: &Player) -> Result<(), DbError> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(DbError::new("injected failure"));
        }
        self.inner.update_state_and_player(state, player)
    }
    fn read_games(
        &self,
        limit: i64,
        offset: i64,
        filter: &GameFilter,
    ) -> Result<Vec<GameSummary>, DbError> {
        self.inner.read_games(limit, offset, filter)
    }
    fn read_player(&self, id: &str) -> Result<PlayerSummary, DbError> {
        self.inner.read_player(id)
    }
    fn read_state(&self, id: &str) -> Result<StateView, DbError> {
        self.inner.read_state(id)
    }
}

#[test]
fn test_failed_commit_keeps_stored_progress() {
    let (_db, service) = setup_service();
    let flaky = HuntService::new(FlakyRepository {
        inner: service.repository().clone(),
        fail_updates: AtomicBool::new(false),
    });
    let game_id = create_game(&flaky);
    flaky
        .start_game(CreateGameState::new(user("p1", "555"), game_id))
        .expect("Start failed");
    answer(&flaky, "555", "library").expect("Answer failed");

    flaky.repository().fail_updates.store(true, Ordering::SeqCst);
    let err = answer(&flaky, "555", "tower").unwrap_err();
    assert!(matches!(err, AppError::Db(_)));
    assert_eq!(err.slug(), "internal-error");

    let summary = flaky.player_summary("p1").expect("Read failed");
    assert_eq!(*summary.total_points(), 0);

    flaky.repository().fail_updates.store(false, Ordering::SeqCst);
    let end = answer(&flaky, "555", "tower").expect("Retry failed");
    assert_eq!(end.kind(), cache_hunt::ResponseKind::End);
    assert_eq!(*flaky.player_summary("p1").expect("Read failed").total_points(), 42);
}
