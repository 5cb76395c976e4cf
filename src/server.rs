//! HTTP adapter over [`HuntService`].
//!
//! Every route requires a caller identity in the `x-user-id` and
//! `x-user-number` headers. Failures are answered with a JSON body of the
//! form `{ "slug": "..." }`.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequestParts, Path, Query, State};
use axum::http::request::Parts;
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response as HttpResponse};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tracing::{debug, error, info, instrument, warn};

use crate::app::{AppError, CreateGame, CreateGameState, GameDraft, HuntService, UpdateGameState};
use crate::db::{GameFilter, GameSummary, PlayerSummary, Repository, StateView};
use crate::hunt::{GameId, Response, User};

/// Header carrying the caller's user id.
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the caller's user number.
pub const USER_NUMBER_HEADER: &str = "x-user-number";

type SharedService<R> = Arc<HuntService<R>>;

/// Builds the router for all hunt endpoints.
#[instrument(skip(service))]
pub fn router<R>(service: HuntService<R>) -> Router
where
    R: Repository + 'static,
{
    info!("Building HTTP router");
    Router::new()
        .route("/games", post(create_game::<R>).get(list_games::<R>))
        .route("/states", post(create_game_state::<R>))
        .route("/states/{id}", get(get_state::<R>))
        .route("/players/{number}/state", post(update_game_state::<R>))
        .route("/players/{id}", get(get_player::<R>))
        .layer(ServiceBuilder::new().map_request(|req: Request<axum::body::Body>| {
            debug!(method = %req.method(), uri = %req.uri(), "Incoming HTTP request");
            req
        }))
        .with_state(Arc::new(service))
}

/// Error body sent to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable failure identifier.
    pub slug: String,
}

/// An HTTP failure: a status and a slug.
#[derive(Debug, Clone)]
pub struct ApiError {
    status: StatusCode,
    slug: &'static str,
}

impl ApiError {
    fn new(status: StatusCode, slug: &'static str) -> Self {
        Self { status, slug }
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        let status = match &err {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            e if e.is_client_error() => StatusCode::BAD_REQUEST,
            e if e.is_not_found() => StatusCode::NOT_FOUND,
            e if e.is_conflict() => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(error = %err, "Request failed");
        } else {
            warn!(error = %err, status = %status, "Request rejected");
        }
        Self::new(status, err.slug())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(error = %rejection, "Malformed request body");
        Self::new(StatusCode::BAD_REQUEST, "invalid-body")
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        warn!(error = %rejection, "Malformed query string");
        Self::new(StatusCode::BAD_REQUEST, "query-params")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> HttpResponse {
        let body = ErrorBody {
            slug: self.slug.to_string(),
        };
        (self.status, Json(body)).into_response()
    }
}

/// Caller identity taken from the request headers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .unwrap_or_default()
                .to_string()
        };

        User::new(header(USER_ID_HEADER), header(USER_NUMBER_HEADER))
            .map(AuthUser)
            .map_err(|e| {
                debug!(error = %e, "No usable caller identity");
                ApiError::from(AppError::Unauthorized)
            })
    }
}

/// Body of `POST /games` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedGame {
    /// Id of the new game.
    pub id: GameId,
}

/// Body of `POST /states`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartRequest {
    /// Game to attempt.
    pub game_id: GameId,
}

/// Body of `POST /players/{number}/state`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerRequest {
    /// The player's answer.
    pub input: String,
}

/// Query string of `GET /games`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GamesQuery {
    /// Page size.
    pub limit: Option<i64>,
    /// Games to skip.
    pub offset: Option<i64>,
    /// Kind tag.
    pub kind: Option<String>,
    /// City.
    pub city: Option<String>,
    /// State or province.
    pub state: Option<String>,
    /// Country.
    pub country: Option<String>,
    /// Creator id.
    pub creator: Option<String>,
}

/// Runs a synchronous service call off the async executor.
async fn blocking<R, T, F>(service: SharedService<R>, call: F) -> Result<T, ApiError>
where
    R: Repository + 'static,
    T: Send + 'static,
    F: FnOnce(&HuntService<R>) -> Result<T, AppError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || call(&service))
        .await
        .map_err(|e| {
            error!(error = %e, "Service task panicked");
            ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "internal-error")
        })?
        .map_err(ApiError::from)
}

#[instrument(skip_all)]
async fn create_game<R: Repository + 'static>(
    State(service): State<SharedService<R>>,
    AuthUser(user): AuthUser,
    body: Result<Json<GameDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedGame>), ApiError> {
    let Json(draft) = body?;
    debug!(user_id = %user.id(), title = %draft.title, "Create game request");
    let cmd = CreateGame::new(user, draft);
    let id = blocking(service, move |s| s.create_game(cmd)).await?;
    Ok((StatusCode::CREATED, Json(CreatedGame { id })))
}

#[instrument(skip_all)]
async fn list_games<R: Repository + 'static>(
    State(service): State<SharedService<R>>,
    AuthUser(_): AuthUser,
    query: Result<Query<GamesQuery>, QueryRejection>,
) -> Result<Json<Vec<GameSummary>>, ApiError> {
    let Query(query) = query?;
    let filter = GameFilter {
        kind: query.kind,
        city: query.city,
        state: query.state,
        country: query.country,
        creator: query.creator,
    };
    let (limit, offset) = (query.limit, query.offset);
    let games = blocking(service, move |s| s.list_games(limit, offset, &filter)).await?;
    Ok(Json(games))
}

#[instrument(skip_all)]
async fn create_game_state<R: Repository + 'static>(
    State(service): State<SharedService<R>>,
    AuthUser(user): AuthUser,
    body: Result<Json<StartRequest>, JsonRejection>,
) -> Result<Json<Response>, ApiError> {
    let Json(request) = body?;
    debug!(user_id = %user.id(), game_id = %request.game_id, "Start request");
    let cmd = CreateGameState::new(user, request.game_id);
    let response = blocking(service, move |s| s.start_game(cmd)).await?;
    Ok(Json(response))
}

#[instrument(skip_all)]
async fn update_game_state<R: Repository + 'static>(
    State(service): State<SharedService<R>>,
    AuthUser(_): AuthUser,
    Path(number): Path<String>,
    body: Result<Json<AnswerRequest>, JsonRejection>,
) -> Result<Json<Response>, ApiError> {
    let Json(request) = body?;
    debug!(player_number = %number, "Answer request");
    let cmd = UpdateGameState::new(number, request.input);
    let response = blocking(service, move |s| s.submit_answer(cmd)).await?;
    Ok(Json(response))
}

#[instrument(skip_all)]
async fn get_player<R: Repository + 'static>(
    State(service): State<SharedService<R>>,
    AuthUser(_): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<PlayerSummary>, ApiError> {
    let summary = blocking(service, move |s| s.player_summary(&id)).await?;
    Ok(Json(summary))
}

#[instrument(skip_all)]
async fn get_state<R: Repository + 'static>(
    State(service): State<SharedService<R>>,
    AuthUser(_): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<StateView>, ApiError> {
    let view = blocking(service, move |s| s.state_view(&id)).await?;
    Ok(Json(view))
}
