//! HTTP surface: JSON handlers under `/api`, plus `/` and `/health`.
//!
//! Register with `App::new().app_data(pool).app_data(auth).configure(web::configure)`,
//! where `pool` is `Data<SqlitePool>` and `auth` is `Data<AuthSettings>`.

use crate::logic::{
    create_account, get_leaderboard, get_live_games, get_profile, issue_token,
    resolve_user_from_token, revoke_token, submit_score, verify_credentials, AuthSettings,
};
use crate::models::{
    AuthResponse, LeaderboardQuery, LiveGame, LiveGamesQuery, LoginRequest, ScoreResponse,
    ScoreSubmission, ServiceError, SignupRequest, User,
};
use actix_web::{
    error::{InternalError, JsonPayloadError, QueryPayloadError},
    get,
    http::{header, StatusCode},
    post,
    web::{self, Data, Json, Query},
    HttpRequest, HttpResponse, ResponseError,
};
use serde::Serialize;
use sqlx::SqlitePool;

type Db = Data<SqlitePool>;
type Auth = Data<AuthSettings>;

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Serialize)]
struct MessageBody {
    message: &'static str,
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ServiceError::Database(_)
            | ServiceError::Migration(_)
            | ServiceError::PasswordHash(_)
            | ServiceError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = if self.is_internal() {
            log::error!("Request failed: {}", self);
            "internal server error".to_string()
        } else {
            self.to_string()
        };
        let mut builder = HttpResponse::build(self.status_code());
        if matches!(self, ServiceError::Unauthorized(_)) {
            builder.insert_header((header::WWW_AUTHENTICATE, "Bearer"));
        }
        builder.json(ErrorBody {
            error: self.kind(),
            message,
        })
    }
}

/// Malformed bodies (bad JSON, negative score, unknown mode) answer 400.
fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = HttpResponse::BadRequest().json(ErrorBody {
        error: "bad_request",
        message: err.to_string(),
    });
    InternalError::from_response(err, response).into()
}

/// Unparseable query strings answer 422, like out-of-range values.
fn query_error(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = HttpResponse::UnprocessableEntity().json(ErrorBody {
        error: "validation_error",
        message: err.to_string(),
    });
    InternalError::from_response(err, response).into()
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Resolve the caller from `Authorization: Bearer <token>`.
async fn authenticate(req: &HttpRequest, pool: &SqlitePool) -> Result<(User, String), ServiceError> {
    let token = bearer_token(req).ok_or_else(|| ServiceError::unauthorized("Not authenticated"))?;
    let user = resolve_user_from_token(pool, token).await?;
    Ok((user, token.to_string()))
}

#[get("/")]
async fn api_root() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Snake Showdown API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[get("/health")]
async fn api_health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "healthy" }))
}

/// Register a new user; responds with the account and a fresh token.
#[post("/api/auth/signup")]
async fn api_signup(pool: Db, auth: Auth, body: Json<SignupRequest>) -> Result<HttpResponse, ServiceError> {
    body.validate()?;
    let user = create_account(&pool, &auth, &body.email, &body.username, &body.password).await?;
    let session = issue_token(&pool, &auth, user.id).await?;
    Ok(HttpResponse::Created().json(AuthResponse {
        user: user.to_auth_user(),
        token: session.token,
    }))
}

#[post("/api/auth/login")]
async fn api_login(pool: Db, auth: Auth, body: Json<LoginRequest>) -> Result<HttpResponse, ServiceError> {
    body.validate()?;
    let user = verify_credentials(&pool, &body.email, &body.password).await?;
    let session = issue_token(&pool, &auth, user.id).await?;
    Ok(HttpResponse::Ok().json(AuthResponse {
        user: user.to_auth_user(),
        token: session.token,
    }))
}

/// Invalidate the caller's token.
#[post("/api/auth/logout")]
async fn api_logout(req: HttpRequest, pool: Db) -> Result<HttpResponse, ServiceError> {
    let (_, token) = authenticate(&req, &pool).await?;
    revoke_token(&pool, &token).await?;
    Ok(HttpResponse::Ok().json(MessageBody {
        message: "Successfully logged out",
    }))
}

#[get("/api/auth/me")]
async fn api_me(req: HttpRequest, pool: Db) -> Result<HttpResponse, ServiceError> {
    let (user, _) = authenticate(&req, &pool).await?;
    Ok(HttpResponse::Ok().json(user.to_auth_user()))
}

#[get("/api/player/profile")]
async fn api_player_profile(req: HttpRequest, pool: Db) -> Result<HttpResponse, ServiceError> {
    let (user, _) = authenticate(&req, &pool).await?;
    let player = get_profile(&pool, user.id).await?;
    Ok(HttpResponse::Ok().json(player))
}

/// Submit a finished game's score for the caller.
///
/// A caller without a stats row gets 400, like any other unusable submission.
#[post("/api/game/score")]
async fn api_submit_score(
    req: HttpRequest,
    pool: Db,
    body: Json<ScoreSubmission>,
) -> Result<HttpResponse, ServiceError> {
    let (user, _) = authenticate(&req, &pool).await?;
    let outcome = submit_score(&pool, user.id, body.score, body.mode)
        .await
        .map_err(|e| match e {
            ServiceError::NotFound(message) => ServiceError::BadRequest(message),
            e => e,
        })?;
    Ok(HttpResponse::Created().json(ScoreResponse::from(outcome)))
}

#[get("/api/game/leaderboard")]
async fn api_leaderboard(pool: Db, query: Query<LeaderboardQuery>) -> Result<HttpResponse, ServiceError> {
    query.validate()?;
    let page = get_leaderboard(&pool, query.mode, query.limit, query.offset).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// Games in progress. No live game state is tracked yet, so this is always empty.
#[get("/api/game/live")]
async fn api_live_games(query: Query<LiveGamesQuery>) -> Result<HttpResponse, ServiceError> {
    query.validate()?;
    let games = get_live_games(Vec::<LiveGame>::new(), query.mode, query.limit);
    Ok(HttpResponse::Ok().json(games))
}

/// Route table and extractor configuration for the whole API.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::QueryConfig::default().error_handler(query_error))
        .service(api_root)
        .service(api_health)
        .service(api_signup)
        .service(api_login)
        .service(api_logout)
        .service(api_me)
        .service(api_player_profile)
        .service(api_submit_score)
        .service(api_leaderboard)
        .service(api_live_games);
}
