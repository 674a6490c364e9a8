//! Route handlers: thin glue from HTTP to the action layer.

use std::sync::Arc;

use actions::Deps;
use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use portal::{AppDraft, AppId, CategoryDraft, CategoryId, Role, SettingsDraft, UserId};
use serde::Deserialize;

use crate::extract::Bearer;
use crate::respond::{invalid_path_id, respond};

pub async fn healthz() -> &'static str {
    "ok"
}

// ---------------------------------------------------------------------------
// Apps
// ---------------------------------------------------------------------------

pub async fn create_app(
    State(deps): State<Arc<Deps>>,
    bearer: Bearer,
    Json(draft): Json<AppDraft>,
) -> Response {
    respond(actions::apps::create_app(&deps, bearer.token(), draft).await)
}

pub async fn update_app(
    State(deps): State<Arc<Deps>>,
    Path(id): Path<String>,
    bearer: Bearer,
    Json(draft): Json<AppDraft>,
) -> Response {
    let Some(id) = AppId::new(id) else {
        return invalid_path_id("app_id");
    };
    respond(actions::apps::update_app(&deps, bearer.token(), &id, draft).await)
}

pub async fn delete_app(
    State(deps): State<Arc<Deps>>,
    Path(id): Path<String>,
    bearer: Bearer,
) -> Response {
    let Some(id) = AppId::new(id) else {
        return invalid_path_id("app_id");
    };
    respond(actions::apps::delete_app(&deps, bearer.token(), &id).await)
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

pub async fn create_category(
    State(deps): State<Arc<Deps>>,
    bearer: Bearer,
    Json(draft): Json<CategoryDraft>,
) -> Response {
    respond(actions::categories::create_category(&deps, bearer.token(), draft).await)
}

pub async fn update_category(
    State(deps): State<Arc<Deps>>,
    Path(id): Path<String>,
    bearer: Bearer,
    Json(draft): Json<CategoryDraft>,
) -> Response {
    let Some(id) = CategoryId::new(id) else {
        return invalid_path_id("category_id");
    };
    respond(actions::categories::update_category(&deps, bearer.token(), &id, draft).await)
}

pub async fn delete_category(
    State(deps): State<Arc<Deps>>,
    Path(id): Path<String>,
    bearer: Bearer,
) -> Response {
    let Some(id) = CategoryId::new(id) else {
        return invalid_path_id("category_id");
    };
    respond(actions::categories::delete_category(&deps, bearer.token(), &id).await)
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

pub async fn get_settings(State(deps): State<Arc<Deps>>) -> Response {
    respond(actions::settings::get_settings(&deps).await)
}

pub async fn update_settings(
    State(deps): State<Arc<Deps>>,
    bearer: Bearer,
    Json(draft): Json<SettingsDraft>,
) -> Response {
    respond(actions::settings::update_settings(&deps, bearer.token(), draft).await)
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct UsersQuery {
    pub limit: Option<usize>,
}

pub async fn list_users(
    State(deps): State<Arc<Deps>>,
    Query(query): Query<UsersQuery>,
    bearer: Bearer,
) -> Response {
    respond(actions::users::list_users(&deps, bearer.token(), query.limit).await)
}

#[derive(Debug, Deserialize)]
pub struct RoleBody {
    pub role: Role,
}

pub async fn set_user_role(
    State(deps): State<Arc<Deps>>,
    Path(uid): Path<String>,
    bearer: Bearer,
    Json(body): Json<RoleBody>,
) -> Response {
    let Some(uid) = UserId::new(uid) else {
        return invalid_path_id("uid");
    };
    respond(actions::users::set_user_role(&deps, bearer.token(), &uid, body.role).await)
}

// ---------------------------------------------------------------------------
// Favorites / recents
// ---------------------------------------------------------------------------

pub async fn toggle_favorite(
    State(deps): State<Arc<Deps>>,
    Path(app_id): Path<String>,
    bearer: Bearer,
) -> Response {
    let Some(app_id) = AppId::new(app_id) else {
        return invalid_path_id("app_id");
    };
    respond(actions::user_ops::toggle_favorite(&deps, bearer.token(), &app_id).await)
}

pub async fn log_recent(
    State(deps): State<Arc<Deps>>,
    Path(app_id): Path<String>,
    bearer: Bearer,
) -> Response {
    let Some(app_id) = AppId::new(app_id) else {
        return invalid_path_id("app_id");
    };
    respond(actions::user_ops::log_recent_app(&deps, bearer.token(), &app_id).await)
}

// ---------------------------------------------------------------------------
// Auth, seed, dashboard
// ---------------------------------------------------------------------------

pub async fn bootstrap_admin(State(deps): State<Arc<Deps>>, bearer: Bearer) -> Response {
    respond(actions::auth::bootstrap_admin(&deps, bearer.token()).await)
}

pub async fn sync_user(State(deps): State<Arc<Deps>>, bearer: Bearer) -> Response {
    respond(actions::auth::sync_user(&deps, bearer.token()).await)
}

pub async fn seed(State(deps): State<Arc<Deps>>, bearer: Bearer) -> Response {
    respond(actions::seed::seed_data(&deps, bearer.token()).await)
}

pub async fn dashboard(State(deps): State<Arc<Deps>>, bearer: Bearer) -> Response {
    respond(actions::data::dashboard_data(&deps, bearer.token()).await)
}
