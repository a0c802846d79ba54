//! Spaces API endpoints

use api_types::space::{SpaceNew, SpacePatch, SpaceView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{Space, SpaceUpdate};

use crate::{ServerError, server::ServerState, user};

fn map_view(space: Space) -> SpaceView {
    SpaceView {
        id: space.id,
        name: space.name,
        price_per_hour: space.price_per_hour,
        custom_rates: space.custom_rates,
    }
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<SpaceNew>,
) -> Result<(StatusCode, Json<SpaceView>), ServerError> {
    let space = state
        .engine
        .new_space(
            &user.username,
            payload.name,
            payload.price_per_hour,
            payload.custom_rates.unwrap_or_default(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(map_view(space))))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<SpaceView>>, ServerError> {
    let spaces = state.engine.spaces(&user.username).await?;
    Ok(Json(spaces.into_iter().map(map_view).collect()))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<SpacePatch>,
) -> Result<Json<SpaceView>, ServerError> {
    let updated = state
        .engine
        .update_space(
            &user.username,
            &id,
            SpaceUpdate {
                name: payload.name,
                price_per_hour: payload.price_per_hour,
                custom_rates: payload.custom_rates,
            },
        )
        .await?;

    Ok(Json(map_view(updated)))
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_space(&user.username, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
