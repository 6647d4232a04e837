// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Drink endpoints.
//!
//! Protected handlers take the verified [`Claims`] as their first argument;
//! the route's [`PermissionGate`](crate::auth::PermissionGate) inserts them.

use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    Extension, Json,
};

use crate::{
    auth::Claims,
    error::{ApiError, ErrorBody},
    models::{
        CreateDrinkRequest, DeleteResponse, DrinkDetailsResponse, MenuResponse,
        UpdateDrinkRequest,
    },
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/drinks",
    tag = "Drinks",
    responses((status = 200, description = "Menu in short form", body = MenuResponse))
)]
pub async fn list_drinks(State(state): State<AppState>) -> Json<MenuResponse> {
    let store = state.store.read().await;
    let drinks = store.list_drinks().iter().map(|d| d.short()).collect();
    Json(MenuResponse::new(drinks))
}

#[utoipa::path(
    get,
    path = "/drinks-detail",
    tag = "Drinks",
    responses(
        (status = 200, description = "Menu with full recipes", body = DrinkDetailsResponse),
        (status = 401, body = ErrorBody),
        (status = 403, body = ErrorBody)
    )
)]
pub async fn get_drinks_detail(
    Extension(_claims): Extension<Claims>,
    State(state): State<AppState>,
) -> Json<DrinkDetailsResponse> {
    let store = state.store.read().await;
    let drinks = store.list_drinks().iter().map(|d| d.long()).collect();
    Json(DrinkDetailsResponse::new(drinks))
}

#[utoipa::path(
    post,
    path = "/drinks",
    request_body = CreateDrinkRequest,
    tag = "Drinks",
    responses(
        (status = 200, description = "The created drink", body = DrinkDetailsResponse),
        (status = 401, body = ErrorBody),
        (status = 403, body = ErrorBody),
        (status = 422, body = ErrorBody)
    )
)]
pub async fn create_drink(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    payload: Result<Json<CreateDrinkRequest>, JsonRejection>,
) -> Result<Json<DrinkDetailsResponse>, ApiError> {
    let Json(request) = payload.map_err(|_| ApiError::unprocessable())?;

    let mut store = state.store.write().await;
    let drink = store.create_drink(request.title, request.recipe.into_parts())?;

    tracing::info!(sub = claims.subject(), drink_id = drink.id, "Drink created");
    Ok(Json(DrinkDetailsResponse::new(vec![drink.long()])))
}

#[utoipa::path(
    patch,
    path = "/drinks/{drink_id}",
    params(("drink_id" = i64, Path, description = "Identifier of the drink to update")),
    request_body = UpdateDrinkRequest,
    tag = "Drinks",
    responses(
        (status = 200, description = "The updated drink", body = DrinkDetailsResponse),
        (status = 401, body = ErrorBody),
        (status = 403, body = ErrorBody),
        (status = 404, body = ErrorBody),
        (status = 422, body = ErrorBody)
    )
)]
pub async fn update_drink(
    Extension(claims): Extension<Claims>,
    drink_id: Result<Path<i64>, PathRejection>,
    State(state): State<AppState>,
    payload: Result<Json<UpdateDrinkRequest>, JsonRejection>,
) -> Result<Json<DrinkDetailsResponse>, ApiError> {
    let Path(drink_id) = drink_id.map_err(|_| ApiError::not_found())?;

    let mut store = state.store.write().await;
    // Unknown id wins over a bad body.
    store.get_drink(drink_id)?;
    let Json(update) = payload.map_err(|_| ApiError::unprocessable())?;
    let drink = store.update_drink(drink_id, update)?;

    tracing::info!(sub = claims.subject(), drink_id, "Drink updated");
    Ok(Json(DrinkDetailsResponse::new(vec![drink.long()])))
}

#[utoipa::path(
    delete,
    path = "/drinks/{drink_id}",
    params(("drink_id" = i64, Path, description = "Identifier of the drink to delete")),
    tag = "Drinks",
    responses(
        (status = 200, description = "Id of the deleted drink", body = DeleteResponse),
        (status = 401, body = ErrorBody),
        (status = 403, body = ErrorBody),
        (status = 404, body = ErrorBody)
    )
)]
pub async fn delete_drink(
    Extension(claims): Extension<Claims>,
    drink_id: Result<Path<i64>, PathRejection>,
    State(state): State<AppState>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let Path(drink_id) = drink_id.map_err(|_| ApiError::not_found())?;

    let mut store = state.store.write().await;
    store.delete_drink(drink_id)?;

    tracing::info!(sub = claims.subject(), drink_id, "Drink deleted");
    Ok(Json(DeleteResponse {
        success: true,
        delete: drink_id,
    }))
}
