// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{require_permission, Permission, PermissionGate},
    error::{ApiError, ErrorBody},
    models::{
        CreateDrinkRequest, DeleteResponse, DrinkDetailsResponse, DrinkLong, DrinkShort,
        MenuResponse, RecipeInput, RecipePart, ShortRecipePart, UpdateDrinkRequest,
    },
    state::AppState,
};

pub mod drinks;
pub mod health;

async fn not_found() -> ApiError {
    ApiError::not_found()
}

pub fn router(state: AppState) -> Router {
    let verifier = state.verifier.clone();
    let gate = move |permission: Permission| {
        middleware::from_fn_with_state(
            PermissionGate::new(verifier.clone(), permission),
            require_permission,
        )
    };

    let routes = Router::new()
        .route(
            "/drinks",
            get(drinks::list_drinks)
                .merge(post(drinks::create_drink).route_layer(gate(Permission::PostDrinks))),
        )
        .route(
            "/drinks-detail",
            get(drinks::get_drinks_detail).route_layer(gate(Permission::GetDrinksDetail)),
        )
        .route(
            "/drinks/{drink_id}",
            patch(drinks::update_drink)
                .route_layer(gate(Permission::PatchDrinks))
                .merge(delete(drinks::delete_drink).route_layer(gate(Permission::DeleteDrinks))),
        )
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .fallback(not_found)
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        drinks::list_drinks,
        drinks::get_drinks_detail,
        drinks::create_drink,
        drinks::update_drink,
        drinks::delete_drink,
        health::health,
        health::liveness
    ),
    components(
        schemas(
            DrinkShort,
            DrinkLong,
            RecipePart,
            ShortRecipePart,
            RecipeInput,
            CreateDrinkRequest,
            UpdateDrinkRequest,
            MenuResponse,
            DrinkDetailsResponse,
            DeleteResponse,
            ErrorBody,
            Permission
        )
    ),
    tags(
        (name = "Drinks", description = "Drink menu; mutations require Auth0 permissions"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;
