use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::api::{AppError, Context};
use crate::loader::load_showcase;
use crate::models::Card;

pub const DEFAULT_SHOWCASE_SIZE: usize = 3;
pub const MAX_SHOWCASE_SIZE: usize = 12;

#[derive(Debug, Deserialize)]
pub struct ShowcaseQuery {
    count: Option<usize>,
}

pub async fn v1_card(State(state): State<Arc<Context>>) -> Result<Json<Card>, AppError> {
    Ok(Json(state.source.load_card().await?))
}

pub async fn v1_cards(
    State(state): State<Arc<Context>>,
    Query(query): Query<ShowcaseQuery>,
) -> Result<Json<Vec<Card>>, AppError> {
    let count = query.count.unwrap_or(DEFAULT_SHOWCASE_SIZE);
    if !(1..=MAX_SHOWCASE_SIZE).contains(&count) {
        return Err(AppError::BadRequest(format!(
            "count must be between 1 and {}",
            MAX_SHOWCASE_SIZE
        )));
    }
    Ok(Json(load_showcase(&*state.source, count).await?))
}
