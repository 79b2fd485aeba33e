use axum::{extract::State, Json};
use tracing::warn;

use super::AppState;
use crate::errors::ServiceError;
use crate::seeding::SeedSummary;

/// Drops every record and loads the demo dataset.
pub async fn reset_seed(State(state): State<AppState>) -> Result<Json<SeedSummary>, ServiceError> {
    warn!("resetting database to demo data");
    Ok(Json(state.seeder.reset_and_seed().await?))
}
