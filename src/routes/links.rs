use axum::{
    extract::{Path, State, rejection::PathRejection},
    response::Redirect,
};
use tracing::instrument;

use crate::{errors::PageError, startup::AppState};

#[instrument(name = "HTTP: Resolve request", skip(slug, state))]
pub async fn resolve(
    slug: Result<Path<String>, PathRejection>,
    State(state): State<AppState>,
) -> Result<Redirect, PageError> {
    // An undecodable slug can't name a link.
    let Path(slug) = slug.map_err(|e| {
        tracing::warn!("Unusable slug: {}", e);
        PageError::NotFound
    })?;

    let target = state.link_service.resolve(&slug).await?;
    Ok(Redirect::temporary(&target))
}
