use axum::Json;
use secrecy::ExposeSecret;
use serde::Serialize;
use tracing::instrument;

use crate::services::Session;

/// What the page templates receive once the guard lets a browser through.
#[derive(Debug, Serialize)]
pub struct PageData {
    pub id: String,
    pub token: String,
}

impl From<Session> for PageData {
    fn from(session: Session) -> Self {
        Self {
            id: session.user_id,
            token: session.token.expose_secret().to_string(),
        }
    }
}

#[instrument(name = "Web: Create page", skip(session), fields(user_id = %session.user_id))]
pub async fn create_page(session: Session) -> Json<PageData> {
    Json(session.into())
}

#[instrument(name = "Web: Inventory page", skip(session), fields(user_id = %session.user_id))]
pub async fn inventory_page(session: Session) -> Json<PageData> {
    Json(session.into())
}
