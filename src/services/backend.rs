use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::{configuration::BackendSettings, errors::BackendError};

const RETRY_BACKOFF: Duration = Duration::from_millis(100);

/// A backend reply whose body has already been decoded.
#[derive(Debug)]
pub struct BackendReply<T> {
    pub status: StatusCode,
    pub body: Result<T, BackendError>,
}

/// Thin JSON client for the URL-shortener API. Cheap to clone; every clone
/// shares the same connection pool.
#[derive(Clone, Debug)]
pub struct BackendClient {
    http: Client,
    origin: Url,
    retries: u32,
}

impl BackendClient {
    pub fn new(settings: &BackendSettings) -> Result<Self, BackendError> {
        let origin = parse_origin(&settings.origin)?;
        let http = Client::builder()
            .timeout(settings.timeout())
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(BackendError::Transport)?;

        Ok(Self {
            http,
            origin,
            retries: settings.retries,
        })
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    /// `{origin}/{segments...}`, each segment percent-encoded on its own.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, BackendError> {
        let mut url = self.origin.clone();
        url.path_segments_mut()
            .map_err(|_| BackendError::InvalidOrigin(self.origin.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GETs `url` and decodes its JSON body, retrying transient failures.
    ///
    /// The status is handed back together with the decoded body so callers
    /// can tell a `404` with an empty body apart from a broken backend.
    #[instrument(name = "Backend: GET", skip(self, bearer), fields(url = %url))]
    pub async fn get_json<T>(
        &self,
        url: Url,
        bearer: Option<&SecretString>,
    ) -> Result<BackendReply<T>, BackendError>
    where
        T: DeserializeOwned,
    {
        let mut attempt = 0;
        loop {
            match self.try_get_json(url.clone(), bearer).await {
                Err(e) if e.is_transient() && attempt < self.retries => {
                    attempt += 1;
                    tracing::warn!(attempt, "Backend call failed, retrying: {}", e);
                    tokio::time::sleep(RETRY_BACKOFF * attempt).await;
                }
                Err(e) => {
                    tracing::error!("Backend call failed: {}", e);
                    return Err(e);
                }
                Ok(reply) => return Ok(reply),
            }
        }
    }

    async fn try_get_json<T>(
        &self,
        url: Url,
        bearer: Option<&SecretString>,
    ) -> Result<BackendReply<T>, BackendError>
    where
        T: DeserializeOwned,
    {
        let mut request = self.http.get(url);
        if let Some(token) = bearer {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        tracing::debug!(%status, len = bytes.len(), "Backend answered");

        let body = serde_json::from_slice::<T>(&bytes)
            .map_err(|e| BackendError::Malformed(format!("{status}: {e}")));

        Ok(BackendReply { status, body })
    }
}

fn parse_origin(origin: &str) -> Result<Url, BackendError> {
    let url = Url::parse(origin).map_err(|e| BackendError::InvalidOrigin(format!("{origin}: {e}")))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(BackendError::InvalidOrigin(origin.to_string()));
    }
    Ok(url)
}
