//! HTTP client for a PostgREST-style table plus an object-storage bucket.
//!
//! Rows live at `{base}/rest/v1/{table}`; blobs are uploaded to
//! `{base}/storage/v1/object/{bucket}/{name}` and served from
//! `{base}/storage/v1/object/public/{bucket}/{name}`. The change feed polls
//! the table and fires when its content fingerprint changes.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use tracing::{debug, warn};

use resale_core::ItemId;
use resale_inventory::{InventoryItem, ItemPatch, NewItem};

use super::{ChangeCallback, FeedHandle, RemoteError, RemoteStore};
use crate::config::{ConfigError, StoreConfig};

/// Supplies the signed-in user's bearer token per request.
pub type TokenSource = Arc<dyn Fn() -> Option<String> + Send + Sync>;

struct Inner {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    table: String,
    bucket: String,
    token: Option<TokenSource>,
}

#[derive(Clone)]
pub struct RestRemoteStore {
    inner: Arc<Inner>,
    poll_interval: Duration,
}

impl RestRemoteStore {
    pub fn from_config(config: &StoreConfig) -> Result<Self, ConfigError> {
        let base_url = config
            .remote_url
            .clone()
            .ok_or(ConfigError::Missing("RESALE_REMOTE_URL"))?;
        let api_key = config
            .remote_key
            .clone()
            .ok_or(ConfigError::Missing("RESALE_REMOTE_KEY"))?;
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ConfigError::Invalid {
                key: "RESALE_REQUEST_TIMEOUT_MS",
                reason: e.to_string(),
            })?;

        Ok(Self {
            inner: Arc::new(Inner {
                client,
                base_url,
                api_key,
                table: config.table.clone(),
                bucket: config.bucket.clone(),
                token: None,
            }),
            poll_interval: config.feed_poll_interval,
        })
    }

    /// Authenticate requests as the signed-in user instead of the anon key.
    pub fn with_token_source(mut self, token: TokenSource) -> Self {
        let inner = Inner {
            client: self.inner.client.clone(),
            base_url: self.inner.base_url.clone(),
            api_key: self.inner.api_key.clone(),
            table: self.inner.table.clone(),
            bucket: self.inner.bucket.clone(),
            token: Some(token),
        };
        self.inner = Arc::new(inner);
        self
    }
}

impl Inner {
    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        let bearer = self
            .token
            .as_ref()
            .and_then(|t| t())
            .unwrap_or_else(|| self.api_key.clone());
        req.header("apikey", &self.api_key).bearer_auth(bearer)
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response, RemoteError> {
        let resp = self
            .authorize(req)
            .send()
            .await
            .map_err(|e| RemoteError::Connectivity(e.to_string()))?;
        check_status(resp).await
    }

    async fn fetch_all(&self) -> Result<Vec<InventoryItem>, RemoteError> {
        let req = self
            .client
            .get(self.table_url())
            .query(&[("select", "*"), ("order", "created_at.desc")]);
        let resp = self.send(req).await?;
        resp.json::<Vec<InventoryItem>>()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))
    }
}

/// Maps a non-2xx response onto the error taxonomy.
async fn check_status(resp: Response) -> Result<Response, RemoteError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    let detail = format!("{status}: {body}");
    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RemoteError::PermissionDenied(detail),
        StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
            RemoteError::Validation(detail)
        }
        _ => RemoteError::Unavailable(detail),
    })
}

fn id_filter(ids: &[ItemId]) -> String {
    let quoted: Vec<String> = ids.iter().map(|id| format!("\"{}\"", id.as_str())).collect();
    format!("in.({})", quoted.join(","))
}

fn fingerprint(rows: &[InventoryItem]) -> u64 {
    let mut hasher = DefaultHasher::new();
    serde_json::to_string(rows).unwrap_or_default().hash(&mut hasher);
    hasher.finish()
}

/// Record the latest fingerprint; true when it differs from the previous
/// poll. The first poll only sets the baseline.
fn observe(last: &mut Option<u64>, print: u64) -> bool {
    let changed = last.is_some_and(|prev| prev != print);
    *last = Some(print);
    changed
}

#[async_trait]
impl RemoteStore for RestRemoteStore {
    async fn fetch_all(&self) -> Result<Vec<InventoryItem>, RemoteError> {
        self.inner.fetch_all().await
    }

    async fn insert(&self, items: Vec<NewItem>) -> Result<Vec<InventoryItem>, RemoteError> {
        let req = self
            .inner
            .client
            .post(self.inner.table_url())
            .header("Prefer", "return=representation")
            .json(&items);
        let resp = self.inner.send(req).await?;
        resp.json::<Vec<InventoryItem>>()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))
    }

    async fn update(&self, id: &ItemId, patch: &ItemPatch) -> Result<(), RemoteError> {
        let req = self
            .inner
            .client
            .patch(self.inner.table_url())
            .query(&[("id", format!("eq.{}", id.as_str()))])
            .json(patch);
        self.inner.send(req).await.map(|_| ())
    }

    async fn update_many(&self, ids: &[ItemId], patch: &ItemPatch) -> Result<(), RemoteError> {
        if ids.is_empty() {
            return Ok(());
        }
        let req = self
            .inner
            .client
            .patch(self.inner.table_url())
            .query(&[("id", id_filter(ids))])
            .json(patch);
        self.inner.send(req).await.map(|_| ())
    }

    async fn delete(&self, id: &ItemId) -> Result<(), RemoteError> {
        let req = self
            .inner
            .client
            .delete(self.inner.table_url())
            .query(&[("id", format!("eq.{}", id.as_str()))]);
        self.inner.send(req).await.map(|_| ())
    }

    async fn upload_blob(
        &self,
        name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, RemoteError> {
        let inner = &self.inner;
        let url = format!(
            "{}/storage/v1/object/{}/{}",
            inner.base_url, inner.bucket, name
        );
        let req = inner
            .client
            .post(url)
            .header("content-type", content_type)
            .header("cache-control", "max-age=3600")
            .header("x-upsert", "false")
            .body(bytes);
        inner.send(req).await?;
        Ok(format!(
            "{}/storage/v1/object/public/{}/{}",
            inner.base_url, inner.bucket, name
        ))
    }

    fn watch(&self, on_change: ChangeCallback) -> Result<FeedHandle, RemoteError> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| RemoteError::FeedNotStarted(format!("no async runtime: {e}")))?;
        let inner = self.inner.clone();
        let interval = self.poll_interval;

        let task = runtime.spawn(async move {
            let mut last: Option<u64> = None;
            loop {
                match inner.fetch_all().await {
                    Ok(rows) => {
                        if observe(&mut last, fingerprint(&rows)) {
                            debug!("remote change feed: table changed");
                            on_change();
                        }
                    }
                    Err(err) => warn!(error = %err, "remote change feed poll failed"),
                }
                tokio::time::sleep(interval).await;
            }
        });

        Ok(FeedHandle::new(move || task.abort()))
    }
}

impl core::fmt::Debug for RestRemoteStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RestRemoteStore")
            .field("base_url", &self.inner.base_url)
            .field("table", &self.inner.table)
            .field("bucket", &self.inner.bucket)
            .finish_non_exhaustive()
    }
}
