//! Thin client for the MetalCloud API
//!
//! Only the calls made by the provider are exposed.
//! Every call checks the response status against the codes it expects,
//! and reports anything else as an [`ApiError`].

use std::fmt::Debug;
use std::sync::{Arc, PoisonError, RwLock};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tf_provider::Diagnostics;

mod error;
mod transport;

#[cfg(test)]
pub(crate) mod fake;

pub use error::ApiError;
pub use transport::{parse_endpoint, ApiRequest, ApiResponse, HttpTransport, Method, Transport};

pub type ApiResult<T> = Result<T, ApiError>;

const EXPECT_GET: &[u16] = &[200];
const EXPECT_CREATE: &[u16] = &[200, 201];
const EXPECT_UPDATE: &[u16] = &[200];
const EXPECT_DELETE: &[u16] = &[200, 202, 204];
const EXPECT_ACTION: &[u16] = &[200, 202];

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListEnvelope<T> {
    Paginated { data: Vec<T> },
    Bare(Vec<T>),
}

#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
}

impl Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client").finish_non_exhaustive()
    }
}

impl Client {
    pub fn new<T: Transport>(transport: T) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    /// Send a request, and check the status code is one of `expected`
    pub async fn call(&self, request: ApiRequest, expected: &[u16]) -> ApiResult<ApiResponse> {
        let method = request.method;
        let path = request.path.clone();
        let response = self
            .transport
            .send(request)
            .await
            .map_err(|err| ApiError::Transport {
                method,
                path: path.clone(),
                message: format!("{err:#}"),
            })?;

        if expected.contains(&response.status) {
            Ok(response)
        } else {
            Err(ApiError::UnexpectedStatus {
                method,
                path,
                status: response.status,
                body: response.body,
            })
        }
    }

    pub async fn get<T>(&self, path: &str) -> ApiResult<T>
    where
        T: DeserializeOwned + Send,
    {
        let response = self
            .call(ApiRequest::new(Method::Get, path), EXPECT_GET)
            .await?;
        decode(Method::Get, path, &response.body)
    }

    /// List the items of a collection, filtered by the given query
    pub async fn list<T>(&self, path: &str, query: &[(&str, String)]) -> ApiResult<Vec<T>>
    where
        T: DeserializeOwned + Send,
    {
        let request = query
            .iter()
            .fold(ApiRequest::new(Method::Get, path), |request, (key, value)| {
                request.with_query(*key, value.as_str())
            });
        let response = self.call(request, EXPECT_GET).await?;
        Ok(match decode(Method::Get, path, &response.body)? {
            ListEnvelope::Paginated { data } => data,
            ListEnvelope::Bare(data) => data,
        })
    }

    pub async fn create<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned + Send,
    {
        let request = ApiRequest::new(Method::Post, path).with_body(encode(path, body)?);
        let response = self.call(request, EXPECT_CREATE).await?;
        decode(Method::Post, path, &response.body)
    }

    /// Patch an object, guarded by the revision it was read at
    pub async fn update<B, T>(&self, path: &str, revision: i64, body: &B) -> ApiResult<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned + Send,
    {
        let request = ApiRequest::new(Method::Patch, path)
            .with_body(encode(path, body)?)
            .with_revision(revision);
        let response = self.call(request, EXPECT_UPDATE).await?;
        decode(Method::Patch, path, &response.body)
    }

    pub async fn delete(&self, path: &str) -> ApiResult<()> {
        self.call(ApiRequest::new(Method::Delete, path), EXPECT_DELETE)
            .await?;
        Ok(())
    }

    /// Trigger an action, ignoring the response body
    pub async fn action<B>(&self, path: &str, body: &B) -> ApiResult<()>
    where
        B: Serialize + Sync + ?Sized,
    {
        let request = ApiRequest::new(Method::Post, path).with_body(encode(path, body)?);
        self.call(request, EXPECT_ACTION).await?;
        Ok(())
    }
}

fn encode<B: Serialize + ?Sized>(path: &str, body: &B) -> ApiResult<serde_json::Value> {
    serde_json::to_value(body).map_err(|source| ApiError::Encode {
        path: path.to_owned(),
        source,
    })
}

fn decode<T: DeserializeOwned>(method: Method, path: &str, body: &str) -> ApiResult<T> {
    serde_json::from_str(body).map_err(|source| ApiError::Decode {
        method,
        path: path.to_owned(),
        source,
    })
}

/// Slot shared by the provider and all its resources
///
/// Resources are instantiated before the provider is configured,
/// so the client is looked up when an operation runs.
#[derive(Clone, Default)]
pub struct ClientHandle {
    inner: Arc<RwLock<Option<Client>>>,
}

impl Debug for ClientHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientHandle")
            .field("configured", &self.get().is_some())
            .finish()
    }
}

impl ClientHandle {
    pub fn new(client: Client) -> Self {
        let handle = Self::default();
        handle.set(client);
        handle
    }

    pub fn set(&self, client: Client) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = Some(client);
    }

    pub fn get(&self) -> Option<Client> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Get the client, or record an error if the provider is not configured
    pub fn client(&self, diags: &mut Diagnostics) -> Option<Client> {
        let client = self.get();
        if client.is_none() {
            diags.root_error(
                "Unconfigured MetalCloud client",
                "The provider has not been configured yet. Check the provider block declares an `endpoint` and an `api_key`.",
            );
        }
        client
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::fake::FakeTransport;
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: i64,
    }

    #[tokio::test]
    async fn unexpected_status_keeps_body() {
        let fake = FakeTransport::new();
        fake.on(Method::Get, "/api/v2/items/1", 500, json!({"message": "boom"}));

        let err = fake
            .client()
            .get::<Item>("/api/v2/items/1")
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("boom"));
    }

    #[tokio::test]
    async fn transport_error_is_reported() {
        let fake = FakeTransport::new();
        fake.fail(Method::Delete, "/api/v2/items/1", "connection reset");

        let err = fake.client().delete("/api/v2/items/1").await.unwrap_err();
        assert!(matches!(err, ApiError::Transport { .. }));
        assert!(err.to_string().contains("connection reset"));
    }

    #[tokio::test]
    async fn list_accepts_both_envelopes() {
        let fake = FakeTransport::new();
        fake.on(Method::Get, "/api/v2/a", 200, json!({"data": [{"id": 1}]}));
        fake.on(Method::Get, "/api/v2/b", 200, json!([{"id": 2}]));
        let client = fake.client();

        let a: Vec<Item> = client.list("/api/v2/a", &[]).await.unwrap();
        let b: Vec<Item> = client.list("/api/v2/b", &[]).await.unwrap();
        assert_eq!(a, vec![Item { id: 1 }]);
        assert_eq!(b, vec![Item { id: 2 }]);
    }

    #[tokio::test]
    async fn update_sends_revision() {
        let fake = FakeTransport::new();
        fake.on(Method::Patch, "/api/v2/items/1", 200, json!({"id": 1}));

        let _: Item = fake
            .client()
            .update("/api/v2/items/1", 7, &json!({"label": "x"}))
            .await
            .unwrap();
        let requests = fake.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].if_match, Some(7));
        assert_eq!(requests[0].body, Some(json!({"label": "x"})));
    }

    #[test]
    fn unconfigured_handle_reports_error() {
        let handle = ClientHandle::default();
        let mut diags = Diagnostics::default();
        assert!(handle.client(&mut diags).is_none());
        assert_eq!(diags.errors.len(), 1);

        handle.set(FakeTransport::new().client());
        let mut diags = Diagnostics::default();
        assert!(handle.client(&mut diags).is_some());
        assert!(diags.errors.is_empty());
    }
}
