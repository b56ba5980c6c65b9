//! Scripted in-memory [`Transport`]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use super::{ApiRequest, ApiResponse, Client, Method, Transport};

#[derive(Debug, Clone)]
enum Reply {
    Response(ApiResponse),
    Error(String),
}

#[derive(Debug, Default)]
struct Script {
    routes: HashMap<(Method, String), VecDeque<Reply>>,
    requests: Vec<ApiRequest>,
}

/// Replays canned replies per method and path
///
/// Replies registered for a route are consumed in order,
/// the last one being repeated forever.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeTransport {
    script: Arc<Mutex<Script>>,
}

impl FakeTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn push(&self, method: Method, path: &str, reply: Reply) -> &Self {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .routes
            .entry((method, path.to_owned()))
            .or_default()
            .push_back(reply);
        self
    }

    pub(crate) fn on(
        &self,
        method: Method,
        path: &str,
        status: u16,
        body: serde_json::Value,
    ) -> &Self {
        let body = if body.is_null() {
            String::new()
        } else {
            body.to_string()
        };
        self.push(method, path, Reply::Response(ApiResponse::new(status, body)))
    }

    pub(crate) fn fail(&self, method: Method, path: &str, message: &str) -> &Self {
        self.push(method, path, Reply::Error(message.to_owned()))
    }

    pub(crate) fn requests(&self) -> Vec<ApiRequest> {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .requests
            .clone()
    }

    /// Requests sent with the given method
    pub(crate) fn sent(&self, method: Method) -> Vec<ApiRequest> {
        self.requests()
            .into_iter()
            .filter(|request| request.method == method)
            .collect()
    }

    pub(crate) fn client(&self) -> Client {
        Client::new(self.clone())
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let mut script = self.script.lock().unwrap_or_else(PoisonError::into_inner);
        let key = (request.method, request.path.clone());
        script.requests.push(request);

        let replies = script
            .routes
            .get_mut(&key)
            .ok_or_else(|| anyhow!("no reply scripted for {} {}", key.0, key.1))?;
        let reply = if replies.len() > 1 {
            replies.pop_front()
        } else {
            replies.front().cloned()
        };

        match reply {
            Some(Reply::Response(response)) => Ok(response),
            Some(Reply::Error(message)) => Err(anyhow!(message)),
            None => Err(anyhow!("no reply scripted for {} {}", key.0, key.1)),
        }
    }
}
