//! Deploy an infrastructure and wait for the deploy to complete

use std::fmt::Display;
use std::time::Duration;

use thiserror::Error;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::client::{ApiError, ApiResult, Client};
use crate::model::{DeployOptions, Infrastructure};

/// Delay between two status checks
pub const POLL_INTERVAL: Duration = Duration::from_secs(30);
/// Maximum time spent waiting for a status
pub const DEPLOY_TIMEOUT: Duration = Duration::from_secs(45 * 60);

pub fn infrastructure_path(infrastructure_id: i64) -> String {
    format!("/api/v2/infrastructures/{infrastructure_id}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: POLL_INTERVAL,
            timeout: DEPLOY_TIMEOUT,
        }
    }
}

/// Status an infrastructure is awaited for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AwaitTarget {
    /// The deploy of the pending changes is finished
    Finished,
    /// The infrastructure is deleted
    Deleted,
}

impl AwaitTarget {
    pub fn status(self) -> &'static str {
        match self {
            AwaitTarget::Finished => "finished",
            AwaitTarget::Deleted => "deleted",
        }
    }

    fn observe(self, infrastructure: &Infrastructure) -> &str {
        match self {
            AwaitTarget::Finished => &infrastructure.config.deploy_status,
            AwaitTarget::Deleted => &infrastructure.service_status,
        }
    }
}

impl Display for AwaitTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.status())
    }
}

#[derive(Debug, Error)]
pub enum DeployError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(
        "infrastructure {infrastructure_id} did not reach status `{target}` within {}s (last status: `{last_status}`)",
        .timeout.as_secs()
    )]
    Timeout {
        infrastructure_id: i64,
        target: AwaitTarget,
        timeout: Duration,
        last_status: String,
    },
}

impl DeployError {
    /// Summary of the diagnostic reporting the error
    pub fn summary(&self) -> &'static str {
        match self {
            DeployError::Api(_) => "Failed to deploy infrastructure",
            DeployError::Timeout { .. } => "Timed out waiting for the infrastructure deploy",
        }
    }
}

/// Apply the pending changes of an infrastructure
pub async fn deploy(
    client: &Client,
    infrastructure_id: i64,
    options: &DeployOptions,
) -> ApiResult<()> {
    info!(
        infrastructure_id,
        allow_data_loss = options.allow_data_loss,
        "Deploying infrastructure"
    );
    let path = format!("{}/actions/deploy", infrastructure_path(infrastructure_id));
    client.action(&path, options).await
}

/// Poll an infrastructure until it reaches `target`, or until the timeout elapses
///
/// The first check happens one interval after the call.
pub async fn await_status(
    client: &Client,
    infrastructure_id: i64,
    target: AwaitTarget,
    settings: PollSettings,
) -> Result<(), DeployError> {
    let path = infrastructure_path(infrastructure_id);
    let start = Instant::now();
    let deadline = start + settings.timeout;
    let mut ticker = interval_at(start + settings.interval, settings.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        let last_status = match client.get::<Infrastructure>(&path).await {
            Ok(infrastructure) => target.observe(&infrastructure).to_owned(),
            Err(err) if err.is_not_found() && target == AwaitTarget::Deleted => {
                target.status().to_owned()
            }
            Err(err) => return Err(err.into()),
        };

        if last_status == target.status() {
            info!(
                infrastructure_id,
                status = target.status(),
                elapsed = ?start.elapsed(),
                "Infrastructure reached awaited status"
            );
            return Ok(());
        }
        debug!(
            infrastructure_id,
            status = %last_status,
            awaited = target.status(),
            "Infrastructure not ready yet"
        );

        if Instant::now() >= deadline {
            return Err(DeployError::Timeout {
                infrastructure_id,
                target,
                timeout: settings.timeout,
                last_status,
            });
        }
    }
}

/// Deploy an infrastructure, then optionally wait for the deploy to finish
pub async fn deploy_and_await(
    client: &Client,
    infrastructure_id: i64,
    options: &DeployOptions,
    wait: Option<PollSettings>,
) -> Result<(), DeployError> {
    deploy(client, infrastructure_id, options).await?;
    if let Some(settings) = wait {
        await_status(client, infrastructure_id, AwaitTarget::Finished, settings).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::client::fake::FakeTransport;
    use crate::client::Method;

    const PATH: &str = "/api/v2/infrastructures/5";

    fn infrastructure(deploy_status: &str, service_status: &str) -> serde_json::Value {
        json!({
            "id": 5,
            "revision": 1,
            "label": "demo",
            "siteId": 1,
            "serviceStatus": service_status,
            "config": {"deployStatus": deploy_status},
        })
    }

    fn settings() -> PollSettings {
        PollSettings {
            interval: Duration::from_secs(10),
            timeout: Duration::from_secs(60),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn waits_until_finished() {
        let fake = FakeTransport::new();
        fake.on(Method::Get, PATH, 200, infrastructure("ongoing", "active"))
            .on(Method::Get, PATH, 200, infrastructure("ongoing", "active"))
            .on(Method::Get, PATH, 200, infrastructure("finished", "active"));

        let start = Instant::now();
        await_status(&fake.client(), 5, AwaitTarget::Finished, settings())
            .await
            .unwrap();

        assert_eq!(fake.sent(Method::Get).len(), 3);
        assert_eq!(start.elapsed(), Duration::from_secs(30));
    }

    #[tokio::test(start_paused = true)]
    async fn times_out_when_never_finished() {
        let fake = FakeTransport::new();
        fake.on(Method::Get, PATH, 200, infrastructure("ongoing", "active"));

        let start = Instant::now();
        let err = await_status(&fake.client(), 5, AwaitTarget::Finished, settings())
            .await
            .unwrap_err();

        assert!(matches!(
            &err,
            DeployError::Timeout { last_status, .. } if last_status == "ongoing"
        ));
        assert_eq!(err.summary(), "Timed out waiting for the infrastructure deploy");
        assert_eq!(fake.sent(Method::Get).len(), 6);
        assert!(start.elapsed() >= Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn default_settings_time_out_after_45_minutes() {
        let fake = FakeTransport::new();
        fake.on(Method::Get, PATH, 200, infrastructure("ongoing", "active"));

        let start = Instant::now();
        let err = await_status(&fake.client(), 5, AwaitTarget::Finished, Default::default())
            .await
            .unwrap_err();

        assert!(matches!(err, DeployError::Timeout { .. }));
        assert_eq!(start.elapsed(), DEPLOY_TIMEOUT);
    }

    #[tokio::test(start_paused = true)]
    async fn not_found_means_deleted() {
        let fake = FakeTransport::new();
        fake.on(Method::Get, PATH, 200, infrastructure("ongoing", "ordered"))
            .on(Method::Get, PATH, 404, json!({"message": "not found"}));

        await_status(&fake.client(), 5, AwaitTarget::Deleted, settings())
            .await
            .unwrap();
        assert_eq!(fake.sent(Method::Get).len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn api_error_aborts_the_wait() {
        let fake = FakeTransport::new();
        fake.on(Method::Get, PATH, 500, json!({"message": "internal"}));

        let err = await_status(&fake.client(), 5, AwaitTarget::Finished, settings())
            .await
            .unwrap_err();
        assert!(matches!(err, DeployError::Api(_)));
        assert_eq!(fake.sent(Method::Get).len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn deploy_posts_options() {
        let fake = FakeTransport::new();
        fake.on(Method::Post, "/api/v2/infrastructures/5/actions/deploy", 202, json!(null))
            .on(Method::Get, PATH, 200, infrastructure("finished", "active"));

        deploy_and_await(&fake.client(), 5, &DeployOptions::new(true), Some(settings()))
            .await
            .unwrap();

        let posts = fake.sent(Method::Post);
        assert_eq!(posts.len(), 1);
        assert_eq!(
            posts[0].body,
            Some(json!({
                "allowDataLoss": true,
                "attemptSoftShutdown": true,
                "softShutdownTimeout": 180,
                "hardShutdownAfterTimeout": true,
            }))
        );
    }
}
