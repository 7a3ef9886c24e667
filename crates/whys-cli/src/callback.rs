//! Completion callback: POSTs the final result to `[general] callback_url`.

use std::time::Duration;

use serde::Serialize;

const CALLBACK_TIMEOUT: Duration = Duration::from_secs(10);

/// Deliver `payload` to `url`. Failures are logged and never surface to the
/// caller.
pub async fn notify<T: Serialize + Sync>(url: &str, payload: &T) {
    if let Err(error) = send(url, payload).await {
        tracing::warn!(url, %error, "callback: delivery failed");
    }
}

async fn send<T: Serialize + Sync>(url: &str, payload: &T) -> anyhow::Result<()> {
    let client = reqwest::Client::builder()
        .timeout(CALLBACK_TIMEOUT)
        .user_agent(concat!("whys/", env!("CARGO_PKG_VERSION")))
        .build()?;
    let status = client.post(url).json(payload).send().await?.status();
    if status.is_success() {
        tracing::debug!(url, status = status.as_u16(), "callback: delivered");
        Ok(())
    } else {
        anyhow::bail!("callback returned HTTP {status}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_callback_does_not_fail() {
        notify("http://127.0.0.1:9/hook", &serde_json::json!({"ok": true})).await;
    }

    #[tokio::test]
    async fn send_reports_transport_errors() {
        assert!(send("http://127.0.0.1:9/hook", &1).await.is_err());
    }
}
