/**
 * Push Dispatch
 *
 * Best-effort push notification delivery through FCM. Dispatch never fails
 * the triggering request: every error path is logged and swallowed. A user
 * without a registered device token is silently skipped.
 */

use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::users::get_fcm_token;
use crate::notifications::db::{create_notification, NotificationKind};

/// FCM send endpoint
const FCM_SEND_URL: &str = "https://fcm.googleapis.com/fcm/send";

/// Client for the external push provider
///
/// Created once at startup and shared through `AppState`. When no server
/// key is configured, delivery is disabled and dispatch only records the
/// notification document.
#[derive(Clone)]
pub struct PushClient {
    http: reqwest::Client,
    server_key: Option<String>,
}

impl PushClient {
    /// Build the client from the `FCM_SERVER_KEY` environment variable
    pub fn from_env() -> Self {
        let server_key = std::env::var("FCM_SERVER_KEY").ok();
        if server_key.is_none() {
            tracing::warn!("FCM_SERVER_KEY not set, push delivery disabled");
        }

        Self {
            http: reqwest::Client::new(),
            server_key,
        }
    }

    /// Send one notification payload to a device token
    async fn send(
        &self,
        token: &str,
        title: &str,
        body: &str,
        data: Option<&Value>,
    ) -> Result<(), reqwest::Error> {
        let Some(server_key) = &self.server_key else {
            return Ok(());
        };

        let payload = serde_json::json!({
            "to": token,
            "notification": {
                "title": title,
                "body": body,
            },
            "data": data,
        });

        self.http
            .post(FCM_SEND_URL)
            .header("Authorization", format!("key={server_key}"))
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

/// Record a notification and push it to the user's device, best-effort
///
/// 1. Inserts the notification document (failure logged and swallowed)
/// 2. Looks up the user's device token; absent token is a silent no-op
/// 3. Spawns the provider call so the triggering request never waits on it
pub async fn dispatch(
    pool: &PgPool,
    push: &PushClient,
    user_id: Uuid,
    kind: NotificationKind,
    title: &str,
    body: &str,
    data: Option<Value>,
) {
    if let Err(e) = create_notification(pool, user_id, kind, title, body, data.clone()).await {
        tracing::error!("Failed to record notification for {}: {:?}", user_id, e);
    }

    let token = match get_fcm_token(pool, user_id).await {
        Ok(Some(token)) => token,
        Ok(None) => return,
        Err(e) => {
            tracing::error!("Failed to look up device token for {}: {:?}", user_id, e);
            return;
        }
    };

    let push = push.clone();
    let title = title.to_string();
    let body = body.to_string();
    tokio::spawn(async move {
        if let Err(e) = push.send(&token, &title, &body, data.as_ref()).await {
            tracing::error!("Push delivery failed: {:?}", e);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_without_key_is_noop() {
        let client = PushClient {
            http: reqwest::Client::new(),
            server_key: None,
        };

        // No key configured: must succeed without touching the network
        let result = client.send("device-token", "Title", "Body", None).await;
        assert!(result.is_ok());
    }
}
