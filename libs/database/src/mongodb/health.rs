use mongodb::{Client, bson::doc};
use std::time::Instant;

/// Outcome of a MongoDB ping
#[derive(Debug, Clone)]
pub struct HealthStatus {
    pub healthy: bool,
    /// Error details when unhealthy
    pub message: Option<String>,
    pub response_time_ms: u64,
}

impl HealthStatus {
    /// `Err` carries the driver message, for readiness reporting.
    pub fn into_result(self) -> Result<(), String> {
        if self.healthy {
            Ok(())
        } else {
            Err(self
                .message
                .unwrap_or_else(|| "MongoDB did not answer ping".to_string()))
        }
    }
}

/// Ping the server and report latency plus any error.
pub async fn check_health_detailed(client: &Client) -> HealthStatus {
    let start = Instant::now();
    let result = ping(client).await;
    let response_time_ms = start.elapsed().as_millis() as u64;

    HealthStatus {
        healthy: result.is_ok(),
        message: result.err().map(|e| e.to_string()),
        response_time_ms,
    }
}

async fn ping(client: &Client) -> mongodb::error::Result<()> {
    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await
        .map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_result_keeps_driver_message() {
        let down = HealthStatus {
            healthy: false,
            message: Some("server selection timeout".to_string()),
            response_time_ms: 30_000,
        };
        assert_eq!(down.into_result(), Err("server selection timeout".to_string()));

        let silent = HealthStatus {
            healthy: false,
            message: None,
            response_time_ms: 5,
        };
        assert!(silent.into_result().is_err());

        let up = HealthStatus {
            healthy: true,
            message: None,
            response_time_ms: 2,
        };
        assert_eq!(up.into_result(), Ok(()));
    }

    #[tokio::test]
    #[ignore] // Requires actual MongoDB
    async fn test_check_health_detailed() {
        let client = Client::with_uri_str("mongodb://localhost:27017")
            .await
            .unwrap();
        let status = check_health_detailed(&client).await;
        assert!(status.healthy);
        assert!(status.message.is_none());
    }
}
