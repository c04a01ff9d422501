//! Request-handler wrapper around a seed run.
//!
//! Success becomes a 200 response carrying the serialized [`SeedReport`];
//! any failure becomes a 500 response with `{"error": "..."}`.

use serde::Serialize;

use crate::config::Config;
use crate::error::SeedError;
use crate::seeder::{seed_from_config, SeedReport};

pub const STATUS_OK: u16 = 200;
pub const STATUS_ERROR: u16 = 500;

/// Status code and JSON body returned to the invoking process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerResponse {
    pub status_code: u16,
    pub body: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl HandlerResponse {
    pub fn is_success(&self) -> bool {
        self.status_code == STATUS_OK
    }

    pub fn from_result(result: Result<SeedReport, SeedError>) -> Self {
        match result {
            Ok(report) => match serde_json::to_string(&report) {
                Ok(body) => Self {
                    status_code: STATUS_OK,
                    body,
                },
                Err(e) => Self::failure(format!("Failed to serialize seed report: {}", e)),
            },
            Err(e) => Self::failure(format!("Seed failed: {}", e)),
        }
    }

    fn failure(message: String) -> Self {
        let body = serde_json::to_string(&ErrorBody { error: message })
            .unwrap_or_else(|_| r#"{"error":"Seed failed"}"#.to_string());
        Self {
            status_code: STATUS_ERROR,
            body,
        }
    }
}

/// Runs a seed with the stores named in `config` and wraps the outcome.
pub async fn handle(config: &Config) -> HandlerResponse {
    HandlerResponse::from_result(seed_from_config(config).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{write_snapshot, Fixture};
    use tempfile::TempDir;

    fn config_in(temp_dir: &TempDir) -> Config {
        Config {
            source_database_path: temp_dir.path().join("initial.db"),
            destination_database_path: temp_dir.path().join("data").join("chat.db"),
        }
    }

    #[tokio::test]
    async fn test_handle_success() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_in(&temp_dir);
        write_snapshot(&config.source_database_path, &Fixture::chat_dataset()).await;

        let response = handle(&config).await;
        assert!(response.is_success());

        let body: serde_json::Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(body["user_count"]["additions"], 3);
        assert_eq!(body["chat_count"]["final"], 2);
        assert_eq!(body["message_count"]["local"], 3);
        assert_eq!(body["link_count"]["prev"], 0);

        let again = handle(&config).await;
        let body: serde_json::Value = serde_json::from_str(&again.body).unwrap();
        assert_eq!(body["link_count"]["additions"], 0);
        assert_eq!(body["link_count"]["prev"], 4);
    }

    #[tokio::test]
    async fn test_handle_missing_source_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_in(&temp_dir);

        let response = handle(&config).await;
        assert_eq!(response.status_code, STATUS_ERROR);

        let body: serde_json::Value = serde_json::from_str(&response.body).unwrap();
        let message = body["error"].as_str().unwrap();
        assert!(message.starts_with("Seed failed: Source store unavailable"));
    }

    #[test]
    fn test_envelope_field_names() {
        let response = HandlerResponse {
            status_code: STATUS_OK,
            body: "{}".to_string(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json, serde_json::json!({"statusCode": 200, "body": "{}"}));
    }
}
