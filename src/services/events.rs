//! Task event fan-out seam.
//!
//! Downstream consumers (notification pipelines, analytics) live outside
//! this service; it only publishes. The default implementation writes the
//! event to the log stream, where a broker-backed publisher would hand it
//! to the `maintenance-task-events` topic.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

pub const TOPIC: &str = "maintenance-task-events";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskEvent {
    Created {
        task_id: Uuid,
        user_id: Uuid,
        summary: String,
        date: NaiveDate,
    },
}

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Failed to serialize event: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[async_trait]
pub trait TaskEventPublisher: Send + Sync {
    async fn publish(&self, event: &TaskEvent) -> Result<(), PublishError>;
}

/// Publisher that emits events through tracing instead of a broker.
pub struct LogPublisher;

#[async_trait]
impl TaskEventPublisher for LogPublisher {
    async fn publish(&self, event: &TaskEvent) -> Result<(), PublishError> {
        let payload = serde_json::to_string(event)?;
        tracing::info!(topic = TOPIC, %payload, "task event published");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_event_serializes_with_type_tag() {
        let event = TaskEvent::Created {
            task_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            summary: "Service the boiler".to_string(),
            date: NaiveDate::from_ymd_opt(2023, 6, 12).unwrap(),
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "created");
        assert_eq!(json["summary"], "Service the boiler");
        assert_eq!(json["date"], "2023-06-12");
    }
}
