//! Change notifications.
//!
//! After a successful create or patch the service announces the change through an
//! [`EventPublisher`]. Publishing is best effort: a failure is logged by the caller and
//! never undoes the write.

use crate::model::{Diversity, DiversityPatch};
use crate::{DiversityError, DiversityResult};
use chrono::{DateTime, Utc};
use diversity_uuid::ResourceId;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Message body announcing a created or changed diversity record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiversityEvent {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "CustomerGuid")]
    pub customer_guid: ResourceId,
    #[serde(rename = "LastModifiedDate")]
    pub last_modified_date: Option<DateTime<Utc>>,
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "IsNewCustomer")]
    pub is_new_customer: bool,
    #[serde(rename = "TouchpointId")]
    pub touchpoint_id: Option<String>,
}

/// Outbound channel for change notifications.
pub trait EventPublisher: Send + Sync {
    /// Sends one event.
    ///
    /// # Errors
    ///
    /// Returns [`DiversityError::Publish`] if the event cannot be handed to the channel.
    fn publish(&self, event: DiversityEvent) -> DiversityResult<()>;

    /// Announces a newly created record.
    fn publish_created(&self, diversity: &Diversity, url: &str) -> DiversityResult<()> {
        let customer_guid = diversity.customer_id.ok_or_else(|| {
            DiversityError::Publish("created record has no CustomerId".into())
        })?;
        let title = match diversity.diversity_id {
            Some(id) => format!("New Diversity record {id} added"),
            None => "New Diversity record added".to_string(),
        };

        self.publish(DiversityEvent {
            title,
            customer_guid,
            last_modified_date: diversity.last_modified_date,
            url: url.to_string(),
            is_new_customer: false,
            touchpoint_id: diversity.last_modified_by.clone(),
        })
    }

    /// Announces a patch applied to a customer's record.
    fn publish_patched(
        &self,
        patch: &DiversityPatch,
        customer_id: ResourceId,
        url: &str,
    ) -> DiversityResult<()> {
        let title = match patch.last_modified_date {
            Some(at) => format!(
                "Diversity record modification for {customer_id} at {}",
                at.to_rfc3339()
            ),
            None => format!("Diversity record modification for {customer_id}"),
        };

        self.publish(DiversityEvent {
            title,
            customer_guid: customer_id,
            last_modified_date: patch.last_modified_date,
            url: url.to_string(),
            is_new_customer: false,
            touchpoint_id: patch.last_modified_by.clone(),
        })
    }
}

/// Publisher that only logs each event.
#[derive(Clone, Debug, Default)]
pub struct TracingPublisher;

impl EventPublisher for TracingPublisher {
    fn publish(&self, event: DiversityEvent) -> DiversityResult<()> {
        tracing::info!(
            customer_id = %event.customer_guid,
            url = %event.url,
            touchpoint = event.touchpoint_id.as_deref().unwrap_or(""),
            "{}",
            event.title
        );
        Ok(())
    }
}

/// Publisher that hands events to an in-process queue.
///
/// The receiving half is drained by whatever forwards events to the real message bus.
#[derive(Clone, Debug)]
pub struct QueuePublisher {
    sender: mpsc::UnboundedSender<DiversityEvent>,
}

impl QueuePublisher {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<DiversityEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl EventPublisher for QueuePublisher {
    fn publish(&self, event: DiversityEvent) -> DiversityResult<()> {
        self.sender
            .send(event)
            .map_err(|_| DiversityError::Publish("event queue is closed".into()))
    }
}

/// Link to a single record, as carried in events.
pub fn record_url(base_url: &str, customer_id: &ResourceId, diversity_id: &ResourceId) -> String {
    format!(
        "{}/customers/{customer_id}/{}/{diversity_id}",
        base_url.trim_end_matches('/'),
        crate::constants::DIVERSITY_RESOURCE_SEGMENT
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::Arc;

    #[test]
    fn created_event_carries_record_fields() {
        let (publisher, mut rx) = QueuePublisher::new();
        let customer = ResourceId::new();
        let id = ResourceId::new();
        let record = Diversity {
            diversity_id: Some(id),
            customer_id: Some(customer),
            last_modified_by: Some("0000000001".into()),
            ..Default::default()
        };

        publisher
            .publish_created(&record, "https://api.example.com/x")
            .unwrap();

        let event = rx.try_recv().unwrap();
        assert_eq!(event.title, format!("New Diversity record {id} added"));
        assert_eq!(event.customer_guid, customer);
        assert_eq!(event.touchpoint_id.as_deref(), Some("0000000001"));
        assert!(!event.is_new_customer);
    }

    #[test]
    fn created_event_requires_customer() {
        let (publisher, _rx) = QueuePublisher::new();
        let err = publisher
            .publish_created(&Diversity::default(), "u")
            .unwrap_err();
        assert!(matches!(err, DiversityError::Publish(_)));
    }

    #[test]
    fn patched_event_uses_patch_audit_fields() {
        let (publisher, mut rx) = QueuePublisher::new();
        let customer = ResourceId::new();
        let at = Utc.with_ymd_and_hms(2024, 2, 3, 4, 5, 6).unwrap();
        let patch = DiversityPatch {
            last_modified_date: Some(at),
            last_modified_by: Some("0000000002".into()),
            ..Default::default()
        };

        publisher.publish_patched(&patch, customer, "u").unwrap();

        let event = rx.try_recv().unwrap();
        assert!(event.title.starts_with("Diversity record modification for"));
        assert_eq!(event.last_modified_date, Some(at));
        assert_eq!(event.touchpoint_id.as_deref(), Some("0000000002"));
    }

    #[test]
    fn queued_events_drain_after_publishers_drop() {
        let (publisher, mut rx) = QueuePublisher::new();
        let shared: Arc<dyn EventPublisher> = Arc::new(publisher.clone());
        for _ in 0..3 {
            shared
                .publish_patched(&DiversityPatch::default(), ResourceId::new(), "u")
                .unwrap();
        }
        drop(shared);
        drop(publisher);

        for _ in 0..3 {
            assert!(rx.try_recv().is_ok());
        }
        assert_eq!(
            rx.try_recv().unwrap_err(),
            tokio::sync::mpsc::error::TryRecvError::Disconnected
        );
    }

    #[test]
    fn closed_queue_is_an_error() {
        let (publisher, rx) = QueuePublisher::new();
        drop(rx);
        let err = publisher
            .publish_patched(&DiversityPatch::default(), ResourceId::new(), "u")
            .unwrap_err();
        assert!(matches!(err, DiversityError::Publish(_)));
    }

    #[test]
    fn event_body_uses_bus_field_names() {
        let event = DiversityEvent {
            title: "t".into(),
            customer_guid: ResourceId::new(),
            last_modified_date: None,
            url: "u".into(),
            is_new_customer: false,
            touchpoint_id: None,
        };
        let json = serde_json::to_value(&event).unwrap();
        for key in [
            "Title",
            "CustomerGuid",
            "LastModifiedDate",
            "URL",
            "IsNewCustomer",
            "TouchpointId",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }

    #[test]
    fn record_url_joins_segments() {
        let customer = ResourceId::parse("550e8400-e29b-41d4-a716-446655440000").unwrap();
        let id = ResourceId::parse("6ba7b810-9dad-11d1-80b4-00c04fd430c8").unwrap();
        assert_eq!(
            record_url("https://api.example.com/", &customer, &id),
            "https://api.example.com/customers/550e8400-e29b-41d4-a716-446655440000/diversitydetails/6ba7b810-9dad-11d1-80b4-00c04fd430c8"
        );
    }
}
