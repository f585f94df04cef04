//! Order session and ordered product models.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of an order session. `Paid` is terminal: the client
/// never issues a transition away from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Open,
    Closed,
    Paid,
}

/// A table's active ordering context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSession {
    /// Server-assigned identifier, immutable.
    pub id: Uuid,
    pub table_number: u32,
    pub status: SessionStatus,
}

/// Partial PATCH payload for an order session.
///
/// Fields left `None` are omitted from the wire entirely, so the server
/// cannot confuse "no change" with "set to null".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<SessionStatus>,
}

impl SessionUpdate {
    /// Diff of changed fields between the stored session and the new value.
    pub fn diff(stored: &OrderSession, updated: &OrderSession) -> Self {
        Self {
            table_number: (stored.table_number != updated.table_number)
                .then_some(updated.table_number),
            status: (stored.status != updated.status).then_some(updated.status),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.table_number.is_none() && self.status.is_none()
    }
}

/// Kitchen-facing lifecycle status of an ordered product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderedProductStatus {
    Pending,
    Preparing,
    Done,
}

/// One unit of a product ordered within a session.
///
/// Created only by the customer-facing ordering flow, so new instances
/// always arrive over the WebSocket feed, never from this client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderedProduct {
    pub id: Uuid,
    pub product_id: Uuid,
    pub order_session_id: Uuid,
    pub status: OrderedProductStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(table_number: u32, status: SessionStatus) -> OrderSession {
        OrderSession {
            id: Uuid::new_v4(),
            table_number,
            status,
        }
    }

    #[test]
    fn test_diff_only_status_changed() {
        let stored = session(3, SessionStatus::Open);
        let mut updated = stored.clone();
        updated.status = SessionStatus::Closed;

        let update = SessionUpdate::diff(&stored, &updated);
        assert_eq!(update.table_number, None);
        assert_eq!(update.status, Some(SessionStatus::Closed));

        // Unchanged fields must not appear on the wire at all.
        let wire = serde_json::to_string(&update).unwrap();
        assert!(!wire.contains("tableNumber"));
        assert!(wire.contains("\"status\":\"closed\""));
    }

    #[test]
    fn test_diff_nothing_changed_is_empty() {
        let stored = session(7, SessionStatus::Open);
        let update = SessionUpdate::diff(&stored, &stored.clone());
        assert!(update.is_empty());
        assert_eq!(serde_json::to_string(&update).unwrap(), "{}");
    }

    #[test]
    fn test_status_wire_casing() {
        let json = serde_json::to_string(&SessionStatus::Paid).unwrap();
        assert_eq!(json, "\"paid\"");
        let json = serde_json::to_string(&OrderedProductStatus::Preparing).unwrap();
        assert_eq!(json, "\"preparing\"");
    }

    #[test]
    fn test_ordered_product_decoding() {
        let raw = r#"{
            "id": "a3bb189e-8bf9-3888-9912-ace4e6543002",
            "productId": "b3bb189e-8bf9-3888-9912-ace4e6543002",
            "orderSessionId": "c3bb189e-8bf9-3888-9912-ace4e6543002",
            "status": "pending"
        }"#;
        let product: OrderedProduct = serde_json::from_str(raw).unwrap();
        assert_eq!(product.status, OrderedProductStatus::Pending);
    }
}
