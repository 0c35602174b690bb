use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One entry from `GET /api/webhooks/topics`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    pub topic: String,
    #[serde(default)]
    pub count: u64,
}

/// Server-computed summary attached to an event for display.
///
/// Every field is optional: previews are generated lazily on the backend and
/// partially-filled objects are common. Unknown fields are kept in `extra`
/// so they still participate in deep filtering and raw display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Preview {
    pub title: Option<String>,
    pub thumbnail: Option<String>,
    pub currency_id: Option<String>,
    pub price: Option<f64>,
    pub status: Option<String>,
    pub winner: Option<String>,
    pub winner_price: Option<f64>,
    pub brand: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A received webhook event. The payload is arbitrary JSON; the fields the
/// dashboard cares about are lifted out and the rest lands in `extra` for
/// the raw-JSON view.
///
/// Older backend versions emitted the preview under `db_preview`; both
/// spellings are accepted and treated identically through [`Event::preview`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Event {
    pub resource: Option<String>,
    pub user_id: Option<i64>,
    pub topic: Option<String>,
    pub received_at: Option<DateTime<Utc>>,
    pub preview: Option<Preview>,
    /// Legacy spelling of `preview`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_preview: Option<Preview>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub limit: u64,
    pub offset: u64,
    pub total: u64,
}

/// Response shape of `GET /api/webhooks?topic=&limit=&offset=`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventsResponse {
    #[serde(default)]
    pub events: Vec<Event>,
    pub pagination: Option<Pagination>,
}

impl EventsResponse {
    /// The echoed pagination, or the request's own values with `total: 0`
    /// when the server omitted the object.
    pub fn pagination_or(&self, limit: u64, offset: u64) -> Pagination {
        self.pagination.unwrap_or(Pagination {
            limit,
            offset,
            total: 0,
        })
    }
}

impl Event {
    /// The preview under either wire spelling; `preview` wins if both appear.
    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref().or(self.db_preview.as_ref())
    }

    pub fn resource_display(&self) -> &str {
        self.resource.as_deref().unwrap_or("-")
    }

    pub fn user_display(&self) -> String {
        match self.user_id {
            Some(id) => id.to_string(),
            None => "-".to_string(),
        }
    }

    pub fn received_display(&self) -> String {
        match self.received_at {
            Some(ts) => ts.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => "-".to_string(),
        }
    }

    /// Whether a preview with a title exists (the "refresh" vs "generate"
    /// distinction in the action column).
    pub fn has_preview(&self) -> bool {
        self.preview().map(|p| p.title.is_some()).unwrap_or(false)
    }
}

impl Preview {
    /// `"ARS 12345"` style price line, or "-" when no price is known.
    pub fn price_display(&self) -> String {
        match self.price {
            Some(price) => format!(
                "{} {}",
                self.currency_id.as_deref().unwrap_or(""),
                trim_trailing_zeros(price)
            )
            .trim_start()
            .to_string(),
            None => "-".to_string(),
        }
    }

    /// `"winner (ARS 9999)"` annotation, when the competitive data is present.
    pub fn winner_display(&self) -> Option<String> {
        let winner = self.winner.as_deref()?;
        match self.winner_price {
            Some(price) => Some(format!(
                "{} ({} {})",
                winner,
                self.currency_id.as_deref().unwrap_or(""),
                trim_trailing_zeros(price)
            )),
            None => Some(winner.to_string()),
        }
    }
}

fn trim_trailing_zeros(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_parses_minimal_payload() {
        let event: Event = serde_json::from_str(r#"{"resource":"/items/MLA1"}"#).unwrap();
        assert_eq!(event.resource.as_deref(), Some("/items/MLA1"));
        assert!(event.preview.is_none());
        assert!(event.extra.is_empty());
    }

    #[test]
    fn event_accepts_db_preview_alias() {
        let event: Event =
            serde_json::from_str(r#"{"resource":"/items/MLA1","db_preview":{"title":"Gadget"}}"#)
                .unwrap();
        assert_eq!(
            event.preview().and_then(|p| p.title.as_deref()),
            Some("Gadget")
        );
        assert!(event.has_preview());
        // It was lifted into a typed field, not left in the extras.
        assert!(event.extra.is_empty());
    }

    #[test]
    fn event_keeps_unknown_fields_for_raw_view() {
        let event: Event =
            serde_json::from_str(r#"{"resource":"/items/MLA1","attempts":3,"sent":"2024-01-01"}"#)
                .unwrap();
        assert_eq!(event.extra.len(), 2);
        assert_eq!(event.extra["attempts"], serde_json::json!(3));
    }

    #[test]
    fn events_response_tolerates_missing_fields() {
        let response: EventsResponse = serde_json::from_str("{}").unwrap();
        assert!(response.events.is_empty());
        assert_eq!(
            response.pagination_or(100, 200),
            Pagination {
                limit: 100,
                offset: 200,
                total: 0
            }
        );
    }

    #[test]
    fn preview_price_display_variants() {
        let preview = Preview {
            currency_id: Some("ARS".to_string()),
            price: Some(1500.0),
            ..Default::default()
        };
        assert_eq!(preview.price_display(), "ARS 1500");

        let bare = Preview {
            price: Some(19.99),
            ..Default::default()
        };
        assert_eq!(bare.price_display(), "19.99");
        assert_eq!(Preview::default().price_display(), "-");
    }

    #[test]
    fn preview_winner_display() {
        let preview = Preview {
            currency_id: Some("ARS".to_string()),
            winner: Some("MLA123".to_string()),
            winner_price: Some(900.0),
            ..Default::default()
        };
        assert_eq!(preview.winner_display().unwrap(), "MLA123 (ARS 900)");
        assert!(Preview::default().winner_display().is_none());
    }
}
