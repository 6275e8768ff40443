use crate::decoder::de_u64;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Balance of one coin type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinBalance {
    pub coin_type: String,
    #[serde(default)]
    pub coin_object_count: u64,
    /// Raw units as a decimal string.
    pub total_balance: String,
}

/// Metadata published by a coin's module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinMetadata {
    pub decimals: u8,
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon_url: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}

/// Position of an event, used as a pagination cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventId {
    pub tx_digest: String,
    pub event_seq: String,
}

/// A Move event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiEvent {
    pub id: EventId,
    #[serde(default)]
    pub package_id: String,
    #[serde(default)]
    pub transaction_module: String,
    #[serde(default)]
    pub sender: String,
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub parsed_json: Value,
    #[serde(default)]
    pub timestamp_ms: Option<String>,
}

/// One page of events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPage {
    pub data: Vec<SuiEvent>,
    #[serde(default)]
    pub next_cursor: Option<EventId>,
    #[serde(default)]
    pub has_next_page: bool,
}

/// Parsed Move content of an object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveContent {
    pub data_type: String,
    #[serde(rename = "type", default)]
    pub object_type: Option<String>,
    #[serde(default)]
    pub fields: Value,
}

/// Object data returned with `showContent`/`showType`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectData {
    pub object_id: String,
    /// Sequence number; the node sends it as a string.
    #[serde(default, deserialize_with = "de_u64")]
    pub version: u64,
    #[serde(default)]
    pub digest: String,
    #[serde(rename = "type", default)]
    pub object_type: Option<String>,
    #[serde(default)]
    pub content: Option<MoveContent>,
}

impl ObjectData {
    /// Object type, from the top level or the content.
    pub fn type_string(&self) -> Option<&str> {
        self.object_type
            .as_deref()
            .or_else(|| self.content.as_ref().and_then(|c| c.object_type.as_deref()))
    }

    /// Move fields, `Null` when content was not requested.
    pub fn fields(&self) -> &Value {
        static NULL: Value = Value::Null;
        self.content.as_ref().map(|c| &c.fields).unwrap_or(&NULL)
    }
}

/// Object lookup result: data or an error description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectResponse {
    #[serde(default)]
    pub data: Option<ObjectData>,
    #[serde(default)]
    pub error: Option<Value>,
}

/// One page of owned objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectPage {
    pub data: Vec<ObjectResponse>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_next_page: bool,
}
