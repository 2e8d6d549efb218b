// Item entity

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

/// Status effects applied when the item is used, keyed by status name.
///
/// Backed by an insertion-ordered map: the order keys arrive in is the order
/// they are emitted.
pub type StatusMap = Map<String, Value>;

/// A single catalog record.
///
/// `name` and `label` default to empty strings when missing so that a
/// malformed record still loads; the emitter's validation pass decides what
/// happens to it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub weight: Option<NumericValue>,
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub degrade: Option<NumericValue>,
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub consume: Option<NumericValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<ClientData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerData>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<ItemButton>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anim: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prop: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub usetime: Option<NumericValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imageurl: Option<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub status: StatusMap,
}

/// A numeric attribute as it was stored.
///
/// Values that do not parse as numbers are kept verbatim so one bad record
/// cannot fail the whole collection; validation reports them at export.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NumericValue {
    Number(Number),
    Invalid(Value),
}

impl NumericValue {
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            NumericValue::Number(number) => Some(number),
            NumericValue::Invalid(_) => None,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, NumericValue::Invalid(_))
    }
}

impl From<Number> for NumericValue {
    fn from(number: Number) -> Self {
        NumericValue::Number(number)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemButton {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub action: String,
}

impl Item {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            ..Self::default()
        }
    }

    /// The uploaded image this item points at, if any.
    pub fn image_reference(&self) -> Option<&str> {
        self.client
            .as_ref()
            .and_then(|client| client.imageurl.as_deref())
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Trims text fields and drops blank optionals to `None`.
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.label = self.label.trim().to_string();
        if let Some(client) = self.client.take() {
            let client = client.normalized();
            self.client = if client.is_blank() { None } else { Some(client) };
        }
        if let Some(server) = self.server.take() {
            let export = normalize_text(server.export);
            self.server = export.map(|export| ServerData {
                export: Some(export),
            });
        }
        self.buttons = self
            .buttons
            .into_iter()
            .map(|button| ItemButton {
                label: button.label.trim().to_string(),
                group: button.group.trim().to_string(),
                action: button.action.trim().to_string(),
            })
            .filter(|button| !button.is_blank())
            .collect();
        self
    }
}

impl ClientData {
    fn normalized(self) -> Self {
        Self {
            anim: normalize_text(self.anim),
            prop: normalize_text(self.prop),
            usetime: self.usetime,
            notification: normalize_text(self.notification),
            image: normalize_text(self.image),
            imageurl: normalize_text(self.imageurl),
            status: self
                .status
                .into_iter()
                .map(|(key, value)| (key.trim().to_string(), value))
                .filter(|(key, _)| !key.is_empty())
                .collect(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.anim.is_none()
            && self.prop.is_none()
            && self.usetime.is_none()
            && self.notification.is_none()
            && self.image.is_none()
            && self.imageurl.is_none()
            && self.status.is_empty()
    }
}

impl ItemButton {
    pub fn is_blank(&self) -> bool {
        self.label.trim().is_empty() && self.group.trim().is_empty() && self.action.trim().is_empty()
    }
}

fn normalize_text(value: Option<String>) -> Option<String> {
    value.and_then(|raw| {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Accepts a JSON number, a numeric string, or a blank string / null.
///
/// Editors post form fields as text, so `"500"` and `500` must load the same.
/// Anything else is kept as [`NumericValue::Invalid`].
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<NumericValue>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::Number(number)) => Some(NumericValue::Number(number)),
        Some(Value::String(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                None
            } else {
                match serde_json::from_str::<Number>(trimmed) {
                    Ok(number) => Some(NumericValue::Number(number)),
                    Err(_) => Some(NumericValue::Invalid(Value::String(text))),
                }
            }
        }
        Some(other) => Some(NumericValue::Invalid(other)),
    })
}
