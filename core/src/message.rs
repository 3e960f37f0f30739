use serde::{Deserialize, Serialize};

use crate::error::DataError;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    Top,
    Bottom,
}

impl Placement {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(value) if value.eq_ignore_ascii_case("bottom") => Placement::Bottom,
            _ => Placement::Top,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontSize {
    Small,
    Large,
    Default,
}

impl FontSize {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(value) if value.eq_ignore_ascii_case("small") => FontSize::Small,
            Some(value) if value.eq_ignore_ascii_case("large") => FontSize::Large,
            _ => FontSize::Default,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum MessageBody {
    Text { text: String },
    Url { target: Option<String> },
}

impl MessageBody {
    pub fn kind(&self) -> &'static str {
        match self {
            MessageBody::Text { .. } => "text",
            MessageBody::Url { .. } => "url",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    pub position: Position,
    pub body: MessageBody,
    pub name: String,
    pub pfp_url: String,
    pub placement: Placement,
    pub font_size: FontSize,
}

#[derive(Clone, Debug, Default, Deserialize)]
struct RawContent {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
struct RawMessage {
    position: Position,
    msg_type: String,
    #[serde(default)]
    msg_content: RawContent,
    #[serde(default)]
    name: String,
    #[serde(default)]
    pfp_url: String,
    #[serde(default)]
    placement: Option<String>,
    #[serde(default)]
    font_size: Option<String>,
}

impl Message {
    fn from_raw(index: usize, raw: RawMessage) -> Result<Self, DataError> {
        if !raw.position.x.is_finite() || !raw.position.y.is_finite() {
            return Err(DataError::InvalidPosition { index });
        }
        let body = match raw.msg_type.trim() {
            "text" => {
                let text = raw
                    .msg_content
                    .text
                    .ok_or(DataError::MissingText { index })?;
                MessageBody::Text { text }
            }
            "url" => {
                let target = raw
                    .msg_content
                    .url
                    .map(|url| url.trim().trim_start_matches('#').to_string())
                    .filter(|url| !url.is_empty());
                MessageBody::Url { target }
            }
            other => {
                return Err(DataError::UnknownKind {
                    index,
                    kind: other.to_string(),
                })
            }
        };
        Ok(Self {
            position: raw.position,
            body,
            name: raw.name,
            pfp_url: raw.pfp_url,
            placement: Placement::parse(raw.placement.as_deref()),
            font_size: FontSize::parse(raw.font_size.as_deref()),
        })
    }

    pub fn attribution(&self) -> String {
        format!("- {}", self.name)
    }
}

pub fn decode_messages(json: &str) -> Result<Vec<Message>, DataError> {
    let raw: Vec<RawMessage> = serde_json::from_str(json)?;
    raw.into_iter()
        .enumerate()
        .map(|(index, raw)| Message::from_raw(index, raw))
        .collect()
}
