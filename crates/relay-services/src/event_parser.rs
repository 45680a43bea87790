//! Storage notification parsing.
//!
//! Only `data.url` is required. The other envelope fields are kept for logging.

use relay_core::{AppError, BlobReference};
use serde::Deserialize;
use url::Url;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventEnvelope {
    id: Option<String>,
    event_type: Option<String>,
    subject: Option<String>,
    event_time: Option<String>,
    data: Option<EventData>,
}

#[derive(Debug, Deserialize)]
struct EventData {
    url: Option<String>,
}

/// A decoded notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEvent {
    pub reference: BlobReference,
    pub source_url: String,
    pub event_id: Option<String>,
    pub event_type: Option<String>,
    pub subject: Option<String>,
    pub event_time: Option<String>,
}

pub struct EventParser;

impl EventParser {
    /// Decode a raw notification body.
    ///
    /// Fails with `MalformedEvent` when the body is not a JSON object, has no
    /// `data.url`, or the URL does not name an object.
    pub fn parse(raw: &[u8]) -> Result<ParsedEvent, AppError> {
        let envelope: EventEnvelope = serde_json::from_slice(raw)?;

        let source_url = envelope
            .data
            .and_then(|d| d.url)
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| AppError::MalformedEvent("missing data.url".to_string()))?;

        let reference = Self::parse_blob_url(&source_url)?;

        Ok(ParsedEvent {
            reference,
            source_url,
            event_id: envelope.id,
            event_type: envelope.event_type,
            subject: envelope.subject,
            event_time: envelope.event_time,
        })
    }

    /// Split an object URL into account host, container and key.
    ///
    /// The container is the first path segment and the key the last one, so a
    /// path with a single segment names an object with the container's name.
    /// Query string and fragment are ignored; segments are percent-decoded.
    pub fn parse_blob_url(raw_url: &str) -> Result<BlobReference, AppError> {
        let url = Url::parse(raw_url.trim())
            .map_err(|e| AppError::MalformedEvent(format!("invalid data.url: {}", e)))?;

        let account_host = url
            .host_str()
            .filter(|h| !h.is_empty() && !h.starts_with('.'))
            .ok_or_else(|| AppError::MalformedEvent("data.url has no host".to_string()))?
            .to_string();

        let segments: Vec<&str> = url.path().split('/').collect();
        if segments.len() < 2 {
            return Err(AppError::MalformedEvent(
                "data.url path has no container".to_string(),
            ));
        }

        let container_name = Self::decode_segment(segments[1])?;
        if container_name.is_empty() {
            return Err(AppError::MalformedEvent(
                "data.url path has no container".to_string(),
            ));
        }
        let object_key = Self::decode_segment(segments[segments.len() - 1])?;
        if object_key.is_empty() {
            return Err(AppError::MalformedEvent(
                "data.url has no object name".to_string(),
            ));
        }

        Ok(BlobReference {
            account_host,
            container_name,
            object_key,
        })
    }

    fn decode_segment(segment: &str) -> Result<String, AppError> {
        urlencoding::decode(segment)
            .map(|s| s.into_owned())
            .map_err(|e| AppError::MalformedEvent(format!("invalid path encoding: {}", e)))
    }
}
