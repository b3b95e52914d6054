//! Parser for storage-node log lines.
//!
//! A line has at least five tab-separated fields:
//!
//! ```text
//! 2023-01-02T03:04:05.123Z	INFO	piecestore	uploaded	{"Piece ID": "ABC", "Size": 2319872}
//! ```
//!
//! The second field (log level) is ignored. Parsing happens in two steps:
//! [`LogLine::parse`] reads just the timestamp, which the aggregator needs
//! for its period check, and [`LogLine::event`] validates the rest into a
//! typed [`Event`].

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;
use serde_json::Value;
use sn_common::PieceId;
use thiserror::Error;

/// Timestamp format of the first field.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// Minimum number of tab-separated fields.
pub const MIN_FIELDS: usize = 5;

/// Recognized module names.
pub mod module_names {
    pub const PIECESTORE: &str = "piecestore";
    pub const PIECEDELETER: &str = "piecedeleter";
}

/// Recognized event kinds.
pub mod kind_names {
    pub const UPLOAD_STARTED: &str = "upload started";
    pub const UPLOADED: &str = "uploaded";
    pub const UPLOAD_FAILED: &str = "upload failed";
    pub const UPLOAD_CANCELED: &str = "upload canceled";
    pub const DOWNLOAD_STARTED: &str = "download started";
    pub const DOWNLOADED: &str = "downloaded";
    pub const DOWNLOAD_FAILED: &str = "download failed";
    pub const DOWNLOAD_CANCELED: &str = "download canceled";
    pub const DELETED: &str = "deleted";
    pub const DELETE_FAILED: &str = "delete failed";
}

const PIECESTORE_KINDS: [&str; 8] = [
    kind_names::UPLOAD_STARTED,
    kind_names::UPLOADED,
    kind_names::UPLOAD_FAILED,
    kind_names::UPLOAD_CANCELED,
    kind_names::DOWNLOAD_STARTED,
    kind_names::DOWNLOADED,
    kind_names::DOWNLOAD_FAILED,
    kind_names::DOWNLOAD_CANCELED,
];

/// Payload keys.
pub mod field_names {
    pub const PIECE_ID: &str = "Piece ID";
    pub const SIZE: &str = "Size";
    pub const AVAILABLE_SPACE: &str = "Available Space";
}

/// Reasons a line cannot be turned into an event.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("expected at least {} tab-separated fields, found {found}", MIN_FIELDS)]
    TooFewFields { found: usize },

    #[error("bad timestamp {value:?}: {source}")]
    Timestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("bad payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("'{kind}' event without \"{field}\"")]
    MissingField {
        kind: &'static str,
        field: &'static str,
    },
}

impl From<ParseError> for sn_common::Error {
    fn from(err: ParseError) -> Self {
        sn_common::Error::MalformedLine(err.to_string())
    }
}

/// Module that emitted a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Module {
    PieceStore,
    PieceDeleter,
    Other(String),
}

impl Module {
    pub fn from_name(name: &str) -> Self {
        match name {
            module_names::PIECESTORE => Module::PieceStore,
            module_names::PIECEDELETER => Module::PieceDeleter,
            other => Module::Other(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Module::PieceStore => module_names::PIECESTORE,
            Module::PieceDeleter => module_names::PIECEDELETER,
            Module::Other(name) => name,
        }
    }
}

impl std::fmt::Display for Module {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Typed event, one variant per recognized kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    UploadStarted { piece_id: PieceId, available_space: i64 },
    Uploaded { piece_id: PieceId, size: Option<u64> },
    UploadFailed { piece_id: PieceId },
    UploadCanceled { piece_id: PieceId },
    DownloadStarted { piece_id: PieceId },
    Downloaded { piece_id: PieceId },
    DownloadFailed { piece_id: PieceId },
    DownloadCanceled { piece_id: PieceId },
    Deleted { piece_id: PieceId },
    DeleteFailed { piece_id: PieceId },
    /// Recognized module, unrecognized kind.
    Unexpected,
    /// Module this tool does not track.
    Ignored,
}

/// One parsed log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    pub timestamp: DateTime<Utc>,
    pub module: Module,
    pub kind: String,
    pub event: Event,
}

/// Payload fields this tool reads. Other keys are ignored.
#[derive(Debug, Default, Deserialize)]
struct Payload {
    #[serde(rename = "Piece ID", default)]
    piece_id: Option<String>,
    #[serde(rename = "Size", default)]
    size: Option<u64>,
    #[serde(rename = "Available Space", default)]
    available_space: Option<i64>,
}

impl Payload {
    fn parse(raw: &str) -> Result<Self, ParseError> {
        // Require an object; a bare array would otherwise fill the struct by position.
        let map: serde_json::Map<String, Value> = serde_json::from_str(raw)?;
        Ok(Payload::deserialize(Value::Object(map))?)
    }

    fn piece_id(&mut self, kind: &'static str) -> Result<PieceId, ParseError> {
        self.piece_id
            .take()
            .map(PieceId::from)
            .ok_or(ParseError::MissingField {
                kind,
                field: field_names::PIECE_ID,
            })
    }
}

/// A line whose timestamp has been parsed.
#[derive(Debug, Clone)]
pub struct LogLine<'a> {
    pub timestamp: DateTime<Utc>,
    fields: Vec<&'a str>,
}

impl<'a> LogLine<'a> {
    /// Split the line and parse its timestamp.
    pub fn parse(line: &'a str) -> Result<Self, ParseError> {
        let fields: Vec<&str> = line.split('\t').collect();
        let timestamp = parse_timestamp(fields[0])?;
        Ok(LogLine { timestamp, fields })
    }

    /// Validate the remaining fields into a typed event.
    pub fn event(&self) -> Result<LogEvent, ParseError> {
        if self.fields.len() < MIN_FIELDS {
            return Err(ParseError::TooFewFields {
                found: self.fields.len(),
            });
        }
        let module = Module::from_name(self.fields[2]);
        let kind = self.fields[3];
        let event = match module {
            Module::PieceStore => piecestore_event(kind, self.fields[4])?,
            Module::PieceDeleter => piecedeleter_event(kind, self.fields[4])?,
            Module::Other(_) => Event::Ignored,
        };
        Ok(LogEvent {
            timestamp: self.timestamp,
            module,
            kind: kind.to_string(),
            event,
        })
    }
}

/// Parse one line straight to an event.
pub fn parse_line(line: &str) -> Result<LogEvent, ParseError> {
    LogLine::parse(line)?.event()
}

/// Parse a `%Y-%m-%dT%H:%M:%S%.fZ` timestamp as UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, ParseError> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(|source| ParseError::Timestamp {
            value: value.to_string(),
            source,
        })
}

fn piecestore_event(kind: &str, raw: &str) -> Result<Event, ParseError> {
    use kind_names::*;

    let Some(kind) = PIECESTORE_KINDS.iter().copied().find(|k| *k == kind) else {
        return Ok(Event::Unexpected);
    };
    let mut payload = Payload::parse(raw)?;

    let piece_id = payload.piece_id(kind)?;
    let event = match kind {
        UPLOAD_STARTED => Event::UploadStarted {
            piece_id,
            available_space: payload
                .available_space
                .ok_or(ParseError::MissingField {
                    kind,
                    field: field_names::AVAILABLE_SPACE,
                })?,
        },
        UPLOADED => Event::Uploaded {
            piece_id,
            size: payload.size,
        },
        UPLOAD_FAILED => Event::UploadFailed { piece_id },
        UPLOAD_CANCELED => Event::UploadCanceled { piece_id },
        DOWNLOAD_STARTED => Event::DownloadStarted { piece_id },
        DOWNLOADED => Event::Downloaded { piece_id },
        DOWNLOAD_FAILED => Event::DownloadFailed { piece_id },
        _ => Event::DownloadCanceled { piece_id },
    };
    Ok(event)
}

fn piecedeleter_event(kind: &str, raw: &str) -> Result<Event, ParseError> {
    use kind_names::*;

    match kind {
        DELETED => Ok(Event::Deleted {
            piece_id: Payload::parse(raw)?.piece_id(DELETED)?,
        }),
        DELETE_FAILED => Ok(Event::DeleteFailed {
            piece_id: Payload::parse(raw)?.piece_id(DELETE_FAILED)?,
        }),
        _ => Ok(Event::Unexpected),
    }
}
