//! Wire types for the mahasiswa API.
//!
//! # Design
//! These types are defined independently from the mock-server crate;
//! integration tests catch schema drift between the two. Each typed record
//! separates the fields the client relies on from a flattened `extra` bag,
//! so attributes the backend adds later survive a read-modify-write cycle
//! instead of being silently dropped.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A record as an untyped JSON object.
pub type Record = Map<String, Value>;

/// Unique key of a record (a student's NPM).
///
/// The backend may send the key as a JSON string or a JSON integer; the
/// original representation is kept so it is sent back the same way.
/// Equality and hashing compare the rendered text, so `"123"` and `123`
/// denote the same record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordKey {
    Number(i64),
    Text(String),
}

impl RecordKey {
    /// Text used as the path segment for per-record endpoints.
    pub fn as_segment(&self) -> String {
        self.to_string()
    }

    pub fn is_empty(&self) -> bool {
        match self {
            RecordKey::Number(_) => false,
            RecordKey::Text(text) => text.trim().is_empty(),
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKey::Number(n) => write!(f, "{n}"),
            RecordKey::Text(text) => f.write_str(text),
        }
    }
}

impl PartialEq for RecordKey {
    fn eq(&self, other: &Self) -> bool {
        self.as_segment() == other.as_segment()
    }
}

impl Eq for RecordKey {}

impl Hash for RecordKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_segment().hash(state);
    }
}

impl From<&str> for RecordKey {
    fn from(value: &str) -> Self {
        RecordKey::Text(value.to_string())
    }
}

impl From<String> for RecordKey {
    fn from(value: String) -> Self {
        RecordKey::Text(value)
    }
}

impl From<&RecordKey> for RecordKey {
    fn from(value: &RecordKey) -> Self {
        value.clone()
    }
}

impl From<i64> for RecordKey {
    fn from(value: i64) -> Self {
        RecordKey::Number(value)
    }
}

/// Postal address of a student. Every part is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Alamat {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jalan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kelurahan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kota: Option<String>,
}

/// A student record.
///
/// Used both as the decoded payload and as the request body for create and
/// update. On update the backend keys the record by the URL path, not by
/// `npm` in the body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mahasiswa {
    pub npm: RecordKey,
    pub nama: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prodi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alamat: Option<Alamat>,
    /// Any attribute not modelled above, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Mahasiswa {
    pub fn new(npm: impl Into<RecordKey>, nama: impl Into<String>) -> Self {
        Self {
            npm: npm.into(),
            nama: nama.into(),
            prodi: None,
            alamat: None,
            extra: Map::new(),
        }
    }

    pub fn with_prodi(mut self, prodi: impl Into<String>) -> Self {
        self.prodi = Some(prodi.into());
        self
    }

    pub fn with_alamat(mut self, alamat: Alamat) -> Self {
        self.alamat = Some(alamat);
        self
    }
}

/// Response wrapper sent by the backend.
///
/// `data` is the payload (absent on most write responses and on errors),
/// `message` is human-readable text meant for the end user. Other envelope
/// attributes (`status`, `inserted_id`, `npm`) land in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl<T> Default for Envelope<T> {
    fn default() -> Self {
        Self {
            data: None,
            message: None,
            extra: Map::new(),
        }
    }
}
