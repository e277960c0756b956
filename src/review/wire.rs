// SPDX-License-Identifier: MIT
//! Wire-format fragments of the Gerrit "detailed change" export.
//!
//! Each fragment mirrors one JSON object shape from the export snapshot.
//! Required fields fail the decode with a [`DecodeError`] naming the field;
//! optional fields carry their documented default (`#[serde(default)]`).
//! Unknown keys are ignored. The fragments are an intermediate decoding step
//! only — the read-only entities in [`super::model`] are built from them.

use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// Fixed timestamp layout used by export snapshots,
/// e.g. `2019-04-01 10:21:03.000000000`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

// ─── Errors ───────────────────────────────────────────────────────────────────

/// Malformed-input failure raised while decoding a raw export tree.
///
/// A record that fails to decode is unusable as a whole; the caller decides
/// whether to skip the record or abort the run.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// A required field is absent from the raw tree.
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    /// A field is present but its value does not decode.
    #[error("invalid value for field `{field}`: {source}")]
    InvalidField {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A whole record does not match the expected shape.
    #[error("malformed {kind} record: {source}")]
    Record {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The input is not valid JSON at all.
    #[error("invalid JSON: {0}")]
    Syntax(#[from] serde_json::Error),
}

/// Decode a required top-level field of `raw` into a typed fragment.
pub(crate) fn decode_field<T: DeserializeOwned>(
    raw: &Value,
    field: &'static str,
) -> Result<T, DecodeError> {
    let value = raw.get(field).ok_or(DecodeError::MissingField(field))?;
    T::deserialize(value).map_err(|source| DecodeError::InvalidField { field, source })
}

/// Decode an optional top-level field of `raw`; `Ok(None)` when absent.
pub(crate) fn decode_field_opt<T: DeserializeOwned>(
    raw: &Value,
    field: &'static str,
) -> Result<Option<T>, DecodeError> {
    match raw.get(field) {
        None => Ok(None),
        Some(value) => T::deserialize(value)
            .map(Some)
            .map_err(|source| DecodeError::InvalidField { field, source }),
    }
}

/// Decode an entire raw tree as one record of the given kind.
pub(crate) fn decode_record<T: DeserializeOwned>(
    raw: &Value,
    kind: &'static str,
) -> Result<T, DecodeError> {
    T::deserialize(raw).map_err(|source| DecodeError::Record { kind, source })
}

// ─── Timestamp decoding ───────────────────────────────────────────────────────

pub(crate) fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
}

fn de_timestamp<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

fn de_timestamp_opt<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    raw.as_deref()
        .map(parse_timestamp)
        .transpose()
        .map_err(serde::de::Error::custom)
}

// ─── Fragments ────────────────────────────────────────────────────────────────

/// A nested account object; only the numeric id is carried.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct AccountRef {
    #[serde(rename = "_account_id")]
    pub account_id: i64,
}

/// The required construction-time fields of a change record.
#[derive(Debug, Deserialize)]
pub struct ChangeHeader {
    pub project: String,
    #[serde(rename = "_number")]
    pub number: i64,
    pub id: String,
    pub status: String,
    pub subject: String,
    #[serde(deserialize_with = "de_timestamp")]
    pub created: NaiveDateTime,
    #[serde(deserialize_with = "de_timestamp")]
    pub updated: NaiveDateTime,
    pub owner: AccountRef,
    pub mergeable: bool,
    #[serde(default)]
    pub work_in_progress: bool,
}

/// The `commit` sub-object of a revision.
#[derive(Debug, Deserialize)]
pub struct CommitFrag {
    pub subject: String,
}

/// One entry of a revision's `files` map (the path is the map key).
#[derive(Debug, Clone, Deserialize)]
pub struct FileFrag {
    /// Single-letter status: "A" added, "D" deleted, "M" (or absent) modified.
    pub status: Option<String>,
    #[serde(default)]
    pub lines_inserted: u64,
    #[serde(default)]
    pub lines_deleted: u64,
    pub size_delta: i64,
    pub size: i64,
}

/// One entry of the `revisions` map (the revision id is the map key).
#[derive(Debug, Deserialize)]
pub struct RevisionFrag {
    #[serde(rename = "_number")]
    pub number: i64,
    #[serde(deserialize_with = "de_timestamp")]
    pub created: NaiveDateTime,
    pub uploader: AccountRef,
    pub files: BTreeMap<String, FileFrag>,
    pub commit: CommitFrag,
}

/// One vote inside a label kind's `all` list.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct VoteFrag {
    #[serde(rename = "_account_id")]
    pub account_id: i64,
    pub value: Option<i64>,
    #[serde(default, deserialize_with = "de_timestamp_opt")]
    pub date: Option<NaiveDateTime>,
}

/// One entry of the `labels` map (the kind is the map key). Kinds without an
/// `all` list carry no votes.
#[derive(Debug, Deserialize)]
pub struct LabelKindFrag {
    pub all: Option<Vec<VoteFrag>>,
}

/// The `reviewers` sub-object; only the REVIEWER role is consumed.
#[derive(Debug, Default, Deserialize)]
pub struct ReviewersFrag {
    #[serde(default, rename = "REVIEWER")]
    pub reviewer: Vec<AccountRef>,
}

/// One entry of the `messages` list.
#[derive(Debug, Deserialize)]
pub struct MessageFrag {
    #[serde(rename = "_revision_number")]
    pub revision_number: Option<i64>,
    pub message: String,
    #[serde(deserialize_with = "de_timestamp")]
    pub date: NaiveDateTime,
    /// On-behalf-of poster; preferred over `author` when both are present.
    pub real_author: Option<AccountRef>,
    pub author: Option<AccountRef>,
    #[serde(default)]
    pub tag: String,
}

/// One entry of a per-change comment file (keyed by an arbitrary name).
#[derive(Debug, Deserialize)]
pub struct CommentFrag {
    pub author: AccountRef,
    pub patch_set: i64,
    pub id: String,
    pub line: i64,
    #[serde(default)]
    pub in_reply_to: String,
    /// Carried verbatim — the CSV output echoes it byte-for-byte.
    pub updated: String,
    pub message: String,
    pub unresolved: bool,
}

/// An exported account profile record.
#[derive(Debug, Deserialize)]
pub struct ProfileFrag {
    #[serde(rename = "_account_id")]
    pub account_id: i64,
    #[serde(deserialize_with = "de_timestamp")]
    pub registered_on: NaiveDateTime,
    #[serde(default)]
    pub name: String,
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn timestamp_parses_nanosecond_and_bare_forms() {
        assert!(parse_timestamp("2019-04-01 10:21:03.000000000").is_ok());
        assert!(parse_timestamp("2019-04-01 10:21:03.775000000").is_ok());
        assert!(parse_timestamp("2019-04-01 10:21:03").is_ok());
        assert!(parse_timestamp("01/04/2019").is_err());
    }

    #[test]
    fn decode_field_names_missing_field() {
        let raw = json!({"present": 1});
        let err = decode_field::<i64>(&raw, "absent").unwrap_err();
        assert!(matches!(err, DecodeError::MissingField("absent")));
    }

    #[test]
    fn decode_field_opt_absent_is_none() {
        let raw = json!({});
        let got: Option<i64> = decode_field_opt(&raw, "nope").unwrap();
        assert_eq!(got, None);
    }

    #[test]
    fn change_header_requires_project() {
        let raw = json!({
            "_number": 7, "id": "x", "status": "NEW", "subject": "s",
            "created": "2019-04-01 10:21:03.000000000",
            "updated": "2019-04-01 10:21:03.000000000",
            "owner": {"_account_id": 1}, "mergeable": true
        });
        let err = decode_record::<ChangeHeader>(&raw, "change").unwrap_err();
        assert!(err.to_string().contains("project"), "got: {err}");
    }

    #[test]
    fn message_frag_defaults_tag_to_empty() {
        let raw = json!({
            "message": "LGTM",
            "date": "2019-04-01 10:21:03.000000000",
            "author": {"_account_id": 4}
        });
        let frag: MessageFrag = serde_json::from_value(raw).unwrap();
        assert_eq!(frag.tag, "");
        assert!(frag.real_author.is_none());
        assert_eq!(frag.revision_number, None);
    }
}
