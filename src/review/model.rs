// SPDX-License-Identifier: MIT
//! Read-only leaf entities of the review model.
//!
//! Every entity is constructed once from a decoded wire fragment and never
//! mutated afterwards. Defaulting rules live in the wire layer
//! ([`super::wire`]); derivation rules (basename, extension tag) live here.

use chrono::NaiveDateTime;

use super::classify;
use super::wire::{
    CommentFrag, DecodeError, FileFrag, MessageFrag, ProfileFrag, RevisionFrag, VoteFrag,
};

// ─── Profile ──────────────────────────────────────────────────────────────────

/// An exported account profile.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub account_id: i64,
    pub registered_on: NaiveDateTime,
    /// Display name; empty when the export carries none.
    pub name: String,
}

impl Profile {
    /// Decode one profile record from a raw export tree.
    pub fn from_value(raw: &serde_json::Value) -> Result<Self, DecodeError> {
        let frag: ProfileFrag = super::wire::decode_record(raw, "profile")?;
        Ok(Self {
            account_id: frag.account_id,
            registered_on: frag.registered_on,
            name: frag.name,
        })
    }

    /// Whether this account looks like an automated actor for `project`.
    pub fn is_bot(&self, project: &str) -> bool {
        classify::is_bot(project, &self.name)
    }
}

// ─── File ─────────────────────────────────────────────────────────────────────

/// Status of a file within one revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Added,
    Modified,
    Deleted,
}

impl FileStatus {
    /// Map the wire's single-letter status. Absent or unrecognized letters
    /// are Modified.
    fn from_letter(letter: Option<&str>) -> Self {
        match letter {
            Some("A") => FileStatus::Added,
            Some("D") => FileStatus::Deleted,
            _ => FileStatus::Modified,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileStatus::Added => "A",
            FileStatus::Modified => "M",
            FileStatus::Deleted => "D",
        }
    }
}

/// One changed file of a revision.
#[derive(Debug, Clone, PartialEq)]
pub struct File {
    /// Repository-relative path (the key of the raw `files` map).
    pub path: String,
    /// Basename of `path`.
    pub name: String,
    pub status: FileStatus,
    pub lines_inserted: u64,
    pub lines_deleted: u64,
    pub size_delta: i64,
    pub size: i64,
    /// Lowercase extension tag, absent when the name has no `.`.
    pub kind: Option<String>,
}

impl File {
    pub fn new(path: String, frag: FileFrag) -> Self {
        let name = basename(&path).to_string();
        let kind = classify::file_extension(&name);
        Self {
            name,
            status: FileStatus::from_letter(frag.status.as_deref()),
            lines_inserted: frag.lines_inserted,
            lines_deleted: frag.lines_deleted,
            size_delta: frag.size_delta,
            size: frag.size,
            kind,
            path,
        }
    }

    /// Total changed lines; files with zero changed lines carry no signal
    /// for the subsystem/language metrics.
    pub fn changed_lines(&self) -> u64 {
        self.lines_inserted + self.lines_deleted
    }
}

fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or("")
}

// ─── Revision ─────────────────────────────────────────────────────────────────

/// One uploaded patch set of a change.
#[derive(Debug, Clone, PartialEq)]
pub struct Revision {
    /// Revision id string (the key of the raw `revisions` map).
    pub id: String,
    /// Patch-set ordinal; revisions of a change sort ascending by this.
    pub number: i64,
    pub created: NaiveDateTime,
    pub uploader: i64,
    pub commit_message: String,
    /// Files in raw-map iteration order — not guaranteed sorted.
    pub files: Vec<File>,
}

impl Revision {
    pub fn from_frag(id: String, frag: RevisionFrag) -> Self {
        let files = frag
            .files
            .into_iter()
            .map(|(path, file)| File::new(path, file))
            .collect();
        Self {
            id,
            number: frag.number,
            created: frag.created,
            uploader: frag.uploader.account_id,
            commit_message: frag.commit.subject,
            files,
        }
    }
}

// ─── Label ────────────────────────────────────────────────────────────────────

/// One voting entry attached to a change.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    /// Voting category name (the key of the raw `labels` map).
    pub kind: String,
    pub account_id: i64,
    pub value: Option<i64>,
    pub date: Option<NaiveDateTime>,
}

impl Label {
    pub fn new(kind: String, frag: VoteFrag) -> Self {
        Self {
            kind,
            account_id: frag.account_id,
            value: frag.value,
            date: frag.date,
        }
    }
}

// ─── Message ──────────────────────────────────────────────────────────────────

/// One change message (review comment thread starter, CI note, etc.).
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub revision_number: Option<i64>,
    pub message: String,
    pub date: NaiveDateTime,
    /// Posting account; the wire's `real_author` wins over `author` so
    /// on-behalf-of posts attribute to the actual poster.
    pub author: i64,
    /// Empty when the export carries no tag.
    pub tag: String,
}

impl Message {
    pub fn from_frag(frag: MessageFrag) -> Result<Self, DecodeError> {
        let author = frag
            .real_author
            .or(frag.author)
            .ok_or(DecodeError::MissingField("author"))?;
        Ok(Self {
            revision_number: frag.revision_number,
            message: frag.message,
            date: frag.date,
            author: author.account_id,
            tag: frag.tag,
        })
    }
}

// ─── Comment ──────────────────────────────────────────────────────────────────

/// One inline review comment from a per-change comment file.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub author: i64,
    pub patch_set: i64,
    pub id: String,
    pub line: i64,
    /// Id of the comment this replies to; empty for thread roots.
    pub in_reply_to: String,
    /// Raw timestamp string, echoed verbatim into the CSV.
    pub updated: String,
    pub message: String,
    pub unresolved: bool,
}

impl Comment {
    pub fn from_frag(frag: CommentFrag) -> Self {
        Self {
            author: frag.author.account_id,
            patch_set: frag.patch_set,
            id: frag.id,
            line: frag.line,
            in_reply_to: frag.in_reply_to,
            updated: frag.updated,
            message: frag.message,
            unresolved: frag.unresolved,
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
