// SPDX-License-Identifier: MIT
//! The central change aggregate.
//!
//! A [`Change`] owns the raw export tree of one review request plus memoized
//! derived views over it. Construction decodes the required header fields
//! fail-fast; each view decodes its slice of the tree on first access and is
//! cached for the lifetime of the object. The raw tree is never mutated, so
//! every cache is a deterministic function of it.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDateTime;
use once_cell::unsync::OnceCell;
use serde_json::Value;

use super::classify;
use super::model::{File, Label, Message, Revision};
use super::wire::{
    decode_field, decode_field_opt, decode_record, ChangeHeader, DecodeError, LabelKindFrag,
    MessageFrag, ReviewersFrag, RevisionFrag,
};

/// One code-review request, with five memoized derived views.
///
/// The caches are `once_cell::unsync` holders; the model is single-threaded,
/// so no locking is involved. A decode failure inside a view propagates to
/// the caller and leaves that cache unpopulated, so a later access retries.
#[derive(Debug)]
pub struct Change {
    raw: Value,

    pub project: String,
    pub change_number: i64,
    pub id: String,
    pub status: String,
    pub subject: String,
    pub created: NaiveDateTime,
    pub updated: NaiveDateTime,
    /// Owning account id.
    pub owner: i64,

    mergeable: bool,
    work_in_progress: bool,

    revisions: OnceCell<Vec<Revision>>,
    labels: OnceCell<Vec<Label>>,
    reviewers: OnceCell<Vec<i64>>,
    messages: OnceCell<Vec<Message>>,
}

impl Change {
    /// Decode the required header fields of one change export and take
    /// ownership of the raw tree. Fails fast with the missing field named.
    pub fn from_value(raw: Value) -> Result<Self, DecodeError> {
        let header: ChangeHeader = decode_record(&raw, "change")?;
        Ok(Self {
            raw,
            project: header.project,
            change_number: header.number,
            id: header.id,
            status: header.status,
            subject: header.subject,
            created: header.created,
            updated: header.updated,
            owner: header.owner.account_id,
            mergeable: header.mergeable,
            work_in_progress: header.work_in_progress,
            revisions: OnceCell::new(),
            labels: OnceCell::new(),
            reviewers: OnceCell::new(),
            messages: OnceCell::new(),
        })
    }

    /// Parse and decode one change export from JSON text.
    pub fn from_json_str(raw: &str) -> Result<Self, DecodeError> {
        let value: Value = serde_json::from_str(raw)?;
        Self::from_value(value)
    }

    // ─── Memoized derived views ───────────────────────────────────────────────

    /// All revisions, sorted ascending by patch-set number.
    ///
    /// The sort is stable, so the result is deterministic regardless of the
    /// raw map's iteration order.
    pub fn revisions(&self) -> Result<&[Revision], DecodeError> {
        let revisions = self.revisions.get_or_try_init(|| {
            let frags: BTreeMap<String, RevisionFrag> = decode_field(&self.raw, "revisions")?;
            let mut revisions: Vec<Revision> = frags
                .into_iter()
                .map(|(id, frag)| Revision::from_frag(id, frag))
                .collect();
            revisions.sort_by_key(|revision| revision.number);
            Ok::<Vec<Revision>, DecodeError>(revisions)
        })?;
        Ok(revisions)
    }

    /// The revision with the smallest patch-set number, or `None` when the
    /// change has no revisions. Always `revisions()[0]` when non-empty.
    pub fn first_revision(&self) -> Result<Option<&Revision>, DecodeError> {
        Ok(self.revisions()?.first())
    }

    /// All meaningful votes, flattened across label kinds and sorted
    /// ascending by date (stable: undated votes first, ties keep input
    /// order). Votes with value 0 or no value carry no signal and are
    /// dropped; kinds without an `all` list contribute nothing.
    pub fn labels(&self) -> Result<&[Label], DecodeError> {
        let labels = self.labels.get_or_try_init(|| {
            let kinds: BTreeMap<String, LabelKindFrag> = decode_field(&self.raw, "labels")?;
            let mut labels = Vec::new();
            for (kind, frag) in kinds {
                let Some(votes) = frag.all else { continue };
                for vote in votes {
                    let label = Label::new(kind.clone(), vote);
                    if matches!(label.value, Some(value) if value != 0) {
                        labels.push(label);
                    }
                }
            }
            labels.sort_by_key(|label| label.date);
            Ok::<Vec<Label>, DecodeError>(labels)
        })?;
        Ok(labels)
    }

    /// Account ids under the REVIEWER role; empty when the export carries no
    /// reviewer section. No deduplication beyond the source list's own.
    pub fn reviewers(&self) -> Result<&[i64], DecodeError> {
        let reviewers = self.reviewers.get_or_try_init(|| {
            let frag: Option<ReviewersFrag> = decode_field_opt(&self.raw, "reviewers")?;
            Ok::<Vec<i64>, DecodeError>(
                frag.unwrap_or_default()
                    .reviewer
                    .into_iter()
                    .map(|account| account.account_id)
                    .collect::<Vec<i64>>(),
            )
        })?;
        Ok(reviewers)
    }

    /// All change messages, sorted ascending by date (stable).
    pub fn messages(&self) -> Result<&[Message], DecodeError> {
        let messages = self.messages.get_or_try_init(|| {
            let frags: Vec<MessageFrag> = decode_field(&self.raw, "messages")?;
            let mut messages = frags
                .into_iter()
                .map(Message::from_frag)
                .collect::<Result<Vec<Message>, DecodeError>>()?;
            messages.sort_by_key(|message| message.date);
            Ok::<Vec<Message>, DecodeError>(messages)
        })?;
        Ok(messages)
    }

    // ─── Pure derived properties ──────────────────────────────────────────────

    /// The file list of the first revision; empty when there is none.
    pub fn files(&self) -> Result<&[File], DecodeError> {
        Ok(self
            .first_revision()?
            .map_or(&[][..], |revision| revision.files.as_slice()))
    }

    /// Subsystems touched by files with nonzero changed lines. Files that
    /// classify to an empty subsystem (repository root) are excluded.
    pub fn subsystems(&self) -> Result<BTreeSet<&str>, DecodeError> {
        let mut subsystems = BTreeSet::new();
        for file in self.changed_files()? {
            let subsystem = classify::subsystem_of(&file.path);
            if !subsystem.is_empty() {
                subsystems.insert(subsystem);
            }
        }
        Ok(subsystems)
    }

    /// Directories touched by files with nonzero changed lines.
    pub fn directories(&self) -> Result<BTreeSet<&str>, DecodeError> {
        let mut directories = BTreeSet::new();
        for file in self.changed_files()? {
            directories.insert(classify::directory_of(&file.path));
        }
        Ok(directories)
    }

    /// Count of distinct raw extension tags among files with nonzero changed
    /// lines; extensionless files are excluded.
    pub fn file_type_num(&self) -> Result<usize, DecodeError> {
        let mut extensions = BTreeSet::new();
        for file in self.changed_files()? {
            if let Some(kind) = file.kind.as_deref() {
                extensions.insert(kind);
            }
        }
        Ok(extensions.len())
    }

    /// Count of distinct canonical language tags among files with nonzero
    /// changed lines. Alias groups (C family, JS family, shell family)
    /// collapse to one tag each; unrecognized extensions count nothing.
    pub fn language_num(&self) -> Result<usize, DecodeError> {
        let mut languages = BTreeSet::new();
        for file in self.changed_files()? {
            if let Some(language) = file.kind.as_deref().and_then(classify::canonical_language) {
                languages.insert(language);
            }
        }
        Ok(languages.len())
    }

    /// A change is real when its first revision exists and touches at least
    /// one file.
    pub fn is_real_change(&self) -> Result<bool, DecodeError> {
        Ok(self
            .first_revision()?
            .is_some_and(|revision| !revision.files.is_empty()))
    }

    pub fn is_work_in_progress(&self) -> bool {
        self.work_in_progress
    }

    pub fn is_mergeable(&self) -> bool {
        self.mergeable
    }

    fn changed_files(&self) -> Result<impl Iterator<Item = &File>, DecodeError> {
        Ok(self
            .files()?
            .iter()
            .filter(|file| file.changed_lines() > 0))
    }
}
