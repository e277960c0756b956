// SPDX-License-Identifier: MIT
//! revex — Gerrit review-export miner.
//!
//! Ingests exported code-review records (nested JSON, one object per change)
//! and derives a normalized, queryable model of changes, revisions, files,
//! labels, reviewers, messages, and comments. Derived views are computed
//! lazily and cached per change instance; the comment exporter flattens a
//! directory of per-change comment files into one CSV.

pub mod export;
pub mod review;

pub use export::{export_comments, ExportError, ExportStats};
pub use review::{Change, Comment, DecodeError, File, FileStatus, Label, Message, Profile, Revision};
