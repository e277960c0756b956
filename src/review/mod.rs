// SPDX-License-Identifier: MIT
//! Normalized review model over raw Gerrit-style export trees.
//!
//! Provides:
//! - Wire decoding: typed partial records of the export shape with
//!   documented per-field defaults and fail-fast decode errors
//! - Leaf entities: read-only Profile, File, Label, Message, Comment,
//!   Revision records
//! - Change aggregate: memoized derived views (revisions, labels,
//!   reviewers, messages, first revision) plus pure derived metrics
//! - Classification: path subsystem/directory tags, canonical language
//!   taxonomy, bot-account detection

pub mod change;
pub mod classify;
pub mod model;
pub mod wire;

pub use change::Change;
pub use model::{Comment, File, FileStatus, Label, Message, Profile, Revision};
pub use wire::DecodeError;
