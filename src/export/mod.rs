// SPDX-License-Identifier: MIT
//! Flat-row export adapters around the review model.

pub mod comments;
pub mod csv;

pub use comments::{export_comments, ExportError, ExportStats};
