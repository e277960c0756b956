// SPDX-License-Identifier: MIT
//! Comment batch export — flatten a directory of per-change comment files
//! into one `comments.csv`.
//!
//! Each source file is named `<prefix>_<change_id>.<ext>` and holds a JSON
//! map from arbitrary keys to comment fragments. Row order follows the
//! directory's file iteration order and the fragment map's key order;
//! callers must not depend on it.

use std::collections::BTreeMap;
use std::fs;
use std::io::BufWriter;
use std::path::Path;

use tracing::{debug, info};

use super::csv::CsvWriter;
use crate::review::model::Comment;
use crate::review::wire::CommentFrag;

/// Column layout of `comments.csv`.
const HEADER: [&str; 10] = [
    "change_id",
    "filename",
    "author",
    "patch_set",
    "id",
    "line",
    "in_reply_to",
    "updated",
    "message",
    "unresolved",
];

/// What the export produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportStats {
    /// Comment files read.
    pub files: usize,
    /// Data rows written (excludes the header).
    pub rows: usize,
}

/// Failure modes of the batch export. Malformed input aborts the run; a
/// record that fails to parse must not produce a partial row.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot derive a change id from filename `{0}`")]
    InvalidFilename(String),

    #[error("malformed comment file `{file}`: {source}")]
    Json {
        file: String,
        #[source]
        source: serde_json::Error,
    },
}

/// The change id encoded in a comment filename: the second `_`-delimited
/// token of the portion before the first `.` (`comments_12345.json` →
/// `12345`).
fn change_id_from_filename(filename: &str) -> Option<&str> {
    filename.split('.').next()?.split('_').nth(1)
}

/// Export every comment file under `source` into
/// `<destination>/comments.csv`.
///
/// Subdirectories are skipped. The writer is flushed before returning, on
/// the success path; on error the partially-written file is left behind and
/// the error names the offending input.
pub fn export_comments(source: &Path, destination: &Path) -> Result<ExportStats, ExportError> {
    let out_path = destination.join("comments.csv");
    let mut writer = CsvWriter::new(BufWriter::new(fs::File::create(&out_path)?));
    writer.write_record(HEADER)?;

    let mut stats = ExportStats::default();
    for entry in fs::read_dir(source)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let filename = entry.file_name().to_string_lossy().into_owned();
        let change_id = change_id_from_filename(&filename)
            .ok_or_else(|| ExportError::InvalidFilename(filename.clone()))?
            .to_string();

        let content = fs::read_to_string(entry.path())?;
        let fragments: BTreeMap<String, CommentFrag> =
            serde_json::from_str(&content).map_err(|source| ExportError::Json {
                file: filename.clone(),
                source,
            })?;
        debug!(file = %filename, comments = fragments.len(), "exporting comment file");

        for fragment in fragments.into_values() {
            let comment = Comment::from_frag(fragment);
            let row = [
                change_id.clone(),
                filename.clone(),
                comment.author.to_string(),
                comment.patch_set.to_string(),
                comment.id,
                comment.line.to_string(),
                comment.in_reply_to,
                comment.updated,
                comment.message,
                comment.unresolved.to_string(),
            ];
            writer.write_record(row.iter().map(String::as_str))?;
            stats.rows += 1;
        }
        stats.files += 1;
    }

    writer.finish()?;
    info!(
        files = stats.files,
        rows = stats.rows,
        output = %out_path.display(),
        "comment export complete"
    );
    Ok(stats)
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_id_is_second_underscore_token() {
        assert_eq!(change_id_from_filename("comments_12345.json"), Some("12345"));
        assert_eq!(change_id_from_filename("c_77_extra.json"), Some("77"));
    }

    #[test]
    fn change_id_missing_token_is_none() {
        assert_eq!(change_id_from_filename("comments.json"), None);
        assert_eq!(change_id_from_filename("12345.json"), None);
    }

    #[test]
    fn change_id_ignores_dots_after_the_first() {
        assert_eq!(change_id_from_filename("c_9.backup.json"), Some("9"));
    }
}
