/// Path and account classification — pure functions, no I/O, no allocation
/// beyond the lowercased extension tag.
///
/// A changed file's path yields two coarse ownership tags: the *subsystem*
/// (first real directory component) and the *directory* (dirname). Its
/// extension yields a raw type tag and, when recognized, a *canonical
/// language* tag that collapses near-synonymous extensions into one
/// identifier (all C-family headers and sources count as "c", etc.).

// ─── Taxonomy tables ──────────────────────────────────────────────────────────

/// Extensions that count toward the distinct-language metric. Anything not in
/// this list has no canonical language.
const RECOGNIZED_LANGUAGES: &[&str] = &[
    "java", "c", "h", "cxx", "hxx", "cpp", "hpp", "rb", "py", "javascript", "bash", "sh", "go",
    "html", "php", "js",
];

/// Whitespace-delimited words that mark an account name as an automated actor.
const BOT_KEYWORDS: &[&str] = &["bot", "chatbot", "ci", "jenkins"];

// ─── Path classification ──────────────────────────────────────────────────────

/// The subsystem a file path belongs to: its first real directory component.
///
/// A path with no `/` lives at the repository root and has no subsystem
/// (empty result). A leading `/` is skipped, so `/a/b` and `a/b` both name
/// subsystem `a`.
pub fn subsystem_of(path: &str) -> &str {
    let mut segments = path.split('/');
    let first = segments.next().unwrap_or("");
    match segments.next() {
        None => "",
        Some(second) if first.is_empty() => second,
        Some(_) => first,
    }
}

/// Everything before the final `/` — standard dirname semantics.
///
/// `directory_of("a/b/c")` is `"a/b"`, `directory_of("c")` is `""`, and a
/// file directly under the root keeps the root: `directory_of("/c")` is `"/"`.
pub fn directory_of(path: &str) -> &str {
    match path.rfind('/') {
        None => "",
        Some(idx) => {
            let head = &path[..idx + 1];
            let trimmed = head.trim_end_matches('/');
            if trimmed.is_empty() {
                head
            } else {
                trimmed
            }
        }
    }
}

/// The lowercase extension tag of a file name: the last `.`-separated
/// segment, or `None` when the name contains no `.` at all.
pub fn file_extension(name: &str) -> Option<String> {
    let mut segments = name.split('.');
    segments.next()?;
    segments.next_back().map(str::to_lowercase)
}

/// Map a raw extension tag to its canonical language tag.
///
/// The three alias groups collapse first; every other recognized extension is
/// its own canonical tag; unrecognized extensions have none.
pub fn canonical_language(extension: &str) -> Option<&'static str> {
    match extension {
        "c" | "h" | "cxx" | "hxx" | "cpp" | "hpp" => Some("c"),
        "javascript" | "js" => Some("js"),
        "bash" | "sh" => Some("bash"),
        other => RECOGNIZED_LANGUAGES.iter().find(|&&e| e == other).copied(),
    }
}

// ─── Account classification ───────────────────────────────────────────────────

/// Whether an account name looks like an automated actor for `project`.
///
/// Case-insensitive. True when the project name occurs anywhere in the
/// account name, when the name is the literal "do not use" placeholder, or
/// when any whitespace-delimited word of the name is a known bot keyword.
/// Hyphenated compounds like "my-ci-run" are a single word and do not match.
pub fn is_bot(project: &str, name: &str) -> bool {
    let project = project.to_lowercase();
    let name = name.to_lowercase();

    if name.contains(&project) || name == "do not use" {
        return true;
    }

    name.split_whitespace()
        .any(|word| BOT_KEYWORDS.contains(&word))
}

// ─── Tests ────────────────────────────────────────────────────────────────────
