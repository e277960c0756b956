use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use revex::review::Change;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "revex",
    about = "Gerrit review-export miner — normalized change model and comment CSV export",
    version
)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "REVEX_LOG", default_value = "info", global = true)]
    log: String,
}

#[derive(Subcommand)]
enum Command {
    /// Decode one change export and print its derived summary.
    ///
    /// Examples:
    ///   revex inspect change_52515.json
    Inspect {
        /// Path to a change JSON export file
        file: PathBuf,
    },
    /// Flatten a directory of per-change comment files into comments.csv.
    ///
    /// Source files are named `<prefix>_<change_id>.<ext>` and hold a JSON
    /// map of comment fragments.
    ///
    /// Examples:
    ///   revex comments --source exports/comments --destination out/
    Comments {
        /// Directory containing the per-change comment files
        #[arg(long)]
        source: PathBuf,
        /// Directory that receives comments.csv
        #[arg(long)]
        destination: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(args.log.as_str())
        .compact()
        .init();

    match args.command {
        Command::Inspect { file } => inspect(&file),
        Command::Comments {
            source,
            destination,
        } => {
            let stats = revex::export_comments(&source, &destination)
                .with_context(|| format!("exporting comments from {}", source.display()))?;
            println!(
                "wrote {} rows from {} files to {}",
                stats.rows,
                stats.files,
                destination.join("comments.csv").display()
            );
            Ok(())
        }
    }
}

/// Load one change export and print every derived view.
fn inspect(file: &std::path::Path) -> Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("reading {}", file.display()))?;
    let change = Change::from_json_str(&raw)
        .with_context(|| format!("decoding change record {}", file.display()))?;

    println!("change {} ({})", change.change_number, change.id);
    println!("  project:   {}", change.project);
    println!("  status:    {}", change.status);
    println!("  subject:   {}", change.subject);
    println!("  owner:     {}", change.owner);
    println!("  created:   {}", change.created);
    println!("  updated:   {}", change.updated);
    println!("  mergeable: {}", change.is_mergeable());
    println!("  wip:       {}", change.is_work_in_progress());

    let revisions = change.revisions()?;
    println!("  revisions: {}", revisions.len());
    if let Some(first) = change.first_revision()? {
        println!(
            "  first:     patch set {} by {} ({} files)",
            first.number,
            first.uploader,
            first.files.len()
        );
        for file in &first.files {
            println!(
                "    {} {} (+{} -{})",
                file.status.as_str(),
                file.path,
                file.lines_inserted,
                file.lines_deleted
            );
        }
    }

    println!("  reviewers: {:?}", change.reviewers()?);
    println!("  labels:    {}", change.labels()?.len());
    println!("  messages:  {}", change.messages()?.len());

    let subsystems: Vec<&str> = change.subsystems()?.into_iter().collect();
    let directories: Vec<&str> = change.directories()?.into_iter().collect();
    println!("  subsystems:  {}", subsystems.join(", "));
    println!("  directories: {}", directories.join(", "));
    println!("  file types:  {}", change.file_type_num()?);
    println!("  languages:   {}", change.language_num()?);
    println!("  real change: {}", change.is_real_change()?);

    Ok(())
}
