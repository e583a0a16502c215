use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use casefix::config;
use casefix::source_tree::{SourceTree, DEFAULT_ROOT};
use casefix::{RunEvent, RunOptions, RunSummary};

use crate::commands::CmdResult;

#[derive(Args, Debug)]
pub struct FixArgs {
    /// Source root to scan
    #[arg(env = "CASEFIX_ROOT", default_value = DEFAULT_ROOT)]
    pub root: PathBuf,

    /// Config file (default: ./casefix.json when present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Report corrections without writing files
    #[arg(long)]
    pub dry_run: bool,

    /// Like --dry-run, but exit 1 when any import needs correcting
    #[arg(long)]
    pub check: bool,

    /// Print a JSON envelope instead of the text report
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
#[serde(tag = "command")]
pub enum FixOutput {
    #[serde(rename = "fix")]
    Fix {
        dry_run: bool,
        #[serde(flatten)]
        summary: RunSummary,
    },
}

/// Run the fix command, passing each report line to `report` as the run
/// progresses.
pub fn run(args: &FixArgs, report: &mut dyn FnMut(&str)) -> CmdResult<FixOutput> {
    let config = config::load_config(args.config.as_deref())?;
    let tree = SourceTree::open(&args.root, config)?;

    let dry_run = args.dry_run || args.check;
    let summary = casefix::run_with(&tree, RunOptions { dry_run }, |event| {
        report(&render_event(event, dry_run));
    })?;
    report("Done");

    let exit_code = if args.check && !summary.fixes.is_empty() {
        1
    } else {
        0
    };

    Ok((FixOutput::Fix { dry_run, summary }, exit_code))
}

/// Console line for one run event.
pub fn render_event(event: RunEvent<'_>, dry_run: bool) -> String {
    match event {
        RunEvent::Scanning(count) => format!("Scanning {} files...", count),
        RunEvent::Fixed(fix) => {
            let verb = if dry_run { "Would fix" } else { "Fixed" };
            format!("{} in {}: '{}' -> '{}'", verb, fix.file, fix.from, fix.to)
        }
        RunEvent::Skipped(skipped) => format!("Skipped {}: {}", skipped.file, skipped.reason),
    }
}
