// Entry point and high-level CLI flow.
//
// - Option [1] loads the week, play registry and setup JSON files.
// - Option [2] computes the coverage report, writes the CSV tables and the
//   JSON report, and prints previews.
// - After generating, the user can go back to the menu or exit.
use anyhow::{Context, Result};
use clap::Parser;
use once_cell::sync::Lazy;
use script_qc::loader::{self, Inputs};
use script_qc::output::{self, BucketRow, QuotaRow, RecommendationRow, SituationRow};
use script_qc::util::{format_int, format_number};
use script_qc::{compute_coverage_report_with, CoverageReport, Thresholds};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "script_qc")]
#[command(about = "Practice script coverage report")]
struct Args {
    /// Week document (practice plans, rep targets, call sheet, reviews)
    #[arg(long, default_value = "week.json")]
    week: PathBuf,

    /// Play registry keyed by play id
    #[arg(long, default_value = "plays.json")]
    plays: PathBuf,

    /// Program setup (buckets, situations, review tags)
    #[arg(long, default_value = "setup.json")]
    setup: PathBuf,

    /// Optional thresholds overrides
    #[arg(long)]
    thresholds: Option<PathBuf>,

    /// Directory the report files are written to
    #[arg(long, default_value = "coverage")]
    out_dir: PathBuf,

    /// Load, generate once and exit instead of showing the menu
    #[arg(long)]
    once: bool,
}

// Inputs are loaded once per run; the report is reused until they change.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| Mutex::new(AppState::default()));

#[derive(Default)]
struct AppState {
    inputs: Option<Inputs>,
    report: Option<CoverageReport>,
}

fn state() -> MutexGuard<'static, AppState> {
    APP_STATE.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn read_choice() -> String {
    print!("Enter choice: ");
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

/// Returns `true` if the user chose `Y`, `false` if they chose `N`.
fn prompt_back_to_menu() -> bool {
    loop {
        print!("Back to Menu (Y/N): ");
        let _ = io::stdout().flush();
        let mut buf = String::new();
        io::stdin().read_line(&mut buf).ok();
        match buf.trim().to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

fn handle_load(args: &Args) -> Result<()> {
    let (inputs, load_report) = loader::load_inputs(&args.week, &args.plays, &args.setup)
        .context("failed to load coverage inputs")?;
    println!(
        "Loaded week... ({} script rows across {} segments on {} days)",
        format_int(load_report.script_rows),
        format_int(load_report.segments),
        format_int(load_report.days)
    );
    println!(
        "Registry: {} plays, {} buckets, {} situations.",
        format_int(load_report.plays),
        format_int(load_report.buckets),
        format_int(load_report.situations)
    );
    if inputs.week.is_none() {
        println!("Note: week document is empty; the report will be blank.");
    }
    println!();
    let mut state = state();
    state.inputs = Some(inputs);
    state.report = None;
    Ok(())
}

fn handle_generate(args: &Args, thresholds: &Thresholds) -> Result<()> {
    let report = {
        let mut state = state();
        let Some(inputs) = state.inputs.as_ref() else {
            println!("Error: No inputs loaded. Please load the files first (option 1).\n");
            return Ok(());
        };
        if state.report.is_none() {
            let computed =
                compute_coverage_report_with(inputs.week.as_ref(), &inputs.plays, &inputs.setup, thresholds);
            state.report = Some(computed);
        } else {
            info!("inputs unchanged, reusing computed report");
        }
        state.report.clone().unwrap_or_default()
    };

    let written = output::write_report(&args.out_dir, &report)
        .with_context(|| format!("failed to write report to {}", args.out_dir.display()))?;
    println!("Outputs saved to {} files in {}\n", written.len(), args.out_dir.display());

    println!("Bucket Balance\n");
    output::preview_table_rows(&output::rows_of::<_, BucketRow>(&report.buckets), 8);
    println!("Rep Quotas (most under target first)\n");
    output::preview_table_rows(&output::rows_of::<_, QuotaRow>(&report.quotas), 5);
    println!("Situational Coverage\n");
    output::preview_table_rows(&output::rows_of::<_, SituationRow>(&report.situations), 5);
    println!("Recommendations\n");
    output::preview_table_rows(&output::rows_of::<_, RecommendationRow>(&report.recommendations), 5);

    let s = &report.summary;
    println!(
        "Summary: {} reps, {} unique plays, quotas met {}%, situations covered {}%, call sheet practiced {}%, avg rating {}\n",
        format_int(s.total_reps),
        format_int(s.unique_plays),
        s.quota_met_pct,
        s.situation_coverage_pct,
        s.call_sheet_practiced_pct,
        format_number(s.overall_avg_rating, 2)
    );
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let thresholds = loader::load_thresholds(args.thresholds.as_deref())
        .context("failed to load thresholds")?;

    if args.once {
        handle_load(&args)?;
        return handle_generate(&args, &thresholds);
    }

    loop {
        println!("Script QC");
        println!("[1] Load the files");
        println!("[2] Generate Coverage Report\n");
        match read_choice().as_str() {
            "1" => {
                if let Err(e) = handle_load(&args) {
                    error!("{:#}", e);
                }
            }
            "2" => {
                println!();
                if let Err(e) = handle_generate(&args, &thresholds) {
                    error!("{:#}", e);
                }
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            _ => {
                println!("Invalid choice. Please enter 1 or 2.\n");
            }
        }
    }
    Ok(())
}
