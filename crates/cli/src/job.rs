//! `deckdiff run` / `validate` / `categories` / `init`.

use std::path::{Path, PathBuf};

use clap::Args;
use deckdiff_config::{ConfigError, JobConfig, Overrides};
use deckdiff_recon::extract::{load_export, summarize_categories};
use deckdiff_recon::{JobInputs, JobOutcome, LogReporter, ReconError, ReconciliationJob};

use crate::exit_codes::{recon_exit_code, ErrorOutput, EXIT_CONFIG};
use crate::CliError;

/// Where the job reads and writes. Flags override the config file.
#[derive(Args, Debug, Default)]
pub struct JobArgs {
    /// Config file (default: ./deckdiff.toml, then the user config dir)
    #[arg(long, short = 'c', env = "DECKDIFF_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding the board export
    #[arg(long)]
    pub input_location: Option<String>,

    /// Board export name, without .json
    #[arg(long)]
    pub input_name: Option<String>,

    /// Directory holding the master file
    #[arg(long)]
    pub master_location: Option<String>,

    /// Master file name, without .json
    #[arg(long)]
    pub master_name: Option<String>,

    /// List (category) to reconcile
    #[arg(long = "category")]
    pub category_name: Option<String>,

    /// Directory receiving the diff artifact
    #[arg(long)]
    pub output_location: Option<String>,
}

impl JobArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            input_location: self.input_location.clone(),
            input_name: self.input_name.clone(),
            master_location: self.master_location.clone(),
            master_name: self.master_name.clone(),
            category_name: self.category_name.clone(),
            output_location: self.output_location.clone(),
        }
    }
}

fn config_err(err: ConfigError) -> CliError {
    CliError {
        code: EXIT_CONFIG,
        message: err.to_string(),
        hint: None,
    }
}

fn recon_err(err: &ReconError) -> CliError {
    let hint = match err {
        ReconError::CategoryNotFound { .. } => {
            Some("run `deckdiff categories <export>` to list the categories".to_string())
        }
        ReconError::MasterCorrupt { .. } => {
            Some("the master was not modified; repair it or move it aside".to_string())
        }
        ReconError::ExportWriteFailed { .. } => {
            Some("the master was not updated; the next run will report these items again".to_string())
        }
        ReconError::MasterWriteFailed { artifact: Some(path), .. } => Some(format!(
            "{} is valid; the next run will report its items again",
            path.display()
        )),
        _ => None,
    };
    CliError {
        code: recon_exit_code(err),
        message: err.to_string(),
        hint,
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Load the config (if any), apply flag overrides and resolve paths.
pub fn resolve_inputs(args: &JobArgs) -> Result<JobInputs, CliError> {
    let (mut config, base_dir) = match &args.config {
        Some(path) => (JobConfig::load(path).map_err(config_err)?, parent_dir(path)),
        None => {
            let path = JobConfig::default_path();
            if path.exists() {
                log::debug!("using config {}", path.display());
                (JobConfig::load(&path).map_err(config_err)?, parent_dir(&path))
            } else {
                (JobConfig::default(), PathBuf::from("."))
            }
        }
    };

    config.apply(args.overrides());
    config.resolve(&base_dir).map_err(config_err)
}

pub fn cmd_run(args: JobArgs, json: bool, dry_run: bool) -> Result<(), CliError> {
    let inputs = resolve_inputs(&args)?;
    let timestamp = chrono::Local::now().naive_local();

    let mut reporter = LogReporter;
    let job = ReconciliationJob::new(inputs, &mut reporter);
    let result = if dry_run {
        job.preview(timestamp)
    } else {
        job.run(timestamp)
    };

    match result {
        Ok(outcome) => {
            print_summary(&outcome);
            if json {
                let json_str = serde_json::to_string_pretty(&outcome)
                    .map_err(|e| CliError::io(format!("JSON serialization error: {e}")))?;
                println!("{json_str}");
            }
            Ok(())
        }
        Err(err) => {
            if json {
                if let Ok(out) = serde_json::to_string(&ErrorOutput::from_recon_error(&err)) {
                    println!("{out}");
                }
            }
            Err(recon_err(&err))
        }
    }
}

fn print_summary(outcome: &JobOutcome) {
    let verb = if outcome.dry_run { "would add" } else { "added" };
    eprintln!(
        "{}: {} new of {} extracted, {verb} to master ({} -> {})",
        outcome.category,
        outcome.new_items,
        outcome.extracted,
        outcome.master_before,
        outcome.master_before + outcome.new_items,
    );
    if let Some(ref path) = outcome.artifact {
        eprintln!("wrote {}", path.display());
    }
}

pub fn cmd_validate(args: JobArgs) -> Result<(), CliError> {
    let inputs = resolve_inputs(&args)?;
    println!("input:    {}", inputs.input_file.display());
    println!("master:   {}", inputs.master_file.display());
    println!("output:   {}", inputs.output_location.display());
    println!("category: {}", inputs.category_name);
    if !inputs.input_file.exists() {
        eprintln!("note: {} does not exist yet", inputs.input_file.display());
    }
    Ok(())
}

pub fn cmd_categories(input: PathBuf, json: bool) -> Result<(), CliError> {
    let document = load_export(&input).map_err(|e| recon_err(&e))?;
    let summary = summarize_categories(&document);

    if json {
        let json_str = serde_json::to_string_pretty(&summary)
            .map_err(|e| CliError::io(format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
        return Ok(());
    }

    let width = summary.iter().map(|c| c.name.len()).max().unwrap_or(0).max(4);
    println!("{:<width$}  {:>5}  {:>6}", "NAME", "OPEN", "CLOSED");
    for category in &summary {
        println!(
            "{:<width$}  {:>5}  {:>6}",
            category.name, category.open_cards, category.closed_cards
        );
    }
    Ok(())
}

pub fn cmd_init(path: PathBuf) -> Result<(), CliError> {
    JobConfig::write_template(&path).map_err(|e| {
        config_err(e).with_hint("pass a different path, or edit the existing file")
    })?;
    eprintln!("wrote {}", path.display());
    Ok(())
}
