// Teikoku CLI entry point

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use teikoku_cli::{output, Cli, Commands, Selection, Session};
use teikoku_files::{ConfigLoader, StagingConfig, StagingNotice, WriteOutcome};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        output::print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let loader = match &cli.config {
        Some(path) => ConfigLoader::with_path(path.clone()),
        None => ConfigLoader::new(),
    };
    let config = loader
        .load()
        .with_context(|| format!("Failed to load {}", loader.config_path().display()))?;

    let level = if cli.verbose || config.debug_logging {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Config => {
            print!("{}", toml::to_string(&config)?);
            Ok(())
        }
        Commands::Stage {
            files,
            details,
            reload,
            write_back,
            focus,
        } => stage(config, files, details, reload, write_back, focus).await,
    }
}

async fn stage(
    config: StagingConfig,
    files: Vec<PathBuf>,
    details: bool,
    reload: bool,
    write_back: bool,
    focus: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mut session = Session::new(config);
    let mut failed = 0usize;

    for file in &files {
        match session.select(file).await {
            Ok(Selection::Staged {
                path,
                elapsed,
                notice,
            }) => {
                let empty = if notice == Some(StagingNotice::EmptyStream) {
                    " (empty file)"
                } else {
                    ""
                };
                output::print_success(&format!(
                    "Staged {}{} in {:?}",
                    path.display(),
                    empty,
                    elapsed
                ));
            }
            Ok(Selection::AlreadyStaged { path }) => {
                output::print_skipped(&format!("Already staged: {}", path.display()));
            }
            Ok(Selection::Filtered { path }) => {
                output::print_skipped(&format!("Not offered by filter: {}", path.display()));
            }
            Err(e) => {
                failed += 1;
                output::print_error(&format!("Failed to stage {}: {}", file.display(), e));
            }
        }
    }

    if failed == files.len() {
        return staged_all(failed, files.len());
    }

    if let Some(focus) = focus {
        let resolved = tokio::fs::canonicalize(&focus)
            .await
            .with_context(|| format!("Cannot focus {}", focus.display()))?;
        if !session.focus(&resolved) {
            anyhow::bail!("{} is not staged", focus.display());
        }
    }

    if session.focused().is_none() {
        if details || reload || write_back {
            output::print_skipped("No file focused");
        }
        return staged_all(failed, files.len());
    }

    if reload {
        if let Some(elapsed) = session.reload_focused().await? {
            output::print_success(&format!("Reloaded in {:?}", elapsed));
        }
    }

    if details {
        if let Some(details) = session.details() {
            println!("{}", details);
        }
    }

    if write_back {
        match session.write_back_focused().await? {
            Some(WriteOutcome::Written { bytes }) => {
                output::print_success(&format!("Wrote {} bytes back", bytes))
            }
            Some(WriteOutcome::Skipped) => {
                output::print_skipped("Nothing loaded, write-back skipped")
            }
            None => {}
        }
    }

    staged_all(failed, files.len())
}

fn staged_all(failed: usize, total: usize) -> anyhow::Result<()> {
    if failed > 0 {
        anyhow::bail!("{} of {} selected files could not be staged", failed, total);
    }
    Ok(())
}
