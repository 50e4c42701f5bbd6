//! Ayumi CLI - manga collection tracker.

use anyhow::Context;
use ayumi::config::Settings;
use ayumi::console::Console;
use ayumi::error::Result;
use ayumi::library::{LibraryScanner, SeriesSummary};
use ayumi::runner::{PythonRunner, RunEvent, parse_progress_line};
use ayumi::search::search_series;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Track your manga collection from a folder of scraped series metadata.
#[derive(Parser, Debug)]
#[command(name = "ayumi")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the library, soonest upcoming release first.
    Scan {
        /// Library folder to scan instead of the configured one.
        #[arg(long)]
        library: Option<PathBuf>,

        /// Print summaries as JSON.
        #[arg(long)]
        json: bool,

        /// Also report series folders that could not be read.
        #[arg(short, long)]
        verbose: bool,
    },

    /// Search a series with the scraper and refresh the library.
    Search {
        /// Title to search for.
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// Set the library folder (created if missing).
    SetLibrary { path: PathBuf },

    /// Set the Python interpreter used to run the scraper.
    SetPython { path: PathBuf },

    /// Set the scraper script.
    SetScraper { path: PathBuf },

    /// Show the settings file and its values.
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let console = Console::new();

    match args.command {
        Commands::Scan {
            library,
            json,
            verbose,
        } => scan(&console, library, json, verbose),
        Commands::Search { query } => search(&console, &query.join(" ")).await,
        Commands::SetLibrary { path } => update_settings(&console, |s| {
            std::fs::create_dir_all(&path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            s.library_path = Some(path);
            Ok("Library folder")
        }),
        Commands::SetPython { path } => update_settings(&console, |s| {
            s.python_path = Some(path);
            Ok("Python interpreter")
        }),
        Commands::SetScraper { path } => update_settings(&console, |s| {
            s.scraper_path = Some(path);
            Ok("Scraper script")
        }),
        Commands::Config => show_config(&console),
    }
}

fn scan(console: &Console, library: Option<PathBuf>, json: bool, verbose: bool) -> Result<()> {
    let root = match library {
        Some(root) => root,
        None => {
            let settings = Settings::load().context("Failed to load settings")?;
            match settings.library_dir() {
                Ok(root) => root,
                Err(e) => {
                    // No library yet is a normal first-run state
                    if json {
                        println!("[]");
                    } else {
                        console.warning(&e.to_string());
                    }
                    return Ok(());
                }
            }
        }
    };

    let report = LibraryScanner::new(&root).scan();

    if json {
        let output =
            serde_json::to_string_pretty(&report.series).context("Failed to serialize library")?;
        println!("{}", output);
    } else {
        print_library(console, &root.display().to_string(), &report.series);
    }

    if verbose {
        for skipped in &report.skipped {
            console.warning(&format!(
                "Skipped {}: {}",
                skipped.folder_path.display(),
                skipped.error
            ));
        }
    }

    Ok(())
}

async fn search(console: &Console, query: &str) -> Result<()> {
    let settings = Settings::load().context("Failed to load settings")?;

    console.section("Ayumi - Scraper Search");
    console.step(&format!("Searching for \"{}\"...", query.trim()));

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let runner = PythonRunner::new();

    let (result, ()) = tokio::join!(search_series(&settings, query, &runner, Some(tx)), async {
        while let Some(event) = rx.recv().await {
            show_event(console, event);
        }
    });

    let series = result.context("Search failed")?;
    console.success("Scraper finished");

    let root = settings.library_dir()?;
    print_library(console, &root.display().to_string(), &series);
    Ok(())
}

fn show_event(console: &Console, event: RunEvent) {
    match event {
        RunEvent::Start => console.info("Scraper started"),
        RunEvent::Stdout(line) => match parse_progress_line(&line) {
            Some(progress) => {
                console.progress_update(&format!(
                    "Covers {}/{}",
                    progress.current, progress.total
                ));
                if progress.finished {
                    console.finish_progress();
                }
            }
            None if !line.trim().is_empty() => println!("{}", console.muted(&line)),
            None => {}
        },
        RunEvent::Stderr(line) => {
            if !line.trim().is_empty() {
                eprintln!("{}", console.muted(&line));
            }
        }
        RunEvent::Error(message) => console.error(&message),
        RunEvent::Done(code) => console.info(&format!("Scraper exited with code {}", code)),
    }
}

fn print_library(console: &Console, root: &str, series: &[SeriesSummary]) {
    console.section(&format!("Library: {}", root));

    if series.is_empty() {
        console.info("No series found");
        return;
    }

    for summary in series {
        println!("  {}", console.series_line(summary));
    }

    let missing: usize = series.iter().map(|s| s.missing_count).sum();
    console.info(&format!(
        "{} series, {} volumes missing",
        console.count(series.len()),
        console.count(missing)
    ));
}

/// Loads settings, applies `change`, and saves them back.
fn update_settings<F>(console: &Console, change: F) -> Result<()>
where
    F: FnOnce(&mut Settings) -> Result<&'static str>,
{
    let mut settings = Settings::load().context("Failed to load settings")?;
    let what = change(&mut settings)?;
    settings.save().context("Failed to save settings")?;
    console.success(&format!("{} saved", what));
    Ok(())
}

fn show_config(console: &Console) -> Result<()> {
    let path = Settings::config_path()?;
    let settings = Settings::load().context("Failed to load settings")?;

    let show = |value: &Option<PathBuf>| match value {
        Some(p) => p.display().to_string(),
        None => console.muted("(not set)"),
    };

    console.info(&format!("Settings file: {}", path.display()));
    println!("  library_path = {}", show(&settings.library_path));
    println!("  python_path  = {}", show(&settings.python_path));
    println!("  scraper_path = {}", show(&settings.scraper_path));
    Ok(())
}
