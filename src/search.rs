//! Search workflow: run the scraper for a title, then rescan the library.

use crate::config::Settings;
use crate::error::ScraperError;
use crate::library::{SeriesSummary, scan_library};
use crate::runner::{ProcessRunner, RunEvent, RunRequest};
use tokio::sync::mpsc::UnboundedSender;

/// Scraper flag introducing the search query.
const QUERY_FLAG: &str = "-q";

/// Runs the scraper for `query` inside the library folder and returns the
/// refreshed library.
///
/// Configuration problems are reported before anything is spawned. The
/// library folder is created if it doesn't exist yet.
pub async fn search_series(
    settings: &Settings,
    query: &str,
    runner: &dyn ProcessRunner,
    events: Option<UnboundedSender<RunEvent>>,
) -> Result<Vec<SeriesSummary>, ScraperError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(ScraperError::EmptyQuery);
    }

    let library = settings.library_dir()?;
    tokio::fs::create_dir_all(&library)
        .await
        .map_err(ScraperError::Library)?;

    let python = settings.python_command()?;
    let script = settings.scraper_script()?;

    let request = RunRequest::new(python, script)
        .arg(QUERY_FLAG)
        .arg(query)
        .cwd(&library);

    let result = runner.run(&request, events).await?;
    if !result.success() {
        return Err(ScraperError::Failed {
            code: result.code,
            detail: result.failure_detail(),
        });
    }

    Ok(scan_library(&library))
}
