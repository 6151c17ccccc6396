mod app;
mod config;
mod error;
mod fixture;
mod paths;
mod render;
mod terminal;

use std::fs::{self, File};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use simplelog::{Config, LevelFilter, WriteLogger};
use tableedit::{HttpTransport, RequestDriver};

use crate::app::{App, Message};
use crate::config::AppConfig;
use crate::error::AppError;
use crate::fixture::Pages;
use crate::terminal::TerminalGuard;

/// Log to `latest.log` in the cache dir, rotating the previous run's log.
fn init_logging() {
    paths::rotate_logs();
    let Some(path) = paths::log_file() else { return };
    if let Some(dir) = path.parent() {
        let _ = fs::create_dir_all(dir);
    }
    match File::create(&path) {
        Ok(file) => {
            let _ = WriteLogger::init(LevelFilter::Debug, Config::default(), file);
        }
        Err(e) => eprintln!("Cannot create log file {}: {}", path.display(), e),
    }
}

async fn run() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let pages = match &config.fixture {
        Some(path) => Pages::load(path)?,
        None => Pages::built_in()?,
    };

    let mut builder = HttpTransport::builder().url(config.endpoint());
    if let Some(timeout) = config.editor.timeout() {
        builder = builder.timeout(timeout);
    }
    if let Some(secs) = config.connect_timeout_secs {
        builder = builder.connect_timeout(Duration::from_secs(secs));
    }
    if let Some(token) = &config.csrf_token {
        builder = builder.csrf_token(token.clone());
    }
    let transport = builder.build()?;
    log::info!("[main] posting to {}", transport.base_url());

    let (driver, completions) = RequestDriver::<Message>::new(Arc::new(transport));

    let mut terminal = TerminalGuard::new()?;
    let (width, _) = terminal.size()?;
    let mut app = App::new(
        pages,
        config.editor.clone(),
        config.csrf_token.clone(),
        driver,
        width,
    );
    app.run(&mut terminal, completions).await
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("[main] {}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
