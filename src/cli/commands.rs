//! CLI command implementations
//!
//! Every command loads the configuration, opens the session over the data
//! directory, runs one operation and flushes on the way out. `type` is the
//! only long-running command: it serves input events from stdin until EOF.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::content::{ContentStore, DocumentId, FsContentStore};
use crate::metadata::{MetadataStore, RevealRate};
use crate::observability::{log_event, log_event_with_fields, Event, Logger};
use crate::reveal::InputEvent;
use crate::session::{Session, SessionError, SessionHandle};

use super::args::{Cli, Command};
use super::config::Config;
use super::errors::{CliError, CliErrorCode, CliResult};
use super::io::{write_error, write_error_to, write_response, write_response_to};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    let result = match cmd {
        Command::Init { config } => init(&config).and_then(write_response),
        Command::Import {
            config,
            file,
            title,
        } => import(&config, &file, title.as_deref()).and_then(write_response),
        Command::Open { config, id } => open(&config, &id).and_then(write_response),
        Command::Status { config } => status(&config).and_then(write_response),
        Command::List { config } => list(&config).and_then(write_response),
        Command::Rate {
            config,
            chars_per_keystroke,
        } => rate(&config, chars_per_keystroke).and_then(write_response),
        Command::Title { config, title } => set_title(&config, &title).and_then(write_response),
        Command::Remove { config } => remove(&config).and_then(write_response),
        Command::Type { config } => type_events(&config),
    };

    if let Err(ref e) = result {
        let _ = write_error(e.code_str(), e.message());
    }
    result
}

/// Initialize a new fishdoc data directory
///
/// Creates `sources/` and an empty `meta.json` carrying the configured
/// default rate.
pub fn init(config_path: &Path) -> CliResult<Value> {
    let config = load_config(config_path)?;
    let data_dir = config.data_path();

    if is_initialized(data_dir) {
        return Err(CliError::already_initialized());
    }

    fs::create_dir_all(data_dir).map_err(|e| {
        CliError::config_error(format!("Failed to create directory {:?}: {}", data_dir, e))
    })?;
    FsContentStore::open(data_dir).map_err(SessionError::from)?;
    MetadataStore::open(data_dir, config.default_rate())
        .and_then(|meta| meta.flush())
        .map_err(SessionError::from)?;

    Ok(json!({
        "initialized": true,
        "data_dir": config.data_dir,
    }))
}

/// Import a text file and make it active
pub fn import(config_path: &Path, file: &Path, title: Option<&str>) -> CliResult<Value> {
    let raw_text = read_source(file)?;
    let file_name = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut session = boot(config_path)?;
    let id = session.import(&file_name, &raw_text)?;
    if let Some(title) = title {
        session.set_title(title)?;
    }
    let status = session.document_status(&id)?;
    session.shutdown()?;

    Ok(serde_json::to_value(status)?)
}

/// Activate a stored document by identifier
pub fn open(config_path: &Path, id: &str) -> CliResult<Value> {
    let id = DocumentId::parse(id).map_err(|e| CliError::invalid_input(e.to_string()))?;

    let mut session = boot(config_path)?;
    let frame = session.activate(&id)?;
    let status = session.document_status(&id)?;
    session.shutdown()?;

    Ok(json!({ "document": status, "frame": frame }))
}

/// Report the active document and the global rate
pub fn status(config_path: &Path) -> CliResult<Value> {
    let session = boot(config_path)?;
    let active = session.status()?;
    let rate = session.rate().chars_per_keystroke();
    session.shutdown()?;

    Ok(json!({ "active": active, "chars_per_keystroke": rate }))
}

/// List every document known to either store
pub fn list(config_path: &Path) -> CliResult<Value> {
    let session = boot(config_path)?;
    let documents = session.list()?;
    session.shutdown()?;

    Ok(json!({ "documents": documents }))
}

/// Set the global reveal rate; out-of-range values are clamped
pub fn rate(config_path: &Path, chars_per_keystroke: usize) -> CliResult<Value> {
    let mut session = boot(config_path)?;
    session.set_rate(RevealRate::new(chars_per_keystroke))?;
    let rate = session.rate().chars_per_keystroke();
    session.shutdown()?;

    Ok(json!({ "chars_per_keystroke": rate }))
}

/// Set the active document's title
pub fn set_title(config_path: &Path, title: &str) -> CliResult<Value> {
    let mut session = boot(config_path)?;
    session.set_title(title)?;
    let status = session.status()?;
    session.shutdown()?;

    Ok(serde_json::to_value(status)?)
}

/// Remove the active document from both stores
pub fn remove(config_path: &Path) -> CliResult<Value> {
    let mut session = boot(config_path)?;
    let removed = session.remove_current()?;
    session.shutdown()?;

    Ok(json!({ "removed": removed }))
}

/// Serve input events from stdin until EOF
///
/// Reports the session counters to the log on exit.
pub fn type_events(config_path: &Path) -> CliResult<()> {
    let session = boot(config_path)?;

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        let handle = SessionHandle::new(session);
        let stdin = BufReader::new(tokio::io::stdin());

        let result = serve_events(&handle, stdin, &mut io::stdout()).await;

        let metrics = serde_json::to_string(&handle.metrics().await)?;
        Logger::info("SESSION_METRICS", &[("metrics", metrics.as_str())]);
        handle.shutdown().await?;

        result
    })
}

/// Reads one JSON input event per line and writes one response per line.
///
/// Malformed events and rejected transitions are answered with an error
/// line and the loop goes on; fatal storage errors end it.
pub async fn serve_events<C, R, W>(
    handle: &SessionHandle<C>,
    reader: R,
    writer: &mut W,
) -> CliResult<()>
where
    C: ContentStore + 'static,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let event: InputEvent = match serde_json::from_str(&line) {
            Ok(event) => event,
            Err(e) => {
                write_error_to(
                    writer,
                    CliErrorCode::InvalidInput.code(),
                    &format!("Invalid input event: {}", e),
                )?;
                continue;
            }
        };

        match handle.handle(event).await {
            Ok(outcome) => write_response_to(
                writer,
                json!({
                    "disposition": outcome.disposition.as_str(),
                    "frame": outcome.frame,
                    "progress": outcome.frame.progress_percent(),
                }),
            )?,
            Err(e) if e.is_fatal() => return Err(e.into()),
            Err(e) => write_error_to(writer, e.code(), &e.to_string())?,
        }
    }

    Ok(())
}

fn load_config(config_path: &Path) -> CliResult<Config> {
    let config = Config::load(config_path)?;
    Logger::set_min_severity(config.log_severity());
    log_event_with_fields(Event::ConfigLoaded, &[("data_dir", config.data_dir.as_str())]);
    Ok(config)
}

/// Loads config and opens the session over an initialized data directory
fn boot(config_path: &Path) -> CliResult<Session<FsContentStore>> {
    let config = load_config(config_path)?;
    let data_dir = config.data_path();

    log_event(Event::BootStart);

    if !is_initialized(data_dir) {
        return Err(CliError::not_initialized());
    }

    let session = Session::open(data_dir, config.default_rate())?;

    let active = session.active().map(|id| id.to_string()).unwrap_or_default();
    log_event_with_fields(Event::BootComplete, &[("active_document", active.as_str())]);

    Ok(session)
}

fn is_initialized(data_dir: &Path) -> bool {
    FsContentStore::sources_dir(data_dir).is_dir() && MetadataStore::meta_path(data_dir).is_file()
}

/// Reads an import candidate: `.txt` (or no extension) and valid UTF-8
fn read_source(path: &Path) -> CliResult<String> {
    if let Some(ext) = path.extension() {
        if !ext.eq_ignore_ascii_case("txt") {
            return Err(CliError::invalid_input(format!(
                "Only plain text (.txt) files can be imported: {}",
                path.display()
            )));
        }
    }

    let bytes = fs::read(path)
        .map_err(|e| CliError::io_error(format!("Failed to read {}: {}", path.display(), e)))?;

    String::from_utf8(bytes)
        .map_err(|_| CliError::invalid_input(format!("{} is not UTF-8 text", path.display())))
}
