use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::Level;
use tracing_appender::non_blocking::{self, WorkerGuard};
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{LoggingConfig, ResolvedOutputs};

/// Target of the one-row-per-game events written by the runner.
pub const GAME_TARGET: &str = "trimatch_bench::game";
pub const TELEMETRY_FILE: &str = "telemetry.jsonl";

// Engine targets that may follow the configured level into telemetry.
const ENGINE_TARGETS: [&str; 3] = [
    "trimatch_core::session",
    "trimatch_core::turn",
    "trimatch_core::opponent",
];

/// Keeps the background writer alive; dropping it flushes the telemetry file.
pub struct LoggingGuard {
    _guard: WorkerGuard,
    pub telemetry_path: PathBuf,
}

/// Game rows are always kept; engine chatter only at `debug` or finer, everything else at `warn`.
pub fn telemetry_directives(level: Level) -> String {
    let level = level.as_str().to_ascii_lowercase();
    let mut directives = vec!["warn".to_string(), format!("{GAME_TARGET}=info")];
    if matches!(level.as_str(), "debug" | "trace") {
        directives.extend(ENGINE_TARGETS.iter().map(|target| format!("{target}={level}")));
    }
    directives.join(",")
}

/// Sends game rows, and engine events when asked for, to `telemetry.jsonl` next to the summary.
pub fn init_logging(
    logging: &LoggingConfig,
    outputs: &ResolvedOutputs,
) -> Result<Option<LoggingGuard>> {
    if !logging.enable_structured {
        return Ok(None);
    }

    let dir = telemetry_dir(outputs);
    fs::create_dir_all(&dir)
        .with_context(|| format!("creating telemetry directory at {}", dir.display()))?;
    let telemetry_path = dir.join(TELEMETRY_FILE);
    let file = File::create(&telemetry_path)
        .with_context(|| format!("creating telemetry file at {}", telemetry_path.display()))?;

    let (writer, guard) = non_blocking::NonBlockingBuilder::default()
        .lossy(false)
        .finish(file);

    let directives = telemetry_directives(logging.level().unwrap_or(Level::INFO));
    let filter = EnvFilter::try_new(&directives)
        .with_context(|| format!("building telemetry filter `{directives}`"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .json()
        .flatten_event(true)
        .with_current_span(false)
        .with_target(true)
        .with_writer(writer)
        .finish();

    // A subscriber may already be installed, e.g. by a test harness.
    let _ = tracing::subscriber::set_global_default(subscriber);

    Ok(Some(LoggingGuard {
        _guard: guard,
        telemetry_path,
    }))
}

pub fn telemetry_dir(outputs: &ResolvedOutputs) -> PathBuf {
    outputs
        .summary_md
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_rows_survive_any_level() {
        for level in [Level::ERROR, Level::WARN, Level::INFO] {
            let directives = telemetry_directives(level);
            assert_eq!(directives, "warn,trimatch_bench::game=info");
            assert!(EnvFilter::try_new(&directives).is_ok());
        }
    }

    #[test]
    fn debug_level_opens_engine_targets() {
        let directives = telemetry_directives(Level::DEBUG);
        assert!(directives.contains("trimatch_core::turn=debug"));
        assert!(directives.contains("trimatch_core::opponent=debug"));
        assert!(EnvFilter::try_new(&directives).is_ok());
    }

    #[test]
    fn telemetry_sits_next_to_the_summary() {
        let outputs = ResolvedOutputs {
            jsonl: PathBuf::from("out/run/games.jsonl"),
            summary_md: PathBuf::from("out/run/summary.md"),
        };
        assert_eq!(telemetry_dir(&outputs), PathBuf::from("out/run"));
        let bare = ResolvedOutputs {
            jsonl: PathBuf::from("games.jsonl"),
            summary_md: PathBuf::from("summary.md"),
        };
        assert_eq!(telemetry_dir(&bare), PathBuf::from("."));
    }
}
