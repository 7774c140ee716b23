use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::InferenceError;
use crate::types::DataType;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InferenceSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// A column could not be converted to the requested type.
    Error,
    /// The request itself is invalid (unknown type name, malformed table).
    Critical,
}

/// How the type of a column was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InferenceMode {
    /// Probed through the registry in priority order.
    Automatic,
    /// Caller-supplied type, value-preserving conversion.
    Explicit,
    /// Caller-supplied type, lossy conversion accepted.
    Forced,
}

/// Context about a single column conversion.
#[derive(Debug, Clone)]
pub struct InferenceContext {
    /// Name of the column being converted.
    pub column: String,
    /// Type name the caller asked for; `None` during automatic inference.
    pub requested_type: Option<String>,
    pub mode: InferenceMode,
}

/// `column=<name> mode=<mode> requested=<type or ->`, the common prefix of observer log lines.
impl fmt::Display for InferenceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "column={} mode={:?} requested={}",
            self.column,
            self.mode,
            self.requested_type.as_deref().unwrap_or("-")
        )
    }
}

/// Stats reported on successful conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InferenceStats {
    /// Type the column was committed to.
    pub data_type: DataType,
    pub rows: usize,
    pub nulls: usize,
    /// Number of registry candidates attempted (1 for explicit conversions).
    pub candidates_tried: usize,
}

impl fmt::Display for InferenceStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "type={} rows={} nulls={} tried={}",
            self.data_type, self.rows, self.nulls, self.candidates_tried
        )
    }
}

/// Observer interface for conversion outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait InferenceObserver: Send + Sync {
    /// Called when a column is committed to a type.
    fn on_success(&self, _ctx: &InferenceContext, _stats: InferenceStats) {}

    /// Called when an explicit conversion fails.
    fn on_failure(&self, _ctx: &InferenceContext, _severity: InferenceSeverity, _error: &InferenceError) {}

    /// Called when a failure meets an alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &InferenceContext, severity: InferenceSeverity, error: &InferenceError) {
        self.on_failure(ctx, severity, error)
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn InferenceObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn InferenceObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl InferenceObserver for CompositeObserver {
    fn on_success(&self, ctx: &InferenceContext, stats: InferenceStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &InferenceContext, severity: InferenceSeverity, error: &InferenceError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &InferenceContext, severity: InferenceSeverity, error: &InferenceError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Logs conversion events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl InferenceObserver for StdErrObserver {
    fn on_success(&self, ctx: &InferenceContext, stats: InferenceStats) {
        eprintln!("[infer][ok] {ctx} {stats}");
    }

    fn on_failure(&self, ctx: &InferenceContext, severity: InferenceSeverity, error: &InferenceError) {
        eprintln!("[infer][{severity:?}] {ctx} err={error}");
    }

    fn on_alert(&self, ctx: &InferenceContext, severity: InferenceSeverity, error: &InferenceError) {
        eprintln!("[ALERT][infer][{severity:?}] {ctx} err={error}");
    }
}

/// Appends conversion events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

/// One line per event: `<unix seconds> <event> [severity=..] <context> <stats or err>`.
impl InferenceObserver for FileObserver {
    fn on_success(&self, ctx: &InferenceContext, stats: InferenceStats) {
        self.append_line(&format!("{} ok {ctx} {stats}", unix_ts()));
    }

    fn on_failure(&self, ctx: &InferenceContext, severity: InferenceSeverity, error: &InferenceError) {
        self.append_line(&format!("{} fail severity={severity:?} {ctx} err={error}", unix_ts()));
    }

    fn on_alert(&self, ctx: &InferenceContext, severity: InferenceSeverity, error: &InferenceError) {
        self.append_line(&format!("{} ALERT severity={severity:?} {ctx} err={error}", unix_ts()));
    }
}

/// Severity an error is reported with.
///
/// Conversion failures concern the data and are `Error`; everything else means the request
/// could never have succeeded and is `Critical`.
pub fn severity_for_error(error: &InferenceError) -> InferenceSeverity {
    match error {
        InferenceError::ConversionFailure { .. } => InferenceSeverity::Error,
        InferenceError::UnknownType { .. }
        | InferenceError::DuplicateColumn { .. }
        | InferenceError::ColumnLength { .. }
        | InferenceError::RowLength { .. } => InferenceSeverity::Critical,
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
