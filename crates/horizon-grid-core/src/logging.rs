//! Logging and tracing facilities for Horizon Grid.
//!
//! Horizon Grid is instrumented with the `tracing` crate and never installs a
//! subscriber itself. To see logs, install one in the host application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("horizon_grid::selection=debug,horizon_grid::bus=trace")
//!     .init();
//! ```
//!
//! Every event emitted by the workspace uses one of the [`targets`], so each
//! subsystem can be filtered on its own.

/// Span names used throughout Horizon Grid for tracing.
pub mod span_names {
    /// Column metrics recomputation span.
    pub const METRICS: &str = "horizon_grid::metrics";
    /// Row update commit span.
    pub const COMMIT: &str = "horizon_grid::commit";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "horizon_grid_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "horizon_grid_core::signal";
    /// Property system target.
    pub const PROPERTY: &str = "horizon_grid_core::property";
    /// Column metrics engine target.
    pub const METRICS: &str = "horizon_grid::metrics";
    /// Selection state machine target.
    pub const SELECTION: &str = "horizon_grid::selection";
    /// Row update commit pipeline target.
    pub const COMMIT: &str = "horizon_grid::commit";
    /// Keyboard-modifier tracker target.
    pub const KEYBOARD: &str = "horizon_grid::keyboard";
    /// Imperative signal bus target.
    pub const BUS: &str = "horizon_grid::bus";
    /// Grid controller target.
    pub const GRID: &str = "horizon_grid::grid";
    /// Configuration loading and validation target.
    pub const CONFIG: &str = "horizon_grid::config";
    /// [`PerfSpan`](super::PerfSpan) target.
    pub const PERF: &str = "horizon_grid::perf";
}

/// A guard that traces the duration of an operation.
///
/// The span is entered on creation and exited when the guard is dropped.
///
/// ```
/// use horizon_grid_core::PerfSpan;
///
/// let _span = PerfSpan::new("recompute_metrics");
/// // ... work measured by the span ...
/// ```
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create and enter a new performance span.
    pub fn new(operation: &'static str) -> Self {
        let span = tracing::debug_span!(target: targets::PERF, "perf", operation);
        Self {
            span: span.entered(),
        }
    }
}

impl std::fmt::Debug for PerfSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PerfSpan").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_targets_are_namespaced() {
        for target in [
            targets::METRICS,
            targets::SELECTION,
            targets::COMMIT,
            targets::KEYBOARD,
            targets::BUS,
            targets::GRID,
            targets::CONFIG,
            targets::PERF,
        ] {
            assert!(target.starts_with("horizon_grid::"));
        }
        assert!(targets::SIGNAL.starts_with(targets::CORE));
        assert!(targets::PROPERTY.starts_with(targets::CORE));
    }

    #[test]
    fn test_perf_span_with_subscriber() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_test_writer()
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            let _span = PerfSpan::new("test_operation");
            tracing::debug!(target: targets::METRICS, "inside span");
        });
    }
}
