//! Progression samples: how the best score evolved over a run.

/// One sample in a progression log.
///
/// Progression logs are append-only: entries are recorded in the order they
/// were observed, so elapsed seconds are non-decreasing and values are
/// non-increasing (the best score never regresses).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProgressionEntry {
    /// Seconds elapsed since the start of the run when the sample was taken.
    pub elapsed_seconds: f64,

    /// Best score known at that moment.
    pub value: f64,
}
