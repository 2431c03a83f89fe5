//! Outbound detection signals.
//!
//! Detectors report their findings as [`Signal`]s: a severity, a
//! human-readable message, and the structured event that produced it.
//! How signals are delivered (logs, channels, files) is up to the sink.

use std::collections::BTreeMap;

/// Running count of status events per label, accumulated for the life
/// of the process.
pub type TallySnapshot = BTreeMap<String, u64>;

/// Severity of a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    /// Returns a short label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

/// A machine whose recent temperature readings stopped changing
/// meaningfully.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StallEvent {
    /// The stalled machine.
    pub machine_id: String,
    /// Snapshot of the window that triggered detection, oldest first.
    pub window: Vec<f64>,
}

/// A machine that reported an error status.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorAlert {
    /// The reporting machine.
    pub machine_id: String,
    /// The status label as reported, original case preserved.
    pub status: String,
    /// The producer-supplied error code, if any.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub error_code: Option<String>,
}

/// The structured payload of a signal.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SignalKind {
    /// A stall detection fired.
    Stall(StallEvent),
    /// An error status was reported.
    Alert(ErrorAlert),
    /// The status tally changed.
    Tally(TallySnapshot),
    /// A payload could not be decoded and was dropped.
    DecodeFailure {
        /// Why decoding failed.
        reason: String,
        /// The offending raw payload.
        payload: String,
    },
}

/// A detection or alert signal delivered to notification sinks.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Signal {
    pub severity: Severity,
    /// Human-readable description of the event.
    pub message: String,
    pub kind: SignalKind,
}

impl Signal {
    /// Warning signal for a temperature stall.
    pub fn stall(event: StallEvent) -> Self {
        Self {
            severity: Severity::Warning,
            message: format!(
                "temperature stall detected for machine {}, recent readings: {:?}",
                event.machine_id, event.window
            ),
            kind: SignalKind::Stall(event),
        }
    }

    /// Warning signal for a reported error status.
    pub fn alert(alert: ErrorAlert) -> Self {
        let message = match &alert.error_code {
            Some(code) => format!(
                "machine {} reported status {:?} with error code {}",
                alert.machine_id, alert.status, code
            ),
            None => format!(
                "machine {} reported status {:?} without an error code",
                alert.machine_id, alert.status
            ),
        };
        Self {
            severity: Severity::Warning,
            message,
            kind: SignalKind::Alert(alert),
        }
    }

    /// Informational signal carrying the updated status tally.
    pub fn tally(snapshot: TallySnapshot) -> Self {
        Self {
            severity: Severity::Info,
            message: format!("status counts updated: {:?}", snapshot),
            kind: SignalKind::Tally(snapshot),
        }
    }

    /// Error signal for a payload that could not be decoded.
    pub fn decode_failure(reason: impl Into<String>, payload: impl Into<String>) -> Self {
        let reason = reason.into();
        let payload = payload.into();
        Self {
            severity: Severity::Error,
            message: format!("dropped undecodable payload ({}): {}", reason, payload),
            kind: SignalKind::DecodeFailure { reason, payload },
        }
    }
}
