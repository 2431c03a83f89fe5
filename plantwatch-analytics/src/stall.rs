//! Per-machine sliding-window stall detection.

use std::collections::{HashMap, VecDeque};

use plantwatch_types::StallEvent;

/// Number of recent temperature readings retained per machine.
pub const WINDOW_CAPACITY: usize = 5;

/// A full window whose spread is strictly below this value is stalled.
pub const STALL_THRESHOLD: f64 = 0.5;

/// Detects machines whose temperature has stopped changing meaningfully.
///
/// One bounded FIFO window of recent readings is kept per machine,
/// created lazily on the first reading for that machine. Memory grows
/// with the number of distinct machines, not with message volume.
///
/// Detection is deterministic: two detectors fed the same ordered
/// readings for the same machine produce identical results.
#[derive(Debug, Clone, Default)]
pub struct StallDetector {
    /// Recent readings per machine, oldest first.
    windows: HashMap<String, VecDeque<f64>>,
}

impl StallDetector {
    /// Create a detector with no tracked machines.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a reading into the machine's window and evaluate it.
    ///
    /// The oldest reading is evicted once the window is full. Detection is
    /// evaluated only when the window holds exactly [`WINDOW_CAPACITY`]
    /// samples: if `max - min` is strictly below [`STALL_THRESHOLD`], a
    /// [`StallEvent`] carrying a snapshot of the window is returned.
    ///
    /// Non-finite readings are accepted into the window unchanged. `min`
    /// and `max` ignore NaN operands, so a NaN sample never fabricates a
    /// stall on its own.
    pub fn observe(&mut self, machine_id: &str, temperature: f64) -> Option<StallEvent> {
        let window = self.windows.entry(machine_id.to_string()).or_default();

        window.push_back(temperature);
        if window.len() > WINDOW_CAPACITY {
            window.pop_front();
        }

        if window.len() < WINDOW_CAPACITY {
            return None;
        }

        let first = *window.front()?;
        let (min, max) = window
            .iter()
            .copied()
            .fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));

        if max - min < STALL_THRESHOLD {
            Some(StallEvent {
                machine_id: machine_id.to_string(),
                window: window.iter().copied().collect(),
            })
        } else {
            None
        }
    }

    /// Current window contents for a machine, oldest first.
    pub fn window(&self, machine_id: &str) -> Option<&VecDeque<f64>> {
        self.windows.get(machine_id)
    }

    /// Number of distinct machines seen so far.
    pub fn tracked_machines(&self) -> usize {
        self.windows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observe_all(detector: &mut StallDetector, machine: &str, temps: &[f64]) -> Vec<StallEvent> {
        temps
            .iter()
            .filter_map(|&t| detector.observe(machine, t))
            .collect()
    }

    #[test]
    fn window_never_exceeds_capacity() {
        let mut detector = StallDetector::new();

        for i in 0..50 {
            detector.observe("M001", 70.0 + i as f64);
            assert!(detector.window("M001").unwrap().len() <= WINDOW_CAPACITY);
        }
    }

    #[test]
    fn spread_at_or_above_threshold_is_not_a_stall() {
        let mut detector = StallDetector::new();

        // Spread is 0.9, well above the threshold.
        let events = observe_all(&mut detector, "M001", &[75.2, 75.5, 75.8, 76.0, 76.1]);
        assert!(events.is_empty());

        // Spread exactly at the threshold: strict comparison, no stall.
        let mut detector = StallDetector::new();
        let events = observe_all(&mut detector, "M001", &[75.0, 75.1, 75.2, 75.3, 75.5]);
        assert!(events.is_empty());
    }

    #[test]
    fn stall_fires_on_fifth_observation_not_earlier() {
        let mut detector = StallDetector::new();
        let temps = [75.2, 75.3, 75.4, 75.3, 75.2];

        for (i, &t) in temps.iter().enumerate() {
            let event = detector.observe("M001", t);
            if i < temps.len() - 1 {
                assert!(event.is_none(), "fired early at observation {}", i + 1);
            } else {
                let event = event.expect("stall must fire on the fifth observation");
                assert_eq!(event.machine_id, "M001");
                assert_eq!(event.window, temps.to_vec());
            }
        }
    }

    #[test]
    fn fifo_eviction_drops_oldest_sample() {
        let mut detector = StallDetector::new();

        let events = observe_all(&mut detector, "M001", &[1.0, 1.0, 1.0, 1.0, 1.0, 100.0]);

        // The first five identical readings stall; the sixth evicts the
        // oldest 1.0 and the spread of 99.0 clears the condition.
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].window, vec![1.0; 5]);

        let window: Vec<f64> = detector.window("M001").unwrap().iter().copied().collect();
        assert_eq!(window, vec![1.0, 1.0, 1.0, 1.0, 100.0]);
    }

    #[test]
    fn machines_are_isolated() {
        let mut detector = StallDetector::new();

        // M002 gets flat readings; M001 gets varied ones, interleaved.
        for i in 0..5 {
            assert!(detector.observe("M001", 70.0 + i as f64).is_none());
            let event = detector.observe("M002", 80.0);
            if i < 4 {
                assert!(event.is_none());
            } else {
                assert_eq!(event.unwrap().machine_id, "M002");
            }
        }

        assert_eq!(detector.tracked_machines(), 2);
    }

    #[test]
    fn short_streams_never_trigger() {
        let mut detector = StallDetector::new();

        let events = observe_all(&mut detector, "M001", &[70.0, 70.0, 70.0, 70.0]);
        assert!(events.is_empty());
    }

    #[test]
    fn nan_reading_never_fabricates_a_stall() {
        let mut detector = StallDetector::new();

        let events = observe_all(
            &mut detector,
            "M001",
            &[f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN],
        );
        assert!(events.is_empty());

        // A NaN among flat readings is ignored by min/max, so the
        // remaining flat samples still stall.
        let mut detector = StallDetector::new();
        let events = observe_all(&mut detector, "M001", &[70.0, 70.0, f64::NAN, 70.0, 70.0]);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn stall_keeps_firing_while_window_stays_flat() {
        let mut detector = StallDetector::new();

        let events = observe_all(&mut detector, "M001", &[70.0; 7]);
        // Fires on the 5th, 6th, and 7th observations.
        assert_eq!(events.len(), 3);
    }
}
