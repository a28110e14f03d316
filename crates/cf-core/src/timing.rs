//! Lightweight wall-clock accounting per lifecycle phase.
//!
//! Each composite model owns one [`PhaseClocks`]; nothing here is global.

use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    Instantiation,
    Initialization,
    Simulation,
    Communication,
    Results,
    Termination,
}

impl Phase {
    pub const ALL: [Phase; 6] = [
        Phase::Instantiation,
        Phase::Initialization,
        Phase::Simulation,
        Phase::Communication,
        Phase::Results,
        Phase::Termination,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Phase::Instantiation => "instantiation",
            Phase::Initialization => "initialization",
            Phase::Simulation => "simulation",
            Phase::Communication => "communication",
            Phase::Results => "result file",
            Phase::Termination => "termination",
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct Accumulator {
    total: Duration,
    count: u64,
}

/// Accumulating timers, one per [`Phase`].
#[derive(Clone, Debug, Default)]
pub struct PhaseClocks {
    slots: [Accumulator; 6],
}

/// Started measurement; hand it back to [`PhaseClocks::stop`].
#[must_use]
pub struct Timer {
    phase: Phase,
    start: Instant,
}

impl PhaseClocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(phase: Phase) -> Timer {
        Timer {
            phase,
            start: Instant::now(),
        }
    }

    pub fn stop(&mut self, timer: Timer) {
        self.record(timer.phase, timer.start.elapsed());
    }

    pub fn record(&mut self, phase: Phase, elapsed: Duration) {
        let slot = &mut self.slots[phase.slot()];
        slot.total += elapsed;
        slot.count += 1;
    }

    /// Total time spent in `phase` (in seconds).
    pub fn total_seconds(&self, phase: Phase) -> f64 {
        self.slots[phase.slot()].total.as_secs_f64()
    }

    pub fn count(&self, phase: Phase) -> u64 {
        self.slots[phase.slot()].count
    }

    pub fn reset(&mut self) {
        self.slots = Default::default();
    }

    /// One line per phase that was entered at least once.
    pub fn summary(&self) -> Vec<String> {
        Phase::ALL
            .iter()
            .filter(|p| self.count(**p) > 0)
            .map(|p| {
                format!(
                    "{}: {:.6}s ({} calls)",
                    p.label(),
                    self.total_seconds(*p),
                    self.count(*p)
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_per_phase() {
        let mut clocks = PhaseClocks::new();
        clocks.record(Phase::Simulation, Duration::from_millis(2));
        clocks.record(Phase::Simulation, Duration::from_millis(3));
        clocks.record(Phase::Results, Duration::from_millis(1));

        assert_eq!(clocks.count(Phase::Simulation), 2);
        assert!((clocks.total_seconds(Phase::Simulation) - 0.005).abs() < 1e-12);
        assert_eq!(clocks.count(Phase::Initialization), 0);
        assert_eq!(clocks.summary().len(), 2);

        clocks.reset();
        assert_eq!(clocks.count(Phase::Simulation), 0);
    }

    #[test]
    fn timer_records_once() {
        let mut clocks = PhaseClocks::new();
        let t = PhaseClocks::start(Phase::Termination);
        clocks.stop(t);
        assert_eq!(clocks.count(Phase::Termination), 1);
    }
}
