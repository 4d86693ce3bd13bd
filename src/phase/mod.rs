// phase/ - Shape state machine
//
// Two transitions are user-driven (debounced trigger), three are timed.
// The machine only decides *which* phase comes next; the simulation runs the
// enter actions and owns the scheduler that fires the timed rows.

mod schedule;

pub use schedule::Scheduler;

use crate::config::Timing;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Floating,
    MorphingToFirstYear,
    Exploding,
    Gathering,
    MorphingToSecondYear,
    Celebrating,
}

impl Phase {
    pub const ALL: [Phase; 6] = [
        Phase::Floating,
        Phase::MorphingToFirstYear,
        Phase::Exploding,
        Phase::Gathering,
        Phase::MorphingToSecondYear,
        Phase::Celebrating,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Phase::Floating => "floating",
            Phase::MorphingToFirstYear => "morphing_to_first_year",
            Phase::Exploding => "exploding",
            Phase::Gathering => "gathering",
            Phase::MorphingToSecondYear => "morphing_to_second_year",
            Phase::Celebrating => "celebrating",
        }
    }

    #[inline]
    pub fn index(self) -> u8 {
        self as u8
    }
}

/// A row of the timed-transition table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedTransition {
    pub from: Phase,
    pub to: Phase,
    pub delay_ms: f64,
}

pub fn timed_transitions(t: &Timing) -> [TimedTransition; 3] {
    [
        TimedTransition { from: Phase::Exploding, to: Phase::Gathering, delay_ms: t.explode_ms },
        TimedTransition { from: Phase::Gathering, to: Phase::MorphingToSecondYear, delay_ms: t.gather_ms },
        TimedTransition { from: Phase::MorphingToSecondYear, to: Phase::Celebrating, delay_ms: t.settle_ms },
    ]
}

pub struct PhaseMachine {
    phase: Phase,
    shown_first: bool,
    shown_second: bool,
    last_trigger: Option<f64>,
    debounce_ms: f64,
    table: [TimedTransition; 3],
}

impl PhaseMachine {
    pub fn new(timing: &Timing) -> Self {
        Self {
            phase: Phase::Floating,
            shown_first: false,
            shown_second: false,
            last_trigger: None,
            debounce_ms: timing.debounce_ms,
            table: timed_transitions(timing),
        }
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Handle a user trigger at `now_ms`. Returns the phase entered, if any.
    ///
    /// Triggers closer than the debounce interval to the previous debounced
    /// trigger are dropped outright. A trigger that passes the debounce but
    /// arrives in a phase with no user transition still restarts the window.
    pub fn trigger(&mut self, now_ms: f64) -> Option<Phase> {
        if let Some(last) = self.last_trigger {
            if now_ms - last < self.debounce_ms {
                return None;
            }
        }
        self.last_trigger = Some(now_ms);

        let next = match self.phase {
            Phase::Floating if !self.shown_first => {
                self.shown_first = true;
                Phase::MorphingToFirstYear
            }
            Phase::MorphingToFirstYear if self.shown_first && !self.shown_second => Phase::Exploding,
            _ => return None,
        };
        self.phase = next;
        Some(next)
    }

    /// The timed row leaving `phase`, if there is one.
    pub fn timed_from(&self, phase: Phase) -> Option<TimedTransition> {
        self.table.iter().copied().find(|t| t.from == phase)
    }

    /// Apply a fired timed row. Stale rows (the machine has moved on) are ignored.
    pub fn fire(&mut self, t: TimedTransition) -> Option<Phase> {
        if self.phase != t.from {
            return None;
        }
        if t.to == Phase::MorphingToSecondYear {
            self.shown_second = true;
        }
        self.phase = t.to;
        Some(t.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine() -> PhaseMachine {
        PhaseMachine::new(&Timing::default())
    }

    #[test]
    fn full_sequence() {
        let mut m = machine();
        assert_eq!(m.trigger(0.0), Some(Phase::MorphingToFirstYear));
        assert_eq!(m.trigger(2000.0), Some(Phase::Exploding));

        let mut seen = vec![Phase::Floating, Phase::MorphingToFirstYear, Phase::Exploding];
        while let Some(t) = m.timed_from(m.phase()) {
            seen.push(m.fire(t).unwrap());
        }
        assert_eq!(seen, Phase::ALL.to_vec());
        assert_eq!(m.phase(), Phase::Celebrating);
        assert!(m.shown_first && m.shown_second);
    }

    #[test]
    fn debounce_collapses_close_triggers() {
        let mut m = machine();
        assert_eq!(m.trigger(100.0), Some(Phase::MorphingToFirstYear));
        assert_eq!(m.trigger(600.0), None);
        assert_eq!(m.phase(), Phase::MorphingToFirstYear);
        assert_eq!(m.trigger(1100.0), Some(Phase::Exploding));
    }

    #[test]
    fn triggers_ignored_while_timers_drive() {
        let mut m = machine();
        m.trigger(0.0);
        m.trigger(5000.0);
        assert_eq!(m.trigger(10_000.0), None);
        assert_eq!(m.phase(), Phase::Exploding);
    }

    #[test]
    fn celebrating_is_terminal() {
        let mut m = machine();
        m.trigger(0.0);
        m.trigger(5000.0);
        while let Some(t) = m.timed_from(m.phase()) {
            m.fire(t);
        }
        for k in 0..10 {
            assert_eq!(m.trigger(10_000.0 + k as f64 * 5000.0), None);
        }
        assert_eq!(m.phase(), Phase::Celebrating);
    }

    #[test]
    fn stale_timer_is_ignored() {
        let mut m = machine();
        let row = m.timed_from(Phase::Gathering).unwrap();
        assert_eq!(m.fire(row), None);
        assert_eq!(m.phase(), Phase::Floating);
    }

    #[test]
    fn table_follows_timing() {
        let t = Timing { explode_ms: 900.0, gather_ms: 500.0, settle_ms: 1300.0, ..Default::default() };
        let rows = timed_transitions(&t);
        assert_eq!(rows[0].delay_ms, 900.0);
        assert_eq!(rows[1].to, Phase::MorphingToSecondYear);
        assert_eq!(rows[2].delay_ms, 1300.0);
    }
}
