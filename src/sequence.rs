use crate::particles::ParticleStyle;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use strum::{Display, EnumString};

/// Coarse intensity level shared by the particle field and the light layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Intensity {
    Low,
    Medium,
    High,
}

impl Intensity {
    /// How many particles this intensity drives in the field.
    pub fn particle_count(self) -> usize {
        match self {
            Intensity::Low => 24,
            Intensity::Medium => 48,
            Intensity::High => 80,
        }
    }
}

/// Text-reveal treatment applied to the greeting line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TextEffect {
    Fade,
    Glow,
    Rainbow,
    SlideUp,
}

/// Everything the rendering layer needs to know about the current phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisualParams {
    pub particle_style: ParticleStyle,
    pub particle_intensity: Intensity,
    pub light_intensity: Intensity,
    pub text_effect: TextEffect,
}

impl Default for VisualParams {
    fn default() -> Self {
        Self {
            particle_style: ParticleStyle::Elegant,
            particle_intensity: Intensity::Low,
            light_intensity: Intensity::Low,
            text_effect: TextEffect::Fade,
        }
    }
}

/// One entry of a phase schedule: at `offset` past start, switch to `phase`
/// with the given visual parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseStep {
    pub offset: Duration,
    pub phase: usize,
    pub visuals: VisualParams,
}

/// Errors that can occur when building a schedule
#[derive(thiserror::Error, Debug)]
pub enum ScheduleError {
    #[error("schedule has no steps")]
    Empty,

    #[error("schedule offsets must not decrease: step {index} at {offset_millis}ms is earlier than its predecessor")]
    NonMonotonic { index: usize, offset_millis: u128 },
}

/// A validated, offset-ordered list of phase steps.
///
/// The schedule is closed: after the last step fires nothing else happens.
/// Cycling is expressed with an explicit trailing reset entry rather than by
/// looping automatically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    steps: Vec<PhaseStep>,
}

impl Schedule {
    pub fn new(steps: Vec<PhaseStep>) -> Result<Self, ScheduleError> {
        if steps.is_empty() {
            return Err(ScheduleError::Empty);
        }
        for (index, pair) in steps.windows(2).enumerate() {
            if pair[1].offset < pair[0].offset {
                return Err(ScheduleError::NonMonotonic {
                    index: index + 1,
                    offset_millis: pair[1].offset.as_millis(),
                });
            }
        }
        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[PhaseStep] {
        &self.steps
    }

    /// The full viewing cycle: a calm opening, two escalations, then a reset
    /// back to the opening after twelve seconds.
    pub fn canonical() -> Self {
        let opening = VisualParams::default();
        let steps = vec![
            PhaseStep { offset: Duration::ZERO, phase: 0, visuals: opening },
            PhaseStep {
                offset: Duration::from_millis(3000),
                phase: 1,
                visuals: VisualParams {
                    particle_style: ParticleStyle::Geometric,
                    particle_intensity: Intensity::Medium,
                    light_intensity: Intensity::Medium,
                    text_effect: TextEffect::Glow,
                },
            },
            PhaseStep {
                offset: Duration::from_millis(6000),
                phase: 2,
                visuals: VisualParams {
                    particle_style: ParticleStyle::Light,
                    particle_intensity: Intensity::High,
                    light_intensity: Intensity::High,
                    text_effect: TextEffect::Rainbow,
                },
            },
            PhaseStep { offset: Duration::from_millis(12000), phase: 0, visuals: opening },
        ];
        Self { steps }
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Self::canonical()
    }
}

/// A phase transition applied by a poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseChange {
    pub phase: usize,
    pub visuals: VisualParams,
}

/// Timer-driven phase state machine for a greeting view.
///
/// One-shot timers are re-expressed as cooperative polling: the host's render
/// loop calls [`PhaseSequencer::poll`] and every step whose offset has elapsed
/// is applied, strictly in schedule order. A sequencer is a plain owned value;
/// dropping it (or calling [`PhaseSequencer::stop`]) cancels everything, so a
/// torn-down view can never observe a late transition.
#[derive(Debug, Clone)]
pub struct PhaseSequencer {
    schedule: Schedule,
    start_delay: Duration,
    started_at: Option<Instant>,
    next_step: usize,
    current_phase: usize,
    visuals: VisualParams,
}

impl PhaseSequencer {
    pub fn new(schedule: Schedule) -> Self {
        Self {
            schedule,
            start_delay: Duration::ZERO,
            started_at: None,
            next_step: 0,
            current_phase: 0,
            visuals: VisualParams::default(),
        }
    }

    /// Hold off the whole schedule by `delay` after start, matching the
    /// brief settle the page applies before animations kick in.
    pub fn with_start_delay(mut self, delay: Duration) -> Self {
        self.start_delay = delay;
        self
    }

    /// Arm the schedule. Steps with a zero offset (and no start delay) apply
    /// immediately. Starting an already-started sequencer restarts it.
    pub fn start(&mut self) -> Vec<PhaseChange> {
        self.start_at(Instant::now())
    }

    pub fn start_at(&mut self, now: Instant) -> Vec<PhaseChange> {
        self.started_at = Some(now);
        self.next_step = 0;
        self.advance_to(now)
    }

    /// Cancel all pending transitions. Idempotent; the current phase freezes
    /// at its last value.
    pub fn stop(&mut self) {
        self.started_at = None;
    }

    /// Apply every step due by now. Returns the transitions applied, in
    /// schedule order. A no-op before `start` or after `stop`.
    pub fn poll(&mut self) -> Vec<PhaseChange> {
        self.poll_at(Instant::now())
    }

    pub fn poll_at(&mut self, now: Instant) -> Vec<PhaseChange> {
        self.advance_to(now)
    }

    pub fn current_phase(&self) -> usize {
        self.current_phase
    }

    pub fn visuals(&self) -> &VisualParams {
        &self.visuals
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some() && self.next_step < self.schedule.steps.len()
    }

    /// True once every step has fired.
    pub fn is_finished(&self) -> bool {
        self.started_at.is_some() && self.next_step >= self.schedule.steps.len()
    }

    fn advance_to(&mut self, now: Instant) -> Vec<PhaseChange> {
        let Some(started_at) = self.started_at else {
            return Vec::new();
        };
        let origin = started_at + self.start_delay;
        let mut changes = Vec::new();
        while let Some(step) = self.schedule.steps.get(self.next_step) {
            let due = origin + step.offset;
            if due > now {
                break;
            }
            self.current_phase = step.phase;
            self.visuals = step.visuals;
            changes.push(PhaseChange { phase: step.phase, visuals: step.visuals });
            self.next_step += 1;
        }
        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(base: Instant, millis: u64) -> Instant {
        base + Duration::from_millis(millis)
    }

    #[test]
    fn start_then_stop_fires_nothing() {
        let base = Instant::now();
        let mut sequencer = PhaseSequencer::new(Schedule::canonical());
        let initial = sequencer.start_at(base);
        // The zero-offset opening step applies at start, nothing else.
        assert_eq!(initial.len(), 1);
        assert_eq!(initial[0].phase, 0);
        sequencer.stop();
        assert!(sequencer.poll_at(at(base, 20_000)).is_empty());
        assert_eq!(sequencer.current_phase(), 0);
    }

    #[test]
    fn canonical_cycle_in_order() {
        let base = Instant::now();
        let mut sequencer = PhaseSequencer::new(Schedule::canonical());
        sequencer.start_at(base);
        assert_eq!(sequencer.current_phase(), 0);

        let mut observed = vec![sequencer.current_phase()];
        for millis in [3000, 6000, 12000] {
            let changes = sequencer.poll_at(at(base, millis));
            assert_eq!(changes.len(), 1, "exactly one transition at {millis}ms");
            observed.push(sequencer.current_phase());
        }
        assert_eq!(observed, vec![0, 1, 2, 0]);
        assert!(sequencer.is_finished());
    }

    #[test]
    fn no_transition_between_offsets() {
        let base = Instant::now();
        let mut sequencer = PhaseSequencer::new(Schedule::canonical());
        sequencer.start_at(base);
        assert!(sequencer.poll_at(at(base, 2999)).is_empty());
        assert_eq!(sequencer.current_phase(), 0);
        assert_eq!(sequencer.poll_at(at(base, 3000)).len(), 1);
        assert_eq!(sequencer.current_phase(), 1);
    }

    #[test]
    fn late_poll_applies_skipped_steps_in_order() {
        let base = Instant::now();
        let mut sequencer = PhaseSequencer::new(Schedule::canonical());
        sequencer.start_at(base);
        let changes = sequencer.poll_at(at(base, 13_000));
        let phases: Vec<_> = changes.iter().map(|c| c.phase).collect();
        assert_eq!(phases, vec![1, 2, 0]);
        assert_eq!(sequencer.current_phase(), 0);
    }

    #[test]
    fn stop_is_idempotent_and_poll_before_start_is_noop() {
        let mut sequencer = PhaseSequencer::new(Schedule::canonical());
        assert!(sequencer.poll_at(Instant::now()).is_empty());
        sequencer.stop();
        sequencer.stop();
        assert!(!sequencer.is_running());
    }

    #[test]
    fn restart_resets_progress() {
        let base = Instant::now();
        let mut sequencer = PhaseSequencer::new(Schedule::canonical());
        sequencer.start_at(base);
        sequencer.poll_at(at(base, 6000));
        assert_eq!(sequencer.current_phase(), 2);

        let restart = at(base, 7000);
        sequencer.start_at(restart);
        assert_eq!(sequencer.current_phase(), 0);
        assert!(sequencer.poll_at(at(base, 8000)).is_empty());
        assert_eq!(sequencer.poll_at(restart + Duration::from_millis(3000)).len(), 1);
        assert_eq!(sequencer.current_phase(), 1);
    }

    #[test]
    fn start_delay_shifts_the_whole_schedule() {
        let base = Instant::now();
        let mut sequencer = PhaseSequencer::new(Schedule::canonical())
            .with_start_delay(Duration::from_millis(400));
        assert!(sequencer.start_at(base).is_empty());
        assert!(sequencer.poll_at(at(base, 399)).is_empty());
        assert_eq!(sequencer.poll_at(at(base, 400)).len(), 1);
        assert_eq!(sequencer.poll_at(at(base, 3400)).len(), 1);
        assert_eq!(sequencer.current_phase(), 1);
    }

    #[test]
    fn schedule_rejects_decreasing_offsets() {
        let step = |millis: u64, phase: usize| PhaseStep {
            offset: Duration::from_millis(millis),
            phase,
            visuals: VisualParams::default(),
        };
        let err = Schedule::new(vec![step(0, 0), step(5000, 1), step(3000, 2)]).unwrap_err();
        assert!(matches!(err, ScheduleError::NonMonotonic { index: 2, .. }));
        assert!(matches!(Schedule::new(vec![]).unwrap_err(), ScheduleError::Empty));
    }

    #[test]
    fn visuals_track_the_active_phase() {
        let base = Instant::now();
        let mut sequencer = PhaseSequencer::new(Schedule::canonical());
        sequencer.start_at(base);
        assert_eq!(sequencer.visuals().text_effect, TextEffect::Fade);
        sequencer.poll_at(at(base, 3000));
        assert_eq!(sequencer.visuals().particle_style, ParticleStyle::Geometric);
        assert_eq!(sequencer.visuals().particle_intensity, Intensity::Medium);
        sequencer.poll_at(at(base, 6000));
        assert_eq!(sequencer.visuals().text_effect, TextEffect::Rainbow);
        assert_eq!(sequencer.visuals().particle_intensity.particle_count(), 80);
    }
}
