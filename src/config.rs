use crate::particles::ParticleStyle;
use crate::sequence::{Intensity, PhaseStep, Schedule, ScheduleError, TextEffect, VisualParams};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Errors that can occur when loading the options file
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error(transparent)]
    InvalidSchedule(#[from] ScheduleError),
}

/// Options file for a greeting page preview. Every field has a default, so an
/// empty file is valid and yields the canonical twelve-second cycle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuraConfig {
    /// Recipient name the background colors are derived from.
    pub seed: String,
    /// Hold-off before the schedule starts, in milliseconds.
    pub start_delay_millis: u64,
    /// Phase schedule; empty means the canonical cycle.
    pub schedule: Vec<PhaseStepConfig>,
    pub particles: ParticleOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseStepConfig {
    pub offset_millis: u64,
    pub phase: usize,
    pub particle_style: ParticleStyle,
    pub particle_intensity: Intensity,
    pub light_intensity: Intensity,
    pub text_effect: TextEffect,
}

impl Default for PhaseStepConfig {
    fn default() -> Self {
        let visuals = VisualParams::default();
        Self {
            offset_millis: 0,
            phase: 0,
            particle_style: visuals.particle_style,
            particle_intensity: visuals.particle_intensity,
            light_intensity: visuals.light_intensity,
            text_effect: visuals.text_effect,
        }
    }
}

impl From<&PhaseStepConfig> for PhaseStep {
    fn from(config: &PhaseStepConfig) -> Self {
        PhaseStep {
            offset: Duration::from_millis(config.offset_millis),
            phase: config.phase,
            visuals: VisualParams {
                particle_style: config.particle_style,
                particle_intensity: config.particle_intensity,
                light_intensity: config.light_intensity,
                text_effect: config.text_effect,
            },
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleOptions {
    /// Fixed style override; when unset the active phase's style is used.
    pub style: Option<ParticleStyle>,
    /// Explicit particle count; when unset the active phase's intensity
    /// decides.
    pub count: Option<usize>,
    /// Fixed rng seed for reproducible fields; when unset the field seeds
    /// from entropy.
    pub rng_seed: Option<u64>,
}

impl AuraConfig {
    /// Load the options file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&contents)?)
    }

    /// Build the validated schedule, falling back to the canonical cycle when
    /// none is configured.
    pub fn schedule(&self) -> Result<Schedule, ConfigError> {
        if self.schedule.is_empty() {
            return Ok(Schedule::canonical());
        }
        Ok(Schedule::new(self.schedule.iter().map(PhaseStep::from).collect())?)
    }

    pub fn start_delay(&self) -> Duration {
        Duration::from_millis(self.start_delay_millis)
    }
}
