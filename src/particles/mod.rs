mod render;
mod style;

pub use render::DrawCommand;
pub use style::ParticleStyle;

use crate::theme::Rgb;
use std::f32::consts::TAU;
use std::time::Duration;

/// Reference frame length: velocities are expressed per 60 Hz frame, and
/// [`ParticleField::step`] scales by the actual elapsed time so variable tick
/// rates move particles at the same apparent speed.
const REFERENCE_FRAME: Duration = Duration::from_nanos(16_666_667);

/// The drawing surface the field lives in, in whatever units the host uses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// A zero-area viewport turns step and render into no-ops.
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Style-specific animated attributes of a particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motif {
    /// A filled circle.
    Disc,
    /// A rotating line segment.
    Streak { length: f32, rotation: f32, rotation_speed: f32 },
    /// A rotating regular polygon with 3 to 6 sides.
    Gon { sides: u32, rotation: f32, rotation_speed: f32 },
    /// A blurred circle whose size oscillates between two bounds.
    Glow { blur: f32, pulse_speed: f32, growing: bool, min_size: f32, max_size: f32 },
}

/// One decorative particle. Ephemeral: recreated whenever the field is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub color: Rgb,
    pub opacity: f32,
    pub speed_x: f32,
    pub speed_y: f32,
    pub motif: Motif,
}

/// A fixed-count set of decorative particles drifting across a viewport.
///
/// An owned, scoped controller: create one when the view activates, drop it on
/// teardown. Two fields never share state, so concurrent previews stay
/// independent. The caller supplies the rng so initialization is reproducible
/// under a fixed seed.
#[derive(Debug)]
pub struct ParticleField {
    style: ParticleStyle,
    viewport: Viewport,
    particles: Vec<Particle>,
}

impl ParticleField {
    /// Create `count` particles with uniformly random positions, sizes,
    /// palette colors and velocities, plus style-specific motif attributes.
    pub fn new(style: ParticleStyle, count: usize, viewport: Viewport, rng: &mut fastrand::Rng) -> Self {
        let palette = style.palette();
        let particles = (0..count)
            .map(|_| {
                let size = rng.f32() * 5.0 + 1.0;
                let (color, palette_alpha) = palette[rng.usize(0..palette.len())];
                let motif = match style {
                    ParticleStyle::Elegant => {
                        if rng.f32() > 0.7 {
                            Motif::Disc
                        } else {
                            Motif::Streak {
                                length: rng.f32() * 15.0 + 5.0,
                                rotation: rng.f32() * TAU,
                                rotation_speed: rng.f32() * 0.02 - 0.01,
                            }
                        }
                    }
                    ParticleStyle::Geometric => Motif::Gon {
                        sides: rng.u32(3..=6),
                        rotation: rng.f32() * TAU,
                        rotation_speed: rng.f32() * 0.01 - 0.005,
                    },
                    ParticleStyle::Light => {
                        let max_size = size + rng.f32() * 3.0;
                        let min_size = (size - rng.f32() * 2.0).max(1.0);
                        Motif::Glow {
                            blur: rng.f32() * 5.0 + 2.0,
                            pulse_speed: rng.f32() * 0.02 + 0.01,
                            growing: true,
                            min_size,
                            max_size,
                        }
                    }
                };
                Particle {
                    x: rng.f32() * viewport.width.max(0.0),
                    y: rng.f32() * viewport.height.max(0.0),
                    size,
                    color,
                    opacity: (rng.f32() * 0.5 + 0.3) * palette_alpha,
                    speed_x: rng.f32() - 0.5,
                    speed_y: rng.f32() - 0.5,
                    motif,
                }
            })
            .collect();
        Self { style, viewport, particles }
    }

    pub fn style(&self) -> ParticleStyle {
        self.style
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Resize the drawing surface. Particles left out of bounds wrap back in
    /// on the next step.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Advance the simulation by `delta` of wall time: integrate positions,
    /// wrap across viewport edges, spin rotations, and bounce pulse sizes off
    /// their bounds. A no-op on a degenerate viewport.
    pub fn step(&mut self, delta: Duration) {
        if self.viewport.is_degenerate() {
            return;
        }
        let dt = delta.as_secs_f32() / REFERENCE_FRAME.as_secs_f32();
        let (width, height) = (self.viewport.width, self.viewport.height);

        for particle in &mut self.particles {
            particle.x += particle.speed_x * dt;
            particle.y += particle.speed_y * dt;

            // Toroidal wrap: cross an edge, reappear at the opposite one.
            if particle.x > width {
                particle.x = 0.0;
            } else if particle.x < 0.0 {
                particle.x = width;
            }
            if particle.y > height {
                particle.y = 0.0;
            } else if particle.y < 0.0 {
                particle.y = height;
            }

            match &mut particle.motif {
                Motif::Disc => {}
                Motif::Streak { rotation, rotation_speed, .. }
                | Motif::Gon { rotation, rotation_speed, .. } => {
                    *rotation = (*rotation + *rotation_speed * dt).rem_euclid(TAU);
                }
                Motif::Glow { pulse_speed, growing, min_size, max_size, .. } => {
                    if *growing {
                        particle.size += *pulse_speed * dt;
                        if particle.size >= *max_size {
                            *growing = false;
                        }
                    } else {
                        particle.size -= *pulse_speed * dt;
                        if particle.size <= *min_size {
                            *growing = true;
                        }
                    }
                }
            }
        }
    }

    /// Produce the draw primitives for the current state. Pure: the field is
    /// untouched, and identical state yields identical output. Empty on a
    /// degenerate viewport.
    pub fn render(&self) -> Vec<DrawCommand> {
        if self.viewport.is_degenerate() {
            return Vec::new();
        }
        render::draw_commands(&self.particles)
    }
}
