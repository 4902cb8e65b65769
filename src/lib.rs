//! Visual core for WishingAura greeting pages: a deterministic seed-derived
//! background theme, a timed animation phase sequencer, and a decorative
//! particle field simulator.
//!
//! Everything here is plain computation plus cooperative polling. The host
//! view owns the controllers ([`sequence::PhaseSequencer`],
//! [`particles::ParticleField`]) and drops them on teardown; there is no
//! global state, so concurrent previews stay independent.

pub mod config;
pub mod particles;
pub mod sequence;
pub mod theme;

pub use particles::{DrawCommand, ParticleField, ParticleStyle, Viewport};
pub use sequence::{PhaseSequencer, Schedule};
pub use theme::{derive_color_pair, ColorPair};
