use super::{Motif, Particle};
use crate::theme::Rgb;
use std::f32::consts::{FRAC_PI_2, TAU};

/// A drawing primitive handed back to the host surface. Coordinates are in
/// the same units as the field's viewport.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Filled circle, optionally blurred.
    Circle { x: f32, y: f32, radius: f32, color: Rgb, opacity: f32, blur: f32 },
    /// Line segment centered on (x, y), oriented by `rotation` radians.
    Line { x: f32, y: f32, length: f32, rotation: f32, thickness: f32, color: Rgb, opacity: f32 },
    /// Regular polygon centered on (x, y), oriented by `rotation` radians.
    Polygon { x: f32, y: f32, radius: f32, sides: u32, rotation: f32, color: Rgb, opacity: f32 },
}

impl DrawCommand {
    /// Vertices of a polygon command, first vertex pointing "up" before
    /// rotation. Empty for other primitives.
    pub fn polygon_vertices(&self) -> Vec<(f32, f32)> {
        let DrawCommand::Polygon { x, y, radius, sides, rotation, .. } = *self else {
            return Vec::new();
        };
        (0..sides)
            .map(|i| {
                let angle = rotation + TAU * i as f32 / sides as f32 - FRAC_PI_2;
                (x + radius * angle.cos(), y + radius * angle.sin())
            })
            .collect()
    }

    /// Endpoints of a line command. `None` for other primitives.
    pub fn line_endpoints(&self) -> Option<((f32, f32), (f32, f32))> {
        let DrawCommand::Line { x, y, length, rotation, .. } = *self else {
            return None;
        };
        let (dx, dy) = (rotation.cos() * length / 2.0, rotation.sin() * length / 2.0);
        Some(((x - dx, y - dy), (x + dx, y + dy)))
    }
}

pub(super) fn draw_commands(particles: &[Particle]) -> Vec<DrawCommand> {
    particles.iter().map(particle_command).collect()
}

fn particle_command(particle: &Particle) -> DrawCommand {
    let &Particle { x, y, size, color, opacity, .. } = particle;
    match particle.motif {
        Motif::Disc => DrawCommand::Circle { x, y, radius: size, color, opacity, blur: 0.0 },
        Motif::Streak { length, rotation, .. } => DrawCommand::Line {
            x,
            y,
            length,
            rotation,
            thickness: size / 2.0,
            color,
            opacity,
        },
        Motif::Gon { sides, rotation, .. } => DrawCommand::Polygon {
            x,
            y,
            // Triangles get extra reach so all shapes read at similar weight.
            radius: size * if sides == 3 { 2.0 } else { 1.5 },
            sides,
            rotation,
            color,
            opacity,
        },
        Motif::Glow { blur, .. } => DrawCommand::Circle { x, y, radius: size, color, opacity, blur },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particles::{ParticleField, ParticleStyle, Viewport};

    fn commands(style: ParticleStyle) -> Vec<DrawCommand> {
        let mut rng = fastrand::Rng::with_seed(11);
        ParticleField::new(style, 40, Viewport::new(100.0, 100.0), &mut rng).render()
    }

    #[test]
    fn elegant_mixes_circles_and_lines() {
        let commands = commands(ParticleStyle::Elegant);
        let circles = commands.iter().filter(|c| matches!(c, DrawCommand::Circle { .. })).count();
        let lines = commands.iter().filter(|c| matches!(c, DrawCommand::Line { .. })).count();
        assert_eq!(circles + lines, 40);
        assert!(circles > 0 && lines > 0);
        // Elegant circles carry no blur.
        for command in &commands {
            if let DrawCommand::Circle { blur, .. } = command {
                assert_eq!(*blur, 0.0);
            }
        }
    }

    #[test]
    fn geometric_emits_small_gons_only() {
        for command in commands(ParticleStyle::Geometric) {
            let DrawCommand::Polygon { sides, .. } = command else {
                panic!("geometric fields render polygons, got {command:?}");
            };
            assert!((3..=6).contains(&sides));
        }
    }

    #[test]
    fn light_emits_blurred_circles() {
        for command in commands(ParticleStyle::Light) {
            let DrawCommand::Circle { blur, .. } = command else {
                panic!("light fields render circles, got {command:?}");
            };
            assert!(blur >= 2.0 && blur < 7.0);
        }
    }

    #[test]
    fn polygon_vertices_match_side_count() {
        let command = DrawCommand::Polygon {
            x: 10.0,
            y: 10.0,
            radius: 4.0,
            sides: 5,
            rotation: 0.0,
            color: Rgb::new(255, 255, 255),
            opacity: 1.0,
        };
        let vertices = command.polygon_vertices();
        assert_eq!(vertices.len(), 5);
        // First vertex points straight up from the center.
        assert!((vertices[0].0 - 10.0).abs() < 1e-4);
        assert!((vertices[0].1 - 6.0).abs() < 1e-4);
    }

    #[test]
    fn line_endpoints_are_symmetric_about_center() {
        let command = DrawCommand::Line {
            x: 5.0,
            y: 5.0,
            length: 8.0,
            rotation: 0.0,
            thickness: 1.0,
            color: Rgb::new(0, 0, 0),
            opacity: 0.5,
        };
        let ((x0, y0), (x1, y1)) = command.line_endpoints().unwrap();
        assert_eq!((x0, y0), (1.0, 5.0));
        assert_eq!((x1, y1), (9.0, 5.0));
    }
}
