use anyhow::Result;
use clap::Parser;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};
use itertools::Itertools;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use unicode_width::UnicodeWidthStr;
use wishing_aura::config::AuraConfig;
use wishing_aura::particles::{DrawCommand, ParticleField, ParticleStyle, Viewport};
use wishing_aura::sequence::{Intensity, PhaseSequencer, TextEffect, VisualParams};
use wishing_aura::theme::{self, hsl_to_rgb, ColorPair, Hsl, Rgb};

/// Terminal preview of the WishingAura greeting visuals: derives the
/// background gradient from the recipient name, runs the phase schedule, and
/// renders the particle field with half-block cells.
#[derive(Parser)]
#[command(name = "preview")]
struct Cli {
    /// Recipient name used to derive the background gradient
    #[arg(short, long)]
    seed: Option<String>,

    /// Options file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pin the particle style instead of following the phase schedule
    #[arg(long)]
    style: Option<ParticleStyle>,

    /// Fixed particle count instead of intensity-driven counts
    #[arg(long)]
    count: Option<usize>,

    /// Fixed rng seed for a reproducible field
    #[arg(long)]
    rng_seed: Option<u64>,

    /// Target frames per second
    #[arg(long, default_value_t = 30)]
    fps: u32,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => AuraConfig::load(path)?,
        None => AuraConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(style) = cli.style {
        config.particles.style = Some(style);
    }
    if let Some(count) = cli.count {
        config.particles.count = Some(count);
    }
    if let Some(rng_seed) = cli.rng_seed {
        config.particles.rng_seed = Some(rng_seed);
    }
    let schedule = config.schedule()?;

    let pair = theme::derive_color_pair(&config.seed);
    eprintln!("[preview] gradient for {:?}: {} -> {}", config.seed, pair.primary, pair.secondary);

    let mut out = io::stdout();
    terminal::enable_raw_mode()?;
    execute!(out, EnterAlternateScreen, Hide)?;
    let result = run(&mut out, &config, schedule, pair, cli.fps);
    execute!(out, Show, LeaveAlternateScreen, ResetColor)?;
    terminal::disable_raw_mode()?;
    result
}

fn run(
    out: &mut impl Write,
    config: &AuraConfig,
    schedule: wishing_aura::Schedule,
    pair: ColorPair,
    fps: u32,
) -> Result<()> {
    let (cols, rows) = terminal::size()?;
    let mut viewport = Viewport::new(f32::from(cols), f32::from(rows) * 2.0);
    let mut rng = match config.particles.rng_seed {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    };

    let mut sequencer = PhaseSequencer::new(schedule).with_start_delay(config.start_delay());
    sequencer.start();
    let mut field = build_field(config, sequencer.visuals(), viewport, &mut rng);
    let mut effect_since = Instant::now();

    let frame_budget = Duration::from_secs(1) / fps.max(1);
    let mut last_tick = Instant::now();

    loop {
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) => {
                    let ctrl_c = key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL);
                    if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) || ctrl_c {
                        return Ok(());
                    }
                }
                Event::Resize(new_cols, new_rows) => {
                    viewport = Viewport::new(f32::from(new_cols), f32::from(new_rows) * 2.0);
                    field.set_viewport(viewport);
                }
                _ => {}
            }
        }

        let now = Instant::now();
        let mut changes = sequencer.poll_at(now);
        if sequencer.is_finished() {
            // The schedule's trailing entry reset the cycle; rearm it so the
            // preview keeps breathing.
            changes.extend(sequencer.start_at(now));
        }
        if changes.last().is_some() {
            field = build_field(config, sequencer.visuals(), viewport, &mut rng);
            effect_since = now;
        }

        field.step(now - last_tick);
        last_tick = now;

        draw_frame(out, pair, &field, sequencer.visuals(), &config.seed, effect_since)?;

        let spent = now.elapsed();
        if spent < frame_budget {
            std::thread::sleep(frame_budget - spent);
        }
    }
}

fn build_field(
    config: &AuraConfig,
    visuals: &VisualParams,
    viewport: Viewport,
    rng: &mut fastrand::Rng,
) -> ParticleField {
    let style = config.particles.style.unwrap_or(visuals.particle_style);
    let count = config.particles.count.unwrap_or_else(|| visuals.particle_intensity.particle_count());
    ParticleField::new(style, count, viewport, rng)
}

fn draw_frame(
    out: &mut impl Write,
    pair: ColorPair,
    field: &ParticleField,
    visuals: &VisualParams,
    seed: &str,
    effect_since: Instant,
) -> Result<()> {
    let viewport = field.viewport();
    let (width, height) = (viewport.width as usize, viewport.height as usize);
    if width == 0 || height < 2 {
        return Ok(());
    }

    let mut buffer = background(pair, visuals.light_intensity, width, height);
    for command in field.render() {
        rasterize(&mut buffer, width, height, &command);
    }

    for row in 0..(height / 2) as u16 {
        queue!(out, MoveTo(0, row))?;
        for col in 0..width {
            let top = buffer[usize::from(row) * 2 * width + col];
            let bottom = buffer[(usize::from(row) * 2 + 1) * width + col];
            queue!(
                out,
                SetForegroundColor(Color::Rgb { r: top.r, g: top.g, b: top.b }),
                SetBackgroundColor(Color::Rgb { r: bottom.r, g: bottom.g, b: bottom.b }),
                Print('▀')
            )?;
        }
    }

    overlay_greeting(out, &buffer, width, height, visuals, seed, effect_since)?;
    out.flush()?;
    Ok(())
}

/// Vertical gradient between the derived pair, brightened by the light layer.
fn background(pair: ColorPair, light: Intensity, width: usize, height: usize) -> Vec<Rgb> {
    let boost = match light {
        Intensity::Low => 0,
        Intensity::Medium => 4,
        Intensity::High => 8,
    };
    let mut buffer = Vec::with_capacity(width * height);
    for y in 0..height {
        let sample = pair.lerp(y as f32 / height.max(1) as f32);
        let lit = Hsl::new(sample.hue, sample.saturation, (sample.lightness + boost).min(100));
        let rgb = lit.to_rgb();
        buffer.extend(std::iter::repeat(rgb).take(width));
    }
    buffer
}

fn rasterize(buffer: &mut [Rgb], width: usize, height: usize, command: &DrawCommand) {
    match command {
        DrawCommand::Circle { x, y, radius, color, opacity, blur } => {
            let reach = radius + blur;
            let (min_x, max_x) = ((x - reach).floor() as i32, (x + reach).ceil() as i32);
            let (min_y, max_y) = ((y - reach).floor() as i32, (y + reach).ceil() as i32);
            for py in min_y..=max_y {
                for px in min_x..=max_x {
                    let dx = px as f32 + 0.5 - x;
                    let dy = py as f32 + 0.5 - y;
                    let dist = (dx * dx + dy * dy).sqrt();
                    let alpha = if dist <= *radius {
                        *opacity
                    } else if dist <= reach {
                        opacity * (1.0 - (dist - radius) / blur.max(0.001))
                    } else {
                        continue;
                    };
                    plot(buffer, width, height, px, py, *color, alpha);
                }
            }
        }
        DrawCommand::Line { length, thickness, color, opacity, .. } => {
            if let Some(((x0, y0), (x1, y1))) = command.line_endpoints() {
                stroke(buffer, width, height, (x0, y0), (x1, y1), *length, *thickness, *color, *opacity);
            }
        }
        DrawCommand::Polygon { color, opacity, .. } => {
            for (a, b) in command.polygon_vertices().iter().circular_tuple_windows() {
                let length = ((b.0 - a.0).powi(2) + (b.1 - a.1).powi(2)).sqrt();
                stroke(buffer, width, height, *a, *b, length, 1.0, *color, *opacity);
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn stroke(
    buffer: &mut [Rgb],
    width: usize,
    height: usize,
    from: (f32, f32),
    to: (f32, f32),
    length: f32,
    thickness: f32,
    color: Rgb,
    opacity: f32,
) {
    let steps = (length.ceil() as usize * 2).max(1);
    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        let x = from.0 + (to.0 - from.0) * t;
        let y = from.1 + (to.1 - from.1) * t;
        plot(buffer, width, height, x as i32, y as i32, color, opacity);
        if thickness > 1.5 {
            plot(buffer, width, height, x as i32, y as i32 + 1, color, opacity * 0.6);
        }
    }
}

fn plot(buffer: &mut [Rgb], width: usize, height: usize, x: i32, y: i32, color: Rgb, alpha: f32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= width || y >= height {
        return;
    }
    let dst = &mut buffer[y * width + x];
    *dst = blend(*dst, color, alpha.clamp(0.0, 1.0));
}

fn blend(dst: Rgb, src: Rgb, alpha: f32) -> Rgb {
    let mix = |d: u8, s: u8| (f32::from(d) + (f32::from(s) - f32::from(d)) * alpha) as u8;
    Rgb::new(mix(dst.r, src.r), mix(dst.g, src.g), mix(dst.b, src.b))
}

fn overlay_greeting(
    out: &mut impl Write,
    buffer: &[Rgb],
    width: usize,
    height: usize,
    visuals: &VisualParams,
    seed: &str,
    effect_since: Instant,
) -> Result<()> {
    let message = if seed.is_empty() {
        "Happy Birthday!".to_string()
    } else {
        format!("Happy Birthday, {seed}!")
    };
    let message_width = message.as_str().width();
    if message_width >= width {
        return Ok(());
    }
    let col = (width - message_width) / 2;
    let mid_row = (height / 2 / 2) as u16;
    let elapsed = effect_since.elapsed().as_secs_f32();

    let row = match visuals.text_effect {
        // Text rises from below over the first half second of the phase.
        TextEffect::SlideUp => {
            let lift = (3.0 * (1.0 - (elapsed * 2.0).min(1.0))) as u16;
            (mid_row + lift).min((height / 2).saturating_sub(1) as u16)
        }
        _ => mid_row,
    };

    queue!(out, MoveTo(col as u16, row))?;
    let total = message.chars().count();
    for (index, ch) in message.chars().enumerate() {
        let fg = match visuals.text_effect {
            TextEffect::Fade => {
                let t = elapsed.min(1.0);
                hsl_to_rgb(0.0, 0.0, 40.0 + 60.0 * t)
            }
            TextEffect::Glow => {
                let lightness = 75.0 + 20.0 * (elapsed * 2.0).sin();
                hsl_to_rgb(0.0, 0.0, lightness.clamp(55.0, 95.0))
            }
            TextEffect::Rainbow => theme::rainbow_color(index, total),
            TextEffect::SlideUp => hsl_to_rgb(0.0, 0.0, 95.0),
        };
        let cell = usize::from(row) * 2 * width + (col + index).min(width - 1);
        let bg = buffer[cell];
        queue!(
            out,
            SetForegroundColor(Color::Rgb { r: fg.r, g: fg.g, b: fg.b }),
            SetBackgroundColor(Color::Rgb { r: bg.r, g: bg.g, b: bg.b }),
            Print(ch)
        )?;
    }
    Ok(())
}
