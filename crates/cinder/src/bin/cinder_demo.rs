//! # Cinder Demo
//!
//! Runs the sprite scene headless for a fixed number of frames and prints
//! what the renderer would have received.
//!
//! ## Usage
//!
//! ```bash
//! cinder_demo --config crates/cinder/config/cinder.toml --frames 600
//! ```

use std::process::ExitCode;
use std::time::Instant;

use cinder::components::CameraController;
use cinder::scene::{spawn_camera, sprite_modes, SpriteGrid};
use cinder::{build_sprite_batch, systems_update, CinderConfig, CinderResult, Ecs, FrameClock};

fn main() -> ExitCode {
    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║         CINDER DEMO                                              ║");
    println!("║         HEADLESS SPRITE SCENE                                    ║");
    println!("╚══════════════════════════════════════════════════════════════════╝");
    println!();

    // Parse command line arguments (simple parsing, no external deps)
    let args: Vec<String> = std::env::args().collect();
    let mut config_path: Option<String> = None;
    let mut frames: Option<u64> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--frames" | "-f" => {
                if i + 1 < args.len() {
                    frames = args[i + 1].parse().ok();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Usage: cinder_demo [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --config <PATH>    TOML configuration (default: built-in)");
                println!("  -f, --frames <N>       Frames to simulate (overrides the config)");
                println!("  -h, --help             Show this help");
                return ExitCode::SUCCESS;
            }
            _ => {}
        }
        i += 1;
    }

    let config = match config_path {
        Some(path) => match CinderConfig::load(&path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("error: {err}");
                return ExitCode::FAILURE;
            }
        },
        None => CinderConfig::default(),
    };

    match run(config, frames) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn run(mut config: CinderConfig, frames: Option<u64>) -> CinderResult<()> {
    if let Some(frames) = frames {
        config.scene.frames = frames;
    }
    let scene = &config.scene;

    println!("┌─ CONFIGURATION ─────────────────────────────────────────────────┐");
    println!("│ Max Entities:       {}", config.ecs.max_entities);
    println!("│ Frame Arena:        {} bytes", config.ecs.frame_arena_bytes);
    println!("│ Sprites:            {}", scene.sprites);
    println!("│ Frames:             {}", scene.frames);
    println!("│ Step:               {:.4}s", scene.delta_seconds);
    println!("└──────────────────────────────────────────────────────────────────┘");
    println!();

    let mut ecs = Ecs::new(&config.ecs)?;
    let camera = spawn_camera(&mut ecs)?;
    let mut grid = SpriteGrid::new(scene);
    grid.fill(&mut ecs, scene)?;

    let mut clock = FrameClock::new();
    let mut respawned = 0usize;
    let mut drawn = 0usize;
    let mut peak_arena = 0usize;
    let start = Instant::now();

    for _ in 0..scene.frames {
        let frame = ecs.begin_frame();
        let time = clock.tick(frame, scene.delta_seconds);

        // Slow pan while drifting forward.
        if let Some(controller) = ecs.get_component_mut::<CameraController>(camera) {
            controller.look_input = [2.0, 0.0];
            controller.move_input = [0.0, 0.0, -0.2];
        }

        systems_update(&mut ecs, &time)?;
        let batch = build_sprite_batch(&mut ecs)?;
        drawn += batch.instances(&ecs)?.len();
        peak_arena = peak_arena.max(ecs.frame_arena().used());

        respawned += grid.fill(&mut ecs, scene)?;
    }

    let elapsed = start.elapsed();
    let frame_count = scene.frames.max(1) as f64;
    let [spherical, cylindrical, fixed] = sprite_modes(ecs.components());

    println!("┌─ RESULTS ────────────────────────────────────────────────────────┐");
    println!("│ Frames:             {}", ecs.frame());
    println!("│ Live Entities:      {}", ecs.live_count());
    println!("│ Sprites:            {spherical} spherical, {cylindrical} cylindrical, {fixed} fixed");
    println!("│ Instances Drawn:    {drawn}");
    println!("│ Respawned:          {respawned}");
    println!("│ Peak Arena Use:     {peak_arena} bytes");
    println!(
        "│ Avg Frame Time:     {:.2} μs",
        elapsed.as_secs_f64() * 1_000_000.0 / frame_count
    );
    println!("├─ STORAGE ────────────────────────────────────────────────────────┤");
    ecs.component_usage(|component, len, max_count| {
        println!("│ {component:<20}{len} / {max_count}");
    });
    println!("└──────────────────────────────────────────────────────────────────┘");

    ecs.destroy();
    Ok(())
}
