use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use skate_common::{FrameInput, GameConfig, Side};
use skate_input::{Action, InputLatch, InputScript, KeyBindings};
use skate_kernel::GameState;
use skate_render::{
    DebugTextRenderer, DrawCommand, RecordingPresentation, RenderView, Renderer, build_draw_list, emit_frame, present,
};
use skate_tools::{FrameTimer, GameInspector};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "skate-cli", about = "Headless runner for the skate game")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Simulate a run and print the outcome
    Run {
        /// Number of frames to simulate
        #[arg(short, long, default_value = "600")]
        frames: u64,
        /// RNG seed for spawn choices
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// Fixed frame delta in seconds
        #[arg(long, default_value = "0.016666668")]
        dt: f32,
        /// YAML or JSON game config
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Scripted input, e.g. "250:jump,300:left,900:restart"
        #[arg(long)]
        script: Option<String>,
        /// Print a text dump of the final frame
        #[arg(long)]
        render_last: bool,
    },
    /// Run the same seed twice and compare state hashes
    Replay {
        #[arg(short, long, default_value = "600")]
        frames: u64,
        #[arg(short, long, default_value = "42")]
        seed: u64,
    },
    /// Print the default config
    Config {
        #[arg(long, value_enum, default_value_t = Format::Yaml)]
        format: Format,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Yaml,
    Json,
}

const REPLAY_DT: f32 = 1.0 / 60.0;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    match cli.command {
        Commands::Info => {
            println!("skate-cli v{}", env!("CARGO_PKG_VERSION"));
            let config = GameConfig::default();
            let game = GameState::new(config.clone(), 0);
            println!(
                "pools: obstacles={} buildings={}+{}",
                game.obstacles().len(),
                game.buildings(Side::Left).len(),
                game.buildings(Side::Right).len()
            );
            println!(
                "speed: {} -> {} (+{}/frame)",
                config.speed.initial, config.speed.cap, config.speed.ramp_per_frame
            );
            println!(
                "grace: opening={}s restart={}s",
                config.timing.opening_grace, config.timing.restart_grace
            );
            println!("draw commands per frame: {}", build_draw_list(&game).len());
            let bindings = KeyBindings::default();
            for action in Action::ALL {
                let keys: Vec<String> = bindings.keys_for(action).iter().map(char::to_string).collect();
                println!("  {:<8} {}", action.name(), keys.join(", "));
            }
        }
        Commands::Run {
            frames,
            seed,
            dt,
            config,
            script,
            render_last,
        } => {
            anyhow::ensure!(dt > 0.0 && dt.is_finite(), "--dt must be a positive number, got {dt}");
            let config = match config {
                Some(path) => GameConfig::load(&path)
                    .inspect_err(|err| tracing::warn!(path = %path.display(), %err, "config rejected"))
                    .with_context(|| format!("loading {}", path.display()))?,
                None => GameConfig::default(),
            };
            let script: InputScript = match script {
                Some(text) => text.parse().context("parsing --script")?,
                None => InputScript::new(),
            };
            run(config, seed, frames, dt, &script, render_last);
        }
        Commands::Replay { frames, seed } => {
            println!("Deterministic replay: seed={seed}, frames={frames}");
            let script = demo_script(frames);
            let first = simulate(seed, frames, &script);
            let second = simulate(seed, frames, &script);
            println!(
                "Run 1: tick={} distance={}m hash={:#018x}",
                first.tick(),
                first.display_score(),
                first.state_hash()
            );
            println!(
                "Run 2: tick={} distance={}m hash={:#018x}",
                second.tick(),
                second.display_score(),
                second.state_hash()
            );
            let matched = first.state_hash() == second.state_hash();
            println!("Match: {}", if matched { "OK" } else { "MISMATCH" });
            anyhow::ensure!(matched, "replay diverged");
        }
        Commands::Config { format } => {
            let config = GameConfig::default();
            let text = match format {
                Format::Yaml => config.to_yaml_string()?,
                Format::Json => config.to_json_string()?,
            };
            println!("{text}");
        }
    }

    Ok(())
}

fn run(config: GameConfig, seed: u64, frames: u64, dt: f32, script: &InputScript, render_last: bool) {
    let _span = tracing::info_span!("run", seed, frames).entered();
    let mut game = GameState::new(config, seed);
    let mut latch = InputLatch::new();
    let mut presentation = RecordingPresentation::default();
    let mut timer = FrameTimer::default();
    let mut draw_list: Vec<DrawCommand> = Vec::new();

    for frame in 0..frames {
        for action in script.actions_at(frame) {
            latch.press(action);
        }
        let start = Instant::now();
        let report = game.update(dt, latch.take());
        present(&game, &report, &mut presentation);
        draw_list.clear();
        emit_frame(&game, &mut draw_list);
        timer.record(start.elapsed());
    }

    println!("{}", GameInspector::summary(&game));
    match presentation.game_over {
        Some(distance) => println!("Game over at {distance}m"),
        None => println!("Distance: {}m", presentation.score.unwrap_or(0)),
    }
    if let (Some(avg), Some(max)) = (timer.average(), timer.max()) {
        println!("Frame time: avg={avg:?} max={max:?} over {} frames", timer.count());
    }
    println!("State hash: {:#018x}", game.state_hash());

    if render_last {
        print!("{}", DebugTextRenderer::new().render(&game, &RenderView::default()));
    }
}

/// Dodge pattern used by `replay` so both runs exercise every input path.
fn demo_script(frames: u64) -> InputScript {
    let mut script = InputScript::new();
    let mut frame = 0;
    for (i, action) in [Action::Left, Action::Jump, Action::Right, Action::Right, Action::Jump, Action::Left]
        .iter()
        .cycle()
        .enumerate()
    {
        frame += 40 + (i as u64 % 3) * 15;
        if frame >= frames {
            break;
        }
        script.push(frame, *action);
    }
    if frames > 2 {
        script.push(frames * 2 / 3, Action::Restart);
    }
    script
}

fn simulate(seed: u64, frames: u64, script: &InputScript) -> GameState {
    let mut game = GameState::new(GameConfig::default(), seed);
    for frame in 0..frames {
        let input: FrameInput = script.input_at(frame);
        game.update(REPLAY_DT, input);
    }
    game
}
