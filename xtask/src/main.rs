use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for skate-escape")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all checks: fmt, clippy, tests, doc
    Check,
    /// Run cargo fmt --check on all crates
    Fmt,
    /// Run clippy on all crates
    Clippy,
    /// Run all tests
    Test,
    /// Build rustdoc for the workspace
    Doc,
    /// Build the entire workspace
    Build,
    /// Smoke-test the headless runner: a scripted run plus a replay check
    Sim {
        #[arg(short, long, default_value = "1200")]
        frames: u64,
        #[arg(short, long, default_value = "7")]
        seed: u64,
    },
}

const FMT: &[&str] = &["fmt", "--all", "--", "--check"];
const CLIPPY: &[&str] = &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"];
const TEST: &[&str] = &["test", "--workspace"];
const DOC: &[&str] = &["doc", "--workspace", "--no-deps"];
const BUILD: &[&str] = &["build", "--workspace"];

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            for args in [FMT, CLIPPY, TEST, DOC] {
                cargo(args)?;
            }
        }
        Commands::Fmt => cargo(FMT)?,
        Commands::Clippy => cargo(CLIPPY)?,
        Commands::Test => cargo(TEST)?,
        Commands::Doc => cargo(DOC)?,
        Commands::Build => cargo(BUILD)?,
        Commands::Sim { frames, seed } => {
            let frames = frames.to_string();
            let seed = seed.to_string();
            cargo(&[
                "run", "-p", "skate-cli", "--", "run", "--frames", &frames, "--seed", &seed, "--script",
                "250:left,320:jump,400:right,480:right,560:jump", "--render-last",
            ])?;
            cargo(&["run", "-p", "skate-cli", "--", "replay", "--frames", &frames, "--seed", &seed])?;
        }
    }

    Ok(())
}

fn cargo(args: &[&str]) -> Result<()> {
    println!("==> cargo {}", args.join(" "));
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("cargo {} failed", args[0]);
    }
    Ok(())
}
