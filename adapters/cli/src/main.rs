#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Sokobot levels in the terminal.

mod config;
mod game;
mod store;

use std::{fs, io, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};
use sokobot_core::{ChannelId, LevelId, PlayerId};
use sokobot_session::{GameMode, LevelSource, SessionRegistry};

use crate::{config::CliConfig, game::Frontend, store::LevelStore};

/// Grid puzzle game with pushable boxes, wandering enemies and move budgets.
#[derive(Debug, Parser)]
#[command(name = "sokobot", version)]
struct Cli {
    /// TOML configuration file with `[session]`, `[glyphs]` and `[store]` tables.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Versioned glyph manifest applied before the `[glyphs]` table.
    #[arg(long, global = true)]
    glyphs: Option<PathBuf>,
    /// Emit debug logging.
    #[arg(long, global = true)]
    debug: bool,
    /// Seed for level generation and enemy movement.
    #[arg(long, global = true)]
    seed: Option<u64>,
    /// Identifier of the player at the keyboard.
    #[arg(long, global = true, default_value_t = 1)]
    player: u64,
    /// Identifier of the channel the game is played in.
    #[arg(long, global = true, default_value_t = 1)]
    channel: u64,
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Play a run of generated levels.
    #[command(subcommand)]
    Play(PlayCommand),
    /// Play a level authored by a player.
    #[command(subcommand)]
    Custom(CustomCommand),
    /// Rewrite the saved level store.
    Save,
}

#[derive(Debug, Subcommand)]
enum PlayCommand {
    /// Levels without a move budget.
    #[command(alias = "i")]
    Infinite(PlayArgs),
    /// Levels that must be solved within a move budget.
    #[command(aliases = ["moves", "c"])]
    Challenge(PlayArgs),
}

#[derive(Debug, Args)]
struct PlayArgs {
    /// Level to start from.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    level: u32,
    /// Glyph drawn for the player piece.
    #[arg(long)]
    emoji: Option<String>,
}

#[derive(Debug, Subcommand)]
enum CustomCommand {
    /// Level text given on the command line, one board line per text line.
    Text {
        /// Space separated tile tokens, optionally followed by `moves: N`.
        text: String,
        /// Glyph drawn for the player piece.
        #[arg(long)]
        emoji: Option<String>,
    },
    /// Level text read from a file.
    File {
        /// Path of the level file.
        path: PathBuf,
        /// Glyph drawn for the player piece.
        #[arg(long)]
        emoji: Option<String>,
    },
    /// A level from the saved level store.
    Load {
        /// Player whose saved level to play. Defaults to the current player.
        #[arg(long)]
        owner: Option<u64>,
        /// Glyph drawn for the player piece.
        #[arg(long)]
        emoji: Option<String>,
    },
}

/// Entry point for the Sokobot command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.debug)?;

    let config = CliConfig::load(cli.config.as_deref())?;
    let theme = config.theme(cli.glyphs.as_deref())?;
    let mut store = LevelStore::load(&config.store.path, config.store.flush_interval())?;
    let player = PlayerId::new(cli.player);
    let channel = ChannelId::new(cli.channel);

    let (source, appearance) = match cli.command {
        CliCommand::Save => {
            store.flush()?;
            println!("Saved {} custom levels", store.len());
            return Ok(());
        }
        CliCommand::Play(PlayCommand::Infinite(args)) => generated(args, GameMode::Infinite),
        CliCommand::Play(PlayCommand::Challenge(args)) => generated(args, GameMode::Challenge),
        CliCommand::Custom(CustomCommand::Text { text, emoji }) => {
            info!("[{player}] Submitted new custom level string");
            (LevelSource::CustomText(text), emoji)
        }
        CliCommand::Custom(CustomCommand::File { path, emoji }) => {
            info!("[{player}] Submitted new custom level file");
            let bytes = fs::read(&path)
                .with_context(|| format!("failed to read level file at {}", path.display()))?;
            (LevelSource::CustomFile(bytes), emoji)
        }
        CliCommand::Custom(CustomCommand::Load { owner, emoji }) => {
            let owner = owner.map_or(player, PlayerId::new);
            let Some(level) = store.get(owner) else {
                println!("Cannot find level");
                return Ok(());
            };
            info!("[{player}] Started playing {owner}'s level");
            (LevelSource::Saved(level.to_owned()), emoji)
        }
    };

    let seed = cli.seed.unwrap_or_else(rand::random);
    let registry = SessionRegistry::new(config.session, seed);
    let mut frontend = Frontend::new(registry, store, theme, player, channel);

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout().lock();
    frontend.run(source, appearance, &mut input, &mut output)?;
    frontend.shutdown()
}

fn generated(args: PlayArgs, mode: GameMode) -> (LevelSource, Option<String>) {
    let source = LevelSource::Generated {
        level: LevelId::new(args.level),
        mode,
    };
    (source, args.emoji)
}

fn setup_logging(debug: bool) -> Result<()> {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    TermLogger::init(
        level,
        ConfigBuilder::new()
            .set_target_level(LevelFilter::Error)
            .build(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .context("failed to install terminal logger")
}
