//! This program solves both parts of the marble game puzzle from day 9 of
//! [Advent of Code 2018][aoc]. The rules come either from a file holding the
//! puzzle description, such as
//!
//! ```text
//! 471 players; last marble is worth 72026 points
//! ```
//!
//! or from the `--players` and `--last-marble` flags. The first line of
//! output shows the last removed marble and the high score of the game
//! itself; the second line does the same for a game whose last marble is
//! `--scale` times larger.
//!
//! Set `RUST_LOG=marble_ring=debug` to see a summary of every game on
//! stderr.
//!
//! [aoc]: https://adventofcode.com/2018/day/9

use clap::{ArgGroup, Parser};
use marble_ring::{Game, Rules};
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(about = "Plays the marble game and prints the high scores")]
#[command(group(ArgGroup::new("rules").required(true).args(["input", "players"])))]
struct Args {
    /// A file holding the puzzle description.
    input: Option<PathBuf>,
    /// The number of players.
    #[arg(long, requires = "last_marble")]
    players: Option<usize>,
    /// The number of the last marble.
    #[arg(long)]
    last_marble: Option<u64>,
    /// The factor applied to the last marble in the second part.
    #[arg(long, default_value_t = 100)]
    scale: u64,
    /// Print the circle after every turn of the first part.
    #[arg(long)]
    show: bool,
}

/// Reads `RUST_LOG`, defaulting to `warn`, and logs compactly to stderr.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    let args = Args::parse();

    let rules = match (&args.input, args.players, args.last_marble) {
        (Some(path), _, _) => fs::read_to_string(path)?.parse::<Rules>()?,
        (None, Some(players), Some(last_marble)) => Rules::new(players, last_marble)?,
        _ => unreachable!("clap should require an input file or both flags"),
    };

    let mut game = Game::new(rules);
    if args.show {
        println!("[-] {}", game.ring());
        while let Some(turn) = game.turn()? {
            println!("[{}] {}", turn.player + 1, game.ring());
        }
    }
    println!("{}", game.finish()?);

    let rules = rules.scaled(args.scale)?;
    println!("{}", Game::new(rules).finish()?);
    Ok(())
}
