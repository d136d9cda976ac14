//! Ready Up - Entry Point
//!
//! Interactive terminal tracker. Reads one command per line, applies it to
//! the tracker and redraws the turn order.

use ready_up::command::{parse_command, Outcome, Session, HELP};
use ready_up::core::config::load_rules;
use ready_up::core::error::Result;
use ready_up::{RulesConfig, Tracker};

use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Ready-up initiative tracker
#[derive(Parser, Debug)]
#[command(name = "ready-up")]
#[command(about = "Initiative tracker where initiative is spent to act and replenished each round")]
struct Args {
    /// Rules file (TOML); missing keys use the defaults
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Random seed for deterministic dice
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ready_up=info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let rules = match &args.rules {
        Some(path) => load_rules(path)?,
        None => RulesConfig::default(),
    };
    let tracker = match args.seed {
        Some(seed) => Tracker::with_seed(rules, seed)?,
        None => Tracker::new(rules)?,
    };
    let mut session = Session::new(tracker);

    println!("\n=== READY UP INITIATIVE TRACKER ===");
    println!("Type 'help' for commands.");
    println!();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("[round {}]> ", session.tracker().round());
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{}", message);
                continue;
            }
        };

        match session.execute(command) {
            Outcome::Updated(message) => {
                println!("{}", message);
                display_status(&session);
            }
            Outcome::Rejected(message) => println!("✗ {}", message),
            Outcome::ShowStatus => display_status(&session),
            Outcome::ShowHistory => display_history(session.tracker()),
            Outcome::ShowJson => println!("{}", session.tracker().snapshot().to_json()?),
            Outcome::ShowHelp => println!("{}", HELP),
            Outcome::ConfirmReset => {
                print!("Are you sure you want to reset the tracker? This will remove all combatants. [y/N] ");
                io::stdout().flush()?;
                let answer = match lines.next() {
                    Some(answer) => answer?,
                    None => String::new(),
                };
                if matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") {
                    session.reset_confirmed();
                    println!("Tracker reset.");
                } else {
                    println!("Reset cancelled.");
                }
            }
            Outcome::Quit => break,
        }
    }

    println!(
        "\nGoodbye! Ended in round {} with {} combatants.",
        session.tracker().round(),
        session.tracker().len()
    );
    Ok(())
}

/// Turn order with status badges
fn display_status(session: &Session) {
    let tracker = session.tracker();
    println!();
    let interrupting = if tracker.interrupt_mode() {
        format!("[INTERRUPTING +{}] ", tracker.rules().interrupt_surcharge)
    } else {
        String::new()
    };
    println!("--- Round {} {}---", tracker.round(), interrupting);

    if tracker.is_empty() {
        println!("No combatants added yet. Use 'add <name> [dex]'.");
        println!();
        return;
    }

    for (position, combatant) in tracker.turn_order().iter().enumerate() {
        let marker = if session.selected() == Some(combatant.id()) {
            '>'
        } else {
            ' '
        };
        let mut badges = Vec::new();
        if combatant.is_pc() {
            badges.push("PC".to_string());
        }
        if combatant.has_haste() {
            badges.push("Haste".to_string());
        }
        if combatant.exhaustion() > 0 {
            badges.push(format!("Exhaustion {}", combatant.exhaustion()));
        }
        if combatant.has_overexerted() {
            badges.push("Overexerted".to_string());
        }

        println!(
            "{}{:>2}. [{:>2}] {:<20} DEX {:>2} ({}) {}",
            marker,
            position + 1,
            combatant.initiative(),
            combatant.name(),
            combatant.dexterity(),
            combatant.signed_modifier(),
            badges.join(", ")
        );
        if !combatant.notes().is_empty() {
            println!("          {}", combatant.notes());
        }
    }
    println!();
}

fn display_history(tracker: &Tracker) {
    if tracker.history().is_empty() {
        println!("Combat actions will appear here.");
        return;
    }
    for entry in tracker.history().iter() {
        if entry.is_round_boundary() {
            println!();
            println!("{}", entry);
        } else {
            println!("  {}", entry);
        }
    }
}
