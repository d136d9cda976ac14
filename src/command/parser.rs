//! Shell command grammar
//!
//! One command per line. `<who>` is a 1-based position in the current turn
//! order, a combatant name (case-insensitive), or `.` for the selection.

use crate::initiative::ActionCost;

/// Reference to a combatant as typed by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Position(usize),
    Name(String),
    Selected,
}

impl Target {
    fn parse(token: &str) -> Self {
        if token == "." {
            return Target::Selected;
        }
        match token.parse::<usize>() {
            Ok(position) => Target::Position(position),
            Err(_) => Target::Name(token.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add {
        name: String,
        dexterity: Option<i32>,
        modifier: Option<i32>,
        is_pc: bool,
    },
    Roll(Target),
    RollAll,
    Act { who: Target, cost: ActionCost },
    Interrupt,
    Adjust { who: Target, delta: i32 },
    Overexert(Target),
    Haste(Target),
    Exhaustion { who: Target, delta: i32 },
    Notes { who: Target, text: String },
    Remove(Target),
    Select(Target),
    Deselect,
    Round,
    History,
    Clear,
    Reset,
    Status,
    Json,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  add <name> [dex] [mod] [pc]   - Add a combatant (mod derives from dex)
  roll <who> / rollall          - Roll initiative
  act <who> <action|cost>       - Spend initiative (action, bonus, reaction, dodge,
                                  interact, 5ft, half, full, double, attack..attack4)
  interrupt                     - Toggle interrupt mode (+2, Reaction/Dodge exempt)
  adjust <who> <delta>          - Nudge initiative
  overexert <who>               - +8 initiative, +1 exhaustion (once per round)
  haste <who>                   - Toggle haste (double round gain)
  exhaustion <who> <delta>      - Adjust exhaustion
  notes <who> <text>            - Replace notes
  remove <who>                  - Remove from combat
  select <who> / deselect       - Choose the combatant '.' refers to
  round / r                     - New round (+8 initiative each)
  history / clear               - Show / clear the combat log
  reset                         - Remove everything (asks first)
  status / s, json              - Show the tracker
  quit / q                      - Exit
<who> is a position in turn order, a name, or '.' for the selection.";

pub fn parse_command(input: &str) -> Result<Command, String> {
    let input = input.trim();
    let (verb, rest) = match input.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (input, ""),
    };
    let args: Vec<&str> = rest.split_whitespace().collect();

    match verb.to_lowercase().as_str() {
        "add" => parse_add(&args),
        "roll" => Ok(Command::Roll(one_target(&args, "roll <who>")?)),
        "rollall" => Ok(Command::RollAll),
        "act" => {
            let [who, cost] = args[..] else {
                return Err("Usage: act <who> <action|cost>".into());
            };
            Ok(Command::Act {
                who: Target::parse(who),
                cost: cost.parse()?,
            })
        }
        "interrupt" | "i" => Ok(Command::Interrupt),
        "adjust" => {
            let (who, delta) = target_and_number(&args, "adjust <who> <delta>")?;
            Ok(Command::Adjust { who, delta })
        }
        "overexert" => Ok(Command::Overexert(one_target(&args, "overexert <who>")?)),
        "haste" => Ok(Command::Haste(one_target(&args, "haste <who>")?)),
        "exhaustion" => {
            let (who, delta) = target_and_number(&args, "exhaustion <who> <delta>")?;
            Ok(Command::Exhaustion { who, delta })
        }
        "notes" => {
            let Some(who) = args.first() else {
                return Err("Usage: notes <who> <text>".into());
            };
            let text = rest[who.len()..].trim().to_string();
            Ok(Command::Notes {
                who: Target::parse(who),
                text,
            })
        }
        "remove" => Ok(Command::Remove(one_target(&args, "remove <who>")?)),
        "select" => Ok(Command::Select(one_target(&args, "select <who>")?)),
        "deselect" => Ok(Command::Deselect),
        "round" | "r" => Ok(Command::Round),
        "history" | "h" => Ok(Command::History),
        "clear" => Ok(Command::Clear),
        "reset" => Ok(Command::Reset),
        "status" | "s" => Ok(Command::Status),
        "json" => Ok(Command::Json),
        "help" | "?" => Ok(Command::Help),
        "quit" | "q" => Ok(Command::Quit),
        "" => Err("Empty command".into()),
        other => Err(format!("Unknown command '{}'. Type 'help'.", other)),
    }
}

/// `add <name words...> [dex] [mod] [pc]`
fn parse_add(args: &[&str]) -> Result<Command, String> {
    let name_len = args
        .iter()
        .position(|a| a.parse::<i32>().is_ok() || a.eq_ignore_ascii_case("pc"))
        .unwrap_or(args.len());
    let name = args[..name_len].join(" ");
    if name.is_empty() {
        return Err("Usage: add <name> [dex] [mod] [pc]".into());
    }

    let mut numbers = Vec::new();
    let mut is_pc = false;
    for arg in &args[name_len..] {
        if arg.eq_ignore_ascii_case("pc") {
            is_pc = true;
        } else {
            numbers.push(
                arg.parse::<i32>()
                    .map_err(|_| format!("Expected a number, got '{}'", arg))?,
            );
        }
    }
    if numbers.len() > 2 {
        return Err("Usage: add <name> [dex] [mod] [pc]".into());
    }

    Ok(Command::Add {
        name,
        dexterity: numbers.first().copied(),
        modifier: numbers.get(1).copied(),
        is_pc,
    })
}

fn one_target(args: &[&str], usage: &str) -> Result<Target, String> {
    match args {
        [who] => Ok(Target::parse(who)),
        _ => Err(format!("Usage: {}", usage)),
    }
}

fn target_and_number(args: &[&str], usage: &str) -> Result<(Target, i32), String> {
    let [who, number] = args else {
        return Err(format!("Usage: {}", usage));
    };
    let number = number
        .parse::<i32>()
        .map_err(|_| format!("Expected a number, got '{}'", number))?;
    Ok((Target::parse(who), number))
}
