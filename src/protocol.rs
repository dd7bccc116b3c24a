//! Line-oriented text protocol for driving the engine from a front end.
//!
//! Each request is one line, optionally prefixed with a numeric id. The
//! response starts with `=` on success or `?` on failure, followed by the
//! id if one was given, the payload, and a blank line.
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `protocol_version`
//! - `list_commands`, `known_command <cmd>`
//! - `quit`
//! - `clear_board` - start a new game
//! - `play <action>` - apply an action for the side to move (`e2`, `e3h`, `d5v`)
//! - `genmove` - let the engine choose and apply an action
//! - `showboard` - ASCII rendering of the position
//! - `distance` - both players' shortest distance to goal
//! - `walls` - both players' remaining barrier budget
//! - `difficulty <easy|hard>` - switch strategy
//!
//! ## Example
//!
//! ```ignore
//! use quoridor_rust::protocol::ProtocolEngine;
//! let mut engine = ProtocolEngine::new();
//! engine.run();
//! ```

use std::io::{self, BufRead, Write};

use log::{debug, warn};

use crate::movegen::play;
use crate::pathfind::distance_to_goal;
use crate::position::{Action, PlayerId, PositionState};
use crate::search::{Difficulty, SearchConfig, SearchEngine};
use crate::store::TranspositionStore;

const KNOWN_COMMANDS: &[&str] = &[
    "clear_board",
    "difficulty",
    "distance",
    "genmove",
    "known_command",
    "list_commands",
    "name",
    "play",
    "protocol_version",
    "quit",
    "showboard",
    "version",
    "walls",
];

/// Protocol session: one game plus the engine that plays it.
pub struct ProtocolEngine {
    state: PositionState,
    engine: SearchEngine,
}

impl Default for ProtocolEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ProtocolEngine {
    pub fn new() -> Self {
        Self::with_engine(SearchEngine::default())
    }

    pub fn with_engine(engine: SearchEngine) -> Self {
        Self {
            state: PositionState::new(false),
            engine,
        }
    }

    pub fn state(&self) -> &PositionState {
        &self.state
    }

    /// Hand back the cache so the caller can persist it.
    pub fn into_store(self) -> TranspositionStore {
        self.engine.into_store()
    }

    /// Run the command loop on stdin and stdout until `quit` or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.serve(stdin.lock(), stdout.lock())
    }

    /// Run the command loop over arbitrary streams.
    pub fn serve<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;

            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);

            let parts: Vec<&str> = command_line.split_whitespace().collect();
            if parts.is_empty() {
                continue;
            }

            let command = parts[0].to_lowercase();
            let args = &parts[1..];
            debug!("protocol command: {command} {args:?}");

            let (success, message) = self.execute(&command, args);
            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();

            writeln!(output, "{prefix}{id_str} {message}\n")?;
            output.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Split an optional numeric command id off the front of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .char_indices()
            .find(|(_, c)| !c.is_ascii_digit())
            .map_or(trimmed.len(), |(i, _)| i);

        if end > 0 {
            if let Ok(id) = trimmed[..end].parse::<u32>() {
                return (Some(id), trimmed[end..].trim());
            }
        }
        (None, trimmed)
    }

    /// Execute one command and return (success, response).
    fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "name" => (true, env!("CARGO_PKG_NAME").to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => (true, "1".to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                let Some(name) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let known = KNOWN_COMMANDS.contains(&name.to_lowercase().as_str());
                (true, known.to_string())
            }

            "quit" => (true, String::new()),

            "clear_board" => {
                self.state = PositionState::new(false);
                (true, String::new())
            }

            "play" => {
                let Some(text) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let action: Action = match text.parse() {
                    Ok(a) => a,
                    Err(e) => return (false, e.to_string()),
                };
                if play(&mut self.state, action) {
                    (true, String::new())
                } else {
                    (false, format!("illegal action {action}"))
                }
            }

            "genmove" => {
                if self.state.is_over() {
                    return (false, "game is over".to_string());
                }
                match self.engine.get_action(&self.state) {
                    Some(action) if play(&mut self.state, action) => (true, action.to_string()),
                    Some(action) => {
                        warn!("engine chose illegal action {action}");
                        (false, format!("engine chose illegal action {action}"))
                    }
                    None => (false, "no legal action".to_string()),
                }
            }

            "showboard" => (true, format!("\n{}", self.state)),

            "distance" => {
                let show = |p: PlayerId| {
                    distance_to_goal(&self.state, p).map_or_else(|| "-".to_string(), |d| d.to_string())
                };
                (true, format!("{} {}", show(PlayerId::One), show(PlayerId::Two)))
            }

            "walls" => (
                true,
                format!(
                    "{} {}",
                    self.state.remaining(PlayerId::One),
                    self.state.remaining(PlayerId::Two)
                ),
            ),

            "difficulty" => {
                let difficulty = match args.first().map(|a| a.to_lowercase()).as_deref() {
                    Some("easy") => Difficulty::Easy,
                    Some("hard") => Difficulty::Hard,
                    Some(other) => return (false, format!("unknown difficulty: {other}")),
                    None => {
                        let current = match self.engine.config().difficulty {
                            Difficulty::Easy => "easy",
                            Difficulty::Hard => "hard",
                        };
                        return (true, current.to_string());
                    }
                };
                self.engine.set_difficulty(difficulty);
                (true, String::new())
            }

            _ => (false, format!("unknown command: {command}")),
        }
    }
}

impl From<SearchConfig> for ProtocolEngine {
    fn from(config: SearchConfig) -> Self {
        Self::with_engine(SearchEngine::new(config))
    }
}
