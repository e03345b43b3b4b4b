//! Designer script parsing
//!
//! A script is one command per line. Blank lines and lines starting with
//! `#` are skipped.

use thiserror::Error;
use workflow_designer::{NodeType, Position};

/// A single scripted interaction
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Add a node from the palette
    Add(NodeType),
    /// Connect two nodes
    Connect { source: String, target: String },
    /// Click a node
    Select(String),
    /// Clear the selection
    Clear,
    /// Edit a field of the selected node
    Set { field: String, value: String },
    /// Drag a node to a new position
    Move { node_id: String, position: Position },
    /// Delete a node
    Remove(String),
    /// Delete an edge
    Unlink(String),
    /// Print nodes
    Nodes,
    /// Print edges
    Edges,
    /// Print the details panel for the selection
    Fields,
    /// Print the node palette
    Palette,
    /// Run the simulation
    Run,
}

/// Error parsing a script line
#[derive(Debug, Error, PartialEq)]
pub enum ScriptError {
    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("'{command}' expects {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },

    #[error("unknown node type '{0}'")]
    UnknownNodeType(String),

    #[error("invalid coordinate '{0}'")]
    InvalidCoordinate(String),
}

fn missing(command: &'static str, expected: &'static str) -> ScriptError {
    ScriptError::MissingArgument { command, expected }
}

fn coordinate(raw: &str) -> Result<f64, ScriptError> {
    raw.parse()
        .map_err(|_| ScriptError::InvalidCoordinate(raw.to_string()))
}

/// Parse one line
///
/// Returns `Ok(None)` for blank lines and comments.
pub fn parse_line(line: &str) -> Result<Option<Command>, ScriptError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let args: Vec<&str> = rest.split_whitespace().collect();

    let command = match word {
        "add" => {
            let raw = args.first().ok_or_else(|| missing("add", "a node type"))?;
            let node_type = raw
                .parse::<NodeType>()
                .map_err(|_| ScriptError::UnknownNodeType(raw.to_string()))?;
            Command::Add(node_type)
        }
        "connect" => match args.as_slice() {
            [source, target, ..] => Command::Connect {
                source: source.to_string(),
                target: target.to_string(),
            },
            _ => return Err(missing("connect", "a source and a target id")),
        },
        "select" => {
            let id = args.first().ok_or_else(|| missing("select", "a node id"))?;
            Command::Select(id.to_string())
        }
        "clear" => Command::Clear,
        "set" => {
            // The value is the rest of the line and may contain spaces.
            let (field, value) = match rest.split_once(char::is_whitespace) {
                Some((field, value)) => (field, value.trim()),
                None => (rest, ""),
            };
            if field.is_empty() {
                return Err(missing("set", "a field name"));
            }
            Command::Set {
                field: field.to_string(),
                value: value.to_string(),
            }
        }
        "move" => match args.as_slice() {
            [node_id, x, y, ..] => Command::Move {
                node_id: node_id.to_string(),
                position: Position::new(coordinate(x)?, coordinate(y)?),
            },
            _ => return Err(missing("move", "a node id and x y coordinates")),
        },
        "remove" => {
            let id = args.first().ok_or_else(|| missing("remove", "a node id"))?;
            Command::Remove(id.to_string())
        }
        "unlink" => {
            let id = args.first().ok_or_else(|| missing("unlink", "an edge id"))?;
            Command::Unlink(id.to_string())
        }
        "nodes" => Command::Nodes,
        "edges" => Command::Edges,
        "fields" => Command::Fields,
        "palette" => Command::Palette,
        "run" => Command::Run,
        other => return Err(ScriptError::UnknownCommand(other.to_string())),
    };

    Ok(Some(command))
}
