mod script;

use std::fs;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use workflow_designer::{
    DesignerConfig, DesignerEvent, DesignerSession, EventError, EventSink, SimulationOutcome,
};

use script::{parse_line, Command};

/// Drive a workflow designer session from a script
#[derive(Parser)]
#[command(name = "workflow-designer")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Script with one command per line (reads stdin when omitted)
    script: Option<PathBuf>,

    /// Path to a JSON designer configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start with an empty canvas instead of the sample node
    #[arg(long)]
    no_sample: bool,

    /// Print change events as JSON lines on stderr
    #[arg(long)]
    events: bool,
}

/// Writes each event as a JSON line to stderr
struct StderrEventSink;

impl EventSink for StderrEventSink {
    fn send(&self, event: DesignerEvent) -> Result<(), EventError> {
        let line = serde_json::to_string(&event).map_err(|e| EventError::new(e.to_string()))?;
        writeln!(io::stderr(), "{}", line).map_err(|e| EventError::new(e.to_string()))
    }
}

fn load_config(cli: &Cli) -> Result<DesignerConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            DesignerConfig::from_json(&json)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => DesignerConfig::default(),
    };
    if cli.no_sample {
        config.seed_sample_node = false;
    }
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let mut session = DesignerSession::new(config);
    if cli.events {
        session = session.with_event_sink(Arc::new(StderrEventSink));
    }

    let reader: Box<dyn BufRead> = match &cli.script {
        Some(path) => {
            let file = fs::File::open(path)
                .with_context(|| format!("failed to open script {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(io::stdin())),
    };

    let mut out = io::stdout().lock();
    let mut failures = 0usize;
    for (index, line) in reader.lines().enumerate() {
        let line = line.context("failed to read script")?;
        match parse_line(&line) {
            Ok(Some(command)) => execute(&mut session, command, &mut out)?,
            Ok(None) => {}
            Err(e) => {
                failures += 1;
                log::error!("line {}: {}", index + 1, e);
            }
        }
    }

    if failures > 0 {
        log::warn!("{} script line(s) could not be parsed", failures);
    }
    Ok(())
}

fn execute(session: &mut DesignerSession, command: Command, out: &mut impl Write) -> Result<()> {
    match command {
        Command::Add(node_type) => {
            let id = session.add_node(node_type);
            writeln!(out, "added {} node {}", node_type, id)?;
        }
        Command::Connect { source, target } => {
            if !session.connect(&source, &target) {
                log::warn!("connection {} -> {} was not recorded", source, target);
            }
        }
        Command::Select(node_id) => session.node_clicked(&node_id),
        Command::Clear => session.clear_selection(),
        Command::Set { field, value } => {
            if !session.edit_field(&field, value) {
                match session.selected_node() {
                    Some(node) => log::warn!(
                        "'{}' is not a field of {} node '{}'",
                        field,
                        node.type_tag(),
                        node.id
                    ),
                    None => log::warn!("no node selected, '{}' not updated", field),
                }
            }
        }
        Command::Move { node_id, position } => {
            if !session.move_node(&node_id, position) {
                log::warn!("unknown node '{}'", node_id);
            }
        }
        Command::Remove(node_id) => {
            if session.remove_node(&node_id).is_none() {
                log::warn!("unknown node '{}'", node_id);
            }
        }
        Command::Unlink(edge_id) => {
            if session.remove_edge(&edge_id).is_none() {
                log::warn!("unknown edge '{}'", edge_id);
            }
        }
        Command::Nodes => {
            for node in session.nodes() {
                let marker = if session.selected_node_id() == Some(node.id.as_str()) {
                    "*"
                } else {
                    " "
                };
                writeln!(
                    out,
                    "{} {}\t{}\t{}\t({}, {})",
                    marker,
                    node.id,
                    node.type_tag(),
                    node.data.label,
                    node.position.x,
                    node.position.y
                )?;
            }
        }
        Command::Edges => {
            for edge in session.edges() {
                writeln!(out, "{}\t{} -> {}", edge.id, edge.source, edge.target)?;
            }
        }
        Command::Fields => match session.selected_node() {
            None => writeln!(out, "Click a node on the canvas to configure it.")?,
            Some(node) => {
                let node_type = node
                    .node_type()
                    .map(|t| t.as_str())
                    .unwrap_or("unknown");
                writeln!(out, "Node Type: {}", node_type)?;
                for value in session.selected_field_values() {
                    writeln!(out, "{}: {}", value.field.label, value.value)?;
                }
            }
        },
        Command::Palette => {
            for definition in session.palette() {
                writeln!(out, "{}\t{}", definition.node_type, definition.palette_label)?;
            }
        }
        Command::Run => match session.run_simulation() {
            SimulationOutcome::Completed(_) => {
                for line in session.simulation_log() {
                    writeln!(out, "{}", line)?;
                }
            }
            SimulationOutcome::Invalid(_) => {
                writeln!(out, "{}", session.simulation_error().unwrap_or_default())?;
            }
        },
    }
    Ok(())
}
