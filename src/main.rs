use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use manual_control_node::config::NodeParams;
use manual_control_node::error::Result;
use manual_control_node::{keyboard, node};

/// Keyboard manual control for a simulated Ackermann vehicle
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// YAML params file
    #[arg(long, global = true)]
    params: Option<PathBuf>,

    /// Topic carrying key presses
    #[arg(long, global = true)]
    keyboard_topic: Option<String>,

    /// Topic drive commands are published on
    #[arg(long, global = true)]
    mux_topic: Option<String>,

    /// Topic carrying the mux enable flags
    #[arg(long, global = true)]
    mux_state_topic: Option<String>,

    /// Keyboard slot in the mux flags
    #[arg(long, global = true)]
    key_mux_idx: Option<usize>,

    /// Speed for W/S in m/s
    #[arg(long, global = true)]
    keyboard_speed: Option<f64>,

    /// Steering angle for A/D in rad
    #[arg(long, global = true, allow_negative_numbers = true)]
    keyboard_steer_angle: Option<f64>,

    /// Frame id stamped on drive commands
    #[arg(long, global = true)]
    frame_id: Option<String>,

    /// Drive without waiting for the mux to select the keyboard
    #[arg(long, global = true)]
    enable_keyboard: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the manual control node (default)
    Node,
    /// Read terminal keys and publish them on the keyboard topic
    Keyboard,
}

impl Cli {
    fn node_params(&self) -> Result<NodeParams> {
        let mut params = match &self.params {
            Some(path) => NodeParams::from_file(path)?,
            None => NodeParams::default(),
        };

        if let Some(topic) = &self.keyboard_topic {
            params.keyboard_topic = topic.clone();
        }
        if let Some(topic) = &self.mux_topic {
            params.mux_topic = topic.clone();
        }
        if let Some(topic) = &self.mux_state_topic {
            params.mux_state_topic = topic.clone();
        }
        if let Some(idx) = self.key_mux_idx {
            params.key_mux_idx = idx;
        }
        if let Some(speed) = self.keyboard_speed {
            params.keyboard_speed = speed;
        }
        if let Some(angle) = self.keyboard_steer_angle {
            params.keyboard_steer_angle = angle;
        }
        if let Some(frame_id) = &self.frame_id {
            params.frame_id = frame_id.clone();
        }
        if self.enable_keyboard {
            params.keyboard_enabled_at_start = true;
        }

        Ok(params)
    }
}

async fn run(cli: Cli) -> Result<()> {
    let params = cli.node_params()?;
    match cli.command.unwrap_or(Command::Node) {
        Command::Node => node::run(params).await,
        Command::Keyboard => keyboard::run(params).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Setup logging (set RUST_LOG=debug to see ignored keys)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_defaults() {
        let cli = Cli::parse_from([
            "manual-control-node",
            "--keyboard-speed",
            "1.5",
            "--keyboard-steer-angle",
            "-0.3",
            "--enable-keyboard",
        ]);
        assert!(cli.command.is_none());

        let params = cli.node_params().unwrap();
        assert_eq!(params.keyboard_speed, 1.5);
        assert_eq!(params.keyboard_steer_angle, -0.3);
        assert!(params.keyboard_enabled_at_start);
        assert_eq!(params.mux_topic, NodeParams::default().mux_topic);
    }

    #[test]
    fn test_keyboard_subcommand() {
        let cli = Cli::parse_from([
            "manual-control-node",
            "keyboard",
            "--keyboard-topic",
            "/teleop/key",
        ]);
        assert!(matches!(cli.command, Some(Command::Keyboard)));
        assert_eq!(cli.node_params().unwrap().keyboard_topic, "/teleop/key");
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
