use clap::Parser;
use de2_panel::console::{run_console, ConsoleConfig};
use de2_panel::gui::run_gui;
use de2_panel::{demo, PanelConfig, PanelState};
use log::info;
use std::path::PathBuf;

/// DE2 front panel demo: the tick counter is shown on the red LEDs and hex digits.
#[derive(Debug, Parser)]
#[command(name = "de2_panel", version, about)]
struct Args {
    /// Run the terminal front panel instead of the desktop window
    #[arg(long)]
    console: bool,

    /// JSON panel configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Seed for key hold times (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => PanelConfig::from_json_file(path)?,
        None => PanelConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let mut panel = PanelState::with_config(&config);
    demo::install(&mut panel);
    info!(
        "Starting '{}' panel ({} hex digits, {} switches, {} keys)",
        config.name, config.hex_digits, config.switches, config.keys
    );

    if args.console {
        run_console(panel, ConsoleConfig::default())?;
    } else {
        run_gui(panel, &format!("{} front panel", config.name))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from(["de2_panel", "--console", "--seed", "7"]);
        assert!(args.console);
        assert_eq!(args.seed, Some(7));
        assert!(args.config.is_none());
    }
}
