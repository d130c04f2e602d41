//! CLI workbench for the DE10-Lite GPIO demos
//!
//! Runs the demos against simulated registers and prints what the LEDs
//! would show.
//!
//! Usage:
//!   gpio-demo list
//!   gpio-demo map [--target case-gold|simulator]
//!   gpio-demo run struct --switches 0x1 --buttons 0xFFFFFFFE --cycles 10

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;

use de10_gpio::demo::Demo;
use de10_gpio::{AddressMap, Board, Delay, DeviceKind, NoDelay, SimBus, SleepDelay, Target};

#[derive(Parser)]
#[command(name = "gpio-demo")]
#[command(version)]
#[command(about = "Run the DE10-Lite GPIO demos against simulated registers")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available demos
    List,

    /// Print the register address map
    Map {
        /// Address set (default: the one this binary was built for)
        #[arg(short, long, value_enum)]
        target: Option<TargetArg>,
    },

    /// Run a demo on simulated registers
    Run {
        /// Demo name, see `gpio-demo list`
        demo: Demo,

        /// Polling iterations for looping demos
        #[arg(short, long, default_value_t = 1)]
        cycles: u64,

        /// Poll until interrupted, like on hardware
        #[arg(long, conflicts_with = "cycles")]
        forever: bool,

        /// Initial switch register value
        #[arg(long, value_parser = parse_word, default_value = "0")]
        switches: u32,

        /// Initial button register value (active-low, all released by default)
        #[arg(long, value_parser = parse_word, default_value = "0xFFFFFFFF")]
        buttons: u32,

        /// Address set to simulate
        #[arg(short, long, value_enum)]
        target: Option<TargetArg>,

        /// Sleep between demo steps instead of running flat out
        #[arg(long)]
        sleep_ms: Option<u64>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum TargetArg {
    CaseGold,
    Simulator,
}

impl From<TargetArg> for Target {
    fn from(arg: TargetArg) -> Self {
        match arg {
            TargetArg::CaseGold => Target::CaseGold,
            TargetArg::Simulator => Target::Simulator,
        }
    }
}

/// Decimal, `0x` hex or `0b` binary
fn parse_word(s: &str) -> Result<u32, String> {
    let s = s.trim().replace('_', "");
    let parsed = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16)
    } else if let Some(bin) = s.strip_prefix("0b") {
        u32::from_str_radix(bin, 2)
    } else {
        s.parse()
    };
    parsed.map_err(|e| format!("invalid register value '{}': {}", s, e))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match cli.command {
        Commands::List => {
            for demo in Demo::ALL {
                let mode = if demo.is_polling() { "polling" } else { "one-shot" };
                println!("{:<12} {:<9} {}", demo.name(), mode, demo.description());
            }
        }
        Commands::Map { target } => {
            let target = target.map(Target::from).unwrap_or(Target::ACTIVE);
            let map = AddressMap::for_target(target);
            println!("Address set: {}", target);
            for kind in DeviceKind::ALL {
                println!(
                    "    {:<7} {:#010X}  pins 0..={}",
                    kind.to_string(),
                    map.base(kind),
                    kind.max_pin()
                );
            }
        }
        Commands::Run {
            demo,
            cycles,
            forever,
            switches,
            buttons,
            target,
            sleep_ms,
        } => {
            let target = target.map(Target::from).unwrap_or(Target::ACTIVE);
            let board = Board::simulated(AddressMap::for_target(target));
            board.bus().preset(DeviceKind::Switch, switches)?;
            board.bus().preset(DeviceKind::Button, buttons)?;

            let mut delay: Box<dyn Delay> = match sleep_ms {
                Some(ms) => Box::new(SleepDelay(Duration::from_millis(ms))),
                None => Box::new(NoDelay),
            };
            let cycles = if forever { None } else { Some(cycles) };

            info!("Running {} on the {} address set", demo, target);
            demo.run(&board, &mut *delay, cycles)
                .with_context(|| format!("demo {} failed", demo))?;

            print_registers(&board)?;
        }
    }

    Ok(())
}

fn print_registers(board: &Board<SimBus>) -> Result<()> {
    for kind in DeviceKind::ALL {
        let value = board
            .bus()
            .peek(kind)
            .with_context(|| format!("reading {} register", kind))?;
        println!(
            "{:<7} {:#010X}  {:#010X}  {:010b}",
            kind.to_string(),
            board.base(kind),
            value,
            value & 0x3FF
        );
    }
    Ok(())
}
