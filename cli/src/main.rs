// callbridge-cli — Desktop simulator for the call bridge
//
// Attaches a bridge session to an in-memory device and lets you drive both
// channels by hand, the way a UI layer would, while playing the OS side
// (leaving PiP, leaving the app) yourself.

mod config;
mod console;

use anyhow::{Context, Result};
use callbridge_core::sim::{SimFaults, SimulatedDevice};
use callbridge_core::{BridgeSession, Channel, Command, CommandResult};
use clap::{Args, Parser, Subcommand};
use colored::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "callbridge")]
#[command(about = "Callbridge — call alert and PiP bridge simulator", long_about = None)]
#[command(version)]
struct Cli {
    /// Also write logs to a daily-rolling file in this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive session against a simulated device
    Start(DeviceArgs),
    /// Run the incoming-call scenario end to end
    Scenario(DeviceArgs),
    /// Inspect or create configuration files
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Args)]
struct DeviceArgs {
    /// Raw platform level reported by the simulated OS
    #[arg(short, long, default_value = "31")]
    platform_level: u32,
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Fail acquisition of the alert player
    #[arg(long)]
    fail_acquire: bool,
    /// Fail starting playback
    #[arg(long)]
    fail_start: bool,
    /// Fail every audio teardown step
    #[arg(long)]
    fail_teardown: bool,
    /// Reject PiP requests
    #[arg(long)]
    reject_pip: bool,
    /// Fail moving the task to the background
    #[arg(long)]
    fail_background: bool,
}

impl DeviceArgs {
    fn faults(&self) -> SimFaults {
        SimFaults {
            fail_acquire: self.fail_acquire,
            fail_start: self.fail_start,
            fail_teardown: self.fail_teardown,
            reject_pip: self.reject_pip,
            fail_background: self.fail_background,
        }
    }
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Write the default configuration to a file
    Init { path: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_tracing(cli.log_dir.as_deref())?;

    match cli.command {
        Commands::Start(args) => cmd_start(args).await,
        Commands::Scenario(args) => cmd_scenario(args).await,
        Commands::Config { action } => cmd_config(action),
    }
}

fn init_tracing(
    log_dir: Option<&std::path::Path>,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    use tracing_subscriber::prelude::*;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let stderr = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let Some(dir) = log_dir else {
        tracing_subscriber::registry().with(filter).with(stderr).init();
        return Ok(None);
    };

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    let appender = tracing_appender::rolling::daily(dir, "callbridge.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::registry()
        .with(filter)
        .with(stderr)
        .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(writer))
        .init();
    Ok(Some(guard))
}

fn attach_device(args: &DeviceArgs) -> Result<(SimulatedDevice, callbridge_core::BridgeConfig)> {
    let bridge_config = config::load(args.config.as_deref())?;
    let device = SimulatedDevice::new(args.platform_level);
    device.set_faults(args.faults());
    tracing::info!("Simulated device at platform level {}", args.platform_level);
    Ok((device, bridge_config))
}

async fn cmd_start(args: DeviceArgs) -> Result<()> {
    let (device, bridge_config) = attach_device(&args)?;
    let (handle, mut events) = BridgeSession::attach(
        bridge_config,
        device.audio_host(),
        device.window_host(),
    )
    .context("Failed to attach bridge session")?;

    println!("{}", "Callbridge — Simulated device".bold());
    println!();
    if let Some(snapshot) = handle.snapshot().await {
        println!(
            "Platform level {} → tier {}",
            args.platform_level.to_string().bright_cyan(),
            snapshot.pip.capability_tier.to_string().bright_yellow()
        );
    }
    println!();
    console::print_help();
    println!();

    let event_task = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            console::print_event(&event);
            console::prompt();
        }
    });

    let mut faults = args.faults();
    let stdin_task = tokio::spawn(async move {
        use tokio::io::AsyncBufReadExt;

        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        let mut lines = stdin.lines();

        console::prompt();

        while let Ok(Some(line)) = lines.next_line().await {
            let line = line.trim();
            if line.is_empty() {
                console::prompt();
                continue;
            }

            match console::parse_line(line) {
                Ok(console::Input::Quit) => {
                    println!("Detaching...");
                    handle.detach().await;
                    break;
                }
                Ok(console::Input::Help) => console::print_help(),
                Ok(console::Input::Invoke(command)) => {
                    let result = handle.invoke(command.clone()).await;
                    console::print_result(&command, &result);
                }
                Ok(console::Input::LeavePip) => device.user_leaves_pip(),
                Ok(console::Input::LeaveApp) => device.user_leaves_app(),
                Ok(console::Input::Fault { name, enabled }) => {
                    match console::toggle_fault(&mut faults, &name, enabled) {
                        Ok(()) => {
                            device.set_faults(faults.clone());
                            println!("{} {} = {}", "✓".green(), name.bright_cyan(), enabled);
                        }
                        Err(e) => println!("{} {}", "✗".red(), e),
                    }
                }
                Ok(console::Input::Status) => match handle.snapshot().await {
                    Some(snapshot) => console::print_status(&snapshot, &device.stats()),
                    None => println!("{} Session is detached", "✗".red()),
                },
                Err(e) => println!("{} {}", "✗".red(), e),
            }

            // The simulated OS reports asynchronously, like a real one.
            for is_in_pip_mode in device.take_transitions() {
                handle.report_pip_mode_changed(is_in_pip_mode);
            }
            console::prompt();
        }
    });

    tokio::select! {
        _ = event_task => {}
        _ = stdin_task => {}
    }

    Ok(())
}

async fn cmd_scenario(args: DeviceArgs) -> Result<()> {
    let (device, bridge_config) = attach_device(&args)?;
    let (handle, mut events) = BridgeSession::attach(
        bridge_config,
        device.audio_host(),
        device.window_host(),
    )
    .context("Failed to attach bridge session")?;

    println!("{}", "Incoming call scenario".bold());
    println!();

    let steps = [
        ("ringing", Command::new(Channel::Audio, "play")),
        ("ringing again", Command::new(Channel::Audio, "play")),
        ("answered", Command::new(Channel::Audio, "stop")),
        ("answered again", Command::new(Channel::Audio, "stop")),
        (
            "minimized",
            Command::new(Channel::Pip, "enterPip")
                .with_argument("width", 16)
                .with_argument("height", 9),
        ),
        (
            "auto-enter on",
            Command::new(Channel::Pip, "setAutoPip").with_argument("enabled", true),
        ),
        ("hung up", Command::new(Channel::Pip, "closePip")),
    ];

    let mut failures = 0;
    for (label, command) in steps {
        println!("{}", label.dimmed());
        let result = handle.invoke(command.clone()).await;
        if !matches!(result, CommandResult::Success(_)) {
            failures += 1;
        }
        console::print_result(&command, &result);

        for is_in_pip_mode in device.take_transitions() {
            handle.report_pip_mode_changed(is_in_pip_mode);
        }
    }

    handle.detach().await;
    while let Some(event) = events.recv().await {
        console::print_event(&event);
    }

    let stats = device.stats();
    println!();
    println!("Players acquired: {}", stats.players_acquired);
    println!("Players released: {}", stats.players_released);
    println!("Peak live:        {}", stats.peak_live_players);
    println!();
    if failures == 0 && stats.live_players == 0 {
        println!("{}", "Scenario completed".green().bold());
    } else {
        println!(
            "{}",
            format!("Scenario completed with {failures} failed step(s)").yellow().bold()
        );
    }

    Ok(())
}

fn cmd_config(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show { config: path } => {
            let bridge_config = config::load(path.as_deref())?;
            println!("{}", "Configuration".bold());
            println!();
            for (key, value) in config::entries(&bridge_config) {
                println!("  {:<26} {}", key.bright_cyan(), value);
            }
        }
        ConfigAction::Init { path } => {
            config::write_default(&path)?;
            println!("{} Wrote {}", "✓".green(), path.display().to_string().bright_cyan());
        }
    }
    Ok(())
}
