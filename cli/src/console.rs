// Interactive console: line parsing and colored output

use anyhow::{anyhow, bail, Context, Result};
use callbridge_core::sim::{DeviceStats, SimFaults};
use callbridge_core::{BridgeEvent, Channel, Command, CommandResult, SessionSnapshot};
use colored::*;

#[derive(Debug, PartialEq)]
pub enum Input {
    /// `<channel> <method> [json arguments]`
    Invoke(Command),
    LeavePip,
    LeaveApp,
    Fault { name: String, enabled: bool },
    Status,
    Help,
    Quit,
}

pub fn parse_line(line: &str) -> Result<Input> {
    let mut parts = line.splitn(3, ' ');
    let head = parts.next().unwrap_or_default();

    let input = match head {
        "quit" | "exit" => Input::Quit,
        "help" => Input::Help,
        "status" => Input::Status,
        "leave-pip" => Input::LeavePip,
        "leave-app" => Input::LeaveApp,
        "fault" => {
            let name = parts.next().context("Usage: fault <name> on|off")?;
            let enabled = match parts.next().map(str::trim) {
                Some("on") => true,
                Some("off") => false,
                _ => bail!("Usage: fault <name> on|off"),
            };
            Input::Fault {
                name: name.to_string(),
                enabled,
            }
        }
        channel => {
            let channel = channel
                .parse::<Channel>()
                .map_err(|e: String| anyhow!("{e} (try `help`)"))?;
            let method = parts.next().context("Usage: <channel> <method> [json]")?;
            let arguments = parts.next().unwrap_or_default();
            let command = Command::from_json_arguments(channel, method, arguments)
                .context("Invalid JSON arguments")?;
            Input::Invoke(command)
        }
    };
    Ok(input)
}

pub fn toggle_fault(faults: &mut SimFaults, name: &str, enabled: bool) -> Result<()> {
    let slot = match name {
        "acquire" => &mut faults.fail_acquire,
        "start" => &mut faults.fail_start,
        "teardown" => &mut faults.fail_teardown,
        "pip" => &mut faults.reject_pip,
        "background" => &mut faults.fail_background,
        other => bail!("Unknown fault `{other}` (acquire, start, teardown, pip, background)"),
    };
    *slot = enabled;
    Ok(())
}

pub fn prompt() {
    print!("> ");
    let _ = std::io::Write::flush(&mut std::io::stdout());
}

pub fn print_help() {
    println!("{}", "Commands:".bold());
    println!("  {}                 start the ringtone", "audio play".bright_green());
    println!("  {}                 stop and release it", "audio stop".bright_green());
    println!("  {}   request PiP", "pip enterPip [json]".bright_green());
    println!("  {} arm auto-enter", "pip setAutoPip {json}".bright_green());
    println!("  {}               leave PiP", "pip closePip".bright_green());
    println!("  {}                  OS: user closes the PiP window", "leave-pip".bright_green());
    println!("  {}                  OS: user leaves the app", "leave-app".bright_green());
    println!("  {}   inject a device fault", "fault <name> on|off".bright_green());
    println!("  {}                     bridge and device state", "status".bright_green());
    println!("  {}                       detach and exit", "quit".bright_green());
}

pub fn print_result(command: &Command, result: &CommandResult) {
    let call = format!("{}.{}", command.channel, command.method);
    match result {
        CommandResult::Success(value) => {
            println!("{} {} → {}", "✓".green(), call.bright_cyan(), value);
        }
        CommandResult::Failure { code, message } => {
            println!("{} {} → {} {}", "✗".red(), call.bright_cyan(), code.red().bold(), message);
        }
        CommandResult::NotImplemented => {
            println!("{} {} → {}", "?".yellow(), call.bright_cyan(), "not implemented".yellow());
        }
    }
}

pub fn print_event(event: &BridgeEvent) {
    println!(
        "\n{} {}.{} {}",
        "←".bright_blue(),
        event.channel(),
        event.name().bright_cyan(),
        event.payload()
    );
}

pub fn print_status(snapshot: &SessionSnapshot, stats: &DeviceStats) {
    let pip = &snapshot.pip;
    println!("{}", "Bridge".bold());
    println!("  Playing:         {}", snapshot.playing);
    println!("  Tier:            {}", pip.capability_tier.to_string().bright_yellow());
    println!("  PiP active:      {}", pip.active);
    println!("  Auto-enter:      {}", pip.auto_enter_enabled);
    println!("  Aspect ratio:    {}", pip.aspect_ratio);
    println!("{}", "Device".bold());
    println!("  Live players:    {}", stats.live_players);
    println!("  Acquired:        {}", stats.players_acquired);
    println!("  Released:        {}", stats.players_released);
    println!("  Enter requests:  {}", stats.enter_requests.len());
    println!("  Backgrounded:    {}", stats.background_requests);
}
