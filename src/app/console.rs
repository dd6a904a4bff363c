//! Operator console: one command per stdin line
//!
//! Replaces the kiosk's on-screen buttons. Commands are forwarded to the
//! controller without waiting for the backend; results show up through the
//! display task.

use std::ops::ControlFlow;
use std::str::FromStr;
use strum_macros::{Display, EnumString};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use super::cli::display::CartView;
use crate::cart::ScanPayload;
use crate::core::shutdown::ShutdownCoordinator;
use crate::session::{KioskHandle, SessionResult};

#[derive(Debug, Clone, PartialEq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ConsoleCommand {
    Start,
    Stop,
    Mode,
    Checkout,
    Cart,
    /// Manual scan: `scan <name...> <price>`
    #[strum(disabled)]
    Scan(ScanPayload),
    Help,
    #[strum(serialize = "quit", serialize = "exit")]
    Quit,
}

const HELP: &str = "\
Commands:
  start              start scanning
  stop               stop scanning
  mode               toggle between Add and Remove mode
  checkout           check out and save the bill
  cart               show the cart
  scan NAME PRICE    submit a scan by hand
  help               show this help
  quit               leave the kiosk";

impl ConsoleCommand {
    /// Parse one console line; `Ok(None)` for blank lines
    pub fn parse_line(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map(|(w, r)| (w, r.trim()))
            .unwrap_or((line, ""));

        if word.eq_ignore_ascii_case("scan") {
            return parse_scan(rest).map(Some);
        }

        let command = ConsoleCommand::from_str(word)
            .map_err(|_| format!("Unknown command '{}'; type 'help' for a list", word))?;
        if !rest.is_empty() {
            return Err(format!("'{}' takes no arguments", command));
        }
        Ok(Some(command))
    }
}

fn parse_scan(rest: &str) -> Result<ConsoleCommand, String> {
    let usage = || "Usage: scan NAME PRICE".to_string();
    let (name, price) = rest.rsplit_once(char::is_whitespace).ok_or_else(usage)?;
    let price: f64 = price.parse().map_err(|_| usage())?;
    let name = name.trim();
    if name.is_empty() {
        return Err(usage());
    }
    Ok(ConsoleCommand::Scan(ScanPayload::new(name, price)))
}

async fn dispatch(
    command: ConsoleCommand,
    handle: &KioskHandle,
    use_color: bool,
) -> SessionResult<ControlFlow<()>> {
    match command {
        ConsoleCommand::Start => handle.start_scanning()?,
        ConsoleCommand::Stop => handle.stop_scanning()?,
        ConsoleCommand::Mode => handle.toggle_mode()?,
        ConsoleCommand::Checkout => handle.checkout()?,
        ConsoleCommand::Scan(payload) => handle.submit_scan(payload)?,
        ConsoleCommand::Cart => {
            let snapshot = handle.snapshot().await?;
            print!("{}", CartView::from_snapshot(&snapshot).render_cart(use_color));
        }
        ConsoleCommand::Help => println!("{}", HELP),
        ConsoleCommand::Quit => return Ok(ControlFlow::Break(())),
    }
    Ok(ControlFlow::Continue(()))
}

/// Read commands from `input` until quit, end of input or shutdown
pub async fn run_console<R>(
    input: R,
    handle: KioskHandle,
    shutdown: ShutdownCoordinator,
    use_color: bool,
) -> SessionResult<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut shutdown_rx = shutdown.subscribe();

    loop {
        let line = tokio::select! {
            _ = shutdown_rx.recv() => break,
            line = lines.next_line() => line,
        };

        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) => {
                log::debug!("Console input closed");
                break;
            }
            Err(e) => {
                log::warn!("Failed to read console input: {}", e);
                break;
            }
        };

        match ConsoleCommand::parse_line(&line) {
            Ok(None) => {}
            Ok(Some(command)) => {
                log::debug!("Console command: {}", line.trim());
                if dispatch(command, &handle, use_color).await?.is_break() {
                    break;
                }
            }
            Err(message) => eprintln!("{}", message),
        }
    }

    shutdown.trigger_shutdown();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Command;
    use tokio::sync::mpsc;

    #[test]
    fn test_parse_commands() {
        assert_eq!(ConsoleCommand::parse_line("start"), Ok(Some(ConsoleCommand::Start)));
        assert_eq!(ConsoleCommand::parse_line("  MODE "), Ok(Some(ConsoleCommand::Mode)));
        assert_eq!(ConsoleCommand::parse_line("exit"), Ok(Some(ConsoleCommand::Quit)));
        assert_eq!(ConsoleCommand::parse_line(""), Ok(None));
        assert!(ConsoleCommand::parse_line("dance").is_err());
        assert!(ConsoleCommand::parse_line("stop now").is_err());
    }

    #[test]
    fn test_parse_scan_keeps_spaces_in_name() {
        assert_eq!(
            ConsoleCommand::parse_line("scan Ponds Cream 5.00"),
            Ok(Some(ConsoleCommand::Scan(ScanPayload::new("Ponds Cream", 5.0))))
        );
        assert!(ConsoleCommand::parse_line("scan Bread").is_err());
        assert!(ConsoleCommand::parse_line("scan 2.50").is_err());
    }

    #[tokio::test]
    async fn test_console_forwards_until_quit() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = KioskHandle::new(tx);
        let (shutdown, _rx) = ShutdownCoordinator::new();
        let input: &[u8] = b"start\nmode\nbogus\nscan Bread 2.5\nquit\nstop\n";

        run_console(input, handle, shutdown.clone(), false)
            .await
            .unwrap();

        assert!(matches!(rx.try_recv(), Ok(Command::StartScanning)));
        assert!(matches!(rx.try_recv(), Ok(Command::ToggleMode)));
        assert!(matches!(rx.try_recv(), Ok(Command::Scan(_))));
        assert!(rx.try_recv().is_err(), "nothing after quit is sent");
        assert!(shutdown.is_shutdown_requested());
    }

    #[tokio::test]
    async fn test_console_stops_on_end_of_input() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (shutdown, _rx) = ShutdownCoordinator::new();
        let input: &[u8] = b"checkout\n";

        run_console(input, KioskHandle::new(tx), shutdown.clone(), false)
            .await
            .unwrap();

        assert!(matches!(rx.try_recv(), Ok(Command::Checkout)));
        assert!(shutdown.is_shutdown_requested());
    }
}
