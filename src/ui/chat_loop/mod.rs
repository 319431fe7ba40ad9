//! Line-oriented chat loop.
//!
//! Reads user input line by line and waits on the controller's outcome
//! channel at the same time, so replies are printed as soon as they land
//! while the prompt stays responsive to commands.

use std::error::Error;
use std::io::{self, Write};
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

use crate::commands::{process_input, CommandResult};
use crate::core::conversation::ConversationController;
use crate::core::transport::HttpTransport;
use crate::ui::format::{error_banner, format_entry};
use crate::utils::logging::TranscriptLog;

const PROMPT: &str = "> ";

enum LoopControl {
    Continue(Option<String>),
    Quit,
}

pub async fn run_chat(
    transport: HttpTransport,
    log: Option<TranscriptLog>,
) -> Result<(), Box<dyn Error>> {
    println!("💬 parley: chatting with {}", transport.base_url());
    if let Some(log) = &log {
        println!("📝 Logging transcript to {}", log.path().display());
    }
    println!("Type /help for commands, /quit to leave.");

    let mut controller = ConversationController::new(Arc::new(transport));
    if let Some(log) = log {
        controller = controller.with_log(log);
    }

    let stdin = BufReader::new(tokio::io::stdin());
    run_loop(&mut controller, stdin, io::stdout()).await
}

/// Drive `controller` from `reader` until EOF or `/quit`, writing entries and
/// notices to `out`. A reply still in flight at exit is waited for, whatever
/// ended the loop.
pub async fn run_loop<R, W>(
    controller: &mut ConversationController,
    mut reader: R,
    mut out: W,
) -> Result<(), Box<dyn Error>>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    // Partial reads survive a cancelled `read_until`, so the buffer lives
    // outside the loop and is only cleared once a line is consumed.
    let mut buf = Vec::new();
    let mut read_error = None;
    prompt(&mut out)?;

    loop {
        tokio::select! {
            read = reader.read_until(b'\n', &mut buf) => {
                match read {
                    Ok(0) => {
                        debug!("Input closed");
                        break;
                    }
                    Ok(_) => {}
                    Err(err) => {
                        warn!(error = %err, "Failed to read input");
                        read_error = Some(err);
                        break;
                    }
                }
                let line = decode_line(&buf);
                buf.clear();
                match handle_line(controller, &line) {
                    LoopControl::Quit => break,
                    LoopControl::Continue(notice) => {
                        if let Some(notice) = notice {
                            writeln!(out, "{notice}")?;
                        }
                    }
                }
                if !controller.is_pending() {
                    prompt(&mut out)?;
                }
            }
            Some((submission_id, outcome)) = controller.recv_outcome() => {
                let entry = controller.apply_outcome(submission_id, outcome);
                writeln!(out, "{}", format_entry(entry))?;
                print_banner(controller, &mut out)?;
                prompt(&mut out)?;
            }
        }
    }

    if controller.is_pending() {
        writeln!(out, "Waiting for the reply in flight...")?;
        if let Some(entry) = controller.resolve_next().await {
            writeln!(out, "{}", format_entry(entry))?;
        }
        print_banner(controller, &mut out)?;
    }
    out.flush()?;

    match read_error {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

/// Invalid UTF-8 is replaced rather than rejected.
fn decode_line(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw)
        .trim_end_matches(|c| c == '\n' || c == '\r')
        .to_string()
}

fn print_banner<W: Write>(controller: &ConversationController, out: &mut W) -> io::Result<()> {
    if let Some(banner) = error_banner(controller.last_error()) {
        writeln!(out, "{banner}")?;
    }
    Ok(())
}

fn handle_line(controller: &mut ConversationController, line: &str) -> LoopControl {
    match process_input(controller, line) {
        CommandResult::Quit => LoopControl::Quit,
        CommandResult::Continue => LoopControl::Continue(None),
        CommandResult::Notice(notice) => LoopControl::Continue(Some(notice)),
        CommandResult::ProcessAsMessage(text) => {
            controller.set_input(text);
            match controller.submit_input() {
                Some(_) => LoopControl::Continue(None),
                None if controller.is_pending() => LoopControl::Continue(Some(
                    "Still waiting for the previous reply; message not sent.".to_string(),
                )),
                None => LoopControl::Continue(None),
            }
        }
    }
}

fn prompt<W: Write>(out: &mut W) -> io::Result<()> {
    write!(out, "{PROMPT}")?;
    out.flush()
}
