//! One-shot "say" command

use std::error::Error;
use std::sync::Arc;

use crate::core::conversation::ConversationController;
use crate::core::transport::HttpTransport;
use crate::utils::logging::TranscriptLog;

pub async fn run_say(
    transport: HttpTransport,
    prompt: Vec<String>,
    log: Option<TranscriptLog>,
) -> Result<(), Box<dyn Error>> {
    let prompt = prompt.join(" ");
    if prompt.trim().is_empty() {
        eprintln!("Usage: parley say <prompt>");
        std::process::exit(1);
    }

    let mut controller = ConversationController::new(Arc::new(transport));
    if let Some(log) = log {
        controller = controller.with_log(log);
    }

    let Some(entry) = controller.submit_and_wait(&prompt).await else {
        return Err("the message was not sent".into());
    };
    let reply = entry.text().to_string();

    match controller.last_error() {
        Some(error) => {
            eprintln!("❌ Error: {error}");
            std::process::exit(1);
        }
        None => {
            println!("{reply}");
            Ok(())
        }
    }
}
