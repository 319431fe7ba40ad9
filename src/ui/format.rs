//! Plain-text rendering of transcript entries for the terminal.

use crate::core::message::TranscriptEntry;

pub const EMPTY_REPLY_PLACEHOLDER: &str = "(empty reply)";

pub fn format_entry(entry: &TranscriptEntry) -> String {
    let time = entry.timestamp().format("%H:%M:%S");
    if entry.is_user() {
        format!("[{time}] You: {}", entry.text())
    } else if entry.is_error() {
        format!("[{time}] {}", entry.text())
    } else if entry.text().is_empty() {
        format!("[{time}] Bot: {EMPTY_REPLY_PLACEHOLDER}")
    } else {
        format!("[{time}] Bot: {}", entry.text())
    }
}

/// Banner line for a pending error, if any.
pub fn error_banner(last_error: Option<&str>) -> Option<String> {
    last_error.map(|message| format!("⚠ {message} (type /dismiss to hide)"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::ERROR_ENTRY_PREFIX;

    #[test]
    fn bot_replies_get_a_label() {
        let line = format_entry(&TranscriptEntry::bot("Sunny in Oslo"));
        assert!(line.ends_with("Bot: Sunny in Oslo"));
        assert!(line.starts_with('['));
    }

    #[test]
    fn error_entries_keep_their_marker() {
        let line = format_entry(&TranscriptEntry::bot(format!("{ERROR_ENTRY_PREFIX}down")));
        assert!(line.ends_with(&format!("] {ERROR_ENTRY_PREFIX}down")));
        assert!(!line.contains("Bot:"));
    }

    #[test]
    fn empty_replies_show_placeholder() {
        let line = format_entry(&TranscriptEntry::bot(""));
        assert!(line.ends_with(EMPTY_REPLY_PLACEHOLDER));
    }

    #[test]
    fn user_entries_are_labelled() {
        assert!(format_entry(&TranscriptEntry::user("hi")).ends_with("You: hi"));
    }

    #[test]
    fn banner_only_when_error_present() {
        assert_eq!(error_banner(None), None);
        assert!(error_banner(Some("boom")).unwrap().contains("boom"));
    }
}
