use crate::core::message::TranscriptEntry;
use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Append-only plain-text log of the current session's transcript.
#[derive(Debug, Clone)]
pub struct TranscriptLog {
    path: PathBuf,
}

impl TranscriptLog {
    /// Open (creating if needed) the log file, failing early when it is not
    /// writable.
    pub fn create(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        file.flush()?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn log_entry(&self, entry: &TranscriptEntry) -> io::Result<()> {
        if entry.is_user() {
            self.write_block(&format!("You: {}", entry.text()))
        } else if entry.is_error() {
            self.write_block(&format!("## {}", entry.text()))
        } else if !entry.text().is_empty() {
            self.write_block(entry.text())
        } else {
            Ok(())
        }
    }

    fn write_block(&self, content: &str) -> io::Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = BufWriter::new(file);

        for line in content.lines() {
            writeln!(writer, "{line}")?;
        }
        // Entries are separated by a blank line.
        writeln!(writer)?;

        writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::ERROR_ENTRY_PREFIX;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn writes_user_bot_and_error_entries() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let path = dir.path().join("session.log");
        let log = TranscriptLog::create(&path).expect("log should open");

        log.log_entry(&TranscriptEntry::user("What's the weather in Paris?"))
            .unwrap();
        log.log_entry(&TranscriptEntry::bot("Sunny, 21°C.\nLight wind."))
            .unwrap();
        log.log_entry(&TranscriptEntry::bot(format!("{ERROR_ENTRY_PREFIX}down")))
            .unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            format!(
                "You: What's the weather in Paris?\n\nSunny, 21°C.\nLight wind.\n\n## {ERROR_ENTRY_PREFIX}down\n\n"
            )
        );
    }

    #[test]
    fn empty_bot_replies_are_skipped() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let path = dir.path().join("session.log");
        let log = TranscriptLog::create(&path).unwrap();

        log.log_entry(&TranscriptEntry::bot("")).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn create_fails_for_missing_directory() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let path = dir.path().join("missing").join("session.log");
        assert!(TranscriptLog::create(path).is_err());
    }
}
