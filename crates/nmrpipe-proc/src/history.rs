/// Processing history
///
/// Every operation applied to a spectrum is recorded with:
/// - Timestamp
/// - Operation name and description
/// - Equivalent nmrPipe command
///
/// The history can be exported as:
/// - Human-readable text
/// - JSON
/// - Shell script (an nmrPipe pipe chain reproducing the run)

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::error::ProcError;

/// One applied operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// 1-based position in the session
    pub sequence: usize,
    pub timestamp: DateTime<Local>,
    /// nmrPipe function name
    pub operation: String,
    pub description: String,
    /// Equivalent command, e.g. `nmrPipe -fn EM -lb 1.00`
    pub nmrpipe_command: String,
}

impl HistoryEntry {
    pub fn to_text(&self) -> String {
        format!(
            "[{:03}] {} | {} | {}\n      Command: {}",
            self.sequence,
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.operation,
            self.description,
            if self.nmrpipe_command.is_empty() {
                "(n/a)"
            } else {
                self.nmrpipe_command.as_str()
            }
        )
    }
}

/// Ordered record of a processing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct History {
    pub session_id: String,
    pub session_start: DateTime<Local>,
    pub source: String,
    pub software_version: String,
    pub entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            session_start: Local::now(),
            source: String::new(),
            software_version: env!("CARGO_PKG_VERSION").to_string(),
            entries: Vec::new(),
        }
    }

    /// Input file or stream name the session started from.
    pub fn set_source(&mut self, source: &str) {
        self.source = source.to_string();
    }

    pub fn add_entry(&mut self, operation: &str, description: &str, nmrpipe_command: &str) {
        let seq = self.entries.len() + 1;
        self.entries.push(HistoryEntry {
            sequence: seq,
            timestamp: Local::now(),
            operation: operation.to_string(),
            description: description.to_string(),
            nmrpipe_command: nmrpipe_command.to_string(),
        });
        log::info!("[{:03}] {}: {}", seq, operation, description);
    }

    /// Remove the last entry.
    pub fn pop_entry(&mut self) -> Option<HistoryEntry> {
        self.entries.pop()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_text(&self) -> String {
        let rule = "=".repeat(63);
        let mut out = String::new();
        out.push_str(&format!("{rule}\n  NMRPipe Processing History\n{rule}\n"));
        out.push_str(&format!("  Session ID:  {}\n", self.session_id));
        out.push_str(&format!(
            "  Started:     {}\n",
            self.session_start.format("%Y-%m-%d %H:%M:%S")
        ));
        out.push_str(&format!("  Source:      {}\n", self.source));
        out.push_str(&format!("  Software:    nmr-spectral-engine v{}\n", self.software_version));
        out.push_str(&format!("  Operations:  {}\n", self.entries.len()));
        out.push_str(&format!("{}\n\n", "-".repeat(63)));
        for entry in &self.entries {
            out.push_str(&entry.to_text());
            out.push_str("\n\n");
        }
        out.push_str(&format!("{rule}\n"));
        out
    }

    pub fn to_json(&self) -> Result<String, ProcError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ProcError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Shell script running the recorded steps as one nmrPipe pipe chain.
    pub fn to_shell_script(&self) -> String {
        let mut out = String::new();
        out.push_str("#!/bin/sh\n#\n");
        out.push_str(&format!(
            "# Generated by nmr-spectral-engine v{}\n",
            self.software_version
        ));
        out.push_str(&format!(
            "# Session: {} ({})\n",
            self.session_id,
            self.session_start.format("%Y-%m-%d %H:%M:%S")
        ));
        out.push_str("#\n");
        for entry in &self.entries {
            out.push_str(&format!(
                "# Step {}: {} ({})\n",
                entry.sequence, entry.operation, entry.description
            ));
        }
        out.push('\n');

        let input = if self.source.is_empty() {
            "input.fid"
        } else {
            self.source.as_str()
        };
        let mut stages = vec![format!("nmrPipe -in {input}")];
        stages.extend(
            self.entries
                .iter()
                .filter(|e| !e.nmrpipe_command.is_empty())
                .map(|e| e.nmrpipe_command.clone()),
        );
        stages.push("nmrPipe -out output.ft -ov".to_string());
        out.push_str(&stages.join(" \\\n| "));
        out.push('\n');
        out
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}
