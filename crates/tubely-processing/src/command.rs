//! Helpers shared by the ffprobe and ffmpeg wrappers.

use std::path::{Component, Path};
use std::process::Stdio;
use tokio::process::Command;

const DANGEROUS_CHARS: [char; 11] = [';', '|', '&', '$', '`', '(', ')', '<', '>', '\n', '\r'];

/// Reject paths that contain shell metacharacters or directory traversal.
///
/// Arguments are never passed through a shell; this keeps odd paths out of logs and
/// out of tool-specific argument parsing.
pub fn validate_path(path: &Path) -> Result<(), String> {
    let path_str = path.to_string_lossy();
    if path_str.is_empty() {
        return Err("path is empty".to_string());
    }
    if path_str.chars().any(|c| DANGEROUS_CHARS.contains(&c)) {
        return Err(format!("path contains dangerous characters: {}", path_str));
    }
    if path.components().any(|c| c == Component::ParentDir) {
        return Err(format!("path contains directory traversal: {}", path_str));
    }
    Ok(())
}

/// Build a command with captured output that is killed if the caller is dropped.
pub fn media_command(program: &str) -> Command {
    let mut command = Command::new(program);
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    command
}

/// Lossy UTF-8 of a captured stream, trimmed.
pub fn captured(stream: &[u8]) -> String {
    String::from_utf8_lossy(stream).trim().to_string()
}
