//! System clipboard access through the platform's clipboard commands.
//!
//! - macOS: pbcopy / pbpaste
//! - Linux: wl-copy / wl-paste, then xclip, then xsel
//! - Windows: clip / powershell Get-Clipboard

use std::{
    io::{ErrorKind, Write},
    process::{Command, Stdio},
};

use anyhow::{bail, Context, Result};

/// A program invocation, as program name and arguments
type Invocation = (&'static str, &'static [&'static str]);

/// One way of talking to the clipboard
struct Tool {
    copy: Invocation,
    paste: Invocation,
}

#[cfg(target_os = "macos")]
const TOOLS: &[Tool] = &[Tool {
    copy: ("pbcopy", &[]),
    paste: ("pbpaste", &[]),
}];

#[cfg(target_os = "linux")]
const TOOLS: &[Tool] = &[
    Tool {
        copy: ("wl-copy", &[]),
        paste: ("wl-paste", &["--no-newline"]),
    },
    Tool {
        copy: ("xclip", &["-selection", "clipboard"]),
        paste: ("xclip", &["-selection", "clipboard", "-o"]),
    },
    Tool {
        copy: ("xsel", &["--clipboard", "--input"]),
        paste: ("xsel", &["--clipboard", "--output"]),
    },
];

#[cfg(target_os = "windows")]
const TOOLS: &[Tool] = &[Tool {
    copy: ("clip", &[]),
    paste: ("powershell", &["-NoProfile", "-Command", "Get-Clipboard"]),
}];

#[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
const TOOLS: &[Tool] = &[];

/// Copies `text` to the system clipboard
pub fn copy(text: &str) -> Result<()> {
    for tool in TOOLS {
        let (program, args) = tool.copy;

        let mut child = match Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .spawn()
        {
            Ok(child) => child,
            Err(e) if e.kind() == ErrorKind::NotFound => continue,
            Err(e) => return Err(e).with_context(|| format!("Failed to spawn {}", program)),
        };

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .with_context(|| format!("Failed to write to {}", program))?;
        }

        let status = child
            .wait()
            .with_context(|| format!("Failed to wait for {}", program))?;

        if !status.success() {
            bail!("{} exited with {}", program, status);
        }

        return Ok(());
    }

    bail!(missing_tool_message())
}

/// Reads text from the system clipboard
pub fn paste() -> Result<String> {
    for tool in TOOLS {
        let (program, args) = tool.paste;

        let output = match Command::new(program).args(args).output() {
            Ok(output) => output,
            Err(e) if e.kind() == ErrorKind::NotFound => continue,
            Err(e) => return Err(e).with_context(|| format!("Failed to run {}", program)),
        };

        if !output.status.success() {
            bail!("{} exited with {}", program, output.status);
        }

        return String::from_utf8(output.stdout).context("Clipboard does not contain valid UTF-8");
    }

    bail!(missing_tool_message())
}

fn missing_tool_message() -> String {
    let programs: Vec<_> = TOOLS.iter().map(|tool| tool.copy.0).collect();

    if programs.is_empty() {
        "Clipboard not supported on this platform".to_string()
    } else {
        format!("No clipboard tool found, install one of: {}", programs.join(", "))
    }
}
