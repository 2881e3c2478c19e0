//! The calculator's output surface.
//!
//! A [`Display`] receives one [`DisplayFrame`] after every command. Frames
//! carry the text to show and what kind of text it is, so sinks can style
//! results and errors differently.

use anyhow::Context;
use serde::Serialize;
use std::io::Write;

/// What a frame's text represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameKind {
    /// The expression being edited (or the empty placeholder).
    Expression,
    /// The result of a successful evaluation.
    Result,
    /// The transient error indicator.
    Error,
}

/// One redraw of the display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DisplayFrame {
    pub text: String,
    pub kind: FrameKind,
}

impl DisplayFrame {
    pub fn expression(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: FrameKind::Expression,
        }
    }

    pub fn result(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: FrameKind::Result,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: FrameKind::Error,
        }
    }

    /// Check if this frame shows the error indicator.
    pub fn is_error(&self) -> bool {
        self.kind == FrameKind::Error
    }
}

/// A consumer of display frames.
pub trait Display {
    fn show(&mut self, frame: &DisplayFrame) -> anyhow::Result<()>;
}

/// Writes each frame's text as a plain line.
pub struct TerminalDisplay<W: Write> {
    out: W,
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Display for TerminalDisplay<W> {
    fn show(&mut self, frame: &DisplayFrame) -> anyhow::Result<()> {
        writeln!(self.out, "{}", frame.text).context("Failed to write display frame")?;
        self.out.flush().context("Failed to flush display")
    }
}

/// Writes each frame as a JSON object on its own line.
pub struct JsonDisplay<W: Write> {
    out: W,
}

impl<W: Write> JsonDisplay<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Display for JsonDisplay<W> {
    fn show(&mut self, frame: &DisplayFrame) -> anyhow::Result<()> {
        serde_json::to_writer(&mut self.out, frame).context("Failed to encode display frame")?;
        writeln!(self.out).context("Failed to write display frame")?;
        self.out.flush().context("Failed to flush display")
    }
}

/// Keeps every frame in memory.
#[derive(Debug, Default)]
pub struct RecordingDisplay {
    pub frames: Vec<DisplayFrame>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Texts of all recorded frames, oldest first.
    pub fn texts(&self) -> Vec<&str> {
        self.frames.iter().map(|f| f.text.as_str()).collect()
    }

    pub fn last(&self) -> Option<&DisplayFrame> {
        self.frames.last()
    }
}

impl Display for RecordingDisplay {
    fn show(&mut self, frame: &DisplayFrame) -> anyhow::Result<()> {
        self.frames.push(frame.clone());
        Ok(())
    }
}
