//! The calculator event loop.
//!
//! A [`Session`] owns one [`Editor`] and one [`Display`]. Commands arrive
//! over a channel and run to completion one at a time; after each the
//! display is redrawn. A failed evaluation shows the error indicator and
//! schedules a revert to the expression. Any command that arrives before
//! the revert fires cancels it.

use crate::calculator::{Editor, Outcome};
use crate::config::Config;
use crate::display::{Display, DisplayFrame};
use crate::keypad::Command;
use std::time::Duration;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, warn};

pub struct Session<D: Display> {
    editor: Editor,
    display: D,
    error_text: String,
    revert_delay: Duration,
    /// When the error indicator should be replaced by the expression again.
    pending_revert: Option<Instant>,
}

impl<D: Display> Session<D> {
    pub fn new(config: &Config, display: D) -> Self {
        Self {
            editor: Editor::new(),
            display,
            error_text: config.error_text.clone(),
            revert_delay: config.error_revert_delay(),
            pending_revert: None,
        }
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn into_display(self) -> D {
        self.display
    }

    /// Whether the error indicator is up and waiting to be reverted.
    pub fn has_pending_revert(&self) -> bool {
        self.pending_revert.is_some()
    }

    /// Draw the initial state.
    pub fn start(&mut self) -> anyhow::Result<()> {
        self.redraw()
    }

    /// Run one command to completion and redraw.
    pub fn handle(&mut self, command: Command) -> anyhow::Result<()> {
        if self.pending_revert.take().is_some() {
            debug!(?command, "cancelled pending error revert");
        }

        match self.editor.apply(command) {
            Ok(Outcome::Edited) => self.redraw(),
            Ok(Outcome::Ignored) => {
                debug!(?command, expression = self.editor.expression(), "command ignored");
                self.redraw()
            }
            Ok(Outcome::Evaluated(evaluation)) => {
                debug!(
                    expression = %evaluation.expression,
                    result = %evaluation.result,
                    "evaluated"
                );
                self.display.show(&DisplayFrame::result(evaluation.result))
            }
            Err(err) => {
                warn!(expression = self.editor.expression(), "evaluation failed: {}", err);
                self.display.show(&DisplayFrame::error(self.error_text.as_str()))?;
                self.pending_revert = Some(Instant::now() + self.revert_delay);
                Ok(())
            }
        }
    }

    /// Replace a pending error indicator with the current expression.
    pub fn revert(&mut self) -> anyhow::Result<()> {
        if self.pending_revert.take().is_some() {
            self.redraw()?;
        }
        Ok(())
    }

    /// Process commands until every sender is dropped.
    ///
    /// A revert still pending when the channel closes is applied right away,
    /// so the last frame always shows the expression.
    pub async fn run(mut self, commands: flume::Receiver<Command>) -> anyhow::Result<Self> {
        self.start()?;

        loop {
            let deadline = self.pending_revert;
            tokio::select! {
                command = commands.recv_async() => match command {
                    Ok(command) => self.handle(command)?,
                    Err(_) => break,
                },
                _ = wait_until(deadline) => self.revert()?,
            }
        }

        self.revert()?;
        debug!(expression = self.editor.expression(), "session closed");
        Ok(self)
    }

    fn redraw(&mut self) -> anyhow::Result<()> {
        let frame = DisplayFrame::expression(self.editor.display_text());
        self.display.show(&frame)
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
