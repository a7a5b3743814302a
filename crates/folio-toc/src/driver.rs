//! Async event loop for a [`TableOfContents`].
//!
//! The host forwards source changes, visibility batches and clicks as
//! [`TocCommand`]s. A single task owns the state, keeps at most one debounce
//! timer armed, and publishes a [`TocSnapshot`] after every change. Dropping
//! the handle (or calling [`TocDriver::shutdown`]) stops the task.

use std::collections::HashSet;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

use crate::toc::{TableOfContents, TocSnapshot};
use crate::visibility::VisibilityEntry;

/// Messages the host sends to the driver.
#[derive(Debug, Clone)]
pub enum TocCommand {
    /// The document source changed
    SetSource(String),
    /// Ids of heading elements present in the rendered page
    Reconcile(HashSet<String>),
    /// A batch of visibility changes
    Visibility(Vec<VisibilityEntry>),
    /// A table of contents entry was clicked
    Click(String),
    /// A section's disclosure was toggled
    Toggle(String),
}

/// Errors from talking to a driver.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("Table of contents driver has stopped")]
    Closed,

    #[error("Table of contents driver task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Handle to a running table of contents task.
pub struct TocDriver {
    commands: Option<mpsc::Sender<TocCommand>>,
    snapshots: watch::Receiver<TocSnapshot>,
    task: Option<JoinHandle<TableOfContents>>,
}

impl TocDriver {
    /// Spawn the event loop on the current tokio runtime.
    pub fn spawn(toc: TableOfContents) -> Self {
        let (command_tx, command_rx) = mpsc::channel(64);
        let (snapshot_tx, snapshot_rx) = watch::channel(toc.snapshot());

        let task = tokio::spawn(run(toc, command_rx, snapshot_tx));

        Self {
            commands: Some(command_tx),
            snapshots: snapshot_rx,
            task: Some(task),
        }
    }

    /// Queue a command for the event loop.
    pub async fn send(&self, command: TocCommand) -> Result<(), DriverError> {
        let commands = self.commands.as_ref().ok_or(DriverError::Closed)?;
        commands.send(command).await.map_err(|_| DriverError::Closed)
    }

    /// The most recently published state.
    pub fn snapshot(&self) -> TocSnapshot {
        self.snapshots.borrow().clone()
    }

    /// A receiver that is notified whenever the state changes.
    pub fn subscribe(&self) -> watch::Receiver<TocSnapshot> {
        self.snapshots.clone()
    }

    /// Stop the event loop after it drains queued commands, returning the final state.
    ///
    /// A nomination still inside its debounce window is discarded.
    pub async fn shutdown(mut self) -> Result<TableOfContents, DriverError> {
        self.commands.take();
        let task = self.task.take().ok_or(DriverError::Closed)?;
        Ok(task.await?)
    }
}

impl Drop for TocDriver {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn run(
    mut toc: TableOfContents,
    mut commands: mpsc::Receiver<TocCommand>,
    snapshots: watch::Sender<TocSnapshot>,
) -> TableOfContents {
    loop {
        let deadline = toc.deadline().map(Instant::from_std);

        tokio::select! {
            command = commands.recv() => match command {
                Some(command) => apply(&mut toc, command),
                None => break,
            },
            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                toc.poll(Instant::now().into_std());
            }
        }

        let next = toc.snapshot();
        snapshots.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            *current = next;
            true
        });
    }

    tracing::debug!("Table of contents driver stopped");
    toc
}

fn apply(toc: &mut TableOfContents, command: TocCommand) {
    match command {
        TocCommand::SetSource(source) => toc.set_source(&source),
        TocCommand::Reconcile(rendered) => {
            toc.reconcile(&rendered);
        }
        TocCommand::Visibility(entries) => {
            toc.observe(&entries, Instant::now().into_std());
        }
        TocCommand::Click(id) => {
            if !toc.click(&id) {
                tracing::debug!("Ignoring click on unknown heading {}", id);
            }
        }
        TocCommand::Toggle(id) => toc.toggle(&id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toc::Display;
    use crate::tracker::TrackerConfig;
    use std::time::Duration;
    use tokio::time::sleep;

    const DOC: &str = "## Intro\n## Install\n### npm\n### cargo\n## Usage\n";

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn visible(id: &str) -> TocCommand {
        TocCommand::Visibility(vec![VisibilityEntry::new(id, 0.0, true)])
    }

    #[tokio::test(start_paused = true)]
    async fn last_nomination_in_window_wins() {
        let driver = TocDriver::spawn(TableOfContents::from_source(DOC, TrackerConfig::default()));

        driver.send(visible("intro")).await.unwrap();
        sleep(ms(100)).await;
        driver.send(visible("npm")).await.unwrap();

        sleep(ms(250)).await; // t = 350
        assert_eq!(driver.snapshot().active_id, None);

        sleep(ms(150)).await; // t = 500
        let snapshot = driver.snapshot();
        assert_eq!(snapshot.active_id.as_deref(), Some("npm"));
        assert_eq!(snapshot.expanded, vec!["install".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn click_is_published_immediately() {
        let driver = TocDriver::spawn(TableOfContents::from_source(DOC, TrackerConfig::default()));
        let mut updates = driver.subscribe();

        driver.send(visible("usage")).await.unwrap();
        driver.send(TocCommand::Click("cargo".to_string())).await.unwrap();

        updates.changed().await.unwrap();
        assert_eq!(updates.borrow().active_id.as_deref(), Some("cargo"));

        // The superseded nomination never fires
        sleep(ms(1000)).await;
        assert_eq!(driver.snapshot().active_id.as_deref(), Some("cargo"));
    }

    #[tokio::test(start_paused = true)]
    async fn reconcile_and_source_changes() {
        let driver = TocDriver::spawn(TableOfContents::new(TrackerConfig::default()));
        assert_eq!(driver.snapshot().display, Display::Loading);

        driver
            .send(TocCommand::SetSource("plain text".to_string()))
            .await
            .unwrap();
        driver
            .send(TocCommand::Reconcile(HashSet::new()))
            .await
            .unwrap();

        let toc = driver.shutdown().await.unwrap();
        assert_eq!(toc.display(), Display::Hidden);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_returns_final_state() {
        let driver = TocDriver::spawn(TableOfContents::from_source(DOC, TrackerConfig::default()));

        driver.send(TocCommand::Toggle("install".to_string())).await.unwrap();
        driver.send(visible("npm")).await.unwrap();

        let toc = driver.shutdown().await.unwrap();

        assert!(toc.is_expanded("install"));
        assert_eq!(toc.active_id(), None);
        assert_eq!(toc.tracker().pending_id(), Some("npm"));
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_handle_stops_task() {
        let driver = TocDriver::spawn(TableOfContents::from_source(DOC, TrackerConfig::default()));
        let mut updates = driver.subscribe();

        drop(driver);

        // The sender lives in the aborted task, so the channel closes
        assert!(updates.changed().await.is_err());
    }
}
