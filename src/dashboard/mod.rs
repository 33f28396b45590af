//! Terminal dashboard that refreshes the server's statistics periodically.

mod snapshot;
pub use snapshot::{Header, Snapshot};

pub mod ui;

use std::time::Duration;

use anyhow::Context;
use chrono::{DateTime, Local};
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::DefaultTerminal;
use tokio::time::MissedTickBehavior;

use crate::api::Client;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Pause between two refreshes
    pub interval: Duration,
    /// Entries per "top" panel
    pub count: u32,
}

pub struct App {
    host: String,
    count: u32,
    header: Header,
    snapshot: Snapshot,
    /// Time of the last successful refresh
    updated: DateTime<Local>,
    /// Set if the last refresh failed, the previous snapshot stays on screen
    error: Option<String>,
}

impl App {
    pub fn new(
        host: String,
        count: u32,
        header: Header,
        snapshot: Snapshot,
        updated: DateTime<Local>,
    ) -> App {
        App {
            host,
            count,
            header,
            snapshot,
            updated,
            error: None,
        }
    }

    async fn refresh(&mut self, client: &Client) {
        match Snapshot::fetch(client, self.count).await {
            Ok(snapshot) => {
                self.snapshot = snapshot;
                self.updated = Local::now();
                self.error = None;
            }
            Err(err) => {
                log::warn!("couldn't refresh: {}", err);
                self.error = Some(err.to_string());
            }
        }
    }
}

fn is_quit(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// Fetch the initial data, then take over the terminal until the user quits.
///
/// Errors before the terminal is set up are returned, later refresh errors
/// are only displayed.
pub async fn run(client: &Client, opts: Options) -> anyhow::Result<()> {
    let header = Header::fetch(client).await.context("fetch api info")?;
    let snapshot = Snapshot::fetch(client, opts.count)
        .await
        .context("initial refresh")?;

    let mut app = App::new(
        client.host().to_string(),
        opts.count,
        header,
        snapshot,
        Local::now(),
    );

    let mut terminal = ratatui::try_init().context("initialize terminal")?;
    let result = event_loop(&mut terminal, &mut app, client, opts.interval).await;
    ratatui::restore();

    result
}

async fn event_loop(
    terminal: &mut DefaultTerminal,
    app: &mut App,
    client: &Client,
    interval: Duration,
) -> anyhow::Result<()> {
    let mut events = EventStream::new();

    // ticks missed during a slow refresh are dropped
    let mut interval = tokio::time::interval(interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval.tick().await;

    loop {
        terminal
            .draw(|frame| ui::draw(frame, app))
            .context("draw dashboard")?;

        tokio::select! {
            _ = interval.tick() => app.refresh(client).await,
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if is_quit(&key) => break,
                // resize and everything else only needs a redraw
                Some(Ok(_)) => {}
                Some(Err(err)) => return Err(err).context("read terminal event"),
                None => break,
            },
        }
    }

    log::info!("dashboard closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use chrono::{Local, TimeZone};
    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
    use tokio::net::TcpListener;

    use super::{is_quit, App, Header, Snapshot};
    use crate::api::{Client, TopItems};
    use crate::Config;

    fn key(code: KeyCode, modifiers: KeyModifiers, kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn quit_keys() {
        let press = KeyEventKind::Press;
        assert!(is_quit(&key(KeyCode::Char('q'), KeyModifiers::NONE, press)));
        assert!(is_quit(&key(KeyCode::Esc, KeyModifiers::NONE, press)));
        assert!(is_quit(&key(KeyCode::Char('c'), KeyModifiers::CONTROL, press)));
    }

    #[test]
    fn other_keys() {
        let press = KeyEventKind::Press;
        assert!(!is_quit(&key(KeyCode::Char('c'), KeyModifiers::NONE, press)));
        assert!(!is_quit(&key(KeyCode::Char('r'), KeyModifiers::NONE, press)));
        assert!(!is_quit(&key(
            KeyCode::Char('q'),
            KeyModifiers::NONE,
            KeyEventKind::Release
        )));
    }

    #[tokio::test]
    async fn failed_refresh_keeps_snapshot() {
        // bind and drop to get a port nobody listens on
        let host = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap().to_string()
        };
        let client = Client::new(&Config {
            host: host.clone(),
            token: Some("SECRETTOKEN".to_string()),
            timeout: Duration::from_secs(5),
        })
        .unwrap();

        let snapshot = Snapshot {
            recent_blocked: "ads.example.com".to_string(),
            top: TopItems {
                queries: HashMap::from([("example.com".to_string(), 12)]),
                blocked: HashMap::from([("ads.example.com".to_string(), 3)]),
            },
            ..Default::default()
        };
        let updated = Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).single().unwrap();
        let mut app = App::new(host, 10, Header::default(), snapshot.clone(), updated);

        app.refresh(&client).await;

        assert_eq!(app.snapshot, snapshot);
        assert_eq!(app.updated, updated);
        let error = app.error.as_deref().unwrap();
        assert!(!error.contains("SECRETTOKEN"));

        // the next failure replaces the message, the data still stays
        app.refresh(&client).await;
        assert_eq!(app.snapshot, snapshot);
        assert!(app.error.is_some());
    }
}
