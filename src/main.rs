//! capy-push - Push notifications for the desktop
//!
//! Reads host events from stdin (one JSON object per line) and shows each
//! push message through the freedesktop notification daemon.

mod config;
mod host_events;
mod token;

use capy_notify::{EventListener, FreedesktopHost, MemoryHost, PushListener};
use config::PushConfig;
use host_events::HostEvent;
use log::{debug, info, warn};
use std::error::Error;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use token::HttpTokenForwarder;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("Starting capy-push...");

    let config = config::load();
    let listener = build_listener(&config);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    rt.block_on(run(listener))?;

    info!("capy-push stopped");
    Ok(())
}

/// Wire the listener to the session notification daemon, or to the log when
/// no session bus is reachable.
fn build_listener(config: &PushConfig) -> Arc<dyn PushListener> {
    let listener = match FreedesktopHost::connect(config.freedesktop_options()) {
        Ok(host) => {
            match host.server_information() {
                Ok(server) => info!(
                    "Notification daemon: {} {} (spec {})",
                    server.name, server.version, server.spec_version
                ),
                Err(e) => warn!("Notification daemon not answering: {}", e),
            }
            if let Ok(caps) = host.capabilities() {
                debug!("Daemon capabilities: {}", caps.join(", "));
            }
            EventListener::new(Arc::new(host))
        }
        Err(e) => {
            warn!("Session bus unavailable: {}. Notifications go to the log.", e);
            EventListener::new(Arc::new(MemoryHost::new()))
        }
    };

    let listener = listener
        .with_channel(config.channel.clone())
        .with_defaults(config.notification.clone());

    let listener = match &config.token_endpoint {
        Some(endpoint) => match HttpTokenForwarder::new(endpoint.clone()) {
            Ok(forwarder) => {
                info!("Forwarding push tokens to {}", endpoint);
                listener.with_forwarder(Arc::new(forwarder))
            }
            Err(e) => {
                warn!("{}. Push tokens will only be logged.", e);
                listener
            }
        },
        None => listener,
    };

    Arc::new(listener)
}

/// Read host events until stdin closes or Ctrl-C.
async fn run(listener: Arc<dyn PushListener>) -> std::io::Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());

    tokio::select! {
        result = serve(stdin, listener) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted");
            Ok(())
        }
    }
}

/// Feed events from `reader` to the listener, one at a time and in order.
///
/// Callbacks run on a single blocking worker so a slow display call can
/// never let a later event overtake an earlier one.
async fn serve<R>(reader: R, listener: Arc<dyn PushListener>) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let (tx, rx) = mpsc::unbounded_channel::<HostEvent>();
    let worker = tokio::task::spawn_blocking(move || dispatch_all(rx, listener.as_ref()));

    let result = read_events(reader, &tx).await;

    // Closing the channel lets the worker drain what is queued and stop.
    drop(tx);
    worker.await?;
    result
}

fn dispatch_all(mut rx: mpsc::UnboundedReceiver<HostEvent>, listener: &dyn PushListener) {
    while let Some(event) = rx.blocking_recv() {
        host_events::dispatch(listener, event);
    }
}

async fn read_events<R>(mut reader: R, tx: &mpsc::UnboundedSender<HostEvent>) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            debug!("stdin closed");
            return Ok(());
        }

        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line.trim(),
            Err(e) => {
                warn!("Skipping host event that is not UTF-8: {}", e);
                continue;
            }
        };
        if line.is_empty() {
            continue;
        }

        match HostEvent::parse(line) {
            Ok(event) => {
                if tx.send(event).is_err() {
                    warn!("Dispatch worker gone, stopping");
                    return Ok(());
                }
            }
            Err(e) => warn!("Skipping malformed host event: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use capy_notify::{DisplayHost, EventListener, MemoryHost, NotificationRecord, NotifyError};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Display host that is slow for the title "A" and records what it showed.
    #[derive(Default)]
    struct SlowDisplay {
        shown: Mutex<Vec<String>>,
    }

    impl DisplayHost for SlowDisplay {
        fn display(&self, record: &NotificationRecord) -> Result<(), NotifyError> {
            if record.title == "A" {
                std::thread::sleep(Duration::from_millis(200));
            }
            self.shown.lock().unwrap().push(record.title.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_events_dispatched_in_order() {
        let display = Arc::new(SlowDisplay::default());
        let listener: Arc<dyn PushListener> = Arc::new(EventListener::from_parts(
            Arc::new(MemoryHost::new()),
            display.clone(),
        ));

        let input: &[u8] = b"{\"type\":\"message\",\"notification\":{\"title\":\"A\",\"body\":\"1\"}}\n\
{\"type\":\"message\",\"notification\":{\"title\":\"B\",\"body\":\"2\"}}\n";
        serve(input, listener).await.unwrap();

        assert_eq!(*display.shown.lock().unwrap(), vec!["A".to_string(), "B".to_string()]);
    }

    #[tokio::test]
    async fn test_latest_event_stays_visible() {
        let host = Arc::new(MemoryHost::new());
        let listener: Arc<dyn PushListener> = Arc::new(EventListener::new(host.clone()));

        let input: &[u8] = b"{\"type\":\"message\",\"notification\":{\"title\":\"A\",\"body\":\"1\"}}\n\
{\"type\":\"message\",\"notification\":{\"title\":\"B\",\"body\":\"2\"}}";
        serve(input, listener).await.unwrap();

        let visible = host.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].title, "B");
        assert_eq!(visible[0].body, "2");
    }

    #[tokio::test]
    async fn test_invalid_lines_are_skipped() {
        let host = Arc::new(MemoryHost::new());
        let listener: Arc<dyn PushListener> = Arc::new(EventListener::new(host.clone()));

        let input: &[u8] = b"\xff\xfe\n\
not json\n\
\n\
{\"type\":\"token\",\"token\":\"abc\"}\n\
{\"type\":\"message\",\"notification\":{\"title\":\"after\",\"body\":\"garbage\"}}\n";
        serve(input, listener).await.unwrap();

        let visible = host.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].title, "after");
    }
}
