use std::{sync::Arc, time::Duration};

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::StreamExt;
use notify_debouncer_full::{
    new_debouncer,
    notify::{Error as NotifyError, RecursiveMode, Watcher},
    DebouncedEvent,
};
use tracing::{debug, error, info};

use crate::content_loader::reload_content;
use crate::state::{AppState, RefreshBroadcaster};

const DEBOUNCE: Duration = Duration::from_millis(200);

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(tx): State<RefreshBroadcaster>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, tx))
}

/// Holds the socket until either a reload is broadcast or the browser leaves.
async fn handle_socket(mut socket: WebSocket, tx: RefreshBroadcaster) {
    let mut rx = tx.subscribe();

    let reload = tokio::select! {
        signal = rx.recv() => signal.is_ok(),
        _ = drain_until_closed(&mut socket) => {
            debug!("Reload client went away");
            false
        }
    };

    if reload && socket.send(Message::Text("reload".to_string().into())).await.is_err() {
        debug!("Client disconnected before reload message could be sent");
    }
}

async fn drain_until_closed(socket: &mut WebSocket) {
    while let Some(Ok(message)) = socket.next().await {
        if matches!(message, Message::Close(_)) {
            break;
        }
    }
}

/// Editor scratch files (Emacs `.#lock` and `backup~`) never trigger a reload.
fn is_temp_file(event: &DebouncedEvent) -> bool {
    event.event.paths.iter().any(|path| {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|s| s.starts_with(".#") || s.ends_with('~'))
    })
}

fn is_relevant(event: &DebouncedEvent) -> bool {
    (event.kind.is_modify() || event.kind.is_create() || event.kind.is_remove()) && !is_temp_file(event)
}

pub fn start_content_watcher(tx: RefreshBroadcaster, app_state: Arc<AppState>) {
    info!(dir = %app_state.content_dir.display(), "Starting content watcher for hot-reload...");
    tokio::spawn(async move {
        let (watcher_tx, mut watcher_rx) = tokio::sync::mpsc::channel(1);

        let debouncer = new_debouncer(
            DEBOUNCE,
            None,
            move |res: Result<Vec<DebouncedEvent>, Vec<NotifyError>>| match res {
                Ok(events) => {
                    let changed: Vec<_> = events
                        .iter()
                        .filter(|event| is_relevant(event))
                        .flat_map(|event| &event.event.paths)
                        .map(|path| path.display().to_string())
                        .collect();
                    if !changed.is_empty() {
                        debug!(?changed, "Relevant file change detected");
                        if let Err(e) = watcher_tx.blocking_send(()) {
                            error!("Failed to send watcher event: {}", e);
                        }
                    }
                }
                Err(errors) => {
                    for e in errors {
                        error!("Watcher error: {}", e);
                    }
                }
            },
        );

        let mut debouncer = match debouncer {
            Ok(debouncer) => debouncer,
            Err(e) => {
                error!("Failed to create debouncer: {}", e);
                return;
            }
        };

        if let Err(e) = debouncer
            .watcher()
            .watch(&app_state.content_dir, RecursiveMode::Recursive)
        {
            error!("Failed to start watching content directory: {}", e);
            return;
        }

        // the debouncer stays alive as long as this loop runs
        while watcher_rx.recv().await.is_some() {
            info!("Content change detected, reloading content and sending signal...");
            reload_content(&app_state).await;

            if let Err(e) = tx.send(()) {
                debug!("No reload clients connected: {}", e);
            }
        }
    });
}
