//! Runtime bridge between UI command queue and backend event intake.

use std::thread;

use client_core::DirectoryClient;
use crossbeam_channel::{Receiver, Sender};
use shared::{domain::LoadedDirectory, error::FetchError};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::cards::decode_portrait;

pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, client: DirectoryClient) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!("failed to build backend runtime: {err}");
                // Without a runtime the pending load can never finish.
                deliver_load_outcome(
                    &ui_tx,
                    Err(FetchError::Transport(format!(
                        "backend worker startup failure: {err}"
                    ))),
                );
                return;
            }
        };

        runtime.block_on(async move {
            let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::LoadUsers => {
                        let outcome = client.load().await;
                        if let Err(err) = &outcome {
                            tracing::error!("backend: user batch load failed: {err}");
                        }
                        deliver_load_outcome(&ui_tx, outcome);
                    }
                    BackendCommand::FetchPortrait { url } => {
                        let client = client.clone();
                        let ui_tx = ui_tx.clone();
                        tokio::spawn(async move {
                            let event = match client.fetch_portrait(&url).await {
                                Ok(bytes) => match decode_portrait(&bytes) {
                                    Ok(image) => UiEvent::PortraitLoaded { url, image },
                                    Err(reason) => UiEvent::PortraitFailed { url, reason },
                                },
                                Err(err) => UiEvent::PortraitFailed {
                                    url,
                                    reason: err.to_string(),
                                },
                            };
                            let _ = ui_tx.try_send(event);
                        });
                    }
                }
            }
            tracing::debug!("ui command channel closed; backend worker exiting");
        });
    });
}

/// Blocks until the UI queue has room for the load outcome. Returns `false`
/// once the UI is gone.
fn deliver_load_outcome(
    ui_tx: &Sender<UiEvent>,
    outcome: Result<LoadedDirectory, FetchError>,
) -> bool {
    match ui_tx.send(UiEvent::UsersLoaded(outcome)) {
        Ok(()) => true,
        Err(_) => {
            tracing::error!("ui event channel closed; dropping user batch outcome");
            false
        }
    }
}
