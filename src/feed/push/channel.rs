use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use futures_util::StreamExt;
use tokio::sync::oneshot;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use crate::feed::api::PushSource;
use crate::feed::push::envelope::{self, PushEvent};
use crate::session::Session;

// =====================================================================
// Shared State
// =====================================================================

struct ChannelState {
    /// Decoded events ready to be consumed by the orchestrator.
    events: VecDeque<PushEvent>,
    closed: bool,
}

// =====================================================================
// Public channel (poll facade)
// =====================================================================

/// One persistent push connection for the lifetime of a feed view.
///
/// A background task decodes incoming envelopes into [`PushEvent`]s consumed
/// via `poll_event`. There is no reconnection, backoff, or buffering: if the
/// connection drops, live delivery stops until the consumer opens a new
/// channel. `close()` releases the connection deterministically and is
/// idempotent.
pub struct WsPushChannel {
    state: Arc<Mutex<ChannelState>>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl WsPushChannel {
    /// Opens the channel, authorizing with the session credential.
    pub fn open(endpoint: &str, session: &Session) -> Self {
        // The credential travels as a query parameter, per the server's
        // handshake contract.
        let url = format!("{}?token={}", endpoint, session.token().expose());

        let state = Arc::new(Mutex::new(ChannelState {
            events: VecDeque::new(),
            closed: false,
        }));
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let bg_state = state.clone();
        std::thread::spawn(move || {
            let rt = tokio::runtime::Runtime::new().expect("push runtime");
            rt.block_on(run_connection(url, bg_state, shutdown_rx));
        });

        Self {
            state,
            shutdown: Some(shutdown_tx),
        }
    }
}

impl PushSource for WsPushChannel {
    fn poll_event(&mut self) -> Option<PushEvent> {
        let mut s = self.state.lock().unwrap();
        if s.closed {
            return None;
        }
        s.events.pop_front()
    }

    fn close(&mut self) {
        // Idempotent: the shutdown sender is consumed on first use.
        if let Some(tx) = self.shutdown.take() {
            log::debug!("[WS] closing channel");
            let _ = tx.send(());
        }
        self.state.lock().unwrap().closed = true;
    }
}

// =====================================================================
// Background task
// =====================================================================

async fn run_connection(
    url: String,
    state: Arc<Mutex<ChannelState>>,
    mut shutdown: oneshot::Receiver<()>,
) {
    log::info!("[WS] connecting to push endpoint");
    let mut stream = match connect_async(url.as_str()).await {
        Ok((stream, _response)) => stream,
        Err(e) => {
            // Accepted limitation: a failed channel just means no live
            // updates until the feed view is reactivated.
            log::warn!("[WS] connect failed: {e}");
            return;
        }
    };
    log::info!("[WS] connected");

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                log::info!("[WS] close requested");
                let _ = stream.close(None).await;
                break;
            }
            message = stream.next() => match message {
                Some(Ok(Message::Text(raw))) => handle_text(&state, &raw),
                Some(Ok(Message::Close(_))) | None => {
                    log::warn!("[WS] connection closed by server");
                    break;
                }
                // ping/pong/binary frames carry no feed events
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    log::warn!("[WS] read error: {e}");
                    break;
                }
            }
        }
    }
}

fn handle_text(state: &Arc<Mutex<ChannelState>>, raw: &str) {
    match envelope::decode(raw) {
        Ok(Some(event)) => {
            log::trace!("[WS] <<< {event:?}");
            state.lock().unwrap().events.push_back(event);
        }
        Ok(None) => log::trace!("[WS] ignoring unrecognized event kind"),
        Err(e) => log::warn!("[WS] undecodable message: {e}"),
    }
}
