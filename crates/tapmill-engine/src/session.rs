//! Session provider: credential acquisition and the login exchange
//!
//! Owns the messenger-connection etiquette (connect only if nobody else
//! did, and tear back down what it opened), honors flood-wait signals by
//! sleeping exactly the demanded duration plus a fixed margin, and maps the
//! platform's unauthorized/deactivated faults to the fatal invalid-session
//! error.

use std::time::Duration;
use tapmill_client::{parse_callback_url, GameBackend, Messenger, MessengerError};
use tapmill_core::{AuthPayload, LoginResponse, Result, TapError};
use tracing::{info, warn};

/// Extra seconds slept on top of a flood-wait signal
pub const FLOOD_WAIT_MARGIN_SECS: u64 = 3;

/// Platform identifier sent with the web-view launch
const WEB_VIEW_PLATFORM: &str = "android";

/// Obtain a fresh signed auth payload from the messaging platform.
///
/// Retries peer resolution indefinitely on flood-wait; every other platform
/// fault is an error for the caller's backoff executor to absorb, except
/// unauthorized/deactivated which become [`TapError::InvalidSession`].
pub async fn web_app_payload<M: Messenger>(
    identity: &str,
    messenger: &mut M,
    bot_name: &str,
    launch_url: &str,
) -> Result<AuthPayload> {
    let had_connection = messenger.is_connected();
    if !had_connection {
        messenger
            .connect()
            .await
            .map_err(|e| map_messenger(identity, e))?;
    }

    let result = acquire(identity, messenger, bot_name, launch_url).await;

    // Tear down only what this call opened
    if !had_connection {
        if let Err(e) = messenger.disconnect().await {
            warn!("{} | disconnect failed: {}", identity, e);
        }
    }

    result
}

async fn acquire<M: Messenger>(
    identity: &str,
    messenger: &mut M,
    bot_name: &str,
    launch_url: &str,
) -> Result<AuthPayload> {
    let peer = loop {
        match messenger.resolve_peer(bot_name).await {
            Ok(peer) => break peer,
            Err(MessengerError::FloodWait(secs)) => {
                let wait = secs + FLOOD_WAIT_MARGIN_SECS;
                warn!(
                    "{} | flood wait {}s on peer resolution, sleeping {}s",
                    identity, secs, wait
                );
                tokio::time::sleep(Duration::from_secs(wait)).await;
            }
            Err(e) => return Err(map_messenger(identity, e)),
        }
    };

    let callback = messenger
        .request_web_view(&peer, WEB_VIEW_PLATFORM, launch_url)
        .await
        .map_err(|e| map_messenger(identity, e))?;

    parse_callback_url(&callback)
}

/// Exchange the auth payload for a bearer token; the new token replaces the
/// backend's authorization for every subsequent call.
pub async fn login<B: GameBackend>(
    identity: &str,
    backend: &mut B,
    payload: &AuthPayload,
) -> Result<LoginResponse> {
    let login = backend.game_start(payload).await?;
    backend.set_token(&login.token);

    info!(
        "{} | logged in | balance: {} | energy: {}/{}",
        identity, login.state.coins_balance, login.state.current_energy, login.state.energy_limit
    );

    Ok(login)
}

fn map_messenger(identity: &str, err: MessengerError) -> TapError {
    if err.is_fatal() {
        TapError::InvalidSession(identity.to_string())
    } else {
        TapError::Messenger(err.to_string())
    }
}
