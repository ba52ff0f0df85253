// src/services/sync.rs

use tokio::{sync::broadcast, task::JoinHandle};

use crate::{models::auth::SessionEvent, services::state::Estoque};

/// Escuta as trocas de sessão: login recarrega o espelho, logout limpa.
pub fn spawn_session_listener(
    mut events: broadcast::Receiver<SessionEvent>,
    estoque: Estoque,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(SessionEvent::SignedIn(session)) => {
                    tracing::info!("🔑 Login de {}, sincronizando dados...", session.email);
                    if let Err(e) = estoque.refresh().await {
                        tracing::error!("🔥 Falha ao sincronizar após login: {:?}", e);
                    }
                }
                Ok(SessionEvent::SignedOut(_)) => estoque.clear().await,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!("⚠️ {} avisos de sessão perdidos, sincronizando.", skipped);
                    if let Err(e) = estoque.refresh().await {
                        tracing::error!("🔥 Falha ao sincronizar: {:?}", e);
                    }
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}
