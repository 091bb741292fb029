use std::net::SocketAddr;

use axum::Router;
use axum::extract::{Query, State};
use axum::routing::get;
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::dispatch::{ActionService, Dispatcher};
use crate::error::Result;

/// Wire query of the communication endpoint: the serialized envelope
/// travels as one string-valued `content` parameter.
#[derive(Debug, Deserialize)]
struct CommParams {
    content: Option<String>,
}

struct EndpointState<S> {
    dispatcher: Dispatcher<S>,
    shutdown: watch::Sender<bool>,
}

impl<S> Clone for EndpointState<S> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: self.dispatcher.clone(),
            shutdown: self.shutdown.clone(),
        }
    }
}

/// A running HTTP endpoint for one agent: `/comm` for messages, `/Stop` to
/// cease serving and release the port.
pub struct AgentServer {
    local_addr: SocketAddr,
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl AgentServer {
    /// Binds and serves an agent's endpoints. Port 0 picks a free port; the
    /// bound address is available via `local_addr`.
    pub async fn spawn<S>(dispatcher: Dispatcher<S>, host: &str, port: u16) -> Result<AgentServer>
    where
        S: ActionService + 'static,
    {
        let (shutdown, mut stop_signal) = watch::channel(false);
        let agent = dispatcher.identity().name().to_string();
        let state = EndpointState {
            dispatcher,
            shutdown: shutdown.clone(),
        };

        let app = Router::new()
            .route("/comm", get(comm::<S>))
            .route("/Stop", get(stop::<S>))
            .layer(TraceLayer::new_for_http())
            .with_state(state);

        let listener = TcpListener::bind((host, port)).await?;
        let local_addr = listener.local_addr()?;
        info!(%agent, "agent endpoint listening on http://{local_addr}");

        let handle = tokio::spawn(async move {
            let wait_for_stop = async move {
                let _ = stop_signal.changed().await;
            };
            if let Err(err) = axum::serve(listener, app)
                .with_graceful_shutdown(wait_for_stop)
                .await
            {
                error!(%agent, %err, "agent server error");
            }
        });

        Ok(AgentServer {
            local_addr,
            shutdown,
            handle,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn comm_address(&self) -> String {
        format!("http://{}/comm", self.local_addr)
    }

    pub fn stop_address(&self) -> String {
        format!("http://{}/Stop", self.local_addr)
    }

    /// Programmatic equivalent of the `/Stop` endpoint.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        let _ = self.handle.await;
    }

    /// Waits for the server to finish, however it was stopped.
    pub async fn wait(self) {
        let _ = self.handle.await;
    }
}

async fn comm<S: ActionService>(
    State(state): State<EndpointState<S>>,
    Query(params): Query<CommParams>,
) -> String {
    let raw = params.content.unwrap_or_default();
    let reply = state.dispatcher.dispatch(&raw).await;
    reply.serialize().unwrap_or_else(|err| {
        error!(%err, "reply serialization failed");
        String::new()
    })
}

async fn stop<S: ActionService>(State(state): State<EndpointState<S>>) -> &'static str {
    info!("stop requested");
    let _ = state.shutdown.send(true);
    "Stopping server."
}
