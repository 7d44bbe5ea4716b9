//! [`ApiServer`] – HTTP(S) transport for the fleet API.
//!
//! Listens on `0.0.0.0:3000` unless configured otherwise.  Each accepted
//! socket is served on its own tokio task: TLS is negotiated first when the
//! config carries a certificate and key, then the connection is handed to
//! hyper with the axum application as its service.

use std::net::SocketAddr;
use std::sync::Arc;

use armada_hal::Master;
use armada_types::ArmadaError;
use axum::Router;
use hyper::server::conn::http1;
use hyper_util::rt::TokioIo;
use hyper_util::service::TowerToHyperService;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_rustls::TlsAcceptor;
use tracing::{debug, error, info, warn};

use crate::config::ApiConfig;
use crate::router;
use crate::tls;

// ---------------------------------------------------------------------------
// ApiServer
// ---------------------------------------------------------------------------

/// The fleet's HTTP server.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use armada_api::{ApiConfig, ApiServer};
/// use armada_hal::Master;
///
/// #[tokio::main]
/// async fn main() {
///     let master = Arc::new(Master::new());
///     let handle = ApiServer::new(master, ApiConfig::default())
///         .start()
///         .await
///         .expect("api server failed to start");
///     println!("listening on {}", handle.local_addr());
///     handle.stop().await;
/// }
/// ```
pub struct ApiServer {
    master: Arc<Master>,
    config: ApiConfig,
}

impl ApiServer {
    /// Create a server exposing `master` with `config`.
    pub fn new(master: Arc<Master>, config: ApiConfig) -> Self {
        Self { master, config }
    }

    /// Override the listening port (builder-style).
    pub fn with_port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Return the configured port.
    pub fn port(&self) -> u16 {
        self.config.port
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// The axum application this server would serve.
    pub fn app(&self) -> Router {
        router::app(Arc::clone(&self.master), &self.config)
    }

    /// Bind the listener and run the accept loop in the background.
    ///
    /// Returns as soon as the socket is bound; the returned [`ApiHandle`]
    /// owns the background task, and dropping it stops the accept loop.
    ///
    /// # Errors
    ///
    /// - [`ArmadaError::Config`] if TLS material cannot be loaded.
    /// - [`ArmadaError::Transport`] if the listener cannot bind.
    pub async fn start(self) -> Result<ApiHandle, ArmadaError> {
        let acceptor = if self.config.tls_enabled() {
            Some(tls::load_acceptor(&self.config.cert, &self.config.key)?)
        } else {
            warn!("TLS not configured; serving plaintext HTTP");
            None
        };
        if !self.config.auth_enabled() {
            warn!("basic auth not configured; API is open to any client");
        }

        let bind = (self.config.host.as_str(), self.config.port);
        let listener = TcpListener::bind(bind).await.map_err(|e| {
            ArmadaError::Transport(format!(
                "bind error on {}:{}: {e}",
                self.config.host, self.config.port
            ))
        })?;
        let local_addr = listener
            .local_addr()
            .map_err(|e| ArmadaError::Transport(format!("local address unavailable: {e}")))?;

        let scheme = if acceptor.is_some() { "https" } else { "http" };
        info!(%local_addr, scheme, "API listening");

        let app = self.app();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(accept_loop(listener, app, acceptor, shutdown_rx));

        Ok(ApiHandle {
            local_addr,
            shutdown: Some(shutdown_tx),
            task,
        })
    }
}

// ---------------------------------------------------------------------------
// ApiHandle
// ---------------------------------------------------------------------------

/// Handle to a running [`ApiServer`].
///
/// The accept loop runs only while the handle is alive: dropping it without
/// calling [`ApiHandle::stop`] closes the listener as well.
#[must_use = "dropping the handle stops the server"]
pub struct ApiHandle {
    local_addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl ApiHandle {
    /// The address the listener actually bound (useful with port `0`).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stop accepting connections and wait for the accept loop to exit.
    /// Connections already being served run to completion on their own tasks.
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Err(e) = (&mut self.task).await {
            error!(error = %e, "accept loop ended abnormally");
        }
        info!(local_addr = %self.local_addr, "API stopped");
    }
}

// ---------------------------------------------------------------------------
// Accept loop
// ---------------------------------------------------------------------------

async fn accept_loop(
    listener: TcpListener,
    app: Router,
    acceptor: Option<TlsAcceptor>,
    mut shutdown: oneshot::Receiver<()>,
) {
    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    let app = app.clone();
                    let acceptor = acceptor.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, peer, app, acceptor).await {
                            error!(%peer, error = %e, "client error");
                        }
                    });
                }
                Err(e) => {
                    error!(error = %e, "accept error");
                }
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Per-connection handler
// ---------------------------------------------------------------------------

async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    app: Router,
    acceptor: Option<TlsAcceptor>,
) -> Result<(), ArmadaError> {
    debug!(%peer, "connection accepted");
    match acceptor {
        Some(acceptor) => {
            let tls = acceptor
                .accept(stream)
                .await
                .map_err(|e| ArmadaError::Transport(format!("tls handshake with {peer}: {e}")))?;
            serve(tls, peer, app).await
        }
        None => serve(stream, peer, app).await,
    }
}

async fn serve<S>(stream: S, peer: SocketAddr, app: Router) -> Result<(), ArmadaError>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    http1::Builder::new()
        .serve_connection(TokioIo::new(stream), TowerToHyperService::new(app))
        .await
        .map_err(|e| ArmadaError::Transport(format!("http error from {peer}: {e}")))
}
