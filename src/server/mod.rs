//! Server lifecycle module
//!
//! [`start`] turns a validated configuration into a running
//! [`ServerInstance`]; [`ServerInstance::stop`] tears it down again. Each
//! instance owns its listener, shutdown signal, and logger, so any number
//! of servers can run side by side within one process.

mod listener;

use crate::config::{ServerConfig, Site};
use crate::error::{StartError, StopError};
use crate::handler;
use crate::logger::{LogMode, Logger};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Notify;
use tokio::task::JoinHandle;

/// Shared state the request path reads. Never mutated after startup.
pub struct ServerState {
    pub site: Site,
    pub logger: Logger,
    pub log_format: String,
}

/// A started (or inert) static server.
///
/// The listening socket lives in the accept task and the log file handle in
/// the logger; [`stop`](Self::stop) releases both. Dropping a running
/// instance aborts the accept task, so the port is freed on every exit
/// path.
pub struct ServerInstance {
    running: Option<Running>,
}

struct Running {
    addr: SocketAddr,
    shutdown: Arc<Notify>,
    accept_task: JoinHandle<()>,
    logger: Logger,
}

/// Configure, bind, and launch a static server.
///
/// With no folders configured this is a deliberate no-op success: the
/// returned instance is inert and no socket is bound. Await the result
/// before sending traffic; a returned instance is accepting connections.
pub async fn start(config: ServerConfig) -> Result<ServerInstance, StartError> {
    if config.folders.is_empty() {
        return Ok(ServerInstance { running: None });
    }

    config.validate()?;

    let mode = LogMode::from_setting(&config.logging);
    let logger = Logger::new(&mode)?;

    let site = config.resolve();
    for mount in &site.mounts {
        logger.debug(&format!(
            "Mounting folder `{}` at `{}`",
            mount.source.display(),
            mount.prefix
        ));
    }
    if let Some(fallback) = &site.fallback {
        logger.debug(&format!("Using `{}` as 404 fallback", fallback.display()));
    }

    let addr = config
        .socket_addr()
        .map_err(|e| StartError::InvalidAddress {
            addr: format!("{}:{}", config.host, config.port),
            reason: e.to_string(),
        })?;
    let tcp = listener::bind(addr).map_err(|source| StartError::Bind { addr, source })?;
    let local_addr = tcp
        .local_addr()
        .map_err(|source| StartError::Bind { addr, source })?;

    let state = Arc::new(ServerState {
        site,
        logger: logger.clone(),
        log_format: config.log_format.clone(),
    });
    let shutdown = Arc::new(Notify::new());
    let accept_task = tokio::spawn(accept_loop(tcp, Arc::clone(&state), Arc::clone(&shutdown)));

    logger.info(&format!(
        "Static server running at http://{}:{}",
        config.host,
        local_addr.port()
    ));

    Ok(ServerInstance {
        running: Some(Running {
            addr: local_addr,
            shutdown,
            accept_task,
            logger,
        }),
    })
}

impl ServerInstance {
    /// Whether this instance actually bound a socket.
    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// The bound address, with the real port when `port` was `0`.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.running.as_ref().map(|running| running.addr)
    }

    /// Stop accepting, close the socket, and flush the log sink.
    ///
    /// Idempotent: stopping an already-stopped or inert instance is a
    /// no-op success. Connections already being served finish on their own
    /// tasks.
    pub async fn stop(&mut self) -> Result<(), StopError> {
        let Some(running) = self.running.take() else {
            return Ok(());
        };

        running.shutdown.notify_one();
        let _ = running.accept_task.await;

        running.logger.info("Static server stopped");
        running.logger.flush()?;
        Ok(())
    }
}

impl Drop for ServerInstance {
    fn drop(&mut self) {
        if let Some(running) = self.running.take() {
            running.accept_task.abort();
        }
    }
}

/// Accept connections until the shutdown signal fires. The listener is
/// dropped on exit, which closes the socket.
async fn accept_loop(listener: TcpListener, state: Arc<ServerState>, shutdown: Arc<Notify>) {
    loop {
        tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => handle_connection(stream, peer, Arc::clone(&state)),
                Err(e) => state.logger.error(&format!("Failed to accept connection: {e}")),
            },
            () = shutdown.notified() => break,
        }
    }
}

/// Serve one connection on its own task.
fn handle_connection(stream: TcpStream, peer: SocketAddr, state: Arc<ServerState>) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);
        let logger = state.logger.clone();

        let service = service_fn(move |req| {
            let state = Arc::clone(&state);
            async move { handler::handle_request(req, peer, state).await }
        });

        let mut builder = http1::Builder::new();
        builder.keep_alive(true);

        if let Err(err) = builder.serve_connection(io, service).await {
            logger.error(&format!("Failed to serve connection: {err:?}"));
        }
    });
}
