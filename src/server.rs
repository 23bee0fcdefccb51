//! HTTP server implementation using hyper.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http_body_util::{BodyExt, Full, Limited};
use hyper::body::Incoming;
use hyper::header::HeaderValue;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::{TokioExecutor, TokioIo, TokioTimer};
use hyper_util::server::conn::auto;
use tokio::net::TcpListener;
use tokio::sync::{Semaphore, oneshot};
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, error, info, warn};

use crate::config::{Config, SharedConfig};
use crate::db::Handle;
use crate::response;
use crate::router::{Context, RouteMatch, RouterHandle};

/// Maximum request body size in bytes (1 MB).
const MAX_BODY_SIZE: usize = 1_048_576;

/// Maximum number of concurrent connections.
const MAX_CONNECTIONS: usize = 128;

/// Timeout for reading request headers (slowloris protection).
const HEADER_READ_TIMEOUT: Duration = Duration::from_secs(2);

/// Pause after a failed `accept()` so errors like EMFILE do not spin the loop.
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// Shared server state.
pub struct State {
    pub config: SharedConfig,
    pub db: Handle,
    pub router: Arc<RouterHandle>,
}

/// Handle to a running server instance.
pub struct Server {
    addr: SocketAddr,
    shutdown_tx: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl Server {
    /// The address the server is listening on.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Wait for the accept loop to end on its own. It only does so when the
    /// task panics, which is reported as `Error::Internal`.
    pub async fn wait(&mut self) -> crate::Result<()> {
        (&mut self.task).await.map_err(task_failed)
    }

    /// Shut down the accept loop and wait for it to finish.
    pub async fn shutdown(self) -> crate::Result<()> {
        let _ = self.shutdown_tx.send(());
        self.task.await.map_err(task_failed)
    }
}

fn task_failed(e: JoinError) -> crate::Error {
    crate::Error::Internal(format!("accept loop terminated: {e}"))
}

/// Add security headers to a response.
fn add_standard_headers(response: &mut Response<Full<Bytes>>) {
    let headers = response.headers_mut();
    headers.insert("X-Content-Type-Options", HeaderValue::from_static("nosniff"));
    headers.insert("X-Frame-Options", HeaderValue::from_static("DENY"));
}

fn payload_too_large() -> Response<Full<Bytes>> {
    response::error(StatusCode::PAYLOAD_TOO_LARGE, "Payload too large")
}

/// Handle an incoming HTTP request.
async fn handle_request(
    req: Request<Incoming>,
    state: Arc<State>,
) -> Result<Response<Full<Bytes>>, std::convert::Infallible> {
    let (parts, body) = req.into_parts();

    // Reject oversized bodies early via Content-Length header
    if let Some(cl) = parts.headers.get(hyper::header::CONTENT_LENGTH)
        && let Ok(len) = cl.to_str().unwrap_or("0").parse::<usize>()
        && len > MAX_BODY_SIZE
    {
        let mut response = payload_too_large();
        add_standard_headers(&mut response);
        return Ok(response);
    }

    // Read body with size limit (fallback for chunked encoding)
    let body_bytes = match BodyExt::collect(Limited::new(body, MAX_BODY_SIZE)).await {
        Ok(collected) => collected.to_bytes(),
        Err(_) => {
            let mut response = payload_too_large();
            add_standard_headers(&mut response);
            return Ok(response);
        }
    };

    let method = parts.method;
    let path = parts.uri.path().to_string();

    // Match route
    let mut response = match state.router.match_route(&method, &path) {
        RouteMatch::Matched { handler, params } => {
            let ctx = Context {
                headers: parts.headers,
                params,
                body: body_bytes,
                db: state.db.clone(),
                config: Arc::clone(&state.config),
            };

            match handler(ctx).await {
                Ok(response) => response,
                Err(e) => e.into_response(),
            }
        }
        RouteMatch::MethodNotAllowed => {
            response::error(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
        }
        RouteMatch::NotFound => response::error(StatusCode::NOT_FOUND, "Not found"),
    };

    debug!("{} {} -> {}", method, path, response.status().as_u16());

    add_standard_headers(&mut response);
    Ok(response)
}

/// Bind, start accepting connections, and return a handle.
///
/// The returned [`Server`] exposes the bound address and a
/// [`shutdown`](Server::shutdown) method for graceful termination.
pub async fn start(
    config: Config,
    db: Handle,
    router: Arc<RouterHandle>,
) -> crate::Result<Server> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    let addr = listener.local_addr()?;

    let state = Arc::new(State {
        config: Arc::new(config),
        db,
        router,
    });

    info!("Server listening on http://{}", addr);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let semaphore = Arc::new(Semaphore::new(MAX_CONNECTIONS));

    let task = tokio::spawn(async move {
        tokio::pin!(shutdown_rx);

        loop {
            tokio::select! {
                result = listener.accept() => {
                    let (stream, remote_addr) = match result {
                        Ok(accepted) => accepted,
                        Err(e) => {
                            warn!("Failed to accept connection: {}", e);
                            tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
                            continue;
                        }
                    };
                    let io = TokioIo::new(stream);

                    match semaphore.clone().try_acquire_owned() {
                        Ok(permit) => {
                            let state = Arc::clone(&state);
                            tokio::spawn(async move {
                                let service = service_fn(move |req| {
                                    let state = Arc::clone(&state);
                                    handle_request(req, state)
                                });

                                let mut builder = auto::Builder::new(TokioExecutor::new());
                                builder.http1()
                                    .timer(TokioTimer::new())
                                    .header_read_timeout(HEADER_READ_TIMEOUT);

                                if let Err(e) = builder.serve_connection(io, service).await {
                                    error!("Error serving connection from {}: {}", remote_addr, e);
                                }

                                drop(permit);
                            });
                        }
                        Err(_) => {
                            warn!("Connection limit reached, rejecting {}", remote_addr);
                            tokio::spawn(async move {
                                let service = service_fn(|_req: Request<Incoming>| async {
                                    Ok::<_, std::convert::Infallible>(response::error(
                                        StatusCode::SERVICE_UNAVAILABLE,
                                        "Service unavailable",
                                    ))
                                });

                                let mut builder = auto::Builder::new(TokioExecutor::new());
                                builder.http1()
                                    .timer(TokioTimer::new())
                                    .header_read_timeout(HEADER_READ_TIMEOUT);

                                let _ = builder.serve_connection(io, service).await;
                            });
                        }
                    }
                }
                _ = &mut shutdown_rx => {
                    info!("Shutting down listener on {}", addr);
                    break;
                }
            }
        }
    });

    Ok(Server {
        addr,
        shutdown_tx,
        task,
    })
}

/// Run the HTTP server until the accept loop ends.
///
/// # Arguments
/// * `config` - Service configuration
/// * `db` - Shared database handle
/// * `router` - Router handle with registered routes
pub async fn run(config: Config, db: Handle, router: Arc<RouterHandle>) -> crate::Result<()> {
    let mut server = start(config, db, router).await?;
    server.wait().await
}
