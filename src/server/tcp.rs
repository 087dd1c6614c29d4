//! # Servidor TCP
//! src/server/tcp.rs
//!
//! Un accept loop que entrega cada conexión a un pool fijo de workers.
//! Las conexiones no comparten estado mutable: solo el router y el
//! directorio de archivos, ambos de solo lectura.

use super::connection::{self, Limits};
use super::pool::ThreadPool;
use crate::commands;
use crate::config::Config;
use crate::router::{Context, Router};
use std::io;
use std::net::{SocketAddr, TcpListener};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Errores al iniciar o correr el servidor
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to prepare files directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to start worker pool: {0}")]
    Pool(#[source] io::Error),
}

/// Registra las rutas del servidor
///
/// | Ruta            | Handler              |
/// |-----------------|----------------------|
/// | `/`             | `root_handler`       |
/// | `/user-agent`   | `user_agent_handler` |
/// | `/echo/*`       | `echo_handler`       |
/// | `/files/*`      | `files_handler`      |
pub fn build_router() -> Router {
    let mut router = Router::new();

    router.register("/", commands::root_handler);
    router.register("/user-agent", commands::user_agent_handler);
    router.register_prefix(commands::ECHO_PREFIX, commands::echo_handler);
    router.register_prefix(commands::FILES_PREFIX, commands::files_handler);

    router
}

/// Servidor HTTP con pool de workers
pub struct Server {
    listener: TcpListener,
    router: Arc<Router>,
    context: Arc<Context>,
    limits: Limits,
    pool: ThreadPool,
}

impl Server {
    /// Valida la configuración, prepara el directorio y hace bind
    ///
    /// El puerto 0 elige un puerto libre; ver [`Server::local_addr`].
    pub fn bind(config: Config) -> Result<Self, ServerError> {
        config.validate().map_err(ServerError::Config)?;

        std::fs::create_dir_all(&config.directory).map_err(|source| ServerError::Directory {
            path: config.directory.clone(),
            source,
        })?;

        let address = config.address();
        let listener = TcpListener::bind(&address).map_err(|source| ServerError::Bind {
            address: address.clone(),
            source,
        })?;

        let pool = ThreadPool::new(config.workers).map_err(ServerError::Pool)?;

        tracing::info!(
            address = %address,
            workers = config.workers,
            "servidor escuchando"
        );

        Ok(Self {
            listener,
            router: Arc::new(build_router()),
            context: Arc::new(Context::new(&config.directory)),
            limits: config.limits(),
            pool,
        })
    }

    /// Dirección real en la que escucha
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept loop; bloquea el thread actual
    ///
    /// Los errores de `accept` se registran y el loop sigue.
    pub fn run(&self) -> Result<(), ServerError> {
        for stream in self.listener.incoming() {
            match stream {
                Ok(stream) => {
                    let router = Arc::clone(&self.router);
                    let context = Arc::clone(&self.context);
                    let limits = self.limits;

                    tracing::debug!(
                        peer = ?stream.peer_addr().ok(),
                        queued = self.pool.queued(),
                        "nueva conexión"
                    );

                    self.pool.execute(move || {
                        if let Err(e) =
                            connection::handle_connection(stream, &router, &context, &limits)
                        {
                            tracing::warn!(error = %e, "error en la conexión");
                        }
                    });
                }
                Err(e) => {
                    tracing::warn!(error = %e, "error al aceptar conexión");
                }
            }
        }

        Ok(())
    }
}
