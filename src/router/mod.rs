//! # Sistema de Routing
//! src/router/mod.rs
//!
//! Mapea paths HTTP a handlers.
//!
//! ## Arquitectura
//!
//! ```text
//! Request → Router → Handler(Request, Context) → Response
//! ```
//!
//! Las rutas pueden ser exactas (`/user-agent`) o por prefijo (`/echo/`).
//! Gana la primera ruta registrada que coincida. Si ninguna coincide se
//! retorna 404 Not Found sin body.

use crate::http::{Request, Response, StatusCode};
use std::path::{Path, PathBuf};

/// Valor del header `Server` en todas las respuestas
pub const SERVER_NAME: &str = concat!("crafted_http/", env!("CARGO_PKG_VERSION"));

/// Estado de solo lectura compartido por todos los handlers
#[derive(Debug, Clone)]
pub struct Context {
    /// Directorio raíz de `/files/`
    files_dir: PathBuf,
}

impl Context {
    pub fn new(files_dir: impl Into<PathBuf>) -> Self {
        Self {
            files_dir: files_dir.into(),
        }
    }

    pub fn files_dir(&self) -> &Path {
        &self.files_dir
    }
}

/// Tipo de función handler
pub type Handler = fn(&Request, &Context) -> Response;

/// Cómo se compara el path del request
#[derive(Debug, Clone, PartialEq, Eq)]
enum Matcher {
    Exact(String),
    Prefix(String),
}

impl Matcher {
    fn matches(&self, path: &str) -> bool {
        match self {
            Matcher::Exact(p) => p == path,
            Matcher::Prefix(p) => path.starts_with(p.as_str()),
        }
    }
}

/// Router que mapea paths a handlers
pub struct Router {
    routes: Vec<(Matcher, Handler)>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Registra una ruta exacta
    ///
    /// # Ejemplo
    /// ```
    /// use crafted_http::router::{Context, Router};
    /// use crafted_http::http::{Request, Response};
    ///
    /// fn hello_handler(_req: &Request, _ctx: &Context) -> Response {
    ///     Response::text("hello")
    /// }
    ///
    /// let mut router = Router::new();
    /// router.register("/hello", hello_handler);
    /// ```
    pub fn register(&mut self, path: &str, handler: Handler) {
        self.routes.push((Matcher::Exact(path.to_string()), handler));
    }

    /// Registra una ruta por prefijo (ej: `/echo/` atiende `/echo/abc`)
    pub fn register_prefix(&mut self, prefix: &str, handler: Handler) {
        self.routes
            .push((Matcher::Prefix(prefix.to_string()), handler));
    }

    /// Encuentra y ejecuta el handler apropiado para un request
    ///
    /// Si no encuentra un handler para el path, retorna 404 Not Found.
    pub fn route(&self, request: &Request, context: &Context) -> Response {
        let path = request.path();

        let mut response = match self.routes.iter().find(|(m, _)| m.matches(path)) {
            Some((_, handler)) => handler(request, context),
            None => Response::new(StatusCode::NotFound),
        };

        add_common_headers(&mut response);
        response
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

/// Agrega headers comunes a todas las respuestas
///
/// También se usa para las respuestas de error que nunca llegan al router.
pub fn add_common_headers(response: &mut Response) {
    response.add_header("Server", SERVER_NAME);
    response.add_header("Connection", "close");
}
