//! # Comandos Básicos
//! src/commands/basic.rs
//!
//! - `/`: Raíz, siempre 200
//! - `/echo/{text}`: Devuelve `{text}`, comprimido con gzip si el cliente lo acepta
//! - `/user-agent`: Devuelve el header `User-Agent` del request

use crate::http::encoding;
use crate::http::response::TEXT_PLAIN;
use crate::http::{Request, Response, StatusCode};
use crate::router::Context;

/// Prefijo de la ruta de echo
pub const ECHO_PREFIX: &str = "/echo/";

/// Handler para `/`
///
/// Responde 200 OK sin body, para cualquier método.
pub fn root_handler(_req: &Request, _ctx: &Context) -> Response {
    Response::new(StatusCode::Ok)
}

/// Handler para `/echo/{text}`
///
/// Devuelve el resto del path como `text/plain`, sin decodificar.
/// Si `Accept-Encoding` incluye gzip, el body va comprimido y se agrega
/// `Content-Encoding: gzip`. Codificaciones desconocidas se ignoran.
///
/// # Ejemplo de response
/// ```text
/// HTTP/1.1 200 OK
/// Content-Type: text/plain
/// Content-Length: 3
///
/// abc
/// ```
pub fn echo_handler(req: &Request, _ctx: &Context) -> Response {
    let content = req.path().strip_prefix(ECHO_PREFIX).unwrap_or_default();

    let negotiated = req
        .headers()
        .get_all("Accept-Encoding")
        .find_map(encoding::negotiate);

    let Some(encoding) = negotiated else {
        return Response::text(content);
    };

    match encoding.encode(content.as_bytes()) {
        Ok(compressed) => Response::new(StatusCode::Ok)
            .with_header("Content-Type", TEXT_PLAIN)
            .with_body_bytes(compressed)
            .with_header("Content-Encoding", encoding.as_str()),
        Err(e) => {
            tracing::error!(error = %e, "fallo al comprimir el body de /echo");
            Response::error(StatusCode::InternalServerError, "Compression failed")
        }
    }
}

/// Handler para `/user-agent`
///
/// Refleja el header `User-Agent`. Sin header, responde 200 con body vacío.
pub fn user_agent_handler(req: &Request, _ctx: &Context) -> Response {
    Response::text(req.header("User-Agent").unwrap_or_default())
}
