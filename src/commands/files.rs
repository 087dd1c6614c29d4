//! # Comandos de Archivos
//! src/commands/files.rs
//!
//! `/files/{name}` lee y escribe archivos dentro del directorio configurado
//! con `--directory`.
//!
//! - `GET`/`HEAD`: devuelve el archivo como `application/octet-stream`
//! - `POST`: escribe el body del request tal cual (bytes crudos)
//! - Otros métodos: 404

use crate::http::response::OCTET_STREAM;
use crate::http::{Method, Request, Response, StatusCode};
use crate::router::Context;
use std::fs;

/// Prefijo de la ruta de archivos
pub const FILES_PREFIX: &str = "/files/";

/// Handler para `/files/{name}`
pub fn files_handler(req: &Request, ctx: &Context) -> Response {
    let name = req.path().strip_prefix(FILES_PREFIX).unwrap_or_default();

    match req.method() {
        Method::GET | Method::HEAD => get_file(name, ctx),
        Method::POST => post_file(name, req, ctx),
        _ => Response::new(StatusCode::NotFound),
    }
}

/// Lee `{directory}/{name}`
///
/// 404 si no existe o no es un archivo regular.
pub fn get_file(name: &str, ctx: &Context) -> Response {
    if !is_valid_filename(name) {
        return Response::error(StatusCode::BadRequest, "Invalid filename");
    }

    let path = ctx.files_dir().join(name);

    match fs::metadata(&path) {
        Ok(metadata) if metadata.is_file() => match fs::read(&path) {
            Ok(contents) => Response::octet_stream(contents),
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "no se pudo leer el archivo");
                Response::error(StatusCode::InternalServerError, "Failed to read file")
            }
        },
        _ => Response::new(StatusCode::NotFound),
    }
}

/// Escribe el body del request en `{directory}/{name}`
///
/// Requiere `Content-Type: application/octet-stream` y un body no vacío.
/// Si el archivo existe se sobrescribe.
pub fn post_file(name: &str, req: &Request, ctx: &Context) -> Response {
    if !is_valid_filename(name) {
        return Response::error(StatusCode::BadRequest, "Invalid filename");
    }

    if !is_octet_stream(req.header("Content-Type")) {
        return Response::error(
            StatusCode::UnsupportedMediaType,
            "Content-Type must be application/octet-stream",
        );
    }

    if req.body().is_empty() {
        return Response::error(StatusCode::BadRequest, "Empty body");
    }

    let path = ctx.files_dir().join(name);

    match fs::write(&path, req.body()) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), bytes = req.body().len(), "archivo escrito");
            Response::new(StatusCode::Created)
        }
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "no se pudo escribir el archivo");
            Response::error(StatusCode::InternalServerError, "Failed to write file")
        }
    }
}

/// Validar nombre de archivo (sin separadores ni `..`)
fn is_valid_filename(name: &str) -> bool {
    !name.is_empty() && !name.contains("..") && !name.contains('/') && !name.contains('\\')
}

/// `application/octet-stream`, con o sin parámetros
fn is_octet_stream(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|value| value.split(';').next())
        .map(|media_type| media_type.trim().eq_ignore_ascii_case(OCTET_STREAM))
        .unwrap_or(false)
}
