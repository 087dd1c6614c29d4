//! # Comandos del Servidor
//!
//! Handlers de las rutas que expone el servidor.
//!
//! ## Rutas
//!
//! - **basic**: `/`, `/echo/{text}`, `/user-agent`
//! - **files**: `/files/{name}` (GET/POST)
//!
//! Cada comando es una función `fn(&Request, &Context) -> Response`.
//! Los handlers nunca fallan: los errores se traducen a un status code.

pub mod basic;
pub mod files;

pub use basic::*;
pub use files::*;
