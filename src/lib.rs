//! # crafted_http
//! src/lib.rs
//!
//! Servidor HTTP/1.1 mínimo de un solo proceso. Acepta conexiones TCP,
//! parsea una request por conexión y la despacha a un conjunto fijo de rutas:
//!
//! - `/`: 200 OK
//! - `/echo/{text}`: devuelve `{text}` (gzip si el cliente lo acepta)
//! - `/user-agent`: devuelve el header `User-Agent`
//! - `/files/{name}`: GET lee y POST escribe archivos en `--directory`
//!
//! ## Arquitectura
//!
//! - `http`: Parsing de requests, construcción de responses, gzip
//! - `router`: Enrutamiento exacto y por prefijo
//! - `commands`: Handlers de cada ruta
//! - `server`: Accept loop, pool de workers y manejo de conexiones
//! - `config`: CLI y variables de entorno
//! - `logging`: Subscriber de `tracing`
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use crafted_http::config::Config;
//! use crafted_http::server::Server;
//!
//! let server = Server::bind(Config::default()).expect("bind");
//! server.run().expect("accept loop");
//! ```

pub mod commands;
pub mod config;
pub mod http;
pub mod logging;
pub mod router;
pub mod server;
