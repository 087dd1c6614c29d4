//! # Módulo HTTP
//!
//! Implementación del subconjunto de HTTP/1.1 que usa el servidor, sin
//! librerías de alto nivel. Incluye:
//!
//! - Parsing de requests (head + body según `Content-Length`)
//! - Construcción de responses
//! - Status codes
//! - Negociación de `Accept-Encoding` y gzip
//!
//! ## Lo que NO se soporta
//!
//! - Conexiones persistentes: una request por conexión, `Connection: close`
//! - `Transfer-Encoding: chunked` (se responde 501)
//! - HTTP/2, TLS, upgrades
//!
//! ### Formato de Request
//!
//! ```text
//! GET /echo/abc HTTP/1.1\r\n
//! Accept-Encoding: gzip\r\n
//! \r\n
//! ```
//!
//! ### Formato de Response
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: text/plain\r\n
//! Content-Length: 23\r\n
//! Content-Encoding: gzip\r\n
//! \r\n
//! <bytes gzip>
//! ```

pub mod encoding; // Accept-Encoding y gzip
pub mod headers; // Colección de headers
pub mod request; // Parsing de HTTP requests
pub mod response; // Construcción de HTTP responses
pub mod status; // Códigos de estado HTTP

// Re-exportamos los tipos principales para facilitar su uso
pub use headers::Headers;
pub use request::{Method, ParseError, Request};
pub use response::Response;
pub use status::StatusCode;
