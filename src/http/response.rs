//! # Construcción de Respuestas HTTP
//!
//! API para construir respuestas HTTP/1.1 y convertirlas a bytes para
//! enviar al cliente.
//!
//! ## Formato de una respuesta
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: text/plain\r\n
//! Content-Length: 3\r\n
//! \r\n
//! abc
//! ```
//!
//! ## Ejemplo de uso
//!
//! ```
//! use crafted_http::http::{Response, StatusCode};
//!
//! let response = Response::text("abc");
//! assert_eq!(response.status(), StatusCode::Ok);
//!
//! let bytes = response.to_bytes();
//! assert!(bytes.starts_with(b"HTTP/1.1 200 OK\r\n"));
//! ```

use super::{Headers, StatusCode};

pub const TEXT_PLAIN: &str = "text/plain";
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Representa una respuesta HTTP completa
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,

    /// Headers en el orden en que se serializan
    headers: Headers,

    /// Cuerpo de la respuesta (puede ser vacío)
    body: Vec<u8>,
}

impl Response {
    /// Crea una nueva respuesta sin headers ni body
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Headers::new(),
            body: Vec::new(),
        }
    }

    /// Agrega un header a la respuesta
    ///
    /// Si el header ya existe, se sobrescribe.
    ///
    /// # Ejemplo
    /// ```
    /// use crafted_http::http::{Response, StatusCode};
    ///
    /// let response = Response::new(StatusCode::Ok)
    ///     .with_header("Content-Encoding", "gzip");
    /// assert_eq!(response.header("content-encoding"), Some("gzip"));
    /// ```
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.set(name, value);
        self
    }

    /// Agrega un header a una respuesta existente (versión mutable)
    pub fn add_header(&mut self, name: &str, value: &str) {
        self.headers.set(name, value);
    }

    /// Establece el cuerpo de la respuesta desde un string
    ///
    /// Automáticamente calcula y agrega el header `Content-Length`.
    pub fn with_body(self, body: &str) -> Self {
        self.with_body_bytes(body.as_bytes().to_vec())
    }

    /// Establece el cuerpo de la respuesta desde bytes
    ///
    /// Útil para archivos y bodies comprimidos.
    pub fn with_body_bytes(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self.headers
            .set("Content-Length", &self.body.len().to_string());
        self
    }

    /// Respuesta 200 OK con `Content-Type: text/plain`
    pub fn text(body: &str) -> Self {
        Self::new(StatusCode::Ok)
            .with_header("Content-Type", TEXT_PLAIN)
            .with_body(body)
    }

    /// Respuesta 200 OK con `Content-Type: application/octet-stream`
    pub fn octet_stream(body: Vec<u8>) -> Self {
        Self::new(StatusCode::Ok)
            .with_header("Content-Type", OCTET_STREAM)
            .with_body_bytes(body)
    }

    /// Crea una respuesta de error con el mensaje en texto plano
    ///
    /// # Ejemplo
    /// ```
    /// use crafted_http::http::{Response, StatusCode};
    ///
    /// let response = Response::error(StatusCode::BadRequest, "Invalid filename");
    /// assert_eq!(response.body(), b"Invalid filename");
    /// ```
    pub fn error(status: StatusCode, message: &str) -> Self {
        Self::new(status)
            .with_header("Content-Type", TEXT_PLAIN)
            .with_body(message)
    }

    /// Descarta el body conservando `Content-Length` (respuestas a HEAD)
    pub fn strip_body(&mut self) {
        let length = self.body.len().to_string();
        self.headers.set("Content-Length", &length);
        self.body.clear();
    }

    /// Convierte la respuesta a bytes listos para enviar por el socket
    ///
    /// - Status line: `HTTP/1.1 200 OK\r\n`
    /// - Headers: `Header-Name: Value\r\n`
    /// - Línea vacía: `\r\n`
    /// - Body: contenido binario
    ///
    /// `Content-Length` siempre está presente (0 si no hay body).
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = Vec::with_capacity(128 + self.body.len());

        let status_line = format!("HTTP/1.1 {}\r\n", self.status);
        result.extend_from_slice(status_line.as_bytes());

        for (name, value) in self.headers.iter() {
            let header_line = format!("{}: {}\r\n", name, value);
            result.extend_from_slice(header_line.as_bytes());
        }

        if !self.headers.contains("Content-Length") {
            result.extend_from_slice(b"Content-Length: 0\r\n");
        }

        result.extend_from_slice(b"\r\n");
        result.extend_from_slice(&self.body);

        result
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_response() {
        let response = Response::new(StatusCode::Ok);
        assert_eq!(response.status(), StatusCode::Ok);
        assert!(response.headers().is_empty());
        assert!(response.body().is_empty());
    }

    #[test]
    fn test_with_header_overwrites() {
        let response = Response::new(StatusCode::Ok)
            .with_header("Content-Type", "text/html")
            .with_header("content-type", "text/plain");

        assert_eq!(response.headers().len(), 1);
        assert_eq!(response.header("Content-Type"), Some("text/plain"));
    }

    #[test]
    fn test_with_body() {
        let response = Response::new(StatusCode::Ok).with_body("Hello World");

        assert_eq!(response.body(), b"Hello World");
        assert_eq!(response.header("Content-Length"), Some("11"));
    }

    #[test]
    fn test_text_response() {
        let response = Response::text("abc");

        assert_eq!(response.header("Content-Type"), Some("text/plain"));
        assert_eq!(response.header("Content-Length"), Some("3"));
    }

    #[test]
    fn test_octet_stream_response() {
        let response = Response::octet_stream(vec![0x00, 0x01, 0x02, 0xFF]);

        assert_eq!(response.header("Content-Type"), Some(OCTET_STREAM));
        assert_eq!(response.header("Content-Length"), Some("4"));
        assert_eq!(response.body(), &[0x00, 0x01, 0x02, 0xFF]);
    }

    #[test]
    fn test_error_response() {
        let response = Response::error(StatusCode::PayloadTooLarge, "Body too large");

        assert_eq!(response.status(), StatusCode::PayloadTooLarge);
        assert_eq!(response.body(), b"Body too large");
    }

    #[test]
    fn test_to_bytes_order() {
        let response = Response::text("Test").with_header("Content-Encoding", "gzip");
        let text = String::from_utf8(response.to_bytes()).unwrap();

        assert_eq!(
            text,
            "HTTP/1.1 200 OK\r\n\
             Content-Type: text/plain\r\n\
             Content-Length: 4\r\n\
             Content-Encoding: gzip\r\n\
             \r\n\
             Test"
        );
    }

    #[test]
    fn test_empty_body_has_zero_content_length() {
        let response = Response::new(StatusCode::NotFound);
        let text = String::from_utf8(response.to_bytes()).unwrap();

        assert_eq!(text, "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\n\r\n");
    }

    #[test]
    fn test_strip_body_keeps_length() {
        let mut response = Response::text("hello");
        response.strip_body();

        assert!(response.body().is_empty());
        assert_eq!(response.header("Content-Length"), Some("5"));
        assert!(response.to_bytes().ends_with(b"\r\n\r\n"));
    }
}
