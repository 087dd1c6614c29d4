//! # Parsing de Requests HTTP/1.1
//! src/http/request.rs
//!
//! Parser de requests HTTP/1.x escrito a mano.
//!
//! ## Formato de un Request
//!
//! ```text
//! POST /files/notes.txt HTTP/1.1\r\n
//! Host: localhost:4221\r\n
//! Content-Type: application/octet-stream\r\n
//! Content-Length: 5\r\n
//! \r\n
//! hello
//! ```
//!
//! ## Componentes
//!
//! 1. **Request Line**: `METHOD /path?query HTTP/1.1`
//! 2. **Headers**: Pares `Name: Value` (uno por línea)
//! 3. **Empty Line**: `\r\n` que separa headers del body
//! 4. **Body**: exactamente `Content-Length` bytes (0 si no hay header)
//!
//! El body se guarda como bytes crudos; solo el head tiene que ser UTF-8.

use super::headers::{is_token, Headers};
use super::StatusCode;
use memchr::memmem;
use thiserror::Error;

/// Separador entre head y body
pub const HEAD_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Métodos HTTP reconocidos
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    GET,
    HEAD,
    POST,
    PUT,
    DELETE,
    OPTIONS,
    PATCH,
}

impl Method {
    /// Parsea un método HTTP desde un string
    ///
    /// # Errores
    ///
    /// Retorna `UnsupportedMethod` si el token no es un método conocido.
    /// Los métodos distinguen mayúsculas: `get` no es `GET`.
    fn from_str(s: &str) -> Result<Self, ParseError> {
        match s {
            "GET" => Ok(Method::GET),
            "HEAD" => Ok(Method::HEAD),
            "POST" => Ok(Method::POST),
            "PUT" => Ok(Method::PUT),
            "DELETE" => Ok(Method::DELETE),
            "OPTIONS" => Ok(Method::OPTIONS),
            "PATCH" => Ok(Method::PATCH),
            _ => Err(ParseError::UnsupportedMethod(s.to_string())),
        }
    }

    /// Convierte el método a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::HEAD => "HEAD",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::OPTIONS => "OPTIONS",
            Method::PATCH => "PATCH",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Representa un request HTTP parseado
#[derive(Debug, Clone)]
pub struct Request {
    /// Método HTTP
    method: Method,

    /// Path de la petición, sin query (ej: "/echo/abc")
    path: String,

    /// Query string cruda, sin el `?`
    query: Option<String>,

    /// Versión HTTP ("HTTP/1.0" o "HTTP/1.1")
    version: String,

    headers: Headers,

    /// Body crudo, exactamente `Content-Length` bytes
    body: Vec<u8>,
}

/// Errores que pueden ocurrir durante el parsing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Request vacío
    #[error("Empty request")]
    EmptyRequest,

    /// Request incompleto o truncado
    #[error("Incomplete HTTP request")]
    IncompleteRequest,

    /// El head no es UTF-8 válido
    #[error("Request head is not valid UTF-8")]
    InvalidEncoding,

    /// Formato inválido de la request line
    #[error("Invalid request line format")]
    InvalidRequestLine,

    #[error("Unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// Target que no empieza con '/'
    #[error("Invalid request target: {0}")]
    InvalidTarget(String),

    /// Versión distinta de HTTP/1.0 o HTTP/1.1
    #[error("Invalid HTTP version: {0}")]
    InvalidHttpVersion(String),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Content-Length no numérico o valores repetidos distintos
    #[error("Invalid Content-Length: {0}")]
    InvalidContentLength(String),

    /// Chunked y demás transfer-codings no están implementados
    #[error("Unsupported Transfer-Encoding: {0}")]
    UnsupportedTransferEncoding(String),
}

impl ParseError {
    /// Código de estado con el que se responde a este error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ParseError::UnsupportedMethod(_) | ParseError::UnsupportedTransferEncoding(_) => {
                StatusCode::NotImplemented
            }
            _ => StatusCode::BadRequest,
        }
    }
}

/// Tamaños del mensaje, conocidos en cuanto llega el head completo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Framing {
    /// Bytes del head, incluyendo el `\r\n\r\n` final
    pub head_len: usize,

    /// Bytes de body anunciados por `Content-Length`
    pub body_len: usize,
}

impl Framing {
    /// Largo total del mensaje
    ///
    /// `Request::framing` nunca produce valores que desborden; con campos
    /// construidos a mano el resultado satura en `usize::MAX`.
    pub fn total(&self) -> usize {
        self.head_len.saturating_add(self.body_len)
    }
}

/// Head ya parseado: request line + headers
struct Head {
    method: Method,
    path: String,
    query: Option<String>,
    version: String,
    headers: Headers,
}

/// Busca el fin del head y retorna el offset donde empieza `\r\n\r\n`
pub fn find_head_end(buffer: &[u8]) -> Option<usize> {
    memmem::find(buffer, HEAD_TERMINATOR)
}

impl Request {
    /// Parsea un request completo (head + body) desde bytes
    ///
    /// Los bytes que sobren después de `Content-Length` se ignoran.
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use crafted_http::http::Request;
    ///
    /// let raw = b"GET /echo/abc HTTP/1.1\r\nUser-Agent: curl/8.0\r\n\r\n";
    /// let request = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(request.path(), "/echo/abc");
    /// assert_eq!(request.header("user-agent"), Some("curl/8.0"));
    /// ```
    pub fn parse(buffer: &[u8]) -> Result<Self, ParseError> {
        if buffer.iter().all(u8::is_ascii_whitespace) {
            return Err(ParseError::EmptyRequest);
        }

        let head_end = find_head_end(buffer).ok_or(ParseError::IncompleteRequest)?;
        let head = Self::parse_head(&buffer[..head_end])?;
        let body_len = Self::content_length(&head.headers)?;

        let body_start = head_end + HEAD_TERMINATOR.len();
        let body_end = Self::message_end(body_start, body_len)?;
        if buffer.len() < body_end {
            return Err(ParseError::IncompleteRequest);
        }

        Ok(Request {
            method: head.method,
            path: head.path,
            query: head.query,
            version: head.version,
            headers: head.headers,
            body: buffer[body_start..body_end].to_vec(),
        })
    }

    /// Calcula el tamaño del mensaje a partir de un buffer parcial
    ///
    /// Retorna `Ok(None)` mientras el head no haya llegado completo.
    /// El head se valida entero, así que un request malformado se detecta
    /// antes de esperar el body.
    pub fn framing(buffer: &[u8]) -> Result<Option<Framing>, ParseError> {
        let Some(head_end) = find_head_end(buffer) else {
            return Ok(None);
        };

        let head = Self::parse_head(&buffer[..head_end])?;
        let body_len = Self::content_length(&head.headers)?;
        let head_len = head_end + HEAD_TERMINATOR.len();
        Self::message_end(head_len, body_len)?;

        Ok(Some(Framing { head_len, body_len }))
    }

    /// Offset donde termina el body; un `Content-Length` que desborda es inválido
    fn message_end(body_start: usize, body_len: usize) -> Result<usize, ParseError> {
        body_start
            .checked_add(body_len)
            .ok_or_else(|| ParseError::InvalidContentLength(body_len.to_string()))
    }

    /// Parsea request line y headers (sin el `\r\n\r\n` final)
    fn parse_head(bytes: &[u8]) -> Result<Head, ParseError> {
        let head = std::str::from_utf8(bytes).map_err(|_| ParseError::InvalidEncoding)?;

        // RFC 9112 permite CRLF sueltos antes de la request line
        let head = head.trim_start_matches("\r\n");
        if head.trim().is_empty() {
            return Err(ParseError::EmptyRequest);
        }

        let mut lines = head.split("\r\n");
        let request_line = lines.next().ok_or(ParseError::InvalidRequestLine)?;
        let (method, path, query, version) = Self::parse_request_line(request_line)?;

        let headers = Self::parse_headers(lines)?;

        Ok(Head {
            method,
            path,
            query,
            version,
            headers,
        })
    }

    /// Parsea la request line
    ///
    /// Formato: `GET /path?query HTTP/1.1`
    fn parse_request_line(
        line: &str,
    ) -> Result<(Method, String, Option<String>, String), ParseError> {
        let parts: Vec<&str> = line.split(' ').collect();

        // Exactamente 3 partes separadas por un solo espacio: METHOD TARGET VERSION
        if parts.len() != 3 || parts.iter().any(|part| part.is_empty()) {
            return Err(ParseError::InvalidRequestLine);
        }

        let method = Method::from_str(parts[0])?;

        let target = parts[1];
        if !target.starts_with('/') {
            return Err(ParseError::InvalidTarget(target.to_string()));
        }
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path.to_string(), Some(query.to_string())),
            None => (target.to_string(), None),
        };

        let version = parts[2].to_string();
        if version != "HTTP/1.0" && version != "HTTP/1.1" {
            return Err(ParseError::InvalidHttpVersion(version));
        }

        Ok((method, path, query, version))
    }

    /// Parsea los headers HTTP
    ///
    /// Cada header tiene formato: "Name: Value"
    fn parse_headers<'a>(lines: impl Iterator<Item = &'a str>) -> Result<Headers, ParseError> {
        let mut headers = Headers::new();

        for line in lines {
            let Some((name, value)) = line.split_once(':') else {
                return Err(ParseError::InvalidHeader(line.to_string()));
            };

            // Sin espacios entre el nombre y ':'
            if !is_token(name) {
                return Err(ParseError::InvalidHeader(line.to_string()));
            }

            headers.append(name, value.trim());
        }

        Ok(headers)
    }

    /// Largo del body según `Content-Length`
    fn content_length(headers: &Headers) -> Result<usize, ParseError> {
        if let Some(encoding) = headers.get("Transfer-Encoding") {
            return Err(ParseError::UnsupportedTransferEncoding(encoding.to_string()));
        }

        let mut length: Option<usize> = None;
        for value in headers.get_all("Content-Length") {
            let parsed = value
                .parse::<usize>()
                .map_err(|_| ParseError::InvalidContentLength(value.to_string()))?;

            match length {
                Some(previous) if previous != parsed => {
                    return Err(ParseError::InvalidContentLength(value.to_string()));
                }
                _ => length = Some(parsed),
            }
        }

        Ok(length.unwrap_or(0))
    }

    // === Métodos públicos para acceder a los campos ===

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Query string cruda, si el target tenía `?`
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Obtiene un header específico (sin distinguir mayúsculas)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}
