//! # Manejo de una Conexión
//! src/server/connection.rs
//!
//! Secuencia lineal por conexión:
//!
//! ```text
//! leer head → leer Content-Length bytes → parsear → router → escribir → cerrar
//! ```
//!
//! Se atiende una sola request por conexión (sin keep-alive).

use crate::http::{Method, ParseError, Request, Response, StatusCode};
use crate::router::{self, Context, Router};
use std::io::{self, ErrorKind, Read, Write};
use std::net::TcpStream;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Tamaño de cada lectura del socket
const READ_CHUNK: usize = 4096;

/// Límites que se aplican a cada request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Bytes máximos del head, incluyendo `\r\n\r\n`
    pub max_header_bytes: usize,

    /// Bytes máximos del body
    pub max_body_bytes: usize,

    /// Timeout de cada lectura/escritura
    pub timeout: Duration,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_header_bytes: 8192,
            max_body_bytes: 10 * 1024 * 1024,
            timeout: Duration::from_secs(5),
        }
    }
}

/// Errores al leer un request del socket
#[derive(Debug, Error)]
pub enum ReadError {
    /// El cliente cerró sin enviar nada
    #[error("connection closed before any data was sent")]
    Closed,

    #[error("connection closed in the middle of a request")]
    Truncated,

    #[error("timed out waiting for request data")]
    TimedOut,

    #[error("request head exceeds {limit} bytes")]
    HeadTooLarge { limit: usize },

    #[error("request body of {len} bytes exceeds limit of {limit} bytes")]
    BodyTooLarge { len: usize, limit: usize },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ReadError {
    /// Status con el que responder, o `None` si no tiene sentido responder
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            ReadError::Closed | ReadError::Io(_) => None,
            ReadError::Truncated => Some(StatusCode::BadRequest),
            ReadError::TimedOut => Some(StatusCode::RequestTimeout),
            ReadError::HeadTooLarge { .. } => Some(StatusCode::RequestHeaderFieldsTooLarge),
            ReadError::BodyTooLarge { .. } => Some(StatusCode::PayloadTooLarge),
            ReadError::Parse(e) => Some(e.status_code()),
        }
    }
}

/// Lee exactamente un request: el head hasta `\r\n\r\n` y luego
/// `Content-Length` bytes de body
///
/// Los límites se validan apenas se conoce el tamaño, antes de leer el body.
/// Los bytes que lleguen después del body se descartan.
pub fn read_request<R: Read>(reader: &mut R, limits: &Limits) -> Result<Vec<u8>, ReadError> {
    let mut buffer = Vec::with_capacity(READ_CHUNK);
    let mut chunk = [0u8; READ_CHUNK];
    let mut expected: Option<usize> = None;

    loop {
        if let Some(total) = expected {
            if buffer.len() >= total {
                buffer.truncate(total);
                return Ok(buffer);
            }
        }

        let n = match reader.read(&mut chunk) {
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                return Err(ReadError::TimedOut);
            }
            Err(e) => return Err(ReadError::Io(e)),
        };

        if n == 0 {
            return Err(if buffer.is_empty() {
                ReadError::Closed
            } else {
                ReadError::Truncated
            });
        }
        buffer.extend_from_slice(&chunk[..n]);

        if expected.is_none() {
            match Request::framing(&buffer)? {
                Some(framing) => {
                    if framing.head_len > limits.max_header_bytes {
                        return Err(ReadError::HeadTooLarge {
                            limit: limits.max_header_bytes,
                        });
                    }
                    if framing.body_len > limits.max_body_bytes {
                        return Err(ReadError::BodyTooLarge {
                            len: framing.body_len,
                            limit: limits.max_body_bytes,
                        });
                    }
                    expected = Some(framing.total());
                }
                None if buffer.len() > limits.max_header_bytes => {
                    return Err(ReadError::HeadTooLarge {
                        limit: limits.max_header_bytes,
                    });
                }
                None => {}
            }
        }
    }
}

/// Atiende una conexión TCP completa
pub fn handle_connection(
    mut stream: TcpStream,
    router: &Router,
    context: &Context,
    limits: &Limits,
) -> io::Result<()> {
    let peer = stream
        .peer_addr()
        .map(|addr| addr.to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    stream.set_read_timeout(Some(limits.timeout))?;
    stream.set_write_timeout(Some(limits.timeout))?;

    serve(&mut stream, &peer, router, context, limits)
}

/// Lee, despacha y responde una request sobre cualquier stream
///
/// Separado de `handle_connection` para poder probarlo sin sockets.
pub fn serve<S: Read + Write>(
    stream: &mut S,
    peer: &str,
    router: &Router,
    context: &Context,
    limits: &Limits,
) -> io::Result<()> {
    let start = Instant::now();

    let request = read_request(stream, limits)
        .and_then(|raw| Request::parse(&raw).map_err(ReadError::from));

    let (response, method, path) = match request {
        Ok(request) => {
            let mut response = router.route(&request, context);
            if request.method() == Method::HEAD {
                response.strip_body();
            }
            (response, Some(request.method()), request.path().to_string())
        }
        Err(e) => match e.status_code() {
            Some(status) => {
                tracing::warn!(%peer, error = %e, "request inválido");
                let mut response = Response::error(status, &e.to_string());
                router::add_common_headers(&mut response);
                (response, None, String::new())
            }
            None => {
                tracing::debug!(%peer, error = %e, "conexión cerrada sin request");
                return match e {
                    ReadError::Io(io_error) => Err(io_error),
                    _ => Ok(()),
                };
            }
        },
    };

    stream.write_all(&response.to_bytes())?;
    stream.flush()?;

    tracing::info!(
        %peer,
        method = method.map(|m| m.as_str()).unwrap_or("-"),
        path = %path,
        status = response.status().as_u16(),
        latency_ms = start.elapsed().as_secs_f64() * 1000.0,
        "request atendido"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::build_router;
    use std::io::Cursor;

    /// Stream en memoria: lee de `input`, escribe en `output`
    struct MockStream {
        input: Cursor<Vec<u8>>,
        output: Vec<u8>,
    }

    impl MockStream {
        fn new(input: &[u8]) -> Self {
            Self {
                input: Cursor::new(input.to_vec()),
                output: Vec::new(),
            }
        }

        fn output_text(&self) -> String {
            String::from_utf8_lossy(&self.output).to_string()
        }
    }

    impl Read for MockStream {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.input.read(buf)
        }
    }

    impl Write for MockStream {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.output.write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Entrega los datos de a un byte por lectura
    struct Trickle {
        data: Vec<u8>,
        pos: usize,
    }

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.pos >= self.data.len() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.data[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }

    /// Lector que falla con timeout después de entregar `data`
    struct Stalled {
        data: Cursor<Vec<u8>>,
    }

    impl Read for Stalled {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.data.read(buf)? {
                0 => Err(io::Error::new(ErrorKind::WouldBlock, "timeout")),
                n => Ok(n),
            }
        }
    }

    fn run(input: &[u8]) -> String {
        let router = build_router();
        let context = Context::new(std::env::temp_dir());
        let mut stream = MockStream::new(input);
        serve(&mut stream, "test", &router, &context, &Limits::default()).unwrap();
        stream.output_text()
    }

    #[test]
    fn test_read_request_stops_at_content_length() {
        let raw = b"POST /files/a HTTP/1.1\r\nContent-Length: 3\r\n\r\nabcEXTRA";
        let mut reader = Cursor::new(raw.to_vec());

        let message = read_request(&mut reader, &Limits::default()).unwrap();
        assert!(message.ends_with(b"\r\n\r\nabc"));
    }

    #[test]
    fn test_read_request_one_byte_at_a_time() {
        let raw = b"POST /files/a HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello".to_vec();
        let mut reader = Trickle {
            data: raw.clone(),
            pos: 0,
        };

        let message = read_request(&mut reader, &Limits::default()).unwrap();
        assert_eq!(message, raw);
    }

    #[test]
    fn test_read_request_large_body_spans_many_reads() {
        let body = vec![b'x'; READ_CHUNK * 3 + 17];
        let mut raw = format!("POST /files/a HTTP/1.1\r\nContent-Length: {}\r\n\r\n", body.len())
            .into_bytes();
        raw.extend_from_slice(&body);

        let message = read_request(&mut Cursor::new(raw.clone()), &Limits::default()).unwrap();
        assert_eq!(message.len(), raw.len());
    }

    #[test]
    fn test_read_request_closed_without_data() {
        let result = read_request(&mut Cursor::new(Vec::new()), &Limits::default());
        assert!(matches!(result, Err(ReadError::Closed)));
    }

    #[test]
    fn test_read_request_truncated() {
        let raw = b"POST /files/a HTTP/1.1\r\nContent-Length: 10\r\n\r\nabc".to_vec();
        let result = read_request(&mut Cursor::new(raw), &Limits::default());
        assert!(matches!(result, Err(ReadError::Truncated)));
    }

    #[test]
    fn test_read_request_head_too_large() {
        let limits = Limits {
            max_header_bytes: 32,
            ..Limits::default()
        };
        let raw = format!("GET / HTTP/1.1\r\nX-Long: {}\r\n\r\n", "a".repeat(64));
        let result = read_request(&mut Cursor::new(raw.into_bytes()), &limits);

        assert!(matches!(result, Err(ReadError::HeadTooLarge { limit: 32 })));
    }

    #[test]
    fn test_read_request_head_without_terminator_too_large() {
        let limits = Limits {
            max_header_bytes: 16,
            ..Limits::default()
        };
        let raw = format!("GET / HTTP/1.1\r\nX-Long: {}", "a".repeat(64));
        let result = read_request(&mut Cursor::new(raw.into_bytes()), &limits);

        assert!(matches!(result, Err(ReadError::HeadTooLarge { .. })));
    }

    #[test]
    fn test_read_request_body_too_large() {
        let limits = Limits {
            max_body_bytes: 4,
            ..Limits::default()
        };
        let raw = b"POST /files/a HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello".to_vec();
        let result = read_request(&mut Cursor::new(raw), &limits);

        let err = result.unwrap_err();
        assert!(matches!(err, ReadError::BodyTooLarge { len: 5, limit: 4 }));
        assert_eq!(err.status_code(), Some(StatusCode::PayloadTooLarge));
    }

    #[test]
    fn test_read_request_timeout() {
        let mut reader = Stalled {
            data: Cursor::new(b"GET / HTTP/1.1\r\n".to_vec()),
        };
        let err = read_request(&mut reader, &Limits::default()).unwrap_err();

        assert!(matches!(err, ReadError::TimedOut));
        assert_eq!(err.status_code(), Some(StatusCode::RequestTimeout));
    }

    #[test]
    fn test_serve_root() {
        let text = run(b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n");

        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.contains("Connection: close\r\n"));
        assert!(text.contains("Content-Length: 0\r\n"));
    }

    #[test]
    fn test_serve_echo() {
        let text = run(b"GET /echo/hello HTTP/1.1\r\n\r\n");

        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.contains("Content-Type: text/plain\r\n"));
        assert!(text.ends_with("\r\n\r\nhello"));
    }

    #[test]
    fn test_serve_head_omits_body() {
        let text = run(b"HEAD /echo/hello HTTP/1.1\r\n\r\n");

        assert!(text.contains("Content-Length: 5\r\n"));
        assert!(text.ends_with("\r\n\r\n"));
    }

    #[test]
    fn test_serve_not_found() {
        let text = run(b"GET /nope HTTP/1.1\r\n\r\n");
        assert!(text.starts_with("HTTP/1.1 404 Not Found\r\n"));
    }

    #[test]
    fn test_serve_bad_request() {
        let text = run(b"\x00\x01\x02garbage\r\n\r\n");

        assert!(text.starts_with("HTTP/1.1 400 Bad Request\r\n"));
        assert!(text.contains("Connection: close\r\n"));
    }

    #[test]
    fn test_serve_unknown_method() {
        let text = run(b"BREW /coffee HTTP/1.1\r\n\r\n");
        assert!(text.starts_with("HTTP/1.1 501 Not Implemented\r\n"));
    }

    #[test]
    fn test_serve_chunked_not_implemented() {
        let text = run(b"POST /files/a HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n0\r\n\r\n");
        assert!(text.starts_with("HTTP/1.1 501 Not Implemented\r\n"));
    }

    #[test]
    fn test_serve_overflowing_content_length_without_body_limit() {
        let router = build_router();
        let context = Context::new(std::env::temp_dir());
        let limits = Limits {
            max_body_bytes: usize::MAX,
            ..Limits::default()
        };
        let mut stream = MockStream::new(
            b"POST /files/a HTTP/1.1\r\nContent-Length: 18446744073709551615\r\n\r\nabc",
        );

        serve(&mut stream, "test", &router, &context, &limits).unwrap();

        assert!(stream
            .output_text()
            .starts_with("HTTP/1.1 400 Bad Request\r\n"));
    }

    #[test]
    fn test_serve_closed_without_data_writes_nothing() {
        let text = run(b"");
        assert!(text.is_empty());
    }
}
