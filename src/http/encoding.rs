//! # Content-Encoding
//! src/http/encoding.rs
//!
//! Negociación de `Accept-Encoding` y compresión del body.
//! Solo se implementa gzip; cualquier otra codificación pedida por el
//! cliente se ignora y el body viaja sin modificar.

use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;

/// Codificaciones que el servidor sabe producir
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentEncoding {
    Gzip,
}

impl ContentEncoding {
    /// Valor para el header `Content-Encoding`
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentEncoding::Gzip => "gzip",
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        if token.eq_ignore_ascii_case("gzip") || token.eq_ignore_ascii_case("x-gzip") {
            Some(ContentEncoding::Gzip)
        } else {
            None
        }
    }

    /// Codifica `data`
    pub fn encode(&self, data: &[u8]) -> std::io::Result<Vec<u8>> {
        match self {
            ContentEncoding::Gzip => gzip(data),
        }
    }
}

/// Elige una codificación a partir del valor de `Accept-Encoding`
///
/// Formato: `gzip, deflate;q=0.5, br`. Un `q=0` marca la codificación como
/// no aceptable.
///
/// # Ejemplo
/// ```
/// use crafted_http::http::encoding::{negotiate, ContentEncoding};
///
/// assert_eq!(negotiate("encoding-1, gzip, encoding-2"), Some(ContentEncoding::Gzip));
/// assert_eq!(negotiate("br"), None);
/// ```
pub fn negotiate(accept_encoding: &str) -> Option<ContentEncoding> {
    accept_encoding
        .split(',')
        .filter_map(|item| {
            let mut parts = item.split(';');
            let token = parts.next()?.trim();
            let rejected = parts.any(|param| is_zero_quality(param.trim()));
            if rejected {
                None
            } else {
                ContentEncoding::from_token(token)
            }
        })
        .next()
}

fn is_zero_quality(param: &str) -> bool {
    match param.split_once('=') {
        Some((name, value)) if name.trim().eq_ignore_ascii_case("q") => value
            .trim()
            .parse::<f32>()
            .map(|q| q <= 0.0)
            .unwrap_or(false),
        _ => false,
    }
}

/// Comprime bytes con gzip
pub fn gzip(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}
