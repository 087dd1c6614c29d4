//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración con argumentos CLI y variables de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./crafted_http --directory /tmp/files \
//!   --port 4221 \
//!   --workers 4
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=8080 FILES_DIR=/srv/files ./crafted_http
//! ```

use crate::server::Limits;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Configuración del servidor HTTP
#[derive(Debug, Clone, Parser)]
#[command(name = "crafted_http")]
#[command(about = "Servidor HTTP/1.1 mínimo: echo, user-agent y archivos")]
#[command(version)]
pub struct Config {
    /// Directorio donde se guardan/leen los archivos de /files/
    #[arg(long, default_value = "./tmp/", env = "FILES_DIR")]
    pub directory: PathBuf,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "127.0.0.1", env = "HTTP_HOST")]
    pub host: String,

    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "4221", env = "HTTP_PORT")]
    pub port: u16,

    /// Número de workers que atienden conexiones
    #[arg(long, default_value = "2", env = "WORKERS")]
    pub workers: usize,

    // === Límites por request ===

    /// Tamaño máximo del head (request line + headers) en bytes
    #[arg(long = "max-header-bytes", default_value = "8192", env = "MAX_HEADER_BYTES")]
    pub max_header_bytes: usize,

    /// Tamaño máximo del body en bytes
    #[arg(long = "max-body-bytes", default_value = "10485760", env = "MAX_BODY_BYTES")]
    pub max_body_bytes: usize,

    /// Timeout de lectura/escritura del socket en milisegundos
    #[arg(long = "read-timeout-ms", default_value = "5000", env = "READ_TIMEOUT_MS")]
    pub read_timeout_ms: u64,
}

impl Config {
    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use crafted_http::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "127.0.0.1:4221");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Límites que se aplican a cada conexión
    pub fn limits(&self) -> Limits {
        Limits {
            max_header_bytes: self.max_header_bytes,
            max_body_bytes: self.max_body_bytes,
            timeout: Duration::from_millis(self.read_timeout_ms),
        }
    }

    /// Valida la configuración
    ///
    /// Retorna errores si hay valores inválidos
    pub fn validate(&self) -> Result<(), String> {
        if self.workers == 0 {
            return Err("Workers must be >= 1".to_string());
        }
        if self.max_header_bytes == 0 {
            return Err("Max header bytes must be > 0".to_string());
        }
        if self.max_body_bytes == 0 {
            return Err("Max body bytes must be > 0".to_string());
        }
        // Un timeout de 0 no es válido para set_read_timeout
        if self.read_timeout_ms == 0 {
            return Err("Read timeout must be > 0".to_string());
        }
        if self.host.trim().is_empty() {
            return Err("Host must not be empty".to_string());
        }

        Ok(())
    }

    /// Registra un resumen de la configuración
    pub fn log_summary(&self) {
        tracing::info!(
            address = %self.address(),
            directory = %self.directory.display(),
            workers = self.workers,
            max_header_bytes = self.max_header_bytes,
            max_body_bytes = self.max_body_bytes,
            read_timeout_ms = self.read_timeout_ms,
            "configuración cargada"
        );
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            directory: PathBuf::from("./tmp/"),
            host: "127.0.0.1".to_string(),
            port: 4221,
            workers: 2,
            max_header_bytes: 8192,
            max_body_bytes: 10 * 1024 * 1024,
            read_timeout_ms: 5_000,
        }
    }
}
