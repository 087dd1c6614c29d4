//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! 1. Escucha en un puerto (`tcp`)
//! 2. Acepta conexiones y las entrega a un pool fijo de workers (`pool`)
//! 3. Cada worker lee, parsea, despacha y responde una request (`connection`)

pub mod connection;
pub mod pool;
pub mod tcp;

// Re-exportar para facilitar el uso
pub use connection::{Limits, ReadError};
pub use pool::ThreadPool;
pub use tcp::{build_router, Server, ServerError};
