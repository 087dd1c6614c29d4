//! # crafted_http - Entry Point
//! src/main.rs
//!
//! Lee la configuración (CLI + env), inicializa el logging y corre el
//! servidor hasta que el proceso termine.

use clap::Parser;
use crafted_http::config::Config;
use crafted_http::logging;
use crafted_http::server::Server;

fn main() {
    let config = Config::parse();

    logging::init();
    config.log_summary();

    let server = match Server::bind(config) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(error = %e, "no se pudo iniciar el servidor");
            eprintln!("Error fatal: {}", e);
            std::process::exit(1);
        }
    };

    // Esto bloquea el thread principal
    if let Err(e) = server.run() {
        tracing::error!(error = %e, "el servidor terminó con error");
        eprintln!("Error fatal: {}", e);
        std::process::exit(1);
    }
}
