// src/main.rs

//! # Certificate Issuance & Validation Service - Main Entry Point
//!
//! This module serves as the main entry point for the certificate
//! system. It initializes all core components and starts the API server.
//!
//! ## Architecture Overview
//! 1. **Storage Layer**: Repository abstraction with an in-process store binding
//! 2. **Services Layer**: Certificate issuance, validation, and API endpoints
//! 3. **Integrity Layer**: Unique code allocation and SHA-256 signature engine
//!
//! ## Environment Variables
//! - `BIND_ADDR`: (Optional) Socket address to listen on (default: 127.0.0.1:3000)
//! - `BASE_URL`: (Optional) Externally reachable base URL embedded into
//!   QR validation links (default: http://<BIND_ADDR>)
//! - `RUST_LOG`: (Optional) Log filter, e.g. `info` or `certificate_system=debug`

use std::net::SocketAddr;
use std::sync::Arc;

use crate::services::api_server::ApiServer;
use crate::services::issuer::CertificateIssuer;
use crate::services::validator::CertificateValidator;
use crate::storage::memory::MemoryStore;
use crate::storage::repository::Repository;
use crate::utils::qr::SvgQrRenderer;
use anyhow::Context;
use dotenv::dotenv;

// Module declarations (organized by functional domain)
mod error; // Error taxonomy shared by all layers
mod models; // Data structures
mod services; // Business logic and API
mod storage; // Repository abstraction and bindings
mod utils; // Helper functions

/// Main application entry point
///
/// # Initialization Sequence
/// 1. Load environment configuration
/// 2. Initialize logging
/// 3. Wire storage and service components
/// 4. Start API server
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();
    env_logger::init();

    let bind_addr: SocketAddr = std::env::var("BIND_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
        .parse()
        .context("BIND_ADDR is not a valid socket address")?;
    let base_url =
        std::env::var("BASE_URL").unwrap_or_else(|_| format!("http://{}", bind_addr));

    // Initialize core components; every service shares one repository.
    let repository: Arc<dyn Repository> = Arc::new(MemoryStore::new());
    let issuer = CertificateIssuer::new(Arc::clone(&repository));
    let validator = CertificateValidator::new(Arc::clone(&repository));

    // Initialize API Server with all dependencies
    let api_server = ApiServer::new(
        issuer,
        validator,
        repository,
        Arc::new(SvgQrRenderer),
        base_url,
    );

    log::info!("certificate API running at http://{}", bind_addr);
    log::info!("- POST /certificates");
    log::info!("- POST /certificates/validate");
    log::info!("- GET  /certificates/:id/qr-code");

    api_server
        .run(bind_addr)
        .await
        .context("API server terminated")
}
