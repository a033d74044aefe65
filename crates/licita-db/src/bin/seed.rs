//! # Seed Data Generator
//!
//! Populates the database with demo habilitation documents and prints the
//! classified listing, so every status shows up on the dashboard.
//!
//! ## Usage
//! ```bash
//! # Seed the database from LICITA_DATABASE_PATH (default ./licita.db)
//! cargo run -p licita-db --bin seed
//!
//! # Seed for a specific owner
//! cargo run -p licita-db --bin seed -- --owner user-42
//!
//! # Verbose logging
//! RUST_LOG=debug cargo run -p licita-db --bin seed
//! ```
//!
//! ## Generated Documents
//! One document per type, spread across every status:
//! - expired (a few days past)
//! - critical (under a month left)
//! - warning (one to three months left)
//! - valid (default 180-day validity)

use chrono::{Duration, Utc};
use std::env;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use licita_core::documents::NewDocument;
use licita_core::DocumentType;
use licita_db::{AppConfig, Database, ReferenceInstant};

const DEFAULT_OWNER: &str = "demo-owner";

/// Days until expiration for each seeded type; `None` takes the default.
const DEMO_DOCUMENTS: &[(DocumentType, &str, Option<i64>)] = &[
    (DocumentType::Cnpj, "Cartão CNPJ.pdf", None),
    (DocumentType::CertidaoJudicial, "Certidão Judicial Cível.pdf", Some(12)),
    (DocumentType::CertidaoNegativaFederal, "CND Federal.pdf", Some(-3)),
    (DocumentType::CertidaoNegativaEstadual, "CND Estadual.pdf", Some(45)),
    (DocumentType::Fgts, "CRF FGTS.pdf", Some(28)),
    (DocumentType::Inss, "Certidão INSS.pdf", Some(75)),
    (DocumentType::JusticaTrabalho, "CNDT.pdf", Some(150)),
    (DocumentType::BalancoPatrimonial, "Balanço 2024.pdf", Some(300)),
    (DocumentType::Dre, "DRE 2024.pdf", Some(300)),
    (DocumentType::AtestadoTecnico, "Atestado de Capacidade Técnica.pdf", Some(-40)),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    let mut owner = DEFAULT_OWNER.to_string();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--owner" | "-o" => {
                if let Some(value) = args.get(i + 1) {
                    owner = value.clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Licita Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!(
                    "  -o, --owner <ID>   Owner of the seeded documents (default: {DEFAULT_OWNER})"
                );
                println!("  -h, --help         Show this help message");
                println!();
                println!("Environment: LICITA_DATABASE_PATH, LICITA_DB_MAX_CONNECTIONS,");
                println!("             LICITA_DEFAULT_VALIDITY_DAYS");
                return Ok(());
            }
            other => warn!(argument = %other, "Ignoring unknown argument"),
        }
        i += 1;
    }

    let config = AppConfig::load()?;
    info!(
        path = %config.database_path.display(),
        owner = %owner,
        "Seeding documents"
    );

    let db = Database::new(config.db_config()).await?;
    let repo = db.documents();

    let existing = repo.count(&owner).await?;
    if existing > 0 {
        warn!(
            existing,
            "Owner already has documents; skipping seed to avoid duplicates"
        );
        return Ok(());
    }

    let uploaded_at = Utc::now();
    for (document_type, name, days) in DEMO_DOCUMENTS {
        let new_document = NewDocument {
            name: name.to_string(),
            file_url: format!("documents/{owner}/{}", name.replace(' ', "-")),
            document_type: *document_type,
            expiration_date: days.map(|d| (uploaded_at + Duration::days(d)).to_rfc3339()),
        };

        repo.upload(&owner, &new_document, uploaded_at, config.default_validity_days)
            .await?;
    }

    info!(count = DEMO_DOCUMENTS.len(), "Documents inserted");

    let reference = ReferenceInstant::capture();
    for doc in repo.list_classified(&owner, reference).await? {
        println!(
            "{:>5} days  {:<9} {:<28} {}",
            doc.days_until_expiration,
            format!("{:?}", doc.status).to_lowercase(),
            doc.document.document_type.label(),
            doc.document.name
        );
    }

    let summary = repo.summary(&owner, reference).await?;
    println!();
    println!("{}", serde_json::to_string_pretty(&summary)?);

    db.close().await;
    Ok(())
}

/// Installs the fmt subscriber.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - Default: INFO, with sqlx quieted to WARN
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,licita_db=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
