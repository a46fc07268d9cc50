use std::process::ExitCode;

use tracing::info;

use chatbase_provisioner::{CheckOutcome, HttpBackend, Provisioner, ProvisionerConfig, run_check};
use chatbase_types::Table;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chatbase_provisioner=info,chatbase_check=info".into()),
        )
        .init();

    let config = match ProvisionerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("FATAL: {}.", e);
            eprintln!("       Set CHATBASE_URL and CHATBASE_SERVICE_KEY in your .env file.");
            return Ok(ExitCode::FAILURE);
        }
    };

    info!("Checking backend connection and tables...");

    let backend = HttpBackend::new(&config)?;
    let provisioner = Provisioner::new(backend, config.sql_executor.clone());

    let outcome = run_check(&provisioner).await;
    match &outcome {
        CheckOutcome::Healthy => println!("Database is fully functional!"),
        CheckOutcome::PermissionIssue => {
            println!("Tables exist but there might be permission issues.")
        }
        CheckOutcome::Unreachable => println!("Cannot connect to {}", config.rest_base()),
        CheckOutcome::NotReady { present, remediation } => {
            println!();
            println!("Found {}/{} tables", present.len(), Table::ALL.len());
            println!();
            println!("MANUAL SETUP REQUIRED:");
            println!("Open your backend dashboard, navigate to the SQL editor and run this SQL:");
            println!();
            println!("{}", remediation);
            println!("After running the SQL, your chat should work!");
        }
    }

    Ok(if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
