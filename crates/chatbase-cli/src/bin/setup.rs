use std::process::ExitCode;

use tracing::info;

use chatbase_provisioner::{
    HttpBackend, Provisioner, ProvisionerConfig, SetupOutcome, SetupStage, run_setup,
};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chatbase_provisioner=info,chatbase_setup=info".into()),
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

    info!("Starting database setup");
    info!("Backend URL: {}", config.project_url);

    let backend = HttpBackend::new(&config)?;
    let provisioner = Provisioner::new(backend, config.sql_executor.clone());

    match run_setup(&provisioner).await {
        SetupOutcome::Done => {
            println!();
            println!("Database setup completed successfully!");
            println!("  All tables created");
            println!("  Indexes created");
            println!("  RLS policies configured");
            println!();
            println!("Your chat application is ready to use!");
            Ok(ExitCode::SUCCESS)
        }
        SetupOutcome::Failed { reached, remediation } => {
            println!();
            if reached == SetupStage::Start {
                println!("Failed to create the {} function. Manual setup required.", config.sql_executor);
            } else {
                println!("Setup stopped after stage {:?}.", reached);
            }
            println!();
            println!("Manual setup instructions:");
            println!("1. Open your backend dashboard");
            println!("2. Navigate to the SQL editor");
            println!("3. Run the following SQL, then re-run chatbase-setup:");
            println!();
            println!("{}", remediation);
            Ok(ExitCode::FAILURE)
        }
    }
}
