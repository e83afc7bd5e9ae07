use clap::Parser;
use report_mailer::domain::model::RetryPolicy;
use report_mailer::domain::ports::ConfigProvider;
use report_mailer::utils::{logger, validation::Validate};
use report_mailer::{CliConfig, LocalStorage, ReportEngine, ReportPipeline, TomlConfig};
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting report-mailer");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let dry_run = cli.dry_run;

    let outcome = if let Some(path) = cli.config.clone() {
        tracing::info!("📁 Loading configuration from: {}", path);
        match TomlConfig::from_file(&path) {
            Ok(config) => run(config, dry_run).await,
            Err(e) => {
                tracing::error!("❌ Failed to load config file '{}': {}", path, e);
                Err(e)
            }
        }
    } else {
        let mut config = cli;
        config.resolve_password();
        run(config, dry_run).await
    };

    // Exit only after `run` has returned, so the temporary artifact
    // directory guard inside it has already been dropped.
    if let Err(e) = outcome {
        tracing::error!("❌ Report run failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run<C>(config: C, dry_run: bool) -> report_mailer::Result<()>
where
    C: ConfigProvider + Validate + 'static,
{
    config.validate()?;

    display_config_summary(&config, dry_run);

    if dry_run {
        tracing::info!("🔍 DRY RUN MODE - No fetch or send will occur");
        return Ok(());
    }

    let policy = RetryPolicy {
        attempts: config.retry_attempts(),
        delay: Duration::from_secs(config.retry_delay_seconds()),
    };

    // The workbook lives in a temporary directory removed on every exit path
    // unless an output directory is configured.
    let (storage, _artifact_dir) = match config.output_dir() {
        Some(dir) => (LocalStorage::new(dir), None),
        None => {
            let (storage, guard) = LocalStorage::temporary()?;
            (storage, Some(guard))
        }
    };

    let pipeline = ReportPipeline::with_smtp(storage, config)?;
    let engine = ReportEngine::new(pipeline).with_retry_policy(policy);

    let receipt = engine.run().await?;
    tracing::info!("✅ Report sent successfully ({})", receipt);
    println!("✅ Report sent successfully");

    Ok(())
}

fn display_config_summary<C: ConfigProvider>(config: &C, dry_run: bool) {
    println!("📋 Configuration Summary:");
    println!("  Source: {}", config.source_url());
    println!("  From: {}", config.from_address());
    println!("  To: {}", config.to_address());
    println!("  Cc: {}", config.cc_addresses().join(", "));
    println!("  Subject: {}", config.subject());
    println!("  SMTP: {}:{}", config.smtp_host(), config.smtp_port());
    println!(
        "  Retry: {} attempt(s), {}s delay",
        config.retry_attempts(),
        config.retry_delay_seconds()
    );

    match config.output_dir() {
        Some(dir) => println!("  Artifact kept in: {}", dir),
        None => println!("  Artifact: temporary, removed after the run"),
    }

    if dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}
