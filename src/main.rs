use clap::Parser;
use imgpack::domain::model::{ImageSource, JobRequest};
use imgpack::utils::{logger, validation::Validate};
use imgpack::{CliConfig, LocalStorage, PackOrchestrator, StretchResizer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting imgpack CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    // Resolve everything to absolute paths up front; the job itself never
    // consults the working directory.
    std::fs::create_dir_all(&config.output_path)?;
    config.output_path = std::fs::canonicalize(&config.output_path)?
        .to_string_lossy()
        .into_owned();

    let mut images = Vec::with_capacity(config.images.len());
    for path in &config.images {
        match std::fs::canonicalize(path) {
            Ok(resolved) => images.push(ImageSource::new(resolved)),
            Err(e) => {
                tracing::error!("Cannot read source image {}: {}", path, e);
                eprintln!("❌ Cannot read source image '{}': {}", path, e);
                std::process::exit(1);
            }
        }
    }

    let request = JobRequest {
        images,
        include_ios: !config.no_ios,
        include_android: !config.no_android,
    };

    let storage = LocalStorage::new(config.output_path.clone());
    let orchestrator = PackOrchestrator::new(StretchResizer::new(), storage, config);

    match orchestrator.run(request).await {
        Ok(outcome) => {
            tracing::info!("Job completed: {} file(s) packaged", outcome.file_count);
            if !outcome.failures.is_empty() {
                println!(
                    "⚠️ {} resize operation(s) failed; see failures.json inside the archive",
                    outcome.failures.len()
                );
            }
            println!("✅ Packaged {} resized image(s)", outcome.file_count);
            println!("📁 Output saved to: {}", outcome.output_path);
        }
        Err(e) => {
            tracing::error!("Job failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = e.severity().exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
