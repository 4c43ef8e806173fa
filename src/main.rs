use clap::Parser;
use uni_etl::domain::ports::ConfigProvider;
use uni_etl::utils::error::{ErrorSeverity, EtlError};
use uni_etl::utils::{logger, validation::Validate};
use uni_etl::{CliConfig, EtlConfig, EtlEngine, HttpFetcher, LocalStorage, UniversityPipeline};

fn report(e: &EtlError) {
    tracing::error!(
        "ETL process failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("{}", e.user_friendly_message());
    eprintln!("Suggestion: {}", e.recovery_suggestion());
}

fn exit_code(severity: ErrorSeverity) -> i32 {
    match severity {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn print_plan(config: &EtlConfig) {
    println!("Target country:   {}", config.target_country());
    println!("Min courses/univ: {}", config.min_courses_per_university());
    println!(
        "Output:           {}/{}",
        config.output_path(),
        config.output_filename()
    );
    println!("Targets:          {}", config.targets().len());
    for target in config.targets() {
        println!("  {}", config.ranking_url(&target.slug));
        println!("  {}", target.encyclopedia_url);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI options: {:?}", cli);

    let config = match cli.resolve().and_then(|config| {
        config.validate()?;
        Ok(config)
    }) {
        Ok(config) => config,
        Err(e) => {
            report(&e);
            std::process::exit(1);
        }
    };

    if cli.dry_run {
        print_plan(&config);
        return Ok(());
    }

    let fetcher = HttpFetcher::new(config.http.clone())?;
    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = UniversityPipeline::new(storage, config, fetcher);
    let engine = EtlEngine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
            println!("ETL process completed successfully");
            println!("Output saved to: {}", output_path);
        }
        Err(e) => {
            report(&e);
            let code = exit_code(e.severity());
            if code > 0 {
                std::process::exit(code);
            }
        }
    }

    Ok(())
}
