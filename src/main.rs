use clap::Parser;
use domain_srs::adapters::notifier::notify_outcome;
use domain_srs::core::ruleset::render_document;
use domain_srs::utils::{logger, validation::Validate};
use domain_srs::{
    CliConfig, ConsoleNotifier, RulesetEngine, RulesetError, RulesetPipeline, Settings,
    SingBoxCompiler,
};
use std::io::Write;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);

    tracing::info!("🚀 Starting domain-srs");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let notifier = ConsoleNotifier;

    let settings = match cli.resolve().and_then(|settings| {
        settings.validate()?;
        Ok(settings)
    }) {
        Ok(settings) => settings,
        Err(e) => fail(&notifier, e),
    };

    if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be written");
        if let Err(e) = print_document(&settings) {
            fail(&notifier, e);
        }
        return Ok(());
    }

    tracing::info!("📄 Processing file: {}", settings.input.display());

    let compiler = SingBoxCompiler::from_config(&settings);
    let pipeline = match RulesetPipeline::for_input(settings.input.clone(), compiler) {
        Ok(pipeline) => pipeline.with_keep_json(settings.keep_json),
        Err(e) => fail(&notifier, e),
    };

    let engine = RulesetEngine::new(pipeline);
    let outcome = engine.run().await;
    notify_outcome(&notifier, &outcome);

    if let Err(e) = outcome {
        log_failure(&e);
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }

    Ok(())
}

fn print_document(settings: &Settings) -> domain_srs::Result<()> {
    let bytes = render_document(&settings.input)?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&bytes)?;
    writeln!(stdout)?;
    Ok(())
}

fn log_failure(e: &RulesetError) {
    if e.is_warning() {
        tracing::warn!("⚠️ {}", e);
    } else {
        tracing::error!(
            "❌ Conversion failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
    }
    if let RulesetError::CompilerExecutionError { stdout, stderr, .. } = e {
        tracing::error!("Compiler stdout: {}", stdout.trim_end());
        tracing::error!("Compiler stderr: {}", stderr.trim_end());
    }
    tracing::debug!("💡 Recovery suggestion: {}", e.recovery_suggestion());
}

fn fail(notifier: &ConsoleNotifier, e: RulesetError) -> ! {
    log_failure(&e);
    let exit_code = e.exit_code();
    let suggestion = e.recovery_suggestion();
    notify_outcome(notifier, &Err(e));
    eprintln!("💡 {}", suggestion);
    std::process::exit(exit_code);
}
