use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use serde_json::{json, Value};

use leafscan_core::{Classification, Classifier, FingerprintClassifier};
use leafscan_crypto::digest;
use leafscan_server::{LeafscanServer, ServerConfig};
use leafscan_types::Digest;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args),
        Command::Digest(args) => cmd_digest(args, cli.format),
        Command::Classify(args) => cmd_classify(args, cli.format),
        Command::Config => cmd_config(),
    }
}

fn runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new().context("starting async runtime")
}

fn read_image(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("reading {}", path.display()))
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }

    println!("{} Leafscan on {}", "✓".green().bold(), config.bind_addr.to_string().bold());
    println!("  Classifier: {}", "fingerprint (demo)".cyan());
    match &config.mirror {
        Some(m) => println!("  Records: mirrored to {}", m.path.display().to_string().yellow()),
        None => println!("  Records: {}", "local only".dimmed()),
    }

    let server = LeafscanServer::new(config, Arc::new(FingerprintClassifier::new()));
    runtime()?.block_on(server.serve())?;
    Ok(())
}

fn cmd_digest(args: DigestArgs, format: OutputFormat) -> anyhow::Result<()> {
    let image = read_image(&args.file)?;
    let fingerprint = digest(&image);
    match format {
        OutputFormat::Text => println!("{}  {}", fingerprint, args.file.display()),
        OutputFormat::Json => println!(
            "{}",
            json!({ "path": args.file.display().to_string(), "digest": fingerprint })
        ),
    }
    Ok(())
}

fn cmd_classify(args: ClassifyArgs, format: OutputFormat) -> anyhow::Result<()> {
    let image = read_image(&args.file)?;
    let classifier = FingerprintClassifier::new();
    let classification = runtime()?
        .block_on(classifier.classify(&image))
        .with_context(|| format!("classifying {}", args.file.display()))?;
    let fingerprint = digest(&image);

    match format {
        OutputFormat::Text => {
            println!(
                "{} {} ({:.2}%)",
                "Prediction:".bold(),
                classification.label.display_name().green().bold(),
                classification.confidence()
            );
            println!("  Image: {}", fingerprint.short_hex().yellow());
            for (rank, p) in classification.top(args.top).iter().enumerate() {
                println!("  {}. {:<22} {:>6.2}%", rank + 1, p.class().as_str(), p.confidence());
            }
            println!("\n{}", classification.label.description().dimmed());
        }
        OutputFormat::Json => {
            println!("{}", classification_json(&classification, fingerprint, args.top))
        }
    }
    Ok(())
}

fn cmd_config() -> anyhow::Result<()> {
    print!("{}", ServerConfig::default().to_toml_string()?);
    Ok(())
}

fn classification_json(classification: &Classification, fingerprint: Digest, top: usize) -> Value {
    json!({
        "prediction": classification.label,
        "confidence": classification.confidence(),
        "image_hash": fingerprint,
        "all_predictions": classification.top(top),
        "disease_info": classification.label.description(),
    })
}
