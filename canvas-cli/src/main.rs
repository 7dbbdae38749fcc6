//! # Pageboard Canvas CLI
//!
//! Plays an editing script and writes the exported pages.

use canvas_cli::{parse_script, CliArgs, EditorConfig, EditorSession};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize structured tracing with optional JSON format.
///
/// Set `RUST_LOG` to control log levels (default: info,canvas_core=debug,canvas_renderer=debug).
/// Set `RUST_LOG_FORMAT=json` for JSON output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,canvas_core=debug,canvas_renderer=debug"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = CliArgs::parse();
    let script_path = args.script.clone();
    let config = EditorConfig::from(args);

    tracing::info!(
        "Surface {}x{}, export scale {}, writing to {}",
        config.surface_width,
        config.surface_height,
        config.scale,
        config.out_dir.display()
    );

    let json = tokio::fs::read_to_string(&script_path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", script_path.display(), e))?;
    let commands = parse_script(&json)?;

    let mut session = EditorSession::new(config)?;
    session.run(commands);
    let report = session.finish().await;

    for path in &report.written {
        println!("{}", path.display());
    }
    for message in &report.notifications {
        eprintln!("canvas-cli: {message}");
    }
    if report.skipped > 0 {
        tracing::info!("{} export(s) skipped with no surface mounted", report.skipped);
    }

    Ok(())
}
