/// Matrix Tracer - Shows the flow through Blob → OutcomeMap → Row, or
/// Comparison JSON → ComparisonTable
///
/// Usage: cargo run --bin trace_matrix <blob|comparison|queue> <file> [config.toml]
///
/// Logs go to stderr and honour `RUST_LOG`; the built matrix is printed to
/// stdout as JSON.

use rqboard_core::{DashboardConfig, MetadataRegistry};
use rqboard_matrix::MatrixBuilder;
use rqboard_records::{decode_comparison, decode_release_queue, parse_with_report};
use std::fs;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn usage() -> ! {
    eprintln!("Usage: cargo run --bin trace_matrix <blob|comparison|queue> <file> [config.toml]");
    eprintln!();
    eprintln!("Example:");
    eprintln!("  RUST_LOG=rqboard_records=debug cargo run --bin trace_matrix blob pr-results.txt");
    std::process::exit(1);
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("❌ {}", message);
    std::process::exit(1);
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => fail(format!("Failed to serialize output: {}", e)),
    }
}

fn main() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if let Err(e) = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
    {
        eprintln!("Failed to init subscriber: {}", e);
    }

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        usage();
    }
    let mode = args[1].as_str();
    let input_path = &args[2];

    let config = match args.get(3) {
        Some(path) => DashboardConfig::from_path(Path::new(path))
            .unwrap_or_else(|e| fail(format!("Failed to load {}: {}", path, e))),
        None => DashboardConfig::from_env()
            .unwrap_or_else(|e| fail(format!("Invalid environment config: {}", e))),
    };
    let marker = config.log_path_marker.clone();
    let builder = MatrixBuilder::new(config).unwrap_or_else(|e| fail(e));

    let content = fs::read_to_string(input_path)
        .unwrap_or_else(|e| fail(format!("Failed to read {}: {}", input_path, e)));

    match mode {
        "blob" => {
            let mut registry = MetadataRegistry::seeded();
            let report = parse_with_report(&content, &mut registry);
            for issue in &report.issues {
                eprintln!("⚠️  {}", issue);
            }
            if !report.registered.is_empty() {
                eprintln!("📝 new categories: {}", report.registered.join(", "));
            }
            print_json(&builder.build_pr_summary(&report.outcomes, &registry));
        }
        "comparison" => {
            let comparison = decode_comparison(&content, &marker).unwrap_or_else(|e| fail(e));
            print_json(&builder.build_comparison_table(&comparison));
        }
        "queue" => {
            let (name, comparisons) =
                decode_release_queue(&content, &marker).unwrap_or_else(|e| fail(e));
            print_json(&builder.build_release_queue(&name, &comparisons));
        }
        _ => usage(),
    }
}
