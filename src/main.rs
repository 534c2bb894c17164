use anyhow::Context;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tricache::ops::{load_script, run_script};
use tricache::{AppConfig, Operation, RecordDraft, TriIndexCache};

fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("Failed to load config")?;

    // RUST_LOG wins over the configured filter
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .init();

    info!("TriCache starting...");

    // A script given on the command line overrides the configured one
    let script = std::env::args_os().nth(1).map(PathBuf::from).or(config.script);

    let ops = match script {
        Some(path) => load_script(&path)
            .with_context(|| format!("Failed to load script {:?}", path))?,
        None => {
            info!("No script given, running demo");
            demo_script()
        }
    };

    let mut cache = TriIndexCache::new();
    let report = run_script(&mut cache, &ops);

    for (op, outcome) in ops.iter().zip(&report.outcomes) {
        println!("{:<15} {}", op.name(), serde_json::to_string(outcome)?);
    }

    if config.print_stats {
        println!("{}", serde_json::to_string_pretty(&cache.stats())?);
    }

    Ok(())
}

fn demo_script() -> Vec<Operation> {
    vec![
        Operation::Add {
            record: RecordDraft::complete(1, "Alice", 10.0),
        },
        Operation::Add {
            record: RecordDraft::complete(2, "Bob", 20.0),
        },
        Operation::Size,
        Operation::UpdateAccount { old: 1, new: 3 },
        Operation::GetByAccount { account: 1 },
        Operation::GetByAccount { account: 3 },
        Operation::Add {
            record: RecordDraft::complete(3, "Carl", 99.0),
        },
        Operation::Size,
        Operation::Remove {
            record: RecordDraft::complete(3, "Alice", 10.0),
        },
        Operation::Size,
        Operation::GetByName {
            name: "Alice".to_string(),
        },
    ]
}
