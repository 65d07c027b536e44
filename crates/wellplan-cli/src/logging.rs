use crate::error::{CliError, Result};
use std::fs::File;
use std::path::PathBuf;
use tracing_subscriber::{
    filter::LevelFilter,
    fmt::{self},
    prelude::*,
};

/// Maps `-v` repetitions to a level. Warnings (aliquot shortfalls, volume advisories) stay
/// visible by default.
fn level_filter(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::OFF;
    }
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

pub fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<PathBuf>) -> Result<()> {
    let level_filter = level_filter(verbosity, quiet);

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false)
        .compact();

    let subscriber = tracing_subscriber::registry()
        .with(level_filter)
        .with(stderr_layer);

    if let Some(path) = log_file {
        let file = File::create(&path).map_err(CliError::Io)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true);

        subscriber.with(file_layer).try_init().map_err(|e| CliError::Other(e.into()))?;
    } else {
        subscriber.try_init().map_err(|e| CliError::Other(e.into()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::sync::Once;
    use wellplan::core::labware::registry::ContainerTypeRegistry;
    use wellplan::core::models::ids::WellRef;
    use wellplan::core::models::inventory::Inventory;
    use wellplan::engine::allocator::Destination;
    use wellplan::engine::config::MastermixConfigBuilder;
    use wellplan::workflows::mastermix;

    static INIT: Once = Once::new();

    fn ensure_global_logger_is_set() {
        INIT.call_once(|| {
            setup_logging(3, false, None).expect("Failed to set up global logger for tests");
        });
    }

    fn run_short_mastermix() {
        let registry = ContainerTypeRegistry::builtin();
        let mut inventory = Inventory::new();
        let tube = inventory.add_container("dna", registry.get("micro-1.5").unwrap());
        let source = WellRef::new(tube, 0);
        inventory.set_volume(source, 10.0).unwrap();
        let config = MastermixConfigBuilder::new()
            .name("mm")
            .destination(Destination::NewContainers("micro-1.5".to_string()))
            .reactions(10)
            .resource("rs17kj4vnh5xm3", 8.0)
            .aliquot(source, 2.0)
            .build()
            .unwrap();
        mastermix::run(&mut inventory, &registry, &config).unwrap();
    }

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(level_filter(0, false), LevelFilter::WARN);
        assert_eq!(level_filter(1, false), LevelFilter::INFO);
        assert_eq!(level_filter(2, false), LevelFilter::DEBUG);
        assert_eq!(level_filter(7, false), LevelFilter::TRACE);
        assert_eq!(level_filter(3, true), LevelFilter::OFF);
    }

    #[test]
    #[serial]
    fn global_logger_accepts_workflow_records() {
        ensure_global_logger_is_set();
        run_short_mastermix();
    }

    #[test]
    #[serial]
    fn second_initialization_is_reported() {
        ensure_global_logger_is_set();
        assert!(matches!(setup_logging(0, true, None), Err(CliError::Other(_))));
    }

    #[test]
    #[serial]
    fn file_layer_captures_workflow_records() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("test.log");

        let file = File::create(&log_path).unwrap();
        let file_layer = fmt::layer().with_writer(file).with_ansi(false);
        let subscriber = tracing_subscriber::registry()
            .with(level_filter(1, false))
            .with(file_layer);

        tracing::subscriber::with_default(subscriber, run_short_mastermix);

        let content = std::fs::read_to_string(log_path).unwrap();
        assert!(content.contains("mastermix_workflow"));
        assert!(content.contains("Mastermix 'mm' complete"));
        assert!(content.contains("WARN"));
        assert!(content.contains("Aliquot 'dna-0' holds 10"));
        assert!(!content.contains("DEBUG"));
    }

    #[test]
    #[serial]
    fn invalid_log_file_path_propagates_error() {
        let invalid_path = PathBuf::from("/");

        if cfg!(unix) && invalid_path.is_dir() {
            let result = setup_logging(0, false, Some(invalid_path));
            assert!(matches!(result, Err(CliError::Io(_))));
        }
    }
}
