use super::load_registry;
use crate::cli::MastermixArgs;
use crate::config::MastermixRequest;
use crate::error::Result;
use crate::report::MastermixReport;
use tracing::{info, warn};
use wellplan::workflows::mastermix;

pub fn run(args: MastermixArgs) -> Result<()> {
    let registry = load_registry(args.registry.as_deref())?;
    let request = MastermixRequest::from_file(&args.request)?;
    let (mut inventory, config) = request.into_plan(&registry)?;

    let output = mastermix::run(&mut inventory, &registry, &config)?;
    for shortfall in &output.shortfalls {
        warn!(
            "Aliquot '{}' is short: {} µL available, {} µL needed",
            shortfall.label, shortfall.available, shortfall.needed
        );
    }

    let report = MastermixReport::build(&config.name, &inventory, &output)?;
    let rendered = report.render(args.format)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, rendered)?;
            info!("Plan written to {:?}", path);
        }
        None => println!("{}", rendered),
    }
    Ok(())
}
