use super::load_registry;
use crate::cli::TypesArgs;
use crate::error::Result;
use wellplan::core::labware::registry::ContainerTypeRegistry;
use wellplan::core::volume::usable_volume;

pub fn run(args: TypesArgs) -> Result<()> {
    let registry = load_registry(args.registry.as_deref())?;
    print!("{}", render_table(&registry));
    Ok(())
}

fn render_table(registry: &ContainerTypeRegistry) -> String {
    let mut out = format!(
        "{:<14} {:>6} {:>8} {:>10} {:>8} {:>8} {:>10}\n",
        "TYPE", "WELLS", "COLUMNS", "VOLUME", "DEAD", "SAFE", "USABLE"
    );
    for name in registry.names() {
        let Some(spec) = registry.get(name) else {
            continue;
        };
        let usable = usable_volume(spec, false, true)
            .map(|v| format!("{:.1}", v))
            .unwrap_or_else(|_| "-".to_string());
        out.push_str(&format!(
            "{:<14} {:>6} {:>8} {:>10.1} {:>8.1} {:>8.1} {:>10}\n",
            name,
            spec.well_count,
            spec.col_count,
            spec.well_volume,
            spec.dead_volume,
            spec.safe_min_volume,
            usable
        ));
    }
    out
}
