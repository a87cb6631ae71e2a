use anyhow::Result;
use colored::*;

use crate::catalog::default_catalog;
use crate::metrics::default_registry;

/// Print the default catalog roster, flagging metrics without a scorer.
pub fn run() -> Result<()> {
    let catalog = default_catalog();
    let registry = default_registry();

    for (aspect, spec) in catalog.iter() {
        println!("{}  (weight {:.1})", aspect.as_str().cyan().bold(), spec.weight);
        if !spec.description.is_empty() {
            println!("  {}", spec.description.dimmed());
        }
        for metric in &spec.metrics {
            if registry.contains(metric) {
                println!("  - {metric}");
            } else {
                println!("  - {metric} {}", "(no scorer registered)".yellow());
            }
        }
    }
    Ok(())
}
