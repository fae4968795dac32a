use anyhow::{Context, Result};
use fontpack_core::{FontPack, LookupTable};
use serde::Serialize;

use super::load_options;
use crate::cli::args::{OutputFormat, ValidateArgs};
use crate::exit_codes;

#[derive(Serialize)]
struct ValidateReport<'a> {
    config: String,
    require_size: bool,
    packs: usize,
    variants: usize,
    lookup: &'a LookupTable,
}

pub fn run(args: ValidateArgs) -> Result<i32> {
    let options = load_options(&args.config)?;
    let fontpack = FontPack::new(Some(&options))
        .with_context(|| format!("invalid config {}", args.config.display()))?;
    let lookup = fontpack.lookup();

    match args.format {
        OutputFormat::Text => {
            println!(
                "✔ Config OK: {} ({} packs, {} variants)",
                args.config.display(),
                lookup.pack_count(),
                lookup.variant_count()
            );
            for slug in lookup.slugs() {
                let variants = lookup.candidates(slug).map_or(0, |records| records.len());
                println!("  {slug}: {variants} variants");
            }
        }
        OutputFormat::Json => {
            let report = ValidateReport {
                config: args.config.display().to_string(),
                require_size: fontpack.require_size(),
                packs: lookup.pack_count(),
                variants: lookup.variant_count(),
                lookup,
            };
            let json = serde_json::to_string_pretty(&report).context("failed to encode report")?;
            println!("{json}");
        }
    }

    Ok(exit_codes::SUCCESS)
}
