use anyhow::{bail, Context, Result};
use fontpack_core::{FontPack, TransformError};
use std::io::{Read, Write};
use std::path::Path;

use super::load_options;
use crate::cli::args::RunArgs;
use crate::exit_codes;

const STDIN: &str = "-";

pub fn run(args: RunArgs) -> Result<i32> {
    if args.output.is_some() && args.inputs.len() != 1 {
        bail!("--output requires exactly one input");
    }
    if args.in_place && args.inputs.iter().any(|p| is_stdin(p)) {
        bail!("--in-place cannot rewrite stdin");
    }

    let mut options = load_options(&args.config)?;
    if args.require_size {
        options.require_size = true;
    }
    let fontpack = FontPack::new(Some(&options))
        .with_context(|| format!("invalid config {}", args.config.display()))?;

    let mut stdout = std::io::stdout().lock();
    for input in &args.inputs {
        let css = read_input(input)?;
        let output = match fontpack.process_css(&css) {
            Ok(output) => output,
            Err(err) => {
                report(input, &err);
                return Ok(exit_codes::TRANSFORM_FAILED);
            }
        };

        if args.in_place {
            write_file(input, &output)?;
            tracing::info!(file = %input.display(), "rewrote in place");
        } else if let Some(path) = &args.output {
            write_file(path, &output)?;
            tracing::info!(file = %path.display(), "wrote output");
        } else {
            stdout
                .write_all(output.as_bytes())
                .context("failed to write stdout")?;
        }
    }
    stdout.flush().context("failed to write stdout")?;

    Ok(exit_codes::SUCCESS)
}

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == STDIN
}

fn read_input(path: &Path) -> Result<String> {
    if is_stdin(path) {
        let mut css = String::new();
        std::io::stdin()
            .read_to_string(&mut css)
            .context("failed to read stdin")?;
        return Ok(css);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}

fn report(input: &Path, err: &TransformError) {
    let name = if is_stdin(input) {
        "<stdin>".to_string()
    } else {
        input.display().to_string()
    };
    eprintln!("{name}: {err}");
}
