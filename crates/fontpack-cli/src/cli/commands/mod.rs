use super::args::*;

pub(crate) mod run;
pub mod validate;

use anyhow::Context;
use fontpack_core::Options;
use std::path::Path;

use crate::exit_codes::SUCCESS;

pub fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Run(args) => run::run(args),
        Command::Validate(args) => validate::run(args),
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(SUCCESS)
        }
    }
}

pub(crate) fn load_options(path: &Path) -> anyhow::Result<Options> {
    Options::from_file(path)
        .with_context(|| format!("failed to load config {}", path.display()))
}
