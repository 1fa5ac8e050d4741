use anyhow::{anyhow, Result};
use clap::Parser;

use multicursor::cli::{self, CliArgs, OutputMode};

fn main() -> Result<()> {
    multicursor::tracing::init();

    let run = CliArgs::parse().into_config().map_err(|e| anyhow!(e))?;
    let config = cli::load_engine_config(run.config_path.as_deref())?;
    let output = cli::run(&run, config)?;

    match run.output {
        OutputMode::InPlace => {
            eprintln!(
                "Edited {} occurrence(s) in {}",
                output.occurrences,
                run.file.display()
            );
        }
        mode => print!("{}", output.render(mode)?),
    }
    Ok(())
}
