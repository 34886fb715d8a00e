use std::path::PathBuf;

use crate::{config::AppConfig, util::Output};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct InitConfigArg {
    /// Output file path (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &InitConfigArg) -> anyhow::Result<()> {
    let text = AppConfig::default_toml()?;
    let mut output = Output::create(arg.output.as_deref())?;
    output.write_text(&text)?;
    if let Some(path) = &arg.output {
        eprintln!("Default configuration written to {}", path.display());
    }
    Ok(())
}
