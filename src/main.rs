use anyhow::Result;

use crate::{config::ShellConfig, shell::start_shell};

mod config;
mod disk;
mod fs;
mod kernel;
mod logging;
mod shell;

fn main() -> Result<()> {
    let config = ShellConfig::from_env();
    logging::init(config.log_level)?;
    start_shell(&config)
}
