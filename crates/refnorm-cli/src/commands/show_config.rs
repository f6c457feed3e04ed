//! Config command implementation.

use anyhow::{Context, Result};
use refnorm_canonical::Normalizer;

pub fn run(normalizer: &Normalizer) -> Result<()> {
    let text =
        toml::to_string_pretty(normalizer.config()).context("failed to serialize configuration")?;
    print!("{}", text);
    Ok(())
}
