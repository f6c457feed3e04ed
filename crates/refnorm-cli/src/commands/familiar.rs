//! Familiar command implementation.

use anyhow::{bail, Result};
use refnorm_canonical::Normalizer;

pub fn run(normalizer: &Normalizer, refs: &[String]) -> Result<()> {
    let mut failed = 0;
    for input in refs {
        match normalizer.parse(input) {
            Ok(reference) => println!("{}", normalizer.familiarize(&reference)),
            Err(e) => {
                eprintln!("{}: {}", input, e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} references could not be parsed", failed, refs.len());
    }
    Ok(())
}
