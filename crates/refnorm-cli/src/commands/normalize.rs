//! Normalize command implementation.

use anyhow::{bail, Result};
use refnorm_canonical::{NormalizeResponse, Normalizer, Outcome};

use crate::output::{explain, format_envelope, format_json};

pub fn run(normalizer: &Normalizer, refs: &[String], json: bool, explain_refs: bool) -> Result<()> {
    let mut failed = 0;

    for input in refs {
        if explain_refs {
            let value = explain(normalizer, input);
            if value.get("error").is_some() {
                failed += 1;
            }
            println!("{}", format_json(&value));
            continue;
        }

        let outcome = normalizer.evaluate(input);
        if !outcome.is_canonical() {
            failed += 1;
        }
        if json {
            println!("{}", format_envelope(&NormalizeResponse::from(outcome)));
            continue;
        }
        match outcome {
            Outcome::Canonical(canonical) => println!("{}", canonical),
            Outcome::Error { kind, message } => eprintln!("{}: {} ({})", input, message, kind),
        }
    }

    if failed > 0 {
        bail!("{} of {} references could not be normalized", failed, refs.len());
    }
    Ok(())
}
