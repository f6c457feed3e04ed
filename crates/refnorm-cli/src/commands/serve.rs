//! Serve command: a JSON-lines bridge from stdin to stdout.
//!
//! Each non-blank input line is a request envelope (`{"ref": "..."}`) and is
//! answered by exactly one response line (`{"ref": ..., "error": ...}`). Bad
//! requests, including lines that are not UTF-8, are answered with an error
//! envelope; only I/O failures end the loop.

use anyhow::{Context, Result};
use refnorm_canonical::{handle, NormalizeRequest, NormalizeResponse, Normalizer};
use std::io::{self, BufRead, Write};
use tracing::{info, warn};

use crate::output::format_envelope;

/// Counters reported when the input is exhausted.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ServeStats {
    pub requests: u64,
    pub failures: u64,
}

pub fn run(normalizer: &Normalizer) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let stats = serve(normalizer, stdin.lock(), stdout.lock())?;
    info!(
        requests = stats.requests,
        failures = stats.failures,
        "input closed"
    );
    Ok(())
}

pub fn serve<R: BufRead, W: Write>(
    normalizer: &Normalizer,
    mut input: R,
    mut output: W,
) -> Result<ServeStats> {
    let mut stats = ServeStats::default();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let read = input
            .read_until(b'\n', &mut buf)
            .context("failed to read request")?;
        if read == 0 {
            break;
        }

        let response = match std::str::from_utf8(&buf) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => respond(normalizer, line.trim()),
            Err(e) => {
                warn!(error = %e, "request is not UTF-8");
                NormalizeResponse::error(format!("malformed request: {}", e))
            }
        };
        stats.requests += 1;
        if response.error.is_some() {
            stats.failures += 1;
        }

        writeln!(output, "{}", format_envelope(&response)).context("failed to write response")?;
        output.flush().context("failed to flush response")?;
    }

    Ok(stats)
}

fn respond(normalizer: &Normalizer, line: &str) -> NormalizeResponse {
    match serde_json::from_str::<NormalizeRequest>(line) {
        Ok(request) => handle(normalizer, &request),
        Err(e) => {
            warn!(error = %e, "malformed request");
            NormalizeResponse::error(format!("malformed request: {}", e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::io::Cursor;

    fn run_lines(input: impl AsRef<[u8]>) -> (ServeStats, Vec<Value>) {
        let mut output = Vec::new();
        let stats = serve(
            &Normalizer::default(),
            Cursor::new(input.as_ref()),
            &mut output,
        )
        .unwrap();
        let responses = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        (stats, responses)
    }

    #[test]
    fn answers_each_request_in_order() {
        let (stats, responses) = run_lines(
            "{\"ref\":\"ubuntu\"}\n\n{\"ref\":\"UPPER/case\"}\n{\"ref\":\"localhost/app\"}\n",
        );
        assert_eq!(
            stats,
            ServeStats {
                requests: 3,
                failures: 1
            }
        );
        assert_eq!(responses[0]["ref"], "docker.io/library/ubuntu");
        assert_eq!(responses[0]["error"], Value::Null);
        assert_eq!(responses[1]["ref"], Value::Null);
        assert_eq!(
            responses[1]["error"],
            "invalid reference format: repository name must be lowercase"
        );
        assert_eq!(responses[2]["ref"], "localhost/app");
    }

    #[test]
    fn bad_requests_do_not_stop_the_bridge() {
        let (stats, responses) = run_lines("not json\n{}\n{\"ref\":5}\n{\"ref\":\"redis:7\"}\n");
        assert_eq!(stats.requests, 4);
        assert_eq!(stats.failures, 3);
        assert!(responses[0]["error"]
            .as_str()
            .unwrap()
            .starts_with("malformed request"));
        assert_eq!(responses[1]["error"], "missing ref field");
        assert!(responses[2]["error"]
            .as_str()
            .unwrap()
            .starts_with("malformed request"));
        assert_eq!(responses[3]["ref"], "docker.io/library/redis:7");
    }

    #[test]
    fn invalid_utf8_gets_an_error_envelope() {
        let (stats, responses) =
            run_lines(&b"{\"ref\":\"ubuntu\"}\n\xff\xfe\n{\"ref\":\"redis\"}"[..]);
        assert_eq!(stats.requests, 3);
        assert_eq!(stats.failures, 1);
        assert_eq!(responses[0]["ref"], "docker.io/library/ubuntu");
        assert_eq!(responses[1]["ref"], Value::Null);
        assert!(responses[1]["error"]
            .as_str()
            .unwrap()
            .starts_with("malformed request"));
        assert_eq!(responses[2]["ref"], "docker.io/library/redis");
    }
}
