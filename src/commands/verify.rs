//! Quick verify: probe a URL once without touching any template

use colored::Colorize;

use probectl::error::Result;
use probectl::normalize::normalize_with_method;
use probectl::probe::{ProbeResult, Verdict};
use probectl::template::Method;

use super::Backend;

pub fn cmd_verify(url: &str, method: Option<Method>, json: bool) -> Result<()> {
    let backend = Backend::open()?;
    let method = method.unwrap_or(backend.config.default_method);

    let spec = match normalize_with_method(url, method) {
        Ok(spec) => spec,
        Err(e) => {
            eprintln!("  {} {}", "url:".red(), e);
            return Err(e.into());
        }
    };
    tracing::debug!(protocol = %spec.protocol, port = %spec.port, url = %spec.url, "normalized target");

    if !json {
        println!(
            "\n  Probing {} {}://{} (port {})...",
            spec.method, spec.protocol, spec.url, spec.port
        );
    }
    let result = backend.client.verify_spec(&spec)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_probe_result(&result);
    }
    Ok(())
}

/// Render a probe result as a two-column table with its verdict
pub(crate) fn print_probe_result(result: &ProbeResult) {
    let verdict = match result.verdict() {
        Verdict::Pass => result.verdict().label().green().bold(),
        Verdict::Fail => result.verdict().label().red().bold(),
    };

    println!("\n  Result: {}", verdict);
    for (label, value) in result.rows() {
        let value = if value.is_empty() { "-".dimmed().to_string() } else { value };
        println!("    {:<18} {}", label, value);
    }
    println!();
}
