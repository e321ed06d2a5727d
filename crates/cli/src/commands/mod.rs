//! Client subcommands: the old admin screens as CLI verbs.
//!
//! Every command follows the same shape: validate locally (a failing draft
//! never produces a request), call the API through [`crate::client::ApiClient`],
//! and print either human text or JSON per `--output`.

pub(crate) mod job;
pub(crate) mod masters;
pub(crate) mod outward;
pub(crate) mod report;

use crate::OutputFormat;

/// Print a success line (text) or a JSON document, honoring `--quiet`.
pub(crate) fn emit(
    text: impl FnOnce() -> String,
    json: &serde_json::Value,
    output: OutputFormat,
    quiet: bool,
) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => println!("{}", text()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(json).unwrap_or_default()),
    }
}

/// Pull a string field out of a JSON record for display, with a `-` fallback.
pub(crate) fn field<'a>(record: &'a serde_json::Value, name: &str) -> &'a str {
    record.get(name).and_then(|v| v.as_str()).unwrap_or("-")
}
