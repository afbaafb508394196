//! Output formatting: plain text and JSON.
//!
//! Plain emits `name value` pairs, one per line, for scripting. JSON
//! serializes the same data with serde.

use std::io::{self, Write};

use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Render a single item: `plain_fn` for plain text, serde for JSON.
pub fn render<T>(
    format: OutputFormat,
    data: &T,
    plain_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: Serialize + ?Sized,
{
    match format {
        OutputFormat::Plain => Ok(plain_fn(data)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(data)?),
    }
}

/// Align `name value` rows on the widest name.
pub fn key_values<'a>(rows: impl IntoIterator<Item = (&'a str, String)>) -> String {
    let rows: Vec<_> = rows.into_iter().collect();
    let width = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    rows.iter()
        .map(|(k, v)| format!("{k:<width$}  {v}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Print the rendered output to stdout.
pub fn print_output(output: &str) {
    if output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_values_align_on_widest_name() {
        let out = key_values([("a", "1".to_string()), ("long-name", "2".to_string())]);
        assert_eq!(out, "a          1\nlong-name  2");
    }

    #[test]
    fn json_render_ignores_plain_fn() {
        let out = render(OutputFormat::Json, &[1, 2], |_| "plain".into());
        assert!(matches!(out, Ok(ref s) if s.contains('[') && !s.contains("plain")));
    }
}
