use serde_json::Value;
use std::io::{self, Write};

/// Pretty-print JSON to stdout.
pub fn print_json(value: &Value) {
    let stdout = io::stdout();
    if let Err(e) = write_json(&mut stdout.lock(), value) {
        eprintln!("JSON serialization error: {}", e);
    }
}

fn write_json<W: Write>(out: &mut W, value: &Value) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pretty_output_ends_with_newline() {
        let mut buf = Vec::new();
        write_json(&mut buf, &json!({ "wacc_percent": "10.05" })).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("\"wacc_percent\": \"10.05\""));
        assert!(text.ends_with('\n'));
    }
}
