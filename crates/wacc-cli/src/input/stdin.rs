use serde::de::DeserializeOwned;
use std::io::{self, Read};

/// Attempt to read a typed input from stdin if data is being piped.
/// Returns None if stdin is a TTY (interactive) or empty.
///
/// JSON is tried first; anything else is parsed as YAML.
pub fn read_stdin<T: DeserializeOwned>() -> Result<Option<T>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    parse_piped(&buffer)
}

fn parse_piped<T: DeserializeOwned>(buffer: &str) -> Result<Option<T>, Box<dyn std::error::Error>> {
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return Ok(Some(serde_json::from_str(trimmed)?));
    }
    Ok(Some(serde_yaml::from_str(trimmed)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wacc_core::structure::SourceCost;

    #[test]
    fn test_empty_input_is_none() {
        let parsed: Option<Vec<SourceCost>> = parse_piped("  \n").unwrap();
        assert!(parsed.is_none());
    }

    #[test]
    fn test_json_and_yaml_agree() {
        let json = r#"[{ "name": "Equity", "market_value": "100", "cost_rate_percent": "12" }]"#;
        let yaml = "- name: Equity\n  market_value: \"100\"\n  cost_rate_percent: \"12\"\n";
        let a: Vec<SourceCost> = parse_piped(json).unwrap().unwrap();
        let b: Vec<SourceCost> = parse_piped(yaml).unwrap().unwrap();
        assert_eq!(a, b);
    }
}
