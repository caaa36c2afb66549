use anyhow::{anyhow, Result};
use serde_json::{Map, Value};
use std::{fs, io::Read};

/// Reads `source` as text: `-` reads stdin, anything else is a file path.
pub fn load_text(source: &str) -> Result<String> {
    if source == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| anyhow!("Failed to read from stdin: {}", e))?;
        Ok(buffer)
    } else {
        fs::read_to_string(source).map_err(|e| anyhow!("Failed to read file {}: {}", source, e))
    }
}

/// Parses a JSON object given either inline or as a path ending in `.json`.
pub fn load_json_object(source: &str) -> Result<Map<String, Value>> {
    let json = if source.ends_with(".json") {
        load_text(source)?
    } else {
        source.to_string()
    };
    super::dejsonify::<Map<String, Value>>(&json)
        .map_err(|e| anyhow!("Failed to parse JSON object: {}", e))
}
