//! List command - print the registered subjects

use anyhow::Result;
use std::io::Write;
use tagtest_engine::SubjectRegistry;

/// Write one subject name per line, or a JSON array
pub fn run(registry: &SubjectRegistry, json: bool, out: &mut impl Write) -> Result<()> {
    if json {
        let names: Vec<_> = registry.names().collect();
        writeln!(out, "{}", serde_json::json!({ "subjects": names }))?;
    } else {
        for name in registry.names() {
            writeln!(out, "{}", name)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo;

    #[test]
    fn test_list_plain() {
        let mut out = Vec::new();
        run(&demo::registry(), false, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 4);
        assert!(text.starts_with("tagtest::demo::ShowcaseSuite\n"));
    }

    #[test]
    fn test_list_json() {
        let mut out = Vec::new();
        run(&demo::registry(), true, &mut out).unwrap();
        let doc: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(doc["subjects"].as_array().unwrap().len(), 4);
    }
}
