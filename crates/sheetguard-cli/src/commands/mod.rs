//! CLI command implementations.

pub mod fix;
pub mod validate;

use std::path::Path;

use sheetguard::SheetguardConfig;

/// Configuration from a file, or the defaults.
pub fn load_config(path: Option<&Path>) -> sheetguard::Result<SheetguardConfig> {
    match path {
        Some(path) => SheetguardConfig::from_file(path),
        None => Ok(SheetguardConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_config_defaults_without_file() {
        assert_eq!(load_config(None).unwrap(), SheetguardConfig::default());
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"error_penalty": 5}"#).unwrap();

        let config = load_config(Some(&path)).unwrap();

        assert_eq!(config.error_penalty, 5);
        assert_eq!(config.max_suggestions, 10);
    }

    #[test]
    fn test_fix_writes_fixed_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("data.json");
        fs::write(
            &input,
            r#"{"clients": [{"ClientID": "C1", "ClientName": "Acme", "PriorityLevel": 9}]}"#,
        )
        .unwrap();

        fix::run(input.clone(), None, None, false, false).unwrap();

        let fixed = sheetguard::Dataset::load(dir.path().join("data.fixed.json")).unwrap();
        assert_eq!(
            fixed.sheet("clients").unwrap().cell(0, "PriorityLevel"),
            Some(&serde_json::json!(5))
        );
    }
}
