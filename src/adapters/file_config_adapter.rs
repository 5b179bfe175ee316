//! INI file configuration adapter.
//!
//! Keys are case-sensitive so instrument ids in `[instruments]` keep their
//! spelling, and sections keep file order so the first instrument listed is
//! the one selected at startup.

use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new_cs();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new_cs();
        config.read(content.to_string())?;
        Ok(Self { config })
    }

    /// Adapter with no sections; every lookup falls back to its default.
    pub fn empty() -> Self {
        Self {
            config: Ini::new_cs(),
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn section_entries(&self, section: &str) -> Vec<(String, String)> {
        self.config
            .get_map_ref()
            .get(section)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|(k, v)| v.as_ref().map(|v| (k.clone(), v.clone())))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_config() {
        let content = r#"
[simulation]
initial_balance = 100000.0
history_len = 150

[strategy]
short_period = 10
trade_amount = 1000
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("simulation", "history_len"),
            Some("150".to_string())
        );
        assert_eq!(adapter.get_int("strategy", "short_period", 0), 10);
        assert_eq!(adapter.get_double("strategy", "trade_amount", 0.0), 1000.0);
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter =
            FileConfigAdapter::from_string("[simulation]\ninitial_balance = 100\n").unwrap();
        assert_eq!(adapter.get_string("simulation", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
        assert!(adapter.has_key("simulation", "initial_balance"));
        assert!(!adapter.has_key("simulation", "missing"));
    }

    #[test]
    fn get_int_returns_default_for_missing() {
        let adapter = FileConfigAdapter::from_string("[strategy]\n").unwrap();
        assert_eq!(adapter.get_int("strategy", "long_period", 42), 42);
    }

    #[test]
    fn get_int_returns_default_for_non_numeric() {
        let adapter = FileConfigAdapter::from_string("[strategy]\nlong_period = abc\n").unwrap();
        assert_eq!(adapter.get_int("strategy", "long_period", 42), 42);
    }

    #[test]
    fn get_double_returns_default_for_non_numeric() {
        let adapter =
            FileConfigAdapter::from_string("[simulation]\nvolatility = lots\n").unwrap();
        assert_eq!(adapter.get_double("simulation", "volatility", 0.02), 0.02);
    }

    #[test]
    fn section_entries_keep_order_and_case() {
        let content = "[instruments]\nZED = Zed Holdings\nACME = Acme Corp\nbeta = Beta Ltd\n";
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        let entries = adapter.section_entries("instruments");
        assert_eq!(
            entries,
            vec![
                ("ZED".to_string(), "Zed Holdings".to_string()),
                ("ACME".to_string(), "Acme Corp".to_string()),
                ("beta".to_string(), "Beta Ltd".to_string()),
            ]
        );
    }

    #[test]
    fn section_entries_missing_section() {
        let adapter = FileConfigAdapter::empty();
        assert!(adapter.section_entries("instruments").is_empty());
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[simulation]\nseed = 7\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(adapter.get_int("simulation", "seed", 0), 7);
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/config.ini");
        assert!(result.is_err());
    }
}
