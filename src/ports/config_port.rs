//! Configuration access port trait.

/// Sectioned key/value configuration.
pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;

    /// Trimmed value, with blank entries treated as absent.
    fn get_value(&self, section: &str, key: &str) -> Option<String> {
        self.get_string(section, key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

/// Configuration with no keys set; every lookup falls back to defaults.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyConfig;

impl ConfigPort for EmptyConfig {
    fn get_string(&self, _section: &str, _key: &str) -> Option<String> {
        None
    }
}
