use anyhow::{Context, Result};

pub const DEFAULT_PAGE_SIZE: u64 = 20;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub cors_allowed_origins: Vec<String>,
    pub default_page_size: u64,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .filter_map(|s| {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            })
            .collect::<Vec<_>>();

        let default_page_size = match lookup("HR_DEFAULT_PAGE_SIZE") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("invalid HR_DEFAULT_PAGE_SIZE {raw:?}"))?,
            None => DEFAULT_PAGE_SIZE,
        };

        Ok(Self {
            cors_allowed_origins,
            default_page_size,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cors_allowed_origins: vec!["http://localhost:5173".into()],
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.cors_allowed_origins, vec!["http://localhost:5173"]);
        assert_eq!(config.default_page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn origins_are_split_and_trimmed() {
        let config = AppConfig::from_lookup(lookup(&[
            ("CORS_ALLOWED_ORIGINS", "https://hr.example.com, ,http://localhost:3000"),
            ("HR_DEFAULT_PAGE_SIZE", "50"),
        ]))
        .unwrap();
        assert_eq!(
            config.cors_allowed_origins,
            vec!["https://hr.example.com", "http://localhost:3000"]
        );
        assert_eq!(config.default_page_size, 50);
    }

    #[test]
    fn bad_page_size_is_rejected() {
        assert!(AppConfig::from_lookup(lookup(&[("HR_DEFAULT_PAGE_SIZE", "lots")])).is_err());
    }
}
