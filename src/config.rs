//! Process configuration, read once at startup.
use thiserror::Error;

const TABLE_VAR: &str = "TICKETS_TABLE_ID";
const PAGE_SIZE_VAR: &str = "TICKETS_PAGE_SIZE";
const DEFAULT_PAGE_SIZE: i32 = 10;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    Missing(&'static str),

    #[error("{0} must be a positive integer, got '{1}'")]
    InvalidPageSize(&'static str, String),
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Name of the DynamoDB table holding tickets, keyed by `id`.
    pub table_name: String,
    /// Maximum number of tickets returned per listing page.
    pub page_size: i32,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let table_name = lookup(TABLE_VAR)
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing(TABLE_VAR))?;

        let page_size = match lookup(PAGE_SIZE_VAR) {
            Some(raw) => match raw.trim().parse::<i32>() {
                Ok(n) if n > 0 => n,
                _ => return Err(ConfigError::InvalidPageSize(PAGE_SIZE_VAR, raw)),
            },
            None => DEFAULT_PAGE_SIZE,
        };

        Ok(Config { table_name, page_size })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_page_size() {
        let config = Config::from_lookup(lookup_from(&[("TICKETS_TABLE_ID", "Tickets-dev")])).unwrap();
        assert_eq!(config.table_name, "Tickets-dev");
        assert_eq!(config.page_size, 10);
    }

    #[test]
    fn test_reads_page_size() {
        let config = Config::from_lookup(lookup_from(&[
            ("TICKETS_TABLE_ID", "Tickets"),
            ("TICKETS_PAGE_SIZE", "25"),
        ]))
        .unwrap();
        assert_eq!(config.page_size, 25);
    }

    #[test]
    fn test_missing_table_is_an_error() {
        let err = Config::from_lookup(lookup_from(&[("TICKETS_TABLE_ID", "  ")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("TICKETS_TABLE_ID"));
    }

    #[test]
    fn test_rejects_bad_page_size() {
        for raw in ["0", "-3", "ten"] {
            let result = Config::from_lookup(lookup_from(&[
                ("TICKETS_TABLE_ID", "Tickets"),
                ("TICKETS_PAGE_SIZE", raw),
            ]));
            assert!(matches!(result, Err(ConfigError::InvalidPageSize(_, _))), "accepted {raw}");
        }
    }
}
