//! Runtime configuration from the environment.

use crate::error::{ExecutionError, Result};
use crate::retry::{Jitter, RetryPolicy};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use suitrump_domain::type_tag::LpPattern;
use suitrump_protocols::rpc::RpcConfig;

/// Module holding pools and stakes.
pub const FARM_MODULE: &str = "farm";
/// Module holding token locks.
pub const LOCKER_MODULE: &str = "token_locker";

/// Settings shared by the services and the CLI.
#[derive(Debug, Clone)]
pub struct FarmConfig {
    pub rpc: RpcConfig,
    /// Package that publishes the farm and locker modules.
    pub package_id: String,
    /// Package of the pair module defining LP coins; any package when `None`.
    pub lp_package_id: Option<String>,
    /// Directory for the persisted token cache.
    pub cache_dir: PathBuf,
    pub retry: RetryPolicy,
    /// Page size for event and object queries.
    pub page_size: usize,
}

impl Default for FarmConfig {
    fn default() -> Self {
        Self {
            rpc: RpcConfig::default(),
            package_id: String::new(),
            lp_package_id: None,
            cache_dir: PathBuf::from(".suitrump-cache"),
            retry: RetryPolicy::default(),
            page_size: 50,
        }
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T> {
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| ExecutionError::Config(format!("{} has invalid value `{}`", key, raw))),
        _ => Ok(default),
    }
}

impl FarmConfig {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    /// Returns an error if a numeric variable does not parse.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`.
    ///
    /// # Errors
    /// Returns an error if a numeric variable does not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let retry = RetryPolicy {
            max_attempts: parse_var(&lookup, "RPC_MAX_ATTEMPTS", defaults.retry.max_attempts)?,
            base_delay: Duration::from_millis(parse_var(
                &lookup,
                "RPC_BASE_DELAY_MS",
                defaults.retry.base_delay.as_millis() as u64,
            )?),
            max_delay: Duration::from_millis(parse_var(
                &lookup,
                "RPC_MAX_DELAY_MS",
                defaults.retry.max_delay.as_millis() as u64,
            )?),
            jitter: Jitter::Proportional(25),
        };

        Ok(Self {
            rpc: RpcConfig {
                url: non_empty("SUI_RPC_URL").unwrap_or(defaults.rpc.url),
                timeout: Duration::from_secs(parse_var(
                    &lookup,
                    "RPC_TIMEOUT_SECS",
                    defaults.rpc.timeout.as_secs(),
                )?),
            },
            package_id: non_empty("FARM_PACKAGE_ID").unwrap_or_default(),
            lp_package_id: non_empty("LP_PACKAGE_ID"),
            cache_dir: non_empty("TOKEN_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_dir),
            retry,
            page_size: parse_var(&lookup, "RPC_PAGE_SIZE", defaults.page_size)?,
        })
    }

    /// Package id, or an error when it is not configured.
    ///
    /// # Errors
    /// Returns an error if `FARM_PACKAGE_ID` was not set.
    pub fn require_package(&self) -> Result<&str> {
        if self.package_id.is_empty() {
            return Err(ExecutionError::Config(
                "FARM_PACKAGE_ID must be set".to_string(),
            ));
        }
        Ok(&self.package_id)
    }

    /// LP type pattern for the configured pair package.
    pub fn lp_pattern(&self) -> LpPattern {
        match &self.lp_package_id {
            Some(package) => LpPattern::for_package(package),
            None => LpPattern::default(),
        }
    }

    /// `package::farm::<name>`.
    pub fn farm_type(&self, name: &str) -> String {
        format!("{}::{}::{}", self.package_id, FARM_MODULE, name)
    }

    /// `package::token_locker::<name>`.
    pub fn locker_type(&self, name: &str) -> String {
        format!("{}::{}::{}", self.package_id, LOCKER_MODULE, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = FarmConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.rpc.url, "https://fullnode.mainnet.sui.io:443");
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.page_size, 50);
        assert!(config.require_package().is_err());
        assert_eq!(config.lp_pattern(), LpPattern::default());
    }

    #[test]
    fn test_overrides() {
        let config = FarmConfig::from_lookup(lookup(&[
            ("SUI_RPC_URL", "http://localhost:9000"),
            ("FARM_PACKAGE_ID", "0xfa"),
            ("LP_PACKAGE_ID", "0x1234"),
            ("RPC_MAX_ATTEMPTS", "5"),
            ("RPC_BASE_DELAY_MS", "10"),
            ("TOKEN_CACHE_DIR", "/tmp/farm"),
        ]))
        .unwrap();
        assert_eq!(config.rpc.url, "http://localhost:9000");
        assert_eq!(config.require_package().unwrap(), "0xfa");
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.base_delay, Duration::from_millis(10));
        assert_eq!(config.cache_dir, PathBuf::from("/tmp/farm"));
        assert_eq!(config.farm_type("PoolCreated"), "0xfa::farm::PoolCreated");
        assert_eq!(config.locker_type("Lock"), "0xfa::token_locker::Lock");
        assert!(config.lp_pattern().package.is_some());
    }

    #[test]
    fn test_invalid_number() {
        let err = FarmConfig::from_lookup(lookup(&[("RPC_MAX_ATTEMPTS", "many")])).unwrap_err();
        assert!(matches!(err, ExecutionError::Config(_)));
    }
}
