use anyhow::{Context, Result, bail};
use dotenvy::dotenv;
use std::env;

use crate::service::DayCountPolicy;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    MySql { database_url: String },
    /// In-process tables; state is lost on restart.
    Memory,
}

#[derive(Clone)]
pub struct Config {
    pub server_addr: String,
    pub store: StoreBackend,
    pub jwt_secret: String,
    pub log_dir: String,

    // Rate limiting
    pub rate_protected_per_min: u32,

    pub api_prefix: String,
    pub leave_day_count_policy: DayCountPolicy,
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let store = match var_or("STORE_BACKEND", "mysql").as_str() {
            "mysql" => StoreBackend::MySql {
                database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            },
            "memory" => StoreBackend::Memory,
            other => bail!("STORE_BACKEND must be `mysql` or `memory`, got `{other}`"),
        };

        let policy = var_or("LEAVE_DAY_COUNT_POLICY", "trust");
        let leave_day_count_policy = policy.parse().with_context(|| {
            format!("LEAVE_DAY_COUNT_POLICY must be `trust` or `working-days`, got `{policy}`")
        })?;

        Ok(Self {
            server_addr: env::var("SERVER_ADDR").context("SERVER_ADDR must be set")?,
            store,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            log_dir: var_or("LOG_DIR", "logs"),

            rate_protected_per_min: var_or("RATE_PROTECTED_PER_MIN", "1000")
                .parse()
                .context("RATE_PROTECTED_PER_MIN must be a number")?,

            api_prefix: var_or("API_PREFIX", "/api"),
            leave_day_count_policy,
        })
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Self {
            server_addr: "127.0.0.1:0".to_string(),
            store: StoreBackend::Memory,
            jwt_secret: crate::auth::jwt::test_tokens::SECRET.to_string(),
            log_dir: "logs".to_string(),
            rate_protected_per_min: 10_000,
            api_prefix: "/api".to_string(),
            leave_day_count_policy: DayCountPolicy::Trust,
        }
    }
}
