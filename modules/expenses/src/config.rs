use serde::{Deserialize, Serialize};

use crate::domain::service::ServiceConfig;

/// Configuration for the expenses module (`modules.expenses` in the app config)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExpensesConfig {
    #[serde(default = "default_max_description_length")]
    pub max_description_length: usize,
    #[serde(default = "default_max_tags")]
    pub max_tags: usize,
    #[serde(default = "default_body_limit_bytes")]
    pub body_limit_bytes: usize,
}

impl Default for ExpensesConfig {
    fn default() -> Self {
        Self {
            max_description_length: default_max_description_length(),
            max_tags: default_max_tags(),
            body_limit_bytes: default_body_limit_bytes(),
        }
    }
}

impl From<&ExpensesConfig> for ServiceConfig {
    fn from(cfg: &ExpensesConfig) -> Self {
        Self {
            max_description_length: cfg.max_description_length,
            max_tags: cfg.max_tags,
        }
    }
}

fn default_max_description_length() -> usize {
    500
}

fn default_max_tags() -> usize {
    50
}

fn default_body_limit_bytes() -> usize {
    1024 * 1024
}
