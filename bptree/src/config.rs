//! Simulation driver configuration.
//!
//! Settings are loaded from environment variables.
//!
//! # Environment Variables
//!
//! - `BPTREE_SEED`: Seed for the operation generator (default: `0x5eed`).
//!   Accepts decimal or `0x`-prefixed hex.
//! - `BPTREE_OPERATIONS`: Number of operations to run (default: `10000`)
//! - `BPTREE_KEY_SPACE`: Keys are drawn from `0..BPTREE_KEY_SPACE` (default: `2048`)
//! - `BPTREE_PRINT_TREE`: Print the final tree (`true`/`false`/`1`/`0`, default: `false`)
//!
//! # Invariants
//!
//! - `operations` and `key_space` are always non-zero

use crate::bplus::Key;

/// Settings for a simulation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationSettings {
    /// Seed for the operation generator.
    pub seed: u64,
    /// Number of operations to run.
    pub operations: usize,
    /// Size of the key space.
    pub key_space: Key,
    /// Whether to print the final tree.
    pub print_tree: bool,
}

/// Error returned when loading configuration fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable has an invalid value.
    InvalidValue { name: String, message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { name, message } => {
                write!(f, "invalid value for {name}: {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            seed: Self::DEFAULT_SEED,
            operations: Self::DEFAULT_OPERATIONS,
            key_space: Self::DEFAULT_KEY_SPACE,
            print_tree: false,
        }
    }
}

impl SimulationSettings {
    /// Default generator seed.
    pub const DEFAULT_SEED: u64 = 0x5eed;
    /// Default number of operations.
    pub const DEFAULT_OPERATIONS: usize = 10_000;
    /// Default key space.
    pub const DEFAULT_KEY_SPACE: Key = 2048;

    /// Load settings from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but not valid for its type, or
    /// if `BPTREE_OPERATIONS` or `BPTREE_KEY_SPACE` is zero.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load settings through `lookup`, which returns a variable's value if set.
    ///
    /// # Errors
    ///
    /// Same as [`Self::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let seed = match lookup("BPTREE_SEED") {
            Some(value) => parse_seed(&value)?,
            None => Self::DEFAULT_SEED,
        };
        let operations = match lookup("BPTREE_OPERATIONS") {
            Some(value) => parse_positive::<usize>("BPTREE_OPERATIONS", &value)?,
            None => Self::DEFAULT_OPERATIONS,
        };
        let key_space = match lookup("BPTREE_KEY_SPACE") {
            Some(value) => parse_positive::<Key>("BPTREE_KEY_SPACE", &value)?,
            None => Self::DEFAULT_KEY_SPACE,
        };
        let print_tree = match lookup("BPTREE_PRINT_TREE") {
            Some(value) => parse_bool("BPTREE_PRINT_TREE", &value)?,
            None => false,
        };

        Ok(Self {
            seed,
            operations,
            key_space,
            print_tree,
        })
    }
}

fn invalid(name: &str, message: String) -> ConfigError {
    ConfigError::InvalidValue {
        name: name.to_string(),
        message,
    }
}

fn parse_seed(value: &str) -> Result<u64, ConfigError> {
    let trimmed = value.trim();
    let parsed = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .map_or_else(|| trimmed.parse::<u64>(), |hex| u64::from_str_radix(hex, 16));
    parsed.map_err(|_| invalid("BPTREE_SEED", format!("'{value}' is not a valid u64 seed")))
}

fn parse_positive<T>(name: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialEq + Default,
{
    let parsed = value
        .trim()
        .parse::<T>()
        .map_err(|_| invalid(name, format!("'{value}' is not a valid number")))?;
    if parsed == T::default() {
        return Err(invalid(name, "must be greater than zero".to_string()));
    }
    Ok(parsed)
}

fn parse_bool(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(invalid(
            name,
            format!("'{value}' is not a boolean (expected true, false, 1 or 0)"),
        )),
    }
}
