//! Global configuration: settings, validation and the authority-gated store

use std::fs;
use std::path::Path;

use curve_model::MAX_FEE_PERCENTAGE;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use solana_program::pubkey::Pubkey;
use thiserror::Error;

use crate::error::{LaunchpadError, Result};
use crate::keys::base58;

/// Token decimals of launched mints
pub const TOKEN_DECIMALS: u8 = 6;

/// Lamports in one SOL
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Base units in one whole token
pub const TOKEN_UNIT: u64 = 1_000_000;

/// 42 SOL raised completes a curve
pub const DEFAULT_CURVE_LIMIT: u64 = 42 * LAMPORTS_PER_SOL;

/// 12.33 SOL of virtual base reserve
pub const DEFAULT_INITIAL_VIRTUAL_SOL_RESERVE: u64 = 12_330_000_000;

/// 1.073B tokens of virtual token reserve
pub const DEFAULT_INITIAL_VIRTUAL_TOKEN_RESERVE: u64 = 1_073_000_000 * TOKEN_UNIT;

/// 80% of supply sold through the curve
pub const DEFAULT_INITIAL_REAL_TOKEN_RESERVE: u64 = 800_000_000 * TOKEN_UNIT;

/// 1B tokens minted per launch
pub const DEFAULT_TOTAL_TOKEN_SUPPLY: u64 = 1_000_000_000 * TOKEN_UNIT;

/// Reserved padding block, stored verbatim
pub type Reserved = [[u8; 8]; 8];

/// Arguments of `configure`
///
/// Also the on-disk settings format (TOML, keys as base58 strings).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigSettings {
    #[serde(with = "base58")]
    pub authority: Pubkey,
    /// Receives trade and migration fees
    #[serde(with = "base58")]
    pub fee_recipient: Pubkey,
    /// Real lamport reserve at which a curve completes
    pub curve_limit: u64,

    pub initial_virtual_token_reserve: u64,
    pub initial_virtual_sol_reserve: u64,
    pub initial_real_token_reserve: u64,
    pub total_token_supply: u64,

    pub buy_fee_percentage: u8,
    pub sell_fee_percentage: u8,
    pub migration_fee_percentage: u8,

    #[serde(default)]
    pub reserved: Reserved,
}

/// Settings file errors
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),
}

impl ConfigSettings {
    /// Pump-style defaults with `authority` as both authority and fee recipient
    pub fn default_for(authority: Pubkey) -> Self {
        Self {
            authority,
            fee_recipient: authority,
            curve_limit: DEFAULT_CURVE_LIMIT,
            initial_virtual_token_reserve: DEFAULT_INITIAL_VIRTUAL_TOKEN_RESERVE,
            initial_virtual_sol_reserve: DEFAULT_INITIAL_VIRTUAL_SOL_RESERVE,
            initial_real_token_reserve: DEFAULT_INITIAL_REAL_TOKEN_RESERVE,
            total_token_supply: DEFAULT_TOTAL_TOKEN_SUPPLY,
            buy_fee_percentage: 1,
            sell_fee_percentage: 1,
            migration_fee_percentage: 2,
            reserved: Reserved::default(),
        }
    }

    pub fn from_toml_str(s: &str) -> core::result::Result<Self, SettingsError> {
        Ok(toml::from_str(s)?)
    }

    /// Load settings from a TOML file
    pub fn load(path: &Path) -> core::result::Result<Self, SettingsError> {
        let data = fs::read_to_string(path)?;
        Self::from_toml_str(&data)
    }

    /// Check fee and reserve fields
    pub fn validate(&self) -> Result<()> {
        let fees = [
            self.buy_fee_percentage,
            self.sell_fee_percentage,
            self.migration_fee_percentage,
        ];
        if fees.iter().any(|&pct| pct > MAX_FEE_PERCENTAGE) {
            return Err(LaunchpadError::InvalidFeePercentage);
        }

        if self.initial_virtual_token_reserve == 0 || self.initial_virtual_sol_reserve == 0 {
            return Err(LaunchpadError::InvalidReserveConfig("virtual reserves must be non-zero"));
        }
        if self.initial_real_token_reserve > self.total_token_supply {
            return Err(LaunchpadError::InvalidReserveConfig("real token reserve exceeds total supply"));
        }
        if self.initial_real_token_reserve > self.initial_virtual_token_reserve {
            return Err(LaunchpadError::InvalidReserveConfig(
                "real token reserve exceeds virtual token reserve",
            ));
        }
        Ok(())
    }
}

/// Committed global configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GlobalConfig {
    #[serde(with = "base58")]
    pub authority: Pubkey,
    #[serde(with = "base58")]
    pub fee_recipient: Pubkey,
    pub curve_limit: u64,

    pub initial_virtual_token_reserve: u64,
    pub initial_virtual_sol_reserve: u64,
    pub initial_real_token_reserve: u64,
    pub total_token_supply: u64,

    pub buy_fee_percentage: u8,
    pub sell_fee_percentage: u8,
    pub migration_fee_percentage: u8,

    pub reserved: Reserved,
}

impl From<ConfigSettings> for GlobalConfig {
    fn from(s: ConfigSettings) -> Self {
        Self {
            authority: s.authority,
            fee_recipient: s.fee_recipient,
            curve_limit: s.curve_limit,
            initial_virtual_token_reserve: s.initial_virtual_token_reserve,
            initial_virtual_sol_reserve: s.initial_virtual_sol_reserve,
            initial_real_token_reserve: s.initial_real_token_reserve,
            total_token_supply: s.total_token_supply,
            buy_fee_percentage: s.buy_fee_percentage,
            sell_fee_percentage: s.sell_fee_percentage,
            migration_fee_percentage: s.migration_fee_percentage,
            reserved: s.reserved,
        }
    }
}

/// Owner of the singleton GlobalConfig
///
/// The only write path is `configure`. Before the first write the
/// deployer is the sole identity allowed to call it; afterwards only the
/// stored authority is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigStore {
    deployer: Pubkey,
    config: Option<GlobalConfig>,
}

impl ConfigStore {
    pub fn new(deployer: Pubkey) -> Self {
        Self { deployer, config: None }
    }

    pub fn deployer(&self) -> &Pubkey {
        &self.deployer
    }

    pub fn get(&self) -> Option<&GlobalConfig> {
        self.config.as_ref()
    }

    /// Committed config, or `NotConfigured`
    pub fn require(&self) -> Result<&GlobalConfig> {
        self.config.as_ref().ok_or(LaunchpadError::NotConfigured)
    }

    /// Write the global config
    ///
    /// # Arguments
    /// * `caller` - Signing identity
    /// * `settings` - Complete new configuration
    ///
    /// # Errors
    /// * `Unauthorized` - caller is not the deployer (first write) or the stored authority
    /// * `InvalidAuthority` - `settings.authority` is the default key
    /// * `AuthorityChangeForbidden` - `settings.authority` differs from the stored one
    /// * `InvalidFeePercentage` / `InvalidReserveConfig` - see `ConfigSettings::validate`
    pub fn configure(&mut self, caller: &Pubkey, settings: ConfigSettings) -> Result<&GlobalConfig> {
        match &self.config {
            None => {
                if caller != &self.deployer {
                    warn!("configure rejected: {} is not the deployer", caller);
                    return Err(LaunchpadError::Unauthorized);
                }
            }
            Some(current) => {
                if caller != &current.authority {
                    warn!("configure rejected: {} is not the authority", caller);
                    return Err(LaunchpadError::Unauthorized);
                }
                if settings.authority != current.authority && settings.authority != Pubkey::default() {
                    return Err(LaunchpadError::AuthorityChangeForbidden);
                }
            }
        }

        if settings.authority == Pubkey::default() {
            return Err(LaunchpadError::InvalidAuthority);
        }
        settings.validate()?;

        let config = GlobalConfig::from(settings);
        info!(
            "global config set: authority={} buy_fee={}% sell_fee={}% curve_limit={}",
            config.authority, config.buy_fee_percentage, config.sell_fee_percentage, config.curve_limit
        );
        Ok(&*self.config.insert(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(n: u8) -> Pubkey {
        Pubkey::new_from_array([n; 32])
    }

    #[test]
    fn test_first_configure_requires_deployer() {
        let mut store = ConfigStore::new(key(1));
        assert_eq!(store.deployer(), &key(1));
        let result = store.configure(&key(2), ConfigSettings::default_for(key(2)));
        assert_eq!(result, Err(LaunchpadError::Unauthorized));
        assert!(store.get().is_none());

        store.configure(&key(1), ConfigSettings::default_for(key(3))).unwrap();
        assert_eq!(store.require().unwrap().authority, key(3));
    }

    #[test]
    fn test_reconfigure_requires_authority() {
        let mut store = ConfigStore::new(key(1));
        store.configure(&key(1), ConfigSettings::default_for(key(3))).unwrap();

        // The deployer loses its rights once an authority is set
        let mut settings = ConfigSettings::default_for(key(3));
        settings.buy_fee_percentage = 9;
        assert_eq!(store.configure(&key(1), settings.clone()), Err(LaunchpadError::Unauthorized));

        store.configure(&key(3), settings).unwrap();
        assert_eq!(store.require().unwrap().buy_fee_percentage, 9);
    }

    #[test]
    fn test_authority_cannot_change() {
        let mut store = ConfigStore::new(key(1));
        store.configure(&key(1), ConfigSettings::default_for(key(1))).unwrap();

        let result = store.configure(&key(1), ConfigSettings::default_for(key(4)));
        assert_eq!(result, Err(LaunchpadError::AuthorityChangeForbidden));
        assert_eq!(store.require().unwrap().authority, key(1));
    }

    #[test]
    fn test_default_authority_rejected() {
        let mut store = ConfigStore::new(key(1));
        let result = store.configure(&key(1), ConfigSettings::default_for(Pubkey::default()));
        assert_eq!(result, Err(LaunchpadError::InvalidAuthority));
    }

    #[test]
    fn test_fee_over_100_leaves_config_untouched() {
        let mut store = ConfigStore::new(key(1));
        store.configure(&key(1), ConfigSettings::default_for(key(1))).unwrap();
        let before = store.clone();

        for field in 0..3 {
            let mut settings = ConfigSettings::default_for(key(1));
            match field {
                0 => settings.buy_fee_percentage = 101,
                1 => settings.sell_fee_percentage = 101,
                _ => settings.migration_fee_percentage = 101,
            }
            assert_eq!(store.configure(&key(1), settings), Err(LaunchpadError::InvalidFeePercentage));
            assert_eq!(store, before);
        }
    }

    #[test]
    fn test_reserve_validation() {
        let mut settings = ConfigSettings::default_for(key(1));
        settings.initial_virtual_sol_reserve = 0;
        assert!(matches!(settings.validate(), Err(LaunchpadError::InvalidReserveConfig(_))));

        let mut settings = ConfigSettings::default_for(key(1));
        settings.initial_real_token_reserve = settings.total_token_supply + 1;
        assert!(matches!(settings.validate(), Err(LaunchpadError::InvalidReserveConfig(_))));

        let mut settings = ConfigSettings::default_for(key(1));
        settings.total_token_supply = u64::MAX;
        settings.initial_real_token_reserve = settings.initial_virtual_token_reserve + 1;
        assert!(matches!(settings.validate(), Err(LaunchpadError::InvalidReserveConfig(_))));

        assert!(ConfigSettings::default_for(key(1)).validate().is_ok());
    }

    #[test]
    fn test_settings_from_toml() {
        let authority = key(9);
        let text = format!(
            r#"
            authority = "{authority}"
            fee_recipient = "{authority}"
            curve_limit = 1000000000
            initial_virtual_token_reserve = 1000000000
            initial_virtual_sol_reserve = 1000000000
            initial_real_token_reserve = 1000000000
            total_token_supply = 1000000000
            buy_fee_percentage = 5
            sell_fee_percentage = 5
            migration_fee_percentage = 0
            "#
        );
        let settings = ConfigSettings::from_toml_str(&text).unwrap();
        assert_eq!(settings.authority, authority);
        assert_eq!(settings.buy_fee_percentage, 5);
        assert_eq!(settings.reserved, Reserved::default());
    }

    #[test]
    fn test_settings_bad_key() {
        let text = r#"
            authority = "not-a-key"
            fee_recipient = "11111111111111111111111111111111"
            curve_limit = 1
            initial_virtual_token_reserve = 1
            initial_virtual_sol_reserve = 1
            initial_real_token_reserve = 1
            total_token_supply = 1
            buy_fee_percentage = 0
            sell_fee_percentage = 0
            migration_fee_percentage = 0
        "#;
        assert!(matches!(ConfigSettings::from_toml_str(text), Err(SettingsError::Parse(_))));
    }
}
