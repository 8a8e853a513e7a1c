//! Deterministic key derivation
//!
//! Config and curve keys are program addresses derived from fixed seed
//! tags, the same way the on-chain program derives its PDAs. A key is only
//! a lookup handle: it owns nothing and carries no state of its own.

use solana_program::pubkey::Pubkey;

/// Seed tag of the global config address
pub const CONFIG_SEED: &[u8] = b"global_config";

/// Seed tag of every bonding curve address
pub const CURVE_SEED: &[u8] = b"bonding_curve";

/// Derive the global config key
pub fn config_key(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[CONFIG_SEED], program_id)
}

/// Derive the bonding curve key for `mint`
///
/// Same mint, same key; distinct mints never share one.
pub fn curve_key(program_id: &Pubkey, mint: &Pubkey) -> (Pubkey, u8) {
    derive_key(program_id, CURVE_SEED, mint)
}

/// Derive a key from a seed tag and a mint
pub fn derive_key(program_id: &Pubkey, tag: &[u8], mint: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[tag, mint.as_ref()], program_id)
}

/// Serde adapter writing keys as base58 strings
pub mod base58 {
    use std::str::FromStr;

    use serde::{de::Error, Deserialize, Deserializer, Serializer};
    use solana_program::pubkey::Pubkey;

    pub fn serialize<S: Serializer>(key: &Pubkey, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&key.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Pubkey, D::Error> {
        let s = String::deserialize(deserializer)?;
        Pubkey::from_str(&s).map_err(|e| D::Error::custom(format!("invalid pubkey {s}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn program() -> Pubkey {
        Pubkey::new_from_array([7; 32])
    }

    #[test]
    fn test_curve_key_is_deterministic() {
        let mint = Pubkey::new_from_array([1; 32]);
        assert_eq!(curve_key(&program(), &mint), curve_key(&program(), &mint));
    }

    #[test]
    fn test_distinct_mints_distinct_keys() {
        let a = curve_key(&program(), &Pubkey::new_from_array([1; 32])).0;
        let b = curve_key(&program(), &Pubkey::new_from_array([2; 32])).0;
        assert_ne!(a, b);
    }

    #[test]
    fn test_tag_separates_namespaces() {
        let mint = Pubkey::new_from_array([3; 32]);
        let curve = derive_key(&program(), CURVE_SEED, &mint).0;
        let other = derive_key(&program(), b"metadata", &mint).0;
        assert_ne!(curve, other);
        assert_ne!(curve, config_key(&program()).0);
    }

    #[test]
    fn test_bump_recreates_key() {
        let (key, bump) = curve_key(&program(), &Pubkey::new_from_array([4; 32]));
        let recreated = Pubkey::create_program_address(
            &[CURVE_SEED, Pubkey::new_from_array([4; 32]).as_ref(), &[bump]],
            &program(),
        )
        .unwrap();
        assert_eq!(key, recreated);
    }
}
