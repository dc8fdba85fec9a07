//! STX denomination and display helpers

use crate::utils::errors::AppError;

pub const MICRO_STX_PER_STX: u64 = 1_000_000;

/// Convert a microSTX amount to STX
pub fn microstx_to_stx(micro: u64) -> f64 {
    micro as f64 / MICRO_STX_PER_STX as f64
}

/// Format a microSTX amount with the full 6 decimal places
pub fn format_stx(micro: u64) -> String {
    format!("{:.6} STX", microstx_to_stx(micro))
}

/// Shorten an address for list display: `SP2J6Z…9EJ7` style
pub fn abbreviate_address(address: &str) -> String {
    if !address.is_ascii() || address.len() <= 11 {
        return address.to_string();
    }
    format!("{}…{}", &address[..6], &address[address.len() - 4..])
}

/// Shorten a transaction or block hash for list display
pub fn abbreviate_hash(hash: &str) -> String {
    if !hash.is_ascii() || hash.len() <= 14 {
        return hash.to_string();
    }
    format!("{}…{}", &hash[..10], &hash[hash.len() - 4..])
}

/// Parse a transaction id into its 32-byte buffer form
///
/// Accepts an optional `0x` prefix. Anything that does not decode to exactly
/// 32 bytes is rejected before any network call is made.
pub fn parse_txid(txid: &str) -> Result<[u8; 32], AppError> {
    let clean = txid.strip_prefix("0x").unwrap_or(txid);
    let bytes = hex::decode(clean)
        .map_err(|_| AppError::validation(format!("Transaction id is not valid hex: {}", txid)))?;
    bytes.try_into().map_err(|_| {
        AppError::validation(format!(
            "Transaction id must be 32 bytes ({} given)",
            clean.len() / 2
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_microstx_conversion() {
        assert_eq!(microstx_to_stx(1_000_000), 1.0);
        assert_eq!(microstx_to_stx(1_500_000), 1.5);
        assert_eq!(microstx_to_stx(0), 0.0);
    }

    #[test]
    fn test_parse_txid_accepts_prefixed_hex() {
        let txid = format!("0x{}", "ab".repeat(32));
        let bytes = parse_txid(&txid).expect("should parse");
        assert_eq!(bytes, [0xab; 32]);

        let bare = "cd".repeat(32);
        assert_eq!(parse_txid(&bare).expect("should parse"), [0xcd; 32]);
    }

    #[test]
    fn test_parse_txid_rejects_bad_input() {
        assert!(parse_txid("0xzz").is_err());
        assert!(parse_txid("ab").is_err());
        assert!(parse_txid(&"ab".repeat(31)).is_err());
    }

    #[test]
    fn test_abbreviations() {
        let addr = "SP2J6ZY48GV1EZ5V2V5RB9MP66SW86PYKKNRV9EJ7";
        let short = abbreviate_address(addr);
        assert!(short.starts_with("SP2J6Z"));
        assert!(short.ends_with("9EJ7"));
        assert_eq!(abbreviate_address("SHORT"), "SHORT");
    }
}
