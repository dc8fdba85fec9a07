//! c32check address codec
//!
//! Stacks addresses are `'S' + version-char + c32(hash160 ‖ checksum4)` where
//! the checksum is the first four bytes of a double SHA-256 over
//! `version ‖ hash160`. The alphabet is the Crockford base32 variant without
//! I, L, O and U; `O` reads as `0` and `I`/`L` as `1`.

use lazy_static::lazy_static;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::models::network::Network;
use crate::utils::errors::AppError;

const C32_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Single-sig and multi-sig address versions per network
pub const MAINNET_VERSIONS: [u8; 2] = [22, 20]; // 'P', 'M'
pub const TESTNET_VERSIONS: [u8; 2] = [26, 21]; // 'T', 'N'

const CHECKSUM_LEN: usize = 4;
const HASH160_LEN: usize = 20;

lazy_static! {
    static ref C32_REVERSE: [i8; 128] = {
        let mut table = [-1i8; 128];
        for (i, &c) in C32_ALPHABET.iter().enumerate() {
            table[c as usize] = i as i8;
        }
        // Homoglyphs accepted on input
        table[b'O' as usize] = 0;
        table[b'L' as usize] = 1;
        table[b'I' as usize] = 1;
        table
    };
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum C32Error {
    #[error("invalid c32 character `{0}`")]
    InvalidCharacter(char),
    #[error("address too short")]
    TooShort,
    #[error("address must start with S")]
    MissingPrefix,
    #[error("invalid version character `{0}`")]
    InvalidVersion(char),
    #[error("decoded payload has wrong length")]
    BadLength,
    #[error("checksum mismatch")]
    BadChecksum,
}

/// Encode bytes into c32, one leading `0` digit per leading zero byte
pub fn c32_encode(data: &[u8]) -> String {
    let zeros = data.iter().take_while(|&&b| b == 0).count();

    let mut digits: Vec<u8> = Vec::new();
    let mut num: Vec<u8> = data[zeros..].to_vec();
    while num.iter().any(|&b| b != 0) {
        // Divide the big-endian number by 32, keeping the remainder
        let mut remainder: u32 = 0;
        for byte in num.iter_mut() {
            let acc = (remainder << 8) | *byte as u32;
            *byte = (acc / 32) as u8;
            remainder = acc % 32;
        }
        digits.push(C32_ALPHABET[remainder as usize]);
    }

    let mut out = String::with_capacity(zeros + digits.len());
    for _ in 0..zeros {
        out.push('0');
    }
    for &d in digits.iter().rev() {
        out.push(d as char);
    }
    out
}

/// Decode a c32 string, one leading zero byte per leading `0` digit
pub fn c32_decode(input: &str) -> Result<Vec<u8>, C32Error> {
    let mut values = Vec::with_capacity(input.len());
    for ch in input.chars() {
        let upper = ch.to_ascii_uppercase();
        let idx = if upper.is_ascii() {
            C32_REVERSE[upper as usize]
        } else {
            -1
        };
        if idx < 0 {
            return Err(C32Error::InvalidCharacter(ch));
        }
        values.push(idx as u8);
    }

    let zeros = values.iter().take_while(|&&v| v == 0).count();

    let mut bytes: Vec<u8> = Vec::new();
    for &value in &values[zeros..] {
        // Multiply the accumulated big-endian number by 32 and add the digit
        let mut carry = value as u32;
        for byte in bytes.iter_mut().rev() {
            let acc = *byte as u32 * 32 + carry;
            *byte = (acc & 0xff) as u8;
            carry = acc >> 8;
        }
        while carry > 0 {
            bytes.insert(0, (carry & 0xff) as u8);
            carry >>= 8;
        }
    }

    let mut out = vec![0u8; zeros];
    out.extend_from_slice(&bytes);
    Ok(out)
}

fn checksum(version: u8, hash160: &[u8]) -> [u8; CHECKSUM_LEN] {
    let mut preimage = Vec::with_capacity(1 + hash160.len());
    preimage.push(version);
    preimage.extend_from_slice(hash160);
    let digest = Sha256::digest(Sha256::digest(&preimage));
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&digest[..CHECKSUM_LEN]);
    out
}

/// Encode a version byte and hash160 into a Stacks address
pub fn c32_address_encode(version: u8, hash160: &[u8; HASH160_LEN]) -> String {
    let check = checksum(version, hash160);
    let mut payload = Vec::with_capacity(HASH160_LEN + CHECKSUM_LEN);
    payload.extend_from_slice(hash160);
    payload.extend_from_slice(&check);

    let mut out = String::from("S");
    out.push(C32_ALPHABET[(version & 0x1f) as usize] as char);
    out.push_str(&c32_encode(&payload));
    out
}

/// Decode a Stacks address into its version byte and hash160
pub fn c32_address_decode(address: &str) -> Result<(u8, [u8; HASH160_LEN]), C32Error> {
    let addr = address.trim().to_ascii_uppercase();
    if let Some(ch) = addr.chars().find(|c| !c.is_ascii()) {
        return Err(C32Error::InvalidCharacter(ch));
    }
    if addr.len() < 2 + CHECKSUM_LEN {
        return Err(C32Error::TooShort);
    }
    let mut chars = addr.chars();
    if chars.next() != Some('S') {
        return Err(C32Error::MissingPrefix);
    }
    let version_char = chars.next().unwrap_or('?');
    let version = if version_char.is_ascii() {
        C32_REVERSE[version_char as usize]
    } else {
        -1
    };
    if version < 0 {
        return Err(C32Error::InvalidVersion(version_char));
    }
    let version = version as u8;

    let payload = c32_decode(&addr[2..])?;
    if payload.len() != HASH160_LEN + CHECKSUM_LEN {
        return Err(C32Error::BadLength);
    }

    let mut hash160 = [0u8; HASH160_LEN];
    hash160.copy_from_slice(&payload[..HASH160_LEN]);
    if checksum(version, &hash160) != payload[HASH160_LEN..] {
        return Err(C32Error::BadChecksum);
    }
    Ok((version, hash160))
}

/// Reject an address that is not syntactically valid for the given network.
/// Runs before any network call.
pub fn validate_address(address: &str, network: Network) -> Result<(), AppError> {
    let (version, _) = c32_address_decode(address)
        .map_err(|e| AppError::validation(format!("Invalid Stacks address `{}`: {}", address, e)))?;
    let allowed = match network {
        Network::Mainnet => MAINNET_VERSIONS,
        Network::Testnet => TESTNET_VERSIONS,
    };
    if !allowed.contains(&version) {
        return Err(AppError::validation(format!(
            "Address `{}` does not belong to {} (wrong prefix)",
            address, network
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_c32_round_trip() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        for len in [1usize, 5, 20, 24, 33] {
            let data: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
            let encoded = c32_encode(&data);
            assert_eq!(c32_decode(&encoded).expect("decodes"), data);
        }
    }

    #[test]
    fn test_c32_preserves_leading_zero_bytes() {
        let data = [0u8, 0, 0, 1, 2, 3];
        let encoded = c32_encode(&data);
        assert!(encoded.starts_with("000"));
        assert_eq!(c32_decode(&encoded).expect("decodes"), data);
    }

    #[test]
    fn test_c32_homoglyphs_and_case() {
        // O→0, L/I→1, lowercase accepted
        assert_eq!(c32_decode("O").expect("decodes"), c32_decode("0").expect("decodes"));
        assert_eq!(c32_decode("l").expect("decodes"), c32_decode("1").expect("decodes"));
        assert_eq!(c32_decode("i").expect("decodes"), c32_decode("1").expect("decodes"));
        assert!(c32_decode("U").is_err());
    }

    #[test]
    fn test_address_round_trip() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(11);
        for version in [22u8, 20, 26, 21] {
            let mut hash160 = [0u8; 20];
            rng.fill(&mut hash160);
            let address = c32_address_encode(version, &hash160);
            assert!(address.starts_with('S'));
            let (v, h) = c32_address_decode(&address).expect("decodes");
            assert_eq!(v, version);
            assert_eq!(h, hash160);
        }
    }

    #[test]
    fn test_network_version_chars() {
        let hash160 = [0u8; 20];
        assert!(c32_address_encode(22, &hash160).starts_with("SP"));
        assert!(c32_address_encode(20, &hash160).starts_with("SM"));
        assert!(c32_address_encode(26, &hash160).starts_with("ST"));
        assert!(c32_address_encode(21, &hash160).starts_with("SN"));
    }

    #[test]
    fn test_tampered_checksum_rejected() {
        let address = c32_address_encode(22, &[9u8; 20]);
        let mut tampered: Vec<char> = address.chars().collect();
        let last = tampered.len() - 1;
        tampered[last] = if tampered[last] == 'Z' { 'Y' } else { 'Z' };
        let tampered: String = tampered.into_iter().collect();
        assert!(c32_address_decode(&tampered).is_err());
    }

    #[test]
    fn test_validate_address_checks_network() {
        let mainnet = c32_address_encode(22, &[3u8; 20]);
        let testnet = c32_address_encode(26, &[3u8; 20]);

        assert!(validate_address(&mainnet, Network::Mainnet).is_ok());
        assert!(validate_address(&mainnet, Network::Testnet).is_err());
        assert!(validate_address(&testnet, Network::Testnet).is_ok());
        assert!(validate_address(&testnet, Network::Mainnet).is_err());
        assert!(validate_address("not-an-address", Network::Mainnet).is_err());
    }
}
