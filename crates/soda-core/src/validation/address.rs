//! Address syntax check

use alloy_primitives::Address;

/// Parse a `0x`-prefixed, 40-hex-digit address.
///
/// All-lowercase input is accepted as is; any uppercase hex digit means the
/// input must carry a valid EIP-55 checksum.
pub fn parse_address(input: &str) -> Result<Address, String> {
    let trimmed = input.trim();
    let Some(hex) = trimmed.strip_prefix("0x") else {
        return Err("address must start with 0x".to_string());
    };
    if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err("address must be 40 hex characters".to_string());
    }

    if hex.chars().any(|c| c.is_ascii_uppercase()) {
        return Address::parse_checksummed(trimmed, None)
            .map_err(|_| "address checksum is invalid".to_string());
    }

    trimmed
        .parse::<Address>()
        .map_err(|e| format!("invalid address: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_and_checksummed_addresses() {
        assert!(parse_address("0xfff9976782d46cc05630d1f6ebab18b2324d6b14").is_ok());
        assert!(parse_address("0xfFf9976782d46CC05630D1f6eBAb18b2324d6B14").is_ok());
    }

    #[test]
    fn test_bad_checksum_rejected() {
        let err = parse_address("0xFff9976782d46CC05630D1f6eBAb18b2324d6B14").unwrap_err();
        assert_eq!(err, "address checksum is invalid");
    }

    #[test]
    fn test_uppercase_needs_checksum() {
        let err = parse_address("0xFFF9976782D46CC05630D1F6EBAB18B2324D6B14").unwrap_err();
        assert_eq!(err, "address checksum is invalid");
        // digits only: checksum and lowercase forms coincide
        assert!(parse_address("0x1000000000000000000000000000000000000001").is_ok());
    }

    #[test]
    fn test_malformed_rejected() {
        assert!(parse_address("").is_err());
        assert!(parse_address("fff9976782d46cc05630d1f6ebab18b2324d6b14").is_err());
        assert!(parse_address("0x1234").is_err());
        assert!(parse_address("0xzzz9976782d46cc05630d1f6ebab18b2324d6b14").is_err());
    }
}
