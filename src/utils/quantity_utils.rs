//! Numeric conversions between RPC quantities and aggregation amounts

use alloy::primitives::U256;
use num_bigint::{BigInt, Sign};
use serde::Serializer;

/// Renders `value` as a JSON-RPC quantity: `0x`-prefixed, no leading zeros
///
/// # Example
/// ```
/// use alloy::primitives::U256;
/// use trace_simulator::utils::to_quantity;
///
/// assert_eq!(to_quantity(U256::from(255u64)), "0xff");
/// ```
pub fn to_quantity(value: U256) -> String {
    format!("{value:#x}")
}

/// Lifts an on-chain amount into the signed arbitrary-precision domain
pub fn to_bigint(value: U256) -> BigInt {
    BigInt::from_bytes_be(Sign::Plus, &value.to_be_bytes::<32>())
}

/// Serializes a big integer as its signed decimal string
pub fn serialize_bigint<S: Serializer>(value: &BigInt, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_quantity_is_canonical() {
        assert_eq!(to_quantity(U256::ZERO), "0x0");
        assert_eq!(to_quantity(U256::from(0x384665653e000u64)), "0x384665653e000");
        assert_eq!(
            to_quantity(U256::from(1_000_000_000_000_000_000u128)),
            "0xde0b6b3a7640000"
        );
    }

    #[test]
    fn test_to_bigint() {
        assert_eq!(to_bigint(U256::ZERO), BigInt::from(0));
        assert_eq!(to_bigint(U256::from(42u64)), BigInt::from(42));
        assert_eq!(
            to_bigint(U256::MAX).to_string(),
            "115792089237316195423570985008687907853269984665640564039457584007913129639935"
        );
    }
}
