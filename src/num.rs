use alloy::primitives::U256;
use fastnum::{
    UD128, UD256, bint,
    decimal::{Context, RoundingMode, UnsignedDecimal},
};

/// Number of decimals of the on-chain and API fixed-point amounts.
pub const WEI_DECIMALS: u8 = 18;

/// Fixed-point to decimal converter.
#[derive(Clone, Copy, Debug, Default)]
pub struct Converter {
    decimals: i32,
}

impl Converter {
    pub fn new(decimals: u8) -> Self {
        Self {
            decimals: decimals as i32,
        }
    }

    /// Converter for 18-decimal "wei" amounts.
    pub fn wei() -> Self {
        Self::new(WEI_DECIMALS)
    }

    pub fn from_unsigned<const N: usize>(&self, value: U256) -> UnsignedDecimal<N> {
        let unscaled = bint::UInt::<N>::from_le_slice(value.as_le_slice())
            .expect("Converter: U256 -> UInt::<N>");
        UnsignedDecimal::<N>::from_parts(
            unscaled,
            -self.decimals,
            Context::default().with_rounding_mode(RoundingMode::Floor),
        )
    }

    /// Scales the value to the fixed-point integer, dropping the digits
    /// beyond the converter precision.
    pub fn to_unsigned<const N: usize>(&self, value: UnsignedDecimal<N>) -> U256 {
        let rescaled = value
            .with_rounding_mode(RoundingMode::Floor)
            .rescale(self.decimals as i16);
        U256::from_le_slice(rescaled.digits().to_radix_le(256).as_slice())
    }
}

/// Converts a decimal amount to its 18-decimal fixed-point representation.
///
/// Digits beyond the 18th decimal place are truncated.
pub fn to_wei(value: UD128) -> U256 {
    let wide: UD256 = value.resize();
    Converter::wei().to_unsigned(wide)
}

/// Converts an 18-decimal fixed-point amount back to a decimal.
pub fn from_wei(value: U256) -> UD256 {
    Converter::wei().from_unsigned(value)
}

/// Truncates the value to `precision` fractional digits.
///
/// Rounds towards zero: `1.129` with precision `2` gives `1.12`.
pub fn round_to_precision(value: UD128, precision: u32) -> UD128 {
    let precision = precision.min(i16::MAX as u32) as i16;
    value
        .with_rounding_mode(RoundingMode::Floor)
        .rescale(precision)
}

#[cfg(test)]
mod tests {
    use fastnum::{udec128, udec256};

    use super::*;

    #[test]
    fn test_numeric_converter_from_unsigned() {
        assert_eq!(
            Converter::new(0).from_unsigned(U256::from(1234567890)),
            udec256!(1234567890)
        );
        assert_eq!(
            Converter::new(6).from_unsigned(U256::from(1234567890)),
            udec256!(1234.56789)
        );
        assert_eq!(
            Converter::wei().from_unsigned(U256::from(1_000_000_000_000_000u64)),
            udec256!(0.001)
        );
    }

    #[test]
    fn test_numeric_converter_to_unsigned_truncates() {
        assert_eq!(
            Converter::new(6).to_unsigned(udec256!(1234.56789)),
            U256::from(1234567890)
        );
        assert_eq!(
            Converter::new(2).to_unsigned(udec256!(0.129)),
            U256::from(12)
        );
        assert_eq!(
            Converter::new(0).to_unsigned(udec256!(99.999)),
            U256::from(99)
        );
    }

    #[test]
    fn test_to_wei() {
        assert_eq!(
            to_wei(udec128!(100)),
            U256::from(100u64) * U256::from(10u64).pow(U256::from(18u64))
        );
        assert_eq!(
            to_wei(udec128!(3450)),
            U256::from(3_450_000_000_000_000_000_000u128)
        );
        assert_eq!(to_wei(udec128!(0.001)), U256::from(1_000_000_000_000_000u64));
        assert_eq!(to_wei(udec128!(0.0000000000000000019)), U256::from(1u64));
        assert_eq!(to_wei(UD128::ZERO), U256::ZERO);
    }

    #[test]
    fn test_to_wei_large_quantities() {
        // 1e24 * 1e18 does not fit into 128 bits
        assert_eq!(
            to_wei(udec128!(1000000000000000000000000)),
            U256::from(10u64).pow(U256::from(42u64))
        );
    }

    #[test]
    fn test_from_wei() {
        assert_eq!(
            from_wei(U256::from(3_450_000_000_000_000_000_000u128)),
            udec256!(3450)
        );
    }

    #[test]
    fn test_round_to_precision() {
        for (value, precision, expected) in [
            (udec128!(100), 0, udec128!(100)),
            (udec128!(100), 2, udec128!(100)),
            (udec128!(1.123), 2, udec128!(1.12)),
            (udec128!(1.129), 2, udec128!(1.12)),
            (udec128!(1.123), 0, udec128!(1)),
            (udec128!(1.123), 10, udec128!(1.123)),
            (udec128!(3985), 18, udec128!(3985)),
        ] {
            assert_eq!(
                round_to_precision(value, precision),
                expected,
                "{value} @ {precision}"
            );
        }
    }
}
