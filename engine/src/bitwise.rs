use std::ops::RangeInclusive;

/// Helpers to read and write bit fields of hardware register words.
/// Bit indexes go from lsb to msb (right to left).
pub trait Bits: Copy {
    const WIDTH: u8;

    fn get_bit(self, bit_idx: u8) -> bool;

    #[must_use]
    fn with_bit(self, bit_idx: u8, value: bool) -> Self;

    /// Returns the field in `bits_range`, shifted down to bit 0.
    fn get_bits(self, bits_range: RangeInclusive<u8>) -> Self;

    /// Replaces the field in `bits_range` with `value`.
    /// Bits of `value` that don't fit in the field are dropped.
    #[must_use]
    fn with_bits(self, bits_range: RangeInclusive<u8>, value: Self) -> Self;
}

macro_rules! impl_bits {
    ($ty:ty) => {
        impl Bits for $ty {
            const WIDTH: u8 = <$ty>::BITS as u8;

            fn get_bit(self, bit_idx: u8) -> bool {
                debug_assert!(bit_idx < Self::WIDTH);
                (self >> bit_idx) & 1 == 1
            }

            fn with_bit(self, bit_idx: u8, value: bool) -> Self {
                debug_assert!(bit_idx < Self::WIDTH);
                let mask = 1 << bit_idx;
                if value { self | mask } else { self & !mask }
            }

            fn get_bits(self, bits_range: RangeInclusive<u8>) -> Self {
                let start = *bits_range.start();
                let end = *bits_range.end();
                debug_assert!(start <= end && end < Self::WIDTH);

                let length = u32::from(end - start + 1);
                (self >> start) & field_mask::<$ty>(length)
            }

            fn with_bits(self, bits_range: RangeInclusive<u8>, value: Self) -> Self {
                let start = *bits_range.start();
                let end = *bits_range.end();
                debug_assert!(start <= end && end < Self::WIDTH);

                let length = u32::from(end - start + 1);
                let mask = field_mask::<$ty>(length) << start;

                (self & !mask) | ((value << start) & mask)
            }
        }
    };
}

/// A value with the `length` lowest bits set.
fn field_mask<T>(length: u32) -> T
where
    T: TryFrom<u64>,
    <T as TryFrom<u64>>::Error: std::fmt::Debug,
{
    let mask = if length >= 64 { u64::MAX } else { (1 << length) - 1 };
    // Callers only ask for masks narrower than `T`.
    T::try_from(mask).unwrap()
}

impl_bits!(u16);
impl_bits!(u32);

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::Rng;

    #[test]
    fn get_bit() {
        let b = 0b10_1100_1110_u16;
        assert!(b.get_bit(1));
        assert!(!b.get_bit(0));
        assert!(b.get_bit(2));
        assert!(!b.get_bit(15));
    }

    #[test]
    fn with_bit() {
        let b = 0b110_0110_u32;
        let b = b.with_bit(0, true).with_bit(1, true);
        let b = b.with_bit(2, false).with_bit(3, false);
        assert_eq!(b, 0b110_0011);
    }

    #[test]
    #[should_panic]
    fn invalid_index() {
        let _ = 0_u16.get_bit(16);
    }

    #[test]
    fn get_bits() {
        let b = 0b10_1100_1110_u16;
        assert_eq!(b.get_bits(0..=3), 0b1110);
        assert_eq!(b.get_bits(1..=1), 0b1);
        assert_eq!(b.get_bits(4..=7), 0b1100);
        assert_eq!(b.get_bits(8..=9), 0b10);
        assert_eq!(b.get_bits(0..=15), b);
        assert_eq!(b.get_bits(12..=15), 0);
    }

    #[test]
    fn with_bits_only_touches_the_field() {
        let b = 0xFFFF_u16.with_bits(8..=12, 0);
        assert_eq!(b, 0b1110_0000_1111_1111);

        let b = 0_u16.with_bits(8..=12, 17);
        assert_eq!(b, 17 << 8);
    }

    #[test]
    fn with_bits_drops_overflowing_value() {
        let b = 0_u16.with_bits(0..=8, 0x3FF);
        assert_eq!(b, 0x1FF);
    }

    #[test]
    fn with_bits_then_get_bits() {
        let mut rng = rand::thread_rng();
        for _ in 0..256 {
            let word: u32 = rng.gen_range(0..=u32::MAX);
            let field: u32 = rng.gen_range(0..0x800);
            let updated = word.with_bits(4..=14, field);

            assert_eq!(updated.get_bits(4..=14), field);
            assert_eq!(updated.get_bits(0..=3), word.get_bits(0..=3));
            assert_eq!(updated.get_bits(15..=31), word.get_bits(15..=31));
        }
    }
}
