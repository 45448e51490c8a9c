//! Fixed-size entry encoding
//!
//! An entry is the caller's record type. It always encodes to exactly
//! [`FixedEntry::SIZE`] bytes, which is what makes O(1) slot addressing
//! possible. Encoding is explicit and little-endian; the in-memory layout
//! of the type is irrelevant.

/// A plain-data record with a fixed encoded size.
///
/// Implementations must write exactly `SIZE` bytes and must accept any
/// `SIZE`-byte buffer on decode. The store hands out slices of exactly that
/// length.
///
/// ```
/// use fixlog::FixedEntry;
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Sample {
///     sensor: u16,
///     reading: f32,
/// }
///
/// impl FixedEntry for Sample {
///     const SIZE: usize = 6;
///
///     fn encode_into(&self, buf: &mut [u8]) {
///         buf[0..2].copy_from_slice(&self.sensor.to_le_bytes());
///         buf[2..6].copy_from_slice(&self.reading.to_le_bytes());
///     }
///
///     fn decode_from(buf: &[u8]) -> Self {
///         Self {
///             sensor: u16::from_le_bytes([buf[0], buf[1]]),
///             reading: f32::from_le_bytes([buf[2], buf[3], buf[4], buf[5]]),
///         }
///     }
/// }
/// ```
pub trait FixedEntry: Sized {
    /// Encoded size in bytes.
    const SIZE: usize;

    /// Writes the entry into `buf`, which is exactly `SIZE` bytes long.
    fn encode_into(&self, buf: &mut [u8]);

    /// Reads an entry back from `buf`, which is exactly `SIZE` bytes long.
    fn decode_from(buf: &[u8]) -> Self;

    /// Encodes the entry into a freshly allocated buffer.
    fn to_bytes(&self) -> Vec<u8> {
        let mut buf = vec![0u8; Self::SIZE];
        self.encode_into(&mut buf);
        buf
    }
}

macro_rules! impl_fixed_entry_for_int {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FixedEntry for $ty {
                const SIZE: usize = std::mem::size_of::<$ty>();

                fn encode_into(&self, buf: &mut [u8]) {
                    buf.copy_from_slice(&self.to_le_bytes());
                }

                fn decode_from(buf: &[u8]) -> Self {
                    let mut raw = [0u8; std::mem::size_of::<$ty>()];
                    raw.copy_from_slice(buf);
                    <$ty>::from_le_bytes(raw)
                }
            }
        )*
    };
}

impl_fixed_entry_for_int!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);

impl<const N: usize> FixedEntry for [u8; N] {
    const SIZE: usize = N;

    fn encode_into(&self, buf: &mut [u8]) {
        buf.copy_from_slice(self);
    }

    fn decode_from(buf: &[u8]) -> Self {
        let mut raw = [0u8; N];
        raw.copy_from_slice(buf);
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_sizes() {
        assert_eq!(<u8 as FixedEntry>::SIZE, 1);
        assert_eq!(<u32 as FixedEntry>::SIZE, 4);
        assert_eq!(<i64 as FixedEntry>::SIZE, 8);
        assert_eq!(<f32 as FixedEntry>::SIZE, 4);
        assert_eq!(<[u8; 13] as FixedEntry>::SIZE, 13);
    }

    #[test]
    fn test_integers_encode_little_endian() {
        assert_eq!(0x0102_0304u32.to_bytes(), vec![4, 3, 2, 1]);
        assert_eq!((-2i16).to_bytes(), vec![0xFE, 0xFF]);
    }

    #[test]
    fn test_float_bits_survive() {
        let value = f64::from_bits(0x7FF8_0000_0000_0001);
        let decoded = f64::decode_from(&value.to_bytes());
        assert_eq!(decoded.to_bits(), value.to_bits());
    }

    #[test]
    fn test_byte_array_is_verbatim() {
        let value = *b"abcdef";
        assert_eq!(value.to_bytes(), b"abcdef".to_vec());
        assert_eq!(<[u8; 6]>::decode_from(b"abcdef"), value);
    }
}
