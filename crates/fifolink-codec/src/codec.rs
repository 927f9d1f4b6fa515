use std::fmt;

use bytes::{Buf, BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};

use crate::error::{CodecError, Result};

/// One sample exchanged with the device.
///
/// Wider than any element width so that out-of-range input can be
/// represented and rejected instead of wrapping at the type boundary.
pub type Element = u64;

/// Bytes per element on the wire, always 1-4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Width(u8);

impl Width {
    pub const ONE: Width = Width(1);
    pub const TWO: Width = Width(2);
    pub const THREE: Width = Width(3);
    pub const FOUR: Width = Width(4);

    /// Validate a byte count.
    pub const fn new(bytes: u8) -> Result<Self> {
        match bytes {
            1..=4 => Ok(Self(bytes)),
            other => Err(CodecError::InvalidWidth(other)),
        }
    }

    /// Bytes per element.
    pub const fn bytes(self) -> usize {
        self.0 as usize
    }

    /// Largest value representable in this width: `2^(8*width) - 1`.
    pub const fn max_value(self) -> Element {
        (1u64 << (8 * self.0 as u32)) - 1
    }

    /// Whether `value` fits in this width.
    pub const fn fits(self, value: Element) -> bool {
        value <= self.max_value()
    }
}

impl TryFrom<u8> for Width {
    type Error = CodecError;

    fn try_from(bytes: u8) -> Result<Self> {
        Self::new(bytes)
    }
}

impl From<Width> for u8 {
    fn from(width: Width) -> u8 {
        width.0
    }
}

impl fmt::Display for Width {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Byte order inside one element. The whole stream uses a single order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endianness {
    /// Most-significant byte first.
    #[default]
    Big,
    /// Least-significant byte first.
    Little,
}

impl fmt::Display for Endianness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endianness::Big => f.write_str("big"),
            Endianness::Little => f.write_str("little"),
        }
    }
}

/// Encode a sequence of elements into raw bytes.
///
/// Wire format, `width` bytes per element in sequence order:
/// ```text
/// width=2, big:    [e0.hi e0.lo][e1.hi e1.lo]...
/// width=2, little: [e0.lo e0.hi][e1.lo e1.hi]...
/// ```
///
/// Fails on the first element that does not fit in `width`; nothing is
/// returned for the elements before it.
pub fn encode(elements: &[Element], width: Width, endianness: Endianness) -> Result<Bytes> {
    let mut dst = BytesMut::new();
    encode_into(elements, width, endianness, &mut dst)?;
    Ok(dst.freeze())
}

/// Encode into an existing buffer.
///
/// `dst` is left untouched when an element is out of range.
pub fn encode_into(
    elements: &[Element],
    width: Width,
    endianness: Endianness,
    dst: &mut BytesMut,
) -> Result<()> {
    if let Some(&value) = elements.iter().find(|&&value| !width.fits(value)) {
        return Err(CodecError::ValueOutOfRange { value, width });
    }

    let nbytes = width.bytes();
    dst.reserve(elements.len() * nbytes);
    for &value in elements {
        match endianness {
            Endianness::Big => dst.put_uint(value, nbytes),
            Endianness::Little => dst.put_uint_le(value, nbytes),
        }
    }
    Ok(())
}

/// Decode raw bytes into a sequence of elements.
///
/// A trailing partial element is an error, never dropped or zero-padded.
pub fn decode(bytes: &[u8], width: Width, endianness: Endianness) -> Result<Vec<Element>> {
    let mut out = Vec::new();
    decode_into(bytes, width, endianness, &mut out)?;
    Ok(out)
}

/// Decode and append to `out`. `out` is left untouched on error.
pub fn decode_into(
    bytes: &[u8],
    width: Width,
    endianness: Endianness,
    out: &mut Vec<Element>,
) -> Result<()> {
    let nbytes = width.bytes();
    if bytes.len() % nbytes != 0 {
        return Err(CodecError::TruncatedStream {
            length: bytes.len(),
            width,
        });
    }

    out.reserve(bytes.len() / nbytes);
    let mut src = bytes;
    while src.has_remaining() {
        let value = match endianness {
            Endianness::Big => src.get_uint(nbytes),
            Endianness::Little => src.get_uint_le(nbytes),
        };
        out.push(value);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const ALL_WIDTHS: [Width; 4] = [Width::ONE, Width::TWO, Width::THREE, Width::FOUR];

    #[test]
    fn width_accepts_one_through_four() {
        for bytes in 1..=4u8 {
            assert_eq!(Width::new(bytes).unwrap().bytes(), bytes as usize);
        }
        assert_eq!(Width::new(0), Err(CodecError::InvalidWidth(0)));
        assert_eq!(Width::new(5), Err(CodecError::InvalidWidth(5)));
    }

    #[test]
    fn width_max_values() {
        assert_eq!(Width::ONE.max_value(), 0xFF);
        assert_eq!(Width::TWO.max_value(), 0xFFFF);
        assert_eq!(Width::THREE.max_value(), 0xFF_FFFF);
        assert_eq!(Width::FOUR.max_value(), 0xFFFF_FFFF);
    }

    #[test]
    fn width_deserializes_with_validation() {
        let width: Width = serde_json::from_str("3").unwrap();
        assert_eq!(width, Width::THREE);
        assert!(serde_json::from_str::<Width>("7").is_err());
    }

    #[test]
    fn encode_big_and_little_endian() {
        assert_eq!(
            encode(&[0x0102], Width::TWO, Endianness::Big).unwrap().as_ref(),
            &[0x01, 0x02]
        );
        assert_eq!(
            encode(&[0x0102], Width::TWO, Endianness::Little)
                .unwrap()
                .as_ref(),
            &[0x02, 0x01]
        );
    }

    #[test]
    fn encode_three_byte_width() {
        let bytes = encode(&[0x0A0B0C, 0x000001], Width::THREE, Endianness::Big).unwrap();
        assert_eq!(bytes.as_ref(), &[0x0A, 0x0B, 0x0C, 0x00, 0x00, 0x01]);

        let bytes = encode(&[0x0A0B0C], Width::THREE, Endianness::Little).unwrap();
        assert_eq!(bytes.as_ref(), &[0x0C, 0x0B, 0x0A]);
    }

    #[test]
    fn encode_output_length_is_count_times_width() {
        for width in ALL_WIDTHS {
            let bytes = encode(&[0, 1, 2, 3, 4], width, Endianness::Big).unwrap();
            assert_eq!(bytes.len(), 5 * width.bytes());
        }
    }

    #[test]
    fn encode_accepts_max_and_rejects_one_past() {
        for width in ALL_WIDTHS {
            let max = width.max_value();
            assert!(encode(&[max], width, Endianness::Big).is_ok());
            assert_eq!(
                encode(&[max + 1], width, Endianness::Little),
                Err(CodecError::ValueOutOfRange {
                    value: max + 1,
                    width
                })
            );
        }
    }

    #[test]
    fn encode_failure_leaves_buffer_untouched() {
        let mut dst = BytesMut::from(&b"keep"[..]);
        let err = encode_into(&[1, 2, 256, 3], Width::ONE, Endianness::Big, &mut dst).unwrap_err();
        assert_eq!(
            err,
            CodecError::ValueOutOfRange {
                value: 256,
                width: Width::ONE
            }
        );
        assert_eq!(dst.as_ref(), b"keep");
    }

    #[test]
    fn encode_does_not_mask() {
        // 0x1FF & 0xFF would be 0xFF; strict validation refuses instead.
        assert!(encode(&[0x1FF], Width::ONE, Endianness::Big).is_err());
    }

    #[test]
    fn decode_two_byte_groups() {
        assert_eq!(
            decode(&[0x01, 0x02], Width::TWO, Endianness::Big).unwrap(),
            vec![258]
        );
        assert_eq!(
            decode(&[0x01, 0x02], Width::TWO, Endianness::Little).unwrap(),
            vec![513]
        );
    }

    #[test]
    fn decode_rejects_partial_group() {
        assert_eq!(
            decode(&[0x01, 0x02, 0x03], Width::TWO, Endianness::Big),
            Err(CodecError::TruncatedStream {
                length: 3,
                width: Width::TWO
            })
        );
    }

    #[test]
    fn decode_empty_is_empty() {
        for width in ALL_WIDTHS {
            assert!(decode(&[], width, Endianness::Big).unwrap().is_empty());
        }
    }

    #[test]
    fn decode_into_appends() {
        let mut out = vec![7];
        decode_into(&[0, 0, 0, 9], Width::FOUR, Endianness::Big, &mut out).unwrap();
        assert_eq!(out, vec![7, 9]);

        let err = decode_into(&[1, 2], Width::FOUR, Endianness::Big, &mut out).unwrap_err();
        assert!(matches!(err, CodecError::TruncatedStream { length: 2, .. }));
        assert_eq!(out, vec![7, 9]);
    }

    fn endianness() -> impl Strategy<Value = Endianness> {
        prop_oneof![Just(Endianness::Big), Just(Endianness::Little)]
    }

    fn width_and_values() -> impl Strategy<Value = (Width, Vec<Element>)> {
        (1u8..=4).prop_flat_map(|bytes| {
            let width = Width(bytes);
            (
                Just(width),
                prop::collection::vec(0..=width.max_value(), 0..64),
            )
        })
    }

    proptest! {
        #[test]
        fn decode_inverts_encode((width, values) in width_and_values(), order in endianness()) {
            let bytes = encode(&values, width, order).expect("values are in range");
            prop_assert_eq!(bytes.len(), values.len() * width.bytes());
            let decoded = decode(&bytes, width, order).expect("stream is aligned");
            prop_assert_eq!(decoded, values);
        }

        #[test]
        fn misaligned_streams_are_rejected(
            bytes in prop::collection::vec(any::<u8>(), 1..64),
            width in 2u8..=4,
            order in endianness(),
        ) {
            let width = Width(width);
            let result = decode(&bytes, width, order);
            if bytes.len() % width.bytes() == 0 {
                prop_assert!(result.is_ok());
            } else {
                let is_truncated = matches!(result, Err(CodecError::TruncatedStream { .. }));
                prop_assert!(is_truncated);
            }
        }
    }
}
