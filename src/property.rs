//! Line break property bitsets and the trie that maps code points to them.
//!
//! Each scalar value carries a [`PropertyBits`] bitset: usually exactly one of
//! the UAX #14 line-break classes, occasionally a class plus one of the four
//! synthesised bits (`PI`, `PF`, `EA`, `EPU`) documented on the individual
//! constants. Bit positions are assigned in the fixed order below and are
//! append-only across Unicode upgrades.

use bitflags::bitflags;

bitflags! {
    /// A bitset of UAX #14 line-break classes plus four synthesised bits.
    ///
    /// The all-zero value is the sentinel for "no data"; [`lookup_property`]
    /// resolves it to [`PropertyBits::AL`] once a valid scalar is confirmed,
    /// per LB1's default-to-`AL` rule.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
    pub struct PropertyBits: u64 {
        /// Ordinary Alphabetic and Symbol characters.
        const AL = 1 << 0;
        /// Ambiguous (Alphabetic or Ideographic).
        const AI = 1 << 1;
        /// Aksara (Brahmic cluster base).
        const AK = 1 << 2;
        /// Aksara prefix.
        const AP = 1 << 3;
        /// Aksara standalone.
        const AS = 1 << 4;
        /// Break Opportunity Before and After.
        const B2 = 1 << 5;
        /// Break After.
        const BA = 1 << 6;
        /// Break Before.
        const BB = 1 << 7;
        /// Mandatory Break.
        const BK = 1 << 8;
        /// Contingent Break Opportunity.
        const CB = 1 << 9;
        /// Conditional Japanese Starter.
        const CJ = 1 << 10;
        /// Close Punctuation.
        const CL = 1 << 11;
        /// Combining Mark.
        const CM = 1 << 12;
        /// Close Parenthesis.
        const CP = 1 << 13;
        /// Carriage Return.
        const CR = 1 << 14;
        /// Dotted circle, `U+25CC`, used by LB28a.
        const DC = 1 << 15;
        /// Emoji Base.
        const EB = 1 << 16;
        /// Emoji Modifier.
        const EM = 1 << 17;
        /// Exclamation/Interrogation.
        const EX = 1 << 18;
        /// Non-breaking ("Glue").
        const GL = 1 << 19;
        /// Hangul LV Syllable.
        const H2 = 1 << 20;
        /// Hangul LVT Syllable.
        const H3 = 1 << 21;
        /// Hebrew Letter.
        const HL = 1 << 22;
        /// Hebrew Hyphen (maqaf).
        const HH = 1 << 23;
        /// Hyphen.
        const HY = 1 << 24;
        /// Ideographic.
        const ID = 1 << 25;
        /// Inseparable.
        const IN = 1 << 26;
        /// Infix Numeric Separator.
        const IS = 1 << 27;
        /// Hangul L Jamo.
        const JL = 1 << 28;
        /// Hangul T Jamo.
        const JT = 1 << 29;
        /// Hangul V Jamo.
        const JV = 1 << 30;
        /// Line Feed.
        const LF = 1 << 31;
        /// Next Line.
        const NL = 1 << 32;
        /// Non-starter.
        const NS = 1 << 33;
        /// Numeric.
        const NU = 1 << 34;
        /// Open Punctuation.
        const OP = 1 << 35;
        /// Postfix Numeric.
        const PO = 1 << 36;
        /// Prefix Numeric.
        const PR = 1 << 37;
        /// Quotation.
        const QU = 1 << 38;
        /// Regional Indicator.
        const RI = 1 << 39;
        /// Complex Context Dependent (South East Asian).
        const SA = 1 << 40;
        /// Surrogate.
        const SG = 1 << 41;
        /// Space.
        const SP = 1 << 42;
        /// Symbols Allowing Break After.
        const SY = 1 << 43;
        /// Virama Final.
        const VF = 1 << 44;
        /// Virama Invisible.
        const VI = 1 << 45;
        /// Word Joiner.
        const WJ = 1 << 46;
        /// Unknown.
        const XX = 1 << 47;
        /// Zero Width Space.
        const ZW = 1 << 48;
        /// Zero Width Joiner.
        const ZWJ = 1 << 49;

        /// Synthesised: General_Category `Pi` intersected with `QU`.
        const PI = 1 << 50;
        /// Synthesised: General_Category `Pf` intersected with `QU`.
        const PF = 1 << 51;
        /// Synthesised: East_Asian_Width `F | W | H`.
        const EA = 1 << 52;
        /// Synthesised: Extended_Pictographic default-true on unassigned
        /// (`Cn`) code points in the two reserved pictographic ranges.
        const EPU = 1 << 53;
    }
}

/// The [Unicode version](https://www.unicode.org/versions/) the generated
/// tables conform to.
pub const UNICODE_VERSION: (u32, u32, u32) = (17, 0, 0);

include!(concat!(env!("OUT_DIR"), "/tables.rs"));

/// Returns the line-break property bitset resolved for `codepoint`.
///
/// Surrogates (`U+D800..=U+DFFF`) and code points beyond `U+10FFFF` resolve
/// to the empty bitset.
#[inline]
pub fn classify(codepoint: u32) -> PropertyBits {
    if codepoint > 0x10FFFF {
        return PropertyBits::empty();
    }
    let page = PAGE_INDICES[(codepoint >> 8) as usize];
    if page & UNIFORM_PAGE != 0 {
        PropertyBits::from_bits_retain((page & !UNIFORM_PAGE) as u64)
    } else {
        PropertyBits::from_bits_retain(BREAK_PROP_DATA[page as usize][(codepoint & 0xFF) as usize])
    }
}

/// Decodes the leading UTF-8 scalar of `s` and returns its raw trie value and
/// the number of bytes it occupies.
///
/// Returns `(bits, width)` where `width` is `0` iff `s` is empty or its
/// leading bytes cannot begin a complete, well-formed scalar within `s`
/// (truncation). For ill-formed UTF-8 resolvable to a single replacement
/// byte, returns `(PropertyBits::empty(), 1)`. The caller
/// ([`lookup_property`]) is responsible for substituting `AL` for a valid
/// scalar that maps to the empty bitset; `lookup` never does that itself, so
/// that "no data" and "replacement byte" can be told apart by callers that
/// care (see `lookup`'s doc on the distinction).
pub fn lookup(s: &[u8]) -> (PropertyBits, usize) {
    let Some(&b0) = s.first() else {
        return (PropertyBits::empty(), 0);
    };

    let width = utf8_width(b0);
    if width == 0 {
        // Illegal starter byte: resolves to a single replacement byte.
        return (PropertyBits::empty(), 1);
    }
    if s.len() < width {
        // Truncated: not enough bytes to tell if it's well-formed.
        return (PropertyBits::empty(), 0);
    }
    let scalar = match decode_scalar(&s[..width], b0, width) {
        Some(c) => c,
        None => return (PropertyBits::empty(), 1),
    };
    (classify(scalar), width)
}

/// `lookup` wrapper that applies LB1's "default to `AL`" rule.
///
/// When `lookup` reports an empty bitset for a `width > 0` slice *and* those
/// bytes decode to a valid, non-replacement scalar, the result is
/// [`PropertyBits::AL`] instead of empty, since an assigned scalar always
/// carries at least one class bit (the Data Model's invariant) — an empty
/// bitset at that point means "unassigned, not yet catalogued", which LB1
/// treats as `AL`.
#[inline]
pub fn lookup_property(s: &[u8]) -> (PropertyBits, usize) {
    let (bits, width) = lookup(s);
    if !bits.is_empty() || width == 0 || s.len() < width {
        return (bits, width);
    }
    if is_valid_utf8_prefix(&s[..width]) {
        (PropertyBits::AL, width)
    } else {
        (bits, width)
    }
}

/// Number of bytes a UTF-8 sequence starting with `b0` ought to occupy, or
/// `0` if `b0` can never start a well-formed scalar.
#[inline]
fn utf8_width(b0: u8) -> usize {
    match b0 {
        0x00..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 0,
    }
}

/// Decodes a scalar from exactly `width` bytes, checking continuation bytes
/// and excluding surrogates/overlong encodings.
fn decode_scalar(bytes: &[u8], b0: u8, width: usize) -> Option<u32> {
    for &b in &bytes[1..width] {
        if b & 0xC0 != 0x80 {
            return None;
        }
    }
    let scalar = match width {
        1 => b0 as u32,
        2 => ((b0 as u32 & 0x1F) << 6) | (bytes[1] as u32 & 0x3F),
        3 => {
            ((b0 as u32 & 0x0F) << 12)
                | ((bytes[1] as u32 & 0x3F) << 6)
                | (bytes[2] as u32 & 0x3F)
        }
        4 => {
            ((b0 as u32 & 0x07) << 18)
                | ((bytes[1] as u32 & 0x3F) << 12)
                | ((bytes[2] as u32 & 0x3F) << 6)
                | (bytes[3] as u32 & 0x3F)
        }
        _ => unreachable!(),
    };
    if !(0..=0x10FFFF).contains(&scalar) || (0xD800..=0xDFFF).contains(&scalar) {
        return None;
    }
    // Reject overlong encodings.
    let min = match width {
        1 => 0,
        2 => 0x80,
        3 => 0x800,
        4 => 0x10000,
        _ => unreachable!(),
    };
    if scalar < min {
        return None;
    }
    Some(scalar)
}

fn is_valid_utf8_prefix(bytes: &[u8]) -> bool {
    let Some(&b0) = bytes.first() else {
        return false;
    };
    let width = utf8_width(b0);
    width != 0 && bytes.len() == width && decode_scalar(bytes, b0, width).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_ascii_letter_is_al() {
        assert_eq!(classify('A' as u32), PropertyBits::AL);
    }

    #[test]
    fn classify_surrogate_is_empty() {
        assert_eq!(classify(0xDB80), PropertyBits::empty());
    }

    #[test]
    fn lookup_truncated_two_byte_sequence() {
        assert_eq!(lookup(&[0xC3]), (PropertyBits::empty(), 0));
    }

    #[test]
    fn lookup_truncated_three_byte_sequence() {
        assert_eq!(lookup(&[0xE2, 0x82]), (PropertyBits::empty(), 0));
    }

    #[test]
    fn lookup_invalid_continuation_byte() {
        assert_eq!(lookup(&[0xE2, 0x28, 0xA1]), (PropertyBits::empty(), 1));
    }

    #[test]
    fn lookup_illegal_starter_byte() {
        assert_eq!(lookup(&[0x80]), (PropertyBits::empty(), 1));
    }

    #[test]
    fn lookup_property_string_and_bytes_parity() {
        for s in ["A", "\n", "\u{4e2d}", "\u{200d}", "\u{0378}"] {
            let from_str = lookup_property(s.as_bytes());
            let from_bytes = lookup_property(s.as_bytes());
            assert_eq!(from_str, from_bytes);
        }
    }

    #[test]
    fn lookup_empty_input() {
        assert_eq!(lookup(&[]), (PropertyBits::empty(), 0));
    }
}
