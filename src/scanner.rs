//! The single-pass break scanner: `next_break` and its rule ladder
//! (LB1 through LB31).

use crate::property::{lookup, lookup_property, PropertyBits as P};

/// Kind of boundary reported by [`next_break`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum BreakKind {
    /// A layout engine may end a line here, but need not.
    Opportunity,
    /// A layout engine must end a line here.
    Mandatory,
}

#[inline]
fn classify_current(bits: P) -> P {
    if bits.is_empty() {
        P::AL
    } else {
        bits
    }
}

/// Returns the byte offset of the next line-break boundary in `s`, and
/// whether it is mandatory or merely an opportunity.
///
/// On empty input returns `(0, Mandatory)`. Otherwise `advance` is strictly
/// positive and at most `s.len()`; callers iterate by re-invoking on
/// `s[advance..]` until the slice is empty (see [`crate::split`] for a
/// buffered-reader-friendly wrapper around this contract).
pub fn next_break(s: &[u8]) -> (usize, BreakKind) {
    use BreakKind::{Mandatory, Opportunity};

    if s.is_empty() {
        return (0, Mandatory);
    }

    let mut pos;
    let mut last_ex_sp = P::empty();
    let mut before_last_ex_sp = P::empty();
    let mut last_ex_cmzwj = P::empty();
    let mut last_ex_cmzwj_sp = P::empty();
    let mut last_ex_syis = P::empty();
    let mut before_last_ex_syis = P::empty();
    let mut regional_indicator_count: u32 = 0;

    // LB2: never break at the start of text.
    let (current_bits, w) = lookup(s);
    if w == 0 {
        return (s.len(), Mandatory);
    }
    let mut current = classify_current(current_bits);
    pos = w;

    loop {
        if pos == s.len() {
            // LB3: always break at the end of text.
            return (pos, Mandatory);
        }

        let last = current;
        let prev_ex_cmzwj = last_ex_cmzwj;
        if !last.intersects(P::SP) {
            before_last_ex_sp = prev_ex_cmzwj;
            last_ex_sp = last;
        }
        if !last.intersects(P::CM | P::ZWJ) {
            last_ex_cmzwj = last;
            if last.intersects(P::RI) {
                regional_indicator_count += 1;
            } else {
                regional_indicator_count = 0;
            }
        }
        if !last.intersects(P::SP | P::CM | P::ZWJ) {
            last_ex_cmzwj_sp = last;
        }
        if !last_ex_cmzwj.intersects(P::SY | P::IS) {
            before_last_ex_syis = last_ex_syis;
            last_ex_syis = last_ex_cmzwj;
        }

        let (next_bits, w) = lookup(&s[pos..]);
        if w == 0 {
            return (s.len(), Mandatory);
        }
        current = classify_current(next_bits);

        // LB4: break after BK.
        if last.intersects(P::BK) {
            return (pos, Mandatory);
        }

        // LB5: CR x LF; break after CR, LF, NL.
        if last.intersects(P::CR) && current.intersects(P::LF) {
            pos += w;
            continue;
        }
        if last.intersects(P::CR | P::LF | P::NL) {
            return (pos, Mandatory);
        }

        // LB6: no break before BK, CR, LF, NL.
        if current.intersects(P::BK | P::CR | P::LF | P::NL) {
            pos += w;
            continue;
        }

        // LB7: no break before SP or ZW.
        if current.intersects(P::SP | P::ZW) {
            pos += w;
            continue;
        }

        // LB8: break after ZW SP*.
        if last_ex_sp.intersects(P::ZW) {
            return (pos, Opportunity);
        }

        // LB8a: no break after ZWJ.
        if last.intersects(P::ZWJ) {
            pos += w;
            continue;
        }

        // LB9/LB10: absorb CM/ZWJ into the preceding base character, or
        // resolve a leading CM/ZWJ to AL.
        if current.intersects(P::CM | P::ZWJ) {
            if !last_ex_cmzwj.is_empty()
                && !last_ex_cmzwj.intersects(P::BK | P::CR | P::LF | P::NL | P::SP | P::ZW)
            {
                pos += w;
                continue;
            }
            current = P::AL;
        }

        // LB11: no break before or after WJ.
        if (current | last_ex_cmzwj).intersects(P::WJ) {
            pos += w;
            continue;
        }

        // LB12: no break after GL.
        if last_ex_cmzwj.intersects(P::GL) {
            pos += w;
            continue;
        }

        // LB12a: no break before GL unless preceded by SP, BA, HY, HH.
        if current.intersects(P::GL) && !last_ex_cmzwj.intersects(P::SP | P::BA | P::HY | P::HH) {
            pos += w;
            continue;
        }

        // LB13: no break before CL, CP, EX, SY.
        if current.intersects(P::CL | P::CP | P::EX | P::SY) {
            pos += w;
            continue;
        }

        // LB14: no break after OP SP*.
        if last_ex_cmzwj_sp.intersects(P::OP) {
            pos += w;
            continue;
        }

        // LB15a: (sot|BK|CR|LF|NL|OP|QU|GL|SP|ZW) [Pi&QU] SP* x
        if last_ex_cmzwj_sp.intersects(P::PI)
            && (before_last_ex_sp.is_empty()
                || before_last_ex_sp
                    .intersects(P::BK | P::CR | P::LF | P::NL | P::OP | P::QU | P::GL | P::SP | P::ZW))
        {
            pos += w;
            continue;
        }

        // LB15b: x [Pf&QU] (SP|GL|WJ|CL|QU|CP|EX|IS|SY|BK|CR|LF|NL|ZW|eot)
        if current.intersects(P::PF) && current.intersects(P::QU) {
            let (next, _) = if pos + w < s.len() {
                lookup_property(&s[pos + w..])
            } else {
                (P::empty(), 0)
            };
            if next.is_empty()
                || next.intersects(
                    P::SP | P::GL | P::WJ | P::CL | P::QU | P::CP | P::EX | P::IS | P::SY
                        | P::BK | P::CR | P::LF | P::NL | P::ZW,
                )
            {
                pos += w;
                continue;
            }
        }

        // LB15c: SP / IS NU
        if last.intersects(P::SP) && current.intersects(P::IS) {
            let (next, _) = if pos + w < s.len() {
                lookup_property(&s[pos + w..])
            } else {
                (P::empty(), 0)
            };
            if next.intersects(P::NU) {
                return (pos, Opportunity);
            }
        }

        // LB15d: no break before IS.
        if current.intersects(P::IS) {
            pos += w;
            continue;
        }

        // LB16: (CL|CP) SP* x NS.
        if last_ex_cmzwj_sp.intersects(P::CL | P::CP) && current.intersects(P::NS) {
            pos += w;
            continue;
        }

        // LB17: B2 SP* x B2.
        if last_ex_cmzwj_sp.intersects(P::B2) && current.intersects(P::B2) {
            pos += w;
            continue;
        }

        // LB18: break after SP.
        if last.intersects(P::SP) {
            return (pos, Opportunity);
        }

        // LB19: no break before/after QU, subject to the Pi/Pf carve-outs.
        if (current.intersects(P::QU) && !current.intersects(P::PI))
            || (last_ex_cmzwj.intersects(P::QU) && !last_ex_cmzwj.intersects(P::PF))
        {
            pos += w;
            continue;
        }

        // LB19a: East-Asian-conditional QU rules.
        if current.intersects(P::QU) || last.intersects(P::QU) {
            let (next, _) = if pos + w < s.len() {
                lookup_property(&s[pos + w..])
            } else {
                (P::empty(), 0)
            };

            let no_break_before_qu =
                current.intersects(P::QU) && (!last.intersects(P::EA) || !next.intersects(P::EA));
            let no_break_after_qu = last.intersects(P::QU)
                && (!current.intersects(P::EA)
                    || prev_ex_cmzwj.is_empty()
                    || !prev_ex_cmzwj.intersects(P::EA));
            if no_break_before_qu || no_break_after_qu {
                pos += w;
                continue;
            }
        }

        // LB20: break before and after CB.
        if (current | last_ex_cmzwj).intersects(P::CB) {
            return (pos, Opportunity);
        }

        // LB20a: (sot|BK|CR|LF|NL|SP|ZW|CB|GL) (HY|HH) x (AL|HL)
        if last.intersects(P::HY | P::HH)
            && current.intersects(P::AL | P::HL)
            && (prev_ex_cmzwj.is_empty()
                || prev_ex_cmzwj
                    .intersects(P::BK | P::CR | P::LF | P::NL | P::SP | P::ZW | P::CB | P::GL))
        {
            pos += w;
            continue;
        }

        // LB21: x BA, x HH, x HY, x NS, BB x.
        if current.intersects(P::BA | P::HH | P::HY | P::NS) || last_ex_cmzwj.intersects(P::BB) {
            pos += w;
            continue;
        }

        // LB21a: HL (HY|HH) x [^HL]
        if prev_ex_cmzwj.intersects(P::HL)
            && last.intersects(P::HY | P::HH)
            && !current.intersects(P::HL)
        {
            pos += w;
            continue;
        }

        // LB21b: SY x HL.
        if last_ex_cmzwj.intersects(P::SY) && current.intersects(P::HL) {
            pos += w;
            continue;
        }

        // LB22: x IN.
        if current.intersects(P::IN) {
            pos += w;
            continue;
        }

        // LB23: (AL|HL) x NU, NU x (AL|HL).
        if (last_ex_cmzwj.intersects(P::AL | P::HL) && current.intersects(P::NU))
            || (last_ex_cmzwj.intersects(P::NU) && current.intersects(P::AL | P::HL))
        {
            pos += w;
            continue;
        }

        // LB23a: PR x (ID|EB|EM), (ID|EB|EM) x PO.
        if (last_ex_cmzwj.intersects(P::PR) && current.intersects(P::ID | P::EB | P::EM))
            || (last_ex_cmzwj.intersects(P::ID | P::EB | P::EM) && current.intersects(P::PO))
        {
            pos += w;
            continue;
        }

        // LB24: (PR|PO) x (AL|HL), (AL|HL) x (PR|PO).
        if (last_ex_cmzwj.intersects(P::PR | P::PO) && current.intersects(P::AL | P::HL))
            || (last_ex_cmzwj.intersects(P::AL | P::HL) && current.intersects(P::PR | P::PO))
        {
            pos += w;
            continue;
        }

        // LB25: numeric context.
        if last_ex_cmzwj.intersects(P::NU) && current.intersects(P::SY | P::IS | P::CL | P::CP) {
            pos += w;
            continue;
        }
        if current.intersects(P::PO | P::PR)
            && (last_ex_cmzwj.intersects(P::NU)
                || (last_ex_cmzwj.intersects(P::SY | P::IS) && last_ex_syis.intersects(P::NU)))
        {
            pos += w;
            continue;
        }
        if last_ex_cmzwj.intersects(P::CL | P::CP)
            && current.intersects(P::PO | P::PR)
            && before_last_ex_syis.intersects(P::NU)
        {
            pos += w;
            continue;
        }
        if last_ex_cmzwj.intersects(P::PO | P::PR) && current.intersects(P::OP) {
            let (next, nw) = if pos + w < s.len() {
                lookup_property(&s[pos + w..])
            } else {
                (P::empty(), 0)
            };
            let (next2, _) = if nw > 0 && pos + w + nw < s.len() {
                lookup_property(&s[pos + w + nw..])
            } else {
                (P::empty(), 0)
            };
            if next.intersects(P::NU) || (next.intersects(P::IS) && next2.intersects(P::NU)) {
                pos += w;
                continue;
            }
        }
        if current.intersects(P::NU)
            && (last_ex_cmzwj.intersects(P::PO | P::PR | P::HY | P::IS | P::NU)
                || (last_ex_cmzwj.intersects(P::SY | P::IS | P::CL | P::CP)
                    && last_ex_syis.intersects(P::NU)))
        {
            pos += w;
            continue;
        }

        // LB26: Korean syllable blocks.
        if (last_ex_cmzwj.intersects(P::JL) && current.intersects(P::JL | P::JV | P::H2 | P::H3))
            || (last_ex_cmzwj.intersects(P::JV | P::H2) && current.intersects(P::JV | P::JT))
            || (last_ex_cmzwj.intersects(P::JT | P::H3) && current.intersects(P::JT))
        {
            pos += w;
            continue;
        }

        // LB27: Korean syllable blocks with PR/PO.
        if (last_ex_cmzwj.intersects(P::JL | P::JV | P::JT | P::H2 | P::H3)
            && current.intersects(P::PO))
            || (last_ex_cmzwj.intersects(P::PR)
                && current.intersects(P::JL | P::JV | P::JT | P::H2 | P::H3))
        {
            pos += w;
            continue;
        }

        // LB28: (AL|HL) x (AL|HL).
        if last_ex_cmzwj.intersects(P::AL | P::HL) && current.intersects(P::AL | P::HL) {
            pos += w;
            continue;
        }

        // LB28a: Brahmic orthographic syllable clusters.
        if (last_ex_cmzwj.intersects(P::AP) && current.intersects(P::AK | P::AS | P::DC))
            || (last_ex_cmzwj.intersects(P::AK | P::AS | P::DC) && current.intersects(P::VF | P::VI))
            || (last_ex_cmzwj.intersects(P::VI)
                && current.intersects(P::AK | P::AS | P::DC)
                && prev_ex_cmzwj.intersects(P::AK | P::AS | P::DC))
        {
            pos += w;
            continue;
        }
        if last_ex_cmzwj.intersects(P::AK | P::AS | P::DC) && current.intersects(P::AK | P::AS | P::DC)
        {
            let (next, _) = if pos + w < s.len() {
                lookup_property(&s[pos + w..])
            } else {
                (P::empty(), 0)
            };
            if next.intersects(P::VF) {
                pos += w;
                continue;
            }
        }

        // LB29: IS x (AL|HL).
        if last_ex_cmzwj.intersects(P::IS) && current.intersects(P::AL | P::HL) {
            pos += w;
            continue;
        }

        // LB30: (AL|HL|NU) x [OP\EA], [CP\EA] x (AL|HL|NU).
        if (last_ex_cmzwj.intersects(P::AL | P::HL | P::NU)
            && current.intersects(P::OP)
            && !current.intersects(P::EA))
            || (last_ex_cmzwj.intersects(P::CP)
                && !last_ex_cmzwj.intersects(P::EA)
                && current.intersects(P::AL | P::HL | P::NU))
        {
            pos += w;
            continue;
        }

        // LB30a: break between RI pairs only on an even boundary.
        if last_ex_cmzwj.intersects(P::RI) && current.intersects(P::RI) {
            let odd = regional_indicator_count % 2 == 1;
            if odd {
                pos += w;
                continue;
            }
        }

        // LB30b: EB x EM; [ExtPict&Cn] x EM.
        if (last_ex_cmzwj.intersects(P::EB) || last_ex_cmzwj.intersects(P::EPU))
            && current.intersects(P::EM)
        {
            pos += w;
            continue;
        }

        // LB31: break everywhere else.
        return (pos, Opportunity);
    }
}

/// Convenience wrapper over [`next_break`] for `&str` input; shares the
/// same byte-level code path, so results are identical to calling
/// `next_break(s.as_bytes())` (spec parity invariant).
#[inline]
pub fn next_break_str(s: &str) -> (usize, BreakKind) {
    next_break(s.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use BreakKind::{Mandatory, Opportunity};

    fn collect(s: &str) -> Vec<(String, BreakKind)> {
        let mut out = Vec::new();
        let mut remaining = s;
        while !remaining.is_empty() {
            let (advance, kind) = next_break_str(remaining);
            assert!(advance > 0 && advance <= remaining.len());
            out.push((remaining[..advance].to_string(), kind));
            remaining = &remaining[advance..];
        }
        out
    }

    #[test]
    fn empty_input_is_mandatory_at_zero() {
        assert_eq!(next_break(b""), (0, Mandatory));
    }

    #[test]
    fn single_scalar_is_mandatory_at_its_width() {
        assert_eq!(next_break("中".as_bytes()), (3, Mandatory));
    }

    #[test]
    fn crlf_joins_and_eot_is_mandatory() {
        let toks = collect("A\r\nB");
        assert_eq!(
            toks,
            vec![("A\r\n".to_string(), Mandatory), ("B".to_string(), Mandatory)]
        );
    }

    #[test]
    fn combining_mark_absorbed_keeps_word_together() {
        // LB9 absorbs the combining mark into "A"; LB28 (AL x AL) then
        // still suppresses a break before "B", so the whole run is one
        // mandatory-at-eot token.
        let toks = collect("A\u{0301}B");
        assert_eq!(toks, vec![("A\u{0301}B".to_string(), Mandatory)]);
    }

    #[test]
    fn leading_combining_mark_after_space_is_its_own_opportunity() {
        // The space breaks LB18; the combining mark is now first in its
        // slice (no base to absorb into), so LB10 resolves it to AL and
        // LB31 offers an opportunity before "B".
        let toks = collect(" \u{0301}B");
        assert_eq!(
            toks,
            vec![
                (" ".to_string(), Opportunity),
                ("\u{0301}".to_string(), Opportunity),
                ("B".to_string(), Mandatory),
            ]
        );
    }

    #[test]
    fn zwj_suppresses_unconditionally() {
        let toks = collect("A\u{200D}B");
        assert_eq!(toks, vec![("A\u{200D}B".to_string(), Mandatory)]);
    }

    #[test]
    fn regional_indicators_pair_before_breaking() {
        let toks = collect("\u{1F1FA}\u{1F1F8}\u{1F1E8}\u{1F1E6}");
        assert_eq!(
            toks,
            vec![
                ("\u{1F1FA}\u{1F1F8}".to_string(), Opportunity),
                ("\u{1F1E8}\u{1F1E6}".to_string(), Mandatory),
            ]
        );
    }

    #[test]
    fn numeric_cluster_holds_together() {
        let toks = collect("1,2 3/4");
        assert_eq!(
            toks,
            vec![("1,2 ".to_string(), Opportunity), ("3/4".to_string(), Mandatory)]
        );
    }

    #[test]
    fn invalid_utf8_byte_recovers_as_al() {
        let bytes: &[u8] = &[0x41, 0x80, 0x42]; // 'A', illegal starter, 'B'
        let (advance, kind) = next_break(bytes);
        assert_eq!((advance, kind), (3, Mandatory));
    }

    #[test]
    fn truncated_utf8_is_mandatory_at_buffer_end() {
        let bytes: &[u8] = &[0x41, 0xE2, 0x82]; // 'A' then a truncated 3-byte lead
        let (advance, kind) = next_break(bytes);
        assert_eq!((advance, kind), (3, Mandatory));
    }

    // LB1: AI/SG/XX/SA/CJ are resolved into other classes before the rule
    // ladder runs at all (baked into the table by build.rs); these cases
    // would instead fall through every rule to LB31 (break on both sides)
    // if that resolution were missing.

    #[test]
    fn lb1_resolves_unassigned_xx_to_al() {
        // U+0378 is unassigned (default XX); LB1 maps it to AL, so LB28
        // (AL x AL) holds the run together.
        let toks = collect("A\u{0378}");
        assert_eq!(toks, vec![("A\u{0378}".to_string(), Mandatory)]);
    }

    #[test]
    fn lb1_resolves_ai_to_al() {
        let toks = collect("A\u{00A6}");
        assert_eq!(toks, vec![("A\u{00A6}".to_string(), Mandatory)]);
    }

    #[test]
    fn lb1_resolves_cj_to_ns() {
        // U+3041 is CJ; LB1 maps it to NS, so LB21 (x NS) holds, not LB31.
        let toks = collect("A\u{3041}");
        assert_eq!(toks, vec![("A\u{3041}".to_string(), Mandatory)]);
    }

    #[test]
    fn lb1_resolves_non_mark_sa_to_al() {
        let toks = collect("A\u{0E01}");
        assert_eq!(toks, vec![("A\u{0E01}".to_string(), Mandatory)]);
    }

    #[test]
    fn lb1_resolves_combining_sa_to_cm() {
        // U+0E31 is SA and General_Category Mn; LB1 maps it to CM, which
        // LB9 then absorbs into the preceding ID base.
        let toks = collect("\u{1F000}\u{0E31}");
        assert_eq!(toks, vec![("\u{1F000}\u{0E31}".to_string(), Mandatory)]);
    }
}
