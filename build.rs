//! Generates the code-point-to-property-bitset trie consumed by
//! `src/property.rs`, from the frozen UCD slice under `data/`.
//!
//! Mirrors the two-level page table the original crate generated (a
//! first-level table of page indices over `codepoint >> 8`, with uniform
//! pages folded directly into the index), generalized from a single
//! `BreakClass` byte per code point to a 54-bit `PropertyBits` value.

use regex::Regex;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::io::Write;
use std::path::Path;

const PAGE_SIZE: usize = 256;
const CODESPACE: u32 = 0x11_0000;
const UNIFORM_PAGE: u64 = 1 << 63;

/// Bit position of each real UAX #14 Line_Break property value. `DC`, `PI`,
/// `PF`, `EA`, `EPU` are synthesised separately and are not looked up here.
fn class_bit(key: &str) -> Option<u64> {
    let shift = match key {
        "AL" => 0,
        "AI" => 1,
        "AK" => 2,
        "AP" => 3,
        "AS" => 4,
        "B2" => 5,
        "BA" => 6,
        "BB" => 7,
        "BK" => 8,
        "CB" => 9,
        "CJ" => 10,
        "CL" => 11,
        "CM" => 12,
        "CP" => 13,
        "CR" => 14,
        "EB" => 16,
        "EM" => 17,
        "EX" => 18,
        "GL" => 19,
        "H2" => 20,
        "H3" => 21,
        "HL" => 22,
        "HH" => 23,
        "HY" => 24,
        "ID" => 25,
        "IN" => 26,
        "IS" => 27,
        "JL" => 28,
        "JT" => 29,
        "JV" => 30,
        "LF" => 31,
        "NL" => 32,
        "NS" => 33,
        "NU" => 34,
        "OP" => 35,
        "PO" => 36,
        "PR" => 37,
        "QU" => 38,
        "RI" => 39,
        "SA" => 40,
        "SG" => 41,
        "SP" => 42,
        "SY" => 43,
        "VF" => 44,
        "VI" => 45,
        "WJ" => 46,
        "XX" => 47,
        "ZW" => 48,
        "ZWJ" => 49,
        _ => return None,
    };
    Some(1 << shift)
}

const DC_BIT: u64 = 1 << 15;
const PI_BIT: u64 = 1 << 50;
const PF_BIT: u64 = 1 << 51;
const EA_BIT: u64 = 1 << 52;
const EPU_BIT: u64 = 1 << 53;

const DOTTED_CIRCLE: u32 = 0x25CC;
const EPU_RANGES: [(u32, u32); 2] = [(0x1F000, 0x1FAFF), (0x1FC00, 0x1FFFD)];

/// Default Line_Break value for code points LineBreak.txt leaves unassigned,
/// per its preamble ("@missing" defaults).
fn default_class(codepoint: u32) -> &'static str {
    match codepoint {
        0x3400..=0x4DBF | 0x4E00..=0x9FFF | 0xF900..=0xFAFF => "ID",
        0x20000..=0x2FFFD | 0x30000..=0x3FFFD => "ID",
        0x1F000..=0x1FFFD => "ID",
        0x20A0..=0x20CF => "PR",
        _ => "XX",
    }
}

struct Record {
    lo: u32,
    hi: u32,
    tag: String,
}

fn main() -> std::io::Result<()> {
    println!("cargo:rerun-if-changed=data/LineBreak.txt");
    println!("cargo:rerun-if-changed=data/DerivedGeneralCategory.txt");
    println!("cargo:rerun-if-changed=data/EastAsianWidth.txt");

    let line_break = parse_ucd_file("data/LineBreak.txt")?;
    let general_category = parse_ucd_file("data/DerivedGeneralCategory.txt")?;
    let east_asian_width = parse_ucd_file("data/EastAsianWidth.txt")?;

    let mut bits = vec![0u64; CODESPACE as usize];

    for cp in 0..CODESPACE {
        if (0xD800..=0xDFFF).contains(&cp) {
            continue; // Surrogates are never mapped.
        }
        bits[cp as usize] = class_bit(default_class(cp)).unwrap();
    }
    for rec in &line_break {
        if let Some(bit) = class_bit(&rec.tag) {
            for cp in rec.lo..=rec.hi {
                if (0xD800..=0xDFFF).contains(&cp) || cp >= CODESPACE {
                    continue;
                }
                bits[cp as usize] = bit;
            }
        }
    }

    // LB1: resolve AI, SG, XX, SA, CJ into other classes "depending on
    // criteria outside the scope of this algorithm", baked in once here
    // rather than at scan time. AI/SG/XX always become AL; CJ becomes NS;
    // SA becomes CM for combining marks (General_Category Mn/Mc) and AL
    // otherwise.
    let al_bit = class_bit("AL").unwrap();
    let ns_bit = class_bit("NS").unwrap();
    let cm_bit = class_bit("CM").unwrap();
    let sa_bit = class_bit("SA").unwrap();
    let ai_sg_xx = class_bit("AI").unwrap() | class_bit("SG").unwrap() | class_bit("XX").unwrap();
    let cj_bit = class_bit("CJ").unwrap();
    let mn_mc_ranges: Vec<&Record> = general_category
        .iter()
        .filter(|r| r.tag == "Mn" || r.tag == "Mc")
        .collect();
    for cp in 0..CODESPACE {
        if (0xD800..=0xDFFF).contains(&cp) {
            continue;
        }
        let b = bits[cp as usize];
        if b == cj_bit {
            bits[cp as usize] = ns_bit;
        } else if b & ai_sg_xx != 0 {
            bits[cp as usize] = al_bit;
        } else if b == sa_bit {
            let is_mark = mn_mc_ranges.iter().any(|r| r.lo <= cp && cp <= r.hi);
            bits[cp as usize] = if is_mark { cm_bit } else { al_bit };
        }
    }

    // PI/PF: General_Category Pi/Pf intersected with the QU line-break class.
    for rec in &general_category {
        let synth = match rec.tag.as_str() {
            "Pi" => PI_BIT,
            "Pf" => PF_BIT,
            _ => continue,
        };
        for cp in rec.lo..=rec.hi {
            if cp < CODESPACE && bits[cp as usize] & class_bit("QU").unwrap() != 0 {
                bits[cp as usize] |= synth;
            }
        }
    }

    // EA: East_Asian_Width F | W | H.
    for rec in &east_asian_width {
        if matches!(rec.tag.as_str(), "F" | "W" | "H") {
            for cp in rec.lo..=rec.hi {
                if cp < CODESPACE {
                    bits[cp as usize] |= EA_BIT;
                }
            }
        }
    }

    // EPU: General_Category Cn intersected with the two reserved
    // Extended_Pictographic default-true ranges.
    let cn_ranges: Vec<&Record> = general_category.iter().filter(|r| r.tag == "Cn").collect();
    for (lo, hi) in EPU_RANGES {
        for cp in lo..=hi {
            if cn_ranges.iter().any(|r| r.lo <= cp && cp <= r.hi) {
                bits[cp as usize] |= EPU_BIT;
            }
        }
    }

    // DC: dedicated bit for the dotted circle, alongside its natural class.
    bits[DOTTED_CIRCLE as usize] |= DC_BIT;

    let out_dir = env::var("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("tables.rs");
    let mut out = fs::File::create(&dest_path)?;

    let page_count_estimate = bits.len() / PAGE_SIZE + 1;
    let mut pages: Vec<[u64; PAGE_SIZE]> = Vec::with_capacity(page_count_estimate);
    let mut page_of: HashMap<[u64; PAGE_SIZE], usize> = HashMap::new();
    let mut page_indices: Vec<u64> = Vec::with_capacity(page_count_estimate);

    for chunk in bits.chunks(PAGE_SIZE) {
        let mut page = [0u64; PAGE_SIZE];
        page[..chunk.len()].copy_from_slice(chunk);

        let uniform = page.iter().all(|&v| v == page[0]);
        if uniform {
            page_indices.push(page[0] | UNIFORM_PAGE);
        } else if let Some(&idx) = page_of.get(&page) {
            page_indices.push(idx as u64);
        } else {
            let idx = pages.len();
            page_of.insert(page, idx);
            pages.push(page);
            page_indices.push(idx as u64);
        }
    }

    writeln!(out, "const UNIFORM_PAGE: u64 = {UNIFORM_PAGE};")?;
    writeln!(out, "const PAGE_COUNT: usize = {};", pages.len())?;
    writeln!(
        out,
        "static PAGE_INDICES: [u64; {}] = [",
        page_indices.len()
    )?;
    for idx in &page_indices {
        write!(out, "{idx},")?;
    }
    writeln!(out, "];")?;

    writeln!(
        out,
        "static BREAK_PROP_DATA: [[u64; {PAGE_SIZE}]; PAGE_COUNT] = ["
    )?;
    for page in &pages {
        write!(out, "[")?;
        for v in page {
            write!(out, "{v},")?;
        }
        writeln!(out, "],")?;
    }
    writeln!(out, "];")?;

    Ok(())
}

fn parse_ucd_file(path: &str) -> std::io::Result<Vec<Record>> {
    let content = fs::read_to_string(path)?;
    let re = Regex::new(
        r"(?x)^
        \s*(?P<start>[[:xdigit:]]{4,})
        (?:\.\.(?P<end>[[:xdigit:]]{4,}))?
        \s*;\s*
        (?P<tag>[A-Za-z]{1,3})
        ",
    )
    .unwrap();

    let mut records = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some(caps) = re.captures(line) else {
            continue;
        };
        let lo = u32::from_str_radix(&caps["start"], 16).unwrap();
        let hi = caps
            .name("end")
            .and_then(|m| u32::from_str_radix(m.as_str(), 16).ok())
            .unwrap_or(lo);
        records.push(Record {
            lo,
            hi,
            tag: caps["tag"].to_string(),
        });
    }
    Ok(records)
}
