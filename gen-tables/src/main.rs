//! Regenerates the frozen UCD slice under `../data/` from local UCD-format
//! files and validates its self-declared Unicode version.
//!
//! This mirrors the shape of the original data generator (parse records,
//! enforce a version check, write output) but, unlike it, never reaches
//! out to the network: the crate it serves treats the network fetch as an
//! external collaborator (see the root crate's SPEC_FULL.md §2), so this
//! tool only operates on files already on disk, pointed to by `--input`.
//! Hand the refreshed `unicode.org/Public/<version>/ucd/*.txt` files to it
//! directly when bumping the Unicode version.

use hashbrown::HashMap;
use regex::Regex;
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const UNICODE_VERSION: &str = "17.0.0";

struct Record {
    lo: u32,
    hi: u32,
    class: String,
}

struct Args {
    line_break: PathBuf,
    general_category: PathBuf,
    east_asian_width: PathBuf,
    line_break_test: PathBuf,
    out_dir: PathBuf,
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("gen-tables: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> io::Result<()> {
    let args = parse_args()?;

    let line_break = read_and_check_version(&args.line_break, "LineBreak.txt")?;
    let general_category =
        read_and_check_version(&args.general_category, "DerivedGeneralCategory.txt")?;
    let east_asian_width = read_and_check_version(&args.east_asian_width, "EastAsianWidth.txt")?;
    let line_break_test = read_and_check_version(&args.line_break_test, "LineBreakTest.txt")?;

    let line_break_records = parse_records(&line_break)?;
    let general_category_records = parse_records(&general_category)?;
    let east_asian_width_records = parse_records(&east_asian_width)?;
    let conformance_cases = parse_conformance_cases(&line_break_test)?;

    eprintln!(
        "gen-tables: parsed {} LineBreak records, {} DerivedGeneralCategory records, \
         {} EastAsianWidth records, {} conformance cases for Unicode {UNICODE_VERSION}",
        line_break_records.len(),
        general_category_records.len(),
        east_asian_width_records.len(),
        conformance_cases.len(),
    );

    // Deduplicate identical (lo, hi, class) records before writing, the
    // same normalisation `build.rs`'s page-folding relies on not having to
    // do twice.
    let mut seen: HashMap<(u32, u32, &str), ()> = HashMap::new();
    let deduped: Vec<&Record> = line_break_records
        .iter()
        .filter(|r| seen.insert((r.lo, r.hi, r.class.as_str()), ()).is_none())
        .collect();

    fs::create_dir_all(&args.out_dir)?;
    write_records(&args.out_dir.join("LineBreak.txt"), &deduped)?;
    write_records(
        &args.out_dir.join("DerivedGeneralCategory.txt"),
        &general_category_records.iter().collect::<Vec<_>>(),
    )?;
    write_records(
        &args.out_dir.join("EastAsianWidth.txt"),
        &east_asian_width_records.iter().collect::<Vec<_>>(),
    )?;
    fs::copy(&args.line_break_test, args.out_dir.join("LineBreakTest.txt"))?;

    Ok(())
}

fn parse_args() -> io::Result<Args> {
    let mut line_break = None;
    let mut general_category = None;
    let mut east_asian_width = None;
    let mut line_break_test = None;
    let mut out_dir = PathBuf::from("../data");

    let mut it = env::args().skip(1);
    while let Some(flag) = it.next() {
        let mut value = || {
            it.next()
                .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, format!("{flag} needs a value")))
        };
        match flag.as_str() {
            "--input" => line_break = Some(PathBuf::from(value()?)),
            "--gcinput" => general_category = Some(PathBuf::from(value()?)),
            "--eawinput" => east_asian_width = Some(PathBuf::from(value()?)),
            "--testinput" => line_break_test = Some(PathBuf::from(value()?)),
            "--out" => out_dir = PathBuf::from(value()?),
            other => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("unrecognised flag {other}"),
                ))
            }
        }
    }

    Ok(Args {
        line_break: line_break.ok_or_else(|| missing("--input"))?,
        general_category: general_category.ok_or_else(|| missing("--gcinput"))?,
        east_asian_width: east_asian_width.ok_or_else(|| missing("--eawinput"))?,
        line_break_test: line_break_test.ok_or_else(|| missing("--testinput"))?,
        out_dir,
    })
}

fn missing(flag: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, format!("missing required {flag}"))
}

/// Reads `path` and refuses to proceed if the file's self-declared
/// `@version` disagrees with the version this tool targets, matching the
/// reference generator's own version check.
fn read_and_check_version(path: &Path, label: &str) -> io::Result<String> {
    let content = fs::read_to_string(path)?;
    let version_re = Regex::new(r"-([0-9]+\.[0-9]+\.[0-9]+)\.txt").unwrap();
    if let Some(caps) = version_re.captures(&content) {
        let found = &caps[1];
        if found != UNICODE_VERSION {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{label} version mismatch: got {found}, expected {UNICODE_VERSION}"),
            ));
        }
    }
    Ok(content)
}

fn parse_records(content: &str) -> io::Result<Vec<Record>> {
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
    for (lineno, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some(caps) = re.captures(line) else {
            continue;
        };
        let lo = u32::from_str_radix(&caps["start"], 16)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("line {lineno}: {e}")))?;
        let hi = caps
            .name("end")
            .map(|m| u32::from_str_radix(m.as_str(), 16))
            .transpose()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("line {lineno}: {e}")))?
            .unwrap_or(lo);
        records.push(Record {
            lo,
            hi,
            class: caps["tag"].to_string(),
        });
    }
    Ok(records)
}

struct ConformanceCase {
    break_offsets: Vec<usize>,
}

/// Parses the `÷`/`×`-marker conformance format (one leading sot marker,
/// then alternating code-point/marker pairs) well enough to validate the
/// frozen fixture's shape before it is copied into `../data/`.
fn parse_conformance_cases(content: &str) -> io::Result<Vec<ConformanceCase>> {
    let mut cases = Vec::new();
    for (lineno, line) in content.lines().enumerate() {
        let line = line.split('#').next().unwrap().trim();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 3 || fields.len() % 2 == 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("line {lineno}: invalid field layout"),
            ));
        }
        let mut offsets = Vec::new();
        let mut byte_len = 0usize;
        for pair in fields[1..].chunks(2) {
            let (hex, marker) = (pair[0], pair[1]);
            let cp = u32::from_str_radix(hex, 16)
                .ok()
                .and_then(char::from_u32)
                .ok_or_else(|| {
                    io::Error::new(io::ErrorKind::InvalidData, format!("line {lineno}: bad code point {hex}"))
                })?;
            byte_len += cp.len_utf8();
            if marker == "÷" {
                offsets.push(byte_len);
            } else if marker != "×" {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("line {lineno}: bad marker {marker}"),
                ));
            }
        }
        if offsets.last() != Some(&byte_len) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("line {lineno}: fixture does not end with a break"),
            ));
        }
        cases.push(ConformanceCase { break_offsets: offsets });
    }
    Ok(cases)
}

fn write_records(path: &Path, records: &[&Record]) -> io::Result<()> {
    let mut out = fs::File::create(path)?;
    writeln!(out, "# Regenerated by gen-tables for Unicode {UNICODE_VERSION}.")?;
    for r in records {
        if r.lo == r.hi {
            writeln!(out, "{:04X};{}", r.lo, r.class)?;
        } else {
            writeln!(out, "{:04X}..{:04X};{}", r.lo, r.hi, r.class)?;
        }
    }
    Ok(())
}
