//! CSV loading with encoding and delimiter detection.

use std::path::Path;

use crate::error::ImportResult;
use crate::types::DataSet;

use super::infer::dataset_from_strings;

/// Delimiters tried in order before falling back to scored detection.
const DELIMITER_CANDIDATES: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Load a CSV file into a typed [`DataSet`].
///
/// The file's bytes are decoded using a sniffed encoding (BOM, then UTF-8,
/// then windows-1252), the delimiter is detected unless `delimiter` is given,
/// and column types are inferred from the parsed cells.
pub fn load_csv_from_path(path: impl AsRef<Path>, delimiter: Option<u8>) -> ImportResult<DataSet> {
    let bytes = std::fs::read(path)?;
    let content = decode_bytes(&bytes);
    load_csv_from_str(&content, delimiter)
}

/// Load CSV data from an in-memory string.
pub fn load_csv_from_str(content: &str, delimiter: Option<u8>) -> ImportResult<DataSet> {
    if let Some(d) = delimiter {
        let (columns, rows) = parse_with_delimiter(content, d)?;
        return dataset_from_strings(columns, rows);
    }

    // Try the fixed candidates in order; a candidate wins if the whole file
    // parses with consistent field counts and more than one column.
    for d in DELIMITER_CANDIDATES {
        if let Ok((columns, rows)) = parse_with_delimiter(content, d) {
            if columns.len() > 1 {
                return dataset_from_strings(columns, rows);
            }
        }
    }

    let d = detect_delimiter(content);
    let (columns, rows) = parse_with_delimiter(content, d)?;
    dataset_from_strings(columns, rows)
}

/// Decode raw bytes into text.
///
/// BOM-marked files use the BOM's encoding; otherwise valid UTF-8 is taken
/// as-is and anything else is decoded as windows-1252 (which is total, so
/// decoding cannot fail; at worst it mangles exotic encodings into text).
fn decode_bytes(bytes: &[u8]) -> String {
    if let Some((encoding, bom_len)) = encoding_rs::Encoding::for_bom(bytes) {
        let (text, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return text.into_owned();
    }
    if let Ok(text) = std::str::from_utf8(bytes) {
        return text.to_owned();
    }
    let (text, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    text.into_owned()
}

/// Strict parse: every record must have the same field count as the header.
fn parse_with_delimiter(content: &str, delimiter: u8) -> ImportResult<(Vec<String>, Vec<Vec<String>>)> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .flexible(false)
        .from_reader(content.as_bytes());

    let columns: Vec<String> = rdr.headers()?.iter().map(str::to_owned).collect();

    let mut rows: Vec<Vec<String>> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(record.iter().map(str::to_owned).collect());
    }
    Ok((columns, rows))
}

/// Score candidate delimiters by per-line frequency and consistency over a
/// sample of the input, returning the best one.
fn detect_delimiter(content: &str) -> u8 {
    let sample_lines: Vec<&str> = content.lines().take(10).collect();

    let mut best = b',';
    let mut best_score = 0.0f32;

    for &delimiter in &DELIMITER_CANDIDATES {
        if sample_lines.is_empty() {
            continue;
        }

        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| line.bytes().filter(|&b| b == delimiter).count())
            .collect();

        let avg = counts.iter().sum::<usize>() as f32 / counts.len() as f32;
        let variance = counts
            .iter()
            .map(|&c| (c as f32 - avg).powi(2))
            .sum::<f32>()
            / counts.len() as f32;
        let score = avg / (1.0 + variance.sqrt());

        if score > best_score {
            best_score = score;
            best = delimiter;
        }
    }

    best
}
