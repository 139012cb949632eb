// gridprep: Prepare per-sample run directories and array job submissions for SGE grids.
//
// Copyright 2025 Tommi Mäklin [tommi@maklin.fi].
//
// Copyrights in this project are retained by contributors. No copyright assignment
// is required to contribute to this project.
//
// Except as otherwise noted (below and/or in individual files), this
// project is licensed under the Apache License, Version 2.0
// <LICENSE-APACHE> or <http://www.apache.org/licenses/LICENSE-2.0> or
// the MIT license, <LICENSE-MIT> or <http://opensource.org/licenses/MIT>,
// at your option.
//

//! Parser for the list of paired read files.
//!
//! The list has one sample per line and no header:
//!
//! ```text
//! /path/to/sample1_R1.fastq.gz,/path/to/sample1_R2.fastq.gz
//! /path/to/sample2_R1.fastq.gz,/path/to/sample2_R2.fastq.gz
//! ```
//!
//! Columns after the second are ignored, surrounding whitespace is trimmed
//! and blank lines are skipped. The order of the lines determines the run
//! ids.

use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

type E = Box<dyn std::error::Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedRecord {
    pub line: u64,
    pub content: String,
}

impl std::fmt::Display for MalformedRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "line {}: expected two read files separated by a comma, got '{}'", self.line, self.content)
    }
}

impl std::error::Error for MalformedRecord {}

#[derive(Debug)]
pub struct InputListError {
    pub path: PathBuf,
    pub source: std::io::Error,
}

impl std::fmt::Display for InputListError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "could not open input list {}: {}", self.path.display(), self.source)
    }
}

impl std::error::Error for InputListError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// First and second read file of one sample.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ReadPair {
    pub reads1: String,
    pub reads2: String,
}

impl ReadPair {
    pub fn new<S: Into<String>, T: Into<String>>(
        reads1: S,
        reads2: T,
    ) -> Self {
        ReadPair { reads1: reads1.into(), reads2: reads2.into() }
    }
}

/// Parse all read pairs from [Read](std::io::Read).
///
/// ## Errors
///
/// Returns [MalformedRecord] for the first line with fewer than two columns
/// or an empty path.
///
pub fn read_pairs<R: Read>(
    conn: &mut R,
) -> Result<Vec<ReadPair>, E> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(conn);

    let mut pairs: Vec<ReadPair> = Vec::new();
    for record in reader.records() {
        let record = record?;
        let malformed = || MalformedRecord {
            line: record.position().map(|pos| pos.line()).unwrap_or(0),
            content: record.iter().collect::<Vec<&str>>().join(","),
        };

        let reads1 = record.get(0).filter(|path| !path.is_empty()).ok_or_else(malformed)?;
        let reads2 = record.get(1).filter(|path| !path.is_empty()).ok_or_else(malformed)?;
        pairs.push(ReadPair::new(reads1, reads2));
    }

    Ok(pairs)
}

/// Parse all read pairs from the file at `path`.
pub fn read_pairs_from_path(
    path: &Path,
) -> Result<Vec<ReadPair>, E> {
    let mut conn = std::fs::File::open(path)
        .map_err(|source| InputListError { path: path.to_path_buf(), source })?;
    let pairs = read_pairs(&mut conn)?;
    log::info!("Read {} sample(s) from {}", pairs.len(), path.display());
    Ok(pairs)
}

// Tests
#[cfg(test)]
mod tests {

    #[test]
    fn read_pairs_in_order() {
        use super::{read_pairs, ReadPair};
        use std::io::Cursor;

        let data: Vec<u8> = b"/data/a_1.fq,/data/a_2.fq\n/data/b_1.fq,/data/b_2.fq\n".to_vec();
        let expected = vec![
            ReadPair::new("/data/a_1.fq", "/data/a_2.fq"),
            ReadPair::new("/data/b_1.fq", "/data/b_2.fq"),
        ];

        let mut input: Cursor<Vec<u8>> = Cursor::new(data);
        let got = read_pairs(&mut input).unwrap();

        assert_eq!(got, expected);
    }

    #[test]
    fn read_pairs_trims_and_ignores_extra_columns() {
        use super::{read_pairs, ReadPair};
        use std::io::Cursor;

        let data: Vec<u8> = b" a1 , a2 ,sample_a\r\n\nb1,b2".to_vec();
        let expected = vec![
            ReadPair::new("a1", "a2"),
            ReadPair::new("b1", "b2"),
        ];

        let mut input: Cursor<Vec<u8>> = Cursor::new(data);
        let got = read_pairs(&mut input).unwrap();

        assert_eq!(got, expected);
    }

    #[test]
    fn read_pairs_empty_input() {
        use super::read_pairs;
        use std::io::Cursor;

        let mut input: Cursor<Vec<u8>> = Cursor::new(Vec::new());
        let got = read_pairs(&mut input).unwrap();

        assert!(got.is_empty());
    }

    #[test]
    fn read_pairs_single_column_is_malformed() {
        use super::{read_pairs, MalformedRecord};
        use std::io::Cursor;

        let data: Vec<u8> = b"a1,a2\nb1\nc1,c2\n".to_vec();

        let mut input: Cursor<Vec<u8>> = Cursor::new(data);
        let err = read_pairs(&mut input).unwrap_err();
        let got = err.downcast_ref::<MalformedRecord>().unwrap();

        assert_eq!(got.line, 2);
        assert_eq!(got.content, "b1");
    }

    #[test]
    fn read_pairs_empty_path_is_malformed() {
        use super::{read_pairs, MalformedRecord};
        use std::io::Cursor;

        let data: Vec<u8> = b"a1,\n".to_vec();

        let mut input: Cursor<Vec<u8>> = Cursor::new(data);
        let err = read_pairs(&mut input).unwrap_err();

        assert!(err.downcast_ref::<MalformedRecord>().is_some());
    }

    #[test]
    fn read_pairs_from_missing_file() {
        use super::{read_pairs_from_path, InputListError};
        use tempfile::TempDir;

        let dir = TempDir::new().unwrap();
        let err = read_pairs_from_path(&dir.path().join("reads.csv")).unwrap_err();

        assert!(err.downcast_ref::<InputListError>().is_some());
    }
}
