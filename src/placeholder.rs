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

//! Literal token substitution for template documents.
//!
//! Templates mark the values that differ between runs with tokens of the form
//! `PLACEHOLDER_<NAME>`. The tokens understood by gridprep are listed in
//! [Placeholder]; [substitute] replaces any set of tokens given in a
//! [Substitutions] mapping and never touches the filesystem.
//!
//! Tokens that are not present in a document are silently ignored.
//!
//! ## Usage
//!
//! ```rust
//! use gridprep::placeholder::{substitute, Placeholder, Substitutions};
//!
//! let mut subs = Substitutions::new();
//! subs.insert(Placeholder::Reads1, "/data/s1_R1.fq.gz");
//! subs.insert(Placeholder::Reads2, "/data/s1_R2.fq.gz");
//!
//! let got = substitute("r1: PLACEHOLDER_READS1\nr2: PLACEHOLDER_READS2\n", &subs);
//! assert_eq!(got, "r1: /data/s1_R1.fq.gz\nr2: /data/s1_R2.fq.gz\n");
//! ```
//!

/// Common prefix of every placeholder token.
pub const TOKEN_PREFIX: &str = "PLACEHOLDER_";

/// Placeholder tokens that gridprep knows how to fill in.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Placeholder {
    /// Output directory of the run (execution script).
    OutDir,
    /// Path to the run configuration file (execution script).
    Yml,
    /// First read file (run configuration).
    Reads1,
    /// Second read file (run configuration).
    Reads2,
    /// Path to the execution script (submission command).
    CwlSh,
    /// Path to the stdout log (submission command).
    CwlOut,
    /// Path to the stderr log (submission command).
    CwlErr,
}

impl Placeholder {
    pub const ALL: [Placeholder; 7] = [
        Placeholder::OutDir,
        Placeholder::Yml,
        Placeholder::Reads1,
        Placeholder::Reads2,
        Placeholder::CwlSh,
        Placeholder::CwlOut,
        Placeholder::CwlErr,
    ];

    /// Literal text of the token as it appears in a template.
    pub fn token(&self) -> &'static str {
        match self {
            Placeholder::OutDir => "PLACEHOLDER_OUTDIR",
            Placeholder::Yml => "PLACEHOLDER_YML",
            Placeholder::Reads1 => "PLACEHOLDER_READS1",
            Placeholder::Reads2 => "PLACEHOLDER_READS2",
            Placeholder::CwlSh => "PLACEHOLDER_CWL_SH",
            Placeholder::CwlOut => "PLACEHOLDER_CWL_OUT",
            Placeholder::CwlErr => "PLACEHOLDER_CWL_ERR",
        }
    }
}

impl std::fmt::Display for Placeholder {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.token())
    }
}

impl std::str::FromStr for Placeholder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Placeholder::ALL.iter()
            .find(|placeholder| placeholder.token() == s)
            .copied()
            .ok_or(format!("'{}' is not a known placeholder", s))
    }
}

/// Mapping from token text to replacement value.
///
/// Insertion order is kept so that the mapping can be listed, but it has no
/// effect on the result of [substitute].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitutions {
    pairs: Vec<(String, String)>,
}

impl Substitutions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value for `token`, replacing any earlier value.
    pub fn insert<T: ToString, V: Into<String>>(
        &mut self,
        token: T,
        value: V,
    ) {
        let token = token.to_string();
        let value = value.into();
        if let Some(pair) = self.pairs.iter_mut().find(|(t, _)| *t == token) {
            pair.1 = value;
        } else {
            self.pairs.push((token, value));
        }
    }

    /// Builder form of [insert](Substitutions::insert).
    pub fn with<T: ToString, V: Into<String>>(
        mut self,
        token: T,
        value: V,
    ) -> Self {
        self.insert(token, value);
        self
    }

    pub fn get(&self, token: &str) -> Option<&str> {
        self.pairs.iter().find(|(t, _)| t == token).map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(t, v)| (t.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Replace every occurrence of each token in `subs` with its value.
///
/// The text is scanned once from left to right, so a replacement value is
/// never rescanned for other tokens. If two tokens start at the same
/// position the longer one wins. Empty tokens are ignored.
///
/// The next position of each token is cached and only searched again once
/// the scan has moved past it. Tokens that are absent are searched for once.
///
pub fn substitute(
    text: &str,
    subs: &Substitutions,
) -> String {
    let pairs: Vec<(&str, &str)> = subs.iter()
        .filter(|(token, _)| !token.is_empty())
        .collect();
    let mut next: Vec<Option<usize>> = pairs.iter()
        .map(|(token, _)| text.find(token))
        .collect();

    let mut out = String::with_capacity(text.len());
    let mut cursor: usize = 0;

    loop {
        let best = next.iter().enumerate()
            .filter_map(|(idx, pos)| pos.map(|pos| (pos, idx)))
            .min_by(|a, b| a.0.cmp(&b.0).then(pairs[b.1].0.len().cmp(&pairs[a.1].0.len())));

        match best {
            Some((pos, idx)) => {
                let (token, value) = pairs[idx];
                out.push_str(&text[cursor..pos]);
                out.push_str(value);
                cursor = pos + token.len();

                next.iter_mut().zip(pairs.iter()).for_each(|(found, (token, _))| {
                    if found.is_some_and(|at| at < cursor) {
                        *found = text[cursor..].find(token).map(|at| at + cursor);
                    }
                });
            },
            None => {
                out.push_str(&text[cursor..]);
                break;
            },
        }
    }

    out
}

/// List the distinct `PLACEHOLDER_<NAME>` tokens in `text`.
///
/// A name consists of ASCII uppercase letters, digits and underscores. Tokens
/// are returned in order of first appearance.
pub fn scan_tokens(
    text: &str,
) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    let mut rest = text;

    while let Some(start) = rest.find(TOKEN_PREFIX) {
        let after = &rest[(start + TOKEN_PREFIX.len())..];
        let name_len = after
            .find(|c: char| !(c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_'))
            .unwrap_or(after.len());

        if name_len > 0 {
            let token = &rest[start..(start + TOKEN_PREFIX.len() + name_len)];
            if !found.iter().any(|t| t == token) {
                found.push(token.to_string());
            }
        }
        rest = &after[name_len..];
    }

    found
}
