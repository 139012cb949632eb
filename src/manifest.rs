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

//! The manifest `preparation_map.csv`.
//!
//! One row per run in input order, with the columns `ID,qsub,reads1,reads2`.
//! Each row is flushed as it is written so an aborted batch leaves only
//! complete rows behind.

use crate::run::Run;

use std::io::Write;

type E = Box<dyn std::error::Error>;

pub const MANIFEST_HEADER: [&str; 4] = ["ID", "qsub", "reads1", "reads2"];

pub struct ManifestWriter<W: Write> {
    writer: csv::Writer<W>,
    n_rows: usize,
}

impl<W: Write> ManifestWriter<W> {
    /// Wrap `conn` and write the header row.
    pub fn new(
        conn: W,
    ) -> Result<Self, E> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(conn);
        writer.write_record(MANIFEST_HEADER)?;
        writer.flush()?;
        Ok(ManifestWriter { writer, n_rows: 0 })
    }

    pub fn write_run(
        &mut self,
        run: &Run,
    ) -> Result<(), E> {
        self.writer.write_record([
            run.run_id.to_string().as_str(),
            run.submit_command.as_str(),
            run.reads.reads1.as_str(),
            run.reads.reads2.as_str(),
        ])?;
        self.writer.flush()?;
        self.n_rows += 1;
        Ok(())
    }

    /// Number of runs written so far.
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn into_inner(self) -> Result<W, E> {
        self.writer.into_inner().map_err(|err| err.into_error().into())
    }
}
