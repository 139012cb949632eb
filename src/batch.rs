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

//! Prepare a whole batch of runs.
//!
//! [Batch::prepare] creates the output root, writes the master script,
//! materializes one run per read pair in input order while appending to the
//! manifest, and finally builds the array job command.
//!
//! Run ids start at 1 and follow the order of the input list. A failure stops
//! the batch immediately: runs prepared before the failure and the manifest
//! rows written for them are left on disk.

use crate::array_job::array_job_command;
use crate::config::Config;
use crate::manifest::ManifestWriter;
use crate::reads::read_pairs_from_path;
use crate::reads::ReadPair;
use crate::run::make_directory;
use crate::run::materialize_run;
use crate::run::Run;
use crate::templates::TemplateSet;

use std::path::Path;
use std::path::PathBuf;

type E = Box<dyn std::error::Error>;

/// Inputs of one batch.
#[derive(Debug, Clone)]
pub struct Batch {
    pub out_root: PathBuf,
    pub templates: TemplateSet,
    pub pairs: Vec<ReadPair>,
    pub config: Config,
}

/// Artifacts produced by [Batch::prepare].
#[derive(Debug, Clone)]
pub struct PreparedBatch {
    pub runs: Vec<Run>,
    pub master_script: PathBuf,
    pub manifest: PathBuf,
    /// None if the input list was empty.
    pub array_job: Option<String>,
}

impl PreparedBatch {
    pub fn n_runs(&self) -> usize {
        self.runs.len()
    }
}

impl Batch {
    pub fn new(
        out_root: &Path,
        templates: TemplateSet,
        pairs: Vec<ReadPair>,
        config: Config,
    ) -> Self {
        Batch { out_root: out_root.to_path_buf(), templates, pairs, config }
    }

    /// Read the input list and the templates.
    ///
    /// Nothing is written to disk, so configuration errors are reported
    /// before any output exists.
    pub fn load(
        reads_list: &Path,
        template_dir: &Path,
        out_root: &Path,
        config: Config,
    ) -> Result<Self, E> {
        let pairs = read_pairs_from_path(reads_list)?;
        let templates = TemplateSet::load(template_dir, &config)?;
        Ok(Batch::new(out_root, templates, pairs, config))
    }

    pub fn prepare(
        &self,
    ) -> Result<PreparedBatch, E> {
        self.templates.validate()?;

        make_directory(&self.out_root)?;

        let master_script = self.config.script_path(&self.out_root);
        std::fs::write(&master_script, self.templates.render_master_script(&self.out_root, &self.config))?;
        log::debug!("Wrote master script {}", master_script.display());

        let manifest = self.config.manifest_path(&self.out_root);
        let conn = std::fs::File::create(&manifest)?;
        let mut writer = ManifestWriter::new(conn)?;

        let mut runs: Vec<Run> = Vec::with_capacity(self.pairs.len());
        let mut run_id: usize = 0;
        for reads in self.pairs.iter() {
            run_id += 1;
            let run = materialize_run(run_id, reads, &self.out_root, &self.templates, &self.config)?;
            writer.write_run(&run)?;
            runs.push(run);
        }
        writer.into_inner()?;

        let array_job = if run_id > 0 {
            Some(array_job_command(&self.templates, &self.out_root, run_id, &self.config)?)
        } else {
            log::warn!("Input list is empty, no runs were prepared");
            None
        };

        log::info!("Prepared {} run(s) in {}", run_id, self.out_root.display());

        Ok(PreparedBatch { runs, master_script, manifest, array_job })
    }
}
