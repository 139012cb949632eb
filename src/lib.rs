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

//! gridprep is a library and a command-line client for preparing many
//! independent runs of a pipeline for a Sun Grid Engine (SGE) cluster.
//!
//! Given a list of paired read files and a directory of template files,
//! gridprep:
//!
//!   - creates one run directory `{out}/{run_id}` per read pair, containing an
//!     instantiated execution script and run configuration.
//!   - writes a master execution script `{out}/cwl.sh` whose paths are resolved
//!     by each array task through `$SGE_TASK_ID`.
//!   - writes the manifest `{out}/preparation_map.csv` mapping run ids to their
//!     `qsub` commands and read files.
//!   - returns a single array job command that submits every run with at most
//!     15 tasks running at the same time.
//!
//! gridprep only generates these files, it does not submit anything.
//!
//! ## Usage
//!
//! ### Command line
//!
//! The gridprep CLI supports the following subcommands:
//!   - `gridprep prepare` prepare the runs and print the array job command.
//!   - `gridprep check` validate the input list and templates without writing
//!     anything.
//!
//! ### Templates
//!
//! The template directory must contain these files:
//!
//!   - `cwl.sh` with the tokens `PLACEHOLDER_OUTDIR` and `PLACEHOLDER_YML`.
//!   - `qsub` with the tokens `PLACEHOLDER_CWL_OUT`, `PLACEHOLDER_CWL_ERR` and
//!     `PLACEHOLDER_CWL_SH`. The last word of the command must be the script.
//!   - `targeted_assembly.yml` with the tokens `PLACEHOLDER_READS1` and
//!     `PLACEHOLDER_READS2`.
//!
//! Any token may be omitted from a template.
//!
//! ### Rust API
//!
//! [prepare_batch] runs a whole batch from paths. For finer control, see
//! [Batch](batch::Batch), [materialize_run](run::materialize_run) and
//! [substitute](placeholder::substitute).
//!

use std::path::Path;

pub mod array_job;
pub mod batch;
pub mod config;
pub mod manifest;
pub mod placeholder;
pub mod reads;
pub mod run;
pub mod templates;

pub use batch::Batch;
pub use batch::PreparedBatch;
pub use config::Config;
pub use reads::ReadPair;
pub use run::Run;

type E = Box<dyn std::error::Error>;

/// Prepare all runs listed in `reads_list` using the templates in `template_dir`.
///
/// The input list and templates are read before anything is written to
/// `out_root`.
///
/// ## Usage
///
/// ```rust
/// use gridprep::{prepare_batch, Config};
///
/// let tmp = std::env::temp_dir().join(format!("gridprep-doc-{}", std::process::id()));
/// let templates = tmp.join("templates");
/// std::fs::create_dir_all(&templates).unwrap();
/// std::fs::write(templates.join("cwl.sh"), "run --outdir PLACEHOLDER_OUTDIR PLACEHOLDER_YML\n").unwrap();
/// std::fs::write(templates.join("qsub"), "qsub -o PLACEHOLDER_CWL_OUT -e PLACEHOLDER_CWL_ERR PLACEHOLDER_CWL_SH\n").unwrap();
/// std::fs::write(templates.join("targeted_assembly.yml"), "r1: PLACEHOLDER_READS1\nr2: PLACEHOLDER_READS2\n").unwrap();
/// std::fs::write(tmp.join("reads.csv"), "a_1.fq,a_2.fq\nb_1.fq,b_2.fq\n").unwrap();
///
/// let out = tmp.join("out");
/// let prepared = prepare_batch(&tmp.join("reads.csv"), &templates, &out, Config::default()).unwrap();
///
/// assert_eq!(prepared.n_runs(), 2);
/// assert!(out.join("2").join("targeted_assembly.yml").is_file());
/// assert!(prepared.array_job.unwrap().contains(" -t 1-2 -tc 15 "));
///
/// std::fs::remove_dir_all(&tmp).unwrap();
/// ```
///
pub fn prepare_batch(
    reads_list: &Path,
    template_dir: &Path,
    out_root: &Path,
    config: Config,
) -> Result<PreparedBatch, E> {
    let batch = Batch::load(reads_list, template_dir, out_root, config)?;
    batch.prepare()
}
