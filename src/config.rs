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

//! File names and grid policy used when preparing a batch.
//!
//! The defaults match the template directory layout expected by gridprep:
//! `cwl.sh`, `qsub` and `targeted_assembly.yml`.

use std::path::Path;
use std::path::PathBuf;

pub const SCRIPT_FILENAME: &str = "cwl.sh";
pub const SUBMIT_FILENAME: &str = "qsub";
pub const RUN_CONFIG_FILENAME: &str = "targeted_assembly.yml";
pub const STDOUT_FILENAME: &str = "cwl.out";
pub const STDERR_FILENAME: &str = "cwl.err";
pub const MANIFEST_FILENAME: &str = "preparation_map.csv";

/// SGE substitutes the array task index for this variable at run time.
pub const TASK_ID_VAR: &str = "$SGE_TASK_ID";

/// Default limit on simultaneously running array tasks (`qsub -tc`).
pub const MAX_CONCURRENT_TASKS: usize = 15;

/// Prepended to the master script only.
pub const SHEBANG: &str = "#!/bin/sh";

/// Settings for one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub script_filename: String,
    pub submit_filename: String,
    pub run_config_filename: String,
    pub stdout_filename: String,
    pub stderr_filename: String,
    pub manifest_filename: String,
    pub task_id_var: String,
    pub max_concurrent: usize,
    pub shebang: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            script_filename: SCRIPT_FILENAME.to_string(),
            submit_filename: SUBMIT_FILENAME.to_string(),
            run_config_filename: RUN_CONFIG_FILENAME.to_string(),
            stdout_filename: STDOUT_FILENAME.to_string(),
            stderr_filename: STDERR_FILENAME.to_string(),
            manifest_filename: MANIFEST_FILENAME.to_string(),
            task_id_var: TASK_ID_VAR.to_string(),
            max_concurrent: MAX_CONCURRENT_TASKS,
            shebang: SHEBANG.to_string(),
        }
    }
}

impl Config {
    pub fn with_max_concurrent(
        mut self,
        max_concurrent: usize,
    ) -> Self {
        self.max_concurrent = max_concurrent;
        self
    }

    pub fn script_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.script_filename)
    }

    pub fn run_config_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.run_config_filename)
    }

    pub fn stdout_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.stdout_filename)
    }

    pub fn stderr_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.stderr_filename)
    }

    pub fn manifest_path(&self, out_root: &Path) -> PathBuf {
        out_root.join(&self.manifest_filename)
    }

    /// Directory that an array task resolves at run time, eg. `/out/$SGE_TASK_ID`.
    pub fn task_dir(&self, out_root: &Path) -> PathBuf {
        out_root.join(&self.task_id_var)
    }
}
