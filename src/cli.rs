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
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    // Prepare run directories, the manifest and the array job command
    Prepare {
        // Two-column csv with the reads1 and reads2 paths of each sample
        #[arg(short = 'c', long = "reads", required = true, help = "Input list of paired read files")]
        reads_list: PathBuf,

        // Directory containing cwl.sh, qsub and targeted_assembly.yml
        #[arg(short = 'i', long = "templates", required = true, help = "Template directory")]
        template_dir: PathBuf,

        // Output root for the run directories
        #[arg(short = 'o', long = "output", required = true, help = "Output directory")]
        out_dir: PathBuf,

        // Array job concurrency cap
        #[arg(long = "max-concurrent", default_value_t = gridprep::config::MAX_CONCURRENT_TASKS as u64, value_parser = clap::value_parser!(u64).range(1..))]
        max_concurrent: u64,

        // Verbosity
        #[arg(long = "verbose", default_value_t = false)]
        verbose: bool,
    },

    // Validate the input list and templates without writing anything
    Check {
        // Two-column csv with the reads1 and reads2 paths of each sample
        #[arg(short = 'c', long = "reads", required = true, help = "Input list of paired read files")]
        reads_list: PathBuf,

        // Directory containing cwl.sh, qsub and targeted_assembly.yml
        #[arg(short = 'i', long = "templates", required = true, help = "Template directory")]
        template_dir: PathBuf,

        // Verbosity
        #[arg(long = "verbose", default_value_t = false)]
        verbose: bool,
    },
}
