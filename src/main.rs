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
use std::io::Write;

use clap::Parser;

use gridprep::batch::Batch;
use gridprep::config::Config;
use gridprep::reads::read_pairs_from_path;
use gridprep::templates::TemplateSet;

mod cli;

type E = Box<dyn std::error::Error>;

/// Initializes the logger with verbosity given in `log_max_level`.
fn init_log(log_max_level: usize) {
    stderrlog::new()
    .module(module_path!())
    .quiet(false)
    .verbosity(log_max_level)
    .timestamp(stderrlog::Timestamp::Off)
    .init()
    .unwrap();
}

/// Reports the number of samples and the tokens found in each template.
fn check<W: Write>(
    reads_list: &std::path::Path,
    template_dir: &std::path::Path,
    conn_out: &mut W,
) -> Result<(), E> {
    let config = Config::default();
    let pairs = read_pairs_from_path(reads_list)?;
    let templates = TemplateSet::load(template_dir, &config)?;

    writeln!(conn_out, "samples\t{}", pairs.len())?;
    for template in templates.iter() {
        writeln!(conn_out, "{}\t{}", template.name(), template.tokens().join(","))?;
    }
    conn_out.flush()?;

    Ok(())
}

fn main() {
    let cli = cli::Cli::parse();

    // Subcommands:
    let res: Result<(), E> = match &cli.command {
        // Prepare
        Some(cli::Commands::Prepare {
            reads_list,
            template_dir,
            out_dir,
            max_concurrent,
            verbose,
        }) => {
            init_log(if *verbose { 2 } else { 1 });

            let config = Config::default().with_max_concurrent(*max_concurrent as usize);
            Batch::load(reads_list, template_dir, out_dir, config)
                .and_then(|batch| batch.prepare())
                .and_then(|prepared| {
                    if let Some(array_job) = prepared.array_job {
                        let mut stdout = std::io::stdout();
                        writeln!(stdout, "{}", array_job)?;
                    }
                    Ok(())
                })
        },

        // Check
        Some(cli::Commands::Check {
            reads_list,
            template_dir,
            verbose,
        }) => {
            init_log(if *verbose { 2 } else { 1 });
            check(reads_list, template_dir, &mut std::io::stdout())
        },

        None => {
            init_log(1);
            log::error!("No subcommand given, see `gridprep --help`");
            std::process::exit(2);
        },
    };

    if let Err(err) = res {
        log::error!("{}", err);
        std::process::exit(1);
    }
}
