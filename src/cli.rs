/*
 * keil2sdcc: convert Keil C51 register headers to SDCC syntax.
 * Copyright (C) 2022  Ruifeng Xie
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as
 * published by the Free Software Foundation, either version 3 of the
 * License, or (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

//! Command line interface support.

use std::io::Write;
use std::path::PathBuf;
use displaydoc::Display as DisplayDoc;
use log::LevelFilter;
use simple_logger::SimpleLogger;
use thiserror::Error;
use clap::Parser;

use crate::latin1;
use crate::files::{self, HeaderFiles, DEFAULT_BACKUP_SUFFIX, DEFAULT_HEADER};

/// Entry to the command line interface.
#[derive(Parser)]
#[clap(author, version, about)]
pub struct Cli {
    /// The Keil C51 header to convert in place.
    #[clap(default_value = DEFAULT_HEADER)]
    header: PathBuf,
    /// Directory containing the header.
    #[clap(short = 'C', long, default_value = ".")]
    directory: PathBuf,
    /// Appended to the header file name to name the backup of the original.
    #[clap(long, default_value = DEFAULT_BACKUP_SUFFIX)]
    backup_suffix: String,
    /// Print the converted header to stdout; no file is renamed or written.
    #[clap(short = 'n', long)]
    dry_run: bool,
    /// Also log debugging details.
    #[clap(short, long, conflicts_with = "quiet")]
    verbose: bool,
    /// Only log errors.
    #[clap(short, long)]
    quiet: bool,
}

/// All kinds of errors that might happen during command line execution.
#[derive(Debug, DisplayDoc, Error)]
pub enum Error {
    /// "errors" from [`clap`], including requests such as `--version` or `--help`.
    #[displaydoc("{0}")]
    InvalidArguments(#[from] clap::Error),
    /// {0}
    Conversion(#[from] files::Error),
    /// cannot set up logging: {0}
    Logger(#[from] log::SetLoggerError),
    /// cannot print the converted header: {0}
    Io(#[from] std::io::Error),
}

/// Result type for the command line interface.
pub type Result = std::result::Result<(), Error>;

impl Error {
    /// Whether the logger was installed before this error happened, so it can report it.
    pub fn logger_ready(&self) -> bool {
        !matches!(self, Error::InvalidArguments(_) | Error::Logger(_))
    }

    /// Report a fatal error: through the logger when possible, straight to stderr otherwise.
    pub fn report(&self) {
        if self.logger_ready() {
            log::error!("{}", self);
        } else {
            eprintln!("error: {}", self);
        }
    }
}

impl Cli {
    fn log_level(&self) -> LevelFilter {
        if self.quiet {
            LevelFilter::Error
        } else if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }

    /// Run the command line interface.
    pub fn run() -> Result {
        Cli::run_from(std::env::args_os())
    }

    /// Run the command line interface with the given arguments (the first being the program).
    pub fn run_from<I, T>(args: I) -> Result
        where I: IntoIterator<Item=T>, T: Into<std::ffi::OsString> + Clone {
        let options: Cli = Cli::try_parse_from(args)?;
        SimpleLogger::new()
            .with_level(options.log_level())
            .without_timestamps()
            .init()?;
        let files = HeaderFiles::new(options.directory.join(&options.header),
                                     &options.backup_suffix);
        if options.dry_run {
            let text = files.preview()?;
            std::io::stdout().lock().write_all(&latin1::encode(&text))?;
        } else {
            let report = files.convert()?;
            log::debug!("{:?}", report);
        }
        Ok(())
    }
}
