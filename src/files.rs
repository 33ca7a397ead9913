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

//! The header being converted in place, and the backup of its original contents.
//!
//! On the first run the header is moved aside to the backup; every run (the first included)
//! then regenerates the header from the backup. The backup is never written after it has been
//! created, and the generated header is never read back as a source, so running the tool again
//! is always safe.

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use displaydoc::Display;
use itertools::Itertools;
use thiserror::Error;

use crate::latin1;
use crate::rewrite::{convert_lines, split_lines, Conversion};

/// Header converted when no other is given.
pub const DEFAULT_HEADER: &str = "CH559.H";

/// Appended to the header file name to get the backup file name.
pub const DEFAULT_BACKUP_SUFFIX: &str = ".ORIGINAL";

/// Errors that stop a conversion. Nothing on disk has been changed when one is reported.
#[derive(Debug, Display, Error)]
pub enum Error {
    /// {primary} not found and {backup} does not exist
    #[allow(missing_docs)]
    MissingSource { primary: String, backup: String },
    /**
     * {primary} appears to be a converted header, but {backup} is missing.
     * Refusing to treat the converted file as original.
     * Restore your original as {backup} and rerun.
     */
    #[allow(missing_docs)]
    UnsafeOverwrite { primary: String, backup: String },
    /// I/O error: {0}
    Io(#[from] std::io::Error),
}

/// Where the original header comes from in this run.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Origin {
    /// The backup exists, and is the only thing read.
    Backup,
    /// No backup yet: the (unconverted) header itself is the original, to be moved to the backup.
    FirstRun,
}

/// Outcome of a successful conversion.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Report {
    /// Whether the backup had to be created.
    pub origin: Origin,
    /// Number of `sfr` registers found.
    pub registers: usize,
    /// Number of lines changed.
    pub rewritten: usize,
}

/// A header file and its backup.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct HeaderFiles {
    primary: PathBuf,
    backup: PathBuf,
}

fn file_name(path: &Path) -> Cow<str> {
    match path.file_name() {
        Some(name) => name.to_string_lossy(),
        None => path.to_string_lossy(),
    }
}

impl HeaderFiles {
    /// The header at `primary`, backed up to the same path with `backup_suffix` appended.
    pub fn new(primary: impl Into<PathBuf>, backup_suffix: &str) -> Self {
        let primary = primary.into();
        let mut backup = primary.clone().into_os_string();
        backup.push(backup_suffix);
        HeaderFiles { primary, backup: backup.into() }
    }

    /// Path to the header, converted in place.
    pub fn primary(&self) -> &Path { &self.primary }

    /// Path to the backup of the original header.
    pub fn backup(&self) -> &Path { &self.backup }

    /// First line of every generated header, also used to recognise one.
    ///
    /// Returned as it reads back from disk, so a name outside Latin-1 still matches.
    pub fn marker(&self) -> String {
        let marker = format!("// SDCC-CONVERTED {} (auto-generated)", file_name(&self.primary));
        latin1::decode(&latin1::encode(&marker))
    }

    /// Lines put before the converted contents.
    pub fn banner(&self) -> [String; 4] {
        [
            self.marker(),
            "// DO NOT EDIT THIS FILE DIRECTLY.".to_string(),
            format!("// Edit {} and re-run keil2sdcc instead.", file_name(&self.backup)),
            String::new(),
        ]
    }

    /// Decide where to read the original from, without touching anything.
    pub fn locate(&self) -> Result<Origin, Error> {
        if self.backup.exists() { return Ok(Origin::Backup); }
        if !self.primary.exists() {
            return Err(Error::MissingSource {
                primary: self.primary.display().to_string(),
                backup: self.backup.display().to_string(),
            });
        }
        if latin1::read(&self.primary)?.contains(&self.marker()) {
            return Err(Error::UnsafeOverwrite {
                primary: self.primary.display().to_string(),
                backup: self.backup.display().to_string(),
            });
        }
        Ok(Origin::FirstRun)
    }

    /// Make sure the backup exists, moving the header there on the first run.
    pub fn resolve_source(&self) -> Result<Origin, Error> {
        let origin = self.locate()?;
        if origin == Origin::FirstRun {
            log::info!("first run detected, renaming {} -> {}",
                       self.primary.display(), self.backup.display());
            std::fs::rename(&self.primary, &self.backup)?;
        }
        Ok(origin)
    }

    /// Full contents of the generated header: the banner, then the converted lines.
    pub fn render(&self, conversion: &Conversion) -> String {
        let banner = self.banner();
        let text = banner.iter().map(String::as_str)
            .chain(conversion.lines.iter().map(|line| &**line))
            .join("\n");
        text + "\n"
    }

    /// Convert the original header, (re)writing the primary header.
    pub fn convert(&self) -> Result<Report, Error> {
        let origin = self.resolve_source()?;
        let original = latin1::read(&self.backup)?;
        let lines = split_lines(&original);
        let conversion = convert_lines(&lines);
        latin1::write(&self.primary, &self.render(&conversion))?;
        log::info!("converted {} -> {}", self.backup.display(), self.primary.display());
        Ok(Report { origin, registers: conversion.registers, rewritten: conversion.rewritten })
    }

    /// Produce what [`HeaderFiles::convert`] would write, leaving both files as they are.
    pub fn preview(&self) -> Result<String, Error> {
        let source = match self.locate()? {
            Origin::Backup => &self.backup,
            Origin::FirstRun => &self.primary,
        };
        let original = latin1::read(source)?;
        let lines = split_lines(&original);
        Ok(self.render(&convert_lines(&lines)))
    }
}

impl Default for HeaderFiles {
    fn default() -> Self {
        HeaderFiles::new(DEFAULT_HEADER, DEFAULT_BACKUP_SUFFIX)
    }
}
