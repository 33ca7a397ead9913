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

//! Convert Keil C51 register headers (such as WCH's `CH559.H`) to SDCC syntax, in place.
//!
//! The header is moved to a backup (`CH559.H.ORIGINAL`) the first time, and then regenerated
//! from that backup on every run:
//! 1. an [`AddressTable`] of all `sfr` registers is built;
//! 2. every line is rewritten on its own by a [`Rewriter`] (see [`rewrite`] for the patterns);
//! 3. the result is written back, starting with a marker line that keeps converted headers
//!    from being mistaken for originals.

#![warn(missing_docs)]

pub mod latin1;
pub mod address;
pub mod rewrite;
pub mod files;

#[cfg(feature = "cli")]
pub mod cli;

#[cfg(feature = "cli")]
pub use cli::Cli;

#[cfg(test)]
mod samples;

pub use address::AddressTable;
pub use rewrite::{convert_lines, Conversion, Declaration, Rewriter};
pub use files::{HeaderFiles, Origin, Report};
