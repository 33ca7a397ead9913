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

//! Latin-1 text, so that every byte of a header survives a read-write cycle.

use std::io;
use std::path::Path;

/// Decode bytes as Latin-1. Each byte becomes the code point of the same value, so this never fails.
pub fn decode(bytes: &[u8]) -> String {
    bytes.iter().copied().map(char::from).collect()
}

/// Encode text as Latin-1.
///
/// Text produced by [`decode`] (plus ASCII) always fits; anything above `U+00FF` is written as `?`.
pub fn encode(text: &str) -> Vec<u8> {
    text.chars().map(|c| u8::try_from(c).unwrap_or(b'?')).collect()
}

/// Read a whole file as Latin-1 text.
pub fn read(path: impl AsRef<Path>) -> io::Result<String> {
    std::fs::read(path).map(|bytes| decode(&bytes))
}

/// Write a whole file as Latin-1 text, replacing any previous contents.
pub fn write(path: impl AsRef<Path>, text: &str) -> io::Result<()> {
    std::fs::write(path, encode(text))
}
