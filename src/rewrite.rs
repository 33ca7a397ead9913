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

//! Line-by-line rewriting of Keil C51 declarations into their SDCC equivalents.
//!
//! This is pattern matching on single lines, not parsing: each line is checked against a fixed
//! list of shapes, and anything else is passed through untouched.
//!
//! | Keil C51                        | SDCC                              |
//! |---------------------------------|-----------------------------------|
//! | `sfr P0 = 0x80;`                | `__sfr __at (0x80) P0;`           |
//! | `sfr16 DPTR = 0x82;`            | `__sfr16 __at (0x8382) DPTR;`     |
//! | `sbit CY = PSW^7;`              | `__sbit __at (0xD7) CY;`          |
//! | `EXTERN UINT8XV X _AT_ 0x2100;` | `extern UINT8XV __at (0x2100) X;` |
//! | `typedef bit BOOL;`             | `typedef __bit BOOL;`             |
//! | `typedef char xdata UINT8X;`    | `typedef char UINT8X;`            |

use std::borrow::Cow;
use std::fmt::{Display, Formatter, Write};
use indoc::indoc;
use lazy_static::lazy_static;
use parse_display::Display;
use regex::{Captures, Regex};

use crate::address::AddressTable;

/// The first line starting with this token is followed by [`SDCC_ALIASES`].
pub const GUARD_TOKEN: &str = "#ifndef";

/// Keil memory qualifiers. SDCC spells them with two leading underscores.
pub const MEMORY_QUALIFIERS: [&str; 5] = ["data", "idata", "xdata", "pdata", "code"];

/// Maps Keil memory qualifiers onto SDCC memory spaces, for code that still uses them outside
/// of `typedef`s.
pub const SDCC_ALIASES: &str = indoc! {"
    #ifdef __SDCC__
    #define data  __data
    #define idata __idata
    #define xdata __xdata
    #define pdata __pdata
    #define code  __code
    #endif"};

lazy_static! {
    static ref BIT_KEYWORD: Regex = Regex::new(r"\bbit\b").unwrap();
    static ref QUALIFIER: Regex = Regex::new(&format!(
        r"\b(?:{})\b", MEMORY_QUALIFIERS.join("|"))).unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref LINE_BREAK: Regex =
        Regex::new(r"\r\n|[\n\r\x0B\x0C\x1C\x1D\x1E\x{85}\x{2028}\x{2029}]").unwrap();
    static ref SFR16: Regex =
        Regex::new(r"^(\s*)sfr16\s+(\w+)\s*=\s*0x([0-9A-Fa-f]+);(.*)$").unwrap();
    static ref SFR: Regex =
        Regex::new(r"^(\s*)sfr\s+(\w+)\s*=\s*0x([0-9A-Fa-f]+);(.*)$").unwrap();
    static ref SBIT: Regex =
        Regex::new(r"^(\s*)sbit\s+(\w+)\s*=\s*(\w+)\s*\^\s*([0-7]);(.*)$").unwrap();
    static ref EXTERN_AT: Regex =
        Regex::new(r"^(\s*)EXTERN\s+(.+?)\s+(\w+)\s+_AT_\s+0x([0-9A-Fa-f]+);(.*)$").unwrap();
}

/// Hexadecimal digits as written in the source, displayed in upper case.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct UpperHex<'a>(pub &'a str);

impl<'a> Display for UpperHex<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.0.chars().try_for_each(|c| f.write_char(c.to_ascii_uppercase()))
    }
}

/// Absolute bit address, displayed as (at least) two hexadecimal digits.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BitAddress(pub u128);

impl Display for BitAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02X}", self.0)
    }
}

/// Address of a 16-bit register pair, displayed as (at least) four hexadecimal digits.
///
/// SDCC expects both byte addresses packed together, high byte first.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct WordAddress(pub u128);

impl WordAddress {
    /// The pair with its low byte at `low` and its high byte right after it.
    ///
    /// No range check: a `low` of `0xFF` simply gives `0x100FF`.
    pub fn from_low_byte(low: u64) -> Self {
        let low = u128::from(low);
        WordAddress(((low + 1) << 8) | low)
    }
}

impl Display for WordAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04X}", self.0)
    }
}

/// Register declarations, as recognised in Keil syntax and displayed in SDCC syntax.
///
/// Every variant keeps the indentation before the declaration and whatever follows its
/// semicolon (usually a comment) verbatim.
#[derive(Debug, Display, Clone, Eq, PartialEq)]
#[allow(missing_docs)]
pub enum Declaration<'a> {
    /// `sfr16 NAME = 0xLL;`
    #[display("{indent}__sfr16 __at (0x{address}) {name};{trailing}")]
    Sfr16 { indent: &'a str, name: &'a str, address: WordAddress, trailing: &'a str },
    /// `sfr NAME = 0xNN;`
    #[display("{indent}__sfr __at (0x{address}) {name};{trailing}")]
    Sfr { indent: &'a str, name: &'a str, address: UpperHex<'a>, trailing: &'a str },
    /// `sbit NAME = REG^k;`, with `REG` found in the [`AddressTable`].
    #[display("{indent}__sbit __at (0x{address}) {name};{trailing}")]
    Sbit { indent: &'a str, name: &'a str, address: BitAddress, trailing: &'a str },
    /// `sbit NAME = REG^k;`, with `REG` unknown: displayed exactly as written.
    #[display("{line}")]
    UnknownBase { line: &'a str },
    /// `EXTERN TYPE NAME _AT_ 0xNNNN;`, where `TYPE` may span several words.
    #[display("{indent}extern {type_text} __at (0x{address}) {name};{trailing}")]
    ExternAt {
        indent: &'a str,
        type_text: &'a str,
        name: &'a str,
        address: UpperHex<'a>,
        trailing: &'a str,
    },
}

fn group<'a>(captures: &Captures<'a>, k: usize) -> &'a str {
    captures.get(k).map_or("", |m| m.as_str())
}

impl<'a> Declaration<'a> {
    /// Try each kind of declaration in turn; the first to match wins.
    pub fn parse(line: &'a str, table: &AddressTable) -> Option<Self> {
        Self::sfr16(line)
            .or_else(|| Self::sfr(line))
            .or_else(|| Self::sbit(line, table))
            .or_else(|| Self::extern_at(line))
    }

    fn sfr16(line: &'a str) -> Option<Self> {
        let captures = SFR16.captures(line)?;
        let low = u64::from_str_radix(group(&captures, 3), 16).ok()?;
        Some(Declaration::Sfr16 {
            indent: group(&captures, 1),
            name: group(&captures, 2),
            address: WordAddress::from_low_byte(low),
            trailing: group(&captures, 4),
        })
    }

    fn sfr(line: &'a str) -> Option<Self> {
        let captures = SFR.captures(line)?;
        Some(Declaration::Sfr {
            indent: group(&captures, 1),
            name: group(&captures, 2),
            address: UpperHex(group(&captures, 3)),
            trailing: group(&captures, 4),
        })
    }

    fn sbit(line: &'a str, table: &AddressTable) -> Option<Self> {
        let captures = SBIT.captures(line)?;
        let bit = group(&captures, 4).parse().ok()?;
        Some(match table.bit_address(group(&captures, 3), bit) {
            Some(address) => Declaration::Sbit {
                indent: group(&captures, 1),
                name: group(&captures, 2),
                address: BitAddress(address),
                trailing: group(&captures, 5),
            },
            None => Declaration::UnknownBase { line },
        })
    }

    fn extern_at(line: &'a str) -> Option<Self> {
        let captures = EXTERN_AT.captures(line)?;
        Some(Declaration::ExternAt {
            indent: group(&captures, 1),
            type_text: group(&captures, 2),
            name: group(&captures, 3),
            address: UpperHex(group(&captures, 4)),
            trailing: group(&captures, 5),
        })
    }
}

/// Rename the Keil `bit` type to `__bit`, wherever it appears as a whole word.
///
/// Lines starting with `//` are left alone. Note that `/* ... */` comments and trailing `//`
/// comments are not exempt.
pub fn rename_bit_keyword(line: &str) -> Cow<str> {
    if line.trim_start().starts_with("//") {
        Cow::Borrowed(line)
    } else {
        BIT_KEYWORD.replace_all(line, "__bit")
    }
}

/// Drop memory qualifiers from a `typedef`, where SDCC does not accept them.
///
/// Whitespace in the code part is normalised, and a trailing `//` comment is kept, separated
/// from the code by a single space. Returns `None` for all other lines.
pub fn strip_typedef_qualifiers(line: &str) -> Option<String> {
    let code = line.trim_start();
    if !code.starts_with("typedef") || !QUALIFIER.is_match(code) { return None; }
    let indent = &line[..line.len() - code.len()];
    let (code, comment) = match code.split_once("//") {
        Some((code, comment)) => (code, Some(comment)),
        None => (code, None),
    };
    let code = QUALIFIER.replace_all(code, "");
    let code = WHITESPACE.replace_all(&code, " ");
    let mut result = format!("{}{}", indent, code.trim_end());
    if let Some(comment) = comment {
        result.push_str(" //");
        result.push_str(comment);
    }
    Some(result)
}

/// State of one rewriting pass.
#[derive(Debug)]
pub struct Rewriter<'t> {
    table: &'t AddressTable,
    aliases_inserted: bool,
    rewritten: usize,
}

impl<'t> Rewriter<'t> {
    /// Start a pass, resolving `sbit`s with the given table.
    pub fn new(table: &'t AddressTable) -> Self {
        Rewriter { table, aliases_inserted: false, rewritten: 0 }
    }

    /// Whether [`SDCC_ALIASES`] has been emitted in this pass.
    pub fn aliases_inserted(&self) -> bool { self.aliases_inserted }

    /// Number of lines changed so far (the alias block not included).
    pub fn rewritten(&self) -> usize { self.rewritten }

    /// Rewrite a single line, appending the resulting line(s) to `out`.
    pub fn rewrite_line<'a>(&mut self, line: &'a str, out: &mut Vec<Cow<'a, str>>) {
        if !self.aliases_inserted && line.starts_with(GUARD_TOKEN) {
            out.push(Cow::Borrowed(line));
            out.push(Cow::Borrowed(""));
            out.extend(SDCC_ALIASES.lines().map(Cow::Borrowed));
            out.push(Cow::Borrowed(""));
            self.aliases_inserted = true;
            return;
        }

        let original = line;
        let line = rename_bit_keyword(line);
        let line = match strip_typedef_qualifiers(&line) {
            Some(stripped) => Cow::Owned(stripped),
            None => line,
        };
        let declaration = Declaration::parse(&line, self.table).map(|d| d.to_string());
        let line = declaration.map_or(line, Cow::Owned);
        if line != original { self.rewritten += 1; }
        out.push(line);
    }
}

/// A header after conversion, with some statistics.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Conversion<'a> {
    /// Converted lines, without line terminators.
    pub lines: Vec<Cow<'a, str>>,
    /// Number of `sfr` registers in the address table.
    pub registers: usize,
    /// Number of input lines that changed.
    pub rewritten: usize,
    /// Whether the alias block was inserted.
    pub aliases_inserted: bool,
}

/// Split text into lines at any line break (`\n`, `\r\n`, a lone `\r`, and the rarer
/// separators such as `\x0C` or `U+0085`), dropping the terminators.
///
/// A final line break does not start another (empty) line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = LINE_BREAK.split(text).collect::<Vec<_>>();
    if lines.last() == Some(&"") { lines.pop(); }
    lines
}

/// Convert a whole header: build the [`AddressTable`], then rewrite every line.
pub fn convert_lines<'a>(lines: &[&'a str]) -> Conversion<'a> {
    let table = AddressTable::build(lines.iter().copied());
    let mut rewriter = Rewriter::new(&table);
    let mut out = Vec::with_capacity(lines.len() + SDCC_ALIASES.lines().count() + 2);
    for line in lines {
        rewriter.rewrite_line(line, &mut out);
    }
    log::debug!("{} registers in the address table, {} lines rewritten",
                table.len(), rewriter.rewritten());
    Conversion {
        lines: out,
        registers: table.len(),
        rewritten: rewriter.rewritten(),
        aliases_inserted: rewriter.aliases_inserted(),
    }
}
