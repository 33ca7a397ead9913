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

//! Addresses of 8-bit special function registers, collected ahead of rewriting.
//!
//! `sbit` declarations name their register (`sbit RS0 = PSW^3;`), while SDCC wants the absolute
//! bit address. The table maps every `sfr NAME = 0xNN;` to its address so the rewriter can
//! compute the latter.

use std::collections::HashMap;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref SFR_ADDRESS: Regex =
        Regex::new(r"^\s*sfr\s+(\w+)\s*=\s*0x([0-9A-Fa-f]+);").unwrap();
}

/// Register name to address, as declared by `sfr` lines.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct AddressTable {
    addresses: HashMap<String, u64>,
}

impl AddressTable {
    /// Scan all the lines once, recording every `sfr` declaration.
    ///
    /// Other lines are ignored. When a name is declared twice, the later declaration wins.
    pub fn build<'a>(lines: impl IntoIterator<Item=&'a str>) -> Self {
        let mut table = AddressTable::default();
        for line in lines {
            if let Some((name, address)) = parse_sfr(line) {
                table.addresses.insert(name.to_string(), address);
            }
        }
        table
    }

    /// Address of the named register, if declared.
    pub fn get(&self, name: &str) -> Option<u64> {
        self.addresses.get(name).copied()
    }

    /// Absolute address of bit `bit` within the named register.
    pub fn bit_address(&self, name: &str, bit: u8) -> Option<u128> {
        self.get(name).map(|base| u128::from(base) + u128::from(bit))
    }

    /// Number of registers recorded.
    pub fn len(&self) -> usize { self.addresses.len() }

    /// Whether no register has been recorded.
    pub fn is_empty(&self) -> bool { self.addresses.is_empty() }
}

impl<'a> FromIterator<&'a str> for AddressTable {
    fn from_iter<I: IntoIterator<Item=&'a str>>(lines: I) -> Self {
        AddressTable::build(lines)
    }
}

/// `sfr NAME = 0xNN;` with optional leading whitespace; anything may follow the semicolon.
fn parse_sfr(line: &str) -> Option<(&str, u64)> {
    let captures = SFR_ADDRESS.captures(line)?;
    let address = u64::from_str_radix(&captures[2], 16).ok()?;
    Some((captures.get(1)?.as_str(), address))
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use super::AddressTable;

    #[test]
    fn test_build() {
        let table = AddressTable::build(indoc! {"
            sfr P0 = 0x80;  // Port 0
              sfr PSW  =  0xd0;
            sfr16 DPTR = 0x82;
            sbit CY = PSW^7;
            // sfr COMMENTED = 0x90;
            sfr NODIGITS = 0x;
        "}.lines());
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("P0"), Some(0x80));
        assert_eq!(table.get("PSW"), Some(0xD0));
        assert_eq!(table.get("DPTR"), None);
        assert_eq!(table.get("COMMENTED"), None);
        assert_eq!(table.get("NODIGITS"), None);
    }

    #[test]
    fn test_last_declaration_wins() {
        let table: AddressTable = ["sfr A = 0x80;", "sfr A = 0x90;"].into_iter().collect();
        assert_eq!(table.get("A"), Some(0x90));
    }

    #[test]
    fn test_bit_address() {
        let table = AddressTable::build(["sfr A = 0x80;"]);
        assert_eq!(table.bit_address("A", 3), Some(0x83));
        assert_eq!(table.bit_address("B", 3), None);
    }

    #[test]
    fn test_wide_literal() {
        let table = AddressTable::build(["sfr WIDE = 0x123456789;"]);
        assert_eq!(table.get("WIDE"), Some(0x1_2345_6789));
        let table = AddressTable::build(["sfr HUGE = 0x10000000000000000;"]);
        assert!(table.is_empty());
    }
}
