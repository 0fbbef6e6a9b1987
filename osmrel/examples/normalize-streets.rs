//! Normalizes `addr:street` values read line by line from stdin.
//!
//! Demonstrates
//!
//!  * normalization of street values
//!  * reporting of street types not found in the lookup tables
//!
//! LICENSE
//!
//! The code in this example file is released into the Public Domain.

use osmrel::{normalize_street, Rule};
use std::io::{self, BufRead};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let street = normalize_street(line.trim());
        match street.rule {
            Rule::Unmatched => println!("{} (unmatched)", street.value),
            _ => println!("{}", street.value),
        }
    }
    Ok(())
}
