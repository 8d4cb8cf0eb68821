//! Check command implementation.

use anyhow::Result;

use crate::validation::{parse_network, AddressFamily};

/// Families whose feed validator accepts `address`
pub fn accepting_families(address: &str, family: Option<AddressFamily>) -> Vec<AddressFamily> {
    AddressFamily::ALL
        .into_iter()
        .filter(|f| family.map_or(true, |only| only == *f))
        .filter(|f| f.validate(address))
        .collect()
}

/// Run the check command
pub fn run(address: &str, family: Option<AddressFamily>) -> Result<()> {
    let accepted = accepting_families(address, family);

    if accepted.is_empty() {
        anyhow::bail!("{} would be skipped by every feed validator", address);
    }

    for f in &accepted {
        println!("{} is accepted as a {} entry", address, f);
    }

    // The patterns are looser than a real parser; flag entries the router may reject
    match parse_network(address) {
        Some(net) => println!("Parsed network: {}", net),
        None => println!("Warning: {} is not a well-formed network", address),
    }

    Ok(())
}
