//! Lookup Command
//!
//! Fetch the encyclopedia summary the pipeline would attach for one term.
//!
//! Usage:
//!   doclearn lookup <TERM>

use tokio::runtime::Runtime;

use crate::config::ConfigLoader;
use crate::lookup::{SummaryLookup, WikipediaLookup};
use crate::types::{DocError, Result};

pub fn run(term: &str) -> Result<()> {
    let term = term.trim();
    if term.is_empty() {
        return Err(DocError::InvalidInput(
            "Please enter a term to look up.".to_string(),
        ));
    }

    let config = ConfigLoader::load()?;
    let lookup = WikipediaLookup::new(&config.lookup)?;

    let rt = Runtime::new()?;
    let result = rt.block_on(lookup.lookup_summary(term));

    println!("{}", result);
    Ok(())
}
