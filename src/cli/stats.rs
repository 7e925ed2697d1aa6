use anyhow::Result;

use super::Session;
use crate::format;
use crate::output::OutputFormat;
use crate::status;

pub fn run(session: &Session) -> Result<()> {
    status!("Fetching database statistics...");

    let response = session.client.stats();
    match session.format {
        OutputFormat::Json => println!("{}", format::format_json(&response)?),
        OutputFormat::Plain | OutputFormat::Table => println!("{}", format::format_stats(&response)),
    }

    Ok(())
}
