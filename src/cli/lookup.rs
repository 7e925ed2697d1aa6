use anyhow::Result;
use clap::Args;

use super::Session;
use crate::client::LookupRequest;
use crate::status;

/// Arguments shared by `search` and `hash`.
#[derive(Args)]
pub struct LookupArgs {
    /// Search terms (emails, usernames, hashes, passwords, ...)
    #[arg(required = true)]
    pub terms: Vec<String>,

    /// Data types: email, username, lastip, password, hash, name, _domain
    #[arg(long, num_args = 1.., required = true)]
    pub types: Vec<String>,

    /// Enable wildcard search
    #[arg(long)]
    pub wildcard: bool,

    /// Group results by (db, false, or a column name) [default: db]
    #[arg(long)]
    pub group_by: Option<String>,

    /// Limit to specific tables
    #[arg(long, num_args = 1..)]
    pub tables: Option<Vec<String>>,
}

impl LookupArgs {
    pub fn to_request(&self, default_group_by: &str) -> LookupRequest {
        LookupRequest::new(self.terms.clone(), self.types.clone())
            .wildcard(self.wildcard)
            .group_by(self.group_by.as_deref().unwrap_or(default_group_by))
            .tables(self.tables.clone())
    }
}

pub fn run_search(session: &Session, args: LookupArgs) -> Result<()> {
    status!(
        "Searching for: {} | types: {}",
        args.terms.join(", "),
        args.types.join(", ")
    );

    let request = args.to_request(session.config.default_group_by());
    let response = session.client.search(&request);
    session.print(&response)
}

pub fn run_hash(session: &Session, args: LookupArgs) -> Result<()> {
    status!(
        "Looking up: {} | types: {}",
        args.terms.join(", "),
        args.types.join(", ")
    );

    let request = args.to_request(session.config.default_group_by());
    let response = session.client.hash_lookup(&request);
    session.print(&response)
}
