use anyhow::Result;
use clap::Args;

use super::Session;
use crate::status;

#[derive(Args)]
pub struct IpWhoisArgs {
    /// IP addresses to look up
    #[arg(required = true)]
    pub ips: Vec<String>,
}

pub fn run(session: &Session, args: IpWhoisArgs) -> Result<()> {
    status!("Performing IP WHOIS for: {}", args.ips.join(", "));

    let response = session.client.ip_whois(&args.ips);
    session.print(&response)
}
