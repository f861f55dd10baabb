//! Example: Upload a local file
//!
//! Usage:
//!   cargo run --example upload -- --host HOST --folder /CPCODE [--header NAME:VALUE]... LOCAL REMOTE

mod cli;

use cli::{parse_connection, usage_and_exit};

const USAGE: &str = "Usage: cargo run --example upload -- --host HOST --folder /CPCODE [--header NAME:VALUE]... [--proxy PROXY] <LOCAL> <REMOTE>";

#[tokio::main]
async fn main() -> netstorage::Result<()> {
    let connection = parse_connection(USAGE);
    if connection.positionals.len() != 2 {
        usage_and_exit(USAGE);
    }
    let local = connection.positionals[0].clone();
    let remote = connection.positionals[1].clone();
    let service = connection.connect()?;

    println!("Uploading {} -> {}", local, remote);
    service.upload_file(&remote, &local).await?;
    println!("Done");
    Ok(())
}
