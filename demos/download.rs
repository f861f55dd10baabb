//! Example: Download a file
//!
//! Usage:
//!   cargo run --example download -- --host HOST --folder /CPCODE [--header NAME:VALUE]... REMOTE LOCAL

mod cli;

use cli::{parse_connection, usage_and_exit};

const USAGE: &str = "Usage: cargo run --example download -- --host HOST --folder /CPCODE [--header NAME:VALUE]... [--proxy PROXY] <REMOTE> <LOCAL>";

#[tokio::main]
async fn main() -> netstorage::Result<()> {
    let connection = parse_connection(USAGE);
    if connection.positionals.len() != 2 {
        usage_and_exit(USAGE);
    }
    let remote = connection.positionals[0].clone();
    let local = connection.positionals[1].clone();
    let service = connection.connect()?;

    let written = service.download_to_file(&remote, &local).await?;
    println!("Saved {} bytes to {}", written, local);
    Ok(())
}
