//! Example: Show an object and the disk usage below it
//!
//! Usage:
//!   cargo run --example stat -- --host HOST --folder /CPCODE [--header NAME:VALUE]... PATH

mod cli;

use cli::{parse_connection, usage_and_exit};
use netstorage::NodeKind;

const USAGE: &str = "Usage: cargo run --example stat -- --host HOST --folder /CPCODE [--header NAME:VALUE]... [--proxy PROXY] <PATH>";

#[tokio::main]
async fn main() -> netstorage::Result<()> {
    let connection = parse_connection(USAGE);
    if connection.positionals.len() != 1 {
        usage_and_exit(USAGE);
    }
    let path = connection.positionals[0].clone();
    let service = connection.connect()?;

    let node = service.stat(&path).await?;
    println!("Path:  {}", node.path());
    match node.kind() {
        NodeKind::File(info) => {
            println!("Type:  file");
            println!("Size:  {} bytes", info.size);
            if let Some(md5) = &info.md5 {
                println!("MD5:   {}", md5);
            }
            println!("Mtime: {}", info.mtime);
        }
        NodeKind::Symlink(info) => {
            println!("Type:  symlink");
            println!("Target: {}", info.target.as_deref().unwrap_or("?"));
        }
        NodeKind::Directory(dir) => {
            println!("Type:  directory");
            if let Some(mtime) = dir.stats().mtime {
                println!("Mtime: {}", mtime);
            }
            let usage = service.du(&path).await?;
            println!("Usage: {} files, {} bytes", usage.files, usage.bytes);
        }
    }
    Ok(())
}
