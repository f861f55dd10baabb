//! Example: Print the tree below a directory
//!
//! Usage:
//!   cargo run --example ls -- --host HOST --folder /CPCODE [--header NAME:VALUE]... [--flat] [PATH]

mod cli;

use cli::{ArgParser, connection_from_parser};
use netstorage::{Node, NodeKind};

const USAGE: &str = "Usage: cargo run --example ls -- --host HOST --folder /CPCODE [--header NAME:VALUE]... [--proxy PROXY] [--flat] [PATH]";

#[tokio::main]
async fn main() -> netstorage::Result<()> {
    let mut parser = ArgParser::new(USAGE);
    let connection = connection_from_parser(&mut parser, USAGE);
    let flat = parser.take_flag(&["--flat"]);
    let path = parser.remaining().into_iter().next().unwrap_or_default();

    let service = connection.connect()?;

    if flat {
        let mut listing = service.dir(&path).await?;
        if listing.is_empty() {
            println!("  (empty)");
        }
        while let Some(node) = listing.next_entry().await? {
            println!("  {}", node);
        }
        return Ok(());
    }

    let tree = service.list(&path).await?;
    print_tree(&tree, 0);
    println!(
        "\n{} nodes, {} files",
        tree.node_count(),
        tree.count_files()
    );
    Ok(())
}

fn print_tree(node: &Node, depth: usize) {
    let size = match node.kind() {
        NodeKind::File(info) => format_size(info.size),
        _ => String::new(),
    };
    let name = if node.name().is_empty() { "/" } else { node.name() };
    let marker = if node.is_implicit() { " (implicit)" } else { "" };
    println!("{}{} {}{}", "  ".repeat(depth), name, size, marker);
    for child in node.children() {
        print_tree(&child, depth + 1);
    }
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{}B", bytes)
    } else if bytes < 1_048_576 {
        format!("{:.1}KB", bytes as f64 / 1024.0)
    } else if bytes < 1_073_741_824 {
        format!("{:.1}MB", bytes as f64 / 1_048_576.0)
    } else {
        format!("{:.2}GB", bytes as f64 / 1_073_741_824.0)
    }
}
