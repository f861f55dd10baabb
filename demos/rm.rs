mod cli;

use cli::{ArgParser, connection_from_parser, usage_and_exit};

const USAGE: &str = "Usage: cargo run --example rm -- --host HOST --folder /CPCODE [--header NAME:VALUE]... [--proxy PROXY] [--quick] <PATH>";

#[tokio::main]
async fn main() -> netstorage::Result<()> {
    let mut parser = ArgParser::new(USAGE);
    let connection = connection_from_parser(&mut parser, USAGE);
    let quick = parser.take_flag(&["--quick"]);
    let positionals = parser.remaining();
    if positionals.len() != 1 {
        usage_and_exit(USAGE);
    }
    let target = positionals[0].clone();
    let service = connection.connect()?;

    if quick {
        println!("Requesting server side delete of: {}", target);
        let accepted = service.quick_delete(&target).await?;
        println!("Accepted: {}", accepted);
        return Ok(());
    }

    println!("Removing: {}", target);
    match service.delete_recursive(&target).await {
        Ok(()) => println!("Removed successfully!"),
        Err(e) => eprintln!("Failed to remove: {}", e),
    }
    Ok(())
}
