use std::env;
use std::process;
use std::sync::Arc;

use netstorage::{ServiceConfig, StaticHeaders, StorageService};

pub fn usage_and_exit(usage: &str) -> ! {
    eprintln!("{usage}");
    process::exit(1);
}

pub struct ArgParser {
    args: Vec<String>,
    usage: &'static str,
}

impl ArgParser {
    pub fn new(usage: &'static str) -> Self {
        let args: Vec<String> = env::args().skip(1).collect();

        if args.iter().any(|a| a == "--help" || a == "-h") {
            println!("{usage}");
            process::exit(0);
        }

        Self { args, usage }
    }

    pub fn take_value(&mut self, names: &[&str]) -> Option<String> {
        let mut i = 0;
        while i < self.args.len() {
            if names.contains(&self.args[i].as_str()) {
                let value = self.args.get(i + 1).cloned();
                if value.is_none() {
                    usage_and_exit(self.usage);
                }
                self.args.drain(i..=i + 1);
                return value;
            }
            i += 1;
        }
        None
    }

    #[allow(dead_code)] // Only some demos take boolean flags.
    pub fn take_flag(&mut self, names: &[&str]) -> bool {
        match self.args.iter().position(|a| names.contains(&a.as_str())) {
            Some(i) => {
                self.args.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn remaining(self) -> Vec<String> {
        self.args
    }
}

/// Connection settings shared by every demo.
pub struct Connection {
    pub host: String,
    pub folder: String,
    pub headers: Vec<(String, String)>,
    pub proxy: Option<String>,
    pub positionals: Vec<String>,
}

/// Parse `--host`, `--folder`, repeated `--header NAME:VALUE` and `--proxy`.
///
/// The headers are sent verbatim with every request, e.g. pre-computed
/// `X-Akamai-ACS-Auth-Data` / `X-Akamai-ACS-Auth-Sign` values.
pub fn connection_from_parser(parser: &mut ArgParser, usage: &'static str) -> Connection {
    let host = parser
        .take_value(&["--host"])
        .unwrap_or_else(|| usage_and_exit(usage));
    let folder = parser
        .take_value(&["--folder", "-f"])
        .unwrap_or_else(|| usage_and_exit(usage));
    let proxy = parser.take_value(&["--proxy"]);

    let mut headers = Vec::new();
    while let Some(header) = parser.take_value(&["--header", "-H"]) {
        match header.split_once(':') {
            Some((name, value)) => headers.push((name.trim().to_string(), value.trim().to_string())),
            None => usage_and_exit(usage),
        }
    }

    Connection {
        host,
        folder,
        headers,
        proxy,
        positionals: Vec::new(),
    }
}

#[allow(dead_code)] // Demos with flags build their own parser.
pub fn parse_connection(usage: &'static str) -> Connection {
    let mut parser = ArgParser::new(usage);
    let mut connection = connection_from_parser(&mut parser, usage);
    connection.positionals = parser.remaining();
    connection
}

impl Connection {
    pub fn connect(&self) -> netstorage::Result<StorageService> {
        let mut config = ServiceConfig::new(self.host.clone(), self.folder.clone());
        config.proxy = self.proxy.clone();
        StorageService::connect(config, Arc::new(StaticHeaders(self.headers.clone())))
    }
}
