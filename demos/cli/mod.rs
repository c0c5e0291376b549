use std::env;
use std::process;

use panpath::settings::SETTINGS_FILE;
use panpath::{ClientConfig, SessionHandle};

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

    pub fn remaining(self) -> Vec<String> {
        self.args
    }
}

/// Connection options shared by every subcommand.
pub struct Connection {
    pub settings: String,
    pub proxy: Option<String>,
}

pub fn connection_from_parser(parser: &mut ArgParser) -> Connection {
    let settings = parser
        .take_value(&["--settings", "-s"])
        .unwrap_or_else(|| SETTINGS_FILE.to_string());
    let proxy = parser.take_value(&["--proxy"]);
    Connection { settings, proxy }
}

impl Connection {
    pub fn open(&self) -> SessionHandle {
        let mut config = ClientConfig::default();
        if let Some(proxy) = &self.proxy {
            config = config.with_proxy(proxy.clone());
        }
        SessionHandle::open_with_config(config, &self.settings)
    }
}
