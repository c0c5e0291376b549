//! Example: drive 123pan by path from the command line
//!
//! Every subcommand prints the JSON reply of the matching session operation.
//!
//! Usage:
//!   cargo run --example pan -- [--settings FILE] [--proxy PROXY] COMMAND [ARGS...]

mod cli;

use cli::{connection_from_parser, usage_and_exit, ArgParser};
use panpath::reply::render;
use tracing_subscriber::{fmt, EnvFilter};

const USAGE: &str = "Usage: cargo run --example pan -- [--settings FILE] [--proxy PROXY] COMMAND
Commands:
  login [USERNAME PASSWORD]
  list
  list-folder PATH
  parsing PATH
  share PATH
  upload LOCAL_PATH [REMOTE_PATH]
  delete PATH
  delete-folder PATH
  create-folder PARENT_PATH NAME
  reload";

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("panpath=debug"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn positional(rest: &[String], i: usize) -> &str {
    rest.get(i)
        .map(String::as_str)
        .unwrap_or_else(|| usage_and_exit(USAGE))
}

#[tokio::main]
async fn main() {
    init_tracing();
    let mut parser = ArgParser::new(USAGE);
    let connection = connection_from_parser(&mut parser);
    let args = parser.remaining();
    let Some((command, rest)) = args.split_first() else {
        usage_and_exit(USAGE);
    };
    let arg = |i: usize| positional(rest, i);

    let session = connection.open();
    let reply = match command.as_str() {
        "login" => render(
            session
                .login(
                    rest.first().map(String::as_str),
                    rest.get(1).map(String::as_str),
                )
                .await,
        ),
        "list" => render(session.list().await),
        "list-folder" => render(session.list_folder(arg(0)).await),
        "parsing" => render(session.parsing(arg(0)).await),
        "share" => render(session.share(arg(0)).await),
        "upload" => {
            let remote = rest.get(1).map(String::as_str).unwrap_or("/");
            render(session.upload(arg(0), remote).await)
        }
        "delete" => render(session.delete(arg(0)).await),
        "delete-folder" => render(session.delete_folder(arg(0)).await),
        "create-folder" => render(session.create_folder(arg(0), arg(1)).await),
        "reload" => render(session.reload_session().await),
        _ => usage_and_exit(USAGE),
    };
    session.shutdown().await;

    match serde_json::to_string_pretty(&reply) {
        Ok(text) => println!("{}", text),
        Err(e) => {
            eprintln!("Failed to format reply: {}", e);
            std::process::exit(1);
        }
    }
}
