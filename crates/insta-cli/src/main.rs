//! insta: command line front end for insta-web
//!
//! Usage:
//!   insta account <username>          - Account profile
//!   insta feed <kind> <key> [--count] - Media of an account, location or tag
//!   insta --help                      - Show help

mod commands;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, bail};
use commands::Command;
use insta_core::{Config, Pointer};
use insta_web::{PageOptions, WebAgent};
use tracing_subscriber::EnvFilter;

/// Run mode
#[derive(Debug, PartialEq)]
enum RunMode {
    Run(Invocation),
    Help,
    Version,
}

/// Parsed command line
#[derive(Debug, Default, PartialEq)]
struct Invocation {
    command: Option<Command>,
    count: Option<usize>,
    delay: Option<Duration>,
    pointer: Option<Pointer>,
    limit: Option<usize>,
    config_path: Option<PathBuf>,
}

impl Invocation {
    fn page_options(&self) -> PageOptions {
        let mut opts = PageOptions::new().pointer(self.pointer.clone());
        if let Some(count) = self.count {
            opts = opts.count(count);
        }
        if let Some(delay) = self.delay {
            opts = opts.delay(delay);
        }
        if let Some(limit) = self.limit {
            opts = opts.limit(limit);
        }
        opts
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let invocation = match parse_args(std::env::args().skip(1))? {
        RunMode::Help => {
            print_help();
            return Ok(());
        }
        RunMode::Version => {
            println!("insta {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        RunMode::Run(invocation) => invocation,
    };

    // Logs go to stderr so stdout stays valid JSON.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    dotenvy::dotenv().ok();

    let config = match &invocation.config_path {
        Some(path) => Config::from_toml_file(path),
        None => Config::load(),
    }
    .map_err(|e| anyhow::anyhow!("Config error: {}", e))?;

    let Some(command) = invocation.command.clone() else {
        print_help();
        bail!("No command given");
    };

    let agent = WebAgent::new(config).context("Failed to create web agent")?;

    tokio::select! {
        result = commands::run(&agent, command, invocation.page_options()) => {
            let output = result?;
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Interrupted");
        }
    }

    Ok(())
}

/// Parse command line arguments (without the program name)
fn parse_args<I>(args: I) -> anyhow::Result<RunMode>
where
    I: IntoIterator<Item = String>,
{
    let mut invocation = Invocation::default();
    let mut positional = Vec::new();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        let mut value = |flag: &str| {
            args.next()
                .with_context(|| format!("{} requires a value", flag))
        };

        match arg.as_str() {
            "--help" | "-h" => return Ok(RunMode::Help),
            "--version" | "-v" => return Ok(RunMode::Version),
            "--count" | "-n" => {
                invocation.count = Some(value("--count")?.parse().context("--count must be a number")?);
            }
            "--delay" | "-d" => {
                let secs: f64 = value("--delay")?.parse().context("--delay must be seconds")?;
                invocation.delay = Some(Duration::try_from_secs_f64(secs).context("--delay must be non-negative")?);
            }
            "--pointer" | "-p" => invocation.pointer = Some(Pointer::new(value("--pointer")?)),
            "--limit" => {
                invocation.limit = Some(value("--limit")?.parse().context("--limit must be a number")?);
            }
            "--config" | "-c" => invocation.config_path = Some(PathBuf::from(value("--config")?)),
            flag if flag.starts_with('-') => bail!("Unknown option: {}", flag),
            _ => positional.push(arg),
        }
    }

    invocation.command = parse_command(&positional)?;
    Ok(RunMode::Run(invocation))
}

fn parse_command(positional: &[String]) -> anyhow::Result<Option<Command>> {
    let Some((name, rest)) = positional.split_first() else {
        return Ok(None);
    };

    let arg = |index: usize, what: &str| {
        rest.get(index)
            .cloned()
            .with_context(|| format!("'{}' requires {}", name, what))
    };

    let command = match name.as_str() {
        "session" => Command::Session,
        "account" => Command::Account(arg(0, "a username")?),
        "media" => Command::Media(arg(0, "a shortcode")?),
        "location" => Command::Location(
            arg(0, "a location id")?
                .parse()
                .context("Location id must be numeric")?,
        ),
        "tag" => Command::Tag(arg(0, "a tag name")?),
        "feed" => Command::Feed {
            kind: arg(0, "a kind (account, location, tag)")?.parse()?,
            key: arg(1, "a key")?,
        },
        "likes" => Command::Likes(arg(0, "a shortcode")?),
        "comments" => Command::Comments(arg(0, "a shortcode")?),
        other => bail!("Unknown command: {}", other),
    };

    Ok(Some(command))
}

/// Print help message
fn print_help() {
    println!("insta - web client for accounts, media, locations and tags");
    println!();
    println!("Usage:");
    println!("  insta session                      Refresh and print session tokens");
    println!("  insta account <username>           Account profile");
    println!("  insta media <shortcode>            Media details");
    println!("  insta location <id>                Location details");
    println!("  insta tag <name>                   Tag details");
    println!("  insta feed <kind> <key>            Media of an account, location or tag");
    println!("  insta likes <shortcode>            Accounts that liked a media");
    println!("  insta comments <shortcode>         Comments of a media");
    println!();
    println!("Options:");
    println!("  -n, --count <N>      Collect N items (default: one page)");
    println!("  -d, --delay <SECS>   Pause between pages");
    println!("  -p, --pointer <P>    Resume from a pointer");
    println!("      --limit <N>      Items per page");
    println!("  -c, --config <PATH>  Configuration file (default: ./insta-web.toml)");
    println!("  -h, --help           Show this help message");
    println!("  -v, --version        Show version");
    println!();
    println!("Environment Variables:");
    println!("  INSTA_BASE_URL       Site root (default: https://www.instagram.com)");
    println!("  INSTA_USER_AGENT     User-Agent header");
    println!("  INSTA_TIMEOUT_SECS   Request timeout (default: 30)");
    println!("  INSTA_PAGE_LIMIT     Items per page (default: 50)");
    println!("  INSTA_DELAY_MS       Default pause between pages");
    println!("  INSTA_PROXY          HTTP(S) proxy URL");
}
