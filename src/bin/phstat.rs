use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use pihole_stats::{dashboard, logger, Client, Config};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "phstat",
    about = "Pi-hole dashboard. Needs PIHOLE_HOST and PIHOLE_TOKEN to be set, q quits."
)]
struct Opt {
    /// Update interval in seconds
    #[structopt(short = "n", default_value = "2")]
    interval: u64,

    /// Entries per top panel
    #[structopt(short = "c", default_value = "10")]
    count: u32,

    /// Write logs to this file, nothing is logged otherwise
    #[structopt(long, parse(from_os_str))]
    log_file: Option<PathBuf>,

    /// More logging, repeat for even more
    #[structopt(short, long, parse(from_occurrences))]
    verbose: u8,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let opt = Opt::from_args();

    if let Some(path) = opt.log_file.as_deref() {
        logger::init_file(logger::level(opt.verbose), path)?;
    }

    match dotenv::dotenv() {
        Ok(path) => log::info!("loaded .env from {}", path.display()),
        Err(err) => log::debug!("couldn't load .env file: {:?}", err),
    };

    let config = Config::from_env().context("load configuration")?;
    let client = Client::new(&config)?;

    dashboard::run(
        &client,
        dashboard::Options {
            interval: Duration::from_secs(opt.interval.max(1)),
            count: opt.count,
        },
    )
    .await
}
