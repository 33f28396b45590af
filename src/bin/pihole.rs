use anyhow::Context;
use chrono::Local;
use pihole_stats::{logger, view, Client, Config};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "pihole",
    about = "Query a Pi-hole server. Needs PIHOLE_HOST and PIHOLE_TOKEN to be set."
)]
struct Opt {
    /// Number of entries to request for blocked, queries and clients
    #[structopt(short = "n", default_value = "10")]
    count: u32,

    /// More logging, repeat for even more
    #[structopt(short, long, parse(from_occurrences))]
    verbose: u8,

    #[structopt(subcommand)]
    command: Command,
}

#[derive(Debug, StructOpt)]
enum Command {
    /// Statistics of the last 24h
    Summary,
    /// Most blocked domains
    Blocked,
    /// Most queried domains
    Queries,
    /// Clients with the most queries
    Clients,
    /// Backend type (PHP or FTL)
    Type,
    /// API version
    Version,
    /// Enable blocking
    Enable,
    /// Disable blocking, for the given number of seconds if one is given
    Disable { seconds: Option<u64> },
    /// Last blocked domain
    Recent,
    /// Queries and blocked ads per 10 minutes
    Timedata,
    /// Forward destinations
    Fd,
    /// Query types
    Qt,
    /// Every query of the last 24h
    Allqueries,
}

fn print(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}

async fn execute(client: &Client, command: Command, count: u32) -> anyhow::Result<()> {
    match command {
        Command::Summary => print(view::summary(&client.summary_raw().await?)),
        Command::Blocked => print(view::top_blocked(&client.top_items(count).await?.blocked)),
        Command::Queries => print(view::top_queries(&client.top_items(count).await?.queries)),
        Command::Clients => print(view::top_clients(&client.top_clients(count).await?.clients)),
        Command::Type => println!("{}", view::api_type(&client.api_type().await?)),
        Command::Version => println!("{}", view::version(&client.version().await?)),
        Command::Enable => {
            client.enable().await?;
            println!("Pi-hole enabled");
        }
        Command::Disable { seconds: None } => {
            client.disable().await?;
            println!("Pi-hole disabled");
        }
        Command::Disable {
            seconds: Some(seconds),
        } => {
            client.disable_for(seconds).await?;
            println!("Pi-hole disabled for {}s", seconds);
        }
        Command::Recent => println!("{}", view::recent_blocked(&client.recent_blocked().await?)),
        Command::Timedata => {
            let buckets = client
                .time_data()
                .await?
                .buckets()
                .context("parse time data")?;
            print(view::time_data(&buckets, &Local));
        }
        Command::Fd => print(view::forward_destinations(
            &client.forward_destinations().await?.destinations,
        )),
        Command::Qt => print(view::query_types(&client.query_types().await?.types)),
        Command::Allqueries => print(view::queries(&client.queries().await?, &Local)),
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // exits with 0 on -h and with 1 on an unknown subcommand
    let opt = Opt::from_args();

    logger::init(logger::level(opt.verbose)).context("initialize logger")?;

    match dotenv::dotenv() {
        Ok(path) => log::info!("loaded .env from {}", path.display()),
        Err(err) => log::debug!("couldn't load .env file: {:?}", err),
    };

    let config = Config::from_env().context("load configuration")?;
    let client = Client::new(&config)?;

    execute(&client, opt.command, opt.count).await
}
