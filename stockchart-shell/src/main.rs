use avdata::{AvClient, AvConfig};
use dotenv::dotenv;
use log::info;
use std::io;
use std::path::PathBuf;
use stockchart_shell::{run_session, Options, Result};
use structopt::StructOpt;

fn main() -> Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let opt = Opt::from_args();
    let config = AvConfig::new(&opt.apikey).with_base_url(&opt.base_url);
    let client = AvClient::new(config);
    let opts = Options {
        output: opt.output,
        open: !opt.no_open,
    };

    let stdin = io::stdin();
    let outcome = run_session(stdin.lock(), io::stdout(), &client, &opts)?;
    info!("session finished: {:?}", outcome);
    Ok(())
}

#[derive(Debug, StructOpt)]
#[structopt(name = "stockchart", about = "chart closing prices of a stock")]
struct Opt {
    #[structopt(short = "k", long, env = "ALPHAVANTAGE_API_KEY", hide_env_values = true)]
    apikey: String,

    #[structopt(
        short = "u",
        long,
        env = "ALPHAVANTAGE_BASE_URL",
        default_value = "https://www.alphavantage.co/query"
    )]
    base_url: String,

    #[structopt(
        short,
        long,
        help = "specify chart file to write",
        default_value = "stock_chart.svg",
        parse(from_os_str)
    )]
    output: PathBuf,

    #[structopt(long, help = "do not open the chart after saving")]
    no_open: bool,
}
