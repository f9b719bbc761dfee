mod config;
mod error;
mod ethereum;
mod orchestrator;
mod report;

use anyhow::{Context, Result};
use clap::{Arg, Command};
use config::{CliOverrides, Config};
use ethereum::abi::ContractDescriptor;
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout carries only the report
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let matches = Command::new("bayc-reader")
        .version("0.1.0")
        .about("Read-only queries against an Ethereum node and the BAYC contract")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Path to configuration file"),
        )
        .arg(
            Arg::new("rpc-url")
                .short('r')
                .long("rpc-url")
                .value_name("URL")
                .help("HTTPS JSON-RPC endpoint (overrides INFURA_HTTPS_URI)"),
        )
        .arg(
            Arg::new("wallet")
                .short('w')
                .long("wallet")
                .value_name("ADDRESS")
                .help("Wallet whose balance is reported"),
        )
        .arg(
            Arg::new("token-id")
                .short('t')
                .long("token-id")
                .value_name("ID")
                .value_parser(clap::value_parser!(u64))
                .help("Token id for tokenURI and ownerOf"),
        )
        .arg(
            Arg::new("contract")
                .long("contract")
                .value_name("ADDRESS")
                .help("NFT contract address"),
        )
        .arg(
            Arg::new("label")
                .short('l')
                .long("label")
                .value_name("NAME")
                .help("Prefix for contract report lines (defaults to \"Contract\" with --contract)"),
        )
        .arg(
            Arg::new("generate-config")
                .long("generate-config")
                .help("Generate a sample configuration file and exit")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config-path")
                .long("config-path")
                .help("Print the default configuration file path and exit")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    if matches.get_flag("generate-config") {
        println!("{}", Config::generate_sample());
        return Ok(());
    }

    if matches.get_flag("config-path") {
        match Config::default_config_path() {
            Ok(path) => {
                println!("{}", path.display());
                return Ok(());
            }
            Err(e) => {
                error!("Could not determine default config path: {}", e);
                return Err(e);
            }
        }
    }

    let config_path = matches.get_one::<String>("config").map(|s| s.as_str());
    let mut config = Config::load_or_default(config_path).await;

    config.apply_overrides(CliOverrides {
        rpc_url: matches.get_one::<String>("rpc-url").cloned(),
        wallet: matches.get_one::<String>("wallet").cloned(),
        token_id: matches.get_one::<u64>("token-id").copied(),
        contract: matches.get_one::<String>("contract").cloned(),
        label: matches.get_one::<String>("label").cloned(),
    });

    let descriptor =
        ContractDescriptor::from_config(&config.contract).context("Invalid contract settings")?;

    info!("Connecting to Ethereum provider");
    let orchestrator = orchestrator::establish_connection(&config.provider.rpc_url).await?;

    let stdout = std::io::stdout();
    report::run(&orchestrator, &descriptor, &config.query, &mut stdout.lock()).await?;

    Ok(())
}
