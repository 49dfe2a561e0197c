use crate::commands::{init_logging, LedgerFile};
use crate::epoch_processor::burned_value;
use crate::EpochProcessor;
use clap::{Arg, ArgMatches, Command};
use std::error::Error;
use std::path::PathBuf;

struct ReplayCliOptions {
    ledger: PathBuf,
    verbose: bool,
}

impl ReplayCliOptions {
    pub fn parse(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            ledger: matches
                .value_of("ledger")
                .map(PathBuf::from)
                .ok_or("Missing ledger file")?,
            verbose: matches.is_present("verbose"),
        })
    }
}

pub fn replay_command() -> Command<'static> {
    Command::new("replay")
        .version("0.1")
        .about("Runs every epoch of the ledger file and prints the resulting utxo pool.")
        .arg(
            Arg::new("ledger")
                .short('l')
                .long("ledger")
                .value_name("FILE")
                .help("JSON file with the genesis outputs and the candidate transactions.")
                .takes_value(true)
                .required(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Logs the reason for every rejected transaction.")
                .takes_value(false),
        )
}

pub fn run_replay_command(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let options = ReplayCliOptions::parse(matches)?;
    init_logging(options.verbose);

    let ledger = LedgerFile::load(&options.ledger)?;
    let genesis_pool = ledger.genesis_pool();
    let mut processor = EpochProcessor::new(&genesis_pool);
    println!(
        "Genesis: {} utxos worth {}",
        genesis_pool.len(),
        genesis_pool.total_value()
    );

    for candidates in &ledger.epochs {
        let num_candidates = candidates.len();
        let accepted = processor.accept_epoch(candidates.clone());
        println!(
            "Epoch {}: accepted {} of {} transactions",
            processor.epoch(),
            accepted.len(),
            num_candidates
        );
        for transaction in &accepted {
            println!("  {}", transaction.id());
        }
    }

    let pool = processor.utxo_pool();
    println!(
        "Unspent outputs: {} worth {} ({} paid in fees)",
        pool.len(),
        pool.total_value(),
        burned_value(&genesis_pool, pool)
    );
    for utxo in pool.all_utxos() {
        println!("  {} {}", utxo, pool.get(&utxo)?);
    }
    println!("Balances:");
    for (recipient, balance) in pool.balances() {
        println!("  {} {}", recipient, balance);
    }
    Ok(())
}
