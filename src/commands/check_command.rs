use crate::commands::{init_logging, LedgerFile};
use clap::{Arg, ArgMatches, Command};
use std::error::Error;
use std::path::PathBuf;

struct CheckCliOptions {
    ledger: PathBuf,
    epoch: usize,
    verbose: bool,
}

impl CheckCliOptions {
    pub fn parse(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            ledger: matches
                .value_of("ledger")
                .map(PathBuf::from)
                .ok_or("Missing ledger file")?,
            epoch: matches.value_of_t::<usize>("epoch")?,
            verbose: matches.is_present("verbose"),
        })
    }
}

pub fn check_command() -> Command<'static> {
    Command::new("check")
        .version("0.1")
        .about("Validates the candidates of one epoch without accepting any of them.")
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
            Arg::new("epoch")
                .short('e')
                .long("epoch")
                .value_name("EPOCH")
                .help("Zero-based epoch to check. All earlier epochs are accepted first.")
                .takes_value(true)
                .required(false)
                .default_value("0"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Logs the reason for every transaction rejected in earlier epochs.")
                .takes_value(false),
        )
}

pub fn run_check_command(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let options = CheckCliOptions::parse(matches)?;
    init_logging(options.verbose);

    let ledger = LedgerFile::load(&options.ledger)?;
    let candidates = ledger.epochs.get(options.epoch).ok_or_else(|| {
        format!(
            "Epoch: {} doesn't exist, the ledger has {} epochs",
            options.epoch,
            ledger.epochs.len()
        )
    })?;
    let processor = ledger.processor_after(options.epoch)?;

    // Each candidate is checked on its own against the pool at the start of the epoch.
    for transaction in candidates {
        match processor.validate(transaction) {
            Ok(()) => println!("{} valid", transaction.id()),
            Err(reason) => println!("{} invalid: {}", transaction.id(), reason),
        }
    }
    Ok(())
}
