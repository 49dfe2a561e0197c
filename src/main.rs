use clap::Command;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let matches = Command::new("scroogecoin")
        .about("ScroogeCoin ledger tools.")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(scroogecoin_lib::commands::replay_command())
        .subcommand(scroogecoin_lib::commands::check_command())
        .get_matches();

    if let Some(matches) = matches.subcommand_matches("replay") {
        scroogecoin_lib::commands::run_replay_command(matches)
    } else if let Some(matches) = matches.subcommand_matches("check") {
        scroogecoin_lib::commands::run_check_command(matches)
    } else {
        panic!("Should report help.");
    }
}
