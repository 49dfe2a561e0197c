pub mod check_command;
pub mod ledger_file;
pub mod replay_command;

pub use self::{check_command::*, ledger_file::*, replay_command::*};

use tracing::Level;

/// Installs the log subscriber. Debug events, e.g. the reason for every rejected transaction,
/// are printed only when verbose.
fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}
