use std::io;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use keyhit::classifier::ClassifierConfig;
use keyhit::poller::{stdin_poller, PollerConfig};
use signal_hook::consts::{SIGINT, SIGTERM};

mod demo;
mod logging;

fn main() -> io::Result<()> {
    let Some(options) = demo::parse_args(std::env::args().skip(1)) else {
        println!("{}", demo::usage());
        return Ok(());
    };

    let _logging = logging::init();

    // Signals only set the flag, so a call in progress still restores the
    // terminal before the loop notices.
    let stop = Arc::new(AtomicBool::new(false));
    for signal in [SIGINT, SIGTERM] {
        signal_hook::flag::register(signal, Arc::clone(&stop))?;
    }

    let poller = stdin_poller(PollerConfig::from_env());
    let result = demo::run(
        options,
        poller,
        ClassifierConfig::from_env(),
        io::stdout().lock(),
        &stop,
    );
    if let Err(err) = &result {
        tracing::error!(error = %err, "demo failed");
    }
    result
}
