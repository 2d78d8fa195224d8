// src/main.rs

use sniffer::errors::Outcome;
use sniffer::{cli, logging, run};

#[tokio::main]
async fn main() {
    let outcome = Outcome::of(&run_main().await);
    let code = outcome.exit_code();
    if let Some(line) = outcome.message() {
        if code == 0 {
            println!("{line}");
        } else {
            eprintln!("{line}");
        }
    }
    if code != 0 {
        std::process::exit(code);
    }
}

async fn run_main() -> anyhow::Result<()> {
    let args = cli::parse();
    logging::init_logging(args.effective_log_level())?;
    run(args).await
}
