mod cli;

use clap::Parser;
use cli::Cli;
use log::LevelFilter;
use tabula_core::{BatchOrchestrator, ExtractionPlan, Extractors};
use tabula_parse::LopdfLoader;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Help and version go to stdout and are not failures.
            let code = if err.use_stderr() { 1 } else { 0 };
            let _ = err.print();
            std::process::exit(code);
        }
    };

    init_logger(cli.silent);

    if let Err(code) = run(cli) {
        std::process::exit(code);
    }
}

fn init_logger(silent: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    builder.format_timestamp(None);
    if silent {
        builder.filter_level(LevelFilter::Off);
    }
    builder.init();
}

fn run(cli: Cli) -> Result<(), i32> {
    let silent = cli.silent;
    let plan = ExtractionPlan::build(cli.into_options()).map_err(|e| {
        eprintln!("Error: {e}");
        1
    })?;

    let extractors = Extractors::standard();
    let report = BatchOrchestrator::new(&plan, &LopdfLoader, &extractors)
        .run()
        .map_err(|e| {
            eprintln!("Error: {e}");
            1
        })?;

    if plan.is_batch() {
        if !report.is_success() && !silent {
            eprintln!(
                "{} of {} file(s) failed:",
                report.failure_count(),
                report.outcomes.len()
            );
            for outcome in report.failures() {
                eprintln!("  {}", outcome.item.input.display());
            }
        }
        return Ok(());
    }

    match report.failures().next() {
        Some(outcome) => {
            if let Err(e) = &outcome.result {
                eprintln!("Error: {e}");
            }
            Err(1)
        }
        None => Ok(()),
    }
}
