use clap::Parser;
use fix_photos::args::{Args, RollContext};
use fix_photos::metadata::ExifToolWriter;
use fix_photos::processor::{Processor, EXIT_FAILURE};
use tracing_subscriber::EnvFilter;

fn main() {
    init_logging();

    match run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(EXIT_FAILURE);
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> anyhow::Result<i32> {
    // Parse and validate command line arguments before touching the disk
    let ctx = RollContext::from_args(Args::parse())?;

    let writer = ExifToolWriter::new()?;
    let mut processor = Processor::new(ctx, writer);

    let report = processor.run()?;
    report.print_summary();

    Ok(report.exit_code())
}
