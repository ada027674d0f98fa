mod cli;
mod extract_cmd;
mod logging;
mod output;
mod page_range;

use atsmmi::PageOptions;
use clap::Parser;
use cli::Cli;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(code) = run(&cli) {
        std::process::exit(code);
    }
}

fn run(cli: &Cli) -> Result<(), i32> {
    if cli.margin.is_nan() || cli.margin <= 0.0 {
        eprintln!("Error: --margin must be a positive number of points");
        return Err(2);
    }
    let options = PageOptions { margin: cli.margin };

    match &cli.input {
        Some(input) => extract_cmd::run_single(input, cli.pages.as_deref(), cli.format, options),
        None => extract_cmd::run_batch(&cli.dir, cli.format, options),
    }
}
