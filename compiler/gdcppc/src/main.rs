//! gdcpp command-line entry point.

use gdcppc::{init_tracing, parse_args, run, Command, USAGE};

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let mut config = match parse_args(&args) {
        Ok(Command::Run(config)) => config,
        Ok(Command::Help) => {
            print!("{USAGE}");
            return;
        }
        Ok(Command::Version) => {
            println!("gdcpp {}", env!("CARGO_PKG_VERSION"));
            return;
        }
        Err(e) => {
            eprintln!("error: {e}");
            eprintln!();
            eprint!("{USAGE}");
            std::process::exit(2);
        }
    };

    init_tracing(config.log_level);
    config.load_mapping();

    match run(&config) {
        Ok(summary) => {
            println!(
                "Wrapped {} class(es) from {} header(s) into {} ({} skipped)",
                summary.classes,
                summary.headers,
                config.out_dir.display(),
                summary.skipped
            );
        }
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
