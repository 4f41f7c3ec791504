//! Entry point for the `rapy` command-line interface.
#![forbid(unsafe_code)]

fn main() {
    if let Err(err) = rap_cli::run() {
        eprintln!("rapy: {err}");
        std::process::exit(1);
    }
}
