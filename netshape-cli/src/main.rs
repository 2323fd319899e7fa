//! Entry point for the `netshape` command-line tool.
#![forbid(unsafe_code)]

fn main() {
    if let Err(err) = netshape_cli::run() {
        eprintln!("netshape: {err}");
        std::process::exit(1);
    }
}
