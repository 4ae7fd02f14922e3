pub mod decode;
pub mod encode;
pub mod resolve;

use std::path::Path;
use std::process;

use goquiche::config::Config;
use goquiche::QuicheError;

/// Print the error and exit with status 1.
pub fn fail(err: QuicheError) -> ! {
    eprintln!("error: {}", err);
    process::exit(1);
}

/// Load and parse a .go file, exiting on error. Parse diagnostics are
/// rendered against the source.
pub fn load_and_parse(path: &Path) -> (String, goquiche::ast::File) {
    let source = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: cannot read '{}': {}", path.display(), e);
            process::exit(1);
        }
    };
    let filename = path.to_string_lossy().to_string();
    match goquiche::parse_source(&source, &filename) {
        Ok(file) => (source, file),
        Err(_) => {
            eprintln!("error: parse errors in '{}'", path.display());
            process::exit(1);
        }
    }
}

/// The quiche.toml governing `input`, or defaults.
pub fn load_config(input: &Path) -> Config {
    match Config::discover(input) {
        Ok(config) => config,
        Err(diag) => fail(QuicheError::Config(diag)),
    }
}
