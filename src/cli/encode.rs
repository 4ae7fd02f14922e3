use std::path::PathBuf;
use std::process;

use goquiche::diagnostic::{render_diagnostics, Diagnostic};
use goquiche::godel::{GodelError, SymbolRegistry};
use goquiche::{encode_program, write_snapshot, EncodeOptions, QuicheError};

use super::{fail, load_and_parse, load_config};

pub fn cmd_encode(input: PathBuf, snapshot: Option<PathBuf>, parallel: bool, quiet: bool) {
    if !input.extension().is_some_and(|e| e == "go") {
        eprintln!("error: input must be a .go file");
        process::exit(1);
    }

    let config = load_config(&input);
    let generator = config.generator().unwrap_or_else(|e| fail(e.into()));
    let registry = SymbolRegistry::with_generator(generator);
    let mut options = EncodeOptions::from_config(&config);
    options.parallel |= parallel;

    let (source, file) = load_and_parse(&input);
    let filename = input.to_string_lossy().to_string();

    let encoding = match encode_program(&file.decls, &registry, &options) {
        Ok(encoding) => encoding,
        Err(QuicheError::Godel(GodelError::MalformedNode { kind, reason, span })) => {
            Diagnostic::error(format!("malformed {}: {}", kind, reason), span)
                .render(&filename, &source);
            process::exit(1);
        }
        Err(err) => fail(err),
    };

    render_diagnostics(&encoding.diagnostics(), &filename, &source);

    if !quiet {
        eprintln!("{:<24} {:>8} {:>12}", "symbol", "value", "prime");
        for entry in registry.entries() {
            eprintln!("{:<24} {:>8} {:>12}", entry.symbol, entry.value, entry.prime);
        }
    }

    let snapshot_path = snapshot.unwrap_or_else(|| config.snapshot_path_for(&input));
    if let Err(err) = write_snapshot(&snapshot_path, encoding.snapshot()) {
        fail(err);
    }
    if !quiet {
        eprintln!("Wrote {}", snapshot_path.display());
    }

    println!("{}", encoding.number);
}
