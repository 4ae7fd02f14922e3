use std::path::PathBuf;

use goquiche::godel::SymbolRegistry;
use goquiche::{read_snapshot, resolve_symbol, write_snapshot};

use super::fail;

pub fn cmd_resolve(symbols: Vec<String>, snapshot: Option<PathBuf>) {
    let registry = match &snapshot {
        Some(path) if path.exists() => {
            let loaded = read_snapshot(path).unwrap_or_else(|e| fail(e));
            SymbolRegistry::from_snapshot(&loaded).unwrap_or_else(|e| fail(e.into()))
        }
        _ => SymbolRegistry::new(),
    };
    let before = registry.len();

    for symbol in &symbols {
        let entry = resolve_symbol(&registry, symbol).unwrap_or_else(|e| fail(e));
        println!("{}\t{}\t{}", entry.symbol, entry.value, entry.prime);
    }

    if let Some(path) = snapshot {
        if registry.len() > before {
            if let Err(err) = write_snapshot(&path, &registry.snapshot()) {
                fail(err);
            }
            eprintln!("Wrote {} new symbol(s) to {}", registry.len() - before, path.display());
        }
    }
}
