use std::io::Read;
use std::path::PathBuf;

use goquiche::godel::decode_occurrences;
use goquiche::{decode_number, parse_number, read_snapshot, QuicheError};

use super::fail;

pub fn cmd_decode(number: String, snapshot: PathBuf, occurrences: bool) {
    let text = if number == "-" {
        let mut buf = String::new();
        if let Err(source) = std::io::stdin().read_to_string(&mut buf) {
            fail(QuicheError::Io {
                path: PathBuf::from("<stdin>"),
                source,
            });
        }
        buf
    } else {
        number
    };

    let n = parse_number(&text).unwrap_or_else(|e| fail(e));
    let snapshot = read_snapshot(&snapshot).unwrap_or_else(|e| fail(e));

    if occurrences {
        let decoded = decode_occurrences(&n, &snapshot).unwrap_or_else(|e| fail(e.into()));
        for symbol in decoded {
            println!("{}\t{}", symbol.symbol, symbol.occurrences);
        }
    } else {
        for symbol in decode_number(&n, &snapshot).unwrap_or_else(|e| fail(e)) {
            println!("{}", symbol);
        }
    }
}
