use std::path::{Path, PathBuf};
use std::sync::Arc;

use num_bigint::BigUint;
use rayon::prelude::*;

use crate::ast::{Decl, NodeKind};
use crate::config::Config;
use crate::diagnostic::Diagnostic;
use crate::godel::{
    self, aggregate, Encoded, Encoder, GodelError, RegistryEntry, RegistrySnapshot,
    SymbolRegistry, Unsupported,
};
use crate::span::{Span, Spanned};


/// Errors surfaced by the library API and the CLI.
#[derive(Debug, thiserror::Error)]
pub enum QuicheError {
    #[error(transparent)]
    Godel(#[from] GodelError),

    #[error("source has {} error(s)", .0.len())]
    Parse(Vec<Diagnostic>),

    #[error("{0}")]
    Config(Diagnostic),

    #[error("cannot access '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed snapshot '{}': {source}", path.display())]
    Snapshot {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid number {text:?}: {reason}")]
    InvalidNumber { text: String, reason: String },
}

/// Options controlling encoding.
#[derive(Clone, Debug, Default)]
pub struct EncodeOptions {
    /// Encode top-level declarations on the rayon pool. Prime assignment
    /// order then depends on scheduling; the snapshot records it.
    pub parallel: bool,
}

impl EncodeOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            parallel: config.parallel,
        }
    }
}

/// One top-level declaration's contribution.
#[derive(Clone, Debug)]
pub struct DeclEncoding {
    pub kind: NodeKind,
    pub name: Option<String>,
    pub span: Span,
    pub encoded: Encoded,
}

/// A whole program's number with the registry state that decodes it.
#[derive(Clone, Debug)]
pub struct ProgramEncoding {
    pub number: BigUint,
    pub decls: Vec<DeclEncoding>,
    /// Nodes that were skipped, in source order per declaration.
    pub unsupported: Vec<Unsupported>,
    snapshot: RegistrySnapshot,
}

impl ProgramEncoding {
    /// The registry as it stood once every declaration was encoded.
    pub fn snapshot(&self) -> &RegistrySnapshot {
        &self.snapshot
    }

    /// Warnings for skipped nodes.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.unsupported.iter().map(Unsupported::to_diagnostic).collect()
    }
}

/// Encode top-level declarations and multiply them into one number.
pub fn encode_program(
    decls: &[Spanned<Decl>],
    registry: &SymbolRegistry,
    options: &EncodeOptions,
) -> Result<ProgramEncoding, QuicheError> {
    let (encodings, unsupported) = if options.parallel {
        let results = decls
            .par_iter()
            .map(|decl| -> Result<_, GodelError> {
                let mut encoder = Encoder::new(registry);
                let encoded = encoder.encode_decl(decl)?;
                Ok((encoded, encoder.into_unsupported()))
            })
            .collect::<Result<Vec<_>, GodelError>>()?;
        let mut encodings = Vec::with_capacity(results.len());
        let mut unsupported = Vec::new();
        for (encoded, skipped) in results {
            encodings.push(encoded);
            unsupported.extend(skipped);
        }
        (encodings, unsupported)
    } else {
        let mut encoder = Encoder::new(registry);
        let encodings = decls
            .iter()
            .map(|decl| encoder.encode_decl(decl))
            .collect::<Result<Vec<_>, GodelError>>()?;
        (encodings, encoder.into_unsupported())
    };

    // Join point: every declaration is done before the product is taken.
    let number = aggregate(&encodings);

    let decls: Vec<DeclEncoding> = decls
        .iter()
        .zip(encodings)
        .map(|(decl, encoded)| DeclEncoding {
            kind: decl.node.kind(),
            name: decl.node.name().map(str::to_string),
            span: decl.span,
            encoded,
        })
        .collect();

    tracing::info!(
        declarations = decls.len(),
        symbols = registry.len(),
        skipped = unsupported.len(),
        bits = number.bits(),
        parallel = options.parallel,
        "encoded program"
    );

    Ok(ProgramEncoding {
        number,
        decls,
        unsupported,
        snapshot: registry.snapshot(),
    })
}

/// Parse Go source and encode it. Parse diagnostics are returned, not
/// rendered.
pub fn encode_source(
    source: &str,
    filename: &str,
    registry: &SymbolRegistry,
    options: &EncodeOptions,
) -> Result<ProgramEncoding, QuicheError> {
    let file = crate::parse_source_silent(source, filename).map_err(QuicheError::Parse)?;
    encode_program(&file.decls, registry, options)
}

/// Recover the distinct symbols of a program number.
pub fn decode_number(n: &BigUint, snapshot: &RegistrySnapshot) -> Result<Vec<String>, QuicheError> {
    Ok(godel::decode(n, snapshot)?)
}

pub fn resolve_symbol(
    registry: &SymbolRegistry,
    text: &str,
) -> Result<Arc<RegistryEntry>, QuicheError> {
    Ok(registry.resolve(text)?)
}

/// Parse a decimal (or `0x` hexadecimal) number; `_` separators and
/// surrounding whitespace are ignored.
pub fn parse_number(text: &str) -> Result<BigUint, QuicheError> {
    let cleaned: String = text.trim().chars().filter(|c| *c != '_').collect();
    let (digits, radix) = match cleaned
        .strip_prefix("0x")
        .or_else(|| cleaned.strip_prefix("0X"))
    {
        Some(hex) => (hex, 16),
        None => (cleaned.as_str(), 10),
    };
    if digits.is_empty() {
        return Err(QuicheError::InvalidNumber {
            text: text.to_string(),
            reason: "no digits".to_string(),
        });
    }
    BigUint::parse_bytes(digits.as_bytes(), radix).ok_or_else(|| QuicheError::InvalidNumber {
        text: text.to_string(),
        reason: format!("not a base-{} natural number", radix),
    })
}

pub fn read_snapshot(path: &Path) -> Result<RegistrySnapshot, QuicheError> {
    let text = std::fs::read_to_string(path).map_err(|source| QuicheError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    RegistrySnapshot::from_json(&text).map_err(|source| QuicheError::Snapshot {
        path: path.to_path_buf(),
        source,
    })
}

/// Write the snapshot as JSON, creating parent directories as needed.
pub fn write_snapshot(path: &Path, snapshot: &RegistrySnapshot) -> Result<(), QuicheError> {
    let io_err = |source| QuicheError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(io_err)?;
    }
    let mut json = snapshot.to_json().map_err(|source| QuicheError::Snapshot {
        path: path.to_path_buf(),
        source,
    })?;
    json.push('\n');
    std::fs::write(path, json).map_err(io_err)?;
    tracing::debug!(path = %path.display(), entries = snapshot.len(), "wrote snapshot");
    Ok(())
}
