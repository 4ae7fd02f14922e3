use num_bigint::BigUint;

use crate::ast::NodeKind;
use crate::span::Span;

/// Result type for the encoding core.
pub type Result<T> = std::result::Result<T, GodelError>;

/// Errors raised while assigning, encoding or decoding Gödel numbers.
///
/// Unsupported node kinds are not errors: the encoder records them and
/// moves on (see [`super::Unsupported`]).
#[derive(Debug, thiserror::Error)]
pub enum GodelError {
    #[error("malformed {kind} at {}..{}: {reason}", span.start, span.end)]
    MalformedNode {
        kind: NodeKind,
        reason: String,
        span: Span,
    },

    #[error(
        "registry collision: `{symbol}` would take prime {prime} / value {value}, \
         already owned by `{existing}`"
    )]
    RegistryCollision {
        symbol: String,
        existing: String,
        prime: u64,
        value: u32,
    },

    #[error("number does not factor over the registry: residue {residue} remains")]
    DecodeResidue { residue: BigUint },

    #[error(
        "prime {prime} (`{symbol}`) divides with exponent {exponent}, \
         which is not a multiple of its value {value}"
    )]
    MisalignedExponent {
        symbol: String,
        prime: u64,
        value: u32,
        exponent: u64,
    },

    #[error("cannot decode zero: it is divisible by every prime")]
    ZeroInput,

    #[error("generator exhausted: no {0} left in range")]
    GeneratorExhausted(&'static str),

    #[error("invalid generator seed: {0}")]
    InvalidSeed(String),

    #[error("invalid registry snapshot: {0}")]
    InvalidSnapshot(String),
}
