//! Gödel prime-power encoding of syntax trees.
//!
//! Every distinct symbol gets a unique prime `p` and a unique value `v`;
//! its term is `p^v`. A node's number is the product of its own term and
//! its children's numbers, and a program's number is the product of its
//! declarations' numbers. Unique factorization makes the result
//! decodable against the registry that produced it.

mod aggregate;
mod decode;
mod encode;
mod error;
mod generator;
#[cfg(test)]
mod proptests;
mod registry;

pub use aggregate::{aggregate, Product};
pub use decode::{decode, decode_occurrences, DecodedSymbol};
pub use encode::{Encoded, Encoder, Unsupported};
pub use error::{GodelError, Result};
pub use generator::{is_prime, PrimeValueGenerator};
pub use registry::{RegistryEntry, RegistrySnapshot, SnapshotEntry, SymbolRegistry};
