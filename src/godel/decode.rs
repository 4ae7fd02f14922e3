use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};

use super::error::{GodelError, Result};
use super::registry::{RegistrySnapshot, SnapshotEntry};

/// A symbol recovered from a number, with how often its term divides it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedSymbol {
    pub symbol: String,
    pub prime: u64,
    pub value: u32,
    /// Total power of `prime` in the number.
    pub exponent: u64,
    /// `exponent / value`: how many times the term was multiplied in.
    pub occurrences: u64,
}

/// Recover the distinct symbols of `n`, in first-seen order.
pub fn decode(n: &BigUint, snapshot: &RegistrySnapshot) -> Result<Vec<String>> {
    Ok(decode_occurrences(n, snapshot)?
        .into_iter()
        .map(|d| d.symbol)
        .collect())
}

/// Factor `n` over the snapshot's primes.
///
/// Primes are tried largest first and each one is divided out
/// completely; whatever is left once every known prime has been tried
/// must be 1. The result is ordered by ascending prime, which is the
/// order the symbols were first registered in.
pub fn decode_occurrences(n: &BigUint, snapshot: &RegistrySnapshot) -> Result<Vec<DecodedSymbol>> {
    if n.is_zero() {
        return Err(GodelError::ZeroInput);
    }
    snapshot.validate()?;

    let mut table: Vec<&SnapshotEntry> = snapshot.entries().iter().collect();
    table.sort_unstable_by(|a, b| b.prime.cmp(&a.prime));

    let mut quotient = n.clone();
    let mut found = Vec::new();
    for entry in table {
        if quotient.is_one() {
            break;
        }
        let exponent = divide_out(&mut quotient, entry.prime);
        if exponent == 0 {
            continue;
        }
        let value = u64::from(entry.value);
        if exponent % value != 0 {
            return Err(GodelError::MisalignedExponent {
                symbol: entry.symbol.clone(),
                prime: entry.prime,
                value: entry.value,
                exponent,
            });
        }
        found.push(DecodedSymbol {
            symbol: entry.symbol.clone(),
            prime: entry.prime,
            value: entry.value,
            exponent,
            occurrences: exponent / value,
        });
    }

    if !quotient.is_one() {
        return Err(GodelError::DecodeResidue { residue: quotient });
    }

    found.reverse();
    tracing::debug!(symbols = found.len(), "decoded number");
    Ok(found)
}

/// Divide every factor of `prime` out of `quotient`; returns how many.
fn divide_out(quotient: &mut BigUint, prime: u64) -> u64 {
    let prime = BigUint::from(prime);
    let mut exponent = 0u64;
    loop {
        let (q, r) = quotient.div_rem(&prime);
        if !r.is_zero() {
            return exponent;
        }
        *quotient = q;
        exponent += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(json: &str) -> RegistrySnapshot {
        RegistrySnapshot::from_json(json).unwrap()
    }

    fn const_x_5() -> RegistrySnapshot {
        snapshot(r#"[["const",3,2],["x",5,3],["5",7,4]]"#)
    }

    #[test]
    fn test_decode_const_scenario() {
        let symbols = decode(&BigUint::from(2_701_125u32), &const_x_5()).unwrap();
        assert_eq!(symbols, vec!["const", "x", "5"]);
    }

    #[test]
    fn test_decode_one_is_empty() {
        assert!(decode(&BigUint::one(), &const_x_5()).unwrap().is_empty());
        assert!(decode(&BigUint::one(), &RegistrySnapshot::default())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_decode_zero_rejected() {
        assert!(matches!(
            decode(&BigUint::zero(), &const_x_5()),
            Err(GodelError::ZeroInput)
        ));
    }

    #[test]
    fn test_decode_subset() {
        // x^1 × 5^1 without `const`
        let n = BigUint::from(125u32 * 2401);
        assert_eq!(decode(&n, &const_x_5()).unwrap(), vec!["x", "5"]);
    }

    #[test]
    fn test_decode_residue_reported_whole() {
        let n = BigUint::from(2_701_125u32 * 22);
        match decode(&n, &const_x_5()) {
            Err(GodelError::DecodeResidue { residue }) => assert_eq!(residue, BigUint::from(22u32)),
            other => panic!("expected residue, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_misaligned_exponent() {
        // 3^3, but `const` has value 2.
        match decode(&BigUint::from(27u32), &const_x_5()) {
            Err(GodelError::MisalignedExponent {
                symbol, exponent, ..
            }) => {
                assert_eq!(symbol, "const");
                assert_eq!(exponent, 3);
            }
            other => panic!("expected misaligned exponent, got {:?}", other),
        }
    }

    #[test]
    fn test_occurrences_count_repeats() {
        // const twice, x once.
        let n = BigUint::from(9u32 * 9 * 125);
        let decoded = decode_occurrences(&n, &const_x_5()).unwrap();
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[0].symbol, "const");
        assert_eq!(decoded[0].exponent, 4);
        assert_eq!(decoded[0].occurrences, 2);
        assert_eq!(decoded[1].occurrences, 1);
        // The primary contract reports each symbol once.
        assert_eq!(decode(&n, &const_x_5()).unwrap(), vec!["const", "x"]);
    }

    #[test]
    fn test_order_follows_primes_not_snapshot_order() {
        let shuffled = snapshot(r#"[["5",7,4],["const",3,2],["x",5,3]]"#);
        let symbols = decode(&BigUint::from(2_701_125u32), &shuffled).unwrap();
        assert_eq!(symbols, vec!["const", "x", "5"]);
    }

    #[test]
    fn test_colliding_snapshot_rejected() {
        let bad = snapshot(r#"[["a",3,2],["b",3,3]]"#);
        assert!(matches!(
            decode(&BigUint::from(9u32), &bad),
            Err(GodelError::RegistryCollision { .. })
        ));
    }

    #[test]
    fn test_large_exponents() {
        let snap = snapshot(r#"[["big",1000003,500]]"#);
        let n = BigUint::from(1_000_003u32).pow(1500);
        let decoded = decode_occurrences(&n, &snap).unwrap();
        assert_eq!(decoded[0].occurrences, 3);
    }
}
