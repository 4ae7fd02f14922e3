//! Property-based tests for the encoding core.

use std::collections::{HashMap, HashSet};

use num_bigint::BigUint;
use num_traits::One;
use proptest::prelude::*;

use crate::godel::{
    decode, decode_occurrences, is_prime, PrimeValueGenerator, RegistrySnapshot,
    SymbolRegistry,
};

fn trial_division(n: u64) -> bool {
    n >= 2 && (2..).take_while(|d| d * d <= n).all(|d| n % d != 0)
}

// Short identifiers from a small alphabet, so sequences repeat.
fn symbol() -> impl Strategy<Value = String> {
    "[a-e]{1,2}"
}

proptest! {
    #[test]
    fn generator_is_strictly_increasing(
        floor in 0u64..5_000,
        first_value in 2u32..1_000,
        count in 1usize..40,
    ) {
        let mut gen = PrimeValueGenerator::seeded(floor, first_value).unwrap();
        let mut last_prime = None;
        let mut last_value = None;
        for _ in 0..count {
            let prime = gen.next_prime().unwrap();
            let value = gen.next_value().unwrap();
            prop_assert!(is_prime(prime));
            prop_assert!(trial_division(prime));
            prop_assert!(prime >= floor);
            match last_prime {
                // No prime is skipped between consecutive outputs.
                Some(last) => {
                    prop_assert!(prime > last);
                    prop_assert!(((last + 1)..prime).all(|k| !trial_division(k)));
                }
                None => prop_assert!((floor..prime).all(|k| !trial_division(k))),
            }
            if let Some(last) = last_value {
                prop_assert_eq!(value, last + 1);
            }
            last_prime = Some(prime);
            last_value = Some(value);
        }
    }

    #[test]
    fn is_prime_agrees_with_trial_division(n in 0u64..2_000_000) {
        prop_assert_eq!(is_prime(n), trial_division(n));
    }

    #[test]
    fn registry_assigns_unique_primes_and_values(
        symbols in prop::collection::vec(symbol(), 0..60),
    ) {
        let registry = SymbolRegistry::new();
        let mut first = HashMap::new();
        for s in &symbols {
            let entry = registry.resolve(s).unwrap();
            let (prime, value) = *first.entry(s.clone()).or_insert((entry.prime, entry.value));
            // Idempotent: a symbol keeps its first assignment.
            prop_assert_eq!((entry.prime, entry.value), (prime, value));
        }

        let distinct: HashSet<&String> = symbols.iter().collect();
        prop_assert_eq!(registry.len(), distinct.len());

        let entries = registry.entries();
        let primes: HashSet<u64> = entries.iter().map(|e| e.prime).collect();
        let values: HashSet<u32> = entries.iter().map(|e| e.value).collect();
        prop_assert_eq!(primes.len(), entries.len());
        prop_assert_eq!(values.len(), entries.len());
        prop_assert!(registry.snapshot().validate().is_ok());
    }

    #[test]
    fn product_of_terms_round_trips(
        symbols in prop::collection::vec(symbol(), 0..40),
    ) {
        let registry = SymbolRegistry::new();
        let mut n = BigUint::one();
        for s in &symbols {
            n *= &registry.resolve(s).unwrap().term;
        }
        let snapshot = registry.snapshot();

        let mut seen = HashSet::new();
        let expected: Vec<String> = symbols
            .iter()
            .filter(|s| seen.insert(s.as_str()))
            .cloned()
            .collect();
        prop_assert_eq!(decode(&n, &snapshot).unwrap(), expected);

        let counts = decode_occurrences(&n, &snapshot).unwrap();
        for decoded in counts {
            let times = symbols.iter().filter(|s| **s == decoded.symbol).count() as u64;
            prop_assert_eq!(decoded.occurrences, times);
        }
    }

    #[test]
    fn snapshot_json_round_trips(
        symbols in prop::collection::vec(symbol(), 0..30),
    ) {
        let registry = SymbolRegistry::new();
        for s in &symbols {
            registry.resolve(s).unwrap();
        }
        let snapshot = registry.snapshot();
        let json = snapshot.to_json().unwrap();
        let restored = RegistrySnapshot::from_json(&json).unwrap();
        prop_assert_eq!(&restored, &snapshot);

        let rebuilt = SymbolRegistry::from_snapshot(&restored).unwrap();
        let original = registry.entries();
        let again = rebuilt.entries();
        prop_assert_eq!(original.len(), again.len());
        for (a, b) in original.iter().zip(again.iter()) {
            prop_assert_eq!(&a.symbol, &b.symbol);
            prop_assert_eq!(&a.term, &b.term);
        }
    }
}
