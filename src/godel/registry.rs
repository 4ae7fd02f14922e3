use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use super::error::{GodelError, Result};
use super::generator::{is_prime, PrimeValueGenerator};

/// One symbol's assignment. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegistryEntry {
    pub symbol: String,
    pub value: u32,
    pub prime: u64,
    /// `prime^value`
    pub term: BigUint,
}

impl RegistryEntry {
    pub fn new(symbol: String, prime: u64, value: u32) -> Self {
        let term = BigUint::from(prime).pow(value);
        Self {
            symbol,
            value,
            prime,
            term,
        }
    }
}

struct RegistryState {
    generator: PrimeValueGenerator,
    by_symbol: HashMap<String, Arc<RegistryEntry>>,
    by_prime: HashMap<u64, Arc<RegistryEntry>>,
    by_value: HashMap<u32, Arc<RegistryEntry>>,
    order: Vec<Arc<RegistryEntry>>,
}

impl RegistryState {
    fn new(generator: PrimeValueGenerator) -> Self {
        Self {
            generator,
            by_symbol: HashMap::new(),
            by_prime: HashMap::new(),
            by_value: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Store `entry` after checking that its prime and value are free.
    fn insert(&mut self, entry: RegistryEntry) -> Result<Arc<RegistryEntry>> {
        let owner = self
            .by_symbol
            .get(&entry.symbol)
            .or_else(|| self.by_prime.get(&entry.prime))
            .or_else(|| self.by_value.get(&entry.value));
        if let Some(existing) = owner {
            return Err(GodelError::RegistryCollision {
                symbol: entry.symbol,
                existing: existing.symbol.clone(),
                prime: entry.prime,
                value: entry.value,
            });
        }

        let entry = Arc::new(entry);
        self.by_symbol
            .insert(entry.symbol.clone(), Arc::clone(&entry));
        self.by_prime.insert(entry.prime, Arc::clone(&entry));
        self.by_value.insert(entry.value, Arc::clone(&entry));
        self.order.push(Arc::clone(&entry));
        Ok(entry)
    }
}

/// Maps each distinct symbol to a unique prime and a unique value.
///
/// Assignment happens once per symbol; later lookups return the same
/// entry. One mutex guards the generator and the maps together, so the
/// registry can be shared between encoding workers.
pub struct SymbolRegistry {
    state: Mutex<RegistryState>,
}

impl Default for SymbolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SymbolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymbolRegistry")
            .field("len", &self.len())
            .finish()
    }
}

impl SymbolRegistry {
    pub fn new() -> Self {
        Self::with_generator(PrimeValueGenerator::new())
    }

    pub fn with_generator(generator: PrimeValueGenerator) -> Self {
        Self {
            state: Mutex::new(RegistryState::new(generator)),
        }
    }

    /// Rebuild a registry from a snapshot with the default generator.
    pub fn from_snapshot(snapshot: &RegistrySnapshot) -> Result<Self> {
        Self::restore(snapshot, PrimeValueGenerator::new())
    }

    /// Rebuild a registry from a snapshot; `generator` resumes strictly
    /// after the largest prime and value in it.
    pub fn restore(snapshot: &RegistrySnapshot, generator: PrimeValueGenerator) -> Result<Self> {
        snapshot.validate()?;
        let mut state = RegistryState::new(generator);
        for entry in snapshot.entries() {
            state.insert(RegistryEntry::new(
                entry.symbol.clone(),
                entry.prime,
                entry.value,
            ))?;
        }
        if let (Some(prime), Some(value)) = (snapshot.max_prime(), snapshot.max_value()) {
            state.generator.resume_after(prime, value);
        }
        Ok(Self {
            state: Mutex::new(state),
        })
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        // Entries are only published after a complete insert, so a
        // poisoned lock still guards consistent maps.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return the symbol's entry, assigning the next prime and value on
    /// first sight.
    pub fn resolve(&self, symbol: &str) -> Result<Arc<RegistryEntry>> {
        let mut state = self.lock();
        if let Some(entry) = state.by_symbol.get(symbol) {
            return Ok(Arc::clone(entry));
        }

        let value = state.generator.next_value()?;
        let prime = state.generator.next_prime()?;
        let entry = state.insert(RegistryEntry::new(symbol.to_string(), prime, value))?;

        tracing::debug!(
            symbol = %entry.symbol,
            prime = entry.prime,
            value = entry.value,
            term_bits = entry.term.bits(),
            "assigned symbol"
        );
        Ok(entry)
    }

    /// Resolve `<operand><operator>` (e.g. `i++`) as one symbol.
    pub fn register_compound(&self, operand: &str, operator: &str) -> Result<Arc<RegistryEntry>> {
        self.resolve(&format!("{}{}", operand, operator))
    }

    pub fn get(&self, symbol: &str) -> Option<Arc<RegistryEntry>> {
        self.lock().by_symbol.get(symbol).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().order.is_empty()
    }

    /// All entries in assignment order.
    pub fn entries(&self) -> Vec<Arc<RegistryEntry>> {
        self.lock().order.clone()
    }

    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot::from_entries(
            self.lock()
                .order
                .iter()
                .map(|e| SnapshotEntry {
                    symbol: e.symbol.clone(),
                    prime: e.prime,
                    value: e.value,
                })
                .collect(),
        )
    }

    /// Forget every assignment and restart the generator from its seed.
    pub fn reset(&self) {
        let mut state = self.lock();
        let mut generator = state.generator.clone();
        generator.reset();
        *state = RegistryState::new(generator);
    }
}

// ─── Snapshot ──────────────────────────────────────────────────────

/// One `(symbol, prime, value)` triple; serialized as a JSON array.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, u64, u32)", into = "(String, u64, u32)")]
pub struct SnapshotEntry {
    pub symbol: String,
    pub prime: u64,
    pub value: u32,
}

impl From<(String, u64, u32)> for SnapshotEntry {
    fn from((symbol, prime, value): (String, u64, u32)) -> Self {
        Self {
            symbol,
            prime,
            value,
        }
    }
}

impl From<SnapshotEntry> for (String, u64, u32) {
    fn from(entry: SnapshotEntry) -> Self {
        (entry.symbol, entry.prime, entry.value)
    }
}

impl SnapshotEntry {
    /// Recompute `prime^value`; terms are never persisted.
    pub fn term(&self) -> BigUint {
        BigUint::from(self.prime).pow(self.value)
    }
}

/// The registry's assignments in order, detached from any lock.
///
/// JSON form: `[["const",3,2],["x",5,3],["5",7,4]]`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegistrySnapshot {
    entries: Vec<SnapshotEntry>,
}

impl RegistrySnapshot {
    pub fn from_entries(entries: Vec<SnapshotEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[SnapshotEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, symbol: &str) -> Option<&SnapshotEntry> {
        self.entries.iter().find(|e| e.symbol == symbol)
    }

    pub fn max_prime(&self) -> Option<u64> {
        self.entries.iter().map(|e| e.prime).max()
    }

    pub fn max_value(&self) -> Option<u32> {
        self.entries.iter().map(|e| e.value).max()
    }

    /// Every symbol, prime and value must be unique, every prime must be
    /// prime and every value at least 2.
    pub fn validate(&self) -> Result<()> {
        let mut symbols: HashMap<&str, &SnapshotEntry> = HashMap::new();
        let mut primes: HashMap<u64, &SnapshotEntry> = HashMap::new();
        let mut values: HashMap<u32, &SnapshotEntry> = HashMap::new();

        for entry in &self.entries {
            if !is_prime(entry.prime) {
                return Err(GodelError::InvalidSnapshot(format!(
                    "`{}` is assigned {}, which is not prime",
                    entry.symbol, entry.prime
                )));
            }
            if entry.value < 2 {
                return Err(GodelError::InvalidSnapshot(format!(
                    "`{}` has value {}; values start at 2",
                    entry.symbol, entry.value
                )));
            }
            let owner = symbols
                .get(entry.symbol.as_str())
                .or_else(|| primes.get(&entry.prime))
                .or_else(|| values.get(&entry.value));
            if let Some(existing) = owner {
                return Err(GodelError::RegistryCollision {
                    symbol: entry.symbol.clone(),
                    existing: existing.symbol.clone(),
                    prime: entry.prime,
                    value: entry.value,
                });
            }
            symbols.insert(&entry.symbol, entry);
            primes.insert(entry.prime, entry);
            values.insert(entry.value, entry);
        }
        Ok(())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}
