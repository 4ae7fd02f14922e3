use super::error::{GodelError, Result};

/// Miller–Rabin witnesses that are exact for every `u64`: the first
/// twelve primes.
const WITNESSES: [u64; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

/// Source of strictly increasing primes and strictly increasing values,
/// one of each per newly registered symbol.
#[derive(Clone, Debug)]
pub struct PrimeValueGenerator {
    prime_floor: u64,
    first_value: u32,
    /// Smallest number not yet examined for the next prime; `None` once
    /// the search has run off the end of `u64`.
    prime_cursor: Option<u64>,
    value_cursor: Option<u32>,
}

impl Default for PrimeValueGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl PrimeValueGenerator {
    pub const DEFAULT_PRIME_FLOOR: u64 = 3;
    pub const DEFAULT_FIRST_VALUE: u32 = 2;

    /// First prime 3, first value 2.
    pub fn new() -> Self {
        Self::from_seed(Self::DEFAULT_PRIME_FLOOR, Self::DEFAULT_FIRST_VALUE)
    }

    /// The first prime handed out is the smallest prime `>= prime_floor`.
    pub fn seeded(prime_floor: u64, first_value: u32) -> Result<Self> {
        if first_value < 2 {
            return Err(GodelError::InvalidSeed(format!(
                "first value must be at least 2, got {}",
                first_value
            )));
        }
        Ok(Self::from_seed(prime_floor, first_value))
    }

    fn from_seed(prime_floor: u64, first_value: u32) -> Self {
        Self {
            prime_floor,
            first_value,
            prime_cursor: Some(prime_floor),
            value_cursor: Some(first_value),
        }
    }

    /// The seed this generator was built with: `(prime_floor, first_value)`.
    pub fn seed(&self) -> (u64, u32) {
        (self.prime_floor, self.first_value)
    }

    pub fn next_value(&mut self) -> Result<u32> {
        let value = self
            .value_cursor
            .ok_or(GodelError::GeneratorExhausted("values"))?;
        self.value_cursor = value.checked_add(1);
        Ok(value)
    }

    pub fn next_prime(&mut self) -> Result<u64> {
        let mut candidate = self
            .prime_cursor
            .ok_or(GodelError::GeneratorExhausted("primes"))?;
        loop {
            if is_prime(candidate) {
                self.prime_cursor = candidate.checked_add(1);
                return Ok(candidate);
            }
            candidate = match candidate.checked_add(1) {
                Some(next) => next,
                None => {
                    self.prime_cursor = None;
                    return Err(GodelError::GeneratorExhausted("primes"));
                }
            };
        }
    }

    /// Continue strictly after an existing assignment, e.g. one loaded
    /// from a snapshot. Never moves the generator backwards.
    pub fn resume_after(&mut self, max_prime: u64, max_value: u32) {
        if let Some(cursor) = self.prime_cursor {
            if max_prime >= cursor {
                self.prime_cursor = max_prime.checked_add(1);
            }
        }
        if let Some(cursor) = self.value_cursor {
            if max_value >= cursor {
                self.value_cursor = max_value.checked_add(1);
            }
        }
    }

    /// Restart from the original seed.
    pub fn reset(&mut self) {
        *self = Self::from_seed(self.prime_floor, self.first_value);
    }
}

/// Deterministic primality test, exact over the whole `u64` range.
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    for &p in &WITNESSES {
        if n % p == 0 {
            return n == p;
        }
    }

    let mut d = n - 1;
    let mut s = 0u32;
    while d % 2 == 0 {
        d /= 2;
        s += 1;
    }

    'witness: for &a in &WITNESSES {
        let mut x = pow_mod(a, d, n);
        if x == 1 || x == n - 1 {
            continue;
        }
        for _ in 1..s {
            x = mul_mod(x, x, n);
            if x == n - 1 {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

fn mul_mod(a: u64, b: u64, m: u64) -> u64 {
    ((a as u128 * b as u128) % m as u128) as u64
}

fn pow_mod(mut base: u64, mut exp: u64, m: u64) -> u64 {
    let mut acc = 1u64;
    base %= m;
    while exp > 0 {
        if exp & 1 == 1 {
            acc = mul_mod(acc, base, m);
        }
        base = mul_mod(base, base, m);
        exp >>= 1;
    }
    acc
}
