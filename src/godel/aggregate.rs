use num_bigint::BigUint;
use num_traits::One;

use super::encode::Encoded;

/// Identity-seeded running product. Every encoding accumulator starts
/// here, so an empty product is 1 and never 0.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Product(BigUint);

impl Default for Product {
    fn default() -> Self {
        Self::new()
    }
}

impl Product {
    pub fn new() -> Self {
        Self(BigUint::one())
    }

    pub fn mul_term(&mut self, term: &BigUint) {
        self.0 *= term;
    }

    /// Multiply in a child's encoding; `NoContribution` leaves the
    /// product unchanged.
    pub fn mul_encoded(&mut self, encoded: &Encoded) {
        if let Encoded::Number(n) = encoded {
            self.0 *= n;
        }
    }

    pub fn is_identity(&self) -> bool {
        self.0.is_one()
    }

    pub fn value(&self) -> &BigUint {
        &self.0
    }

    pub fn finish(self) -> BigUint {
        self.0
    }
}

impl<'a> FromIterator<&'a Encoded> for Product {
    fn from_iter<I: IntoIterator<Item = &'a Encoded>>(iter: I) -> Self {
        let mut product = Product::new();
        for encoded in iter {
            product.mul_encoded(encoded);
        }
        product
    }
}

/// The whole-program number: the product of every top-level
/// declaration's encoding, in source order.
pub fn aggregate<'a>(encodings: impl IntoIterator<Item = &'a Encoded>) -> BigUint {
    let product: Product = encodings.into_iter().collect();
    tracing::trace!(bits = product.value().bits(), "aggregated declarations");
    product.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_aggregate_is_one() {
        assert_eq!(aggregate(std::iter::empty()), BigUint::one());
        assert!(Product::new().is_identity());
    }

    #[test]
    fn test_aggregate_skips_no_contribution() {
        let encodings = vec![
            Encoded::Number(BigUint::from(9u32)),
            Encoded::NoContribution,
            Encoded::Number(BigUint::from(125u32)),
        ];
        assert_eq!(aggregate(&encodings), BigUint::from(1125u32));
    }

    #[test]
    fn test_only_no_contribution_is_one() {
        let encodings = vec![Encoded::NoContribution, Encoded::NoContribution];
        assert_eq!(aggregate(&encodings), BigUint::one());
    }

    #[test]
    fn test_product_mul_term() {
        let mut product = Product::new();
        product.mul_term(&BigUint::from(9u32));
        product.mul_term(&BigUint::from(2401u32));
        assert_eq!(product.value(), &BigUint::from(21_609u32));
        assert!(!product.is_identity());
    }
}
