//! Errors returned by registry operations.

/// Errors for registering or re-weighting items.
#[derive(Debug, Clone, PartialEq)]
pub enum BalanceError {
    /// The key is already registered.
    DuplicateKey,
    /// The key is not registered.
    UnknownKey,
    /// Weight is negative or not finite (NaN/inf).
    InvalidWeight(f64),
}

impl std::fmt::Display for BalanceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateKey => write!(f, "item is already registered"),
            Self::UnknownKey => write!(f, "item is not registered"),
            Self::InvalidWeight(w) => write!(f, "weight must be finite and >= 0 (got {w})"),
        }
    }
}

impl std::error::Error for BalanceError {}

/// Check that `weight` is usable as a target weight.
#[inline]
pub(crate) fn validate_weight(weight: f64) -> Result<f64, BalanceError> {
    if !weight.is_finite() || weight < 0.0 {
        return Err(BalanceError::InvalidWeight(weight));
    }
    Ok(weight)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_zero_and_fractional_weights() {
        assert_eq!(validate_weight(0.0), Ok(0.0));
        assert_eq!(validate_weight(4.5), Ok(4.5));
    }

    #[test]
    fn rejects_negative_and_non_finite_weights() {
        assert_eq!(validate_weight(-1.0), Err(BalanceError::InvalidWeight(-1.0)));
        assert!(matches!(
            validate_weight(f64::INFINITY),
            Err(BalanceError::InvalidWeight(w)) if w.is_infinite()
        ));
        assert!(matches!(
            validate_weight(f64::NAN),
            Err(BalanceError::InvalidWeight(w)) if w.is_nan()
        ));
    }

    #[test]
    fn display_names_the_weight() {
        let msg = BalanceError::InvalidWeight(-2.5).to_string();
        assert!(msg.contains("-2.5"), "{msg}");
    }
}
