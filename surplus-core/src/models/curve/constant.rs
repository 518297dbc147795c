/// A perfectly elastic supply curve at a constant marginal cost
///
/// Any quantity is supplied at the marginal cost, nothing below it. This is
/// both the long-run competitive supply of a constant-cost industry and the
/// marginal cost curve of a monopolist with constant unit cost.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstantCost {
    marginal_cost: f64,
}

impl ConstantCost {
    /// Creates a new constant marginal cost with validation
    pub fn new(marginal_cost: f64) -> Result<Self, ConstantCostError> {
        if marginal_cost.is_nan() {
            return Err(ConstantCostError::NaN);
        }
        if marginal_cost.is_infinite() {
            return Err(ConstantCostError::Infinity);
        }
        if marginal_cost < 0.0 {
            return Err(ConstantCostError::Negative(marginal_cost));
        }
        Ok(Self { marginal_cost })
    }

    /// Creates a new constant marginal cost without validation
    ///
    /// # Safety
    /// This function bypasses validation of the cost. It should only be used
    /// when the caller can guarantee the value is finite and non-negative.
    pub unsafe fn new_unchecked(marginal_cost: f64) -> Self {
        Self { marginal_cost }
    }

    /// The marginal (and average variable) cost
    pub fn marginal_cost(&self) -> f64 {
        self.marginal_cost
    }

    /// The quantity supplied at price `p`
    pub fn quantity(&self, p: f64) -> f64 {
        if p < self.marginal_cost {
            0.0
        } else {
            f64::INFINITY
        }
    }
}

/// Errors that can occur when creating or validating a ConstantCost
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ConstantCostError {
    /// Error when the cost is NaN
    #[error("NaN value encountered")]
    NaN,
    /// Error when the cost is infinite
    #[error("Marginal cost cannot be infinite")]
    Infinity,
    /// Error when the cost is negative
    #[error("Marginal cost cannot be negative, got {0}")]
    Negative(f64),
}
