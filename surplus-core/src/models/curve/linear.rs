/// A linear, strictly upward-sloping supply curve `P = c + d·Q`
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "LinearSupplyDto", into = "LinearSupplyDto")
)]
pub struct LinearSupply {
    intercept: f64,
    slope: f64,
}

impl LinearSupply {
    /// Creates a new supply curve `P = intercept + slope·Q` with validation
    pub fn new(intercept: f64, slope: f64) -> Result<Self, LinearSupplyError> {
        Self::try_from(LinearSupplyDto { intercept, slope })
    }

    /// Creates a new supply curve without validation
    ///
    /// # Safety
    /// This function bypasses validation of the coefficients. It should only be
    /// used when the caller can guarantee the values are valid.
    pub unsafe fn new_unchecked(intercept: f64, slope: f64) -> Self {
        Self { intercept, slope }
    }

    /// The reservation price of the first unit, `c`
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// The slope `d`
    pub fn slope(&self) -> f64 {
        self.slope
    }

    /// The marginal cost of the q-th unit
    pub fn price(&self, q: f64) -> f64 {
        self.intercept + self.slope * q
    }

    /// The quantity supplied at price `p`, never negative
    pub fn quantity(&self, p: f64) -> f64 {
        ((p - self.intercept) / self.slope).max(0.0)
    }
}

/// A DTO to ensure that we always validate when we deserialize from an untrusted source
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug)]
pub struct LinearSupplyDto {
    /// The price intercept `c`
    pub intercept: f64,
    /// The (positive) slope `d`
    pub slope: f64,
}

impl From<LinearSupply> for LinearSupplyDto {
    fn from(value: LinearSupply) -> Self {
        Self {
            intercept: value.intercept,
            slope: value.slope,
        }
    }
}

impl TryFrom<LinearSupplyDto> for LinearSupply {
    type Error = LinearSupplyError;

    fn try_from(value: LinearSupplyDto) -> Result<Self, Self::Error> {
        let LinearSupplyDto { intercept, slope } = value;

        if intercept.is_nan() || slope.is_nan() {
            return Err(LinearSupplyError::NaN);
        }
        if intercept.is_infinite() || slope.is_infinite() {
            return Err(LinearSupplyError::Infinity);
        }
        // A flat supply curve is a constant marginal cost and should be expressed as one
        if slope <= 0.0 {
            return Err(LinearSupplyError::NonPositiveSlope(slope));
        }

        Ok(Self { intercept, slope })
    }
}

/// Errors that can occur when creating or validating a LinearSupply
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum LinearSupplyError {
    /// Error when any coefficient is NaN
    #[error("NaN value encountered")]
    NaN,
    /// Error when any coefficient is infinite
    #[error("Coefficients cannot be infinite")]
    Infinity,
    /// Error when supply does not slope upward
    #[error("Supply slope must be positive in P = c + d·Q, got d = {0}")]
    NonPositiveSlope(f64),
}
