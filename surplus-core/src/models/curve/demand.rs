/// A linear inverse demand curve `P = a − b·Q`
///
/// The curve must be strictly downward-sloping (`b > 0`) with a strictly
/// positive choke price (`a > 0`), so that some quantity is demanded at a
/// price of zero. Both coefficients must be finite.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "LinearDemandDto", into = "LinearDemandDto")
)]
pub struct LinearDemand {
    intercept: f64,
    slope: f64,
}

impl LinearDemand {
    /// Creates a new demand curve `P = intercept − slope·Q`, validating both coefficients
    pub fn new(intercept: f64, slope: f64) -> Result<Self, DemandError> {
        Self::try_from(LinearDemandDto { intercept, slope })
    }

    /// Creates a new demand curve without validation
    ///
    /// # Safety
    ///
    /// This function bypasses all validation checks. The caller must guarantee that
    /// the coefficients satisfy the requirements validated by [`LinearDemand::try_from`];
    /// the solver assumes a strictly downward-sloping curve.
    pub unsafe fn new_unchecked(intercept: f64, slope: f64) -> Self {
        Self { intercept, slope }
    }

    /// The choke price `a`
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// The absolute slope `b`
    pub fn slope(&self) -> f64 {
        self.slope
    }

    /// The marginal willingness to pay for the q-th unit
    pub fn price(&self, q: f64) -> f64 {
        self.intercept - self.slope * q
    }

    /// The quantity demanded at price `p`, never negative
    pub fn quantity(&self, p: f64) -> f64 {
        ((self.intercept - p) / self.slope).max(0.0)
    }

    /// The quantity demanded at a price of zero
    pub fn saturation(&self) -> f64 {
        self.intercept / self.slope
    }

    /// Marginal revenue of a single-price seller, `a − 2b·Q`
    pub fn marginal_revenue(&self, q: f64) -> f64 {
        self.intercept - 2.0 * self.slope * q
    }

    /// The curve translated vertically by `delta`.
    ///
    /// A per-unit subsidy paid to producers shifts the demand they face up by the subsidy.
    pub fn shifted(&self, delta: f64) -> Result<Self, DemandError> {
        Self::new(self.intercept + delta, self.slope)
    }

    /// The area under the curve over `[q0, q1]` (total willingness to pay for those units)
    pub fn area(&self, q0: f64, q1: f64) -> f64 {
        self.intercept * (q1 - q0) - 0.5 * self.slope * (q1 * q1 - q0 * q0)
    }

    /// Consumer surplus when every consumer willing to pay `p` is served at `p`
    pub fn consumer_surplus(&self, p: f64) -> f64 {
        let q = self.quantity(p);
        0.5 * (self.intercept - p).max(0.0) * q
    }
}

/// DTO to ensure that we always validate when we deserialize from an untrusted source
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug)]
pub struct LinearDemandDto {
    /// The choke price `a`
    pub intercept: f64,
    /// The absolute slope `b` of `P = a − b·Q`
    pub slope: f64,
}

impl From<LinearDemand> for LinearDemandDto {
    fn from(value: LinearDemand) -> Self {
        Self {
            intercept: value.intercept,
            slope: value.slope,
        }
    }
}

impl TryFrom<LinearDemandDto> for LinearDemand {
    type Error = DemandError;

    /// Validates that both coefficients are finite and strictly positive
    fn try_from(value: LinearDemandDto) -> Result<Self, Self::Error> {
        let LinearDemandDto { intercept, slope } = value;

        if intercept.is_nan() || slope.is_nan() {
            return Err(DemandError::NaN);
        }
        if intercept.is_infinite() || slope.is_infinite() {
            return Err(DemandError::Infinity);
        }
        if slope <= 0.0 {
            return Err(DemandError::NonPositiveSlope(slope));
        }
        if intercept <= 0.0 {
            return Err(DemandError::NonPositiveIntercept(intercept));
        }

        Ok(Self { intercept, slope })
    }
}

/// Errors that can occur when creating or validating a LinearDemand
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum DemandError {
    /// Error when any coefficient is NaN
    #[error("NaN value encountered")]
    NaN,
    /// Error when any coefficient is infinite
    #[error("Coefficients cannot be infinite")]
    Infinity,
    /// Error when demand does not slope downward
    #[error("Demand slope must be positive in P = a - b·Q, got b = {0}")]
    NonPositiveSlope(f64),
    /// Error when nothing is demanded even at a zero price
    #[error("Demand intercept must be positive, got a = {0}")]
    NonPositiveIntercept(f64),
}
