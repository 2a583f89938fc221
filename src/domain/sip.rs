//! Systematic Investment Plan projection.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SipInput {
    pub monthly_investment: f64,
    /// Expected annual return in percent.
    pub expected_return_pct: f64,
    pub years: f64,
}

impl Default for SipInput {
    fn default() -> Self {
        Self { monthly_investment: 5_000.0, expected_return_pct: 12.0, years: 10.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SipProjection {
    pub future_value: f64,
    pub invested_amount: f64,
    pub estimated_returns: f64,
}

impl SipInput {
    /// Future value of an annuity-due with monthly compounding:
    /// `FV = M * ((1 + i)^n - 1) / i * (1 + i)`.
    pub fn calculate(&self) -> SipProjection {
        let i = self.expected_return_pct / 100.0 / 12.0;
        let n = self.years * 12.0;
        let m = self.monthly_investment;
        let invested_amount = m * n;
        if i == 0.0 {
            return SipProjection { future_value: invested_amount, invested_amount, estimated_returns: 0.0 };
        }
        let future_value = m * (((1.0 + i).powf(n) - 1.0) / i) * (1.0 + i);
        SipProjection { future_value, invested_amount, estimated_returns: future_value - invested_amount }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_rate_returns_principal() {
        let projection = SipInput { monthly_investment: 1_000.0, expected_return_pct: 0.0, years: 2.0 }.calculate();
        assert_eq!(projection.future_value, 24_000.0);
        assert_eq!(projection.estimated_returns, 0.0);
    }
}
