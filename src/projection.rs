// 🎓 Education Cost Projection Calculator
// One formula, many display contexts (summary card, dual progress bar,
// shortfall banner) - every view calls in here instead of re-deriving
// the arithmetic inline.

// ============================================================================
// CONSTANTS
// ============================================================================

/// System-wide annual education inflation rate (decimal, not percent).
/// The backend pins every plan to 4.00% and the UI does not expose it,
/// but the calculator still takes the rate as a parameter.
pub const EDUCATION_INFLATION_RATE: f64 = 0.04;

/// Suggested top-ups are rounded up to the nearest 1,000 currency units
pub const TOP_UP_GRANULARITY: f64 = 1_000.0;

// ============================================================================
// INPUT
// ============================================================================

/// Pre-validated numeric inputs for one plan projection.
///
/// `current_year` is supplied by the caller, never read from a clock,
/// so projections are reproducible and testable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionInput {
    /// Estimated total cost in today's money
    pub total_cost: f64,

    /// Savings accumulated to date (callers default absent values to 0)
    pub current_savings: f64,

    /// Ongoing monthly deposit (callers default absent values to 0)
    pub monthly_contribution: f64,

    /// Calendar year the education is expected to start
    pub start_year: i32,

    /// Calendar year "now", as seen by the caller
    pub current_year: i32,

    /// Annual inflation rate as a decimal (0.04 = 4%)
    pub annual_inflation_rate: f64,
}

impl ProjectionInput {
    /// Build inputs from a plan as stored by the backend.
    ///
    /// The wire format carries the inflation rate in percent (4.00);
    /// the calculator works in decimals.
    pub fn from_plan(plan: &crate::entities::EducationPlan, current_year: i32) -> Self {
        let rate_percent = plan
            .inflation_rate
            .unwrap_or(EDUCATION_INFLATION_RATE * 100.0);

        ProjectionInput {
            total_cost: plan.estimated_total_cost,
            current_savings: plan.savings(),
            monthly_contribution: plan.contribution(),
            start_year: plan.estimated_start_year,
            current_year,
            annual_inflation_rate: rate_percent / 100.0,
        }
    }
}

// ============================================================================
// OUTPUT
// ============================================================================

/// Result of one projection run. Pure value, safe to recompute anywhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanProjection {
    /// Whole years until the start year (past-due goals clamp to 0)
    pub years_to_goal: u32,

    /// Nominal cost at the start year after compounding inflation
    pub inflated_target_cost: f64,

    /// Future value of current savings alone
    pub fv_savings: f64,

    /// Future value of the monthly contribution stream (ordinary annuity)
    pub fv_contributions: f64,

    /// fv_savings + fv_contributions
    pub total_future_value: f64,

    /// Progress toward the target counting savings only, 0-100
    pub progress_savings_only: f64,

    /// Progress counting savings plus future contributions, 0-100
    pub progress_projected: f64,

    /// Remaining gap between target and projected value, never negative
    pub shortfall: f64,
}

impl PlanProjection {
    pub fn savings_status(&self) -> SavingsStatus {
        SavingsStatus::from_progress(self.progress_savings_only)
    }

    pub fn projected_status(&self) -> ProjectedStatus {
        ProjectedStatus::from_progress(self.progress_projected)
    }

    /// Suggested extra monthly deposit to close the shortfall, if any.
    /// See [`suggested_monthly_top_up`].
    pub fn suggested_top_up(&self) -> Option<f64> {
        suggested_monthly_top_up(self.shortfall, self.years_to_goal)
    }
}

// ============================================================================
// PROJECTION
// ============================================================================

/// Project a plan's savings progress against its inflation-adjusted target.
///
/// Pure function: no I/O, no clock, no hidden state. Never panics and
/// never produces NaN or infinite outputs for non-negative inputs -
/// division-by-zero cases are guarded and progress is clamped to [0, 100].
pub fn project(input: &ProjectionInput) -> PlanProjection {
    let years_to_goal = (input.start_year - input.current_year).max(0) as u32;

    // Goal year arrived or passed: savings are measured against today's
    // cost and contributions no longer have time to grow. Explicit branch;
    // the annuity math below must not run with zero months.
    if years_to_goal == 0 {
        let progress = progress_pct(input.current_savings, input.total_cost);

        return PlanProjection {
            years_to_goal: 0,
            inflated_target_cost: input.total_cost,
            fv_savings: input.current_savings,
            fv_contributions: 0.0,
            total_future_value: input.current_savings,
            progress_savings_only: progress,
            progress_projected: progress,
            shortfall: (input.total_cost - input.current_savings).max(0.0),
        };
    }

    let growth = (1.0 + input.annual_inflation_rate).powi(years_to_goal as i32);
    let inflated_target_cost = input.total_cost * growth;
    let fv_savings = input.current_savings * growth;

    let monthly_rate = input.annual_inflation_rate / 12.0;
    let total_months = f64::from(years_to_goal * 12);

    let fv_contributions = if input.monthly_contribution <= 0.0 {
        0.0
    } else if monthly_rate > 0.0 {
        // Ordinary annuity: contributions deposited at month end
        input.monthly_contribution * (((1.0 + monthly_rate).powf(total_months) - 1.0) / monthly_rate)
    } else {
        // Zero-rate degenerate case: no compounding
        input.monthly_contribution * total_months
    };

    let total_future_value = fv_savings + fv_contributions;

    PlanProjection {
        years_to_goal,
        inflated_target_cost,
        fv_savings,
        fv_contributions,
        total_future_value,
        progress_savings_only: progress_pct(input.current_savings, inflated_target_cost),
        progress_projected: progress_pct(total_future_value, inflated_target_cost),
        shortfall: (inflated_target_cost - total_future_value).max(0.0),
    }
}

/// Percent of `target` covered by `value`, clamped to [0, 100].
/// A target of 0 is defined as 0% progress.
fn progress_pct(value: f64, target: f64) -> f64 {
    if target <= 0.0 {
        return 0.0;
    }
    (value / target * 100.0).clamp(0.0, 100.0)
}

/// Suggest an additional monthly contribution that would close the
/// shortfall by the start year, rounded up to [`TOP_UP_GRANULARITY`].
///
/// Returns None when there is no shortfall or no months remain
/// (goal already reached or overdue).
pub fn suggested_monthly_top_up(shortfall: f64, years_to_goal: u32) -> Option<f64> {
    let months_remaining = f64::from(years_to_goal * 12);

    if shortfall <= 0.0 || months_remaining <= 0.0 {
        return None;
    }

    Some((shortfall / months_remaining / TOP_UP_GRANULARITY).ceil() * TOP_UP_GRANULARITY)
}

// ============================================================================
// PROGRESS STATUS BANDS
// ============================================================================

/// Status band for the savings-only progress figure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SavingsStatus {
    Excellent,
    Good,
    Fair,
    NeedsAttention,
}

impl SavingsStatus {
    pub fn from_progress(progress: f64) -> Self {
        if progress >= 80.0 {
            SavingsStatus::Excellent
        } else if progress >= 60.0 {
            SavingsStatus::Good
        } else if progress >= 40.0 {
            SavingsStatus::Fair
        } else {
            SavingsStatus::NeedsAttention
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SavingsStatus::Excellent => "Excellent",
            SavingsStatus::Good => "Good",
            SavingsStatus::Fair => "Fair",
            SavingsStatus::NeedsAttention => "Needs Attention",
        }
    }
}

/// Status band for the projected progress figure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectedStatus {
    OnTrack,
    GoodPace,
    Moderate,
    BehindTarget,
}

impl ProjectedStatus {
    pub fn from_progress(progress: f64) -> Self {
        if progress >= 100.0 {
            ProjectedStatus::OnTrack
        } else if progress >= 80.0 {
            ProjectedStatus::GoodPace
        } else if progress >= 60.0 {
            ProjectedStatus::Moderate
        } else {
            ProjectedStatus::BehindTarget
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProjectedStatus::OnTrack => "On Track",
            ProjectedStatus::GoodPace => "Good Pace",
            ProjectedStatus::Moderate => "Moderate",
            ProjectedStatus::BehindTarget => "Behind Target",
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn input(
        total_cost: f64,
        current_savings: f64,
        monthly_contribution: f64,
        years_out: i32,
    ) -> ProjectionInput {
        ProjectionInput {
            total_cost,
            current_savings,
            monthly_contribution,
            start_year: 2026 + years_out,
            current_year: 2026,
            annual_inflation_rate: EDUCATION_INFLATION_RATE,
        }
    }

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {} within {} of {}",
            actual,
            tolerance,
            expected
        );
    }

    #[test]
    fn test_goal_year_with_no_savings() {
        // totalCost=1,000,000, nothing saved, start year is this year
        let result = project(&input(1_000_000.0, 0.0, 0.0, 0));

        assert_eq!(result.years_to_goal, 0);
        assert_eq!(result.inflated_target_cost, 1_000_000.0);
        assert_eq!(result.progress_savings_only, 0.0);
        assert_eq!(result.progress_projected, 0.0);
        assert_eq!(result.shortfall, 1_000_000.0);
    }

    #[test]
    fn test_goal_year_fully_funded() {
        let result = project(&input(1_000_000.0, 1_000_000.0, 0.0, 0));

        assert_eq!(result.progress_savings_only, 100.0);
        assert_eq!(result.progress_projected, 100.0);
        assert_eq!(result.shortfall, 0.0);
    }

    #[test]
    fn test_five_year_projection() {
        // totalCost=500,000, savings=100,000, 5,000/month, 5 years out, 4%
        let result = project(&input(500_000.0, 100_000.0, 5_000.0, 5));

        assert_eq!(result.years_to_goal, 5);
        // 500,000 * 1.04^5
        assert_close(result.inflated_target_cost, 608_326.45, 1.0);
        // 100,000 * 1.04^5
        assert_close(result.fv_savings, 121_665.29, 1.0);
        // 5,000 * ((1 + 0.04/12)^60 - 1) / (0.04/12)
        assert_close(result.fv_contributions, 331_494.0, 500.0);
        assert_close(result.total_future_value, 453_160.0, 500.0);
        assert_close(result.progress_projected, 74.5, 0.2);
        assert_close(result.shortfall, 155_166.0, 500.0);
    }

    #[test]
    fn test_zero_rate_contributions_do_not_compound() {
        let mut i = input(100_000.0, 0.0, 1_000.0, 2);
        i.annual_inflation_rate = 0.0;

        let result = project(&i);

        // 1,000 x 24 months exactly
        assert_eq!(result.fv_contributions, 24_000.0);
        assert_eq!(result.inflated_target_cost, 100_000.0);
    }

    #[test]
    fn test_zero_cost_guard() {
        let result = project(&input(0.0, 50_000.0, 1_000.0, 3));

        assert_eq!(result.progress_savings_only, 0.0);
        assert_eq!(result.progress_projected, 0.0);
        assert!(result.progress_savings_only.is_finite());
        assert!(result.progress_projected.is_finite());
    }

    #[test]
    fn test_past_due_start_year_clamps_to_zero() {
        let mut i = input(200_000.0, 80_000.0, 2_000.0, 0);
        i.start_year = i.current_year - 3;

        let result = project(&i);

        assert_eq!(result.years_to_goal, 0);
        // Contributions are skipped once the goal date has passed
        assert_eq!(result.fv_contributions, 0.0);
        assert_eq!(result.inflated_target_cost, 200_000.0);
        assert_eq!(result.shortfall, 120_000.0);
    }

    #[test]
    fn test_inflated_target_never_below_today_cost() {
        for years in 0..30 {
            let result = project(&input(250_000.0, 0.0, 0.0, years));
            assert!(result.inflated_target_cost >= 250_000.0);
        }
    }

    #[test]
    fn test_progress_always_within_bounds() {
        let cases = [
            input(1.0, 1_000_000.0, 0.0, 1),
            input(1_000_000.0, 0.0, 0.0, 10),
            input(500.0, 499.0, 100_000.0, 2),
            input(0.0, 0.0, 0.0, 0),
        ];

        for case in &cases {
            let result = project(case);
            assert!((0.0..=100.0).contains(&result.progress_savings_only));
            assert!((0.0..=100.0).contains(&result.progress_projected));
        }
    }

    #[test]
    fn test_contributions_never_reduce_projected_progress() {
        for contribution in [0.0, 100.0, 5_000.0, 50_000.0] {
            let result = project(&input(750_000.0, 50_000.0, contribution, 8));
            assert!(result.progress_projected >= result.progress_savings_only);
        }
    }

    #[test]
    fn test_no_shortfall_when_fully_projected() {
        let result = project(&input(100_000.0, 200_000.0, 0.0, 4));

        assert_eq!(result.progress_projected, 100.0);
        assert_eq!(result.shortfall, 0.0);
    }

    #[test]
    fn test_projection_is_deterministic() {
        let i = input(500_000.0, 100_000.0, 5_000.0, 5);
        assert_eq!(project(&i), project(&i));
    }

    #[test]
    fn test_boundary_year_discontinuity_is_preserved() {
        // One year out the target is inflated; in the goal year it is not.
        let one_year_out = project(&input(500_000.0, 100_000.0, 0.0, 1));
        let goal_year = project(&input(500_000.0, 100_000.0, 0.0, 0));

        assert!(one_year_out.inflated_target_cost > 500_000.0);
        assert_eq!(goal_year.inflated_target_cost, 500_000.0);
    }

    #[test]
    fn test_top_up_rounds_up_to_granularity() {
        // 155,000 over 60 months = 2,583.33/month, rounded up to 3,000
        assert_eq!(suggested_monthly_top_up(155_000.0, 5), Some(3_000.0));

        // Exact multiples stay put: 120,000 over 60 months = 2,000
        assert_eq!(suggested_monthly_top_up(120_000.0, 5), Some(2_000.0));
    }

    #[test]
    fn test_top_up_omitted_when_goal_overdue() {
        assert_eq!(suggested_monthly_top_up(155_000.0, 0), None);
    }

    #[test]
    fn test_top_up_omitted_without_shortfall() {
        assert_eq!(suggested_monthly_top_up(0.0, 5), None);
        assert_eq!(suggested_monthly_top_up(-10.0, 5), None);
    }

    #[test]
    fn test_savings_status_bands() {
        assert_eq!(SavingsStatus::from_progress(92.0), SavingsStatus::Excellent);
        assert_eq!(SavingsStatus::from_progress(80.0), SavingsStatus::Excellent);
        assert_eq!(SavingsStatus::from_progress(65.0), SavingsStatus::Good);
        assert_eq!(SavingsStatus::from_progress(40.0), SavingsStatus::Fair);
        assert_eq!(
            SavingsStatus::from_progress(12.0),
            SavingsStatus::NeedsAttention
        );
    }

    #[test]
    fn test_projected_status_bands() {
        assert_eq!(ProjectedStatus::from_progress(100.0), ProjectedStatus::OnTrack);
        assert_eq!(ProjectedStatus::from_progress(85.0), ProjectedStatus::GoodPace);
        assert_eq!(ProjectedStatus::from_progress(60.0), ProjectedStatus::Moderate);
        assert_eq!(
            ProjectedStatus::from_progress(59.9),
            ProjectedStatus::BehindTarget
        );
    }
}
