// 📊 Family Education Summary
// Aggregates over children + plans for the dashboard summary cards

use std::collections::HashMap;

use crate::entities::{Child, EducationLevel, EducationPlan};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FamilySummary {
    pub total_children: usize,
    pub total_plans: usize,

    /// Sum of estimated costs across all plans (today's money)
    pub total_estimated_cost: f64,

    /// Sum of accumulated savings across all plans
    pub total_current_savings: f64,

    /// Sum of monthly deposits across all plans
    pub total_monthly_contribution: f64,

    /// How many children are currently at each education level
    pub children_by_level: HashMap<EducationLevel, usize>,
}

pub fn family_summary(children: &[Child], plans: &[EducationPlan]) -> FamilySummary {
    let mut children_by_level: HashMap<EducationLevel, usize> = HashMap::new();
    for child in children {
        *children_by_level
            .entry(child.current_education_level)
            .or_insert(0) += 1;
    }

    let mut total_estimated_cost = 0.0;
    let mut total_current_savings = 0.0;
    let mut total_monthly_contribution = 0.0;

    for plan in plans {
        total_estimated_cost += plan.estimated_total_cost;
        total_current_savings += plan.savings();
        total_monthly_contribution += plan.contribution();
    }

    FamilySummary {
        total_children: children.len(),
        total_plans: plans.len(),
        total_estimated_cost,
        total_current_savings,
        total_monthly_contribution,
        children_by_level,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::InstitutionType;
    use chrono::NaiveDate;

    fn child(name: &str, level: EducationLevel) -> Child {
        Child::new(
            name.to_string(),
            NaiveDate::from_ymd_opt(2015, 3, 10).unwrap(),
            level,
            1,
        )
    }

    fn plan(cost: f64, savings: Option<f64>, contribution: Option<f64>) -> EducationPlan {
        EducationPlan {
            id: None,
            plan_name: "plan".to_string(),
            child_id: 1,
            education_level: EducationLevel::Undergraduate,
            institution_type: InstitutionType::Government,
            estimated_start_year: 2030,
            estimated_end_year: 2034,
            estimated_total_cost: cost,
            current_savings: savings,
            monthly_contribution: contribution,
            inflation_rate: Some(4.0),
            notes: None,
        }
    }

    #[test]
    fn test_empty_family() {
        let summary = family_summary(&[], &[]);
        assert_eq!(summary, FamilySummary::default());
    }

    #[test]
    fn test_totals_across_plans() {
        let children = vec![
            child("Asha", EducationLevel::PrimarySchool),
            child("Rohan", EducationLevel::PrimarySchool),
            child("Mira", EducationLevel::HigherSecondary),
        ];
        let plans = vec![
            plan(500_000.0, Some(100_000.0), Some(5_000.0)),
            plan(1_200_000.0, Some(50_000.0), None),
        ];

        let summary = family_summary(&children, &plans);

        assert_eq!(summary.total_children, 3);
        assert_eq!(summary.total_plans, 2);
        assert_eq!(summary.total_estimated_cost, 1_700_000.0);
        // Absent savings/contribution fields count as zero
        assert_eq!(summary.total_current_savings, 150_000.0);
        assert_eq!(summary.total_monthly_contribution, 5_000.0);
        assert_eq!(
            summary.children_by_level[&EducationLevel::PrimarySchool],
            2
        );
        assert_eq!(
            summary.children_by_level[&EducationLevel::HigherSecondary],
            1
        );
    }
}
