// 📐 Form Validation
// Client-side checks performed before any POST/PUT; a failing form
// blocks submission and reports every problem, not just the first.

use chrono::NaiveDate;

use crate::entities::{Child, EducationPlan, FamilyProfile};

// ============================================================================
// VALIDATION RESULT
// ============================================================================

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub context: String,
}

impl ValidationError {
    fn new(context: &str, field: &str, message: impl Into<String>) -> Self {
        ValidationError {
            field: field.to_string(),
            message: message.into(),
            context: context.to_string(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.context, self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult = Result<(), Vec<ValidationError>>;

// ============================================================================
// LIMITS
// ============================================================================

pub const MIN_PLAN_YEAR: i32 = 1900;
pub const MAX_PLAN_YEAR: i32 = 2100;
pub const MIN_NAME_LEN: usize = 2;
pub const MAX_NAME_LEN: usize = 100;

// ============================================================================
// FORM VALIDATORS
// ============================================================================

/// Validate the family-profile intake form
pub fn validate_family_profile(profile: &FamilyProfile) -> ValidationResult {
    let mut errors = Vec::new();

    if profile.family_size < 1 {
        errors.push(ValidationError::new(
            "FamilyProfile",
            "familySize",
            "Family size must be at least 1",
        ));
    }

    if profile.location.trim().is_empty() {
        errors.push(ValidationError::new(
            "FamilyProfile",
            "location",
            "Location is required",
        ));
    }

    if profile.monthly_income <= 0.0 {
        errors.push(ValidationError::new(
            "FamilyProfile",
            "monthlyIncome",
            "Monthly income must be greater than 0",
        ));
    }

    if profile.monthly_expenses < 0.0 {
        errors.push(ValidationError::new(
            "FamilyProfile",
            "monthlyExpenses",
            "Monthly expenses cannot be negative",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate the family-member form. `today` comes from the caller so the
/// date-of-birth check does not read a clock here.
pub fn validate_child(child: &Child, today: NaiveDate) -> ValidationResult {
    let mut errors = Vec::new();

    let name = child.name.trim();
    if name.is_empty() {
        errors.push(ValidationError::new(
            "Child",
            "name",
            "Child name is required",
        ));
    } else if name.len() < MIN_NAME_LEN || name.len() > MAX_NAME_LEN {
        errors.push(ValidationError::new(
            "Child",
            "name",
            format!(
                "Name must be between {} and {} characters",
                MIN_NAME_LEN, MAX_NAME_LEN
            ),
        ));
    }

    if child.date_of_birth >= today {
        errors.push(ValidationError::new(
            "Child",
            "dateOfBirth",
            "Date of birth must be in the past",
        ));
    }

    if child.family_profile_id <= 0 {
        errors.push(ValidationError::new(
            "Child",
            "familyProfileId",
            "Owning family profile is required",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate the education-plan form
pub fn validate_plan(plan: &EducationPlan) -> ValidationResult {
    let mut errors = Vec::new();

    if plan.plan_name.trim().is_empty() {
        errors.push(ValidationError::new(
            "EducationPlan",
            "planName",
            "Plan name is required",
        ));
    }

    if plan.child_id <= 0 {
        errors.push(ValidationError::new(
            "EducationPlan",
            "childId",
            "Child selection is required",
        ));
    }

    if plan.estimated_start_year < MIN_PLAN_YEAR || plan.estimated_start_year > MAX_PLAN_YEAR {
        errors.push(ValidationError::new(
            "EducationPlan",
            "estimatedStartYear",
            format!(
                "Start year must be between {} and {}",
                MIN_PLAN_YEAR, MAX_PLAN_YEAR
            ),
        ));
    }

    if plan.estimated_end_year < MIN_PLAN_YEAR || plan.estimated_end_year > MAX_PLAN_YEAR {
        errors.push(ValidationError::new(
            "EducationPlan",
            "estimatedEndYear",
            format!(
                "End year must be between {} and {}",
                MIN_PLAN_YEAR, MAX_PLAN_YEAR
            ),
        ));
    }

    if plan.estimated_end_year <= plan.estimated_start_year {
        errors.push(ValidationError::new(
            "EducationPlan",
            "estimatedEndYear",
            "End year must be after start year",
        ));
    }

    if plan.estimated_total_cost <= 0.0 {
        errors.push(ValidationError::new(
            "EducationPlan",
            "estimatedTotalCost",
            "Total cost must be positive",
        ));
    }

    if plan.savings() < 0.0 {
        errors.push(ValidationError::new(
            "EducationPlan",
            "currentSavings",
            "Current savings cannot be negative",
        ));
    }

    if plan.contribution() < 0.0 {
        errors.push(ValidationError::new(
            "EducationPlan",
            "monthlyContribution",
            "Monthly contribution cannot be negative",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{EducationLevel, InstitutionType, RiskTolerance};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 7).unwrap()
    }

    fn valid_profile() -> FamilyProfile {
        FamilyProfile::new(
            4,
            85_000.0,
            52_000.0,
            "Bengaluru".to_string(),
            RiskTolerance::Medium,
        )
    }

    fn valid_child() -> Child {
        Child::new(
            "Asha".to_string(),
            NaiveDate::from_ymd_opt(2015, 3, 10).unwrap(),
            EducationLevel::PrimarySchool,
            1,
        )
    }

    fn valid_plan() -> EducationPlan {
        EducationPlan {
            id: None,
            plan_name: "Undergraduate fund".to_string(),
            child_id: 2,
            education_level: EducationLevel::Undergraduate,
            institution_type: InstitutionType::Private,
            estimated_start_year: 2031,
            estimated_end_year: 2035,
            estimated_total_cost: 1_500_000.0,
            current_savings: Some(250_000.0),
            monthly_contribution: Some(8_000.0),
            inflation_rate: Some(4.0),
            notes: None,
        }
    }

    #[test]
    fn test_valid_profile_passes() {
        assert!(validate_family_profile(&valid_profile()).is_ok());
    }

    #[test]
    fn test_profile_rejects_zero_income() {
        let mut profile = valid_profile();
        profile.monthly_income = 0.0;

        let errors = validate_family_profile(&profile).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "monthlyIncome");
    }

    #[test]
    fn test_profile_collects_all_errors() {
        let mut profile = valid_profile();
        profile.family_size = 0;
        profile.location = "   ".to_string();
        profile.monthly_expenses = -10.0;

        let errors = validate_family_profile(&profile).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_valid_child_passes() {
        assert!(validate_child(&valid_child(), today()).is_ok());
    }

    #[test]
    fn test_child_name_length_bounds() {
        let mut child = valid_child();
        child.name = "A".to_string();
        let errors = validate_child(&child, today()).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "name"));

        child.name = "B".repeat(101);
        let errors = validate_child(&child, today()).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "name"));
    }

    #[test]
    fn test_child_birth_date_must_be_past() {
        let mut child = valid_child();
        child.date_of_birth = today();

        let errors = validate_child(&child, today()).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "dateOfBirth"));
    }

    #[test]
    fn test_valid_plan_passes() {
        assert!(validate_plan(&valid_plan()).is_ok());
    }

    #[test]
    fn test_plan_year_window() {
        let mut plan = valid_plan();
        plan.estimated_start_year = 1850;

        let errors = validate_plan(&plan).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "estimatedStartYear"));
    }

    #[test]
    fn test_plan_end_must_follow_start() {
        let mut plan = valid_plan();
        plan.estimated_end_year = plan.estimated_start_year;

        let errors = validate_plan(&plan).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "estimatedEndYear"));
    }

    #[test]
    fn test_plan_rejects_non_positive_cost() {
        let mut plan = valid_plan();
        plan.estimated_total_cost = 0.0;

        let errors = validate_plan(&plan).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "estimatedTotalCost"));
    }

    #[test]
    fn test_plan_rejects_negative_savings() {
        let mut plan = valid_plan();
        plan.current_savings = Some(-1.0);

        let errors = validate_plan(&plan).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "currentSavings"));
    }

    #[test]
    fn test_error_display_carries_context() {
        let err = ValidationError::new("Child", "name", "Child name is required");
        assert_eq!(err.to_string(), "[Child] name: Child name is required");
    }
}
