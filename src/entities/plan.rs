// 🎯 Education Plan - savings goal for one child's education stage
// Monetary fields stay in the plan's currency unit; no rounding happens
// here, only at display time.

use serde::{Deserialize, Serialize};

use super::child::EducationLevel;

// ============================================================================
// INSTITUTION TYPE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstitutionType {
    Government,
    Private,
    International,
    Online,
}

impl InstitutionType {
    pub const ALL: [InstitutionType; 4] = [
        InstitutionType::Government,
        InstitutionType::Private,
        InstitutionType::International,
        InstitutionType::Online,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InstitutionType::Government => "Government",
            InstitutionType::Private => "Private",
            InstitutionType::International => "International",
            InstitutionType::Online => "Online",
        }
    }
}

// ============================================================================
// EDUCATION PLAN
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationPlan {
    /// Backend-assigned id; absent until created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    pub plan_name: String,

    /// Child this plan belongs to (foreign key)
    pub child_id: i64,

    pub education_level: EducationLevel,

    pub institution_type: InstitutionType,

    /// Calendar year the education starts, within [1900, 2100]
    pub estimated_start_year: i32,

    /// Calendar year it ends; must be after the start year
    pub estimated_end_year: i32,

    /// Total cost estimate in today's money
    pub estimated_total_cost: f64,

    /// Savings accumulated so far; the backend may omit the field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_savings: Option<f64>,

    /// Ongoing monthly deposit; the backend may omit the field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_contribution: Option<f64>,

    /// Annual inflation rate in percent. The backend pins this to 4.00
    /// for every plan; the field exists so the data model can carry it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inflation_rate: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl EducationPlan {
    /// Current savings with the absent-field default of 0
    pub fn savings(&self) -> f64 {
        self.current_savings.unwrap_or(0.0)
    }

    /// Monthly contribution with the absent-field default of 0
    pub fn contribution(&self) -> f64 {
        self.monthly_contribution.unwrap_or(0.0)
    }

    /// Planned duration in years (end year - start year)
    pub fn duration_years(&self) -> i32 {
        self.estimated_end_year - self.estimated_start_year
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_plan() -> EducationPlan {
        EducationPlan {
            id: Some(5),
            plan_name: "Asha's Engineering Degree".to_string(),
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
    fn test_absent_money_fields_default_to_zero() {
        let mut plan = test_plan();
        plan.current_savings = None;
        plan.monthly_contribution = None;

        assert_eq!(plan.savings(), 0.0);
        assert_eq!(plan.contribution(), 0.0);
    }

    #[test]
    fn test_duration() {
        assert_eq!(test_plan().duration_years(), 4);
    }

    #[test]
    fn test_plan_wire_format() {
        let json = serde_json::to_value(&test_plan()).unwrap();

        assert_eq!(json["planName"], "Asha's Engineering Degree");
        assert_eq!(json["childId"], 2);
        assert_eq!(json["educationLevel"], "Undergraduate");
        assert_eq!(json["institutionType"], "Private");
        assert_eq!(json["estimatedStartYear"], 2031);
        assert_eq!(json["estimatedTotalCost"], 1_500_000.0);
    }

    #[test]
    fn test_plan_parses_backend_body_without_optionals() {
        let body = r#"{
            "id": 9,
            "planName": "Secondary school",
            "childId": 4,
            "educationLevel": "Secondary School",
            "institutionType": "Government",
            "estimatedStartYear": 2028,
            "estimatedEndYear": 2032,
            "estimatedTotalCost": 300000
        }"#;

        let plan: EducationPlan = serde_json::from_str(body).unwrap();
        assert_eq!(plan.savings(), 0.0);
        assert_eq!(plan.contribution(), 0.0);
        assert_eq!(plan.inflation_rate, None);
        assert_eq!(plan.notes, None);
    }
}
