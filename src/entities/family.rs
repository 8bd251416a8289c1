// 👪 Family Profile - household intake record
// One profile per authenticated household; created once at intake,
// referenced by id from the session context thereafter.

use serde::{Deserialize, Serialize};

// ============================================================================
// RISK TOLERANCE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskTolerance {
    #[serde(rename = "LOW")]
    Low,

    #[serde(rename = "MEDIUM")]
    Medium,

    #[serde(rename = "HIGH")]
    High,
}

impl RiskTolerance {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTolerance::Low => "LOW",
            RiskTolerance::Medium => "MEDIUM",
            RiskTolerance::High => "HIGH",
        }
    }

    /// User-facing label shown in the intake flow
    pub fn label(&self) -> &'static str {
        match self {
            RiskTolerance::Low => "Conservative",
            RiskTolerance::Medium => "Moderate",
            RiskTolerance::High => "Aggressive",
        }
    }

    /// Map the intake-form choice to the backend enum.
    /// Unknown input falls back to Medium, matching the intake form.
    pub fn from_user_choice(choice: &str) -> Self {
        match choice.trim().to_lowercase().as_str() {
            "conservative" | "low" => RiskTolerance::Low,
            "aggressive" | "high" => RiskTolerance::High,
            _ => RiskTolerance::Medium,
        }
    }
}

// ============================================================================
// FAMILY PROFILE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyProfile {
    /// Backend-assigned id; absent until the profile has been created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    pub family_size: i32,

    pub monthly_income: f64,

    pub monthly_expenses: f64,

    pub location: String,

    pub risk_tolerance: RiskTolerance,
}

impl FamilyProfile {
    pub fn new(
        family_size: i32,
        monthly_income: f64,
        monthly_expenses: f64,
        location: String,
        risk_tolerance: RiskTolerance,
    ) -> Self {
        FamilyProfile {
            id: None,
            family_size,
            monthly_income,
            monthly_expenses,
            location,
            risk_tolerance,
        }
    }

    /// Income left over each month after expenses (may be negative)
    pub fn monthly_surplus(&self) -> f64 {
        self.monthly_income - self.monthly_expenses
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_tolerance_from_user_choice() {
        assert_eq!(
            RiskTolerance::from_user_choice("conservative"),
            RiskTolerance::Low
        );
        assert_eq!(
            RiskTolerance::from_user_choice("moderate"),
            RiskTolerance::Medium
        );
        assert_eq!(
            RiskTolerance::from_user_choice("Aggressive"),
            RiskTolerance::High
        );
        // Unknown choices fall back to the form default
        assert_eq!(
            RiskTolerance::from_user_choice("something-else"),
            RiskTolerance::Medium
        );
    }

    #[test]
    fn test_risk_tolerance_wire_format() {
        let json = serde_json::to_string(&RiskTolerance::Low).unwrap();
        assert_eq!(json, "\"LOW\"");

        let parsed: RiskTolerance = serde_json::from_str("\"HIGH\"").unwrap();
        assert_eq!(parsed, RiskTolerance::High);
    }

    #[test]
    fn test_profile_wire_format_is_camel_case() {
        let profile = FamilyProfile::new(
            4,
            85_000.0,
            52_000.0,
            "Bengaluru".to_string(),
            RiskTolerance::Medium,
        );

        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["familySize"], 4);
        assert_eq!(json["monthlyIncome"], 85_000.0);
        assert_eq!(json["riskTolerance"], "MEDIUM");
        // Unsaved profiles omit the id entirely
        assert!(json.get("id").is_none());
    }

    #[test]
    fn test_profile_roundtrip_with_backend_id() {
        let body = r#"{
            "id": 17,
            "familySize": 3,
            "monthlyIncome": 90000,
            "monthlyExpenses": 60000,
            "location": "Pune",
            "riskTolerance": "LOW"
        }"#;

        let profile: FamilyProfile = serde_json::from_str(body).unwrap();
        assert_eq!(profile.id, Some(17));
        assert_eq!(profile.monthly_surplus(), 30_000.0);
    }
}
