// 👶 Child - dependent tracked under a family profile
// Lifetime is bounded by the owning profile: deleting the family member
// server-side cascades to their education plans.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

// ============================================================================
// EDUCATION LEVEL
// ============================================================================

/// Education stages offered by the intake and plan forms.
/// Wire strings match the backend exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EducationLevel {
    #[serde(rename = "Pre-School")]
    PreSchool,

    #[serde(rename = "Primary School")]
    PrimarySchool,

    #[serde(rename = "Secondary School")]
    SecondarySchool,

    #[serde(rename = "Higher Secondary")]
    HigherSecondary,

    #[serde(rename = "Undergraduate")]
    Undergraduate,

    #[serde(rename = "Postgraduate")]
    Postgraduate,

    #[serde(rename = "Professional Course")]
    ProfessionalCourse,

    #[serde(rename = "Completed Education")]
    CompletedEducation,
}

impl EducationLevel {
    pub const ALL: [EducationLevel; 8] = [
        EducationLevel::PreSchool,
        EducationLevel::PrimarySchool,
        EducationLevel::SecondarySchool,
        EducationLevel::HigherSecondary,
        EducationLevel::Undergraduate,
        EducationLevel::Postgraduate,
        EducationLevel::ProfessionalCourse,
        EducationLevel::CompletedEducation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EducationLevel::PreSchool => "Pre-School",
            EducationLevel::PrimarySchool => "Primary School",
            EducationLevel::SecondarySchool => "Secondary School",
            EducationLevel::HigherSecondary => "Higher Secondary",
            EducationLevel::Undergraduate => "Undergraduate",
            EducationLevel::Postgraduate => "Postgraduate",
            EducationLevel::ProfessionalCourse => "Professional Course",
            EducationLevel::CompletedEducation => "Completed Education",
        }
    }

    /// Parse a command-line argument into a level (case-insensitive,
    /// tolerant of missing hyphen/space variations like "preschool").
    pub fn parse(text: &str) -> Option<Self> {
        let normalized: String = text
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();

        EducationLevel::ALL.iter().copied().find(|level| {
            let canonical: String = level
                .as_str()
                .chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .collect::<String>()
                .to_lowercase();
            canonical == normalized
        })
    }
}

// ============================================================================
// CHILD
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Child {
    /// Backend-assigned id; absent until created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    pub name: String,

    pub date_of_birth: NaiveDate,

    pub current_education_level: EducationLevel,

    /// Owning family profile (foreign key)
    pub family_profile_id: i64,
}

impl Child {
    pub fn new(
        name: String,
        date_of_birth: NaiveDate,
        current_education_level: EducationLevel,
        family_profile_id: i64,
    ) -> Self {
        Child {
            id: None,
            name,
            date_of_birth,
            current_education_level,
            family_profile_id,
        }
    }

    /// Age in whole years on the given date. The year difference is
    /// reduced by one until the birthday has actually been reached.
    pub fn age_on(&self, today: NaiveDate) -> i32 {
        let mut age = today.year() - self.date_of_birth.year();

        let birthday_reached = (today.month(), today.day())
            >= (self.date_of_birth.month(), self.date_of_birth.day());
        if !birthday_reached {
            age -= 1;
        }

        age
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn test_child(dob: NaiveDate) -> Child {
        Child::new(
            "Asha".to_string(),
            dob,
            EducationLevel::PrimarySchool,
            1,
        )
    }

    #[test]
    fn test_age_after_birthday_this_year() {
        let child = test_child(date(2015, 3, 10));
        assert_eq!(child.age_on(date(2026, 8, 7)), 11);
    }

    #[test]
    fn test_age_before_birthday_this_year() {
        let child = test_child(date(2015, 11, 20));
        assert_eq!(child.age_on(date(2026, 8, 7)), 10);
    }

    #[test]
    fn test_age_on_exact_birthday() {
        let child = test_child(date(2015, 8, 7));
        assert_eq!(child.age_on(date(2026, 8, 7)), 11);
    }

    #[test]
    fn test_education_level_wire_strings() {
        let json = serde_json::to_string(&EducationLevel::PreSchool).unwrap();
        assert_eq!(json, "\"Pre-School\"");

        let parsed: EducationLevel =
            serde_json::from_str("\"Higher Secondary\"").unwrap();
        assert_eq!(parsed, EducationLevel::HigherSecondary);
    }

    #[test]
    fn test_education_level_parse_is_forgiving() {
        assert_eq!(
            EducationLevel::parse("preschool"),
            Some(EducationLevel::PreSchool)
        );
        assert_eq!(
            EducationLevel::parse("Primary School"),
            Some(EducationLevel::PrimarySchool)
        );
        assert_eq!(
            EducationLevel::parse("UNDERGRADUATE"),
            Some(EducationLevel::Undergraduate)
        );
        assert_eq!(EducationLevel::parse("kindergarten"), None);
    }

    #[test]
    fn test_child_wire_format() {
        let child = test_child(date(2015, 3, 10));
        let json = serde_json::to_value(&child).unwrap();

        assert_eq!(json["name"], "Asha");
        assert_eq!(json["dateOfBirth"], "2015-03-10");
        assert_eq!(json["currentEducationLevel"], "Primary School");
        assert_eq!(json["familyProfileId"], 1);
    }
}
