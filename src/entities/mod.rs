// Domain value objects mirroring the backend wire format
// Identity (ids) is owned by the backend; these are values, not records

pub mod child;
pub mod family;
pub mod plan;

pub use child::{Child, EducationLevel};
pub use family::{FamilyProfile, RiskTolerance};
pub use plan::{EducationPlan, InstitutionType};
