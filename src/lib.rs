// FinWise Client - Core Library
// Exposes all modules for use in the CLI, dashboard, and tests

pub mod api;
pub mod entities;
pub mod projection;
pub mod session;
pub mod summary;
pub mod validation;

#[cfg(feature = "tui")]
pub mod ui;

// Re-export commonly used types
pub use api::{
    load_family_education_data, ApiClient, ApiError, AuthStatus, FamilyEducationData,
    DEFAULT_API_URL,
};
pub use entities::{
    Child, EducationLevel, EducationPlan, FamilyProfile, InstitutionType, RiskTolerance,
};
pub use projection::{
    project, suggested_monthly_top_up, PlanProjection, ProjectedStatus, ProjectionInput,
    SavingsStatus, EDUCATION_INFLATION_RATE, TOP_UP_GRANULARITY,
};
pub use session::{AuthUser, SessionStore};
pub use summary::{family_summary, FamilySummary};
pub use validation::{
    validate_child, validate_family_profile, validate_plan, ValidationError, ValidationResult,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
