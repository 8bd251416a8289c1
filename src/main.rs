use anyhow::{anyhow, bail, Context, Result};
use chrono::{Local, NaiveDate};
use std::env;
use std::fs;

use finwise::entities::{Child, EducationLevel, EducationPlan, FamilyProfile, RiskTolerance};
use finwise::session::SessionStore;
use finwise::validation::{
    validate_child, validate_family_profile, validate_plan, ValidationError,
};
use finwise::{ApiClient, ApiError, EDUCATION_INFLATION_RATE};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        None => run_dashboard(),
        Some("auth-callback") => run_auth_callback(),
        Some("logout") => run_logout(),
        Some("profile") => run_save_profile(&args[2..], false),
        Some("update-profile") => run_save_profile(&args[2..], true),
        Some("add-child") => run_add_child(&args[2..]),
        Some("update-child") => run_update_child(&args[2..]),
        Some("remove-child") => run_remove_child(&args[2..]),
        Some("add-plan") => run_add_plan(&args[2..]),
        Some("update-plan") => run_update_plan(&args[2..]),
        Some("remove-plan") => run_remove_plan(&args[2..]),
        Some("predict") => run_predict(),
        Some("help" | "--help" | "-h") => {
            print_usage();
            Ok(())
        }
        Some(other) => {
            eprintln!("❌ Unknown command: {}\n", other);
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("FinWise - family education planning client v{}", finwise::VERSION);
    println!();
    println!("Usage: finwise [COMMAND]");
    println!();
    println!("Commands:");
    println!("  (none)                              Open the dashboard");
    println!("  auth-callback                       Complete login after the OAuth redirect");
    println!("  logout                              Clear the stored session");
    println!("  profile SIZE INCOME EXPENSES LOCATION RISK");
    println!("                                      Create the family profile");
    println!("  update-profile SIZE INCOME EXPENSES LOCATION RISK");
    println!("                                      Update the family profile");
    println!("  add-child NAME DOB LEVEL            Add a family member (DOB: YYYY-MM-DD)");
    println!("  update-child ID NAME DOB LEVEL      Update a family member");
    println!("  remove-child ID                     Remove a member and their plans");
    println!("  add-plan FILE.json                  Create an education plan from a JSON file");
    println!("  update-plan ID FILE.json            Update an education plan");
    println!("  remove-plan ID                      Delete an education plan");
    println!("  predict                             Regenerate server-side predictions");
    println!();
    println!("Environment:");
    println!("  FINWISE_API_URL      Backend base URL (default {})", finwise::DEFAULT_API_URL);
    println!("  FINWISE_SESSION_DB   Session store path (default finwise-session.db)");
}

// ============================================================================
// SHARED SETUP
// ============================================================================

fn open_session() -> Result<SessionStore> {
    let path =
        env::var("FINWISE_SESSION_DB").unwrap_or_else(|_| "finwise-session.db".to_string());
    SessionStore::open(path)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// The profile id every data operation hangs off. Missing id means the
/// household has not finished intake yet.
fn require_family_id(session: &SessionStore) -> Result<i64> {
    session.family_profile_id()?.ok_or_else(|| {
        anyhow!("Family profile not found. Please complete your profile first (finwise profile ...)")
    })
}

/// Convert an API failure into a printable error, clearing the session
/// when the backend no longer accepts our cookie.
fn handle_api_error(session: &SessionStore, err: ApiError) -> anyhow::Error {
    if err.is_auth_failure() {
        if let Err(clear_err) = session.clear() {
            eprintln!("⚠ Could not clear stale session: {}", clear_err);
        }
    }
    anyhow!("{}", err.user_message())
}

fn print_validation_errors(errors: &[ValidationError]) {
    eprintln!("❌ Please fix the following before submitting:");
    for error in errors {
        eprintln!("   - {}", error);
    }
}

/// Every successful mutation refreshes the server-side predictions.
/// Failures here are reported but never fatal.
fn fire_predictions(client: &ApiClient, family_id: i64) {
    match client.generate_predictions(family_id) {
        Ok(()) => println!("✓ Prediction refresh requested"),
        Err(e) => eprintln!("⚠ Prediction refresh failed: {}", e),
    }
}

// ============================================================================
// AUTH
// ============================================================================

fn run_auth_callback() -> Result<()> {
    println!("🔐 Completing login...");

    let session = open_session()?;
    let client = ApiClient::from_env()?;

    let status = match client.fetch_auth_user() {
        Ok(status) => status,
        Err(e) => {
            // Clear any stale auth data before reporting
            session.clear()?;
            bail!("Login check failed: {}", e.user_message());
        }
    };

    match (status.is_authenticated, status.user) {
        (true, Some(user)) => {
            session.store_login(&user)?;
            println!("✓ Logged in as {}", user.email);

            if user.is_new_user {
                println!("👪 New household - create your family profile next:");
                println!("   finwise profile SIZE INCOME EXPENSES LOCATION RISK");
            } else {
                println!("📊 Open your dashboard with: finwise");
            }
            Ok(())
        }
        _ => {
            session.clear()?;
            bail!("Not authenticated. Please log in through the FinWise site first.");
        }
    }
}

fn run_logout() -> Result<()> {
    let session = open_session()?;
    session.clear()?;
    println!("✓ Session cleared");
    Ok(())
}

// ============================================================================
// FAMILY PROFILE
// ============================================================================

fn run_save_profile(args: &[String], update: bool) -> Result<()> {
    let [size, income, expenses, location, risk] = args else {
        bail!("Usage: finwise profile SIZE INCOME EXPENSES LOCATION RISK");
    };

    let profile = FamilyProfile::new(
        size.parse().context("SIZE must be an integer")?,
        income.parse().context("INCOME must be a number")?,
        expenses.parse().context("EXPENSES must be a number")?,
        location.clone(),
        RiskTolerance::from_user_choice(risk),
    );

    if let Err(errors) = validate_family_profile(&profile) {
        print_validation_errors(&errors);
        std::process::exit(1);
    }

    let session = open_session()?;
    let client = ApiClient::from_env()?;

    let saved = if update {
        let id = require_family_id(&session)?;
        client
            .update_family_profile(id, &profile)
            .map_err(|e| handle_api_error(&session, e))?
    } else {
        client
            .create_family_profile(&profile)
            .map_err(|e| handle_api_error(&session, e))?
    };

    if let Some(id) = saved.id {
        session.set_family_profile_id(id)?;
    }

    println!(
        "✓ Family profile {} ({} people in {}, {} risk)",
        if update { "updated" } else { "created" },
        saved.family_size,
        saved.location,
        saved.risk_tolerance.label()
    );
    Ok(())
}

// ============================================================================
// CHILDREN
// ============================================================================

fn parse_child_args(
    name: &str,
    dob: &str,
    level: &str,
    family_profile_id: i64,
) -> Result<Child> {
    let date_of_birth: NaiveDate = dob
        .parse()
        .context("DOB must be an ISO date (YYYY-MM-DD)")?;

    let level = EducationLevel::parse(level).ok_or_else(|| {
        anyhow!(
            "Unknown education level '{}'. One of: {}",
            level,
            EducationLevel::ALL
                .iter()
                .map(|l| l.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )
    })?;

    Ok(Child::new(
        name.to_string(),
        date_of_birth,
        level,
        family_profile_id,
    ))
}

fn run_add_child(args: &[String]) -> Result<()> {
    let [name, dob, level] = args else {
        bail!("Usage: finwise add-child NAME DOB LEVEL");
    };

    let session = open_session()?;
    let client = ApiClient::from_env()?;
    let family_id = require_family_id(&session)?;

    let child = parse_child_args(name, dob, level, family_id)?;

    if let Err(errors) = validate_child(&child, today()) {
        print_validation_errors(&errors);
        std::process::exit(1);
    }

    let saved = client
        .create_child(&child)
        .map_err(|e| handle_api_error(&session, e))?;

    println!(
        "✓ Added {} ({}, age {})",
        saved.name,
        saved.current_education_level.as_str(),
        saved.age_on(today())
    );
    fire_predictions(&client, family_id);
    Ok(())
}

fn run_update_child(args: &[String]) -> Result<()> {
    let [id, name, dob, level] = args else {
        bail!("Usage: finwise update-child ID NAME DOB LEVEL");
    };
    let child_id: i64 = id.parse().context("ID must be an integer")?;

    let session = open_session()?;
    let client = ApiClient::from_env()?;
    let family_id = require_family_id(&session)?;

    let mut child = parse_child_args(name, dob, level, family_id)?;
    child.id = Some(child_id);

    if let Err(errors) = validate_child(&child, today()) {
        print_validation_errors(&errors);
        std::process::exit(1);
    }

    let saved = client
        .update_child(child_id, &child)
        .map_err(|e| handle_api_error(&session, e))?;

    println!("✓ Updated {}", saved.name);
    fire_predictions(&client, family_id);
    Ok(())
}

fn run_remove_child(args: &[String]) -> Result<()> {
    let [id] = args else {
        bail!("Usage: finwise remove-child ID");
    };
    let child_id: i64 = id.parse().context("ID must be an integer")?;

    let session = open_session()?;
    let client = ApiClient::from_env()?;
    let family_id = require_family_id(&session)?;

    client
        .delete_child(child_id)
        .map_err(|e| handle_api_error(&session, e))?;

    println!("✓ Removed family member {} and their education plans", child_id);
    fire_predictions(&client, family_id);
    Ok(())
}

// ============================================================================
// EDUCATION PLANS
// ============================================================================

/// Read a plan from a JSON file in the backend wire format.
/// The inflation rate is pinned to the system-wide 4% on every submit.
fn load_plan_file(path: &str) -> Result<EducationPlan> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read plan file: {}", path))?;

    let mut plan: EducationPlan =
        serde_json::from_str(&content).context("Failed to parse plan JSON")?;

    plan.inflation_rate = Some(EDUCATION_INFLATION_RATE * 100.0);
    Ok(plan)
}

fn run_add_plan(args: &[String]) -> Result<()> {
    let [path] = args else {
        bail!("Usage: finwise add-plan FILE.json");
    };

    let session = open_session()?;
    let client = ApiClient::from_env()?;
    let family_id = require_family_id(&session)?;

    let plan = load_plan_file(path)?;

    if let Err(errors) = validate_plan(&plan) {
        print_validation_errors(&errors);
        std::process::exit(1);
    }

    let saved = client
        .create_plan(family_id, &plan)
        .map_err(|e| handle_api_error(&session, e))?;

    println!(
        "✓ Created plan '{}' ({} - {}, {})",
        saved.plan_name,
        saved.estimated_start_year,
        saved.estimated_end_year,
        saved.education_level.as_str()
    );
    fire_predictions(&client, family_id);
    Ok(())
}

fn run_update_plan(args: &[String]) -> Result<()> {
    let [id, path] = args else {
        bail!("Usage: finwise update-plan ID FILE.json");
    };
    let plan_id: i64 = id.parse().context("ID must be an integer")?;

    let session = open_session()?;
    let client = ApiClient::from_env()?;
    let family_id = require_family_id(&session)?;

    let mut plan = load_plan_file(path)?;
    plan.id = Some(plan_id);

    if let Err(errors) = validate_plan(&plan) {
        print_validation_errors(&errors);
        std::process::exit(1);
    }

    let saved = client
        .update_plan(plan_id, &plan)
        .map_err(|e| handle_api_error(&session, e))?;

    println!("✓ Updated plan '{}'", saved.plan_name);
    fire_predictions(&client, family_id);
    Ok(())
}

fn run_remove_plan(args: &[String]) -> Result<()> {
    let [id] = args else {
        bail!("Usage: finwise remove-plan ID");
    };
    let plan_id: i64 = id.parse().context("ID must be an integer")?;

    let session = open_session()?;
    let client = ApiClient::from_env()?;
    let family_id = require_family_id(&session)?;

    client
        .delete_plan(plan_id)
        .map_err(|e| handle_api_error(&session, e))?;

    println!("✓ Deleted education plan {}", plan_id);
    fire_predictions(&client, family_id);
    Ok(())
}

// ============================================================================
// PREDICTIONS
// ============================================================================

fn run_predict() -> Result<()> {
    let session = open_session()?;
    let client = ApiClient::from_env()?;
    let family_id = require_family_id(&session)?;

    client
        .generate_predictions(family_id)
        .map_err(|e| handle_api_error(&session, e))?;

    println!("✓ Prediction run requested for family {}", family_id);
    Ok(())
}

// ============================================================================
// DASHBOARD
// ============================================================================

#[cfg(feature = "tui")]
fn run_dashboard() -> Result<()> {
    use finwise::ui;

    println!("🖥️  Loading FinWise dashboard...\n");

    let session = open_session()?;

    if !session.is_authenticated()? {
        eprintln!("❌ Not logged in.");
        eprintln!("   Run: finwise auth-callback");
        eprintln!("   after signing in through the FinWise site.");
        std::process::exit(1);
    }

    let client = ApiClient::from_env()?;
    let family_id = require_family_id(&session)?;

    println!("📊 Loading family education data...");
    let data = finwise::load_family_education_data(&client, family_id)
        .map_err(|e| handle_api_error(&session, e))?;
    println!(
        "✓ Loaded {} members and {} plans\n",
        data.children.len(),
        data.education_plans.len()
    );

    // Predictions refresh on page load, like every other data load
    fire_predictions(&client, family_id);

    println!("Starting dashboard... (Press 'q' to quit)\n");

    let mut app = ui::App::new(data, family_id, today());
    ui::run_ui(&mut app, &client)?;

    println!("\n✅ Dashboard closed");
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_dashboard() -> Result<()> {
    eprintln!("❌ Dashboard not available in this build!");
    eprintln!("   Rebuild with: cargo build --features tui");
    std::process::exit(1);
}
