//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::api::{self, AppState};
use crate::settings;
use chrono::Utc;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use workload_core::capacity::CapacityAnalysis;
use workload_core::{
    CalculationEngine, DerivedMetrics, EngineConfig, ExportFormat, Insight, ProgrammeInput,
    StaffCategory, SubmissionRecord, SubmissionStore, SubmissionSummary, WorkloadError,
    export_checksum, export_records, insights,
};

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum size of a programme input file (1 MB).
const MAX_INPUT_FILE_SIZE: u64 = 1024 * 1024;

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), WorkloadError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| WorkloadError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(WorkloadError::IoError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Resolve an input path to a canonical regular file.
fn validate_file_path(path: &Path) -> Result<PathBuf, WorkloadError> {
    let canonical = path.canonicalize().map_err(|e| {
        WorkloadError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(WorkloadError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Resolve an output path: the parent must be an existing directory.
fn validate_output_path(path: &Path) -> Result<PathBuf, WorkloadError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let canonical_parent = parent.canonicalize().map_err(|e| {
        WorkloadError::IoError(format!(
            "Invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    if !canonical_parent.is_dir() {
        return Err(WorkloadError::IoError(format!(
            "Output directory '{}' is not a valid directory",
            parent.display()
        )));
    }

    let filename = path
        .file_name()
        .ok_or_else(|| WorkloadError::IoError("Output path has no filename".to_string()))?;

    Ok(canonical_parent.join(filename))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), WorkloadError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| WorkloadError::SerializationError(e.to_string()))?;
    println!("{}", text);
    Ok(())
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(
    db_path: &Path,
    config_path: Option<&Path>,
    host: &str,
    port: u16,
) -> Result<(), WorkloadError> {
    let engine = CalculationEngine::new(settings::resolve_config(config_path)?)?;
    let store = SubmissionStore::open(db_path)?;

    let mut state = AppState::new(engine, store);
    if let Some(hash) = api::get_admin_key_hash_from_env() {
        state = state.with_admin_key_hash(hash);
    }

    println!("Workload Estimator Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:     {}", host);
    println!("  Port:     {}", port);
    println!("  Database: {:?}", db_path);
    println!(
        "  Admin:    {}",
        if state.admin_key_hash.is_some() {
            "enabled"
        } else {
            "disabled"
        }
    );
    println!();
    println!("Endpoints:");
    println!("  GET  /health                  - Health check");
    println!("  GET  /config                  - Engine constants");
    println!("  POST /calculate               - Calculate metrics");
    println!("  POST /submissions             - Calculate and store");
    println!("  GET  /admin/submissions       - List submissions");
    println!("  GET  /admin/submissions/{{id}}  - One submission");
    println!("  GET  /admin/summary           - Aggregate figures");
    println!("  GET  /admin/export            - CSV/JSON export");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let addr = format!("{}:{}", host, port);
    api::run_server(&addr, state).await
}

// =============================================================================
// CALCULATE COMMAND
// =============================================================================

/// Calculate metrics for an input file, optionally storing the submission.
pub fn cmd_calculate(
    db_path: &Path,
    config_path: Option<&Path>,
    json_mode: bool,
    file: &Path,
    save: bool,
) -> Result<(), WorkloadError> {
    let validated_path = validate_file_path(file)?;
    validate_file_size(&validated_path, MAX_INPUT_FILE_SIZE)?;

    let content = std::fs::read_to_string(&validated_path)
        .map_err(|e| WorkloadError::IoError(format!("Read file: {}", e)))?;
    let input: ProgrammeInput = serde_json::from_str(&content)
        .map_err(|e| WorkloadError::DeserializationError(format!("Invalid input file: {}", e)))?;

    let engine = CalculationEngine::new(settings::resolve_config(config_path)?)?;
    let metrics = engine.calculate(&input)?;
    let notes = insights(&input, &metrics, engine.config());

    let stored = if save {
        let store = SubmissionStore::open(db_path)?;
        let record = store.append(input.clone(), metrics.clone(), Utc::now())?;
        tracing::info!(id = record.id, "Submission stored");
        Some(record.id)
    } else {
        None
    };

    if json_mode {
        return print_json(&serde_json::json!({
            "id": stored,
            "metrics": metrics,
            "insights": notes,
        }));
    }

    if !input.programme_name.is_empty() {
        println!("Programme: {}", input.programme_name);
    }
    print_metrics(&metrics);
    print_insights(&notes);
    if let Some(id) = stored {
        println!();
        println!("Stored as submission {}", id);
    }

    Ok(())
}

/// Render a metrics record as labelled lines.
fn print_metrics(metrics: &DerivedMetrics) {
    let d = &metrics.delivery;
    println!();
    println!("Delivery");
    println!("  Total validated hours:           {}", d.total_validated_hours.normalize());
    println!("  Delivery multiplier:             {}", d.delivery_multiplier.rounded(4));
    println!("  Repetition factor:               {}", d.repetition_factor.rounded(4));
    println!("  Base staff effort:               {}", d.base_staff_effort.normalize());
    println!("  Estimated staff effort:          {}", d.estimated_staff_effort.normalize());
    println!(
        "  Staff effort per validated hour: {}",
        d.staff_effort_per_validated_hour.rounded(4)
    );
    println!("  Contact vs effort ratio:         {}", d.contact_vs_effort_ratio.rounded(4));

    if let Some(groups) = &metrics.groups {
        println!();
        println!("Learning groups");
        for g in &groups.groups {
            println!(
                "  {}: size {}, {}x repetition, {} groups, {} staff hours",
                g.name,
                g.size,
                g.repetition_multiplier.round_dp(2),
                g.number_of_groups,
                g.estimated_staff_effort.normalize()
            );
        }
        println!("  Total staff effort: {}", groups.total_staff_effort.normalize());
    }

    match &metrics.capacity {
        Some(CapacityAnalysis::Detailed(c)) => {
            println!();
            println!("Capacity (detailed)");
            for (category, hours) in &c.categories {
                println!(
                    "  {}: {} FTE, {} gross, {} after buyout/remission",
                    category.label(),
                    hours.fte.normalize(),
                    hours.gross_hours.normalize(),
                    hours.adjusted_hours.normalize()
                );
            }
            println!("  Net hours:             {}", c.total_net_hours.normalize());
            println!("  Other teaching:        {}", c.total_other_teaching_hours.normalize());
            println!("  Adjusted net hours:    {}", c.adjusted_net_hours.normalize());
            println!("  Unreplaced hours:      {}", c.total_unreplaced_hours.normalize());
            println!("  Final available hours: {}", c.final_available_hours.normalize());
        }
        Some(CapacityAnalysis::Simplified(c)) => {
            println!();
            println!("Capacity (simplified)");
            println!("  Gross hours:           {}", c.total_gross_hours.normalize());
            println!("  Contingency:           {}", c.contingency.normalize());
            println!("  Total staff available: {}", c.total_staff_available.normalize());
        }
        None => {}
    }

    if let Some(ratios) = metrics.ratios {
        println!();
        println!("Ratios");
        println!(
            "  Nominal students per FTE:  {}",
            ratios.nominal.students_per_fte.rounded(2)
        );
        println!(
            "  Adjusted students per FTE: {}",
            ratios.adjusted.students_per_fte.rounded(2)
        );
    }

    if let Some(space) = metrics.space {
        println!();
        println!("Space");
        println!("  Total space (m²): {}", space.total_space.normalize());
    }

    if let Some(balance) = metrics.balance {
        println!();
        println!(
            "Balance: {:?} of {} hours (available {}, required {})",
            balance.status,
            balance.magnitude.normalize(),
            balance.available.normalize(),
            balance.demand.normalize()
        );
    }
}

fn print_insights(notes: &[Insight]) {
    if notes.is_empty() {
        return;
    }
    println!();
    println!("Insights");
    for note in notes {
        println!("  - {}", note.message);
    }
}

// =============================================================================
// INIT COMMAND
// =============================================================================

/// Initialize new database.
pub fn cmd_init(db_path: &Path, force: bool) -> Result<(), WorkloadError> {
    if db_path.exists() {
        if !force {
            return Err(WorkloadError::IoError(
                "Database already exists. Use --force to overwrite.".to_string(),
            ));
        }
        std::fs::remove_file(db_path)
            .map_err(|e| WorkloadError::IoError(format!("Remove existing database: {}", e)))?;
    }

    let _store = SubmissionStore::open(db_path)?;
    println!("Initialized new submission database at {:?}", db_path);
    Ok(())
}

// =============================================================================
// LIST / SHOW COMMANDS
// =============================================================================

/// List stored submissions.
pub fn cmd_list(db_path: &Path, json_mode: bool) -> Result<(), WorkloadError> {
    let records = SubmissionStore::open(db_path)?.list()?;

    if json_mode {
        return print_json(&records);
    }

    if records.is_empty() {
        println!("No submissions stored");
        return Ok(());
    }

    println!("{:>6}  {:<25}  {:<30}  {:>8}  {:>12}", "ID", "Submitted", "Programme", "Students", "Effort");
    for record in &records {
        println!(
            "{:>6}  {:<25}  {:<30}  {:>8}  {:>12}",
            record.id,
            record.submitted_at.format("%Y-%m-%d %H:%M:%S UTC"),
            truncate(&record.input.programme_name, 30),
            record.input.total_students,
            record.metrics.demand().round_dp(1)
        );
    }
    println!();
    println!("{} submission(s)", records.len());
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

/// Show one stored submission.
pub fn cmd_show(db_path: &Path, json_mode: bool, id: u64) -> Result<(), WorkloadError> {
    let record: SubmissionRecord = SubmissionStore::open(db_path)?.get(id)?;

    if json_mode {
        return print_json(&record);
    }

    println!("Submission {}", record.id);
    println!("  Submitted:  {}", record.submitted_at.to_rfc3339());
    println!("  Programme:  {}", record.input.programme_name);
    println!("  Students:   {}", record.input.total_students);
    println!(
        "  Validated:  {} hours per student",
        record.input.validated_contact_hours_per_student.normalize()
    );
    println!("  Delivery:   {} hours", record.input.total_delivery_hours.normalize());
    for category in StaffCategory::ALL {
        if let Some(allocation) = record.input.staffing.get(&category) {
            println!("  {}: {} FTE", category.label(), allocation.fte.normalize());
        }
    }
    print_metrics(&record.metrics);
    Ok(())
}

// =============================================================================
// EXPORT COMMAND
// =============================================================================

/// Export all submissions as a flat table.
pub fn cmd_export(db_path: &Path, output: &Path, format: &str) -> Result<(), WorkloadError> {
    let validated_output = validate_output_path(output)?;
    let format: ExportFormat = format.parse()?;

    let records = SubmissionStore::open(db_path)?.list()?;
    let data = export_records(&records, format)?;

    std::fs::write(&validated_output, &data)
        .map_err(|e| WorkloadError::IoError(format!("Write file: {}", e)))?;

    println!("Checksum: {}", export_checksum(&data));
    println!(
        "Exported {} submission(s), {} bytes to {:?}",
        records.len(),
        data.len(),
        validated_output
    );
    Ok(())
}

// =============================================================================
// SUMMARY COMMAND
// =============================================================================

/// Aggregate figures across submissions.
pub fn cmd_summary(db_path: &Path, json_mode: bool) -> Result<(), WorkloadError> {
    let records = SubmissionStore::open(db_path)?.list()?;
    let summary = SubmissionSummary::from_records(&records);

    if json_mode {
        return print_json(&summary);
    }

    println!("Submission Summary");
    println!("==================");
    println!("Database: {:?}", db_path);
    println!();
    println!("Submissions:            {}", summary.submissions);
    println!("Total students:         {}", summary.total_students);
    println!("Total delivery hours:   {}", summary.total_delivery_hours.normalize());
    println!("Total staff effort:     {}", summary.total_staff_effort.round_dp(1));
    println!("Total space (m²):       {}", summary.total_space.normalize());
    println!("In shortfall:           {}", summary.shortfall_count);
    println!("Mean repetition factor: {}", summary.mean_repetition_factor);
    Ok(())
}

// =============================================================================
// CONFIG COMMAND
// =============================================================================

/// Show the engine configuration in use.
pub fn cmd_config(config_path: Option<&Path>, json_mode: bool) -> Result<(), WorkloadError> {
    let config: EngineConfig = settings::resolve_config(config_path)?;

    if json_mode {
        return print_json(&config);
    }

    println!("Engine Configuration");
    println!("====================");
    println!("Staff effort multiplier: {}", config.staff_effort_multiplier.normalize());
    println!("Effort multiplier:       {}", config.effort_multiplier.normalize());
    println!("Contingency buffer:      {}", config.contingency_buffer.normalize());
    println!("Capacity contingency:    {}", config.capacity_contingency.normalize());
    println!("Nominal FTE hours:       {}", config.nominal_fte_hours.normalize());
    println!("Delivery basis:          {:?}", config.delivery_basis);
    println!("Nominal annual hours:");
    for category in StaffCategory::ALL {
        println!(
            "  {:<20} {}",
            category.label(),
            config.annual_hours(category).normalize()
        );
    }
    Ok(())
}

// =============================================================================
// ADMIN-HASH COMMAND
// =============================================================================

/// Read an admin key from stdin and print its digest for `WORKLOAD_ADMIN_KEY_HASH`.
pub fn cmd_admin_hash() -> Result<(), WorkloadError> {
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| WorkloadError::IoError(format!("Read stdin: {}", e)))?;

    let key = line.trim_end_matches(['\r', '\n']);
    if key.is_empty() {
        return Err(WorkloadError::invalid_input("admin_key", "must not be empty"));
    }

    println!("{}", api::hash_admin_key_hex(key));
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_long_names() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }

    #[test]
    fn unserialisable_json_output_is_an_error() {
        let mut map = std::collections::BTreeMap::new();
        map.insert((1u8, 2u8), "composite keys are not JSON object keys");
        assert!(matches!(
            print_json(&map),
            Err(WorkloadError::SerializationError(_))
        ));
        assert!(print_json(&serde_json::json!({ "ok": true })).is_ok());
    }

    #[test]
    fn output_path_in_current_dir() {
        let path = validate_output_path(Path::new("export.csv")).expect("valid");
        assert!(path.ends_with("export.csv"));
    }

    #[test]
    fn output_path_missing_parent_rejected() {
        assert!(validate_output_path(Path::new("/nonexistent/dir/out.csv")).is_err());
    }

    #[test]
    fn init_calculate_save_and_export() {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = dir.path().join("workload.redb");
        let input = dir.path().join("input.json");
        std::fs::write(
            &input,
            r#"{"programme_name":"BA Illustration","total_students":100,
                "validated_contact_hours_per_student":"40","total_delivery_hours":"500"}"#,
        )
        .expect("write input");

        cmd_init(&db, false).expect("init");
        assert!(cmd_init(&db, false).is_err());

        cmd_calculate(&db, None, true, &input, true).expect("calculate");
        let records = SubmissionStore::open(&db).expect("open").list().expect("list");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].input.programme_name, "BA Illustration");

        let out = dir.path().join("export.csv");
        cmd_export(&db, &out, "csv").expect("export");
        let text = std::fs::read_to_string(&out).expect("read export");
        assert!(text.contains("BA Illustration"));
    }

    #[test]
    fn show_missing_submission_is_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = dir.path().join("workload.redb");
        assert!(matches!(
            cmd_show(&db, true, 7),
            Err(WorkloadError::NotFound(7))
        ));
    }
}
