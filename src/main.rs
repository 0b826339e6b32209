// Entry point and high-level CLI flow.
//
// - Option [1] loads both registration exports and prints diagnostics.
// - Option [2] generates every catalog report (JSON envelope + CSV) and
//   previews each one.
// - Option [3] generates a single report by id.
// After generating, the user can go back to the menu or exit.
use once_cell::sync::Lazy;
use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use truck_report::output::preview_table;
use truck_report::reports::export_report;
use truck_report::util::format_int;
use truck_report::{catalog, find_report, AppConfig, CsvFactSource, Dataset, ReportDefinition};

// Loaded datasets live here so they are read once per run but reports can be
// generated many times.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| Mutex::new(AppState::default()));

#[derive(Default)]
struct AppState {
    config: AppConfig,
    source: Option<CsvFactSource>,
}

impl AppState {
    fn source(&mut self) -> &mut CsvFactSource {
        let data_dir = self.config.data_dir.clone();
        self.source.get_or_insert_with(|| CsvFactSource::new(data_dir))
    }
}

fn state() -> MutexGuard<'static, AppState> {
    APP_STATE.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Print `label` and read one trimmed line from stdin. `None` once stdin is
/// closed.
fn prompt(label: &str) -> Option<String> {
    print!("{label}");
    let _ = io::stdout().flush();
    let mut buf = String::new();
    match io::stdin().read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

/// Returns `true` if the user chose `Y`, `false` if they chose `N`.
fn prompt_back_to_menu() -> bool {
    loop {
        let Some(answer) = prompt("Back to Report Selection (Y/N): ") else {
            return false;
        };
        match answer.to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// Handle option [1]: (re)load both registration exports.
fn handle_load() {
    let mut state = state();
    for dataset in Dataset::ALL {
        let path = state.source().dataset_path(dataset);
        match state.source().load(dataset) {
            Ok(report) => {
                println!(
                    "Processing {}... ({} rows read, {} kept)",
                    path.display(),
                    format_int(report.total_rows),
                    format_int(report.kept_rows)
                );
                if report.parse_errors > 0 {
                    println!(
                        "Note: {} rows skipped due to parse/validation errors.",
                        format_int(report.parse_errors)
                    );
                }
            }
            Err(e) => eprintln!("Failed to load {}: {}", path.display(), e),
        }
    }
    println!();
}

/// Export one report and print its preview. Datasets not yet loaded are
/// loaded on first use.
fn generate(state: &mut AppState, report: &ReportDefinition) {
    let output_dir = state.config.output_dir.clone();
    let preview_rows = state.config.preview_rows;

    println!("Report {}: {}", report.id, report.title);
    println!("({})\n", report.filter);
    match export_report(report, state.source(), &output_dir) {
        Ok(rows) => {
            preview_table(&rows, &report.columns, preview_rows);
            println!(
                "(Full report exported to {} and {})\n",
                output_dir.join(format!("{}.json", report.id)).display(),
                output_dir.join(format!("{}.csv", report.id)).display()
            );
        }
        Err(e) => {
            error!(report = %report.id, error = %e, "export failed");
            eprintln!("Report {} failed: {}\n", report.id, e);
        }
    }
}

fn ensure_output_dir(state: &AppState) -> bool {
    match std::fs::create_dir_all(&state.config.output_dir) {
        Ok(()) => true,
        Err(e) => {
            eprintln!(
                "Cannot create output directory {}: {}\n",
                state.config.output_dir.display(),
                e
            );
            false
        }
    }
}

/// Handle option [2]: every report in the catalog.
fn handle_generate_reports() {
    let mut state = state();
    if !ensure_output_dir(&state) {
        return;
    }
    println!("Generating reports...\n");
    for report in catalog() {
        generate(&mut state, report);
    }
}

/// Handle option [3]: one report chosen by id.
fn handle_generate_one() {
    println!("Available reports:");
    for report in catalog() {
        println!("  {:<20} {}", report.id, report.title);
    }
    let Some(id) = prompt("Enter report id: ") else {
        return;
    };
    let Some(report) = find_report(&id) else {
        println!("Unknown report: {id}\n");
        return;
    };
    let mut state = state();
    if ensure_output_dir(&state) {
        println!();
        generate(&mut state, report);
    }
}

fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "truck_report=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match AppConfig::load() {
        Ok(config) => {
            info!(
                data_dir = %config.data_dir.display(),
                output_dir = %config.output_dir.display(),
                "configuration loaded"
            );
            state().config = config;
        }
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return;
        }
    }

    loop {
        println!("Select an option:");
        println!("[1] Load datasets");
        println!("[2] Generate Reports");
        println!("[3] Generate one report\n");
        let Some(choice) = prompt("Enter choice: ") else {
            break;
        };
        match choice.as_str() {
            "1" => handle_load(),
            "2" | "3" => {
                println!();
                if choice == "2" {
                    handle_generate_reports();
                } else {
                    handle_generate_one();
                }
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            _ => println!("Invalid choice. Please enter 1, 2 or 3.\n"),
        }
    }
}
