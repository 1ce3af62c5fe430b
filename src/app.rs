use clap::{error::ErrorKind, Parser};
use colored::Colorize;

use crate::auth::{self, DemoCredentials};
use crate::cli::args::{CliArgs, Command, RecordsArgs};
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::filter::{FilterCriteria, RecordView};
use crate::output::{self, OutputFormat};
use crate::policy::{self, Capability};
use crate::records::repository::Repository;
use crate::records::{parse_date, Priority, Status};
use crate::session::{Session, SessionStore};
use crate::states::{self, StateDataset};
use crate::store::KvStore;

const LOGIN_REQUIRED: &str = "You must be logged in to view records. Run 'merisadak login' first.";

fn format_kv_line(label: &str, value: &str) {
    println!(":: {:<10}: {}", label, value);
}

fn format_bool(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn print_success(message: &str) {
    println!("{}", message.bold().green());
}

fn print_warning(message: &str) {
    eprintln!("{}", message.bold().yellow());
}

#[derive(Clone, Debug)]
struct RunConfig {
    command: Command,
    data_dir: String,
    records_url: Option<String>,
    output: Option<String>,
    output_format: Option<String>,
    no_color: bool,
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let no_color = args.no_color || cfg.no_color.unwrap_or(false);
    let data_dir = args
        .data_dir
        .or(cfg.data_dir)
        .map(|p| config::expand_tilde_string(&p))
        .unwrap_or_else(|| config::default_data_dir().to_string_lossy().to_string());
    let records_url = args.records_url.or(cfg.records_url);
    let output = cfg.output.map(|p| config::expand_tilde_string(&p));
    let output_format = cfg.output_format;

    Ok(RunConfig {
        command: args.command,
        data_dir,
        records_url,
        output,
        output_format,
        no_color,
    })
}

fn build_criteria(args: &RecordsArgs) -> Result<FilterCriteria, String> {
    let status = match FilterCriteria::facet(args.status.as_deref()) {
        Some(raw) => {
            Some(Status::parse(&raw).ok_or_else(|| format!("invalid --status '{raw}'"))?)
        }
        None => None,
    };
    let priority = match FilterCriteria::facet(args.priority.as_deref()) {
        Some(raw) => {
            Some(Priority::parse(&raw).ok_or_else(|| format!("invalid --priority '{raw}'"))?)
        }
        None => None,
    };
    let min_date = match args.since.as_deref() {
        Some(raw) => Some(parse_date(raw).ok_or_else(|| format!("invalid --since '{raw}'"))?),
        None => None,
    };
    Ok(FilterCriteria {
        state: FilterCriteria::facet(args.state.as_deref()).map(|s| states::slugify(&s)),
        district: FilterCriteria::facet(args.district.as_deref()).map(|s| states::slugify(&s)),
        kind: FilterCriteria::facet(args.kind.as_deref()),
        status,
        priority,
        min_date,
    })
}

fn summarize_criteria(criteria: &FilterCriteria) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();
    if let Some(state) = criteria.state.as_deref() {
        parts.push(format!("state={state}"));
    }
    if let Some(district) = criteria.district.as_deref() {
        parts.push(format!("district={district}"));
    }
    if let Some(kind) = criteria.kind.as_deref() {
        parts.push(format!("type={kind}"));
    }
    if let Some(status) = criteria.status {
        parts.push(format!("status={}", status.as_str()));
    }
    if let Some(priority) = criteria.priority {
        parts.push(format!("priority={}", priority.as_str()));
    }
    if let Some(min_date) = criteria.min_date {
        parts.push(format!("since={min_date}"));
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

fn login(sessions: &SessionStore, email: &str, password: &str) -> Result<(), String> {
    let record =
        auth::authenticate(&DemoCredentials, email, password).map_err(|e| e.to_string())?;
    let session = Session::start(email, &record);
    sessions.persist(&session).map_err(|e| e.to_string())?;
    print_success(&format!("Welcome back, {}!", session.name));
    Ok(())
}

fn logout(sessions: &SessionStore) -> Result<(), String> {
    sessions.clear().map_err(|e| e.to_string())?;
    print_success("You have been logged out successfully.");
    Ok(())
}

fn whoami(session: Option<&Session>) -> Result<(), String> {
    let Some(session) = session else {
        println!("Not logged in.");
        return Ok(());
    };
    format_kv_line("User", &format!("{} <{}>", session.name, session.email));
    format_kv_line("Role", session.role.as_str());
    format_kv_line("State", session.state.as_deref().unwrap_or("all"));
    format_kv_line("Login", &session.login_time);
    let features = Capability::ALL
        .iter()
        .map(|c| {
            format!(
                "{}={}",
                c.label(),
                format_bool(policy::allows(Some(session), *c))
            )
        })
        .collect::<Vec<_>>()
        .join(" ");
    format_kv_line("Features", &features);
    Ok(())
}

fn list_states(session: Option<&Session>) -> Result<(), String> {
    if !policy::is_authenticated(session) {
        return Err(LOGIN_REQUIRED.to_string());
    }
    let dataset = StateDataset::load_embedded()?;
    let options = states::options_for(session, &dataset);
    if options.locked {
        format_kv_line("States", "locked to your bound state");
    } else {
        format_kv_line("States", &options.options.len().to_string());
    }
    for option in &options.options {
        if option.selected {
            println!("{} (selected)", option.label);
        } else {
            println!("{}", option.label);
        }
    }
    Ok(())
}

fn list_districts(state: &str) -> Result<(), String> {
    let dataset = StateDataset::load_embedded()?;
    let key = states::slugify(state);
    let Some(districts) = dataset.districts(&key) else {
        return Err(format!("unknown state '{state}'"));
    };
    for district in districts {
        println!("{}", states::display_case(district));
    }
    Ok(())
}

fn import_records(
    session: Option<&Session>,
    store: &KvStore,
    run: &RunConfig,
    file: &str,
) -> Result<(), String> {
    if !policy::is_authenticated(session) {
        return Err(LOGIN_REQUIRED.to_string());
    }
    if !policy::allows(session, Capability::UploadData) {
        return Err("upload-data is not available for your role".to_string());
    }
    let repository = Repository::new(store.clone(), run.records_url.clone());
    let records = repository
        .replace_from_file(&config::expand_tilde_string(file))
        .map_err(|e| e.to_string())?;
    print_success(&format!("Imported {} records.", records.len()));
    Ok(())
}

async fn sync_records(
    session: Option<&Session>,
    store: &KvStore,
    run: &RunConfig,
) -> Result<(), String> {
    if !policy::is_authenticated(session) {
        return Err(LOGIN_REQUIRED.to_string());
    }
    let repository = Repository::new(store.clone(), run.records_url.clone());
    repository.invalidate().map_err(|e| e.to_string())?;
    let loaded = repository.load().await.map_err(|e| e.to_string())?;
    if let Some(warning) = loaded.cache_warning.as_deref() {
        print_warning(warning);
    }
    print_success(&format!("Fetched {} records.", loaded.records.len()));
    Ok(())
}

async fn show_records(
    run: &RunConfig,
    store: &KvStore,
    session: Option<&Session>,
    args: RecordsArgs,
) -> Result<(), String> {
    if !policy::is_authenticated(session) {
        return Err(LOGIN_REQUIRED.to_string());
    }
    let dataset = StateDataset::load_embedded()?;
    let repository = Repository::new(store.clone(), run.records_url.clone());
    if args.sync {
        repository.invalidate().map_err(|e| e.to_string())?;
    }

    let mut view = RecordView::default();
    view.set_criteria(build_criteria(&args)?);
    if let Some(page) = args.page {
        view.set_page(page);
    }

    let loaded = repository.load().await.map_err(|e| e.to_string())?;
    if let Some(warning) = loaded.cache_warning.as_deref() {
        print_warning(warning);
    }

    let page = view
        .render(session, &loaded.records)
        .map_err(|_| LOGIN_REQUIRED.to_string())?;
    let report = output::build_report(&page);

    let options = states::options_for(session, &dataset);
    format_kv_line("Source", loaded.source.as_str());
    format_kv_line(
        "Filters",
        &summarize_criteria(view.criteria()).unwrap_or_else(|| "none".to_string()),
    );
    if options.locked {
        let bound = options
            .options
            .first()
            .map(|o| o.label.clone())
            .unwrap_or_else(|| "none".to_string());
        format_kv_line("States", &format!("{bound} (locked)"));
    } else {
        format_kv_line("States", &format!("{} selectable", options.options.len()));
    }
    println!();

    let format = args
        .format
        .as_deref()
        .or(run.output_format.as_deref())
        .and_then(OutputFormat::parse)
        .or_else(|| {
            args.output
                .as_deref()
                .and_then(output::infer_format_from_path)
        })
        .unwrap_or(OutputFormat::Text);
    let rendered = match format {
        OutputFormat::Text => output::render_text(&report),
        OutputFormat::Json => output::render_json(&report),
    };
    print!("{}", String::from_utf8_lossy(&rendered));
    println!();
    println!("Showing {} records", report.visible_count);
    println!(
        "{}",
        output::render_pagination_line(report.total_pages, report.current_page)
    );

    if let Some(path) = args.output.clone().or_else(|| run.output.clone()) {
        if !policy::allows(session, Capability::DownloadReport) {
            return Err("download-report is not available for your role".to_string());
        }
        let path = config::expand_tilde_string(&path);
        std::fs::write(&path, &rendered)
            .map_err(|e| format!("failed to write report '{path}': {e}"))?;
        print_success(&format!("Report saved to {path}."));
    }
    Ok(())
}

async fn run_async(run: RunConfig) -> Result<(), String> {
    let store = KvStore::open(&run.data_dir).map_err(|e| e.to_string())?;
    let sessions = SessionStore::new(store.clone());
    let session = sessions.restore().map_err(|e| e.to_string())?;

    match run.command.clone() {
        Command::Login { email, password } => login(&sessions, &email, &password),
        Command::Logout => logout(&sessions),
        Command::Whoami => whoami(session.as_ref()),
        Command::States => list_states(session.as_ref()),
        Command::Districts { state } => list_districts(&state),
        Command::Import { file } => import_records(session.as_ref(), &store, &run, &file),
        Command::Sync => sync_records(session.as_ref(), &store, &run).await,
        Command::Records(args) => show_records(&run, &store, session.as_ref(), args).await,
    }
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{e}");
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    let cfg = match args.config.as_ref() {
        Some(path) => config::load_config(&config::expand_tilde(path), false)?,
        None => match config::default_config_path() {
            Some(path) => {
                config::ensure_default_config_file(&path)?;
                config::load_config(&path, true)?
            }
            None => ConfigFile::default(),
        },
    };

    let run = build_run_config(args, cfg)?;
    if run.no_color {
        colored::control::set_override(false);
    }

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;
    rt.block_on(run_async(run))
}
