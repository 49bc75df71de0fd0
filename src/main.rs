use anyhow::{anyhow, bail, Context, Result};
use chrono::Local;
use crossterm::style::Stylize;
use fitdesk::config::config::Config;
use fitdesk::data::collection_view::compute_view;
use fitdesk::data::data_exporter::{DataExporter, ExportScope};
use fitdesk::data::filter_options::filter_options;
use fitdesk::data::query::{FieldFilter, QueryParams, SearchMode, SortDirection};
use fitdesk::data::record_adapter::RecordAdapter;
use fitdesk::data::screens::CollectionKind;
use fitdesk::table_display::{display_view, resolve_columns};
use fitdesk::utils::app_paths::AppPaths;
use fitdesk::utils::logging::init_tracing;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExportFormat {
    Csv,
    Json,
}

#[derive(Debug, Default)]
struct CliArgs {
    file: Option<PathBuf>,
    screen: Option<CollectionKind>,
    search: Option<String>,
    search_fields: Vec<String>,
    filters: Vec<(String, String)>,
    categories: Vec<(String, String)>,
    sort: Option<String>,
    direction: Option<SortDirection>,
    page: Option<usize>,
    page_size: Option<usize>,
    missing: Option<String>,
    fuzzy: bool,
    options: Option<String>,
    export: Option<ExportFormat>,
    scope: ExportScope,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
    generate_config: bool,
    debug_log: bool,
    help: bool,
}

impl CliArgs {
    fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Self> {
        let mut parsed = CliArgs::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            let mut value = |flag: &str| {
                args.next()
                    .ok_or_else(|| anyhow!("Missing value for {}", flag))
            };

            match arg.as_str() {
                "--help" | "-h" => parsed.help = true,
                "--generate-config" => parsed.generate_config = true,
                "--fuzzy" => parsed.fuzzy = true,
                "--debug-log" => parsed.debug_log = true,
                "--desc" => parsed.direction = Some(SortDirection::Descending),
                "--asc" => parsed.direction = Some(SortDirection::Ascending),
                "--screen" => parsed.screen = Some(value("--screen")?.parse()?),
                "--search" => parsed.search = Some(value("--search")?),
                "--search-field" => parsed.search_fields.push(value("--search-field")?),
                "--filter" => parsed.filters.push(parse_assignment(&value("--filter")?)?),
                "--category" => parsed
                    .categories
                    .push(parse_assignment(&value("--category")?)?),
                "--sort" => parsed.sort = Some(value("--sort")?),
                "--page" => parsed.page = Some(parse_number("--page", &value("--page")?)?),
                "--page-size" => {
                    parsed.page_size = Some(parse_number("--page-size", &value("--page-size")?)?)
                }
                "--missing" => parsed.missing = Some(value("--missing")?),
                "--options" => parsed.options = Some(value("--options")?),
                "--export" => {
                    parsed.export = Some(match value("--export")?.to_ascii_lowercase().as_str() {
                        "csv" => ExportFormat::Csv,
                        "json" => ExportFormat::Json,
                        other => bail!("Unknown export format '{}' (use csv or json)", other),
                    })
                }
                "--scope" => {
                    parsed.scope = match value("--scope")?.to_ascii_lowercase().as_str() {
                        "page" => ExportScope::CurrentPage,
                        "all" => ExportScope::AllFiltered,
                        other => bail!("Unknown export scope '{}' (use page or all)", other),
                    }
                }
                "--output" | "-o" => parsed.output = Some(PathBuf::from(value("--output")?)),
                "--config" => parsed.config = Some(PathBuf::from(value("--config")?)),
                flag if flag.starts_with('-') => bail!("Unknown option '{}'", flag),
                _ => {
                    if parsed.file.is_some() {
                        bail!("Only one data file can be given");
                    }
                    parsed.file = Some(PathBuf::from(&arg));
                }
            }
        }

        Ok(parsed)
    }
}

fn parse_assignment(text: &str) -> Result<(String, String)> {
    let (field, expected) = text
        .split_once('=')
        .ok_or_else(|| anyhow!("Filter '{}' must look like FIELD=VALUE", text))?;
    Ok((field.trim().to_string(), expected.trim().to_string()))
}

fn parse_number(flag: &str, text: &str) -> Result<usize> {
    text.parse::<usize>()
        .with_context(|| format!("{} expects a non-negative number, got '{}'", flag, text))
}

fn print_help() {
    println!("{}", "fitdesk - fitness center list viewer".blue().bold());
    println!();
    println!("{}", "Usage:".yellow());
    println!("  fitdesk [OPTIONS] FILE.json");
    println!();
    println!("{}", "View options:".yellow());
    println!("  {}        - List screen preset", "--screen KIND".green());
    println!(
        "                         ({})",
        CollectionKind::ALL
            .iter()
            .map(|k| k.key())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("  {}        - Free-text search", "--search TERM".green());
    println!("  {}   - Field to search (repeatable)", "--search-field F".green());
    println!("  {}     - Field filter, V = all for none (repeatable)", "--filter F=V".green());
    println!("  {}   - Case-insensitive field filter (repeatable)", "--category F=V".green());
    println!("  {}           - Sort column", "--sort F".green());
    println!("  {}        - Sort direction", "--asc / --desc".green());
    println!("  {} - 1-based page and page size", "--page N --page-size N".green());
    println!("  {}  - Missing numbers sort as 0 or last", "--missing zero|last".green());
    println!("  {}            - Fuzzy search matching", "--fuzzy".green());
    println!("  {}    - Show filter choices for a field", "--options F".green());
    println!();
    println!("{}", "Export:".yellow());
    println!("  {}  - Export the view", "--export csv|json".green());
    println!("  {}   - Current page or every match", "--scope page|all".green());
    println!("  {}    - Export file path", "--output PATH".green());
    println!();
    println!("{}", "Other:".yellow());
    println!("  {}      - Use a specific config file", "--config PATH".green());
    println!("  {}  - Write a commented default config", "--generate-config".green());
    println!("  {}        - Print captured log entries", "--debug-log".green());
    println!();
}

fn generate_config() -> Result<()> {
    let path = Config::get_config_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Error creating config directory {:?}", parent))?;
    }
    std::fs::write(&path, Config::create_default_with_comments())
        .with_context(|| format!("Error writing config file {:?}", path))?;

    println!("Configuration file created at: {:?}", path);
    Ok(())
}

fn build_params(args: &CliArgs, config: &Config) -> Result<QueryParams> {
    let page_size = args.page_size.unwrap_or(config.view.default_page_size);
    let preset = args.screen.map(CollectionKind::preset);

    let mut params = match preset {
        Some(preset) => preset.initial_params(page_size),
        None => QueryParams::new().with_page(1, page_size),
    };
    params = config.view.apply_to(params);

    if let Some(term) = &args.search {
        params.search_term = term.clone();
    }
    if !args.search_fields.is_empty() {
        params.search_fields = args.search_fields.clone();
    }
    if !params.search_term.is_empty() && params.search_fields.is_empty() {
        bail!("--search needs --search-field when no --screen is given");
    }

    for (field, expected) in &args.filters {
        let filter = match preset {
            Some(preset) => preset.filter_for(field, expected),
            None => FieldFilter::from_select(expected),
        };
        params = params.with_filter(field.as_str(), filter);
    }
    for (field, expected) in &args.categories {
        params = params.with_filter(field.as_str(), FieldFilter::category(expected));
    }

    if let Some(field) = &args.sort {
        params.sort_field = Some(field.clone());
        params.sort_direction = SortDirection::Ascending;
    }
    if let Some(direction) = args.direction {
        params.sort_direction = direction;
    }
    if let Some(page) = args.page {
        params.page = page;
    }
    if let Some(missing) = &args.missing {
        params.missing_values = missing.parse()?;
    }
    if args.fuzzy {
        params.search_mode = SearchMode::Fuzzy;
    }

    Ok(params)
}

fn default_export_path(format: ExportFormat, kind: Option<CollectionKind>) -> Result<PathBuf> {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let stem = kind.map(CollectionKind::key).unwrap_or("records");
    let extension = match format {
        ExportFormat::Csv => "csv",
        ExportFormat::Json => "json",
    };
    Ok(AppPaths::export_dir()?.join(format!("{}_{}.{}", stem, timestamp, extension)))
}

/// Load the config before logging exists; `report_config` logs it afterwards
fn load_config(path: Option<&Path>) -> Result<(Config, PathBuf)> {
    match path {
        Some(path) => Ok((Config::load_from(path)?, path.to_path_buf())),
        None => Ok((Config::load()?, Config::get_config_path()?)),
    }
}

fn report_config(config: &Config, path: &Path) {
    debug!(
        target: "config",
        "loaded config from {:?} (page size {}, missing values {:?})",
        path,
        config.view.default_page_size,
        config.view.missing_values
    );
}

fn run(args: CliArgs) -> Result<()> {
    if args.help {
        print_help();
        return Ok(());
    }

    if args.generate_config {
        return generate_config();
    }

    let (config, config_path) = load_config(args.config.as_deref())?;

    let log_buffer = init_tracing(&config.logging.level, args.debug_log)?;
    report_config(&config, &config_path);

    let file = args
        .file
        .clone()
        .ok_or_else(|| anyhow!("No data file given (try --help)"))?;

    let adapter = match args.screen {
        Some(kind) => RecordAdapter::for_kind(kind),
        None => RecordAdapter::new(),
    };
    let records = adapter.load_json_file(&file)?;
    info!(target: "fitdesk", "loaded {} records from {:?}", records.len(), file);

    let params = build_params(&args, &config)?;

    if let Some(field) = &args.options {
        let case_insensitive = args
            .screen
            .is_some_and(|kind| kind.preset().is_category_field(field));
        for option in filter_options(&records, field, case_insensitive) {
            println!("{:<24} {:>6}", option.label, option.count);
        }
        return Ok(());
    }

    let view = compute_view(&records, &params);
    let columns = resolve_columns(args.screen.map(CollectionKind::preset), &records);

    if let Some(kind) = args.screen {
        let title = kind.preset().title;
        if config.display.use_color {
            println!("{}", title.bold());
        } else {
            println!("{}", title);
        }
    }
    display_view(&view, &columns, &params, &config.display);

    if let Some(format) = args.export {
        let path = match &args.output {
            Some(path) => path.clone(),
            None => default_export_path(format, args.screen)?,
        };
        let message = match format {
            ExportFormat::Csv => {
                DataExporter::export_view_to_csv(&view, &columns, args.scope, &path)?
            }
            ExportFormat::Json => DataExporter::export_view_to_json(&view, args.scope, &path)?,
        };
        println!("{}", message);
    }

    if let Some(buffer) = log_buffer {
        println!();
        println!("{}", "Recent log entries:".yellow());
        for entry in buffer.get_recent(50) {
            println!("  {}", entry.format_for_display());
        }
    }

    Ok(())
}

fn main() {
    let result = CliArgs::parse(std::env::args().skip(1)).and_then(run);

    if let Err(e) = result {
        eprintln!("{}", format!("Error: {:#}", e).red());
        std::process::exit(1);
    }
}
