/*!
# moodlog - A Daily Mood Tracker

moodlog records one mood per calendar day, lists and browses past entries,
and exports any date range as a PDF report.

## Usage

```text
moodlog [OPTIONS] <COMMAND>

Commands:
  log       Record the mood for a day, replacing any earlier entry for that day
  list      List entries in a date range
  show      Show the entry for a single day
  delete    Delete an entry by id
  moods     Show or replace the mood taxonomy
  export    Export a date range as a PDF report
  calendar  Show a month as a calendar grid

Options:
  -v, --verbose                  Print verbose output
      --log-format <LOG_FORMAT>  Log output format [default: text] [possible values: text, json]
```

## Configuration

- `MOODLOG_DIR`: The data directory (defaults to "~/.moodlog")
- `MOODLOG_DB`: The database file name inside it (defaults to "moodlog.db")
- `RUST_LOG`: Overrides the log filter
*/

use clap::Parser;
use moodlog::cli::{
    date_or_today, parse_entry_id, parse_month, write_json, CalendarArgs, CliArgs, Command,
    ExportArgs, ListArgs, LogArgs, MoodsArgs,
};
use moodlog::config::Config;
use moodlog::constants::{
    DEFAULT_LOG_LEVEL, LOG_FORMAT_JSON, TRACING_ROOT_SPAN_NAME, TRACING_SERVICE_NAME,
    VERBOSE_LOG_LEVEL,
};
use moodlog::db::{ensure_data_dir_exists, SqliteStore};
use moodlog::entries::{build_views, Entry};
use moodlog::errors::AppResult;
use moodlog::export::write_document;
use moodlog::mood::MoodTaxonomy;
use moodlog::ops;
use moodlog::range::{local_today, DateRange};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, error, info, info_span};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn main() {
    let args = CliArgs::parse();
    init_tracing(&args);

    let span = info_span!(
        TRACING_ROOT_SPAN_NAME,
        service = TRACING_SERVICE_NAME,
        invocation_id = %uuid::Uuid::new_v4()
    );
    let _guard = span.enter();

    if let Err(e) = run(args) {
        error!("{}", e);
        std::process::exit(1);
    }
}

/// Logs go to stderr so command output on stdout stays pipeable.
fn init_tracing(args: &CliArgs) {
    let level = if args.verbose {
        VERBOSE_LOG_LEVEL
    } else {
        DEFAULT_LOG_LEVEL
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("moodlog={}", level)));

    let registry = tracing_subscriber::registry().with(filter);
    if args.log_format == LOG_FORMAT_JSON {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn run(args: CliArgs) -> AppResult<()> {
    debug!("CLI arguments: {:?}", args);

    let config = Config::load()?;
    debug!("Loaded configuration: {:?}", config);
    ensure_data_dir_exists(&config.data_dir)?;
    let store = SqliteStore::open(&config.db_path())?;

    match args.command {
        Command::Log(log) => log_mood(&store, log),
        Command::List(list) => list_range(&store, list),
        Command::Show(show) => show_day(&store, show.date.as_deref()),
        Command::Delete(delete) => {
            let id = parse_entry_id(&delete.id)?;
            if ops::delete_entry(&store, id)? {
                println!("Deleted entry {}", id);
            } else {
                println!("No entry with id {}", id);
            }
            Ok(())
        }
        Command::Moods(moods) => manage_moods(&store, moods),
        Command::Export(export) => export_report(&store, export),
        Command::Calendar(calendar) => print_calendar(&store, calendar),
    }
}

fn log_mood(store: &SqliteStore, args: LogArgs) -> AppResult<()> {
    let date = date_or_today(args.date.as_deref())?;
    let taxonomy = ops::get_mood_config(store)?;
    let input = ops::entry_input_for_mood(&taxonomy, date, &args.mood, args.note.as_deref())?;
    let entry = ops::upsert_entry(store, &input)?;
    println!("Saved {} {} for {}", entry.emoji, entry.mood_value, entry.date);
    Ok(())
}

fn list_range(store: &SqliteStore, args: ListArgs) -> AppResult<()> {
    let range = args.range.to_spec()?.resolve_now()?;
    let entries = ops::list_entries_open(store, &range)?;

    if args.json {
        return write_json(std::io::stdout().lock(), &entries);
    }

    if entries.is_empty() {
        println!("No entries: {}", range.timeframe());
        return Ok(());
    }

    let views = build_views(&entries);
    for entry in &views.ordered {
        println!("{}", entry_line(entry));
    }
    info!("Listed {} entries for {}", views.len(), range);
    Ok(())
}

fn show_day(store: &SqliteStore, date: Option<&str>) -> AppResult<()> {
    let date = date_or_today(date)?;
    let views = build_views(&ops::list_entries(store, &DateRange::month_of(date)?)?);

    match views.get(date) {
        Some(entry) => {
            println!("{}", entry_line(entry));
            println!("id: {}", entry.id);
            println!("updated: {}", entry.updated_at.to_rfc3339());
        }
        None if date == local_today() => println!("Nothing recorded today yet"),
        None => println!("Nothing recorded on {}", date),
    }
    Ok(())
}

fn manage_moods(store: &SqliteStore, args: MoodsArgs) -> AppResult<()> {
    if let Some(path) = args.set {
        let taxonomy = MoodTaxonomy::from_json(&fs::read_to_string(&path)?)?;
        ops::set_mood_config(store, &taxonomy)?;
        println!("Saved {} moods", taxonomy.len());
        return Ok(());
    }

    let taxonomy = if args.defaults {
        ops::get_mood_defaults()
    } else {
        ops::get_mood_config(store)?
    };
    for mood in &taxonomy.moods {
        println!(
            "{} {:<12} {:<12} {}",
            mood.emoji,
            mood.value,
            mood.label,
            mood.color_or_default()
        );
    }
    Ok(())
}

fn export_report(store: &SqliteStore, args: ExportArgs) -> AppResult<()> {
    let range = args.range.to_spec()?.resolve_now()?;
    let document = ops::export_open_range(store, &range)?;
    let path = args
        .output
        .unwrap_or_else(|| PathBuf::from(&document.file_name));

    write_document(&document, &path)?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn print_calendar(store: &SqliteStore, args: CalendarArgs) -> AppResult<()> {
    let day = match args.month.as_deref() {
        Some(month) => parse_month(month)?,
        None => local_today(),
    };
    let calendar = ops::month_calendar(store, day)?;

    println!("{}", calendar.range.start.format("%B %Y"));
    println!(" Mo  Tu  We  Th  Fr  Sa  Su");
    for week in &calendar.weeks {
        let cells: Vec<String> = week
            .iter()
            .map(|cell| match cell {
                Some(day) => match &day.entry {
                    Some(entry) => format!(" {} ", entry.emoji),
                    None => format!("{:>3} ", day.date.format("%-d")),
                },
                None => "    ".to_string(),
            })
            .collect();
        println!("{}", cells.concat().trim_end());
    }
    println!("{} days recorded", calendar.recorded_days());
    Ok(())
}

fn entry_line(entry: &Entry) -> String {
    match &entry.note {
        Some(note) => format!("{}  {} {}  {}", entry.date, entry.emoji, entry.mood_value, note),
        None => format!("{}  {} {}", entry.date, entry.emoji, entry.mood_value),
    }
}
