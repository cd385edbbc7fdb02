use clap::{arg, Command};
use serde::Deserialize;
use serde::Serialize;

use crate::data::{trailing_window, SelectedPeriod};
use crate::loader::DataSource;

mod anim;
mod data;
mod loader;
mod sample;
mod tui;

#[derive(Serialize, Deserialize)]
struct Config {
    data_source: String,
    period: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_source: "sample_data".to_string(),
            period: "30".to_string(),
        }
    }
}

fn cli() -> Command {
    Command::new("fundview")
        .about("A terminal dashboard for a managed account's performance feed")
        .arg_required_else_help(true)
        .subcommand(Command::new("config").about("Print the path to the config file"))
        .subcommand(
            Command::new("dashboard")
                .about("Open the interactive dashboard")
                .arg(
                    arg!(<SOURCE> "Feed base URL or local directory")
                        .required(false)
                        .default_value(""),
                )
                .arg(arg!(-p --period <PERIOD> "Initial chart window (7/30/90/365/all)").required(false)),
        )
        .subcommand(
            Command::new("snapshot")
                .about("Load the feed once and print the metrics as tables")
                .arg(
                    arg!(<SOURCE> "Feed base URL or local directory")
                        .required(false)
                        .default_value(""),
                )
                .arg(arg!(-p --period <PERIOD> "Growth window to summarize (7/30/90/365/all)").required(false)),
        )
}

fn setup_tracing(log_to_file: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if log_to_file {
        // The TUI owns the terminal, so diagnostics go to a file.
        if let Ok(file) = std::fs::File::create("fundview.log") {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::sync::Arc::new(file))
                .with_ansi(false)
                .init();
        }
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

async fn print_snapshot(source: &DataSource, period: SelectedPeriod) {
    use colored::Colorize;
    use comfy_table::{
        presets::UTF8_FULL, Attribute, Cell, CellAlignment, Color as TColor, ContentArrangement,
        Table,
    };

    let outcome = loader::load_or_sample(source).await;
    if outcome.fallback {
        println!("{}", "warning: feed unavailable, showing sample data".yellow());
    }
    let dashboard = &outcome.dashboard;
    let summary = &dashboard.summary;

    let colorize_pct = |v: f64| {
        let c = if v >= 0.0 { TColor::Green } else { TColor::Red };
        Cell::new(format!("{v:.1}%"))
            .set_alignment(CellAlignment::Right)
            .fg(c)
    };

    let mut overview = Table::new();
    overview
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100)
        .set_header(vec![
            Cell::new("Total Managed").add_attribute(Attribute::Bold),
            Cell::new("Avg Monthly").add_attribute(Attribute::Bold),
            Cell::new("In Profit").add_attribute(Attribute::Bold),
            Cell::new("Win Rate").add_attribute(Attribute::Bold),
            Cell::new("Risk").add_attribute(Attribute::Bold),
            Cell::new("Consistency").add_attribute(Attribute::Bold),
        ]);
    overview.add_row(vec![
        Cell::new(format!("{:.2}", summary.total_managed)).set_alignment(CellAlignment::Right),
        colorize_pct(summary.avg_monthly_return),
        Cell::new(format!(
            "{} / {}",
            summary.accounts_in_profit, summary.total_accounts
        ))
        .set_alignment(CellAlignment::Right),
        colorize_pct(summary.win_rate),
        Cell::new(format!("{:.1}", summary.risk_score)).set_alignment(CellAlignment::Right),
        Cell::new(format!("{:.1}", summary.consistency_score)).set_alignment(CellAlignment::Right),
    ]);

    let mut monthly = Table::new();
    monthly
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(40)
        .set_header(vec![
            Cell::new("Month").add_attribute(Attribute::Bold),
            Cell::new("Return").add_attribute(Attribute::Bold),
        ]);
    for entry in &dashboard.monthly {
        monthly.add_row(vec![Cell::new(&entry.month), colorize_pct(entry.pct)]);
    }

    println!("{overview}");
    println!("{monthly}");

    let window = trailing_window(&dashboard.growth, period);
    if let (Some(first), Some(last)) = (window.first(), window.last()) {
        println!(
            "Growth ({}): {} points, {} {:.2} -> {} {:.2}",
            period.label(),
            window.len(),
            first.date,
            first.value,
            last.date,
            last.value,
        );
    }
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cfg: Config = confy::load("fundview", "config")?;

    let matches = cli().get_matches();

    if matches.subcommand_matches("config").is_some() {
        println!(
            "Your config file is located here: \n{}",
            confy::get_configuration_file_path("fundview", "config")?.display()
        );
        return Ok(());
    }

    for subcommand in ["dashboard", "snapshot"].iter() {
        if let Some(matches) = matches.subcommand_matches(subcommand) {
            // source from argument, falling back to config
            let mut source_spec = String::new();
            if let Ok(Some(s)) = matches.try_get_one::<String>("SOURCE") {
                source_spec = s.to_string();
            }
            if source_spec.is_empty() {
                source_spec.clone_from(&cfg.data_source);
            }
            let source = DataSource::new(&source_spec);

            let period = matches
                .try_get_one::<String>("period")
                .ok()
                .flatten()
                .and_then(|p| SelectedPeriod::from_str(p))
                .or_else(|| SelectedPeriod::from_str(&cfg.period))
                .unwrap_or_default();

            match subcommand as &str {
                "dashboard" => {
                    setup_tracing(true);
                    if let Err(err) = tui::run_tui(source, period).await {
                        eprintln!("Error running dashboard: {err}");
                    }
                }
                "snapshot" => {
                    setup_tracing(false);
                    print_snapshot(&source, period).await;
                }
                _ => (),
            }
        }
    }

    Ok(())
}
