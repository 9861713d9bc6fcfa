use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use log::warn;

use holidayplanner::calendar::catalogeditor::HolidayCatalogEditor;
use holidayplanner::calendar::holidaycatalog::HolidayCatalog;
use holidayplanner::calendar::holidayrecord::{DATE_FORMAT, HolidayRecord};
use holidayplanner::calendar::region::Region;
use holidayplanner::configuration::PlannerConfiguration;
use holidayplanner::ledger::vacationledger::{Toggle, VacationLedger};
use holidayplanner::logging::init_logging;
use holidayplanner::service::plannerservice::PlannerService;

/// Plan vacation days against regional public holidays.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[clap(flatten)]
    global_opts: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct GlobalOpts {
    /// Planner configuration file. Defaults apply when it does not exist.
    #[arg(global = true, long, default_value = "planner.json")]
    config: PathBuf,

    /// Log level, overriding the configuration file.
    #[arg(global = true, long)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List configured regions and their years.
    Regions,
    /// List the holidays of a region in a year.
    Holidays { region: Region, year: i32 },
    /// Show booked and remaining days.
    Status {
        #[arg(long)]
        year: Option<i32>,
    },
    /// Book or release one or more days (YYYY-MM-DD).
    Toggle {
        #[arg(required = true, value_parser = parse_date)]
        dates: Vec<NaiveDate>,
    },
    /// Print the remaining days of a year.
    Remaining {
        #[arg(long)]
        year: Option<i32>,
    },
    /// Compute the carryover from last year's allotment and usage.
    Carryover { allotment: i32, used: i32 },
    /// Release every booked day of a year.
    Reset { year: i32 },
    /// Set the days carried over from the previous year.
    SetCarryover { days: u32 },
    /// Change the active region.
    SwitchRegion {
        region: Region,
        /// Do not save the current selection before switching.
        #[arg(long)]
        no_save: bool,
    },
    /// Report booked days the holiday configuration no longer accepts.
    Check,
    /// Edit the holiday configuration.
    #[command(subcommand)]
    Catalog(CatalogCommands),
}

#[derive(Subcommand, Debug)]
enum CatalogCommands {
    AddRegion { region: Region },
    /// Set the holidays of a year, each given as `YYYY-MM-DD|Name`.
    AddYear {
        region: Region,
        year: i32,
        #[arg(required = true, value_parser = parse_holiday_entry)]
        holidays: Vec<HolidayRecord>,
    },
    RemoveRegion { region: Region },
    RemoveYear { region: Region, year: i32 },
    /// Add the common fixed-date German holidays for a year.
    Template { region: Region, year: i32 },
}

fn parse_date(text: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT)
        .map_err(|error| format!("invalid date '{}': {}", text, error))
}

fn parse_holiday_entry(text: &str) -> Result<HolidayRecord, String> {
    let (date_part, name_part) = text
        .split_once('|')
        .ok_or_else(|| "expected YYYY-MM-DD|Holiday Name".to_owned())?;
    let name = name_part.trim();
    if name.is_empty() {
        return Err("holiday name is empty".to_owned());
    }
    Ok(HolidayRecord::new(parse_date(date_part)?, name))
}

fn current_year() -> i32 {
    Local::now().year()
}

fn run_catalog(config: &PlannerConfiguration, command: CatalogCommands) -> Result<()> {
    let mut editor = HolidayCatalogEditor::open(&config.holiday_config_path)?;
    match command {
        CatalogCommands::AddRegion { region } => editor.add_region(&region)?,
        CatalogCommands::AddYear { region, year, holidays } => {
            editor.add_year(&region, year, holidays)?
        },
        CatalogCommands::RemoveRegion { region } => editor.remove_region(&region)?,
        CatalogCommands::RemoveYear { region, year } => editor.remove_year(&region, year)?,
        CatalogCommands::Template { region, year } => {
            editor.add_german_template(&region, year)?
        },
    }
    editor
        .save()
        .with_context(|| format!("saving {}", editor.path().display()))?;
    Ok(())
}

fn print_regions(catalog: &HolidayCatalog) {
    if catalog.is_empty() {
        println!("No regions found in configuration.");
        return;
    }
    for region in catalog.regions() {
        let years = catalog.years(region).unwrap_or_default();
        let years: Vec<String> = years.iter().map(|y| y.to_string()).collect();
        println!("{}: {} year(s) - {}", region, years.len(), years.join(", "));
    }
}

fn print_status(service: &PlannerService, year: i32) {
    let summary = service.summary(year);
    println!("Region: {}", summary.region);
    println!("Year: {}", summary.year);
    println!("Allotment: {} (+{} carried over)", summary.allotment, summary.carryover);
    println!("Booked days: {}", summary.booked);
    println!("Days left: {}", summary.remaining);
    match summary.working_days {
        Some(days) => println!("Working days: {}", days),
        None => println!("No holiday data for {} in {}", summary.region, summary.year),
    }
    for d in service.selection().days_in_year(year) {
        println!("  {}", d.format(DATE_FORMAT));
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = PlannerConfiguration::load_or_default(&cli.global_opts.config)?;
    let level = cli.global_opts.log_level.as_deref().unwrap_or(&config.log_level);
    let _logger = init_logging(level, config.log_dir.as_deref())?;
    if !cli.global_opts.config.exists() {
        warn!(
            "event=config_missing module=main path={} status=defaults",
            cli.global_opts.config.display()
        );
    }

    match cli.command {
        Commands::Catalog(command) => run_catalog(&config, command),
        Commands::Carryover { allotment, used } => {
            println!("{}", VacationLedger::carryover(allotment, used));
            Ok(())
        },
        Commands::Regions => {
            print_regions(&HolidayCatalog::from_reader(&config.holiday_config_path)?);
            Ok(())
        },
        Commands::Holidays { region, year } => {
            let catalog = HolidayCatalog::from_reader(&config.holiday_config_path)?;
            for record in catalog.holidays_for(&region, year)? {
                println!("{}  {}", record.date().format(DATE_FORMAT), record.name());
            }
            Ok(())
        },
        Commands::Status { year } => {
            let service = PlannerService::open(&config)?;
            print_status(&service, year.unwrap_or_else(current_year));
            Ok(())
        },
        Commands::Remaining { year } => {
            let service = PlannerService::open(&config)?;
            println!("{}", service.remaining_days(year.unwrap_or_else(current_year)));
            Ok(())
        },
        Commands::Check => {
            let service = PlannerService::open(&config)?;
            let orphans = service.orphaned_selections();
            if orphans.is_empty() {
                println!("All booked days match the holiday configuration.");
            }
            for orphan in orphans {
                println!("{}  {:?}", orphan.date.format(DATE_FORMAT), orphan.reason);
            }
            Ok(())
        },
        Commands::Toggle { dates } => {
            let mut service = PlannerService::open(&config)?;
            let mut outcome = Ok(());
            for d in dates {
                match service.toggle(d) {
                    Ok(Toggle::Selected) => println!("booked {}", d),
                    Ok(Toggle::Deselected) => println!("released {}", d),
                    Err(error) => {
                        outcome = Err(error);
                        break;
                    }
                }
                println!("Days left in {}: {}", d.year(), service.remaining_days(d.year()));
            }
            save_and_close(service)?;
            Ok(outcome?)
        },
        Commands::Reset { year } => {
            let mut service = PlannerService::open(&config)?;
            println!("released {} day(s)", service.reset_year(year));
            save_and_close(service)
        },
        Commands::SetCarryover { days } => {
            let mut service = PlannerService::open(&config)?;
            service.set_carryover(days);
            save_and_close(service)
        },
        Commands::SwitchRegion { region, no_save } => {
            let mut service = PlannerService::open(&config)?;
            service.switch_region(region, !no_save)?;
            save_and_close(service)
        },
    }
}

fn save_and_close(service: PlannerService) -> Result<()> {
    let (_, result) = service.close();
    Ok(result?)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::{CatalogCommands, Cli, Commands, parse_holiday_entry};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn holiday_entry_parses_date_and_name() {
        let record = parse_holiday_entry("2026-01-06 | Epiphany").unwrap();
        assert_eq!(record.name(), "Epiphany");
        assert_eq!(record.date().to_string(), "2026-01-06");
        assert!(parse_holiday_entry("2026-01-06").is_err());
        assert!(parse_holiday_entry("2026-02-30|Nope").is_err());
    }

    #[test]
    fn region_arguments_are_normalized_and_never_blank() {
        let cli = Cli::try_parse_from(["holidayplanner", "catalog", "add-region", " Bavaria "]).unwrap();
        match cli.command {
            Commands::Catalog(CatalogCommands::AddRegion { region }) => assert_eq!(region.as_str(), "bavaria"),
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(Cli::try_parse_from(["holidayplanner", "catalog", "add-region", " "]).is_err());
        assert!(Cli::try_parse_from(["holidayplanner", "switch-region", ""]).is_err());
    }
}
