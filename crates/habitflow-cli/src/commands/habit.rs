//! Habit management commands for CLI.

use chrono::NaiveDate;
use clap::Subcommand;
use habitflow_core::habit::parse_date_input;
use habitflow_core::{Config, CreateHabit, HabitDb, HabitService};

#[derive(Subcommand)]
pub enum HabitAction {
    /// Create a new habit
    Create {
        /// Habit name
        name: String,
        /// Habit description
        #[arg(long)]
        description: Option<String>,
    },
    /// List habits with streak statistics
    List {
        /// Reference date for the current streak (default: today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Delete a habit
    Delete {
        /// Habit ID
        id: String,
    },
    /// Mark a habit completed on a date
    Mark {
        /// Habit ID
        id: String,
        /// Completion date YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Remove a completion date from a habit
    Unmark {
        /// Habit ID
        id: String,
        /// Completion date YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
    },
}

fn open_service(config: &Config) -> Result<HabitService, Box<dyn std::error::Error>> {
    let db = match &config.storage.data_dir {
        Some(dir) => HabitDb::open_at(dir)?,
        None => HabitDb::open()?,
    };
    Ok(HabitService::new(db))
}

fn print_json<T: serde::Serialize>(config: &Config, value: &T) -> Result<(), Box<dyn std::error::Error>> {
    if config.output.pretty {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", serde_json::to_string(value)?);
    }
    Ok(())
}

fn parse_date_opt(date: Option<String>) -> Result<Option<NaiveDate>, Box<dyn std::error::Error>> {
    match date {
        Some(raw) => Ok(Some(parse_date_input(&raw)?)),
        None => Ok(None),
    }
}

pub fn run(action: HabitAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let service = open_service(&config)?;

    match action {
        HabitAction::Create { name, description } => {
            let habit = service.create(CreateHabit { name, description })?;
            println!("Habit created: {}", habit.id);
            print_json(&config, &habit)?;
        }
        HabitAction::List { date } => {
            let habits = match parse_date_opt(date)? {
                Some(today) => service.list_at(today)?,
                None => service.list()?,
            };
            print_json(&config, &habits)?;
        }
        HabitAction::Delete { id } => {
            let ack = service.delete(&id)?;
            print_json(&config, &ack)?;
        }
        HabitAction::Mark { id, date } => {
            let habit = service.mark(&id, parse_date_opt(date)?)?;
            print_json(&config, &habit)?;
        }
        HabitAction::Unmark { id, date } => {
            let habit = service.unmark(&id, parse_date_opt(date)?)?;
            print_json(&config, &habit)?;
        }
    }

    Ok(())
}
