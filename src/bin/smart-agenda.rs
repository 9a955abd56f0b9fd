use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use smart_agenda::assistant::{Coordinates, GeminiAssistant, OfflineAssistant};
use smart_agenda::storage::JsonFileSlot;
use smart_agenda::traits::Assistant;
use smart_agenda::{Agenda, AgendaError, Category, TaskDraft, TaskId};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// File that holds the tasks
    ///
    /// Defaults to $SMART_AGENDA_FILE, or smart-agenda-tasks.json in the current folder.
    #[arg(long, short, global = true)]
    file: Option<PathBuf>,

    /// Never call the assistant, use default location details and links instead
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a task
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        location: String,
        /// Work, Home, Courses or Training
        #[arg(long)]
        category: Category,
        #[arg(long, default_value = "")]
        description: String,
        /// YYYY-MM-DD
        #[arg(long)]
        date: Option<String>,
        /// HH:MM, 24-hour clock
        #[arg(long)]
        time: Option<String>,
        #[command(flatten)]
        position: PositionArgs,
    },
    /// Change some fields of a task
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        category: Option<Category>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, conflicts_with = "clear_date")]
        date: Option<String>,
        #[arg(long, conflicts_with = "clear_time")]
        time: Option<String>,
        #[arg(long)]
        clear_date: bool,
        #[arg(long)]
        clear_time: bool,
        #[command(flatten)]
        position: PositionArgs,
    },
    /// Delete a task
    Delete {
        id: String,
    },
    /// Show the board, one column per category
    List,
    /// Show every task with a location in chronological order, and a link to the whole journey
    Itinerary,
    /// Show the maps link of a task
    Route {
        id: String,
    },
    /// Ask the assistant for the best order to go through the tasks
    Optimize,
}

/// Current position, used to improve location lookups.
///
/// Defaults to $SMART_AGENDA_LAT and $SMART_AGENDA_LNG.
#[derive(Debug, Args)]
struct PositionArgs {
    #[arg(long, requires = "lng", allow_hyphen_values = true)]
    lat: Option<f64>,
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lng: Option<f64>,
}

impl PositionArgs {
    fn resolve(&self) -> Option<Coordinates> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)),
            _ => smart_agenda::config::position_from_env(),
        }
    }
}


#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    let path = cli.file.clone().unwrap_or_else(smart_agenda::config::storage_file_from_env);
    let slot = JsonFileSlot::new(&path);

    let result = if cli.offline {
        run(Agenda::load(slot, OfflineAssistant), cli.command).await
    } else {
        match GeminiAssistant::from_env() {
            Ok(gemini) => run(Agenda::load(slot, gemini), cli.command).await,
            Err(err) => {
                log::warn!("Unable to set up the assistant ({}). Working offline", err);
                run(Agenda::load(slot, OfflineAssistant), cli.command).await
            },
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        },
    }
}

async fn run<A: Assistant>(mut agenda: Agenda<JsonFileSlot, A>, command: Command) -> Result<(), AgendaError> {
    match command {
        Command::Add { title, location, category, description, date, time, position } => {
            let mut draft = TaskDraft::new(title, location, category).with_description(description);
            draft.date = date;
            draft.time = time;
            let id = agenda.create_task(draft, position.resolve()).await?;
            println!("{}", id);
        },

        Command::Edit { id, title, location, category, description, date, time, clear_date, clear_time, position } => {
            let id = TaskId::from(id);
            let mut draft = match agenda.store().get(&id) {
                None => return Err(AgendaError::NotFound(id)),
                Some(task) => task.to_draft(),
            };
            if let Some(title) = title { draft.title = title; }
            if let Some(location) = location { draft.location = location; }
            if let Some(category) = category { draft.category = category; }
            if let Some(description) = description { draft.description = description; }
            if date.is_some() || clear_date { draft.date = date; }
            if time.is_some() || clear_time { draft.time = time; }
            agenda.edit_task(&id, draft, position.resolve()).await?;
        },

        Command::Delete { id } => {
            let id = TaskId::from(id);
            if agenda.delete_task(&id) == false {
                log::info!("There is no task {}", id);
            }
        },

        Command::List => {
            smart_agenda::utils::print_board(&agenda.board());
        },

        Command::Itinerary => {
            let itinerary = agenda.itinerary();
            if itinerary.is_empty() {
                println!("Nowhere to go.");
                return Ok(());
            }
            for (index, task) in itinerary.iter().enumerate() {
                println!("{:>3}. {}", index + 1, smart_agenda::utils::format_task(task));
            }
            if let Some(url) = agenda.itinerary_url() {
                println!("\n{}", url);
            }
        },

        Command::Route { id } => {
            println!("{}", agenda.route_url(&TaskId::from(id))?);
        },

        Command::Optimize => {
            println!("{}", agenda.optimize().await?);
        },
    }
    Ok(())
}
