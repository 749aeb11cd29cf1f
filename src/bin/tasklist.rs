use std::error::Error;
use std::io::{stdin, stdout, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use tasklist::config;
use tasklist::controller::{Committed, TaskController};
use tasklist::seed::{HttpSeedSource, JsonFileSeedSource};
use tasklist::storage::FileStorage;
use tasklist::traits::SeedSource;
use tasklist::{Field, TaskError, TaskStore};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Folder the task list is stored into
    #[arg(long, env = "TASKLIST_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the tasks
    List {
        /// Only list the tasks whose title, description, author or category contain this
        #[arg(long, short)]
        search: Option<String>,
    },
    /// Add a task
    Add(TaskFields),
    /// Edit the task at INDEX (as shown by `list`)
    Edit {
        index: usize,
        #[command(flatten)]
        fields: TaskFields,
    },
    /// Delete the task at INDEX (as shown by `list`)
    Delete {
        index: usize,
        /// Do not ask for confirmation
        #[arg(long, short)]
        yes: bool,
    },
    /// Replace the whole list with the tasks of a JSON file or of an http(s) URL
    Seed {
        source: String,
    },
}

#[derive(Debug, Args)]
struct TaskFields {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    author: Option<String>,
    /// One of work, personal, sport, travel, other
    #[arg(long)]
    category: Option<String>,
    /// YYYY-MM-DD, or "" to clear it
    #[arg(long)]
    start_date: Option<String>,
    /// YYYY-MM-DD, or "" to clear it
    #[arg(long)]
    end_date: Option<String>,
    /// 0 to 100
    #[arg(long)]
    progress: Option<String>,
    #[arg(long)]
    event: Option<bool>,
    #[arg(long)]
    important: Option<bool>,
    #[arg(long)]
    urgent: Option<bool>,
}

impl TaskFields {
    /// The fields that have been given on the command line, as raw input
    fn inputs(&self) -> Vec<(Field, String)> {
        let texts = [
            (Field::Title, &self.title),
            (Field::Description, &self.description),
            (Field::Author, &self.author),
            (Field::Category, &self.category),
            (Field::StartDate, &self.start_date),
            (Field::EndDate, &self.end_date),
            (Field::Progress, &self.progress),
        ];
        let flags = [
            (Field::Event, self.event),
            (Field::Importancy, self.important),
            (Field::Urgency, self.urgent),
        ];

        let mut inputs = Vec::new();
        for (field, text) in texts.iter() {
            if let Some(text) = text {
                inputs.push((*field, text.to_string()));
            }
        }
        for (field, flag) in flags.iter() {
            if let Some(flag) = flag {
                inputs.push((*field, flag.to_string()));
            }
        }
        inputs
    }
}


#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let folder = cli.data_dir.unwrap_or_else(|| PathBuf::from(config::data_folder()));
    log::debug!("Using data folder {:?}", folder);

    let store = TaskStore::load(FileStorage::new(&folder));
    let mut controller = TaskController::new(store);

    if let Err(err) = run(cli.command, &mut controller).await {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}

async fn run(command: Command, controller: &mut TaskController<FileStorage>) -> Result<(), Box<dyn Error>> {
    match command {
        Command::List{ search } => {
            list(controller, search.as_deref().unwrap_or(""));
        },
        Command::Add(fields) => {
            controller.open_create();
            fill_and_submit(controller, &fields)?;
        },
        Command::Edit{ index, fields } => {
            controller.open_edit(index)?;
            fill_and_submit(controller, &fields)?;
        },
        Command::Delete{ index, yes } => {
            let request = controller.request_delete(index)?;
            let confirmed = yes || ask(&request.prompt())?;
            match controller.resolve_delete(request, confirmed)? {
                Some(task) => println!("Deleted {:?}", task.title()),
                None => println!("Nothing has been deleted"),
            }
        },
        Command::Seed{ source } => {
            let seed_source: Box<dyn SeedSource> = if source.starts_with("http://") || source.starts_with("https://") {
                Box::new(HttpSeedSource::new(&source)?)
            } else {
                Box::new(JsonFileSeedSource::new(Path::new(&source)))
            };
            if controller.seed_from_external_source(seed_source.as_ref()).await == false {
                return Err(format!("Unable to seed the task list from {}. Run with RUST_LOG=warn for details", source).into());
            }
            println!("The list now holds {} tasks", controller.tasks().len());
        },
    }
    Ok(())
}

fn list(controller: &TaskController<FileStorage>, term: &str) {
    let found = controller.search(term);
    if found.is_empty() {
        if term.is_empty() {
            println!("No tasks yet.");
        } else {
            println!("No task matches {:?}.", term);
        }
        return;
    }
    tasklist::utils::print_task_list(&found);
}

fn fill_and_submit(controller: &mut TaskController<FileStorage>, fields: &TaskFields) -> Result<(), Box<dyn Error>> {
    for (field, raw) in fields.inputs() {
        controller.update_draft_input(field, &raw)?;
    }
    if let Some(priority) = controller.draft_priority() {
        log::info!("Priority of this task: {}", priority);
    }

    match controller.submit() {
        Ok(Committed::Created(index)) => println!("Added task #{}", index),
        Ok(Committed::Updated(index)) => println!("Updated task #{}", index),
        Err(TaskError::Invalid(errors)) => {
            for (field, message) in errors.iter() {
                eprintln!("  {}: {}", field, message);
            }
            return Err("The task has not been saved".into());
        },
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

fn ask(question: &str) -> Result<bool, Box<dyn Error>> {
    print!("{} [y/N] ", question);
    stdout().flush()?;
    let mut answer = String::new();
    stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
