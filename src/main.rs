mod app;
mod commands;
mod config;
mod domain;
mod engine;
mod input;
mod logging;
mod notifications;
mod persistence;
mod pomodoro;
mod store;
mod ticker;
mod ui;

use anyhow::{Context, Result};
use app::AppState;
use chrono::Local;
use clap::{Parser, Subcommand};
use config::{load_config, save_config, Config, CONFIG_FILE};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use persistence::{
    ensure_data_dir, init_local_data_dir, FileStore, MemoryStore, PersistenceAdapter,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use store::TaskStore;

#[derive(Parser)]
#[command(name = "timebox")]
#[command(about = "A terminal to-do list with time-boxed subtasks and a pomodoro timer", long_about = None)]
struct Cli {
    /// Data directory. Defaults to the nearest .timebox, then ~/.timebox
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Keep tasks in memory only. Config and logs still use the data directory
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .timebox directory in the current directory
    Init,
    /// Print tasks and subtasks with their current state
    List,
    /// Add a task
    Add {
        name: String,
    },
    /// Add a subtask to a task
    AddSubtask {
        /// Task number as shown by `list`
        task: usize,
        name: String,
        /// Start time (YYYY-MM-DD HH:MM)
        #[arg(long)]
        start: Option<String>,
        /// End time (YYYY-MM-DD HH:MM)
        #[arg(long)]
        end: Option<String>,
    },
    /// Toggle completion of a subtask
    Toggle {
        /// Task number as shown by `list`
        task: usize,
        /// Subtask number within the task
        subtask: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::Init) = cli.command {
        let cwd = std::env::current_dir().context("Could not determine current directory")?;
        let data_dir = init_local_data_dir(&cwd)?;
        save_config(data_dir.join(CONFIG_FILE), &Config::default())?;
        println!("Initialized timebox directory: {}", data_dir.display());
        println!();
        println!("Timebox will now use this local directory for task storage.");
        println!("Run 'timebox' to start.");
        return Ok(());
    }

    let data_dir = ensure_data_dir(cli.dir.as_deref())?;
    let config = load_config(data_dir.join(CONFIG_FILE))?;
    logging::init(&data_dir, &config.log_filter)?;
    tracing::info!(dir = %data_dir.display(), ephemeral = cli.ephemeral, "starting");

    let persistence = if cli.ephemeral {
        PersistenceAdapter::new(MemoryStore::new())
    } else {
        PersistenceAdapter::new(FileStore::new(&data_dir))
    };

    match cli.command {
        None => run_tui(persistence, &config),
        Some(command) => run_command(command, persistence),
    }
}

fn run_command(command: Commands, persistence: PersistenceAdapter) -> Result<()> {
    let mut store = TaskStore::with_tasks(persistence.load_tasks());
    let saver = persistence.clone();
    store.subscribe(move |tasks| saver.save_tasks(tasks));

    match command {
        Commands::Init => {}
        Commands::List => {
            print!("{}", commands::render_tree(store.tasks(), Local::now().naive_local()));
        }
        Commands::Add { name } => {
            commands::add_task(&mut store, &name)?;
            println!("Added task {}. {}", store.tasks().len(), name.trim());
        }
        Commands::AddSubtask {
            task,
            name,
            start,
            end,
        } => {
            commands::add_subtask(&mut store, task, &name, start.as_deref(), end.as_deref())?;
            println!("Added subtask to task {}: {}", task, name.trim());
        }
        Commands::Toggle { task, subtask } => {
            let completed = commands::toggle(&mut store, task, subtask)?;
            let state = if completed { "completed" } else { "not completed" };
            println!("Subtask {}.{} is now {}", task, subtask, state);
        }
    }
    Ok(())
}

fn run_tui(persistence: PersistenceAdapter, config: &Config) -> Result<()> {
    let mut app = AppState::new(persistence, config, Local::now());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, &mut app, config);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Cancel pending timers
    app.shutdown();
    tracing::info!("shutting down");

    // Print any errors
    if let Err(err) = result {
        tracing::error!("{:#}", err);
        eprintln!("Error: {}", err);
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
    config: &Config,
) -> Result<()> {
    let tick_rate = ticker::tick_duration(config.tick_ms);

    loop {
        // Render
        terminal.draw(|f| ui::render(f, app))?;

        // Handle events, waking early when a subtask boundary is due
        let timeout = ticker::poll_timeout(tick_rate, app.until_next_wake());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                // Only process key press events (ignore key release)
                if key.kind == KeyEventKind::Press && input::handle_key(app, key)? {
                    return Ok(());
                }
            }
        }

        // Tick timers
        app.tick();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_ephemeral_is_global() {
        let cli = Cli::parse_from(["timebox", "list", "--ephemeral"]);
        assert!(cli.ephemeral);
        assert!(matches!(cli.command, Some(Commands::List)));
    }

    #[test]
    fn test_ephemeral_help_describes_task_storage() {
        let command = Cli::command();
        let help = command
            .get_arguments()
            .find(|arg| arg.get_id() == "ephemeral")
            .and_then(|arg| arg.get_help())
            .map(|help| help.to_string())
            .unwrap();

        assert!(help.starts_with("Keep tasks in memory only"));
    }

    #[test]
    fn test_add_subtask_arguments() {
        let cli = Cli::parse_from([
            "timebox",
            "--dir",
            "/tmp/tb",
            "add-subtask",
            "1",
            "Milk",
            "--start",
            "2024-03-05 10:00:30",
        ]);

        assert_eq!(cli.dir, Some(PathBuf::from("/tmp/tb")));
        match cli.command {
            Some(Commands::AddSubtask {
                task, name, start, end,
            }) => {
                assert_eq!(task, 1);
                assert_eq!(name, "Milk");
                assert_eq!(start.as_deref(), Some("2024-03-05 10:00:30"));
                assert_eq!(end, None);
            }
            _ => panic!("expected add-subtask"),
        }
    }
}
