use std::{
    io::{self, Write},
    time::Duration,
};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal,
};

use crate::manager::progress::UploadSummary;
use crate::manager::upload_store::UploadStore;
use crate::models::task::{FileSource, TaskId, UploadStatus, UploadTask};

const WATCH_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Add(Vec<String>),
    List,
    Status(TaskId),
    Progress,
    Watch,
    Clear,
    Help,
    Exit,
    Invalid(String),
    Empty,
}

pub fn parse_command(input: &str) -> Command {
    let mut args = input.split_whitespace();
    match args.next() {
        Some("add") => {
            let paths: Vec<String> = args.map(str::to_string).collect();
            if paths.is_empty() {
                Command::Invalid("At least one file path must be specified.".into())
            } else {
                Command::Add(paths)
            }
        }
        Some("list") => Command::List,
        Some("status") => match args.next() {
            Some(id_str) => match id_str.parse::<u64>() {
                Ok(id) => Command::Status(TaskId(id)),
                Err(_) => Command::Invalid("Invalid task ID format.".into()),
            },
            None => Command::Invalid("Task ID must be specified.".into()),
        },
        Some("progress") => Command::Progress,
        Some("watch") => Command::Watch,
        Some("clear") => Command::Clear,
        Some("help") => Command::Help,
        Some("exit") | Some("quit") => Command::Exit,
        Some(cmd) => Command::Invalid(format!("Unknown command: {}. Type 'help' for a list.", cmd)),
        None => Command::Empty,
    }
}

pub fn run_cli(store: &UploadStore) -> io::Result<()> {
    println!(
        "Upload queue started ({} concurrent transfers). Enter a command or 'exit' to quit.",
        store.concurrency_limit()
    );
    let mut commands_history: Vec<String> = Vec::new();

    loop {
        let input = match read_line(&commands_history)? {
            Some(input) => input,
            None => break,
        };
        if !input.trim().is_empty() {
            commands_history.push(input.clone());
        }

        match parse_command(&input) {
            Command::Add(paths) => add(store, &paths),
            Command::List => print_list(&store.tasks()),
            Command::Status(id) => match store.task(id) {
                Some(task) => println!("{}", describe(&task)),
                None => println!("Task {} not found", id),
            },
            Command::Progress => println!("{}", summary_line(&store.summary())),
            Command::Watch => watch(store)?,
            Command::Clear => println!("Removed {} completed task(s).", store.clear_completed()),
            Command::Help => print_help(),
            Command::Exit => {
                println!("Exiting the program...");
                break;
            }
            Command::Invalid(message) => println!("{}", message),
            Command::Empty => continue,
        }
    }
    Ok(())
}

fn add(store: &UploadStore, paths: &[String]) {
    let mut files = Vec::new();
    for path in paths {
        match FileSource::from_path(path) {
            Ok(file) => files.push(file),
            Err(e) => println!("Skipping {}: {}", path, e),
        }
    }
    if files.is_empty() {
        return;
    }
    let ids = store.add_files(files);
    let ids: Vec<String> = ids.iter().map(ToString::to_string).collect();
    println!("Queued task(s): {}", ids.join(", "));
    println!("Use `list` or `watch` to follow the progress");
}

/// Reads one line in raw mode with up/down history. `None` on Ctrl-C / Esc.
fn read_line(history: &[String]) -> io::Result<Option<String>> {
    terminal::enable_raw_mode()?;
    let result = edit_line(history);
    terminal::disable_raw_mode()?;
    result
}

fn edit_line(history: &[String]) -> io::Result<Option<String>> {
    let mut stdout = io::stdout();
    let mut history_index = history.len();
    let mut input = String::new();
    print!("\r>>> ");
    stdout.flush()?;

    loop {
        let Event::Key(key_event) = event::read()? else {
            continue;
        };
        if key_event.kind != KeyEventKind::Press {
            continue;
        }
        match key_event.code {
            KeyCode::Enter => {
                end_line(&mut stdout)?;
                return Ok(Some(input));
            }
            KeyCode::Esc => {
                end_line(&mut stdout)?;
                return Ok(None);
            }
            KeyCode::Char('c') if key_event.modifiers.contains(event::KeyModifiers::CONTROL) => {
                end_line(&mut stdout)?;
                return Ok(None);
            }
            KeyCode::Up => {
                if history_index > 0 {
                    history_index -= 1;
                }
                if let Some(command) = history.get(history_index) {
                    input = command.clone();
                    redraw(&input)?;
                }
            }
            KeyCode::Down => {
                if history_index < history.len() {
                    history_index += 1;
                }
                input = history.get(history_index).cloned().unwrap_or_default();
                redraw(&input)?;
            }
            KeyCode::Char(c) => {
                input.push(c);
                print!("{}", c);
                stdout.flush()?;
            }
            KeyCode::Backspace => {
                input.pop();
                redraw(&input)?;
            }
            _ => {}
        }
    }
}

fn end_line(out: &mut impl Write) -> io::Result<()> {
    out.write_all(b"\r\n")?;
    out.flush()
}

fn redraw(input: &str) -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(
        stdout,
        cursor::MoveToColumn(0),
        terminal::Clear(terminal::ClearType::CurrentLine)
    )?;
    print!(">>> {}", input);
    stdout.flush()
}

/// Redraws the summary until nothing is uploading or a key is pressed.
fn watch(store: &UploadStore) -> io::Result<()> {
    terminal::enable_raw_mode()?;
    let result = watch_loop(store);
    terminal::disable_raw_mode()?;
    println!();
    result
}

fn watch_loop(store: &UploadStore) -> io::Result<()> {
    let mut stdout = io::stdout();
    loop {
        let summary = store.summary();
        execute!(
            stdout,
            cursor::MoveToColumn(0),
            terminal::Clear(terminal::ClearType::CurrentLine)
        )?;
        print!("{}  (any key to stop)", summary_line(&summary));
        stdout.flush()?;
        if !summary.is_uploading {
            return Ok(());
        }
        if event::poll(WATCH_INTERVAL)? {
            if let Event::Key(_) = event::read()? {
                return Ok(());
            }
        }
    }
}

pub fn summary_line(summary: &UploadSummary) -> String {
    format!(
        "Overall {:>3}% | {} uploading, {} pending, {} completed, {} failed",
        summary.overall_progress,
        summary.count(UploadStatus::Uploading),
        summary.count(UploadStatus::Pending),
        summary.count(UploadStatus::Completed),
        summary.count(UploadStatus::Failed),
    )
}

pub fn describe(task: &UploadTask) -> String {
    let mut line = format!(
        "{}\t {:<9} \t {:>3}% \t {}/{} \t {}",
        task.id,
        format!("{:?}", task.status),
        task.progress,
        task.uploaded_bytes,
        task.total_bytes,
        task.name
    );
    if let Some(error) = &task.error {
        line.push_str(&format!(" \t [{}]", error));
    }
    line
}

fn print_list(tasks: &[UploadTask]) {
    if tasks.is_empty() {
        println!("No uploads");
        return;
    }
    println!("\tUpload list:");
    println!("ID\t Status    \t Done \t Bytes \t Name");
    println!("{}", "-".repeat(60));
    for task in tasks {
        println!("{}", describe(task));
    }
}

fn print_help() {
    println!("add <path>...   queue files for upload");
    println!("list            show every task");
    println!("status <id>     show one task");
    println!("progress        overall progress");
    println!("watch           follow progress until idle");
    println!("clear           remove completed tasks");
    println!("exit            quit");
}
