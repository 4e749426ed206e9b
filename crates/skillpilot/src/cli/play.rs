//! Interactive session command handler.

use skillpilot_core::{SessionEvent, StepState};
use skillpilot_quest::{
    CompletionPolicy, CompletionReport, CurriculumLoader, FileProgressStore,
    InMemoryProgressStore, ProbabilisticPolicy, ProgressStore, QuestConfig, RunPreview,
    Selection, SessionController,
};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "Commands:
  tasks               list tasks of the project
  steps               list steps of the selected task
  task <id>           select a task
  step <id>           select a step of the selected task
  run [edited]        preview a run of your code
  complete [edited]   submit the selected step
  hints               show hints revealed so far
  status              show progress
  quit                end the session

Pass `edited` to signal that your code changed.";

/// One line of interactive input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PlayCommand {
    Tasks,
    Steps,
    SelectTask(String),
    SelectStep(String),
    Run { edited: bool },
    Complete { edited: bool },
    Hints,
    Status,
    Help,
    Quit,
}

impl PlayCommand {
    fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let command = words.next()?;
        let argument = words.next();
        let edited = argument == Some("edited");

        match (command, argument) {
            ("tasks", None) => Some(PlayCommand::Tasks),
            ("steps", None) => Some(PlayCommand::Steps),
            ("task", Some(id)) => Some(PlayCommand::SelectTask(id.to_string())),
            ("step", Some(id)) => Some(PlayCommand::SelectStep(id.to_string())),
            ("run", _) => Some(PlayCommand::Run { edited }),
            ("complete", _) => Some(PlayCommand::Complete { edited }),
            ("hints", None) => Some(PlayCommand::Hints),
            ("status", None) => Some(PlayCommand::Status),
            ("help", None) => Some(PlayCommand::Help),
            ("quit" | "exit", None) => Some(PlayCommand::Quit),
            _ => None,
        }
    }
}

/// Handles the play command.
#[tracing::instrument(skip_all, fields(path = %path.display(), project = %project_id))]
pub async fn handle_play_command(
    path: PathBuf,
    project_id: String,
    config_path: Option<PathBuf>,
    state_dir: Option<PathBuf>,
    seed: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = QuestConfig::load(config_path.as_deref())?;
    if let Some(dir) = state_dir {
        config = config.with_progress_dir(dir);
    }

    let loader = CurriculumLoader::new(&config);
    let (mut curriculum, _skipped) = loader.load_file(&path)?.into_parts();
    let project = curriculum.take_project(&project_id)?;

    let store: Box<dyn ProgressStore + Send> = match FileProgressStore::new(config.progress_dir()) {
        Ok(store) => Box::new(store),
        Err(e) => {
            tracing::warn!(error = %e, "Progress will not be saved this session");
            Box::new(InMemoryProgressStore::new())
        }
    };
    let policy: Box<dyn CompletionPolicy + Send> = match seed {
        Some(seed) => Box::new(ProbabilisticPolicy::seeded(*config.success_rate(), seed)),
        None => Box::new(ProbabilisticPolicy::new(*config.success_rate())),
    };

    let mut session = SessionController::start(project, store, policy, config);
    println!("{}", session.project().name());
    print_events(&mut session);
    print_selection(&session);
    println!("Type `help` for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let Some(command) = PlayCommand::parse(&line) else {
            println!("{}", HELP);
            continue;
        };
        if command == PlayCommand::Quit {
            break;
        }
        if let Err(e) = execute(&mut session, command).await {
            println!("Error: {}", e);
        }
        print_events(&mut session);
    }

    tracing::info!(
        xp = session.tracker().session_xp(),
        streak = session.tracker().streak(),
        "Session ended"
    );
    Ok(())
}

async fn execute(
    session: &mut SessionController,
    command: PlayCommand,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        PlayCommand::Tasks => {
            for task in session.project().tasks() {
                let marker = state_marker(task.state());
                println!("  {} {:<12} {}", marker, task.id(), task.name());
            }
        }
        PlayCommand::Steps => match session.selected_task() {
            Some(task) => {
                for step in task.steps() {
                    let marker = state_marker(step.state());
                    println!(
                        "  {} {:<12} {} ({} XP)",
                        marker,
                        step.id(),
                        step.name(),
                        step.xp_value()
                    );
                }
            }
            None => println!("No task selected"),
        },
        PlayCommand::SelectTask(id) => {
            if let Selection::Selected { .. } = session.select_task(&id)? {
                print_selection(session);
            }
        }
        PlayCommand::SelectStep(id) => {
            if let Selection::Selected { .. } = session.select_step(&id)? {
                print_selection(session);
            }
        }
        PlayCommand::Run { edited } => match session.preview_run(edited)? {
            RunPreview::Refused { message } => println!("{}", message),
            RunPreview::Output(output) => println!("{}", output),
        },
        PlayCommand::Complete { edited } => {
            println!("Checking...");
            if let CompletionReport::Passed { outcome, .. } =
                session.attempt_completion(edited).await?
            {
                println!("Progress: {}%", outcome.percentage());
            }
        }
        PlayCommand::Hints => {
            let hints = session.visible_hints();
            if hints.is_empty() {
                println!("No hints revealed yet");
            }
            for (i, hint) in hints.iter().enumerate() {
                println!("  {}. {}", i + 1, hint);
            }
        }
        PlayCommand::Status => {
            let project = session.project();
            println!(
                "{}: {}% complete, {} XP",
                project.name(),
                project.completion_percentage(),
                project.xp_gained()
            );
            println!(
                "Session: {} XP, streak {}",
                session.tracker().session_xp(),
                session.tracker().streak()
            );
            print_selection(session);
        }
        PlayCommand::Help => println!("{}", HELP),
        PlayCommand::Quit => {}
    }
    Ok(())
}

fn state_marker(state: StepState) -> &'static str {
    match state {
        StepState::Locked => "[ ]",
        StepState::Unlocked => "[>]",
        StepState::Completed => "[x]",
    }
}

fn print_selection(session: &SessionController) {
    let (Some(task), Some(step)) = (session.selected_task(), session.selected_step()) else {
        println!("Nothing selected");
        return;
    };
    println!("\n{} / {}", task.name(), step.name());
    if !step.description().is_empty() {
        println!("{}", step.description());
    }
    for (i, guideline) in step.guidelines().iter().enumerate() {
        println!("  {}. {}", i + 1, guideline);
    }
    println!("\n{}", step.starter_code());
}

fn print_events(session: &mut SessionController) {
    for event in session.drain_events() {
        println!("{}", describe_event(&event));
    }
}

/// Learner-facing text for an event.
fn describe_event(event: &SessionEvent) -> String {
    match event {
        SessionEvent::TaskLocked { reason } | SessionEvent::StepLocked { reason } => {
            format!("Locked: {}", reason)
        }
        SessionEvent::StepCompleted { xp_awarded, .. } => {
            format!("Step completed! +{} XP", xp_awarded)
        }
        SessionEvent::TaskCompleted { task_id } => format!("Task {} completed!", task_id),
        SessionEvent::Achievement(achievement) => achievement.message().to_string(),
        SessionEvent::CompletionFailed { reason } => reason.message().to_string(),
        SessionEvent::Resumed { task_id, step_id } => {
            format!("Welcome back! Resuming at {}/{}", task_id, step_id)
        }
    }
}
