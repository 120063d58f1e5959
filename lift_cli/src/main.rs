use clap::{Parser, Subcommand};
use lift_core::*;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "liftvault")]
#[command(about = "Local workout session tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the active session and its draft sets
    Status,

    /// Show the workout the active routine derives for today
    Next,

    /// Start a session (from an explicit workout, or the active routine)
    Start {
        /// Workout name or id; omitted = derive from the active routine
        #[arg(long)]
        workout: Option<String>,
    },

    /// Update one set of an exercise in the active session
    Set {
        /// Exercise name or id
        exercise: String,

        /// Set number (1-based)
        #[arg(value_name = "N")]
        number: usize,

        #[arg(long)]
        weight: Option<f64>,

        #[arg(long)]
        reps: Option<u32>,

        #[arg(long)]
        time_ms: Option<i64>,

        /// Mark the set completed
        #[arg(long, conflicts_with = "skip")]
        done: bool,

        /// Mark the set skipped
        #[arg(long, conflicts_with = "done")]
        skip: bool,
    },

    /// Substitute one exercise for another in the active session
    Swap {
        /// Exercise to remove (name or id)
        old: String,
        /// Exercise to bring in (name or id)
        new: String,
    },

    /// Commit the active session to history
    Finish,

    /// Throw away the active session and all draft data
    Discard {
        /// Confirm the destructive discard
        #[arg(long)]
        yes: bool,
    },

    /// List logged sessions
    History {
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Export logged history to a CSV file
    Export { path: PathBuf },

    /// Manage routines
    Routines {
        #[command(subcommand)]
        command: RoutineCommands,
    },

    /// Show user settings, optionally changing the unit system
    Settings {
        /// Switch the unit system (kg or lbs)
        #[arg(long)]
        unit: Option<String>,
    },

    /// List workout templates
    Workouts,

    /// List exercises
    Exercises,
}

#[derive(Subcommand)]
enum RoutineCommands {
    /// List routines, marking the active one
    List,
    /// Set the active routine (name or id)
    Use { routine: String },
    /// Unset the active routine
    Clear,
}

fn main() -> ExitCode {
    lift_core::logging::init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = Config::load()?;
    let db_path = match cli.data_dir {
        Some(dir) => dir.join("liftvault.db"),
        None => config.db_path(),
    };

    let store = Arc::new(Store::open(&db_path)?);
    seed_base_content(&store)?;
    let mut tracker = SessionTracker::new(store.clone())?;

    match cli.command {
        Commands::Status => cmd_status(&store, &tracker),
        Commands::Next => cmd_next(&store),
        Commands::Start { workout } => cmd_start(&store, &mut tracker, workout),
        Commands::Set {
            exercise,
            number,
            weight,
            reps,
            time_ms,
            done,
            skip,
        } => cmd_set(&store, &mut tracker, &exercise, number, weight, reps, time_ms, done, skip),
        Commands::Swap { old, new } => cmd_swap(&store, &mut tracker, &old, &new),
        Commands::Finish => cmd_finish(&mut tracker),
        Commands::Discard { yes } => cmd_discard(&mut tracker, yes),
        Commands::History { limit } => cmd_history(&store, limit),
        Commands::Export { path } => {
            let count = export_history(&store, &path)?;
            println!("Exported {count} sets to {}", path.display());
            Ok(ExitCode::SUCCESS)
        }
        Commands::Routines { command } => cmd_routines(&store, command),
        Commands::Settings { unit } => cmd_settings(&store, unit),
        Commands::Workouts => {
            for workout in store.list_workouts()? {
                println!("{}  {}", workout.id, workout.name);
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Exercises => {
            for exercise in store.list_exercises()? {
                println!(
                    "{}  {} [{} / {}]",
                    exercise.id,
                    exercise.name,
                    exercise.exercise_type.as_str(),
                    exercise.muscle_group.as_str()
                );
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn cmd_status(store: &Store, tracker: &SessionTracker) -> Result<ExitCode> {
    let Some(session) = tracker.active_session() else {
        println!("No active session.");
        return Ok(ExitCode::SUCCESS);
    };

    let workout = store.get_workout(&session.workout_id)?;
    println!("Active session: {} ({})", workout.name, session.id);
    if session.is_swapped {
        println!("  (an exercise was swapped)");
    }

    for (exercise_id, sets) in tracker.draft_sets() {
        let name = store
            .get_exercise(exercise_id)
            .map(|e| e.name)
            .unwrap_or_else(|_| exercise_id.clone());
        println!("  {name}:");
        for (index, set) in sets.iter().enumerate() {
            let mark = if set.is_completed {
                "x"
            } else if set.is_skipped {
                "-"
            } else {
                " "
            };
            let weight = set
                .weight
                .map(|w| format!("{w}"))
                .unwrap_or_else(|| "_".into());
            let reps = set
                .reps
                .map(|r| r.to_string())
                .unwrap_or_else(|| "_".into());
            println!("    [{mark}] set {}: {weight} x {reps}", index + 1);
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_next(store: &Store) -> Result<ExitCode> {
    match derive_next_workout_today(store)? {
        NextWorkout::Workout(workout) => println!("Next workout: {}", workout.name),
        NextWorkout::RestDay => println!("Rest day."),
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_start(
    store: &Store,
    tracker: &mut SessionTracker,
    workout_arg: Option<String>,
) -> Result<ExitCode> {
    let workout = match workout_arg {
        Some(ref name) => store.find_workout(name)?,
        None => match derive_next_workout_today(store) {
            Ok(NextWorkout::Workout(workout)) => workout,
            Ok(NextWorkout::RestDay) => {
                println!("Today is a rest day; pass --workout to train anyway.");
                return Ok(ExitCode::SUCCESS);
            }
            Err(Error::NoActiveRoutine) => {
                eprintln!("No active routine; pick one with 'routines use' or pass --workout.");
                return Ok(ExitCode::FAILURE);
            }
            Err(e) => return Err(e),
        },
    };

    let plan = store.workout_plan(&workout.id)?;
    match tracker.start(&workout, &plan) {
        Ok(()) => {
            println!("Started '{}' with {} exercises.", workout.name, plan.len());
            Ok(ExitCode::SUCCESS)
        }
        Err(Error::SessionActive) => {
            eprintln!("A session is already active; 'finish' or 'discard --yes' it first.");
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e),
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_set(
    store: &Store,
    tracker: &mut SessionTracker,
    exercise_arg: &str,
    number: usize,
    weight: Option<f64>,
    reps: Option<u32>,
    time_ms: Option<i64>,
    done: bool,
    skip: bool,
) -> Result<ExitCode> {
    let exercise = store.find_exercise(exercise_arg)?;
    let Some(current) = tracker.draft_sets().get(&exercise.id) else {
        eprintln!("'{}' is not part of the active session.", exercise.name);
        return Ok(ExitCode::FAILURE);
    };
    if number == 0 || number > current.len() {
        eprintln!(
            "Set {} is out of range; '{}' has {} sets.",
            number,
            exercise.name,
            current.len()
        );
        return Ok(ExitCode::FAILURE);
    }

    let mut sets = current.clone();
    let set = &mut sets[number - 1];
    if let Some(weight) = weight {
        set.weight = Some(weight);
    }
    if let Some(reps) = reps {
        set.reps = Some(reps);
    }
    if let Some(time_ms) = time_ms {
        set.time_ms = Some(time_ms);
    }
    if done {
        set.is_completed = true;
    }
    if skip {
        set.is_skipped = true;
    }

    tracker.log_set(&exercise.id, sets)?;
    println!("Updated {} set {number}.", exercise.name);
    Ok(ExitCode::SUCCESS)
}

fn cmd_swap(
    store: &Store,
    tracker: &mut SessionTracker,
    old: &str,
    new: &str,
) -> Result<ExitCode> {
    let old_exercise = store.find_exercise(old)?;
    let new_exercise = store.find_exercise(new)?;
    tracker.swap_exercise(&old_exercise.id, &new_exercise.id)?;
    println!("Swapped {} for {}.", old_exercise.name, new_exercise.name);
    Ok(ExitCode::SUCCESS)
}

fn cmd_finish(tracker: &mut SessionTracker) -> Result<ExitCode> {
    let outcome = tracker.finish()?;
    println!("Session logged: {} sets recorded.", outcome.logged_sets);
    if outcome.routine_advanced.is_some() {
        println!("Routine cycle advanced.");
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_discard(tracker: &mut SessionTracker, yes: bool) -> Result<ExitCode> {
    if !yes {
        eprintln!("Discarding purges all draft data; re-run with --yes to confirm.");
        return Ok(ExitCode::FAILURE);
    }
    tracker.discard()?;
    println!("Session discarded.");
    Ok(ExitCode::SUCCESS)
}

fn cmd_history(store: &Store, limit: Option<usize>) -> Result<ExitCode> {
    let sessions = store.list_logged_sessions(limit)?;
    if sessions.is_empty() {
        println!("No logged sessions.");
        return Ok(ExitCode::SUCCESS);
    }
    for session in sessions {
        let workout = store
            .get_workout(&session.workout_id)
            .map(|w| w.name)
            .unwrap_or_else(|_| session.workout_id.clone());
        let sets = store.logged_sets(&session.id)?;
        let when = chrono::DateTime::<chrono::Utc>::from_timestamp_millis(session.performed_at)
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| session.performed_at.to_string());
        println!("{when}  {workout}  ({} sets)", sets.len());
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_settings(store: &Store, unit: Option<String>) -> Result<ExitCode> {
    if let Some(ref unit) = unit {
        let Some(unit_system) = UnitSystem::parse(&unit.to_uppercase()) else {
            eprintln!("Unknown unit system '{unit}'; use kg or lbs.");
            return Ok(ExitCode::FAILURE);
        };
        let mut settings = store.settings()?;
        settings.unit_system = unit_system;
        store.update_settings(&settings)?;
    }

    let settings = store.settings()?;
    println!("Unit system: {}", settings.unit_system.as_str());
    println!(
        "Rest timer: {} ({}s, sound {})",
        if settings.rest_timer_enabled { "on" } else { "off" },
        settings.default_rest_duration,
        if settings.rest_timer_sound { "on" } else { "off" }
    );
    match settings.active_routine_id {
        Some(ref id) => {
            let name = store.get_routine(id).map(|r| r.name).unwrap_or_else(|_| id.clone());
            println!("Active routine: {name}");
        }
        None => println!("Active routine: none"),
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_routines(store: &Store, command: RoutineCommands) -> Result<ExitCode> {
    match command {
        RoutineCommands::List => {
            let active = store.settings()?.active_routine_id;
            for routine in store.list_routines()? {
                let marker = if active.as_deref() == Some(routine.id.as_str()) {
                    "*"
                } else {
                    " "
                };
                println!(
                    "{marker} {}  {} [{}] cycle {}",
                    routine.id,
                    routine.name,
                    routine.mode.as_str(),
                    routine.cycle_count
                );
            }
            Ok(ExitCode::SUCCESS)
        }
        RoutineCommands::Use { routine } => {
            let target = store
                .list_routines()?
                .into_iter()
                .find(|r| r.id == routine || r.name.eq_ignore_ascii_case(&routine))
                .ok_or(Error::NotFound {
                    entity: "routine",
                    id: routine,
                })?;
            store.set_active_routine(Some(&target.id))?;
            println!("Active routine: {}", target.name);
            Ok(ExitCode::SUCCESS)
        }
        RoutineCommands::Clear => {
            store.set_active_routine(None)?;
            println!("Active routine cleared.");
            Ok(ExitCode::SUCCESS)
        }
    }
}
