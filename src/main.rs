use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use gradebook::grading::SubjectStats;
use gradebook::store::{
    GradeBook, GradePatch, NewGrade, NewObjective, NewSubject, SubjectPatch,
};

const EXIT_SUCCESS: i32 = 0;
const EXIT_CONFIG: i32 = 4;
const EXIT_DATA: i32 = 5;

#[derive(Subcommand, Debug)]
enum SubjectCommand {
    /// Add a subject with no grades
    Add {
        name: String,
        #[arg(long, default_value = "")]
        professor: String,
        #[arg(long)]
        credits: Option<f64>,
        /// Hex color, e.g. "#60a5fa" (picked from the palette if omitted)
        #[arg(long)]
        color: Option<String>,
    },
    /// Add a subject together with all of its grades
    Quick {
        name: String,
        /// Comma-separated grades, e.g. 5,6,7
        #[arg(long, value_delimiter = ',', required = true)]
        grades: Vec<f64>,
        /// Comma-separated weights in percent, adding up to 100, e.g. 30,30,40
        #[arg(long, value_delimiter = ',', required = true)]
        weights: Vec<f64>,
    },
    /// Change a subject's details (omitted fields are kept)
    Edit {
        /// Subject id or name
        subject: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        professor: Option<String>,
        #[arg(long)]
        credits: Option<f64>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete a subject with all its grades and objectives
    Remove { subject: String },
    /// Show a subject and its grades
    Show { subject: String },
}

#[derive(Subcommand, Debug)]
enum GradeCommand {
    /// Record a grade for a subject
    Add {
        /// Subject id or name
        subject: String,
        /// Label for the grade, e.g. "Midterm"
        name: String,
        /// Grade between 0 and 10
        #[arg(long)]
        value: f64,
        /// Weight in percent of the subject's final grade
        #[arg(long)]
        weight: f64,
    },
    /// Change a recorded grade (omitted fields are kept)
    Edit {
        subject: String,
        /// Grade id or name
        grade: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        value: Option<f64>,
        #[arg(long)]
        weight: Option<f64>,
    },
    /// Delete a recorded grade
    Remove { subject: String, grade: String },
}

#[derive(Subcommand, Debug)]
enum GoalCommand {
    /// Set a target average for a subject
    Add {
        subject: String,
        description: String,
        /// Target average between 0 and 10
        #[arg(long, default_value = "5")]
        target: f64,
    },
    /// List objectives with the grade still needed for each
    List { subject: String },
    /// Mark an objective as completed
    Done { subject: String, goal: String },
    /// Mark an objective as pending again
    Undo { subject: String, goal: String },
    /// Delete an objective
    Remove { subject: String, goal: String },
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List subjects with their averages (default if no subcommand)
    List {
        /// Tab-separated output for scripting
        #[arg(long)]
        tsv: bool,
    },
    /// Manage subjects
    #[command(subcommand)]
    Subject(SubjectCommand),
    /// Manage grades
    #[command(subcommand)]
    Grade(GradeCommand),
    /// Show statistics for a subject
    Stats { subject: String },
    /// Manage target-grade objectives
    #[command(subcommand)]
    Goal(GoalCommand),
    /// Write a dated copy of all data as JSON
    Export {
        /// Directory to write into (defaults to config export_dir, then the current directory)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Replace all data with a previously exported file
    Import { file: PathBuf },
}

#[derive(Parser, Debug)]
#[command(name = "gradebook")]
#[command(about = "Track subjects, weighted grades and target-grade goals", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/gradebook/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the data file (overrides config data_file)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Name to greet (overrides config username)
    #[arg(long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "gradebook=debug" } else { "gradebook=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// What a command did to the book
enum Outcome {
    Unchanged,
    Changed,
}

struct RunContext {
    username: Option<String>,
    export_dir: Option<PathBuf>,
    use_colors: bool,
}

fn run_subject(command: SubjectCommand, book: &mut GradeBook, ctx: &RunContext) -> Result<Outcome> {
    match command {
        SubjectCommand::Add {
            name,
            professor,
            credits,
            color,
        } => {
            book.add_subject(NewSubject {
                name: name.clone(),
                professor,
                credits,
                color,
            })?;
            println!("Added subject {}", name.trim());
            Ok(Outcome::Changed)
        }
        SubjectCommand::Quick {
            name,
            grades,
            weights,
        } => {
            let id = book.quick_subject(&name, &grades, &weights)?;
            let subject = book.find_subject(&id)?;
            println!(
                "Added subject {} with {} grades (average {})",
                subject.name,
                subject.grades.len(),
                gradebook::output::format_grade(gradebook::grading::weighted_average(&subject.grades))
            );
            Ok(Outcome::Changed)
        }
        SubjectCommand::Edit {
            subject,
            name,
            professor,
            credits,
            color,
        } => {
            book.update_subject(
                &subject,
                SubjectPatch {
                    name,
                    professor,
                    credits,
                    color,
                },
            )?;
            println!("Updated subject {}", subject);
            Ok(Outcome::Changed)
        }
        SubjectCommand::Remove { subject } => {
            let removed = book.remove_subject(&subject)?;
            println!("Removed subject {}", removed.name);
            Ok(Outcome::Changed)
        }
        SubjectCommand::Show { subject } => {
            let subject = book.find_subject(&subject)?;
            println!(
                "{}",
                gradebook::output::format_subject_detail(subject, ctx.use_colors)
            );
            Ok(Outcome::Unchanged)
        }
    }
}

fn run_grade(command: GradeCommand, book: &mut GradeBook) -> Result<Outcome> {
    match command {
        GradeCommand::Add {
            subject,
            name,
            value,
            weight,
        } => {
            book.add_grade(
                &subject,
                NewGrade {
                    name: name.clone(),
                    value,
                    weight,
                },
            )?;
            let subject = book.find_subject(&subject)?;
            println!(
                "Added {} to {} (average now {})",
                name.trim(),
                subject.name,
                gradebook::output::format_grade(gradebook::grading::weighted_average(&subject.grades))
            );
            Ok(Outcome::Changed)
        }
        GradeCommand::Edit {
            subject,
            grade,
            name,
            value,
            weight,
        } => {
            book.update_grade(&subject, &grade, GradePatch { name, value, weight })?;
            println!("Updated grade {}", grade);
            Ok(Outcome::Changed)
        }
        GradeCommand::Remove { subject, grade } => {
            let removed = book.remove_grade(&subject, &grade)?;
            println!("Removed grade {}", removed.name);
            Ok(Outcome::Changed)
        }
    }
}

fn run_goal(command: GoalCommand, book: &mut GradeBook, ctx: &RunContext) -> Result<Outcome> {
    match command {
        GoalCommand::Add {
            subject,
            description,
            target,
        } => {
            let id = book.add_objective(
                &subject,
                NewObjective {
                    description,
                    target_grade: target,
                },
            )?;
            let objective = book.find_objective(&subject, &id)?;
            if objective.completed {
                println!("Added objective {} (already met)", objective.description);
            } else {
                println!("Added objective {}", objective.description);
            }
            Ok(Outcome::Changed)
        }
        GoalCommand::List { subject } => {
            let subject = book.find_subject(&subject)?;
            println!(
                "{}",
                gradebook::output::format_objectives(subject, ctx.use_colors)
            );
            Ok(Outcome::Unchanged)
        }
        GoalCommand::Done { subject, goal } => {
            book.set_objective_completed(&subject, &goal, true)?;
            println!("Marked {} as completed", goal);
            Ok(Outcome::Changed)
        }
        GoalCommand::Undo { subject, goal } => {
            book.set_objective_completed(&subject, &goal, false)?;
            println!("Marked {} as pending", goal);
            Ok(Outcome::Changed)
        }
        GoalCommand::Remove { subject, goal } => {
            let removed = book.remove_objective(&subject, &goal)?;
            println!("Removed objective {}", removed.description);
            Ok(Outcome::Changed)
        }
    }
}

fn run(command: Commands, book: &mut GradeBook, ctx: &RunContext) -> Result<Outcome> {
    match command {
        Commands::List { tsv } => {
            let subjects = book.snapshot();
            if tsv {
                println!("{}", gradebook::output::format_tsv(&subjects));
            } else {
                println!("{}", gradebook::output::greeting(ctx.username.as_deref()));
                println!();
                println!(
                    "{}",
                    gradebook::output::format_subject_table(&subjects, ctx.use_colors)
                );
            }
            Ok(Outcome::Unchanged)
        }
        Commands::Subject(command) => run_subject(command, book, ctx),
        Commands::Grade(command) => run_grade(command, book),
        Commands::Stats { subject } => {
            let subject = book.find_subject(&subject)?;
            let stats = SubjectStats::from_entries(&subject.grades);
            println!(
                "{}",
                gradebook::output::format_stats(subject, &stats, ctx.use_colors)
            );
            Ok(Outcome::Unchanged)
        }
        Commands::Goal(command) => run_goal(command, book, ctx),
        Commands::Export { dir } => {
            let dir = dir
                .or_else(|| ctx.export_dir.clone())
                .unwrap_or_else(|| PathBuf::from("."));
            let today = chrono::Local::now().date_naive();
            let path = gradebook::store::export_book(&dir, book, today)?;
            println!("Exported {} subjects to {}", book.len(), path.display());
            Ok(Outcome::Unchanged)
        }
        Commands::Import { file } => {
            *book = gradebook::store::import_book(&file)?;
            println!("Imported {} subjects from {}", book.len(), file.display());
            Ok(Outcome::Changed)
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let command = cli.command.unwrap_or(Commands::List { tsv: false });

    // Load config
    let config = match gradebook::config::load_config(cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let data_path = match gradebook::config::resolve_data_path(cli.data, &config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };
    debug!(path = %data_path.display(), "Using data file");

    let mut book = match gradebook::store::load_book(&data_path) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Data error: {:#}", e);
            std::process::exit(EXIT_DATA);
        }
    };

    let ctx = RunContext {
        username: cli.user.or(config.username),
        export_dir: config.export_dir,
        use_colors: gradebook::output::should_use_colors(),
    };

    let result = run(command, &mut book, &ctx).and_then(|outcome| match outcome {
        Outcome::Changed => gradebook::store::save_book(&data_path, &book)
            .with_context(|| format!("Changes were not saved to {}", data_path.display())),
        Outcome::Unchanged => Ok(()),
    });

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(EXIT_DATA);
    }

    std::process::exit(EXIT_SUCCESS);
}
