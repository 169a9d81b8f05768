use attendance_export::cli;
use attendance_export::error::AttendanceResult;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "attendance")]
#[command(about = "University attendance: aggregate class attendance and export it to Excel.")]
#[command(long_about = "Attendance - class attendance matrix and Excel export

Reads a dataset of classes, sections and attendance events (YAML or JSON)
and builds the per-student, per-day attendance matrix.

COMMANDS:
  export   - Attendance matrix to Excel (.xlsx) with status icons
  days     - Show the attendance days of a class/section
  summary  - Print the attendance matrix to the terminal

EXAMPLES:
  attendance export data.yaml --class c1                 # All sections
  attendance export data.yaml --class c1 --section s2 -o lab.xlsx
  attendance summary data.yaml --class c1

Set RUST_LOG=attendance_export=info for export logs.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Export class attendance to Excel.

One row per student, one column per attendance day:
  ✅ present   ❌ absent   🕒 late   - not enrolled in any section

Summary columns: Total P+L and Attendance % (present + late over
sections × days). Without --output the file is named
attendance-icons-<class>-allSections.xlsx or
attendance-icons-<class>-section-<section>.xlsx.")]
    /// Export class attendance to an Excel workbook
    Export {
        /// Dataset file (YAML or JSON)
        data: PathBuf,

        /// Class id to export
        #[arg(short, long)]
        class: String,

        /// Restrict the export to one section id
        #[arg(short, long)]
        section: Option<String>,

        /// Output format (only "excel" is supported)
        #[arg(short, long, default_value = "excel")]
        format: String,

        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Show verbose export steps
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show the attendance days of a class
    Days {
        /// Dataset file (YAML or JSON)
        data: PathBuf,

        /// Class id
        #[arg(short, long)]
        class: String,

        /// Restrict to one section id
        #[arg(short, long)]
        section: Option<String>,
    },

    /// Print the attendance matrix
    Summary {
        /// Dataset file (YAML or JSON)
        data: PathBuf,

        /// Class id
        #[arg(short, long)]
        class: String,

        /// Restrict to one section id
        #[arg(short, long)]
        section: Option<String>,
    },
}

fn main() -> AttendanceResult<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "attendance_export=warn".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Export {
            data,
            class,
            section,
            format,
            output,
            verbose,
        } => cli::export(data, class, section, format, output, verbose),

        Commands::Days {
            data,
            class,
            section,
        } => cli::days(data, class, section),

        Commands::Summary {
            data,
            class,
            section,
        } => cli::summary(data, class, section),
    }
}
