use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use projup::{Conversion, Outcome, RewriteRules, SaveMode, UnmappedFramework};

#[derive(Debug, Parser)]
#[command(
    name = "projup",
    author,
    version,
    about = "Convert legacy .csproj and .sln files to SDK-style projects"
)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write the converted project next to the input as <FILE>.converted
    Preview(ConvertArgs),
    /// Overwrite the input with the converted project
    Convert(ConvertArgs),
}

#[derive(Debug, clap::Args)]
struct ConvertArgs {
    /// A .csproj file, or a .sln whose C# projects are all converted
    #[arg(value_name = "FILE")]
    file: PathBuf,
    /// Replace MSTest assembly references with the MSTest packages
    #[arg(long)]
    mstest: bool,
    /// What to write when the target framework version is unknown
    #[arg(long, value_enum, default_value_t = UnmappedArg::Empty)]
    unmapped_framework: UnmappedArg,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum UnmappedArg {
    /// Leave the target framework empty
    Empty,
    /// Keep the legacy version string
    Keep,
    /// Stop converting the project
    Fail,
}

impl From<UnmappedArg> for UnmappedFramework {
    fn from(value: UnmappedArg) -> Self {
        match value {
            UnmappedArg::Empty => Self::Empty,
            UnmappedArg::Keep => Self::KeepOriginal,
            UnmappedArg::Fail => Self::Fail,
        }
    }
}

impl ConvertArgs {
    fn rules(&self) -> RewriteRules {
        let rules = RewriteRules::default().with_unmapped_framework(self.unmapped_framework.into());
        if self.mstest {
            rules.with_mstest_migration()
        } else {
            rules
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            info!("Use `projup help` for help.");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let (mode, convert) = match &args.command {
        Command::Preview(convert) => (SaveMode::Preview, convert),
        Command::Convert(convert) => (SaveMode::Overwrite, convert),
    };

    let conversion = Conversion::from_path(&convert.file)
        .with_context(|| format!("cannot convert {}", convert.file.display()))?;
    let outcome = conversion
        .run(mode, &convert.rules())
        .with_context(|| format!("failed to convert {}", conversion.path().display()))?;

    match outcome {
        Outcome::Project(output) => {
            info!("Wrote {}", output.display());
            Ok(())
        }
        Outcome::Solution(report) => {
            info!(
                "Converted {} project(s) from {}",
                report.converted.len(),
                conversion.path().display()
            );
            for failure in &report.failures {
                warn!("{}: {}", failure.project.display(), failure.error);
            }
            if report.is_success() {
                Ok(())
            } else {
                bail!("{} project(s) failed to convert", report.failures.len())
            }
        }
    }
}
