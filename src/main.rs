use anyhow::Result;
use clap::Parser;
use refpack::commands::{self, config::Config};
use refpack::runtime::RealRuntime;
use std::path::PathBuf;

/// refpack - package references for projects
///
/// Installs packages from a directory feed into a solution-wide repository and
/// keeps each project's references, content files and assembly references in
/// sync with it.
///
/// Examples:
///   refpack --source ./feed add Elmah          # Install and reference Elmah
///   refpack update Elmah                        # Move the reference to the latest version
///   refpack remove Elmah --remove-dependencies  # Drop it and what it pulled in
#[derive(Parser, Debug)]
#[command(author, version = env!("REFPACK_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Solution package repository (defaults to ./packages; also via REFPACK_ROOT)
    #[arg(long, short = 'r', env = "REFPACK_ROOT", value_name = "PATH", global = true)]
    root: Option<PathBuf>,

    /// Directory feed to install packages from (also via REFPACK_SOURCE)
    #[arg(long, short = 's', env = "REFPACK_SOURCE", value_name = "PATH", global = true)]
    source: Option<PathBuf>,

    /// Project directory (defaults to the current directory)
    #[arg(long, short = 'p', value_name = "PATH", global = true)]
    project: Option<PathBuf>,

    /// More output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Install a package into the solution repository
    Install(InstallArgs),

    /// Uninstall a package from the solution repository
    Uninstall(UninstallArgs),

    /// Install a package and reference it from the project
    Add(AddArgs),

    /// Remove a package reference from the project
    Remove(RemoveArgs),

    /// Update a package reference to a newer version
    Update(UpdateArgs),

    /// List installed packages
    List(ListArgs),
}

#[derive(clap::Args, Debug)]
struct InstallArgs {
    /// Package id
    id: String,

    /// Exact version to install (defaults to the latest)
    #[arg(long)]
    version: Option<String>,

    /// Install only this package
    #[arg(long)]
    ignore_dependencies: bool,
}

#[derive(clap::Args, Debug)]
struct UninstallArgs {
    /// Package id
    id: String,

    /// Installed version to remove (defaults to the latest)
    #[arg(long)]
    version: Option<String>,

    /// Remove even if other packages depend on it
    #[arg(long, short = 'f')]
    force: bool,

    /// Also remove dependencies nothing else needs
    #[arg(long)]
    remove_dependencies: bool,
}

#[derive(clap::Args, Debug)]
struct AddArgs {
    /// Package id
    id: String,

    /// Exact version to reference (defaults to the latest)
    #[arg(long)]
    version: Option<String>,
}

#[derive(clap::Args, Debug)]
struct RemoveArgs {
    /// Package id
    id: String,

    /// Remove even if other packages depend on it
    #[arg(long, short = 'f')]
    force: bool,

    /// Also remove dependencies nothing else needs
    #[arg(long)]
    remove_dependencies: bool,
}

#[derive(clap::Args, Debug)]
struct UpdateArgs {
    /// Package id
    id: String,

    /// Version to move to (defaults to the latest)
    #[arg(long)]
    version: Option<String>,

    /// Update only this package, leaving its dependencies as they are
    #[arg(long)]
    no_dependencies: bool,
}

#[derive(clap::Args, Debug)]
struct ListArgs {
    /// List the project's references instead of the solution's packages
    #[arg(long = "referenced")]
    referenced: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let runtime = RealRuntime;
    let config = Config::load(&runtime, cli.root, cli.source, cli.project)?;

    match cli.command {
        Commands::Install(args) => commands::install(
            &runtime,
            &config,
            &args.id,
            args.version.as_deref(),
            args.ignore_dependencies,
        )?,
        Commands::Uninstall(args) => commands::uninstall(
            &runtime,
            &config,
            &args.id,
            args.version.as_deref(),
            args.force,
            args.remove_dependencies,
        )?,
        Commands::Add(args) => commands::add(&runtime, &config, &args.id, args.version.as_deref())?,
        Commands::Remove(args) => commands::remove(
            &runtime,
            &config,
            &args.id,
            args.force,
            args.remove_dependencies,
        )?,
        Commands::Update(args) => commands::update(
            &runtime,
            &config,
            &args.id,
            args.version.as_deref(),
            !args.no_dependencies,
        )?,
        Commands::List(args) => commands::list(&runtime, &config, args.referenced)?,
    }
    Ok(())
}
