use anyhow::Result;
use clap::{CommandFactory, Parser};
use color_eyre::config::HookBuilder;
use nxsweep_core::{get_config_path, load_config, Overrides};
use tracing_subscriber::EnvFilter;

mod handlers;
mod wizard;

/// nxsweep - list and clean up components in a Nexus repository
#[derive(Parser, Debug)]
#[command(name = "nxsweep")]
#[command(version)]
#[command(about = "List and delete components in a Nexus repository", long_about = None)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// More log output on stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Subcommand to run
    #[command(subcommand)]
    command: Commands,
}

/// Values that override the config file
#[derive(clap::Args, Debug)]
struct ConnectionArgs {
    /// Nexus base URL
    #[arg(long, env = "NEXUS_URL", global = true)]
    url: Option<String>,

    /// Nexus user
    #[arg(long, env = "NEXUS_USER", global = true)]
    user: Option<String>,

    /// Nexus password
    #[arg(long, env = "NEXUS_PASSWORD", hide_env_values = true, global = true)]
    password: Option<String>,

    /// Fail if the listing needs more than this many pages
    #[arg(long, global = true)]
    max_pages: Option<usize>,

    /// HTTP request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,
}

impl From<ConnectionArgs> for Overrides {
    fn from(args: ConnectionArgs) -> Self {
        Overrides {
            url: args.url,
            user: args.user,
            password: args.password,
            timeout: args.timeout,
            max_pages: args.max_pages,
        }
    }
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Initial setup (interactive wizard)
    Init,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: handlers::ConfigAction,
    },

    /// List the components of a repository
    List {
        /// Repository name
        repository: String,
        /// Only report components whose whole path matches this regex
        pattern: Option<String>,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = handlers::OutputFormat::Plain)]
        output: handlers::OutputFormat,
    },

    /// Delete the components of a repository
    Delete {
        /// Repository name
        repository: String,
        /// Only delete components whose whole path matches this regex
        pattern: Option<String>,
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Shell completion
    Completion {
        /// Shell type (bash, zsh, fish, elvish, powershell)
        shell: String,
    },
}

/// Log level: RUST_LOG, then -v flags, then the config file, then warn
fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = match verbose {
            0 => load_config()
                .ok()
                .and_then(|c| c.log_level().map(str::to_string))
                .unwrap_or_else(|| "warn".to_string()),
            1 => "debug".to_string(),
            _ => "trace".to_string(),
        };
        EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new("warn"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup error handling
    if let Err(e) = HookBuilder::default().install() {
        eprintln!("Warning: Failed to install error handler: {}", e);
    }

    // Parse CLI arguments
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let overrides = Overrides::from(cli.connection);

    // Execute command
    match cli.command {
        Commands::Init => wizard::run_init_wizard(&get_config_path()?).await,
        Commands::Config { action } => handlers::handle_config(action, overrides).await,
        Commands::List { repository, pattern, output } => {
            handlers::handle_list(overrides, &repository, pattern.as_deref(), output).await
        }
        Commands::Delete { repository, pattern, yes } => {
            handlers::handle_delete(overrides, &repository, pattern.as_deref(), yes).await
        }
        Commands::Completion { shell } => {
            handlers::handle_completion(&shell, &mut Cli::command()).await
        }
    }
}
