mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use vigil::{Config, FormMode, SubmissionDelays};

#[derive(Parser)]
#[command(name = "vigil")]
#[command(version, about = "vigil - community site forms and comment board", long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(short, long, global = true, default_value = "vigil.toml")]
    config: PathBuf,

    /// Resolve simulated submissions immediately
    #[arg(long, global = true)]
    fast: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a single field value
    Validate {
        /// Field name (email, password, confirmPassword, firstName, lastName, phone, username)
        field: String,

        /// Value to check
        value: String,

        /// Form the field belongs to
        #[arg(short, long, default_value = "register")]
        mode: ModeArg,

        /// Current password, compared against when checking confirmPassword
        #[arg(long, default_value = "")]
        password: String,
    },

    /// Sign in with an email and password
    Login {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },

    /// Create an account
    Register {
        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        #[arg(long)]
        username: String,

        #[arg(long)]
        email: String,

        /// Optional phone number
        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        password: String,

        #[arg(long)]
        confirm_password: String,
    },

    /// Post and like comments, then print the board
    Comments {
        /// Comment to post (repeatable)
        #[arg(long = "post")]
        posts: Vec<String>,

        /// Comment id to like (repeatable)
        #[arg(long = "like")]
        likes: Vec<String>,
    },

    /// Walk through every flow with sample input
    Demo,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum ModeArg {
    Login,
    Register,
}

impl From<ModeArg> for FormMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Login => FormMode::Login,
            ModeArg::Register => FormMode::Register,
        }
    }
}

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(&cli.config)?;
    init_tracing(&config.logging.filter);
    tracing::debug!(path = ?cli.config, fast = cli.fast, "configuration loaded");

    let delays = if cli.fast {
        SubmissionDelays::zero()
    } else {
        config.submission.delays()
    };
    let app = commands::App::new(config, delays);

    match cli.command {
        Commands::Validate {
            field,
            value,
            mode,
            password,
        } => {
            commands::validate::execute(&field, &value, mode.into(), &password)?;
        }
        Commands::Login { email, password } => {
            commands::auth::login(&app, email, password).await?;
        }
        Commands::Register {
            first_name,
            last_name,
            username,
            email,
            phone,
            password,
            confirm_password,
        } => {
            let registration = commands::auth::Registration {
                first_name,
                last_name,
                username,
                email,
                phone: phone.unwrap_or_default(),
                password,
                confirm_password,
            };
            commands::auth::register(&app, registration).await?;
        }
        Commands::Comments { posts, likes } => {
            commands::comments::execute(&app, &posts, &likes).await?;
        }
        Commands::Demo => {
            commands::demo::execute(&app).await?;
        }
    }

    Ok(())
}
