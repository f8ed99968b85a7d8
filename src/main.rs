use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use netatmo::cli::output::print_error;
use netatmo::cli::session::ClientOptions;

#[derive(Parser)]
#[command(name = "netatmo", version, about = "Read your Netatmo weather stations")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalArgs {
    /// App client id from dev.netatmo.com
    #[arg(long, global = true, env = "NETATMO_CLIENT_ID")]
    client_id: Option<String>,

    /// App client secret
    #[arg(long, global = true, env = "NETATMO_CLIENT_SECRET", hide_env_values = true)]
    client_secret: Option<String>,

    /// Override the API base URL
    #[arg(long, global = true, env = "NETATMO_BASE_URL")]
    base_url: Option<String>,

    /// Where the token is stored (default: ~/.netatmo/token.json)
    #[arg(long, global = true, env = "NETATMO_TOKEN_FILE")]
    token_file: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in through the browser and save the token
    Login {
        /// Local port for the redirect listener (0 picks a free port)
        #[arg(long, default_value_t = 0)]
        port: u16,

        /// How long to wait for the browser, in milliseconds
        #[arg(long, env = "NETATMO_OAUTH_TIMEOUT_MS", default_value_t = 120_000)]
        timeout_ms: u64,
    },

    /// Print the authorization URL for a manual login
    #[command(name = "auth-url")]
    AuthUrl {
        /// Redirect URL registered for the app
        #[arg(long)]
        redirect_url: String,

        /// Opaque state echoed back by the authorization server
        #[arg(long)]
        state: Option<String>,
    },

    /// Exchange an authorization code for a token and save it
    Exchange {
        /// Authorization code from the redirect
        #[arg(long)]
        code: String,

        /// State from the redirect
        #[arg(long)]
        state: String,

        /// Redirect URL used when building the authorization URL
        #[arg(long)]
        redirect_url: Option<String>,
    },

    /// Show stations and their latest measurements
    Read {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Print the current token, refreshing it if it expired
    Token,
}

impl Commands {
    fn json_output(&self) -> bool {
        matches!(self, Commands::Read { json: true })
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("NETATMO_LOG_LEVEL")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let json = cli.command.json_output();

    if let Err(e) = run(cli).await {
        print_error(&e, json);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), netatmo::NetatmoError> {
    let opts = ClientOptions {
        client_id: cli.global.client_id,
        client_secret: cli.global.client_secret,
        base_url: cli.global.base_url,
        token_file: cli.global.token_file,
    };

    match cli.command {
        Commands::Login { port, timeout_ms } => {
            netatmo::cli::login::run_login(&opts, port, Duration::from_millis(timeout_ms)).await
        }
        Commands::AuthUrl {
            redirect_url,
            state,
        } => netatmo::cli::login::run_auth_url(&opts, &redirect_url, state.as_deref()),
        Commands::Exchange {
            code,
            state,
            redirect_url,
        } => {
            netatmo::cli::login::run_exchange(&opts, &code, &state, redirect_url.as_deref())
                .await
        }
        Commands::Read { json } => netatmo::cli::read::run_read(&opts, json).await,
        Commands::Token => netatmo::cli::read::run_token(&opts).await,
    }
}
