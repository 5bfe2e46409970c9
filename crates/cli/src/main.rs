mod client;
mod config;
mod gate;
mod nav;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use client::ApiClient;
use config::{Config, FileCredentials};
use gate::{CredentialProvider, DashboardGate, GateState};

const DEFAULT_SERVER_URL: &str = "http://localhost:8080";

#[derive(Parser)]
#[command(name = "maharitage")]
#[command(version, about = "Maharitage Command Line Tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Maharitage API URL (overrides the configured server)
    #[arg(long)]
    server_url: Option<String>,

    /// Path to the config file (default: ~/.maharitage/config.yaml)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account; a verification link is emailed
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Log in and store the session token locally
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// End the session and forget the stored token
    Logout,
    /// Confirm an email address with the token from the verification link
    VerifyEmail {
        #[arg(value_name = "TOKEN")]
        token: String,
    },
    /// Send a new verification link
    ResendVerification {
        #[arg(long)]
        email: String,
    },
    /// Send a message through the contact form
    Contact {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        message: String,
    },
    /// Show the dashboard for the logged-in user
    Dashboard,
    /// Show or change client configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the current configuration
    Show,
    /// Set the default API URL
    SetServer {
        #[arg(value_name = "URL")]
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => path,
        None => Config::default_path()?,
    };
    let config = Config::load(&config_path)?;

    let server_url = cli
        .server_url
        .or_else(|| config.server_url.clone())
        .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());
    tracing::debug!(server_url = %server_url, config = ?config_path, "Using server");

    let client = ApiClient::new(&server_url);
    let credentials = FileCredentials::new(config_path.clone());

    match cli.command {
        Commands::Signup { name, email, password } => {
            let message = exit_on_error(client.signup(&name, &email, &password).await);
            println!("{}", message);
        }
        Commands::Login { email, password } => {
            let login = exit_on_error(client.login(&email, &password).await);
            credentials.store(&login.token)?;
            println!("Logged in as {} ({})", login.data.name, login.data.email);
        }
        Commands::Logout => {
            // The local token goes away even if the server cannot be reached.
            if let Err(e) = client.logout().await {
                eprintln!("Warning: {}", e);
            }
            credentials.clear()?;
            println!("Logged out");
        }
        Commands::VerifyEmail { token } => {
            let message = exit_on_error(client.verify_email(&token).await);
            println!("{}", message);
        }
        Commands::ResendVerification { email } => {
            let message = exit_on_error(client.resend_verification(&email).await);
            println!("{}", message);
        }
        Commands::Contact { name, email, message } => {
            let reply = exit_on_error(client.contact(&name, &email, &message).await);
            println!("{}", reply);
        }
        Commands::Dashboard => {
            let mut gate = DashboardGate::new(&credentials, &client);
            gate.resolve().await;
            match gate.state() {
                GateState::Authenticated(user) => {
                    println!("Welcome, {} <{}> [{}]", user.name, user.email, user.role);
                    if !user.is_email_verified {
                        println!("Your email address is not verified yet.");
                    }
                    println!();
                    for item in nav::navigation(user.role) {
                        println!("  {:<18} {}", item.label, item.href);
                    }
                }
                GateState::Redirected { to } => {
                    eprintln!("Not logged in. Redirecting to {}", to);
                    eprintln!("  Use: maharitage login --email <EMAIL> --password <PASSWORD>");
                    std::process::exit(1);
                }
                GateState::Loading => unreachable!("gate settles before returning"),
            }
        }
        Commands::Config { command } => match command {
            ConfigCommand::Show => {
                println!("Config file: {}", config_path.display());
                println!("Server URL:  {}", server_url);
                println!(
                    "Logged in:   {}",
                    if config.token.is_some() { "yes" } else { "no" }
                );
            }
            ConfigCommand::SetServer { url } => {
                let mut config = config;
                config.server_url = Some(url.clone());
                config.save(&config_path)?;
                println!("Server URL set to {}", url);
            }
        },
    }

    Ok(())
}

fn exit_on_error<T>(result: Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
