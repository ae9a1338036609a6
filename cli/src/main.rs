mod repl;
mod store;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use leadchat::config::{ApiConfig, ApiTimeouts, DEFAULT_API_BASE_URL, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_REQUEST_TIMEOUT_SECS};
use leadchat::http::HttpTransport;
use leadchat::intake::{LeadForm, submit_lead};
use leadchat::session::{SESSION_STORAGE_KEY, forget_session, resolve_session};
use leadchat::{ApiError, ConfigError, Conversation, ConversationError, IntakeError, KeyValueStore, SessionToken, api};
use tracing_subscriber::EnvFilter;

use crate::repl::Line;
use crate::store::FileStore;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Conversation(#[from] ConversationError),
    #[error(transparent)]
    Intake(#[from] IntakeError),
    #[error("state file {path}: {message}")]
    State { path: String, message: String },
    #[error("stdin read failed: {0}")]
    Io(#[from] io::Error),
    #[error("backend reported unhealthy")]
    Unhealthy,
}

#[derive(Parser, Debug)]
#[command(name = "leadchat", about = "Lead-qualification chat from the terminal")]
struct Cli {
    #[arg(long, env = "LEADCHAT_API_BASE_URL", default_value = DEFAULT_API_BASE_URL)]
    base_url: String,

    #[arg(long, env = "LEADCHAT_REQUEST_TIMEOUT_SECS", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    request_timeout_secs: u64,

    #[arg(long, env = "LEADCHAT_CONNECT_TIMEOUT_SECS", default_value_t = DEFAULT_CONNECT_TIMEOUT_SECS)]
    connect_timeout_secs: u64,

    #[arg(long, env = "LEADCHAT_STATE_FILE", default_value = ".leadchat.json")]
    state_file: PathBuf,

    /// Session token; takes precedence over the one saved in the state file.
    #[arg(long, env = "LEADCHAT_SESSION")]
    session: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the backend is reachable.
    Ping,
    /// Submit the intake form and save the returned session.
    Lead(LeadArgs),
    /// Send one message.
    Say {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Save the plan and send the confirmation email.
    Agree,
    /// Ask for an alternative plan.
    Explore { preferences: Option<String> },
    /// Interactive conversation on stdin.
    Chat,
    /// Drop the saved session.
    Forget,
}

#[derive(Args, Debug)]
struct LeadArgs {
    #[arg(long)]
    full_name: String,
    #[arg(long)]
    email: String,
    #[arg(long, default_value = "")]
    phone: String,
    /// Date of birth, `YYYY-MM-DD`.
    #[arg(long)]
    dob: String,
    #[arg(long)]
    zip_code: String,
    #[arg(long, default_value = "")]
    gender: String,
    #[arg(long)]
    address: String,
    /// Withhold consent to be contacted (the lead will be refused).
    #[arg(long, default_value_t = false)]
    no_consent: bool,
}

impl From<LeadArgs> for LeadForm {
    fn from(args: LeadArgs) -> Self {
        Self {
            full_name: args.full_name,
            email: args.email,
            phone: args.phone,
            dob: args.dob,
            zip_code: args.zip_code,
            gender: args.gender,
            address: args.address,
            consent: !args.no_consent,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ApiConfig {
        timeouts: ApiTimeouts { request_secs: cli.request_timeout_secs, connect_secs: cli.connect_timeout_secs },
        ..ApiConfig::new(&cli.base_url)?
    };
    let transport = HttpTransport::new(&config)?;
    let store = FileStore::open(&cli.state_file)?;
    tracing::debug!(base_url = %transport.base_url(), state_file = %store.path().display(), "starting");

    match cli.command {
        Command::Ping => run_ping(&transport).await,
        Command::Lead(args) => run_lead(&transport, &store, args).await,
        Command::Forget => {
            forget_session(&store);
            println!("session forgotten");
            Ok(())
        }
        command => {
            let session = session_for(cli.session.as_deref(), &store);
            let conversation = Conversation::new(session, transport);
            run_conversation(&conversation, command).await
        }
    }
}

/// An explicit `--session` wins over the saved token, like the chat page's
/// query parameter.
fn session_for(flag: Option<&str>, store: &impl KeyValueStore) -> Option<SessionToken> {
    flag.and_then(SessionToken::parse).or_else(|| resolve_session(None, store))
}

async fn run_ping(transport: &HttpTransport) -> Result<(), CliError> {
    if !api::health(transport).await? {
        return Err(CliError::Unhealthy);
    }
    println!("ok");
    Ok(())
}

async fn run_lead(transport: &HttpTransport, store: &FileStore, args: LeadArgs) -> Result<(), CliError> {
    let token = submit_lead(transport, store, &LeadForm::from(args)).await?;
    println!("session saved under `{SESSION_STORAGE_KEY}`: {token}");
    Ok(())
}

async fn run_conversation(conversation: &Conversation<HttpTransport>, command: Command) -> Result<(), CliError> {
    match command {
        Command::Say { text } => {
            let text = text.join(" ");
            printing_new_entries(conversation, conversation.send_turn(&text)).await?;
        }
        Command::Agree => {
            printing_new_entries(conversation, conversation.agree()).await?;
        }
        Command::Explore { preferences } => {
            printing_new_entries(conversation, conversation.explore(preferences.as_deref())).await?;
        }
        Command::Chat => run_chat(conversation).await?,
        Command::Ping | Command::Lead(_) | Command::Forget => {}
    }
    Ok(())
}

/// Await `op`, then print every transcript entry it appended.
async fn printing_new_entries<F, T>(conversation: &Conversation<HttpTransport>, op: F) -> Result<T, ConversationError>
where
    F: Future<Output = Result<T, ConversationError>>,
{
    let before = conversation.transcript().len();
    let result = op.await;
    for message in conversation.transcript().snapshot().iter().skip(before) {
        println!("{}", repl::render(message));
    }
    result
}

async fn run_chat(conversation: &Conversation<HttpTransport>) -> Result<(), CliError> {
    if conversation.session().is_none() {
        return Err(ConversationError::NoSession.into());
    }
    println!("{}", repl::HELP);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next().transpose()? else {
            break;
        };

        let result = match repl::parse_line(&line) {
            Line::Blank => continue,
            Line::Quit => break,
            Line::Help => {
                println!("{}", repl::HELP);
                continue;
            }
            Line::Unknown(name) => {
                eprintln!("unknown command /{name}; try /help");
                continue;
            }
            Line::Say(text) => printing_new_entries(conversation, conversation.send_turn(text)).await.map(drop),
            Line::Agree => printing_new_entries(conversation, conversation.agree()).await.map(drop),
            Line::Explore(preferences) => {
                printing_new_entries(conversation, conversation.explore(preferences)).await.map(drop)
            }
        };

        // Failed exchanges are already in the transcript; only refusals need a line.
        if let Err(e @ (ConversationError::NoSession | ConversationError::EmptyMessage | ConversationError::Busy(_))) =
            result
        {
            eprintln!("{e}");
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod main_test;
