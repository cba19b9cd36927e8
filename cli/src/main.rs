//! Terminal front end for postgate.
//!
//! Each command builds the same pieces the browser does (provider, identity
//! gate, backend client), lets the provider restore the saved session, then
//! drives one core flow and prints the rendered result.

mod http;
mod render;
mod store;
mod term;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use postgate::config::{API_BASE_URL_VAR, API_KEY_VAR, ClientConfig, ConfigError};
use postgate::error::FlowError;
use postgate::forms::{self, LoginForm, REGISTERED, RegistrationForm};
use postgate::gate::IdentityGate;
use postgate::hints::SessionHints;
use postgate::identity::{IdentityState, ProviderError};
use postgate::loader::{GatedPageLoader, PageRun, PageState};
use postgate::pages::chat::{CHAT_SIGNED_OUT, ChatSession};
use postgate::pages::list::{self, PostListPage};
use postgate::pages::post::{self, COMMENT_FAILED, LIKE_FAILED, PostDetail, PostDetailPage, PostInteraction};
use postgate::toolkit::{SystemClock, ToolkitProvider};
use tracing_subscriber::EnvFilter;

use crate::http::{ReqwestBlogApi, ReqwestTransport};
use crate::render::{chat_line, notice_line, post_detail_lines, post_list_lines};
use crate::store::{JsonFileStore, StoreError};
use crate::term::{TerminalNav, TerminalNavigator, describe_navigation};

const DEFAULT_STATE_FILE: &str = ".postgate-session.json";

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("http client setup failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("{0}")]
    Form(String),
    #[error(transparent)]
    Flow(#[from] FlowError),
    #[error("sign-out failed: {0}")]
    SignOut(#[from] ProviderError),
    #[error("{page} page ended in state {state}")]
    Page { page: &'static str, state: &'static str },
    #[error("missing post slug")]
    MissingSlug,
}

#[derive(Parser, Debug)]
#[command(name = "postgate", about = "Terminal client for the postgate blog")]
struct Cli {
    #[arg(long, env = API_BASE_URL_VAR)]
    api_base_url: Option<String>,

    #[arg(long, env = API_KEY_VAR, hide_env_values = true)]
    api_key: Option<String>,

    #[arg(long, env = "POSTGATE_STATE_FILE", default_value = DEFAULT_STATE_FILE)]
    state_file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in with email and password.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "POSTGATE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and sign it in.
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        nickname: String,
        #[arg(long, env = "POSTGATE_PASSWORD", hide_env_values = true)]
        password: String,
        /// Defaults to `--password`.
        #[arg(long)]
        confirm_password: Option<String>,
    },
    Logout,
    Whoami,
    /// List posts.
    Posts,
    /// Show one post with its likes and comments.
    Post { slug: String },
    /// Like the post, or unlike it if already liked.
    Like { slug: String },
    Comment { slug: String, text: String },
    /// Send one chat message and print the reply.
    Chat { message: String },
}

struct App {
    config: ClientConfig,
    store: Arc<JsonFileStore>,
    provider: Arc<ToolkitProvider<ReqwestTransport>>,
    gate: Arc<IdentityGate>,
    nav: Arc<TerminalNav>,
    api: ReqwestBlogApi,
    navigator: TerminalNavigator,
}

impl App {
    fn new(config: ClientConfig, state_file: PathBuf) -> Result<Self, CliError> {
        let store = Arc::new(JsonFileStore::open(state_file)?);
        let transport = ReqwestTransport::new(config.request_timeout)?;
        let provider = Arc::new(ToolkitProvider::new(config.endpoints(), transport, SystemClock, store.clone()));
        let nav = Arc::new(TerminalNav::new());
        let gate = IdentityGate::connect(provider.as_ref(), nav.clone());
        provider.start();
        let api = ReqwestBlogApi::new(&config.api_base_url, config.request_timeout)?;
        Ok(Self { config, store, provider, gate, nav, api, navigator: TerminalNavigator::new() })
    }

    fn loader(&self) -> GatedPageLoader<'_> {
        GatedPageLoader::new(&self.gate, self.provider.as_ref(), &self.api)
            .with_navigator(&self.navigator, self.config.expired_redirect_delay)
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::from_lookup(|var| match var {
        API_BASE_URL_VAR => cli.api_base_url.clone(),
        API_KEY_VAR => cli.api_key.clone(),
        other => std::env::var(other).ok(),
    })?;
    tracing::debug!(api_base_url = %config.api_base_url, state_file = %cli.state_file.display(), "starting");

    let app = App::new(config, cli.state_file)?;
    let result = run(&app, cli.command).await;
    if let Some((route, delay)) = app.navigator.last() {
        println!("{}", describe_navigation(&route, delay));
    }
    result
}

async fn run(app: &App, command: Command) -> Result<(), CliError> {
    match command {
        Command::Login { email, password } => run_login(app, LoginForm { email, password }).await,
        Command::Register { email, nickname, password, confirm_password } => {
            let confirm_password = confirm_password.unwrap_or_else(|| password.clone());
            run_register(app, RegistrationForm { email, nickname, password, confirm_password }).await
        }
        Command::Logout => run_logout(app).await,
        Command::Whoami => run_whoami(app).await,
        Command::Posts => run_posts(app).await,
        Command::Post { slug } => run_post(app, &slug).await,
        Command::Like { slug } => run_like(app, &slug).await,
        Command::Comment { slug, text } => run_comment(app, &slug, &text).await,
        Command::Chat { message } => run_chat(app, &message).await,
    }
}

async fn run_login(app: &App, form: LoginForm) -> Result<(), CliError> {
    match forms::sign_in(app.provider.as_ref(), app.store.as_ref(), &app.navigator, &form).await {
        Ok(identity) => {
            println!("Signed in as {}.", identity.name());
            Ok(())
        }
        Err(e) => Err(CliError::Form(forms::login_error_message(&e))),
    }
}

async fn run_register(app: &App, form: RegistrationForm) -> Result<(), CliError> {
    match forms::register(app.provider.as_ref(), app.store.as_ref(), &app.navigator, &form).await {
        Ok(_) => {
            println!("{REGISTERED}");
            Ok(())
        }
        Err(e) => Err(CliError::Form(forms::registration_error_message(&e))),
    }
}

/// Logout is only offered once the gate has bound it to a signed-in user.
async fn run_logout(app: &App) -> Result<(), CliError> {
    app.gate.on_ready().await;
    if !app.nav.logout_bound() {
        println!("Not signed in.");
        return Ok(());
    }
    postgate::gate::logout(app.provider.as_ref(), app.store.as_ref(), &app.navigator).await?;
    tracing::info!(path = %app.store.path().display(), "session cleared");
    println!("Signed out.");
    Ok(())
}

async fn run_whoami(app: &App) -> Result<(), CliError> {
    app.gate.on_ready().await;
    let hints = SessionHints::new(app.store.as_ref());
    println!("{}", whoami_line(&app.gate.current(), app.nav.view().welcome.as_deref(), &hints));
    Ok(())
}

/// Signed-out users still see the hints left by their last sign-in.
fn whoami_line(state: &IdentityState, welcome: Option<&str>, hints: &SessionHints<'_>) -> String {
    match (state.identity(), welcome) {
        (Some(identity), Some(welcome)) => format!("{welcome} ({}, uid {})", identity.email, identity.uid),
        _ => match (hints.nickname().filter(|n| !n.is_empty()), hints.email()) {
            (Some(nickname), Some(email)) => format!("Not signed in. Last signed in as {nickname} <{email}>."),
            (None, Some(email)) => format!("Not signed in. Last signed in as {email}."),
            _ => "Not signed in.".to_owned(),
        },
    }
}

/// Expired and failed loads exit non-zero; denial is a normal outcome. A run
/// that stopped short of a terminal state is a failure too.
fn page_outcome<T>(page: &'static str, state: &PageState<T>) -> Result<(), CliError> {
    match state {
        PageState::Expired | PageState::Error(_) => Err(CliError::Page { page, state: state.label() }),
        state if state.is_terminal() => Ok(()),
        _ => Err(CliError::Page { page, state: state.label() }),
    }
}

async fn run_posts(app: &App) -> Result<(), CliError> {
    let run = app.loader().run(&PostListPage, |_| {}).await;
    for line in post_list_lines(&list::render(&run.state)) {
        println!("{line}");
    }
    page_outcome("posts", &run.state)
}

/// Gated detail load shared by `post`, `like`, and `comment`. Prints the
/// notice and returns `None` unless the detail loaded.
async fn load_detail(app: &App, slug: &str) -> Result<(PageRun<PostDetail>, Option<PostInteraction>), CliError> {
    let Some(page) = PostDetailPage::from_query(Some(slug)) else {
        println!("{}", notice_line(&post::render_missing_slug()));
        return Err(CliError::MissingSlug);
    };
    let run = app.loader().run(&page, |_| {}).await;
    if let Some(notice) = post::render(&run.state) {
        println!("{}", notice_line(&notice));
    }
    let interaction = run
        .state
        .loaded()
        .map(|detail| PostInteraction::new(page.slug.clone(), run.identity.identity().cloned(), detail));
    Ok((run, interaction))
}

fn print_detail(run: &PageRun<PostDetail>, interaction: &PostInteraction) {
    let Some(detail) = run.state.loaded() else {
        return;
    };
    let lines = post_detail_lines(
        &post::render_article(&detail.post, interaction),
        &post::render_likers(interaction),
        &post::render_comments(interaction),
    );
    for line in lines {
        println!("{line}");
    }
}

async fn run_post(app: &App, slug: &str) -> Result<(), CliError> {
    let (run, interaction) = load_detail(app, slug).await?;
    if let Some(interaction) = &interaction {
        print_detail(&run, interaction);
    }
    page_outcome("post", &run.state)
}

async fn run_like(app: &App, slug: &str) -> Result<(), CliError> {
    let (run, interaction) = load_detail(app, slug).await?;
    let Some(mut interaction) = interaction else {
        return page_outcome("post", &run.state);
    };
    if let Err(e) = interaction.toggle_like(app.provider.as_ref(), &app.api, &app.navigator).await {
        println!("{LIKE_FAILED}");
        return Err(e.into());
    }
    let verb = if interaction.liked() { "Liked" } else { "Unliked" };
    println!("{verb} {slug}; {} likes now.", interaction.like_count());
    Ok(())
}

async fn run_comment(app: &App, slug: &str, text: &str) -> Result<(), CliError> {
    let (run, interaction) = load_detail(app, slug).await?;
    let Some(mut interaction) = interaction else {
        return page_outcome("post", &run.state);
    };
    match interaction.submit_comment(app.provider.as_ref(), &app.api, text).await {
        Ok(()) => {
            println!("Comment added; {} comments now.", interaction.comment_count());
            Ok(())
        }
        Err(e @ FlowError::Validation(_)) => Err(e.into()),
        Err(e) => {
            println!("{COMMENT_FAILED}");
            Err(e.into())
        }
    }
}

async fn run_chat(app: &App, message: &str) -> Result<(), CliError> {
    let mut chat = ChatSession::new();
    chat.apply_ready(&app.gate.on_ready().await);
    let result = chat.send(&app.loader(), message).await;
    for line in chat.lines() {
        println!("{}", chat_line(line));
    }
    match result {
        Ok(run) => page_outcome("chat", &run.state),
        Err(FlowError::SignInRequired) => {
            println!("{CHAT_SIGNED_OUT}");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
