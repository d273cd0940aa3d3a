use std::fmt;
use std::sync::Arc;

use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use dioxus::LaunchBuilder;
use url::Url;

use api::HttpApi;
use course_core::Clock;
use services::{
    AuthService, CatalogService, ProfileService, ProgressTracker, SessionContext,
};
use ui::{build_app_context, App, UiApp};

const DEFAULT_API_URL: &str = "http://localhost:8000/";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidApiUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidApiUrl { raw } => write!(f, "invalid --api value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    session: SessionContext,
    catalog: Arc<CatalogService>,
    progress: Arc<ProgressTracker>,
    auth: Arc<AuthService>,
    profile: Arc<ProfileService>,
}

impl UiApp for DesktopApp {
    fn session(&self) -> SessionContext {
        self.session.clone()
    }

    fn catalog(&self) -> Arc<CatalogService> {
        Arc::clone(&self.catalog)
    }

    fn progress(&self) -> Arc<ProgressTracker> {
        Arc::clone(&self.progress)
    }

    fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }

    fn profile(&self) -> Arc<ProfileService> {
        Arc::clone(&self.profile)
    }
}

struct Args {
    api_url: Url,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--api <base_url>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --api {DEFAULT_API_URL}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  CAMPUS_API_URL");
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut raw_url = std::env::var("CAMPUS_API_URL")
            .ok()
            .unwrap_or_else(|| DEFAULT_API_URL.into());

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--api" => {
                    let value = require_value(args, "--api")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidApiUrl { raw: value });
                    }
                    raw_url = value;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let api_url = Url::parse(&raw_url).map_err(|_| ArgsError::InvalidApiUrl { raw: raw_url })?;
        Ok(Self { api_url })
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut argv = std::env::args().skip(1);
    let parsed = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    tracing::info!(api = %parsed.api_url, "starting Campus");

    // One HTTP client behind all three contracts; the services only see the
    // trait objects.
    let remote = Arc::new(HttpApi::new(parsed.api_url));
    let session = SessionContext::new();
    let tracker = Arc::new(ProgressTracker::new(
        session.clone(),
        Arc::clone(&remote),
    ));
    let auth = Arc::new(AuthService::new(
        Arc::clone(&remote),
        session.clone(),
        Arc::clone(&tracker),
    ));
    let catalog = Arc::new(CatalogService::new(Arc::clone(&remote)));
    let profile = Arc::new(ProfileService::new(
        Clock::default_clock(),
        Arc::clone(&auth),
        Arc::clone(&tracker),
    ));

    let app = DesktopApp {
        session,
        catalog,
        progress: tracker,
        auth,
        profile,
    };

    let app: Arc<dyn UiApp> = Arc::new(app);
    let context = build_app_context(&app);

    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Campus")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run() {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
