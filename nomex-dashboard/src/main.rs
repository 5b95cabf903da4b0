use anyhow::{Context, Result};
use clap::Parser;
use nomex::api::ApiClient;
use nomex::app::Dashboard;
use nomex::auth::AuthFlow;
use nomex::config::Settings;
use nomex::formatting::{format_post_line, format_relative_time};
use nomex::logging::{self, LogConfig};
use nomex_types::AuthStatus;

/// Nomex - feed dashboard for travelers, expats and digital nomads
#[derive(Parser)]
#[command(name = "nomex")]
#[command(about = "Loads the Nomex feed headlessly and prints it")]
#[command(version)]
struct Cli {
    /// Server URL to connect to
    #[arg(long, short, env = "NOMEX_SERVER_URL")]
    server: Option<String>,

    /// Email of the signed-in user (stored together with --session-token)
    #[arg(long, env = "NOMEX_EMAIL")]
    email: Option<String>,

    /// Session token issued by the web sign-in
    #[arg(long, env = "NOMEX_SESSION_TOKEN")]
    session_token: Option<String>,

    /// Number of feed pages to load
    #[arg(long, default_value_t = 1)]
    pages: u32,

    /// Also load and print each post's comments
    #[arg(long)]
    comments: bool,

    /// Enable verbose logging
    #[arg(long, short)]
    verbose: bool,
}

// Load environment variables from .env file
// This allows NOMEX_SERVER_URL and other config to be set without command-line args
fn load_env() {
    let _ = dotenv::dotenv();
}

#[tokio::main]
async fn main() -> Result<()> {
    load_env();
    let cli = Cli::parse();

    let settings = Settings::new().context("Failed to load settings")?;
    let log_config = if cli.verbose {
        LogConfig {
            log_file: settings.log_config().log_file,
            ..LogConfig::verbose()
        }
    } else {
        settings.log_config()
    };
    logging::init_logging(&log_config)?;

    let server_url = cli.server.unwrap_or_else(|| settings.server.base_url.clone());
    log::info!("Using server {}", server_url);
    let mut api_client = ApiClient::with_timeout(server_url, settings.request_timeout())
        .context("Failed to build HTTP client")?;

    let auth = AuthFlow::new()?;
    if let (Some(email), Some(token)) = (&cli.email, &cli.session_token) {
        log::info!("Storing session from command line");
        auth.remember(email, token)?;
    }
    let resolution = auth.check_existing_session(&mut api_client).await?;

    let mut dashboard = Dashboard::with_log_config(api_client, log_config);
    dashboard
        .on_auth_status_change(resolution.status, resolution.viewer.clone())
        .await;

    if resolution.status == AuthStatus::Authenticated {
        if let Some(viewer) = &resolution.viewer {
            // Onboarding errors surface through the dashboard's error record
            let _ = dashboard.check_onboarding(&viewer.email).await;
        }
        if dashboard.needs_onboarding() {
            println!("Finish onboarding in the web app to complete your profile.");
        }
    }

    for _ in 1..cli.pages {
        if !dashboard.load_next_page().await {
            break;
        }
    }

    if cli.comments {
        let ids: Vec<_> = dashboard.visible_posts().iter().map(|p| p.id).collect();
        for id in ids {
            dashboard.mount_post(id).await;
        }
    }

    if let Some(error) = dashboard.error() {
        anyhow::bail!("{}", error);
    }

    print_feed(&dashboard);
    Ok(())
}

fn print_feed(dashboard: &Dashboard) {
    let now = chrono::Utc::now();
    let posts = dashboard.visible_posts();
    if posts.is_empty() {
        println!("No posts yet.");
        return;
    }

    for post in posts {
        println!("{}", format_post_line(post, &now));
        if let Some(set) = dashboard.comment_set(post.id) {
            for comment in set.comments() {
                println!(
                    "    {} · {}: {}",
                    comment.author.display_name(),
                    format_relative_time(&comment.created_at, &now),
                    comment.comment
                );
            }
        }
    }

    let state = dashboard.feed_state();
    if state.has_more {
        println!("-- page {} loaded, more available --", state.page);
    } else {
        println!("-- end of feed --");
    }
}
