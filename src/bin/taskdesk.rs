use log::{info, warn};
use std::process;
use std::sync::Arc;

use taskdesk::config::ClientConfig;
use taskdesk::services::{Credentials, Registration};
use taskdesk::views::{HistoryNavigator, Resolution, Route};
use taskdesk::{AppContext, TaskDeskError};

const USAGE: &str = "\
Usage: taskdesk <command> [args]

Commands:
  login <email> <password>           Sign in and store the session
  register <name> <email> <password> Create an account and sign in
  logout                             Clear the stored session
  whoami                             Show the current session
  nav                                List the views available to you
  open <path>                        Check access to a view, e.g. /admin/users
  overview                           Fetch your dashboard counters";

#[tokio::main]
async fn main() {
    // Initialize env
    match dotenvy::dotenv() {
        Ok(_) => info!("Environment variables loaded from .env file"),
        Err(e) => warn!("Failed to load .env file: {}", e),
    };

    // Initialize logging
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        eprintln!("{}", USAGE);
        process::exit(2);
    }

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    info!("Configuration: api={}, state_dir={}", config.api_base_url, config.state_dir.display());

    let navigator = Arc::new(HistoryNavigator::new());
    let ctx = match AppContext::bootstrap(config, navigator.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Failed to initialize client: {}", e);
            process::exit(1);
        }
    };

    let result = run(&ctx, &args).await;

    if navigator.current() == Some(Route::Login) && matches!(result, Err(TaskDeskError::Unauthorized)) {
        eprintln!("Your session has expired. Please log in again.");
        process::exit(1);
    }
    if let Err(e) = result {
        eprintln!("{}", e);
        process::exit(1);
    }
}

async fn run(ctx: &AppContext, args: &[String]) -> Result<(), TaskDeskError> {
    let argv: Vec<&str> = args.iter().map(String::as_str).collect();
    match argv.as_slice() {
        ["login", email, password] => {
            let session = ctx.login(&Credentials::new(*email, *password)).await?;
            println!("Signed in as {} ({})", session.name, session.role.label());
        }
        ["register", name, email, password] => {
            let session = ctx
                .register(&Registration::new(*name, *email, *password))
                .await?;
            println!("Account created for {} ({})", session.name, session.role.label());
        }
        ["logout"] => {
            ctx.logout();
            println!("Signed out");
        }
        ["whoami"] => match ctx.current_user() {
            Some(session) => println!(
                "{} <{}> - {} (id {})",
                session.name,
                session.email,
                session.role.label(),
                session.user_id
            ),
            None => println!("Not signed in"),
        },
        ["nav"] => match ctx.dashboard() {
            Some(dashboard) => {
                for item in dashboard.navigation() {
                    println!("{:<12} {}", item.label, item.route);
                }
            }
            None => println!("Not signed in"),
        },
        ["open", path] => {
            let route = Route::parse(path).ok_or_else(|| {
                TaskDeskError::NotFound(format!("No view at '{}'", path))
            })?;
            match ctx.navigate(route) {
                Resolution::Render(route) => println!("Opened {}", route),
                Resolution::Redirect(Route::Login) => println!("Sign in to open {}", route),
                Resolution::Redirect(Route::Forbidden) => {
                    println!("Your role cannot open {}", route)
                }
                Resolution::Redirect(target) => println!("Redirected to {}", target),
            }
        }
        ["overview"] => {
            let dashboard = ctx.dashboard().ok_or(TaskDeskError::Unauthorized)?;
            let overview = dashboard.overview().await?;
            println!("{} dashboard", overview.role.label());
            for (label, count) in overview.counters {
                println!("  {:<16} {}", label, count);
            }
        }
        _ => {
            eprintln!("{}", USAGE);
            process::exit(2);
        }
    }
    Ok(())
}
