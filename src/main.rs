use std::path::PathBuf;

use clap::Parser;
use dialoguer::{Input, Select};

use form_autofill::config::BrowserBuilder;
use form_autofill::{
    embedding, Decision, Error, FillConfig, FillReport, FormSession, Orchestrator, Profile,
    ProfileStore, Result,
};

#[derive(Parser, Debug)]
#[command(
    name = "form-autofill",
    version,
    about = "Fill a web form from a JSON profile. Never submits."
)]
struct Cli {
    /// Directory holding profile `.json` files
    #[arg(long, default_value = "profiles")]
    profiles_dir: PathBuf,
    /// Profile file to use instead of prompting
    #[arg(long)]
    profile: Option<String>,
    /// Form URL to open instead of prompting
    #[arg(long)]
    url: Option<String>,
    #[arg(long, default_value_t = false)]
    headless: bool,
    /// Minimum confidence (exclusive) for writing a value
    #[arg(long, default_value_t = form_autofill::config::DEFAULT_THRESHOLD)]
    threshold: f32,
    /// Print the final report as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
    /// Close the browser without waiting for Enter
    #[arg(long, default_value_t = false)]
    no_wait: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let store = ProfileStore::open(&cli.profiles_dir)?;
    let profile = choose_profile(&store, cli.profile.as_deref())?;

    let url = match &cli.url {
        Some(url) => url.clone(),
        None => Input::<String>::new()
            .with_prompt("Enter the form URL")
            .interact_text()
            .map_err(|e| Error::Prompt(e.to_string()))?
            .trim()
            .to_string(),
    };

    let engine = embedding::default_engine();
    let orchestrator = Orchestrator::new(engine, FillConfig::default().threshold(cli.threshold));

    println!("\nOpening form in Chrome...");
    let session = BrowserBuilder::new().headless(cli.headless).build().await?;
    // Nothing between launch and close may return early.
    let reviewed = fill_and_review(&session, &url, &orchestrator, &profile, &cli).await;
    let closed = session.close().await;
    settle(reviewed, closed)
}

/// The run's error if it had one, otherwise the close error.
fn settle(run: Result<()>, closed: Result<()>) -> Result<()> {
    match (run, closed) {
        (Err(e), closed) => {
            if let Err(close_err) = closed {
                tracing::warn!(error = %close_err, "browser did not close cleanly");
            }
            Err(e)
        }
        (Ok(()), closed) => closed,
    }
}

fn choose_profile(store: &ProfileStore, requested: Option<&str>) -> Result<Profile> {
    let names = store.list()?;
    let name = match requested {
        Some(name) => name.to_string(),
        None => {
            println!("Available profiles in {}:", store.dir().display());
            let choice = Select::new()
                .with_prompt("Select profile to use")
                .items(&names)
                .default(0)
                .interact()
                .map_err(|e| Error::Prompt(e.to_string()))?;
            names[choice].clone()
        }
    };

    let profile = store.load(&name)?;
    println!("\nLoaded profile: {name}");
    println!("{}", profile.to_json_pretty()?);
    Ok(profile)
}

async fn fill_and_review<E: form_autofill::EmbeddingEngine>(
    session: &FormSession,
    url: &str,
    orchestrator: &Orchestrator<E>,
    profile: &Profile,
    cli: &Cli,
) -> Result<()> {
    let page = session.open_form(url).await?;
    println!("Scanning '{}' for form fields...", page.title().await?);

    let report = orchestrator
        .run_with_progress(&page, profile, |outcome| {
            let mark = match outcome.decision {
                Decision::Filled { .. } => "[filled]",
                Decision::NoConfidentMatch { .. } => "[skip]  ",
                Decision::WriteFailed { .. } => "[error] ",
            };
            println!("{mark} {outcome}");
        })
        .await
        .inspect_err(|e| eprintln!("Fill aborted: {e}"))?;

    print_summary(&report, cli.json)?;
    if !cli.no_wait {
        wait_for_enter()?;
    }
    Ok(())
}

fn print_summary(report: &FillReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!("\n{report}");
    }
    println!("Please review the form and submit it manually.");
    Ok(())
}

fn wait_for_enter() -> Result<()> {
    Input::<String>::new()
        .with_prompt("Press Enter to close the browser")
        .allow_empty(true)
        .interact_text()
        .map_err(|e| Error::Prompt(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_error_wins_over_close_error() {
        let err = settle(
            Err(Error::Prompt("not a terminal".into())),
            Err(Error::LaunchError("already gone".into())),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Prompt(_)));
    }

    #[test]
    fn close_error_surfaces_after_clean_run() {
        assert!(settle(Ok(()), Ok(())).is_ok());
        let err = settle(Ok(()), Err(Error::LaunchError("crashed".into()))).unwrap_err();
        assert!(matches!(err, Error::LaunchError(_)));
    }
}
