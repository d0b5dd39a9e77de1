//! Triene command line driver
//!
//! Logs in, seeds the application state and runs the requested actions in a
//! fixed order: import, connection test, automation, outline, approval,
//! images, descriptions, exports.

mod pipeline;

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use pipeline::Actions;
use std::path::PathBuf;
use triene_core::{authenticate, AppState, TrieneConfig};

fn cli() -> Command {
    Command::new("triene")
        .version("1.0.0")
        .about("Triene CRM cadence automation and content planner")
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("FILE")
                .help("Configuration file path (built-in defaults when omitted)")
        )
        .arg(
            Arg::new("email")
                .long("email")
                .value_name("EMAIL")
                .env("TRIENE_EMAIL")
                .required(true)
                .help("Operator email")
        )
        .arg(
            Arg::new("password")
                .long("password")
                .value_name("PASSWORD")
                .env("TRIENE_PASSWORD")
                .hide_env_values(true)
                .required(true)
                .help("Operator password")
        )
        .arg(
            Arg::new("import-leads")
                .long("import-leads")
                .help("Import the sample lead spreadsheet")
                .action(ArgAction::SetTrue)
        )
        .arg(
            Arg::new("test-connection")
                .long("test-connection")
                .help("Test the messaging provider connection (admin only)")
                .action(ArgAction::SetTrue)
        )
        .arg(
            Arg::new("run-automation")
                .long("run-automation")
                .help("Advance every eligible lead by one cadence step")
                .action(ArgAction::SetTrue)
        )
        .arg(
            Arg::new("build-outline")
                .long("build-outline")
                .help("Build the 30-day content outline")
                .action(ArgAction::SetTrue)
        )
        .arg(
            Arg::new("instagram")
                .long("instagram")
                .value_name("HANDLE")
                .requires("build-outline")
                .help("Instagram handle to analyse")
        )
        .arg(
            Arg::new("approve-outline")
                .long("approve-outline")
                .help("Approve the outline")
                .action(ArgAction::SetTrue)
        )
        .arg(
            Arg::new("generate-images")
                .long("generate-images")
                .help("Generate images for every day")
                .action(ArgAction::SetTrue)
        )
        .arg(
            Arg::new("generate-descriptions")
                .long("generate-descriptions")
                .help("Generate captions for every day")
                .action(ArgAction::SetTrue)
        )
        .arg(
            Arg::new("export-calendar")
                .long("export-calendar")
                .value_name("FILE")
                .num_args(0..=1)
                .default_missing_value("")
                .help("Write the calendar as JSON")
        )
        .arg(
            Arg::new("export-leads")
                .long("export-leads")
                .value_name("FILE")
                .num_args(0..=1)
                .default_missing_value("")
                .help("Write the lead list as CSV")
        )
}

fn actions_from(matches: &ArgMatches) -> Actions {
    Actions {
        import_leads: matches.get_flag("import-leads"),
        test_connection: matches.get_flag("test-connection"),
        run_automation: matches.get_flag("run-automation"),
        build_outline: matches.get_flag("build-outline"),
        instagram: matches.get_one::<String>("instagram").cloned(),
        approve_outline: matches.get_flag("approve-outline"),
        generate_images: matches.get_flag("generate-images"),
        generate_descriptions: matches.get_flag("generate-descriptions"),
        export_calendar: matches.get_one::<String>("export-calendar").map(PathBuf::from),
        export_leads: matches.get_one::<String>("export-leads").map(PathBuf::from),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging with INFO as default if RUST_LOG not set
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).init();

    let matches = cli().get_matches();

    let config = match matches.get_one::<String>("config") {
        Some(path) => {
            let config = TrieneConfig::from_file(path)
                .with_context(|| format!("Failed to load configuration from {}", path))?;
            log::info!("Loaded configuration from {}", path);
            config
        }
        None => {
            log::info!("No configuration file given, using built-in defaults");
            TrieneConfig::default()
        }
    };

    let email = matches.get_one::<String>("email").context("email is required")?;
    let password = matches.get_one::<String>("password").context("password is required")?;
    let session = authenticate(email, password)?;
    log::info!("Welcome, {}", session.name);

    let actions = actions_from(&matches);
    if actions.is_empty() {
        log::warn!("No actions requested; printing current state");
    }

    let state = AppState::seeded(&config).with_session(session);
    let state = pipeline::run(state, &config, &actions).await?;

    println!("{}", serde_json::to_string_pretty(&pipeline::summary(&state))?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_map_to_actions() {
        let matches = cli()
            .try_get_matches_from([
                "triene",
                "--email",
                "admin@triene.com",
                "--password",
                "admin",
                "--build-outline",
                "--instagram",
                "@triene",
                "--export-calendar",
                "--export-leads",
                "out/leads.csv",
            ])
            .unwrap();
        let actions = actions_from(&matches);

        assert!(actions.build_outline);
        assert_eq!(actions.instagram.as_deref(), Some("@triene"));
        assert_eq!(actions.export_calendar, Some(PathBuf::new()));
        assert_eq!(actions.export_leads, Some(PathBuf::from("out/leads.csv")));
        assert!(!actions.run_automation);
    }

    #[test]
    fn test_instagram_requires_build_outline() {
        let result = cli().try_get_matches_from([
            "triene",
            "--email",
            "a",
            "--password",
            "b",
            "--instagram",
            "@triene",
        ]);
        assert!(result.is_err());
    }
}
