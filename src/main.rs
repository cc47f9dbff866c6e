use std::env;
use std::path::Path;

use anyhow::{Context, Result};
use cargus_rs::{CarrierClient, Session};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn usage(program: &str) -> ! {
    eprintln!("Usage: {} <command> [args]", program);
    eprintln!("  counties                   list counties");
    eprintln!("  localities <county_id>     list localities of a county");
    eprintln!("  ship <waybill.json>        create a waybill and save its label PDF");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  CARGUS_SUBSCRIPTION_KEY    API subscription key (required)");
    eprintln!("  CARGUS_USERNAME            account user name (required)");
    eprintln!("  CARGUS_PASSWORD            account password (required)");
    eprintln!("  CARGUS_API_URL             API base URL override");
    eprintln!("  CARGUS_OUTPUT_DIR          directory for label PDFs (default: current)");
    std::process::exit(1);
}

#[derive(Debug, PartialEq)]
enum Command<'a> {
    Counties,
    Localities { county_id: &'a str },
    Ship { file: &'a Path },
}

/// Parse the arguments after the program name. Runs before any login so a
/// bad invocation never touches the network.
fn parse_command(args: &[String]) -> Option<Command<'_>> {
    match args {
        [cmd] if cmd == "counties" => Some(Command::Counties),
        [cmd, county_id] if cmd == "localities" => Some(Command::Localities { county_id }),
        [cmd, file] if cmd == "ship" => Some(Command::Ship {
            file: Path::new(file),
        }),
        _ => None,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cargus_rs=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("cargus-rs");
    let command = match parse_command(args.get(1..).unwrap_or(&[])) {
        Some(command) => command,
        None => {
            if let Some(unknown) = args.get(1) {
                eprintln!("Unknown command or missing argument: {}", unknown);
            }
            usage(program);
        }
    };

    let username = env::var("CARGUS_USERNAME").context("CARGUS_USERNAME is not set")?;
    let password = env::var("CARGUS_PASSWORD").context("CARGUS_PASSWORD is not set")?;

    let client = CarrierClient::from_env().context("Failed to configure carrier client")?;
    let session = client
        .login(&Session::new(), &username, &password)
        .await
        .context("Login failed")?;

    match command {
        Command::Counties => {
            let counties = client.fetch_counties(&session).await?;
            for county in &counties {
                println!(
                    "{:>4}  {:<3} {}",
                    county.county_id.unwrap_or_default(),
                    county.abbreviation.as_deref().unwrap_or("-"),
                    county.name.as_deref().unwrap_or("N/A")
                );
            }
        }
        Command::Localities { county_id } => {
            let localities = client.fetch_localities(&session, county_id).await?;
            for locality in &localities {
                println!(
                    "{:>6}  {:<8} {}",
                    locality.locality_id.unwrap_or_default(),
                    locality.postal_code.as_deref().unwrap_or("-"),
                    locality.name.as_deref().unwrap_or("N/A")
                );
            }
        }
        Command::Ship { file } => {
            let waybill = read_waybill(file)?;
            let created = client
                .create_waybill(&session, &waybill)
                .await
                .context("Waybill creation failed")?;
            println!("Waybill: {}", created.waybill_id);

            let path = client
                .fetch_label_document(&created.session)
                .await
                .context("Label download failed")?;
            println!("Label saved to {}", path.display());
        }
    }

    Ok(())
}

fn read_waybill(path: &Path) -> Result<serde_json::Value> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("Invalid JSON in {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command(&args(&["counties"])), Some(Command::Counties));
        assert_eq!(
            parse_command(&args(&["localities", "7"])),
            Some(Command::Localities { county_id: "7" })
        );
        assert_eq!(
            parse_command(&args(&["ship", "awb.json"])),
            Some(Command::Ship {
                file: Path::new("awb.json")
            })
        );
    }

    #[test]
    fn test_parse_command_rejects_bad_input() {
        assert_eq!(parse_command(&args(&[])), None);
        assert_eq!(parse_command(&args(&["localities"])), None);
        assert_eq!(parse_command(&args(&["ship"])), None);
        assert_eq!(parse_command(&args(&["label"])), None);
        assert_eq!(parse_command(&args(&["counties", "extra"])), None);
    }
}
