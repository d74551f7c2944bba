//! didfolio CLI
//!
//! Thin wrapper around didfolio-core for command-line usage, backed by a
//! local wallet key and a local persistent document index.
//!
//! ## Usage
//!
//! ```bash
//! # Show the local account and DID
//! didfolio whoami
//!
//! # Read your profile (or someone else's by identity reference)
//! didfolio read
//! didfolio read --identity 0xabc...@eip155:1
//!
//! # Update your profile
//! didfolio set --name "Ada" --avatar https://x/y.png
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use didfolio_core::{
    Did, FolioResult, LocalWallet, Notification, Notifier, ProfileController, ProfileStore,
    RedbIndex, Severity, BASIC_PROFILE_KEY,
};

/// didfolio - DID-authenticated profile storage
#[derive(Parser)]
#[command(name = "didfolio")]
#[command(version = "0.1.0")]
#[command(about = "Read and write a DID-addressed basic profile")]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Data directory (default: ~/.didfolio/data)
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the local account address and DID
    Whoami,

    /// Read the basic profile
    Read {
        /// Read another identity's public profile instead of your own
        #[arg(long)]
        identity: Option<String>,
    },

    /// Update the basic profile
    Set {
        /// Display name
        #[arg(long)]
        name: Option<String>,

        /// Avatar image URL
        #[arg(long)]
        avatar: Option<String>,
    },
}

/// Notifier that prints flow outcomes to the terminal
struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Success => println!("{}", notification.title),
            Severity::Error => {
                eprintln!("{} {}", notification.title, notification.description)
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let data_dir = cli.data_dir.unwrap_or_else(default_data_dir);
    std::fs::create_dir_all(&data_dir)?;

    let wallet = Arc::new(LocalWallet::load_or_generate(data_dir.join("wallet.key"))?);
    let index = RedbIndex::new(data_dir.join("index.redb"))?;

    match cli.command {
        Commands::Whoami => {
            let did = Did::from_verifying_key(&wallet.verifying_key());
            println!("Account: {}", wallet.address());
            println!("DID: {}", did);
            println!("Data directory: {}", data_dir.display());
        }

        Commands::Read { identity } => match identity {
            Some(identity_ref) => {
                // Public read of someone else's profile; no flow state needed
                let store = ProfileStore::new(index);
                match store.get(BASIC_PROFILE_KEY, &identity_ref).await? {
                    Some(profile) => print_profile(
                        profile.name.as_deref(),
                        profile.avatar_url.as_deref(),
                    ),
                    None => println!("No profile stored for {}", identity_ref),
                }
            }
            None => {
                let mut controller =
                    ProfileController::new(wallet, index, Arc::new(TerminalNotifier));
                let outcome = controller.read_profile().await;
                if outcome.is_err() {
                    // The notifier already surfaced the failure
                    return Ok(ExitCode::from(flow_exit(&outcome)));
                }

                if controller.shows_no_profile() {
                    println!("No profile, please create one...");
                } else {
                    let state = controller.state();
                    print_profile(
                        (!state.name.is_empty()).then_some(state.name.as_str()),
                        (!state.image.is_empty()).then_some(state.image.as_str()),
                    );
                }
            }
        },

        Commands::Set { name, avatar } => {
            if name.is_none() && avatar.is_none() {
                anyhow::bail!("nothing to set: pass --name and/or --avatar");
            }

            let mut controller =
                ProfileController::new(wallet, index, Arc::new(TerminalNotifier));

            // Start from whatever is already stored so a partial set does
            // not drop the other field
            let _ = controller.read_profile().await;

            if let Some(name) = name {
                controller.set_name(name);
            }
            if let Some(avatar) = avatar {
                controller.set_image(avatar);
            }

            let outcome = controller.update_profile().await;
            return Ok(ExitCode::from(flow_exit(&outcome)));
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Exit code for a flow outcome the notifier has already surfaced.
///
/// Flow failures must not be reported a second time on the way out; the
/// error notification is the single user-visible surface.
fn flow_exit<T>(outcome: &FolioResult<T>) -> u8 {
    if outcome.is_ok() {
        0
    } else {
        1
    }
}

fn print_profile(name: Option<&str>, avatar: Option<&str>) {
    println!("Name: {}", name.unwrap_or("(not set)"));
    println!("Avatar: {}", avatar.unwrap_or("(not set)"));
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();
}

/// Get the default data directory (~/.didfolio/data)
fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".didfolio")
        .join("data")
}

#[cfg(test)]
mod tests {
    use super::*;
    use didfolio_core::FolioError;

    #[test]
    fn test_flow_exit_codes() {
        assert_eq!(flow_exit::<()>(&Ok(())), 0);
        assert_eq!(
            flow_exit::<()>(&Err(FolioError::HandshakeTimeout(
                "signing prompt expired".to_string()
            ))),
            1
        );
    }
}
