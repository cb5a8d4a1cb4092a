use anyhow::Result;
use edupredict_client::config::Config;
use edupredict_client::session::{BootstrapOutcome, Session};
use edupredict_client::storage::FileTokenStore;
use edupredict_client::transport::ApiClient;
use edupredict_client::utils::logger::setup_logger;
use std::env;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    setup_logger();

    let config = Config::new();
    let store = Arc::new(FileTokenStore::new(config.storage.token_file.clone()));
    let client = Arc::new(ApiClient::new(&config, store)?);
    let mut session = Session::new(client);

    match session.bootstrap(Some("/dashboard")).await {
        BootstrapOutcome::Authenticated(user) => {
            println!("Signed in as {} ({})", user.full_name, user.role);
        }
        outcome @ BootstrapOutcome::SignInRequired { .. } => {
            let (Ok(email), Ok(password)) =
                (env::var("EDUPREDICT_EMAIL"), env::var("EDUPREDICT_PASSWORD"))
            else {
                println!(
                    "Sign-in required, go to {}",
                    outcome.login_path().unwrap_or_default()
                );
                return Ok(());
            };
            let user = session.sign_in(&email, &password).await?;
            println!("Signed in as {} ({})", user.full_name, user.role);
        }
        BootstrapOutcome::BackendOffline(message) => {
            eprintln!("{message}");
            return Ok(());
        }
    }

    for section in session.sections() {
        println!("  {:?} -> {}", section, section.path());
    }

    Ok(())
}
