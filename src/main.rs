// Entrypoint for the CLI application.
// - Keeps `main` small: resolve settings, build the client, hand it to the loop.
// - A missing credential is reported once and ends the process before the loop.

use name_sensei::{api::OpenAiClient, config, logging, ui};
use tracing::debug;

fn main() -> anyhow::Result<()> {
    let loaded = config::load_dotenv();
    logging::init();
    for path in &loaded {
        debug!(path = %path.display(), "loaded settings file");
    }

    let settings = config::Settings::from_env()?;
    debug!(?settings, "settings resolved");
    let client = OpenAiClient::new(&settings)?;

    // Blocks until the user quits or input ends.
    ui::main_loop(&client)?;
    Ok(())
}
