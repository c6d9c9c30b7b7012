#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use tracing_subscriber::EnvFilter;


fn main() -> anyhow::Result<()> {

    tracing_subscriber::fmt()
        .with_env_filter (
            EnvFilter::try_from_default_env()
                .unwrap_or_else (|_| EnvFilter::new("info"))
        )
        .init();

    tracing::info! (version = env!("CARGO_PKG_VERSION"), "capstan starting");

    #[cfg(windows)]
    { capstan::run() }

    #[cfg(not(windows))]
    {
        tracing::error! ("capstan hooks the windows input stream, theres nothing to run on this platform");
        Ok(())
    }
}
