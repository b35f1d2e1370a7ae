mod app;
mod backend;
mod bootstrap;
mod cli;
mod config;
mod logging;
mod protocol;
mod runtime;
mod ui;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;

use app::App;
use backend::dev::DevBackend;
use cli::{Cli, Commands};
use config::HarvesterConfig;
use protocol::channel::MessageChannel;
use runtime::run_app;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::ConfigPath = cli.command {
        let path = HarvesterConfig::config_path()?;
        if !path.exists() {
            HarvesterConfig::default().save()?;
        }
        println!("{}", path.display());
        return Ok(());
    }

    let config = HarvesterConfig::load()?;
    logging::init()?;

    let transport = match cli.command {
        Commands::Run => backend::process::spawn(&config.backend_command)?,
        Commands::Dev => DevBackend::new().spawn(),
        Commands::ConfigPath => unreachable!("handled above"),
    };

    let (channel, mut push_rx) =
        MessageChannel::spawn(transport, Duration::from_secs(config.reply_timeout_secs));

    let mut app = App::new(config.defaults.clone());
    bootstrap::initialize_app_state(&mut app, &channel)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, &channel, &mut push_rx).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}
