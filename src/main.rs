mod api;
mod app;
mod components;
mod config;
mod error;
mod event;
mod explorer;
mod handler;
mod logging;
mod theme;
mod tui;
mod ui;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::info;

use crate::api::http::HttpDevice;
use crate::app::{App, AppOptions};
use crate::config::{AppConfig, DeviceConfig, DownloadConfig, GeneralConfig, LogConfig};
use crate::event::{Event, EventHandler};
use crate::tui::{install_panic_hook, Tui};

/// Browse and download files from an embedded device's web server.
#[derive(Parser, Debug)]
#[command(name = "devfs", version, about)]
struct Cli {
    /// Device base URL (defaults to config, then http://192.168.4.1)
    base_url: Option<String>,

    /// Path to a config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory downloaded files are written to
    #[arg(long)]
    download_dir: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Disable mouse support
    #[arg(long)]
    no_mouse: bool,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// CLI flags as a partial config that wins over every file.
    fn overrides(&self) -> AppConfig {
        AppConfig {
            device: DeviceConfig {
                base_url: self.base_url.clone(),
                timeout_secs: self.timeout_secs,
            },
            general: GeneralConfig {
                mouse: self.no_mouse.then_some(false),
            },
            download: DownloadConfig {
                dir: self
                    .download_dir
                    .as_ref()
                    .map(|p| p.to_string_lossy().into_owned()),
            },
            log: LogConfig {
                file: self
                    .log_file
                    .as_ref()
                    .map(|p| p.to_string_lossy().into_owned()),
                level: None,
            },
            ..AppConfig::default()
        }
    }
}

#[tokio::main]
async fn main() -> error::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref(), Some(&cli.overrides()));

    logging::init(config.log_file().as_deref(), config.log_level())?;

    let device = HttpDevice::new(
        config.base_url(),
        Duration::from_secs(config.timeout_secs()),
    )?;
    info!(
        base_url = device.base_url(),
        theme = config.theme_scheme(),
        "starting devfs"
    );

    install_panic_hook();

    let mut tui = Tui::new(config.mouse_enabled())?;
    let mut events = EventHandler::new(Duration::from_millis(50));

    let options = AppOptions {
        device_label: device.base_url().to_string(),
        download_dir: config.download_dir(),
        use_icons: config.use_icons(),
        theme: theme::resolve_theme(&config.theme),
    };
    let mut app = App::new(Arc::new(device), options, events.sender());
    app.init();

    loop {
        tui.draw(|frame| ui::render(&mut app, frame))?;

        match events.next().await? {
            Event::Key(key) => handler::handle_key_event(&mut app, key),
            Event::Mouse(mouse) => handler::handle_mouse_event(&mut app, mouse),
            Event::Tick => app.clear_expired_status(),
            Event::Resize => {}
            Event::Loaded(outcome) => app.handle_loaded(outcome),
            Event::DownloadFinished(result) => app.handle_download_finished(result),
        }

        if app.should_quit {
            break;
        }
    }

    tui.restore()?;
    info!("devfs exited");
    Ok(())
}
