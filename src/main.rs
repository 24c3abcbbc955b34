use clap::Parser;
use color_eyre::Result;
use csvdash::chart_export::export_sections;
use csvdash::logging::{init_file_logging, init_stderr_logging};
use csvdash::source::LoadOptions;
use csvdash::{App, AppConfig, AppEvent, Args, CacheManager, ConfigManager, Dashboard};
use ratatui::DefaultTerminal;
use std::path::Path;
use std::sync::mpsc::channel;
use std::time::Duration;
use tracing::info;

fn render(terminal: &mut DefaultTerminal, app: &mut App) -> Result<()> {
    terminal.draw(|frame| frame.render_widget(app, frame.area()))?;
    Ok(())
}

fn run(mut terminal: DefaultTerminal, config: &AppConfig) -> Result<()> {
    let (tx, rx) = channel::<AppEvent>();
    let mut app = App::new(tx.clone(), config)?;
    let poll_interval = Duration::from_millis(config.display.event_poll_interval_ms);
    render(&mut terminal, &mut app)?;
    if config.loading.load_all_on_start {
        tx.send(AppEvent::LoadAll)?;
    }

    loop {
        if crossterm::event::poll(poll_interval)? {
            match crossterm::event::read()? {
                crossterm::event::Event::Key(key) => tx.send(AppEvent::Key(key))?,
                crossterm::event::Event::Resize(cols, rows) => {
                    tx.send(AppEvent::Resize(cols, rows))?
                }
                _ => {}
            }
        }

        let updated = match rx.recv_timeout(Duration::from_millis(0)) {
            Ok(event) => {
                match event {
                    AppEvent::Exit => break,
                    event => {
                        if let Some(event) = app.event(event) {
                            tx.send(event)?;
                        }
                    }
                }
                true
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => false,
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
        };

        // Keep drawing while loads run so the throbber moves.
        if updated || app.is_busy() {
            render(&mut terminal, &mut app)?;
        }
    }
    Ok(())
}

/// Load every dataset, write every chart into `dir` and report what happened.
fn export_headless(config: &AppConfig, dir: &Path) -> Result<()> {
    init_stderr_logging(config.debug.enabled)?;
    let format = config.export_format()?;
    let options = LoadOptions {
        timeout: Duration::from_secs(config.loading.timeout_secs),
    };

    let mut dashboard = Dashboard::from_config(config);
    let failures = dashboard.load_all_blocking(&options);
    for (key, e) in &failures {
        let source = dashboard
            .datasets()
            .get(key)
            .map(|d| d.source.as_str());
        eprintln!(
            "{}: {}",
            key,
            csvdash::error_display::user_message_from_report(e, source)
        );
    }

    let report = export_sections(&dashboard.sections(), dir, format)?;
    info!(
        charts = report.written.len(),
        failed = report.failures.len(),
        dir = %dir.display(),
        "export finished"
    );
    for (path, e) in &report.failures {
        eprintln!("{}: {}", path.display(), e);
    }
    for path in &report.written {
        println!("{}", path.display());
    }
    if report.is_empty() {
        println!("No charts to export");
    }
    Ok(())
}

fn handle_early_exit_flags(args: &Args) -> Result<Option<()>> {
    if args.clear_cache {
        match CacheManager::new(csvdash::APP_NAME) {
            Ok(cache) => {
                if let Err(e) = cache.clear_all() {
                    eprintln!("Error clearing cache: {}", e);
                    std::process::exit(1);
                }
                println!("Cache cleared successfully");
                return Ok(Some(()));
            }
            Err(_e) => {
                println!("No cache to clear");
                return Ok(Some(()));
            }
        }
    }

    if args.generate_config {
        match ConfigManager::new(csvdash::APP_NAME) {
            Ok(config_manager) => match config_manager.write_default_config(args.force) {
                Ok(path) => {
                    println!("Configuration file written to {}", path.display());
                    return Ok(Some(()));
                }
                Err(e) => {
                    eprintln!("Error writing configuration: {}", e);
                    std::process::exit(1);
                }
            },
            Err(e) => {
                eprintln!("Error initializing config manager: {}", e);
                std::process::exit(1);
            }
        }
    }

    Ok(None)
}

/// Defaults, then the config file, then command-line overrides.
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => AppConfig::load_file(path)?,
        None => AppConfig::load(csvdash::APP_NAME)?,
    };
    config.apply_args(args);
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(()) = handle_early_exit_flags(&args)? {
        return Ok(());
    }

    color_eyre::install()?;
    let config = load_config(&args)?;

    if let Some(dir) = &args.export {
        return export_headless(&config, dir);
    }

    let cache = CacheManager::new(csvdash::APP_NAME)?;
    let log_path = init_file_logging(&cache, config.debug.enabled)?;
    info!(log = %log_path.display(), datasets = config.datasets.len(), "starting");

    let terminal = ratatui::init();
    let result = run(terminal, &config);
    ratatui::restore();
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_reach_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[display]\npage_size = 5\n\n[[datasets]]\nkey = \"one\"\nsource = \"one.csv\"\nname = \"One\"\n",
        )
        .unwrap();
        let config_arg = path.to_string_lossy().to_string();

        let args = Args::try_parse_from([
            "csvdash",
            "--config",
            config_arg.as_str(),
            "--dataset",
            "two=two.csv",
            "--load-all",
        ])
        .unwrap();
        let config = load_config(&args).unwrap();
        assert_eq!(config.display.page_size, 5);
        let keys: Vec<&str> = config.datasets.iter().map(|d| d.key.as_str()).collect();
        assert_eq!(keys, ["one", "two"]);
        assert!(config.loading.load_all_on_start);
    }

    #[test]
    fn test_zero_page_size_is_rejected() {
        let args = Args::try_parse_from(["csvdash", "--page-size", "0"]).unwrap();
        let mut config = AppConfig::default();
        config.apply_args(&args);
        assert!(config.validate().is_err());
    }
}
