use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result, bail};
use clap::Parser;
use levelsync_archive::{ArchiveInspector, ZipInspector};
use levelsync_core::status::{ChannelStatus, TracingStatus};
use levelsync_core::{
    ContentKey, DirRegistry, FnCompletion, LevelGetter, LocalStore, Registry, spawn_acquisition,
};
use levelsync_fetch::ReqwestClient;
use levelsync_fs::{FileSystem, StdFileSystem};
use tokio::sync::mpsc;
use tracing::level_filters::LevelFilter;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::cli::{App, Commands, GetArg};
use crate::config::Config;
use crate::console::Console;
use crate::table::{DisabledRow, Formatter, LevelRow};

mod cli;
mod config;
mod console;
mod dirs;
mod table;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let app = App::parse();
    init_logging(app.verbose);

    let config = Config::load(app.config.as_deref()).context("loading configuration")?;
    let dirs = if app.dirs.is_empty() {
        config.directories.clone()
    } else {
        app.dirs.clone()
    };
    if dirs.is_empty() {
        bail!("no level directories configured");
    }
    debug!(?dirs, "level directories");

    match app.cmd {
        Commands::Get(arg) => get(&config, dirs, arg).await,
        Commands::List => list(&dirs),
        Commands::Disabled => disabled(&dirs),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .with_env_var("LEVELSYNC_LOG")
        .from_env_lossy();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .without_time()
        .try_init();
}

fn collaborators() -> (Arc<dyn FileSystem>, Arc<dyn ArchiveInspector>) {
    (Arc::new(StdFileSystem), Arc::new(ZipInspector))
}

#[derive(Debug, Clone, Copy)]
enum Notice {
    Completed(usize),
    Failed,
}

async fn get(config: &Config, dirs: Vec<PathBuf>, arg: GetArg) -> Result<ExitCode> {
    let (fs, archive) = collaborators();
    let registry = DirRegistry::load(&dirs, fs.clone(), archive.clone());
    let client = ReqwestClient::new(&config.client_options())?;
    let (tx, mut rx) = mpsc::unbounded_channel();

    let notice = Arc::new(Mutex::new(None));
    let (on_done, on_fail) = (notice.clone(), notice.clone());
    let completion = FnCompletion::new(
        move |index| *on_done.lock().unwrap_or_else(|e| e.into_inner()) = Some(Notice::Completed(index)),
        move || *on_fail.lock().unwrap_or_else(|e| e.into_inner()) = Some(Notice::Failed),
    );

    let mut getter = LevelGetter::new(registry, dirs, client)
        .with_fs(fs)
        .with_archive(archive)
        .with_status(Arc::new(ChannelStatus::new(tx)))
        .with_role(Arc::new(arg.server || config.server))
        .with_completion(Arc::new(completion))
        .with_lookup(config.lookup());

    let mut failures = 0;
    for key in arg.keys.into_iter().map(ContentKey::from) {
        let mut console = Console::new(&key);
        let mut task = spawn_acquisition(getter, key.clone());
        let (returned, outcome) = loop {
            tokio::select! {
                Some(event) = rx.recv() => console.render(event),
                joined = &mut task => break joined.context("acquisition task panicked")?,
            }
        };
        while let Ok(event) = rx.try_recv() {
            console.render(event);
        }
        getter = returned;

        console.finish(&key, &outcome);
        if !outcome.is_ready() {
            failures += 1;
        }
        match notice.lock().unwrap_or_else(|e| e.into_inner()).take() {
            Some(Notice::Completed(index)) => info!("server notified: {key} completed as #{index}"),
            Some(Notice::Failed) => info!("server notified: {key} failed"),
            None => {}
        }
    }

    Ok(if failures == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn list(dirs: &[PathBuf]) -> Result<ExitCode> {
    let (fs, archive) = collaborators();
    let entries = DirRegistry::load(dirs, fs, archive).list();
    let footer = format!("{} level(s)", entries.len());
    let rows = entries.iter().enumerate().map(|(i, e)| LevelRow::new(i, e));
    let table = Formatter {
        footer: Some(footer),
    }
    .build(rows);
    println!("{table}");
    Ok(ExitCode::SUCCESS)
}

fn disabled(dirs: &[PathBuf]) -> Result<ExitCode> {
    let (fs, archive) = collaborators();
    let dirs = dirs.to_vec();
    let store = LocalStore::new(&*fs, &*archive, &dirs, &TracingStatus);
    let paths = store.disabled_archives();
    let footer = format!("{} disabled archive(s)", paths.len());
    let rows = paths.iter().map(|p| DisabledRow::new(p, |orig| fs.exists(orig)));
    let table = Formatter {
        footer: Some(footer),
    }
    .build(rows);
    println!("{table}");
    Ok(ExitCode::SUCCESS)
}
