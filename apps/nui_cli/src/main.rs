mod config;

use std::{path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::{load_settings, Settings};
use dispatcher::{spawn_dispatcher, ActionHandlers, Dispatcher};
use locale::{
    storage::{FileStorage, LocalStorage},
    I18n,
};
use nui_bridge::{BridgeConfig, HostRpc, NuiBridge, OfflineHost};
use serde_json::Value;
use store::{
    actions::PhoneActions,
    effects::{EffectSink, Haptics, PhoneEffect},
    notify::Notifier,
    Store,
};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "nui", about = "Phone UI runtime driven from the terminal")]
struct Args {
    /// Config file; defaults to ./nui.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read host action messages as JSON lines from stdin and dispatch them.
    Run {
        /// Never contact the host; every callback fails with CALLBACK_FAILED.
        #[arg(long)]
        offline: bool,
        /// Print the final phone state as JSON when stdin closes.
        #[arg(long)]
        print_state: bool,
    },
    /// Invoke one host callback and print its response.
    Call {
        action: String,
        #[arg(default_value = "{}")]
        payload: String,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let settings = load_settings(args.config.as_deref())?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&settings.log_filter))
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Command::Run {
            offline,
            print_state,
        } => run(&settings, offline, print_state).await,
        Command::Call { action, payload } => call(&settings, &action, &payload).await,
    }
}

fn build_bridge(settings: &Settings) -> Result<NuiBridge> {
    NuiBridge::new(BridgeConfig {
        resource_name: settings.resource_name.clone(),
        base_url: settings.base_url.clone(),
        timeout: settings.rpc_timeout(),
    })
    .context("failed to build host bridge")
}

async fn call(settings: &Settings, action: &str, payload: &str) -> Result<ExitCode> {
    let payload: Value = serde_json::from_str(payload).context("payload must be JSON")?;
    let bridge = build_bridge(settings)?;
    let response = bridge.call(action, payload).await;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(if response.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn run(settings: &Settings, offline: bool, print_state: bool) -> Result<ExitCode> {
    let storage: Arc<dyn LocalStorage> = Arc::new(FileStorage::open(&settings.storage_path));
    let mut i18n = I18n::new(Arc::clone(&storage));
    if let Some(dir) = &settings.catalog_dir {
        i18n = i18n.with_catalog_dir(dir);
    }
    let i18n = Arc::new(i18n);
    if !i18n.load_locale_messages(i18n.current_locale()).await {
        warn!(locale = %i18n.current_locale(), "starting without a message catalog");
    }

    let (effect_tx, mut effect_rx) = mpsc::unbounded_channel::<PhoneEffect>();
    let sink: Arc<dyn EffectSink> = Arc::new(effect_tx);
    let effects_task = tokio::spawn(async move {
        while let Some(effect) = effect_rx.recv().await {
            match serde_json::to_string(&effect) {
                Ok(line) => println!("{line}"),
                Err(err) => warn!(error = %err, "failed to encode effect"),
            }
        }
    });

    let store = Store::new(Arc::clone(&sink));
    let rpc: Arc<dyn HostRpc> = if offline {
        Arc::new(OfflineHost)
    } else {
        Arc::new(build_bridge(settings)?)
    };
    let actions = PhoneActions::new(Arc::clone(&store), rpc);
    let settings_response = actions.load_settings().await;
    if !settings_response.success {
        warn!(
            error = settings_response.error.as_deref().unwrap_or("UNKNOWN_ERROR"),
            "continuing with default phone settings"
        );
    }

    let notifier = Notifier::new(Arc::clone(&sink), Arc::clone(&i18n))
        .with_haptics(Haptics::new(storage, Arc::clone(&sink)));
    let handlers = ActionHandlers::new(Arc::clone(&store), i18n, notifier);
    let (inbound, dispatch_task) =
        spawn_dispatcher(Dispatcher::new(handlers), settings.inbound_capacity);
    info!("listening for host messages on stdin");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let raw: Value = match serde_json::from_str(line) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(error = %err, "skipping line that is not JSON");
                continue;
            }
        };
        if inbound.send(raw).await.is_err() {
            warn!("dispatcher stopped; no more messages accepted");
            break;
        }
    }

    drop(inbound);
    dispatch_task.await.context("dispatcher task failed")?;

    if print_state {
        println!("{}", serde_json::to_string(&store.snapshot())?);
    }

    drop(actions);
    drop(sink);
    drop(store);
    effects_task.await.context("effect printer failed")?;
    Ok(ExitCode::SUCCESS)
}
