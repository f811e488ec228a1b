//! mapedit - headless placement editor driven over the remote protocol

use std::path::PathBuf;
use std::sync::Arc;

use mapedit::core::{Result, logging};
use mapedit::diff::{JsonFileStore, RecordStore};
use mapedit::editor::{Editor, EditorConfig};
use mapedit::scene::SceneStore;
use mapedit_remote::RemoteServer;

const USAGE: &str = "Usage: mapedit --records <path> [--config <path>] [--port N]";

struct Args {
    records: PathBuf,
    config: Option<PathBuf>,
    port: Option<u16>,
}

/// None when `--records` is missing.
fn parse_args(args: &[String]) -> Option<Args> {
    let value = |flag: &str| {
        args.iter()
            .position(|a| a == flag)
            .and_then(|i| args.get(i + 1))
    };

    Some(Args {
        records: value("--records").map(PathBuf::from)?,
        config: value("--config").map(PathBuf::from),
        port: value("--port").and_then(|s| s.parse().ok()),
    })
}

async fn run(args: Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };
    let port = args.port.unwrap_or(config.remote_port);

    let store = Arc::new(JsonFileStore::new(&args.records));
    let records = store.download().await?;
    log::info!("Loaded {} records from {}", records.len(), args.records.display());

    let mut editor = Editor::new(SceneStore::from_records(records), &config);
    editor.set_store(store);
    editor.begin_session();

    let editor = Arc::new(tokio::sync::Mutex::new(editor));
    let server = RemoteServer::bind(editor.clone(), port).await?;
    log::info!("Remote control on {}, Ctrl-C to quit", server.local_addr());

    tokio::signal::ctrl_c().await?;

    drop(server);
    editor.lock().await.end_session();
    Ok(())
}

fn main() {
    logging::init();

    let args: Vec<String> = std::env::args().collect();
    let Some(args) = parse_args(&args) else {
        eprintln!("{}", USAGE);
        std::process::exit(2);
    };

    let rt = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            log::error!("Failed to create tokio runtime: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = rt.block_on(run(args)) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn test_parse_args() {
        let parsed = parse_args(&args("mapedit --records data/models.json --port 9000")).unwrap();
        assert_eq!(parsed.records, PathBuf::from("data/models.json"));
        assert_eq!(parsed.port, Some(9000));
        assert!(parsed.config.is_none());
    }

    #[test]
    fn test_records_required() {
        assert!(parse_args(&args("mapedit --port 9000")).is_none());
        assert!(parse_args(&args("mapedit --records")).is_none());
    }
}
