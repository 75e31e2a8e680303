//! rbscope - Red-Black tree snapshot viewer.
//!
//! Watches a mailbox directory for tree snapshot files dumped by an
//! external process, renders each as a colored tree, and deletes the
//! consumed file.
//!
//! Usage:
//!   rbscope                      # watch ./tree_snapshots in the TUI
//!   rbscope --dir /tmp/snaps     # watch a custom directory
//!   rbscope --headless -v        # no TUI, log consumed snapshots
//!   rbscope --log-file w.log     # TUI mode with watcher logs on disk

use tikv_jemallocator::Jemalloc;
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use std::fs::OpenOptions;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use clap::Parser;
use tracing::{Level, error, info, warn};
use tracing_subscriber::EnvFilter;

use rbscope::topology::Provenance;
use rbscope::tui::App;
use rbscope::util::format_clock;
use rbscope::watcher::{RealFs, Scene, SnapshotWatcher};

/// Red-Black tree snapshot viewer.
#[derive(Parser)]
#[command(name = "rbscope", about = "Red-Black tree snapshot viewer", version)]
struct Args {
    /// Snapshot mailbox directory written by the producer.
    #[arg(short, long, default_value = "tree_snapshots")]
    dir: String,

    /// File-name prefix identifying snapshot files.
    #[arg(long, default_value = "tree_")]
    prefix: String,

    /// Poll interval in milliseconds.
    #[arg(short, long, default_value_t = 100)]
    interval_ms: u64,

    /// How many recent scenes the TUI keeps for history stepping.
    #[arg(long, default_value_t = 64)]
    retain: usize,

    /// Run without the TUI: consume snapshots and log each one.
    #[arg(long)]
    headless: bool,

    /// Write watcher logs to this file. Without it, TUI mode discards logs
    /// (the terminal belongs to the tree view); headless mode logs to
    /// stderr.
    #[arg(long, value_name = "PATH")]
    log_file: Option<String>,

    /// Increase logging verbosity (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

/// Initializes the tracing subscriber.
///
/// TUI mode without a log file installs no subscriber at all: the
/// alternate screen owns the terminal and stray stderr lines would
/// corrupt it.
fn init_logging(args: &Args) {
    let level = if args.quiet {
        Level::ERROR
    } else {
        match args.verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter = EnvFilter::from_default_env()
        .add_directive(format!("rbscope={}", level).parse().unwrap());

    if let Some(ref path) = args.log_file {
        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => file,
            Err(e) => {
                eprintln!("Error: cannot open log file '{}': {}", path, e);
                std::process::exit(1);
            }
        };
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_ansi(false)
            .with_writer(Arc::new(file))
            .init();
    } else if args.headless {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }
}

/// One-line summary of a consumed scene for headless logs.
fn describe_scene(scene: &Scene) -> String {
    let mut parts = vec![format!("{} nodes", scene.node_count)];

    match scene.graph.as_ref().map(|g| g.provenance) {
        Some(Provenance::Exact) => parts.push("exact topology".to_string()),
        Some(Provenance::Inferred) => parts.push("inferred topology".to_string()),
        None => parts.push("nothing to render".to_string()),
    }
    if scene.skipped_lines > 0 {
        parts.push(format!("{} lines skipped", scene.skipped_lines));
    }
    if scene.dangling > 0 {
        parts.push(format!("{} dangling refs", scene.dangling));
    }

    format!(
        "{} at {}: {}",
        scene.file_name,
        format_clock(scene.consumed_at),
        parts.join(", ")
    )
}

fn main() {
    let args = Args::parse();
    init_logging(&args);

    let watcher = SnapshotWatcher::new(RealFs::new(), &args.dir, &args.prefix);
    let interval = Duration::from_millis(args.interval_ms.max(1));

    if args.headless {
        run_headless(watcher, interval, &args);
    } else {
        let app = App::new(watcher, args.retain, &args.dir);
        if let Err(e) = app.run(interval) {
            eprintln!("Error running TUI: {}", e);
            std::process::exit(1);
        }
    }
}

/// Consume-and-log loop for environments with no display surface.
fn run_headless(mut watcher: SnapshotWatcher<RealFs>, interval: Duration, args: &Args) {
    info!("rbscope {} starting (headless)", env!("CARGO_PKG_VERSION"));
    info!(
        "Config: dir={}, prefix={}, interval={}ms",
        args.dir,
        args.prefix,
        interval.as_millis()
    );

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    }) {
        warn!("Failed to set Ctrl-C handler: {}", e);
    }

    while running.load(Ordering::SeqCst) {
        match watcher.poll_once() {
            Ok(scenes) => {
                for scene in &scenes {
                    info!("{}", describe_scene(scene));
                }
            }
            Err(e) => {
                // Directory-level failure: nothing left to watch.
                error!("{}", e);
                std::process::exit(1);
            }
        }

        // Sleep in slices so the shutdown signal is observed promptly.
        let slice = Duration::from_millis(100);
        let mut remaining = interval;
        while remaining > Duration::ZERO && running.load(Ordering::SeqCst) {
            let sleep_time = remaining.min(slice);
            std::thread::sleep(sleep_time);
            remaining = remaining.saturating_sub(sleep_time);
        }
    }

    info!(
        "Shutdown complete, {} snapshots consumed",
        watcher.processed_count()
    );
}

#[cfg(test)]
mod tests {
    use super::describe_scene;
    use rbscope::watcher::Scene;

    #[test]
    fn test_describe_scene_empty() {
        let scene = Scene {
            file_name: "tree_0.txt".to_string(),
            consumed_at: 0,
            node_count: 0,
            skipped_lines: 2,
            dangling: 0,
            graph: None,
        };
        let desc = describe_scene(&scene);
        assert!(desc.contains("tree_0.txt"));
        assert!(desc.contains("nothing to render"));
        assert!(desc.contains("2 lines skipped"));
    }
}
