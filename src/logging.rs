use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// The filter comes from `WEEKPLAN_LOG` (default `warn`). When `WEEKPLAN_DEBUG`
/// names a file, events are appended there. Otherwise they go to stderr,
/// unless `terminal_ui` is set, in which case they are dropped so they cannot
/// tear the screen.
pub fn init(terminal_ui: bool) {
    let filter =
        || EnvFilter::try_from_env("WEEKPLAN_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    if let Ok(path) = std::env::var("WEEKPLAN_DEBUG") {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path);
        if let Ok(file) = file {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter())
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
            return;
        }
    }

    if terminal_ui {
        return;
    }
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
