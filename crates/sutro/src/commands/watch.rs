//! Continuous polling until Ctrl-C.

use std::time::Duration;

use sutro_core::{ConfigEntry, Integration};
use tracing::info;

use crate::cli::{GlobalOpts, OutputFormat, WatchArgs};
use crate::error::CliError;
use crate::output;

use super::status;

pub async fn handle(
    mut entry: ConfigEntry,
    args: WatchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if let Some(secs) = args.interval {
        if secs == 0 {
            return Err(CliError::Validation {
                field: "interval".into(),
                reason: "must be at least 1 second".into(),
            });
        }
        entry.monitor.poll_interval = Duration::from_secs(secs);
    }

    let entry_id = entry.entry_id.clone();
    let title = entry.title.clone();
    let integration = Integration::new();
    let coordinator = integration.start(entry).await?;
    let mut updates = coordinator.subscribe();
    info!(
        entry = %entry_id,
        interval_secs = coordinator.update_interval().as_secs(),
        "watching"
    );

    // Streamed JSON is one document per line.
    let line_global;
    let global = if matches!(global.output, OutputFormat::Json) {
        line_global = GlobalOpts {
            output: OutputFormat::JsonCompact,
            ..global.clone()
        };
        &line_global
    } else {
        global
    };

    output::print_output(
        &status::render_entities(&title, &coordinator, global),
        global.quiet,
    );

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                output::print_output(
                    &status::render_entities(&title, &coordinator, global),
                    global.quiet,
                );
            }
        }
    }

    integration.stop(&entry_id).await;
    Ok(())
}
