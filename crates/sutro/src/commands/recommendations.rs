//! Recommendation (to-do) handlers.

use tabled::Tabled;

use sutro_core::entity::{self, TodoItem, TodoStatus};
use sutro_core::CoreError;

use crate::cli::{GlobalOpts, RecommendationsArgs, RecommendationsCommand};
use crate::error::CliError;
use crate::output;

use super::util::Session;

#[derive(Tabled)]
struct TodoRow {
    #[tabled(rename = "ID")]
    uid: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Treatment")]
    summary: String,
    #[tabled(rename = "Why")]
    description: String,
}

fn status_text(status: TodoStatus, color: bool) -> String {
    let done = status == TodoStatus::Completed;
    let label = if done { "done" } else { "to do" };
    output::paint_flag(Some(done), true, label, color)
}

fn detail(item: &TodoItem) -> String {
    output::detail_lines(&[
        ("ID", item.uid.clone()),
        ("Status", item.status.to_string()),
        ("Treatment", item.summary.clone()),
        ("Why", item.description.clone().unwrap_or_else(|| "-".into())),
    ])
}

pub async fn handle(
    session: &Session,
    args: RecommendationsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        RecommendationsCommand::List => {
            let color = output::should_color(&global.color);
            let snapshot = session.snapshot()?;
            let items = entity::todo_items(&snapshot);
            let out = output::render_list(
                &global.output,
                &items,
                |i| TodoRow {
                    uid: i.uid.clone(),
                    status: status_text(i.status, color),
                    summary: i.summary.clone(),
                    description: i.description.clone().unwrap_or_default(),
                },
                |i| i.uid.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RecommendationsCommand::Complete { id } => {
            set_status(session, &id, TodoStatus::Completed, global).await
        }

        RecommendationsCommand::Uncomplete { id } => {
            set_status(session, &id, TodoStatus::NeedsAction, global).await
        }
    }
}

async fn set_status(
    session: &Session,
    id: &str,
    status: TodoStatus,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if session.snapshot()?.recommendation(id).is_none() {
        return Err(CoreError::NotFound {
            entity_type: "recommendation".into(),
            identifier: id.into(),
        }
        .into());
    }

    entity::update_todo_item(&session.coordinator, id, status).await?;

    // Re-render from the refreshed snapshot, not from what was requested.
    let snapshot = session.snapshot()?;
    let item = entity::todo_items(&snapshot)
        .into_iter()
        .find(|i| i.uid == id)
        .ok_or_else(|| CliError::NotFound {
            resource_type: "recommendation".into(),
            identifier: id.into(),
            list_command: "recommendations list".into(),
        })?;

    if item.status != status && !global.quiet {
        eprintln!("Server accepted the change but still reports '{}'", item.status);
    }

    let out = output::render_single(&global.output, &item, detail, |i| i.uid.clone());
    output::print_output(&out, global.quiet);
    Ok(())
}
