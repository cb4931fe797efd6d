//! Sensor overview.

use tabled::Tabled;

use sutro_core::entity::{self, DeviceClass, EntityKind, EntityState, SensorValue};
use sutro_core::{Coordinator, CoordinatorState};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util::{self, Session};

#[derive(Tabled)]
struct EntityRow {
    #[tabled(rename = "Entity")]
    name: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "ID")]
    unique_id: String,
}

fn value_text(state: &EntityState, color: bool) -> String {
    let Some(ref value) = state.value else {
        return output::dim("-", color);
    };

    if let (EntityKind::BinarySensor, SensorValue::Bool(on)) = (state.kind, value) {
        let good_when = state.device_class == Some(DeviceClass::Connectivity);
        return output::paint_flag(Some(*on), good_when, &value.to_string(), color);
    }

    match state.unit {
        Some(unit) => format!("{value} {unit}"),
        None => value.to_string(),
    }
}

/// Header line for table views: title, freshness, and last good update.
pub fn header(title: &str, coordinator: &Coordinator, color: bool) -> String {
    let status = coordinator.status();
    let fresh = status.state == CoordinatorState::Fresh;
    let state = output::paint_flag(Some(fresh), true, &status.state.to_string(), color);
    format!(
        "{title}  {state}  {}",
        output::dim(
            &format!("updated {}", util::local_time(status.last_success)),
            color
        )
    )
}

/// Render every entity for the coordinator's current snapshot.
pub fn render_entities(title: &str, coordinator: &Coordinator, global: &GlobalOpts) -> String {
    let color = output::should_color(&global.color);
    let states = entity::render_all(coordinator);
    let list = output::render_list(
        &global.output,
        &states,
        |s| EntityRow {
            name: s.name.to_owned(),
            value: value_text(s, color),
            category: s.category.to_string(),
            unique_id: s.unique_id.clone(),
        },
        |s| {
            let value = s.value.as_ref().map_or_else(String::new, ToString::to_string);
            format!("{}={value}", s.unique_id)
        },
    );

    match global.output {
        crate::cli::OutputFormat::Table => format!("{}\n{list}", header(title, coordinator, color)),
        _ => list,
    }
}

pub fn handle(session: &Session, global: &GlobalOpts) -> Result<(), CliError> {
    let out = render_entities(&session.title, &session.coordinator, global);
    output::print_output(&out, global.quiet);
    Ok(())
}
