//! Latest water chemistry reading.

use sutro_core::Reading;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util::{self, Session};

fn measurement(value: Option<f64>, unit: &str) -> String {
    value.map_or_else(|| "-".into(), |v| format!("{v:.2} {unit}").trim_end().to_owned())
}

fn detail(reading: &Reading) -> String {
    output::detail_lines(&[
        ("pH", measurement(reading.ph(), "")),
        ("Alkalinity", measurement(reading.alkalinity(), "ppm")),
        ("Free chlorine", measurement(reading.chlorine(), "ppm")),
        ("Bromine", measurement(reading.bromine(), "ppm")),
        ("Taken", util::local_time(reading.reading_time())),
    ])
}

pub fn handle(session: &Session, global: &GlobalOpts) -> Result<(), CliError> {
    let snapshot = session.snapshot()?;
    let reading = snapshot
        .latest_reading()
        .ok_or_else(|| CliError::NotFound {
            resource_type: "reading".into(),
            identifier: snapshot.serial_number().to_owned(),
            list_command: "status".into(),
        })?;

    let out = output::render_single(&global.output, reading, detail, |r| {
        r.reading_time.clone().unwrap_or_default()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
