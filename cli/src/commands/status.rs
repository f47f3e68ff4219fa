//! Command: show the link state of every managed file.
use anyhow::Result;

use super::CommandSetup;
use crate::cli::GlobalOpts;
use crate::logging::{Logger, Tone};
use crate::resources::LinkState;
use crate::tasks::{self, Inspection};

/// Run the status command.
///
/// Read-only; files that still need linking are listed but do not make the
/// command fail.
///
/// # Errors
///
/// Returns an error if setup fails or a target cannot be examined.
pub fn run(global: &GlobalOpts, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;

    log.stage("Link status");
    let inspections = tasks::inspect(&setup.config.files)?;
    for inspection in &inspections {
        let (tone, line) = describe(inspection);
        log.result(tone, &line);
    }

    let linked = inspections
        .iter()
        .filter(|i| i.state == LinkState::Correct)
        .count();
    log.info(&format!("{linked} of {} file(s) linked", inspections.len()));

    let missing = inspections.iter().filter(|i| !i.source_exists).count();
    if missing > 0 {
        log.warn(&format!("{missing} source file(s) missing; install will fail"));
    }
    Ok(())
}

fn describe(inspection: &Inspection) -> (Tone, String) {
    let label = inspection.file.label();
    if !inspection.source_exists {
        return (
            Tone::Bad,
            format!(
                "✗ {label} (source missing: {})",
                inspection.file.source.display()
            ),
        );
    }
    match &inspection.state {
        LinkState::Correct => (Tone::Good, format!("✓ {label}")),
        state => (
            Tone::Pending,
            format!("○ {label} ({} is {state})", inspection.file.target.display()),
        ),
    }
}
