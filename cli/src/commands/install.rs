//! Command: link every managed file into the home directory.
use std::sync::Arc;

use anyhow::Result;

use super::CommandSetup;
use crate::cli::GlobalOpts;
use crate::logging::{Log, Logger};
use crate::tasks::{self, Context};

/// Run the install command.
///
/// # Errors
///
/// Returns an error if setup fails, a source is missing, or a filesystem
/// operation fails. Files linked before the failure stay linked.
pub fn run(global: &GlobalOpts, log: &Arc<Logger>) -> Result<()> {
    log.info(&format!("dotlink {}", super::version::VERSION));

    let setup = CommandSetup::init(global, log)?;
    let config = &setup.config;
    let ctx = Context::new(
        config.root.clone(),
        config.home.clone(),
        setup.backup_parent.clone(),
        Arc::clone(log) as Arc<dyn Log>,
    )
    .with_dry_run(global.dry_run);

    log.stage(if global.dry_run {
        "Planning links"
    } else {
        "Linking files"
    });

    let result = tasks::install(&ctx, &config.files);
    if let Ok(report) = &result {
        if report.is_noop() {
            log.info("everything already linked");
        }
        if let Some(dir) = &report.backup_dir {
            log.info(&format!("moved {} entry(s) to {}", report.moves(), dir.display()));
        }
    }
    log.print_summary();
    result?;
    Ok(())
}
