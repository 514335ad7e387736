//! Session startup and the main menu loop.

use std::path::Path;

use anyhow::Context;
use roster_core::{Console, RecordStore, add_record, bulk_load, update_record};
use roster_store::RosterSheet;
use tracing::{info, warn};

const MENU: &[&str] = &[
    "",
    "=============== ARL COMPANY ROSTER ===============",
    "  1. Add company",
    "  2. Update company",
    "  3. Bulk load companies",
    "  4. Save and exit",
];

const CLOSE_FILE_HINT: &str =
    "Make sure the file is not open in another program (e.g. a spreadsheet) and try again.";

/// The sheet being edited and whether running out of input may save it.
pub struct Session {
    pub sheet: RosterSheet,
    /// False when the sheet stands in for a file that could not be read.
    pub save_on_eof: bool,
}

impl Session {
    fn loaded(sheet: RosterSheet) -> Self {
        Self {
            sheet,
            save_on_eof: true,
        }
    }
}

/// Load the roster at `path`, creating it when it does not exist.
///
/// A file that exists but cannot be read is reported and replaced by an empty
/// sheet; the file itself is only overwritten by an explicit save.
pub fn open_or_create(path: &Path, console: &mut impl Console) -> anyhow::Result<Session> {
    if !path.exists() {
        let sheet = RosterSheet::create(path)
            .with_context(|| format!("creating roster file {}", path.display()))?;
        console.say(&format!("Created new roster file '{}'.", path.display()));
        return Ok(Session::loaded(sheet));
    }

    match RosterSheet::open(path) {
        Ok(sheet) => {
            if !sheet.header_matches() {
                console.say(
                    "WARNING: the file header does not match the expected columns; \
                     cells are read by position.",
                );
            }
            console.say(&format!(
                "Loaded '{}' ({} companies).",
                path.display(),
                sheet.len()
            ));
            Ok(Session::loaded(sheet))
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "roster file unreadable");
            console.say(&format!("ERROR: could not read '{}': {e}", path.display()));
            console.say(CLOSE_FILE_HINT);
            console.say("Starting with an empty roster; the file is replaced only if you save.");
            Ok(Session {
                sheet: RosterSheet::new(path),
                save_on_eof: false,
            })
        }
    }
}

/// Show the main menu until the roster is saved.
///
/// A failed operation or save returns to the menu with the session intact.
/// When input runs out the roster is saved once and a failure is returned as
/// an error; a sheet standing in for an unreadable file is not saved.
pub fn run(session: &mut Session, console: &mut impl Console) -> anyhow::Result<()> {
    let sheet = &mut session.sheet;
    loop {
        for line in MENU {
            console.say(line);
        }
        let Some(choice) = console.read_line("Choose an option (1-4): ")? else {
            if !session.save_on_eof {
                warn!(path = %sheet.path().display(), "input ended; unreadable file left as is");
                console.say("Input ended; the unreadable file was left unchanged.");
                return Ok(());
            }
            return sheet
                .save()
                .with_context(|| format!("saving roster file {}", sheet.path().display()));
        };

        let outcome = match choice.trim() {
            "1" => add_record(sheet, console).map(drop),
            "2" => update_record(sheet, console).map(drop),
            "3" => bulk_load(sheet, console).map(drop),
            "4" => {
                if save(sheet, console) {
                    return Ok(());
                }
                continue;
            }
            other => {
                console.say(&format!("Invalid option '{other}'. Choose 1 to 4."));
                continue;
            }
        };
        if let Err(e) = outcome {
            warn!(error = %e, "operation failed");
            console.say(&format!("ERROR: the operation could not be completed: {e}"));
        }
    }
}

fn save(sheet: &RosterSheet, console: &mut impl Console) -> bool {
    match sheet.save() {
        Ok(()) => {
            info!(rows = sheet.len(), "session saved");
            console.say(&format!(
                "Saved {} companies to '{}'. Goodbye.",
                sheet.len(),
                sheet.path().display()
            ));
            true
        }
        Err(e) => {
            warn!(error = %e, "save failed");
            console.say(&format!(
                "ERROR: could not save '{}': {e}",
                sheet.path().display()
            ));
            console.say(CLOSE_FILE_HINT);
            false
        }
    }
}
