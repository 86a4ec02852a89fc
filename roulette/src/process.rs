//! Shared filter-select-record workflow, written against the
//! [`SheetHandler`] trait.

use rand::RngCore;
use rand::seq::IndexedRandom;
use url::form_urlencoded;

use crate::Paths;
use crate::errors::RouletteError;
use crate::history::{History, append_revision};
use crate::item::Item;
use crate::sheets::SheetHandler;

#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// When false, run the full select/log flow but leave the history and
    /// revision files untouched (dry-run).
    pub persist: bool,
    /// Cap on re-draws when a pick turns out to be already solved. Only
    /// reachable for handlers that allow repeats or under concurrent
    /// mutation; the filter step already removes solved items.
    pub max_redraws: usize,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            persist: true,
            max_redraws: 8,
        }
    }
}

/// The outcome of one run: the drawn item and its search link.
#[derive(Debug, Clone)]
pub struct Selection {
    pub item: Item,
    pub link: String,
}

/// Run the selection workflow for one sheet.
///
/// Loads the dataset and history, flattens, filters out solved items, draws
/// one uniformly at random, and (unless dry-running) appends the drawn id to
/// the history file. Per invocation the history file either stays unchanged
/// or gains exactly one entry.
pub fn process(
    handler: &dyn SheetHandler,
    paths: &Paths,
    rng: &mut dyn RngCore,
    options: &ProcessOptions,
) -> Result<Selection, RouletteError> {
    let config = handler.config();
    let sheet = config.file_key;
    log::info!("processing sheet '{sheet}'");

    let raw = handler.load_dataset(paths, rng)?;
    let history_path = paths.history_file(sheet);
    let mut history = History::load(&history_path)?;

    let items = handler.flatten(&raw).map_err(|source| RouletteError::Shape {
        sheet: sheet.to_string(),
        source,
    })?;
    log::debug!(
        "{} candidates, {} already solved",
        items.len(),
        history.len()
    );

    let candidates: Vec<Item> = items
        .into_iter()
        .filter(|item| !history.contains(&item.id))
        .collect();
    if candidates.is_empty() {
        return Err(RouletteError::SheetExhausted {
            sheet: sheet.to_string(),
        });
    }

    // Bounded re-draw from the already-filtered pool. Since the pool was
    // filtered against the same in-memory history this accepts on the first
    // draw unless repeats are in play.
    let mut selected: Option<Item> = None;
    let mut attempts = 0;
    while attempts <= options.max_redraws {
        attempts += 1;
        let Some(pick) = candidates.choose(&mut *rng) else {
            break;
        };
        if handler.allow_repeats() || !history.contains(&pick.id) {
            selected = Some(pick.clone());
            break;
        }
        log::warn!("drew already-solved id '{}', re-drawing", pick.id);
    }
    let Some(item) = selected else {
        return Err(RouletteError::DrawsExhausted {
            sheet: sheet.to_string(),
            attempts,
        });
    };

    match serde_json::to_string_pretty(&item) {
        Ok(pretty) => log::info!("selected item: {pretty}"),
        Err(_) => log::info!("selected item id: {}", item.id),
    }
    let title = handler.title(&item);
    let link = search_link(&title, config.site);
    log::info!("link: {link}");

    if options.persist {
        history.push(item.id.clone());
        history.save(&history_path)?;
    } else {
        log::info!("dry run: not recording '{}' in history", item.id);
    }

    Ok(Selection { item, link })
}

/// Undo the most recent history append and log that id for spaced revision.
///
/// Returns the demoted id, or `None` when there was nothing to demote (or the
/// run is a dry-run). Net effect right after [`process`]: history unchanged,
/// one new line in the revision log.
pub fn mark_revision(
    handler: &dyn SheetHandler,
    paths: &Paths,
    options: &ProcessOptions,
) -> Result<Option<String>, RouletteError> {
    let sheet = handler.config().file_key;
    if !options.persist {
        log::info!("dry run: not marking revision for '{sheet}'");
        return Ok(None);
    }

    let history_path = paths.history_file(sheet);
    let mut history = History::load(&history_path)?;
    let Some(id) = history.demote_last() else {
        log::warn!("cannot mark revision: history for '{sheet}' is empty");
        return Ok(None);
    };

    append_revision(&paths.revision_file(sheet), &id)?;
    history.save(&history_path)?;
    log::info!("id '{id}' marked for revision");
    Ok(Some(id))
}

/// Search-engine deep link for a title, scoped to the sheet's source site.
/// Pure string construction: reserved characters percent-encoded, spaces
/// as `+`.
pub fn search_link(title: &str, site: &str) -> String {
    let query: String = form_urlencoded::byte_serialize(title.as_bytes()).collect();
    format!("https://www.google.com/search?q={query}+site%3A{site}")
}
