//! Per-sheet normalization strategies.
//!
//! Every sheet stores its raw data in a different nested shape. Each handler
//! here owns one flattening rule that turns its shape into a uniform
//! `Vec<Item>`, plus (where the defaults don't fit) a title rule and a dataset
//! loader. The shared selection workflow in [`crate::process`] is written
//! against the [`SheetHandler`] trait and never looks at raw shapes itself.

use std::path::PathBuf;

use rand::RngCore;
use rand::seq::IndexedRandom;
use serde::Deserialize;
use serde_json::Value;

use crate::errors::RouletteError;
use crate::item::{Difficulty, Item};
use crate::{Paths, read_json};

/// Fixed per-variant configuration, immutable after construction.
#[derive(Debug, Clone)]
pub struct SheetConfig {
    /// Base name for the sheet's data, history, and revision files.
    pub file_key: &'static str,
    /// Site domain the search link is scoped to.
    pub site: &'static str,
    /// Directory of pre-fetched JSON pages, for pool-backed sheets only.
    pub pool_dir: Option<&'static str>,
    /// Difficulty filter applied to pool-backed sheets.
    pub difficulty: Option<Difficulty>,
}

impl SheetConfig {
    pub const fn basic(file_key: &'static str, site: &'static str) -> Self {
        Self {
            file_key,
            site,
            pool_dir: None,
            difficulty: None,
        }
    }
}

/// Strategy interface for one sheet type.
///
/// `flatten` is the only mandatory hook; the defaults cover sheets whose data
/// file sits at the standard location and whose items carry a `title` field.
pub trait SheetHandler {
    fn config(&self) -> &SheetConfig;

    /// Turn the sheet's raw nested shape into a flat candidate list.
    /// Must be deterministic: group order in the source is preserved.
    fn flatten(&self, raw: &Value) -> Result<Vec<Item>, serde_json::Error>;

    /// Display text for the selected item, used to build the search link.
    fn title(&self, item: &Item) -> String {
        item.title
            .clone()
            .unwrap_or_else(|| "Unknown Title".to_string())
    }

    /// Read the sheet's raw dataset. Pool-backed sheets override this to pick
    /// one pre-fetched page at random.
    fn load_dataset(&self, paths: &Paths, _rng: &mut dyn RngCore) -> Result<Value, RouletteError> {
        read_json(&paths.data_file(self.config().file_key))
    }

    /// Whether a draw that is already in history may be accepted anyway.
    fn allow_repeats(&self) -> bool {
        false
    }
}

// Raw shapes. Each variant deserializes only the envelope it understands and
// leaves the items themselves to `Item`'s own tolerant deserializer.

#[derive(Deserialize)]
struct TopicGroups {
    #[serde(rename = "sheetData")]
    sheet_data: Vec<TopicGroup>,
}

#[derive(Deserialize)]
struct TopicGroup {
    topics: Vec<Item>,
}

#[derive(Deserialize)]
struct SectionGroups {
    #[serde(rename = "sheetData")]
    sheet_data: Vec<SectionGroup>,
}

#[derive(Deserialize)]
struct SectionGroup {
    data: Vec<Item>,
}

#[derive(Deserialize)]
struct QuestionGroups {
    #[serde(rename = "sheetData")]
    sheet_data: Vec<QuestionGroup>,
}

#[derive(Deserialize)]
struct QuestionGroup {
    questions: Vec<Item>,
}

#[derive(Deserialize)]
struct FlatData {
    data: Vec<Item>,
}

#[derive(Deserialize)]
struct ProductList {
    #[serde(rename = "sheetData")]
    sheet_data: Vec<Item>,
}

#[derive(Deserialize)]
struct PoolFile {
    data: PoolPayload,
}

#[derive(Deserialize)]
struct PoolPayload {
    problem_list: Vec<Item>,
}

/// Groups of `topics` lists, concatenated in stored order (`sde_sheet`).
pub struct TopicGroupSheet {
    config: SheetConfig,
}

impl TopicGroupSheet {
    pub fn new(config: SheetConfig) -> Self {
        Self { config }
    }
}

impl SheetHandler for TopicGroupSheet {
    fn config(&self) -> &SheetConfig {
        &self.config
    }

    fn flatten(&self, raw: &Value) -> Result<Vec<Item>, serde_json::Error> {
        let groups: TopicGroups = serde_json::from_value(raw.clone())?;
        Ok(groups
            .sheet_data
            .into_iter()
            .flat_map(|group| group.topics)
            .collect())
    }
}

/// Groups of `data` lists (the dbms/os/cn core sheets).
pub struct SectionDataSheet {
    config: SheetConfig,
}

impl SectionDataSheet {
    pub fn new(config: SheetConfig) -> Self {
        Self { config }
    }
}

impl SheetHandler for SectionDataSheet {
    fn config(&self) -> &SheetConfig {
        &self.config
    }

    fn flatten(&self, raw: &Value) -> Result<Vec<Item>, serde_json::Error> {
        let groups: SectionGroups = serde_json::from_value(raw.clone())?;
        Ok(groups
            .sheet_data
            .into_iter()
            .flat_map(|group| group.data)
            .collect())
    }
}

/// Groups of `questions` lists (the LeetCode sheets).
pub struct QuestionListSheet {
    config: SheetConfig,
}

impl QuestionListSheet {
    pub fn new(config: SheetConfig) -> Self {
        Self { config }
    }
}

impl SheetHandler for QuestionListSheet {
    fn config(&self) -> &SheetConfig {
        &self.config
    }

    fn flatten(&self, raw: &Value) -> Result<Vec<Item>, serde_json::Error> {
        let groups: QuestionGroups = serde_json::from_value(raw.clone())?;
        let items: Vec<Item> = groups
            .sheet_data
            .into_iter()
            .flat_map(|group| group.questions)
            .collect();
        log::info!("total questions in {}: {}", self.config.file_key, items.len());
        Ok(items)
    }
}

/// Top-level `sheetData` is already the candidate list (`must_do_product_gfg`).
pub struct ProductListSheet {
    config: SheetConfig,
}

impl ProductListSheet {
    pub fn new(config: SheetConfig) -> Self {
        Self { config }
    }
}

impl SheetHandler for ProductListSheet {
    fn config(&self) -> &SheetConfig {
        &self.config
    }

    fn flatten(&self, raw: &Value) -> Result<Vec<Item>, serde_json::Error> {
        let list: ProductList = serde_json::from_value(raw.clone())?;
        Ok(list.sheet_data)
    }
}

/// Flat `data` list whose items are identified by `id` alone: command and
/// pattern sheets. The id doubles as the display title, with an optional
/// fixed suffix to make the search query less ambiguous ("ls" vs "ls command").
pub struct FlatDataSheet {
    config: SheetConfig,
    title_suffix: Option<&'static str>,
}

impl FlatDataSheet {
    pub fn new(config: SheetConfig, title_suffix: Option<&'static str>) -> Self {
        Self {
            config,
            title_suffix,
        }
    }
}

impl SheetHandler for FlatDataSheet {
    fn config(&self) -> &SheetConfig {
        &self.config
    }

    fn flatten(&self, raw: &Value) -> Result<Vec<Item>, serde_json::Error> {
        let flat: FlatData = serde_json::from_value(raw.clone())?;
        Ok(flat.data)
    }

    fn title(&self, item: &Item) -> String {
        match self.title_suffix {
            Some(suffix) => format!("{}{suffix}", item.id),
            None => item.id.clone(),
        }
    }
}

/// One randomly chosen page from a directory of pre-fetched company problem
/// lists, filtered to a single difficulty. Items name themselves via `name`.
pub struct CompanyPoolSheet {
    config: SheetConfig,
    pool_dir: &'static str,
    difficulty: Difficulty,
}

impl CompanyPoolSheet {
    pub fn new(
        file_key: &'static str,
        site: &'static str,
        pool_dir: &'static str,
        difficulty: Difficulty,
    ) -> Self {
        Self {
            config: SheetConfig {
                file_key,
                site,
                pool_dir: Some(pool_dir),
                difficulty: Some(difficulty),
            },
            pool_dir,
            difficulty,
        }
    }

    fn list_pool_files(&self, paths: &Paths) -> Result<Vec<PathBuf>, RouletteError> {
        let dir = paths.pool_dir(self.pool_dir);
        let entries = std::fs::read_dir(&dir).map_err(|source| RouletteError::Io {
            path: dir.clone(),
            source,
        })?;
        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        // Directory iteration order is platform-dependent; sort so the only
        // randomness left is the draw itself.
        files.sort();
        Ok(files)
    }
}

impl SheetHandler for CompanyPoolSheet {
    fn config(&self) -> &SheetConfig {
        &self.config
    }

    fn load_dataset(&self, paths: &Paths, rng: &mut dyn RngCore) -> Result<Value, RouletteError> {
        let files = self.list_pool_files(paths)?;
        let Some(file) = files.choose(rng) else {
            return Err(RouletteError::EmptyPool {
                dir: paths.pool_dir(self.pool_dir),
            });
        };
        log::debug!("picked pool file {}", file.display());
        read_json(file)
    }

    fn flatten(&self, raw: &Value) -> Result<Vec<Item>, serde_json::Error> {
        let page: PoolFile = serde_json::from_value(raw.clone())?;
        Ok(page
            .data
            .problem_list
            .into_iter()
            .filter(|item| item.difficulty.as_deref() == Some(self.difficulty.as_str()))
            .collect())
    }

    fn title(&self, item: &Item) -> String {
        item.name
            .clone()
            .unwrap_or_else(|| "Unknown Title".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn sde_handler() -> TopicGroupSheet {
        TopicGroupSheet::new(SheetConfig::basic("sde_sheet", "naukri.com"))
    }

    #[test]
    fn topic_groups_concatenate_in_stored_order() {
        let raw: Value = serde_json::from_str(
            r#"{"sheetData": [
                {"topics": [{"id": "a", "title": "Two Sum"}]},
                {"topics": [{"id": "b", "title": "Add Two Numbers"}, {"id": "c", "title": "LRU Cache"}]}
            ]}"#,
        )
        .unwrap();

        let items = sde_handler().flatten(&raw).unwrap();
        let ids: Vec<&str> = items.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[test]
    fn flatten_is_deterministic() {
        let raw: Value = serde_json::from_str(
            r#"{"sheetData": [
                {"topics": [{"id": "a", "title": "A"}, {"id": "b", "title": "B"}]},
                {"topics": [{"id": "c", "title": "C"}]}
            ]}"#,
        )
        .unwrap();

        let handler = sde_handler();
        assert_eq!(handler.flatten(&raw).unwrap(), handler.flatten(&raw).unwrap());
    }

    #[test]
    fn section_and_question_groups_flatten() {
        let core = SectionDataSheet::new(SheetConfig::basic("os_core_sheet", "geeksforgeeks.org"));
        let raw: Value = serde_json::from_str(
            r#"{"sheetData": [{"data": [{"id": "1", "title": "Paging"}]}, {"data": [{"id": "2", "title": "Deadlock"}]}]}"#,
        )
        .unwrap();
        assert_eq!(core.flatten(&raw).unwrap().len(), 2);

        let lc = QuestionListSheet::new(SheetConfig::basic("lc_sql_50", "leetcode.com"));
        let raw: Value = serde_json::from_str(
            r#"{"sheetData": [{"questions": [{"id": 595, "title": "Big Countries"}]}]}"#,
        )
        .unwrap();
        let items = lc.flatten(&raw).unwrap();
        assert_eq!(items[0].id, "595");
    }

    #[test]
    fn product_list_is_identity() {
        let handler =
            ProductListSheet::new(SheetConfig::basic("must_do_product_gfg", "geeksforgeeks.org"));
        let raw: Value =
            serde_json::from_str(r#"{"sheetData": [{"id": "x", "title": "Subarray Sum"}]}"#)
                .unwrap();
        let items = handler.flatten(&raw).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(handler.title(&items[0]), "Subarray Sum");
    }

    #[test]
    fn flat_data_title_appends_suffix() {
        let docker = FlatDataSheet::new(
            SheetConfig::basic("docker_commands", "docs.docker.com"),
            Some(" command"),
        );
        let raw: Value = serde_json::from_str(r#"{"data": [{"id": "compose"}]}"#).unwrap();
        let items = docker.flatten(&raw).unwrap();
        assert_eq!(docker.title(&items[0]), "compose command");

        let linux = FlatDataSheet::new(
            SheetConfig::basic("linux_commands", "manpages.ubuntu.com"),
            None,
        );
        assert_eq!(linux.title(&items[0]), "compose");
    }

    #[test]
    fn wrong_shape_is_a_flatten_error() {
        let raw: Value = serde_json::from_str(r#"{"data": [{"id": "ls"}]}"#).unwrap();
        assert!(sde_handler().flatten(&raw).is_err());
    }

    #[test]
    fn pool_flatten_keeps_only_configured_difficulty() {
        let handler = CompanyPoolSheet::new(
            "oracle_dsa",
            "leetcode.com",
            "oracle_question_jsons",
            Difficulty::Moderate,
        );
        let raw: Value = serde_json::from_str(
            r#"{"data": {"problem_list": [
                {"id": 1, "name": "Rotate Array", "difficulty": "Easy"},
                {"id": 2, "name": "Word Ladder", "difficulty": "Moderate"},
                {"id": 3, "name": "Median of Streams", "difficulty": "Hard"},
                {"id": 4, "name": "Clone Graph", "difficulty": "Moderate"}
            ]}}"#,
        )
        .unwrap();

        let items = handler.flatten(&raw).unwrap();
        let names: Vec<String> = items.iter().map(|item| handler.title(item)).collect();
        assert_eq!(names, ["Word Ladder", "Clone Graph"]);
    }

    #[test]
    fn pool_load_picks_one_file_and_skips_non_json() {
        let dir = tempfile::tempdir().unwrap();
        let pool = dir.path().join("oracle_question_jsons");
        std::fs::create_dir_all(&pool).unwrap();
        std::fs::write(
            pool.join("page_1.json"),
            r#"{"data": {"problem_list": [{"id": 1, "name": "A", "difficulty": "Moderate"}]}}"#,
        )
        .unwrap();
        std::fs::write(
            pool.join("page_2.json"),
            r#"{"data": {"problem_list": [{"id": 2, "name": "B", "difficulty": "Moderate"}]}}"#,
        )
        .unwrap();
        std::fs::write(pool.join("notes.txt"), "not a page").unwrap();

        let handler = CompanyPoolSheet::new(
            "oracle_dsa",
            "leetcode.com",
            "oracle_question_jsons",
            Difficulty::Moderate,
        );
        let paths = Paths::new(dir.path());
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        let raw = handler.load_dataset(&paths, &mut rng).unwrap();
        let items = handler.flatten(&raw).unwrap();
        // Exactly one page's worth of items, whichever page the draw landed on.
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn empty_pool_is_a_typed_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("oracle_question_jsons")).unwrap();

        let handler = CompanyPoolSheet::new(
            "oracle_dsa",
            "leetcode.com",
            "oracle_question_jsons",
            Difficulty::Moderate,
        );
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let result = handler.load_dataset(&Paths::new(dir.path()), &mut rng);
        assert!(matches!(result, Err(RouletteError::EmptyPool { .. })));
    }

    #[test]
    fn default_title_falls_back_when_missing() {
        let handler = sde_handler();
        let item: Item = serde_json::from_str(r#"{"id": "a"}"#).unwrap();
        assert_eq!(handler.title(&item), "Unknown Title");
    }
}
