//! Sheet-type dispatch.
//!
//! Every known sheet is one variant of [`SheetKind`]; the token-to-handler
//! mapping is an exhaustive match, so adding a sheet without wiring up its
//! handler is a compile error rather than a runtime surprise.

use crate::errors::RouletteError;
use crate::item::Difficulty;
use crate::sheets::{
    CompanyPoolSheet, FlatDataSheet, ProductListSheet, QuestionListSheet, SectionDataSheet,
    SheetConfig, SheetHandler, TopicGroupSheet,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SheetKind {
    Sde,
    DbmsCore,
    OsCore,
    CnCore,
    LcSql50,
    MustDoProductGfg,
    LcDsa75,
    MicrosoftDsa,
    PhonepeDsa,
    OracleDsa,
    LinuxCommands,
    DockerCommands,
    Langgraph,
    DsaCommonPatterns,
}

impl SheetKind {
    /// All sheets, in the order they are presented for numeric selection.
    pub const ALL: [SheetKind; 14] = [
        SheetKind::Sde,
        SheetKind::DbmsCore,
        SheetKind::OsCore,
        SheetKind::CnCore,
        SheetKind::LcSql50,
        SheetKind::MustDoProductGfg,
        SheetKind::LcDsa75,
        SheetKind::MicrosoftDsa,
        SheetKind::PhonepeDsa,
        SheetKind::OracleDsa,
        SheetKind::LinuxCommands,
        SheetKind::DockerCommands,
        SheetKind::Langgraph,
        SheetKind::DsaCommonPatterns,
    ];

    pub fn token(self) -> &'static str {
        match self {
            SheetKind::Sde => "sde_sheet",
            SheetKind::DbmsCore => "dbms_core_sheet",
            SheetKind::OsCore => "os_core_sheet",
            SheetKind::CnCore => "cn_core_sheet",
            SheetKind::LcSql50 => "lc_sql_50",
            SheetKind::MustDoProductGfg => "must_do_product_gfg",
            SheetKind::LcDsa75 => "lc_dsa_75",
            SheetKind::MicrosoftDsa => "microsoft_dsa",
            SheetKind::PhonepeDsa => "phonepe_dsa",
            SheetKind::OracleDsa => "oracle_dsa",
            SheetKind::LinuxCommands => "linux_commands",
            SheetKind::DockerCommands => "docker_commands",
            SheetKind::Langgraph => "langgraph",
            SheetKind::DsaCommonPatterns => "dsa_common_patterns",
        }
    }

    /// Exact token lookup. No partial matches, no fallback.
    pub fn from_token(token: &str) -> Result<Self, RouletteError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.token() == token)
            .ok_or_else(|| RouletteError::UnknownSheetType(token.to_string()))
    }

    /// Build the handler bound to this sheet's fixed configuration.
    pub fn handler(self) -> Box<dyn SheetHandler> {
        match self {
            SheetKind::Sde => Box::new(TopicGroupSheet::new(SheetConfig::basic(
                "sde_sheet",
                "naukri.com",
            ))),
            SheetKind::DbmsCore => Box::new(SectionDataSheet::new(SheetConfig::basic(
                "dbms_core_sheet",
                "geeksforgeeks.org",
            ))),
            SheetKind::OsCore => Box::new(SectionDataSheet::new(SheetConfig::basic(
                "os_core_sheet",
                "geeksforgeeks.org",
            ))),
            SheetKind::CnCore => Box::new(SectionDataSheet::new(SheetConfig::basic(
                "cn_core_sheet",
                "geeksforgeeks.org",
            ))),
            SheetKind::LcSql50 => Box::new(QuestionListSheet::new(SheetConfig::basic(
                "lc_sql_50",
                "leetcode.com",
            ))),
            SheetKind::MustDoProductGfg => Box::new(ProductListSheet::new(SheetConfig::basic(
                "must_do_product_gfg",
                "geeksforgeeks.org",
            ))),
            SheetKind::LcDsa75 => Box::new(QuestionListSheet::new(SheetConfig::basic(
                "lc_dsa_75",
                "leetcode.com",
            ))),
            SheetKind::MicrosoftDsa => Box::new(CompanyPoolSheet::new(
                "microsoft_dsa",
                "naukri.com",
                "microsoft_question_jsons",
                Difficulty::Moderate,
            )),
            SheetKind::PhonepeDsa => Box::new(CompanyPoolSheet::new(
                "phonepe_dsa",
                "naukri.com",
                "phonepe_question_jsons",
                Difficulty::Moderate,
            )),
            SheetKind::OracleDsa => Box::new(CompanyPoolSheet::new(
                "oracle_dsa",
                "leetcode.com",
                "oracle_question_jsons",
                Difficulty::Moderate,
            )),
            SheetKind::LinuxCommands => Box::new(FlatDataSheet::new(
                SheetConfig::basic("linux_commands", "manpages.ubuntu.com"),
                None,
            )),
            SheetKind::DockerCommands => Box::new(FlatDataSheet::new(
                SheetConfig::basic("docker_commands", "docs.docker.com"),
                Some(" command"),
            )),
            SheetKind::Langgraph => Box::new(FlatDataSheet::new(
                SheetConfig::basic("langgraph", "langchain.com"),
                Some(" langgraph"),
            )),
            SheetKind::DsaCommonPatterns => Box::new(FlatDataSheet::new(
                SheetConfig::basic("dsa_common_patterns", "naukri.com"),
                None,
            )),
        }
    }
}

impl std::fmt::Display for SheetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

/// Resolve free-text user input against the known sheet list.
///
/// Empty input or `"random"` selects everything, a number selects by index,
/// anything else is a case-insensitive substring filter over the tokens.
pub fn resolve_selection(input: &str, kinds: &[SheetKind]) -> Result<Vec<SheetKind>, RouletteError> {
    let input = input.trim();
    if input.is_empty() || input.eq_ignore_ascii_case("random") {
        return Ok(kinds.to_vec());
    }

    if input.chars().all(|c| c.is_ascii_digit()) {
        let index: usize = input
            .parse()
            .map_err(|_| RouletteError::InvalidSelection(format!("unparseable index '{input}'")))?;
        return match kinds.get(index) {
            Some(kind) => Ok(vec![*kind]),
            None => Err(RouletteError::InvalidSelection(format!(
                "index {index} out of range, expected 0..{}",
                kinds.len()
            ))),
        };
    }

    let needle = input.to_ascii_lowercase();
    let matches: Vec<SheetKind> = kinds
        .iter()
        .copied()
        .filter(|kind| kind.token().contains(&needle))
        .collect();
    if matches.is_empty() {
        return Err(RouletteError::InvalidSelection(format!(
            "no sheet type contains '{input}'"
        )));
    }
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_token_round_trips_through_the_factory() {
        for kind in SheetKind::ALL {
            assert_eq!(SheetKind::from_token(kind.token()).unwrap(), kind);
            let handler = kind.handler();
            assert_eq!(handler.config().file_key, kind.token());
            assert!(!handler.config().site.is_empty());
        }
    }

    #[test]
    fn unknown_token_is_rejected() {
        let result = SheetKind::from_token("sde");
        assert!(matches!(result, Err(RouletteError::UnknownSheetType(t)) if t == "sde"));
    }

    #[test]
    fn pool_sheets_carry_pool_config() {
        let handler = SheetKind::OracleDsa.handler();
        let config = handler.config();
        assert_eq!(config.pool_dir, Some("oracle_question_jsons"));
        assert_eq!(config.difficulty, Some(Difficulty::Moderate));
    }

    #[test]
    fn numeric_selection_is_index_based() {
        let kinds = resolve_selection("2", &SheetKind::ALL).unwrap();
        assert_eq!(kinds, vec![SheetKind::OsCore]);
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let result = resolve_selection("99", &SheetKind::ALL);
        assert!(matches!(result, Err(RouletteError::InvalidSelection(_))));
    }

    #[test]
    fn substring_selection_matches_all_containing_tokens() {
        let kinds = resolve_selection("core", &SheetKind::ALL).unwrap();
        assert_eq!(
            kinds,
            vec![SheetKind::DbmsCore, SheetKind::OsCore, SheetKind::CnCore]
        );
    }

    #[test]
    fn substring_selection_is_case_insensitive() {
        let kinds = resolve_selection("CORE", &SheetKind::ALL).unwrap();
        assert_eq!(kinds.len(), 3);
    }

    #[test]
    fn zero_match_substring_is_rejected() {
        let result = resolve_selection("zzz", &SheetKind::ALL);
        assert!(matches!(result, Err(RouletteError::InvalidSelection(_))));
    }

    #[test]
    fn empty_and_random_select_everything() {
        assert_eq!(resolve_selection("", &SheetKind::ALL).unwrap().len(), 14);
        assert_eq!(
            resolve_selection("random", &SheetKind::ALL).unwrap().len(),
            14
        );
        assert_eq!(
            resolve_selection("  Random ", &SheetKind::ALL).unwrap().len(),
            14
        );
    }
}
