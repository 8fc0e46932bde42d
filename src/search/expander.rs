//! Job title expansion through a synonym table.

use crate::models::JobTitle;
use std::collections::HashMap;

/// Built-in synonym table. Synonym order is search order.
pub const DEFAULT_SYNONYMS: &[(&str, &[&str])] = &[
    (
        "software engineer",
        &[
            "developer",
            "software developer",
            "programmer",
            "full stack developer",
            "backend engineer",
            "frontend developer",
        ],
    ),
    (
        "data scientist",
        &[
            "machine learning engineer",
            "data analyst",
            "AI engineer",
            "big data engineer",
            "statistical analyst",
        ],
    ),
    (
        "product manager",
        &["product owner", "business analyst", "program manager", "product strategist"],
    ),
    (
        "marketing specialist",
        &["digital marketer", "SEO specialist", "content marketer", "growth hacker"],
    ),
    (
        "cybersecurity analyst",
        &[
            "security engineer",
            "information security analyst",
            "penetration tester",
            "ethical hacker",
        ],
    ),
    (
        "financial analyst",
        &["investment analyst", "portfolio analyst", "risk analyst", "economic analyst"],
    ),
    (
        "sales representative",
        &["business development representative", "account executive", "sales manager"],
    ),
    (
        "human resources",
        &["HR specialist", "talent acquisition", "recruiter", "HR manager"],
    ),
    (
        "network engineer",
        &["IT administrator", "systems engineer", "cloud engineer", "infrastructure engineer"],
    ),
    (
        "mechanical engineer",
        &[
            "manufacturing engineer",
            "aerospace engineer",
            "civil engineer",
            "industrial engineer",
        ],
    ),
];

/// Maps a canonical title to the related titles searched alongside it.
///
/// Keys and synonyms are normalized on insertion, so lookups are
/// case-insensitive. Entries without usable synonyms are skipped.
#[derive(Debug, Clone, Default)]
pub struct SynonymTable {
    entries: HashMap<JobTitle, Vec<JobTitle>>,
}

impl SynonymTable {
    pub fn new<K, S, I>(entries: I) -> Self
    where
        K: AsRef<str>,
        S: AsRef<str>,
        I: IntoIterator<Item = (K, Vec<S>)>,
    {
        let mut table = HashMap::new();

        for (key, synonyms) in entries {
            let Some(key) = JobTitle::parse(key.as_ref()) else {
                continue;
            };
            let synonyms: Vec<JobTitle> = synonyms
                .iter()
                .filter_map(|s| JobTitle::parse(s.as_ref()))
                .collect();
            if !synonyms.is_empty() {
                table.insert(key, synonyms);
            }
        }

        Self { entries: table }
    }

    pub fn get(&self, title: &JobTitle) -> Option<&[JobTitle]> {
        self.entries.get(title).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Expands a title into the ordered list of titles to search.
#[derive(Debug, Clone)]
pub struct TitleExpander {
    table: SynonymTable,
}

impl TitleExpander {
    pub fn new(table: SynonymTable) -> Self {
        Self { table }
    }

    /// The title itself first, followed by its synonyms in table order.
    pub fn expand(&self, title: &JobTitle) -> Vec<JobTitle> {
        let mut titles = vec![title.clone()];
        if let Some(synonyms) = self.table.get(title) {
            titles.extend(synonyms.iter().cloned());
        }
        titles
    }

    pub fn table(&self) -> &SynonymTable {
        &self.table
    }
}

impl Default for TitleExpander {
    fn default() -> Self {
        let table = SynonymTable::new(
            DEFAULT_SYNONYMS
                .iter()
                .map(|(key, synonyms)| (*key, synonyms.to_vec())),
        );
        Self::new(table)
    }
}
