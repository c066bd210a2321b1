//! Static category tables used by the frequency features.
//!
//! Each table is an ordered list of groups; every group maps a set of surface
//! forms (words or Penn Treebank tags) onto one output slot. Group order is the
//! output vector order and never changes at runtime.

use ahash::AHashMap;
use once_cell::sync::Lazy;

/// An ordered list of synonym groups, one output slot per group.
#[derive(Debug)]
pub struct CategoryTable {
    name: &'static str,
    groups: &'static [&'static [&'static str]],
    index: Lazy<AHashMap<&'static str, usize>, fn() -> AHashMap<&'static str, usize>>,
}

impl CategoryTable {
    /// Table name, for logging
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of output slots
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// True when the table has no groups
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// The synonym groups, in output order
    pub fn groups(&self) -> &'static [&'static [&'static str]] {
        self.groups
    }

    /// Slot index for a surface form, if it belongs to any group.
    pub fn category_of(&self, form: &str) -> Option<usize> {
        self.index.get(form).copied()
    }

    /// Per-slot frequencies: matches of each group divided by `total`.
    ///
    /// Always returns `len()` values; a zero `total` yields all zeros.
    pub fn frequencies<'a, I>(&self, forms: I, total: usize) -> Vec<f64>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut counts = vec![0usize; self.len()];
        if total == 0 {
            return vec![0.0; self.len()];
        }

        for form in forms {
            if let Some(slot) = self.category_of(form) {
                counts[slot] += 1;
            }
        }

        counts
            .into_iter()
            .map(|count| count as f64 / total as f64)
            .collect()
    }
}

fn build_index(groups: &'static [&'static [&'static str]]) -> AHashMap<&'static str, usize> {
    let mut index = AHashMap::new();
    for (slot, group) in groups.iter().enumerate() {
        for form in group.iter() {
            index.entry(*form).or_insert(slot);
        }
    }
    index
}

const FUNCTION_WORD_GROUPS: &[&[&str]] = &[
    &["the"],
    &["and"],
    &["to"],
    &["a", "an"],
    &["of"],
    &["in"],
    &["that", "those"],
    &["it"],
    &["not"],
    &["as"],
    &["with"],
    &["but"],
    &["for"],
    &["at"],
    &["this", "these"],
    &["so"],
    &["all"],
    &["on"],
    &["from"],
    &["one", "ones"],
    &["up"],
    &["no"],
    &["out"],
    &["what"],
    &["then"],
    &["if"],
    &["there"],
    &["by"],
    &["who"],
    &["when"],
    &["into"],
    &["now"],
    &["down"],
    &["over"],
    &["back"],
    &["or"],
    &["well"],
    &["which"],
    &["how"],
    &["here"],
    &["just"],
    &["very"],
    &["where"],
    &["before"],
    &["upon"],
    &["about"],
    &["after"],
    &["more"],
    &["why"],
    &["some"],
];

const TREEBANK_TAG_GROUPS: &[&[&str]] = &[
    &["CC"],
    &["CD"],
    &["DT"],
    &["EX"],
    &["FW"],
    &["IN"],
    &["JJ", "JJR", "JJS"],
    &["LS"],
    &["MD"],
    &["NN", "NNS", "NNP", "NNPS"],
    &["PDT"],
    &["POS"],
    &["PRP", "PRP$"],
    &["RB", "RBR", "RBS"],
    &["RP"],
    &["SYM"],
    &["TO"],
    &["UH"],
    &["VB", "VBD", "VBG", "VBN", "VBP", "VBZ"],
    &["WDT", "WP", "WP$", "WRB"],
];

/// The 50 most common English function words, with their close variants.
pub static FUNCTION_WORDS: CategoryTable = CategoryTable {
    name: "function_words",
    groups: FUNCTION_WORD_GROUPS,
    index: Lazy::new(|| build_index(FUNCTION_WORD_GROUPS)),
};

/// Penn Treebank fine-grained tags collapsed into 20 coarse categories.
pub static TREEBANK_TAGS: CategoryTable = CategoryTable {
    name: "treebank_tags",
    groups: TREEBANK_TAG_GROUPS,
    index: Lazy::new(|| build_index(TREEBANK_TAG_GROUPS)),
};
