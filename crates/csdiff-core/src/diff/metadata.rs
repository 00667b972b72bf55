/// Document-level metadata comparison.
///
/// [`diff_metadata`] walks the fixed item list in [`MetadataItem::ALL`] and
/// produces one [`MetadataComparison`] per item, in that order. Scalar items
/// follow [`compare_scalar`]; list items go through [`keyed_list_diff`] with
/// the keys and values below.
///
/// | item            | key                         | value                  |
/// |-----------------|-----------------------------|------------------------|
/// | `Identifiers`   | use and system              | identifier value       |
/// | `Contacts`      | name (empty when absent)    | rendered contact       |
/// | `UseContexts`   | rendered context code       | rendered context value |
/// | `Jurisdictions` | text (`null` when absent)   | rendered codings       |
use std::collections::BTreeSet;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use super::compare::{ComparisonResult, Explanation, ScalarComparison, compare_scalar};
use super::keyed::{KeyedListDiffResult, keyed_list_diff};
use crate::document::CodeSystem;
use crate::render;

/// One comparable metadata item of a CodeSystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataItem {
    Id,
    Url,
    Version,
    Name,
    Title,
    Status,
    Experimental,
    Date,
    Publisher,
    Description,
    Identifiers,
    Contacts,
    UseContexts,
    Jurisdictions,
}

impl MetadataItem {
    /// Every item, in comparison order.
    pub const ALL: [MetadataItem; 14] = [
        MetadataItem::Id,
        MetadataItem::Url,
        MetadataItem::Version,
        MetadataItem::Name,
        MetadataItem::Title,
        MetadataItem::Status,
        MetadataItem::Experimental,
        MetadataItem::Date,
        MetadataItem::Publisher,
        MetadataItem::Description,
        MetadataItem::Identifiers,
        MetadataItem::Contacts,
        MetadataItem::UseContexts,
        MetadataItem::Jurisdictions,
    ];

    /// Returns the `snake_case` name of the item.
    pub fn as_str(self) -> &'static str {
        match self {
            MetadataItem::Id => "id",
            MetadataItem::Url => "url",
            MetadataItem::Version => "version",
            MetadataItem::Name => "name",
            MetadataItem::Title => "title",
            MetadataItem::Status => "status",
            MetadataItem::Experimental => "experimental",
            MetadataItem::Date => "date",
            MetadataItem::Publisher => "publisher",
            MetadataItem::Description => "description",
            MetadataItem::Identifiers => "identifiers",
            MetadataItem::Contacts => "contacts",
            MetadataItem::UseContexts => "use_contexts",
            MetadataItem::Jurisdictions => "jurisdictions",
        }
    }

    /// Returns `true` for items compared as keyed lists.
    pub fn is_list(self) -> bool {
        match self {
            MetadataItem::Identifiers
            | MetadataItem::Contacts
            | MetadataItem::UseContexts
            | MetadataItem::Jurisdictions => true,
            MetadataItem::Id
            | MetadataItem::Url
            | MetadataItem::Version
            | MetadataItem::Name
            | MetadataItem::Title
            | MetadataItem::Status
            | MetadataItem::Experimental
            | MetadataItem::Date
            | MetadataItem::Publisher
            | MetadataItem::Description => false,
        }
    }

    /// Items that routinely change between versions.
    pub fn default_expected_differences() -> BTreeSet<MetadataItem> {
        BTreeSet::from([MetadataItem::Id, MetadataItem::Version])
    }

    fn scalar(self, cs: &CodeSystem) -> Option<String> {
        match self {
            MetadataItem::Id => cs.id.clone(),
            MetadataItem::Url => cs.url.clone(),
            MetadataItem::Version => cs.version.clone(),
            MetadataItem::Name => cs.name.clone(),
            MetadataItem::Title => cs.title.clone(),
            MetadataItem::Status => cs.status.clone(),
            MetadataItem::Experimental => cs.experimental.map(|b| b.to_string()),
            MetadataItem::Date => cs.date.clone(),
            MetadataItem::Publisher => cs.publisher.clone(),
            MetadataItem::Description => cs.description.clone(),
            MetadataItem::Identifiers
            | MetadataItem::Contacts
            | MetadataItem::UseContexts
            | MetadataItem::Jurisdictions => None,
        }
    }
}

impl std::fmt::Display for MetadataItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unrecognised [`MetadataItem`] name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown metadata item {0:?}")]
pub struct UnknownMetadataItem(pub String);

impl FromStr for MetadataItem {
    type Err = UnknownMetadataItem;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetadataItem::ALL
            .into_iter()
            .find(|item| item.as_str() == s)
            .ok_or_else(|| UnknownMetadataItem(s.to_owned()))
    }
}

/// Item-specific detail behind a [`MetadataComparison`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "entries", rename_all = "snake_case")]
pub enum MetadataDetail {
    Scalar(ScalarComparison),
    /// Per-key results, keys rendered as strings.
    List(Vec<KeyedListDiffResult<String, String>>),
}

/// Comparison of one [`MetadataItem`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetadataComparison {
    pub item: MetadataItem,
    pub result: ComparisonResult,
    pub explanation: Option<Explanation>,
    /// Presentation hint: this item is expected to differ between versions.
    /// Never affects `result`.
    pub expect_differences: bool,
    pub detail: MetadataDetail,
}

impl MetadataComparison {
    pub fn is_identical(&self) -> bool {
        self.result.is_identical()
    }
}

/// Compares the metadata of two documents.
///
/// Returns one entry per [`MetadataItem::ALL`] item, in that order. Items in
/// `expected` are flagged with `expect_differences`.
pub fn diff_metadata(
    left: &CodeSystem,
    right: &CodeSystem,
    expected: &BTreeSet<MetadataItem>,
) -> Vec<MetadataComparison> {
    MetadataItem::ALL
        .into_iter()
        .map(|item| {
            let detail = if item.is_list() {
                MetadataDetail::List(list_detail(item, left, right))
            } else {
                let l = item.scalar(left);
                let r = item.scalar(right);
                MetadataDetail::Scalar(compare_scalar(l.as_deref(), r.as_deref()))
            };
            let (result, explanation) = classify(&detail);
            MetadataComparison {
                item,
                result,
                explanation,
                expect_differences: expected.contains(&item),
                detail,
            }
        })
        .collect()
}

fn classify(detail: &MetadataDetail) -> (ComparisonResult, Option<Explanation>) {
    match detail {
        MetadataDetail::Scalar(c) => (c.result, c.explanation.clone()),
        MetadataDetail::List(entries) => {
            let keys: Vec<String> = entries
                .iter()
                .filter(|e| !e.is_identical())
                .map(|e| e.key.clone())
                .collect();
            if keys.is_empty() {
                (ComparisonResult::Identical, None)
            } else {
                (
                    ComparisonResult::Different,
                    Some(Explanation::NonIdenticalKeys(keys)),
                )
            }
        }
    }
}

fn list_detail(
    item: MetadataItem,
    left: &CodeSystem,
    right: &CodeSystem,
) -> Vec<KeyedListDiffResult<String, String>> {
    match item {
        MetadataItem::Identifiers => keyed_list_diff(
            &left.identifier,
            &right.identifier,
            |id| (id.use_code.clone(), id.system.clone()),
            |id| id.value.clone().unwrap_or_else(|| render::NULL.to_owned()),
        )
        .into_iter()
        .map(|r| r.map_key(|(use_code, system)| identifier_key(use_code, system)))
        .collect(),
        MetadataItem::Contacts => keyed_list_diff(
            &left.contact,
            &right.contact,
            |c| c.name.clone().unwrap_or_default(),
            render::contact,
        ),
        MetadataItem::UseContexts => keyed_list_diff(
            &left.use_context,
            &right.use_context,
            |ctx| render::coding(&ctx.code),
            |ctx| render::usage_context_value(ctx).unwrap_or_else(|| render::NULL.to_owned()),
        ),
        MetadataItem::Jurisdictions => keyed_list_diff(
            &left.jurisdiction,
            &right.jurisdiction,
            |cc| cc.text.clone().unwrap_or_else(|| render::NULL.to_owned()),
            |cc| render::coding_list(&cc.coding),
        ),
        MetadataItem::Id
        | MetadataItem::Url
        | MetadataItem::Version
        | MetadataItem::Name
        | MetadataItem::Title
        | MetadataItem::Status
        | MetadataItem::Experimental
        | MetadataItem::Date
        | MetadataItem::Publisher
        | MetadataItem::Description => Vec::new(),
    }
}

/// `[use] (system)` with `null` for either absent part.
fn identifier_key(use_code: Option<String>, system: Option<String>) -> String {
    format!(
        "[{}] ({})",
        use_code.as_deref().unwrap_or(render::NULL),
        system.as_deref().unwrap_or(render::NULL)
    )
}
