use serde::Serialize;

/// Whether two compared values are the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonResult {
    Identical,
    Different,
}

impl ComparisonResult {
    /// Returns `true` for [`ComparisonResult::Identical`].
    pub fn is_identical(self) -> bool {
        self == ComparisonResult::Identical
    }
}

/// Why a comparison came out the way it did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "keys", rename_all = "snake_case")]
pub enum Explanation {
    /// Neither side has a value.
    BothAbsent,
    /// Exactly one side has a value.
    OneAbsent,
    /// Both sides have values and they differ.
    ValueDifferent,
    /// The rendered keys of a keyed list whose entries are not identical.
    NonIdenticalKeys(Vec<String>),
}

/// Outcome of comparing one optional value on each side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScalarComparison {
    pub result: ComparisonResult,
    pub explanation: Option<Explanation>,
    pub left: Option<String>,
    pub right: Option<String>,
}

impl ScalarComparison {
    pub fn is_identical(&self) -> bool {
        self.result.is_identical()
    }
}

/// Compares two optional values literally.
///
/// | left    | right   | result    | explanation      |
/// |---------|---------|-----------|------------------|
/// | absent  | absent  | identical | `BothAbsent`     |
/// | absent  | present | different | `OneAbsent`      |
/// | present | absent  | different | `OneAbsent`      |
/// | `a`     | `b`     | different | `ValueDifferent` |
/// | `a`     | `a`     | identical | none             |
pub fn compare_scalar(left: Option<&str>, right: Option<&str>) -> ScalarComparison {
    let (result, explanation) = match (left, right) {
        (None, None) => (ComparisonResult::Identical, Some(Explanation::BothAbsent)),
        (None, Some(_)) | (Some(_), None) => {
            (ComparisonResult::Different, Some(Explanation::OneAbsent))
        }
        (Some(l), Some(r)) if l != r => {
            (ComparisonResult::Different, Some(Explanation::ValueDifferent))
        }
        (Some(_), Some(_)) => (ComparisonResult::Identical, None),
    };
    ScalarComparison {
        result,
        explanation,
        left: left.map(str::to_owned),
        right: right.map(str::to_owned),
    }
}
