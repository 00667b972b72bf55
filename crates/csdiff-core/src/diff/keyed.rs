use std::collections::BTreeMap;

use serde::Serialize;

/// Classification of one key in a keyed-list comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyedListDiffKind {
    KeyOnlyInLeft,
    KeyOnlyInRight,
    ValueDifferent,
    Identical,
}

/// Comparison outcome for one key.
///
/// `left` and `right` hold the sorted values found under the key on each
/// side, or `None` when the key is absent from that side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyedListDiffResult<K, V> {
    pub kind: KeyedListDiffKind,
    pub key: K,
    pub left: Option<Vec<V>>,
    pub right: Option<Vec<V>>,
}

impl<K, V> KeyedListDiffResult<K, V> {
    /// Returns `true` if both sides hold the same values under this key.
    pub fn is_identical(&self) -> bool {
        self.kind == KeyedListDiffKind::Identical
    }

    /// Replaces the key, keeping kind and values.
    pub fn map_key<K2>(self, f: impl FnOnce(K) -> K2) -> KeyedListDiffResult<K2, V> {
        KeyedListDiffResult {
            kind: self.kind,
            key: f(self.key),
            left: self.left,
            right: self.right,
        }
    }
}

/// Compares two lists matched by a derived key.
///
/// Emits exactly one result per key in the union of both key sets, in
/// ascending key order. Values under a key are compared as multisets: order
/// within a side does not matter, multiplicity does.
pub fn keyed_list_diff<T, K, V>(
    left: &[T],
    right: &[T],
    key: impl Fn(&T) -> K,
    value: impl Fn(&T) -> V,
) -> Vec<KeyedListDiffResult<K, V>>
where
    K: Ord,
    V: Ord,
{
    let mut groups: BTreeMap<K, (Vec<V>, Vec<V>)> = BTreeMap::new();
    for item in left {
        groups.entry(key(item)).or_default().0.push(value(item));
    }
    for item in right {
        groups.entry(key(item)).or_default().1.push(value(item));
    }

    groups
        .into_iter()
        .map(|(key, (mut l, mut r))| {
            l.sort();
            r.sort();
            let (kind, left, right) = match (l.is_empty(), r.is_empty()) {
                (false, true) => (KeyedListDiffKind::KeyOnlyInLeft, Some(l), None),
                (true, false) => (KeyedListDiffKind::KeyOnlyInRight, None, Some(r)),
                _ if l == r => (KeyedListDiffKind::Identical, Some(l), Some(r)),
                _ => (KeyedListDiffKind::ValueDifferent, Some(l), Some(r)),
            };
            KeyedListDiffResult {
                kind,
                key,
                left,
                right,
            }
        })
        .collect()
}
