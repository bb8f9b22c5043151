use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The sparse set of month-start overrides deviating from the baseline table,
/// keyed by month offset.
///
/// The store itself performs no validation: whether a value is legal is
/// entirely decided by the cascade logic before it is committed here. As long
/// as mutations only come from committed cascades, ordering entries by value
/// is identical to ordering them by offset, which makes the serialized
/// snapshot deterministic.
///
/// ```
/// use hijri_adjust::AdjustmentStore;
///
/// let mut store = AdjustmentStore::new();
/// store.set(101, 1058);
/// store.set(100, 1029);
///
/// assert_eq!(store.get(101), Some(1058));
/// assert_eq!(store.entries(), [(100, 1029), (101, 1058)]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AdjustmentStore {
    entries: BTreeMap<i64, i64>,
}

impl AdjustmentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the override for a month offset, if any.
    pub fn get(&self, offset: i64) -> Option<i64> {
        self.entries.get(&offset).copied()
    }

    /// Check if a month offset carries an override.
    pub fn contains(&self, offset: i64) -> bool {
        self.entries.contains_key(&offset)
    }

    /// Insert or replace the override for a month offset.
    pub fn set(&mut self, offset: i64, value: i64) {
        self.entries.insert(offset, value);
    }

    /// Remove the override for a month offset, returning the removed value.
    pub fn remove(&mut self, offset: i64) -> Option<i64> {
        self.entries.remove(&offset)
    }

    /// Number of overridden months.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no month is overridden.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(offset, value)` pairs in offset order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        self.entries.iter().map(|(&offset, &value)| (offset, value))
    }

    /// Collect `(offset, value)` pairs sorted by value.
    ///
    /// The global 29/30 invariant keeps this identical to offset order, and
    /// that agreement is asserted rather than assumed.
    pub fn entries(&self) -> Vec<(i64, i64)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by_key(|&(_, value)| value);

        debug_assert!(
            entries.windows(2).all(|pair| pair[0].0 < pair[1].0),
            "value order diverged from offset order",
        );

        entries
    }

    /// Encode the store as a compact JSON snapshot, entries sorted by value.
    ///
    /// ```
    /// use hijri_adjust::AdjustmentStore;
    ///
    /// let mut store = AdjustmentStore::new();
    /// store.set(101, 1058);
    /// store.set(102, 1087);
    ///
    /// assert_eq!(store.to_snapshot(), r#"{"101":1058,"102":1087}"#);
    /// ```
    pub fn to_snapshot(&self) -> String {
        serde_json::to_string(self).expect("adjustment snapshot cannot fail to encode")
    }

    /// Decode a store from a JSON snapshot. Non-integer values, non-numeric
    /// keys and duplicate keys are decode errors, never silently coerced.
    ///
    /// ```
    /// use hijri_adjust::AdjustmentStore;
    ///
    /// let store = AdjustmentStore::from_snapshot(r#"{"101":1058}"#).unwrap();
    /// assert_eq!(store.get(101), Some(1058));
    ///
    /// assert!(AdjustmentStore::from_snapshot(r#"{"101":"soon"}"#).is_err());
    /// assert!(AdjustmentStore::from_snapshot(r#"{"x":1058}"#).is_err());
    /// ```
    pub fn from_snapshot(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

impl Serialize for AdjustmentStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let entries = self.entries();
        let mut map = serializer.serialize_map(Some(entries.len()))?;

        for (offset, value) in entries {
            map.serialize_entry(&offset.to_string(), &value)?;
        }

        map.end()
    }
}

impl<'de> Deserialize<'de> for AdjustmentStore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct StoreVisitor;

        impl<'de> Visitor<'de> for StoreVisitor {
            type Value = AdjustmentStore;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "a map from month offsets to day-counts")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = BTreeMap::new();

                while let Some((key, value)) = access.next_entry::<String, i64>()? {
                    let offset: i64 = key
                        .parse()
                        .map_err(|_| de::Error::custom(format!("invalid month offset `{key}`")))?;

                    if entries.insert(offset, value).is_some() {
                        return Err(de::Error::custom(format!("duplicate month offset `{key}`")));
                    }
                }

                Ok(AdjustmentStore { entries })
            }
        }

        deserializer.deserialize_map(StoreVisitor)
    }
}
