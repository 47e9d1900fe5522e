//! Optional metadata properties attached to result-set column descriptors.
//!
//! Most column sets carry none of these properties, so instead of widening
//! every descriptor with rarely used fields they live in a small
//! [`MetadataPropertyCollection`]. Absent properties read as shared empty
//! instances; callers never see an `Option`.
//!
//! ## Two-tier indexing
//!
//! The property wrappers are lenient: probing an ordinal past the end of the
//! backing storage yields `false` (or [`ColumnOrder::UNSPECIFIED`]) because
//! result-metadata code probes ordinals speculatively. The underlying
//! [`CompactBitArray`] stays strict.
//!
//! ## Example
//!
//! ```rust
//! use mssql_types::{CompactBitArray, DefaultFieldsProperty, MetadataPropertyCollection};
//!
//! let mut defaults = CompactBitArray::new(3);
//! defaults.set(1, true)?;
//!
//! let mut properties = MetadataPropertyCollection::new();
//! properties.set_default_fields(Some(DefaultFieldsProperty::new(defaults)))?;
//! let properties = properties.freeze();
//!
//! assert!(properties.default_fields().get(1));
//! assert!(!properties.default_fields().get(7));
//! # Ok::<(), mssql_types::TypeError>(())
//! ```

use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::bit_array::CompactBitArray;
use crate::error::TypeError;

static EMPTY_DEFAULT_FIELDS: Lazy<DefaultFieldsProperty> = Lazy::new(DefaultFieldsProperty::empty);
static EMPTY_UNIQUE_KEY: Lazy<UniqueKeyProperty> = Lazy::new(UniqueKeyProperty::empty);
static EMPTY_SORT_ORDER: Lazy<SortOrderProperty> = Lazy::new(SortOrderProperty::empty);
static EMPTY_COLLECTION: Lazy<MetadataPropertyCollection> = Lazy::new(|| {
    let mut collection = MetadataPropertyCollection::new();
    collection.set_read_only();
    collection
});

/// Sort direction of a column within an ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortOrder {
    /// No ordering known.
    #[default]
    Unspecified,
    /// Ascending order.
    Ascending,
    /// Descending order.
    Descending,
}

/// One entry of a sort-order property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnOrder {
    /// Ordinal of the column being sorted, or -1 for the sentinel.
    pub sort_ordinal: i32,
    /// Direction of the sort.
    pub order: SortOrder,
}

impl ColumnOrder {
    /// Value returned when a sort-order property is probed out of range.
    pub const UNSPECIFIED: Self = Self {
        sort_ordinal: -1,
        order: SortOrder::Unspecified,
    };

    /// Create a column order entry.
    #[must_use]
    pub const fn new(sort_ordinal: i32, order: SortOrder) -> Self {
        Self {
            sort_ordinal,
            order,
        }
    }
}

impl Default for ColumnOrder {
    fn default() -> Self {
        Self::UNSPECIFIED
    }
}

/// Per-column flag storage shared by the bit-array backed properties.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ColumnFlags(Option<CompactBitArray>);

impl ColumnFlags {
    fn get(&self, ordinal: usize) -> bool {
        match &self.0 {
            Some(bits) if ordinal < bits.len() => bits.get(ordinal).unwrap_or(false),
            _ => false,
        }
    }

    fn len(&self) -> usize {
        self.0.as_ref().map_or(0, CompactBitArray::len)
    }

    fn check_count(&self, property: &str, expected: usize) {
        let actual = self.len();
        debug_assert!(
            actual == 0 || actual == expected,
            "{property}: property size ({actual}) not equal to checked size ({expected})"
        );
    }
}

/// Which columns of a result set carry a server-side default value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DefaultFieldsProperty {
    defaults: ColumnFlags,
}

impl DefaultFieldsProperty {
    /// Wrap a bit array indexed by column ordinal.
    #[must_use]
    pub fn new(defaults: CompactBitArray) -> Self {
        Self {
            defaults: ColumnFlags(Some(defaults)),
        }
    }

    /// A property with no backing storage; every ordinal reads `false`.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether column `ordinal` uses its default value.
    ///
    /// Returns `false` for ordinals past the end of the backing array.
    #[must_use]
    pub fn get(&self, ordinal: usize) -> bool {
        self.defaults.get(ordinal)
    }

    /// Number of columns covered by the backing array.
    #[must_use]
    pub fn len(&self) -> usize {
        self.defaults.len()
    }

    /// Whether the property covers no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Debug-build check that a non-empty property covers exactly
    /// `column_count` columns.
    pub fn check_count(&self, column_count: usize) {
        self.defaults.check_count("DefaultFieldsProperty", column_count);
    }
}

/// Which columns of a result set form a unique key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UniqueKeyProperty {
    columns: ColumnFlags,
}

impl UniqueKeyProperty {
    /// Wrap a bit array indexed by column ordinal.
    #[must_use]
    pub fn new(columns: CompactBitArray) -> Self {
        Self {
            columns: ColumnFlags(Some(columns)),
        }
    }

    /// A property with no backing storage; every ordinal reads `false`.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether column `ordinal` is part of the unique key.
    ///
    /// Returns `false` for ordinals past the end of the backing array.
    #[must_use]
    pub fn get(&self, ordinal: usize) -> bool {
        self.columns.get(ordinal)
    }

    /// Number of columns covered by the backing array.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the property covers no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Debug-build check that a non-empty property covers exactly
    /// `column_count` columns.
    pub fn check_count(&self, column_count: usize) {
        self.columns.check_count("UniqueKeyProperty", column_count);
    }
}

/// Sort order of a result set, by column ordinal and direction.
///
/// Position in the list is precedence: entry 0 is the primary sort key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SortOrderProperty {
    columns: Option<Arc<[ColumnOrder]>>,
}

impl SortOrderProperty {
    /// Create a sort-order property.
    ///
    /// A `Vec` is moved into a new immutable list; an `Arc<[ColumnOrder]>`
    /// is shared as-is without copying.
    #[must_use]
    pub fn new(columns: impl Into<Arc<[ColumnOrder]>>) -> Self {
        Self {
            columns: Some(columns.into()),
        }
    }

    /// A property with no backing list; every position reads
    /// [`ColumnOrder::UNSPECIFIED`].
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Sort entry at position `index`, or [`ColumnOrder::UNSPECIFIED`] when
    /// out of range.
    #[must_use]
    pub fn get(&self, index: usize) -> ColumnOrder {
        self.columns
            .as_deref()
            .and_then(|columns| columns.get(index))
            .copied()
            .unwrap_or(ColumnOrder::UNSPECIFIED)
    }

    /// Number of sort entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.as_deref().map_or(0, <[ColumnOrder]>::len)
    }

    /// Whether the property has no sort entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over the sort entries in precedence order.
    pub fn iter(&self) -> impl Iterator<Item = &ColumnOrder> {
        self.columns.as_deref().unwrap_or_default().iter()
    }

    /// The shared backing list, if any.
    #[must_use]
    pub fn as_shared(&self) -> Option<&Arc<[ColumnOrder]>> {
        self.columns.as_ref()
    }

    /// Debug-build check that a non-empty property has exactly
    /// `column_count` entries.
    pub fn check_count(&self, column_count: usize) {
        let actual = self.len();
        debug_assert!(
            actual == 0 || actual == column_count,
            "SortOrderProperty: property size ({actual}) not equal to checked size ({column_count})"
        );
    }
}

/// Optional extended properties of a column set.
///
/// A collection starts writable and can be frozen once with
/// [`set_read_only`](Self::set_read_only). After that every setter fails with
/// [`TypeError::ReadOnly`]. Frozen collections are safe to share between
/// threads and result descriptors; see [`freeze`](Self::freeze) and
/// [`empty`](Self::empty).
#[derive(Debug, Clone, Default)]
pub struct MetadataPropertyCollection {
    default_fields: Option<DefaultFieldsProperty>,
    unique_key: Option<UniqueKeyProperty>,
    sort_order: Option<SortOrderProperty>,
    read_only: bool,
}

impl MetadataPropertyCollection {
    /// Create a writable collection with no properties set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide frozen collection with no properties.
    #[must_use]
    pub fn empty() -> &'static Self {
        &EMPTY_COLLECTION
    }

    /// Default-fields property, or the shared empty instance.
    #[must_use]
    pub fn default_fields(&self) -> &DefaultFieldsProperty {
        self.default_fields
            .as_ref()
            .unwrap_or_else(|| &*EMPTY_DEFAULT_FIELDS)
    }

    /// Unique-key property, or the shared empty instance.
    #[must_use]
    pub fn unique_key(&self) -> &UniqueKeyProperty {
        self.unique_key
            .as_ref()
            .unwrap_or_else(|| &*EMPTY_UNIQUE_KEY)
    }

    /// Sort-order property, or the shared empty instance.
    #[must_use]
    pub fn sort_order(&self) -> &SortOrderProperty {
        self.sort_order
            .as_ref()
            .unwrap_or_else(|| &*EMPTY_SORT_ORDER)
    }

    /// Set the default-fields property.
    pub fn set_default_fields(
        &mut self,
        value: Option<DefaultFieldsProperty>,
    ) -> Result<(), TypeError> {
        self.default_fields = Some(self.checked_value("default_fields", value)?);
        Ok(())
    }

    /// Set the unique-key property.
    pub fn set_unique_key(&mut self, value: Option<UniqueKeyProperty>) -> Result<(), TypeError> {
        self.unique_key = Some(self.checked_value("unique_key", value)?);
        Ok(())
    }

    /// Set the sort-order property.
    pub fn set_sort_order(&mut self, value: Option<SortOrderProperty>) -> Result<(), TypeError> {
        self.sort_order = Some(self.checked_value("sort_order", value)?);
        Ok(())
    }

    /// Whether the collection has been frozen.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Freeze the collection. There is no way back.
    pub fn set_read_only(&mut self) {
        self.read_only = true;
    }

    /// Freeze the collection and wrap it for sharing.
    #[must_use]
    pub fn freeze(mut self) -> Arc<Self> {
        self.set_read_only();
        Arc::new(self)
    }

    fn checked_value<P>(&self, property: &'static str, value: Option<P>) -> Result<P, TypeError> {
        if self.read_only {
            return Err(TypeError::ReadOnly { property });
        }
        value.ok_or(TypeError::MissingProperty { property })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn flags(bits: &[bool]) -> CompactBitArray {
        CompactBitArray::from_bools(bits.iter().copied())
    }

    #[test]
    fn test_absent_properties_read_as_empty() {
        let properties = MetadataPropertyCollection::new();
        assert!(!properties.is_read_only());
        assert!(properties.default_fields().is_empty());
        assert!(properties.unique_key().is_empty());
        assert!(properties.sort_order().is_empty());
        assert!(std::ptr::eq(
            properties.default_fields(),
            MetadataPropertyCollection::new().default_fields()
        ));
    }

    #[test]
    fn test_lenient_reads() {
        assert!(!DefaultFieldsProperty::empty().get(5));
        assert!(!UniqueKeyProperty::empty().get(5));
        assert_eq!(SortOrderProperty::empty().get(5), ColumnOrder::UNSPECIFIED);

        let defaults = DefaultFieldsProperty::new(flags(&[true, true]));
        assert!(defaults.get(1));
        assert!(!defaults.get(2));
        assert!(!defaults.get(usize::MAX));
    }

    #[test]
    fn test_sentinel_value() {
        let sentinel = SortOrderProperty::empty().get(0);
        assert_eq!(sentinel.sort_ordinal, -1);
        assert_eq!(sentinel.order, SortOrder::Unspecified);
    }

    #[test]
    fn test_sort_order_shares_arc() {
        let shared: Arc<[ColumnOrder]> = Arc::from(vec![
            ColumnOrder::new(2, SortOrder::Descending),
            ColumnOrder::new(0, SortOrder::Ascending),
        ]);
        let property = SortOrderProperty::new(Arc::clone(&shared));

        assert!(Arc::ptr_eq(property.as_shared().unwrap(), &shared));
        assert_eq!(property.get(0), ColumnOrder::new(2, SortOrder::Descending));
        assert_eq!(property.get(1).order, SortOrder::Ascending);
        assert_eq!(property.get(2), ColumnOrder::UNSPECIFIED);
        assert_eq!(property.iter().count(), 2);
    }

    #[test]
    fn test_setters_store_values() {
        let mut properties = MetadataPropertyCollection::new();
        properties
            .set_unique_key(Some(UniqueKeyProperty::new(flags(&[false, true, false]))))
            .unwrap();
        properties
            .set_sort_order(Some(SortOrderProperty::new(vec![ColumnOrder::new(
                1,
                SortOrder::Ascending,
            )])))
            .unwrap();

        assert!(properties.unique_key().get(1));
        assert!(!properties.unique_key().get(0));
        assert_eq!(properties.sort_order().get(0).sort_ordinal, 1);
        assert!(properties.default_fields().is_empty());
    }

    #[test]
    fn test_missing_value_rejected() {
        let mut properties = MetadataPropertyCollection::new();
        assert_eq!(
            properties.set_default_fields(None),
            Err(TypeError::MissingProperty {
                property: "default_fields"
            })
        );
        assert!(properties.set_unique_key(None).is_err());
        assert!(properties.set_sort_order(None).is_err());
    }

    #[test]
    fn test_freeze_is_idempotent_and_final() {
        let mut properties = MetadataPropertyCollection::new();
        properties.set_read_only();
        properties.set_read_only();
        assert!(properties.is_read_only());

        assert_eq!(
            properties.set_default_fields(Some(DefaultFieldsProperty::empty())),
            Err(TypeError::ReadOnly {
                property: "default_fields"
            })
        );
        assert_eq!(
            properties.set_sort_order(None),
            Err(TypeError::ReadOnly {
                property: "sort_order"
            })
        );
        assert!(
            properties
                .set_unique_key(Some(UniqueKeyProperty::new(flags(&[true]))))
                .is_err()
        );
    }

    #[test]
    fn test_empty_singleton_is_frozen() {
        let empty = MetadataPropertyCollection::empty();
        assert!(empty.is_read_only());
        assert!(std::ptr::eq(empty, MetadataPropertyCollection::empty()));
        assert!(!empty.unique_key().get(0));
    }

    #[test]
    fn test_freeze_into_arc() {
        let mut properties = MetadataPropertyCollection::new();
        properties
            .set_default_fields(Some(DefaultFieldsProperty::new(flags(&[false, true]))))
            .unwrap();
        let frozen = properties.freeze();

        assert!(frozen.is_read_only());
        let reader = Arc::clone(&frozen);
        let handle = std::thread::spawn(move || reader.default_fields().get(1));
        assert!(handle.join().unwrap());
    }

    #[test]
    fn test_check_count_accepts_matching_or_empty() {
        DefaultFieldsProperty::new(flags(&[true, false, true])).check_count(3);
        UniqueKeyProperty::empty().check_count(12);
        SortOrderProperty::empty().check_count(4);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "not equal to checked size")]
    fn test_check_count_mismatch_asserts() {
        UniqueKeyProperty::new(flags(&[true, false])).check_count(3);
    }
}
