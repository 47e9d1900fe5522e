//! Value-kind to SQL type conversion table.
//!
//! When a parameter or table-valued column is sent to the server, the driver
//! has to decide whether a Rust value can be written directly as the declared
//! SQL type. The answer depends only on the pair (value kind, SQL type), so it
//! is precomputed once into a [`CompactBitMatrix`] with value kinds as rows
//! and SQL types as columns.

use once_cell::sync::Lazy;

use crate::bit_matrix::CompactBitMatrix;

static CONVERSION_TABLE: Lazy<ConversionTable> = Lazy::new(ConversionTable::build);

/// SQL Server column types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SqlDbType {
    /// BIGINT.
    BigInt = 0,
    /// BINARY(n).
    Binary = 1,
    /// BIT.
    Bit = 2,
    /// CHAR(n).
    Char = 3,
    /// DATETIME.
    DateTime = 4,
    /// DECIMAL(p, s) / NUMERIC(p, s).
    Decimal = 5,
    /// FLOAT.
    Float = 6,
    /// IMAGE.
    Image = 7,
    /// INT.
    Int = 8,
    /// MONEY.
    Money = 9,
    /// NCHAR(n).
    NChar = 10,
    /// NTEXT.
    NText = 11,
    /// NVARCHAR(n).
    NVarChar = 12,
    /// REAL.
    Real = 13,
    /// UNIQUEIDENTIFIER.
    UniqueIdentifier = 14,
    /// SMALLDATETIME.
    SmallDateTime = 15,
    /// SMALLINT.
    SmallInt = 16,
    /// SMALLMONEY.
    SmallMoney = 17,
    /// TEXT.
    Text = 18,
    /// TIMESTAMP / ROWVERSION.
    Timestamp = 19,
    /// TINYINT.
    TinyInt = 20,
    /// VARBINARY(n).
    VarBinary = 21,
    /// VARCHAR(n).
    VarChar = 22,
    /// SQL_VARIANT.
    Variant = 23,
    /// XML.
    Xml = 24,
    /// DATE.
    Date = 25,
    /// TIME(n).
    Time = 26,
    /// DATETIME2(n).
    DateTime2 = 27,
    /// DATETIMEOFFSET(n).
    DateTimeOffset = 28,
}

impl SqlDbType {
    /// Every SQL type, in discriminant order.
    pub const ALL: [Self; 29] = [
        Self::BigInt,
        Self::Binary,
        Self::Bit,
        Self::Char,
        Self::DateTime,
        Self::Decimal,
        Self::Float,
        Self::Image,
        Self::Int,
        Self::Money,
        Self::NChar,
        Self::NText,
        Self::NVarChar,
        Self::Real,
        Self::UniqueIdentifier,
        Self::SmallDateTime,
        Self::SmallInt,
        Self::SmallMoney,
        Self::Text,
        Self::Timestamp,
        Self::TinyInt,
        Self::VarBinary,
        Self::VarChar,
        Self::Variant,
        Self::Xml,
        Self::Date,
        Self::Time,
        Self::DateTime2,
        Self::DateTimeOffset,
    ];

    /// Create from raw discriminant value.
    #[must_use]
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(usize::from(value)).copied()
    }
}

/// Kinds of Rust values the driver can bind as parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ValueKind {
    /// `bool`.
    Bool = 0,
    /// `u8`.
    U8 = 1,
    /// `i16`.
    I16 = 2,
    /// `i32`.
    I32 = 3,
    /// `i64`.
    I64 = 4,
    /// `f32`.
    F32 = 5,
    /// `f64`.
    F64 = 6,
    /// Fixed-point decimal.
    Decimal = 7,
    /// UTF-8 text.
    String = 8,
    /// Raw bytes.
    Bytes = 9,
    /// UUID.
    Uuid = 10,
    /// Calendar date.
    Date = 11,
    /// Time of day.
    Time = 12,
    /// Date and time without offset.
    DateTime = 13,
    /// Date and time with UTC offset.
    DateTimeOffset = 14,
}

impl ValueKind {
    /// Every value kind, in discriminant order.
    pub const ALL: [Self; 15] = [
        Self::Bool,
        Self::U8,
        Self::I16,
        Self::I32,
        Self::I64,
        Self::F32,
        Self::F64,
        Self::Decimal,
        Self::String,
        Self::Bytes,
        Self::Uuid,
        Self::Date,
        Self::Time,
        Self::DateTime,
        Self::DateTimeOffset,
    ];

    /// SQL types a value of this kind can be written as without an
    /// intermediate conversion.
    fn direct_targets(self) -> &'static [SqlDbType] {
        use SqlDbType as T;
        match self {
            Self::Bool => &[T::Bit, T::TinyInt, T::SmallInt, T::Int, T::BigInt, T::Variant],
            Self::U8 => &[
                T::TinyInt,
                T::SmallInt,
                T::Int,
                T::BigInt,
                T::Decimal,
                T::Money,
                T::SmallMoney,
                T::Real,
                T::Float,
                T::Variant,
            ],
            Self::I16 => &[
                T::SmallInt,
                T::Int,
                T::BigInt,
                T::Decimal,
                T::Money,
                T::Real,
                T::Float,
                T::Variant,
            ],
            Self::I32 => &[T::Int, T::BigInt, T::Decimal, T::Money, T::Float, T::Variant],
            Self::I64 => &[T::BigInt, T::Decimal, T::Money, T::Variant],
            Self::F32 => &[T::Real, T::Float, T::Variant],
            Self::F64 => &[T::Float, T::Variant],
            Self::Decimal => &[T::Decimal, T::Money, T::SmallMoney, T::Variant],
            Self::String => &[
                T::Char,
                T::VarChar,
                T::Text,
                T::NChar,
                T::NVarChar,
                T::NText,
                T::Xml,
                T::Variant,
            ],
            Self::Bytes => &[T::Binary, T::VarBinary, T::Image, T::Timestamp, T::Variant],
            Self::Uuid => &[T::UniqueIdentifier, T::Variant],
            Self::Date => &[T::Date, T::DateTime, T::DateTime2, T::SmallDateTime, T::Variant],
            Self::Time => &[T::Time, T::Variant],
            Self::DateTime => &[T::DateTime, T::DateTime2, T::SmallDateTime, T::Date, T::Variant],
            Self::DateTimeOffset => &[T::DateTimeOffset, T::Variant],
        }
    }
}

/// Precomputed answers to "can this value kind be sent as this SQL type".
#[derive(Debug, Clone)]
pub struct ConversionTable {
    matrix: CompactBitMatrix,
}

impl ConversionTable {
    /// The process-wide table, built on first use.
    #[must_use]
    pub fn global() -> &'static Self {
        &CONVERSION_TABLE
    }

    fn build() -> Self {
        let matrix = CompactBitMatrix::from_fn(
            ValueKind::ALL.len(),
            SqlDbType::ALL.len(),
            |row, column| {
                ValueKind::ALL[row]
                    .direct_targets()
                    .contains(&SqlDbType::ALL[column])
            },
        );
        Self { matrix }
    }

    /// Whether a value of `kind` can be written directly as `target`.
    #[must_use]
    pub fn can_convert(&self, kind: ValueKind, target: SqlDbType) -> bool {
        matches!(self.matrix.get(kind as usize, target as usize), Ok(true))
    }

    /// SQL types a value of `kind` can be written as.
    pub fn targets(&self, kind: ValueKind) -> impl Iterator<Item = SqlDbType> + '_ {
        SqlDbType::ALL
            .into_iter()
            .filter(move |&target| self.can_convert(kind, target))
    }

    /// The packed matrix backing the table.
    #[must_use]
    pub fn matrix(&self) -> &CompactBitMatrix {
        &self.matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discriminants_are_dense() {
        for (index, ty) in SqlDbType::ALL.iter().enumerate() {
            assert_eq!(*ty as usize, index);
            assert_eq!(SqlDbType::from_u8(index as u8), Some(*ty));
        }
        for (index, kind) in ValueKind::ALL.iter().enumerate() {
            assert_eq!(*kind as usize, index);
        }
        assert_eq!(SqlDbType::from_u8(29), None);
    }

    #[test]
    fn test_table_dimensions() {
        let table = ConversionTable::global();
        assert_eq!(table.matrix().height(), ValueKind::ALL.len());
        assert_eq!(table.matrix().width(), SqlDbType::ALL.len());
        // 15 rows round up to 2 bytes per column.
        assert_eq!(table.matrix().storage_len(), 2 * 29);
    }

    #[test]
    fn test_known_conversions() {
        let table = ConversionTable::global();
        assert!(table.can_convert(ValueKind::Bool, SqlDbType::Bit));
        assert!(table.can_convert(ValueKind::I32, SqlDbType::BigInt));
        assert!(table.can_convert(ValueKind::String, SqlDbType::NVarChar));
        assert!(table.can_convert(ValueKind::Uuid, SqlDbType::UniqueIdentifier));

        assert!(!table.can_convert(ValueKind::I64, SqlDbType::Int));
        assert!(!table.can_convert(ValueKind::Bytes, SqlDbType::NVarChar));
        assert!(!table.can_convert(ValueKind::F64, SqlDbType::Real));
    }

    #[test]
    fn test_every_kind_accepts_variant() {
        let table = ConversionTable::global();
        for kind in ValueKind::ALL {
            assert!(table.can_convert(kind, SqlDbType::Variant), "{kind:?}");
        }
    }

    #[test]
    fn test_table_holds_every_direct_target() {
        let table = ConversionTable::global();
        for kind in ValueKind::ALL {
            let targets: Vec<_> = table.targets(kind).collect();
            assert_eq!(targets.len(), kind.direct_targets().len(), "{kind:?}");
            for target in kind.direct_targets() {
                assert!(table.can_convert(kind, *target), "{kind:?} -> {target:?}");
            }
        }
    }

    #[test]
    fn test_targets_match_direct_list() {
        let table = ConversionTable::global();
        let targets: Vec<_> = table.targets(ValueKind::Uuid).collect();
        assert_eq!(targets, vec![SqlDbType::UniqueIdentifier, SqlDbType::Variant]);
    }
}
