/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Enum discriminant type matching SMALLINT columns.
pub type EnumId = i16;

/// Define a `#[repr(i16)]` enum whose wire and database encoding is its
/// integer discriminant.
///
/// Generates `id()`, `from_id()`, `ALL`, `From<Enum> for EnumId` and
/// `TryFrom<EnumId>`, and wires serde through the integer form so the enum
/// (de)serializes as a plain number.
macro_rules! define_id_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            ::serde::Serialize, ::serde::Deserialize,
        )]
        #[serde(try_from = "i16", into = "i16")]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Every variant, in discriminant order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Return the integer encoding.
            pub fn id(self) -> $crate::types::EnumId {
                self as $crate::types::EnumId
            }

            /// Decode an integer, returning `None` for unknown values.
            pub fn from_id(id: $crate::types::EnumId) -> Option<Self> {
                Self::ALL.iter().copied().find(|v| v.id() == id)
            }
        }

        impl From<$name> for $crate::types::EnumId {
            fn from(value: $name) -> Self {
                value as $crate::types::EnumId
            }
        }

        impl TryFrom<$crate::types::EnumId> for $name {
            type Error = String;

            fn try_from(id: $crate::types::EnumId) -> Result<Self, Self::Error> {
                Self::from_id(id)
                    .ok_or_else(|| format!("Invalid {} value: {id}", stringify!($name)))
            }
        }
    };
}

pub(crate) use define_id_enum;
