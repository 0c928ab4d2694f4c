//! SQLite bindings for [`Optional`] based on `sqlx`.

use serde::{Serialize, de::DeserializeOwned};
use sqlx::{
    Database, Decode, Encode, Sqlite, Type, TypeInfo as _, ValueRef as _,
    encode::IsNull,
    error::BoxDynError,
    sqlite::{SqliteTypeInfo, SqliteValueRef},
};

use crate::{DriverValue, Optional, ScanError};

impl<T> Type<Sqlite> for Optional<T> {
    fn type_info() -> SqliteTypeInfo {
        <Vec<u8> as Type<Sqlite>>::type_info()
    }

    // Any column shape is accepted; unsupported ones are rejected when scanning.
    fn compatible(_ty: &SqliteTypeInfo) -> bool {
        true
    }
}

impl<'q, T: Serialize> Encode<'q, Sqlite> for Optional<T> {
    fn encode_by_ref(
        &self,
        buf: &mut <Sqlite as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, BoxDynError> {
        match self.store()? {
            DriverValue::Null => Ok(IsNull::Yes),
            DriverValue::Bool(value) => Encode::<Sqlite>::encode(value, buf),
            DriverValue::Int(value) => Encode::<Sqlite>::encode(value, buf),
            DriverValue::Float(value) => Encode::<Sqlite>::encode(value, buf),
            DriverValue::Text(value) => Encode::<Sqlite>::encode(value, buf),
            DriverValue::Bytes(value) => Encode::<Sqlite>::encode(value, buf),
        }
    }
}

impl<'r, T: DeserializeOwned + 'static> Decode<'r, Sqlite> for Optional<T> {
    fn decode(value: SqliteValueRef<'r>) -> Result<Self, BoxDynError> {
        if value.is_null() {
            return Ok(Self::absent());
        }

        // Non-null SQLite values always have one of the 4 storage classes below.
        let value = match value.type_info().name() {
            "INTEGER" => DriverValue::Int(Decode::<Sqlite>::decode(value)?),
            "REAL" => DriverValue::Float(Decode::<Sqlite>::decode(value)?),
            "TEXT" => DriverValue::Text(Decode::<Sqlite>::decode(value)?),
            "BLOB" => DriverValue::Bytes(Decode::<Sqlite>::decode(value)?),
            other => {
                return Err(ScanError::UnknownSourceType {
                    type_name: other.to_owned(),
                    expected: std::any::type_name::<T>(),
                }
                .into());
            }
        };
        Ok(Self::scan(value)?)
    }
}
