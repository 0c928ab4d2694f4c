//! Tests for the SQLite bindings. Run with `cargo test --features sqlx`.

use assert_matches::assert_matches;
use optional_value::Optional;
use serde::{Deserialize, Serialize};
use sqlx::{Connection, Row, SqliteConnection};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Item {
    name: String,
    tags: Vec<String>,
    parent: Optional<u32>,
}

async fn connect() -> anyhow::Result<SqliteConnection> {
    let mut conn = SqliteConnection::connect("sqlite::memory:").await?;
    sqlx::query("CREATE TABLE items (id INTEGER PRIMARY KEY, payload BLOB)")
        .execute(&mut conn)
        .await?;
    Ok(conn)
}

#[tokio::test]
async fn round_trip_via_sqlite() -> anyhow::Result<()> {
    let mut conn = connect().await?;
    let item = Item {
        name: "test".to_owned(),
        tags: vec!["first".to_owned()],
        parent: Optional::absent(),
    };
    let values = [Optional::present(item), Optional::absent()];
    for (id, value) in values.iter().enumerate() {
        sqlx::query("INSERT INTO items (id, payload) VALUES (?, ?)")
            .bind(i64::try_from(id)?)
            .bind(value)
            .execute(&mut conn)
            .await?;
    }

    let is_null: bool = sqlx::query_scalar("SELECT payload IS NULL FROM items WHERE id = 1")
        .fetch_one(&mut conn)
        .await?;
    assert!(is_null);
    let type_name: String = sqlx::query_scalar("SELECT typeof(payload) FROM items WHERE id = 0")
        .fetch_one(&mut conn)
        .await?;
    assert_eq!(type_name, "blob");

    let rows = sqlx::query("SELECT payload FROM items ORDER BY id")
        .fetch_all(&mut conn)
        .await?;
    let scanned: Vec<Optional<Item>> = rows
        .iter()
        .map(|row| row.try_get("payload"))
        .collect::<Result<_, _>>()?;
    assert_eq!(scanned, values);
    Ok(())
}

#[tokio::test]
async fn binding_non_finite_float_fails() -> anyhow::Result<()> {
    let mut conn = connect().await?;
    let err = sqlx::query("INSERT INTO items (id, payload) VALUES (1, ?)")
        .bind(Optional::present(f64::NAN))
        .execute(&mut conn)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("non-finite float"), "{err}");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
        .fetch_one(&mut conn)
        .await?;
    assert_eq!(count, 0);
    Ok(())
}

#[tokio::test]
async fn scanning_native_columns() -> anyhow::Result<()> {
    let mut conn = SqliteConnection::connect("sqlite::memory:").await?;

    let row = sqlx::query(
        "SELECT 42 AS int, 2.5 AS real, 'text' AS text, '[1,2]' AS json, X'5B335D' AS blob, NULL AS nothing",
    )
    .fetch_one(&mut conn)
    .await?;
    let int: Optional<i64> = row.try_get("int")?;
    assert_eq!(int, Optional::present(42));
    let real: Optional<f64> = row.try_get("real")?;
    assert_eq!(real, Optional::present(2.5));
    let text: Optional<String> = row.try_get("text")?;
    assert_eq!(text, Optional::present("text".to_owned()));
    let json: Optional<Vec<u32>> = row.try_get("json")?;
    assert_eq!(json, Optional::present(vec![1, 2]));
    let blob: Optional<Vec<u32>> = row.try_get("blob")?;
    assert_eq!(blob, Optional::present(vec![3]));
    let nothing: Optional<Item> = row.try_get("nothing")?;
    assert_eq!(nothing, Optional::absent());

    let err = row.try_get::<Optional<u32>, _>("int").unwrap_err();
    assert_matches!(err, sqlx::Error::ColumnDecode { .. });
    assert!(err.to_string().contains("unsupported source type"), "{err}");
    let err = row.try_get::<Optional<i64>, _>("real").unwrap_err();
    assert!(err.to_string().contains("unsupported source type"), "{err}");
    Ok(())
}
