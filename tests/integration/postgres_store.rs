//! PostgreSQL store tests
//!
//! Need a reachable database in DATABASE_URL.
//! Run with: cargo test -- --ignored

use gauge_server::{
    config::StoreConfig,
    store::{postgres::PgStore, Fields, Table, TableStore},
};

async fn connect() -> PgStore {
    let config = StoreConfig {
        url: std::env::var("DATABASE_URL").expect("DATABASE_URL not set"),
        ..StoreConfig::default()
    };
    PgStore::connect(&config).await.expect("Failed to connect")
}

#[tokio::test]
#[ignore]
async fn test_row_round_trip() {
    let store = connect().await;
    let id = format!("PG-TEST-{}", std::process::id());

    let fields = Fields::from([
        ("id".to_string(), id.clone()),
        ("category".to_string(), "Caliper".to_string()),
        ("status".to_string(), "可借出".to_string()),
    ]);
    let handle = store.append_row(Table::Gauges, fields).await.unwrap();

    store
        .update_cells(
            Table::Gauges,
            handle,
            vec![
                ("status", "已借出".to_string()),
                ("current_user", "Alice".to_string()),
            ],
        )
        .await
        .unwrap();

    let row = store.find_row(Table::Gauges, &id).await.unwrap().unwrap();
    assert_eq!(row.handle, handle);
    assert_eq!(row.get("status"), "已借出");
    assert_eq!(row.get("current_user"), "Alice");
    assert_eq!(row.get("note"), "");

    store.delete_row(Table::Gauges, handle).await.unwrap();
    assert!(store.find_row(Table::Gauges, &id).await.unwrap().is_none());
}
