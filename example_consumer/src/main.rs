//! Example consumer: a separate Rust project that uses crud-sdk as a dependency.
//!
//! Run from repo root: `cargo run -p example-consumer`
//! Serves e.g. `GET /api/v1/users?limit=10&total=true` and
//! `GET /api/v1/users/1/orders?preload=Product`.

use axum::Router;
use crud_sdk::store::{ColumnSpec, IncludeDirection, RelationSpec};
use crud_sdk::{
    common_routes_with_ready, configured_routes, init_tracing, load_from_path, traced, FieldTable, PgStore, ReadConfig,
    Record, ServerSettings, SharedStore, TableSpec,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;

#[derive(Debug, Serialize, Deserialize)]
struct Product {
    id: i64,
    title: String,
    price: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Order {
    id: i64,
    user_id: i64,
    product_id: i64,
    status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    product: Option<Product>,
}

#[derive(Debug, Serialize, Deserialize)]
struct User {
    id: i64,
    name: String,
    email: String,
    password_hash: String,
    #[serde(default)]
    orders: Vec<Order>,
}

impl Record for Product {
    const NAME: &'static str = "product";

    fn fields() -> FieldTable<Self> {
        FieldTable::new()
            .attribute("ID", |p: &Product| serde_json::to_value(p.id))
            .attribute("Title", |p: &Product| serde_json::to_value(&p.title))
            .attribute("Price", |p: &Product| serde_json::to_value(&p.price))
    }
}

impl Record for Order {
    const NAME: &'static str = "order";

    fn fields() -> FieldTable<Self> {
        FieldTable::new()
            .attribute("ID", |o: &Order| serde_json::to_value(o.id))
            .attribute("Status", |o: &Order| serde_json::to_value(&o.status))
            .has_one("Product", |o: &Order| serde_json::to_value(&o.product))
    }
}

impl Record for User {
    const NAME: &'static str = "user";

    fn fields() -> FieldTable<Self> {
        FieldTable::new()
            .attribute("ID", |u: &User| serde_json::to_value(u.id))
            .attribute("Name", |u: &User| serde_json::to_value(&u.name))
            .attribute("Email", |u: &User| serde_json::to_value(&u.email))
            .has_many("Orders", |u: &User| serde_json::to_value(&u.orders))
    }
}

fn products_table() -> TableSpec {
    TableSpec::new("shop", "products", "id")
        .column(ColumnSpec::typed("id", "bigint"))
        .column(ColumnSpec::new("title"))
        .column(ColumnSpec::typed("price", "numeric"))
}

fn orders_table() -> TableSpec {
    TableSpec::new("shop", "orders", "id")
        .column(ColumnSpec::typed("id", "bigint"))
        .column(ColumnSpec::typed("user_id", "bigint"))
        .column(ColumnSpec::typed("product_id", "bigint"))
        .column(ColumnSpec::new("status"))
        .relation(RelationSpec {
            field: "Product".into(),
            key: Some("product".into()),
            direction: IncludeDirection::ToOne,
            table: products_table(),
            our_key: "product_id".into(),
            their_key: "id".into(),
        })
}

fn users_table() -> TableSpec {
    TableSpec::new("shop", "users", "id")
        .column(ColumnSpec::typed("id", "bigint"))
        .column(ColumnSpec::new("name"))
        .column(ColumnSpec::new("email"))
        .column(ColumnSpec::new("password_hash"))
        .relation(RelationSpec {
            field: "Orders".into(),
            key: Some("orders".into()),
            direction: IncludeDirection::ToMany,
            table: orders_table(),
            our_key: "id".into(),
            their_key: "user_id".into(),
        })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing("crud_sdk=info,example_consumer=info,tower_http=info");
    let settings = ServerSettings::from_env()?;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .connect(&settings.database_url)
        .await?;

    let config = match &settings.config_path {
        Some(path) => load_from_path(path).await?,
        None => ReadConfig::default(),
    };

    let users: SharedStore<User> = Arc::new(PgStore::new(pool.clone(), users_table()));
    let orders: SharedStore<Order> = Arc::new(PgStore::new(pool.clone(), orders_table()));
    let products: SharedStore<Product> = Arc::new(PgStore::new(pool.clone(), products_table()));

    let api = Router::new()
        .merge(configured_routes(users, &config, "users")?)
        .merge(configured_routes(orders, &config, "orders")?)
        .merge(configured_routes(products, &config, "products")?);

    let app = traced(Router::new().merge(common_routes_with_ready(pool)).nest("/api/v1", api));

    let listener = TcpListener::bind(&settings.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
