//! Sample records and a recording stub store shared by the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use crud_sdk::query::{Filter, QueryOption};
use crud_sdk::{FieldName, FieldTable, Record, StoreError, Store};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: i64,
    pub title: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub product: Option<Product>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub password: String,
    pub orders: Vec<Order>,
    pub best_friend: Option<Box<User>>,
}

impl Record for User {
    const NAME: &'static str = "user";

    fn fields() -> FieldTable<Self> {
        FieldTable::new()
            .attribute("ID", |u: &User| serde_json::to_value(u.id))
            .attribute("Name", |u: &User| serde_json::to_value(&u.name))
            .has_many("Orders", |u: &User| serde_json::to_value(&u.orders))
            .has_one("BestFriend", |u: &User| serde_json::to_value(&u.best_friend))
    }
}

pub fn user(id: i64, name: &str) -> User {
    User {
        id,
        name: name.to_string(),
        password: "secret".into(),
        orders: vec![
            Order {
                id: id * 10 + 1,
                user_id: id,
                product: Some(Product {
                    id: 1,
                    title: "Lamp".into(),
                }),
            },
            Order {
                id: id * 10 + 2,
                user_id: id,
                product: None,
            },
        ],
        best_friend: None,
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    FetchMany(Vec<QueryOption>),
    FetchById(String, Vec<QueryOption>),
    Count(Option<Filter>),
    CountAssociation(String, Option<Filter>),
}

/// Store returning canned users and counts, recording every call.
pub struct StubStore {
    pub users: Vec<User>,
    pub fail_fetch: bool,
    pub count: Result<i64, String>,
    pub calls: Mutex<Vec<Call>>,
}

impl StubStore {
    pub fn new(users: Vec<User>) -> Self {
        StubStore {
            users,
            fail_fetch: false,
            count: Ok(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_count(mut self, count: Result<i64, String>) -> Self {
        self.count = count;
        self
    }

    pub fn failing_fetch(mut self) -> Self {
        self.fail_fetch = true;
        self
    }

    pub fn shared(self) -> Arc<StubStore> {
        Arc::new(self)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn counted(&self) -> Result<i64, StoreError> {
        self.count.clone().map_err(StoreError::Other)
    }
}

#[async_trait]
impl Store<User> for StubStore {
    async fn fetch_many(&self, options: &[QueryOption]) -> Result<Vec<User>, StoreError> {
        self.record(Call::FetchMany(options.to_vec()));
        if self.fail_fetch {
            return Err(StoreError::Other("connection reset".into()));
        }
        Ok(self.users.clone())
    }

    async fn fetch_by_id(&self, id: &str, options: &[QueryOption]) -> Result<User, StoreError> {
        self.record(Call::FetchById(id.to_string(), options.to_vec()));
        if self.fail_fetch {
            return Err(StoreError::Other("connection reset".into()));
        }
        self.users
            .iter()
            .find(|u| u.id.to_string() == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("user {}", id)))
    }

    async fn count(&self, filter: Option<&Filter>) -> Result<i64, StoreError> {
        self.record(Call::Count(filter.cloned()));
        self.counted()
    }

    async fn count_association(
        &self,
        _parent: &User,
        field: &FieldName,
        filter: Option<&Filter>,
    ) -> Result<i64, StoreError> {
        self.record(Call::CountAssociation(field.to_string(), filter.cloned()));
        self.counted()
    }
}
