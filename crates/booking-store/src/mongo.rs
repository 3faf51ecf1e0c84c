//! # MongoDB Backend
//!
//! Stores each booking as one document:
//!
//! ```text
//! { _id: ObjectId, name: String, created_at: Date, updated_at: Date }
//! ```
//!
//! The client is created once at startup (it pools connections internally)
//! and pinned to the stable server API v1. [`MongoCollection::connect`]
//! pings the deployment before returning so an unreachable database fails
//! startup instead of the first request.

use async_trait::async_trait;
use booking_core::{Booking, BookingId};
use bson::oid::ObjectId;
use bson::{doc, serde_helpers::chrono_datetime_as_bson_datetime};
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::options::{ClientOptions, ServerApi, ServerApiVersion};
use mongodb::{Client, Collection, Database};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::collection::{BookingCollection, BookingDraft};
use crate::error::StoreError;

/// Connection settings for the MongoDB backend.
///
/// Custom `Debug` redacts the URI, which carries credentials.
#[derive(Clone)]
pub struct MongoSettings {
    pub uri: Zeroizing<String>,
    pub database: String,
    pub collection: String,
}

impl std::fmt::Debug for MongoSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MongoSettings")
            .field("uri", &"[REDACTED]")
            .field("database", &self.database)
            .field("collection", &self.collection)
            .finish()
    }
}

/// Stored document shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BookingDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    name: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    updated_at: DateTime<Utc>,
}

impl From<&BookingDraft> for BookingDocument {
    fn from(draft: &BookingDraft) -> Self {
        Self {
            id: None,
            name: draft.name.clone(),
            created_at: draft.created_at,
            updated_at: draft.updated_at,
        }
    }
}

impl TryFrom<BookingDocument> for Booking {
    type Error = StoreError;

    fn try_from(document: BookingDocument) -> Result<Self, Self::Error> {
        let id = document
            .id
            .ok_or_else(|| StoreError::StorageUnavailable("stored document has no _id".into()))?;
        Ok(Booking {
            id: BookingId::from_object_id(id),
            name: document.name,
            created_at: document.created_at,
            updated_at: document.updated_at,
        })
    }
}

/// Booking collection in a MongoDB database.
#[derive(Debug, Clone)]
pub struct MongoCollection {
    database: Database,
    collection: Collection<BookingDocument>,
}

impl MongoCollection {
    /// Build a client from `settings`, confirm the deployment answers a
    /// ping, and bind the configured collection.
    pub async fn connect(settings: &MongoSettings) -> Result<Self, StoreError> {
        let mut options = ClientOptions::parse(settings.uri.as_str()).await?;
        options.server_api = Some(ServerApi::builder().version(ServerApiVersion::V1).build());
        if options.app_name.is_none() {
            options.app_name = Some("booking-api".to_string());
        }

        let client = Client::with_options(options)?;
        let bound = Self::from_client(&client, &settings.database, &settings.collection);
        bound.ping().await?;

        tracing::info!(
            database = %settings.database,
            collection = %settings.collection,
            "connected to MongoDB"
        );
        Ok(bound)
    }

    /// Bind a collection on an existing client without contacting the server.
    pub fn from_client(client: &Client, database: &str, collection: &str) -> Self {
        let database = client.database(database);
        let collection = database.collection(collection);
        Self {
            database,
            collection,
        }
    }
}

#[async_trait]
impl BookingCollection for MongoCollection {
    async fn insert(&self, draft: &BookingDraft) -> Result<BookingId, StoreError> {
        let result = self
            .collection
            .insert_one(BookingDocument::from(draft))
            .await?;
        result
            .inserted_id
            .as_object_id()
            .map(BookingId::from_object_id)
            .ok_or_else(|| {
                StoreError::StorageWriteError(format!(
                    "server assigned a non-ObjectId _id: {}",
                    result.inserted_id
                ))
            })
    }

    async fn find_all(&self) -> Result<Vec<Booking>, StoreError> {
        let cursor = self.collection.find(doc! {}).await?;
        let documents: Vec<BookingDocument> = cursor.try_collect().await?;
        documents.into_iter().map(Booking::try_from).collect()
    }

    async fn find_by_id(&self, id: BookingId) -> Result<Option<Booking>, StoreError> {
        self.collection
            .find_one(doc! { "_id": id.as_object_id() })
            .await?
            .map(Booking::try_from)
            .transpose()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
