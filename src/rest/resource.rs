//! Resource instances.
//!
//! A [`Resource`] is one record of a [`ResourceType`]: a map of typed field
//! values plus the [`RestClient`] used to load and store it.
//!
//! # Lifecycle
//!
//! - [`Resource::new`] creates an empty instance (`id == 0`, every field at
//!   its kind's default)
//! - [`Resource::get`] loads a record by id
//! - [`Resource::save`] creates the record when `id == 0`, updates it otherwise
//! - [`Resource::remove`] deletes it
//!
//! # Example
//!
//! ```rust,ignore
//! use drf_consumer::{ConsumerConfig, FieldDef, Resource, ResourceType};
//!
//! static USER_FIELDS: [FieldDef; 2] = [FieldDef::string("name"), FieldDef::int("age")];
//! static USER: ResourceType = ResourceType::new("user", &USER_FIELDS);
//!
//! let config = ConsumerConfig::new("https://example.com/api")?;
//!
//! let mut user = Resource::new(&USER, config)?;
//! user.set("name", "bob");
//! user.save().await?; // POST, then id holds the server-assigned id
//!
//! user.set("age", 42);
//! user.save().await?; // PATCH
//!
//! let adults = user.query(&["age__gte=18"], 0, Some(&USER)).await?;
//! ```
//!
//! # Undeclared Keys
//!
//! Keys a record carries that the type does not declare are kept as raw
//! JSON (see [`Resource::extra`]) and never sent back.

use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::path::Path;

use chrono::Local;
use serde_json::{Map, Value};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::clients::RestClient;
use crate::config::ConsumerConfig;
use crate::rest::{
    is_truthy, validate_resource_name, FieldKind, FieldValue, Page, ResourceError, ResourceType,
    ID_FIELD,
};

/// The result of [`Resource::query`].
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    /// Raw records, when no type was requested or nothing matched.
    Records(Vec<Value>),
    /// A single instance, for a typed query with `limit == 1`.
    One(Resource),
    /// Instances, for a typed query with any other limit.
    Many(Vec<Resource>),
}

impl QueryResult {
    /// Returns the number of records or instances.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Records(records) => records.len(),
            Self::One(_) => 1,
            Self::Many(instances) => instances.len(),
        }
    }

    /// Returns `true` if nothing was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the instances, or an empty list for raw records.
    #[must_use]
    pub fn into_resources(self) -> Vec<Resource> {
        match self {
            Self::Records(_) => Vec::new(),
            Self::One(instance) => vec![instance],
            Self::Many(instances) => instances,
        }
    }

    /// Returns the raw records, if the query produced raw records.
    #[must_use]
    pub fn into_records(self) -> Option<Vec<Value>> {
        match self {
            Self::Records(records) => Some(records),
            _ => None,
        }
    }
}

/// One record of a resource type.
///
/// Each instance owns its field values and its own [`RestClient`], and
/// therefore its own pagination cursor.
#[derive(Debug, Clone)]
pub struct Resource {
    ty: &'static ResourceType,
    name: String,
    client: RestClient,
    values: BTreeMap<String, FieldValue>,
    extra: BTreeMap<String, Value>,
}

// Verify Resource is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Resource>();
};

impl Resource {
    /// Creates an empty instance of `ty`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidResourceType`] if `ty` fails validation.
    ///
    /// # Panics
    ///
    /// Panics if the underlying HTTP client cannot be created (see
    /// [`RestClient::new`]).
    pub fn new(ty: &'static ResourceType, config: ConsumerConfig) -> Result<Self, ResourceError> {
        ty.validate()?;
        Ok(Self::blank(ty, ty.name().to_string(), RestClient::new(config)))
    }

    /// Creates an empty instance of `ty` that targets the collection `name`
    /// instead of the type's own name.
    ///
    /// The name is fixed for the lifetime of the instance.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidResourceType`] if `ty` or `name` fail
    /// validation.
    ///
    /// # Panics
    ///
    /// Panics if the underlying HTTP client cannot be created (see
    /// [`RestClient::new`]).
    pub fn with_name(
        ty: &'static ResourceType,
        name: impl Into<String>,
        config: ConsumerConfig,
    ) -> Result<Self, ResourceError> {
        ty.validate()?;
        let name = name.into();
        validate_resource_name(&name)?;
        Ok(Self::blank(ty, name, RestClient::new(config)))
    }

    fn blank(ty: &'static ResourceType, name: String, client: RestClient) -> Self {
        let mut values = BTreeMap::new();
        values.insert(ID_FIELD.to_string(), FieldValue::Int(0));
        for field in ty.fields() {
            values.insert(field.name().to_string(), field.kind().default_value());
        }

        Self {
            ty,
            name,
            client,
            values,
            extra: BTreeMap::new(),
        }
    }

    /// A new empty instance sharing this instance's configuration.
    fn spawn(&self, ty: &'static ResourceType, name: String) -> Self {
        Self::blank(ty, name, self.client.fork())
    }

    /// Returns the type descriptor.
    #[must_use]
    pub const fn resource_type(&self) -> &'static ResourceType {
        self.ty
    }

    /// Returns the collection name used in URLs.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the id, or `0` if the record has not been persisted.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.values
            .get(ID_FIELD)
            .and_then(FieldValue::as_int)
            .and_then(|id| u64::try_from(id).ok())
            .unwrap_or(0)
    }

    /// Returns the value of a declared field (or `id`).
    #[must_use]
    pub fn value(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    /// Returns a mutable reference to the value of a declared field.
    pub fn value_mut(&mut self, field: &str) -> Option<&mut FieldValue> {
        self.values.get_mut(field)
    }

    /// Returns all declared values, `id` included.
    #[must_use]
    pub const fn values(&self) -> &BTreeMap<String, FieldValue> {
        &self.values
    }

    /// Sets a declared field (or `id`).
    ///
    /// Returns `false` and leaves the instance untouched if the type does
    /// not declare `field`.
    pub fn set(&mut self, field: &str, value: impl Into<FieldValue>) -> bool {
        if !self.ty.declares(field) {
            return false;
        }
        self.values.insert(field.to_string(), value.into());
        true
    }

    /// Returns a raw value received for an undeclared key.
    #[must_use]
    pub fn extra(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// Returns every raw value received for undeclared keys.
    #[must_use]
    pub const fn extras(&self) -> &BTreeMap<String, Value> {
        &self.extra
    }

    /// Returns the client.
    #[must_use]
    pub const fn client(&self) -> &RestClient {
        &self.client
    }

    /// Returns the client mutably, for raw-record calls sharing this
    /// instance's cursor.
    pub fn client_mut(&mut self) -> &mut RestClient {
        &mut self.client
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &ConsumerConfig {
        self.client.config()
    }

    /// Replaces the configuration and resets the cursor.
    pub fn configure(&mut self, config: ConsumerConfig) {
        self.client.configure(config);
    }

    /// Builds the body sent on create and update.
    ///
    /// The payload holds `id` and every public declared field. Private
    /// fields, fields whose name starts with
    /// [`RESERVED_PREFIX`](crate::rest::RESERVED_PREFIX) and undeclared keys
    /// are left out. A related instance is sent as its id.
    #[must_use]
    pub fn build_payload(&self) -> Map<String, Value> {
        let mut payload = Map::new();
        payload.insert(
            ID_FIELD.to_string(),
            self.values
                .get(ID_FIELD)
                .map_or_else(|| Value::from(0), FieldValue::to_json),
        );

        for field in self.ty.public_fields() {
            if let Some(value) = self.values.get(field.name()) {
                payload.insert(field.name().to_string(), value.to_json());
            }
        }

        payload
    }

    /// Loads a record into the instance.
    ///
    /// Each value is coerced to the declared kind of its field; an object
    /// received for a relation becomes a nested instance of the related
    /// type. Keys the type does not declare are kept raw.
    ///
    /// Returns `true` if the instance now matches the record on every key.
    /// On `false` the assignments made so far are kept.
    pub fn hydrate(&mut self, record: &Map<String, Value>) -> bool {
        for (key, value) in record {
            match self.ty.kind_of(key) {
                Some(kind) => {
                    let coerced = self.coerce(kind, value);
                    self.values.insert(key.clone(), coerced);
                }
                None => {
                    self.extra.insert(key.clone(), value.clone());
                }
            }
        }

        let up_to_date = self.is_up_to_date(record);
        if !up_to_date {
            tracing::debug!(resource = %self.name, id = self.id(), "Hydrated record is not up to date");
        }
        up_to_date
    }

    fn coerce(&self, kind: FieldKind, value: &Value) -> FieldValue {
        if let (FieldKind::Relation(related), Value::Object(record)) = (kind, value) {
            let mut nested = self.spawn(related, related.name().to_string());
            nested.hydrate(record);
            return FieldValue::Resource(Box::new(nested));
        }

        kind.coerce(value)
            .unwrap_or_else(|| FieldValue::Json(value.clone()))
    }

    /// Returns `true` if every key of `record` matches what the instance holds.
    #[must_use]
    pub fn is_up_to_date(&self, record: &Map<String, Value>) -> bool {
        record.iter().all(|(key, incoming)| {
            self.values.get(key).map_or_else(
                || self.extra.get(key) == Some(incoming),
                |value| value.matches(incoming),
            )
        })
    }

    /// Hydrates from an operation's response body, if it holds a record.
    fn absorb(&mut self, body: &Value) {
        if !is_truthy(body) {
            return;
        }
        match body.as_object() {
            Some(record) => {
                self.hydrate(record);
            }
            None => {
                tracing::debug!(resource = %self.name, "Response body is not a record, not hydrating");
            }
        }
    }

    /// Stores the instance: creates it when `id == 0`, updates it otherwise.
    ///
    /// The instance is refreshed from the response body. When a payload log
    /// directory is configured, the payload is appended to
    /// `{dir}/{YYYY-MM-DD}-{resource}.log`.
    ///
    /// Returns the response body (`None` when an update was skipped).
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Remote`] if the API rejects the record; the
    /// error carries the response body.
    pub async fn save(&mut self) -> Result<Option<Value>, ResourceError> {
        let response = if self.id() == 0 {
            let payload = Value::Object(self.build_payload());
            let created = self.client.create(&self.name, payload, &[]).await?;
            self.absorb(&created);
            Some(created)
        } else {
            self.update().await?
        };

        self.write_payload_log().await;
        Ok(response)
    }

    /// Partially updates the stored record (PATCH) and refreshes the
    /// instance from the response.
    ///
    /// Returns `Ok(None)` without a request when `id == 0`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Remote`] if the API rejects the update.
    pub async fn update(&mut self) -> Result<Option<Value>, ResourceError> {
        let payload = Value::Object(self.build_payload());
        let response = self.client.update(&self.name, payload, &[]).await?;
        if let Some(body) = &response {
            self.absorb(body);
        }
        Ok(response)
    }

    /// Replaces the stored record (PUT) and refreshes the instance from the
    /// response.
    ///
    /// Returns `Ok(None)` without a request when `id == 0`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Remote`] if the API rejects the record.
    pub async fn replace(&mut self) -> Result<Option<Value>, ResourceError> {
        let payload = Value::Object(self.build_payload());
        let response = self.client.replace(&self.name, payload, &[]).await?;
        if let Some(body) = &response {
            self.absorb(body);
        }
        Ok(response)
    }

    /// Loads the record `id`, or the instance's own id when `id` is `None`
    /// or `0`.
    ///
    /// Returns whether the instance matches the record afterwards (see
    /// [`hydrate`](Self::hydrate)).
    ///
    /// # Errors
    ///
    /// - [`ResourceError::MissingIdentifier`] if there is no id to load
    ///   (no request is made)
    /// - [`ResourceError::Remote`] if the status is not 200; the instance is
    ///   left untouched
    /// - [`ResourceError::RemoteFetch`] if the API returns an empty body
    /// - [`ResourceError::UnexpectedPayload`] if the body is not an object
    pub async fn get(&mut self, id: Option<u64>) -> Result<bool, ResourceError> {
        let id = match id.filter(|id| *id != 0) {
            Some(id) => id,
            None => match self.id() {
                0 => {
                    return Err(ResourceError::MissingIdentifier {
                        resource: self.name.clone(),
                    })
                }
                own => own,
            },
        };

        let record = self.client.get_one(&self.name, id, &[]).await?;
        if !is_truthy(&record) {
            tracing::warn!(resource = %self.name, id, "Empty record returned");
            return Err(ResourceError::RemoteFetch {
                resource: self.name.clone(),
                id,
            });
        }
        let Value::Object(record) = record else {
            return Err(ResourceError::UnexpectedPayload {
                resource: self.name.clone(),
                reason: "expected a JSON object".to_string(),
            });
        };

        Ok(self.hydrate(&record))
    }

    /// Deletes the stored record.
    ///
    /// Returns `Ok(false)` without a request when `id == 0`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Remote`] for any status other than 204.
    pub async fn remove(&self) -> Result<bool, ResourceError> {
        let mut payload = Map::new();
        payload.insert(
            ID_FIELD.to_string(),
            self.values
                .get(ID_FIELD)
                .map_or_else(|| Value::from(0), FieldValue::to_json),
        );
        self.client
            .remove(&self.name, Value::Object(payload), &[])
            .await
    }

    /// Builds a new instance from a raw record.
    ///
    /// The instance is of type `ty` (this instance's type and name when
    /// `None`), shares this instance's configuration and has its own cursor.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::InvalidResourceType`] if `ty` fails validation
    /// - [`ResourceError::UnexpectedPayload`] if `record` is not an object
    pub fn factory(
        &self,
        record: &Value,
        ty: Option<&'static ResourceType>,
    ) -> Result<Self, ResourceError> {
        let (ty, name) = match ty {
            Some(ty) => {
                ty.validate()?;
                (ty, ty.name().to_string())
            }
            None => (self.ty, self.name.clone()),
        };

        let Some(record) = record.as_object() else {
            return Err(ResourceError::UnexpectedPayload {
                resource: name,
                reason: "record is not a JSON object".to_string(),
            });
        };

        let mut instance = self.spawn(ty, name);
        instance.hydrate(record);
        Ok(instance)
    }

    /// Builds one instance per record, in order.
    ///
    /// # Errors
    ///
    /// Fails like [`factory`](Self::factory) on the first bad record.
    pub fn factory_list(
        &self,
        records: &[Value],
        ty: Option<&'static ResourceType>,
    ) -> Result<Vec<Self>, ResourceError> {
        records
            .iter()
            .map(|record| self.factory(record, ty))
            .collect()
    }

    /// Lists records of `ty` (or of this instance's collection).
    ///
    /// With `limit == 0` one page is fetched. Otherwise pages are followed
    /// until `limit` records are gathered or the collection ends, and the
    /// result is cut to `limit`.
    ///
    /// With a `ty` and at least one record the records are turned into
    /// instances: [`QueryResult::One`] for `limit == 1`,
    /// [`QueryResult::Many`] otherwise. All other cases yield
    /// [`QueryResult::Records`].
    ///
    /// # Errors
    ///
    /// Returns any error of [`RestClient::list`], or
    /// [`ResourceError::InvalidResourceType`] if `ty` fails validation.
    pub async fn query(
        &mut self,
        options: &[&str],
        limit: usize,
        ty: Option<&'static ResourceType>,
    ) -> Result<QueryResult, ResourceError> {
        let name = match ty {
            Some(ty) => {
                ty.validate()?;
                ty.name().to_string()
            }
            None => self.name.clone(),
        };

        let mut records = self.client.list(&name, options, Page::First).await?;
        if limit > 0 {
            while records.len() < limit && self.client.cursor().has_next() {
                let page = self.client.list(&name, &[], Page::Next).await?;
                records.extend(page);
            }
            records.truncate(limit);
        }
        tracing::debug!(resource = %name, limit, count = records.len(), "Query complete");

        match ty {
            Some(ty) if !records.is_empty() => {
                if limit == 1 {
                    Ok(QueryResult::One(self.factory(&records[0], Some(ty))?))
                } else {
                    Ok(QueryResult::Many(self.factory_list(&records, Some(ty))?))
                }
            }
            _ => Ok(QueryResult::Records(records)),
        }
    }

    /// Replaces the id held by `attribute` with the record it points to,
    /// loaded through `related`.
    ///
    /// Returns whether `related` matched the loaded record.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::RelationResolution`] if `attribute` is not a
    ///   declared field holding a non-negative integer, or if `related` is
    ///   not of the attribute's relation type
    /// - any error of [`get`](Self::get) on `related`
    pub async fn id_to_object(
        &mut self,
        attribute: &str,
        mut related: Self,
    ) -> Result<bool, ResourceError> {
        if attribute == ID_FIELD {
            return Err(self.relation_error(attribute, "the id field cannot hold an instance"));
        }
        let Some(kind) = self.ty.kind_of(attribute) else {
            return Err(self.relation_error(attribute, "not a declared field"));
        };
        if let Some(expected) = kind.related() {
            if expected.name() != related.resource_type().name() {
                return Err(self.relation_error(
                    attribute,
                    format!(
                        "expected a {expected} instance, got {}",
                        related.resource_type()
                    ),
                ));
            }
        }

        let id = match self.values.get(attribute) {
            Some(FieldValue::Int(id)) => u64::try_from(*id).ok(),
            _ => None,
        };
        let Some(id) = id else {
            return Err(self.relation_error(attribute, "attribute does not hold an id"));
        };

        let up_to_date = related.get(Some(id)).await?;
        self.values
            .insert(attribute.to_string(), FieldValue::Resource(Box::new(related)));
        Ok(up_to_date)
    }

    /// Replaces the instance held by `attribute` with its id.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::RelationResolution`] if `attribute` does not
    /// hold an instance.
    pub fn object_to_id(&mut self, attribute: &str) -> Result<(), ResourceError> {
        let Some(FieldValue::Resource(related)) = self.values.get(attribute) else {
            return Err(self.relation_error(attribute, "attribute does not hold an instance"));
        };

        let id = related
            .value(ID_FIELD)
            .cloned()
            .unwrap_or(FieldValue::Int(0));
        self.values.insert(attribute.to_string(), id);
        Ok(())
    }

    fn relation_error(&self, attribute: &str, reason: impl Into<String>) -> ResourceError {
        ResourceError::RelationResolution {
            resource: self.name.clone(),
            attribute: attribute.to_string(),
            reason: reason.into(),
        }
    }

    async fn write_payload_log(&self) {
        let Some(dir) = self.config().payload_log_dir() else {
            return;
        };

        let path = dir.join(format!(
            "{}-{}.log",
            Local::now().format("%Y-%m-%d"),
            self.name
        ));
        let line = Value::Object(self.build_payload()).to_string();

        match append_line(dir, &path, &line).await {
            Ok(()) => tracing::debug!(path = %path.display(), "Payload logged"),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to write payload log");
            }
        }
    }
}

/// Appends `line` to the file at `path`, creating `dir` first.
async fn append_line(dir: &Path, path: &Path, line: &str) -> io::Result<()> {
    fs::create_dir_all(dir).await?;
    let mut file = OpenOptions::new().create(true).append(true).open(path).await?;
    file.write_all(format!("{line}\n").as_bytes()).await?;
    file.flush().await
}

impl PartialEq for Resource {
    fn eq(&self, other: &Self) -> bool {
        self.ty == other.ty
            && self.name == other.name
            && self.values == other.values
            && self.extra == other.extra
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.client)
    }
}
