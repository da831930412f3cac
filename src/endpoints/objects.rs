//! Object management: create, update, look up and query the object records
//! an account keeps in the cloud.
//!
//! An object is the service's core noun; a device, a tag, a pallet,
//! anything worth tracking. Records carry two identifiers: the
//! system-assigned `urn` minted on creation and the developer-assigned
//! `objectUrn` chosen by the integrator. Lookups exist for both.

use core::fmt::Write;

use heapless::{String, Vec};
use serde::{Deserialize, Serialize};

use crate::client::{
    Config, Error, QueryString, RequestOptions, RestClient, StatusCarrier, impl_status_carrier,
    status,
};
use crate::network::Connect;
use crate::network::http::Method;
use crate::types::{MAX_MESSAGE_LEN, MAX_URN_LEN, Urn, ViewType};

use super::MAX_SUB_PATH_LEN;

/// Maximum length of an object `type` field.
pub const MAX_TYPE_LEN: usize = 255;

/// Maximum length of an object `name` field.
pub const MAX_NAME_LEN: usize = 255;

/// Maximum length of an object `description` field.
pub const MAX_DESCRIPTION_LEN: usize = 1024;

/// Maximum length of an object `moniker` field.
pub const MAX_MONIKER_LEN: usize = 2048;

/// Maximum number of records a query response can carry.
pub const MAX_QUERY_RESULTS: usize = 4;

/// Outcome of one object management call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectActionResult {
    /// The service accepted the operation.
    Successful,
    /// The operation failed: locally rejected input, transport trouble or
    /// a non-success status. Details only reach the diagnostic log.
    Failed,
}

#[cfg(feature = "defmt")]
impl defmt::Format for ObjectActionResult {
    fn format(&self, f: defmt::Formatter) {
        match self {
            ObjectActionResult::Successful => defmt::write!(f, "Successful"),
            ObjectActionResult::Failed => defmt::write!(f, "Failed"),
        }
    }
}

/// Request payload for [`ObjectManagementEndpoint::create`].
///
/// `object_type` and `name` are required; everything else may stay unset.
/// Field capacities mirror the service's documented length limits, so any
/// value that fits is within contract. The service mints the
/// system-assigned URN; a developer-assigned `object_urn` may be supplied
/// and must then be well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewObjectRequest {
    /// Developer-assigned URN for the new object.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_urn: Option<Urn>,
    /// Required object type, e.g. `"thermostat"`.
    #[serde(rename = "type")]
    pub object_type: String<MAX_TYPE_LEN>,
    /// Required display name.
    pub name: String<MAX_NAME_LEN>,
    /// Free-text description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String<MAX_DESCRIPTION_LEN>>,
    /// Developer-defined moniker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moniker: Option<String<MAX_MONIKER_LEN>>,
    /// Whether the object starts out active. Defaults to `true`.
    pub active_flag: bool,
}

impl NewObjectRequest {
    /// Whether the payload satisfies the service's required-field rules.
    pub fn is_valid(&self) -> bool {
        !self.object_type.is_empty()
            && !self.name.is_empty()
            && self.object_urn.as_ref().is_none_or(Urn::is_valid)
    }
}

impl Default for NewObjectRequest {
    fn default() -> Self {
        Self {
            object_urn: None,
            object_type: String::new(),
            name: String::new(),
            description: None,
            moniker: None,
            active_flag: true,
        }
    }
}

/// Request payload for [`ObjectManagementEndpoint::update`].
///
/// `urn` names the record to change; only the fields that are set are
/// altered.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectUpdateRequest {
    /// System-assigned URN of the object to update.
    pub urn: Urn,
    /// New object type.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String<MAX_TYPE_LEN>>,
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String<MAX_NAME_LEN>>,
    /// New description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String<MAX_DESCRIPTION_LEN>>,
    /// New moniker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moniker: Option<String<MAX_MONIKER_LEN>>,
    /// New active state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_flag: Option<bool>,
}

impl ObjectUpdateRequest {
    /// Whether the payload names a well-formed record URN.
    pub fn is_valid(&self) -> bool {
        self.urn.is_valid()
    }
}

/// Response envelope for create and update.
///
/// On a successful create, `message` carries the system-assigned URN and
/// [`object_urn`](Self::object_urn) holds its parsed form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectManagementResponse {
    /// HTTP status code observed on the exchange.
    #[serde(skip)]
    pub http_status_code: u16,
    /// Service-specific result code.
    #[serde(default)]
    pub code: Option<i32>,
    /// Human-oriented message.
    #[serde(default)]
    pub message: String<MAX_MESSAGE_LEN>,
    /// URN extracted from `message` when a create succeeded.
    #[serde(skip)]
    pub object_urn: Option<Urn>,
}

/// One object record, as returned by lookups and queries.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectDataResponse {
    /// HTTP status code observed on the exchange.
    #[serde(skip)]
    pub http_status_code: u16,
    /// System-assigned URN.
    #[serde(default)]
    pub urn: Urn,
    /// Developer-assigned URN.
    #[serde(default)]
    pub object_urn: Urn,
    /// Object type.
    #[serde(rename = "type", default)]
    pub object_type: String<MAX_TYPE_LEN>,
    /// Display name.
    #[serde(default)]
    pub name: String<MAX_NAME_LEN>,
    /// Free-text description.
    #[serde(default)]
    pub description: String<MAX_DESCRIPTION_LEN>,
    /// Developer-defined moniker.
    #[serde(default)]
    pub moniker: String<MAX_MONIKER_LEN>,
    /// Whether the object is active.
    #[serde(default)]
    pub active_flag: bool,
    /// Milliseconds since the epoch of the last modification.
    #[serde(default)]
    pub last_modified_timestamp: Option<i64>,
    /// Result code when the body is the error envelope.
    #[serde(default)]
    pub code: Option<i32>,
    /// Message when the body is the error envelope.
    #[serde(default)]
    pub message: String<MAX_MESSAGE_LEN>,
}

/// Filters for [`ObjectManagementEndpoint::query`]. Empty strings mean
/// "not filtered" and are left out of the query string.
#[derive(Debug, Clone, Default)]
pub struct QueryObjectsRequest {
    /// Starts-with filter on developer-assigned URNs.
    pub object_urn_like: String<MAX_URN_LEN>,
    /// Exact object type to match.
    pub object_type: String<MAX_TYPE_LEN>,
    /// Starts-with filter on display names.
    pub name_like: String<MAX_NAME_LEN>,
    /// Starts-with filter on monikers.
    pub moniker_like: String<MAX_MONIKER_LEN>,
    /// Only records modified after this milliseconds-since-epoch instant.
    pub modified_after: Option<i64>,
    /// Response shaping.
    pub view: ViewType,
}

/// The bare JSON array a query answers with.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(transparent)]
pub struct QueryObjectsResponse {
    /// The matching records, at most [`MAX_QUERY_RESULTS`] of them.
    pub objects: Vec<ObjectDataResponse, MAX_QUERY_RESULTS>,
    /// HTTP status code observed on the exchange.
    #[serde(skip)]
    pub http_status_code: u16,
}

impl StatusCarrier for QueryObjectsResponse {
    fn set_status_code(&mut self, code: u16) {
        self.http_status_code = code;
        for object in &mut self.objects {
            object.set_status_code(code);
        }
    }

    fn status_code(&self) -> u16 {
        self.http_status_code
    }
}

impl_status_carrier!(ObjectManagementResponse, ObjectDataResponse);

/// Client for the object management resource family.
#[derive(Debug)]
pub struct ObjectManagementEndpoint<N: Connect> {
    client: RestClient<N>,
}

impl<N: Connect> ObjectManagementEndpoint<N> {
    /// Build an endpoint from a connector and configuration; normally done
    /// through [`EndpointFactory`](crate::factory::EndpointFactory).
    pub fn new(network: N, config: Config) -> Self {
        Self {
            client: RestClient::new(network, config),
        }
    }

    /// Create a new object with `PUT /objects`.
    ///
    /// On success the returned response carries the system-assigned URN in
    /// [`object_urn`](ObjectManagementResponse::object_urn). An invalid
    /// request fails locally without a network call.
    pub fn create(
        &mut self,
        request: &NewObjectRequest,
    ) -> (ObjectActionResult, Option<ObjectManagementResponse>) {
        if !request.is_valid() {
            #[cfg(feature = "defmt")]
            defmt::error!("object create: request data is invalid");
            return (ObjectActionResult::Failed, None);
        }
        self.try_create(request).unwrap_or_else(|_e| {
            #[cfg(feature = "defmt")]
            defmt::error!("object create: {}", _e);
            (ObjectActionResult::Failed, None)
        })
    }

    fn try_create(
        &mut self,
        request: &NewObjectRequest,
    ) -> Result<(ObjectActionResult, Option<ObjectManagementResponse>), Error> {
        let (status, mut response) = self.client.execute::<_, ObjectManagementResponse>(
            Method::Put,
            "/objects",
            RequestOptions::AUTHORIZATION,
            Some(request),
        )?;
        let result = match (status, response.as_mut()) {
            (status::CREATED | status::OK, Some(data)) => {
                data.object_urn = Some(Urn::new(&data.message));
                ObjectActionResult::Successful
            }
            _ => ObjectActionResult::Failed,
        };
        Ok((result, response))
    }

    /// Update an existing object with `POST /objects`.
    ///
    /// The service answers `204 No Content` on success, so the returned
    /// response is `None` unless something went wrong enough to produce a
    /// body.
    pub fn update(
        &mut self,
        request: &ObjectUpdateRequest,
    ) -> (ObjectActionResult, Option<ObjectManagementResponse>) {
        if !request.is_valid() {
            #[cfg(feature = "defmt")]
            defmt::error!("object update: request data is invalid");
            return (ObjectActionResult::Failed, None);
        }
        self.try_update(request).unwrap_or_else(|_e| {
            #[cfg(feature = "defmt")]
            defmt::error!("object update: {}", _e);
            (ObjectActionResult::Failed, None)
        })
    }

    fn try_update(
        &mut self,
        request: &ObjectUpdateRequest,
    ) -> Result<(ObjectActionResult, Option<ObjectManagementResponse>), Error> {
        let (status, response) = self.client.execute::<_, ObjectManagementResponse>(
            Method::Post,
            "/objects",
            RequestOptions::AUTHORIZATION,
            Some(request),
        )?;
        let result = match status {
            status::NO_CONTENT => ObjectActionResult::Successful,
            _ => ObjectActionResult::Failed,
        };
        Ok((result, response))
    }

    /// Look an object up by its system-assigned URN with
    /// `GET /objects/{urn}`.
    pub fn lookup(
        &mut self,
        urn: &Urn,
        view: ViewType,
    ) -> (ObjectActionResult, Option<ObjectDataResponse>) {
        if !urn.is_valid() {
            #[cfg(feature = "defmt")]
            defmt::error!("object lookup: urn is not valid");
            return (ObjectActionResult::Failed, None);
        }
        self.try_lookup(urn, view, None).unwrap_or_else(|_e| {
            #[cfg(feature = "defmt")]
            defmt::error!("object lookup: {}", _e);
            (ObjectActionResult::Failed, None)
        })
    }

    /// Look an object up by its developer-assigned URN with
    /// `GET /objects/{objectUrn}?exact=`.
    ///
    /// With `exact` off, the service performs a starts-with match and
    /// returns the first hit.
    pub fn lookup_by_object_urn(
        &mut self,
        object_urn: &Urn,
        view: ViewType,
        exact: bool,
    ) -> (ObjectActionResult, Option<ObjectDataResponse>) {
        if !object_urn.is_valid() {
            #[cfg(feature = "defmt")]
            defmt::error!("object lookup: object urn is not valid");
            return (ObjectActionResult::Failed, None);
        }
        self.try_lookup(object_urn, view, Some(exact))
            .unwrap_or_else(|_e| {
                #[cfg(feature = "defmt")]
                defmt::error!("object lookup: {}", _e);
                (ObjectActionResult::Failed, None)
            })
    }

    fn try_lookup(
        &mut self,
        urn: &Urn,
        view: ViewType,
        exact: Option<bool>,
    ) -> Result<(ObjectActionResult, Option<ObjectDataResponse>), Error> {
        let mut query = QueryString::new();
        query.append("view", view.as_str())?;
        if let Some(exact) = exact {
            query.append("exact", if exact { "true" } else { "false" })?;
        }

        let mut path: String<MAX_SUB_PATH_LEN> = String::new();
        write!(path, "/objects/{}{}", urn, query.as_str()).map_err(|_| Error::Encode)?;

        let (status, response) = self.client.execute::<(), ObjectDataResponse>(
            Method::Get,
            &path,
            RequestOptions::AUTHORIZATION,
            None,
        )?;
        let result = match (status, &response) {
            (status::OK, Some(_)) => ObjectActionResult::Successful,
            _ => ObjectActionResult::Failed,
        };
        Ok((result, response))
    }

    /// Query objects by filter with `GET /objects?…`.
    ///
    /// Empty filters are omitted from the query string. A `204` answer
    /// means "no matches" and is still a success, with no response body.
    pub fn query(
        &mut self,
        request: &QueryObjectsRequest,
    ) -> (ObjectActionResult, Option<QueryObjectsResponse>) {
        self.try_query(request).unwrap_or_else(|_e| {
            #[cfg(feature = "defmt")]
            defmt::error!("object query: {}", _e);
            (ObjectActionResult::Failed, None)
        })
    }

    fn try_query(
        &mut self,
        request: &QueryObjectsRequest,
    ) -> Result<(ObjectActionResult, Option<QueryObjectsResponse>), Error> {
        let mut query = QueryString::new();
        query.append("objectUrnLike", &request.object_urn_like)?;
        query.append("type", &request.object_type)?;
        query.append("nameLike", &request.name_like)?;
        query.append("monikerLike", &request.moniker_like)?;
        if let Some(instant) = request.modified_after {
            let mut value: String<20> = String::new();
            write!(value, "{}", instant).map_err(|_| Error::Encode)?;
            query.append("modifiedAfter", &value)?;
        }
        query.append("view", request.view.as_str())?;

        let mut path: String<MAX_SUB_PATH_LEN> = String::new();
        write!(path, "/objects{}", query.as_str()).map_err(|_| Error::Encode)?;

        let (status, response) = self.client.execute::<(), QueryObjectsResponse>(
            Method::Get,
            &path,
            RequestOptions::AUTHORIZATION,
            None,
        )?;
        let result = match status {
            status::OK | status::NO_CONTENT => ObjectActionResult::Successful,
            _ => ObjectActionResult::Failed,
        };
        Ok((result, response))
    }
}
