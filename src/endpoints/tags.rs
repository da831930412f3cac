//! Tag metadata and verification batches.
//!
//! Tags are physical RFID/NFC inlays identified by a hex tag ID. Both
//! operations are batched: one request carries up to [`MAX_TAG_BATCH`]
//! IDs, and the response is a record per tag. Callers with more tags than
//! that split their batches; the original service accepts far larger ones,
//! but a fixed batch keeps the buffers predictable here.

use heapless::{String, Vec};
use serde::{Deserialize, Serialize};

use crate::client::{Config, Error, RequestOptions, RestClient, StatusCarrier, status};
use crate::network::Connect;
use crate::network::http::Method;

/// Maximum length of a tag ID.
pub const MAX_TAG_ID_LEN: usize = 64;

/// Maximum number of tags per request and of records per response.
pub const MAX_TAG_BATCH: usize = 32;

/// Maximum number of property types per metadata request.
pub const MAX_PROPERTY_TYPES: usize = 8;

/// Maximum length of a property type name.
pub const MAX_PROPERTY_TYPE_LEN: usize = 64;

/// Maximum length of a property value.
pub const MAX_PROPERTY_VALUE_LEN: usize = 128;

/// Maximum length of a verification type name.
pub const MAX_VERIFICATION_TYPE_LEN: usize = 32;

/// One tag identifier, as printed on or read from the inlay.
pub type TagId = String<MAX_TAG_ID_LEN>;

/// Outcome of one tag call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagActionResult {
    /// The service accepted the operation.
    Successful,
    /// The operation failed: locally rejected input, transport trouble or
    /// a non-success status. Details only reach the diagnostic log.
    Failed,
}

#[cfg(feature = "defmt")]
impl defmt::Format for TagActionResult {
    fn format(&self, f: defmt::Formatter) {
        match self {
            TagActionResult::Successful => defmt::write!(f, "Successful"),
            TagActionResult::Failed => defmt::write!(f, "Failed"),
        }
    }
}

/// Request payload for [`TagEndpoint::tag_metadata`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagMetadataRequest {
    /// The tags to look up. Must not be empty.
    pub tag_ids: Vec<TagId, MAX_TAG_BATCH>,
    /// The properties to retrieve for each tag, e.g. `"tagCode"`.
    pub property_types: Vec<String<MAX_PROPERTY_TYPE_LEN>, MAX_PROPERTY_TYPES>,
}

impl TagMetadataRequest {
    /// Whether the payload satisfies the service's required-field rules.
    pub fn is_valid(&self) -> bool {
        !self.tag_ids.is_empty()
    }
}

/// One property value record of a metadata response.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagPropertyRecord {
    /// The tag the record belongs to.
    #[serde(default)]
    pub tag_id: TagId,
    /// The property type.
    #[serde(default)]
    pub property_type: String<MAX_PROPERTY_TYPE_LEN>,
    /// The property value, as a string.
    #[serde(default)]
    pub value: String<MAX_PROPERTY_VALUE_LEN>,
}

/// The bare JSON array a metadata request answers with.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(transparent)]
pub struct TagMetadataResponse {
    /// One record per tag and property.
    pub records: Vec<TagPropertyRecord, MAX_TAG_BATCH>,
    /// HTTP status code observed on the exchange.
    #[serde(skip)]
    pub http_status_code: u16,
}

/// Request payload for [`TagEndpoint::verify_tags`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagVerificationRequest {
    /// The tags to verify. Must not be empty.
    pub tag_ids: Vec<TagId, MAX_TAG_BATCH>,
    /// The verification program to run, e.g. `"RR"`.
    pub verification_type: String<MAX_VERIFICATION_TYPE_LEN>,
}

impl TagVerificationRequest {
    /// Whether the payload satisfies the service's required-field rules.
    pub fn is_valid(&self) -> bool {
        !self.tag_ids.is_empty() && !self.verification_type.is_empty()
    }
}

/// One verification state record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagVerificationRecord {
    /// The tag the record belongs to.
    #[serde(default)]
    pub tag_id: TagId,
    /// Verification state code; `0` means verified.
    #[serde(default)]
    pub state: i32,
}

/// The bare JSON array a verification request answers with.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(transparent)]
pub struct TagVerificationResponse {
    /// One record per tag.
    pub records: Vec<TagVerificationRecord, MAX_TAG_BATCH>,
    /// HTTP status code observed on the exchange.
    #[serde(skip)]
    pub http_status_code: u16,
}

impl StatusCarrier for TagMetadataResponse {
    fn set_status_code(&mut self, code: u16) {
        self.http_status_code = code;
    }

    fn status_code(&self) -> u16 {
        self.http_status_code
    }
}

impl StatusCarrier for TagVerificationResponse {
    fn set_status_code(&mut self, code: u16) {
        self.http_status_code = code;
    }

    fn status_code(&self) -> u16 {
        self.http_status_code
    }
}

/// Client for the tag resource family.
#[derive(Debug)]
pub struct TagEndpoint<N: Connect> {
    client: RestClient<N>,
}

impl<N: Connect> TagEndpoint<N> {
    /// Build an endpoint from a connector and configuration; normally done
    /// through [`EndpointFactory`](crate::factory::EndpointFactory).
    pub fn new(network: N, config: Config) -> Self {
        Self {
            client: RestClient::new(network, config),
        }
    }

    /// Retrieve property values for a batch of tags with
    /// `POST /tag/properties`.
    pub fn tag_metadata(
        &mut self,
        request: &TagMetadataRequest,
    ) -> (TagActionResult, Option<TagMetadataResponse>) {
        if !request.is_valid() {
            #[cfg(feature = "defmt")]
            defmt::error!("tag metadata: request data is invalid");
            return (TagActionResult::Failed, None);
        }
        self.try_tag_metadata(request).unwrap_or_else(|_e| {
            #[cfg(feature = "defmt")]
            defmt::error!("tag metadata: {}", _e);
            (TagActionResult::Failed, None)
        })
    }

    fn try_tag_metadata(
        &mut self,
        request: &TagMetadataRequest,
    ) -> Result<(TagActionResult, Option<TagMetadataResponse>), Error> {
        let (status, response) = self.client.execute::<_, TagMetadataResponse>(
            Method::Post,
            "/tag/properties",
            RequestOptions::AUTHORIZATION,
            Some(request),
        )?;
        let result = match (status, &response) {
            (status::OK, Some(_)) => TagActionResult::Successful,
            _ => TagActionResult::Failed,
        };
        Ok((result, response))
    }

    /// Run a verification program over a batch of tags with
    /// `POST /tag/verify`.
    pub fn verify_tags(
        &mut self,
        request: &TagVerificationRequest,
    ) -> (TagActionResult, Option<TagVerificationResponse>) {
        if !request.is_valid() {
            #[cfg(feature = "defmt")]
            defmt::error!("tag verification: request data is invalid");
            return (TagActionResult::Failed, None);
        }
        self.try_verify_tags(request).unwrap_or_else(|_e| {
            #[cfg(feature = "defmt")]
            defmt::error!("tag verification: {}", _e);
            (TagActionResult::Failed, None)
        })
    }

    fn try_verify_tags(
        &mut self,
        request: &TagVerificationRequest,
    ) -> Result<(TagActionResult, Option<TagVerificationResponse>), Error> {
        let (status, response) = self.client.execute::<_, TagVerificationResponse>(
            Method::Post,
            "/tag/verify",
            RequestOptions::AUTHORIZATION,
            Some(request),
        )?;
        let result = match (status, &response) {
            (status::OK, Some(_)) => TagActionResult::Successful,
            _ => TagActionResult::Failed,
        };
        Ok((result, response))
    }
}
