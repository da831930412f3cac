//! File management: definitions, uploads, content retrieval and deletion.
//!
//! Files live in two steps: [`define`](FileEndpoint::define) creates the
//! metadata record and yields the file URN, then one of the upload
//! operations pushes the actual bytes. Content comes back verbatim with
//! the original filename recovered from the `Content-Disposition` header,
//! and deletion is only trusted when the service confirms it with a
//! `SmartCosmos-Event: FileDeleted` header.

use core::fmt::Write;

use heapless::{String, Vec};
use serde::{Deserialize, Serialize};

use crate::client::{
    Config, Error, QueryString, RawBody, RequestOptions, RestClient, StatusCarrier,
    decode_response, impl_status_carrier, status,
};
use crate::network::Connect;
use crate::network::http::{MAX_BODY_LEN, Method};
use crate::types::{EntityReferenceType, MAX_MESSAGE_LEN, Urn, ViewType};

use super::MAX_SUB_PATH_LEN;

/// Maximum length of a MIME type.
pub const MAX_MIME_TYPE_LEN: usize = 128;

/// Maximum length of a filename.
pub const MAX_FILENAME_LEN: usize = 128;

/// Maximum length of a `SmartCosmos-Event` header value.
pub const MAX_EVENT_LEN: usize = 64;

/// Maximum number of definitions a related-files response can carry.
pub const MAX_RELATED_FILES: usize = 8;

/// Capacity of an assembled multipart body.
pub const MAX_MULTIPART_LEN: usize = 4096;

/// Boundary used for multipart uploads. Fixed, since the SDK controls the
/// whole body; it must never occur inside the uploaded bytes.
pub const MULTIPART_BOUNDARY: &str = "smartcosmos-sdk-boundary";

/// Content type of raw upload bodies and of the file part inside a
/// multipart upload.
const CONTENT_TYPE_OCTET_STREAM: &str = "application/octet-stream";

/// Capacity of a `multipart/form-data; boundary=…` content type value.
const MAX_MULTIPART_CONTENT_TYPE_LEN: usize = 80;

/// Outcome of one file management call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileActionResult {
    /// The service accepted the operation.
    Successful,
    /// The operation failed: locally rejected input, transport trouble or
    /// a non-success status. Details only reach the diagnostic log.
    Failed,
    /// An upload collided with content that already exists (HTTP 409).
    Conflict,
}

#[cfg(feature = "defmt")]
impl defmt::Format for FileActionResult {
    fn format(&self, f: defmt::Formatter) {
        match self {
            FileActionResult::Successful => defmt::write!(f, "Successful"),
            FileActionResult::Failed => defmt::write!(f, "Failed"),
            FileActionResult::Conflict => defmt::write!(f, "Conflict"),
        }
    }
}

/// Request payload for [`FileEndpoint::define`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDefinitionRequest {
    /// What kind of entity the file hangs off.
    pub entity_reference_type: EntityReferenceType,
    /// URN of that entity.
    pub reference_urn: Urn,
    /// MIME type of the content that will be uploaded.
    pub mime_type: String<MAX_MIME_TYPE_LEN>,
}

impl FileDefinitionRequest {
    /// Whether the payload satisfies the service's required-field rules.
    pub fn is_valid(&self) -> bool {
        self.reference_urn.is_valid() && !self.mime_type.is_empty()
    }
}

/// Response envelope for [`FileEndpoint::define`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDefinitionResponse {
    /// HTTP status code observed on the exchange.
    #[serde(skip)]
    pub http_status_code: u16,
    /// Service-specific result code.
    #[serde(default)]
    pub code: Option<i32>,
    /// Human-oriented message.
    #[serde(default)]
    pub message: String<MAX_MESSAGE_LEN>,
    /// URN extracted from `message` when the definition was created.
    #[serde(skip)]
    pub file_urn: Option<Urn>,
}

/// Response envelope for both upload transports.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileUploadResponse {
    /// HTTP status code observed on the exchange.
    #[serde(skip)]
    pub http_status_code: u16,
    /// Service-specific result code.
    #[serde(default)]
    pub code: Option<i32>,
    /// Human-oriented message.
    #[serde(default)]
    pub message: String<MAX_MESSAGE_LEN>,
}

/// One file definition record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDefinitionRetrievalResponse {
    /// HTTP status code observed on the exchange.
    #[serde(skip)]
    pub http_status_code: u16,
    /// System-assigned URN of the file.
    #[serde(default)]
    pub urn: Urn,
    /// What kind of entity the file hangs off.
    #[serde(default)]
    pub entity_reference_type: EntityReferenceType,
    /// URN of that entity.
    #[serde(default)]
    pub reference_urn: Urn,
    /// MIME type of the stored content.
    #[serde(default)]
    pub mime_type: String<MAX_MIME_TYPE_LEN>,
    /// Filename recorded at upload time.
    #[serde(default)]
    pub file_name: Option<String<MAX_FILENAME_LEN>>,
    /// Milliseconds since the epoch of the last modification.
    #[serde(default)]
    pub last_modified_timestamp: Option<i64>,
    /// Result code when the body is the error envelope.
    #[serde(default)]
    pub code: Option<i32>,
    /// Message when the body is the error envelope.
    #[serde(default)]
    pub message: String<MAX_MESSAGE_LEN>,
    /// Value of the `SmartCosmos-Event` response header, when present.
    #[serde(skip)]
    pub smartcosmos_event: Option<String<MAX_EVENT_LEN>>,
}

/// The bare JSON array a related-files retrieval answers with.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(transparent)]
pub struct FileDefinitionRetrievalListResponse {
    /// The related file definitions.
    pub files: Vec<FileDefinitionRetrievalResponse, MAX_RELATED_FILES>,
    /// HTTP status code observed on the exchange.
    #[serde(skip)]
    pub http_status_code: u16,
}

impl StatusCarrier for FileDefinitionRetrievalListResponse {
    fn set_status_code(&mut self, code: u16) {
        self.http_status_code = code;
        for file in &mut self.files {
            file.set_status_code(code);
        }
    }

    fn status_code(&self) -> u16 {
        self.http_status_code
    }
}

/// File content as retrieved from the cloud.
///
/// On success [`content`](Self::content) holds the raw bytes and
/// [`filename`](Self::filename) whatever the `Content-Disposition` header
/// carried; on failure the JSON error envelope is parsed into `code` and
/// `message` instead.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileContentRetrievalResponse {
    /// HTTP status code observed on the exchange.
    #[serde(skip)]
    pub http_status_code: u16,
    /// Service-specific result code on failure.
    #[serde(default)]
    pub code: Option<i32>,
    /// Human-oriented message on failure.
    #[serde(default)]
    pub message: String<MAX_MESSAGE_LEN>,
    /// The raw file bytes.
    #[serde(skip)]
    pub content: Vec<u8, MAX_BODY_LEN>,
    /// Filename parsed from `Content-Disposition`, when present.
    #[serde(skip)]
    pub filename: Option<String<MAX_FILENAME_LEN>>,
}

impl_status_carrier!(
    FileDefinitionResponse,
    FileUploadResponse,
    FileDefinitionRetrievalResponse,
    FileContentRetrievalResponse,
);

/// Client for the file management resource family.
#[derive(Debug)]
pub struct FileEndpoint<N: Connect> {
    client: RestClient<N>,
}

impl<N: Connect> FileEndpoint<N> {
    /// Build an endpoint from a connector and configuration; normally done
    /// through [`EndpointFactory`](crate::factory::EndpointFactory).
    pub fn new(network: N, config: Config) -> Self {
        Self {
            client: RestClient::new(network, config),
        }
    }

    /// Define the metadata of a file ahead of the actual upload, with
    /// `PUT /files`.
    ///
    /// On success the returned response carries the file URN in
    /// [`file_urn`](FileDefinitionResponse::file_urn); uploads and
    /// retrievals address the file by it.
    pub fn define(
        &mut self,
        request: &FileDefinitionRequest,
    ) -> (FileActionResult, Option<FileDefinitionResponse>) {
        if !request.is_valid() {
            #[cfg(feature = "defmt")]
            defmt::error!("file define: request data is invalid");
            return (FileActionResult::Failed, None);
        }
        self.try_define(request).unwrap_or_else(|_e| {
            #[cfg(feature = "defmt")]
            defmt::error!("file define: {}", _e);
            (FileActionResult::Failed, None)
        })
    }

    fn try_define(
        &mut self,
        request: &FileDefinitionRequest,
    ) -> Result<(FileActionResult, Option<FileDefinitionResponse>), Error> {
        let (status, mut response) = self.client.execute::<_, FileDefinitionResponse>(
            Method::Put,
            "/files",
            RequestOptions::AUTHORIZATION,
            Some(request),
        )?;
        let result = match (status, response.as_mut()) {
            (status::CREATED | status::OK, Some(data)) => {
                data.file_urn = Some(Urn::new(&data.message));
                FileActionResult::Successful
            }
            _ => FileActionResult::Failed,
        };
        Ok((result, response))
    }

    /// Upload raw bytes as `application/octet-stream` with
    /// `POST /files/{urn}/octet`.
    ///
    /// `409 Conflict` means the file already has content and maps to
    /// [`FileActionResult::Conflict`].
    pub fn upload_octet_stream(
        &mut self,
        file_urn: &Urn,
        data: &[u8],
    ) -> (FileActionResult, Option<FileUploadResponse>) {
        if !file_urn.is_valid() {
            #[cfg(feature = "defmt")]
            defmt::error!("file upload: file urn is not valid");
            return (FileActionResult::Failed, None);
        }
        self.try_upload_octet(file_urn, data).unwrap_or_else(|_e| {
            #[cfg(feature = "defmt")]
            defmt::error!("file upload: {}", _e);
            (FileActionResult::Failed, None)
        })
    }

    fn try_upload_octet(
        &mut self,
        file_urn: &Urn,
        data: &[u8],
    ) -> Result<(FileActionResult, Option<FileUploadResponse>), Error> {
        let mut path: String<MAX_SUB_PATH_LEN> = String::new();
        write!(path, "/files/{}/octet", file_urn).map_err(|_| Error::Encode)?;
        self.upload_exchange(
            &path,
            RawBody {
                content_type: CONTENT_TYPE_OCTET_STREAM,
                data,
            },
        )
    }

    /// Upload raw bytes as a `multipart/form-data` body with a single file
    /// part, with `POST /files/{urn}/multipart`.
    ///
    /// The part is named after the filename stem and carries `filename`
    /// verbatim. Same status mapping as
    /// [`upload_octet_stream`](Self::upload_octet_stream).
    pub fn upload_multipart(
        &mut self,
        file_urn: &Urn,
        data: &[u8],
        filename: &str,
    ) -> (FileActionResult, Option<FileUploadResponse>) {
        if !file_urn.is_valid() {
            #[cfg(feature = "defmt")]
            defmt::error!("file upload: file urn is not valid");
            return (FileActionResult::Failed, None);
        }
        if filename.is_empty() {
            #[cfg(feature = "defmt")]
            defmt::error!("file upload: filename is empty");
            return (FileActionResult::Failed, None);
        }
        self.try_upload_multipart(file_urn, data, filename)
            .unwrap_or_else(|_e| {
                #[cfg(feature = "defmt")]
                defmt::error!("file upload: {}", _e);
                (FileActionResult::Failed, None)
            })
    }

    fn try_upload_multipart(
        &mut self,
        file_urn: &Urn,
        data: &[u8],
        filename: &str,
    ) -> Result<(FileActionResult, Option<FileUploadResponse>), Error> {
        let mut path: String<MAX_SUB_PATH_LEN> = String::new();
        write!(path, "/files/{}/multipart", file_urn).map_err(|_| Error::Encode)?;

        let body = multipart_body(data, filename)?;
        let mut content_type: String<MAX_MULTIPART_CONTENT_TYPE_LEN> = String::new();
        write!(content_type, "multipart/form-data; boundary={}", MULTIPART_BOUNDARY)
            .map_err(|_| Error::Encode)?;

        self.upload_exchange(
            &path,
            RawBody {
                content_type: &content_type,
                data: &body,
            },
        )
    }

    fn upload_exchange(
        &mut self,
        sub_path: &str,
        body: RawBody<'_>,
    ) -> Result<(FileActionResult, Option<FileUploadResponse>), Error> {
        let response = self.client.request(
            Method::Post,
            sub_path,
            RequestOptions::AUTHORIZATION,
            Some(body),
        )?;
        let payload = decode_response::<FileUploadResponse>(&response);
        if payload.is_none() {
            return Ok((FileActionResult::Failed, None));
        }
        let result = match response.status_code {
            status::OK => FileActionResult::Successful,
            status::CONFLICT => FileActionResult::Conflict,
            _ => FileActionResult::Failed,
        };
        Ok((result, payload))
    }

    /// Retrieve the definition of a file with `GET /files/{urn}?view=`.
    ///
    /// The `SmartCosmos-Event` response header, when present, is copied
    /// into the returned DTO.
    pub fn definition(
        &mut self,
        file_urn: &Urn,
        view: ViewType,
    ) -> (FileActionResult, Option<FileDefinitionRetrievalResponse>) {
        if !file_urn.is_valid() {
            #[cfg(feature = "defmt")]
            defmt::error!("file definition: file urn is not valid");
            return (FileActionResult::Failed, None);
        }
        self.try_definition(file_urn, view).unwrap_or_else(|_e| {
            #[cfg(feature = "defmt")]
            defmt::error!("file definition: {}", _e);
            (FileActionResult::Failed, None)
        })
    }

    fn try_definition(
        &mut self,
        file_urn: &Urn,
        view: ViewType,
    ) -> Result<(FileActionResult, Option<FileDefinitionRetrievalResponse>), Error> {
        let mut query = QueryString::new();
        query.append("view", view.as_str())?;
        let mut path: String<MAX_SUB_PATH_LEN> = String::new();
        write!(path, "/files/{}{}", file_urn, query.as_str()).map_err(|_| Error::Encode)?;

        let response =
            self.client
                .request(Method::Get, &path, RequestOptions::AUTHORIZATION, None)?;
        let mut payload = decode_response::<FileDefinitionRetrievalResponse>(&response);
        if let (Some(data), Some(event)) = (payload.as_mut(), response.header("SmartCosmos-Event"))
        {
            data.smartcosmos_event = String::try_from(event).ok();
        }
        let result = match (response.status_code, &payload) {
            (status::OK, Some(_)) => FileActionResult::Successful,
            _ => FileActionResult::Failed,
        };
        Ok((result, payload))
    }

    /// Retrieve the stored file content with `GET /files/{urn}/contents`.
    ///
    /// On `200` the body is returned verbatim together with the filename
    /// parsed from `Content-Disposition`. On any other status the JSON
    /// error envelope, when present, is parsed into the DTO and the call
    /// fails.
    pub fn content(&mut self, file_urn: &Urn) -> (FileActionResult, Option<FileContentRetrievalResponse>) {
        if !file_urn.is_valid() {
            #[cfg(feature = "defmt")]
            defmt::error!("file content: file urn is not valid");
            return (FileActionResult::Failed, None);
        }
        self.try_content(file_urn).unwrap_or_else(|_e| {
            #[cfg(feature = "defmt")]
            defmt::error!("file content: {}", _e);
            (FileActionResult::Failed, None)
        })
    }

    fn try_content(
        &mut self,
        file_urn: &Urn,
    ) -> Result<(FileActionResult, Option<FileContentRetrievalResponse>), Error> {
        let mut path: String<MAX_SUB_PATH_LEN> = String::new();
        write!(path, "/files/{}/contents", file_urn).map_err(|_| Error::Encode)?;

        let response =
            self.client
                .request(Method::Get, &path, RequestOptions::AUTHORIZATION, None)?;
        if response.status_code == status::OK {
            let mut data = FileContentRetrievalResponse {
                content: response.body.clone(),
                ..Default::default()
            };
            data.set_status_code(response.status_code);
            if let Some(header) = response.header("Content-Disposition") {
                data.filename = content_disposition_filename(header);
            }
            return Ok((FileActionResult::Successful, Some(data)));
        }

        let payload = decode_response::<FileContentRetrievalResponse>(&response);
        Ok((FileActionResult::Failed, payload))
    }

    /// Retrieve every file definition attached to an entity with
    /// `GET /files/{entityReferenceType}/{referenceUrn}?view=`.
    pub fn related(
        &mut self,
        entity_reference_type: EntityReferenceType,
        reference_urn: &Urn,
        view: ViewType,
    ) -> (FileActionResult, Option<FileDefinitionRetrievalListResponse>) {
        if !reference_urn.is_valid() {
            #[cfg(feature = "defmt")]
            defmt::error!("related files: reference urn is not valid");
            return (FileActionResult::Failed, None);
        }
        self.try_related(entity_reference_type, reference_urn, view)
            .unwrap_or_else(|_e| {
                #[cfg(feature = "defmt")]
                defmt::error!("related files: {}", _e);
                (FileActionResult::Failed, None)
            })
    }

    fn try_related(
        &mut self,
        entity_reference_type: EntityReferenceType,
        reference_urn: &Urn,
        view: ViewType,
    ) -> Result<(FileActionResult, Option<FileDefinitionRetrievalListResponse>), Error> {
        let mut query = QueryString::new();
        query.append("view", view.as_str())?;
        let mut path: String<MAX_SUB_PATH_LEN> = String::new();
        write!(
            path,
            "/files/{}/{}{}",
            entity_reference_type.as_str(),
            reference_urn,
            query.as_str()
        )
        .map_err(|_| Error::Encode)?;

        let (status, response) = self.client.execute::<(), FileDefinitionRetrievalListResponse>(
            Method::Get,
            &path,
            RequestOptions::AUTHORIZATION,
            None,
        )?;
        let result = match (status, &response) {
            (status::OK, Some(_)) => FileActionResult::Successful,
            _ => FileActionResult::Failed,
        };
        Ok((result, response))
    }

    /// Delete a file, definition and content both, with
    /// `DELETE /files/{urn}`.
    ///
    /// The deletion only counts when the service answers `204` *and*
    /// confirms with a `SmartCosmos-Event: FileDeleted` header; a `204`
    /// without the event is not trusted.
    pub fn delete(&mut self, file_urn: &Urn) -> FileActionResult {
        if !file_urn.is_valid() {
            #[cfg(feature = "defmt")]
            defmt::error!("file delete: file urn is not valid");
            return FileActionResult::Failed;
        }
        self.try_delete(file_urn).unwrap_or_else(|_e| {
            #[cfg(feature = "defmt")]
            defmt::error!("file delete: {}", _e);
            FileActionResult::Failed
        })
    }

    fn try_delete(&mut self, file_urn: &Urn) -> Result<FileActionResult, Error> {
        let mut path: String<MAX_SUB_PATH_LEN> = String::new();
        write!(path, "/files/{}", file_urn).map_err(|_| Error::Encode)?;

        let response =
            self.client
                .request(Method::Delete, &path, RequestOptions::AUTHORIZATION, None)?;
        let deleted = response.status_code == status::NO_CONTENT
            && response.header("SmartCosmos-Event") == Some("FileDeleted");
        Ok(if deleted {
            FileActionResult::Successful
        } else {
            FileActionResult::Failed
        })
    }
}

/// The filename without its last extension; the part name of a multipart
/// upload.
fn filename_stem(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(idx) => &filename[..idx],
        None => filename,
    }
}

/// Assemble a single-part `multipart/form-data` body around `data`.
fn multipart_body(data: &[u8], filename: &str) -> Result<Vec<u8, MAX_MULTIPART_LEN>, Error> {
    let mut head: String<MAX_SUB_PATH_LEN> = String::new();
    write!(
        head,
        "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
        MULTIPART_BOUNDARY,
        filename_stem(filename),
        filename,
        CONTENT_TYPE_OCTET_STREAM,
    )
    .map_err(|_| Error::Encode)?;

    let mut body: Vec<u8, MAX_MULTIPART_LEN> = Vec::new();
    body.extend_from_slice(head.as_bytes())
        .map_err(|_| Error::Encode)?;
    body.extend_from_slice(data).map_err(|_| Error::Encode)?;
    body.extend_from_slice(b"\r\n--").map_err(|_| Error::Encode)?;
    body.extend_from_slice(MULTIPART_BOUNDARY.as_bytes())
        .map_err(|_| Error::Encode)?;
    body.extend_from_slice(b"--\r\n").map_err(|_| Error::Encode)?;
    Ok(body)
}

/// Pull the filename out of a `Content-Disposition` header value.
fn content_disposition_filename(header: &str) -> Option<String<MAX_FILENAME_LEN>> {
    for element in header.split(';') {
        let element = element.trim();
        if let Some(value) = element.strip_prefix("filename=") {
            let value = value.trim().trim_matches('"');
            if value.is_empty() {
                return None;
            }
            return String::try_from(value).ok();
        }
    }
    None
}
