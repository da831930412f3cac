//! User management: the accounts people sign in with, their roles and
//! passwords.

use heapless::String;
use serde::{Deserialize, Serialize};

use crate::client::{
    Config, Error, QueryString, RequestOptions, RestClient, impl_status_carrier, status,
};
use crate::network::Connect;
use crate::network::http::Method;
use crate::types::{MAX_MESSAGE_LEN, RoleType, Urn, ViewType};

use super::MAX_SUB_PATH_LEN;

/// Maximum length of an e-mail address.
pub const MAX_EMAIL_LEN: usize = 128;

/// Maximum length of a given name.
pub const MAX_GIVEN_NAME_LEN: usize = 128;

/// Maximum length of a surname.
pub const MAX_SURNAME_LEN: usize = 128;

/// Maximum length of a password.
pub const MAX_PASSWORD_LEN: usize = 128;

/// Outcome of one user management call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserActionResult {
    /// The service accepted the operation.
    Successful,
    /// The operation failed: locally rejected input, transport trouble or
    /// a non-success status. Details only reach the diagnostic log.
    Failed,
}

#[cfg(feature = "defmt")]
impl defmt::Format for UserActionResult {
    fn format(&self, f: defmt::Formatter) {
        match self {
            UserActionResult::Successful => defmt::write!(f, "Successful"),
            UserActionResult::Failed => defmt::write!(f, "Failed"),
        }
    }
}

/// Request payload for [`UserManagementEndpoint::create`] and
/// [`UserManagementEndpoint::update`].
///
/// The e-mail address identifies the user; on update it names the account
/// to change.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRequest {
    /// E-mail address, required.
    pub email_address: String<MAX_EMAIL_LEN>,
    /// Role the user holds within the account.
    pub role_type: RoleType,
    /// Given name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String<MAX_GIVEN_NAME_LEN>>,
    /// Surname.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surname: Option<String<MAX_SURNAME_LEN>>,
}

impl UserRequest {
    /// Whether the payload satisfies the service's required-field rules.
    pub fn is_valid(&self) -> bool {
        !self.email_address.is_empty()
    }
}

/// Response envelope for create, update and password changes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserManagementResponse {
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
    pub user_urn: Option<Urn>,
}

/// One user record, as returned by lookups.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDataResponse {
    /// HTTP status code observed on the exchange.
    #[serde(skip)]
    pub http_status_code: u16,
    /// System-assigned URN of the user.
    #[serde(default)]
    pub urn: Urn,
    /// Role the user holds within the account.
    #[serde(default)]
    pub role_type: RoleType,
    /// Milliseconds since the epoch of the last modification.
    #[serde(default)]
    pub last_modified_timestamp: Option<i64>,
    /// E-mail address.
    #[serde(default)]
    pub email_address: String<MAX_EMAIL_LEN>,
    /// Given name.
    #[serde(default)]
    pub given_name: Option<String<MAX_GIVEN_NAME_LEN>>,
    /// Surname.
    #[serde(default)]
    pub surname: Option<String<MAX_SURNAME_LEN>>,
    /// Result code when the body is the error envelope.
    #[serde(default)]
    pub code: Option<i32>,
    /// Message when the body is the error envelope.
    #[serde(default)]
    pub message: String<MAX_MESSAGE_LEN>,
}

/// Request payload for [`UserManagementEndpoint::change_password`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    /// E-mail address of the account.
    pub email_address: String<MAX_EMAIL_LEN>,
    /// The new password, sent in the clear over the TLS channel.
    pub new_password: String<MAX_PASSWORD_LEN>,
}

impl ChangePasswordRequest {
    /// Whether the payload satisfies the service's required-field rules.
    pub fn is_valid(&self) -> bool {
        !self.email_address.is_empty() && !self.new_password.is_empty()
    }
}

impl_status_carrier!(UserManagementResponse, UserDataResponse);

/// Client for the user management resource family.
#[derive(Debug)]
pub struct UserManagementEndpoint<N: Connect> {
    client: RestClient<N>,
}

impl<N: Connect> UserManagementEndpoint<N> {
    /// Build an endpoint from a connector and configuration; normally done
    /// through [`EndpointFactory`](crate::factory::EndpointFactory).
    pub fn new(network: N, config: Config) -> Self {
        Self {
            client: RestClient::new(network, config),
        }
    }

    /// Create a new user with `PUT /users`.
    ///
    /// On success the returned response carries the system-assigned URN in
    /// [`user_urn`](UserManagementResponse::user_urn).
    pub fn create(
        &mut self,
        request: &UserRequest,
    ) -> (UserActionResult, Option<UserManagementResponse>) {
        if !request.is_valid() {
            #[cfg(feature = "defmt")]
            defmt::error!("user create: request data is invalid");
            return (UserActionResult::Failed, None);
        }
        self.try_create(request).unwrap_or_else(|_e| {
            #[cfg(feature = "defmt")]
            defmt::error!("user create: {}", _e);
            (UserActionResult::Failed, None)
        })
    }

    fn try_create(
        &mut self,
        request: &UserRequest,
    ) -> Result<(UserActionResult, Option<UserManagementResponse>), Error> {
        let (status, mut response) = self.client.execute::<_, UserManagementResponse>(
            Method::Put,
            "/users",
            RequestOptions::AUTHORIZATION,
            Some(request),
        )?;
        let result = match (status, response.as_mut()) {
            (status::CREATED | status::OK, Some(data)) => {
                data.user_urn = Some(Urn::new(&data.message));
                UserActionResult::Successful
            }
            _ => UserActionResult::Failed,
        };
        Ok((result, response))
    }

    /// Update an existing user with `POST /users`.
    ///
    /// The service answers `204 No Content` on success.
    pub fn update(
        &mut self,
        request: &UserRequest,
    ) -> (UserActionResult, Option<UserManagementResponse>) {
        if !request.is_valid() {
            #[cfg(feature = "defmt")]
            defmt::error!("user update: request data is invalid");
            return (UserActionResult::Failed, None);
        }
        self.try_update(request).unwrap_or_else(|_e| {
            #[cfg(feature = "defmt")]
            defmt::error!("user update: {}", _e);
            (UserActionResult::Failed, None)
        })
    }

    fn try_update(
        &mut self,
        request: &UserRequest,
    ) -> Result<(UserActionResult, Option<UserManagementResponse>), Error> {
        let (status, response) = self.client.execute::<_, UserManagementResponse>(
            Method::Post,
            "/users",
            RequestOptions::AUTHORIZATION,
            Some(request),
        )?;
        let result = match status {
            status::NO_CONTENT => UserActionResult::Successful,
            _ => UserActionResult::Failed,
        };
        Ok((result, response))
    }

    /// Look a user up by e-mail address with `GET /users/{emailAddress}`.
    ///
    /// The address is percent-encoded into the path segment.
    pub fn lookup(
        &mut self,
        email_address: &str,
        view: ViewType,
    ) -> (UserActionResult, Option<UserDataResponse>) {
        if email_address.is_empty() {
            #[cfg(feature = "defmt")]
            defmt::error!("user lookup: email address is empty");
            return (UserActionResult::Failed, None);
        }
        self.try_lookup(email_address, view).unwrap_or_else(|_e| {
            #[cfg(feature = "defmt")]
            defmt::error!("user lookup: {}", _e);
            (UserActionResult::Failed, None)
        })
    }

    fn try_lookup(
        &mut self,
        email_address: &str,
        view: ViewType,
    ) -> Result<(UserActionResult, Option<UserDataResponse>), Error> {
        let mut query = QueryString::new();
        query.append("view", view.as_str())?;

        let mut path: String<MAX_SUB_PATH_LEN> = String::new();
        path.push_str("/users/").map_err(|_| Error::Encode)?;
        crate::client::query::percent_encode(&mut path, email_address)?;
        path.push_str(query.as_str()).map_err(|_| Error::Encode)?;

        let (status, response) = self.client.execute::<(), UserDataResponse>(
            Method::Get,
            &path,
            RequestOptions::AUTHORIZATION,
            None,
        )?;
        let result = match (status, &response) {
            (status::OK, Some(_)) => UserActionResult::Successful,
            _ => UserActionResult::Failed,
        };
        Ok((result, response))
    }

    /// Set a new password for an account with `POST /users/password`.
    ///
    /// The service answers `204 No Content` on success.
    pub fn change_password(
        &mut self,
        request: &ChangePasswordRequest,
    ) -> (UserActionResult, Option<UserManagementResponse>) {
        if !request.is_valid() {
            #[cfg(feature = "defmt")]
            defmt::error!("change password: request data is invalid");
            return (UserActionResult::Failed, None);
        }
        self.try_change_password(request).unwrap_or_else(|_e| {
            #[cfg(feature = "defmt")]
            defmt::error!("change password: {}", _e);
            (UserActionResult::Failed, None)
        })
    }

    fn try_change_password(
        &mut self,
        request: &ChangePasswordRequest,
    ) -> Result<(UserActionResult, Option<UserManagementResponse>), Error> {
        let (status, response) = self.client.execute::<_, UserManagementResponse>(
            Method::Post,
            "/users/password",
            RequestOptions::AUTHORIZATION,
            Some(request),
        )?;
        let result = match status {
            status::NO_CONTENT => UserActionResult::Successful,
            _ => UserActionResult::Failed,
        };
        Ok((result, response))
    }
}
