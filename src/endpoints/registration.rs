//! Realm availability checks and account registration.
//!
//! These are the only operations that run before an account exists, so
//! [`realm_availability`](RegistrationEndpoint::realm_availability) sends
//! no authentication at all, and
//! [`register_account`](RegistrationEndpoint::register_account) attaches
//! `Accept-Language` so the confirmation e-mail is localized.

use heapless::String;
use serde::{Deserialize, Serialize};

use crate::client::{
    Config, Error, RequestOptions, RestClient, impl_status_carrier, query::percent_encode, status,
};
use crate::network::Connect;
use crate::network::http::Method;
use crate::types::{MAX_MESSAGE_LEN, Urn};

use super::MAX_SUB_PATH_LEN;

/// Maximum length of a realm name.
pub const MAX_REALM_LEN: usize = 128;

/// Maximum length of an e-mail address.
pub const MAX_EMAIL_LEN: usize = 128;

/// Outcome of one registration call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationActionResult {
    /// The service accepted the operation.
    Successful,
    /// The operation failed: locally rejected input, transport trouble or
    /// a non-success status. Details only reach the diagnostic log.
    Failed,
}

#[cfg(feature = "defmt")]
impl defmt::Format for RegistrationActionResult {
    fn format(&self, f: defmt::Formatter) {
        match self {
            RegistrationActionResult::Successful => defmt::write!(f, "Successful"),
            RegistrationActionResult::Failed => defmt::write!(f, "Failed"),
        }
    }
}

/// Response to a realm availability check.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealmAvailabilityResponse {
    /// HTTP status code observed on the exchange.
    #[serde(skip)]
    pub http_status_code: u16,
    /// The realm that was checked.
    #[serde(default)]
    pub realm: String<MAX_REALM_LEN>,
    /// Whether the realm can still be registered.
    #[serde(default)]
    pub available: bool,
    /// Result code when the body is the error envelope.
    #[serde(default)]
    pub code: Option<i32>,
    /// Message when the body is the error envelope.
    #[serde(default)]
    pub message: String<MAX_MESSAGE_LEN>,
}

/// Request payload for [`RegistrationEndpoint::register_account`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRegistrationRequest {
    /// The realm to claim.
    pub realm: String<MAX_REALM_LEN>,
    /// E-mail address of the administrator; receives the confirmation.
    pub email_address: String<MAX_EMAIL_LEN>,
}

impl AccountRegistrationRequest {
    /// Whether the payload satisfies the service's required-field rules.
    pub fn is_valid(&self) -> bool {
        !self.realm.is_empty() && !self.email_address.is_empty()
    }
}

/// Response envelope for account registration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRegistrationResponse {
    /// HTTP status code observed on the exchange.
    #[serde(skip)]
    pub http_status_code: u16,
    /// Service-specific result code.
    #[serde(default)]
    pub code: Option<i32>,
    /// Human-oriented message.
    #[serde(default)]
    pub message: String<MAX_MESSAGE_LEN>,
    /// URN extracted from `message` when the registration succeeded.
    #[serde(skip)]
    pub account_urn: Option<Urn>,
}

impl_status_carrier!(RealmAvailabilityResponse, AccountRegistrationResponse);

/// Client for the registration resource family.
#[derive(Debug)]
pub struct RegistrationEndpoint<N: Connect> {
    client: RestClient<N>,
}

impl<N: Connect> RegistrationEndpoint<N> {
    /// Build an endpoint from a connector and configuration; normally done
    /// through [`EndpointFactory`](crate::factory::EndpointFactory).
    pub fn new(network: N, config: Config) -> Self {
        Self {
            client: RestClient::new(network, config),
        }
    }

    /// Check whether a realm is still available with
    /// `GET /registration/realm/{realm}`.
    ///
    /// Runs unauthenticated; the realm is percent-encoded into the path.
    pub fn realm_availability(
        &mut self,
        realm: &str,
    ) -> (RegistrationActionResult, Option<RealmAvailabilityResponse>) {
        if realm.is_empty() {
            #[cfg(feature = "defmt")]
            defmt::error!("realm availability: realm is empty");
            return (RegistrationActionResult::Failed, None);
        }
        self.try_realm_availability(realm).unwrap_or_else(|_e| {
            #[cfg(feature = "defmt")]
            defmt::error!("realm availability: {}", _e);
            (RegistrationActionResult::Failed, None)
        })
    }

    fn try_realm_availability(
        &mut self,
        realm: &str,
    ) -> Result<(RegistrationActionResult, Option<RealmAvailabilityResponse>), Error> {
        let mut path: String<MAX_SUB_PATH_LEN> = String::new();
        path.push_str("/registration/realm/")
            .map_err(|_| Error::Encode)?;
        percent_encode(&mut path, realm)?;

        let (status, response) = self.client.execute::<(), RealmAvailabilityResponse>(
            Method::Get,
            &path,
            RequestOptions::NONE,
            None,
        )?;
        let result = match (status, &response) {
            (status::OK, Some(_)) => RegistrationActionResult::Successful,
            _ => RegistrationActionResult::Failed,
        };
        Ok((result, response))
    }

    /// Register a new account with `PUT /registration/register`.
    ///
    /// On success the returned response carries the account URN in
    /// [`account_urn`](AccountRegistrationResponse::account_urn) and the
    /// service mails a confirmation to the given address, localized per the
    /// configured `Accept-Language`.
    pub fn register_account(
        &mut self,
        request: &AccountRegistrationRequest,
    ) -> (RegistrationActionResult, Option<AccountRegistrationResponse>) {
        if !request.is_valid() {
            #[cfg(feature = "defmt")]
            defmt::error!("account registration: request data is invalid");
            return (RegistrationActionResult::Failed, None);
        }
        self.try_register_account(request).unwrap_or_else(|_e| {
            #[cfg(feature = "defmt")]
            defmt::error!("account registration: {}", _e);
            (RegistrationActionResult::Failed, None)
        })
    }

    fn try_register_account(
        &mut self,
        request: &AccountRegistrationRequest,
    ) -> Result<(RegistrationActionResult, Option<AccountRegistrationResponse>), Error> {
        let (status, mut response) = self.client.execute::<_, AccountRegistrationResponse>(
            Method::Put,
            "/registration/register",
            RequestOptions::LOCALIZED,
            Some(request),
        )?;
        let result = match (status, response.as_mut()) {
            (status::CREATED | status::OK, Some(data)) => {
                data.account_urn = Some(Urn::new(&data.message));
                RegistrationActionResult::Successful
            }
            _ => RegistrationActionResult::Failed,
        };
        Ok((result, response))
    }
}
