//! Wires a connector and shared configuration into resource endpoints.

use crate::client::Config;
use crate::endpoints::files::FileEndpoint;
use crate::endpoints::objects::ObjectManagementEndpoint;
use crate::endpoints::registration::RegistrationEndpoint;
use crate::endpoints::tags::TagEndpoint;
use crate::endpoints::users::UserManagementEndpoint;
use crate::network::Connect;

/// Hands out configured endpoint clients that share one [`Config`].
///
/// The factory owns a connector and a configuration. Every
/// `create_*_endpoint` call clones both into the endpoint it returns, so
/// endpoints are independent of the factory and of each other: changing
/// the factory's account afterwards does not affect endpoints already
/// handed out, and separate endpoints may run from separate threads, each
/// opening its own connections.
///
/// # Examples
///
/// ```rust,no_run
/// use smartcosmos::factory::EndpointFactory;
/// # #[derive(Clone)]
/// # struct Connector;
/// # struct Conn;
/// # impl smartcosmos::network::Read for Conn {
/// #     type Error = ();
/// #     fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> { Ok(0) }
/// # }
/// # impl smartcosmos::network::Write for Conn {
/// #     type Error = ();
/// #     fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> { Ok(buf.len()) }
/// #     fn flush(&mut self) -> Result<(), Self::Error> { Ok(()) }
/// # }
/// # impl smartcosmos::network::Close for Conn {
/// #     type Error = ();
/// #     fn close(self) -> Result<(), Self::Error> { Ok(()) }
/// # }
/// # impl smartcosmos::network::Connection for Conn {}
/// # impl smartcosmos::network::Connect for Connector {
/// #     type Connection = Conn;
/// #     type Error = ();
/// #     fn connect(&mut self, _remote: &str) -> Result<Self::Connection, Self::Error> { Ok(Conn) }
/// # }
///
/// let mut factory = EndpointFactory::new(Connector);
/// factory.set_user_account("Aladdin", "open sesame");
///
/// let mut objects = factory.create_object_management_endpoint();
/// let mut files = factory.create_file_endpoint();
/// ```
#[derive(Debug)]
pub struct EndpointFactory<N: Connect + Clone> {
    network: N,
    config: Config,
}

impl<N: Connect + Clone> EndpointFactory<N> {
    /// A factory with the default configuration: the hosted service URL,
    /// `en` responses, keep-alive on, strict certificate checks and no
    /// user account.
    pub fn new(network: N) -> Self {
        Self {
            network,
            config: Config::new(),
        }
    }

    /// A factory over a caller-assembled configuration.
    pub fn with_config(network: N, config: Config) -> Self {
        Self { network, config }
    }

    /// The configuration cloned into endpoints created from here on.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Mutable access to the shared configuration.
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Derive and store the authorization token for a user account; see
    /// [`derive_token`](crate::client::derive_token) for its shape.
    ///
    /// Only affects endpoints created afterwards.
    pub fn set_user_account(&mut self, username: &str, password: &str) {
        self.config.set_user_account(username, password);
    }

    /// Clear the stored token; endpoints created afterwards run
    /// unauthenticated.
    pub fn clear_user_account(&mut self) {
        self.config.clear_user_account();
    }

    /// A client for object management.
    pub fn create_object_management_endpoint(&self) -> ObjectManagementEndpoint<N> {
        ObjectManagementEndpoint::new(self.network.clone(), self.config.clone())
    }

    /// A client for file management.
    pub fn create_file_endpoint(&self) -> FileEndpoint<N> {
        FileEndpoint::new(self.network.clone(), self.config.clone())
    }

    /// A client for user management.
    pub fn create_user_management_endpoint(&self) -> UserManagementEndpoint<N> {
        UserManagementEndpoint::new(self.network.clone(), self.config.clone())
    }

    /// A client for realm availability and account registration.
    pub fn create_registration_endpoint(&self) -> RegistrationEndpoint<N> {
        RegistrationEndpoint::new(self.network.clone(), self.config.clone())
    }

    /// A client for tag metadata and verification.
    pub fn create_tag_endpoint(&self) -> TagEndpoint<N> {
        TagEndpoint::new(self.network.clone(), self.config.clone())
    }
}
