use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

/// Control-channel port used when none is configured.
pub const DEFAULT_PORT: u16 = 21;

/// Read and write timeout applied to control and data sockets by default.
pub const DEFAULT_IO_TIMEOUT: Duration = Duration::from_secs(30);

/// User name sent when no credentials are configured.
pub const ANONYMOUS_USER: &str = "anonymous";

/// How the client asks the server for a data connection.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PassiveMode {
    /// Try `EPSV` first and fall back to `PASV` for the rest of the session
    /// when the server rejects it.
    #[default]
    Extended,
    /// Always use `PASV`.
    Classic,
}

/// Connection settings for an [`FtpClient`](crate::FtpClient).
#[derive(Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FtpConfig {
    host: String,
    port: u16,
    username: String,
    password: String,
    connect_timeout: Option<Duration>,
    io_timeout: Option<Duration>,
    passive_mode: PassiveMode,
    bind_address: Option<SocketAddr>,
}

impl FtpConfig {
    /// Creates an anonymous configuration for `host` on the default port.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self::builder(host).build()
    }

    /// Starts building a configuration for `host`.
    #[must_use]
    pub fn builder(host: impl Into<String>) -> FtpConfigBuilder {
        FtpConfigBuilder {
            config: Self {
                host: host.into(),
                port: DEFAULT_PORT,
                username: ANONYMOUS_USER.to_owned(),
                password: String::new(),
                connect_timeout: None,
                io_timeout: Some(DEFAULT_IO_TIMEOUT),
                passive_mode: PassiveMode::default(),
                bind_address: None,
            },
        }
    }

    /// Returns the server host name or address.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the control-channel port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Returns the login name.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the login password.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Returns the TCP connect timeout, if any.
    #[must_use]
    pub const fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout
    }

    /// Returns the socket read/write timeout, if any.
    #[must_use]
    pub const fn io_timeout(&self) -> Option<Duration> {
        self.io_timeout
    }

    /// Returns the passive-mode strategy.
    #[must_use]
    pub const fn passive_mode(&self) -> PassiveMode {
        self.passive_mode
    }

    /// Returns the local address sockets are bound to before connecting.
    #[must_use]
    pub const fn bind_address(&self) -> Option<SocketAddr> {
        self.bind_address
    }

    /// Renders `host:port`, bracketing IPv6 literals.
    #[must_use]
    pub fn endpoint(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

impl fmt::Debug for FtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"****")
            .field("connect_timeout", &self.connect_timeout)
            .field("io_timeout", &self.io_timeout)
            .field("passive_mode", &self.passive_mode)
            .field("bind_address", &self.bind_address)
            .finish()
    }
}

/// Builder for [`FtpConfig`].
#[derive(Clone, Debug)]
pub struct FtpConfigBuilder {
    config: FtpConfig,
}

impl FtpConfigBuilder {
    /// Sets the control-channel port.
    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Sets the login name and password.
    #[must_use]
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.config.username = username.into();
        self.config.password = password.into();
        self
    }

    /// Sets the TCP connect timeout.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Sets the socket read/write timeout. `None` blocks indefinitely.
    #[must_use]
    pub const fn io_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.io_timeout = timeout;
        self
    }

    /// Selects the passive-mode strategy.
    #[must_use]
    pub const fn passive_mode(mut self, mode: PassiveMode) -> Self {
        self.config.passive_mode = mode;
        self
    }

    /// Binds control and data sockets to a local address.
    ///
    /// The port is ignored; the operating system picks one.
    #[must_use]
    pub const fn bind_address(mut self, address: Option<SocketAddr>) -> Self {
        self.config.bind_address = address;
        self
    }

    /// Finishes the configuration.
    #[must_use]
    pub fn build(self) -> FtpConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_anonymous_on_port_21() {
        let config = FtpConfig::new("ftp.example.org");
        assert_eq!(config.host(), "ftp.example.org");
        assert_eq!(config.port(), DEFAULT_PORT);
        assert_eq!(config.username(), ANONYMOUS_USER);
        assert_eq!(config.password(), "");
        assert_eq!(config.io_timeout(), Some(DEFAULT_IO_TIMEOUT));
        assert_eq!(config.connect_timeout(), None);
        assert_eq!(config.passive_mode(), PassiveMode::Extended);
        assert_eq!(config.bind_address(), None);
    }

    #[test]
    fn builder_overrides_every_field() {
        let bind: SocketAddr = "127.0.0.1:0".parse().unwrap();
        let config = FtpConfig::builder("10.0.0.1")
            .port(2121)
            .credentials("alice", "secret")
            .connect_timeout(Some(Duration::from_secs(3)))
            .io_timeout(None)
            .passive_mode(PassiveMode::Classic)
            .bind_address(Some(bind))
            .build();
        assert_eq!(config.port(), 2121);
        assert_eq!(config.username(), "alice");
        assert_eq!(config.password(), "secret");
        assert_eq!(config.connect_timeout(), Some(Duration::from_secs(3)));
        assert_eq!(config.io_timeout(), None);
        assert_eq!(config.passive_mode(), PassiveMode::Classic);
        assert_eq!(config.bind_address(), Some(bind));
    }

    #[test]
    fn endpoint_brackets_ipv6_literals() {
        assert_eq!(FtpConfig::new("host").endpoint(), "host:21");
        assert_eq!(
            FtpConfig::builder("::1").port(2121).build().endpoint(),
            "[::1]:2121"
        );
    }

    #[test]
    fn debug_output_hides_password() {
        let config = FtpConfig::builder("h").credentials("u", "hunter2").build();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("****"));
    }
}
