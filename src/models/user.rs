use crate::utils::auth::constant_time_eq;
use std::fmt;
use std::net::SocketAddr;

/// Lifecycle state of an account
///
/// Variant order matters: anything at or below `LoginFailed` has not
/// authenticated and must not be promoted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum UserStatus {
    RegisterFailed = 0,
    RegisterSuccess = 1,
    LoginFailed = 2,
    LoginSuccess = 3,
    Online = 4,
}

impl UserStatus {
    pub fn is_authenticated(self) -> bool {
        self > UserStatus::LoginFailed
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UserStatus::RegisterFailed => "register_failed",
            UserStatus::RegisterSuccess => "register_success",
            UserStatus::LoginFailed => "login_failed",
            UserStatus::LoginSuccess => "login_success",
            UserStatus::Online => "online",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered account
///
/// Profile fields are write-once; only `status` and `endpoint` change after
/// construction. Canonical records live inside the registry lock.
#[derive(Clone, PartialEq, Eq)]
pub struct UserRecord {
    id: u32,
    nickname: String,
    school: String,
    password: String,
    status: UserStatus,
    /// UDP peer address, set on promotion to `Online`
    endpoint: Option<SocketAddr>,
}

impl UserRecord {
    pub fn new(
        nickname: impl Into<String>,
        school: impl Into<String>,
        password: impl Into<String>,
        id: u32,
    ) -> Self {
        Self {
            id,
            nickname: nickname.into(),
            school: school.into(),
            password: password.into(),
            status: UserStatus::RegisterFailed,
            endpoint: None,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    pub fn school(&self) -> &str {
        &self.school
    }

    pub fn status(&self) -> UserStatus {
        self.status
    }

    pub fn set_status(&mut self, status: UserStatus) {
        self.status = status;
    }

    pub fn endpoint(&self) -> Option<SocketAddr> {
        self.endpoint
    }

    pub fn set_endpoint(&mut self, endpoint: SocketAddr) {
        self.endpoint = Some(endpoint);
    }

    // Passwords are kept in cleartext; only the comparison is hardened.
    pub fn password_matches(&self, candidate: &str) -> bool {
        constant_time_eq(candidate, &self.password)
    }
}

impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("id", &self.id)
            .field("nickname", &self.nickname)
            .field("school", &self.school)
            .field("password", &"<redacted>")
            .field("status", &self.status)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}
