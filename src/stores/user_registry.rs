use crate::core::error::RegistryError;
use crate::models::user::{UserRecord, UserStatus};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::net::SocketAddr;

/// Result of a successful liveness check on the datagram path
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Liveness {
    /// First datagram after a login: the user just went online
    Promoted,
    /// User was already online; nothing changed
    Confirmed,
}

struct RegistryState {
    users: HashMap<u32, UserRecord>,
    // u64 so that handing out u32::MAX is distinguishable from exhaustion
    next_id: u64,
    /// Copies taken at promotion time, in promotion order. Never pruned.
    online: Vec<UserRecord>,
}

/// In-memory registry of accounts, login state and datagram endpoints
///
/// A single lock guards the user map, the id allocator and the online list.
/// Every operation holds it for its full duration and none of them perform
/// I/O while holding it.
pub struct UserRegistry {
    state: Mutex<RegistryState>,
}

impl UserRegistry {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: Mutex::new(RegistryState {
                users: HashMap::with_capacity(capacity),
                next_id: 0,
                online: Vec::new(),
            }),
        }
    }

    /// Create an account and return its id
    ///
    /// Allocation, insertion and the counter bump happen as one unit under
    /// the lock. Nicknames are not required to be unique.
    pub fn register(
        &self,
        nickname: &str,
        school: &str,
        password: &str,
    ) -> Result<u32, RegistryError> {
        if nickname.is_empty() {
            return Err(RegistryError::InvalidArgument("nickname"));
        }
        if school.is_empty() {
            return Err(RegistryError::InvalidArgument("school"));
        }
        if password.is_empty() {
            return Err(RegistryError::InvalidArgument("password"));
        }

        let mut state = self.state.lock();

        let id = u32::try_from(state.next_id).map_err(|_| RegistryError::IdSpaceExhausted)?;

        let mut user = UserRecord::new(nickname, school, password, id);
        user.set_status(UserStatus::RegisterSuccess);

        state.users.insert(id, user);
        state.next_id += 1;

        Ok(id)
    }

    /// Check a password and record the outcome on the account
    pub fn login(&self, id: u32, password: &str) -> Result<(), RegistryError> {
        if password.is_empty() {
            return Err(RegistryError::InvalidArgument("password"));
        }

        let mut state = self.state.lock();

        let user = state
            .users
            .get_mut(&id)
            .ok_or(RegistryError::UserNotFound(id))?;

        if !user.password_matches(password) {
            user.set_status(UserStatus::LoginFailed);
            return Err(RegistryError::AuthenticationFailed);
        }

        user.set_status(UserStatus::LoginSuccess);
        Ok(())
    }

    /// Validate the sender of an inbound datagram
    ///
    /// The first call after a successful login promotes the user to
    /// `Online`, records `endpoint` and appends a copy of the record to the
    /// online list. Later calls confirm liveness without touching anything,
    /// including the stored endpoint.
    pub fn mark_active_and_get_status(
        &self,
        id: u32,
        endpoint: SocketAddr,
    ) -> Result<Liveness, RegistryError> {
        let mut state = self.state.lock();
        let state = &mut *state;

        let user = state
            .users
            .get_mut(&id)
            .ok_or(RegistryError::UserNotFound(id))?;

        match user.status() {
            status if !status.is_authenticated() => Err(RegistryError::NotAuthenticated(id)),
            UserStatus::LoginSuccess => {
                user.set_status(UserStatus::Online);
                user.set_endpoint(endpoint);
                state.online.push(user.clone());
                Ok(Liveness::Promoted)
            }
            _ => Ok(Liveness::Confirmed),
        }
    }

    /// Copy of the online list in promotion order
    pub fn snapshot_online_users(&self) -> Vec<UserRecord> {
        self.state.lock().online.clone()
    }

    pub fn get_user(&self, id: u32) -> Option<UserRecord> {
        self.state.lock().users.get(&id).cloned()
    }

    pub fn status_of(&self, id: u32) -> Option<UserStatus> {
        self.state.lock().users.get(&id).map(UserRecord::status)
    }

    /// Number of registered accounts
    pub fn len(&self) -> usize {
        self.state.lock().users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().users.is_empty()
    }

    pub fn online_len(&self) -> usize {
        self.state.lock().online.len()
    }

    #[cfg(test)]
    fn set_next_id(&self, next_id: u64) {
        self.state.lock().next_id = next_id;
    }
}

impl Default for UserRegistry {
    fn default() -> Self {
        Self::new()
    }
}
