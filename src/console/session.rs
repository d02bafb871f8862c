use crate::console::*;

/// The user attached to a session, as returned by the login endpoint.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    #[serde(rename = "createdAt")]
    pub created_at: Option<String>,
    #[serde(rename = "isBlocked", default)]
    pub is_blocked: bool,
}

#[derive(Eq, PartialEq, Debug, Clone, Deserialize)]
struct LoginResponse {
    user: SessionUser,
    token: String,
}

/// Who is using the console.
///
/// A session only changes through [`Session::login`] and [`Session::logout`].
/// It is handed to the code that decides which views may be shown, never to
/// the tally functions.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Session {
    user: Option<SessionUser>,
    token: Option<String>,
}

impl Session {
    pub fn anonymous() -> Session {
        Session::default()
    }

    pub fn login(self, user: SessionUser, token: &str) -> Session {
        info!("Logged in as {} ({})", user.email, user.role);
        Session {
            user: Some(user),
            token: Some(token.to_string()),
        }
    }

    pub fn logout(self) -> Session {
        if let Some(user) = &self.user {
            info!("Logged out {}", user.email);
        }
        Session::anonymous()
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// A blocked account keeps its session but cannot open protected views.
    pub fn is_authenticated(&self) -> bool {
        match (&self.user, self.token.as_deref()) {
            (Some(user), Some(token)) => !token.is_empty() && !user.is_blocked,
            _ => false,
        }
    }
}

/// Opens a session from a saved login response.
pub fn read_session(path: &str) -> ConsoleResult<Session> {
    let response: LoginResponse = read_json(path)?;
    if response.token.trim().is_empty() {
        warn!("The login response in {:?} has no token", path);
        return Ok(Session::anonymous());
    }
    if response.user.is_blocked {
        warn!("The account {} is blocked", response.user.email);
    }
    Ok(Session::anonymous().login(response.user, &response.token))
}
