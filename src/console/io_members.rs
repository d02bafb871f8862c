use crate::console::*;

pub const NEVER_LOGGED_IN: &str = "Never logged in";

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Role {
    Admin,
    Moderator,
    User,
}

impl Role {
    /// Unknown roles are plain users.
    pub fn from_api(role: Option<&str>) -> Role {
        match role {
            Some("ADMIN") => Role::Admin,
            Some("MODERATOR") => Role::Moderator,
            _ => Role::User,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Moderator => "Moderator",
            Role::User => "User",
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum AccountStatus {
    Active,
    Blocked,
}

impl AccountStatus {
    pub fn label(&self) -> &'static str {
        match self {
            AccountStatus::Active => "Active",
            AccountStatus::Blocked => "Blocked",
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ApiMember {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Option<String>,
    #[serde(rename = "isBlocked", default)]
    pub is_blocked: bool,
    #[serde(rename = "lastLogin")]
    pub last_login: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct MembersResponse {
    pub members: Vec<ApiMember>,
}

/// A line of the member directory.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct MemberRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub status: AccountStatus,
    pub last_login: String,
}

impl From<&ApiMember> for MemberRow {
    fn from(m: &ApiMember) -> MemberRow {
        MemberRow {
            id: m.id.clone(),
            name: m.name.clone(),
            email: m.email.clone(),
            role: Role::from_api(m.role.as_deref()),
            status: if m.is_blocked {
                AccountStatus::Blocked
            } else {
                AccountStatus::Active
            },
            last_login: match m.last_login.as_deref() {
                Some(x) if !x.is_empty() => x.to_string(),
                _ => NEVER_LOGGED_IN.to_string(),
            },
        }
    }
}

pub fn read_members(path: &str) -> ConsoleResult<Vec<MemberRow>> {
    let response: MembersResponse = read_json(path)?;
    info!("Read {} members from {:?}", response.members.len(), path);
    Ok(response.members.iter().map(MemberRow::from).collect())
}
