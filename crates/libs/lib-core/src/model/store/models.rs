use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Account role.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    User,
    Dermatologist,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "USER"),
            Role::Dermatologist => write!(f, "DERMATOLOGIST"),
            Role::Admin => write!(f, "ADMIN"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "USER" => Ok(Role::User),
            "DERMATOLOGIST" => Ok(Role::Dermatologist),
            "ADMIN" => Ok(Role::Admin),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        use std::str::FromStr;
        // Fall back to User if parsing fails (defensive approach for database data)
        Role::from_str(&s).unwrap_or(Role::User)
    }
}

/// Moderation status of an account.
///
/// Regular users are `Approved` from creation; dermatologist accounts start
/// `Pending` and are moved to `Approved` or `Rejected` by an admin.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatus {
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountStatus::Pending => write!(f, "PENDING"),
            AccountStatus::Approved => write!(f, "APPROVED"),
            AccountStatus::Rejected => write!(f, "REJECTED"),
        }
    }
}

impl std::str::FromStr for AccountStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PENDING" => Ok(AccountStatus::Pending),
            "APPROVED" => Ok(AccountStatus::Approved),
            "REJECTED" => Ok(AccountStatus::Rejected),
            _ => Err(format!("Invalid account status: {}", s)),
        }
    }
}

impl From<String> for AccountStatus {
    fn from(s: String) -> Self {
        use std::str::FromStr;
        AccountStatus::from_str(&s).unwrap_or(AccountStatus::Pending)
    }
}

/// User entity representing a complete user record from the database.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    #[sqlx(try_from = "String")]
    pub account_status: AccountStatus,
    pub avatar_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data structure for creating a new user.
///
/// Password should be hashed before creating.
#[derive(Debug, Clone)]
pub struct UserForCreate {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

impl UserForCreate {
    /// Create a new `UserForCreate` instance.
    pub fn new(username: String, email: String, password_hash: String, role: Role) -> Self {
        Self {
            username,
            email,
            password_hash,
            role,
        }
    }
}

/// A two-party thread pairing one requester (patient) with one responder
/// (dermatologist).
///
/// `updated_at` doubles as the last-activity timestamp used to sort
/// conversation listings; it is bumped on every message send.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Conversation {
    pub id: i64,
    pub user_id: i64,
    pub dermatologist_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// True if the given user is one of the two participants.
    pub fn has_participant(&self, user_id: i64) -> bool {
        self.user_id == user_id || self.dermatologist_id == user_id
    }

    /// The participant who is not `sender_id`.
    ///
    /// Callers must check `has_participant` first; for a non-participant
    /// sender this returns the requester side.
    pub fn other_participant(&self, sender_id: i64) -> i64 {
        if sender_id == self.user_id {
            self.dermatologist_id
        } else {
            self.user_id
        }
    }
}

/// Chat message belonging to exactly one conversation.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Message {
    pub id: i64,
    pub conversation_id: i64,
    pub sender_id: i64,
    pub content: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Notification category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    System,
    Appointment,
    Chat,
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationKind::System => write!(f, "SYSTEM"),
            NotificationKind::Appointment => write!(f, "APPOINTMENT"),
            NotificationKind::Chat => write!(f, "CHAT"),
        }
    }
}

impl std::str::FromStr for NotificationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SYSTEM" => Ok(NotificationKind::System),
            "APPOINTMENT" => Ok(NotificationKind::Appointment),
            "CHAT" => Ok(NotificationKind::Chat),
            _ => Err(format!("Invalid notification kind: {}", s)),
        }
    }
}

impl From<String> for NotificationKind {
    fn from(s: String) -> Self {
        use std::str::FromStr;
        NotificationKind::from_str(&s).unwrap_or(NotificationKind::System)
    }
}

/// Durable notification owned by exactly one recipient.
///
/// `read` is one-way: once marked read there is no un-read transition.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    #[sqlx(try_from = "String")]
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Appointment lifecycle status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "PENDING"),
            AppointmentStatus::Confirmed => write!(f, "CONFIRMED"),
            AppointmentStatus::Cancelled => write!(f, "CANCELLED"),
            AppointmentStatus::Completed => write!(f, "COMPLETED"),
        }
    }
}

impl std::str::FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PENDING" => Ok(AppointmentStatus::Pending),
            "CONFIRMED" => Ok(AppointmentStatus::Confirmed),
            "CANCELLED" => Ok(AppointmentStatus::Cancelled),
            "COMPLETED" => Ok(AppointmentStatus::Completed),
            _ => Err(format!("Invalid appointment status: {}", s)),
        }
    }
}

impl From<String> for AppointmentStatus {
    fn from(s: String) -> Self {
        use std::str::FromStr;
        AppointmentStatus::from_str(&s).unwrap_or(AppointmentStatus::Pending)
    }
}

/// Appointment between a patient and a dermatologist.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Appointment {
    pub id: i64,
    pub user_id: i64,
    pub dermatologist_id: i64,
    pub scheduled_at: DateTime<Utc>,
    pub notes: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
