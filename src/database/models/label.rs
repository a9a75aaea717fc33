use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::Owned;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Label {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Owned for Label {
    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateLabel {
    pub name: String,
    #[serde(default)]
    pub color: String,
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateLabel {
    pub id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub name: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewLabel {
    pub user_id: Uuid,
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelChanges {
    pub name: Option<String>,
    pub color: Option<String>,
}
