use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A stored detection event, as written by the detection pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, FromRow)]
pub struct DetectionHistory {
    pub id: i64,
    pub object_name: Option<String>,
    pub advice: Option<String>,
    pub image_path: Option<String>,
    pub heatmap_path: Option<String>,
    pub user_email: Option<String>,
}

/// Insert payload for `detection_history`; `id` is assigned by the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewDetection {
    pub object_name: Option<String>,
    pub advice: Option<String>,
    pub image_path: Option<String>,
    pub heatmap_path: Option<String>,
    pub user_email: Option<String>,
}

/// A stored account. `password` is absent for federated logins,
/// `google_id` is absent for password logins.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, FromRow)]
pub struct User {
    pub id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub google_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewUser {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub google_id: Option<String>,
}

impl From<(i64, NewDetection)> for DetectionHistory {
    fn from((id, d): (i64, NewDetection)) -> Self {
        Self {
            id,
            object_name: d.object_name,
            advice: d.advice,
            image_path: d.image_path,
            heatmap_path: d.heatmap_path,
            user_email: d.user_email,
        }
    }
}

impl From<(i64, NewUser)> for User {
    fn from((id, u): (i64, NewUser)) -> Self {
        Self {
            id,
            first_name: u.first_name,
            last_name: u.last_name,
            email: u.email,
            password: u.password,
            google_id: u.google_id,
        }
    }
}
