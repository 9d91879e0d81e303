use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::query::ListParams;

pub const SEARCH_COLUMNS: &[&str] = &["nama", "nrp", "jabatan", "pangkat"];
pub const SORT_COLUMNS: &[&str] = &["created_at", "nama", "nrp", "pangkat", "jabatan"];
pub const UPDATE_COLUMNS: &[&str] = &[
    "nama",
    "nrp",
    "pangkat",
    "jabatan",
    "is_detective",
    "skep",
    "certified",
];

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Personel {
    pub id: String,
    pub nama: String,
    pub nrp: String,
    pub pangkat: String,
    pub jabatan: String,
    pub is_detective: bool,
    pub skep: Option<String>,
    pub certified: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PersonelReadParams {
    #[serde(flatten)]
    pub list: ListParams,
    #[serde(default)]
    pub report: bool,
}

/// DELETE punya dua mode: hapus record by id, atau hapus objek storage
/// by daftar path (flag `isStorage`).
#[derive(Debug, Default, Deserialize)]
pub struct PersonelDeleteParams {
    pub id: Option<String>,
    #[serde(default, rename = "isStorage")]
    pub is_storage: bool,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub files: Vec<String>,
}
