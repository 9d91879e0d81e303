use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

use crate::query::ListParams;

pub const SEARCH_COLUMNS: &[&str] = &[
    "nomor",
    "jenis",
    "kronologis",
    "pasal",
    "status_proses",
    "catatan_hambatan",
];
pub const SORT_COLUMNS: &[&str] = &[
    "created_at",
    "tanggal",
    "nomor",
    "jenis",
    "status_proses",
];
pub const UPDATE_COLUMNS: &[&str] = &[
    "jenis",
    "nomor",
    "judul",
    "tanggal",
    "kronologis",
    "pasal",
    "pelapor",
    "terlapor",
    "saksi",
    "status_proses",
    "catatan_hambatan",
    "rtl",
    "keterangan",
];

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Penanganan {
    pub id: String,
    pub jenis: String,
    pub nomor: String,
    pub judul: String,
    pub tanggal: NaiveDateTime,
    pub kronologis: Option<String>,
    pub pasal: Option<Json<Vec<String>>>,
    pub pelapor: Option<Json<Vec<String>>>,
    pub terlapor: Option<Json<Vec<String>>>,
    pub saksi: Option<Json<Vec<String>>>,
    pub status_proses: Option<String>,
    pub catatan_hambatan: Option<String>,
    pub rtl: Option<String>,
    pub keterangan: Option<String>,
    pub user_create: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct NewPenanganan {
    pub jenis: String,
    pub nomor: String,
    pub judul: String,
    pub tanggal: DateTime<Utc>,
    pub kronologis: Option<String>,
    #[serde(default)]
    pub pasal: Vec<String>,
    #[serde(default)]
    pub pelapor: Vec<String>,
    #[serde(default)]
    pub terlapor: Vec<String>,
    #[serde(default)]
    pub saksi: Vec<String>,
    pub status_proses: Option<String>,
    pub catatan_hambatan: Option<String>,
    pub rtl: Option<String>,
    pub keterangan: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PenangananReadParams {
    #[serde(flatten)]
    pub list: ListParams,
    #[serde(rename = "dateFrom")]
    pub date_from: Option<DateTime<Utc>>,
    #[serde(rename = "dateUntil")]
    pub date_until: Option<DateTime<Utc>>,
    pub jenis: Option<String>,
}
