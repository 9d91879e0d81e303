use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::absensi::PersonelBrief;

pub const SEARCH_COLUMNS: &[&str] = &["pp.nama_sekolah", "pp.jenis", "p.nama"];
pub const SORT_COLUMNS: &[&str] = &["created_at", "jenis", "nama_sekolah", "tahun_mulai"];
pub const UPDATE_COLUMNS: &[&str] = &[
    "personel_id",
    "jenis",
    "nama_sekolah",
    "tahun_mulai",
    "tahun_selesai",
];

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Pendidikan {
    pub id: String,
    pub personel_id: String,
    pub jenis: String,
    pub nama_sekolah: String,
    pub tahun_mulai: i32,
    pub tahun_selesai: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Baris list pendidikan dengan personel pemiliknya (join).
#[derive(Debug, FromRow)]
pub struct PendidikanWithPersonel {
    pub id: String,
    pub personel_id: String,
    pub jenis: String,
    pub nama_sekolah: String,
    pub tahun_mulai: i32,
    pub tahun_selesai: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub personel_nama: String,
    pub personel_nrp: String,
    pub personel_pangkat: String,
    pub personel_jabatan: String,
}

#[derive(Debug, Serialize)]
pub struct PendidikanResponse {
    pub id: String,
    pub personel_id: String,
    pub jenis: String,
    pub nama_sekolah: String,
    pub tahun_mulai: i32,
    pub tahun_selesai: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub personel: PersonelBrief,
}

impl From<PendidikanWithPersonel> for PendidikanResponse {
    fn from(row: PendidikanWithPersonel) -> Self {
        PendidikanResponse {
            personel: PersonelBrief {
                id: row.personel_id.clone(),
                nama: row.personel_nama,
                nrp: row.personel_nrp,
                pangkat: row.personel_pangkat,
                jabatan: row.personel_jabatan,
            },
            id: row.id,
            personel_id: row.personel_id,
            jenis: row.jenis,
            nama_sekolah: row.nama_sekolah,
            tahun_mulai: row.tahun_mulai,
            tahun_selesai: row.tahun_selesai,
            created_at: row.created_at,
        }
    }
}

/// Form kirim tahun sebagai string; kosong berarti tidak diisi.
#[derive(Debug, Deserialize)]
pub struct NewPendidikan {
    pub personel_id: String,
    pub jenis: String,
    pub nama_sekolah: String,
    #[serde(default)]
    pub tahun_mulai: String,
    #[serde(default)]
    pub tahun_selesai: String,
}
