use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils;

pub const SEARCH_COLUMNS: &[&str] = &["p.nama", "a.status"];
pub const SORT_COLUMNS: &[&str] = &["created_at", "tanggal", "jam_datang", "jam_pulang", "status"];
pub const UPDATE_COLUMNS: &[&str] = &[
    "personel_id",
    "tanggal",
    "jam_datang",
    "jam_pulang",
    "status",
    "qr_code",
];

#[derive(Debug, FromRow)]
pub struct AbsensiWithPersonel {
    pub id: String,
    pub personel_id: String,
    pub tanggal: NaiveDate,
    pub jam_datang: Option<NaiveDateTime>,
    pub jam_pulang: Option<NaiveDateTime>,
    pub status: Option<String>,
    pub qr_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub personel_nama: String,
    pub personel_nrp: String,
    pub personel_pangkat: String,
    pub personel_jabatan: String,
}

#[derive(Debug, Serialize)]
pub struct PersonelBrief {
    pub id: String,
    pub nama: String,
    pub nrp: String,
    pub pangkat: String,
    pub jabatan: String,
}

#[derive(Debug, Serialize)]
pub struct AbsensiResponse {
    pub id: String,
    pub personel_id: String,
    pub tanggal: NaiveDate,
    pub jam_datang: Option<NaiveDateTime>,
    pub jam_pulang: Option<NaiveDateTime>,
    pub status: Option<String>,
    pub qr_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub personel: PersonelBrief,
    /// Selisih menit jam datang/pulang, format H:MM, hanya saat Hadir.
    pub lama_kerja: Option<String>,
}

impl From<AbsensiWithPersonel> for AbsensiResponse {
    fn from(row: AbsensiWithPersonel) -> Self {
        let lama_kerja = match (&row.status, row.jam_datang, row.jam_pulang) {
            (Some(status), Some(datang), Some(pulang)) if status == "Hadir" => {
                Some(utils::lama_kerja(datang, pulang))
            }
            _ => None,
        };

        AbsensiResponse {
            personel: PersonelBrief {
                id: row.personel_id.clone(),
                nama: row.personel_nama,
                nrp: row.personel_nrp,
                pangkat: row.personel_pangkat,
                jabatan: row.personel_jabatan,
            },
            id: row.id,
            personel_id: row.personel_id,
            tanggal: row.tanggal,
            jam_datang: row.jam_datang,
            jam_pulang: row.jam_pulang,
            status: row.status,
            qr_code: row.qr_code,
            created_at: row.created_at,
            lama_kerja,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NewAbsensi {
    pub personel_id: String,
    pub tanggal: NaiveDate,
    pub jam_datang: Option<DateTime<Utc>>,
    pub jam_pulang: Option<DateTime<Utc>>,
    pub status: Option<String>,
    pub qr_code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(status: &str) -> AbsensiWithPersonel {
        let hari = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        AbsensiWithPersonel {
            id: "a-1".into(),
            personel_id: "p-1".into(),
            tanggal: hari,
            jam_datang: hari.and_hms_opt(7, 0, 0),
            jam_pulang: hari.and_hms_opt(15, 45, 0),
            status: Some(status.to_string()),
            qr_code: None,
            created_at: Utc::now(),
            personel_nama: "Budi".into(),
            personel_nrp: "12345".into(),
            personel_pangkat: "Bripka".into(),
            personel_jabatan: "Penyidik".into(),
        }
    }

    #[test]
    fn lama_kerja_derived_only_when_hadir() {
        let hadir = AbsensiResponse::from(row("Hadir"));
        assert_eq!(hadir.lama_kerja.as_deref(), Some("8:45"));
        assert_eq!(hadir.personel.nama, "Budi");

        let izin = AbsensiResponse::from(row("Izin"));
        assert_eq!(izin.lama_kerja, None);
    }
}
