//utils.rs
use actix_multipart::Multipart;
use actix_web::{error::ErrorBadRequest, Error};
use chrono::NaiveDateTime;
use futures::TryStreamExt;
use regex::Regex;
use sanitize_filename::sanitize;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use std::{env, fs};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub field: String,
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Hasil parsing multipart: field teks berurutan + file per field.
#[derive(Debug, Default)]
pub struct FormPayload {
    pub fields: Vec<(String, String)>,
    pub files: Vec<UploadedFile>,
}

impl FormPayload {
    pub fn value(&self, name: &str) -> &str {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .unwrap_or("")
    }

    /// Sama seperti Boolean(form.get(x)) di sisi form: ada dan tidak kosong.
    pub fn flag(&self, name: &str) -> bool {
        !self.value(name).is_empty()
    }

    pub fn files_for(&self, name: &str) -> Vec<&UploadedFile> {
        let bracket = format!("{}[]", name);
        self.files
            .iter()
            .filter(|f| f.field == name || f.field == bracket)
            .collect()
    }
}

/// Baca seluruh multipart ke memori. Part dengan filename dianggap file,
/// sisanya field teks.
pub async fn parse_multipart(mut payload: Multipart) -> Result<FormPayload, Error> {
    let mut form = FormPayload::default();

    while let Some(mut field) = payload.try_next().await.map_err(ErrorBadRequest)? {
        let name = field.name().unwrap_or_default().to_string();
        let filename = field
            .content_disposition()
            .and_then(|d| d.get_filename().map(|s| s.to_string()));

        let mut data = Vec::<u8>::new();
        while let Some(chunk) = field.try_next().await.map_err(ErrorBadRequest)? {
            data.extend_from_slice(&chunk);
        }

        match filename {
            Some(filename) if !filename.is_empty() => form.files.push(UploadedFile {
                field: name,
                filename,
                bytes: data,
            }),
            _ => form
                .fields
                .push((name, String::from_utf8_lossy(&data).into_owned())),
        }
    }

    Ok(form)
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendidikanInput {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub personel_id: String,
    #[serde(default)]
    pub jenis: String,
    #[serde(default)]
    pub nama_sekolah: String,
    #[serde(default)]
    pub tahun_mulai: String,
    #[serde(default)]
    pub tahun_selesai: String,
}

impl PendidikanInput {
    fn set(&mut self, field: &str, value: &str) {
        match field {
            "id" => self.id = value.to_string(),
            "jenis" => self.jenis = value.to_string(),
            "nama_sekolah" => self.nama_sekolah = value.to_string(),
            "tahun_mulai" => self.tahun_mulai = value.to_string(),
            "tahun_selesai" => self.tahun_selesai = value.to_string(),
            _ => {}
        }
    }
}

/// Dekomposisi koleksi pendidikan dari form, prioritas:
/// 1) field `pendidikan` berisi JSON array,
/// 2) bracket berindeks `pendidikan[0][jenis]`,
/// 3) bracket polos `pendidikan[][jenis]`, dikelompokkan berdasarkan
///    urutan kemunculan field yang sama (rapuh bila urutan field
///    antar objek tidak konsisten).
pub fn collect_pendidikan(fields: &[(String, String)], personel_id: &str) -> Vec<PendidikanInput> {
    if let Some((_, raw)) = fields.iter().find(|(k, _)| k == "pendidikan") {
        if let Ok(mut parsed) = serde_json::from_str::<Vec<PendidikanInput>>(raw) {
            for p in &mut parsed {
                p.personel_id = personel_id.to_string();
            }
            return parsed;
        }
    }

    let indexed = Regex::new(r"^pendidikan\[(\d+)\]\[(\w+)\]$").unwrap();
    let bracket = Regex::new(r"^pendidikan\[\]\[(\w+)\]$").unwrap();

    let mut by_index: std::collections::BTreeMap<usize, PendidikanInput> = Default::default();
    let mut ordered: Vec<PendidikanInput> = Vec::new();
    let mut seen: std::collections::HashMap<String, usize> = Default::default();

    for (key, value) in fields {
        if let Some(caps) = indexed.captures(key) {
            let idx: usize = caps[1].parse().unwrap_or(0);
            by_index
                .entry(idx)
                .or_insert_with(|| PendidikanInput {
                    personel_id: personel_id.to_string(),
                    ..Default::default()
                })
                .set(&caps[2], value);
            continue;
        }

        if let Some(caps) = bracket.captures(key) {
            let field = caps[1].to_string();
            let i = *seen.get(&field).unwrap_or(&0);
            seen.insert(field.clone(), i + 1);

            if ordered.len() <= i {
                ordered.resize_with(i + 1, || PendidikanInput {
                    personel_id: personel_id.to_string(),
                    ..Default::default()
                });
            }
            ordered[i].set(&field, value);
        }
    }

    if !by_index.is_empty() {
        by_index.into_values().collect()
    } else {
        ordered
    }
}

pub fn upload_root() -> String {
    env::var("UPLOAD_DIR").unwrap_or_else(|_| "./uploads".to_string())
}

fn prefix_dir(kind: &str, nrp: &str) -> String {
    format!("{}/assets/{}/{}", upload_root(), kind, nrp)
}

/// Simpan file ke `uploads/assets/{kind}/{nrp}` dengan nama objek
/// `timestamp-uuid-namaasli`, kembalikan URL publiknya.
pub fn upload_many(kind: &str, nrp: &str, files: &[&UploadedFile]) -> Result<Vec<String>, Error> {
    let dir = prefix_dir(kind, nrp);
    fs::create_dir_all(&dir).map_err(|e| ErrorBadRequest(format!("MkDir: {e}")))?;

    let mut urls = Vec::new();
    for f in files {
        let name = format!(
            "{}-{}-{}",
            chrono::Utc::now().timestamp_millis(),
            Uuid::new_v4(),
            sanitize(&f.filename)
        );
        let path = Path::new(&dir).join(&name);

        let mut out = fs::File::create(&path)
            .map_err(|e| ErrorBadRequest(format!("Create file: {e}")))?;
        out.write_all(&f.bytes)
            .map_err(|e| ErrorBadRequest(format!("Write file: {e}")))?;

        urls.push(format!("/uploads/assets/{}/{}/{}", kind, nrp, name));
    }

    Ok(urls)
}

/// Scan prefix storage, urut nama ascending. Direktori yang belum ada
/// berarti belum ada dokumen.
pub fn list_urls_by_prefix(kind: &str, nrp: &str) -> Vec<String> {
    let dir = prefix_dir(kind, nrp);
    let Ok(entries) = fs::read_dir(&dir) else {
        return Vec::new();
    };

    let mut names: Vec<String> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter_map(|e| e.file_name().into_string().ok())
        .collect();
    names.sort();

    names
        .into_iter()
        .map(|n| format!("/uploads/assets/{}/{}/{}", kind, nrp, n))
        .collect()
}

/// Hapus satu objek storage, path relatif terhadap kind-nya.
pub fn delete_upload(kind: &str, file: &str) -> Result<(), Error> {
    if file.contains("..") || kind.contains("..") {
        return Err(ErrorBadRequest("Path tidak valid"));
    }
    let path = format!("{}/assets/{}/{}", upload_root(), kind, file);
    if Path::new(&path).exists() {
        fs::remove_file(&path).map_err(|e| ErrorBadRequest(format!("Remove file: {e}")))?;
    }
    Ok(())
}

/// Ambil alamat asal dari header x-forwarded-for: entri pertama,
/// prefix IPv6-mapped dibuang.
pub fn format_ip(x_forwarded_for: &str) -> String {
    let first = x_forwarded_for.split(',').next().unwrap_or("").trim();
    let ip = first.strip_prefix("::ffff:").unwrap_or(first);
    if ip.is_empty() {
        "unknown".to_string()
    } else {
        ip.to_string()
    }
}

/// Lama kerja = selisih menit persis, format H:MM.
pub fn lama_kerja(jam_datang: NaiveDateTime, jam_pulang: NaiveDateTime) -> String {
    let minutes = (jam_pulang - jam_datang).num_minutes().max(0);
    format!("{}:{:02}", minutes / 60, minutes % 60)
}

/// MySQL menolak bentuk ISO dengan `T`/`Z`; normalkan string datetime
/// yang datang dari payload updateData.
pub fn normalize_datetime(value: &str) -> String {
    let value = value.trim_end_matches('Z');
    let value = match value.find('.') {
        Some(i) => &value[..i],
        None => value,
    };
    value.replace('T', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn f(k: &str, v: &str) -> (String, String) {
        (k.to_string(), v.to_string())
    }

    #[test]
    fn collect_pendidikan_prefers_json_field() {
        let fields = vec![f(
            "pendidikan",
            r#"[{"jenis":"Umum","nama_sekolah":"SMA 1","tahun_mulai":"2001","tahun_selesai":"2004"}]"#,
        )];
        let rows = collect_pendidikan(&fields, "p-1");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].jenis, "Umum");
        assert_eq!(rows[0].personel_id, "p-1");
    }

    #[test]
    fn collect_pendidikan_from_indexed_brackets() {
        let fields = vec![
            f("nama", "Budi"),
            f("pendidikan[0][jenis]", "Umum"),
            f("pendidikan[0][nama_sekolah]", "SMA 1"),
            f("pendidikan[0][tahun_mulai]", "2001"),
            f("pendidikan[1][jenis]", "Kepolisian"),
            f("pendidikan[1][nama_sekolah]", "SPN Lido"),
            f("pendidikan[1][tahun_mulai]", "2006"),
        ];
        let rows = collect_pendidikan(&fields, "p-1");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].nama_sekolah, "SMA 1");
        assert_eq!(rows[1].jenis, "Kepolisian");
        assert!(rows.iter().all(|r| r.personel_id == "p-1"));
    }

    #[test]
    fn collect_pendidikan_from_bare_brackets_by_occurrence() {
        let fields = vec![
            f("pendidikan[][jenis]", "Umum"),
            f("pendidikan[][nama_sekolah]", "SMA 1"),
            f("pendidikan[][jenis]", "Kejuruan"),
            f("pendidikan[][nama_sekolah]", "Dikjur Reskrim"),
        ];
        let rows = collect_pendidikan(&fields, "p-1");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].jenis, "Umum");
        assert_eq!(rows[1].nama_sekolah, "Dikjur Reskrim");
    }

    #[test]
    fn indexed_brackets_win_over_bare_brackets() {
        let fields = vec![
            f("pendidikan[][jenis]", "Kejuruan"),
            f("pendidikan[0][jenis]", "Umum"),
        ];
        let rows = collect_pendidikan(&fields, "p-1");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].jenis, "Umum");
    }

    #[test]
    fn lama_kerja_is_exact_minute_difference() {
        let datang = NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(7, 30, 0)
            .unwrap();
        let pulang = NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(16, 5, 0)
            .unwrap();
        assert_eq!(lama_kerja(datang, pulang), "8:35");

        let pulang = NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(8, 7, 0)
            .unwrap();
        assert_eq!(lama_kerja(datang, pulang), "0:37");
    }

    #[test]
    fn format_ip_handles_mapped_and_empty() {
        assert_eq!(format_ip("::ffff:10.0.0.7"), "10.0.0.7");
        assert_eq!(format_ip("203.0.113.9, 10.0.0.1"), "203.0.113.9");
        assert_eq!(format_ip(""), "unknown");
    }

    #[test]
    fn normalize_datetime_strips_iso_decorations() {
        assert_eq!(
            normalize_datetime("2024-03-04T08:00:00.000Z"),
            "2024-03-04 08:00:00"
        );
        assert_eq!(
            normalize_datetime("2024-03-04 08:00:00"),
            "2024-03-04 08:00:00"
        );
    }
}
