use std::collections::HashMap;

use actix_multipart::Multipart;
use actix_web::http::header;
use actix_web::{post, web, HttpRequest, HttpResponse};
use futures::{stream, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::MySqlPool;
use uuid::Uuid;

use crate::models::pendidikan::Pendidikan;
use crate::models::personel::{
    Personel, PersonelDeleteParams, PersonelReadParams, SEARCH_COLUMNS, SORT_COLUMNS,
    UPDATE_COLUMNS,
};
use crate::query::{self, ListQuery};
use crate::utils::{self, FormPayload, PendidikanInput};

/// Pemanggilan storage per personel dibatasi agar scan dokumen tidak
/// membanjiri disk saat satu halaman penuh.
const ENRICH_CONCURRENCY: usize = 8;

#[derive(Debug, Deserialize)]
struct NewPersonel {
    nama: String,
    nrp: String,
    pangkat: String,
    jabatan: String,
    #[serde(default)]
    is_detective: bool,
    #[serde(default)]
    pendidikan: Vec<PendidikanInput>,
}

/// Baris personel lengkap: riwayat pendidikan plus URL dokumen hasil
/// scan prefix storage.
#[derive(Debug, Serialize)]
struct PersonelDetail {
    #[serde(flatten)]
    personel: Personel,
    pendidikan: Vec<Pendidikan>,
    skep_urls: Vec<String>,
    certified_urls: Vec<String>,
}

#[post("/api/personnel")]
pub async fn personnel(
    req: HttpRequest,
    pool: web::Data<MySqlPool>,
    mut body: web::Payload,
) -> HttpResponse {
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    // Form dengan file datang sebagai multipart, sisanya JSON biasa.
    if content_type.starts_with("multipart/form-data") {
        let multipart = Multipart::new(req.headers(), body);
        let form = match utils::parse_multipart(multipart).await {
            Ok(form) => form,
            Err(e) => {
                return HttpResponse::BadRequest().json(json!({
                    "code": -1,
                    "message": format!("Multipart tidak valid: {}", e),
                }));
            }
        };

        return match form.value("action") {
            "CREATE" => create_from_form(pool.get_ref(), &form).await,
            "UPDATE" => update_from_form(pool.get_ref(), &form).await,
            other => HttpResponse::BadRequest().json(json!({
                "code": -1,
                "message": format!("Unknown action: {}", other),
            })),
        };
    }

    let mut bytes = web::BytesMut::new();
    while let Some(chunk) = body.next().await {
        match chunk {
            Ok(chunk) => bytes.extend_from_slice(&chunk),
            Err(e) => {
                return HttpResponse::BadRequest().json(json!({
                    "code": -1,
                    "message": format!("Gagal membaca body: {}", e),
                }));
            }
        }
    }
    let params: Value = match serde_json::from_slice(&bytes) {
        Ok(params) => params,
        Err(e) => {
            return HttpResponse::BadRequest().json(json!({
                "code": -1,
                "message": format!("Payload tidak valid: {}", e),
            }));
        }
    };

    let action = params
        .get("action")
        .and_then(Value::as_str)
        .unwrap_or("READ")
        .to_string();

    match action.as_str() {
        "CREATE" => create_from_json(pool.get_ref(), params).await,
        "READ" => read(pool.get_ref(), params).await,
        "UPDATE" => update_from_json(pool.get_ref(), params).await,
        "DELETE" => delete(pool.get_ref(), params).await,
        other => HttpResponse::BadRequest().json(json!({
            "code": -1,
            "message": format!("Unknown action: {}", other),
        })),
    }
}

async fn insert_personel(
    pool: &MySqlPool,
    input: &NewPersonel,
    skep: Option<&str>,
    certified: Option<&str>,
) -> Result<String, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    sqlx::query(
        "INSERT INTO personel (id, nama, nrp, pangkat, jabatan, is_detective, skep, certified) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&input.nama)
    .bind(&input.nrp)
    .bind(&input.pangkat)
    .bind(&input.jabatan)
    .bind(input.is_detective)
    .bind(skep)
    .bind(certified)
    .execute(pool)
    .await?;
    Ok(id)
}

/// Entri dengan id di-UPDATE, tanpa id di-INSERT. Entri yang sepenuhnya
/// kosong dilewati.
async fn upsert_pendidikan(
    pool: &MySqlPool,
    rows: &[PendidikanInput],
) -> Result<(), sqlx::Error> {
    for row in rows {
        if row.jenis.is_empty() && row.nama_sekolah.is_empty() {
            continue;
        }
        let tahun_mulai: i32 = row.tahun_mulai.trim().parse().unwrap_or(0);
        let tahun_selesai: Option<i32> = row.tahun_selesai.trim().parse().ok();

        if row.id.is_empty() {
            sqlx::query(
                "INSERT INTO pendidikan_personel \
                 (id, personel_id, jenis, nama_sekolah, tahun_mulai, tahun_selesai) \
                 VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&row.personel_id)
            .bind(&row.jenis)
            .bind(&row.nama_sekolah)
            .bind(tahun_mulai)
            .bind(tahun_selesai)
            .execute(pool)
            .await?;
        } else {
            sqlx::query(
                "UPDATE pendidikan_personel \
                 SET jenis = ?, nama_sekolah = ?, tahun_mulai = ?, tahun_selesai = ? \
                 WHERE id = ?",
            )
            .bind(&row.jenis)
            .bind(&row.nama_sekolah)
            .bind(tahun_mulai)
            .bind(tahun_selesai)
            .bind(&row.id)
            .execute(pool)
            .await?;
        }
    }
    Ok(())
}

/// Simpan lampiran skep/certified bila flag-nya menyala, kembalikan nama
/// file asli pertama untuk disimpan di kolom personel.
fn store_documents(form: &FormPayload, nrp: &str) -> Result<(Option<String>, Option<String>), actix_web::Error> {
    let mut skep = None;
    let mut certified = None;

    if form.flag("hasSkep") {
        let files = form.files_for("skep");
        if !files.is_empty() {
            utils::upload_many("skep", nrp, &files)?;
            skep = Some(files[0].filename.clone());
        }
    }
    if form.flag("hasCertified") {
        let files = form.files_for("certified");
        if !files.is_empty() {
            utils::upload_many("certified", nrp, &files)?;
            certified = Some(files[0].filename.clone());
        }
    }

    Ok((skep, certified))
}

async fn fetch_detail(pool: &MySqlPool, id: &str) -> Result<Option<PersonelDetail>, sqlx::Error> {
    let Some(personel) = sqlx::query_as::<_, Personel>("SELECT * FROM personel WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
    else {
        return Ok(None);
    };

    let pendidikan = sqlx::query_as::<_, Pendidikan>(
        "SELECT * FROM pendidikan_personel WHERE personel_id = ? ORDER BY tahun_mulai ASC",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    let skep_urls = utils::list_urls_by_prefix("skep", &personel.nrp);
    let certified_urls = utils::list_urls_by_prefix("certified", &personel.nrp);

    Ok(Some(PersonelDetail {
        personel,
        pendidikan,
        skep_urls,
        certified_urls,
    }))
}

fn created_response(detail: Option<PersonelDetail>, message: &str) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "code": 0,
        "content": detail.map(|d| vec![d]),
        "message": message,
    }))
}

async fn create_from_form(pool: &MySqlPool, form: &FormPayload) -> HttpResponse {
    let input = NewPersonel {
        nama: form.value("nama").to_string(),
        nrp: form.value("nrp").to_string(),
        pangkat: form.value("pangkat").to_string(),
        jabatan: form.value("jabatan").to_string(),
        is_detective: form.flag("is_detective"),
        pendidikan: Vec::new(),
    };
    if input.nama.is_empty() || input.nrp.is_empty() {
        return HttpResponse::BadRequest().json(json!({
            "code": -1,
            "message": "Nama dan NRP wajib diisi",
        }));
    }

    let (skep, certified) = match store_documents(form, &input.nrp) {
        Ok(stored) => stored,
        Err(e) => {
            log::error!("[API PERSONNEL ERROR] upload: {}", e);
            return HttpResponse::InternalServerError().json(json!({
                "code": -1,
                "message": e.to_string(),
            }));
        }
    };

    let id = match insert_personel(pool, &input, skep.as_deref(), certified.as_deref()).await {
        Ok(id) => id,
        Err(e) => {
            log::error!("[API PERSONNEL ERROR] create: {}", e);
            return HttpResponse::InternalServerError().json(json!({
                "code": -1,
                "message": e.to_string(),
                "content": null,
            }));
        }
    };

    let pendidikan = utils::collect_pendidikan(&form.fields, &id);
    if let Err(e) = upsert_pendidikan(pool, &pendidikan).await {
        log::error!("[API PERSONNEL ERROR] pendidikan: {}", e);
        return HttpResponse::InternalServerError().json(json!({
            "code": -1,
            "message": e.to_string(),
            "content": null,
        }));
    }

    match fetch_detail(pool, &id).await {
        Ok(detail) => created_response(detail, "Personel created successfully"),
        Err(e) => {
            log::error!("[API PERSONNEL ERROR] fetch after create: {}", e);
            HttpResponse::InternalServerError().json(json!({
                "code": -1,
                "message": e.to_string(),
                "content": null,
            }))
        }
    }
}

async fn create_from_json(pool: &MySqlPool, params: Value) -> HttpResponse {
    let input: NewPersonel = match serde_json::from_value(params) {
        Ok(input) => input,
        Err(e) => {
            return HttpResponse::BadRequest().json(json!({
                "code": -1,
                "message": format!("Payload tidak valid: {}", e),
            }));
        }
    };
    if input.nama.is_empty() || input.nrp.is_empty() {
        return HttpResponse::BadRequest().json(json!({
            "code": -1,
            "message": "Nama dan NRP wajib diisi",
        }));
    }

    let id = match insert_personel(pool, &input, None, None).await {
        Ok(id) => id,
        Err(e) => {
            log::error!("[API PERSONNEL ERROR] create: {}", e);
            return HttpResponse::InternalServerError().json(json!({
                "code": -1,
                "message": e.to_string(),
                "content": null,
            }));
        }
    };

    let mut pendidikan = input.pendidikan;
    for row in &mut pendidikan {
        row.personel_id = id.clone();
        row.id.clear();
    }
    if let Err(e) = upsert_pendidikan(pool, &pendidikan).await {
        log::error!("[API PERSONNEL ERROR] pendidikan: {}", e);
        return HttpResponse::InternalServerError().json(json!({
            "code": -1,
            "message": e.to_string(),
            "content": null,
        }));
    }

    match fetch_detail(pool, &id).await {
        Ok(detail) => created_response(detail, "Personel created successfully"),
        Err(e) => {
            log::error!("[API PERSONNEL ERROR] fetch after create: {}", e);
            HttpResponse::InternalServerError().json(json!({
                "code": -1,
                "message": e.to_string(),
                "content": null,
            }))
        }
    }
}

async fn read(pool: &MySqlPool, params: Value) -> HttpResponse {
    let read_params: PersonelReadParams = match serde_json::from_value(params) {
        Ok(read_params) => read_params,
        Err(e) => {
            return HttpResponse::BadRequest().json(json!({
                "code": -1,
                "message": format!("Payload tidak valid: {}", e),
            }));
        }
    };

    // Mode laporan mengambil seluruh hasil terfilter tanpa paginasi.
    let (offset, limit) = if read_params.report {
        (0, i64::MAX)
    } else {
        read_params.list.bounds()
    };
    let (sort_col, ascending) = read_params.list.order(SORT_COLUMNS);

    let mut q = ListQuery::new();
    if let Some(search) = &read_params.list.search {
        q.search(search, SEARCH_COLUMNS);
    }

    let count_sql = q.count_sql("personel");
    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    for bind in q.binds() {
        count_query = count_query.bind(bind);
    }
    let mut count = match count_query.fetch_one(pool).await {
        Ok(count) => count,
        Err(e) => {
            log::error!("[API PERSONNEL ERROR] count: {}", e);
            return HttpResponse::InternalServerError().json(json!({
                "code": -1,
                "message": e.to_string(),
                "content": null,
            }));
        }
    };

    let page_sql = q.page_sql("*", "personel", &sort_col, ascending);
    let mut data_query = sqlx::query_as::<_, Personel>(&page_sql);
    for bind in q.binds() {
        data_query = data_query.bind(bind);
    }
    data_query = data_query.bind(limit).bind(offset);

    let rows = match data_query.fetch_all(pool).await {
        Ok(rows) => rows,
        Err(e) => {
            log::error!("[API PERSONNEL ERROR] read: {}", e);
            return HttpResponse::InternalServerError().json(json!({
                "code": -1,
                "message": e.to_string(),
                "content": null,
            }));
        }
    };

    let mut by_personel = match fetch_pendidikan_map(pool, &rows).await {
        Ok(map) => map,
        Err(e) => {
            log::error!("[API PERSONNEL ERROR] pendidikan: {}", e);
            return HttpResponse::InternalServerError().json(json!({
                "code": -1,
                "message": e.to_string(),
                "content": null,
            }));
        }
    };

    let mut results: Vec<PersonelDetail> = stream::iter(rows)
        .map(|personel| {
            let pendidikan = by_personel.remove(&personel.id).unwrap_or_default();
            async move {
                let skep_urls = utils::list_urls_by_prefix("skep", &personel.nrp);
                let certified_urls = utils::list_urls_by_prefix("certified", &personel.nrp);
                PersonelDetail {
                    personel,
                    pendidikan,
                    skep_urls,
                    certified_urls,
                }
            }
        })
        .buffered(ENRICH_CONCURRENCY)
        .collect()
        .await;

    if read_params.report {
        results = report_rows(results);
        count = results.len() as i64;
    }

    HttpResponse::Ok().json(json!({
        "code": 0,
        "content": { "count": count, "results": results },
        "message": "Personel fetched successfully",
    }))
}

/// Laporan hanya memuat personel yang punya riwayat pendidikan.
fn report_rows(results: Vec<PersonelDetail>) -> Vec<PersonelDetail> {
    results
        .into_iter()
        .filter(|detail| !detail.pendidikan.is_empty())
        .collect()
}

/// Riwayat pendidikan satu halaman diambil sekali dengan IN clause lalu
/// dikelompokkan per personel.
async fn fetch_pendidikan_map(
    pool: &MySqlPool,
    rows: &[Personel],
) -> Result<HashMap<String, Vec<Pendidikan>>, sqlx::Error> {
    let mut map: HashMap<String, Vec<Pendidikan>> = HashMap::new();
    if rows.is_empty() {
        return Ok(map);
    }

    let placeholders = vec!["?"; rows.len()].join(", ");
    let sql = format!(
        "SELECT * FROM pendidikan_personel WHERE personel_id IN ({}) ORDER BY tahun_mulai ASC",
        placeholders
    );
    let mut pendidikan_query = sqlx::query_as::<_, Pendidikan>(&sql);
    for row in rows {
        pendidikan_query = pendidikan_query.bind(&row.id);
    }

    for pendidikan in pendidikan_query.fetch_all(pool).await? {
        map.entry(pendidikan.personel_id.clone())
            .or_default()
            .push(pendidikan);
    }
    Ok(map)
}

async fn update_from_form(pool: &MySqlPool, form: &FormPayload) -> HttpResponse {
    let id = form.value("id").to_string();
    if id.is_empty() {
        return HttpResponse::BadRequest().json(json!({
            "code": -1,
            "message": "ID is required for update",
        }));
    }

    let mut data = serde_json::Map::new();
    for col in ["nama", "nrp", "pangkat", "jabatan"] {
        let value = form.value(col);
        if !value.is_empty() {
            data.insert(col.to_string(), Value::String(value.to_string()));
        }
    }
    if form.fields.iter().any(|(k, _)| k == "is_detective") {
        let flag = if form.flag("is_detective") { "1" } else { "0" };
        data.insert("is_detective".to_string(), Value::String(flag.to_string()));
    }

    // NRP untuk prefix storage: nilai baru bila ikut diubah, selain itu
    // nilai tersimpan.
    let nrp = if data.contains_key("nrp") {
        form.value("nrp").to_string()
    } else {
        match sqlx::query_scalar::<_, String>("SELECT nrp FROM personel WHERE id = ?")
            .bind(&id)
            .fetch_optional(pool)
            .await
        {
            Ok(Some(nrp)) => nrp,
            Ok(None) => {
                return HttpResponse::NotFound().json(json!({
                    "code": -1,
                    "message": "Data tidak ditemukan",
                }));
            }
            Err(e) => {
                log::error!("[API PERSONNEL ERROR] lookup nrp: {}", e);
                return HttpResponse::InternalServerError().json(json!({
                    "code": -1,
                    "message": e.to_string(),
                }));
            }
        }
    };

    match store_documents(form, &nrp) {
        Ok((skep, certified)) => {
            if let Some(skep) = skep {
                data.insert("skep".to_string(), Value::String(skep));
            }
            if let Some(certified) = certified {
                data.insert("certified".to_string(), Value::String(certified));
            }
        }
        Err(e) => {
            log::error!("[API PERSONNEL ERROR] upload: {}", e);
            return HttpResponse::InternalServerError().json(json!({
                "code": -1,
                "message": e.to_string(),
            }));
        }
    }

    if let Err(response) = apply_update(pool, &id, &data).await {
        return response;
    }

    let mut pendidikan = utils::collect_pendidikan(&form.fields, &id);
    for row in &mut pendidikan {
        row.personel_id = id.clone();
    }
    if let Err(e) = upsert_pendidikan(pool, &pendidikan).await {
        log::error!("[API PERSONNEL ERROR] pendidikan: {}", e);
        return HttpResponse::InternalServerError().json(json!({
            "code": -1,
            "message": e.to_string(),
            "content": null,
        }));
    }

    match fetch_detail(pool, &id).await {
        Ok(detail) => created_response(detail, "Personel updated successfully"),
        Err(e) => {
            log::error!("[API PERSONNEL ERROR] fetch after update: {}", e);
            HttpResponse::InternalServerError().json(json!({
                "code": -1,
                "message": e.to_string(),
                "content": null,
            }))
        }
    }
}

async fn update_from_json(pool: &MySqlPool, params: Value) -> HttpResponse {
    let Some(obj) = params.as_object() else {
        return HttpResponse::BadRequest().json(json!({
            "code": -1,
            "message": "Payload tidak valid",
        }));
    };
    let Some(id) = obj.get("id").and_then(Value::as_str).filter(|s| !s.is_empty()) else {
        return HttpResponse::BadRequest().json(json!({
            "code": -1,
            "message": "ID is required for update",
        }));
    };

    if let Err(response) = apply_update(pool, id, obj).await {
        return response;
    }

    if let Some(Value::Array(_)) = obj.get("pendidikan") {
        let mut pendidikan: Vec<PendidikanInput> =
            match serde_json::from_value(obj["pendidikan"].clone()) {
                Ok(pendidikan) => pendidikan,
                Err(e) => {
                    return HttpResponse::BadRequest().json(json!({
                        "code": -1,
                        "message": format!("Pendidikan tidak valid: {}", e),
                    }));
                }
            };
        for row in &mut pendidikan {
            row.personel_id = id.to_string();
        }
        if let Err(e) = upsert_pendidikan(pool, &pendidikan).await {
            log::error!("[API PERSONNEL ERROR] pendidikan: {}", e);
            return HttpResponse::InternalServerError().json(json!({
                "code": -1,
                "message": e.to_string(),
                "content": null,
            }));
        }
    }

    match fetch_detail(pool, id).await {
        Ok(detail) => created_response(detail, "Personel updated successfully"),
        Err(e) => {
            log::error!("[API PERSONNEL ERROR] fetch after update: {}", e);
            HttpResponse::InternalServerError().json(json!({
                "code": -1,
                "message": e.to_string(),
                "content": null,
            }))
        }
    }
}

async fn apply_update(
    pool: &MySqlPool,
    id: &str,
    data: &serde_json::Map<String, Value>,
) -> Result<(), HttpResponse> {
    let (set, binds) = query::update_set(UPDATE_COLUMNS, data);
    if set.is_empty() {
        return Ok(());
    }

    let sql = format!("UPDATE personel SET {}, updated_at = NOW() WHERE id = ?", set);
    let mut update_query = sqlx::query(&sql);
    for bind in &binds {
        update_query = update_query.bind(bind);
    }
    update_query = update_query.bind(id);

    match update_query.execute(pool).await {
        Ok(result) if result.rows_affected() == 0 => Err(HttpResponse::NotFound().json(json!({
            "code": -1,
            "message": "Data tidak ditemukan",
        }))),
        Ok(_) => Ok(()),
        Err(e) => {
            log::error!("[API PERSONNEL ERROR] update: {}", e);
            Err(HttpResponse::InternalServerError().json(json!({
                "code": -1,
                "message": e.to_string(),
                "content": null,
            })))
        }
    }
}

async fn delete(pool: &MySqlPool, params: Value) -> HttpResponse {
    let params: PersonelDeleteParams = match serde_json::from_value(params) {
        Ok(params) => params,
        Err(e) => {
            return HttpResponse::BadRequest().json(json!({
                "code": -1,
                "message": format!("Payload tidak valid: {}", e),
            }));
        }
    };

    // Mode storage menghapus objek dokumen, bukan record personel.
    if params.is_storage {
        let Some(kind) = params.kind.as_deref().filter(|k| !k.is_empty()) else {
            return HttpResponse::BadRequest().json(json!({
                "code": -1,
                "message": "Type is required for storage deletion",
            }));
        };
        if params.files.is_empty() {
            return HttpResponse::BadRequest().json(json!({
                "code": -1,
                "message": "Files are required for storage deletion",
            }));
        }
        for file in &params.files {
            if let Err(e) = utils::delete_upload(kind, file) {
                log::error!("[API PERSONNEL ERROR] delete storage: {}", e);
                return HttpResponse::InternalServerError().json(json!({
                    "code": -1,
                    "message": e.to_string(),
                }));
            }
        }
        return HttpResponse::Ok().json(json!({
            "code": 0,
            "message": "Dokumen deleted successfully",
        }));
    }

    let Some(id) = params.id.as_deref().filter(|s| !s.is_empty()) else {
        return HttpResponse::BadRequest().json(json!({
            "code": -1,
            "message": "ID is required for deletion",
        }));
    };

    match sqlx::query("DELETE FROM personel WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
    {
        Ok(result) if result.rows_affected() == 0 => HttpResponse::NotFound().json(json!({
            "code": -1,
            "message": "Data tidak ditemukan",
        })),
        Ok(_) => HttpResponse::Ok().json(json!({
            "code": 0,
            "message": "Personel deleted successfully",
        })),
        Err(e) => {
            log::error!("[API PERSONNEL ERROR] delete: {}", e);
            HttpResponse::InternalServerError().json(json!({
                "code": -1,
                "message": e.to_string(),
                "content": null,
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn detail(nama: &str, pendidikan: Vec<Pendidikan>) -> PersonelDetail {
        PersonelDetail {
            personel: Personel {
                id: format!("p-{}", nama),
                nama: nama.to_string(),
                nrp: "12345".into(),
                pangkat: "Bripka".into(),
                jabatan: "Penyidik".into(),
                is_detective: true,
                skep: None,
                certified: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            pendidikan,
            skep_urls: Vec::new(),
            certified_urls: Vec::new(),
        }
    }

    fn sekolah(personel_id: &str) -> Pendidikan {
        Pendidikan {
            id: "e-1".into(),
            personel_id: personel_id.to_string(),
            jenis: "Umum".into(),
            nama_sekolah: "SMA 1".into(),
            tahun_mulai: 2001,
            tahun_selesai: Some(2004),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn report_rows_drop_personel_without_pendidikan() {
        let rows = vec![
            detail("Budi", vec![sekolah("p-Budi")]),
            detail("Sari", Vec::new()),
            detail("Andi", vec![sekolah("p-Andi")]),
        ];

        let report = report_rows(rows);
        assert_eq!(report.len(), 2);
        assert!(report.iter().all(|d| !d.pendidikan.is_empty()));
        assert_eq!(report[0].personel.nama, "Budi");
        assert_eq!(report[1].personel.nama, "Andi");
    }
}
