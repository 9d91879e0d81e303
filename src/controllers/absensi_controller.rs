use actix_web::{post, web, HttpResponse};
use serde_json::{json, Value};
use sqlx::MySqlPool;
use uuid::Uuid;

use crate::models::absensi::{
    AbsensiResponse, AbsensiWithPersonel, NewAbsensi, SEARCH_COLUMNS, SORT_COLUMNS, UPDATE_COLUMNS,
};
use crate::query::{self, ListParams, ListQuery};
use crate::utils;

const FROM: &str = "absensi a JOIN personel p ON p.id = a.personel_id";
const SELECT: &str = "a.id, a.personel_id, a.tanggal, a.jam_datang, a.jam_pulang, a.status, \
     a.qr_code, a.created_at, p.nama AS personel_nama, p.nrp AS personel_nrp, \
     p.pangkat AS personel_pangkat, p.jabatan AS personel_jabatan";

#[post("/api/absensi")]
pub async fn absensi(pool: web::Data<MySqlPool>, params: web::Json<Value>) -> HttpResponse {
    let params = params.into_inner();
    let action = params
        .get("action")
        .and_then(Value::as_str)
        .unwrap_or("READ")
        .to_string();

    match action.as_str() {
        "CREATE" => create(pool.get_ref(), params).await,
        "READ" => read(pool.get_ref(), params).await,
        "UPDATE" => update(pool.get_ref(), params).await,
        "DELETE" => delete(pool.get_ref(), params).await,
        other => HttpResponse::BadRequest().json(json!({
            "code": -1,
            "message": format!("Unknown action: {}", other),
        })),
    }
}

async fn fetch_by_id(pool: &MySqlPool, id: &str) -> Result<Option<AbsensiResponse>, sqlx::Error> {
    let sql = format!("SELECT {} FROM {} WHERE a.id = ?", SELECT, FROM);
    let row = sqlx::query_as::<_, AbsensiWithPersonel>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(AbsensiResponse::from))
}

async fn create(pool: &MySqlPool, params: Value) -> HttpResponse {
    let input: NewAbsensi = match serde_json::from_value(params) {
        Ok(input) => input,
        Err(e) => {
            return HttpResponse::BadRequest().json(json!({
                "code": -1,
                "message": format!("Payload tidak valid: {}", e),
            }));
        }
    };

    let id = Uuid::new_v4().to_string();
    let result = sqlx::query(
        "INSERT INTO absensi (id, personel_id, tanggal, jam_datang, jam_pulang, status, qr_code) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&input.personel_id)
    .bind(input.tanggal)
    .bind(input.jam_datang.map(|t| t.naive_utc()))
    .bind(input.jam_pulang.map(|t| t.naive_utc()))
    .bind(&input.status)
    .bind(&input.qr_code)
    .execute(pool)
    .await;

    if let Err(e) = result {
        log::error!("[API ABSENSI ERROR] create: {}", e);
        return HttpResponse::InternalServerError().json(json!({
            "code": -1,
            "message": e.to_string(),
            "content": null,
        }));
    }

    match fetch_by_id(pool, &id).await {
        Ok(Some(row)) => HttpResponse::Ok().json(json!({
            "code": 0,
            "content": [row],
            "message": "Absensi created successfully",
        })),
        Ok(None) => HttpResponse::InternalServerError().json(json!({
            "code": -1,
            "message": "Absensi tidak ditemukan setelah insert",
            "content": null,
        })),
        Err(e) => {
            log::error!("[API ABSENSI ERROR] fetch after create: {}", e);
            HttpResponse::InternalServerError().json(json!({
                "code": -1,
                "message": e.to_string(),
                "content": null,
            }))
        }
    }
}

async fn read(pool: &MySqlPool, params: Value) -> HttpResponse {
    let list: ListParams = match serde_json::from_value(params) {
        Ok(list) => list,
        Err(e) => {
            return HttpResponse::BadRequest().json(json!({
                "code": -1,
                "message": format!("Payload tidak valid: {}", e),
            }));
        }
    };

    let (offset, limit) = list.bounds();
    let (sort_col, ascending) = list.order(SORT_COLUMNS);

    let mut q = ListQuery::new();
    if let Some(search) = &list.search {
        q.search(search, SEARCH_COLUMNS);
    }

    let count_sql = q.count_sql(FROM);
    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    for bind in q.binds() {
        count_query = count_query.bind(bind);
    }
    let count = match count_query.fetch_one(pool).await {
        Ok(count) => count,
        Err(e) => {
            log::error!("[API ABSENSI ERROR] count: {}", e);
            return HttpResponse::InternalServerError().json(json!({
                "code": -1,
                "message": e.to_string(),
                "content": null,
            }));
        }
    };

    let page_sql = q.page_sql(SELECT, FROM, &format!("a.{}", sort_col), ascending);
    let mut data_query = sqlx::query_as::<_, AbsensiWithPersonel>(&page_sql);
    for bind in q.binds() {
        data_query = data_query.bind(bind);
    }
    data_query = data_query.bind(limit).bind(offset);

    match data_query.fetch_all(pool).await {
        Ok(rows) => {
            let results: Vec<AbsensiResponse> =
                rows.into_iter().map(AbsensiResponse::from).collect();
            HttpResponse::Ok().json(json!({
                "code": 0,
                "content": { "count": count, "results": results },
                "message": "Absensi fetched successfully",
            }))
        }
        Err(e) => {
            log::error!("[API ABSENSI ERROR] read: {}", e);
            HttpResponse::InternalServerError().json(json!({
                "code": -1,
                "message": e.to_string(),
                "content": null,
            }))
        }
    }
}

async fn update(pool: &MySqlPool, params: Value) -> HttpResponse {
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

    // updateData datang di level atas (selain id/action); kolom datetime
    // dinormalkan dulu dari bentuk ISO.
    let mut data = obj.clone();
    for key in ["tanggal", "jam_datang", "jam_pulang"] {
        if let Some(Value::String(s)) = data.get(key) {
            let normalized = utils::normalize_datetime(s);
            data.insert(key.to_string(), Value::String(normalized));
        }
    }

    let (set, binds) = query::update_set(UPDATE_COLUMNS, &data);
    if set.is_empty() {
        return HttpResponse::BadRequest().json(json!({
            "code": -1,
            "message": "Tidak ada kolom untuk diupdate",
        }));
    }

    let sql = format!("UPDATE absensi SET {} WHERE id = ?", set);
    let mut update_query = sqlx::query(&sql);
    for bind in &binds {
        update_query = update_query.bind(bind);
    }
    update_query = update_query.bind(id);

    match update_query.execute(pool).await {
        Ok(result) if result.rows_affected() == 0 => {
            HttpResponse::NotFound().json(json!({
                "code": -1,
                "message": "Data tidak ditemukan",
            }))
        }
        Ok(_) => match fetch_by_id(pool, id).await {
            Ok(row) => HttpResponse::Ok().json(json!({
                "code": 0,
                "content": row.map(|r| vec![r]),
                "message": "Absensi updated successfully",
            })),
            Err(e) => {
                log::error!("[API ABSENSI ERROR] fetch after update: {}", e);
                HttpResponse::InternalServerError().json(json!({
                    "code": -1,
                    "message": e.to_string(),
                    "content": null,
                }))
            }
        },
        Err(e) => {
            log::error!("[API ABSENSI ERROR] update: {}", e);
            HttpResponse::InternalServerError().json(json!({
                "code": -1,
                "message": e.to_string(),
                "content": null,
            }))
        }
    }
}

async fn delete(pool: &MySqlPool, params: Value) -> HttpResponse {
    let Some(id) = params
        .get("id")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
    else {
        return HttpResponse::BadRequest().json(json!({
            "code": -1,
            "message": "ID is required for deletion",
        }));
    };

    match sqlx::query("DELETE FROM absensi WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
    {
        Ok(result) if result.rows_affected() == 0 => {
            // Delete ulang melaporkan not-found, bukan sukses.
            HttpResponse::NotFound().json(json!({
                "code": -1,
                "message": "Data tidak ditemukan",
            }))
        }
        Ok(_) => HttpResponse::Ok().json(json!({
            "code": 0,
            "message": "Absensi deleted successfully",
        })),
        Err(e) => {
            log::error!("[API ABSENSI ERROR] delete: {}", e);
            HttpResponse::InternalServerError().json(json!({
                "code": -1,
                "message": e.to_string(),
                "content": null,
            }))
        }
    }
}
