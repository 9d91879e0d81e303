use actix_web::{post, web, HttpRequest, HttpResponse};
use serde_json::{json, Value};
use sqlx::MySqlPool;
use uuid::Uuid;

use crate::auth::verify_jwt;
use crate::models::penanganan::{
    NewPenanganan, Penanganan, PenangananReadParams, SEARCH_COLUMNS, SORT_COLUMNS, UPDATE_COLUMNS,
};
use crate::query::{self, ListQuery};
use crate::utils;

#[post("/api/lp-li")]
pub async fn lp_li(
    req: HttpRequest,
    pool: web::Data<MySqlPool>,
    params: web::Json<Value>,
) -> HttpResponse {
    let claims = match verify_jwt(&req) {
        Ok(claims) => claims,
        Err(e) => {
            return HttpResponse::Unauthorized().json(json!({
                "code": -1,
                "message": e.to_string(),
            }));
        }
    };

    let params = params.into_inner();
    let action = params
        .get("action")
        .and_then(Value::as_str)
        .unwrap_or("READ")
        .to_string();

    // Non-admin hanya melihat dan mengubah entri buatannya sendiri.
    let scope = if claims.is_admin() {
        None
    } else {
        Some(claims.sub.clone())
    };

    match action.as_str() {
        "CREATE" => create(pool.get_ref(), params, &claims.sub).await,
        "READ" => read(pool.get_ref(), params, scope).await,
        "UPDATE" => update(pool.get_ref(), params, scope).await,
        "DELETE" => delete(pool.get_ref(), params, scope).await,
        other => HttpResponse::BadRequest().json(json!({
            "code": -1,
            "message": format!("Unknown action: {}", other),
        })),
    }
}

async fn fetch_by_id(pool: &MySqlPool, id: &str) -> Result<Option<Penanganan>, sqlx::Error> {
    sqlx::query_as::<_, Penanganan>("SELECT * FROM penanganan_lp_li WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

async fn create(pool: &MySqlPool, params: Value, username: &str) -> HttpResponse {
    let input: NewPenanganan = match serde_json::from_value(params) {
        Ok(input) => input,
        Err(e) => {
            return HttpResponse::BadRequest().json(json!({
                "code": -1,
                "message": format!("Payload tidak valid: {}", e),
            }));
        }
    };
    if input.nomor.is_empty() || input.judul.is_empty() {
        return HttpResponse::BadRequest().json(json!({
            "code": -1,
            "message": "Nomor dan judul wajib diisi",
        }));
    }

    let id = Uuid::new_v4().to_string();
    let result = sqlx::query(
        "INSERT INTO penanganan_lp_li \
         (id, jenis, nomor, judul, tanggal, kronologis, pasal, pelapor, terlapor, saksi, \
          status_proses, catatan_hambatan, rtl, keterangan, user_create) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&input.jenis)
    .bind(&input.nomor)
    .bind(&input.judul)
    .bind(input.tanggal.naive_utc())
    .bind(&input.kronologis)
    .bind(json!(input.pasal).to_string())
    .bind(json!(input.pelapor).to_string())
    .bind(json!(input.terlapor).to_string())
    .bind(json!(input.saksi).to_string())
    .bind(&input.status_proses)
    .bind(&input.catatan_hambatan)
    .bind(&input.rtl)
    .bind(&input.keterangan)
    .bind(username)
    .execute(pool)
    .await;

    if let Err(e) = result {
        log::error!("[API LP-LI ERROR] create: {}", e);
        return HttpResponse::InternalServerError().json(json!({
            "code": -1,
            "message": e.to_string(),
            "content": null,
        }));
    }

    match fetch_by_id(pool, &id).await {
        Ok(row) => HttpResponse::Ok().json(json!({
            "code": 0,
            "content": row.map(|r| vec![r]),
            "message": "Penanganan created successfully",
        })),
        Err(e) => {
            log::error!("[API LP-LI ERROR] fetch after create: {}", e);
            HttpResponse::InternalServerError().json(json!({
                "code": -1,
                "message": e.to_string(),
                "content": null,
            }))
        }
    }
}

async fn read(pool: &MySqlPool, params: Value, scope: Option<String>) -> HttpResponse {
    let read_params: PenangananReadParams = match serde_json::from_value(params) {
        Ok(read_params) => read_params,
        Err(e) => {
            return HttpResponse::BadRequest().json(json!({
                "code": -1,
                "message": format!("Payload tidak valid: {}", e),
            }));
        }
    };

    let (offset, limit) = read_params.list.bounds();
    let (sort_col, ascending) = read_params.list.order(SORT_COLUMNS);

    let mut q = ListQuery::new();
    if let Some(search) = &read_params.list.search {
        q.search(search, SEARCH_COLUMNS);
    }
    if let Some(jenis) = &read_params.jenis {
        if !jenis.is_empty() {
            q.filter("jenis = ?", jenis);
        }
    }
    if let Some(from) = read_params.date_from {
        q.filter("tanggal >= ?", from.naive_utc().format("%Y-%m-%d %H:%M:%S"));
    }
    if let Some(until) = read_params.date_until {
        q.filter("tanggal <= ?", until.naive_utc().format("%Y-%m-%d %H:%M:%S"));
    }
    if let Some(username) = &scope {
        q.filter("user_create = ?", username);
    }

    let count_sql = q.count_sql("penanganan_lp_li");
    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    for bind in q.binds() {
        count_query = count_query.bind(bind);
    }
    let count = match count_query.fetch_one(pool).await {
        Ok(count) => count,
        Err(e) => {
            log::error!("[API LP-LI ERROR] count: {}", e);
            return HttpResponse::InternalServerError().json(json!({
                "code": -1,
                "message": e.to_string(),
                "content": null,
            }));
        }
    };

    let page_sql = q.page_sql("*", "penanganan_lp_li", &sort_col, ascending);
    let mut data_query = sqlx::query_as::<_, Penanganan>(&page_sql);
    for bind in q.binds() {
        data_query = data_query.bind(bind);
    }
    data_query = data_query.bind(limit).bind(offset);

    match data_query.fetch_all(pool).await {
        Ok(results) => HttpResponse::Ok().json(json!({
            "code": 0,
            "content": { "count": count, "results": results },
            "message": "Penanganan fetched successfully",
        })),
        Err(e) => {
            log::error!("[API LP-LI ERROR] read: {}", e);
            HttpResponse::InternalServerError().json(json!({
                "code": -1,
                "message": e.to_string(),
                "content": null,
            }))
        }
    }
}

async fn update(pool: &MySqlPool, params: Value, scope: Option<String>) -> HttpResponse {
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

    let mut data = obj.clone();
    if let Some(Value::String(s)) = data.get("tanggal") {
        let normalized = utils::normalize_datetime(s);
        data.insert("tanggal".to_string(), Value::String(normalized));
    }

    let (set, binds) = query::update_set(UPDATE_COLUMNS, &data);
    if set.is_empty() {
        return HttpResponse::BadRequest().json(json!({
            "code": -1,
            "message": "Tidak ada kolom untuk diupdate",
        }));
    }

    let mut sql = format!(
        "UPDATE penanganan_lp_li SET {}, updated_at = NOW() WHERE id = ?",
        set
    );
    if scope.is_some() {
        sql.push_str(" AND user_create = ?");
    }

    let mut update_query = sqlx::query(&sql);
    for bind in &binds {
        update_query = update_query.bind(bind);
    }
    update_query = update_query.bind(id);
    if let Some(username) = &scope {
        update_query = update_query.bind(username);
    }

    match update_query.execute(pool).await {
        Ok(result) if result.rows_affected() == 0 => HttpResponse::NotFound().json(json!({
            "code": -1,
            "message": "Data tidak ditemukan",
        })),
        Ok(_) => match fetch_by_id(pool, id).await {
            Ok(row) => HttpResponse::Ok().json(json!({
                "code": 0,
                "content": row.map(|r| vec![r]),
                "message": "Penanganan updated successfully",
            })),
            Err(e) => {
                log::error!("[API LP-LI ERROR] fetch after update: {}", e);
                HttpResponse::InternalServerError().json(json!({
                    "code": -1,
                    "message": e.to_string(),
                    "content": null,
                }))
            }
        },
        Err(e) => {
            log::error!("[API LP-LI ERROR] update: {}", e);
            HttpResponse::InternalServerError().json(json!({
                "code": -1,
                "message": e.to_string(),
                "content": null,
            }))
        }
    }
}

async fn delete(pool: &MySqlPool, params: Value, scope: Option<String>) -> HttpResponse {
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

    let mut sql = "DELETE FROM penanganan_lp_li WHERE id = ?".to_string();
    if scope.is_some() {
        sql.push_str(" AND user_create = ?");
    }

    let mut delete_query = sqlx::query(&sql).bind(id);
    if let Some(username) = &scope {
        delete_query = delete_query.bind(username);
    }

    match delete_query.execute(pool).await {
        Ok(result) if result.rows_affected() == 0 => HttpResponse::NotFound().json(json!({
            "code": -1,
            "message": "Data tidak ditemukan",
        })),
        Ok(_) => HttpResponse::Ok().json(json!({
            "code": 0,
            "message": "Penanganan deleted successfully",
        })),
        Err(e) => {
            log::error!("[API LP-LI ERROR] delete: {}", e);
            HttpResponse::InternalServerError().json(json!({
                "code": -1,
                "message": e.to_string(),
                "content": null,
            }))
        }
    }
}
