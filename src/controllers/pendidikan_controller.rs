use actix_web::{post, web, HttpResponse};
use serde_json::{json, Value};
use sqlx::MySqlPool;
use uuid::Uuid;

use crate::models::pendidikan::{
    NewPendidikan, PendidikanResponse, PendidikanWithPersonel, SEARCH_COLUMNS, SORT_COLUMNS,
    UPDATE_COLUMNS,
};
use crate::query::{self, ListParams, ListQuery};

const FROM: &str = "pendidikan_personel pp JOIN personel p ON p.id = pp.personel_id";
const SELECT: &str = "pp.id, pp.personel_id, pp.jenis, pp.nama_sekolah, pp.tahun_mulai, \
     pp.tahun_selesai, pp.created_at, p.nama AS personel_nama, p.nrp AS personel_nrp, \
     p.pangkat AS personel_pangkat, p.jabatan AS personel_jabatan";

#[post("/api/pendidikan")]
pub async fn pendidikan(pool: web::Data<MySqlPool>, params: web::Json<Value>) -> HttpResponse {
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

async fn fetch_by_id(
    pool: &MySqlPool,
    id: &str,
) -> Result<Option<PendidikanResponse>, sqlx::Error> {
    let sql = format!("SELECT {} FROM {} WHERE pp.id = ?", SELECT, FROM);
    let row = sqlx::query_as::<_, PendidikanWithPersonel>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(PendidikanResponse::from))
}

async fn create(pool: &MySqlPool, params: Value) -> HttpResponse {
    let input: NewPendidikan = match serde_json::from_value(params) {
        Ok(input) => input,
        Err(e) => {
            return HttpResponse::BadRequest().json(json!({
                "code": -1,
                "message": format!("Payload tidak valid: {}", e),
            }));
        }
    };
    if input.jenis.is_empty() || input.nama_sekolah.is_empty() {
        return HttpResponse::BadRequest().json(json!({
            "code": -1,
            "message": "Jenis dan nama sekolah wajib diisi",
        }));
    }

    let tahun_mulai: i32 = input.tahun_mulai.trim().parse().unwrap_or(0);
    let tahun_selesai: Option<i32> = input.tahun_selesai.trim().parse().ok();

    let id = Uuid::new_v4().to_string();
    let result = sqlx::query(
        "INSERT INTO pendidikan_personel (id, personel_id, jenis, nama_sekolah, tahun_mulai, tahun_selesai) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&input.personel_id)
    .bind(&input.jenis)
    .bind(&input.nama_sekolah)
    .bind(tahun_mulai)
    .bind(tahun_selesai)
    .execute(pool)
    .await;

    if let Err(e) = result {
        log::error!("[API PENDIDIKAN ERROR] create: {}", e);
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
            "message": "Pendidikan created successfully",
        })),
        Err(e) => {
            log::error!("[API PENDIDIKAN ERROR] fetch after create: {}", e);
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
            log::error!("[API PENDIDIKAN ERROR] count: {}", e);
            return HttpResponse::InternalServerError().json(json!({
                "code": -1,
                "message": e.to_string(),
                "content": null,
            }));
        }
    };

    let page_sql = q.page_sql(SELECT, FROM, &format!("pp.{}", sort_col), ascending);
    let mut data_query = sqlx::query_as::<_, PendidikanWithPersonel>(&page_sql);
    for bind in q.binds() {
        data_query = data_query.bind(bind);
    }
    data_query = data_query.bind(limit).bind(offset);

    match data_query.fetch_all(pool).await {
        Ok(rows) => {
            let results: Vec<PendidikanResponse> =
                rows.into_iter().map(PendidikanResponse::from).collect();
            HttpResponse::Ok().json(json!({
                "code": 0,
                "content": { "count": count, "results": results },
                "message": "Pendidikan fetched successfully",
            }))
        }
        Err(e) => {
            log::error!("[API PENDIDIKAN ERROR] read: {}", e);
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

    let (set, binds) = query::update_set(UPDATE_COLUMNS, obj);
    if set.is_empty() {
        return HttpResponse::BadRequest().json(json!({
            "code": -1,
            "message": "Tidak ada kolom untuk diupdate",
        }));
    }

    let sql = format!("UPDATE pendidikan_personel SET {} WHERE id = ?", set);
    let mut update_query = sqlx::query(&sql);
    for bind in &binds {
        update_query = update_query.bind(bind);
    }
    update_query = update_query.bind(id);

    match update_query.execute(pool).await {
        Ok(result) if result.rows_affected() == 0 => HttpResponse::NotFound().json(json!({
            "code": -1,
            "message": "Data tidak ditemukan",
        })),
        Ok(_) => match fetch_by_id(pool, id).await {
            Ok(row) => HttpResponse::Ok().json(json!({
                "code": 0,
                "content": row.map(|r| vec![r]),
                "message": "Pendidikan updated successfully",
            })),
            Err(e) => {
                log::error!("[API PENDIDIKAN ERROR] fetch after update: {}", e);
                HttpResponse::InternalServerError().json(json!({
                    "code": -1,
                    "message": e.to_string(),
                    "content": null,
                }))
            }
        },
        Err(e) => {
            log::error!("[API PENDIDIKAN ERROR] update: {}", e);
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

    match sqlx::query("DELETE FROM pendidikan_personel WHERE id = ?")
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
            "message": "Pendidikan deleted successfully",
        })),
        Err(e) => {
            log::error!("[API PENDIDIKAN ERROR] delete: {}", e);
            HttpResponse::InternalServerError().json(json!({
                "code": -1,
                "message": e.to_string(),
                "content": null,
            }))
        }
    }
}
