//! Pembangun query list: search + sort + offset/limit menjadi
//! pasangan query COUNT dan query halaman dengan parameter bind.

use serde::Deserialize;
use serde_json::{Map, Value};

pub const DEFAULT_LIMIT: i64 = 10;
pub const DEFAULT_SORT: &str = "created_at";

/// Parameter list yang sama dipakai semua entity; filter tambahan
/// (status, jenis, rentang tanggal) hidup di struct params per entity.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub sort: Option<Map<String, Value>>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

impl ListParams {
    pub fn bounds(&self) -> (i64, i64) {
        page_bounds(self.offset, self.limit)
    }

    pub fn order(&self, allowed: &[&str]) -> (String, bool) {
        sort_key(&self.sort, allowed)
    }
}

pub fn page_bounds(offset: Option<i64>, limit: Option<i64>) -> (i64, i64) {
    let offset = offset.unwrap_or(0).max(0);
    let limit = limit.unwrap_or(DEFAULT_LIMIT).max(0);
    (offset, limit)
}

/// Hanya key pertama pada sort map yang dipakai. Nilai `-1` atau `false`
/// berarti descending, selain itu ascending. Key di luar allow-list
/// jatuh ke default `created_at` ascending.
pub fn sort_key(sort: &Option<Map<String, Value>>, allowed: &[&str]) -> (String, bool) {
    if let Some(map) = sort {
        if let Some((key, value)) = map.iter().next() {
            let ascending = !matches!(value, Value::Bool(false))
                && value.as_i64().map_or(true, |n| n != -1);
            if allowed.contains(&key.as_str()) {
                return (key.clone(), ascending);
            }
        }
    }
    (DEFAULT_SORT.to_string(), true)
}

/// Kumpulan kondisi WHERE beserta parameter bind-nya, dibangun dinamis
/// seperti filter list pendaftaran: vektor kondisi + vektor parameter.
#[derive(Debug, Default)]
pub struct ListQuery {
    conditions: Vec<String>,
    binds: Vec<String>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Substring case-insensitive di-OR-kan pada kolom allow-list.
    pub fn search(&mut self, term: &str, columns: &[&str]) {
        if term.is_empty() || columns.is_empty() {
            return;
        }
        let ors: Vec<String> = columns.iter().map(|c| format!("{} LIKE ?", c)).collect();
        self.conditions.push(format!("({})", ors.join(" OR ")));
        for _ in columns {
            self.binds.push(format!("%{}%", term));
        }
    }

    pub fn filter(&mut self, condition: &str, value: impl ToString) {
        self.conditions.push(condition.to_string());
        self.binds.push(value.to_string());
    }

    pub fn binds(&self) -> &[String] {
        &self.binds
    }

    fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.conditions.join(" AND "))
        }
    }

    /// `count` harus mencerminkan hasil terfilter sebelum paginasi.
    pub fn count_sql(&self, from: &str) -> String {
        format!("SELECT COUNT(*) FROM {}{}", from, self.where_clause())
    }

    /// Query halaman; kolom order diambil dari allow-list sehingga aman
    /// untuk diinterpolasi. LIMIT/OFFSET dibind oleh pemanggil.
    pub fn page_sql(&self, select: &str, from: &str, order_col: &str, ascending: bool) -> String {
        format!(
            "SELECT {} FROM {}{} ORDER BY {} {} LIMIT ? OFFSET ?",
            select,
            from,
            self.where_clause(),
            order_col,
            if ascending { "ASC" } else { "DESC" },
        )
    }
}

/// Reduksi `updateData` dinamis menjadi SET clause: hanya kolom pada
/// allow-list yang dipakai, nilai non-string diserialisasi sebagai JSON.
pub fn update_set(allowed: &[&str], data: &Map<String, Value>) -> (String, Vec<String>) {
    let mut sets = Vec::new();
    let mut binds = Vec::new();
    for col in allowed {
        if let Some(value) = data.get(*col) {
            sets.push(format!("{} = ?", col));
            binds.push(bind_value(value));
        }
    }
    (sets.join(", "), binds)
}

/// Boolean dipetakan ke "1"/"0" karena MySQL strict menolak literal
/// `true`/`false` untuk kolom TINYINT.
pub fn bind_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) => "0".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sort_map(key: &str, value: Value) -> Option<Map<String, Value>> {
        let mut map = Map::new();
        map.insert(key.to_string(), value);
        Some(map)
    }

    #[test]
    fn default_sort_is_created_at_ascending() {
        let (key, asc) = sort_key(&None, &["nama", "created_at"]);
        assert_eq!(key, "created_at");
        assert!(asc);
    }

    #[test]
    fn sort_direction_follows_value() {
        let (key, asc) = sort_key(&sort_map("nama", json!(-1)), &["nama"]);
        assert_eq!(key, "nama");
        assert!(!asc);

        let (_, asc) = sort_map("nama", json!(false))
            .map(|m| sort_key(&Some(m), &["nama"]))
            .unwrap();
        assert!(!asc);

        let (_, asc) = sort_key(&sort_map("nama", json!(1)), &["nama"]);
        assert!(asc);

        let (_, asc) = sort_key(&sort_map("nama", json!(true)), &["nama"]);
        assert!(asc);
    }

    #[test]
    fn unknown_sort_key_falls_back_to_default() {
        let (key, asc) = sort_key(&sort_map("password; DROP TABLE", json!(-1)), &["nama"]);
        assert_eq!(key, "created_at");
        assert!(asc);
    }

    #[test]
    fn search_builds_or_conditions_with_one_bind_per_column() {
        let mut q = ListQuery::new();
        q.search("Budi", &["nama", "nrp"]);

        assert_eq!(
            q.count_sql("personel"),
            "SELECT COUNT(*) FROM personel WHERE (nama LIKE ? OR nrp LIKE ?)"
        );
        assert_eq!(q.binds(), &["%Budi%".to_string(), "%Budi%".to_string()]);
    }

    #[test]
    fn empty_search_adds_nothing() {
        let mut q = ListQuery::new();
        q.search("", &["nama"]);
        assert_eq!(q.count_sql("personel"), "SELECT COUNT(*) FROM personel");
        assert!(q.binds().is_empty());
    }

    #[test]
    fn filters_and_search_are_and_combined() {
        let mut q = ListQuery::new();
        q.search("LP/12", &["nomor", "jenis"]);
        q.filter("jenis = ?", "LP");
        q.filter("tanggal >= ?", "2024-01-01");

        assert_eq!(
            q.page_sql("*", "penanganan_lp_li", "tanggal", false),
            "SELECT * FROM penanganan_lp_li WHERE (nomor LIKE ? OR jenis LIKE ?) \
             AND jenis = ? AND tanggal >= ? ORDER BY tanggal DESC LIMIT ? OFFSET ?"
        );
        assert_eq!(q.binds().len(), 4);
    }

    #[test]
    fn page_bounds_defaults_and_clamps() {
        assert_eq!(page_bounds(None, None), (0, DEFAULT_LIMIT));
        assert_eq!(page_bounds(Some(-5), Some(-1)), (0, 0));
        assert_eq!(page_bounds(Some(20), Some(10)), (20, 10));
    }

    #[test]
    fn page_slices_are_disjoint_and_exhaustive() {
        // offset/limit per halaman harus memotong 0..total tanpa celah.
        let total = 35i64;
        let limit = 10i64;
        let mut covered = 0i64;
        let mut page = 0i64;
        while covered < total {
            let (offset, lim) = page_bounds(Some(page * limit), Some(limit));
            assert_eq!(offset, covered);
            covered += lim.min(total - covered);
            page += 1;
        }
        assert_eq!(covered, total);
        assert_eq!(page, 4);
    }

    #[test]
    fn update_set_ignores_unknown_columns() {
        let data = json!({
            "status_proses": "Penyidikan",
            "pasal": ["362 KUHP", "55 KUHP"],
            "bogus": "x",
        });
        let (set, binds) = update_set(
            &["status_proses", "pasal", "rtl"],
            data.as_object().unwrap(),
        );

        assert_eq!(set, "status_proses = ?, pasal = ?");
        assert_eq!(binds[0], "Penyidikan");
        assert_eq!(binds[1], r#"["362 KUHP","55 KUHP"]"#);
    }

    #[test]
    fn bind_value_maps_bool_to_tinyint_literal() {
        assert_eq!(bind_value(&json!(true)), "1");
        assert_eq!(bind_value(&json!(false)), "0");
        assert_eq!(bind_value(&json!("true")), "true");

        let data = json!({ "is_active": false });
        let (set, binds) = update_set(&["is_active"], data.as_object().unwrap());
        assert_eq!(set, "is_active = ?");
        assert_eq!(binds, vec!["0".to_string()]);
    }

    #[test]
    fn update_set_empty_when_nothing_matches() {
        let data = json!({ "x": 1 });
        let (set, binds) = update_set(&["nama"], data.as_object().unwrap());
        assert!(set.is_empty());
        assert!(binds.is_empty());
    }
}
