use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::error::StorageError;
use crate::models::{encode_nutrients, Ingredient, IngredientRow, NewIngredient, NewIngredientRow};

no_arg_sql_function!(
    last_insert_rowid,
    diesel::sql_types::BigInt,
    "Id of the last row inserted on this connection"
);

/// Every record, newest first. One undecodable row fails the whole listing.
pub(crate) fn list_ingredients(conn: &SqliteConnection) -> Result<Vec<Ingredient>, StorageError> {
    use crate::schema::posts::dsl::*;

    let rows = posts
        .order((created_at.desc(), id.desc()))
        .load::<IngredientRow>(conn)?;

    rows.into_iter()
        .map(|row| row.into_ingredient().map_err(StorageError::from))
        .collect()
}

/// Inserts a record and returns the id the store assigned to it.
pub(crate) fn create_ingredient(
    new: &NewIngredient,
    conn: &SqliteConnection,
) -> Result<i64, StorageError> {
    use crate::schema::posts;

    let encoded = encode_nutrients(&new.nutrients)?;
    let row = NewIngredientRow {
        title: &new.title,
        description: new.description.as_deref(),
        benefits: new.benefits.as_deref(),
        nutrients: Some(&encoded),
        image_url: new.image_url.as_deref(),
        category: new.category.as_deref(),
    };

    // the rowid read must happen on the connection that did the insert
    let new_id = conn.transaction::<_, diesel::result::Error, _>(|| {
        diesel::insert_into(posts::table).values(&row).execute(conn)?;
        diesel::select(last_insert_rowid).get_result::<i64>(conn)
    })?;
    Ok(new_id)
}

/// Removing an id that is not stored is a no-op.
pub(crate) fn delete_ingredient(post_id: i64, conn: &SqliteConnection) -> Result<(), StorageError> {
    use crate::schema::posts::dsl::*;

    let removed = diesel::delete(posts.filter(id.eq(post_id))).execute(conn)?;
    if removed == 0 {
        log::debug!("delete of absent post {post_id}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use crate::models::Nutrient;

    fn nutrient(name: &str, amount: &str, unit: &str) -> Nutrient {
        Nutrient {
            name: name.to_string(),
            amount: amount.to_string(),
            unit: unit.to_string(),
        }
    }

    fn avocado() -> NewIngredient {
        NewIngredient {
            title: "Avocado".to_string(),
            description: Some("Creamy fruit".to_string()),
            benefits: Some("Heart healthy".to_string()),
            nutrients: vec![nutrient("Potassium", "975", "mg")],
            image_url: Some("".to_string()),
            category: Some("fruit".to_string()),
        }
    }

    #[test]
    fn create_then_list_returns_the_record() {
        let (_dir, pool) = test_pool();
        let conn = pool.get().unwrap();

        let new_id = create_ingredient(&avocado(), &conn).unwrap();
        assert!(new_id > 0);

        let all = list_ingredients(&conn).unwrap();
        let matching: Vec<&Ingredient> = all.iter().filter(|r| r.id == new_id).collect();
        assert_eq!(matching.len(), 1);

        let record = matching[0];
        assert_eq!(record.title, "Avocado");
        assert_eq!(record.description.as_deref(), Some("Creamy fruit"));
        assert_eq!(record.benefits.as_deref(), Some("Heart healthy"));
        assert_eq!(record.image_url.as_deref(), Some(""));
        assert_eq!(record.category.as_deref(), Some("fruit"));
        assert_eq!(record.nutrients, vec![nutrient("Potassium", "975", "mg")]);
    }

    #[test]
    fn list_is_newest_first() {
        let (_dir, pool) = test_pool();
        let conn = pool.get().unwrap();

        let a = create_ingredient(&avocado(), &conn).unwrap();
        let b = create_ingredient(
            &NewIngredient {
                title: "Beef".to_string(),
                category: Some("meat".to_string()),
                ..Default::default()
            },
            &conn,
        )
        .unwrap();

        let ids: Vec<i64> = list_ingredients(&conn).unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![b, a]);
    }

    #[test]
    fn delete_is_idempotent() {
        let (_dir, pool) = test_pool();
        let conn = pool.get().unwrap();

        let new_id = create_ingredient(&avocado(), &conn).unwrap();
        delete_ingredient(new_id, &conn).unwrap();
        assert!(list_ingredients(&conn)
            .unwrap()
            .iter()
            .all(|r| r.id != new_id));

        delete_ingredient(new_id, &conn).unwrap();
        delete_ingredient(9999, &conn).unwrap();
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let (_dir, pool) = test_pool();
        let conn = pool.get().unwrap();

        let first = create_ingredient(&avocado(), &conn).unwrap();
        delete_ingredient(first, &conn).unwrap();
        let second = create_ingredient(&avocado(), &conn).unwrap();
        assert!(second > first);
    }

    #[test]
    fn optional_fields_stay_absent() {
        let (_dir, pool) = test_pool();
        let conn = pool.get().unwrap();

        create_ingredient(
            &NewIngredient {
                title: "Moss".to_string(),
                ..Default::default()
            },
            &conn,
        )
        .unwrap();

        let record = &list_ingredients(&conn).unwrap()[0];
        assert_eq!(record.description, None);
        assert_eq!(record.category, None);
        assert!(record.nutrients.is_empty());
    }

    #[test]
    fn corrupted_nutrients_fail_the_listing() {
        use diesel::connection::SimpleConnection;

        let (_dir, pool) = test_pool();
        let conn = pool.get().unwrap();

        create_ingredient(&avocado(), &conn).unwrap();
        conn.batch_execute("INSERT INTO posts (title, nutrients) VALUES ('Broken', '{oops')")
            .unwrap();

        assert!(matches!(
            list_ingredients(&conn),
            Err(StorageError::Nutrients(_))
        ));
    }

    #[test]
    fn rows_written_without_nutrients_still_list() {
        use diesel::connection::SimpleConnection;

        let (_dir, pool) = test_pool();
        let conn = pool.get().unwrap();

        conn.batch_execute("INSERT INTO posts (title, category) VALUES ('Salt', 'resource')")
            .unwrap();

        let all = list_ingredients(&conn).unwrap();
        assert_eq!(all.len(), 1);
        assert!(all[0].nutrients.is_empty());
    }

    #[test]
    fn ids_beyond_32_bits_round_trip() {
        use diesel::connection::SimpleConnection;

        let (_dir, pool) = test_pool();
        let conn = pool.get().unwrap();

        conn.batch_execute("INSERT INTO posts (id, title) VALUES (3000000000, 'Big')")
            .unwrap();
        let ids: Vec<i64> = list_ingredients(&conn).unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3_000_000_000]);

        let next = create_ingredient(&avocado(), &conn).unwrap();
        assert_eq!(next, 3_000_000_001);

        delete_ingredient(3_000_000_000, &conn).unwrap();
        let ids: Vec<i64> = list_ingredients(&conn).unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![next]);
    }

    #[test]
    fn concurrent_creates_get_distinct_ids() {
        use std::collections::HashSet;
        use std::thread;

        const THREADS: usize = 4;
        const PER_THREAD: usize = 25;

        let (_dir, pool) = test_pool();
        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let pool = pool.clone();
                thread::spawn(move || {
                    (0..PER_THREAD)
                        .map(|i| {
                            let conn = pool.get().unwrap();
                            let new = NewIngredient {
                                title: format!("Seed {t}-{i}"),
                                ..Default::default()
                            };
                            create_ingredient(&new, &conn).unwrap()
                        })
                        .collect::<Vec<i64>>()
                })
            })
            .collect();

        let ids: HashSet<i64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        assert_eq!(ids.len(), THREADS * PER_THREAD);

        let conn = pool.get().unwrap();
        let listed = list_ingredients(&conn).unwrap();
        assert_eq!(listed.len(), THREADS * PER_THREAD);
        assert!(listed.iter().all(|r| ids.contains(&r.id)));
    }

    #[test]
    fn tables_from_older_databases_still_list() {
        use diesel::connection::SimpleConnection;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nature.db");
        let pool = crate::db::build_pool(path.to_str().unwrap(), 2).unwrap();
        let conn = pool.get().unwrap();
        conn.batch_execute(
            "CREATE TABLE posts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                description TEXT,
                benefits TEXT,
                nutrients TEXT,
                image_url TEXT,
                category TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );
            INSERT INTO posts (title, nutrients) VALUES ('Kale', '[]');
            INSERT INTO posts (title, created_at) VALUES ('Undated', NULL);",
        )
        .unwrap();
        crate::db::init_schema(&pool).unwrap();

        let all = list_ingredients(&conn).unwrap();
        let titles: Vec<&str> = all.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Kale", "Undated"]);
        assert!(all[0].created_at.is_some());
        assert_eq!(all[1].created_at, None);

        let new_id = create_ingredient(&avocado(), &conn).unwrap();
        assert_eq!(list_ingredients(&conn).unwrap()[0].id, new_id);
    }
}
