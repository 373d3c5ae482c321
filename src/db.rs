use sqlx::MySqlPool;

pub async fn init_db(database_url: &str) -> MySqlPool {
    let pool = MySqlPool::connect(database_url)
        .await
        .expect("Failed to connect to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// MySQL reports duplicate-key inserts as SQLSTATE 23000. The unique key on
/// (employee_id, company_code, date) makes this the canonical "a record for
/// that day already exists" signal for clock-in and the absence sweep alike.
pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = e {
        return db_err.code().as_deref() == Some("23000");
    }
    false
}
