use anyhow::{Context, Result};
use sqlx::MySqlPool;
use tracing::info;

pub async fn init_db(database_url: &str) -> Result<MySqlPool> {
    let pool = MySqlPool::connect(database_url)
        .await
        .context("Failed to connect to database")?;

    run_migrations(&pool).await?;
    Ok(pool)
}

pub async fn run_migrations(pool: &MySqlPool) -> Result<()> {
    info!("Running database migrations...");

    create_employees_table(pool).await?;
    create_geo_locations_table(pool).await?;
    create_attendance_table(pool).await?;
    create_leave_requests_table(pool).await?;

    info!("Database migrations completed successfully");
    Ok(())
}

async fn create_employees_table(pool: &MySqlPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS employees (
            id BIGINT UNSIGNED PRIMARY KEY AUTO_INCREMENT,
            employee_code VARCHAR(32) NOT NULL UNIQUE,
            first_name VARCHAR(100) NOT NULL,
            last_name VARCHAR(100) NOT NULL,
            created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

// `singleton` can only ever hold 1, which caps the table at one row.
async fn create_geo_locations_table(pool: &MySqlPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS geo_locations (
            singleton TINYINT UNSIGNED NOT NULL DEFAULT 1 PRIMARY KEY,
            location_name VARCHAR(100) NOT NULL,
            latitude DOUBLE NOT NULL,
            longitude DOUBLE NOT NULL,
            radius_meters INT UNSIGNED NOT NULL,
            set_by BIGINT UNSIGNED NOT NULL,
            set_at DATETIME NOT NULL,
            CONSTRAINT chk_geo_singleton CHECK (singleton = 1)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_attendance_table(pool: &MySqlPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS attendance (
            attendance_id BIGINT UNSIGNED PRIMARY KEY AUTO_INCREMENT,
            employee_id BIGINT UNSIGNED NOT NULL,
            attendance_date DATE NOT NULL,
            time_in TIME NOT NULL,
            status VARCHAR(20) NOT NULL,
            recorded_latitude DOUBLE NOT NULL,
            recorded_longitude DOUBLE NOT NULL,
            created_at DATETIME NOT NULL DEFAULT (UTC_TIMESTAMP()),
            UNIQUE KEY uq_attendance_day (employee_id, attendance_date, status)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_leave_requests_table(pool: &MySqlPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS leave_requests (
            leave_id BIGINT UNSIGNED PRIMARY KEY AUTO_INCREMENT,
            employee_id BIGINT UNSIGNED NOT NULL,
            from_date DATE NOT NULL,
            to_date DATE NOT NULL,
            return_date DATE NOT NULL,
            num_days INT UNSIGNED NOT NULL,
            reason TEXT NOT NULL,
            status VARCHAR(20) NOT NULL DEFAULT 'Pending',
            applied_at DATETIME NOT NULL,
            reviewed_by BIGINT UNSIGNED NULL,
            reviewed_at DATETIME NULL,
            hr_comments TEXT NULL,
            INDEX idx_leave_employee (employee_id, applied_at),
            INDEX idx_leave_status (status, applied_at)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
