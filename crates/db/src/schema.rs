use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create times table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS times (
            id SERIAL PRIMARY KEY,
            uuid UUID NOT NULL UNIQUE,
            start_time VARCHAR(8) NOT NULL,
            end_time VARCHAR(8) NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create fields table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS fields (
            id SERIAL PRIMARY KEY,
            uuid UUID NOT NULL UNIQUE,
            code VARCHAR(15) NOT NULL,
            name VARCHAR(100) NOT NULL,
            price_per_hour INTEGER NOT NULL,
            images TEXT[] NOT NULL DEFAULT '{}',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT positive_price CHECK (price_per_hour > 0)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create field_schedules table; the unique constraint closes the race
    // between the existence check and the batch insert.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS field_schedules (
            id SERIAL PRIMARY KEY,
            uuid UUID NOT NULL UNIQUE,
            field_id INTEGER NOT NULL REFERENCES fields(id),
            time_id INTEGER NOT NULL REFERENCES times(id),
            date DATE NOT NULL,
            status VARCHAR(20) NOT NULL DEFAULT 'available',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT field_schedules_slot_unique UNIQUE (field_id, time_id, date),
            CONSTRAINT valid_status CHECK (status IN ('available', 'booked'))
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes, one statement each since prepared queries take a single command
    for statement in [
        "CREATE INDEX IF NOT EXISTS idx_times_start_time ON times(start_time)",
        "CREATE INDEX IF NOT EXISTS idx_field_schedules_field_id_date ON field_schedules(field_id, date)",
        "CREATE INDEX IF NOT EXISTS idx_field_schedules_time_id ON field_schedules(time_id)",
    ] {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
