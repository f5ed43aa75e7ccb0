use eyre::{Result, WrapErr};
use sqlx::{Pool, Postgres};
use tracing::{debug, info};

const TABLES: [(&str, &str); 5] = [
    (
        "profiles",
        r#"
        CREATE TABLE IF NOT EXISTS profiles (
            id UUID PRIMARY KEY,
            first_name VARCHAR(255) NULL,
            last_name VARCHAR(255) NULL,
            phone VARCHAR(64) NULL,
            user_type VARCHAR(16) NOT NULL DEFAULT 'client',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_user_type CHECK (user_type IN ('client', 'business', 'admin'))
        );
        "#,
    ),
    (
        "businesses",
        r#"
        CREATE TABLE IF NOT EXISTS businesses (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            owner_id UUID NOT NULL REFERENCES profiles(id),
            name VARCHAR(255) NOT NULL,
            description TEXT NULL,
            category VARCHAR(255) NOT NULL,
            address TEXT NULL,
            phone VARCHAR(64) NULL,
            email VARCHAR(255) NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    ),
    (
        "services",
        r#"
        CREATE TABLE IF NOT EXISTS services (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            business_id UUID NOT NULL REFERENCES businesses(id),
            name VARCHAR(255) NOT NULL,
            description TEXT NULL,
            price DOUBLE PRECISION NOT NULL DEFAULT 0,
            duration INTEGER NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT positive_duration CHECK (duration IS NULL OR duration > 0)
        );
        "#,
    ),
    (
        "business_hours",
        r#"
        CREATE TABLE IF NOT EXISTS business_hours (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            business_id UUID NOT NULL REFERENCES businesses(id),
            day_of_week SMALLINT NOT NULL,
            open_time TIME NULL,
            close_time TIME NULL,
            is_closed BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_day_of_week CHECK (day_of_week BETWEEN 0 AND 6),
            CONSTRAINT one_row_per_weekday UNIQUE (business_id, day_of_week)
        );
        "#,
    ),
    (
        "bookings",
        r#"
        CREATE TABLE IF NOT EXISTS bookings (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            user_id UUID NOT NULL REFERENCES profiles(id),
            service_id UUID NOT NULL REFERENCES services(id),
            business_id UUID NOT NULL REFERENCES businesses(id),
            booking_date DATE NOT NULL,
            booking_time TIME NOT NULL,
            status VARCHAR(16) NOT NULL DEFAULT 'pending',
            notes TEXT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_status CHECK (status IN ('pending', 'confirmed', 'cancelled', 'completed'))
        );
        "#,
    ),
];

const INDEXES: [&str; 4] = [
    "CREATE INDEX IF NOT EXISTS idx_services_business_id ON services(business_id)",
    "CREATE INDEX IF NOT EXISTS idx_bookings_business_date ON bookings(business_id, booking_date)",
    "CREATE INDEX IF NOT EXISTS idx_bookings_user_id ON bookings(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_businesses_owner_id ON businesses(owner_id)",
];

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    for (table, ddl) in TABLES {
        debug!("Creating table {}", table);
        sqlx::query(ddl)
            .execute(pool)
            .await
            .wrap_err_with(|| format!("Failed to create table {table}"))?;
    }

    for ddl in INDEXES {
        sqlx::query(ddl).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
