use crate::error::Result;
use crate::models::{UserProfile, UserRole};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

/// Input for the registration upsert. The id and email come from the auth
/// provider's token, everything else from the registration form.
#[derive(Debug, Clone)]
pub struct UpsertProfileInput {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub college_usn: Option<String>,
    pub department: Option<String>,
    pub year: Option<i16>,
    pub role: UserRole,
}

/// Create or refresh a profile after the auth provider finishes sign-up.
/// The role is already canonical here; re-registration never changes an
/// existing role (admins keep their grants).
pub async fn upsert_profile(pool: &PgPool, input: &UpsertProfileInput) -> Result<UserProfile> {
    let profile = sqlx::query_as::<_, UserProfile>(
        r#"
        INSERT INTO users (id, name, email, college_usn, department, year, role)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (id) DO UPDATE
        SET name = EXCLUDED.name,
            college_usn = EXCLUDED.college_usn,
            department = EXCLUDED.department,
            year = EXCLUDED.year,
            updated_at = NOW()
        RETURNING *
        "#,
    )
    .bind(input.id)
    .bind(&input.name)
    .bind(&input.email)
    .bind(&input.college_usn)
    .bind(&input.department)
    .bind(input.year)
    .bind(input.role)
    .fetch_one(pool)
    .await?;

    Ok(profile)
}

/// Get a profile by ID.
pub async fn find_profile(pool: &PgPool, user_id: Uuid) -> Result<Option<UserProfile>> {
    let profile = sqlx::query_as::<_, UserProfile>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    Ok(profile)
}

/// Look up a user by email (admin search). Emails are stored lowercase.
pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<UserProfile>> {
    let profile = sqlx::query_as::<_, UserProfile>("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?;

    Ok(profile)
}

/// Update the mutable profile fields (settings page).
pub async fn update_profile(
    pool: &PgPool,
    user_id: Uuid,
    name: Option<&str>,
    department: Option<&str>,
    year: Option<i16>,
) -> Result<UserProfile> {
    let profile = sqlx::query_as::<_, UserProfile>(
        r#"
        UPDATE users
        SET name = COALESCE($2, name),
            department = COALESCE($3, department),
            year = COALESCE($4, year),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(name)
    .bind(department)
    .bind(year)
    .fetch_one(pool)
    .await?;

    Ok(profile)
}

/// Set a user's role. Runs inside the caller's transaction so the audit
/// entry commits with it.
pub async fn set_role(
    conn: &mut PgConnection,
    user_id: Uuid,
    role: UserRole,
) -> Result<UserProfile> {
    let profile = sqlx::query_as::<_, UserProfile>(
        r#"
        UPDATE users
        SET role = $2, updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(role)
    .fetch_one(conn)
    .await?;

    Ok(profile)
}

/// Bump the uploader's counter inside the upload transaction.
pub async fn increment_upload_count(conn: &mut PgConnection, user_id: Uuid) -> Result<()> {
    sqlx::query("UPDATE users SET upload_count = upload_count + 1 WHERE id = $1")
        .bind(user_id)
        .execute(conn)
        .await?;

    Ok(())
}

/// Everyone holding an admin or super_admin role.
pub async fn list_admins(pool: &PgPool) -> Result<Vec<UserProfile>> {
    let admins = sqlx::query_as::<_, UserProfile>(
        r#"
        SELECT * FROM users
        WHERE role IN ('admin', 'super_admin')
        ORDER BY created_at ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(admins)
}

/// Count of registered users (dashboard stats).
pub async fn count_users(pool: &PgPool) -> Result<i64> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    Ok(count)
}
