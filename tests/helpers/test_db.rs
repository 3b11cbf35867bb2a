use calldesk::database::Database;
use calldesk::models::{User, UserRole};
use calldesk::services::auth::hash_password;
use uuid::Uuid;

/// Password that satisfies the complexity rules; shared by test fixtures.
#[allow(dead_code)]
pub const TEST_PASSWORD: &str = "SecureP@ssw0rd1";

/// File-based SQLite with a unique name per test so tests can run in
/// parallel. Schema comes from the real embedded migrations.
pub async fn setup_test_db() -> Database {
    let temp_file = format!("test_{}.db", Uuid::new_v4());
    let db_url = format!("sqlite://{}?mode=rwc", temp_file);

    let db = Database::connect(&db_url)
        .await
        .expect("Failed to connect to test database");

    db.run_migrations()
        .await
        .expect("Failed to run migrations");

    db
}

#[allow(dead_code)]
pub async fn create_test_user(db: &Database, email: &str, role: UserRole) -> User {
    let password_hash = hash_password(TEST_PASSWORD).expect("Failed to hash password");
    let user = User::new(
        email.to_string(),
        format!("User {}", &email[..email.find('@').unwrap_or(email.len())]),
        role,
        password_hash,
    );
    db.create_user(&user).await.expect("Failed to create user");
    user
}
