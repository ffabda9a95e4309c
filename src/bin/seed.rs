//! Inserts a fixed set of demo users, labels, and issues into the
//! configured store. Takes no flags; reads `DATABASE_PATH`/`MIGRATION_DIR`
//! the same way the main binary does. For local development and as the
//! fixture the integration tests' seed helper mirrors.

use chrono::Utc;
use issue_board::config::Config;
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    let config = Config::from_env();

    let pool = issue_board::store::connect(&config).await?;

    println!("Seeding demo users...");
    let users = [
        ("Alice Chen", Some("https://avatars.example.com/alice.png")),
        ("Bob Singh", Some("https://avatars.example.com/bob.png")),
        ("Casey Morgan", None),
    ];
    let mut user_ids = Vec::new();
    for (name, avatar_url) in users {
        let id = Uuid::new_v4().simple().to_string();
        sqlx::query("INSERT INTO users (id, name, avatar_url) VALUES (?, ?, ?)")
            .bind(&id)
            .bind(name)
            .bind(avatar_url)
            .execute(&pool)
            .await?;
        user_ids.push(id);
    }
    println!("✓ Seeded {} users", user_ids.len());

    println!("Seeding demo labels...");
    let labels = [
        ("bug", "#e53e3e"),
        ("feature", "#3182ce"),
        ("chore", "#718096"),
    ];
    let mut label_ids = Vec::new();
    for (name, color) in labels {
        let id = Uuid::new_v4().simple().to_string();
        sqlx::query("INSERT INTO labels (id, name, color) VALUES (?, ?, ?)")
            .bind(&id)
            .bind(name)
            .bind(color)
            .execute(&pool)
            .await?;
        label_ids.push(id);
    }
    println!("✓ Seeded {} labels", label_ids.len());

    println!("Seeding demo issues...");
    let issues = [
        ("Set up CI pipeline", "Backlog", "Medium", 0.0),
        ("Fix flaky login test", "Todo", "High", 0.0),
        ("Draft onboarding docs", "In Progress", "Low", 0.0),
    ];
    let now = Utc::now();
    for (idx, (title, status, priority, order_index)) in issues.into_iter().enumerate() {
        let id = Uuid::new_v4().simple().to_string();
        let assignee_id = user_ids.get(idx % user_ids.len());
        sqlx::query(
            "INSERT INTO issues (id, title, description, status, priority, assignee_id, \
             order_index, created_at, updated_at) VALUES (?, ?, '', ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(title)
        .bind(status)
        .bind(priority)
        .bind(assignee_id)
        .bind(order_index)
        .bind(now)
        .bind(now)
        .execute(&pool)
        .await?;

        if let Some(label_id) = label_ids.get(idx % label_ids.len()) {
            sqlx::query("INSERT INTO issue_labels (issue_id, label_id) VALUES (?, ?)")
                .bind(&id)
                .bind(label_id)
                .execute(&pool)
                .await?;
        }
    }
    println!("✓ Seeded {} issues", issues.len());

    println!("Done.");
    Ok(())
}
