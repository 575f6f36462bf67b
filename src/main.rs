use estate_photo_kit::config::get_config;
use estate_photo_kit::routes::create_routes;
use estate_photo_kit::services::fal::FalClient;
use estate_photo_kit::AppState;
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config = get_config();

    let db = Database::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    println!("Database connected, migrations applied");

    let fal = FalClient::from_config(config);
    if !fal.is_configured() {
        eprintln!("Warning: FAL_API_KEY not set, photo edit requests will fail");
    }
    println!("Image editing via {} ({})", config.fal_model, config.fal_base_url);

    let app = create_routes(AppState { db, fal });

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .expect("Failed to bind port");
    println!("Listening on {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.unwrap();
}
