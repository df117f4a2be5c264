use mongodb::bson::Document;
use secrecy::Secret;
use uuid::Uuid;
use voice_sample_service::config::credentials::MongoCredentials;
use voice_sample_service::config::MongoConfig;
use voice_sample_service::models::VoiceSample;
use voice_sample_service::services::{MongoDb, VoiceStore};

async fn connect() -> (MongoDb, String) {
    let uri = std::env::var("MONGODB_URI")
        .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
    let database = format!("voice_app_test_{}", Uuid::new_v4().simple());

    let config = MongoConfig {
        credentials: None,
        credential_source: None,
        database: database.clone(),
        health_check_collection: "health-checks".to_string(),
        voice_sample_collection: "voice-samples".to_string(),
    };

    let db = MongoDb::connect(&MongoCredentials::ConnectionString(Secret::new(uri)), &config)
        .await
        .expect("Failed to connect to MongoDB");
    (db, database)
}

#[tokio::test]
#[ignore = "Requires MongoDB on MONGODB_URI (default mongodb://localhost:27017)"]
async fn insert_find_delete_round_trip() {
    let (db, database) = connect().await;

    let id = db
        .insert_voice_sample(VoiceSample::new("1.2.3.4".to_string(), vec![vec![Some(1.0), Some(2.0)]]))
        .await
        .expect("Failed to insert");

    let found = db.find_voice_samples(10).await.expect("Failed to query");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, Some(id));
    assert_eq!(found[0].audio, vec![vec![Some(1.0), Some(2.0)]]);

    assert_eq!(db.delete_voice_sample(id).await.unwrap(), 1);
    assert_eq!(db.delete_voice_sample(id).await.unwrap(), 0);

    let _ = db.client().database(&database).drop(None).await;
}

#[tokio::test]
#[ignore = "Requires MongoDB on MONGODB_URI (default mongodb://localhost:27017)"]
async fn health_checks_are_capped() {
    let (db, database) = connect().await;

    let raw = db.database().collection::<Document>("health-checks");
    let records: Vec<Document> = (0..12)
        .map(|i| mongodb::bson::doc! { "probe": i })
        .collect();
    raw.insert_many(records, None).await.expect("Failed to seed");

    assert_eq!(db.find_health_checks(10).await.unwrap().len(), 10);

    let _ = db.client().database(&database).drop(None).await;
}
