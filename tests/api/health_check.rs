use crate::helpers::TestApp;

#[actix_web::test]
async fn health_check_works(){
    let app = TestApp::spawn_app().await;

    let response = reqwest::get(format!("{}/health", app.get_app_url()))
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
}

#[actix_web::test]
async fn info_page_shows_the_seeded_text(){
    let app = TestApp::spawn_app().await;

    let response = reqwest::get(format!("{}/info", app.get_app_url()))
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    let body = response.json::<serde_json::Value>().await.unwrap();
    assert_eq!(
        body["info_page_text"].as_str().unwrap(),
        "Sample message please change me!"
    );
}
