use chrono::{Duration, Utc};

use crate::helpers::TestApp;

async fn open_event(
    client: &reqwest::Client,
    app: &TestApp,
    deadline: chrono::DateTime<Utc>
) -> reqwest::Response {
    client
        .post(format!("{}/pizza", app.get_app_url()))
        .form(&[
            ("event_name", "Piatkowa pizza".to_string()),
            ("company", "Pizzeria Stopiątka".to_string()),
            ("deadline", deadline.to_rfc3339()),
        ])
        .send()
        .await
        .unwrap()
}

#[actix_web::test]
async fn opening_and_viewing_a_pizza_event_works(){
    let app = TestApp::spawn_app().await;
    let (client, user) = app.login_user().await;

    let response = open_event(&client, &app, Utc::now() + Duration::hours(2)).await;
    assert_eq!(response.status().as_u16(), 201);

    let response = client
        .get(format!("{}/pizza", app.get_app_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let event = response.json::<serde_json::Value>().await.unwrap();
    assert_eq!(event["event_name"], "Piatkowa pizza");
    assert_eq!(event["created_by"], user.user_id.to_string());
    assert_eq!(event["closed"], false);
}

#[actix_web::test]
async fn only_one_event_may_be_open_at_a_time(){
    let app = TestApp::spawn_app().await;
    let (client, _) = app.login_user().await;
    let (other_client, _) = app.login_user().await;

    let response = open_event(&client, &app, Utc::now() + Duration::hours(2)).await;
    assert_eq!(response.status().as_u16(), 201);

    let response = open_event(&other_client, &app, Utc::now() + Duration::hours(2)).await;
    assert_eq!(response.status().as_u16(), 409);
}

#[actix_web::test]
async fn choices_are_grouped_per_participant(){
    let app = TestApp::spawn_app().await;
    let (client, user) = app.login_user().await;
    let (other_client, other) = app.login_user().await;

    open_event(&client, &app, Utc::now() + Duration::hours(2)).await;

    for (who, item, size) in [
        (&client, "Margherita", "40cm"),
        (&client, "Capricciosa", "32cm"),
        (&other_client, "Hawajska", "32cm"),
    ] {
        let response = who
            .post(format!("{}/pizza/choices", app.get_app_url()))
            .form(&[("item", item), ("size", size)])
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 201);
    }

    let response = client
        .get(format!("{}/pizza", app.get_app_url()))
        .send()
        .await
        .unwrap();
    let event = response.json::<serde_json::Value>().await.unwrap();

    let mine = event["choices"][user.user_id.to_string()].as_array().unwrap();
    assert_eq!(mine.len(), 2);
    assert_eq!(mine[0]["item"], "Margherita");
    assert_eq!(mine[0]["size"], "40cm");

    let theirs = event["choices"][other.user_id.to_string()].as_array().unwrap();
    assert_eq!(theirs.len(), 1);
    assert_eq!(theirs[0]["item"], "Hawajska");
}

#[actix_web::test]
async fn choices_after_the_deadline_are_rejected(){
    let app = TestApp::spawn_app().await;
    let (client, _) = app.login_user().await;

    open_event(&client, &app, Utc::now() - Duration::minutes(5)).await;

    let response = client
        .post(format!("{}/pizza/choices", app.get_app_url()))
        .form(&[("item", "Margherita")])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 409);
}

#[actix_web::test]
async fn only_the_creator_may_close_the_event(){
    let app = TestApp::spawn_app().await;
    let (creator, _) = app.login_user().await;
    let (other_client, _) = app.login_user().await;

    let response = open_event(&creator, &app, Utc::now() + Duration::hours(2)).await;
    let event_id = response.json::<serde_json::Value>().await.unwrap();
    let event_id = event_id.as_str().unwrap().to_string();

    let response = other_client
        .post(format!("{}/pizza/close", app.get_app_url()))
        .form(&[("event_id", &event_id)])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 403);

    let response = creator
        .post(format!("{}/pizza/close", app.get_app_url()))
        .form(&[("event_id", &event_id)])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    // nothing open any more
    let response = creator
        .get(format!("{}/pizza", app.get_app_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);

    let response = creator
        .post(format!("{}/pizza/choices", app.get_app_url()))
        .form(&[("item", "Margherita")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
}

#[actix_web::test]
async fn a_closed_event_makes_room_for_the_next_one(){
    let app = TestApp::spawn_app().await;
    let (client, _) = app.login_user().await;

    let response = open_event(&client, &app, Utc::now() + Duration::hours(2)).await;
    let event_id = response.json::<serde_json::Value>().await.unwrap();
    let event_id = event_id.as_str().unwrap().to_string();

    client
        .post(format!("{}/pizza/close", app.get_app_url()))
        .form(&[("event_id", &event_id)])
        .send()
        .await
        .unwrap();

    let response = open_event(&client, &app, Utc::now() + Duration::hours(2)).await;
    assert_eq!(response.status().as_u16(), 201);
}
