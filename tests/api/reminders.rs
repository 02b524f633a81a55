use chrono::{Datelike, Utc};
use wiremock::{matchers::path, Mock, ResponseTemplate};

use crate::helpers::{midnight, received_emails, TestApp};

#[actix_web::test]
async fn the_daily_reminder_skips_users_who_already_ordered(){
    let app = TestApp::spawn_app().await;
    let company = app.seed_company("Tomas");
    let (admin_client, _) = app.login_admin().await;
    let (hungry_client, hungry) = app.login_user().await;
    let (fed_client, fed) = app.login_user().await;

    for client in [&hungry_client, &fed_client] {
        let response = client
            .post(format!("{}/user/reminder", app.get_app_url()))
            .form(&[("wants_daily_reminder", "true")])
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 200);
    }

    let now = Utc::now();
    app.seed_order(
        fed.user_id,
        company.company_id,
        "Kebab",
        20,
        "12:00",
        midnight(now.year(), now.month(), now.day())
    );

    let _guard = Mock::given(path("/email"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount_as_scoped(&app.email_api)
        .await;

    let response = admin_client
        .post(format!("{}/admin/reminders/daily", app.get_app_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let report = response.json::<serde_json::Value>().await.unwrap();
    assert_eq!(report["sent"], 1);

    let emails = received_emails(&app.email_api).await;
    assert_eq!(emails.len(), 1);
    assert_eq!(emails[0].to, hungry.email);
    assert!(emails[0].text_body.contains("Sample message please change me!"));
}

#[actix_web::test]
async fn the_daily_reminder_links_to_the_order_page(){
    let app = TestApp::spawn_app().await;
    let (admin_client, _) = app.login_admin().await;
    let (subscriber_client, _) = app.login_user().await;

    subscriber_client
        .post(format!("{}/user/reminder", app.get_app_url()))
        .form(&[("wants_daily_reminder", "true")])
        .send()
        .await
        .unwrap();

    let _guard = Mock::given(path("/email"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount_as_scoped(&app.email_api)
        .await;

    admin_client
        .post(format!("{}/admin/reminders/daily", app.get_app_url()))
        .send()
        .await
        .unwrap();

    let emails = received_emails(&app.email_api).await;
    assert_eq!(emails.len(), 1);

    let links: Vec<_> = linkify::LinkFinder::new()
        .links(&emails[0].text_body)
        .filter(|l| *l.kind() == linkify::LinkKind::Url)
        .collect();
    assert_eq!(links.len(), 1);
    assert!(links[0].as_str().ends_with("/user/foods"));
}

#[actix_web::test]
async fn nonsubscribers_get_no_reminder(){
    let app = TestApp::spawn_app().await;
    let (admin_client, _) = app.login_admin().await;
    let (_, _) = app.login_user().await;

    let _guard = Mock::given(path("/email"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount_as_scoped(&app.email_api)
        .await;

    let response = admin_client
        .post(format!("{}/admin/reminders/daily", app.get_app_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let report = response.json::<serde_json::Value>().await.unwrap();
    assert_eq!(report["sent"], 0);
}
