use diesel::{ExpressionMethods, QueryDsl, RunQueryDsl};
use lunchroom::{models::FinanceRecord, schema::finance};
use wiremock::{matchers::path, Mock, ResponseTemplate};

use crate::helpers::{midnight, received_emails, TestApp};

#[actix_web::test]
async fn the_payment_board_joins_orders_with_payment_flags(){
    let app = TestApp::spawn_app().await;
    let company = app.seed_company("Tomas");
    let (admin_client, _) = app.login_admin().await;
    let (_, payer) = app.login_user().await;
    let (_, debtor) = app.login_user().await;

    app.seed_order(payer.user_id, company.company_id, "Nalesnik", 123, "12:00", midnight(2015, 2, 5));
    app.seed_order(payer.user_id, company.company_id, "Zupa", 100, "12:00", midnight(2015, 2, 6));
    app.seed_order(debtor.user_id, company.company_id, "Kebab", 244, "12:00", midnight(2015, 2, 7));

    let response = admin_client
        .post(format!("{}/admin/finance", app.get_app_url()))
        .form(&[
            ("user_id", payer.user_id.to_string()),
            ("year", "2015".to_string()),
            ("month", "2".to_string()),
            ("did_user_pay", "true".to_string()),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let response = admin_client
        .get(format!("{}/admin/finance/2015/2", app.get_app_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let board = response.json::<serde_json::Value>().await.unwrap();
    assert_eq!(board.as_array().unwrap().len(), 2);

    let response = admin_client
        .get(format!("{}/admin/finance/2015/2?filter=paid", app.get_app_url()))
        .send()
        .await
        .unwrap();
    let board = response.json::<serde_json::Value>().await.unwrap();
    let board = board.as_array().unwrap();
    assert_eq!(board.len(), 1);
    assert_eq!(board[0]["name"], payer.name.as_str());
    assert_eq!(board[0]["total_cost"], 223);

    let response = admin_client
        .get(format!("{}/admin/finance/2015/2?filter=unpaid", app.get_app_url()))
        .send()
        .await
        .unwrap();
    let board = response.json::<serde_json::Value>().await.unwrap();
    let board = board.as_array().unwrap();
    assert_eq!(board.len(), 1);
    assert_eq!(board[0]["name"], debtor.name.as_str());
    assert_eq!(board[0]["total_cost"], 244);
}

#[actix_web::test]
async fn setting_the_same_month_twice_updates_in_place(){
    let app = TestApp::spawn_app().await;
    let (admin_client, _) = app.login_admin().await;
    let (_, user) = app.login_user().await;

    for paid in ["true", "false"] {
        let response = admin_client
            .post(format!("{}/admin/finance", app.get_app_url()))
            .form(&[
                ("user_id", user.user_id.to_string()),
                ("year", "2015".to_string()),
                ("month", "2".to_string()),
                ("did_user_pay", paid.to_string()),
            ])
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 200);
    }

    let mut conn = app.pool.get().unwrap();
    let records = finance::table
        .filter(finance::user_id.eq(user.user_id))
        .load::<FinanceRecord>(&mut conn)
        .unwrap();
    assert_eq!(records.len(), 1);
    assert!(!records[0].did_user_pay);
}

#[actix_web::test]
async fn mail_texts_can_be_read_and_rewritten(){
    let app = TestApp::spawn_app().await;
    let (admin_client, _) = app.login_admin().await;

    let response = admin_client
        .get(format!("{}/admin/mail_text", app.get_app_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let texts = response.json::<serde_json::Value>().await.unwrap();
    assert_eq!(texts["daily_reminder"], "Sample message please change me!");

    let response = admin_client
        .put(format!("{}/admin/mail_text", app.get_app_url()))
        .form(&[
            ("daily_reminder_subject", "STX Lunch nowy temat"),
            ("daily_reminder", "Nowy Daily Reminder"),
            ("monthly_pay_summary", "Ciekawszy Montlhy Reminder"),
            ("pay_reminder", "Fajniejszy Reminder"),
            ("pay_slacker_reminder", "Leniwy przypominacz"),
            ("info_page_text", "Nowa strona info"),
            ("blocked_user_text", "Zablokowany"),
            ("ordering_blocked_text", "Zamowienia zamkniete"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let response = admin_client
        .get(format!("{}/admin/mail_text", app.get_app_url()))
        .send()
        .await
        .unwrap();
    let texts = response.json::<serde_json::Value>().await.unwrap();
    assert_eq!(texts["daily_reminder"], "Nowy Daily Reminder");
    assert_eq!(texts["monthly_pay_summary"], "Ciekawszy Montlhy Reminder");
    assert_eq!(texts["pay_reminder"], "Fajniejszy Reminder");
    assert_eq!(texts["pay_slacker_reminder"], "Leniwy przypominacz");
}

#[actix_web::test]
async fn mail_all_sends_each_user_their_monthly_total(){
    let app = TestApp::spawn_app().await;
    let company = app.seed_company("Tomas");
    let (admin_client, _) = app.login_admin().await;
    let (_, first) = app.login_user().await;
    let (_, second) = app.login_user().await;

    app.seed_order(first.user_id, company.company_id, "Nalesnik", 123, "12:00", midnight(2015, 2, 5));
    app.seed_order(second.user_id, company.company_id, "Kebab", 244, "12:00", midnight(2015, 2, 7));

    let _guard = Mock::given(path("/email"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount_as_scoped(&app.email_api)
        .await;

    let response = admin_client
        .post(format!("{}/admin/finance/mail_all", app.get_app_url()))
        .form(&[("year", "2015"), ("month", "2")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let report = response.json::<serde_json::Value>().await.unwrap();
    assert_eq!(report["sent"], 2);

    let emails = received_emails(&app.email_api).await;
    assert_eq!(emails.len(), 2);
    for email in &emails {
        assert!(email.subject.starts_with("Lunch"));
        assert!(email.subject.contains("February"));
    }
    assert!(emails
        .iter()
        .any(|email| email.to == first.email && email.text_body.contains("123 PLN")));
    assert!(emails
        .iter()
        .any(|email| email.to == second.email && email.text_body.contains("244 PLN")));
}

#[actix_web::test]
async fn a_payment_reminder_carries_the_configured_text(){
    let app = TestApp::spawn_app().await;
    let (admin_client, _) = app.login_admin().await;
    let (_, user) = app.login_user().await;

    let _guard = Mock::given(path("/email"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount_as_scoped(&app.email_api)
        .await;

    let response = admin_client
        .post(format!("{}/admin/finance/remind", app.get_app_url()))
        .form(&[("user_id", user.user_id.to_string())])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let emails = received_emails(&app.email_api).await;
    assert_eq!(emails.len(), 1);
    assert!(emails[0].subject.starts_with("Lunch"));
    assert_eq!(emails[0].to, user.email);
    assert!(emails[0].text_body.contains("Sample message please change me!"));
}

#[actix_web::test]
async fn repeat_debtors_get_the_slacker_text(){
    let app = TestApp::spawn_app().await;
    let (admin_client, _) = app.login_admin().await;
    let (_, user) = app.login_user().await;

    // two unpaid months on record
    for month in ["1", "2"] {
        admin_client
            .post(format!("{}/admin/finance", app.get_app_url()))
            .form(&[
                ("user_id", user.user_id.to_string()),
                ("year", "2015".to_string()),
                ("month", month.to_string()),
                ("did_user_pay", "false".to_string()),
            ])
            .send()
            .await
            .unwrap();
    }

    admin_client
        .put(format!("{}/admin/mail_text", app.get_app_url()))
        .form(&[
            ("daily_reminder_subject", "subject"),
            ("daily_reminder", "daili1"),
            ("monthly_pay_summary", "monthly2"),
            ("pay_reminder", "reminder3"),
            ("pay_slacker_reminder", "slacker4"),
            ("info_page_text", "info"),
            ("blocked_user_text", "blocked"),
            ("ordering_blocked_text", "closed"),
        ])
        .send()
        .await
        .unwrap();

    let _guard = Mock::given(path("/email"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount_as_scoped(&app.email_api)
        .await;

    let response = admin_client
        .post(format!("{}/admin/finance/remind", app.get_app_url()))
        .form(&[("user_id", user.user_id.to_string())])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let emails = received_emails(&app.email_api).await;
    assert_eq!(emails.len(), 1);
    assert!(emails[0].text_body.contains("slacker4"));
}
