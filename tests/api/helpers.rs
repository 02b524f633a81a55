use std::error::Error;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use diesel::{pg::Pg, r2d2::ConnectionManager, Connection, PgConnection, RunQueryDsl};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use lunchroom::{
    configuration::{DatabaseSettings, Settings},
    models::{Company, Food, Order, User},
    schema::{companies, foods, orders, users},
    startup::Application,
    telemetry::{get_subscriber, init_subscriber},
    utils::DbPool,
};
use once_cell::sync::Lazy;
use r2d2::Pool;
use reqwest::redirect::Policy;
use uuid::Uuid;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

static LOGGER_INSTANCE: Lazy<()> = Lazy::new(|| {
    let log_level = "info".to_string();
    let name = "lunchroom-test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(name, log_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(name, log_level, std::io::sink);
        init_subscriber(subscriber);
    }

    ()
});

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

fn run_migrations(connection: &mut impl MigrationHarness<Pg>)
    -> Result<(), Box<dyn Error + Send + Sync + 'static>>
{
    connection.run_pending_migrations(MIGRATIONS)?;
    Ok(())
}

pub struct TestApp{
    pub host: String,
    pub port: u16,
    pub pool: DbPool,
    pub email_api: MockServer,
    pub oauth_api: MockServer,
    pub menu_api: MockServer
}

impl TestApp {
    fn create_db(settings: &DatabaseSettings) -> DbPool{
        let mut connection = PgConnection::establish(&settings.get_database_url())
                                .expect("Failed to connect to postgres database");

        let query = format!(r#"CREATE DATABASE "{}";"#, settings.name);
        diesel::sql_query(query)
            .execute(&mut connection)
            .expect("Failed to create test database");

        let pool = Pool::new(ConnectionManager::<PgConnection>::new(settings.get_database_table_url()))
            .expect("Failed to build connection pool to test database");

        let mut conn = pool.get().expect("Failed to get connection to test database");
        run_migrations(&mut conn).expect("Failed to run migrations");

        pool
    }

    pub fn get_app_url(&self) -> String{
        format!("http://{}:{}", self.host, self.port)
    }

    pub async fn spawn_app() -> TestApp{
        Lazy::force(&LOGGER_INSTANCE);

        let email_api = MockServer::start().await;
        let oauth_api = MockServer::start().await;
        let menu_api = MockServer::start().await;

        let mut settings = Settings::get();
        settings.application.port = 0;
        settings.database.name = Uuid::new_v4().to_string();
        settings.email.api_uri = email_api.uri();
        settings.oauth.api_uri = oauth_api.uri();
        settings.oauth.authorize_uri = format!("{}/oauth/authorize", oauth_api.uri());
        settings.menus.koziolek_url = format!("{}/dania-dnia", menu_api.uri());
        settings.menus.tomas_url = format!("{}/menu-tygodnia", menu_api.uri());

        let pool = TestApp::create_db(&settings.database);

        let application = Application::new(settings)
                            .await
                            .expect("Failed to build application");

        let host = application.host.clone();
        let port = application.port;
        tokio::task::spawn(application.server);

        TestApp{
            host,
            port,
            pool,
            email_api,
            oauth_api,
            menu_api
        }
    }

    pub fn new_client(&self) -> reqwest::Client{
        reqwest::Client::builder()
            .redirect(Policy::none())
            .cookie_store(true)
            .build()
            .unwrap()
    }

    // Run the whole provider dance with a canned identity and return the
    // logged-in client together with the mirrored user row.
    pub async fn login_with_identity(
        &self,
        sub: &str,
        email: &str,
        name: &str
    ) -> (reqwest::Client, User){
        let client = self.new_client();

        let _token_guard = Mock::given(path("/oauth/token"))
            .and(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": format!("token-{}", sub),
                "token_type": "Bearer"
            })))
            .mount_as_scoped(&self.oauth_api)
            .await;

        let _userinfo_guard = Mock::given(path("/userinfo"))
            .and(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "sub": sub,
                "email": email,
                "name": name
            })))
            .mount_as_scoped(&self.oauth_api)
            .await;

        let response = client
            .get(format!("{}/login", self.get_app_url()))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 303);

        let location = response
            .headers()
            .get("Location")
            .unwrap()
            .to_str()
            .unwrap();
        let authorize_url = reqwest::Url::parse(location).unwrap();
        let state = authorize_url
            .query_pairs()
            .find(|(key, _)| key == "state")
            .map(|(_, value)| value.to_string())
            .expect("authorize url carries no state");

        let response = client
            .get(format!(
                "{}/auth/callback?code=test-code&state={}",
                self.get_app_url(),
                state
            ))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 200);

        let user = self.user_by_subject(sub);
        (client, user)
    }

    pub async fn login_user(&self) -> (reqwest::Client, User){
        let sub = format!("provider|{}", Uuid::new_v4());
        let email: String = SafeEmail().fake();
        let name: String = Name().fake();
        self.login_with_identity(&sub, &email, &name).await
    }

    // Admins are minted by seeding the mirror row with the flag before the
    // dance; the upsert keeps locally managed flags.
    pub async fn login_admin(&self) -> (reqwest::Client, User){
        let sub = format!("provider|{}", Uuid::new_v4());
        let email: String = SafeEmail().fake();
        let name: String = Name().fake();

        let seeded = User{
            user_id: Uuid::new_v4(),
            provider_subject: sub.clone(),
            email: email.clone(),
            name: name.clone(),
            active: true,
            is_admin: true,
            wants_daily_reminder: false
        };
        let mut conn = self.pool.get().unwrap();
        diesel::insert_into(users::table)
            .values(&seeded)
            .execute(&mut conn)
            .unwrap();

        self.login_with_identity(&sub, &email, &name).await
    }

    pub fn user_by_subject(&self, sub: &str) -> User{
        use diesel::{ExpressionMethods, QueryDsl};

        let mut conn = self.pool.get().unwrap();
        users::table
            .filter(users::provider_subject.eq(sub))
            .first::<User>(&mut conn)
            .expect("no mirrored user row for subject")
    }

    pub fn seed_company(&self, name: &str) -> Company{
        let company = Company{
            company_id: Uuid::new_v4(),
            name: name.to_string(),
            web_page: None,
            address: None,
            telephone: None
        };

        let mut conn = self.pool.get().unwrap();
        diesel::insert_into(companies::table)
            .values(&company)
            .execute(&mut conn)
            .unwrap();

        company
    }

    pub fn seed_order(
        &self,
        user_id: Uuid,
        company_id: Uuid,
        description: &str,
        cost: i32,
        arrival_time: &str,
        ordered_for: DateTime<Utc>
    ) -> Order{
        let order = Order{
            order_id: Uuid::new_v4(),
            user_id,
            company_id,
            description: description.to_string(),
            cost,
            arrival_time: arrival_time.to_string(),
            ordered_for
        };

        let mut conn = self.pool.get().unwrap();
        diesel::insert_into(orders::table)
            .values(&order)
            .execute(&mut conn)
            .unwrap();

        order
    }

    pub fn seed_food(
        &self,
        company_id: Uuid,
        description: &str,
        cost: i32,
        available_from: DateTime<Utc>,
        available_to: DateTime<Utc>,
        food_type: &str
    ) -> Food{
        let food = Food{
            food_id: Uuid::new_v4(),
            company_id,
            description: description.to_string(),
            cost,
            available_from,
            available_to,
            food_type: food_type.to_string()
        };

        let mut conn = self.pool.get().unwrap();
        diesel::insert_into(foods::table)
            .values(&food)
            .execute(&mut conn)
            .unwrap();

        food
    }
}

pub fn midnight(year: i32, month: u32, day: u32) -> DateTime<Utc>{
    Utc.from_utc_datetime(
        &NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    )
}

// Body shape of the email REST api, used to peek at what was sent
#[derive(serde::Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReceivedEmail{
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html_body: String,
    pub text_body: String
}

pub async fn received_emails(server: &MockServer) -> Vec<ReceivedEmail>{
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.url.path() == "/email")
        .map(|request| serde_json::from_slice(&request.body).expect("email body was not json"))
        .collect()
}
