use std::net::TcpListener;

use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::{cookie::Key, dev::Server, web, App, HttpServer};
use anyhow::Context;
use chrono::{Duration, NaiveTime, Utc};
use diesel::{r2d2::ConnectionManager, PgConnection};
use r2d2::Pool;
use secrecy::{ExposeSecret, SecretString};
use tracing_actix_web::TracingLogger;

use crate::admin_middleware::AdminMiddlewareFactory;
use crate::auth::OAuthClient;
use crate::configuration::Settings;
use crate::email_client::EmailClient;
use crate::menus::MenuClient;
use crate::routes::reminders::run_daily_reminder;
use crate::routes::{
    authentication, companies, conflicts, finance, food, health_check, info, ordering, orders,
    pizza, reminders, users,
};
use crate::session_state::SessionMiddlewareFactory;
use crate::utils::DbPool;

// Public base url the app hands out in redirects and email links
pub struct BaseUrl(pub String);

pub struct Application{
    pub host: String,
    pub port: u16,
    pub server: Server
}

impl Application {
    pub async fn new(settings: Settings) -> Result<Application, anyhow::Error>{
        let pool = Pool::builder()
            .build(ConnectionManager::<PgConnection>::new(
                settings.database.get_database_table_url()
            ))
            .context("Failed to build connection pool")?;

        let email_client = EmailClient::from_settings(&settings.email)?;
        let oauth_client = OAuthClient::new(&settings.oauth);
        let menu_client = MenuClient::new(&settings.menus);

        let listener = TcpListener::bind((
            settings.application.host.as_str(),
            settings.application.port
        ))
        .context("Failed to bind application port")?;
        let port = listener.local_addr()?.port();
        let host = settings.application.host.clone();

        if let Some(at) = settings.application.daily_reminder_at.as_deref() {
            let at = NaiveTime::parse_from_str(at, "%H:%M")
                .context("daily_reminder_at must be HH:MM")?;
            spawn_daily_reminder_timer(
                pool.clone(),
                email_client.clone(),
                settings.application.base_url.clone(),
                at
            );
        }

        let server = run(
            listener,
            pool,
            email_client,
            oauth_client,
            menu_client,
            settings.application.base_url.clone(),
            settings.application.hmac_secret.clone()
        )?;

        Ok(Application{ host, port, server })
    }
}

// One-shot timer, not a scheduler: sleep until the configured wall-clock
// time, run the daily reminder once and finish.
fn spawn_daily_reminder_timer(
    pool: DbPool,
    email_client: EmailClient,
    base_url: String,
    at: NaiveTime
){
    let now = Utc::now();
    let today_at = now.date_naive().and_time(at);
    let target = if today_at > now.naive_utc() {
        today_at
    } else {
        today_at + Duration::days(1)
    };
    let wait = (target - now.naive_utc()).to_std().unwrap_or_default();

    tokio::spawn(async move {
        tokio::time::sleep(wait).await;
        match run_daily_reminder(&pool, &email_client, &base_url).await {
            Ok(sent) => tracing::info!("Daily reminder timer sent {} emails", sent),
            Err(e) => tracing::error!("Daily reminder timer failed: {:?}", e)
        }
    });
}

pub fn run(
    listener: TcpListener,
    pool: DbPool,
    email_client: EmailClient,
    oauth_client: OAuthClient,
    menu_client: MenuClient,
    base_url: String,
    hmac_secret: SecretString
) -> Result<Server, anyhow::Error>{
    let pool = web::Data::new(pool);
    let email_client = web::Data::new(email_client);
    let oauth_client = web::Data::new(oauth_client);
    let menu_client = web::Data::new(menu_client);
    let base_url = web::Data::new(BaseUrl(base_url));
    let secret_key = Key::from(hmac_secret.expose_secret().as_bytes());

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            // TLS ends at the office proxy; the cookie travels over plain http
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false)
                    .build()
            )
            .route("/health", web::get().to(health_check))
            .route("/info", web::get().to(info))
            .route("/login", web::get().to(authentication::login))
            .route("/auth/callback", web::get().to(authentication::oauth_callback))
            .route("/logout", web::post().to(authentication::logout))
            .service(
                web::scope("/user")
                    .wrap(SessionMiddlewareFactory)
                    .route("/orders", web::post().to(orders::create_order))
                    .route("/orders", web::get().to(orders::my_orders))
                    .route("/foods", web::get().to(food::available_foods_today))
                    .route("/random_meal", web::get().to(orders::random_meal))
                    .route("/reminder", web::post().to(users::set_reminder_preference))
            )
            .service(
                web::scope("/pizza")
                    .wrap(SessionMiddlewareFactory)
                    .route("", web::get().to(pizza::active_pizza_event))
                    .route("", web::post().to(pizza::open_pizza_event))
                    .route("/choices", web::post().to(pizza::add_pizza_choice))
                    .route("/close", web::post().to(pizza::close_pizza_event))
            )
            .service(
                web::scope("/conflicts")
                    .wrap(SessionMiddlewareFactory)
                    .route("", web::post().to(conflicts::report_conflict))
            )
            .service(
                web::scope("/admin")
                    .wrap(AdminMiddlewareFactory)
                    .route("/foods", web::post().to(food::add_food))
                    .route("/foods", web::get().to(food::list_all_foods))
                    .route("/foods/import/koziolek", web::post().to(food::import_koziolek_menu))
                    .route("/foods/import/tomas", web::post().to(food::import_tomas_menu))
                    .route("/companies", web::post().to(companies::add_company))
                    .route("/companies", web::get().to(companies::list_companies))
                    .route("/day_summary", web::get().to(orders::day_summary))
                    .route("/orders", web::post().to(orders::update_order))
                    .route(
                        "/order_list/{user_id}/{year}",
                        web::get().to(orders::order_list_year)
                    )
                    .route(
                        "/order_list/{user_id}/{year}/{month}",
                        web::get().to(orders::order_list_month)
                    )
                    .route(
                        "/company_summary/{year}/{month}",
                        web::get().to(orders::company_summary_month)
                    )
                    .route("/finance/{year}/{month}", web::get().to(finance::finance_board))
                    .route("/finance", web::post().to(finance::set_payment_status))
                    .route("/finance/remind", web::post().to(finance::send_payment_reminder))
                    .route("/finance/mail_all", web::post().to(finance::send_monthly_summary_to_all))
                    .route("/mail_text", web::get().to(finance::get_mail_texts))
                    .route("/mail_text", web::put().to(finance::update_mail_texts))
                    .route("/ordering", web::get().to(ordering::get_ordering_gate))
                    .route("/ordering", web::post().to(ordering::set_ordering_gate))
                    .route("/reminders/daily", web::post().to(reminders::send_daily_reminder))
                    .route("/users", web::get().to(users::list_all_users))
                    .route("/users/active", web::post().to(users::toggle_user_active))
                    .route("/conflicts", web::get().to(conflicts::list_open_conflicts))
                    .route("/conflicts/resolve", web::post().to(conflicts::resolve_conflict))
            )
            .app_data(pool.clone())
            .app_data(email_client.clone())
            .app_data(oauth_client.clone())
            .app_data(menu_client.clone())
            .app_data(base_url.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
