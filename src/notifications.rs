use anyhow::Context;

use crate::db_interaction::PaymentStatus;
use crate::domain::UserEmail;
use crate::email_client::EmailClient;
use crate::models::{AppConfig, Order, User};
use crate::utils::month_name;

// All notification bodies come from the admin-editable texts on the
// configuration record; this module only does the assembly and sending.

#[tracing::instrument(
    "Sending order confirmation copy",
    skip_all
)]
pub async fn send_order_copy(
    email_client: &EmailClient,
    recipient_email: &str,
    order: &Order,
    company_name: &str
) -> Result<(), anyhow::Error> {
    let recipient = UserEmail::parse(recipient_email.to_string())
        .map_err(|e| anyhow::anyhow!(e))?;

    let subject = order_copy_subject(order);
    let body = format!(
        "{} from {} | {} PLN at {}",
        order.description, company_name, order.cost, order.arrival_time
    );

    email_client
        .send_email(&recipient, &subject, &body, &body)
        .await
        .context("Failed to send order confirmation copy")?;

    Ok(())
}

// Daily reminder to every subscriber who has not ordered yet. A bad
// address skips that user instead of aborting the whole batch.
#[tracing::instrument(
    "Sending daily reminder emails",
    skip_all
)]
pub async fn send_daily_reminder(
    email_client: &EmailClient,
    recipients: &[User],
    config: &AppConfig,
    base_url: &str
) -> Result<usize, anyhow::Error> {
    let body = format!(
        "{}\nOrder here: {}user/foods",
        config.daily_reminder, base_url
    );

    let mut sent = 0;
    for user in recipients {
        let recipient = match UserEmail::parse(user.email.clone()) {
            Ok(email) => email,
            Err(e) => {
                tracing::warn!("Skipping daily reminder recipient: {}", e);
                continue;
            }
        };

        email_client
            .send_email(&recipient, &config.daily_reminder_subject, &body, &body)
            .await
            .context("Failed to send daily reminder")?;
        sent += 1;
    }

    Ok(sent)
}

#[tracing::instrument(
    "Sending payment reminder",
    skip_all
)]
pub async fn send_payment_reminder(
    email_client: &EmailClient,
    user: &User,
    config: &AppConfig,
    slacker: bool
) -> Result<(), anyhow::Error> {
    let recipient = UserEmail::parse(user.email.clone())
        .map_err(|e| anyhow::anyhow!(e))?;

    let body = if slacker {
        &config.pay_slacker_reminder
    } else {
        &config.pay_reminder
    };

    email_client
        .send_email(&recipient, "Lunch payment reminder", body, body)
        .await
        .context("Failed to send payment reminder")?;

    Ok(())
}

// Monthly totals to everyone who ordered in the month
#[tracing::instrument(
    "Sending monthly summary emails",
    skip_all
)]
pub async fn send_monthly_summary(
    email_client: &EmailClient,
    board: &[PaymentStatus],
    config: &AppConfig,
    year: i32,
    month: u32
) -> Result<usize, anyhow::Error> {
    let subject = format!("Lunch summary for {} {}", month_name(month), year);

    let mut sent = 0;
    for row in board {
        let recipient = match UserEmail::parse(row.email.clone()) {
            Ok(email) => email,
            Err(e) => {
                tracing::warn!("Skipping monthly summary recipient: {}", e);
                continue;
            }
        };

        let body = format!(
            "{}\nYour lunch total for {}: {} PLN",
            config.monthly_pay_summary,
            month_name(month),
            row.total_cost
        );

        email_client
            .send_email(&recipient, &subject, &body, &body)
            .await
            .context("Failed to send monthly summary")?;
        sent += 1;
    }

    Ok(sent)
}

// Subject helper kept close to the bodies it accompanies
pub fn order_copy_subject(order: &Order) -> String {
    format!("Lunch order for {}", order.ordered_for.date_naive())
}
