pub mod board;
pub mod mail_all;
pub mod mail_text;
pub mod post;
pub mod remind;

pub use board::finance_board;
pub use mail_all::send_monthly_summary_to_all;
pub use mail_text::{get_mail_texts, update_mail_texts};
pub use post::set_payment_status;
pub use remind::send_payment_reminder;
