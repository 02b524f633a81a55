use actix_web::{error::{ErrorConflict, ErrorInternalServerError}, web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::db_interaction::{insert_company, CompanyInsertError};
use crate::models::Company;
use crate::utils::{get_pooled_connection, DbPool};

#[derive(Deserialize, Debug)]
pub struct AddCompanyForm{
    pub name: String,
    pub web_page: Option<String>,
    pub address: Option<String>,
    pub telephone: Option<String>
}

#[tracing::instrument(
    "Adding a company",
    skip(pool)
)]
pub async fn add_company(
    pool: web::Data<DbPool>,
    form: web::Form<AddCompanyForm>
) -> Result<HttpResponse, actix_web::Error> {
    let company = Company{
        company_id: Uuid::new_v4(),
        name: form.name.clone(),
        web_page: form.web_page.clone(),
        address: form.address.clone(),
        telephone: form.telephone.clone()
    };

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let company_id = company.company_id;
    insert_company(conn, company)
        .await
        .map_err(|e| {
            match e {
                CompanyInsertError::NameNotUnique(_) => ErrorConflict(e),
                _ => ErrorInternalServerError(e)
            }
        })?;

    Ok(HttpResponse::Created().json(company_id))
}
