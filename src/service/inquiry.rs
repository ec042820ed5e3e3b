//! Inquiry component: contact-form messages.

use crate::error::{AppError, Resource};
use crate::models::{ContactInput, ContactMessage, MessageQuery};
use crate::response::Page;
use crate::service::pagination::PageRequest;
use crate::service::validation::RequestValidator;
use crate::sql::{fetch_page, Filter, Sort};
use sqlx::PgPool;

const MESSAGE_COLUMNS: &str = "id, name, email, subject, message, is_read, is_replied, created_at, updated_at";
pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Clone)]
pub struct InquiryService {
    pool: PgPool,
}

/// Submitted fields after validation.
#[derive(Debug, PartialEq, Eq)]
pub struct CleanContact<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub subject: &'a str,
    pub message: &'a str,
}

pub fn validate_contact(input: &ContactInput) -> Result<CleanContact<'_>, AppError> {
    let name = RequestValidator::required_max("name", &input.name, 100)?;
    let email = RequestValidator::required_max("email", &input.email, 100)?;
    RequestValidator::email("email", email)?;
    let subject = RequestValidator::required_max("subject", &input.subject, 200)?;
    RequestValidator::required("message", &input.message)?;
    Ok(CleanContact {
        name,
        email,
        subject,
        message: input.message.as_str(),
    })
}

impl InquiryService {
    pub fn new(pool: PgPool) -> Self {
        InquiryService { pool }
    }

    pub async fn submit(&self, input: &ContactInput) -> Result<ContactMessage, AppError> {
        let c = validate_contact(input)?;
        let msg: ContactMessage = sqlx::query_as(&format!(
            r#"
            INSERT INTO contact_messages (name, email, subject, message)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            MESSAGE_COLUMNS
        ))
        .bind(c.name)
        .bind(c.email)
        .bind(c.subject)
        .bind(c.message)
        .fetch_one(&self.pool)
        .await?;
        tracing::info!(message_id = msg.id, "contact message received");
        Ok(msg)
    }

    /// Newest first.
    pub async fn list(&self, query: &MessageQuery) -> Result<Page<ContactMessage>, AppError> {
        let page = PageRequest::new(query.page, query.limit, DEFAULT_PAGE_SIZE);
        let (list, count) = Filter::new()
            .eq_opt("is_read", query.is_read)
            .eq_opt("is_replied", query.is_replied)
            .into_page_queries("contact_messages", MESSAGE_COLUMNS, &Sort::desc("created_at"), &page);
        let (rows, total) = fetch_page(&self.pool, &list, &count).await?;
        Ok(page.into_page(rows, total))
    }

    pub async fn get(&self, id: i64) -> Result<ContactMessage, AppError> {
        let msg: Option<ContactMessage> = sqlx::query_as(&format!(
            "SELECT {} FROM contact_messages WHERE id = $1",
            MESSAGE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        msg.ok_or(AppError::NotFound(Resource::Message))
    }

    pub async fn mark_read(&self, id: i64) -> Result<ContactMessage, AppError> {
        self.set_flags("is_read = TRUE", id).await
    }

    /// Sets `is_replied` and `is_read` together in one statement.
    pub async fn mark_replied(&self, id: i64) -> Result<ContactMessage, AppError> {
        self.set_flags("is_read = TRUE, is_replied = TRUE", id).await
    }

    /// Hard delete.
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM contact_messages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(Resource::Message));
        }
        tracing::info!(message_id = id, "contact message deleted");
        Ok(())
    }

    async fn set_flags(&self, assignments: &'static str, id: i64) -> Result<ContactMessage, AppError> {
        let msg: Option<ContactMessage> = sqlx::query_as(&format!(
            "UPDATE contact_messages SET {}, updated_at = NOW() WHERE id = $1 RETURNING {}",
            assignments, MESSAGE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        msg.ok_or(AppError::NotFound(Resource::Message))
    }
}
