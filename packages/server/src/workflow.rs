//! Visitor inquiry triage: `Pending` → `InProgress` → `Resolved`, with
//! explicit staff-driven transitions and a re-openable resolved state.

use chrono::{DateTime, Utc};
use common::InquiryStatus;
use sea_orm::*;
use uuid::Uuid;

use crate::entity::inquiry;
use crate::error::AppError;

/// A submission from the public contact form.
pub struct NewInquiry {
    pub name: String,
    pub contact: String,
    pub subject: String,
    pub message: String,
    pub service_tag: Option<String>,
}

/// Record a new inquiry. Always starts `Pending` with no response.
pub async fn create<C: ConnectionTrait>(
    db: &C,
    data: NewInquiry,
) -> Result<inquiry::Model, AppError> {
    validate_new_inquiry(&data)?;

    let model = inquiry::ActiveModel {
        id: Set(Uuid::now_v7()),
        name: Set(data.name.trim().to_string()),
        contact: Set(data.contact.trim().to_string()),
        subject: Set(data.subject.trim().to_string()),
        message: Set(data.message),
        service_tag: Set(data.service_tag.map(|t| t.trim().to_string())),
        status: Set(InquiryStatus::Pending),
        response: Set(None),
        resolved_at: Set(None),
        created_at: Set(Utc::now()),
    };

    Ok(model.insert(db).await?)
}

pub async fn get<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<inquiry::Model, AppError> {
    inquiry::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Inquiry not found".into()))
}

/// List inquiries newest-first, optionally filtered by status.
pub async fn list<C: ConnectionTrait>(
    db: &C,
    status: Option<InquiryStatus>,
    page: u64,
    per_page: u64,
) -> Result<(Vec<inquiry::Model>, u64), AppError> {
    let mut select = inquiry::Entity::find();
    if let Some(status) = status {
        select = select.filter(inquiry::Column::Status.eq(status));
    }
    let paginator = select
        .order_by_desc(inquiry::Column::CreatedAt)
        .paginate(db, per_page);

    let total = paginator.num_items().await?;
    let data = paginator.fetch_page(page.saturating_sub(1)).await?;

    Ok((data, total))
}

/// Take ownership of a pending inquiry. Assignment only moves forward from
/// `Pending`; anything else is a conflict, not a silent no-op.
pub async fn assign<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<inquiry::Model, AppError> {
    let existing = get(db, id).await?;
    if existing.status != InquiryStatus::Pending {
        return Err(AppError::Conflict(format!(
            "Only pending inquiries can be assigned (current status: {})",
            existing.status
        )));
    }

    let mut active: inquiry::ActiveModel = existing.into();
    active.status = Set(InquiryStatus::InProgress);
    active.update(db).await.map_err(map_update_err)
}

/// Explicit staff-driven transition to any status.
///
/// A `response` may only accompany a transition into `Resolved`.
pub async fn set_status<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    target: InquiryStatus,
    response: Option<String>,
) -> Result<inquiry::Model, AppError> {
    if response.is_some() && target != InquiryStatus::Resolved {
        return Err(AppError::Validation(
            "A response can only be set when resolving an inquiry".into(),
        ));
    }

    let existing = get(db, id).await?;
    let change = apply_transition(&existing, target, response, Utc::now());

    let mut active: inquiry::ActiveModel = existing.into();
    active.status = Set(change.status);
    active.response = Set(change.response);
    active.resolved_at = Set(change.resolved_at);
    active.update(db).await.map_err(map_update_err)
}

/// An update hitting zero rows means the inquiry vanished between the read
/// and the write.
fn map_update_err(err: DbErr) -> AppError {
    match err {
        DbErr::RecordNotUpdated => AppError::NotFound("Inquiry not found".into()),
        e => e.into(),
    }
}

/// Hard delete; allowed from any state.
pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<(), AppError> {
    let result = inquiry::Entity::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Inquiry not found".into()));
    }
    Ok(())
}

/// The persisted effect of a status transition.
struct Transition {
    status: InquiryStatus,
    response: Option<String>,
    resolved_at: Option<DateTime<Utc>>,
}

/// Pure transition rules, kept free of I/O:
///
/// * into `Resolved`: `resolved_at` is stamped on first entry and kept when
///   re-resolving; a provided response replaces the stored one, an absent
///   response keeps it (resolving without typing a reply is allowed).
/// * out of `Resolved`: `resolved_at` is cleared so it is set exactly while
///   the inquiry is resolved; the response survives for later revision.
fn apply_transition(
    current: &inquiry::Model,
    target: InquiryStatus,
    response: Option<String>,
    now: DateTime<Utc>,
) -> Transition {
    let resolved_at = if target == InquiryStatus::Resolved {
        current.resolved_at.or(Some(now))
    } else {
        None
    };

    Transition {
        status: target,
        response: response.or_else(|| current.response.clone()),
        resolved_at,
    }
}

/// Validate a contact-form submission before any store I/O.
pub fn validate_new_inquiry(data: &NewInquiry) -> Result<(), AppError> {
    require_text("name", &data.name, 100)?;
    require_text("contact", &data.contact, 100)?;
    require_text("subject", &data.subject, 200)?;
    require_text("message", &data.message, 5000)?;
    if let Some(ref tag) = data.service_tag
        && tag.trim().chars().count() > 100
    {
        return Err(AppError::Validation(
            "service_tag must be at most 100 characters".into(),
        ));
    }
    Ok(())
}

fn require_text(name: &str, value: &str, max: usize) -> Result<(), AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("Field '{name}' is required")));
    }
    if trimmed.chars().count() > max {
        return Err(AppError::Validation(format!(
            "Field '{name}' must be at most {max} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inquiry_with(
        status: InquiryStatus,
        response: Option<&str>,
        resolved_at: Option<DateTime<Utc>>,
    ) -> inquiry::Model {
        inquiry::Model {
            id: Uuid::now_v7(),
            name: "Lee".into(),
            contact: "lee@example.com".into(),
            subject: "Tour request".into(),
            message: "Can we visit on Friday?".into(),
            service_tag: None,
            status,
            response: response.map(str::to_string),
            resolved_at,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn resolving_stamps_resolved_at_and_stores_response() {
        let current = inquiry_with(InquiryStatus::InProgress, None, None);
        let now = Utc::now();
        let change = apply_transition(
            &current,
            InquiryStatus::Resolved,
            Some("We will contact you Monday".into()),
            now,
        );

        assert_eq!(change.status, InquiryStatus::Resolved);
        assert_eq!(change.resolved_at, Some(now));
        assert_eq!(change.response.as_deref(), Some("We will contact you Monday"));
    }

    #[test]
    fn resolving_without_response_keeps_stored_one() {
        let current = inquiry_with(InquiryStatus::InProgress, Some("earlier reply"), None);
        let change = apply_transition(&current, InquiryStatus::Resolved, None, Utc::now());
        assert_eq!(change.response.as_deref(), Some("earlier reply"));
    }

    #[test]
    fn resolving_without_any_response_is_allowed() {
        let current = inquiry_with(InquiryStatus::Pending, None, None);
        let change = apply_transition(&current, InquiryStatus::Resolved, None, Utc::now());
        assert_eq!(change.status, InquiryStatus::Resolved);
        assert!(change.response.is_none());
        assert!(change.resolved_at.is_some());
    }

    #[test]
    fn re_resolving_keeps_the_original_timestamp() {
        let first = Utc::now();
        let current = inquiry_with(InquiryStatus::Resolved, Some("reply"), Some(first));
        let change = apply_transition(
            &current,
            InquiryStatus::Resolved,
            Some("revised reply".into()),
            Utc::now(),
        );
        assert_eq!(change.resolved_at, Some(first));
        assert_eq!(change.response.as_deref(), Some("revised reply"));
    }

    #[test]
    fn reopening_clears_resolved_at_but_keeps_response() {
        let current = inquiry_with(
            InquiryStatus::Resolved,
            Some("We will contact you Monday"),
            Some(Utc::now()),
        );

        for target in [InquiryStatus::Pending, InquiryStatus::InProgress] {
            let change = apply_transition(&current, target, None, Utc::now());
            assert_eq!(change.status, target);
            assert_eq!(change.resolved_at, None);
            assert_eq!(change.response.as_deref(), Some("We will contact you Monday"));
        }
    }

    #[test]
    fn resolved_at_present_iff_resolved() {
        let now = Utc::now();
        for (status, response, resolved_at) in [
            (InquiryStatus::Pending, None, None),
            (InquiryStatus::InProgress, Some("r"), Some(now)),
            (InquiryStatus::Resolved, Some("r"), None),
        ] {
            let current = inquiry_with(status, response, resolved_at);
            for target in InquiryStatus::ALL {
                let change = apply_transition(&current, *target, None, now);
                assert_eq!(
                    change.resolved_at.is_some(),
                    *target == InquiryStatus::Resolved,
                    "from {status} to {target}"
                );
            }
        }
    }

    #[test]
    fn validate_rejects_blank_and_oversized_fields() {
        let mut data = NewInquiry {
            name: "Lee".into(),
            contact: "010-0000-0000".into(),
            subject: "Tour request".into(),
            message: "Hello".into(),
            service_tag: None,
        };
        validate_new_inquiry(&data).unwrap();

        data.name = "   ".into();
        assert!(validate_new_inquiry(&data).is_err());

        data.name = "Lee".into();
        data.subject = "x".repeat(201);
        assert!(validate_new_inquiry(&data).is_err());

        data.subject = "Tour request".into();
        data.service_tag = Some("y".repeat(101));
        assert!(validate_new_inquiry(&data).is_err());
    }
}
