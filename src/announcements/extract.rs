use axum::{
    async_trait,
    extract::{multipart::MultipartError, FromRequest, Multipart, Request},
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use super::dto::{AnnouncementCreate, CreateAnnouncementJson};
use super::services::{CreateAnnouncementInput, UploadItem};
use crate::error::ApiError;

/// Accepts `POST /announcements` as JSON or as `multipart/form-data` with an optional `image` file.
pub struct AnnouncementForm(pub CreateAnnouncementInput);

#[async_trait]
impl<S> FromRequest<S> for AnnouncementForm
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        if is_multipart {
            let mp = Multipart::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            return read_multipart(mp)
                .await
                .map(AnnouncementForm)
                .map_err(IntoResponse::into_response);
        }

        let Json(body) = Json::<CreateAnnouncementJson>::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;
        Ok(AnnouncementForm(CreateAnnouncementInput {
            fields: body.fields,
            owner_id: body.current_user_id,
            image: None,
        }))
    }
}

async fn read_multipart(mut mp: Multipart) -> Result<CreateAnnouncementInput, ApiError> {
    let mut title = None;
    let mut description = None;
    let mut price = None;
    let mut owner_id = None;
    let mut image = None;

    while let Some(field) = mp.next_field().await.map_err(bad_form)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field
                    .content_type()
                    .map(str::to_string)
                    .unwrap_or_else(|| "application/octet-stream".into());
                let body = field.bytes().await.map_err(bad_form)?;
                // browsers send an empty part when no file was picked
                if !body.is_empty() {
                    image = Some(UploadItem {
                        file_name,
                        content_type,
                        body,
                    });
                }
            }
            "title" => title = Some(field.text().await.map_err(bad_form)?),
            "description" => description = non_empty(field.text().await.map_err(bad_form)?),
            "price" => {
                price = non_empty(field.text().await.map_err(bad_form)?)
                    .map(|p| p.trim().parse::<f64>())
                    .transpose()
                    .map_err(|_| ApiError::Validation("price must be a number".into()))?;
            }
            "current_user_id" | "owner_id" => {
                let raw = field.text().await.map_err(bad_form)?;
                owner_id = Some(raw.trim().parse::<i64>().map_err(|_| {
                    ApiError::Validation("current_user_id must be an integer".into())
                })?);
            }
            _ => {}
        }
    }

    Ok(CreateAnnouncementInput {
        fields: AnnouncementCreate {
            title: title.ok_or_else(|| ApiError::Validation("title is required".into()))?,
            description,
            price,
        },
        owner_id: owner_id
            .ok_or_else(|| ApiError::Validation("current_user_id is required".into()))?,
        image,
    })
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

fn bad_form(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::TooLarge(e.body_text())
    } else {
        ApiError::Validation(e.body_text())
    }
}
