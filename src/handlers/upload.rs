use actix_multipart::Multipart;
use actix_web::web::{Data, Json};
use bytes::Bytes;
use futures_util::TryStreamExt;
use serde::Serialize;

use crate::error::Error;
use crate::storer::FileStorer;

#[derive(Debug, Serialize)]
pub struct MediaResponse {
    pub url: String,
}

pub async fn create<S: FileStorer + 'static>(mut payload: Multipart, storer: Data<S>) -> Result<Json<MediaResponse>, Error> {
    while let Some(mut field) = payload.try_next().await? {
        let name = field
            .content_disposition()
            .get_filename()
            .unwrap_or("upload")
            .to_owned();
        let mut content = Vec::new();
        while let Some(chunk) = field.try_next().await? {
            content.extend_from_slice(&chunk);
        }
        return match storer.put(Bytes::from(content), &name)? {
            Some(url) => Ok(Json(MediaResponse { url })),
            None => Err(Error::BadRequest("failed to store media file".into())),
        };
    }
    Err(Error::BadRequest("no file in upload request".into()))
}
