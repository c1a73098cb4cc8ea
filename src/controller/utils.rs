//! Helpers for reading request bodies and headers
use std::io::{Cursor, Read};

use failure::Error as FailureError;
use futures::future;
use futures::{Future, Stream};
use hyper;
use hyper::header::{Authorization, Bearer, ContentType, Headers};
use jsonwebtoken::{decode, Validation};
use mime;
use multipart::server::Multipart;
use serde::de::DeserializeOwned;
use serde_json;

use errors::Error;
use models::{UploadedFile, UserId};

/// Multipart field carrying post photos
pub const IMAGE_FIELD: &str = "image";

/// Claims of the tokens issued by the identity provider
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    pub user_id: UserId,
    pub exp: i64,
}

/// Caller id from a `Bearer` token, `None` for anonymous requests
pub fn authenticate(headers: &Headers, secret: &str) -> Result<Option<UserId>, FailureError> {
    let token = match headers.get::<Authorization<Bearer>>() {
        Some(auth) => auth.0.token.clone(),
        None => return Ok(None),
    };
    decode::<Claims>(&token, secret.as_bytes(), &Validation::default())
        .map(|data| Some(data.claims.user_id))
        .map_err(|e| format_err!("Invalid token: {}", e).context(Error::Unauthorized).into())
}

/// Reads the whole body
pub fn read_body(body: hyper::Body) -> Box<Future<Item = Vec<u8>, Error = FailureError>> {
    Box::new(
        body.concat2()
            .map(|chunk| chunk.to_vec())
            .map_err(|e| FailureError::from(e).context("Reading request body failed").into()),
    )
}

/// Reads the body and parses it as JSON
pub fn parse_body<T>(body: hyper::Body) -> Box<Future<Item = T, Error = FailureError>>
where
    T: DeserializeOwned + 'static,
{
    Box::new(read_body(body).and_then(|bytes| {
        future::result(serde_json::from_slice::<T>(&bytes).map_err(|e| {
            format_err!("Failed to parse request body: {}", e)
                .context(Error::Parse)
                .into()
        }))
    }))
}

/// Boundary of a `multipart/form-data` body
pub fn multipart_boundary(headers: &Headers) -> Result<String, FailureError> {
    headers
        .get::<ContentType>()
        .and_then(|content_type| {
            if content_type.0.type_() == mime::MULTIPART && content_type.0.subtype() == mime::FORM_DATA {
                content_type.0.get_param(mime::BOUNDARY).map(|boundary| boundary.as_str().to_string())
            } else {
                None
            }
        })
        .ok_or_else(|| format_err!("Expected multipart/form-data with a boundary").context(Error::Parse).into())
}

/// Files sent under `field` in a multipart body
pub fn parse_multipart(bytes: Vec<u8>, boundary: &str, field: &str) -> Result<Vec<UploadedFile>, FailureError> {
    let mut multipart = Multipart::with_body(Cursor::new(bytes), boundary);
    let mut files = vec![];

    while let Some(mut entry) = multipart
        .read_entry()
        .map_err(|e| FailureError::from(e).context(Error::Parse))?
    {
        if &*entry.headers.name != field {
            continue;
        }
        let filename = match entry.headers.filename.as_ref().and_then(|name| sanitize_filename(name)) {
            Some(filename) => filename,
            None => return Err(format_err!("Uploaded file has no usable name").context(Error::Parse).into()),
        };
        let content_type = entry.headers.content_type.as_ref().map(|mime| mime.to_string());
        let mut bytes = vec![];
        entry
            .data
            .read_to_end(&mut bytes)
            .map_err(|e| FailureError::from(e).context(Error::Parse))?;
        files.push(UploadedFile {
            filename,
            content_type,
            bytes,
        });
    }

    Ok(files)
}

/// Last path component of a client supplied file name
pub fn sanitize_filename(name: &str) -> Option<String> {
    name.rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
        .map(|name| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, Header};

    const SECRET: &str = "change-me";

    fn bearer(token: String) -> Headers {
        let mut headers = Headers::new();
        headers.set(Authorization(Bearer { token }));
        headers
    }

    fn token(user_id: UserId, exp: i64, secret: &str) -> String {
        encode(&Header::default(), &Claims { user_id, exp }, secret.as_bytes()).unwrap()
    }

    #[test]
    fn anonymous_without_header() {
        assert_eq!(authenticate(&Headers::new(), SECRET).unwrap(), None);
    }

    #[test]
    fn valid_token_yields_user() {
        let headers = bearer(token(7, 4_102_444_800, SECRET));
        assert_eq!(authenticate(&headers, SECRET).unwrap(), Some(7));
    }

    #[test]
    fn bad_tokens_are_unauthorized() {
        let forged = bearer(token(7, 4_102_444_800, "other"));
        assert!(authenticate(&forged, SECRET).is_err());
        let expired = bearer(token(7, 1_000, SECRET));
        assert!(authenticate(&expired, SECRET).is_err());
    }

    #[test]
    fn filenames_are_reduced_to_last_component() {
        assert_eq!(sanitize_filename("front.jpg"), Some("front.jpg".to_string()));
        assert_eq!(sanitize_filename("../../etc/passwd"), Some("passwd".to_string()));
        assert_eq!(sanitize_filename("C:\\photos\\car.png"), Some("car.png".to_string()));
        assert_eq!(sanitize_filename("photos/"), None);
        assert_eq!(sanitize_filename(".."), None);
    }

    #[test]
    fn multipart_images_are_collected() {
        let body = "--XYZ\r\n\
                    Content-Disposition: form-data; name=\"image\"; filename=\"front.jpg\"\r\n\
                    Content-Type: image/jpeg\r\n\r\n\
                    abc\r\n\
                    --XYZ\r\n\
                    Content-Disposition: form-data; name=\"note\"\r\n\r\n\
                    ignored\r\n\
                    --XYZ--\r\n";
        let files = parse_multipart(body.as_bytes().to_vec(), "XYZ", IMAGE_FIELD).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].filename, "front.jpg");
        assert_eq!(files[0].content_type, Some("image/jpeg".to_string()));
        assert_eq!(files[0].bytes, b"abc".to_vec());
    }

    #[test]
    fn boundary_is_read_from_content_type() {
        let mut headers = Headers::new();
        headers.set_raw("Content-Type", "multipart/form-data; boundary=XYZ");
        assert_eq!(multipart_boundary(&headers).unwrap(), "XYZ");
        assert!(multipart_boundary(&Headers::new()).is_err());
    }
}
