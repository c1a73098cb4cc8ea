//! Posts Services, creation and retrieval of listings and their photos
use std::collections::HashMap;

use diesel::connection::AnsiTransactionManager;
use diesel::pg::Pg;
use diesel::Connection;
use failure::Error as FailureError;
use futures::future;
use futures::Future;
use r2d2::ManageConnection;
use validator::{Validate, ValidationError, ValidationErrors};

use super::types::ServiceFuture;
use errors::Error;
use models::*;
use repos::{PostAttributesRepo, PostImagesRepo, ReposFactory};
use services::Service;

pub trait PostsService {
    /// Creates a post of the current user together with its attribute documents
    fn create_post(&self, payload: NewPostPayload) -> ServiceFuture<PostWithRelations>;
    /// Returns a page of the current user's posts, newest first, and their total count
    fn list_own_posts(&self, page: PageRequest) -> ServiceFuture<(Vec<PostWithRelations>, i64)>;
    /// Returns post by id
    fn get_post(&self, post_id: PostId) -> ServiceFuture<PostWithRelations>;
    /// Uploads photos and attaches them to the post
    fn add_photos(&self, post_id: PostId, files: Vec<UploadedFile>) -> ServiceFuture<Vec<PostPhoto>>;
}

impl<
        T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static,
        M: ManageConnection<Connection = T>,
        F: ReposFactory<T>,
    > PostsService for Service<T, M, F>
{
    fn create_post(&self, payload: NewPostPayload) -> ServiceFuture<PostWithRelations> {
        let user_id = match self.current_user() {
            Ok(user_id) => user_id,
            Err(e) => return Box::new(future::err(e)),
        };
        if let Err(errors) = payload.validate() {
            let e: FailureError = format_err!("Post payload is invalid").context(Error::Validate(errors)).into();
            return Box::new(future::err(e));
        }
        let repo_factory = self.static_context.repo_factory.clone();

        self.spawn_on_pool(move |conn| {
            let categories_repo = repo_factory.create_categories_repo(&*conn);
            let posts_repo = repo_factory.create_posts_repo(&*conn);
            let post_attributes_repo = repo_factory.create_post_attributes_repo(&*conn);
            conn.transaction::<PostWithRelations, FailureError, _>(move || {
                if categories_repo.find(&payload.category)?.is_none() {
                    return Err(format_err!("Category {} not found", payload.category)
                        .context(Error::Validate(unknown_category_errors()))
                        .into());
                }
                let (new_post, attributes) = payload.into_new_post(user_id);
                let post = posts_repo.create(new_post)?;
                let new_attributes = attributes
                    .into_iter()
                    .map(|attr| NewPostAttribute {
                        post_id: post.id,
                        data: attr.data,
                    })
                    .collect();
                let attributes = post_attributes_repo.create_many(new_attributes)?;
                Ok(PostWithRelations::new(
                    post,
                    attributes.into_iter().map(PostAttributeData::from).collect(),
                    vec![],
                ))
            })
            .map_err(|e| e.context("PostsService, create_post error occurred.").into())
        })
    }

    fn list_own_posts(&self, page: PageRequest) -> ServiceFuture<(Vec<PostWithRelations>, i64)> {
        let user_id = match self.current_user() {
            Ok(user_id) => user_id,
            Err(e) => return Box::new(future::err(e)),
        };
        let repo_factory = self.static_context.repo_factory.clone();

        self.spawn_on_pool(move |conn| {
            let posts_repo = repo_factory.create_posts_repo(&*conn);
            let post_attributes_repo = repo_factory.create_post_attributes_repo(&*conn);
            let post_images_repo = repo_factory.create_post_images_repo(&*conn);
            let filter = SearchFilter {
                poster_id: Some(user_id),
                ..SearchFilter::default()
            };
            posts_repo
                .count(&filter)
                .and_then(|count| {
                    let posts = posts_repo.search(&filter, page)?;
                    let posts = with_relations(posts, &*post_attributes_repo, &*post_images_repo)?;
                    Ok((posts, count))
                })
                .map_err(|e| e.context("PostsService, list_own_posts error occurred.").into())
        })
    }

    fn get_post(&self, post_id: PostId) -> ServiceFuture<PostWithRelations> {
        let repo_factory = self.static_context.repo_factory.clone();

        self.spawn_on_pool(move |conn| {
            let posts_repo = repo_factory.create_posts_repo(&*conn);
            let post_attributes_repo = repo_factory.create_post_attributes_repo(&*conn);
            let post_images_repo = repo_factory.create_post_images_repo(&*conn);
            posts_repo
                .find(post_id)
                .and_then(|post| post.ok_or_else(|| format_err!("Post {} not found", post_id).context(Error::NotFound).into()))
                .and_then(|post| with_relations(vec![post], &*post_attributes_repo, &*post_images_repo))
                .and_then(|mut posts| posts.pop().ok_or_else(|| format_err!("Post {} vanished while loading relations", post_id)))
                .map_err(|e| e.context(format!("PostsService, get_post {} error occurred.", post_id)).into())
        })
    }

    fn add_photos(&self, post_id: PostId, files: Vec<UploadedFile>) -> ServiceFuture<Vec<PostPhoto>> {
        let repo_factory = self.static_context.repo_factory.clone();
        let s3 = self.static_context.s3.clone();
        let service = Service::new(self.static_context.clone(), self.dynamic_context.clone());

        let post_exists = self.spawn_on_pool(move |conn| {
            let posts_repo = repo_factory.create_posts_repo(&*conn);
            posts_repo
                .find(post_id)?
                .map(|_| ())
                .ok_or_else(|| format_err!("Post {} not found", post_id).context(Error::NotFound).into())
        });

        Box::new(
            post_exists
                .and_then(move |_| {
                    future::join_all(files.into_iter().map(move |file| {
                        let filename = file.filename.clone();
                        s3.upload_image(post_id, file).map_err(move |e| -> FailureError {
                            error!("Uploading {} for post {} failed", filename, post_id);
                            FailureError::from(e).context(Error::Storage).into()
                        })
                    }))
                })
                .and_then(move |urls| {
                    let repo_factory = service.static_context.repo_factory.clone();
                    service.spawn_on_pool(move |conn| {
                        let post_images_repo = repo_factory.create_post_images_repo(&*conn);
                        let new_images = urls.into_iter().map(|image| NewPostImage { post_id, image }).collect();
                        post_images_repo
                            .create_many(new_images)
                            .map(|images| images.into_iter().map(PostPhoto::from).collect())
                    })
                })
                .map_err(move |e| -> FailureError { e.context(format!("PostsService, add_photos to post {} error occurred.", post_id)).into() }),
        )
    }
}

fn unknown_category_errors() -> ValidationErrors {
    let mut error = ValidationError::new("does_not_exist");
    error.message = Some("Category does not exist".into());
    let mut errors = ValidationErrors::new();
    errors.add("category", error);
    errors
}

/// Loads attribute documents and photos of `posts` with two queries, keeping the order of `posts`
pub fn with_relations(
    posts: Vec<Post>,
    post_attributes_repo: &PostAttributesRepo,
    post_images_repo: &PostImagesRepo,
) -> Result<Vec<PostWithRelations>, FailureError> {
    if posts.is_empty() {
        return Ok(vec![]);
    }
    let ids: Vec<PostId> = posts.iter().map(|post| post.id).collect();

    let mut attributes: HashMap<PostId, Vec<PostAttributeData>> = HashMap::new();
    for attr in post_attributes_repo.find_by_posts(ids.clone())? {
        attributes.entry(attr.post_id).or_insert_with(Vec::new).push(attr.into());
    }
    let mut photos: HashMap<PostId, Vec<PostPhoto>> = HashMap::new();
    for image in post_images_repo.find_by_posts(ids)? {
        photos.entry(image.post_id).or_insert_with(Vec::new).push(image.into());
    }

    Ok(posts
        .into_iter()
        .map(|post| {
            let attrs = attributes.remove(&post.id).unwrap_or_default();
            let images = photos.remove(&post.id).unwrap_or_default();
            PostWithRelations::new(post, attrs, images)
        })
        .collect())
}
