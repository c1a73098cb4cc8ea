use diesel::connection::AnsiTransactionManager;
use diesel::pg::Pg;
use diesel::Connection;

use repos::*;

pub trait ReposFactory<C: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static>: Clone + Send + 'static {
    fn create_categories_repo<'a>(&self, db_conn: &'a C) -> Box<CategoriesRepo + 'a>;
    fn create_category_attributes_repo<'a>(&self, db_conn: &'a C) -> Box<CategoryAttributesRepo + 'a>;
    fn create_posts_repo<'a>(&self, db_conn: &'a C) -> Box<PostsRepo + 'a>;
    fn create_post_attributes_repo<'a>(&self, db_conn: &'a C) -> Box<PostAttributesRepo + 'a>;
    fn create_post_images_repo<'a>(&self, db_conn: &'a C) -> Box<PostImagesRepo + 'a>;
}

#[derive(Clone, Default)]
pub struct ReposFactoryImpl;

impl<C: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static> ReposFactory<C> for ReposFactoryImpl {
    fn create_categories_repo<'a>(&self, db_conn: &'a C) -> Box<CategoriesRepo + 'a> {
        Box::new(CategoriesRepoImpl::new(db_conn)) as Box<CategoriesRepo>
    }
    fn create_category_attributes_repo<'a>(&self, db_conn: &'a C) -> Box<CategoryAttributesRepo + 'a> {
        Box::new(CategoryAttributesRepoImpl::new(db_conn)) as Box<CategoryAttributesRepo>
    }
    fn create_posts_repo<'a>(&self, db_conn: &'a C) -> Box<PostsRepo + 'a> {
        Box::new(PostsRepoImpl::new(db_conn)) as Box<PostsRepo>
    }
    fn create_post_attributes_repo<'a>(&self, db_conn: &'a C) -> Box<PostAttributesRepo + 'a> {
        Box::new(PostAttributesRepoImpl::new(db_conn)) as Box<PostAttributesRepo>
    }
    fn create_post_images_repo<'a>(&self, db_conn: &'a C) -> Box<PostImagesRepo + 'a> {
        Box::new(PostImagesRepoImpl::new(db_conn)) as Box<PostImagesRepo>
    }
}
