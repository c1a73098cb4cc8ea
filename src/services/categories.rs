//! Categories Services, read access to the category tree
use diesel::connection::AnsiTransactionManager;
use diesel::pg::Pg;
use diesel::Connection;
use failure::Error as FailureError;
use r2d2::ManageConnection;

use super::types::ServiceFuture;
use models::{CategoryCode, CategoryTree, CategoryWithAttributes};
use repos::{CategoriesRepo, CategoryAttributesRepo, ReposFactory};
use services::Service;

pub trait CategoriesService {
    /// Returns all categories ordered by name, each with its inherited attributes
    fn list_categories(&self) -> ServiceFuture<Vec<CategoryWithAttributes>>;
    /// Returns one category with its inherited attributes
    fn get_category(&self, code: CategoryCode) -> ServiceFuture<CategoryWithAttributes>;
}

impl<
        T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static,
        M: ManageConnection<Connection = T>,
        F: ReposFactory<T>,
    > CategoriesService for Service<T, M, F>
{
    fn list_categories(&self) -> ServiceFuture<Vec<CategoryWithAttributes>> {
        let repo_factory = self.static_context.repo_factory.clone();

        self.spawn_on_pool(move |conn| {
            let categories_repo = repo_factory.create_categories_repo(&*conn);
            let attributes_repo = repo_factory.create_category_attributes_repo(&*conn);
            load_tree(&*categories_repo, &*attributes_repo)
                .and_then(|tree| {
                    tree.categories()
                        .into_iter()
                        .map(|cat| tree.with_attributes(&cat.short_name))
                        .collect::<Result<Vec<_>, _>>()
                })
                .map_err(|e| e.context("CategoriesService, list_categories error occurred.").into())
        })
    }

    fn get_category(&self, code: CategoryCode) -> ServiceFuture<CategoryWithAttributes> {
        let repo_factory = self.static_context.repo_factory.clone();

        self.spawn_on_pool(move |conn| {
            let categories_repo = repo_factory.create_categories_repo(&*conn);
            let attributes_repo = repo_factory.create_category_attributes_repo(&*conn);
            load_tree(&*categories_repo, &*attributes_repo)
                .and_then(|tree| tree.with_attributes(&code))
                .map_err(|e| e.context(format!("CategoriesService, get_category {} error occurred.", code)).into())
        })
    }
}

/// Loads every category and attribute into a tree
pub fn load_tree(categories_repo: &CategoriesRepo, attributes_repo: &CategoryAttributesRepo) -> Result<CategoryTree, FailureError> {
    let categories = categories_repo.list()?;
    let attributes = attributes_repo.list()?;
    Ok(CategoryTree::new(categories, attributes))
}

#[cfg(test)]
pub mod tests {
    use tokio_core::reactor::Core;

    use errors::Error;
    use repos::repo_factory::tests::*;
    use services::*;

    #[test]
    fn test_list_categories() {
        let service = create_service(None);
        let mut core = Core::new().unwrap();
        let work = service.list_categories();
        let result = core.run(work).unwrap();
        let codes: Vec<&str> = result.iter().map(|cat| cat.short_name.as_str()).collect();
        assert_eq!(codes, vec!["BIK", "CAR", "HOM", "SUV", "VEH"]);
        let suv = &result[3];
        let names: Vec<&str> = suv.attributes.iter().map(|attr| attr.name.as_str()).collect();
        assert_eq!(names, vec!["Seats", "Color", "Description", "Mileage"]);
    }

    #[test]
    fn test_get_category() {
        let service = create_service(None);
        let mut core = Core::new().unwrap();
        let work = service.get_category("CAR".to_string());
        let result = core.run(work).unwrap();
        assert_eq!(result.name, "Cars");
        let ids: Vec<i32> = result.attributes.iter().map(|attr| attr.id).collect();
        assert_eq!(ids, vec![2, 4, 1]);
    }

    #[test]
    fn test_get_missing_category() {
        let service = create_service(None);
        let mut core = Core::new().unwrap();
        let work = service.get_category("XXX".to_string());
        let err = core.run(work).unwrap_err();
        assert!(err.iter_chain().any(|fail| fail.to_string() == Error::NotFound.to_string()));
    }
}
