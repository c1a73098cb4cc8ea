//! Search Services. Turns raw query parameters into a `SearchFilter` against
//! the category tree, then pages through matching posts and counts them per
//! candidate category.
use std::collections::BTreeMap;

use diesel::connection::AnsiTransactionManager;
use diesel::pg::Pg;
use diesel::Connection;
use failure::Error as FailureError;
use r2d2::ManageConnection;

use super::categories::load_tree;
use super::posts::with_relations;
use super::types::ServiceFuture;
use models::*;
use repos::ReposFactory;
use services::Service;

pub trait SearchService {
    /// Searches posts by `params`. `path` and `params` are reused for page links.
    fn search(&self, path: String, params: QueryParams, page: PageRequest) -> ServiceFuture<SearchResults>;
}

/// Filter resolved from query parameters
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSearch {
    pub filter: SearchFilter,
    /// Categories reported in the facet counts
    pub candidates: Vec<Category>,
    /// Parameters that did not address any attribute
    pub ignored: Vec<String>,
}

/// Resolves the query parameters of a search request against `tree`
pub fn resolve_filter(tree: &CategoryTree, params: QueryParams) -> Result<ResolvedSearch, FailureError> {
    let mut params = params;
    for transport in &[LIMIT_PARAM, OFFSET_PARAM, FIELDS_PARAM] {
        params.remove(transport);
    }
    let search = SearchParams::extract(params);

    let mut filter = SearchFilter {
        text: search.text,
        ..SearchFilter::default()
    };

    let (candidates, ignored) = match search.category {
        Some(code) => {
            let subtree: Vec<Category> = tree.sub_categories(&code, true)?.into_iter().cloned().collect();
            let schema = AttributeSchema::new(tree.all_attributes(&code)?.into_iter().cloned().collect());
            let resolution = schema.resolve(&search.attributes);
            filter.attributes = resolution.predicates;
            filter.categories = Some(subtree.iter().map(|cat| cat.short_name.clone()).collect());
            (subtree, resolution.ignored)
        }
        None => (tree.categories().into_iter().cloned().collect(), search.attributes.names()),
    };

    if let Some(excluded) = search.excluded_categories {
        filter.excluded_categories = excluded;
    }

    if !ignored.is_empty() {
        debug!("Search parameters {:?} address no attribute and are ignored", ignored);
    }

    Ok(ResolvedSearch {
        filter,
        candidates,
        ignored,
    })
}

/// Counts `codes` per candidate category, every candidate starts at zero
pub fn count_by_category(candidates: &[Category], codes: Vec<CategoryCode>) -> BTreeMap<CategoryCode, CategoryCount> {
    let mut counts: BTreeMap<CategoryCode, CategoryCount> = candidates
        .iter()
        .map(|cat| {
            (
                cat.short_name.clone(),
                CategoryCount {
                    category: CategoryShort::from(cat),
                    count: 0,
                },
            )
        })
        .collect();

    for code in codes {
        if let Some(entry) = counts.get_mut(&code) {
            entry.count += 1;
        }
    }

    counts
}

impl<
        T: Connection<Backend = Pg, TransactionManager = AnsiTransactionManager> + 'static,
        M: ManageConnection<Connection = T>,
        F: ReposFactory<T>,
    > SearchService for Service<T, M, F>
{
    fn search(&self, path: String, params: QueryParams, page: PageRequest) -> ServiceFuture<SearchResults> {
        let repo_factory = self.static_context.repo_factory.clone();

        self.spawn_on_pool(move |conn| {
            let categories_repo = repo_factory.create_categories_repo(&*conn);
            let attributes_repo = repo_factory.create_category_attributes_repo(&*conn);
            let posts_repo = repo_factory.create_posts_repo(&*conn);
            let post_attributes_repo = repo_factory.create_post_attributes_repo(&*conn);
            let post_images_repo = repo_factory.create_post_images_repo(&*conn);

            load_tree(&*categories_repo, &*attributes_repo)
                .and_then(|tree| resolve_filter(&tree, params.clone()))
                .and_then(|resolved| {
                    let count = posts_repo.count(&resolved.filter)?;
                    let posts = posts_repo.search(&resolved.filter, page)?;
                    let results = with_relations(posts, &*post_attributes_repo, &*post_images_repo)?;
                    let codes = posts_repo.matched_categories(&resolved.filter)?;
                    Ok(SearchResults {
                        page: Page::new(results, count, page, &path, &params),
                        category_counts: count_by_category(&resolved.candidates, codes),
                    })
                })
                .map_err(|e| e.context("SearchService, search error occurred.").into())
        })
    }
}
