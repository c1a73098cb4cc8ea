/// diesel table for categories
table! {
    categories (short_name) {
        short_name -> VarChar,
        name -> VarChar,
        parent_category -> Nullable<VarChar>,
    }
}

/// diesel table for category attributes
table! {
    category_attributes (id) {
        id -> Integer,
        category_id -> VarChar,
        name -> VarChar,
        unit -> Nullable<VarChar>,
        is_mandatory -> Bool,
        input_widget -> VarChar,
        input_type -> Nullable<VarChar>,
        input_values -> Nullable<Jsonb>,
    }
}

/// diesel table for posts
table! {
    posts (id) {
        id -> Integer,
        title -> VarChar,
        detail -> Text,
        poster_id -> Integer,
        category_id -> VarChar,
        create_date -> Timestamptz,
        is_active -> Bool,
    }
}

/// diesel table for post attributes
table! {
    post_attributes (id) {
        id -> Integer,
        post_id -> Integer,
        data -> Jsonb,
    }
}

/// diesel table for post images
table! {
    post_images (id) {
        id -> Integer,
        post_id -> Integer,
        image -> VarChar,
    }
}

joinable!(category_attributes -> categories (category_id));
joinable!(posts -> categories (category_id));
joinable!(post_attributes -> posts (post_id));
joinable!(post_images -> posts (post_id));

allow_tables_to_appear_in_same_query!(categories, category_attributes, posts, post_attributes, post_images);
