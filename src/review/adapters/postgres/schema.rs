//! Diesel schema for review persistence.

diesel::table! {
    /// Restaurant listings and their review state.
    restaurants (id) {
        /// Restaurant identifier.
        id -> Uuid,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// Contact phone number.
        #[max_length = 64]
        phone -> Varchar,
        /// Street address.
        address -> Text,
        /// Latitude in decimal degrees.
        latitude -> Float8,
        /// Longitude in decimal degrees.
        longitude -> Float8,
        /// Review lifecycle status.
        #[max_length = 50]
        review_status -> Varchar,
        /// Signage photo URL.
        signage_url -> Nullable<Text>,
        /// Menu photo URL.
        menu_url -> Nullable<Text>,
        /// Banner photo URL.
        banner_url -> Nullable<Text>,
        /// Every evidence URL recorded so far, as a JSON array.
        review_history -> Jsonb,
        /// Worker who completed the review.
        reviewed_by -> Nullable<Uuid>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Claims of restaurants by workers.
    review_tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Owning worker.
        worker_id -> Uuid,
        /// Target restaurant.
        restaurant_id -> Uuid,
        /// Task status.
        #[max_length = 50]
        status -> Varchar,
        /// Completion timestamp.
        review_date -> Nullable<Timestamptz>,
        /// Submitted signage photo URL.
        signage_url -> Nullable<Text>,
        /// Submitted menu photo URL.
        menu_url -> Nullable<Text>,
        /// Submitted banner photo URL.
        banner_url -> Nullable<Text>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Worker and administrator accounts.
    workers (id) {
        /// Worker identifier.
        id -> Uuid,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// Unique login name.
        #[max_length = 255]
        username -> Varchar,
        /// Account role.
        #[max_length = 50]
        role -> Varchar,
        /// Approval flag.
        approved -> Bool,
        /// Completed-task counter.
        tasks_completed -> Int8,
        /// Home latitude.
        home_latitude -> Nullable<Float8>,
        /// Home longitude.
        home_longitude -> Nullable<Float8>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
